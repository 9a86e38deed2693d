use std::{
    env, fs,
    net::SocketAddr,
    panic,
    path::{Path, PathBuf},
    str::FromStr,
    thread,
    time::{Duration, SystemTime},
};
use tokio::net::TcpListener;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

const DEFAULT_LOG_DIR: &str = "/var/log/fleet";

pub struct TracingGuards {
    _file_guard: Option<WorkerGuard>,
}

/// Log output settings shared by every service.
#[derive(Clone, Debug)]
pub struct LogConfig {
    pub dir: PathBuf,
    pub retention_days: u64,
    pub cleanup_interval_minutes: u64,
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self {
            dir: PathBuf::from(env::var("LOG_DIR").unwrap_or_else(|_| DEFAULT_LOG_DIR.to_string())),
            retention_days: env_or("LOG_RETENTION_DAYS", 14u64),
            cleanup_interval_minutes: env_or("LOG_CLEANUP_INTERVAL_MINUTES", 360u64),
        }
    }
}

pub fn init_tracing(service_name: &str) -> TracingGuards {
    let config = LogConfig::from_env();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let log_root = config.dir.join(service_name);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout);

    // Stdout only when the log directory is not writable.
    let file_writer = fs::create_dir_all(&log_root).ok().and_then(|_| {
        panic::catch_unwind(|| {
            tracing_appender::rolling::daily(&log_root, format!("{service_name}.log"))
        })
        .ok()
    });

    let file_guard = match file_writer {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let subscriber = Registry::default()
                .with(filter)
                .with(stdout_layer)
                .with(fmt::layer().with_ansi(false).with_writer(writer));
            let _ = tracing::subscriber::set_global_default(subscriber);
            Some(guard)
        }
        None => {
            let subscriber = Registry::default().with(filter).with(stdout_layer);
            let _ = tracing::subscriber::set_global_default(subscriber);
            None
        }
    };

    if file_guard.is_some() {
        spawn_log_cleanup(
            log_root,
            config.retention_days,
            config.cleanup_interval_minutes,
        );
    }

    tracing::info!(service = service_name, "tracing initialised");

    TracingGuards {
        _file_guard: file_guard,
    }
}

pub fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse::<T>().ok())
        .unwrap_or(default)
}

/// Redis endpoint from `REDIS_URL`, else built from `REDIS_HOST`.
pub fn redis_url_from_env() -> String {
    env::var("REDIS_URL").unwrap_or_else(|_| {
        let host = env::var("REDIS_HOST").unwrap_or_else(|_| "redis".to_string());
        format!("redis://{host}:6379")
    })
}

/// Hostname of the running container, reported by health endpoints.
pub fn container_id() -> String {
    hostname::get()
        .ok()
        .and_then(|name| name.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string())
}

fn spawn_log_cleanup(log_root: PathBuf, retention_days: u64, cleanup_interval_minutes: u64) {
    if retention_days == 0 || cleanup_interval_minutes == 0 {
        return;
    }

    let retention = Duration::from_secs(retention_days * 24 * 60 * 60);
    let interval = Duration::from_secs(cleanup_interval_minutes * 60);

    thread::spawn(move || loop {
        if let Some(cutoff) = SystemTime::now().checked_sub(retention) {
            cleanup_old_logs(&log_root, cutoff);
        }
        thread::sleep(interval);
    });
}

fn cleanup_old_logs(root: &Path, cutoff: SystemTime) {
    let Ok(entries) = fs::read_dir(root) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            cleanup_old_logs(&path, cutoff);
            continue;
        }
        let modified = fs::metadata(&path).and_then(|metadata| metadata.modified());
        if matches!(modified, Ok(modified) if modified < cutoff) {
            let _ = fs::remove_file(&path);
        }
    }
}

pub async fn bind_listener(port: u16) -> TcpListener {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await.expect("bind listener");
    tracing::info!(%addr, "listening");
    listener
}

pub async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("sigterm handler");
        tokio::select! {
            _ = ctrl_c => {},
            _ = sigterm.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = ctrl_c.await;
    }

    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_or_falls_back_on_missing_or_invalid_values() {
        assert_eq!(env_or("FLEET_COMMON_TEST_UNSET_KEY", 42u16), 42);

        env::set_var("FLEET_COMMON_TEST_BAD_PORT", "not-a-port");
        assert_eq!(env_or("FLEET_COMMON_TEST_BAD_PORT", 8080u16), 8080);

        env::set_var("FLEET_COMMON_TEST_GOOD_PORT", "9001");
        assert_eq!(env_or("FLEET_COMMON_TEST_GOOD_PORT", 8080u16), 9001);
    }

    #[test]
    fn container_id_is_never_empty() {
        assert!(!container_id().is_empty());
    }

    #[test]
    fn cleanup_removes_only_files_older_than_cutoff() {
        let root = tempfile::tempdir().expect("tempdir");
        let nested = root.path().join("telemetry-service");
        fs::create_dir_all(&nested).expect("nested dir");
        let old = nested.join("old.log");
        fs::write(&old, b"old").expect("write old");

        let cutoff = SystemTime::now() + Duration::from_secs(60);
        cleanup_old_logs(root.path(), cutoff);
        assert!(!old.exists());

        let fresh = nested.join("fresh.log");
        fs::write(&fresh, b"fresh").expect("write fresh");
        let cutoff = SystemTime::now() - Duration::from_secs(3600);
        cleanup_old_logs(root.path(), cutoff);
        assert!(fresh.exists());
    }
}
