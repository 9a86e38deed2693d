use prometheus::{Encoder, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

pub const CONTENT_TYPE: &str = prometheus::TEXT_FORMAT;

/// Prometheus collectors exposed on `/metrics`.
pub struct RegistryMetrics {
    registry: Registry,
    http_requests_total: IntCounterVec,
    vehicles_total: IntGauge,
    vehicles_active: IntGauge,
}

impl RegistryMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests"),
            &["method", "endpoint"],
        )?;
        let vehicles_total = IntGauge::new("vehicles_total", "Total number of vehicles")?;
        let vehicles_active = IntGauge::new("vehicles_active", "Number of active vehicles")?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(vehicles_total.clone()))?;
        registry.register(Box::new(vehicles_active.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            vehicles_total,
            vehicles_active,
        })
    }

    pub fn record_request(&self, method: &str, endpoint: &str) {
        self.http_requests_total
            .with_label_values(&[method, endpoint])
            .inc();
    }

    pub fn set_vehicles_total(&self, total: i64) {
        self.vehicles_total.set(total);
    }

    pub fn set_vehicles_active(&self, active: i64) {
        self.vehicles_active.set(active);
    }

    /// Text exposition of every registered collector.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|err| prometheus::Error::Msg(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_includes_counters_and_gauges() {
        let metrics = RegistryMetrics::new().expect("metrics");
        metrics.record_request("GET", "/vehicles");
        metrics.record_request("GET", "/vehicles");
        metrics.set_vehicles_total(3);
        metrics.set_vehicles_active(2);

        let text = metrics.render().expect("render");
        assert!(text.contains("http_requests_total{endpoint=\"/vehicles\",method=\"GET\"} 2"));
        assert!(text.contains("vehicles_total 3"));
        assert!(text.contains("vehicles_active 2"));
        assert!(text.contains("# TYPE vehicles_total gauge"));
    }

    #[test]
    fn separate_instances_do_not_share_state() {
        let first = RegistryMetrics::new().expect("metrics");
        let second = RegistryMetrics::new().expect("metrics");
        first.set_vehicles_total(10);
        assert!(second.render().expect("render").contains("vehicles_total 0"));
    }
}
