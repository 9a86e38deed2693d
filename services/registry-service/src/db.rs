use tokio_postgres::{Client, Error, Row};

use crate::models::{NewVehicle, Vehicle, ACTIVE_STATUS};

const SQL_CREATE_VEHICLES: &str = "CREATE TABLE IF NOT EXISTS vehicles ( \
id BIGSERIAL PRIMARY KEY, \
license_plate TEXT NOT NULL UNIQUE, \
model TEXT NOT NULL, \
year INTEGER, \
fuel_type TEXT, \
status TEXT NOT NULL DEFAULT 'active', \
created_at TIMESTAMP NOT NULL DEFAULT (NOW() AT TIME ZONE 'utc'))";
// Columns are coalesced so rows written by older clients still decode.
const SQL_LIST_VEHICLES: &str = "SELECT id::bigint AS id, license_plate, \
COALESCE(model, '') AS model, year, fuel_type, COALESCE(status, 'active') AS status, \
COALESCE(to_char(created_at, 'YYYY-MM-DD\"T\"HH24:MI:SS.US'), '') AS created_at \
FROM vehicles ORDER BY id";
const SQL_INSERT_VEHICLE: &str = "INSERT INTO vehicles \
(license_plate, model, year, fuel_type, status, created_at) \
VALUES ($1, $2, $3, $4, $5, NOW() AT TIME ZONE 'utc') \
RETURNING id::bigint AS id, license_plate, model, year, fuel_type, status, \
to_char(created_at, 'YYYY-MM-DD\"T\"HH24:MI:SS.US') AS created_at";
const SQL_COUNT_VEHICLES: &str = "SELECT COUNT(*) AS count FROM vehicles";
const SQL_PING: &str = "SELECT 1";

fn vehicle_from_row(row: &Row) -> Vehicle {
    Vehicle {
        id: row.get("id"),
        license_plate: row.get("license_plate"),
        model: row.get("model"),
        year: row.get("year"),
        fuel_type: row.get("fuel_type"),
        status: row.get("status"),
        created_at: row.get("created_at"),
    }
}

pub async fn ensure_schema(db: &Client) -> Result<(), Error> {
    db.batch_execute(SQL_CREATE_VEHICLES).await
}

pub async fn list_vehicles(db: &Client) -> Result<Vec<Vehicle>, Error> {
    let rows = db.query(SQL_LIST_VEHICLES, &[]).await?;
    Ok(rows.iter().map(vehicle_from_row).collect())
}

pub async fn insert_vehicle(db: &Client, vehicle: &NewVehicle) -> Result<Vehicle, Error> {
    let row = db
        .query_one(
            SQL_INSERT_VEHICLE,
            &[
                &vehicle.license_plate,
                &vehicle.model,
                &vehicle.year,
                &vehicle.fuel_type,
                &ACTIVE_STATUS,
            ],
        )
        .await?;
    Ok(vehicle_from_row(&row))
}

pub async fn count_vehicles(db: &Client) -> Result<i64, Error> {
    let row = db.query_one(SQL_COUNT_VEHICLES, &[]).await?;
    Ok(row.get("count"))
}

pub async fn ping(db: &Client) -> Result<(), Error> {
    db.simple_query(SQL_PING).await?;
    Ok(())
}
