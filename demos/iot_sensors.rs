//! IoT sensor round-trip example.
//!
//! This example demonstrates:
//! - Building the time window of a dashboard query
//! - Decoding a JSON query response into typed sensor records
//! - Writing the records back as points of another measurement
//!
//! Run with: cargo run --example iot_sensors

use pointmap::query::{Params, in_regex, time_range};
use pointmap::{BatchPoints, Precision, QueryResponse, Record, decode_series, encode_batch};

#[derive(Debug, Default, Record)]
struct MinewSensor {
    #[record(column = "time", timestamp)]
    timestamp: i64,
    #[record(column = "temperature", field = "temperature")]
    temperature: Option<f64>,
    #[record(column = "humidity", field = "humidity")]
    humidity: Option<f64>,
    #[record(column = "battery", field = "battery")]
    battery: Option<f64>,
    #[record(column = "code", tag = "code")]
    code: String,
}

const RESPONSE: &str = r#"{
    "results": [{
        "statement_id": 0,
        "series": [{
            "name": "minew_sensor_indoor",
            "columns": ["time", "temperature", "humidity", "battery", "code"],
            "values": [
                [1700000000, 22.4, 51.2, 98, "A"],
                [1700000000, 20.1, 48.9, 97, "B"],
                [1700000900, 22.6, null, 98, "A"]
            ]
        }]
    }]
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== IoT Sensor Round-Trip Example ===\n");

    let window = time_range(&Params {
        last: "24h".to_string(),
        ..Params::default()
    });
    println!(
        "SELECT mean(temperature) AS temperature, mean(humidity) AS humidity, mean(battery) AS battery \
         FROM minew_sensor_indoor WHERE code =~ {} AND time >= {} AND time <= {} \
         GROUP BY time({}), code fill({})\n",
        in_regex(&["A", "B"]),
        window.start,
        window.end,
        window.group,
        window.fill
    );

    let response = QueryResponse::from_json(RESPONSE)?;
    let mut batch = BatchPoints::builder()
        .database("sensors")
        .precision(Precision::Seconds)
        .build();

    for series in response.series() {
        let sensors: Vec<MinewSensor> = decode_series(series);
        println!("Decoded {} readings from '{}':", sensors.len(), series.name);
        for sensor in &sensors {
            println!(
                "  {} @ {}: temperature={:?} humidity={:?} battery={:?}",
                sensor.code, sensor.timestamp, sensor.temperature, sensor.humidity, sensor.battery
            );
        }
        encode_batch(&sensors, "minew_sensor_rollup", &mut batch)?;
    }

    println!("\nLine protocol for database '{}':", batch.database());
    println!("{}", batch.to_line_protocol());

    Ok(())
}
