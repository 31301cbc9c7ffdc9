//! Writes a small synthetic data set so both dashboards can be tried without
//! mission data. Output goes to `HP_DATA_DIR` (default `data/`).

use chrono::{Duration, NaiveDate};
use csv::Writer;
use hp_dash::models::Sensor;
use hp_dash::resolve_data_dir;
use hp_dash::storage::{date_key, FEATURES_FILE, PRED_FILE, REAL_FILE, TIME_BINS_FILE};
use std::error::Error;
use std::path::Path;
use tracing::info;

const DATE_COUNT: i64 = 30;
const BIN_COUNT: usize = 40;
const BIN_SECONDS: f64 = 15.0;
const SERIES_DATES: i64 = 8;

fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 1, 1).unwrap_or_default()
}

/// Field step after the heater switches on at 60 s, relaxing back over time.
fn heater_signature(t: f64, amplitude: f64, tau: f64) -> f64 {
    if t < 60.0 {
        0.0
    } else {
        amplitude * (1.0 - (-(t - 60.0) / tau).exp())
    }
}

fn write_grids(dir: &Path) -> Result<(), Box<dyn Error>> {
    let mut real = Writer::from_path(dir.join(REAL_FILE))?;
    let mut pred = Writer::from_path(dir.join(PRED_FILE))?;
    let mut bins = Writer::from_path(dir.join(TIME_BINS_FILE))?;

    for bin in 0..BIN_COUNT {
        let t = bin as f64 * BIN_SECONDS;
        bins.write_record([format!("{t}")])?;

        let mut real_row = Vec::with_capacity(DATE_COUNT as usize);
        let mut pred_row = Vec::with_capacity(DATE_COUNT as usize);
        for day in 0..DATE_COUNT {
            let seasonal = 1.0 + 0.2 * (day as f64 / 5.0).sin();
            let truth = heater_signature(t, 6.0 * seasonal, 120.0);
            let model = heater_signature(t, 5.8 * seasonal, 110.0);
            real_row.push(format!("{:.4}", truth + 0.05 * ((bin + day as usize) as f64).cos()));
            pred_row.push(format!("{model:.4}"));
        }
        real.write_record(&real_row)?;
        pred.write_record(&pred_row)?;
    }

    real.flush()?;
    pred.flush()?;
    bins.flush()?;
    Ok(())
}

fn write_features(dir: &Path) -> Result<(), Box<dyn Error>> {
    let mut features = Writer::from_path(dir.join(FEATURES_FILE))?;
    features.write_record(["Date", "HeaterCurrent"])?;
    for day in 0..DATE_COUNT {
        let date = start_date() + Duration::days(day);
        let current = 0.8 + 0.01 * day as f64;
        features.write_record([date_key(date), format!("{current:.3}")])?;
    }
    features.flush()?;
    Ok(())
}

fn join(values: impl Iterator<Item = f64>) -> String {
    values
        .map(|value| format!("{value:.3}"))
        .collect::<Vec<_>>()
        .join(";")
}

fn write_sensor(dir: &Path, sensor: Sensor, gain: f64) -> Result<(), Box<dyn Error>> {
    let mut writer = Writer::from_path(dir.join(sensor.file_name()))?;
    writer.write_record(["Date", "ID", "time", "R", "T", "N", "R_pred", "T_pred", "N_pred"])?;

    let times: Vec<f64> = (0..=36).map(|step| step as f64 * 5.0).collect();
    let mut id = 0u32;
    for day in 0..SERIES_DATES {
        let date = start_date() + Duration::days(day * 3);
        // The first date gets a second pass, which the dashboard never plots.
        let passes = if day == 0 { 2 } else { 1 };
        for pass in 0..passes {
            let scale = gain * (1.0 + 0.05 * day as f64 + 0.3 * pass as f64);
            let axis = |weight: f64, tau: f64| {
                join(times.iter().map(|t| weight * heater_signature(*t, scale, tau)))
            };
            writer.write_record([
                date_key(date),
                id.to_string(),
                join(times.iter().copied()),
                axis(1.0, 40.0),
                axis(-0.6, 55.0),
                axis(0.3, 70.0),
                axis(0.95, 42.0),
                axis(-0.55, 50.0),
                axis(0.32, 75.0),
            ])?;
            id += 1;
        }
    }

    writer.flush()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    hp_dash::server::init_tracing()?;

    let dir = resolve_data_dir();
    std::fs::create_dir_all(&dir)?;

    write_grids(&dir)?;
    write_features(&dir)?;
    write_sensor(&dir, Sensor::Ibs, 4.0)?;
    write_sensor(&dir, Sensor::Obs, 1.5)?;

    info!("wrote sample data to {}", dir.display());
    Ok(())
}
