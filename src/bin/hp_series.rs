use hp_dash::models::Sensor;
use hp_dash::{load_sensor_table, resolve_data_dir, resolve_port, series_router, server, SeriesState};
use tracing::{error, info};

const DEFAULT_PORT: u16 = 8063;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    server::init_tracing()?;

    let data_dir = resolve_data_dir();
    // Tables are re-read on every request; this only refuses to start on bad files.
    for sensor in [Sensor::Ibs, Sensor::Obs] {
        let table = load_sensor_table(&data_dir, sensor)
            .await
            .inspect_err(|err| error!("cannot start without {sensor} data: {err}"))?;
        info!(%sensor, dates = table.dates().len(), "sensor table ok");
    }

    let app = series_router(SeriesState::new(data_dir));
    server::serve(app, resolve_port(DEFAULT_PORT)).await?;

    Ok(())
}
