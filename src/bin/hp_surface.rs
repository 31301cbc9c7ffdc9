use hp_dash::{load_surface_data, resolve_data_dir, resolve_port, server, surface_router, SurfaceState};
use tracing::error;

const DEFAULT_PORT: u16 = 8062;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    server::init_tracing()?;

    let data_dir = resolve_data_dir();
    let data = load_surface_data(&data_dir)
        .await
        .inspect_err(|err| error!("cannot start without surface data: {err}"))?;

    let app = surface_router(SurfaceState::new(data));
    server::serve(app, resolve_port(DEFAULT_PORT)).await?;

    Ok(())
}
