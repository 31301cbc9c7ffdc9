pub mod app;
pub mod errors;
pub mod figure;
pub mod grid;
pub mod handlers;
pub mod models;
pub mod series;
pub mod server;
pub mod state;
pub mod storage;
pub mod ui;

pub use app::{series_router, surface_router};
pub use state::{SeriesState, SurfaceState};
pub use storage::{load_sensor_table, load_surface_data, resolve_data_dir, resolve_port};
