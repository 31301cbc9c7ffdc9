use crate::grid::SurfaceData;
use std::{path::PathBuf, sync::Arc};

#[derive(Clone)]
pub struct SurfaceState {
    pub data: Arc<SurfaceData>,
}

impl SurfaceState {
    pub fn new(data: SurfaceData) -> Self {
        Self {
            data: Arc::new(data),
        }
    }
}

#[derive(Clone)]
pub struct SeriesState {
    pub data_dir: PathBuf,
}

impl SeriesState {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }
}
