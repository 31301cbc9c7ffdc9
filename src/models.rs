use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    Real,
    #[default]
    Pred,
}

impl DataKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DataKind::Real => "real",
            DataKind::Pred => "pred",
        }
    }

    /// Capitalized form used in figure titles ("Real", "Pred").
    pub fn title(self) -> &'static str {
        match self {
            DataKind::Real => "Real",
            DataKind::Pred => "Pred",
        }
    }
}

impl FromStr for DataKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "real" => Ok(DataKind::Real),
            "pred" => Ok(DataKind::Pred),
            other => Err(format!("kind must be 'real' or 'pred', got '{other}'")),
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sensor {
    #[default]
    Ibs,
    Obs,
}

impl Sensor {
    pub fn as_str(self) -> &'static str {
        match self {
            Sensor::Ibs => "IBS",
            Sensor::Obs => "OBS",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Sensor::Ibs => "IBS_data.csv",
            Sensor::Obs => "OBS_data.csv",
        }
    }
}

impl FromStr for Sensor {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "IBS" => Ok(Sensor::Ibs),
            "OBS" => Ok(Sensor::Obs),
            other => Err(format!("sensor must be 'IBS' or 'OBS', got '{other}'")),
        }
    }
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Deserialize)]
pub struct SurfaceQuery {
    pub kind: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SurfaceMeta {
    pub dates: Vec<String>,
    pub time_bins: Vec<f64>,
    pub default_date: Option<String>,
    pub default_kind: DataKind,
}

/// Submitted lookup. `time_bin` stays loose so that blank or fractional
/// inputs come back as the bounds message instead of a rejected body.
#[derive(Debug, Deserialize)]
pub struct LookupRequest {
    pub kind: String,
    pub date: String,
    pub time_bin: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LookupResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct DateOptionsQuery {
    pub sensor: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DateOptionsResponse {
    pub sensor: Sensor,
    pub dates: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SeriesQuery {
    pub sensor: String,
    pub dates: Option<String>,
}
