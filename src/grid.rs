use crate::errors::DataError;
use crate::models::DataKind;
use crate::storage::{date_key, parse_submitted_date};
use chrono::NaiveDate;

pub const OUT_OF_BOUNDS: &str = "Date or HP Time Bin is out of bounds";

#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl Grid {
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, DataError> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut values = Vec::with_capacity(rows.len() * cols);
        for (index, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(DataError::Shape(format!(
                    "row {index} has {} values, expected {cols}",
                    row.len()
                )));
            }
            values.extend_from_slice(row);
        }

        Ok(Self {
            rows: rows.len(),
            cols,
            values,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            self.values.get(row * self.cols + col).copied()
        } else {
            None
        }
    }

    fn row(&self, row: usize) -> &[f64] {
        let start = row * self.cols;
        &self.values[start..start + self.cols]
    }

    pub fn row_slices(&self) -> impl Iterator<Item = &[f64]> {
        (0..self.rows).map(|row| self.row(row))
    }
}

/// Time-bin axis values plus the text each bin is shown as. Integer columns
/// print as integers, float columns keep their trailing `.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeBins {
    pub values: Vec<f64>,
    pub labels: Vec<String>,
}

impl TimeBins {
    pub fn integers(values: Vec<i64>) -> Self {
        Self {
            labels: values.iter().map(i64::to_string).collect(),
            values: values.into_iter().map(|value| value as f64).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Vec<f64>> for TimeBins {
    fn from(values: Vec<f64>) -> Self {
        Self {
            labels: values.iter().copied().map(float_repr).collect(),
            values,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SurfaceData {
    pub real: Grid,
    pub pred: Grid,
    pub time_bins: TimeBins,
    pub dates: Vec<NaiveDate>,
}

impl SurfaceData {
    pub fn new(
        real: Grid,
        pred: Grid,
        time_bins: TimeBins,
        dates: Vec<NaiveDate>,
    ) -> Result<Self, DataError> {
        for (name, grid) in [("real", &real), ("pred", &pred)] {
            if grid.rows() != time_bins.len() {
                return Err(DataError::Shape(format!(
                    "{name} grid has {} rows but there are {} time bins",
                    grid.rows(),
                    time_bins.len()
                )));
            }
            if grid.cols() != dates.len() {
                return Err(DataError::Shape(format!(
                    "{name} grid has {} columns but there are {} dates",
                    grid.cols(),
                    dates.len()
                )));
            }
        }

        Ok(Self {
            real,
            pred,
            time_bins,
            dates,
        })
    }

    pub fn grid(&self, kind: DataKind) -> &Grid {
        match kind {
            DataKind::Real => &self.real,
            DataKind::Pred => &self.pred,
        }
    }

    pub fn date_labels(&self) -> Vec<String> {
        self.dates.iter().copied().map(date_key).collect()
    }

    pub fn date_index(&self, date: NaiveDate) -> Option<usize> {
        self.dates.iter().position(|candidate| *candidate == date)
    }

    pub fn value_at(&self, kind: DataKind, date: NaiveDate, time_bin: usize) -> Option<f64> {
        let col = self.date_index(date)?;
        self.grid(kind).get(time_bin, col)
    }

    /// Resolves a submitted (date, time bin) pair into the text shown under
    /// the controls. Anything that does not land on a stored cell yields
    /// [`OUT_OF_BOUNDS`].
    pub fn lookup(&self, kind: DataKind, date: &str, time_bin: Option<f64>) -> String {
        let (Some(parsed), Some(bin)) =
            (parse_submitted_date(date), time_bin.and_then(bin_index))
        else {
            return OUT_OF_BOUNDS.to_string();
        };

        match self.value_at(kind, parsed, bin) {
            Some(value) => format!(
                "Value for {date} at Time of heater profile {bin}: {}",
                float_repr(value)
            ),
            None => OUT_OF_BOUNDS.to_string(),
        }
    }
}

/// Shortest round-trip text for a float, switching to scientific notation
/// below 1e-4 and from 1e16 up with a signed, two-digit exponent (`1e-07`,
/// `1.5e+16`), the same way numpy scalars print.
pub fn float_repr(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let scientific = format!("{value:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return format!("{value:?}");
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    if value != 0.0 && (exponent < -4 || exponent >= 16) {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.abs())
    } else {
        format!("{value:?}")
    }
}

fn bin_index(value: f64) -> Option<usize> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 {
        Some(value as usize)
    } else {
        None
    }
}
