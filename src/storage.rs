use crate::errors::DataError;
use crate::grid::{Grid, SurfaceData, TimeBins};
use crate::models::Sensor;
use crate::series::{SensorRow, SensorTable};
use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::{debug, info};

pub const REAL_FILE: &str = "real2d.csv";
pub const PRED_FILE: &str = "pred2d.csv";
pub const TIME_BINS_FILE: &str = "HP_TIME_BINS.csv";
pub const FEATURES_FILE: &str = "features.csv";

const SENSOR_COLUMNS: [&str; 9] = [
    "Date", "ID", "time", "R", "T", "N", "R_pred", "T_pred", "N_pred",
];

pub fn resolve_data_dir() -> PathBuf {
    if let Ok(path) = env::var("HP_DATA_DIR") {
        return PathBuf::from(path);
    }

    PathBuf::from("data")
}

pub fn resolve_port(default: u16) -> u16 {
    env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(default)
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Dates typed into the lookup form: `YYYY-MM-DD` only.
pub fn parse_submitted_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Accepts a bare calendar date or a timestamp, keeping only the date part.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|stamp| stamp.date())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|stamp| stamp.date())
        })
}

pub async fn load_surface_data(dir: &Path) -> Result<SurfaceData, DataError> {
    let real = Grid::from_rows(parse_matrix(REAL_FILE, &read_file(dir, REAL_FILE).await?)?)?;
    let pred = Grid::from_rows(parse_matrix(PRED_FILE, &read_file(dir, PRED_FILE).await?)?)?;
    if (real.rows(), real.cols()) != (pred.rows(), pred.cols()) {
        return Err(DataError::Shape(format!(
            "{REAL_FILE} is {}x{} but {PRED_FILE} is {}x{}",
            real.rows(),
            real.cols(),
            pred.rows(),
            pred.cols()
        )));
    }

    let time_bins = parse_time_bins(&read_file(dir, TIME_BINS_FILE).await?)?;
    let dates = parse_feature_dates(&read_file(dir, FEATURES_FILE).await?)?;

    let data = SurfaceData::new(real, pred, time_bins, dates)?;
    info!(
        time_bins = data.time_bins.len(),
        dates = data.dates.len(),
        "loaded surface data from {}",
        dir.display()
    );
    Ok(data)
}

pub async fn load_sensor_table(dir: &Path, sensor: Sensor) -> Result<SensorTable, DataError> {
    let bytes = read_file(dir, sensor.file_name()).await?;
    let table = parse_sensor_table(sensor.file_name(), &bytes)?;
    debug!(sensor = %sensor, rows = table.rows.len(), "loaded sensor table");
    Ok(table)
}

async fn read_file(dir: &Path, name: &str) -> Result<Vec<u8>, DataError> {
    let path = dir.join(name);
    fs::read(&path)
        .await
        .map_err(|source| DataError::Io { path, source })
}

fn csv_error(file: &str) -> impl Fn(csv::Error) -> DataError + '_ {
    move |source| DataError::Csv {
        file: file.to_string(),
        source,
    }
}

fn parse_number(file: &str, row: usize, cell: &str) -> Result<f64, DataError> {
    cell.trim().parse::<f64>().map_err(|_| DataError::Row {
        file: file.to_string(),
        row,
        message: format!("'{cell}' is not a number"),
    })
}

pub fn parse_matrix(file: &str, bytes: &[u8]) -> Result<Vec<Vec<f64>>, DataError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for (row_no, record) in reader.records().enumerate() {
        let record = record.map_err(csv_error(file))?;
        let row = record
            .iter()
            .map(|cell| parse_number(file, row_no, cell))
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }
    Ok(rows)
}

pub fn parse_time_bins(bytes: &[u8]) -> Result<TimeBins, DataError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(bytes);

    let mut cells = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error(TIME_BINS_FILE))?;
        cells.push(record.get(0).unwrap_or("").to_string());
    }

    let integers: Option<Vec<i64>> = cells.iter().map(|cell| cell.parse::<i64>().ok()).collect();
    if let Some(integers) = integers {
        return Ok(TimeBins::integers(integers));
    }

    let values = cells
        .iter()
        .enumerate()
        .map(|(row_no, cell)| parse_number(TIME_BINS_FILE, row_no, cell))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(TimeBins::from(values))
}

pub fn parse_feature_dates(bytes: &[u8]) -> Result<Vec<NaiveDate>, DataError> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(bytes);
    let headers = reader.headers().map_err(csv_error(FEATURES_FILE))?.clone();
    let date_idx = column_index(FEATURES_FILE, &headers, "Date")?;

    let mut dates = Vec::new();
    for (row_no, record) in reader.records().enumerate() {
        let record = record.map_err(csv_error(FEATURES_FILE))?;
        dates.push(parse_date_cell(FEATURES_FILE, row_no, record.get(date_idx).unwrap_or(""))?);
    }
    Ok(dates)
}

pub fn parse_sensor_table(file: &str, bytes: &[u8]) -> Result<SensorTable, DataError> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(bytes);
    let headers = reader.headers().map_err(csv_error(file))?.clone();
    let mut idx = [0usize; SENSOR_COLUMNS.len()];
    for (slot, column) in idx.iter_mut().zip(SENSOR_COLUMNS) {
        *slot = column_index(file, &headers, column)?;
    }
    let [date_i, id_i, time_i, r_i, t_i, n_i, rp_i, tp_i, np_i] = idx;

    let mut rows = Vec::new();
    for (row_no, record) in reader.records().enumerate() {
        let record = record.map_err(csv_error(file))?;
        let cell = |i: usize| record.get(i).unwrap_or("");
        let series = |i: usize| parse_series(file, row_no, cell(i));

        let row = SensorRow {
            date: parse_date_cell(file, row_no, cell(date_i))?,
            id: cell(id_i).to_string(),
            time: series(time_i)?,
            observed: [series(r_i)?, series(t_i)?, series(n_i)?],
            predicted: [series(rp_i)?, series(tp_i)?, series(np_i)?],
        };

        let expected = row.time.len();
        if row
            .observed
            .iter()
            .chain(row.predicted.iter())
            .any(|values| values.len() != expected)
        {
            return Err(DataError::Row {
                file: file.to_string(),
                row: row_no,
                message: format!("series lengths differ from {expected} time samples"),
            });
        }
        rows.push(row);
    }
    Ok(SensorTable::new(rows))
}

/// A list of floats packed in one cell: `1;2;3`, `[1, 2, 3]` or `1 2 3`.
pub fn parse_series(file: &str, row: usize, cell: &str) -> Result<Vec<f64>, DataError> {
    cell.trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(|c: char| c == ';' || c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| parse_number(file, row, token))
        .collect()
}

fn column_index(file: &str, headers: &StringRecord, column: &str) -> Result<usize, DataError> {
    headers
        .iter()
        .position(|header| header == column)
        .ok_or_else(|| DataError::MissingColumn {
            file: file.to_string(),
            column: column.to_string(),
        })
}

fn parse_date_cell(file: &str, row: usize, cell: &str) -> Result<NaiveDate, DataError> {
    parse_date(cell).ok_or_else(|| DataError::Row {
        file: file.to_string(),
        row,
        message: format!("'{cell}' is not a date"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_rows_parse_with_spaces() {
        let rows = parse_matrix(REAL_FILE, b"5.23, 1.0\n-2,3e-1\n").unwrap();
        assert_eq!(rows, vec![vec![5.23, 1.0], vec![-2.0, 0.3]]);
    }

    #[test]
    fn matrix_rejects_text_cells() {
        let err = parse_matrix(REAL_FILE, b"1.0,abc\n").unwrap_err();
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn time_bins_use_first_column_only() {
        let bins = parse_time_bins(b"0,x\n15\n30.5\n").unwrap();
        assert_eq!(bins.values, vec![0.0, 15.0, 30.5]);
        assert_eq!(bins.labels, vec!["0.0", "15.0", "30.5"]);
    }

    #[test]
    fn integer_time_bins_keep_integer_labels() {
        let bins = parse_time_bins(b"0\n15\n30\n").unwrap();
        assert_eq!(bins.values, vec![0.0, 15.0, 30.0]);
        assert_eq!(bins.labels, vec!["0", "15", "30"]);
    }

    #[test]
    fn submitted_dates_must_be_plain_dates() {
        let date = NaiveDate::from_ymd_opt(2021, 3, 1).unwrap();
        assert_eq!(parse_submitted_date("2021-03-01"), Some(date));
        assert_eq!(parse_submitted_date("2021-03-01T04:00:00"), None);
        assert_eq!(parse_submitted_date("2021-03-01 00:00:00"), None);
        assert_eq!(parse_date("2021-03-01T04:00:00"), Some(date));
    }

    fn scratch_dir(tag: &str) -> std::path::PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let mut dir = std::env::temp_dir();
        dir.push(format!("hp_dash_storage_{tag}_{}_{nanos}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_surface_files(dir: &Path, real: &str, pred: &str, features: &str) {
        std::fs::write(dir.join(REAL_FILE), real).unwrap();
        std::fs::write(dir.join(PRED_FILE), pred).unwrap();
        std::fs::write(dir.join(TIME_BINS_FILE), "0\n30\n").unwrap();
        std::fs::write(dir.join(FEATURES_FILE), features).unwrap();
    }

    const FEATURES: &str = "Date\n2021-03-01\n2021-03-02\n";

    #[tokio::test]
    async fn surface_data_loads_from_directory() {
        let dir = scratch_dir("ok");
        write_surface_files(&dir, "1,2\n3,4\n", "5,6\n7,8\n", FEATURES);

        let data = load_surface_data(&dir).await.unwrap();
        assert_eq!(data.time_bins.labels, vec!["0", "30"]);
        assert_eq!(data.dates.len(), 2);
        assert_eq!(data.pred.get(1, 0), Some(7.0));
        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn surface_data_needs_every_file() {
        let dir = scratch_dir("missing").join("absent");
        let err = load_surface_data(&dir).await.unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
        assert!(err.to_string().contains(REAL_FILE));
    }

    #[tokio::test]
    async fn surface_data_rejects_mismatched_grids() {
        let dir = scratch_dir("shape");
        write_surface_files(&dir, "1,2\n3,4\n", "5,6,7\n8,9,10\n", FEATURES);

        let err = load_surface_data(&dir).await.unwrap_err();
        assert!(matches!(err, DataError::Shape(_)));
        assert!(err.to_string().contains(PRED_FILE));
        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn surface_data_rejects_bad_feature_dates() {
        let dir = scratch_dir("dates");
        write_surface_files(&dir, "1,2\n3,4\n", "5,6\n7,8\n", "Date\n2021-03-01\nsoon\n");

        let err = load_surface_data(&dir).await.unwrap_err();
        assert!(matches!(err, DataError::Row { row: 1, .. }));
        assert!(err.to_string().contains("soon"));
        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn sensor_table_missing_file_is_io_error() {
        let dir = scratch_dir("sensor");
        let err = load_sensor_table(&dir, Sensor::Obs).await.unwrap_err();
        assert!(err.to_string().contains("OBS_data.csv"));
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn feature_dates_accept_timestamps() {
        let csv = b"Temp,Date\n1.0,2021-03-01\n2.0,2021-03-02 00:00:00\n";
        let dates = parse_feature_dates(csv).unwrap();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2021, 3, 1).unwrap(),
                NaiveDate::from_ymd_opt(2021, 3, 2).unwrap(),
            ]
        );
    }

    #[test]
    fn feature_dates_need_date_column() {
        let err = parse_feature_dates(b"when\n2021-03-01\n").unwrap_err();
        assert!(matches!(err, DataError::MissingColumn { .. }));
    }

    #[test]
    fn series_cells_accept_common_list_forms() {
        assert_eq!(parse_series("f", 0, "1;2;3").unwrap(), vec![1.0, 2.0, 3.0]);
        assert_eq!(parse_series("f", 0, "[1.5, 2.5]").unwrap(), vec![1.5, 2.5]);
        assert_eq!(parse_series("f", 0, "4 5").unwrap(), vec![4.0, 5.0]);
        assert!(parse_series("f", 0, "").unwrap().is_empty());
    }

    #[test]
    fn sensor_table_parses_rows() {
        let csv = "Date,ID,time,R,T,N,R_pred,T_pred,N_pred\n\
                   2022-05-01,7,0;60,1;2,3;4,5;6,1.5;2.5,3.5;4.5,5.5;6.5\n";
        let table = parse_sensor_table("IBS_data.csv", csv.as_bytes()).unwrap();
        assert_eq!(table.rows.len(), 1);
        let row = &table.rows[0];
        assert_eq!(row.id, "7");
        assert_eq!(row.time, vec![0.0, 60.0]);
        assert_eq!(row.observed[2], vec![5.0, 6.0]);
        assert_eq!(row.predicted[0], vec![1.5, 2.5]);
    }

    #[test]
    fn sensor_table_rejects_uneven_series() {
        let csv = "Date,ID,time,R,T,N,R_pred,T_pred,N_pred\n\
                   2022-05-01,7,0;60,1,3;4,5;6,1.5;2.5,3.5;4.5,5.5;6.5\n";
        let err = parse_sensor_table("IBS_data.csv", csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("series lengths"));
    }

    #[test]
    fn date_key_is_iso() {
        let date = NaiveDate::from_ymd_opt(2020, 1, 9).unwrap();
        assert_eq!(date_key(date), "2020-01-09");
        assert_eq!(parse_date(" 2020-01-09 "), Some(date));
        assert_eq!(parse_date("09/01/2020"), None);
    }
}
