//! Plotly figure payloads. The browser hands these straight to
//! `Plotly.react`, so field names follow plotly.js.

use crate::grid::SurfaceData;
use crate::models::{DataKind, Sensor};
use crate::series::{Axis, SensorRow};
use crate::storage::date_key;
use serde::Serialize;

/// Elapsed time at which the heater switches on.
pub const HEATER_ON_SECONDS: f64 = 60.0;
pub const MARKER_NAME: &str = "Heater on (60 s)";
pub const EMPTY_SERIES_TITLE: &str = "Select dates to display";

const AXIS_COLORS: [&str; 3] = ["#1f77b4", "#ff7f0e", "#2ca02c"];
const DATE_DASHES: [&str; 5] = ["solid", "dot", "dashdot", "longdash", "longdashdot"];

#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Surface(SurfaceTrace),
    Scatter(ScatterTrace),
}

#[derive(Debug, Clone, Serialize)]
pub struct SurfaceTrace {
    pub x: Vec<String>,
    pub y: Vec<f64>,
    pub z: Vec<Vec<f64>>,
    pub text: Vec<Vec<String>>,
    pub colorscale: &'static str,
    pub hoverinfo: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScatterTrace {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub mode: &'static str,
    pub name: String,
    pub xaxis: &'static str,
    pub yaxis: &'static str,
    pub legendgroup: String,
    pub showlegend: bool,
    pub line: Line,
}

#[derive(Debug, Clone, Serialize)]
pub struct Line {
    pub color: &'static str,
    pub dash: &'static str,
    pub width: f64,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct Layout {
    pub title: Title,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autosize: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scene: Option<Scene>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<AxisLayout>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<AxisLayout>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis2: Option<AxisLayout>,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct Title {
    pub text: String,
}

impl Title {
    fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct AxisLayout {
    pub title: Title,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<&'static str>,
}

impl AxisLayout {
    fn titled(text: &str) -> Self {
        Self {
            title: Title::new(text),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Scene {
    pub xaxis: AxisLayout,
    pub yaxis: AxisLayout,
    pub zaxis: AxisLayout,
    pub camera: Camera,
}

#[derive(Debug, Clone, Serialize)]
pub struct Camera {
    pub eye: Eye,
}

#[derive(Debug, Clone, Serialize)]
pub struct Eye {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// 3-D surface of one grid over (date, time bin).
pub fn surface_figure(data: &SurfaceData, kind: DataKind) -> Figure {
    let grid = data.grid(kind);
    let dates = data.date_labels();

    let text: Vec<Vec<String>> = data
        .time_bins
        .labels
        .iter()
        .zip(grid.row_slices())
        .map(|(bin, row)| {
            dates
                .iter()
                .zip(row)
                .map(|(date, value)| {
                    format!("Date: {date}<br>HP Time Bin: {bin}<br>Value: {value:.2}")
                })
                .collect::<Vec<_>>()
        })
        .collect();

    let trace = SurfaceTrace {
        x: dates,
        y: data.time_bins.values.clone(),
        z: grid.row_slices().map(<[f64]>::to_vec).collect(),
        text,
        colorscale: "Viridis",
        hoverinfo: "x+y+z+text",
    };

    Figure {
        data: vec![Trace::Surface(trace)],
        layout: Layout {
            title: Title::new(format!("{} Data Visualization", kind.title())),
            autosize: Some(true),
            scene: Some(Scene {
                xaxis: AxisLayout::titled("Date"),
                yaxis: AxisLayout::titled("Time of heater profile"),
                zaxis: AxisLayout::titled("Magnetic Field Value in nT"),
                camera: Camera {
                    eye: Eye {
                        x: 1.5,
                        y: 1.5,
                        z: 1.5,
                    },
                },
            }),
            ..Default::default()
        },
    }
}

/// Two stacked panels sharing the time axis: observed on top, model values
/// below, one line per (date, axis), plus the heater-on marker.
pub fn series_figure(sensor: Sensor, rows: &[&SensorRow]) -> Figure {
    if rows.is_empty() {
        return empty_series_figure();
    }

    let mut data = Vec::with_capacity(rows.len() * 6 + 2);
    for (date_no, row) in rows.iter().enumerate() {
        let label = date_key(row.date);
        let dash = DATE_DASHES[date_no % DATE_DASHES.len()];
        for (axis_no, axis) in Axis::ALL.into_iter().enumerate() {
            let line = Line {
                color: AXIS_COLORS[axis_no],
                dash,
                width: 1.5,
            };
            let group = format!("{label} {}", axis.as_str());
            data.push(Trace::Scatter(ScatterTrace {
                x: row.time.clone(),
                y: row.observed(axis).to_vec(),
                mode: "lines",
                name: group.clone(),
                xaxis: "x",
                yaxis: "y",
                legendgroup: group.clone(),
                showlegend: true,
                line: line.clone(),
            }));
            data.push(Trace::Scatter(ScatterTrace {
                x: row.time.clone(),
                y: row.predicted(axis).to_vec(),
                mode: "lines",
                name: group.clone(),
                xaxis: "x",
                yaxis: "y2",
                legendgroup: group,
                showlegend: false,
                line,
            }));
        }
    }

    let observed = value_range(rows.iter().flat_map(|row| row.observed.iter().flatten()));
    let predicted = value_range(rows.iter().flat_map(|row| row.predicted.iter().flatten()));
    data.push(marker_trace("y", observed, true));
    data.push(marker_trace("y2", predicted, false));

    Figure {
        data,
        layout: Layout {
            title: Title::new(format!("{} magnetic field", sensor.as_str())),
            height: Some(800),
            xaxis: Some(AxisLayout {
                title: Title::new("Elapsed time [s]"),
                domain: None,
                anchor: Some("y2"),
            }),
            yaxis: Some(AxisLayout {
                title: Title::new("Observed [nT]"),
                domain: Some([0.55, 1.0]),
                anchor: Some("x"),
            }),
            yaxis2: Some(AxisLayout {
                title: Title::new("Model-corrected [nT]"),
                domain: Some([0.0, 0.45]),
                anchor: Some("x"),
            }),
            ..Default::default()
        },
    }
}

pub fn empty_series_figure() -> Figure {
    Figure {
        data: Vec::new(),
        layout: Layout {
            title: Title::new(EMPTY_SERIES_TITLE),
            ..Default::default()
        },
    }
}

fn marker_trace(yaxis: &'static str, (low, high): (f64, f64), showlegend: bool) -> Trace {
    Trace::Scatter(ScatterTrace {
        x: vec![HEATER_ON_SECONDS, HEATER_ON_SECONDS],
        y: vec![low, high],
        mode: "lines",
        name: MARKER_NAME.to_string(),
        xaxis: "x",
        yaxis,
        legendgroup: "marker".to_string(),
        showlegend,
        line: Line {
            color: "#444444",
            dash: "dash",
            width: 1.0,
        },
    })
}

fn value_range<'a>(values: impl Iterator<Item = &'a f64>) -> (f64, f64) {
    let (low, high) = values
        .copied()
        .filter(|value| value.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(low, high), value| {
            (low.min(value), high.max(value))
        });
    if low > high { (0.0, 0.0) } else { (low, high) }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Grid, TimeBins};
    use chrono::NaiveDate;
    use serde_json::Value;

    fn surface() -> SurfaceData {
        let real = Grid::from_rows(vec![vec![5.23, 1.0], vec![2.0, 3.456]]).unwrap();
        let pred = Grid::from_rows(vec![vec![5.0, 1.5], vec![2.5, 3.0]]).unwrap();
        SurfaceData::new(
            real,
            pred,
            vec![0.0, 2.5].into(),
            vec![
                NaiveDate::from_ymd_opt(2021, 3, 1).unwrap(),
                NaiveDate::from_ymd_opt(2021, 3, 2).unwrap(),
            ],
        )
        .unwrap()
    }

    fn sensor_row(day: u32) -> SensorRow {
        SensorRow {
            date: NaiveDate::from_ymd_opt(2022, 5, day).unwrap(),
            id: day.to_string(),
            time: vec![0.0, 60.0, 120.0],
            observed: [vec![1.0, 2.0, 3.0], vec![-4.0, 0.0, 0.0], vec![0.0, 0.0, 9.0]],
            predicted: [vec![1.0, 1.0, 1.0], vec![2.0, 2.0, 2.0], vec![-1.0, 0.5, 3.0]],
        }
    }

    fn as_json(figure: &Figure) -> Value {
        serde_json::to_value(figure).unwrap()
    }

    #[test]
    fn surface_figure_shape_and_hover_text() {
        let json = as_json(&surface_figure(&surface(), DataKind::Real));
        let trace = &json["data"][0];
        assert_eq!(trace["type"], "surface");
        assert_eq!(trace["x"], serde_json::json!(["2021-03-01", "2021-03-02"]));
        assert_eq!(trace["y"], serde_json::json!([0.0, 2.5]));
        assert_eq!(trace["z"][0][0], 5.23);
        assert_eq!(
            trace["text"][1][1],
            "Date: 2021-03-02<br>HP Time Bin: 2.5<br>Value: 3.46"
        );
        assert_eq!(
            trace["text"][0][0],
            "Date: 2021-03-01<br>HP Time Bin: 0.0<br>Value: 5.23"
        );
        assert_eq!(json["layout"]["title"]["text"], "Real Data Visualization");
        assert_eq!(json["layout"]["scene"]["camera"]["eye"]["x"], 1.5);
        assert_eq!(
            json["layout"]["scene"]["zaxis"]["title"]["text"],
            "Magnetic Field Value in nT"
        );
    }

    #[test]
    fn switching_kind_changes_values_not_axes() {
        let data = surface();
        let real = as_json(&surface_figure(&data, DataKind::Real));
        let pred = as_json(&surface_figure(&data, DataKind::Pred));
        assert_eq!(real["data"][0]["x"], pred["data"][0]["x"]);
        assert_eq!(real["data"][0]["y"], pred["data"][0]["y"]);
        assert_eq!(real["layout"]["scene"], pred["layout"]["scene"]);
        assert_ne!(real["data"][0]["z"], pred["data"][0]["z"]);
        assert_eq!(pred["layout"]["title"]["text"], "Pred Data Visualization");
    }

    #[test]
    fn empty_selection_gives_empty_figure() {
        let json = as_json(&series_figure(Sensor::Ibs, &[]));
        assert_eq!(json["data"], serde_json::json!([]));
        assert_eq!(json["layout"]["title"]["text"], EMPTY_SERIES_TITLE);
    }

    #[test]
    fn panels_share_the_time_axis() {
        let first = sensor_row(1);
        let second = sensor_row(2);
        let figure = series_figure(Sensor::Obs, &[&first, &second]);
        let lines: Vec<&ScatterTrace> = figure
            .data
            .iter()
            .filter_map(|trace| match trace {
                Trace::Scatter(line) if line.name != MARKER_NAME => Some(line),
                _ => None,
            })
            .collect();

        assert_eq!(lines.len(), 12);
        for pair in lines.chunks(2) {
            assert_eq!(pair[0].yaxis, "y");
            assert_eq!(pair[1].yaxis, "y2");
            assert_eq!(pair[0].xaxis, pair[1].xaxis);
            assert_eq!(pair[0].x, pair[1].x);
        }
        assert_eq!(lines[0].name, "2022-05-01 R");
        assert_eq!(lines[11].name, "2022-05-02 N");
    }

    #[test]
    fn heater_marker_is_in_the_legend_once() {
        let row = sensor_row(1);
        let figure = series_figure(Sensor::Ibs, &[&row]);
        let markers: Vec<&ScatterTrace> = figure
            .data
            .iter()
            .filter_map(|trace| match trace {
                Trace::Scatter(line) if line.name == MARKER_NAME => Some(line),
                _ => None,
            })
            .collect();

        assert_eq!(markers.len(), 2);
        assert_eq!(markers.iter().filter(|marker| marker.showlegend).count(), 1);
        assert!(markers.iter().all(|marker| marker.x == vec![HEATER_ON_SECONDS; 2]));
        assert_eq!(markers[0].y, vec![-4.0, 9.0]);
        assert_eq!(markers[1].y, vec![-1.0, 3.0]);

        let json = as_json(&figure);
        assert_eq!(json["layout"]["title"]["text"], "IBS magnetic field");
        assert_eq!(json["layout"]["xaxis"]["anchor"], "y2");
    }

    #[test]
    fn integer_bins_hover_without_fraction() {
        let grid = Grid::from_rows(vec![vec![1.0], vec![2.0]]).unwrap();
        let data = SurfaceData::new(
            grid.clone(),
            grid,
            TimeBins::integers(vec![0, 15]),
            vec![NaiveDate::from_ymd_opt(2021, 3, 1).unwrap()],
        )
        .unwrap();
        let json = as_json(&surface_figure(&data, DataKind::Pred));
        assert_eq!(
            json["data"][0]["text"][1][0],
            "Date: 2021-03-01<br>HP Time Bin: 15<br>Value: 2.00"
        );
        assert_eq!(json["data"][0]["y"], serde_json::json!([0.0, 15.0]));
    }
}
