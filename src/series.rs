use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    R,
    T,
    N,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::R, Axis::T, Axis::N];

    pub fn as_str(self) -> &'static str {
        match self {
            Axis::R => "R",
            Axis::T => "T",
            Axis::N => "N",
        }
    }

    fn index(self) -> usize {
        match self {
            Axis::R => 0,
            Axis::T => 1,
            Axis::N => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SensorRow {
    pub date: NaiveDate,
    pub id: String,
    pub time: Vec<f64>,
    pub observed: [Vec<f64>; 3],
    pub predicted: [Vec<f64>; 3],
}

impl SensorRow {
    pub fn observed(&self, axis: Axis) -> &[f64] {
        &self.observed[axis.index()]
    }

    pub fn predicted(&self, axis: Axis) -> &[f64] {
        &self.predicted[axis.index()]
    }
}

#[derive(Debug, Clone, Default)]
pub struct SensorTable {
    pub rows: Vec<SensorRow>,
}

impl SensorTable {
    pub fn new(rows: Vec<SensorRow>) -> Self {
        Self { rows }
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        let mut seen = Vec::new();
        for row in &self.rows {
            if !seen.contains(&row.date) {
                seen.push(row.date);
            }
        }
        seen
    }

    /// Only the first pass recorded on a date is plotted; later rows with the
    /// same date are not considered.
    pub fn first_row(&self, date: NaiveDate) -> Option<&SensorRow> {
        self.rows.iter().find(|row| row.date == date)
    }

    /// Rows for the requested dates, in request order, skipping dates the
    /// table does not contain.
    pub fn select<'a>(&'a self, dates: &[NaiveDate]) -> Vec<&'a SensorRow> {
        dates.iter().filter_map(|date| self.first_row(*date)).collect()
    }
}
