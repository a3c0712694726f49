use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DriverImportance {
    #[serde(rename = "Problem")]
    pub problem: String,
    #[serde(rename = "Importance (%)")]
    pub importance_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SchoolSample {
    #[serde(rename = "ptr_2024")]
    pub pupil_teacher_ratio: f64,
    #[serde(rename = "sqcr_2024")]
    pub students_per_classroom: f64,
    #[serde(rename = "is_red_zone_2024")]
    pub red_zone_flag: u8,
}

impl SchoolSample {
    pub fn is_red_zone(&self) -> bool {
        self.red_zone_flag == 1
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FailureCount {
    #[serde(rename = "Failure Type")]
    pub failure_type: String,
    #[serde(rename = "Count")]
    pub count: u64,
}

/// A ranked district table whose columns are only known from its header row.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RankedTable {
    pub fn column(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(String::as_str).unwrap_or(""))
    }
}

/// The five datasets, loaded once and never mutated.
#[derive(Debug, Clone)]
pub struct Snippets {
    pub drivers: Vec<DriverImportance>,
    pub structural_top10: RankedTable,
    pub resource_top10: RankedTable,
    pub scatter: Vec<SchoolSample>,
    pub donut: Vec<FailureCount>,
}
