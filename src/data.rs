use std::fmt;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::error::DashboardError;
use crate::models::{DriverImportance, FailureCount, RankedTable, SchoolSample, Snippets};

/// The five pre-computed snippets the dashboard is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataFile {
    BarChart,
    StructuralTop10,
    ResourceTop10,
    Scatter,
    Donut,
}

impl DataFile {
    pub const ALL: [DataFile; 5] = [
        DataFile::BarChart,
        DataFile::StructuralTop10,
        DataFile::ResourceTop10,
        DataFile::Scatter,
        DataFile::Donut,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DataFile::BarChart => "bar_chart",
            DataFile::StructuralTop10 => "structural_top10",
            DataFile::ResourceTop10 => "resource_top10",
            DataFile::Scatter => "scatter",
            DataFile::Donut => "donut",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            DataFile::BarChart => "viz_data_bar_chart.csv",
            DataFile::StructuralTop10 => "viz_data_structural_top10.csv",
            DataFile::ResourceTop10 => "viz_data_resource_top10.csv",
            DataFile::Scatter => "viz_data_scatter.csv",
            DataFile::Donut => "viz_data_donut.csv",
        }
    }

    pub fn path_in(self, dir: &Path) -> PathBuf {
        dir.join(self.file_name())
    }
}

impl fmt::Display for DataFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Load all five snippets from `dir`.
///
/// Every file is checked for existence before any is parsed, so an absent
/// snippet is reported even when an earlier one is also malformed.
pub fn load_snippets(dir: &Path) -> Result<Snippets, DashboardError> {
    for file in DataFile::ALL {
        let path = file.path_in(dir);
        if !path.is_file() {
            return Err(DashboardError::MissingDataFile { file, path });
        }
    }

    let drivers: Vec<DriverImportance> = read_rows(DataFile::BarChart, dir)?;
    if let Some(row) = drivers
        .iter()
        .find(|row| !row.importance_pct.is_finite() || row.importance_pct < 0.0)
    {
        return Err(invalid(
            DataFile::BarChart,
            format!(
                "importance {} for '{}' is not a non-negative number",
                row.importance_pct, row.problem
            ),
        ));
    }

    let scatter: Vec<SchoolSample> = read_rows(DataFile::Scatter, dir)?;
    if let Some(row) = scatter.iter().find(|row| {
        !row.pupil_teacher_ratio.is_finite() || !row.students_per_classroom.is_finite()
    }) {
        return Err(invalid(
            DataFile::Scatter,
            format!(
                "ratios must be finite, got ({}, {})",
                row.pupil_teacher_ratio, row.students_per_classroom
            ),
        ));
    }
    if let Some(row) = scatter.iter().find(|row| row.red_zone_flag > 1) {
        return Err(invalid(
            DataFile::Scatter,
            format!("red zone flag must be 0 or 1, got {}", row.red_zone_flag),
        ));
    }

    // Counts are unsigned, so negatives already fail to decode.
    let donut: Vec<FailureCount> = read_rows(DataFile::Donut, dir)?;
    if donut
        .iter()
        .try_fold(0u64, |total, row| total.checked_add(row.count))
        .is_none()
    {
        return Err(invalid(
            DataFile::Donut,
            "failure counts overflow when summed".to_string(),
        ));
    }

    Ok(Snippets {
        drivers,
        structural_top10: read_table(DataFile::StructuralTop10, dir)?,
        resource_top10: read_table(DataFile::ResourceTop10, dir)?,
        scatter,
        donut,
    })
}

fn read_rows<T: DeserializeOwned>(file: DataFile, dir: &Path) -> Result<Vec<T>, DashboardError> {
    let path = file.path_in(dir);
    let mut reader = csv::Reader::from_path(&path).map_err(|e| malformed(file, &e))?;
    let mut rows = Vec::new();

    for result in reader.deserialize::<T>() {
        rows.push(result.map_err(|e| malformed(file, &e))?);
    }

    tracing::info!(
        snippet = %file,
        path = %path.display(),
        rows = rows.len(),
        "Loaded data snippet"
    );
    Ok(rows)
}

fn read_table(file: DataFile, dir: &Path) -> Result<RankedTable, DashboardError> {
    let path = file.path_in(dir);
    let mut reader = csv::Reader::from_path(&path).map_err(|e| malformed(file, &e))?;
    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| malformed(file, &e))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| malformed(file, &e))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    if rows.len() != 10 {
        tracing::warn!(snippet = %file, rows = rows.len(), "Top-10 table does not have 10 rows");
    }
    tracing::info!(
        snippet = %file,
        path = %path.display(),
        rows = rows.len(),
        columns = columns.len(),
        "Loaded data snippet"
    );

    Ok(RankedTable { columns, rows })
}

fn malformed(file: DataFile, err: &csv::Error) -> DashboardError {
    DashboardError::MalformedDataFile {
        file,
        line: err.position().map(|p| p.line()).unwrap_or(0),
        reason: err.to_string(),
    }
}

fn invalid(file: DataFile, reason: String) -> DashboardError {
    DashboardError::MalformedDataFile {
        file,
        line: 0,
        reason,
    }
}
