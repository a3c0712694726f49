use serde::Serialize;

use crate::models::RankedTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Text,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDef {
    pub name: String,
    pub id: String,
    pub kind: ColumnKind,
}

/// A renderable grid. Rows keep the upstream ranking order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataTable {
    pub id: String,
    pub columns: Vec<ColumnDef>,
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    pub fn is_bold(&self, column: usize) -> bool {
        self.columns
            .get(column)
            .is_some_and(|c| c.kind == ColumnKind::Numeric)
    }
}

pub fn build_table(id: &str, table: &RankedTable) -> DataTable {
    let columns = table
        .columns
        .iter()
        .enumerate()
        .map(|(index, name)| ColumnDef {
            name: name.clone(),
            id: name.clone(),
            kind: column_kind(table.column(index)),
        })
        .collect();

    DataTable {
        id: id.to_string(),
        columns,
        rows: table.rows.clone(),
    }
}

fn column_kind<'a>(cells: impl Iterator<Item = &'a str>) -> ColumnKind {
    let mut seen_value = false;

    for cell in cells.map(str::trim).filter(|c| !c.is_empty()) {
        match cell.parse::<f64>() {
            Ok(value) if value.is_finite() => seen_value = true,
            _ => return ColumnKind::Text,
        }
    }

    if seen_value {
        ColumnKind::Numeric
    } else {
        ColumnKind::Text
    }
}
