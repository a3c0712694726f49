use crate::error::DashboardError;

/// Category label to colour token for the driver bar chart.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryPalette {
    entries: Vec<(String, String)>,
}

pub const STRUCTURAL_BLUE: &str = "#1f77b4";
pub const RESOURCE_ORANGE: &str = "#ff7f0e";
pub const CHAOS_GRAY: &str = "#7f7f7f";
pub const INFRASTRUCTURE_RED: &str = "#d62728";

impl CategoryPalette {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// The four driver categories.
    pub fn drivers() -> Self {
        Self::new([
            ("1. Structural Failure", STRUCTURAL_BLUE),
            ("2. Resource Failure", RESOURCE_ORANGE),
            ("3. Unexplained \"Chaos\"", CHAOS_GRAY),
            ("4. General Infrastructure", INFRASTRUCTURE_RED),
        ])
    }

    pub fn color_for(&self, category: &str) -> Result<&str, DashboardError> {
        self.entries
            .iter()
            .find(|(label, _)| label == category)
            .map(|(_, color)| color.as_str())
            .ok_or_else(|| DashboardError::UnmappedCategory(category.to_string()))
    }
}

impl Default for CategoryPalette {
    fn default() -> Self {
        Self::drivers()
    }
}
