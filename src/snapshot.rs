use std::path::Path;
use std::sync::Arc;

use axum::body::Bytes;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::data;
use crate::error::DashboardError;
use crate::figures::{self, DonutHighlight};
use crate::layout::{self, Component, Panels};
use crate::models::Snippets;
use crate::palette::CategoryPalette;
use crate::render::{self, PageOptions, DEFAULT_STYLESHEET};
use crate::tables;

#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub stylesheet: String,
    pub palette: CategoryPalette,
    pub donut_highlight: DonutHighlight,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            stylesheet: DEFAULT_STYLESHEET.to_string(),
            palette: CategoryPalette::drivers(),
            donut_highlight: DonutHighlight::First,
        }
    }
}

/// The composed briefing, built once at startup and shared read-only with
/// every request for the rest of the process lifetime.
#[derive(Debug)]
pub struct DashboardSnapshot {
    pub build_id: Uuid,
    pub built_at: DateTime<Utc>,
    pub document: Component,
    pub html: Arc<str>,
    /// The page encoded once, handed out to responses without copying.
    pub body: Bytes,
}

impl DashboardSnapshot {
    /// Load the snippets from `dir` and build the snapshot from them.
    pub fn load(dir: &Path, options: &BuildOptions) -> Result<Self, DashboardError> {
        let snippets = data::load_snippets(dir)?;
        Self::build(&snippets, options)
    }

    pub fn build(snippets: &Snippets, options: &BuildOptions) -> Result<Self, DashboardError> {
        let panels = Panels {
            drivers: figures::bar_chart(&snippets.drivers, &options.palette)?,
            red_zone_scatter: figures::scatter_plot(&snippets.scatter),
            chronic_donut: figures::donut_chart(&snippets.donut, &options.donut_highlight)?,
            structural_table: tables::build_table("structural-top10", &snippets.structural_top10),
            resource_table: tables::build_table("resource-top10", &snippets.resource_top10),
        };

        let red_zone = snippets.scatter.iter().filter(|s| s.is_red_zone()).count();
        let counts: Vec<u64> = snippets.donut.iter().map(|r| r.count).collect();
        let lead_share = figures::wedge_shares(&counts).first().copied().unwrap_or(0.0);
        tracing::debug!(
            sampled_red_zone = red_zone,
            sampled_schools = snippets.scatter.len(),
            breakdown_total = counts.iter().fold(0u64, |total, &c| total.saturating_add(c)),
            lead_share_pct = lead_share,
            "Built figures"
        );

        let document = layout::compose(panels);
        let built_at = Utc::now();
        let html = render::render_page(
            &document,
            &PageOptions {
                stylesheet: options.stylesheet.clone(),
                generated_at: built_at,
            },
        )?;

        let body = Bytes::from(html.clone());
        let snapshot = Self {
            build_id: Uuid::new_v4(),
            built_at,
            document,
            html: Arc::from(html),
            body,
        };

        tracing::info!(
            build_id = %snapshot.build_id,
            built_at = %snapshot.built_at,
            page_bytes = snapshot.html.len(),
            "Dashboard snapshot ready"
        );

        Ok(snapshot)
    }

    pub fn graph_ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        self.document.walk(&mut |node| {
            if let Component::Graph { id, .. } = node {
                ids.push(*id);
            }
        });
        ids
    }

    /// Strong validator for the page; stable for the life of the snapshot.
    pub fn etag(&self) -> String {
        format!("\"{}\"", self.build_id)
    }
}
