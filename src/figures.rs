//! Chart specifications for the three dashboard figures.
//!
//! A [`Figure`] serialises to the `{ data, layout }` shape plotly.js draws
//! directly, so the browser performs no further transformation.

use serde::Serialize;

use crate::error::DashboardError;
use crate::models::{DriverImportance, FailureCount, SchoolSample};
use crate::palette::CategoryPalette;

pub const PTR_THRESHOLD: f64 = 48.5;
pub const SQCR_THRESHOLD: f64 = 57.0;

pub const RED_ZONE_LABEL: &str = "Red Zone (194k Schools)";
pub const OK_LABEL: &str = "OK (1.2M Schools)";
const RED_ZONE_COLOR: &str = "#EF553B";
const OK_COLOR: &str = "#636efa";

pub const DONUT_HOLE: f64 = 0.4;
pub const DONUT_PULL: f64 = 0.05;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Bar(BarTrace),
    Scatter(ScatterTrace),
    Pie(PieTrace),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarTrace {
    pub name: String,
    pub x: Vec<String>,
    pub y: Vec<f64>,
    pub text: Vec<String>,
    pub textposition: &'static str,
    pub marker: Marker,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterTrace {
    pub name: String,
    pub mode: &'static str,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub marker: Marker,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieTrace {
    pub labels: Vec<String>,
    pub values: Vec<u64>,
    pub hole: f64,
    pub textinfo: &'static str,
    pub pull: Vec<f64>,
    /// Keep wedges in source order instead of sorting by size.
    pub sort: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Layout {
    pub title: Title,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showlegend: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub shapes: Vec<Shape>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Title {
    pub text: String,
}

impl Title {
    fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: Title,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shape {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub xref: &'static str,
    pub yref: &'static str,
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
    pub line: LineStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    pub color: &'static str,
    pub dash: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub text: String,
    pub xref: &'static str,
    pub yref: &'static str,
    pub x: f64,
    pub y: f64,
    pub showarrow: bool,
    pub xanchor: &'static str,
    pub yanchor: &'static str,
}

/// Which donut wedge is pulled out of the ring.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DonutHighlight {
    /// The first row of the breakdown.
    #[default]
    First,
    Category(String),
}

pub fn bar_chart(
    drivers: &[DriverImportance],
    palette: &CategoryPalette,
) -> Result<Figure, DashboardError> {
    let mut data = Vec::with_capacity(drivers.len());

    for row in drivers {
        let color = palette.color_for(&row.problem)?;
        data.push(Trace::Bar(BarTrace {
            name: row.problem.clone(),
            x: vec![row.problem.clone()],
            y: vec![row.importance_pct],
            text: vec![percent_label(row.importance_pct)],
            textposition: "outside",
            marker: Marker {
                color: color.to_string(),
            },
        }));
    }

    Ok(Figure {
        data,
        layout: Layout {
            title: Title::new("Figure 1: Root Drivers of the G8-to-G9 Bottleneck"),
            xaxis: Some(Axis {
                title: Title::new("Problem"),
            }),
            yaxis: Some(Axis {
                title: Title::new("Problem Importance (out of 100%)"),
            }),
            showlegend: Some(false),
            ..Layout::default()
        },
    })
}

pub fn percent_label(value: f64) -> String {
    format!("{value:.1}%")
}

pub fn scatter_plot(samples: &[SchoolSample]) -> Figure {
    let (red, ok): (Vec<&SchoolSample>, Vec<&SchoolSample>) =
        samples.iter().partition(|s| s.is_red_zone());

    let class_trace = |name: &str, color: &str, points: &[&SchoolSample]| {
        Trace::Scatter(ScatterTrace {
            name: name.to_string(),
            mode: "markers",
            x: points.iter().map(|s| s.pupil_teacher_ratio).collect(),
            y: points.iter().map(|s| s.students_per_classroom).collect(),
            marker: Marker {
                color: color.to_string(),
            },
        })
    };

    Figure {
        data: vec![
            class_trace(RED_ZONE_LABEL, RED_ZONE_COLOR, &red),
            class_trace(OK_LABEL, OK_COLOR, &ok),
        ],
        layout: Layout {
            title: Title::new("Figure 2: Identifying \"Red Zone\" Schools (100k Sample)"),
            xaxis: Some(Axis {
                title: Title::new("Pupil-Teacher Ratio (PTR)"),
            }),
            yaxis: Some(Axis {
                title: Title::new("Student-per-Quality-Classroom (SQCR)"),
            }),
            shapes: vec![vertical_line(PTR_THRESHOLD), horizontal_line(SQCR_THRESHOLD)],
            annotations: vec![
                Annotation {
                    text: format!("PTR = {PTR_THRESHOLD:.1}"),
                    xref: "x",
                    yref: "paper",
                    x: PTR_THRESHOLD,
                    y: 1.0,
                    showarrow: false,
                    xanchor: "left",
                    yanchor: "top",
                },
                Annotation {
                    text: format!("SQCR = {SQCR_THRESHOLD:.1}"),
                    xref: "paper",
                    yref: "y",
                    x: 1.0,
                    y: SQCR_THRESHOLD,
                    showarrow: false,
                    xanchor: "right",
                    yanchor: "bottom",
                },
            ],
            ..Layout::default()
        },
    }
}

fn threshold_line_style() -> LineStyle {
    LineStyle {
        color: "red",
        dash: "dash",
    }
}

fn vertical_line(x: f64) -> Shape {
    Shape {
        kind: "line",
        xref: "x",
        yref: "paper",
        x0: x,
        x1: x,
        y0: 0.0,
        y1: 1.0,
        line: threshold_line_style(),
    }
}

fn horizontal_line(y: f64) -> Shape {
    Shape {
        kind: "line",
        xref: "paper",
        yref: "y",
        x0: 0.0,
        x1: 1.0,
        y0: y,
        y1: y,
        line: threshold_line_style(),
    }
}

pub fn donut_chart(
    breakdown: &[FailureCount],
    highlight: &DonutHighlight,
) -> Result<Figure, DashboardError> {
    if breakdown.iter().all(|row| row.count == 0) {
        return Err(DashboardError::EmptyBreakdown);
    }

    let pulled = match highlight {
        DonutHighlight::First => 0,
        DonutHighlight::Category(name) => breakdown
            .iter()
            .position(|row| &row.failure_type == name)
            .ok_or_else(|| DashboardError::UnknownHighlight(name.clone()))?,
    };

    let pull = (0..breakdown.len())
        .map(|i| if i == pulled { DONUT_PULL } else { 0.0 })
        .collect();

    Ok(Figure {
        data: vec![Trace::Pie(PieTrace {
            labels: breakdown.iter().map(|r| r.failure_type.clone()).collect(),
            values: breakdown.iter().map(|r| r.count).collect(),
            hole: DONUT_HOLE,
            textinfo: "percent+label",
            pull,
            sort: false,
        })],
        layout: Layout {
            title: Title::new("Figure 3: 79% of \"Red Zone\" Schools are CHRONIC Failures"),
            ..Layout::default()
        },
    })
}

/// Percentage of the ring each count occupies.
pub fn wedge_shares(counts: &[u64]) -> Vec<f64> {
    // Summed in f64 so counts near u64::MAX cannot overflow.
    let total: f64 = counts.iter().map(|&c| c as f64).sum();
    if total == 0.0 {
        return vec![0.0; counts.len()];
    }
    counts.iter().map(|&c| c as f64 / total * 100.0).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drivers() -> Vec<DriverImportance> {
        [
            ("1. Structural Failure", 45.0),
            ("2. Resource Failure", 34.4),
            ("3. Unexplained \"Chaos\"", 12.0),
            ("4. General Infrastructure", 8.6),
        ]
        .into_iter()
        .map(|(problem, importance_pct)| DriverImportance {
            problem: problem.to_string(),
            importance_pct,
        })
        .collect()
    }

    fn bars(figure: &Figure) -> Vec<&BarTrace> {
        figure
            .data
            .iter()
            .map(|t| match t {
                Trace::Bar(bar) => bar,
                other => panic!("expected bar trace, got {other:?}"),
            })
            .collect()
    }

    fn breakdown() -> Vec<FailureCount> {
        vec![
            FailureCount {
                failure_type: "Chronic Failure".to_string(),
                count: 153_312,
            },
            FailureCount {
                failure_type: "Transient Failure".to_string(),
                count: 40_754,
            },
        ]
    }

    fn pie(figure: &Figure) -> &PieTrace {
        match &figure.data[..] {
            [Trace::Pie(pie)] => pie,
            other => panic!("expected a single pie trace, got {other:?}"),
        }
    }

    #[test]
    fn bar_chart_labels_and_colors_each_driver() {
        let figure = bar_chart(&drivers(), &CategoryPalette::drivers()).unwrap();
        let bars = bars(&figure);

        let labels: Vec<&str> = bars.iter().map(|b| b.text[0].as_str()).collect();
        assert_eq!(labels, vec!["45.0%", "34.4%", "12.0%", "8.6%"]);

        let colors: Vec<&str> = bars.iter().map(|b| b.marker.color.as_str()).collect();
        assert_eq!(colors, vec!["#1f77b4", "#ff7f0e", "#7f7f7f", "#d62728"]);

        assert_eq!(figure.layout.showlegend, Some(false));
    }

    #[test]
    fn bar_heights_are_exact_and_labels_rounded() {
        let mut rows = drivers();
        rows[0].importance_pct = 44.96;
        rows[1].importance_pct = 34.449;
        let figure = bar_chart(&rows, &CategoryPalette::drivers()).unwrap();
        let bars = bars(&figure);

        for (bar, row) in bars.iter().zip(&rows) {
            assert_eq!(bar.y, vec![row.importance_pct]);
            assert_eq!(bar.x, vec![row.problem.clone()]);
        }
        assert_eq!(bars[0].text[0], "45.0%");
        assert_eq!(bars[1].text[0], "34.4%");
    }

    #[test]
    fn bar_chart_rejects_unmapped_category() {
        let mut rows = drivers();
        rows.push(DriverImportance {
            problem: "5. Weather".to_string(),
            importance_pct: 1.0,
        });

        let err = bar_chart(&rows, &CategoryPalette::drivers()).unwrap_err();
        assert!(matches!(err, DashboardError::UnmappedCategory(_)));
    }

    #[test]
    fn scatter_partitions_points_by_flag() {
        let samples = vec![
            SchoolSample {
                pupil_teacher_ratio: 50.0,
                students_per_classroom: 60.0,
                red_zone_flag: 1,
            },
            SchoolSample {
                pupil_teacher_ratio: 22.0,
                students_per_classroom: 31.5,
                red_zone_flag: 0,
            },
        ];
        let figure = scatter_plot(&samples);

        let traces: Vec<&ScatterTrace> = figure
            .data
            .iter()
            .map(|t| match t {
                Trace::Scatter(s) => s,
                other => panic!("expected scatter trace, got {other:?}"),
            })
            .collect();
        assert_eq!(traces.len(), 2);
        assert_eq!(traces[0].name, RED_ZONE_LABEL);
        assert_eq!((traces[0].x.clone(), traces[0].y.clone()), (vec![50.0], vec![60.0]));
        assert_eq!(traces[1].name, OK_LABEL);
        assert_eq!((traces[1].x.clone(), traces[1].y.clone()), (vec![22.0], vec![31.5]));

        // The red zone point sits beyond both reference lines.
        let vline = &figure.layout.shapes[0];
        let hline = &figure.layout.shapes[1];
        assert!(traces[0].x[0] > vline.x0 && vline.x0 == vline.x1);
        assert!(traces[0].y[0] > hline.y0 && hline.y0 == hline.y1);
    }

    #[test]
    fn scatter_reference_lines_are_annotated() {
        let figure = scatter_plot(&[]);
        assert_eq!(figure.data.len(), 2);

        let shapes = &figure.layout.shapes;
        assert_eq!((shapes[0].x0, shapes[0].xref), (PTR_THRESHOLD, "x"));
        assert_eq!((shapes[1].y0, shapes[1].yref), (SQCR_THRESHOLD, "y"));
        assert!(shapes.iter().all(|s| s.line.dash == "dash" && s.line.color == "red"));

        let texts: Vec<&str> = figure.layout.annotations.iter().map(|a| a.text.as_str()).collect();
        assert_eq!(texts, vec!["PTR = 48.5", "SQCR = 57.0"]);
    }

    #[test]
    fn donut_pulls_only_the_first_wedge_by_default() {
        let figure = donut_chart(&breakdown(), &DonutHighlight::First).unwrap();
        let pie = pie(&figure);

        assert_eq!(pie.values, vec![153_312, 40_754]);
        assert_eq!(pie.hole, 0.4);
        assert_eq!(pie.textinfo, "percent+label");
        assert_eq!(pie.pull, vec![0.05, 0.0]);
        assert_eq!(pie.pull.iter().filter(|&&p| p > 0.0).count(), 1);
    }

    #[test]
    fn donut_highlight_by_name() {
        let highlight = DonutHighlight::Category("Transient Failure".to_string());
        let figure = donut_chart(&breakdown(), &highlight).unwrap();
        assert_eq!(pie(&figure).pull, vec![0.0, 0.05]);

        let unknown = DonutHighlight::Category("Acute Failure".to_string());
        assert!(matches!(
            donut_chart(&breakdown(), &unknown),
            Err(DashboardError::UnknownHighlight(_))
        ));
    }

    #[test]
    fn donut_rejects_empty_breakdown() {
        assert!(matches!(
            donut_chart(&[], &DonutHighlight::First),
            Err(DashboardError::EmptyBreakdown)
        ));
    }

    #[test]
    fn wedge_shares_sum_to_one_hundred() {
        let shares = wedge_shares(&[153_312, 40_754, 7]);
        let total: f64 = shares.iter().sum();
        assert!((total - 100.0).abs() < 1e-9);
        assert!(shares[0] > 78.9 && shares[0] < 79.0);
        assert!((shares[0] / shares[1] - 153_312.0 / 40_754.0).abs() < 1e-9);
    }

    #[test]
    fn wedge_shares_handle_huge_counts() {
        let shares = wedge_shares(&[u64::MAX, 1]);
        assert!((shares.iter().sum::<f64>() - 100.0).abs() < 1e-9);
        assert!(shares[0] > 99.9);
    }

    #[test]
    fn figures_are_deterministic() {
        let palette = CategoryPalette::drivers();
        assert_eq!(
            bar_chart(&drivers(), &palette).unwrap(),
            bar_chart(&drivers(), &palette).unwrap()
        );
        assert_eq!(
            donut_chart(&breakdown(), &DonutHighlight::First).unwrap(),
            donut_chart(&breakdown(), &DonutHighlight::First).unwrap()
        );
    }

    #[test]
    fn figure_serialises_in_plotly_shape() {
        let figure = donut_chart(&breakdown(), &DonutHighlight::First).unwrap();
        let json = serde_json::to_value(&figure).unwrap();
        assert_eq!(json["data"][0]["type"], "pie");
        assert_eq!(json["data"][0]["hole"], 0.4);
        assert!(json["layout"].get("shapes").is_none());
    }
}
