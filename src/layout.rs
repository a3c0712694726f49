//! The briefing's fixed narrative, as an ordered component tree.

use crate::figures::Figure;
use crate::tables::DataTable;

pub type Style = Vec<(&'static str, &'static str)>;

#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    Div {
        class: Option<&'static str>,
        style: Style,
        children: Vec<Component>,
    },
    Heading {
        level: u8,
        text: String,
    },
    Paragraph(String),
    Rule,
    Footer(String),
    Graph {
        id: &'static str,
        figure: Figure,
    },
    Table(DataTable),
}

impl Component {
    fn div(style: Style, children: Vec<Component>) -> Self {
        Component::Div {
            class: None,
            style,
            children,
        }
    }

    fn classed(class: &'static str, children: Vec<Component>) -> Self {
        Component::Div {
            class: Some(class),
            style: Vec::new(),
            children,
        }
    }

    fn heading(level: u8, text: &str) -> Self {
        Component::Heading {
            level,
            text: text.to_string(),
        }
    }

    fn paragraph(text: &str) -> Self {
        Component::Paragraph(text.to_string())
    }

    /// Depth-first walk over this node and its descendants.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Component)) {
        visit(self);
        if let Component::Div { children, .. } = self {
            for child in children {
                child.walk(visit);
            }
        }
    }
}

/// Everything the composer lays out, built before composition.
#[derive(Debug, Clone)]
pub struct Panels {
    pub drivers: Figure,
    pub red_zone_scatter: Figure,
    pub chronic_donut: Figure,
    pub structural_table: DataTable,
    pub resource_table: DataTable,
}

pub const FOOTER_TEXT: &str = "End of Datathon Policy Briefing - NexaVision";

pub fn compose(panels: Panels) -> Component {
    let slide = || vec![("margin-top", "30px")];

    let executive_summary = Component::div(
        vec![
            ("background-color", "#f9f9f9"),
            ("padding", "20px"),
            ("border-radius", "5px"),
        ],
        vec![
            Component::heading(1, "Datathon: Solving India's 'Education Bottleneck'"),
            Component::heading(3, "A Two-Problem, Two-Solution Framework"),
            Component::Rule,
            Component::paragraph(
                "Our analysis of the G8-to-G9 (Upper Primary to Secondary) transition proves this is \
                 not one problem, but two distinct, solvable problems. We present a data-driven, \
                 granular, and validated 5-year plan.",
            ),
            Component::paragraph(
                "This dashboard walks you through our findings, from the core drivers to our final, \
                 costed policy recommendations.",
            ),
        ],
    );

    let core_finding = Component::div(
        slide(),
        vec![
            Component::heading(2, "Our Core Finding: What *Really* Drives the Bottleneck?"),
            Component::paragraph(
                "Our models proved that for this *specific* G8-to-G9 problem, 'Structural' and \
                 'Resource' failures are the dominant drivers. General infrastructure, while \
                 important, is not the bottleneck. Our two interventions address a combined, \
                 data-proven 79.4% of the *entire* policy-addressable problem.",
            ),
            Component::Graph {
                id: "drivers-bar",
                figure: panels.drivers,
            },
        ],
    );

    let structural_fix = Component::div(
        slide(),
        vec![
            Component::heading(2, "Problem 1: The 'Structural' Failure (434,013 Schools)"),
            Component::paragraph(
                "Over 50% of relevant schools have a 0.0 transition rate. This is a 'forced exit' \
                 by design. The solution is a 'Vertical Integration Program' to add Grades 9 and 10 \
                 to these schools.",
            ),
            Component::heading(4, "Top 10 Priority Districts for Structural Intervention:"),
            Component::Table(panels.structural_table),
        ],
    );

    let resource_fix = Component::div(
        slide(),
        vec![
            Component::heading(2, "Problem 2: The 'Resource' Failure (194,066 Schools)"),
            Component::paragraph(
                "These are 'Red Zone' schools defined by a high Pupil-Teacher Ratio (>48.5) and \
                 high Overcrowding (>57.0). This is not a guess; it's a validated, chronic problem.",
            ),
            Component::classed(
                "row",
                vec![
                    Component::classed(
                        "six columns",
                        vec![Component::Graph {
                            id: "red-zone-scatter",
                            figure: panels.red_zone_scatter,
                        }],
                    ),
                    Component::classed(
                        "six columns",
                        vec![Component::Graph {
                            id: "chronic-donut",
                            figure: panels.chronic_donut,
                        }],
                    ),
                ],
            ),
            Component::heading(
                4,
                "Top 10 Priority Districts for 'Resource Strike Team' Intervention:",
            ),
            Component::Table(panels.resource_table),
        ],
    );

    Component::Div {
        class: Some("container"),
        style: vec![("max-width", "1200px")],
        children: vec![
            executive_summary,
            core_finding,
            Component::Rule,
            structural_fix,
            Component::Rule,
            resource_fix,
            Component::Rule,
            Component::Footer(FOOTER_TEXT.to_string()),
        ],
    }
}
