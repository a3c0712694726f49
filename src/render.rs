use std::fmt::Write;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::DashboardError;
use crate::figures::Figure;
use crate::layout::{Component, Style};
use crate::tables::DataTable;

pub const DEFAULT_STYLESHEET: &str = "https://codepen.io/chriddyp/pen/bWLwgP.css";
pub const PLOTLY_SCRIPT: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";
pub const PAGE_TITLE: &str = "NexaVision Datathon Policy Briefing";

#[derive(Debug, Clone)]
pub struct PageOptions {
    pub stylesheet: String,
    pub generated_at: DateTime<Utc>,
}

/// Render the document tree as a complete HTML page.
pub fn render_page(
    document: &Component,
    options: &PageOptions,
) -> Result<String, DashboardError> {
    let mut body = String::new();
    let mut graphs = Vec::new();
    render_component(&mut body, document, &mut graphs);

    let mut figures = Vec::with_capacity(graphs.len());
    for (id, figure) in graphs {
        let json = serde_json::to_string(figure).map_err(|source| {
            DashboardError::FigureEncoding {
                id: id.to_string(),
                source,
            }
        })?;
        let id = serde_json::Value::from(id).to_string();
        figures.push(format!("[{}, {}]", script_safe(&id), script_safe(&json)));
    }

    let mut output = String::new();
    let _ = writeln!(output, "<!DOCTYPE html>");
    let _ = writeln!(output, "<html lang=\"en\">");
    let _ = writeln!(output, "<head>");
    let _ = writeln!(output, "<meta charset=\"UTF-8\">");
    let _ = writeln!(
        output,
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">"
    );
    let _ = writeln!(
        output,
        "<meta name=\"generated\" content=\"{}\">",
        options.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    let _ = writeln!(output, "<title>{}</title>", escape(PAGE_TITLE));
    let _ = writeln!(
        output,
        "<link rel=\"stylesheet\" href=\"{}\">",
        escape(&options.stylesheet)
    );
    let _ = writeln!(output, "<script src=\"{PLOTLY_SCRIPT}\"></script>");
    let _ = writeln!(output, "</head>");
    let _ = writeln!(output, "<body>");
    output.push_str(&body);
    let _ = writeln!(output, "<script>");
    let _ = writeln!(output, "const figures = [{}];", figures.join(", "));
    let _ = writeln!(
        output,
        "for (const [id, fig] of figures) {{ Plotly.newPlot(id, fig.data, fig.layout, {{responsive: true}}); }}"
    );
    let _ = writeln!(output, "</script>");
    let _ = writeln!(output, "</body>");
    let _ = writeln!(output, "</html>");

    Ok(output)
}

fn render_component<'a>(
    out: &mut String,
    node: &'a Component,
    graphs: &mut Vec<(&'a str, &'a Figure)>,
) {
    match node {
        Component::Div {
            class,
            style,
            children,
        } => {
            out.push_str("<div");
            if let Some(class) = class {
                let _ = write!(out, " class=\"{}\"", escape(class));
            }
            push_style(out, style);
            out.push_str(">\n");
            for child in children {
                render_component(out, child, graphs);
            }
            out.push_str("</div>\n");
        }
        Component::Heading { level, text } => {
            let level = (*level).clamp(1, 6);
            let _ = writeln!(out, "<h{level}>{}</h{level}>", escape(text));
        }
        Component::Paragraph(text) => {
            let _ = writeln!(out, "<p>{}</p>", escape(text));
        }
        Component::Rule => out.push_str("<hr>\n"),
        Component::Footer(text) => {
            let _ = writeln!(out, "<footer>{}</footer>", escape(text));
        }
        Component::Graph { id, figure } => {
            let _ = writeln!(out, "<div id=\"{}\" class=\"dash-graph\"></div>", escape(id));
            graphs.push((*id, figure));
        }
        Component::Table(table) => render_table(out, table),
    }
}

fn render_table(out: &mut String, table: &DataTable) {
    let _ = writeln!(out, "<table id=\"{}\" class=\"dash-table\">", escape(&table.id));
    out.push_str("<thead><tr>");
    for column in &table.columns {
        let _ = write!(
            out,
            "<th style=\"text-align: left; background-color: rgb(230, 230, 230); font-weight: bold\">{}</th>",
            escape(&column.name)
        );
    }
    out.push_str("</tr></thead>\n<tbody>\n");
    for row in &table.rows {
        out.push_str("<tr>");
        for (index, cell) in row.iter().enumerate() {
            let style = if table.is_bold(index) {
                "text-align: left; font-weight: bold"
            } else {
                "text-align: left"
            };
            let _ = write!(out, "<td style=\"{style}\">{}</td>", escape(cell));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");
}

fn push_style(out: &mut String, style: &Style) {
    if style.is_empty() {
        return;
    }
    let declarations: Vec<String> = style.iter().map(|(k, v)| format!("{k}: {v}")).collect();
    let _ = write!(out, " style=\"{}\"", escape(&declarations.join("; ")));
}

pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// JSON placed inside a `<script>` element must not close it early.
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::compose;
    use crate::layout::tests::sample_panels;
    use chrono::TimeZone;

    fn options() -> PageOptions {
        PageOptions {
            stylesheet: DEFAULT_STYLESHEET.to_string(),
            generated_at: Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn page_links_stylesheet_and_plotly() {
        let html = render_page(&compose(sample_panels()), &options()).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(&format!("<link rel=\"stylesheet\" href=\"{DEFAULT_STYLESHEET}\">")));
        assert!(html.contains(PLOTLY_SCRIPT));
        assert!(html.contains("content=\"2026-10-16T09:30:00Z\""));
        assert!(html.contains("<footer>End of Datathon Policy Briefing - NexaVision</footer>"));
    }

    #[test]
    fn every_graph_gets_a_target_and_a_figure() {
        let html = render_page(&compose(sample_panels()), &options()).unwrap();

        for id in ["drivers-bar", "red-zone-scatter", "chronic-donut"] {
            assert!(html.contains(&format!("<div id=\"{id}\" class=\"dash-graph\"></div>")));
            assert!(html.contains(&format!("[\"{id}\", {{")));
        }
        let bar = html.find("drivers-bar").unwrap();
        let scatter = html.find("red-zone-scatter").unwrap();
        assert!(bar < scatter);
    }

    #[test]
    fn narrative_text_is_escaped() {
        let document = Component::Div {
            class: Some("row"),
            style: vec![("margin-top", "30px")],
            children: vec![Component::Paragraph("<b>'Red Zone' & \"Chaos\"</b>".to_string())],
        };
        let html = render_page(&document, &options()).unwrap();

        assert!(html.contains("<div class=\"row\" style=\"margin-top: 30px\">"));
        assert!(html.contains("<p>&lt;b&gt;&#39;Red Zone&#39; &amp; &quot;Chaos&quot;&lt;/b&gt;</p>"));
    }

    #[test]
    fn numeric_table_cells_are_bold() {
        let html = render_page(&compose(sample_panels()), &options()).unwrap();

        assert!(html.contains("<td style=\"text-align: left\">Pune</td>"));
        assert!(html.contains("<td style=\"text-align: left; font-weight: bold\">12</td>"));
        assert!(html.contains("font-weight: bold\">district_name</th>"));
    }

    #[test]
    fn embedded_json_cannot_close_the_script() {
        assert_eq!(script_safe("{\"t\":\"</script>\"}"), "{\"t\":\"<\\/script>\"}");
    }
}
