use crate::panel::{PanelLayout, PanelRow, ResultPanel};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use core_types::{LevelKind, Tone};

/// Escapes the characters that are significant in HTML text and attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn tone_class(tone: Tone) -> Option<&'static str> {
    match tone {
        Tone::Neutral => None,
        Tone::Profit => Some("profit"),
        Tone::Loss => Some("loss"),
        Tone::Primary => Some("primary"),
        Tone::Muted => Some("muted"),
    }
}

fn level_class(level: Option<LevelKind>) -> &'static str {
    match level {
        Some(LevelKind::Resistance) => "res-row",
        Some(LevelKind::Pivot) => "pp-row",
        Some(LevelKind::Support) => "sup-row",
        None => "",
    }
}

fn html_row(row: &PanelRow) -> String {
    let class = if row.total { "result-row total" } else { "result-row" };
    let strong = match tone_class(row.tone) {
        Some(tone) => format!("<strong class=\"{tone}\">"),
        None => "<strong>".to_string(),
    };
    format!(
        "<div class=\"{class}\"><span>{}</span>{strong}{}</strong></div>",
        escape_html(&row.label),
        escape_html(&row.value)
    )
}

/// Renders the panel as the markup of a result box.
pub fn render_html(panel: &ResultPanel) -> String {
    let mut html = String::new();
    match panel.layout {
        PanelLayout::Rows => {
            for row in &panel.rows {
                html.push_str(&html_row(row));
            }
        }
        PanelLayout::PivotTable => {
            html.push_str("<table class=\"pivot-table\"><tbody>");
            for row in &panel.rows {
                html.push_str(&format!(
                    "<tr class=\"{}\"><td>{}</td><td>{}</td></tr>",
                    level_class(row.level),
                    escape_html(&row.label),
                    escape_html(&row.value)
                ));
            }
            html.push_str("</tbody></table>");
        }
    }
    if let Some(note) = &panel.note {
        html.push_str(&format!("<div class=\"result-note\">{}</div>", escape_html(note)));
    }
    html
}

fn value_cell(row: &PanelRow) -> Cell {
    let mut cell = Cell::new(&row.value).set_alignment(CellAlignment::Right);
    cell = match row.tone {
        Tone::Profit => cell.fg(Color::Green),
        Tone::Loss => cell.fg(Color::Red),
        Tone::Primary => cell.fg(Color::Cyan),
        Tone::Muted => cell.fg(Color::DarkGrey),
        Tone::Neutral => cell,
    };
    if row.total {
        cell = cell.add_attribute(Attribute::Bold);
    }
    cell
}

/// Renders the panel as a two-column terminal table. The note is not part of
/// the table; see [`render_text`].
pub fn render_table(panel: &ResultPanel) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    for row in &panel.rows {
        let mut label = Cell::new(&row.label);
        if row.total {
            label = label.add_attribute(Attribute::Bold);
        }
        table.add_row(vec![label, value_cell(row)]);
    }
    table
}

/// The table followed by the note, ready to print.
pub fn render_text(panel: &ResultPanel) -> String {
    let mut out = String::new();
    if !panel.rows.is_empty() {
        out.push_str(&render_table(panel).to_string());
    }
    if let Some(note) = &panel.note {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(note);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::IntoPanel;
    use core_types::PivotMethod;
    use rust_decimal_macros::dec;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<b>"Q&A"</b> it's"#),
            "&lt;b&gt;&quot;Q&amp;A&quot;&lt;/b&gt; it&#39;s"
        );
    }

    #[test]
    fn rows_render_as_result_rows() {
        let panel = ResultPanel::rows(vec![
            PanelRow::new("Total Cost", "₹3,600.00"),
            PanelRow::new("ROI", "-20.00%").tone(Tone::Loss).total(),
        ]);
        assert_eq!(
            render_html(&panel),
            "<div class=\"result-row\"><span>Total Cost</span><strong>₹3,600.00</strong></div>\
             <div class=\"result-row total\"><span>ROI</span><strong class=\"loss\">-20.00%</strong></div>"
        );
    }

    #[test]
    fn pivot_renders_as_a_table() {
        let panel = calculators::pivot_points(dec!(110), dec!(90), dec!(105), dec!(0), PivotMethod::Woodie)
            .unwrap()
            .to_panel();
        let html = render_html(&panel);
        assert!(html.starts_with("<table class=\"pivot-table\"><tbody>"));
        assert!(html.contains("<tr class=\"res-row\"><td>Resistance 2</td><td>₹122.50</td></tr>"));
        assert!(html.contains("<tr class=\"pp-row\"><td>Pivot Point</td><td>₹102.50</td></tr>"));
        assert!(html.ends_with("</tbody></table>"));
    }

    #[test]
    fn notes_follow_the_rows() {
        let panel = ResultPanel::message("Impossible to achieve this average with the current new price.");
        assert_eq!(
            render_html(&panel),
            "<div class=\"result-note\">Impossible to achieve this average with the current new price.</div>"
        );
        assert_eq!(
            render_text(&panel),
            "Impossible to achieve this average with the current new price."
        );
    }

    #[test]
    fn terminal_table_contains_every_row() {
        let panel = calculators::emi(dec!(100000), dec!(10), dec!(12)).unwrap().to_panel();
        let text = render_text(&panel);
        assert!(text.contains("Monthly EMI"));
        assert!(text.contains("₹8,791.59"));
        assert!(text.contains("₹1,00,000.00"));
    }
}
