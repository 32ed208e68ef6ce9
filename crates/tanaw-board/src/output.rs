//! Rendering a [`Listing`] as a terminal table or JSON.

use console::Style;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::config::Format;
use crate::screens::{Align, Listing};

/// Widest a column may grow before its cells are truncated.
const MAX_COLUMN_WIDTH: usize = 36;
const GAP: &str = "  ";

pub fn render(listing: &Listing, format: Format) -> anyhow::Result<String> {
    match format {
        Format::Text => Ok(render_text(listing, &TableStyle::default())),
        Format::Json => {
            let mut out = serde_json::to_string_pretty(listing)?;
            out.push('\n');
            Ok(out)
        }
    }
}

/// Styles for the parts of the text table.
#[derive(Debug, Clone)]
pub struct TableStyle {
    pub header: Style,
    pub footer: Style,
    pub empty: Style,
}

impl Default for TableStyle {
    fn default() -> Self {
        TableStyle {
            header: Style::new().bold(),
            footer: Style::new().dim(),
            empty: Style::new().italic(),
        }
    }
}

impl TableStyle {
    /// No styling, for tests and plain output.
    pub fn plain() -> Self {
        TableStyle {
            header: Style::new(),
            footer: Style::new(),
            empty: Style::new(),
        }
    }
}

pub fn render_text(listing: &Listing, style: &TableStyle) -> String {
    let mut out = String::new();
    let footer = style.footer.apply_to(format!(
        "page {}/{}, {} matched",
        listing.page, listing.total_pages, listing.total_matched
    ));

    if listing.cells.is_empty() {
        out.push_str(&format!(
            "{}\n{}\n",
            style.empty.apply_to(format!("No {} match the current filters.", listing.screen)),
            footer
        ));
        return out;
    }

    let rows: Vec<Vec<String>> = listing
        .cells
        .iter()
        .map(|row| row.iter().map(|c| truncate_to_width(c, MAX_COLUMN_WIDTH)).collect())
        .collect();

    let widths: Vec<usize> = listing
        .columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            rows.iter()
                .map(|row| row.get(i).map_or(0, |c| c.width()))
                .chain(std::iter::once(column.header.width()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header: Vec<String> = listing
        .columns
        .iter()
        .zip(&widths)
        .map(|(column, width)| pad(column.header, *width, column.align))
        .collect();
    out.push_str(&style.header.apply_to(header.join(GAP).trim_end()).to_string());
    out.push('\n');

    for row in &rows {
        let line: Vec<String> = listing
            .columns
            .iter()
            .zip(&widths)
            .zip(row)
            .map(|((column, width), text)| pad(text, *width, column.align))
            .collect();
        out.push_str(line.join(GAP).trim_end());
        out.push('\n');
    }

    out.push_str(&footer.to_string());
    out.push('\n');
    out
}

fn pad(text: &str, width: usize, align: Align) -> String {
    let fill = " ".repeat(width.saturating_sub(text.width()));
    match align {
        Align::Left => format!("{}{}", text, fill),
        Align::Right => format!("{}{}", fill, text),
    }
}

/// Truncates to a display width, ending with `…` when shortened.
fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    let limit = max_width.saturating_sub(1);

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > limit {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataSource;
    use crate::records::Center;
    use crate::screens::{render_page, Centers};
    use tanaw_query::Query;

    fn listing(query: Query) -> Listing {
        let rows: Vec<Center> = DataSource::Embedded.load("evacuation_centers.json").unwrap();
        render_page::<Centers>(&rows, query).unwrap()
    }

    #[test]
    fn truncates_long_cells() {
        assert_eq!(truncate_to_width("Barangay Hall", 20), "Barangay Hall");
        assert_eq!(truncate_to_width("Bicol University Gymnasium", 10), "Bicol Uni…");
    }

    #[test]
    fn pads_by_alignment() {
        assert_eq!(pad("42", 5, Align::Right), "   42");
        assert_eq!(pad("ID", 5, Align::Left), "ID   ");
    }

    #[test]
    fn text_table_has_header_rows_and_footer() {
        let listing = listing(Query::new().equals(Center::STATUS, "full"));
        let text = render_text(&listing, &TableStyle::plain());
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].starts_with("ID"));
        assert!(lines[0].contains("Rate %"));
        assert!(lines[1].starts_with("EC-04"));
        assert!(lines[2].starts_with("EC-07"));
        assert_eq!(lines[3], "page 1/1, 2 matched");
    }

    #[test]
    fn empty_result_message() {
        let listing = listing(Query::new().contains(Center::NAME, "stadium"));
        let text = render_text(&listing, &TableStyle::plain());
        assert_eq!(
            text,
            "No centers match the current filters.\npage 1/1, 0 matched\n"
        );
    }

    #[test]
    fn json_carries_query_state_and_items() {
        let listing = listing(Query::new().sort_desc(Center::CAPACITY).page(1, 2));
        let json: serde_json::Value =
            serde_json::from_str(&render(&listing, Format::Json).unwrap()).unwrap();

        assert_eq!(json["screen"], "centers");
        assert_eq!(json["total_matched"], 12);
        assert_eq!(json["total_pages"], 6);
        assert_eq!(json["query"]["sort"]["direction"], "desc");
        assert_eq!(json["items"][0]["id"], "EC-06");
        assert!(json.get("cells").is_none());
    }
}
