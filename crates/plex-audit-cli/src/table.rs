use console::{measure_text_width, Term};
use plex_audit_core::report::{DisplayRow, SectionRow};
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style, Width};
use tabled::Table;

/// Width for a free-text column: its widest cell clamped to `[min, max]`,
/// then shrunk to what the terminal leaves after the fixed columns, but
/// never below `min`.
fn flexible_width<'a>(
    cells: impl Iterator<Item = &'a str>,
    min: usize,
    max: usize,
    fixed: usize,
    term_cols: usize,
) -> usize {
    let widest = cells.map(measure_text_width).max().unwrap_or(0);
    let available = term_cols.saturating_sub(fixed);
    widest.clamp(min, max).min(available.max(min))
}

fn term_cols() -> usize {
    let (_, cols) = Term::stdout().size();
    cols as usize
}

pub fn sections(rows: &[SectionRow]) -> String {
    sections_for_width(rows, term_cols())
}

fn sections_for_width(rows: &[SectionRow], term_cols: usize) -> String {
    let name_width = flexible_width(rows.iter().map(|r| r.name.as_str()), 15, 36, 30, term_cols);
    Table::new(rows)
        .with(Style::psql())
        .with(Modify::new(Columns::single(1)).with(Width::truncate(name_width).suffix("…")))
        .with(Modify::new(Columns::single(2)).with(Alignment::right()))
        .to_string()
}

pub fn decaying(rows: &[DisplayRow]) -> String {
    decaying_for_width(rows, term_cols())
}

fn decaying_for_width(rows: &[DisplayRow], term_cols: usize) -> String {
    let title_width =
        flexible_width(rows.iter().map(|r| r.title.as_str()), 25, 50, 80, term_cols);
    Table::new(rows)
        .with(Style::psql())
        .with(Modify::new(Columns::single(1)).with(Width::truncate(title_width).suffix("…")))
        .with(Modify::new(Columns::new(2..4)).with(Alignment::right()))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(title: &str) -> DisplayRow {
        DisplayRow {
            id: 42,
            title: title.to_string(),
            size_gb: "1,234.50".to_string(),
            bitrate_mbps: "8.0".to_string(),
            created: "2022-01-01".to_string(),
            last_watched: "never".to_string(),
        }
    }

    #[test]
    fn test_flexible_width_clamps_to_bounds() {
        let short = ["abc"];
        assert_eq!(flexible_width(short.iter().copied(), 25, 50, 0, 200), 25);

        let long = ["x".repeat(80)];
        assert_eq!(flexible_width(long.iter().map(String::as_str), 25, 50, 0, 200), 50);
    }

    #[test]
    fn test_flexible_width_shrinks_to_terminal_but_not_below_min() {
        let cells = ["y".repeat(45)];
        assert_eq!(flexible_width(cells.iter().map(String::as_str), 25, 50, 80, 120), 40);
        assert_eq!(flexible_width(cells.iter().map(String::as_str), 25, 50, 80, 90), 25);
    }

    #[test]
    fn test_flexible_width_empty_is_min() {
        assert_eq!(flexible_width(std::iter::empty(), 15, 36, 30, 200), 15);
    }

    #[test]
    fn test_decaying_table_truncates_long_titles() {
        let long_title = "The Extraordinarily Long Title Of A Show Nobody Watches";
        let out = decaying_for_width(&[row(long_title), row("Short")], 100);

        assert!(out.contains("Size (Gb)"));
        assert!(out.contains("Last Watched"));
        assert!(out.contains("Short"));
        assert!(out.contains("1,234.50"));
        assert!(!out.contains(long_title));
        assert!(out.contains("The Extraordinarily"));
        assert!(out.contains('…'));
    }

    #[test]
    fn test_sections_table() {
        let rows = [SectionRow {
            id: 3,
            name: "TV Shows".to_string(),
            size_gb: "6,577.00".to_string(),
        }];
        let out = sections_for_width(&rows, 120);
        assert!(out.contains("Library Name"));
        assert!(out.contains("TV Shows"));
        assert!(out.contains("6,577.00"));
    }
}
