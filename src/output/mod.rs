pub mod report;

use colored::Colorize;
use regex::Regex;
use serde::{Serialize, Serializer};

use crate::explorer::{ExplorerCriteria, ExplorerPage, Facets, SnapshotSource};
use crate::record::InfractionRecord;

const DESCRIPTION_WIDTH: usize = 60;
const EMPTY_CELL: &str = "-";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Cards,
    Json,
    Html,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "table" | "text" | "txt" => Some(Self::Table),
            "cards" | "card" => Some(Self::Cards),
            "json" => Some(Self::Json),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }

    /// Formats meant for a person reading the terminal.
    pub fn is_interactive(&self) -> bool {
        matches!(self, Self::Table | Self::Cards)
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        return Some(OutputFormat::Html);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Table);
    }
    None
}

/// Brazilian real, e.g. `R$ 2.934,70`.
pub fn format_brl(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let cents = (value.abs() * 100.0).round() as u64;
    let units = (cents / 100).to_string();
    let mut grouped = String::new();
    for (i, ch) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("R$ {sign}{grouped},{:02}", cents % 100)
}

/// Case-insensitive matcher for the searched term. Terms shorter than three
/// characters are not highlighted.
#[derive(Clone, Debug)]
pub struct Highlight {
    re: Regex,
}

impl Highlight {
    pub fn new(term: &str) -> Option<Self> {
        let term = term.trim();
        if term.chars().count() < 3 {
            return None;
        }
        let re = Regex::new(&format!("(?i){}", regex::escape(term))).ok()?;
        Some(Self { re })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.re.is_match(text)
    }

    /// Rebuilds `text`, passing unmatched runs through `plain` and matches
    /// through `mark`.
    pub fn apply(
        &self,
        text: &str,
        plain: impl Fn(&str) -> String,
        mark: impl Fn(&str) -> String,
    ) -> String {
        let mut out = String::new();
        let mut last = 0;
        for m in self.re.find_iter(text) {
            out.push_str(&plain(&text[last..m.start()]));
            out.push_str(&mark(m.as_str()));
            last = m.end();
        }
        out.push_str(&plain(&text[last..]));
        out
    }
}

fn highlight_terminal(text: &str, highlight: Option<&Highlight>) -> String {
    match highlight {
        Some(h) => h.apply(
            text,
            |s| s.to_string(),
            |s| s.black().on_yellow().to_string(),
        ),
        None => text.to_string(),
    }
}

/// A record prepared for display: labels resolved and money formatted.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DisplayRecord {
    pub code: String,
    pub description: String,
    pub responsible_party: String,
    pub points: u32,
    pub fine_amount: f64,
    pub fine_display: String,
    pub severity: String,
    pub severity_label: String,
    pub severity_class: String,
    pub issuing_authority: String,
    pub legal_articles: String,
}

impl From<&InfractionRecord> for DisplayRecord {
    fn from(r: &InfractionRecord) -> Self {
        let level = r.severity_level();
        Self {
            code: r.code.clone(),
            description: r.description.clone(),
            responsible_party: r.responsible_party.clone(),
            points: r.points,
            fine_amount: r.fine_amount,
            fine_display: format_brl(r.fine_amount),
            severity: r.severity.clone(),
            severity_label: level.label().to_string(),
            severity_class: level.badge_class().to_string(),
            issuing_authority: r.issuing_authority.clone(),
            legal_articles: r.legal_articles.clone(),
        }
    }
}

pub fn display_records(records: &[InfractionRecord]) -> Vec<DisplayRecord> {
    records.iter().map(DisplayRecord::from).collect()
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        EMPTY_CELL
    } else {
        value
    }
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let mut out: String = value.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn pad(value: &str, width: usize) -> String {
    let len = value.chars().count();
    if len >= width {
        value.to_string()
    } else {
        format!("{value}{}", " ".repeat(width - len))
    }
}

fn colorize_severity(text: &str, class: &str) -> String {
    match class {
        "leve" => text.green().to_string(),
        "media" => text.yellow().to_string(),
        "grave" => text.red().to_string(),
        "gravissima" => text.bright_red().bold().to_string(),
        _ => text.dimmed().to_string(),
    }
}

fn render_table(rows: &[DisplayRecord], highlight: Option<&Highlight>) -> String {
    let headers = [
        "CODE",
        "DESCRIPTION",
        "RESPONSIBLE",
        "POINTS",
        "FINE",
        "SEVERITY",
    ];
    let cells: Vec<[String; 6]> = rows
        .iter()
        .map(|r| {
            [
                or_dash(&r.code).to_string(),
                truncate(or_dash(&r.description), DESCRIPTION_WIDTH),
                or_dash(&r.responsible_party).to_string(),
                r.points.to_string(),
                r.fine_display.clone(),
                or_dash(&r.severity_label).to_string(),
            ]
        })
        .collect();

    let mut widths = headers.map(|h| h.chars().count());
    for row in &cells {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header_line = headers
        .iter()
        .enumerate()
        .map(|(i, h)| pad(h, widths[i]))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(header_line.trim_end().bold().to_string().as_str());
    out.push('\n');

    for (row, record) in cells.iter().zip(rows) {
        let mut line = Vec::with_capacity(row.len());
        for (i, cell) in row.iter().enumerate() {
            let padded = if i == row.len() - 1 {
                cell.clone()
            } else {
                pad(cell, widths[i])
            };
            let rendered = match i {
                0 | 1 => highlight_terminal(&padded, highlight),
                5 => colorize_severity(&padded, &record.severity_class),
                _ => padded,
            };
            line.push(rendered);
        }
        out.push_str(&line.join("  "));
        out.push('\n');
    }
    out
}

fn render_cards(rows: &[DisplayRecord], highlight: Option<&Highlight>, offset: usize) -> String {
    let mut out = String::new();
    for (i, r) in rows.iter().enumerate() {
        out.push_str(&format!(
            "[{}] {}  {}\n",
            offset + i + 1,
            highlight_terminal(or_dash(&r.code), highlight).bold(),
            colorize_severity(&r.severity_label, &r.severity_class)
        ));
        out.push_str(&format!(
            "    {}\n",
            highlight_terminal(or_dash(&r.description), highlight)
        ));
        out.push_str(&format!(
            "    Responsible: {}  Points: {}  Fine: {}\n",
            or_dash(&r.responsible_party),
            r.points,
            r.fine_display
        ));
        out.push_str(&format!(
            "    Authority: {}  CTB articles: {}\n",
            or_dash(&r.issuing_authority),
            or_dash(&r.legal_articles)
        ));
        out.push('\n');
    }
    out
}

pub fn render_json<T: Serialize>(value: &T) -> Vec<u8> {
    let mut out = serde_json::to_vec_pretty(value).unwrap_or_else(|_| b"{}".to_vec());
    out.push(b'\n');
    out
}

fn summary_line(total: u64, query: &str) -> String {
    let noun = if total == 1 { "result" } else { "results" };
    format!("{total} {noun} for \"{query}\"")
}

#[derive(Serialize)]
struct SearchJson<'a> {
    query: &'a str,
    total: u64,
    results: Vec<DisplayRecord>,
}

pub fn render_search(
    format: OutputFormat,
    query: &str,
    total: u64,
    records: &[InfractionRecord],
) -> Vec<u8> {
    let rows = display_records(records);
    let highlight = Highlight::new(query);
    match format {
        OutputFormat::Json => render_json(&SearchJson {
            query,
            total,
            results: rows,
        }),
        OutputFormat::Html => report::render_report(&report::HtmlReport {
            title: "Search results".to_string(),
            summary: summary_line(total, query),
            notes: Vec::new(),
            rows: &rows,
            highlight: highlight.as_ref(),
        }),
        OutputFormat::Table | OutputFormat::Cards => {
            let mut out = String::new();
            out.push_str(&summary_line(total, query).bold().to_string());
            out.push_str("\n\n");
            if format == OutputFormat::Table {
                out.push_str(&render_table(&rows, highlight.as_ref()));
            } else {
                out.push_str(&render_cards(&rows, highlight.as_ref(), 0));
            }
            if (rows.len() as u64) < total {
                out.push_str(&format!(
                    "\nshowing {} of {total}; use --skip/--limit to see more\n",
                    rows.len()
                ));
            }
            out.into_bytes()
        }
    }
}

/// Shell command that repeats the search with another term. The term comes
/// from the server, so anything beyond plain word characters is
/// single-quoted.
pub fn search_command(term: &str) -> String {
    format!("multasgo search {}", shell_quote(term))
}

fn shell_quote(term: &str) -> String {
    let plain = !term.is_empty()
        && term
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | ','));
    if plain {
        return term.to_string();
    }
    format!("'{}'", term.replace('\'', "'\\''"))
}

#[derive(Serialize)]
struct EmptyJson<'a> {
    query: &'a str,
    total: u64,
    results: [DisplayRecord; 0],
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggestion: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggested_command: Option<String>,
}

pub fn render_empty(
    format: OutputFormat,
    query: &str,
    message: &str,
    suggestion: Option<&str>,
) -> Vec<u8> {
    let command = suggestion.map(search_command);
    match format {
        OutputFormat::Json => render_json(&EmptyJson {
            query,
            total: 0,
            results: [],
            message,
            suggestion,
            suggested_command: command,
        }),
        OutputFormat::Html => {
            let mut notes = vec![message.to_string()];
            if let (Some(s), Some(cmd)) = (suggestion, command.as_ref()) {
                notes.push(format!("Did you mean \"{s}\"? Run: {cmd}"));
            }
            report::render_report(&report::HtmlReport {
                title: "Search results".to_string(),
                summary: summary_line(0, query),
                notes,
                rows: &[],
                highlight: None,
            })
        }
        OutputFormat::Table | OutputFormat::Cards => {
            let mut out = String::new();
            out.push_str(&message.yellow().to_string());
            out.push('\n');
            if let (Some(s), Some(cmd)) = (suggestion, command.as_ref()) {
                out.push_str(&format!(
                    "Did you mean {}?\n  {}\n",
                    format!("\"{s}\"").bold(),
                    cmd.cyan()
                ));
            }
            out.into_bytes()
        }
    }
}

const DETAIL_FIELDS: [&str; 6] = [
    "Responsible party",
    "Points",
    "Fine",
    "Severity",
    "Issuing authority",
    "CTB articles",
];

/// All fields of one record as a vertical card.
pub fn render_record(format: OutputFormat, record: &InfractionRecord) -> Vec<u8> {
    let row = DisplayRecord::from(record);
    match format {
        OutputFormat::Json => render_json(&row),
        OutputFormat::Html => report::render_report(&report::HtmlReport {
            title: format!("Infraction {}", or_dash(&row.code)),
            summary: row.description.clone(),
            notes: Vec::new(),
            rows: std::slice::from_ref(&row),
            highlight: None,
        }),
        OutputFormat::Table | OutputFormat::Cards => {
            let values = [
                or_dash(&row.responsible_party).to_string(),
                row.points.to_string(),
                row.fine_display.clone(),
                colorize_severity(or_dash(&row.severity_label), &row.severity_class),
                or_dash(&row.issuing_authority).to_string(),
                or_dash(&row.legal_articles).to_string(),
            ];
            let mut out = String::new();
            out.push_str(&format!("=== {} ===\n", or_dash(&row.code)).bold().to_string());
            if !row.description.trim().is_empty() {
                out.push_str(&row.description);
                out.push('\n');
            }
            out.push('\n');
            for (label, value) in DETAIL_FIELDS.iter().zip(values) {
                out.push_str(&format!("  {:<20} {}\n", label, value));
            }
            out.into_bytes()
        }
    }
}

/// Everything the explorer view shows for one invocation.
#[derive(Clone, Debug, Serialize)]
pub struct ExplorerReport {
    #[serde(serialize_with = "serialize_pages")]
    pub pages: Vec<ExplorerPage>,
    pub snapshot_total: usize,
    pub sort_field: String,
    pub sort_direction: String,
    pub severity: Option<String>,
    pub responsible_party: Option<String>,
    pub points: Option<u32>,
    pub source: SnapshotSource,
    pub degraded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facets: Option<Facets>,
}

impl ExplorerReport {
    pub fn new(
        pages: Vec<ExplorerPage>,
        snapshot_total: usize,
        criteria: &ExplorerCriteria,
        source: SnapshotSource,
        facets: Option<Facets>,
    ) -> Self {
        Self {
            pages,
            snapshot_total,
            sort_field: criteria.sort_field.to_string(),
            sort_direction: criteria.sort_direction.to_string(),
            severity: criteria.filters.severity.clone(),
            responsible_party: criteria.filters.responsible_party.clone(),
            points: criteria.filters.points,
            source,
            degraded: source == SnapshotSource::Fallback,
            facets,
        }
    }

    pub fn filtered_count(&self) -> usize {
        self.pages.first().map(|p| p.filtered_count).unwrap_or(0)
    }
}

/// JSON form of one page; records carry the same display fields as search
/// and detail output.
#[derive(Serialize)]
struct PageJson {
    records: Vec<DisplayRecord>,
    filtered_count: usize,
    total_pages: usize,
    current_page: usize,
    page_size: usize,
    has_previous: bool,
    has_next: bool,
}

impl From<&ExplorerPage> for PageJson {
    fn from(page: &ExplorerPage) -> Self {
        Self {
            records: display_records(&page.records),
            filtered_count: page.filtered_count,
            total_pages: page.total_pages,
            current_page: page.current_page,
            page_size: page.page_size,
            has_previous: page.has_previous,
            has_next: page.has_next,
        }
    }
}

fn serialize_pages<S: Serializer>(pages: &[ExplorerPage], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(pages.iter().map(PageJson::from))
}

const DEGRADED_NOTICE: &str =
    "the infraction listing could not be loaded; showing built-in sample data";

fn page_line(page: &ExplorerPage) -> String {
    let availability = |yes: bool| if yes { "available" } else { "none" };
    format!(
        "Page {} of {} :: previous: {} :: next: {}",
        page.current_page,
        page.total_pages,
        availability(page.has_previous),
        availability(page.has_next)
    )
}

fn join_or_dash<T: ToString>(values: &[T]) -> String {
    if values.is_empty() {
        return EMPTY_CELL.to_string();
    }
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn count_line(filtered: usize) -> String {
    let noun = if filtered == 1 {
        "infraction"
    } else {
        "infractions"
    };
    format!("{filtered} {noun} found")
}

pub fn render_explorer(format: OutputFormat, report: &ExplorerReport) -> Vec<u8> {
    match format {
        OutputFormat::Json => render_json(report),
        OutputFormat::Html => {
            let rows: Vec<DisplayRecord> = report
                .pages
                .iter()
                .flat_map(|p| p.records.iter().map(DisplayRecord::from))
                .collect();
            let mut notes = Vec::new();
            if report.degraded {
                notes.push(DEGRADED_NOTICE.to_string());
            }
            notes.extend(report.pages.iter().map(page_line));
            report::render_report(&report::HtmlReport {
                title: "Infraction explorer".to_string(),
                summary: count_line(report.filtered_count()),
                notes,
                rows: &rows,
                highlight: None,
            })
        }
        OutputFormat::Table | OutputFormat::Cards => {
            let mut out = String::new();
            if report.degraded {
                out.push_str(&format!("warning: {DEGRADED_NOTICE}").yellow().to_string());
                out.push('\n');
            }
            if let Some(facets) = report.facets.as_ref() {
                out.push_str(&format!(":: {:<12}: {}\n", "Severities", join_or_dash(&facets.severities)));
                out.push_str(&format!(
                    ":: {:<12}: {}\n",
                    "Responsible",
                    join_or_dash(&facets.responsible_parties)
                ));
                out.push_str(&format!(":: {:<12}: {}\n", "Points", join_or_dash(&facets.points)));
            }
            out.push_str(&format!(
                ":: {:<12}: {} {}\n",
                "Sort", report.sort_field, report.sort_direction
            ));
            out.push_str(
                &format!(
                    "{} (of {})",
                    count_line(report.filtered_count()),
                    report.snapshot_total
                )
                .bold()
                .to_string(),
            );
            out.push_str("\n\n");
            for page in &report.pages {
                let rows = display_records(&page.records);
                if rows.is_empty() {
                    out.push_str("No infractions match the selected filters.\n");
                } else if format == OutputFormat::Table {
                    out.push_str(&render_table(&rows, None));
                } else {
                    let offset = page.current_page.saturating_sub(1) * page.page_size;
                    out.push_str(&render_cards(&rows, None, offset));
                }
                out.push_str(&page_line(page).dimmed().to_string());
                out.push_str("\n\n");
            }
            out.into_bytes()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explorer::{explore, ExplorerCriteria, ExplorerState};

    fn no_color() {
        colored::control::set_override(false);
    }

    fn sample() -> InfractionRecord {
        InfractionRecord {
            code: "5169-1".to_string(),
            description: "Dirigir sob influência de álcool".to_string(),
            responsible_party: "Condutor".to_string(),
            points: 7,
            fine_amount: 2934.70,
            severity: "Gravíssima".to_string(),
            issuing_authority: "PRF".to_string(),
            legal_articles: "165".to_string(),
        }
    }

    fn text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn brl_uses_brazilian_separators() {
        assert_eq!(format_brl(2934.70), "R$ 2.934,70");
        assert_eq!(format_brl(88.38), "R$ 88,38");
        assert_eq!(format_brl(0.0), "R$ 0,00");
        assert_eq!(format_brl(1234567.891), "R$ 1.234.567,89");
        assert_eq!(format_brl(f64::NAN), "R$ 0,00");
    }

    #[test]
    fn format_names_and_extensions() {
        assert_eq!(OutputFormat::parse("CARDS"), Some(OutputFormat::Cards));
        assert_eq!(OutputFormat::parse("xml"), None);
        assert_eq!(infer_format_from_path("out/report.HTML"), Some(OutputFormat::Html));
        assert_eq!(infer_format_from_path("results.json"), Some(OutputFormat::Json));
        assert_eq!(infer_format_from_path("results"), None);
    }

    #[test]
    fn highlight_is_case_insensitive_and_escaped() {
        let h = Highlight::new("álcool").unwrap();
        let out = h.apply("Sob ÁLCOOL e álcool", |s| s.to_string(), |s| format!("[{s}]"));
        assert_eq!(out, "Sob [ÁLCOOL] e [álcool]");

        let h = Highlight::new("a.b").unwrap();
        assert!(!h.is_match("axb"));
        assert!(h.is_match("A.B"));
    }

    #[test]
    fn short_terms_are_not_highlighted() {
        assert!(Highlight::new("ab").is_none());
        assert!(Highlight::new("  ab  ").is_none());
    }

    #[test]
    fn nan_severity_renders_as_not_applicable() {
        no_color();
        let record = InfractionRecord {
            severity: "nan".to_string(),
            ..sample()
        };
        let out = text(render_record(OutputFormat::Table, &record));
        assert!(out.contains("not applicable"));
        assert!(!out.contains("nan"));
        assert_eq!(DisplayRecord::from(&record).severity_class, "nan");
    }

    #[test]
    fn search_table_has_summary_and_row() {
        no_color();
        let out = text(render_search(OutputFormat::Table, "álcool", 1, &[sample()]));
        assert!(out.starts_with("1 result for \"álcool\""));
        assert!(out.contains("5169-1"));
        assert!(out.contains("R$ 2.934,70"));
        assert!(out.contains("very severe"));
    }

    #[test]
    fn search_json_uses_display_fields() {
        let out = text(render_search(OutputFormat::Json, "5169", 1, &[sample()]));
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["total"], 1);
        assert_eq!(value["results"][0]["fine_display"], "R$ 2.934,70");
        assert_eq!(value["results"][0]["severity_class"], "gravissima");
    }

    #[test]
    fn empty_state_offers_the_suggested_command() {
        no_color();
        let out = text(render_empty(
            OutputFormat::Table,
            "cintu",
            "No infractions found",
            Some("cinto"),
        ));
        assert!(out.contains("Did you mean \"cinto\"?"));
        assert!(out.contains("multasgo search cinto"));

        let json = text(render_empty(OutputFormat::Json, "cintu", "none", Some("cinto")));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["suggested_command"], "multasgo search cinto");
        assert_eq!(value["results"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn suggested_command_quotes_phrases() {
        assert_eq!(
            search_command("telefone celular"),
            "multasgo search 'telefone celular'"
        );
        assert_eq!(search_command("bafômetro"), "multasgo search bafômetro");
        assert_eq!(search_command("5169-1"), "multasgo search 5169-1");
    }

    #[test]
    fn suggested_command_is_safe_to_paste() {
        assert_eq!(search_command("a;id"), "multasgo search 'a;id'");
        assert_eq!(
            search_command("$(touch x)"),
            "multasgo search '$(touch x)'"
        );
        assert_eq!(search_command("`id`"), "multasgo search '`id`'");
        assert_eq!(search_command("it's"), r"multasgo search 'it'\''s'");
        assert_eq!(search_command(""), "multasgo search ''");
    }

    #[test]
    fn detail_card_lists_every_field() {
        no_color();
        let out = text(render_record(OutputFormat::Cards, &sample()));
        assert!(out.starts_with("=== 5169-1 ==="));
        for label in DETAIL_FIELDS {
            assert!(out.contains(label), "missing {label}");
        }
        assert!(out.contains("PRF"));
    }

    #[test]
    fn explorer_page_shows_position() {
        no_color();
        let snapshot: Vec<InfractionRecord> = (0..12)
            .map(|i| InfractionRecord {
                code: format!("{i:02}"),
                ..sample()
            })
            .collect();
        let criteria = ExplorerCriteria {
            page: 2,
            ..ExplorerCriteria::default()
        };
        let page = explore(&snapshot, &criteria);
        let report = ExplorerReport::new(
            vec![page],
            snapshot.len(),
            &criteria,
            SnapshotSource::Backend,
            None,
        );
        let out = text(render_explorer(OutputFormat::Table, &report));
        assert!(out.contains("12 infractions found (of 12)"));
        assert!(out.contains("Page 2 of 2 :: previous: available :: next: none"));
        assert!(!out.contains("warning"));
    }

    #[test]
    fn degraded_explorer_is_flagged() {
        no_color();
        let state = ExplorerState::new(
            crate::explorer::fallback_records(),
            SnapshotSource::Fallback,
            10,
        );
        let report = ExplorerReport::new(
            vec![state.current_page()],
            state.snapshot().len(),
            state.criteria(),
            state.source(),
            Some(state.facets()),
        );
        let out = text(render_explorer(OutputFormat::Table, &report));
        assert!(out.starts_with("warning:"));
        assert!(out.contains(":: Severities"));

        let json = text(render_explorer(OutputFormat::Json, &report));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["degraded"], true);
        assert_eq!(value["source"], "fallback");
    }

    #[test]
    fn explorer_json_uses_display_fields() {
        let snapshot = vec![InfractionRecord {
            severity: "nan".to_string(),
            ..sample()
        }];
        let criteria = ExplorerCriteria::default();
        let report = ExplorerReport::new(
            vec![explore(&snapshot, &criteria)],
            snapshot.len(),
            &criteria,
            SnapshotSource::Backend,
            None,
        );
        let json = text(render_explorer(OutputFormat::Json, &report));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let record = &value["pages"][0]["records"][0];
        assert_eq!(record["severity_label"], "not applicable");
        assert_eq!(record["fine_display"], "R$ 2.934,70");
        assert_eq!(record["code"], "5169-1");
        assert!(record.get("gravidade").is_none());
        assert_eq!(value["pages"][0]["current_page"], 1);
    }
}
