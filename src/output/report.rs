use super::{DisplayRecord, Highlight};

pub struct HtmlReport<'a> {
    pub title: String,
    pub summary: String,
    pub notes: Vec<String>,
    pub rows: &'a [DisplayRecord],
    pub highlight: Option<&'a Highlight>,
}

fn json_for_script_tag(value: &str) -> String {
    value.replace("</", "<\\/")
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn marked(value: &str, highlight: Option<&Highlight>) -> String {
    match highlight {
        Some(h) => h.apply(value, escape_html, |s| format!("<mark>{}</mark>", escape_html(s))),
        None => escape_html(value),
    }
}

fn render_rows(report: &HtmlReport<'_>) -> String {
    if report.rows.is_empty() {
        return r#"      <tr><td colspan="6" class="empty">No infractions to show.</td></tr>
"#
        .to_string();
    }
    let mut out = String::new();
    for r in report.rows {
        out.push_str(&format!(
            r#"      <tr>
        <td class="code">{code}</td>
        <td>{description}<div class="meta">{authority} &middot; CTB {articles}</div></td>
        <td>{responsible}</td>
        <td class="num">{points}</td>
        <td class="num">{fine}</td>
        <td><span class="badge {class}">{label}</span></td>
      </tr>
"#,
            code = marked(&r.code, report.highlight),
            description = marked(&r.description, report.highlight),
            authority = escape_html(&r.issuing_authority),
            articles = escape_html(&r.legal_articles),
            responsible = escape_html(&r.responsible_party),
            points = r.points,
            fine = escape_html(&r.fine_display),
            class = r.severity_class,
            label = escape_html(&r.severity_label),
        ));
    }
    out
}

/// Standalone HTML page: the rendered table plus the same rows as JSON in a
/// `<script type="application/json">` block.
pub fn render_report(report: &HtmlReport<'_>) -> Vec<u8> {
    let json = serde_json::to_string(report.rows).unwrap_or_else(|_| "[]".to_string());
    let json = json_for_script_tag(&json);
    let notes = report
        .notes
        .iter()
        .map(|n| format!("    <p class=\"note\">{}</p>\n", escape_html(n)))
        .collect::<String>();

    let html = format!(
        r####"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8"/>
  <meta content="width=device-width, initial-scale=1.0" name="viewport"/>
  <title>MultasGO :: {title}</title>
  <style>
    body {{ font-family: Inter, system-ui, sans-serif; background: #f8fafc; color: #0f172a; margin: 0; }}
    header {{ background: #135bec; color: #fff; padding: 1rem 2rem; }}
    main {{ max-width: 1200px; margin: 0 auto; padding: 2rem; }}
    table {{ width: 100%; border-collapse: collapse; background: #fff; }}
    th, td {{ text-align: left; padding: .6rem .8rem; border-bottom: 1px solid #e2e8f0; vertical-align: top; }}
    th {{ font-size: .75rem; text-transform: uppercase; color: #64748b; }}
    td.num {{ text-align: right; white-space: nowrap; }}
    td.code {{ font-family: ui-monospace, monospace; white-space: nowrap; }}
    td.empty {{ text-align: center; color: #64748b; }}
    .meta {{ font-size: .75rem; color: #64748b; margin-top: .25rem; }}
    .note {{ background: #fef9c3; padding: .5rem .8rem; border-radius: .375rem; }}
    .badge {{ padding: .15rem .5rem; border-radius: 9999px; font-size: .75rem; font-weight: 600; }}
    .badge.leve {{ background: #dcfce7; color: #166534; }}
    .badge.media {{ background: #fef9c3; color: #854d0e; }}
    .badge.grave {{ background: #ffedd5; color: #9a3412; }}
    .badge.gravissima {{ background: #fee2e2; color: #991b1b; }}
    .badge.nan {{ background: #e2e8f0; color: #475569; }}
    mark {{ background: #fde047; }}
  </style>
</head>
<body>
  <script type="application/json" id="records-data">{json}</script>
  <header><strong>MultasGO</strong> :: {title}</header>
  <main>
    <h1>{summary}</h1>
{notes}    <table>
      <thead>
        <tr><th>Code</th><th>Description</th><th>Responsible</th><th>Points</th><th>Fine</th><th>Severity</th></tr>
      </thead>
      <tbody>
{rows}      </tbody>
    </table>
  </main>
</body>
</html>
"####,
        title = escape_html(&report.title),
        summary = escape_html(&report.summary),
        notes = notes,
        rows = render_rows(report),
        json = json,
    );
    html.into_bytes()
}
