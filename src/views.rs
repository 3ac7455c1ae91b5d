//! Page rendering: templates are plain HTML files with `{{name}}`
//! placeholders, read from the configured templates directory per request.

use std::collections::BTreeSet;
use std::path::Path;
use crate::errors::{AppError, AppResult};
use crate::models::Entry;
use crate::services::Totals;

pub fn render(templates_dir: &Path, name: &str, vars: &[(&str, &str)]) -> AppResult<String> {
    let template = std::fs::read_to_string(templates_dir.join(name))
        .map_err(AppError::Template)?;
    Ok(fill(&template, vars))
}

/// Substitutes placeholders in a single pass, so values containing `{{` are
/// never expanded again. Unknown placeholders are left as they are.
pub fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };

        let key = after[..end].trim();
        match vars.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + end + 4]),
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
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

pub fn error_block(error: Option<&str>) -> String {
    error.map_or_else(String::new, |msg| {
        format!(r#"<p class="error">{}</p>"#, escape_html(msg))
    })
}

pub fn entry_rows(entries: &[Entry]) -> String {
    if entries.is_empty() {
        return r#"<tr><td colspan="5" class="empty">No entries</td></tr>"#.to_string();
    }
    entries.iter().map(|entry| {
        format!(
            r#"<tr class="{}">
                <td>{}</td>
                <td>{}</td>
                <td>{}</td>
                <td class="amount">{:.2}</td>
                <td>{}</td>
            </tr>"#,
            if entry.is_income() { "income" } else { "expense" },
            escape_html(&entry.date),
            escape_html(&entry.entry_type),
            escape_html(&entry.description),
            entry.amount,
            escape_html(&entry.editor),
        )
    }).collect::<Vec<_>>().join("\n")
}

/// `<option>` list with a leading "All" choice; `selected` stays selected.
pub fn select_options(values: &BTreeSet<String>, selected: Option<&str>) -> String {
    let mut html = vec![r#"<option value="">All</option>"#.to_string()];
    html.extend(values.iter().map(|value| {
        let escaped = escape_html(value);
        let marker = if selected == Some(value.as_str()) { " selected" } else { "" };
        format!(r#"<option value="{}"{}>{}</option>"#, escaped, marker, escaped)
    }));
    html.join("\n")
}

pub fn totals_vars(totals: &Totals) -> [(&'static str, String); 3] {
    [
        ("net", format!("{:.2}", totals.net)),
        ("income", format!("{:.2}", totals.income)),
        ("expense", format!("{:.2}", totals.expense)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_fill_replaces_known_placeholders() {
        let html = fill("<p>{{ name }} has {{count}}</p>", &[("name", "ada"), ("count", "3")]);
        assert_eq!(html, "<p>ada has 3</p>");
    }

    #[test]
    fn test_fill_does_not_expand_values() {
        let html = fill("{{a}}-{{b}}", &[("a", "{{b}}"), ("b", "x")]);
        assert_eq!(html, "{{b}}-x");
    }

    #[test]
    fn test_fill_keeps_unknown_and_unterminated() {
        assert_eq!(fill("{{missing}} {{open", &[]), "{{missing}} {{open");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>alert("x & 'y'")</script>"#),
            "&lt;script&gt;alert(&quot;x &amp; &#39;y&#39;&quot;)&lt;/script&gt;"
        );
    }

    #[test]
    fn test_select_options_marks_selection() {
        let values: BTreeSet<String> = ["01".to_string(), "02".to_string()].into();
        let html = select_options(&values, Some("02"));
        assert!(html.contains(r#"<option value="02" selected>02</option>"#));
        assert!(html.contains(r#"<option value="01">01</option>"#));
    }

    #[test]
    fn test_entry_rows_escape_user_text() {
        let entry = Entry {
            date: "2024-01-05".into(),
            entry_type: "expense".into(),
            description: "<b>lunch</b>".into(),
            amount: Decimal::new(1250, 2),
            editor: "bob".into(),
        };
        let html = entry_rows(&[entry]);
        assert!(html.contains("&lt;b&gt;lunch&lt;/b&gt;"));
        assert!(html.contains("12.50"));
    }
}
