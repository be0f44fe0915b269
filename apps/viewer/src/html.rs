//! Server-rendered pages.

use axum::http::StatusCode;
use padkit_core::{Component, Layer};
use serde_json::Value;

const STYLE: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 20px; background: #f6f7f9; color: #222; }
.container { max-width: 1100px; margin: 0 auto; }
h1 { margin-bottom: 4px; }
nav a { margin-right: 16px; }
.muted { color: #777; font-size: 14px; }
table { border-collapse: collapse; background: white; margin: 12px 0 24px; }
th { text-align: left; padding: 8px 12px; background: #e8eaee; font-size: 13px; }
td { padding: 6px 12px; border-bottom: 1px solid #e8eaee; font-size: 14px; font-family: 'SF Mono', Monaco, monospace; }
.layout { background: white; border: 1px solid #ddd; display: inline-block; }
input[type=text] { padding: 6px 10px; border: 1px solid #ccc; border-radius: 4px; min-width: 240px; }
button { padding: 6px 14px; }
"#;

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title} - padkit</title>
<style>{STYLE}</style>
</head>
<body>
<div class="container">
<nav><a href="/">Home</a><a href="/pdk">PDK</a><a href="/gds_list">GDS files</a><a href="/gds_current">Last saved</a></nav>
{body}
</div>
</body>
</html>"#,
        title = html_escape(title),
    )
}

pub fn index_page() -> String {
    page(
        "Home",
        r#"<h1>padkit viewer</h1>
<p class="muted">Browse the PDK cells, customize their settings and export them as GDS.</p>
<form method="post" action="/search">
  <input type="text" name="name" placeholder="Component name, e.g. pad_array">
  <button type="submit">Search</button>
</form>"#,
    )
}

pub fn gds_list_page(dir: &str, files: &[String]) -> String {
    let rows: String = files
        .iter()
        .map(|f| {
            let f = html_escape(f);
            format!("<li><a href=\"view/{f}\">{f}</a></li>\n")
        })
        .collect();
    page(
        "GDS files",
        &format!(
            "<h1>GDS files</h1>\n<p class=\"muted\">GDS files in {}</p>\n<ul>\n{}</ul>",
            html_escape(dir),
            rows
        ),
    )
}

pub fn pdk_page(pdk_name: &str, cells: &[&str], layers: &[Layer]) -> String {
    let layer_rows: String = layers
        .iter()
        .map(|l| {
            let color = l.color.to_hex();
            format!(
                "<tr><td><span style=\"color:{color}\">&#9632;</span> {}</td><td>{}</td><td>{}</td></tr>\n",
                html_escape(&l.name),
                l.id,
                html_escape(&l.description)
            )
        })
        .collect();
    let rows: String = cells
        .iter()
        .map(|c| {
            let c = html_escape(c);
            format!("<li><a href=\"/view/{c}\">{c}</a></li>\n")
        })
        .collect();
    page(
        "PDK",
        &format!(
            "<h1>{}</h1>\n<p class=\"muted\">{} cells</p>\n<ul>\n{}</ul>\n<h2>Layers</h2>\n<table>\n<tr><th>Name</th><th>GDS</th><th>Description</th></tr>\n{}</table>",
            html_escape(pdk_name),
            cells.len(),
            rows,
            layer_rows
        ),
    )
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn ports_table(component: &Component) -> String {
    if component.ports().is_empty() {
        return "<p class=\"muted\">No ports.</p>".to_string();
    }
    let rows: String = component
        .ports()
        .iter()
        .map(|p| {
            format!(
                "<tr><td>{}</td><td>({}, {})</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                html_escape(&p.name),
                p.center.x,
                p.center.y,
                p.width,
                p.orientation,
                p.layer,
                p.port_type.as_str()
            )
        })
        .collect();
    format!(
        "<table>\n<tr><th>Name</th><th>Center</th><th>Width</th><th>Orientation</th><th>Layer</th><th>Type</th></tr>\n{rows}</table>"
    )
}

fn settings_form(cell_name: &str, component: &Component) -> String {
    let Some(settings) = &component.settings else {
        return "<p class=\"muted\">Imported cell, no settings.</p>".to_string();
    };
    let rows: String = settings
        .full
        .iter()
        .map(|(key, value)| {
            let default = settings.default.get(key).map(value_text).unwrap_or_default();
            let marker = if settings.changed.contains_key(key) { " *" } else { "" };
            format!(
                "<tr><td>{key}{marker}</td><td>{default}</td><td><input type=\"text\" name=\"{key}\" placeholder=\"{current}\"></td></tr>\n",
                key = html_escape(key),
                default = html_escape(&default),
                current = html_escape(&value_text(value)),
            )
        })
        .collect();
    format!(
        "<form method=\"post\" action=\"/update/{}\">\n<table>\n<tr><th>Setting</th><th>Default</th><th>Value</th></tr>\n{rows}</table>\n<button type=\"submit\">Update</button>\n</form>",
        html_escape(cell_name)
    )
}

pub fn viewer_page(cell_name: &str, variant: Option<&str>, component: &Component, svg: &str) -> String {
    let subtitle = match variant {
        Some(v) => format!("variant {}", html_escape(v)),
        None => html_escape(&component.name),
    };
    let (w, h) = component.size();
    page(
        cell_name,
        &format!(
            "<h1>{}</h1>\n<p class=\"muted\">{} | {} x {} um</p>\n<div class=\"layout\">{}</div>\n<h2>Ports</h2>\n{}\n<h2>Settings</h2>\n{}",
            html_escape(cell_name),
            subtitle,
            w,
            h,
            svg,
            ports_table(component),
            settings_form(cell_name, component)
        ),
    )
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    page(
        status.as_str(),
        &format!(
            "<h1>{}</h1>\n<p>{}</p>",
            status,
            html_escape(message)
        ),
    )
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use padkit_cells::{pad, PadParams, Pdk};

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<a href=\"x\">&</a>"), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
    }

    #[test]
    fn test_viewer_page_lists_ports_and_settings() {
        let pdk = Pdk::generic();
        let params = PadParams {
            port_inclusion: 2.0,
            ..Default::default()
        };
        let c = pad(&params, &pdk).unwrap();
        let html = viewer_page("pad", Some(&c.name), &c, "<svg></svg>");
        assert!(html.contains("<td>e1</td>"));
        assert!(html.contains("action=\"/update/pad\""));
        assert!(html.contains("name=\"port_inclusion\""));
        assert!(html.contains("port_inclusion *"));
        assert!(html.contains("<svg></svg>"));
    }

    #[test]
    fn test_imported_cell_has_no_form() {
        let html = viewer_page("x.gds", None, &Component::new("x"), "");
        assert!(html.contains("No ports."));
        assert!(!html.contains("<form method=\"post\" action=\"/update"));
    }
}
