//! SVG rendering of the ranked repository list.

use crate::models::RepoSummary;

pub const WIDTH: u32 = 495;
pub const BASE_HEIGHT: u32 = 90;
pub const LINE_HEIGHT: u32 = 24;
const FIRST_LINE_Y: u32 = 80;

const TITLE: &str = "Top repositories by commits";
const NO_DATA: &str = "No data";

/// Escapes the characters that would break SVG text content.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Canvas height for the given number of text lines below the header.
pub fn canvas_height(lines: usize) -> u32 {
    BASE_HEIGHT + LINE_HEIGHT * lines as u32
}

/// Text of each listing line, or the single placeholder when nothing ranked.
pub fn listing_lines(ranked: &[RepoSummary]) -> Vec<String> {
    if ranked.is_empty() {
        return vec![NO_DATA.to_string()];
    }

    ranked
        .iter()
        .enumerate()
        .map(|(i, repo)| format!("{}. {} — {} commits", i + 1, escape(&repo.name), repo.commits))
        .collect()
}

pub fn render_svg(username: &str, ranked: &[RepoSummary]) -> String {
    let lines = listing_lines(ranked);
    let height = canvas_height(lines.len());

    let mut body = String::new();
    for (i, line) in lines.iter().enumerate() {
        let y = FIRST_LINE_Y + LINE_HEIGHT * i as u32;
        body.push_str(&format!(
            "  <text x=\"25\" y=\"{}\" class=\"line\">{}</text>\n",
            y, line
        ));
    }

    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" role="img" aria-label="{title}">
  <style>
    .title {{ font: 600 18px 'Segoe UI', Ubuntu, sans-serif; fill: #58a6ff; }}
    .subtitle {{ font: 400 12px 'Segoe UI', Ubuntu, sans-serif; fill: #8b949e; }}
    .line {{ font: 400 14px 'Segoe UI', Ubuntu, sans-serif; fill: #c9d1d9; }}
  </style>
  <rect x="0.5" y="0.5" rx="8" width="{rect_width}" height="{rect_height}" fill="#0d1117" stroke="#30363d"/>
  <text x="25" y="32" class="title">{title}</text>
  <text x="25" y="52" class="subtitle">@{user} · last 52 weeks</text>
{body}</svg>
"##,
        width = WIDTH,
        height = height,
        rect_width = WIDTH - 1,
        rect_height = height - 1,
        title = TITLE,
        user = escape(username),
        body = body,
    )
}
