//! Static HTML export with a CSS-only Day/Week toggle

use std::fmt::Write as _;

use crate::services::novelty::format_price;
use crate::types::{Group, GroupMode};

const STYLE: &str = "\
body{margin:0;background:#F6F1EB;color:#474747;font-family:sans-serif;font-weight:300}\
main{max-width:36rem;margin:0 auto;padding:3rem 1.5rem}\
h1{text-align:center;font-weight:400;letter-spacing:.2em}\
input[name=mode]{display:none}\
nav{display:flex;gap:2rem;text-transform:uppercase}\
nav label{cursor:pointer}\
#mode-day:checked~main label[for=mode-day],#mode-week:checked~main label[for=mode-week]{font-weight:700}\
.mode-week{display:none}\
#mode-week:checked~main .mode-day{display:none}\
#mode-week:checked~main .mode-week{display:block}\
section{padding:2.5rem 0}\
h2{text-align:center;font-weight:300}\
a{display:flex;color:inherit;text-decoration:none;padding:.25rem 0;transition:color .3s}\
a:hover{color:#EC6C1F}\
.title{width:70%}.color{width:20%}.price{width:10%;text-align:right}\
.empty{text-align:center}";

/// Escape text for HTML element and attribute content
pub fn escape(text: &str) -> String {
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

/// Render a full page holding both groupings; `default_mode` is pre-selected
pub fn render_page(
    title: &str,
    day_groups: &[Group],
    week_groups: &[Group],
    base_url: &str,
    default_mode: GroupMode,
) -> String {
    let mut out = String::new();
    let checked = |mode: GroupMode| if mode == default_mode { " checked" } else { "" };

    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <input type=\"radio\" name=\"mode\" id=\"mode-day\"{day}>\n\
         <input type=\"radio\" name=\"mode\" id=\"mode-week\"{week}>\n\
         <main>\n<h1>{title}</h1>\n<nav>",
        title = escape(title),
        day = checked(GroupMode::Day),
        week = checked(GroupMode::Week),
    );
    for mode in GroupMode::all() {
        let id = mode_id(*mode);
        let _ = write!(out, "<label for=\"mode-{}\">{}</label>", id, mode.label());
    }
    out.push_str("</nav>\n");

    render_mode(&mut out, GroupMode::Day, day_groups, base_url);
    render_mode(&mut out, GroupMode::Week, week_groups, base_url);

    out.push_str("</main>\n</body>\n</html>\n");
    out
}

fn mode_id(mode: GroupMode) -> &'static str {
    match mode {
        GroupMode::Day => "day",
        GroupMode::Week => "week",
    }
}

fn render_mode(out: &mut String, mode: GroupMode, groups: &[Group], base_url: &str) {
    let _ = writeln!(out, "<div class=\"mode-{}\">", mode_id(mode));
    if groups.is_empty() {
        out.push_str("<p class=\"empty\">No new listings.</p>\n");
    }
    for group in groups {
        let _ = writeln!(
            out,
            "<section id=\"{}\">\n<h2>{}</h2>",
            escape(&group.key.to_string()),
            escape(&group.label())
        );
        for item in &group.items {
            let _ = writeln!(
                out,
                "<a href=\"{}\" target=\"_blank\" rel=\"noopener\">\
                 <span class=\"title\">{}</span>\
                 <span class=\"color\">{}</span>\
                 <span class=\"price\">{}</span></a>",
                escape(&item.product_url(base_url)),
                escape(&item.title),
                escape(&item.color),
                format_price(item.price),
            );
        }
        out.push_str("</section>\n");
    }
    out.push_str("</div>\n");
}
