//! Plain-text and JSON renderings of grouped listings

use serde::Serialize;
use std::fmt::Write as _;

use crate::services::novelty::format_price;
use crate::types::Group;

/// Column widths for the text report
const TITLE_WIDTH: usize = 40;
const COLOR_WIDTH: usize = 18;
const PRICE_WIDTH: usize = 10;

/// JSON shape of one group
#[derive(Debug, Serialize)]
pub struct GroupView<'a> {
    pub key: String,
    pub label: String,
    pub items: Vec<ItemView<'a>>,
}

/// JSON shape of one listing
#[derive(Debug, Serialize)]
pub struct ItemView<'a> {
    pub uuid: &'a str,
    pub item_id: &'a str,
    pub title: &'a str,
    pub color: &'a str,
    pub price: f64,
    pub timestamp: i64,
    pub link: String,
}

/// Build serializable views with resolved product links
pub fn group_views<'a>(groups: &'a [Group], base_url: &str) -> Vec<GroupView<'a>> {
    groups
        .iter()
        .map(|g| GroupView {
            key: g.key.to_string(),
            label: g.label(),
            items: g
                .items
                .iter()
                .map(|l| ItemView {
                    uuid: &l.uuid,
                    item_id: &l.item_id,
                    title: &l.title,
                    color: &l.color,
                    price: l.price,
                    timestamp: l.timestamp,
                    link: l.product_url(base_url),
                })
                .collect(),
        })
        .collect()
}

/// Pretty JSON array of groups
pub fn render_json(groups: &[Group], base_url: &str) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&group_views(groups, base_url))
}

/// Truncate to `max` chars with an ellipsis (UTF-8 safe)
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}…", text.chars().take(max.saturating_sub(1)).collect::<String>())
    } else {
        text.to_string()
    }
}

/// Text report: each label followed by its items (title, color, price, link)
pub fn render_text(groups: &[Group], base_url: &str) -> String {
    if groups.is_empty() {
        return "No new listings.\n".to_string();
    }

    let mut out = String::new();
    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "{}", group.label());
        for item in &group.items {
            let _ = writeln!(
                out,
                "  {:<tw$}  {:<cw$}  {:>pw$}  {}",
                truncate(&item.title, TITLE_WIDTH),
                truncate(&item.color, COLOR_WIDTH),
                format_price(item.price),
                item.product_url(base_url),
                tw = TITLE_WIDTH,
                cw = COLOR_WIDTH,
                pw = PRICE_WIDTH,
            );
        }
    }
    out
}
