//! Aggregator service for grouping new listings by day or week

use crate::types::{DateBasis, Group, GroupKey, GroupMode, Listing};
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Aggregator for building labeled listing groups
pub struct Aggregator;

impl Aggregator {
    /// Group novel listings by `mode`.
    ///
    /// Only `is_new == 1` listings are kept. Within a group the first listing
    /// seen for an `item_id` wins, and items are sorted by (title, color).
    /// Groups come back ordered by key string descending, so week keys
    /// compare as text (`2024-W9` sorts above `2024-W10`).
    pub fn group(listings: &[Listing], mode: GroupMode, basis: DateBasis) -> Vec<Group> {
        let mut groups: HashMap<GroupKey, Vec<Listing>> = HashMap::new();
        let mut seen: HashSet<(GroupKey, &str)> = HashSet::new();
        let mut out_of_range = 0usize;

        for listing in listings.iter().filter(|l| l.is_novel()) {
            let Some(key) = GroupKey::for_timestamp(listing.timestamp, mode, basis) else {
                out_of_range += 1;
                continue;
            };

            if seen.insert((key, listing.item_id.as_str())) {
                groups.entry(key).or_default().push(listing.clone());
            }
        }

        if out_of_range > 0 {
            warn!(out_of_range, "listings with unrepresentable timestamps dropped");
        }

        let mut result: Vec<Group> = groups
            .into_iter()
            .map(|(key, mut items)| {
                Self::sort_items(&mut items);
                Group { key, items }
            })
            .collect();

        // Sort by key text descending (most recent first)
        result.sort_by_cached_key(|g| std::cmp::Reverse(g.key.to_string()));
        result
    }

    /// Sort by title, then color (both ascending)
    pub fn sort_items(items: &mut [Listing]) {
        items.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.color.cmp(&b.color)));
    }

    /// Count of novel listings across all groups
    pub fn item_count(groups: &[Group]) -> usize {
        groups.iter().map(|g| g.items.len()).sum()
    }
}
