//! Pure, synchronous views over a card collection: substring search and
//! page slicing. Neither ever mutates its input; both compose with the
//! board's lane partition.

use crate::model::Card;

/// Case-insensitive substring search over a fixed set of textual payload
/// fields. Non-string fields and missing fields never match. An empty (or
/// whitespace-only) query matches everything.
pub fn search<'a>(cards: &'a [Card], query: &str, fields: &[String]) -> Vec<&'a Card> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return cards.iter().collect();
    }
    cards
        .iter()
        .filter(|card| {
            fields.iter().any(|field| {
                card.text_field(field)
                    .is_some_and(|text| text.to_lowercase().contains(&needle))
            })
        })
        .collect()
}

/// One page of a larger result set.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number actually returned (clamped into range).
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> usize {
        if self.total == 0 {
            1
        } else {
            self.total.div_ceil(self.per_page)
        }
    }
}

/// Slice out one page of `items`. `page` is 1-based; out-of-range pages are
/// clamped to the last page, and `per_page == 0` is treated as 1.
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let total = items.len();
    let last_page = if total == 0 { 1 } else { total.div_ceil(per_page) };
    let page = page.clamp(1, last_page);
    let start = (page - 1) * per_page;
    let end = (start + per_page).min(total);
    Page {
        items: items[start..end].to_vec(),
        page,
        per_page,
        total,
    }
}
