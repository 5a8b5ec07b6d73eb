//! Catalog browsing: search, sort, genres and paging limits.

use std::collections::BTreeSet;

use crate::status::define_status_enum;
use crate::types::{Amount, Timestamp};

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

/// Featured beats shown on the storefront.
pub const FEATURED_LIMIT: usize = 6;

/// Trending beats shown on the storefront.
pub const TRENDING_LIMIT: usize = 10;

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 100;

/// Longest accepted search query.
pub const MAX_SEARCH_LENGTH: usize = 200;

define_status_enum! {
    /// Storefront sort order.
    CatalogSort {
        Newest = "newest",
        Popular = "popular",
        PriceLow = "price_low",
        PriceHigh = "price_high",
    }
}

impl Default for CatalogSort {
    fn default() -> Self {
        CatalogSort::Newest
    }
}

/* --------------------------------------------------------------------------
Listing trait
-------------------------------------------------------------------------- */

/// What the catalog needs to know about a listed item.
pub trait CatalogListing {
    fn title(&self) -> &str;
    fn artist(&self) -> &str;
    fn tags(&self) -> &[String];
    fn created_at(&self) -> Timestamp;
    fn plays(&self) -> u64;
    fn base_price(&self) -> Amount;
}

/// Case-insensitive match of `query` against title, artist and tags.
/// A blank query matches everything.
pub fn matches_search<T: CatalogListing + ?Sized>(item: &T, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    item.title().to_lowercase().contains(&needle)
        || item.artist().to_lowercase().contains(&needle)
        || item.tags().iter().any(|t| t.to_lowercase().contains(&needle))
}

/// Sort in place. Ties keep their incoming order.
pub fn sort_listings<T: CatalogListing>(items: &mut [T], sort: CatalogSort) {
    match sort {
        CatalogSort::Newest => items.sort_by(|a, b| b.created_at().cmp(&a.created_at())),
        CatalogSort::Popular => items.sort_by(|a, b| b.plays().cmp(&a.plays())),
        CatalogSort::PriceLow => items.sort_by(|a, b| a.base_price().total_cmp(&b.base_price())),
        CatalogSort::PriceHigh => items.sort_by(|a, b| b.base_price().total_cmp(&a.base_price())),
    }
}

/// Filter by search query, then sort.
pub fn browse<T: CatalogListing>(mut items: Vec<T>, query: Option<&str>, sort: CatalogSort) -> Vec<T> {
    if let Some(q) = query {
        items.retain(|item| matches_search(item, q));
    }
    sort_listings(&mut items, sort);
    items
}

/// Distinct non-empty genres, sorted.
pub fn distinct_genres<'a, I>(genres: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    genres
        .into_iter()
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Clamp a requested page size into `1..=MAX_PAGE_SIZE`.
pub fn clamp_page_size(requested: Option<usize>) -> usize {
    requested.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
}

pub fn validate_search(query: &str) -> Result<(), String> {
    if query.chars().count() > MAX_SEARCH_LENGTH {
        return Err(format!(
            "Search query must not exceed {MAX_SEARCH_LENGTH} characters"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Item {
        title: &'static str,
        artist: &'static str,
        tags: Vec<String>,
        created_at: Timestamp,
        plays: u64,
        price: Amount,
    }

    impl CatalogListing for Item {
        fn title(&self) -> &str {
            self.title
        }
        fn artist(&self) -> &str {
            self.artist
        }
        fn tags(&self) -> &[String] {
            &self.tags
        }
        fn created_at(&self) -> Timestamp {
            self.created_at
        }
        fn plays(&self) -> u64 {
            self.plays
        }
        fn base_price(&self) -> Amount {
            self.price
        }
    }

    fn ts(value: &str) -> Timestamp {
        chrono::DateTime::parse_from_rfc3339(value).unwrap().to_utc()
    }

    fn items() -> Vec<Item> {
        vec![
            Item {
                title: "Night Drive",
                artist: "Jay",
                tags: vec!["dark".into(), "trap".into()],
                created_at: ts("2024-01-01T00:00:00.000000Z"),
                plays: 50,
                price: 39.0,
            },
            Item {
                title: "Sunrise",
                artist: "Rue",
                tags: vec!["chill".into()],
                created_at: ts("2024-03-01T00:00:00.000000Z"),
                plays: 120,
                price: 19.0,
            },
            Item {
                title: "Cold Steel",
                artist: "Jay",
                tags: vec![],
                created_at: ts("2024-02-01T00:00:00.000000Z"),
                plays: 5,
                price: 59.0,
            },
        ]
    }

    fn titles(items: &[Item]) -> Vec<&str> {
        items.iter().map(|i| i.title).collect()
    }

    #[test]
    fn search_is_case_insensitive_over_title_artist_tags() {
        let all = items();
        assert!(matches_search(&all[0], "night"));
        assert!(matches_search(&all[0], "JAY"));
        assert!(matches_search(&all[0], "Trap"));
        assert!(!matches_search(&all[1], "trap"));
        assert!(matches_search(&all[1], "   "));
    }

    #[test]
    fn sort_orders() {
        assert_eq!(
            titles(&browse(items(), None, CatalogSort::Newest)),
            ["Sunrise", "Cold Steel", "Night Drive"]
        );
        assert_eq!(
            titles(&browse(items(), None, CatalogSort::Popular)),
            ["Sunrise", "Night Drive", "Cold Steel"]
        );
        assert_eq!(
            titles(&browse(items(), None, CatalogSort::PriceLow)),
            ["Sunrise", "Night Drive", "Cold Steel"]
        );
        assert_eq!(
            titles(&browse(items(), None, CatalogSort::PriceHigh)),
            ["Cold Steel", "Night Drive", "Sunrise"]
        );
    }

    #[test]
    fn browse_filters_then_sorts() {
        let result = browse(items(), Some("jay"), CatalogSort::PriceHigh);
        assert_eq!(titles(&result), ["Cold Steel", "Night Drive"]);
    }

    #[test]
    fn genres_are_distinct_and_sorted() {
        let genres = distinct_genres(["Trap", "Drill", "Trap", "", " Afro "]);
        assert_eq!(genres, ["Afro", "Drill", "Trap"]);
    }

    #[test]
    fn page_size_clamped() {
        assert_eq!(clamp_page_size(None), DEFAULT_PAGE_SIZE);
        assert_eq!(clamp_page_size(Some(0)), 1);
        assert_eq!(clamp_page_size(Some(5000)), MAX_PAGE_SIZE);
    }

    #[test]
    fn default_sort_is_newest() {
        assert_eq!(CatalogSort::default(), CatalogSort::Newest);
    }
}
