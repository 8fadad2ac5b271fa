//! Filter and sort engine shared by listings, housing, forum posts, and events.
//!
//! Every browse call is a linear scan of the collection snapshot followed by a stable sort, so
//! records that compare equal keep their collection order.

mod criteria;

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use criteria::{HousingFacts, Searchable};

use super::store::{Record, RecordRepository, RepositoryError};

/// Value the filter dropdowns use for "no restriction".
pub const ALL_SELECTION: &str = "all";

/// Map a dropdown selection to an equality filter; `all` and blanks disable the filter.
pub fn selection(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL_SELECTION) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    Popularity,
}

impl SortKey {
    pub const fn label(self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::PriceAsc => "price-asc",
            SortKey::PriceDesc => "price-desc",
            SortKey::Popularity => "popularity",
        }
    }

    fn compare<T: Searchable>(self, left: &T, right: &T) -> Ordering {
        match self {
            SortKey::Newest => right.sort_instant().cmp(&left.sort_instant()),
            SortKey::PriceAsc => priced_first(left.price(), right.price(), |a, b| a.total_cmp(&b)),
            SortKey::PriceDesc => priced_first(left.price(), right.price(), |a, b| b.total_cmp(&a)),
            SortKey::Popularity => right.popularity().cmp(&left.popularity()),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "newest" => Ok(SortKey::Newest),
            "price-asc" => Ok(SortKey::PriceAsc),
            "price-desc" => Ok(SortKey::PriceDesc),
            "popularity" | "popular" => Ok(SortKey::Popularity),
            other => Err(format!(
                "unknown sort key '{other}' (expected newest, price-asc, price-desc, popularity)"
            )),
        }
    }
}

// Unpriced records trail priced ones in either direction.
fn priced_first(
    left: Option<f64>,
    right: Option<f64>,
    order: impl Fn(f64, f64) -> Ordering,
) -> Ordering {
    match (left, right) {
        (Some(a), Some(b)) => order(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Criteria object applied to any [`Searchable`] collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogQuery {
    pub category: Option<String>,
    pub kind: Option<String>,
    pub condition: Option<String>,
    pub department: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_bedrooms: Option<u8>,
    #[serde(default)]
    pub amenities: Vec<String>,
    pub pets_allowed: Option<bool>,
    pub furnished: Option<bool>,
    /// Drop records whose expiry is at or before this instant.
    pub active_at: Option<DateTime<Utc>>,
    /// Drop records reported at least this many times.
    pub hide_reported_at: Option<u32>,
    #[serde(default)]
    pub sort: SortKey,
}

impl CatalogQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, value: &str) -> Self {
        self.category = selection(value);
        self
    }

    pub fn kind(mut self, value: &str) -> Self {
        self.kind = selection(value);
        self
    }

    pub fn condition(mut self, value: &str) -> Self {
        self.condition = selection(value);
        self
    }

    pub fn department(mut self, value: &str) -> Self {
        self.department = selection(value);
        self
    }

    pub fn status(mut self, value: &str) -> Self {
        self.status = selection(value);
        self
    }

    pub fn search(mut self, value: &str) -> Self {
        let trimmed = value.trim();
        self.search = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    pub fn price_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    pub fn sort(mut self, key: SortKey) -> Self {
        self.sort = key;
        self
    }

    pub fn matches<T: Searchable>(&self, record: &T) -> bool {
        equals(&self.category, record.category())
            && equals(&self.kind, record.kind())
            && equals(&self.condition, record.condition())
            && equals(&self.department, record.department())
            && equals(&self.status, record.status())
            && self.matches_search(record)
            && self.matches_price(record)
            && self.matches_housing(record)
            && self.matches_lifecycle(record)
    }

    /// Filter then order; the input slice is left untouched.
    pub fn apply<T: Searchable + Clone>(&self, records: &[T]) -> Vec<T> {
        let mut selected: Vec<T> = records
            .iter()
            .filter(|record| self.matches(*record))
            .cloned()
            .collect();
        let key = self.sort;
        selected.sort_by(|left, right| key.compare(left, right));
        selected
    }

    fn matches_search<T: Searchable>(&self, record: &T) -> bool {
        let Some(needle) = self.search.as_deref() else {
            return true;
        };
        let needle = needle.to_lowercase();
        record
            .search_fields()
            .into_iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    fn matches_price<T: Searchable>(&self, record: &T) -> bool {
        if self.min_price.is_none() && self.max_price.is_none() {
            return true;
        }
        let Some(price) = record.price() else {
            return false;
        };
        self.min_price.map_or(true, |min| price >= min)
            && self.max_price.map_or(true, |max| price <= max)
    }

    fn matches_housing<T: Searchable>(&self, record: &T) -> bool {
        let wants_housing = self.min_bedrooms.is_some()
            || !self.amenities.is_empty()
            || self.pets_allowed.is_some()
            || self.furnished.is_some();
        if !wants_housing {
            return true;
        }
        let Some(facts) = record.housing() else {
            return false;
        };

        self.min_bedrooms.map_or(true, |min| facts.bedrooms >= min)
            && self.pets_allowed.map_or(true, |wanted| facts.pets_allowed == wanted)
            && self.furnished.map_or(true, |wanted| facts.furnished == wanted)
            && self.amenities.iter().all(|wanted| {
                facts
                    .amenities
                    .iter()
                    .any(|have| have.eq_ignore_ascii_case(wanted))
            })
    }

    fn matches_lifecycle<T: Searchable>(&self, record: &T) -> bool {
        let unexpired = match (self.active_at, record.expires_at()) {
            (Some(now), Some(expires_at)) => expires_at > now,
            _ => true,
        };
        let visible = self
            .hide_reported_at
            .map_or(true, |threshold| record.report_count() < threshold);
        unexpired && visible
    }
}

fn equals(wanted: &Option<String>, actual: Option<&str>) -> bool {
    match wanted {
        None => true,
        Some(wanted) => actual == Some(wanted.as_str()),
    }
}

/// Snapshot a repository and run the query over it.
pub fn browse<T, R>(repository: &R, query: &CatalogQuery) -> Result<Vec<T>, RepositoryError>
where
    T: Record + Searchable,
    R: RecordRepository<T> + ?Sized,
{
    let snapshot = repository.all()?;
    Ok(query.apply(&snapshot))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_treats_all_as_unfiltered() {
        assert_eq!(selection("all"), None);
        assert_eq!(selection("  "), None);
        assert_eq!(selection("Textbooks"), Some("Textbooks".to_string()));
    }

    #[test]
    fn sort_key_accepts_ui_spellings() {
        assert_eq!("popular".parse::<SortKey>(), Ok(SortKey::Popularity));
        assert_eq!("price_desc".parse::<SortKey>(), Ok(SortKey::PriceDesc));
        assert_eq!("Newest".parse::<SortKey>(), Ok(SortKey::Newest));
        assert!("cheapest".parse::<SortKey>().is_err());
    }

    #[test]
    fn unpriced_records_trail_in_both_directions() {
        assert_eq!(
            priced_first(None, Some(5.0), |a, b| a.total_cmp(&b)),
            Ordering::Greater
        );
        assert_eq!(
            priced_first(Some(5.0), None, |a, b| b.total_cmp(&a)),
            Ordering::Less
        );
    }
}
