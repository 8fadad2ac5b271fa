use chrono::{DateTime, Utc};

use crate::marketplace::domain::{Event, ForumPost, HousingListing, Listing};

/// Housing attributes the housing filter panel can narrow on.
#[derive(Debug, Clone, Copy)]
pub struct HousingFacts<'a> {
    pub bedrooms: u8,
    pub amenities: &'a [String],
    pub pets_allowed: bool,
    pub furnished: bool,
}

/// Attribute view the catalog engine filters and orders by.
///
/// Records return `None` for attributes they do not carry; a criterion aimed at a missing
/// attribute never matches.
pub trait Searchable {
    fn category(&self) -> Option<&str> {
        None
    }

    fn kind(&self) -> Option<&str> {
        None
    }

    fn condition(&self) -> Option<&str> {
        None
    }

    fn department(&self) -> Option<&str> {
        None
    }

    fn status(&self) -> Option<&str> {
        None
    }

    fn price(&self) -> Option<f64> {
        None
    }

    fn expires_at(&self) -> Option<DateTime<Utc>> {
        None
    }

    fn report_count(&self) -> u32 {
        0
    }

    fn popularity(&self) -> i64 {
        0
    }

    fn housing(&self) -> Option<HousingFacts<'_>> {
        None
    }

    /// Fields scanned by free-text search.
    fn search_fields(&self) -> Vec<&str>;

    /// Instant used by the "newest" ordering.
    fn sort_instant(&self) -> DateTime<Utc>;
}

impl Searchable for Listing {
    fn category(&self) -> Option<&str> {
        Some(&self.category)
    }

    fn condition(&self) -> Option<&str> {
        Some(&self.condition)
    }

    fn price(&self) -> Option<f64> {
        Some(self.price)
    }

    fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    fn report_count(&self) -> u32 {
        self.moderation.report_count
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.title, &self.description]
    }

    fn sort_instant(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Searchable for HousingListing {
    fn kind(&self) -> Option<&str> {
        Some(self.housing_type.label())
    }

    fn price(&self) -> Option<f64> {
        Some(self.price)
    }

    fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    fn report_count(&self) -> u32 {
        self.moderation.report_count
    }

    fn housing(&self) -> Option<HousingFacts<'_>> {
        Some(HousingFacts {
            bedrooms: self.bedrooms,
            amenities: &self.amenities,
            pets_allowed: self.pets_allowed,
            furnished: self.furnished,
        })
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.title, &self.description, &self.location]
    }

    fn sort_instant(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Searchable for ForumPost {
    fn category(&self) -> Option<&str> {
        Some(&self.category)
    }

    fn report_count(&self) -> u32 {
        self.moderation.report_count
    }

    fn popularity(&self) -> i64 {
        self.score()
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.title, &self.content]
    }

    fn sort_instant(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Searchable for Event {
    fn category(&self) -> Option<&str> {
        Some(&self.category)
    }

    fn kind(&self) -> Option<&str> {
        Some(&self.event_type)
    }

    fn department(&self) -> Option<&str> {
        Some(&self.department)
    }

    fn status(&self) -> Option<&str> {
        Some(self.status.label())
    }

    fn popularity(&self) -> i64 {
        i64::from(self.registered())
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.title, &self.description, &self.location]
    }

    // Events carry no creation stamp; newest means latest start.
    fn sort_instant(&self) -> DateTime<Utc> {
        self.date
    }
}
