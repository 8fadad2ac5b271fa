//! Required-field checks behind the create forms.
//!
//! Each draft reports problems as a field → message map so callers can surface them inline,
//! and a draft only turns into a record once that map is empty.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    Event, EventStatus, EventVisibility, ForumPost, Listing, ModerationFlags, RecordId, User,
};

/// Category assigned to posts submitted without one.
pub const DEFAULT_POST_CATEGORY: &str = "general";

/// Field-level validation messages keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    pub fn into_result(self) -> Result<(), FormRejected> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(FormRejected { errors: self })
        }
    }

    fn require(&mut self, field: &'static str, value: &str, message: &str) {
        if value.trim().is_empty() {
            self.insert(field, message);
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// A form submission that did not pass validation; nothing was stored.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("form rejected ({errors})")]
pub struct FormRejected {
    pub errors: FieldErrors,
}

/// Event form state before submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub location: String,
    pub event_type: String,
    pub category: String,
    pub max_attendees: u32,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub eligibility: String,
    pub status: EventStatus,
    pub visibility: EventVisibility,
    pub department: String,
    pub image: Option<String>,
    pub organizer: User,
}

impl EventDraft {
    /// Blank form as first opened: active and public.
    pub fn new(organizer: User) -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            date: None,
            end_date: None,
            location: String::new(),
            event_type: String::new(),
            category: String::new(),
            max_attendees: 0,
            registration_deadline: None,
            eligibility: String::new(),
            status: EventStatus::Active,
            visibility: EventVisibility::Public,
            department: String::new(),
            image: None,
            organizer,
        }
    }

    /// Prefill the form from an existing event for editing.
    pub fn from_event(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            description: event.description.clone(),
            date: Some(event.date),
            end_date: Some(event.end_date),
            location: event.location.clone(),
            event_type: event.event_type.clone(),
            category: event.category.clone(),
            max_attendees: event.max_attendees,
            registration_deadline: Some(event.registration_deadline),
            eligibility: event.eligibility.clone(),
            status: event.status,
            visibility: event.visibility,
            department: event.department.clone(),
            image: event.image.clone(),
            organizer: event.organizer.clone(),
        }
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.require("title", &self.title, "Title is required");
        errors.require("description", &self.description, "Description is required");
        if self.date.is_none() {
            errors.insert("date", "Start date is required");
        }
        if self.end_date.is_none() {
            errors.insert("endDate", "End date is required");
        }
        errors.require("location", &self.location, "Location is required");
        errors.require("type", &self.event_type, "Event type is required");
        if self.max_attendees == 0 {
            errors.insert("maxAttendees", "Valid maximum attendees is required");
        }
        if self.registration_deadline.is_none() {
            errors.insert("registrationDeadline", "Registration deadline is required");
        }
        errors.require(
            "eligibility",
            &self.eligibility,
            "Eligibility criteria is required",
        );
        errors.require("department", &self.department, "Department is required");
        errors
    }

    pub(crate) fn into_event(
        self,
        id: RecordId,
        attendees: Vec<User>,
    ) -> Result<Event, FormRejected> {
        let errors = self.validate();
        match (self.date, self.end_date, self.registration_deadline) {
            (Some(date), Some(end_date), Some(registration_deadline)) if errors.is_empty() => {
                Ok(Event {
                    id,
                    title: self.title,
                    description: self.description,
                    date,
                    end_date,
                    location: self.location,
                    event_type: self.event_type,
                    organizer: self.organizer,
                    category: self.category,
                    attendees,
                    max_attendees: self.max_attendees,
                    registration_deadline,
                    eligibility: self.eligibility,
                    status: self.status,
                    visibility: self.visibility,
                    image: self.image.filter(|url| !url.trim().is_empty()),
                    department: self.department,
                })
            }
            _ => Err(FormRejected { errors }),
        }
    }
}

/// New forum thread as typed into the create-post form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl PostDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.require("title", &self.title, "Title is required");
        errors.require("content", &self.content, "Content is required");
        errors
    }

    pub(crate) fn into_post(
        self,
        id: RecordId,
        author: User,
        created_at: DateTime<Utc>,
    ) -> Result<ForumPost, FormRejected> {
        self.validate().into_result()?;
        let category = if self.category.trim().is_empty() {
            DEFAULT_POST_CATEGORY.to_string()
        } else {
            self.category
        };
        Ok(ForumPost {
            id,
            title: self.title,
            content: self.content,
            author,
            created_at,
            category,
            tags: self.tags,
            upvotes: 0,
            downvotes: 0,
            liked: false,
            image: self.image.filter(|url| !url.trim().is_empty()),
            replies: Vec::new(),
            moderation: ModerationFlags::default(),
        })
    }
}

/// Replies only need content.
pub fn validate_reply(content: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.require("content", content, "Reply content is required");
    errors
}

/// Item posted to the marketplace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingDraft {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub condition: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl ListingDraft {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.require("title", &self.title, "Title is required");
        errors.require("description", &self.description, "Description is required");
        if !self.price.is_finite() || self.price <= 0.0 {
            errors.insert("price", "Price must be greater than 0");
        }
        errors.require("category", &self.category, "Category is required");
        errors.require("condition", &self.condition, "Condition is required");
        if !self.images.iter().any(|image| !image.trim().is_empty()) {
            errors.insert("images", "At least one image is required");
        }
        errors
    }

    /// Pre-filled edit form for an existing listing.
    pub fn from_listing(listing: &Listing) -> Self {
        Self {
            title: listing.title.clone(),
            description: listing.description.clone(),
            price: listing.price,
            category: listing.category.clone(),
            condition: listing.condition.clone(),
            images: listing.images.clone(),
            expires_at: listing.expires_at,
        }
    }

    pub(crate) fn into_listing(
        self,
        id: RecordId,
        seller: User,
        created_at: DateTime<Utc>,
    ) -> Result<Listing, FormRejected> {
        self.validate().into_result()?;
        Ok(Listing {
            id,
            title: self.title,
            description: self.description,
            price: self.price,
            category: self.category,
            images: non_blank(self.images),
            seller,
            created_at,
            updated_at: None,
            condition: self.condition,
            expires_at: self.expires_at,
            moderation: ModerationFlags::default(),
        })
    }

    /// Overwrites the editable fields of `listing`; identity, seller, creation time and
    /// moderation flags stay as they are.
    pub(crate) fn apply_to(
        self,
        listing: &mut Listing,
        updated_at: DateTime<Utc>,
    ) -> Result<(), FormRejected> {
        self.validate().into_result()?;
        listing.title = self.title;
        listing.description = self.description;
        listing.price = self.price;
        listing.category = self.category;
        listing.condition = self.condition;
        listing.images = non_blank(self.images);
        listing.expires_at = self.expires_at;
        listing.updated_at = Some(updated_at);
        Ok(())
    }
}

fn non_blank(images: Vec<String>) -> Vec<String> {
    images
        .into_iter()
        .filter(|image| !image.trim().is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marketplace::domain::{UserId, UserRole};
    use chrono::TimeZone;

    fn organizer() -> User {
        User {
            id: UserId::new("prof1"),
            name: "Dr. Sarah Wilson".to_string(),
            email: "sarah.wilson@university.edu".to_string(),
            role: UserRole::Faculty,
            avatar: String::new(),
            whatsapp: None,
            verified_email: false,
            verified_student: false,
            verified_faculty: true,
        }
    }

    #[test]
    fn blank_event_form_reports_every_required_field() {
        let errors = EventDraft::new(organizer()).validate();
        assert_eq!(errors.len(), 10);
        assert_eq!(errors.get("title"), Some("Title is required"));
        assert_eq!(
            errors.get("maxAttendees"),
            Some("Valid maximum attendees is required")
        );
        assert_eq!(
            errors.get("eligibility"),
            Some("Eligibility criteria is required")
        );
        assert!(!errors.contains("category"));
    }

    #[test]
    fn whitespace_title_counts_as_missing() {
        let mut draft = EventDraft::new(organizer());
        draft.title = "   ".to_string();
        assert!(draft.validate().contains("title"));
    }

    #[test]
    fn post_defaults_to_general_category() {
        let created_at = Utc
            .with_ymd_and_hms(2024, 3, 15, 9, 0, 0)
            .single()
            .expect("valid timestamp");
        let post = PostDraft::new("Study group", "Anyone up for calculus review?")
            .into_post(RecordId::new("post-1"), organizer(), created_at)
            .expect("valid post");
        assert_eq!(post.category, DEFAULT_POST_CATEGORY);
        assert_eq!(post.upvotes, 0);
        assert!(post.replies.is_empty());
    }

    #[test]
    fn listing_requires_price_and_image() {
        let draft = ListingDraft {
            title: "Desk".to_string(),
            description: "Sturdy".to_string(),
            category: "Furniture".to_string(),
            condition: "Good".to_string(),
            images: vec!["  ".to_string()],
            ..ListingDraft::default()
        };
        let errors = draft.validate();
        assert_eq!(errors.get("price"), Some("Price must be greater than 0"));
        assert_eq!(errors.get("images"), Some("At least one image is required"));
        assert_eq!(errors.len(), 2);

        let fractional = ListingDraft {
            price: 0.5,
            images: vec!["https://img/desk.jpg".to_string()],
            ..draft
        };
        assert!(fractional.validate().is_empty());
    }

    #[test]
    fn field_errors_display_in_field_order() {
        let mut errors = FieldErrors::new();
        errors.insert("title", "Title is required");
        errors.insert("date", "Start date is required");
        assert_eq!(
            errors.to_string(),
            "date: Start date is required; title: Title is required"
        );
        assert!(errors.into_result().is_err());
    }
}
