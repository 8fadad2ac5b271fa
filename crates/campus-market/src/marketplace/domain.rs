use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::store::Record;

/// Identifier wrapper shared by every in-memory record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Student,
    Faculty,
    Admin,
}

impl UserRole {
    pub const fn label(self) -> &'static str {
        match self {
            UserRole::Student => "student",
            UserRole::Faculty => "faculty",
            UserRole::Admin => "admin",
        }
    }
}

/// Badge rendered next to a member's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationBadge {
    Email,
    Student,
    Faculty,
}

impl VerificationBadge {
    pub const fn label(self) -> &'static str {
        match self {
            VerificationBadge::Email => "Email Verified",
            VerificationBadge::Student => "Verified Student",
            VerificationBadge::Faculty => "Verified Faculty",
        }
    }
}

/// Campus member acting as seller, landlord, organizer, author, or reporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub avatar: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,
    #[serde(default)]
    pub verified_email: bool,
    #[serde(default)]
    pub verified_student: bool,
    #[serde(default)]
    pub verified_faculty: bool,
}

impl User {
    /// Listing cards show the faculty badge for faculty members and the student badge otherwise.
    pub fn primary_badge(&self) -> VerificationBadge {
        match self.role {
            UserRole::Faculty => VerificationBadge::Faculty,
            UserRole::Student | UserRole::Admin => VerificationBadge::Student,
        }
    }

    pub fn verified_badges(&self) -> Vec<VerificationBadge> {
        let mut badges = Vec::new();
        if self.verified_email {
            badges.push(VerificationBadge::Email);
        }
        if self.verified_student {
            badges.push(VerificationBadge::Student);
        }
        if self.verified_faculty {
            badges.push(VerificationBadge::Faculty);
        }
        badges
    }
}

/// Report bookkeeping carried by every reportable record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationFlags {
    #[serde(default)]
    pub reported: bool,
    #[serde(default)]
    pub report_count: u32,
    #[serde(default)]
    pub suspicious_flags: Vec<String>,
}

impl ModerationFlags {
    pub fn record_report(&mut self) {
        self.reported = true;
        self.report_count = self.report_count.saturating_add(1);
    }
}

/// Marketplace item for sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: RecordId,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub images: Vec<String>,
    pub seller: User,
    pub created_at: DateTime<Utc>,
    pub condition: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    /// Set when the seller edits the listing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub moderation: ModerationFlags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HousingType {
    Apartment,
    House,
    Room,
    Shared,
}

impl HousingType {
    pub const ALL: [HousingType; 4] = [
        HousingType::Apartment,
        HousingType::House,
        HousingType::Room,
        HousingType::Shared,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            HousingType::Apartment => "apartment",
            HousingType::House => "house",
            HousingType::Room => "room",
            HousingType::Shared => "shared",
        }
    }
}

impl FromStr for HousingType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(needle))
            .ok_or_else(|| format!("unknown housing type '{value}'"))
    }
}

/// Rentable housing unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HousingListing {
    pub id: RecordId,
    pub title: String,
    pub description: String,
    pub price: f64,
    #[serde(rename = "type")]
    pub housing_type: HousingType,
    pub location: String,
    pub bedrooms: u8,
    pub bathrooms: f32,
    pub amenities: Vec<String>,
    pub images: Vec<String>,
    pub available: NaiveDate,
    pub landlord: User,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    pub utilities: bool,
    pub pets_allowed: bool,
    pub furnished: bool,
    #[serde(default)]
    pub moderation: ModerationFlags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Active,
    Inactive,
}

impl EventStatus {
    pub const fn label(self) -> &'static str {
        match self {
            EventStatus::Active => "active",
            EventStatus::Inactive => "inactive",
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            EventStatus::Active => EventStatus::Inactive,
            EventStatus::Inactive => EventStatus::Active,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventVisibility {
    Public,
    Private,
}

impl EventVisibility {
    pub const fn label(self) -> &'static str {
        match self {
            EventVisibility::Public => "public",
            EventVisibility::Private => "private",
        }
    }
}

/// Campus event with capacity and visibility controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: RecordId,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub location: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub organizer: User,
    pub category: String,
    pub attendees: Vec<User>,
    pub max_attendees: u32,
    pub registration_deadline: DateTime<Utc>,
    pub eligibility: String,
    pub status: EventStatus,
    pub visibility: EventVisibility,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub department: String,
}

impl Event {
    pub fn registered(&self) -> u32 {
        u32::try_from(self.attendees.len()).unwrap_or(u32::MAX)
    }

    pub fn seats_remaining(&self) -> u32 {
        self.max_attendees.saturating_sub(self.registered())
    }

    /// Started at or before `now`.
    pub fn is_past(&self, now: DateTime<Utc>) -> bool {
        self.date <= now
    }
}

/// Reply attached to a forum thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForumReply {
    pub id: RecordId,
    pub content: String,
    pub author: User,
    pub created_at: DateTime<Utc>,
    pub upvotes: u32,
    pub downvotes: u32,
    #[serde(default)]
    pub moderation: ModerationFlags,
}

/// Discussion thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForumPost {
    pub id: RecordId,
    pub title: String,
    pub content: String,
    pub author: User,
    pub created_at: DateTime<Utc>,
    pub category: String,
    pub tags: Vec<String>,
    pub upvotes: u32,
    pub downvotes: u32,
    #[serde(default)]
    pub liked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub replies: Vec<ForumReply>,
    #[serde(default)]
    pub moderation: ModerationFlags,
}

impl ForumPost {
    /// Net vote score used by the "popular" ordering.
    pub fn score(&self) -> i64 {
        i64::from(self.upvotes) - i64::from(self.downvotes)
    }

    pub fn reply(&self, reply_id: &RecordId) -> Option<&ForumReply> {
        self.replies.iter().find(|reply| &reply.id == reply_id)
    }
}

impl Record for Listing {
    fn record_id(&self) -> &RecordId {
        &self.id
    }
}

impl Record for HousingListing {
    fn record_id(&self) -> &RecordId {
        &self.id
    }
}

impl Record for Event {
    fn record_id(&self) -> &RecordId {
        &self.id
    }
}

impl Record for ForumPost {
    fn record_id(&self) -> &RecordId {
        &self.id
    }
}
