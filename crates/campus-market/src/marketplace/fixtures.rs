//! Seed data loaded into the in-memory collections at startup.
//!
//! Collections are returned newest first, the order the pages list them in.

use chrono::{DateTime, NaiveDate, Utc};

use super::domain::{
    Event, EventStatus, EventVisibility, ForumPost, ForumReply, HousingListing, HousingType,
    Listing, ModerationFlags, RecordId, User, UserId, UserRole,
};

const AVATAR_JOHN: &str =
    "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e?auto=format&fit=crop&w=100&q=80";
const AVATAR_EMMA: &str =
    "https://images.unsplash.com/photo-1438761681033-6461ffad8d80?auto=format&fit=crop&w=100&q=80";
const AVATAR_MIKE: &str =
    "https://images.unsplash.com/photo-1500648767791-00dcc994a43e?auto=format&fit=crop&w=100&q=80";
const AVATAR_SARAH: &str =
    "https://images.unsplash.com/photo-1494790108377-be9c29b29330?auto=format&fit=crop&w=100&q=80";
const AVATAR_ALEX: &str =
    "https://images.unsplash.com/photo-1539571696357-5a69c17a67c6?auto=format&fit=crop&w=100&q=80";

/// Known members, looked up by email when importing listings.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: Vec<User>,
}

impl UserDirectory {
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }

    pub fn find_by_email(&self, email: &str) -> Option<&User> {
        let needle = email.trim();
        self.users
            .iter()
            .find(|user| user.email.eq_ignore_ascii_case(needle))
    }

}

fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, second))
        .map(|naive| naive.and_utc())
        .unwrap_or_default()
}

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn member(id: &str, name: &str, email: &str, role: UserRole, avatar: &str) -> User {
    User {
        id: UserId::new(id),
        name: name.to_string(),
        email: email.to_string(),
        role,
        avatar: avatar.to_string(),
        whatsapp: None,
        verified_email: true,
        verified_student: role == UserRole::Student,
        verified_faculty: role == UserRole::Faculty,
    }
}

pub fn john_doe() -> User {
    User {
        whatsapp: Some("+15550100".to_string()),
        ..member(
            "1",
            "John Doe",
            "john@university.edu",
            UserRole::Student,
            AVATAR_JOHN,
        )
    }
}

pub fn emma_smith() -> User {
    member(
        "2",
        "Emma Smith",
        "emma@university.edu",
        UserRole::Student,
        AVATAR_EMMA,
    )
}

pub fn mike_roberts() -> User {
    member(
        "3",
        "Mike Roberts",
        "mike@university.edu",
        UserRole::Student,
        AVATAR_MIKE,
    )
}

pub fn sarah_wilson() -> User {
    member(
        "prof1",
        "Dr. Sarah Wilson",
        "sarah.wilson@university.edu",
        UserRole::Faculty,
        AVATAR_SARAH,
    )
}

pub fn michael_brown() -> User {
    member(
        "prof2",
        "Prof. Michael Brown",
        "michael.brown@university.edu",
        UserRole::Faculty,
        AVATAR_JOHN,
    )
}

pub fn alex_chen() -> User {
    member(
        "student1",
        "Alex Chen",
        "alex@university.edu",
        UserRole::Student,
        AVATAR_ALEX,
    )
}

pub fn john_smith_landlord() -> User {
    member(
        "landlord1",
        "John Smith",
        "john@property.com",
        UserRole::Admin,
        AVATAR_JOHN,
    )
}

pub fn sarah_johnson_landlord() -> User {
    member(
        "landlord2",
        "Sarah Johnson",
        "sarah@realty.com",
        UserRole::Admin,
        AVATAR_EMMA,
    )
}

/// The member acting in the demo and as default reply author.
pub fn current_user() -> User {
    User {
        verified_email: false,
        verified_student: false,
        ..member(
            "current-user",
            "Current User",
            "user@university.edu",
            UserRole::Student,
            AVATAR_JOHN,
        )
    }
}

pub fn directory() -> UserDirectory {
    UserDirectory::new(vec![
        john_doe(),
        emma_smith(),
        mike_roberts(),
        sarah_wilson(),
        michael_brown(),
        alex_chen(),
        john_smith_landlord(),
        sarah_johnson_landlord(),
        current_user(),
    ])
}

pub fn listings() -> Vec<Listing> {
    vec![
        Listing {
            id: RecordId::new("1"),
            title: "Calculus Textbook".to_string(),
            description: "Calculus: Early Transcendentals 8th Edition. Like new condition, no highlights or marks.".to_string(),
            price: 45.0,
            category: "Textbooks".to_string(),
            images: vec!["https://images.unsplash.com/photo-1544716278-ca5e3f4abd8c?auto=format&fit=crop&w=400&q=80".to_string()],
            seller: john_doe(),
            created_at: utc(2024, 3, 10, 12, 0, 0),
            condition: "Like New".to_string(),
            updated_at: None,
            expires_at: None,
            moderation: ModerationFlags::default(),
        },
        Listing {
            id: RecordId::new("2"),
            title: "Study Desk".to_string(),
            description: "Sturdy wooden desk perfect for studying. Includes built-in lamp and drawer.".to_string(),
            price: 80.0,
            category: "Furniture".to_string(),
            images: vec!["https://images.unsplash.com/photo-1518455027359-f3f8164ba6bd?auto=format&fit=crop&w=400&q=80".to_string()],
            seller: emma_smith(),
            created_at: utc(2024, 3, 9, 15, 30, 0),
            condition: "Good".to_string(),
            updated_at: None,
            expires_at: None,
            moderation: ModerationFlags::default(),
        },
        Listing {
            id: RecordId::new("3"),
            title: "MacBook Pro 2019".to_string(),
            description: "13-inch, 16GB RAM, 512GB SSD. Perfect for programming and design work.".to_string(),
            price: 800.0,
            category: "Electronics".to_string(),
            images: vec!["https://images.unsplash.com/photo-1517336714731-489689fd1ca8?auto=format&fit=crop&w=400&q=80".to_string()],
            seller: mike_roberts(),
            created_at: utc(2024, 3, 8, 9, 15, 0),
            condition: "Excellent".to_string(),
            updated_at: None,
            expires_at: None,
            moderation: ModerationFlags::default(),
        },
    ]
}

pub fn housing() -> Vec<HousingListing> {
    vec![
        HousingListing {
            id: RecordId::new("1"),
            title: "Modern Studio Apartment Near Campus".to_string(),
            description: "Fully furnished studio apartment just 5 minutes walk from main campus. Perfect for students.".to_string(),
            price: 800.0,
            housing_type: HousingType::Apartment,
            location: "123 College Ave".to_string(),
            bedrooms: 0,
            bathrooms: 1.0,
            amenities: ["WiFi", "Air Conditioning", "Laundry", "Parking"]
                .into_iter()
                .map(String::from)
                .collect(),
            images: vec!["https://images.unsplash.com/photo-1522708323590-d24dbb6b0267?auto=format&fit=crop&w=400&q=80".to_string()],
            available: day(2024, 4, 1),
            landlord: john_smith_landlord(),
            created_at: utc(2024, 3, 10, 12, 0, 0),
            expires_at: None,
            utilities: true,
            pets_allowed: false,
            furnished: true,
            moderation: ModerationFlags::default(),
        },
        HousingListing {
            id: RecordId::new("2"),
            title: "2BR Townhouse with Backyard".to_string(),
            description: "Spacious 2-bedroom townhouse with private backyard. Recently renovated kitchen and bathrooms.".to_string(),
            price: 1200.0,
            housing_type: HousingType::House,
            location: "456 University Dr".to_string(),
            bedrooms: 2,
            bathrooms: 1.5,
            amenities: ["Backyard", "Dishwasher", "Central Heating", "Storage"]
                .into_iter()
                .map(String::from)
                .collect(),
            images: vec!["https://images.unsplash.com/photo-1580587771525-78b9dba3b914?auto=format&fit=crop&w=400&q=80".to_string()],
            available: day(2024, 5, 1),
            landlord: sarah_johnson_landlord(),
            created_at: utc(2024, 3, 9, 15, 30, 0),
            expires_at: None,
            utilities: false,
            pets_allowed: true,
            furnished: false,
            moderation: ModerationFlags::default(),
        },
    ]
}

pub fn forum_posts() -> Vec<ForumPost> {
    vec![
        ForumPost {
            id: RecordId::new("1"),
            title: "Important: Final Exam Schedule Changes".to_string(),
            content: "Due to the upcoming campus event, there have been some adjustments to the final exam schedule. Please check the updated timetable on the student portal.".to_string(),
            author: sarah_wilson(),
            created_at: utc(2024, 3, 15, 9, 0, 0),
            category: "announcements".to_string(),
            tags: vec!["exams".to_string(), "important".to_string()],
            upvotes: 45,
            downvotes: 0,
            liked: false,
            image: Some("https://images.unsplash.com/photo-1522661067900-ab829854a57f?auto=format&fit=crop&w=800&q=80".to_string()),
            replies: vec![ForumReply {
                id: RecordId::new("r1"),
                content: "Thank you for the update! Will the changes affect all departments?".to_string(),
                author: alex_chen(),
                created_at: utc(2024, 3, 15, 9, 15, 0),
                upvotes: 2,
                downvotes: 0,
                moderation: ModerationFlags::default(),
            }],
            moderation: ModerationFlags::default(),
        },
        ForumPost {
            id: RecordId::new("2"),
            title: "Calculus II study group".to_string(),
            content: "Looking for people to review integration techniques before the midterm. Library room 3B, Thursdays.".to_string(),
            author: alex_chen(),
            created_at: utc(2024, 3, 14, 18, 30, 0),
            category: "academic".to_string(),
            tags: vec!["study-group".to_string(), "math".to_string()],
            upvotes: 12,
            downvotes: 1,
            liked: false,
            image: None,
            replies: Vec::new(),
            moderation: ModerationFlags::default(),
        },
        ForumPost {
            id: RecordId::new("3"),
            title: "Lost and found: blue water bottle".to_string(),
            content: "Left a blue water bottle in the engineering building lobby. Let me know if you picked it up.".to_string(),
            author: emma_smith(),
            created_at: utc(2024, 3, 13, 11, 5, 0),
            category: "general".to_string(),
            tags: Vec::new(),
            upvotes: 3,
            downvotes: 0,
            liked: false,
            image: None,
            replies: Vec::new(),
            moderation: ModerationFlags::default(),
        },
    ]
}

pub fn events() -> Vec<Event> {
    vec![
        Event {
            id: RecordId::new("1"),
            title: "Annual Tech Hackathon 2024".to_string(),
            description: "Join us for 24 hours of coding, innovation, and fun! Build solutions for real-world problems.".to_string(),
            date: utc(2024, 4, 15, 9, 0, 0),
            end_date: utc(2024, 4, 16, 9, 0, 0),
            location: "Engineering Building, Room 201".to_string(),
            event_type: "hackathon".to_string(),
            organizer: sarah_wilson(),
            category: "Technology".to_string(),
            attendees: Vec::new(),
            max_attendees: 100,
            registration_deadline: utc(2024, 4, 10, 23, 59, 59),
            eligibility: "All undergraduate students".to_string(),
            status: EventStatus::Active,
            visibility: EventVisibility::Public,
            image: Some("https://images.unsplash.com/photo-1504384308090-c894fdcc538d?auto=format&fit=crop&w=800&q=80".to_string()),
            department: "Computer Science".to_string(),
        },
        Event {
            id: RecordId::new("2"),
            title: "Research Workshop Series".to_string(),
            description: "Learn essential research methodologies and paper writing techniques.".to_string(),
            date: utc(2024, 4, 20, 14, 0, 0),
            end_date: utc(2024, 4, 20, 17, 0, 0),
            location: "Online (Zoom)".to_string(),
            event_type: "workshop".to_string(),
            organizer: michael_brown(),
            category: "Academic".to_string(),
            attendees: Vec::new(),
            max_attendees: 50,
            registration_deadline: utc(2024, 4, 18, 23, 59, 59),
            eligibility: "Graduate students and faculty".to_string(),
            status: EventStatus::Active,
            visibility: EventVisibility::Public,
            image: Some("https://images.unsplash.com/photo-1524178232363-1fb2b075b655?auto=format&fit=crop&w=800&q=80".to_string()),
            department: "Research Department".to_string(),
        },
    ]
}
