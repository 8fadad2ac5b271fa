use campus_market::error::AppError;
use campus_market::marketplace::{Event, ForumPost, HousingListing, Listing};
use serde::Serialize;

pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn listings(listings: &[Listing], as_json: bool) -> Result<(), AppError> {
    if as_json {
        return json(listings);
    }
    println!("Marketplace listings ({})", listings.len());
    for listing in listings {
        println!(
            "- [{}] {} | ${:.2} | {} | {} | {} ({})",
            listing.id,
            listing.title,
            listing.price,
            listing.category,
            listing.condition,
            listing.seller.name,
            listing.seller.primary_badge().label()
        );
    }
    Ok(())
}

pub fn housing(units: &[HousingListing], as_json: bool) -> Result<(), AppError> {
    if as_json {
        return json(units);
    }
    println!("Housing ({})", units.len());
    for unit in units {
        let bedrooms = match unit.bedrooms {
            0 => "studio".to_string(),
            count => format!("{count} bd"),
        };
        println!(
            "- [{}] {} | ${:.2}/mo | {} | {} | {} / {} ba | available {}",
            unit.id,
            unit.title,
            unit.price,
            unit.housing_type.label(),
            unit.location,
            bedrooms,
            unit.bathrooms,
            unit.available
        );
        if !unit.amenities.is_empty() {
            println!("    amenities: {}", unit.amenities.join(", "));
        }
    }
    Ok(())
}

pub fn posts(posts: &[ForumPost], as_json: bool) -> Result<(), AppError> {
    if as_json {
        return json(posts);
    }
    println!("Forum ({})", posts.len());
    for post in posts {
        println!(
            "- [{}] {} | {} | score {} | {} replies | by {}",
            post.id,
            post.title,
            post.category,
            post.score(),
            post.replies.len(),
            post.author.name
        );
    }
    Ok(())
}

pub fn events(events: &[Event], as_json: bool) -> Result<(), AppError> {
    if as_json {
        return json(events);
    }
    println!("Events ({})", events.len());
    for event in events {
        println!(
            "- [{}] {} | {} | {} | {} | {}/{} registered | {}",
            event.id,
            event.title,
            event.event_type,
            event.date.format("%Y-%m-%d %H:%M"),
            event.location,
            event.registered(),
            event.max_attendees,
            event.status.label()
        );
    }
    Ok(())
}
