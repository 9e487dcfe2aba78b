use crate::catalog::SkillListing;

/// Minimal listing in `category`; other fields are fixed.
#[must_use]
pub fn listing(id: &str, category: &str) -> SkillListing {
    SkillListing {
        id: id.to_string(),
        title: format!("Listing {id}"),
        description: String::new(),
        category: category.to_string(),
        skill_level: "beginner".to_string(),
        availability_type: "online".to_string(),
        location: "Remote".to_string(),
        teacher: "Test Teacher".to_string(),
        specialties: Vec::new(),
        rating: 4.0,
    }
}

#[allow(clippy::too_many_arguments)]
fn full(
    id: &str,
    title: &str,
    category: &str,
    level: &str,
    availability: &str,
    location: &str,
    teacher: &str,
    specialties: &[&str],
    rating: f64,
) -> SkillListing {
    SkillListing {
        id: id.to_string(),
        title: title.to_string(),
        description: format!("{title} with {teacher}"),
        category: category.to_string(),
        skill_level: level.to_string(),
        availability_type: availability.to_string(),
        location: location.to_string(),
        teacher: teacher.to_string(),
        specialties: specialties.iter().map(ToString::to_string).collect(),
        rating,
    }
}

/// Fourteen listings spread over four categories, every availability value
/// and a handful of locations.
#[must_use]
pub fn sample_listings() -> Vec<SkillListing> {
    vec![
        full("s-01", "Guitar for Beginners", "Music", "beginner", "online", "Berlin", "Ana Costa", &["acoustic", "folk"], 4.8),
        full("s-02", "Jazz Piano Voicings", "Music", "advanced", "in-person", "Lisbon", "Marcus Lee", &["jazz", "harmony"], 4.6),
        full("s-03", "Cooking Basics", "Cooking", "beginner", "both", "Berlin", "Priya Nair", &["knife skills"], 4.5),
        full("s-04", "Fingerstyle Guitar", "Music", "intermediate", "both", "Lisbon", "Ana Costa", &["fingerpicking"], 4.9),
        full("s-05", "Spanish Conversation", "Languages", "intermediate", "online", "Madrid", "Lucía Gómez", &["grammar", "travel"], 4.4),
        full("s-06", "Artisan Bread", "Cooking", "intermediate", "in-person", "Paris", "Jean Martin", &["sourdough", "pastry"], 4.7),
        full("s-07", "Watercolor Landscapes", "Art", "beginner", "online", "Oslo", "Ingrid Berg", &["painting"], 4.3),
        full("s-08", "Music Theory 101", "Music", "beginner", "online", "Remote", "Marcus Lee", &["ear training"], 4.2),
        full("s-09", "Japanese for Travelers", "Languages", "beginner", "both", "Tokyo", "Kenji Sato", &["kana"], 4.6),
        full("s-10", "Portrait Drawing", "Art", "intermediate", "in-person", "Berlin", "Ingrid Berg", &["charcoal"], 4.1),
        full("s-11", "Thai Street Food", "Cooking", "advanced", "online", "Bangkok", "Priya Nair", &["curry"], 4.9),
        full("s-12", "Songwriting Workshop", "Music", "intermediate", "online", "Remote", "Ana Costa", &["lyrics"], 4.5),
        full("s-13", "French Grammar Deep Dive", "Languages", "advanced", "in-person", "Paris", "Jean Martin", &["grammar"], 4.0),
        full("s-14", "Abstract Acrylics", "Art", "advanced", "both", "Oslo", "Ingrid Berg", &["acrylic"], 4.4),
    ]
}
