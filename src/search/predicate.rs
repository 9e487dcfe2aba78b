//! Membership predicate shared by every path that filters listings locally.
//!
//! The in-memory catalog and the orchestrator's degraded-mode fallback both
//! call [`matches`], so live and fallback results can never disagree about
//! which records satisfy a [`FilterSet`].

use crate::catalog::SkillListing;

use super::filters::{FilterKey, FilterSet};

/// Availability value meaning a listing is offered both online and in person.
pub const AVAILABILITY_BOTH: &str = "both";

/// Whether `listing` satisfies every constrained dimension of `filters`.
#[must_use]
pub fn matches(listing: &SkillListing, filters: &FilterSet) -> bool {
    filters.iter().all(|(key, wanted)| match key {
        FilterKey::Search => matches_text(listing, wanted),
        FilterKey::Category => exact(&listing.category, wanted),
        FilterKey::SkillLevel => exact(&listing.skill_level, wanted),
        FilterKey::Location => exact(&listing.location, wanted),
        FilterKey::AvailabilityType => matches_availability(&listing.availability_type, wanted),
    })
}

/// Case-insensitive substring match across every searchable text field.
#[must_use]
pub fn matches_text(listing: &SkillListing, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    listing.searchable_text().any(|field| field.to_lowercase().contains(&needle))
}

fn exact(actual: &str, wanted: &str) -> bool {
    actual.trim().to_lowercase() == wanted.trim().to_lowercase()
}

fn matches_availability(offered: &str, wanted: &str) -> bool {
    exact(offered, wanted) || exact(offered, AVAILABILITY_BOTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing() -> SkillListing {
        SkillListing {
            id: "l-1".into(),
            title: "Fingerstyle Guitar".into(),
            description: "Learn travis picking".into(),
            category: "Music".into(),
            skill_level: "intermediate".into(),
            availability_type: "online".into(),
            location: "Berlin".into(),
            teacher: "Ana Costa".into(),
            specialties: vec!["acoustic".into(), "blues".into()],
            rating: 4.7,
        }
    }

    #[test]
    fn empty_filters_match_everything() {
        assert!(matches(&listing(), &FilterSet::new()));
    }

    #[test]
    fn free_text_is_case_insensitive_substring() {
        let l = listing();
        assert!(matches_text(&l, "GUITAR"));
        assert!(matches_text(&l, "travis"));
        assert!(matches_text(&l, "costa"));
        assert!(matches_text(&l, "blue"));
        assert!(!matches_text(&l, "piano"));
    }

    #[test]
    fn structured_dimensions_are_exact() {
        let l = listing();
        assert!(matches(&l, &FilterSet::new().with(FilterKey::Category, "music")));
        assert!(!matches(&l, &FilterSet::new().with(FilterKey::Category, "Mus")));
        assert!(!matches(&l, &FilterSet::new().with(FilterKey::Location, "Berl")));
    }

    #[test]
    fn all_dimensions_must_hold() {
        let l = listing();
        let filters = FilterSet::new()
            .with(FilterKey::Category, "Music")
            .with(FilterKey::SkillLevel, "beginner");
        assert!(!matches(&l, &filters));
    }

    #[test]
    fn both_availability_satisfies_either_mode() {
        let mut l = listing();
        l.availability_type = AVAILABILITY_BOTH.into();
        for wanted in ["online", "in-person", "both"] {
            let filters = FilterSet::new().with(FilterKey::AvailabilityType, wanted);
            assert!(matches(&l, &filters), "{wanted}");
        }

        l.availability_type = "in-person".into();
        let online = FilterSet::new().with(FilterKey::AvailabilityType, "online");
        assert!(!matches(&l, &online));
    }
}
