//! Closed catalog of thematic interest tags (UN Sustainable Development Goals).

use std::collections::HashSet;

use serde::Serialize;

/// Goal numbers accepted on profiles and opportunities.
pub const SUPPORTED_TAGS: [u8; 4] = [4, 8, 10, 17];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InterestTag {
    pub number: u8,
    pub title: &'static str,
    pub short: &'static str,
    pub description: &'static str,
}

const CATALOG: [InterestTag; 4] = [
    InterestTag {
        number: 4,
        title: "Quality Education",
        short: "Skills for Employment",
        description: "Target 4.4: increase relevant skills for decent jobs and entrepreneurship.",
    },
    InterestTag {
        number: 8,
        title: "Decent Work and Economic Growth",
        short: "Decent Work",
        description: "Promote youth access to decent and productive work opportunities.",
    },
    InterestTag {
        number: 10,
        title: "Reduced Inequalities",
        short: "Reduced Inequalities",
        description: "Enable fair, skills-based access to opportunities.",
    },
    InterestTag {
        number: 17,
        title: "Partnerships for the Goals",
        short: "Partnerships",
        description: "Connect students, startups, and NGOs for shared SDG impact.",
    },
];

impl InterestTag {
    pub fn lookup(number: u8) -> Option<&'static InterestTag> {
        CATALOG.iter().find(|tag| tag.number == number)
    }

    pub fn is_supported(number: u8) -> bool {
        SUPPORTED_TAGS.contains(&number)
    }

    pub fn catalog() -> &'static [InterestTag] {
        &CATALOG
    }

    pub fn label(number: u8) -> String {
        match Self::lookup(number) {
            Some(tag) => format!("SDG {} - {}", tag.number, tag.short),
            None => format!("SDG {number}"),
        }
    }

    pub fn description(number: u8) -> &'static str {
        Self::lookup(number)
            .map(|tag| tag.description)
            .unwrap_or("Unsupported SDG")
    }
}

/// Drops unsupported and repeated tags, keeping first-seen order.
pub fn normalize_tags(values: &[u8]) -> Vec<u8> {
    let mut seen = HashSet::new();
    values
        .iter()
        .copied()
        .filter(|value| InterestTag::is_supported(*value) && seen.insert(*value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_matches_supported_numbers() {
        let numbers: Vec<u8> = InterestTag::catalog().iter().map(|tag| tag.number).collect();
        assert_eq!(numbers, SUPPORTED_TAGS.to_vec());
    }

    #[test]
    fn normalize_filters_unknown_and_duplicate_tags() {
        assert_eq!(normalize_tags(&[8, 3, 17, 8, 42, 4]), vec![8, 17, 4]);
        assert!(normalize_tags(&[]).is_empty());
    }

    #[test]
    fn labels_fall_back_for_unsupported_numbers() {
        assert_eq!(InterestTag::label(8), "SDG 8 - Decent Work");
        assert_eq!(InterestTag::label(13), "SDG 13");
        assert_eq!(InterestTag::description(13), "Unsupported SDG");
        assert!(InterestTag::description(10).contains("skills-based"));
    }
}
