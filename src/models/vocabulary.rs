use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub const GENRES: [&str; 13] = [
    "Science Fiction",
    "Crime Drama",
    "New York Stories",
    "Psychological Thriller",
    "Action Adventure",
    "Mystery",
    "Romantic Comedy",
    "Musical",
    "Documentary",
    "War Film",
    "Fantasy",
    "Historical Drama",
    "Animated",
];

pub const TIME_PERIODS: [&str; 5] = [
    "Present Day",
    "Mid-20th Century",
    "Future",
    "19th Century",
    "Medieval",
];

pub const LANGUAGES: [&str; 3] = ["Swedish", "English", "Other Languages"];

pub const QUALITY_MARKERS: [&str; 5] = [
    "Cult Classic",
    "Hidden Gem",
    "Critically Acclaimed",
    "Oscar Nominated",
    "Crowd Favorite",
];

pub const MOODS: [&str; 14] = [
    "Thrilling",
    "Feel-good",
    "Philosophical",
    "Dark and Dystopian",
    "Action-packed",
    "Inspiring",
    "Mysterious",
    "Playful",
    "Mind-bending",
    "Humorous",
    "Melancholic",
    "Cozy",
    "Romantic",
    "Nostalgic",
];

/// One of the five preference categories a submitter picks labels from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Genres,
    TimePeriods,
    Languages,
    QualityMarkers,
    Moods,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Genres,
        Category::TimePeriods,
        Category::Languages,
        Category::QualityMarkers,
        Category::Moods,
    ];

    /// The controlled vocabulary labels for this category must come from
    pub fn vocabulary(&self) -> &'static [&'static str] {
        match self {
            Category::Genres => &GENRES,
            Category::TimePeriods => &TIME_PERIODS,
            Category::Languages => &LANGUAGES,
            Category::QualityMarkers => &QUALITY_MARKERS,
            Category::Moods => &MOODS,
        }
    }

    pub fn contains(&self, label: &str) -> bool {
        self.vocabulary().contains(&label)
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Genres => write!(f, "genres"),
            Category::TimePeriods => write!(f, "time_periods"),
            Category::Languages => write!(f, "languages"),
            Category::QualityMarkers => write!(f, "quality_markers"),
            Category::Moods => write!(f, "moods"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_sizes() {
        assert_eq!(Category::Genres.vocabulary().len(), 13);
        assert_eq!(Category::TimePeriods.vocabulary().len(), 5);
        assert_eq!(Category::Languages.vocabulary().len(), 3);
        assert_eq!(Category::QualityMarkers.vocabulary().len(), 5);
        assert_eq!(Category::Moods.vocabulary().len(), 14);
    }

    #[test]
    fn test_contains_is_exact_match() {
        assert!(Category::Moods.contains("Cozy"));
        assert!(!Category::Moods.contains("cozy"));
        assert!(!Category::Genres.contains("Cozy"));
    }

    #[test]
    fn test_category_display_matches_field_names() {
        assert_eq!(Category::QualityMarkers.to_string(), "quality_markers");
        assert_eq!(
            serde_json::to_string(&Category::TimePeriods).unwrap(),
            "\"time_periods\""
        );
    }
}
