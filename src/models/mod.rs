use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

pub mod analysis;
pub mod chart;
pub mod recommendation;
pub mod vocabulary;

pub use analysis::{AggregateResult, CorrelationTable, DailySubmissions, LabelShare};
pub use chart::{ChartData, ChartKind, ChartPoint, ChartSpec};
pub use recommendation::{GenerationRequest, Recommendation};
pub use vocabulary::Category;

/// The labels one person picked in each preference category
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CategorySelections {
    pub genres: Vec<String>,
    pub time_periods: Vec<String>,
    pub languages: Vec<String>,
    pub quality_markers: Vec<String>,
    pub moods: Vec<String>,
}

impl CategorySelections {
    /// Labels selected for the given category
    pub fn get(&self, category: Category) -> &[String] {
        match category {
            Category::Genres => &self.genres,
            Category::TimePeriods => &self.time_periods,
            Category::Languages => &self.languages,
            Category::QualityMarkers => &self.quality_markers,
            Category::Moods => &self.moods,
        }
    }

    fn get_mut(&mut self, category: Category) -> &mut Vec<String> {
        match category {
            Category::Genres => &mut self.genres,
            Category::TimePeriods => &mut self.time_periods,
            Category::Languages => &mut self.languages,
            Category::QualityMarkers => &mut self.quality_markers,
            Category::Moods => &mut self.moods,
        }
    }

    /// Checks every category against its vocabulary and drops repeated labels.
    ///
    /// Each category must have at least one label, and each label must come from
    /// the category's controlled vocabulary.
    pub fn validate(mut self) -> AppResult<Self> {
        for category in Category::ALL {
            let labels = self.get_mut(category);
            if labels.is_empty() {
                return Err(AppError::InvalidInput(format!(
                    "{} must contain at least one selection",
                    category
                )));
            }

            if let Some(unknown) = labels.iter().find(|l| !category.contains(l)) {
                return Err(AppError::InvalidInput(format!(
                    "Unknown {} label: {}",
                    category, unknown
                )));
            }

            let mut seen = Vec::with_capacity(labels.len());
            labels.retain(|label| {
                if seen.contains(label) {
                    false
                } else {
                    seen.push(label.clone());
                    true
                }
            });
        }

        Ok(self)
    }
}

/// A stored preference submission
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreferenceRecord {
    pub id: Uuid,
    pub name: String,
    #[serde(flatten)]
    pub selections: CategorySelections,
    pub timestamp: DateTime<Utc>,
}

/// Submission payload; the store assigns id and timestamp
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewPreference {
    pub name: String,
    #[serde(flatten)]
    pub selections: CategorySelections,
}

impl NewPreference {
    /// Validates a submission before it reaches the store
    pub fn validate(self) -> AppResult<Self> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::InvalidInput("Name must not be empty".to_string()));
        }

        Ok(Self {
            name,
            selections: self.selections.validate()?,
        })
    }
}

/// Quick stats shown next to the navigation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubmissionStats {
    pub total_entries: u64,
    pub new_this_week: u64,
}
