use crate::{
    error::{AppError, AppResult},
    models::{
        AggregateResult, Category, CorrelationTable, DailySubmissions, LabelShare,
        PreferenceRecord,
    },
};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

/// Aggregates preference records into per-category rankings and summary stats
///
/// Percentages are relative to the number of submitters, not the number of
/// selections, so a label picked by everyone is 100% regardless of how many
/// other labels those people picked.
///
/// An empty record set is rejected: there is no population to divide by.
pub fn aggregate(records: &[PreferenceRecord]) -> AppResult<AggregateResult> {
    if records.is_empty() {
        return Err(AppError::InvalidInput(
            "Cannot aggregate an empty set of preferences".to_string(),
        ));
    }

    let total_users = records.len();
    let genre_selections: usize = records.iter().map(|r| r.selections.genres.len()).sum();
    let mood_selections: usize = records.iter().map(|r| r.selections.moods.len()).sum();

    let result = AggregateResult {
        total_users,
        total_preferences: genre_selections + mood_selections,
        avg_genres_per_user: genre_selections as f64 / total_users as f64,
        avg_moods_per_user: mood_selections as f64 / total_users as f64,
        genres: rank_category(records, Category::Genres),
        moods: rank_category(records, Category::Moods),
        time_periods: rank_category(records, Category::TimePeriods),
        languages: rank_category(records, Category::Languages),
        quality_markers: rank_category(records, Category::QualityMarkers),
        correlations: correlations(records),
        trends: daily_trends(records),
    };

    tracing::debug!(
        total_users = result.total_users,
        total_preferences = result.total_preferences,
        distinct_genres = result.genres.len(),
        distinct_moods = result.moods.len(),
        "Preferences aggregated"
    );

    Ok(result)
}

/// Counts labels of one category and orders them by descending share
///
/// Labels with equal counts keep the order in which they were first seen.
pub fn rank_category(records: &[PreferenceRecord], category: Category) -> Vec<LabelShare> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, u32)> = Vec::new();

    for label in records.iter().flat_map(|r| r.selections.get(category)) {
        match positions.get(label.as_str()).copied() {
            Some(idx) => counts[idx].1 += 1,
            None => {
                positions.insert(label.as_str(), counts.len());
                counts.push((label.as_str(), 1));
            }
        }
    }

    // stable: ties stay in first-occurrence order
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let total_users = records.len() as f64;
    counts
        .into_iter()
        .map(|(label, count)| LabelShare {
            label: label.to_string(),
            count,
            percentage: count as f64 / total_users * 100.0,
        })
        .collect()
}

/// Builds the genre × mood co-occurrence table
///
/// Each record contributes the full cross product of its genres and moods.
pub fn correlations(records: &[PreferenceRecord]) -> CorrelationTable {
    let mut table = CorrelationTable::new();
    for record in records {
        for genre in &record.selections.genres {
            for mood in &record.selections.moods {
                table.record(genre, mood);
            }
        }
    }
    table
}

/// Submission counts per UTC calendar day, oldest first
pub fn daily_trends(records: &[PreferenceRecord]) -> Vec<DailySubmissions> {
    let mut per_day: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    for record in records {
        *per_day.entry(record.timestamp.date_naive()).or_insert(0) += 1;
    }

    per_day
        .into_iter()
        .map(|(date, submissions)| DailySubmissions { date, submissions })
        .collect()
}
