use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How many submitters picked a label, as a count and as a share of all submitters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabelShare {
    pub label: String,
    pub count: u32,
    /// `count / total_users * 100`
    pub percentage: f64,
}

/// Sparse genre → mood co-occurrence counts
///
/// Pairs that never occurred are absent and read as zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CorrelationTable {
    cells: BTreeMap<String, BTreeMap<String, u32>>,
}

impl CorrelationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one occurrence of the pair
    pub fn record(&mut self, genre: &str, mood: &str) {
        *self
            .cells
            .entry(genre.to_string())
            .or_default()
            .entry(mood.to_string())
            .or_insert(0) += 1;
    }

    pub fn get(&self, genre: &str, mood: &str) -> u32 {
        self.cells
            .get(genre)
            .and_then(|moods| moods.get(mood))
            .copied()
            .unwrap_or(0)
    }

    /// Genre labels that appear in at least one pair, sorted
    pub fn genres(&self) -> Vec<String> {
        self.cells.keys().cloned().collect()
    }

    /// Mood labels that appear in at least one pair, sorted
    pub fn moods(&self) -> Vec<String> {
        let mut moods: Vec<String> = self
            .cells
            .values()
            .flat_map(|row| row.keys().cloned())
            .collect();
        moods.sort();
        moods.dedup();
        moods
    }

    /// Dense rows (one per genre) over the mood axis, zero-filled
    pub fn to_matrix(&self) -> Vec<Vec<u32>> {
        let moods = self.moods();
        self.cells
            .values()
            .map(|row| {
                moods
                    .iter()
                    .map(|mood| row.get(mood).copied().unwrap_or(0))
                    .collect()
            })
            .collect()
    }
}

/// Number of submissions on one calendar day (UTC)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailySubmissions {
    pub date: NaiveDate,
    pub submissions: u32,
}

/// Group-level view over every preference record
///
/// Recomputed on every request and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AggregateResult {
    pub total_users: usize,
    /// Genre selections plus mood selections, across all records
    pub total_preferences: usize,
    pub avg_genres_per_user: f64,
    pub avg_moods_per_user: f64,
    pub genres: Vec<LabelShare>,
    pub moods: Vec<LabelShare>,
    pub time_periods: Vec<LabelShare>,
    pub languages: Vec<LabelShare>,
    pub quality_markers: Vec<LabelShare>,
    pub correlations: CorrelationTable,
    pub trends: Vec<DailySubmissions>,
}

impl AggregateResult {
    /// Labels of the first `n` entries of an ordered category table
    pub fn top_labels(shares: &[LabelShare], n: usize) -> Vec<&str> {
        shares.iter().take(n).map(|s| s.label.as_str()).collect()
    }
}
