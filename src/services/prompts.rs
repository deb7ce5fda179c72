use crate::models::{AggregateResult, CategorySelections};

const TOP_GENRES: usize = 5;
const TOP_MOODS: usize = 5;
const TOP_TIME_PERIODS: usize = 3;
const TOP_QUALITY_MARKERS: usize = 3;
const SEPARATOR: &str = ", ";

const PER_MOVIE_SCHEMA: &str = "For each movie, include:
- **Title and Year**
- **Genres**
- **Brief Description**
- **Match Score (0-100)**
- **Selling Points** (bullet list of 3 items)
- **Explanation** of why it's recommended

Provide the recommendations formatted in Markdown with clear headings, subheadings, and bullet points. Do not include any additional text or explanations outside the Markdown content.
";

/// Renders the group recommendation prompt from the most popular labels
///
/// Only the leading entries of each ranked category are used; languages are
/// not part of the group prompt.
pub fn group_prompt(analysis: &AggregateResult) -> String {
    let top_genres = AggregateResult::top_labels(&analysis.genres, TOP_GENRES);
    let top_moods = AggregateResult::top_labels(&analysis.moods, TOP_MOODS);
    let top_periods = AggregateResult::top_labels(&analysis.time_periods, TOP_TIME_PERIODS);
    let top_markers = AggregateResult::top_labels(&analysis.quality_markers, TOP_QUALITY_MARKERS);

    format!(
        "You are a friendly and knowledgeable film expert. Based on these group preferences:

Top Genres: {genres}
Top Moods: {moods}
Preferred Time Periods: {periods}
Quality Markers: {markers}

Please recommend movies in these categories:

1. Five \"Must-Watch\" films that would appeal to the whole group
2. Three mood-based recommendations for each of the top 3 moods
3. Three \"Discovery\" picks that could expand the group's horizons while still being enjoyable

{schema}",
        genres = top_genres.join(SEPARATOR),
        moods = top_moods.join(SEPARATOR),
        periods = top_periods.join(SEPARATOR),
        markers = top_markers.join(SEPARATOR),
        schema = PER_MOVIE_SCHEMA,
    )
}

/// Renders the personal recommendation prompt from one person's selections, verbatim
pub fn personal_prompt(selections: &CategorySelections) -> String {
    format!(
        "You are a friendly and knowledgeable film expert. Based on these user preferences:

Favorite Genres: {genres}
Preferred Moods: {moods}
Time Periods: {periods}
Quality Markers: {markers}
Languages: {languages}

Please recommend movies in these categories:

1. Three perfect matches based on these preferences
2. Three personal picks you think this person would especially enjoy
3. Three \"bridge\" picks that could help them explore new genres/styles while still being enjoyable

{schema}",
        genres = selections.genres.join(SEPARATOR),
        moods = selections.moods.join(SEPARATOR),
        periods = selections.time_periods.join(SEPARATOR),
        markers = selections.quality_markers.join(SEPARATOR),
        languages = selections.languages.join(SEPARATOR),
        schema = PER_MOVIE_SCHEMA,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::analysis::{aggregate, test_support::record};

    fn line_starting_with<'a>(prompt: &'a str, prefix: &str) -> &'a str {
        prompt
            .lines()
            .find(|l| l.starts_with(prefix))
            .unwrap_or_else(|| panic!("missing line {:?}", prefix))
    }

    #[test]
    fn test_group_prompt_truncates_to_top_entries() {
        let records = vec![
            record(
                &[
                    "Mystery",
                    "Fantasy",
                    "Musical",
                    "Documentary",
                    "War Film",
                    "Animated",
                    "Crime Drama",
                ],
                &["Cozy"],
            ),
            record(&["Mystery", "Fantasy"], &["Cozy", "Playful"]),
        ];
        let prompt = group_prompt(&aggregate(&records).unwrap());

        assert_eq!(
            line_starting_with(&prompt, "Top Genres:"),
            "Top Genres: Mystery, Fantasy, Musical, Documentary, War Film"
        );
        assert_eq!(
            line_starting_with(&prompt, "Top Moods:"),
            "Top Moods: Cozy, Playful"
        );
        assert_eq!(
            line_starting_with(&prompt, "Preferred Time Periods:"),
            "Preferred Time Periods: Present Day"
        );
        assert_eq!(
            line_starting_with(&prompt, "Quality Markers:"),
            "Quality Markers: Hidden Gem"
        );
    }

    #[test]
    fn test_group_prompt_is_deterministic() {
        let records = vec![
            record(&["Mystery"], &["Thrilling"]),
            record(&["Fantasy"], &["Cozy"]),
        ];
        let analysis = aggregate(&records).unwrap();
        assert_eq!(group_prompt(&analysis), group_prompt(&analysis));
    }

    #[test]
    fn test_group_prompt_requests_fixed_sections() {
        let analysis = aggregate(&[record(&["Mystery"], &["Thrilling"])]).unwrap();
        let prompt = group_prompt(&analysis);

        assert!(prompt.starts_with("You are a friendly and knowledgeable film expert."));
        assert!(prompt.contains("Five \"Must-Watch\" films"));
        assert!(prompt.contains("for each of the top 3 moods"));
        assert!(prompt.contains("Three \"Discovery\" picks"));
        assert!(prompt.contains("**Match Score (0-100)**"));
        assert!(prompt.contains("Do not include any additional text"));
        assert!(!prompt.contains("Languages:"));
    }

    #[test]
    fn test_personal_prompt_uses_every_selection() {
        let selections = CategorySelections {
            genres: vec!["Mystery".to_string(), "Fantasy".to_string()],
            time_periods: vec!["Medieval".to_string()],
            languages: vec!["Swedish".to_string(), "English".to_string()],
            quality_markers: vec!["Cult Classic".to_string()],
            moods: vec!["Cozy".to_string(), "Nostalgic".to_string()],
        };
        let prompt = personal_prompt(&selections);

        assert_eq!(
            line_starting_with(&prompt, "Favorite Genres:"),
            "Favorite Genres: Mystery, Fantasy"
        );
        assert_eq!(
            line_starting_with(&prompt, "Languages:"),
            "Languages: Swedish, English"
        );
        assert!(prompt.contains("Three perfect matches"));
        assert!(prompt.contains("Three \"bridge\" picks"));
        assert!(prompt.ends_with("outside the Markdown content.\n"));
    }
}
