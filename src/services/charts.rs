use crate::models::{
    AggregateResult, ChartData, ChartKind, ChartPoint, ChartSpec, CorrelationTable,
    DailySubmissions, LabelShare,
};

const GENRE_COLOR: &str = "#3b82f6";
const MOOD_COLOR: &str = "#8b5cf6";
const TREND_COLOR: &str = "#3b82f6";
const DONUT_HOLE: f64 = 0.4;

// Plotly qualitative palettes
const SET3: [&str; 12] = [
    "#8DD3C7", "#FFFFB3", "#BEBADA", "#FB8072", "#80B1D3", "#FDB462", "#B3DE69", "#FCCDE5",
    "#D9D9D9", "#BC80BD", "#CCEBC5", "#FFED6F",
];
const PASTEL: [&str; 11] = [
    "rgb(102, 197, 204)",
    "rgb(246, 207, 113)",
    "rgb(248, 156, 116)",
    "rgb(220, 176, 242)",
    "rgb(135, 197, 95)",
    "rgb(158, 185, 243)",
    "rgb(254, 136, 177)",
    "rgb(201, 219, 116)",
    "rgb(139, 224, 164)",
    "rgb(180, 151, 231)",
    "rgb(179, 179, 179)",
];

/// Every chart shown on the analysis dashboard
pub fn dashboard(aggregate: &AggregateResult) -> Vec<ChartSpec> {
    vec![
        genre_chart(&aggregate.genres),
        mood_chart(&aggregate.moods),
        time_period_chart(&aggregate.time_periods),
        language_chart(&aggregate.languages),
        trend_chart(&aggregate.trends),
        correlation_chart(&aggregate.correlations),
    ]
}

pub fn genre_chart(genres: &[LabelShare]) -> ChartSpec {
    distribution_bar("Genre Distribution", GENRE_COLOR, genres)
}

pub fn mood_chart(moods: &[LabelShare]) -> ChartSpec {
    distribution_bar("Mood Distribution", MOOD_COLOR, moods)
}

pub fn time_period_chart(time_periods: &[LabelShare]) -> ChartSpec {
    donut("Time Period Distribution", &SET3, time_periods)
}

pub fn language_chart(languages: &[LabelShare]) -> ChartSpec {
    donut("Language Distribution", &PASTEL, languages)
}

pub fn trend_chart(trends: &[DailySubmissions]) -> ChartSpec {
    ChartSpec {
        title: "Submissions Over Time".to_string(),
        kind: ChartKind::Line {
            color: TREND_COLOR.to_string(),
        },
        x_axis_title: Some("Date".to_string()),
        y_axis_title: Some("Number of Submissions".to_string()),
        height: 300,
        show_legend: false,
        data: ChartData::Points {
            points: trends
                .iter()
                .map(|day| ChartPoint {
                    category: day.date.to_string(),
                    value: day.submissions as f64,
                    label: None,
                })
                .collect(),
        },
    }
}

pub fn correlation_chart(table: &CorrelationTable) -> ChartSpec {
    ChartSpec {
        title: "Genre-Mood Correlations".to_string(),
        kind: ChartKind::Heatmap {
            colorscale: "Viridis".to_string(),
        },
        x_axis_title: Some("Moods".to_string()),
        y_axis_title: Some("Genres".to_string()),
        height: 500,
        show_legend: false,
        data: ChartData::Grid {
            x: table.moods(),
            y: table.genres(),
            z: table.to_matrix(),
        },
    }
}

/// Horizontal bars of user counts, labelled with the rounded percentage
fn distribution_bar(title: &str, color: &str, shares: &[LabelShare]) -> ChartSpec {
    ChartSpec {
        title: title.to_string(),
        kind: ChartKind::HorizontalBar {
            color: color.to_string(),
        },
        x_axis_title: Some("Number of Users".to_string()),
        y_axis_title: None,
        height: 400,
        show_legend: false,
        data: ChartData::Points {
            points: shares
                .iter()
                .map(|share| ChartPoint {
                    category: share.label.clone(),
                    value: share.count as f64,
                    label: Some(format!("{:.1}%", share.percentage)),
                })
                .collect(),
        },
    }
}

fn donut(title: &str, palette: &[&str], shares: &[LabelShare]) -> ChartSpec {
    ChartSpec {
        title: title.to_string(),
        kind: ChartKind::Pie {
            hole: DONUT_HOLE,
            palette: palette.iter().map(|c| c.to_string()).collect(),
        },
        x_axis_title: None,
        y_axis_title: None,
        height: 300,
        show_legend: true,
        data: ChartData::Points {
            points: shares
                .iter()
                .map(|share| ChartPoint {
                    category: share.label.clone(),
                    value: share.count as f64,
                    label: None,
                })
                .collect(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::analysis::{aggregate, test_support::record};

    fn sample_aggregate() -> AggregateResult {
        aggregate(&[
            record(&["Action Adventure", "Mystery"], &["Thrilling"]),
            record(&["Mystery"], &["Thrilling", "Cozy"]),
            record(&["Fantasy"], &["Cozy"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_genre_chart_uses_counts_and_percentage_labels() {
        let chart = genre_chart(&sample_aggregate().genres);

        assert_eq!(chart.title, "Genre Distribution");
        assert_eq!(
            chart.kind,
            ChartKind::HorizontalBar {
                color: "#3b82f6".to_string()
            }
        );
        let ChartData::Points { points } = chart.data else {
            panic!("expected point data");
        };
        assert_eq!(points[0].category, "Mystery");
        assert_eq!(points[0].value, 2.0);
        assert_eq!(points[0].label.as_deref(), Some("66.7%"));
    }

    #[test]
    fn test_language_chart_is_donut() {
        let chart = language_chart(&sample_aggregate().languages);
        match chart.kind {
            ChartKind::Pie { hole, palette } => {
                assert_eq!(hole, 0.4);
                assert!(!palette.is_empty());
            }
            other => panic!("unexpected chart kind: {:?}", other),
        }
        assert!(chart.show_legend);
    }

    #[test]
    fn test_correlation_chart_grid_dimensions() {
        let chart = correlation_chart(&sample_aggregate().correlations);
        let ChartData::Grid { x, y, z } = chart.data else {
            panic!("expected grid data");
        };
        assert_eq!(x, vec!["Cozy", "Thrilling"]);
        assert_eq!(y, vec!["Action Adventure", "Fantasy", "Mystery"]);
        assert_eq!(z.len(), y.len());
        assert!(z.iter().all(|row| row.len() == x.len()));
        // Mystery × Thrilling
        assert_eq!(z[2][1], 2);
    }

    #[test]
    fn test_dashboard_contains_every_chart() {
        let titles: Vec<String> = dashboard(&sample_aggregate())
            .into_iter()
            .map(|c| c.title)
            .collect();
        assert_eq!(
            titles,
            vec![
                "Genre Distribution",
                "Mood Distribution",
                "Time Period Distribution",
                "Language Distribution",
                "Submissions Over Time",
                "Genre-Mood Correlations",
            ]
        );
    }
}
