use serde::{Deserialize, Serialize};

/// Declarative chart description handed to the dashboard for rendering
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub kind: ChartKind,
    pub x_axis_title: Option<String>,
    pub y_axis_title: Option<String>,
    pub height: u32,
    pub show_legend: bool,
    pub data: ChartData,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartKind {
    /// Horizontal bars, categories on the y axis
    HorizontalBar { color: String },
    /// Pie chart; a non-zero `hole` renders a donut
    Pie { hole: f64, palette: Vec<String> },
    /// Line with point markers
    Line { color: String },
    Heatmap { colorscale: String },
}

/// One category/value pair with its display label
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartPoint {
    pub category: String,
    pub value: f64,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ChartData {
    Points {
        points: Vec<ChartPoint>,
    },
    Grid {
        x: Vec<String>,
        y: Vec<String>,
        z: Vec<Vec<u32>>,
    },
}
