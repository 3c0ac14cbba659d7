use serde::{Deserialize, Serialize};

/// Output size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const DEFAULT_WIDTH: f64 = 600.0;
    pub const DEFAULT_HEIGHT: f64 = 400.0;

    /// Missing sides take the defaults; negative or non-finite sides clamp to 0.
    pub fn new(width: Option<f64>, height: Option<f64>) -> Self {
        fn side(v: Option<f64>, default: f64) -> f64 {
            match v {
                None => default,
                Some(v) if v.is_finite() && v > 0.0 => v,
                Some(_) => 0.0,
            }
        }
        Self {
            width: side(width, Self::DEFAULT_WIDTH),
            height: side(height, Self::DEFAULT_HEIGHT),
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    pub const CARTESIAN: Margins = Margins {
        top: 40.0,
        right: 30.0,
        bottom: 60.0,
        left: 60.0,
    };

    pub const PIE: Margins = Margins {
        top: 40.0,
        right: 30.0,
        bottom: 40.0,
        left: 30.0,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLabel {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub anchor: TextAnchor,
    /// Rotation in degrees around the origin of the enclosing group.
    #[serde(default)]
    pub rotate: Option<f64>,
}

/// Hover content attached to a mark, one entry per line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tooltip {
    pub lines: Vec<String>,
}

impl Tooltip {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisOrient {
    Bottom,
    Left,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisTick {
    /// Offset along the axis, in plot coordinates.
    pub position: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisLayout {
    pub orient: AxisOrient,
    /// Length of the domain line (the plot's inner width or height).
    pub length: f64,
    pub ticks: Vec<AxisTick>,
    /// Categorical x labels are rotated -45° and end-anchored.
    pub rotate_labels: bool,
    pub title: Option<TextLabel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridLine {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Domain and geometry of an x or y scale, exposed for inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ScaleInfo {
    Band {
        domain: Vec<String>,
        step: f64,
        bandwidth: f64,
    },
    Point {
        domain: Vec<String>,
        step: f64,
    },
    Linear {
        domain: (f64, f64),
        range: (f64, f64),
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarMark {
    pub category: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: String,
    pub tooltip: Option<Tooltip>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointMark {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    pub fill: String,
    pub opacity: Option<f64>,
    pub stroke: Option<String>,
    pub tooltip: Option<Tooltip>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSeries {
    /// Group label; `None` for an ungrouped line.
    pub group: Option<String>,
    pub stroke: String,
    pub points: Vec<(f64, f64)>,
    pub markers: Vec<PointMark>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliceLabel {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub anchor: TextAnchor,
    /// Leader line: arc centroid, outer arc centroid, label position.
    pub polyline: [(f64, f64); 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliceMark {
    pub category: String,
    pub value: f64,
    /// Radians, clockwise from 12 o'clock.
    pub start_angle: f64,
    pub end_angle: f64,
    /// Share of the total in percent (0 when the total is 0).
    pub percentage: f64,
    pub fill: String,
    pub label: Option<SliceLabel>,
    pub tooltip: Option<Tooltip>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieLayout {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
    pub inner_radius: f64,
    pub donut: bool,
    pub slices: Vec<SliceMark>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "marks", rename_all = "lowercase")]
pub enum ChartBody {
    Bars(Vec<BarMark>),
    Lines(Vec<LineSeries>),
    Pie(PieLayout),
    Points(Vec<PointMark>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendItem {
    pub label: String,
    pub color: String,
    pub swatch_x: f64,
    pub y: f64,
    pub text_x: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendLayout {
    pub anchor: TextAnchor,
    pub items: Vec<LegendItem>,
}

/// Fully positioned chart. Cartesian marks, axes and grid lines are in plot coordinates
/// (offset by the left/top margins); title and legend are in viewport coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartLayout {
    pub family: String,
    pub viewport: Viewport,
    pub margins: Margins,
    pub inner_width: f64,
    pub inner_height: f64,
    pub title: Option<TextLabel>,
    pub x_scale: Option<ScaleInfo>,
    pub y_scale: Option<ScaleInfo>,
    pub x_axis: Option<AxisLayout>,
    pub y_axis: Option<AxisLayout>,
    pub grid: Vec<GridLine>,
    pub body: ChartBody,
    pub legend: Option<LegendLayout>,
    pub animation_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Placeholder {
    NoData,
    Unsupported { chart_type: String },
}

impl Placeholder {
    pub fn message(&self) -> &'static str {
        match self {
            Self::NoData => "No data available to display",
            Self::Unsupported { .. } => "Chart type not supported",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RenderedChart {
    Chart(Box<ChartLayout>),
    Placeholder(Placeholder, Viewport),
}

impl RenderedChart {
    pub fn viewport(&self) -> Viewport {
        match self {
            Self::Chart(layout) => layout.viewport,
            Self::Placeholder(_, viewport) => *viewport,
        }
    }

    pub fn layout(&self) -> Option<&ChartLayout> {
        match self {
            Self::Chart(layout) => Some(layout),
            Self::Placeholder(..) => None,
        }
    }

    pub fn placeholder(&self) -> Option<&Placeholder> {
        match self {
            Self::Chart(_) => None,
            Self::Placeholder(p, _) => Some(p),
        }
    }
}
