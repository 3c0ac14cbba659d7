//! Per-family chart descriptions derived from a loosely typed [`ChartConfig`].
//!
//! Renderers match on [`ChartSpec`] exhaustively, so every family only sees the bindings it uses.

use crate::config::{AxisConfig, ChartConfig, ChartType, Dimensions, LegendPosition};
use serde::Serialize;

/// Presentation options shared by every chart family.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartStyle {
    pub title: Option<String>,
    /// Validated palette, never empty.
    pub palette: Vec<String>,
    /// Color of single-series marks.
    pub series_color: String,
    /// `Some` when a legend should be drawn.
    pub legend: Option<LegendPosition>,
    pub tooltip: bool,
    /// d3-format specifier for numeric tooltip values.
    pub tooltip_format: Option<String>,
    pub animation_ms: Option<u64>,
}

impl ChartStyle {
    pub fn from_config(config: &ChartConfig) -> Self {
        Self {
            title: config.title().map(str::to_string),
            palette: config.palette(),
            series_color: config.series_color(),
            legend: config
                .legend_enabled()
                .then(|| config.legend_position()),
            tooltip: config.tooltip_enabled(),
            tooltip_format: config.tooltip_format().map(str::to_string),
            animation_ms: config.animation_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarSpec {
    pub x: String,
    pub y: Option<String>,
    pub color: Option<String>,
    pub x_axis: AxisConfig,
    pub y_axis: AxisConfig,
    pub style: ChartStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineSpec {
    pub x: String,
    pub y: Option<String>,
    pub group: Option<String>,
    pub x_axis: AxisConfig,
    pub y_axis: AxisConfig,
    pub style: ChartStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PieSpec {
    /// Category field (`dimensions.x`).
    pub category: String,
    /// Value field (`dimensions.y`).
    pub value: Option<String>,
    pub donut: bool,
    pub style: ChartStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterSpec {
    pub x: String,
    pub y: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub x_axis: AxisConfig,
    pub y_axis: AxisConfig,
    pub style: ChartStyle,
}

impl BarSpec {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            x: self.x.clone(),
            y: self.y.clone(),
            color: self.color.clone(),
            ..Default::default()
        }
    }
}

impl LineSpec {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            x: self.x.clone(),
            y: self.y.clone(),
            group: self.group.clone(),
            ..Default::default()
        }
    }
}

impl PieSpec {
    /// The category binds to `x` and the slice value to `y`.
    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            x: self.category.clone(),
            y: self.value.clone(),
            ..Default::default()
        }
    }
}

impl ScatterSpec {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            x: self.x.clone(),
            y: self.y.clone(),
            size: self.size.clone(),
            color: self.color.clone(),
            group: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "family", rename_all = "lowercase")]
pub enum ChartSpec {
    Bar(BarSpec),
    Line(LineSpec),
    Pie(PieSpec),
    Scatter(ScatterSpec),
}

impl ChartSpec {
    /// Builds the spec for `chart_type`, or `None` when no renderer handles that type.
    pub fn resolve(chart_type: &ChartType, config: &ChartConfig) -> Option<Self> {
        let dims = config.dimensions();
        let style = ChartStyle::from_config(config);
        let x = dims.x.clone();
        let y = dims.y().map(str::to_string);
        let x_axis = config.x_axis.clone().unwrap_or_default();
        let y_axis = config.y_axis.clone().unwrap_or_default();

        let spec = match chart_type {
            ChartType::Bar => Self::Bar(BarSpec {
                x,
                y,
                color: dims.color().map(str::to_string),
                x_axis,
                y_axis,
                style,
            }),
            ChartType::Line => Self::Line(LineSpec {
                x,
                y,
                group: dims.group().map(str::to_string),
                x_axis,
                y_axis,
                style,
            }),
            ChartType::Pie | ChartType::Donut => Self::Pie(PieSpec {
                category: x,
                value: y,
                donut: matches!(chart_type, ChartType::Donut),
                style,
            }),
            ChartType::Scatter => Self::Scatter(ScatterSpec {
                x,
                y,
                size: dims.size().map(str::to_string),
                color: dims.color().map(str::to_string),
                x_axis,
                y_axis,
                style,
            }),
            ChartType::Area
            | ChartType::Heatmap
            | ChartType::Treemap
            | ChartType::Unknown(_) => return None,
        };
        Some(spec)
    }

    pub fn family(&self) -> &'static str {
        match self {
            Self::Bar(_) => "bar",
            Self::Line(_) => "line",
            Self::Pie(s) if s.donut => "donut",
            Self::Pie(_) => "pie",
            Self::Scatter(_) => "scatter",
        }
    }
}
