use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Categorical palette used when a config carries no usable `colors` (d3 `schemeCategory10`).
pub const DEFAULT_PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Single-series fill for line and scatter charts without explicit colors.
pub const DEFAULT_SERIES_COLOR: &str = "#3b82f6";

/// Palette the visualization editor seeds new charts with.
pub const EDITOR_PALETTE: [&str; 6] = [
    "#3b82f6", "#ef4444", "#10b981", "#f59e0b", "#6366f1", "#ec4899",
];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChartType {
    Bar,
    Line,
    Pie,
    Scatter,
    Area,
    Donut,
    Heatmap,
    Treemap,
    /// Any tag outside the known set, kept verbatim.
    Unknown(String),
}

impl ChartType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Pie => "pie",
            Self::Scatter => "scatter",
            Self::Area => "area",
            Self::Donut => "donut",
            Self::Heatmap => "heatmap",
            Self::Treemap => "treemap",
            Self::Unknown(name) => name.as_str(),
        }
    }
}

impl FromStr for ChartType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.trim() {
            "bar" => Self::Bar,
            "line" => Self::Line,
            "pie" => Self::Pie,
            "scatter" => Self::Scatter,
            "area" => Self::Area,
            "donut" => Self::Donut,
            "heatmap" => Self::Heatmap,
            "treemap" => Self::Treemap,
            other => Self::Unknown(other.to_string()),
        })
    }
}

impl From<String> for ChartType {
    fn from(value: String) -> Self {
        match value.parse::<ChartType>() {
            Ok(t) => t,
            Err(never) => match never {},
        }
    }
}

impl From<ChartType> for String {
    fn from(value: ChartType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ChartType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ChartType {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from(raw))
    }
}

/// Field bindings for the logical roles a chart can encode.
///
/// Empty strings are treated as "not bound", which is what an editor produces for an unselected
/// dropdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    #[serde(default)]
    pub x: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

fn bound(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|f| !f.is_empty())
}

impl Dimensions {
    pub fn new(x: impl Into<String>) -> Self {
        Self {
            x: x.into(),
            ..Default::default()
        }
    }

    pub fn with_y(mut self, field: impl Into<String>) -> Self {
        self.y = Some(field.into());
        self
    }

    pub fn with_size(mut self, field: impl Into<String>) -> Self {
        self.size = Some(field.into());
        self
    }

    pub fn with_color(mut self, field: impl Into<String>) -> Self {
        self.color = Some(field.into());
        self
    }

    pub fn with_group(mut self, field: impl Into<String>) -> Self {
        self.group = Some(field.into());
        self
    }

    pub fn y(&self) -> Option<&str> {
        bound(&self.y)
    }

    pub fn size(&self) -> Option<&str> {
        bound(&self.size)
    }

    pub fn color(&self) -> Option<&str> {
        bound(&self.color)
    }

    pub fn group(&self) -> Option<&str> {
        bound(&self.group)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisConfig {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub grid_lines: bool,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// d3-format style hint for tick labels (e.g. `.1f`, `,`, `.0%`).
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl AxisConfig {
    pub fn title(&self) -> Option<&str> {
        bound(&self.title)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    Top,
    #[default]
    Right,
    Bottom,
    Left,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegendConfig {
    #[serde(default, deserialize_with = "lenient")]
    pub show: bool,
    /// Unknown positions fall back to [`LegendPosition::Right`].
    #[serde(default, deserialize_with = "lenient")]
    pub position: LegendPosition,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TooltipConfig {
    #[serde(default, deserialize_with = "lenient")]
    pub show: bool,
    /// d3-format style specifier applied to numeric tooltip values.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationConfig {
    #[serde(default, deserialize_with = "lenient")]
    pub enabled: bool,
    /// Milliseconds; fractional values are rounded and negative ones read as 0.
    #[serde(default, deserialize_with = "duration_ms")]
    pub duration: u64,
}

/// Deserializes `T`, falling back to its default when the value has the wrong shape.
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::de::DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(&value).unwrap_or_else(|err| {
        tracing::debug!(%value, %err, "ignoring malformed config value");
        T::default()
    }))
}

fn duration_ms<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let ms = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(match ms {
        Some(ms) if ms.is_finite() && ms > 0.0 => ms.round() as u64,
        Some(_) => 0,
        None => {
            tracing::debug!(%value, "ignoring malformed animation duration");
            0
        }
    })
}

/// Presentation settings for one chart, in the JSON shape visualizations persist.
///
/// Parsing is lenient per field: a block or setting with the wrong shape is replaced by its
/// default instead of failing the whole config.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub x_axis: Option<AxisConfig>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub y_axis: Option<AxisConfig>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub legend: Option<LegendConfig>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<TooltipConfig>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub animation: Option<AnimationConfig>,
}

impl ChartConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_value(value: &Value) -> Result<Self> {
        if !value.is_object() {
            return Err(Error::InvalidConfig {
                message: format!("expected a JSON object, got {value}"),
            });
        }
        Ok(Self::deserialize(value)?)
    }

    /// The config a freshly opened editor starts from, bound to `x`/`y`.
    pub fn editor_defaults(x: &str, y: &str) -> Self {
        Self {
            title: None,
            dimensions: Some(Dimensions::new(x).with_y(y)),
            x_axis: Some(AxisConfig {
                title: Some(x.to_string()),
                field: Some(x.to_string()),
                grid_lines: false,
                ..Default::default()
            }),
            y_axis: Some(AxisConfig {
                title: Some(y.to_string()),
                field: Some(y.to_string()),
                grid_lines: true,
                ..Default::default()
            }),
            colors: Some(EDITOR_PALETTE.iter().map(|c| c.to_string()).collect()),
            legend: Some(LegendConfig {
                show: true,
                position: LegendPosition::Right,
            }),
            tooltip: Some(TooltipConfig {
                show: true,
                format: None,
            }),
            animation: Some(AnimationConfig {
                enabled: true,
                duration: 500,
            }),
        }
    }

    /// Fills every unset block from [`ChartConfig::editor_defaults`]; set blocks are kept as is.
    pub fn or_editor_defaults(self, x: &str, y: &str) -> Self {
        let seed = Self::editor_defaults(x, y);
        Self {
            title: self.title,
            dimensions: self.dimensions.or(seed.dimensions),
            x_axis: self.x_axis.or(seed.x_axis),
            y_axis: self.y_axis.or(seed.y_axis),
            colors: self.colors.or(seed.colors),
            legend: self.legend.or(seed.legend),
            tooltip: self.tooltip.or(seed.tooltip),
            animation: self.animation.or(seed.animation),
        }
    }

    pub fn title(&self) -> Option<&str> {
        bound(&self.title)
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions.clone().unwrap_or_default()
    }

    /// Usable palette: configured color tokens that parse as SVG colors, or the default
    /// categorical palette when none remain.
    pub fn palette(&self) -> Vec<String> {
        let configured: Vec<String> = self
            .colors
            .iter()
            .flatten()
            .map(|c| c.trim())
            .filter(|c| {
                let ok = svgtypes::Color::from_str(c).is_ok();
                if !ok {
                    tracing::debug!(color = %c, "ignoring unparsable palette color");
                }
                ok
            })
            .map(str::to_string)
            .collect();
        if configured.is_empty() {
            DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect()
        } else {
            configured
        }
    }

    /// First configured color, falling back to [`DEFAULT_SERIES_COLOR`].
    pub fn series_color(&self) -> String {
        self.colors
            .iter()
            .flatten()
            .map(|c| c.trim())
            .find(|c| svgtypes::Color::from_str(c).is_ok())
            .unwrap_or(DEFAULT_SERIES_COLOR)
            .to_string()
    }

    pub fn tooltip_enabled(&self) -> bool {
        self.tooltip.as_ref().is_some_and(|t| t.show)
    }

    pub fn tooltip_format(&self) -> Option<&str> {
        self.tooltip
            .as_ref()
            .and_then(|t| t.format.as_deref())
            .filter(|f| !f.trim().is_empty())
    }

    pub fn legend_enabled(&self) -> bool {
        self.legend.as_ref().is_some_and(|l| l.show)
    }

    pub fn legend_position(&self) -> LegendPosition {
        self.legend
            .as_ref()
            .map(|l| l.position)
            .unwrap_or_default()
    }

    /// Animation duration in milliseconds when animation is enabled.
    pub fn animation_ms(&self) -> Option<u64> {
        self.animation
            .as_ref()
            .filter(|a| a.enabled && a.duration > 0)
            .map(|a| a.duration)
    }
}
