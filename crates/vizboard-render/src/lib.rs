#![forbid(unsafe_code)]

pub mod bar;
pub mod format;
pub(crate) mod layout;
pub mod line;
pub mod model;
pub mod pie;
pub mod resolve;
pub mod scale;
pub mod scatter;
pub mod svg;

use crate::model::{Placeholder, RenderedChart, Viewport};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use vizboard_core::{ChartConfig, ChartSpec, ChartType, Record};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid render request: {message}")]
    InvalidRequest { message: String },
    #[error("render request JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Lays out one chart. Never fails: empty data and unsupported types yield a placeholder.
pub fn render_chart(
    chart_type: &ChartType,
    records: &[Record],
    config: &ChartConfig,
    viewport: Viewport,
) -> RenderedChart {
    if records.is_empty() {
        tracing::debug!(chart_type = chart_type.as_str(), "no records; rendering placeholder");
        return RenderedChart::Placeholder(Placeholder::NoData, viewport);
    }
    let Some(spec) = ChartSpec::resolve(chart_type, config) else {
        tracing::debug!(chart_type = chart_type.as_str(), "no renderer for chart type");
        return RenderedChart::Placeholder(
            Placeholder::Unsupported {
                chart_type: chart_type.as_str().to_string(),
            },
            viewport,
        );
    };
    tracing::debug!(
        family = spec.family(),
        records = records.len(),
        width = viewport.width,
        height = viewport.height,
        "rendering chart"
    );

    let layout = match &spec {
        ChartSpec::Bar(s) => bar::layout_bar_chart(records, s, viewport),
        ChartSpec::Line(s) => line::layout_line_chart(records, s, viewport),
        ChartSpec::Pie(s) => pie::layout_pie_chart(records, s, viewport),
        ChartSpec::Scatter(s) => scatter::layout_scatter_chart(records, s, viewport),
    };
    RenderedChart::Chart(Box::new(layout))
}

/// Self-contained render input: chart type, rows, configuration and optional size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderRequest {
    #[serde(rename = "type")]
    pub chart_type: ChartType,
    #[serde(default)]
    pub data: Vec<Record>,
    #[serde(default)]
    pub config: ChartConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl RenderRequest {
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }
}

pub fn render_request(request: &RenderRequest) -> RenderedChart {
    render_chart(
        &request.chart_type,
        &request.data,
        &request.config,
        request.viewport(),
    )
}

pub fn parse_render_request(text: &str) -> Result<RenderRequest> {
    let mut value: Value = serde_json::from_str(text)?;
    let Some(obj) = value.as_object_mut() else {
        return Err(Error::InvalidRequest {
            message: "expected a JSON object".to_string(),
        });
    };
    match obj.get("type") {
        Some(Value::String(_)) => {}
        _ => {
            return Err(Error::InvalidRequest {
                message: "missing string field `type`".to_string(),
            });
        }
    }
    obj.retain(|_, v| !v.is_null());
    match obj.get("data") {
        None => {}
        Some(Value::Array(rows)) => {
            if let Some(i) = rows.iter().position(|r| !r.is_object()) {
                return Err(Error::InvalidRequest {
                    message: format!("data[{i}] is not an object"),
                });
            }
        }
        Some(_) => {
            return Err(Error::InvalidRequest {
                message: "`data` must be an array of objects".to_string(),
            });
        }
    }
    if let Some(config) = obj.get("config") {
        if !config.is_object() {
            return Err(Error::InvalidRequest {
                message: "`config` must be an object".to_string(),
            });
        }
    }
    Ok(serde_json::from_value(value)?)
}

pub fn render_request_json(text: &str) -> Result<RenderedChart> {
    let request = parse_render_request(text)?;
    Ok(render_request(&request))
}
