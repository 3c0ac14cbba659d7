#![forbid(unsafe_code)]

//! Chart configuration model and data collaborators for vizboard (headless).
//!
//! Design goals:
//! - a strongly typed `ChartConfig` that round-trips the JSON shape dashboards persist
//! - records that tolerate missing fields (absent values are data, not errors)
//! - explicit, context-passed repositories instead of process-wide stores

pub mod config;
pub mod dataset;
pub mod entities;
pub mod error;
pub mod record;
pub mod repository;
pub mod spec;

pub use config::{
    AnimationConfig, AxisConfig, ChartConfig, ChartType, DEFAULT_PALETTE, DEFAULT_SERIES_COLOR,
    Dimensions, EDITOR_PALETTE, LegendConfig, LegendPosition, TooltipConfig,
};
pub use dataset::{Dataset, DefaultDimensions, Table, default_dimensions, infer_field_types};
pub use entities::{Dashboard, DashboardItem, GridPosition, Visualization};
pub use error::{Error, Result};
pub use record::{DomainKey, FieldType, Record, Scalar};
pub use repository::{InMemoryRepository, RepoError, RepoResult, Repository, Workspace};
pub use spec::{BarSpec, ChartSpec, ChartStyle, LineSpec, PieSpec, ScatterSpec};

#[cfg(test)]
mod tests;
