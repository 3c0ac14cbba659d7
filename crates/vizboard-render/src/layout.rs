//! Layout pieces shared by the chart renderers: plot frame, title, axes, grid and legend.

use crate::format::{NumberFormat, tick_labels};
use crate::model::{
    AxisLayout, AxisOrient, AxisTick, GridLine, LegendItem, LegendLayout, Margins, TextAnchor,
    TextLabel, Tooltip, Viewport,
};
use crate::resolve::ResolvedDimension;
use crate::scale::{DEFAULT_TICK_COUNT, LinearScale};
use vizboard_core::{AxisConfig, ChartStyle, LegendPosition, Scalar};

pub(crate) const LEGEND_SWATCH: f64 = 19.0;
pub(crate) const LEGEND_STEP: f64 = 20.0;

#[derive(Debug, Clone, Copy)]
pub(crate) struct Frame {
    pub viewport: Viewport,
    pub margins: Margins,
    pub inner_width: f64,
    pub inner_height: f64,
}

impl Frame {
    pub fn new(viewport: Viewport, margins: Margins) -> Self {
        Self {
            viewport,
            margins,
            inner_width: (viewport.width - margins.left - margins.right).max(0.0),
            inner_height: (viewport.height - margins.top - margins.bottom).max(0.0),
        }
    }

    pub fn title(&self, style: &ChartStyle) -> Option<TextLabel> {
        style.title.as_ref().map(|t| TextLabel {
            text: t.clone(),
            x: self.viewport.width / 2.0,
            y: self.margins.top / 2.0,
            anchor: TextAnchor::Middle,
            rotate: None,
        })
    }

    pub fn x_axis_title(&self, axis: &AxisConfig) -> Option<TextLabel> {
        axis.title().map(|t| TextLabel {
            text: t.to_string(),
            x: self.inner_width / 2.0,
            y: self.inner_height + self.margins.bottom - 10.0,
            anchor: TextAnchor::Middle,
            rotate: None,
        })
    }

    pub fn y_axis_title(&self, axis: &AxisConfig) -> Option<TextLabel> {
        axis.title().map(|t| TextLabel {
            text: t.to_string(),
            x: -self.inner_height / 2.0,
            y: -self.margins.left + 15.0,
            anchor: TextAnchor::Middle,
            rotate: Some(-90.0),
        })
    }

    /// Dashed horizontal lines across the plot at each y tick.
    pub fn horizontal_grid(&self, y: &LinearScale) -> Vec<GridLine> {
        y.ticks(DEFAULT_TICK_COUNT)
            .into_iter()
            .map(|t| {
                let py = y.map(t);
                GridLine {
                    x1: 0.0,
                    y1: py,
                    x2: self.inner_width,
                    y2: py,
                }
            })
            .collect()
    }

    /// Dashed vertical lines down the plot at each x tick.
    pub fn vertical_grid(&self, x: &LinearScale) -> Vec<GridLine> {
        x.ticks(DEFAULT_TICK_COUNT)
            .into_iter()
            .map(|t| {
                let px = x.map(t);
                GridLine {
                    x1: px,
                    y1: 0.0,
                    x2: px,
                    y2: self.inner_height,
                }
            })
            .collect()
    }

    /// Vertical legend column; `start_y` is where the first swatch sits for right/top/left.
    pub fn legend(
        &self,
        position: LegendPosition,
        start_y: f64,
        entries: Vec<(String, String)>,
    ) -> LegendLayout {
        let width = self.viewport.width;
        let right = self.margins.right;
        let n = entries.len();
        let (anchor, swatch_x, text_x) = match position {
            LegendPosition::Left => (TextAnchor::Start, right, right + LEGEND_SWATCH + 5.0),
            LegendPosition::Right | LegendPosition::Top | LegendPosition::Bottom => (
                TextAnchor::End,
                width - right - LEGEND_SWATCH,
                width - right - LEGEND_SWATCH - 5.0,
            ),
        };
        let items = entries
            .into_iter()
            .enumerate()
            .map(|(i, (label, color))| {
                let y = match position {
                    LegendPosition::Bottom => {
                        self.viewport.height - (n - i) as f64 * LEGEND_STEP
                    }
                    _ => start_y + i as f64 * LEGEND_STEP,
                };
                LegendItem {
                    label,
                    color,
                    swatch_x,
                    y,
                    text_x,
                }
            })
            .collect();
        LegendLayout { anchor, items }
    }
}

/// Axis for band or point x scales: ticks sit at the given positions, labels rotated.
pub(crate) fn categorical_x_axis(
    frame: &Frame,
    ticks: Vec<AxisTick>,
    axis: &AxisConfig,
) -> AxisLayout {
    AxisLayout {
        orient: AxisOrient::Bottom,
        length: frame.inner_width,
        ticks,
        rotate_labels: true,
        title: frame.x_axis_title(axis),
    }
}

pub(crate) fn linear_axis(
    frame: &Frame,
    orient: AxisOrient,
    scale: &LinearScale,
    axis: &AxisConfig,
) -> AxisLayout {
    let ticks = scale.ticks(DEFAULT_TICK_COUNT);
    let labels = tick_labels(
        &ticks,
        scale.tick_step(DEFAULT_TICK_COUNT),
        axis.format.as_deref(),
    );
    let ticks = ticks
        .iter()
        .zip(labels)
        .map(|(t, label)| AxisTick {
            position: scale.map(*t),
            label,
        })
        .collect();
    let (length, title) = match orient {
        AxisOrient::Bottom => (frame.inner_width, frame.x_axis_title(axis)),
        AxisOrient::Left => (frame.inner_height, frame.y_axis_title(axis)),
    };
    AxisLayout {
        orient,
        length,
        ticks,
        rotate_labels: false,
        title,
    }
}

/// Linear domain over observed values, optionally widened to include zero, with axis
/// `min`/`max` overrides applied before nicing.
pub(crate) fn linear_domain(
    extent: Option<(f64, f64)>,
    include_zero: bool,
    axis: &AxisConfig,
) -> (f64, f64) {
    let (mut lo, mut hi) = extent.unwrap_or((0.0, 0.0));
    if include_zero {
        lo = lo.min(0.0);
        hi = hi.max(0.0);
    }
    if let Some(min) = axis.min.filter(|v| v.is_finite()) {
        lo = min;
    }
    if let Some(max) = axis.max.filter(|v| v.is_finite()) {
        hi = max;
    }
    (lo, hi)
}

pub(crate) fn tooltip(style: &ChartStyle, lines: impl FnOnce() -> Vec<String>) -> Option<Tooltip> {
    style.tooltip.then(|| Tooltip { lines: lines() })
}

/// `"{field}: {value}"`; number values go through the configured `tooltip.format`.
pub(crate) fn tooltip_line(style: &ChartStyle, dim: &ResolvedDimension, index: usize) -> String {
    let format = style.tooltip_format.as_deref().and_then(NumberFormat::parse);
    let value = match (format, dim.value(index)) {
        (Some(format), Some(Scalar::Number(v))) => format.format(*v),
        _ => dim.display(index),
    };
    format!("{}: {}", dim.field, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_clamps_inner_area() {
        let frame = Frame::new(Viewport::new(Some(50.0), Some(50.0)), Margins::CARTESIAN);
        assert_eq!(frame.inner_width, 0.0);
        assert_eq!(frame.inner_height, 0.0);
    }

    #[test]
    fn legend_positions() {
        let frame = Frame::new(Viewport::default(), Margins::CARTESIAN);
        let entries = vec![
            ("a".to_string(), "#111".to_string()),
            ("b".to_string(), "#222".to_string()),
        ];
        let right = frame.legend(LegendPosition::Right, 0.0, entries.clone());
        assert_eq!(right.anchor, TextAnchor::End);
        assert_eq!(right.items[0].swatch_x, 600.0 - 30.0 - 19.0);
        assert_eq!(right.items[0].text_x, 600.0 - 30.0 - 24.0);
        assert_eq!(right.items[1].y, 20.0);

        let left = frame.legend(LegendPosition::Left, 40.0, entries.clone());
        assert_eq!(left.anchor, TextAnchor::Start);
        assert_eq!(left.items[0].swatch_x, 30.0);
        assert_eq!(left.items[0].y, 40.0);

        let bottom = frame.legend(LegendPosition::Bottom, 0.0, entries);
        assert_eq!(bottom.items[0].y, 360.0);
        assert_eq!(bottom.items[1].y, 380.0);
    }

    #[test]
    fn linear_domain_applies_zero_and_overrides() {
        let axis = AxisConfig::default();
        assert_eq!(linear_domain(Some((5.0, 9.0)), true, &axis), (0.0, 9.0));
        assert_eq!(linear_domain(Some((5.0, 9.0)), false, &axis), (5.0, 9.0));
        assert_eq!(linear_domain(None, true, &axis), (0.0, 0.0));
        let axis = AxisConfig {
            min: Some(2.0),
            max: Some(50.0),
            ..Default::default()
        };
        assert_eq!(linear_domain(Some((5.0, 9.0)), true, &axis), (2.0, 50.0));
    }

    #[test]
    fn tooltip_line_formats_numbers_only() {
        use vizboard_core::{ChartConfig, Record, TooltipConfig};

        let records = vec![
            Record::new().with("v", 1234.5).with("c", "north"),
            Record::new().with("v", "n/a"),
        ];
        let v = ResolvedDimension::resolve("v", &records);
        let c = ResolvedDimension::resolve("c", &records);

        let plain = ChartStyle::from_config(&ChartConfig::default());
        assert_eq!(tooltip_line(&plain, &v, 0), "v: 1234.5");

        let formatted = ChartStyle::from_config(&ChartConfig {
            tooltip: Some(TooltipConfig {
                show: true,
                format: Some(",.2f".to_string()),
            }),
            ..Default::default()
        });
        assert_eq!(tooltip_line(&formatted, &v, 0), "v: 1,234.50");
        assert_eq!(tooltip_line(&formatted, &v, 1), "v: n/a");
        assert_eq!(tooltip_line(&formatted, &c, 0), "c: north");
        assert_eq!(tooltip_line(&formatted, &c, 1), "c: ");
    }
}
