use crate::layout::{Frame, tooltip, tooltip_line};
use crate::model::{
    ChartBody, ChartLayout, Margins, PieLayout, SliceLabel, SliceMark, TextAnchor, Viewport,
};
use crate::resolve::ResolvedDimensions;
use crate::scale::OrdinalScale;
use std::f64::consts::{PI, TAU};
use vizboard_core::{PieSpec, Record};

/// Slices narrower than this share of the circle (in percent) get no label or leader line.
pub const MIN_LABEL_PERCENT: f64 = 3.0;

/// Point at `radius` along `angle`, with 0 at 12 o'clock and angles growing clockwise.
pub fn polar_xy(radius: f64, angle: f64) -> (f64, f64) {
    (radius * angle.sin(), -radius * angle.cos())
}

/// Slice weight: negative, non-finite and absent values count as 0.
fn weight(v: Option<f64>) -> f64 {
    match v {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

/// Pie or donut: slices in record order, starting at 12 o'clock.
pub fn layout_pie_chart(records: &[Record], spec: &PieSpec, viewport: Viewport) -> ChartLayout {
    let frame = Frame::new(viewport, Margins::PIE);
    let style = &spec.style;

    let ResolvedDimensions {
        x: category,
        y: value,
        ..
    } = ResolvedDimensions::resolve(&spec.dimensions(), records);

    let radius = frame.inner_width.min(frame.inner_height) / 2.0;
    let outer_arc = radius * 0.9;
    let mut colors = OrdinalScale::new(style.palette.clone(), category.distinct());

    let weights: Vec<f64> = (0..records.len()).map(|i| weight(value.number(i))).collect();
    let total: f64 = weights.iter().sum();

    let mut slices = Vec::with_capacity(records.len());
    let mut start = 0.0;
    for (i, w) in weights.iter().enumerate() {
        let span = if total > 0.0 && total.is_finite() {
            w / total * TAU
        } else {
            0.0
        };
        let end = start + span;
        let mid = start + span / 2.0;
        let percentage = span / TAU * 100.0;
        let label_text = category.display(i);

        let label = (percentage >= MIN_LABEL_PERCENT).then(|| {
            let side = if mid < PI { 1.0 } else { -1.0 };
            let (ox, oy) = polar_xy(outer_arc, mid);
            let pos = (radius * 0.99 * side, oy);
            SliceLabel {
                text: label_text.clone(),
                x: pos.0,
                y: pos.1,
                anchor: if mid < PI {
                    TextAnchor::Start
                } else {
                    TextAnchor::End
                },
                polyline: [polar_xy(radius / 2.0, mid), (ox, oy), pos],
            }
        });

        let tip = tooltip(style, || {
            vec![
                label_text.clone(),
                tooltip_line(style, &value, i),
                format!("Percentage: {percentage:.1}%"),
            ]
        });

        slices.push(SliceMark {
            category: label_text,
            value: *w,
            start_angle: start,
            end_angle: end,
            percentage,
            fill: colors.color(category.value(i)),
            label,
            tooltip: tip,
        });
        start = end;
    }
    tracing::trace!(slices = slices.len(), total, "laid out pie chart");

    let legend = style.legend.map(|position| {
        let entries = colors
            .domain()
            .iter()
            .enumerate()
            .map(|(i, v)| (v.display(), colors.palette_color(i)))
            .collect();
        frame.legend(position, frame.margins.top, entries)
    });

    ChartLayout {
        family: if spec.donut { "donut" } else { "pie" }.to_string(),
        viewport,
        margins: frame.margins,
        inner_width: frame.inner_width,
        inner_height: frame.inner_height,
        title: frame.title(style),
        x_scale: None,
        y_scale: None,
        x_axis: None,
        y_axis: None,
        grid: Vec::new(),
        body: ChartBody::Pie(PieLayout {
            cx: viewport.width / 2.0,
            cy: viewport.height / 2.0,
            radius,
            inner_radius: 0.0,
            donut: spec.donut,
            slices,
        }),
        legend,
        animation_ms: style.animation_ms,
    }
}
