use crate::layout::{Frame, linear_axis, linear_domain, tooltip, tooltip_line};
use crate::model::{AxisOrient, ChartBody, ChartLayout, Margins, PointMark, ScaleInfo, Viewport};
use crate::resolve::ResolvedDimensions;
use crate::scale::{DEFAULT_TICK_COUNT, LinearScale, OrdinalScale, SizeScale};
use vizboard_core::{Record, ScatterSpec};

pub const POINT_OPACITY: f64 = 0.7;
pub const POINT_STROKE: &str = "#fff";

/// Linear x/y over numeric fields; point radius from the optional size field.
pub fn layout_scatter_chart(
    records: &[Record],
    spec: &ScatterSpec,
    viewport: Viewport,
) -> ChartLayout {
    let frame = Frame::new(viewport, Margins::CARTESIAN);
    let style = &spec.style;

    let ResolvedDimensions {
        x,
        y,
        size,
        color,
        ..
    } = ResolvedDimensions::resolve(&spec.dimensions(), records);

    let x_scale = LinearScale::new(
        linear_domain(x.numeric_extent(), false, &spec.x_axis),
        (0.0, frame.inner_width),
    )
    .nice(DEFAULT_TICK_COUNT);
    let y_scale = LinearScale::new(
        linear_domain(y.numeric_extent(), false, &spec.y_axis),
        (frame.inner_height, 0.0),
    )
    .nice(DEFAULT_TICK_COUNT);

    let size_values: Option<Vec<f64>> = size
        .as_ref()
        .map(|s| s.present().filter_map(|v| v.as_f64()).collect());
    let sizes = SizeScale::new(size_values.as_deref());

    let mut colors = color
        .as_ref()
        .map(|c| OrdinalScale::new(style.palette.clone(), c.distinct()));

    let mut points = Vec::new();
    for i in 0..records.len() {
        let (Some(xv), Some(yv)) = (x.number(i), y.number(i)) else {
            continue;
        };
        let fill = match (&mut colors, &color) {
            (Some(scale), Some(c)) => scale.color(c.value(i)),
            _ => style.series_color.clone(),
        };
        let radius = sizes.radius(size.as_ref().and_then(|s| s.number(i)));
        let tip = tooltip(style, || {
            let mut lines = vec![
                tooltip_line(style, &x, i),
                tooltip_line(style, &y, i),
            ];
            if let Some(s) = &size {
                lines.push(tooltip_line(style, s, i));
            }
            if let Some(c) = &color {
                lines.push(tooltip_line(style, c, i));
            }
            lines
        });
        points.push(PointMark {
            cx: x_scale.map(xv),
            cy: y_scale.map(yv),
            r: radius,
            fill,
            opacity: Some(POINT_OPACITY),
            stroke: Some(POINT_STROKE.to_string()),
            tooltip: tip,
        });
    }
    tracing::trace!(points = points.len(), "laid out scatter chart");

    let legend = match (style.legend, &colors) {
        (Some(position), Some(scale)) => {
            let entries = scale
                .domain()
                .iter()
                .enumerate()
                .map(|(i, v)| (v.display(), scale.palette_color(i)))
                .collect();
            Some(frame.legend(position, frame.margins.top, entries))
        }
        _ => None,
    };

    let mut grid = Vec::new();
    if spec.x_axis.grid_lines {
        grid.extend(frame.vertical_grid(&x_scale));
    }
    if spec.y_axis.grid_lines {
        grid.extend(frame.horizontal_grid(&y_scale));
    }

    ChartLayout {
        family: "scatter".to_string(),
        viewport,
        margins: frame.margins,
        inner_width: frame.inner_width,
        inner_height: frame.inner_height,
        title: frame.title(style),
        x_scale: Some(ScaleInfo::Linear {
            domain: x_scale.domain(),
            range: x_scale.range(),
        }),
        y_scale: Some(ScaleInfo::Linear {
            domain: y_scale.domain(),
            range: y_scale.range(),
        }),
        x_axis: Some(linear_axis(&frame, AxisOrient::Bottom, &x_scale, &spec.x_axis)),
        y_axis: Some(linear_axis(&frame, AxisOrient::Left, &y_scale, &spec.y_axis)),
        grid,
        body: ChartBody::Points(points),
        legend,
        animation_ms: style.animation_ms,
    }
}
