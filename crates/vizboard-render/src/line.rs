use crate::layout::{
    Frame, categorical_x_axis, linear_axis, linear_domain, tooltip, tooltip_line,
};
use crate::model::{
    AxisOrient, AxisTick, ChartBody, ChartLayout, LineSeries, Margins, PointMark, ScaleInfo,
    Viewport,
};
use crate::resolve::ResolvedDimensions;
use crate::scale::{DEFAULT_TICK_COUNT, LinearScale, OrdinalScale, PointScale, distinct};
use vizboard_core::{LineSpec, Record, Scalar};

pub const MARKER_RADIUS: f64 = 4.0;

/// One polyline per group (or a single line), points sorted by x.
pub fn layout_line_chart(records: &[Record], spec: &LineSpec, viewport: Viewport) -> ChartLayout {
    let frame = Frame::new(viewport, Margins::CARTESIAN);
    let style = &spec.style;

    let ResolvedDimensions { x, y, group, .. } =
        ResolvedDimensions::resolve(&spec.dimensions(), records);

    // Records that can be plotted, stably sorted by x.
    let mut order: Vec<usize> = (0..records.len())
        .filter(|&i| x.value(i).is_some() && y.number(i).is_some())
        .collect();
    order.sort_by(|&a, &b| match (x.value(a), x.value(b)) {
        (Some(va), Some(vb)) => va.compare(vb),
        _ => std::cmp::Ordering::Equal,
    });

    let x_scale = PointScale::new(
        distinct(order.iter().filter_map(|&i| x.value(i))),
        frame.inner_width,
    );
    let y_scale = LinearScale::new(
        linear_domain(y.numeric_extent(), true, &spec.y_axis),
        (frame.inner_height, 0.0),
    )
    .nice(DEFAULT_TICK_COUNT);

    let point = |i: usize| -> Option<(f64, f64)> {
        let px = x_scale.position(x.value(i)?)?;
        let py = y_scale.map(y.number(i)?);
        Some((px, py))
    };

    let mut series = Vec::new();
    let mut legend_entries = Vec::new();
    match &group {
        Some(g) => {
            let mut colors = OrdinalScale::new(style.palette.clone(), g.distinct());
            // Partition in first-seen group order; absent groups form their own partition.
            let mut keys: Vec<Option<Scalar>> = Vec::new();
            for i in 0..records.len() {
                let key = g.value(i).cloned();
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
            for key in keys {
                let stroke = colors.color(key.as_ref());
                let members: Vec<usize> = order
                    .iter()
                    .copied()
                    .filter(|&i| g.value(i) == key.as_ref())
                    .collect();
                let label = key.as_ref().map(Scalar::display).unwrap_or_default();
                series.push(build_series(
                    &members,
                    Some(label),
                    stroke,
                    &point,
                    |i| {
                        tooltip(style, || {
                            vec![
                                x.display(i),
                                tooltip_line(style, &y, i),
                                tooltip_line(style, g, i),
                            ]
                        })
                    },
                ));
            }
            legend_entries = colors
                .domain()
                .iter()
                .enumerate()
                .map(|(i, v)| (v.display(), colors.palette_color(i)))
                .collect();
        }
        None => {
            series.push(build_series(
                &order,
                None,
                style.series_color.clone(),
                &point,
                |i| {
                    tooltip(style, || {
                        vec![x.display(i), tooltip_line(style, &y, i)]
                    })
                },
            ));
        }
    }
    tracing::trace!(series = series.len(), points = order.len(), "laid out line chart");

    let x_ticks = x_scale
        .domain()
        .iter()
        .filter_map(|v| {
            x_scale.position(v).map(|p| AxisTick {
                position: p,
                label: v.display(),
            })
        })
        .collect();

    let legend = match style.legend {
        Some(position) if group.is_some() => Some(frame.legend(position, 0.0, legend_entries)),
        _ => None,
    };

    let grid = if spec.y_axis.grid_lines {
        frame.horizontal_grid(&y_scale)
    } else {
        Vec::new()
    };

    ChartLayout {
        family: "line".to_string(),
        viewport,
        margins: frame.margins,
        inner_width: frame.inner_width,
        inner_height: frame.inner_height,
        title: frame.title(style),
        x_scale: Some(ScaleInfo::Point {
            domain: x_scale.domain().iter().map(Scalar::display).collect(),
            step: x_scale.step(),
        }),
        y_scale: Some(ScaleInfo::Linear {
            domain: y_scale.domain(),
            range: y_scale.range(),
        }),
        x_axis: Some(categorical_x_axis(&frame, x_ticks, &spec.x_axis)),
        y_axis: Some(linear_axis(&frame, AxisOrient::Left, &y_scale, &spec.y_axis)),
        grid,
        body: ChartBody::Lines(series),
        legend,
        animation_ms: style.animation_ms,
    }
}

fn build_series(
    members: &[usize],
    group: Option<String>,
    stroke: String,
    point: &dyn Fn(usize) -> Option<(f64, f64)>,
    tip: impl Fn(usize) -> Option<crate::model::Tooltip>,
) -> LineSeries {
    let mut points = Vec::with_capacity(members.len());
    let mut markers = Vec::with_capacity(members.len());
    for &i in members {
        let Some((cx, cy)) = point(i) else {
            continue;
        };
        points.push((cx, cy));
        markers.push(PointMark {
            cx,
            cy,
            r: MARKER_RADIUS,
            fill: stroke.clone(),
            opacity: None,
            stroke: None,
            tooltip: tip(i),
        });
    }
    LineSeries {
        group,
        stroke,
        points,
        markers,
    }
}
