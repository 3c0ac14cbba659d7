use crate::layout::{
    Frame, categorical_x_axis, linear_axis, linear_domain, tooltip, tooltip_line,
};
use crate::model::{
    AxisOrient, AxisTick, BarMark, ChartBody, ChartLayout, Margins, ScaleInfo, Viewport,
};
use crate::resolve::ResolvedDimensions;
use crate::scale::{BandScale, DEFAULT_TICK_COUNT, LinearScale, OrdinalScale};
use vizboard_core::{BarSpec, Record, Scalar};

/// Vertical bars: band x over the x field, zero-based linear y.
pub fn layout_bar_chart(records: &[Record], spec: &BarSpec, viewport: Viewport) -> ChartLayout {
    let frame = Frame::new(viewport, Margins::CARTESIAN);
    let style = &spec.style;

    let ResolvedDimensions { x, y, color, .. } =
        ResolvedDimensions::resolve(&spec.dimensions(), records);

    let band = BandScale::new(x.distinct(), frame.inner_width);
    let y_scale = LinearScale::new(
        linear_domain(y.numeric_extent(), true, &spec.y_axis),
        (frame.inner_height, 0.0),
    )
    .nice(DEFAULT_TICK_COUNT);
    let baseline = y_scale.map(0.0).clamp(0.0, frame.inner_height);

    let mut colors = match &color {
        Some(c) => OrdinalScale::new(style.palette.clone(), c.distinct()),
        None => OrdinalScale::new(style.palette.clone(), vec![Scalar::from("default")]),
    };

    let mut bars = Vec::new();
    for i in 0..records.len() {
        let Some(xv) = x.value(i) else {
            continue;
        };
        let Some(left) = band.position(xv) else {
            continue;
        };
        let top = match y.number(i) {
            Some(v) => y_scale.map(v),
            None => baseline,
        };
        let fill = match &color {
            Some(c) => colors.color(c.value(i)),
            None => colors.palette_color(0),
        };
        let tip = tooltip(style, || {
            let mut lines = vec![xv.display(), tooltip_line(style, &y, i)];
            if let Some(c) = &color {
                lines.push(tooltip_line(style, c, i));
            }
            lines
        });
        bars.push(BarMark {
            category: xv.display(),
            x: left,
            y: top.min(baseline),
            width: band.bandwidth(),
            height: (baseline - top).abs(),
            fill,
            tooltip: tip,
        });
    }
    tracing::trace!(bars = bars.len(), "laid out bar chart");

    let x_ticks = band
        .domain()
        .iter()
        .filter_map(|v| {
            band.position(v).map(|p| AxisTick {
                position: p + band.bandwidth() / 2.0,
                label: v.display(),
            })
        })
        .collect();

    let legend = match (style.legend, &color) {
        (Some(position), Some(_)) => {
            let entries = colors
                .domain()
                .iter()
                .enumerate()
                .map(|(i, v)| (v.display(), colors.palette_color(i)))
                .collect();
            Some(frame.legend(position, 0.0, entries))
        }
        _ => None,
    };

    let grid = if spec.y_axis.grid_lines {
        frame.horizontal_grid(&y_scale)
    } else {
        Vec::new()
    };

    ChartLayout {
        family: "bar".to_string(),
        viewport,
        margins: frame.margins,
        inner_width: frame.inner_width,
        inner_height: frame.inner_height,
        title: frame.title(style),
        x_scale: Some(ScaleInfo::Band {
            domain: band.domain().iter().map(Scalar::display).collect(),
            step: band.step(),
            bandwidth: band.bandwidth(),
        }),
        y_scale: Some(ScaleInfo::Linear {
            domain: y_scale.domain(),
            range: y_scale.range(),
        }),
        x_axis: Some(categorical_x_axis(&frame, x_ticks, &spec.x_axis)),
        y_axis: Some(linear_axis(&frame, AxisOrient::Left, &y_scale, &spec.y_axis)),
        grid,
        body: ChartBody::Bars(bars),
        legend,
        animation_ms: style.animation_ms,
    }
}
