//! Standalone SVG serialization of a [`RenderedChart`].

use crate::model::{
    AxisLayout, AxisOrient, BarMark, ChartBody, ChartLayout, GridLine, LegendLayout, LineSeries,
    PieLayout, Placeholder, PointMark, RenderedChart, SliceMark, TextLabel, Tooltip, Viewport,
};
use std::f64::consts::TAU;
use std::fmt::Write as _;

mod util;

use util::{escape_xml, fmt, fmt_path, fmt_path_into};

pub const GRID_STROKE: &str = "#e0e0e0";
pub const GRID_DASHARRAY: &str = "3,3";
pub const LEADER_STROKE: &str = "#999";

#[derive(Debug, Clone)]
pub struct SvgRenderOptions {
    /// Root element id; also scopes the embedded stylesheet.
    pub diagram_id: Option<String>,
    /// When false, marks are emitted without `<title>` tooltip children.
    pub include_tooltips: bool,
}

impl Default for SvgRenderOptions {
    fn default() -> Self {
        Self {
            diagram_id: None,
            include_tooltips: true,
        }
    }
}

pub fn render_svg(chart: &RenderedChart, options: &SvgRenderOptions) -> String {
    match chart {
        RenderedChart::Chart(layout) => render_chart_svg(layout, options),
        RenderedChart::Placeholder(placeholder, viewport) => {
            render_placeholder_svg(placeholder, *viewport, options)
        }
    }
}

fn diagram_id(options: &SvgRenderOptions) -> String {
    escape_xml(options.diagram_id.as_deref().unwrap_or("vizboard"))
}

fn open_svg(out: &mut String, id: &str, viewport: Viewport, class: &str) {
    let _ = write!(
        out,
        r#"<svg id="{id}" xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" class="vizboard {class}" role="img" aria-roledescription="{class}">"#,
        w = fmt(viewport.width),
        h = fmt(viewport.height),
    );
}

fn render_placeholder_svg(
    placeholder: &Placeholder,
    viewport: Viewport,
    options: &SvgRenderOptions,
) -> String {
    let id = diagram_id(options);
    let mut out = String::new();
    open_svg(&mut out, &id, viewport, "placeholder");
    let _ = write!(
        &mut out,
        r##"<text x="{x}" y="{y}" text-anchor="middle" dominant-baseline="middle" font-family="sans-serif" font-size="14" fill="#6b7280" class="placeholder-message">{text}</text>"##,
        x = fmt(viewport.width / 2.0),
        y = fmt(viewport.height / 2.0),
        text = escape_xml(placeholder.message()),
    );
    out.push_str("</svg>");
    out
}

fn render_chart_svg(layout: &ChartLayout, options: &SvgRenderOptions) -> String {
    let id = diagram_id(options);
    let mut out = String::new();
    open_svg(&mut out, &id, layout.viewport, &layout.family);
    write_style(&mut out, &id, layout.animation_ms);

    if let Some(title) = &layout.title {
        let _ = write!(
            &mut out,
            r#"<text class="chart-title" x="{x}" y="{y}" text-anchor="middle" font-size="16px" font-weight="bold">{text}</text>"#,
            x = fmt(title.x),
            y = fmt(title.y),
            text = escape_xml(&title.text),
        );
    }

    match &layout.body {
        ChartBody::Pie(pie) => write_pie(&mut out, pie, options),
        body => {
            let _ = write!(
                &mut out,
                r#"<g class="plot" transform="translate({x},{y})">"#,
                x = fmt(layout.margins.left),
                y = fmt(layout.margins.top),
            );
            if let Some(axis) = &layout.x_axis {
                write_axis(&mut out, axis, layout.inner_height);
            }
            if let Some(axis) = &layout.y_axis {
                write_axis(&mut out, axis, layout.inner_height);
            }
            write_grid(&mut out, &layout.grid);
            out.push_str(r#"<g class="marks">"#);
            match body {
                ChartBody::Bars(bars) => {
                    for bar in bars {
                        write_bar(&mut out, bar, options);
                    }
                }
                ChartBody::Lines(series) => {
                    for s in series {
                        write_series(&mut out, s, options);
                    }
                }
                ChartBody::Points(points) => {
                    for p in points {
                        write_point(&mut out, p, "point", options);
                    }
                }
                ChartBody::Pie(_) => {}
            }
            out.push_str("</g></g>");
        }
    }

    if let Some(legend) = &layout.legend {
        write_legend(&mut out, legend);
    }
    out.push_str("</svg>");
    out
}

fn write_style(out: &mut String, id: &str, animation_ms: Option<u64>) {
    let _ = write!(
        out,
        "<style>#{id}{{font-family:sans-serif;}}#{id} .axis text{{fill:currentColor;}}"
    );
    if let Some(ms) = animation_ms {
        let _ = write!(
            out,
            "@keyframes {id}-fade-in{{from{{opacity:0;}}to{{opacity:1;}}}}#{id} .marks{{animation:{id}-fade-in {ms}ms ease-in-out both;}}"
        );
    }
    out.push_str("</style>");
}

fn write_tooltip(out: &mut String, tooltip: Option<&Tooltip>, options: &SvgRenderOptions) {
    if !options.include_tooltips {
        return;
    }
    if let Some(t) = tooltip {
        let _ = write!(out, "<title>{}</title>", escape_xml(&t.text()));
    }
}

fn write_text_label(out: &mut String, label: &TextLabel, class: &str) {
    let transform = match label.rotate {
        Some(deg) => format!(r#" transform="rotate({})""#, fmt(deg)),
        None => String::new(),
    };
    let _ = write!(
        out,
        r#"<text class="{class}"{transform} x="{x}" y="{y}" text-anchor="{anchor}" fill="currentColor">{text}</text>"#,
        x = fmt(label.x),
        y = fmt(label.y),
        anchor = label.anchor.as_str(),
        text = escape_xml(&label.text),
    );
}

fn write_axis(out: &mut String, axis: &AxisLayout, inner_height: f64) {
    const TICK: f64 = 6.0;
    match axis.orient {
        AxisOrient::Bottom => {
            let _ = write!(
                out,
                r#"<g class="axis x-axis" transform="translate(0,{y})" fill="none" font-size="10" text-anchor="middle">"#,
                y = fmt(inner_height),
            );
            let _ = write!(
                out,
                r#"<path class="domain" stroke="currentColor" d="M0,{t}V0H{l}V{t}"/>"#,
                t = fmt(TICK),
                l = fmt_path(axis.length),
            );
            for tick in &axis.ticks {
                let text_attrs = if axis.rotate_labels {
                    r#" transform="rotate(-45)" style="text-anchor: end;""#
                } else {
                    ""
                };
                let _ = write!(
                    out,
                    r#"<g class="tick" transform="translate({x},0)"><line stroke="currentColor" y2="{t}"/><text fill="currentColor" y="9" dy="0.71em"{text_attrs}>{label}</text></g>"#,
                    x = fmt(tick.position),
                    t = fmt(TICK),
                    label = escape_xml(&tick.label),
                );
            }
        }
        AxisOrient::Left => {
            out.push_str(
                r#"<g class="axis y-axis" fill="none" font-size="10" text-anchor="end">"#,
            );
            let _ = write!(
                out,
                r#"<path class="domain" stroke="currentColor" d="M-{t},{l}H0V0H-{t}"/>"#,
                t = fmt(TICK),
                l = fmt_path(axis.length),
            );
            for tick in &axis.ticks {
                let _ = write!(
                    out,
                    r#"<g class="tick" transform="translate(0,{y})"><line stroke="currentColor" x2="-{t}"/><text fill="currentColor" x="-9" dy="0.32em">{label}</text></g>"#,
                    y = fmt(tick.position),
                    t = fmt(TICK),
                    label = escape_xml(&tick.label),
                );
            }
        }
    }
    out.push_str("</g>");
    if let Some(title) = &axis.title {
        write_text_label(out, title, "axis-title");
    }
}

fn write_grid(out: &mut String, grid: &[GridLine]) {
    if grid.is_empty() {
        return;
    }
    out.push_str(r#"<g class="grid">"#);
    for line in grid {
        let _ = write!(
            out,
            r#"<line x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}" stroke="{GRID_STROKE}" stroke-dasharray="{GRID_DASHARRAY}"/>"#,
            x1 = fmt(line.x1),
            y1 = fmt(line.y1),
            x2 = fmt(line.x2),
            y2 = fmt(line.y2),
        );
    }
    out.push_str("</g>");
}

fn write_bar(out: &mut String, bar: &BarMark, options: &SvgRenderOptions) {
    let _ = write!(
        out,
        r#"<rect class="bar" x="{x}" y="{y}" width="{w}" height="{h}" fill="{fill}">"#,
        x = fmt(bar.x),
        y = fmt(bar.y),
        w = fmt(bar.width),
        h = fmt(bar.height),
        fill = escape_xml(&bar.fill),
    );
    write_tooltip(out, bar.tooltip.as_ref(), options);
    out.push_str("</rect>");
}

fn write_point(out: &mut String, p: &PointMark, class: &str, options: &SvgRenderOptions) {
    let _ = write!(
        out,
        r#"<circle class="{class}" cx="{cx}" cy="{cy}" r="{r}" fill="{fill}""#,
        cx = fmt(p.cx),
        cy = fmt(p.cy),
        r = fmt(p.r),
        fill = escape_xml(&p.fill),
    );
    if let Some(opacity) = p.opacity {
        let _ = write!(out, r#" opacity="{}""#, fmt(opacity));
    }
    if let Some(stroke) = &p.stroke {
        let _ = write!(out, r#" stroke="{}" stroke-width="1""#, escape_xml(stroke));
    }
    out.push('>');
    write_tooltip(out, p.tooltip.as_ref(), options);
    out.push_str("</circle>");
}

fn line_path(points: &[(f64, f64)]) -> String {
    let mut d = String::new();
    for (i, (x, y)) in points.iter().enumerate() {
        d.push(if i == 0 { 'M' } else { 'L' });
        fmt_path_into(&mut d, *x);
        d.push(',');
        fmt_path_into(&mut d, *y);
    }
    d
}

fn write_series(out: &mut String, series: &LineSeries, options: &SvgRenderOptions) {
    let group_attr = match &series.group {
        Some(g) => format!(r#" data-group="{}""#, escape_xml(g)),
        None => String::new(),
    };
    let _ = write!(out, r#"<g class="series"{group_attr}>"#);
    if !series.points.is_empty() {
        let _ = write!(
            out,
            r#"<path class="line" d="{d}" fill="none" stroke="{stroke}" stroke-width="2"/>"#,
            d = line_path(&series.points),
            stroke = escape_xml(&series.stroke),
        );
    }
    for marker in &series.markers {
        write_point(out, marker, "point", options);
    }
    out.push_str("</g>");
}

/// Arc path for a slice with inner radius 0, matching d3-shape's output.
fn slice_path(radius: f64, slice: &SliceMark) -> String {
    let span = slice.end_angle - slice.start_angle;
    let r = fmt_path(radius);
    if radius <= 1e-12 {
        return "M0,0Z".to_string();
    }
    if span >= TAU - 1e-12 {
        return format!("M0,-{r}A{r},{r},0,1,1,0,{r}A{r},{r},0,1,1,0,-{r}Z");
    }
    let (x0, y0) = crate::pie::polar_xy(radius, slice.start_angle);
    if span <= 1e-12 {
        return format!("M{},{}L0,0Z", fmt_path(x0), fmt_path(y0));
    }
    let (x1, y1) = crate::pie::polar_xy(radius, slice.end_angle);
    let large = if span > std::f64::consts::PI { 1 } else { 0 };
    format!(
        "M{x0},{y0}A{r},{r},0,{large},1,{x1},{y1}L0,0Z",
        x0 = fmt_path(x0),
        y0 = fmt_path(y0),
        x1 = fmt_path(x1),
        y1 = fmt_path(y1),
    )
}

fn write_pie(out: &mut String, pie: &PieLayout, options: &SvgRenderOptions) {
    let class = if pie.donut { "pie donut" } else { "pie" };
    let _ = write!(
        out,
        r#"<g class="{class}" transform="translate({x},{y})"><g class="marks">"#,
        x = fmt(pie.cx),
        y = fmt(pie.cy),
    );
    for slice in &pie.slices {
        out.push_str(r#"<g class="arc">"#);
        let _ = write!(
            out,
            r#"<path d="{d}" fill="{fill}" stroke="white" style="stroke-width: 2px;">"#,
            d = slice_path(pie.radius, slice),
            fill = escape_xml(&slice.fill),
        );
        write_tooltip(out, slice.tooltip.as_ref(), options);
        out.push_str("</path>");
        if let Some(label) = &slice.label {
            let _ = write!(
                out,
                r#"<text transform="translate({x},{y})" text-anchor="{anchor}" style="font-size: 12px;">{text}</text>"#,
                x = fmt(label.x),
                y = fmt(label.y),
                anchor = label.anchor.as_str(),
                text = escape_xml(&label.text),
            );
            let points = label
                .polyline
                .iter()
                .map(|(x, y)| format!("{},{}", fmt(*x), fmt(*y)))
                .collect::<Vec<_>>()
                .join(" ");
            let _ = write!(
                out,
                r#"<polyline points="{points}" style="fill: none; stroke: {LEADER_STROKE}; stroke-width: 1px;"/>"#,
            );
        }
        out.push_str("</g>");
    }
    out.push_str("</g></g>");
}

fn write_legend(out: &mut String, legend: &LegendLayout) {
    let _ = write!(
        out,
        r#"<g class="legend" font-family="sans-serif" font-size="10" text-anchor="{}">"#,
        legend.anchor.as_str()
    );
    for item in &legend.items {
        let _ = write!(
            out,
            r#"<g transform="translate(0,{y})"><rect x="{sx}" width="19" height="19" fill="{fill}"/><text x="{tx}" y="9.5" dy="0.32em">{text}</text></g>"#,
            y = fmt(item.y),
            sx = fmt(item.swatch_x),
            fill = escape_xml(&item.color),
            tx = fmt(item.text_x),
            text = escape_xml(&item.label),
        );
    }
    out.push_str("</g>");
}
