use serde_json::json;
use std::f64::consts::TAU;
use vizboard_core::{ChartConfig, ChartType, Record};
use vizboard_render::model::{ChartBody, ChartLayout, Placeholder, RenderedChart, ScaleInfo, Viewport};
use vizboard_render::render_chart;

fn records(rows: serde_json::Value) -> Vec<Record> {
    serde_json::from_value(rows).expect("records")
}

fn config(value: serde_json::Value) -> ChartConfig {
    ChartConfig::from_value(&value).expect("config")
}

fn layout(chart_type: ChartType, rows: serde_json::Value, cfg: serde_json::Value) -> ChartLayout {
    match render_chart(&chart_type, &records(rows), &config(cfg), Viewport::default()) {
        RenderedChart::Chart(layout) => *layout,
        other => panic!("expected a chart, got {other:?}"),
    }
}

#[test]
fn empty_data_renders_no_data_placeholder_for_every_type() {
    let cfg = config(json!({ "dimensions": { "x": "a", "y": "b" } }));
    for ty in [
        "bar", "line", "pie", "donut", "scatter", "area", "heatmap", "treemap", "sunburst",
    ] {
        let out = render_chart(&ChartType::from(ty.to_string()), &[], &cfg, Viewport::default());
        assert_eq!(out.placeholder(), Some(&Placeholder::NoData), "type {ty}");
        assert_eq!(out.viewport(), Viewport::default());
    }
}

#[test]
fn unsupported_type_renders_placeholder() {
    let rows = records(json!([{ "x": "A", "y": 1 }]));
    let cfg = config(json!({ "dimensions": { "x": "x", "y": "y" } }));
    let out = render_chart(&ChartType::Heatmap, &rows, &cfg, Viewport::default());
    let Some(Placeholder::Unsupported { chart_type }) = out.placeholder() else {
        panic!("expected unsupported placeholder");
    };
    assert_eq!(chart_type, "heatmap");
    assert_eq!(Placeholder::NoData.message(), "No data available to display");
    assert_eq!(out.placeholder().unwrap().message(), "Chart type not supported");
}

#[test]
fn bar_heights_are_proportional_to_values() {
    let chart = layout(
        ChartType::Bar,
        json!([{ "x": "A", "y": 10 }, { "x": "B", "y": 30 }]),
        json!({ "dimensions": { "x": "x", "y": "y" } }),
    );
    assert_eq!(chart.family, "bar");
    assert_eq!(chart.inner_width, 510.0);
    assert_eq!(chart.inner_height, 300.0);

    let Some(ScaleInfo::Band { domain, .. }) = &chart.x_scale else {
        panic!("expected band x scale");
    };
    assert_eq!(domain, &vec!["A".to_string(), "B".to_string()]);

    let ChartBody::Bars(bars) = &chart.body else {
        panic!("expected bars");
    };
    assert_eq!(bars.len(), 2);
    assert!((bars[1].height / bars[0].height - 3.0).abs() < 1e-9);
    assert!((bars[0].y + bars[0].height - 300.0).abs() < 1e-9);
    assert_eq!(bars[0].fill, "#1f77b4");
    assert!(bars[0].tooltip.is_none());
    assert!(chart.legend.is_none());
}

#[test]
fn bar_band_domain_is_distinct_in_first_seen_order() {
    let chart = layout(
        ChartType::Bar,
        json!([
            { "x": "B", "y": 1 },
            { "x": "A", "y": 2 },
            { "x": "B", "y": 3 },
            { "y": 4 }
        ]),
        json!({ "dimensions": { "x": "x", "y": "y" } }),
    );
    let Some(ScaleInfo::Band { domain, .. }) = &chart.x_scale else {
        panic!("expected band x scale");
    };
    assert_eq!(domain, &vec!["B".to_string(), "A".to_string()]);
    let ChartBody::Bars(bars) = &chart.body else {
        panic!("expected bars");
    };
    assert_eq!(bars.len(), 3);
}

#[test]
fn bar_missing_y_gives_zero_height_bar() {
    let chart = layout(
        ChartType::Bar,
        json!([{ "x": "A", "y": 5 }, { "x": "B" }]),
        json!({ "dimensions": { "x": "x", "y": "y" } }),
    );
    let ChartBody::Bars(bars) = &chart.body else {
        panic!("expected bars");
    };
    assert_eq!(bars[1].height, 0.0);
    assert!(bars.iter().all(|b| b.height.is_finite() && b.y.is_finite()));
}

#[test]
fn bar_color_dimension_adds_legend_and_tooltips() {
    let chart = layout(
        ChartType::Bar,
        json!([
            { "x": "A", "y": 1, "region": "north" },
            { "x": "B", "y": 2, "region": "south" }
        ]),
        json!({
            "dimensions": { "x": "x", "y": "y", "color": "region" },
            "colors": ["#ff0000", "not-a-color", "#00ff00"],
            "legend": { "show": true, "position": "right" },
            "tooltip": { "show": true }
        }),
    );
    let ChartBody::Bars(bars) = &chart.body else {
        panic!("expected bars");
    };
    assert_eq!(bars[0].fill, "#ff0000");
    assert_eq!(bars[1].fill, "#00ff00");
    let tip = bars[1].tooltip.as_ref().expect("tooltip");
    assert_eq!(tip.lines, vec!["B", "y: 2", "region: south"]);

    let legend = chart.legend.as_ref().expect("legend");
    let labels: Vec<&str> = legend.items.iter().map(|i| i.label.as_str()).collect();
    assert_eq!(labels, ["north", "south"]);
    assert_eq!(legend.items[1].y, 20.0);
}

#[test]
fn linear_nice_only_widens_the_domain() {
    let chart = layout(
        ChartType::Bar,
        json!([{ "x": "A", "y": 7.3 }, { "x": "B", "y": 93.1 }]),
        json!({ "dimensions": { "x": "x", "y": "y" } }),
    );
    let Some(ScaleInfo::Linear { domain, .. }) = chart.y_scale else {
        panic!("expected linear y scale");
    };
    assert_eq!(domain, (0.0, 100.0));
}

#[test]
fn y_axis_overrides_apply_before_nicing() {
    let chart = layout(
        ChartType::Bar,
        json!([{ "x": "A", "y": 7 }]),
        json!({
            "dimensions": { "x": "x", "y": "y" },
            "yAxis": { "max": 48, "title": "Count", "gridLines": true }
        }),
    );
    let Some(ScaleInfo::Linear { domain, .. }) = chart.y_scale else {
        panic!("expected linear y scale");
    };
    assert_eq!(domain, (0.0, 50.0));
    let axis = chart.y_axis.as_ref().expect("y axis");
    assert_eq!(axis.title.as_ref().map(|t| t.text.as_str()), Some("Count"));
    assert_eq!(axis.ticks.first().map(|t| t.label.as_str()), Some("0"));
    assert_eq!(axis.ticks.last().map(|t| t.label.as_str()), Some("50"));
    assert_eq!(chart.grid.len(), axis.ticks.len());
}

#[test]
fn line_points_are_sorted_by_x() {
    let chart = layout(
        ChartType::Line,
        json!([
            { "x": 3, "y": 30 },
            { "x": 1, "y": 10 },
            { "x": 2, "y": 20 }
        ]),
        json!({ "dimensions": { "x": "x", "y": "y" } }),
    );
    let Some(ScaleInfo::Point { domain, .. }) = &chart.x_scale else {
        panic!("expected point x scale");
    };
    assert_eq!(domain, &vec!["1".to_string(), "2".to_string(), "3".to_string()]);

    let ChartBody::Lines(series) = &chart.body else {
        panic!("expected lines");
    };
    assert_eq!(series.len(), 1);
    let points = &series[0].points;
    assert_eq!(points.len(), 3);
    assert!(points.windows(2).all(|w| w[0].0 < w[1].0));
    // Higher values sit higher on screen.
    assert!(points.windows(2).all(|w| w[0].1 > w[1].1));
    assert_eq!(series[0].stroke, "#3b82f6");
    assert_eq!(series[0].markers.len(), 3);
}

#[test]
fn line_groups_become_separate_series() {
    let chart = layout(
        ChartType::Line,
        json!([
            { "m": "Jan", "v": 1, "s": "a" },
            { "m": "Jan", "v": 2, "s": "b" },
            { "m": "Feb", "v": 3, "s": "a" },
            { "m": "Feb", "v": 4, "s": "b" },
            { "m": "Mar", "s": "a" }
        ]),
        json!({
            "dimensions": { "x": "m", "y": "v", "group": "s" },
            "legend": { "show": true }
        }),
    );
    let ChartBody::Lines(series) = &chart.body else {
        panic!("expected lines");
    };
    let groups: Vec<_> = series.iter().map(|s| s.group.as_deref()).collect();
    assert_eq!(groups, [Some("a"), Some("b")]);
    assert!(series.iter().all(|s| s.points.len() == 2));
    assert_ne!(series[0].stroke, series[1].stroke);
    assert_eq!(chart.legend.as_ref().map(|l| l.items.len()), Some(2));
}

#[test]
fn pie_angles_cover_the_circle() {
    let chart = layout(
        ChartType::Pie,
        json!([
            { "c": "A", "v": 1 },
            { "c": "B", "v": 2 },
            { "c": "C", "v": 3 }
        ]),
        json!({ "dimensions": { "x": "c", "y": "v" } }),
    );
    let ChartBody::Pie(pie) = &chart.body else {
        panic!("expected pie");
    };
    assert_eq!(pie.slices[0].start_angle, 0.0);
    let total: f64 = pie
        .slices
        .iter()
        .map(|s| s.end_angle - s.start_angle)
        .sum();
    assert!((total - TAU).abs() < 1e-9);
    for pair in pie.slices.windows(2) {
        assert_eq!(pair[0].end_angle, pair[1].start_angle);
    }
    assert_eq!(pie.radius, 160.0);
    assert_eq!((pie.cx, pie.cy), (300.0, 200.0));
}

#[test]
fn pie_labels_skip_thin_slices() {
    let chart = layout(
        ChartType::Pie,
        json!([{ "c": "A", "v": 1 }, { "c": "B", "v": 99 }]),
        json!({ "dimensions": { "x": "c", "y": "v" }, "tooltip": { "show": true } }),
    );
    let ChartBody::Pie(pie) = &chart.body else {
        panic!("expected pie");
    };
    assert!(pie.slices[0].label.is_none());
    let label = pie.slices[1].label.as_ref().expect("label for B");
    assert_eq!(label.text, "B");
    assert!((pie.slices[0].percentage - 1.0).abs() < 1e-9);
    let tip = pie.slices[1].tooltip.as_ref().expect("tooltip");
    assert_eq!(tip.lines, vec!["B", "v: 99", "Percentage: 99.0%"]);
}

#[test]
fn pie_with_zero_total_has_empty_slices() {
    let chart = layout(
        ChartType::Donut,
        json!([{ "c": "A", "v": 0 }, { "c": "B", "v": -5 }]),
        json!({ "dimensions": { "x": "c", "y": "v" } }),
    );
    assert_eq!(chart.family, "donut");
    let ChartBody::Pie(pie) = &chart.body else {
        panic!("expected pie");
    };
    assert!(pie.donut);
    assert_eq!(pie.inner_radius, 0.0);
    assert!(pie.slices.iter().all(|s| s.start_angle == s.end_angle));
    assert!(pie.slices.iter().all(|s| s.label.is_none()));
}

#[test]
fn scatter_sizes_points_from_size_field() {
    let chart = layout(
        ChartType::Scatter,
        json!([
            { "a": 1, "b": 10, "s": 1 },
            { "a": 2, "b": 20, "s": 5 },
            { "a": "n/a", "b": 30, "s": 3 }
        ]),
        json!({ "dimensions": { "x": "a", "y": "b", "size": "s" } }),
    );
    let ChartBody::Points(points) = &chart.body else {
        panic!("expected points");
    };
    assert_eq!(points.len(), 2);
    assert_eq!(points[0].r, 4.0);
    assert_eq!(points[1].r, 20.0);
    assert_eq!(points[0].opacity, Some(0.7));
    assert_eq!(points[0].stroke.as_deref(), Some("#fff"));
}

#[test]
fn zero_viewport_still_renders() {
    let rows = records(json!([{ "x": "A", "y": 1 }]));
    let cfg = config(json!({ "dimensions": { "x": "x", "y": "y" } }));
    let out = render_chart(
        &ChartType::Bar,
        &rows,
        &cfg,
        Viewport::new(Some(-10.0), Some(f64::NAN)),
    );
    let chart = out.layout().expect("chart");
    assert_eq!(chart.viewport, Viewport { width: 0.0, height: 0.0 });
    assert_eq!(chart.inner_width, 0.0);
}

#[test]
fn line_sorts_numeric_column_with_text_cells() {
    let rows: Vec<serde_json::Value> = (0..100)
        .map(|i| {
            let x = if i % 10 == 0 {
                json!("N/A")
            } else {
                json!((i * 37) % 100)
            };
            json!({ "x": x, "y": i })
        })
        .collect();
    let chart = layout(
        ChartType::Line,
        serde_json::Value::Array(rows),
        json!({ "dimensions": { "x": "x", "y": "y" } }),
    );
    let Some(ScaleInfo::Point { domain, .. }) = &chart.x_scale else {
        panic!("expected point x scale");
    };
    assert_eq!(domain.len(), 91);
    assert_eq!(domain.last().map(String::as_str), Some("N/A"));
    let numbers: Vec<f64> = domain[..90]
        .iter()
        .map(|d| d.parse().expect("numeric tick"))
        .collect();
    assert!(numbers.windows(2).all(|w| w[0] < w[1]));

    let ChartBody::Lines(series) = &chart.body else {
        panic!("expected lines");
    };
    assert_eq!(series[0].points.len(), 100);
    assert!(series[0].points.windows(2).all(|w| w[0].0 <= w[1].0));
}

#[test]
fn line_orders_mixed_x_values_numbers_first() {
    let chart = layout(
        ChartType::Line,
        json!([
            { "x": "10", "y": 1 },
            { "x": "apple", "y": 2 },
            { "x": 9.5, "y": 3 },
            { "x": "9", "y": 4 },
            { "x": "N/A", "y": 5 },
            { "x": 3, "y": 6 },
            { "x": "2", "y": 7 }
        ]),
        json!({ "dimensions": { "x": "x", "y": "y" } }),
    );
    let Some(ScaleInfo::Point { domain, .. }) = &chart.x_scale else {
        panic!("expected point x scale");
    };
    assert_eq!(domain, &vec!["2", "3", "9", "9.5", "10", "N/A", "apple"]);
}

#[test]
fn scatter_with_identical_x_collapses_to_midpoint() {
    let chart = layout(
        ChartType::Scatter,
        json!([
            { "a": 5, "b": 1 },
            { "a": 5, "b": 2 },
            { "a": 5, "b": 3 }
        ]),
        json!({ "dimensions": { "x": "a", "y": "b" } }),
    );
    let ChartBody::Points(points) = &chart.body else {
        panic!("expected points");
    };
    assert_eq!(points.len(), 3);
    for p in points {
        assert_eq!(p.cx, chart.inner_width / 2.0);
        assert!(p.cy.is_finite());
    }
    let axis = chart.x_axis.as_ref().expect("x axis");
    assert_eq!(axis.ticks.len(), 1);
    assert_eq!(axis.ticks[0].label, "5");
}

#[test]
fn bar_with_all_zero_values_has_flat_bars() {
    let chart = layout(
        ChartType::Bar,
        json!([{ "x": "A", "y": 0 }, { "x": "B", "y": 0 }]),
        json!({ "dimensions": { "x": "x", "y": "y" } }),
    );
    let ChartBody::Bars(bars) = &chart.body else {
        panic!("expected bars");
    };
    assert_eq!(bars.len(), 2);
    for bar in bars {
        assert_eq!(bar.height, 0.0);
        assert_eq!(bar.y, chart.inner_height / 2.0);
        assert!(bar.x.is_finite() && bar.width.is_finite());
    }
}

#[test]
fn scatter_x_grid_lines_are_vertical() {
    let chart = layout(
        ChartType::Scatter,
        json!([{ "a": 0, "b": 1 }, { "a": 50, "b": 2 }, { "a": 100, "b": 3 }]),
        json!({
            "dimensions": { "x": "a", "y": "b" },
            "xAxis": { "gridLines": true }
        }),
    );
    let axis = chart.x_axis.as_ref().expect("x axis");
    assert!(!chart.grid.is_empty());
    assert_eq!(chart.grid.len(), axis.ticks.len());
    for (line, tick) in chart.grid.iter().zip(&axis.ticks) {
        assert_eq!(line.x1, line.x2);
        assert_eq!(line.x1, tick.position);
        assert_eq!((line.y1, line.y2), (0.0, chart.inner_height));
    }
}

#[test]
fn tooltip_format_applies_to_numeric_values() {
    let chart = layout(
        ChartType::Bar,
        json!([{ "x": "A", "y": 1234.5 }]),
        json!({
            "dimensions": { "x": "x", "y": "y" },
            "tooltip": { "show": true, "format": ",.1f" }
        }),
    );
    let ChartBody::Bars(bars) = &chart.body else {
        panic!("expected bars");
    };
    let tip = bars[0].tooltip.as_ref().expect("tooltip");
    assert_eq!(tip.lines, vec!["A", "y: 1,234.5"]);
}
