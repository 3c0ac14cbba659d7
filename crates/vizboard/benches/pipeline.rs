use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use vizboard::render::{SvgRenderOptions, Viewport, render_chart, render_svg};
use vizboard::{ChartConfig, ChartType, Record, sanitize_svg_id};

fn rows(n: usize) -> Vec<Record> {
    let regions = ["north", "south", "east", "west"];
    (0..n)
        .map(|i| {
            Record::new()
                .with("month", format!("m{:02}", i % 12))
                .with("sales", ((i * 37) % 101) as f64)
                .with("profit", ((i * 13) % 47) as f64 - 10.0)
                .with("region", regions[i % regions.len()])
        })
        .collect()
}

fn fixtures() -> Vec<(&'static str, ChartType, ChartConfig)> {
    let config = |extra: serde_json::Value| {
        let mut base = serde_json::json!({
            "title": "Sales",
            "legend": { "show": true },
            "tooltip": { "show": true },
            "yAxis": { "gridLines": true }
        });
        if let (Some(base), Some(extra)) = (base.as_object_mut(), extra.as_object()) {
            base.extend(extra.clone());
        }
        ChartConfig::from_value(&base).unwrap()
    };
    vec![
        (
            "bar",
            ChartType::Bar,
            config(serde_json::json!({
                "dimensions": { "x": "month", "y": "sales", "color": "region" }
            })),
        ),
        (
            "line",
            ChartType::Line,
            config(serde_json::json!({
                "dimensions": { "x": "month", "y": "sales", "group": "region" }
            })),
        ),
        (
            "pie",
            ChartType::Pie,
            config(serde_json::json!({ "dimensions": { "x": "region", "y": "sales" } })),
        ),
        (
            "scatter",
            ChartType::Scatter,
            config(serde_json::json!({
                "dimensions": { "x": "sales", "y": "profit", "size": "sales", "color": "region" }
            })),
        ),
    ]
}

fn bench_layout_only(c: &mut Criterion) {
    let data = rows(500);
    let mut group = c.benchmark_group("layout_only");
    for (name, chart_type, config) in fixtures() {
        group.bench_function(name, |b| {
            b.iter(|| {
                let _ = render_chart(&chart_type, &data, &config, Viewport::default());
            });
        });
    }
    group.finish();
}

fn bench_render_svg(c: &mut Criterion) {
    let data = rows(500);
    let mut group = c.benchmark_group("render_svg");
    for (name, chart_type, config) in fixtures() {
        let svg_opts = SvgRenderOptions {
            diagram_id: Some(sanitize_svg_id(name)),
            ..SvgRenderOptions::default()
        };
        group.bench_function(name, |b| {
            b.iter_batched(
                || render_chart(&chart_type, &data, &config, Viewport::default()),
                |chart| {
                    let _svg = render_svg(&chart, &svg_opts);
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_layout_only, bench_render_svg);
criterion_main!(benches);
