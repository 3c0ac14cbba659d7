#![forbid(unsafe_code)]

//! `vizboard` is a headless chart configuration model and renderer for data dashboards.
//!
//! The core crate holds datasets, chart configuration and the dashboard entities; the render
//! crate turns `(chart type, rows, config, viewport)` into a positioned layout and standalone SVG.
//!
//! # Features
//!
//! - `render`: enable layout + SVG rendering (`vizboard::render`)
//! - `raster`: enable PNG/JPG/PDF output via pure-Rust SVG rasterization/conversion

pub use vizboard_core::*;

#[cfg(feature = "render")]
pub use render::{ChartRenderer, sanitize_svg_id};
#[cfg(feature = "raster")]
pub use render::raster;

#[cfg(feature = "render")]
pub mod render {
    pub use vizboard_render::model::{ChartLayout, Placeholder, RenderedChart, Viewport};
    pub use vizboard_render::svg::{SvgRenderOptions, render_svg};
    pub use vizboard_render::{
        Error as RequestError, RenderRequest, parse_render_request, render_chart, render_request,
    };

    #[cfg(feature = "raster")]
    pub mod raster;

    use vizboard_core::{ChartConfig, ChartType, Record, RepoError, Workspace};

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Request(#[from] RequestError),
        #[error(transparent)]
        Repository(#[from] RepoError),
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// Converts an arbitrary string into a conservative SVG `id` token suitable for embedding
    /// several charts in the same document.
    ///
    /// The root id also scopes the chart's stylesheet and animation keyframes, so two inlined
    /// charts with the same id would restyle each other.
    ///
    /// This helper:
    /// - trims whitespace
    /// - replaces unsupported characters with `-`
    /// - ensures the id starts with an ASCII letter by prefixing `c-` when needed
    pub fn sanitize_svg_id(raw: &str) -> String {
        let raw = raw.trim();
        if raw.is_empty() {
            return "c-untitled".to_string();
        }

        let mut out = String::with_capacity(raw.len() + 4);
        for ch in raw.chars() {
            let ok = ch.is_ascii_alphanumeric() || ch == '-' || ch == '_';
            out.push(if ok { ch } else { '-' });
        }

        if !out.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
            out.insert_str(0, "c-");
        }

        while out.contains("--") {
            out = out.replace("--", "-");
        }
        let out = out.trim_matches('-');
        if out.is_empty() || out == "c" {
            return "c-untitled".to_string();
        }
        out.to_string()
    }

    /// Bundles a default viewport and SVG options for repeated headless renders.
    ///
    /// Rendering is CPU-bound and performs no I/O, so a renderer can be shared freely across
    /// threads.
    #[derive(Debug, Clone, Default)]
    pub struct ChartRenderer {
        pub viewport: Viewport,
        pub svg: SvgRenderOptions,
    }

    impl ChartRenderer {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_viewport(mut self, viewport: Viewport) -> Self {
            self.viewport = viewport;
            self
        }

        pub fn with_diagram_id(mut self, diagram_id: &str) -> Self {
            self.svg.diagram_id = Some(sanitize_svg_id(diagram_id));
            self
        }

        pub fn render(
            &self,
            chart_type: &ChartType,
            records: &[Record],
            config: &ChartConfig,
        ) -> RenderedChart {
            render_chart(chart_type, records, config, self.viewport)
        }

        pub fn render_svg(
            &self,
            chart_type: &ChartType,
            records: &[Record],
            config: &ChartConfig,
        ) -> String {
            render_svg(&self.render(chart_type, records, config), &self.svg)
        }

        /// Renders a JSON render request; the request's own `width`/`height` win over the
        /// renderer's viewport.
        pub fn render_request_json(&self, text: &str) -> Result<String> {
            let mut request = parse_render_request(text)?;
            request.width = request.width.or(Some(self.viewport.width));
            request.height = request.height.or(Some(self.viewport.height));
            Ok(render_svg(&render_request(&request), &self.svg))
        }

        /// Renders a stored visualization against the rows of its dataset.
        pub fn render_visualization(
            &self,
            workspace: &Workspace,
            visualization_id: &str,
        ) -> Result<String> {
            let (vis, dataset) = workspace.chart_inputs(visualization_id)?;
            Ok(self.render_svg(&vis.chart_type, &dataset.data, &vis.config))
        }

        #[cfg(feature = "raster")]
        pub fn render_png(
            &self,
            chart_type: &ChartType,
            records: &[Record],
            config: &ChartConfig,
            raster: &raster::RasterOptions,
        ) -> raster::Result<Vec<u8>> {
            raster::svg_to_png(&self.render_svg(chart_type, records, config), raster)
        }

        #[cfg(feature = "raster")]
        pub fn render_jpeg(
            &self,
            chart_type: &ChartType,
            records: &[Record],
            config: &ChartConfig,
            raster: &raster::RasterOptions,
        ) -> raster::Result<Vec<u8>> {
            raster::svg_to_jpeg(&self.render_svg(chart_type, records, config), raster)
        }

        #[cfg(feature = "raster")]
        pub fn render_pdf(
            &self,
            chart_type: &ChartType,
            records: &[Record],
            config: &ChartConfig,
        ) -> raster::Result<Vec<u8>> {
            raster::svg_to_pdf(&self.render_svg(chart_type, records, config))
        }
    }
}
