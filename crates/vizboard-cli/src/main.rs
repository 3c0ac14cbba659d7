use indexmap::IndexMap;
use serde::Serialize;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use vizboard::raster::{RasterError, RasterOptions};
use vizboard::render::{RenderRequest, RenderedChart, RequestError, SvgRenderOptions};
use vizboard::{
    ChartConfig, ChartType, DefaultDimensions, Dimensions, FieldType, Table, sanitize_svg_id,
};

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Json(serde_json::Error),
    Dataset(vizboard::Error),
    Request(RequestError),
    Raster(RasterError),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Dataset(err) => write!(f, "{err}"),
            CliError::Request(err) => write!(f, "{err}"),
            CliError::Raster(err) => write!(f, "{err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<vizboard::Error> for CliError {
    fn from(value: vizboard::Error) -> Self {
        Self::Dataset(value)
    }
}

impl From<RequestError> for CliError {
    fn from(value: RequestError) -> Self {
        Self::Request(value)
    }
}

impl From<RasterError> for CliError {
    fn from(value: RasterError) -> Self {
        Self::Raster(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Render,
    Inspect,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum RenderFormat {
    #[default]
    Svg,
    Png,
    Jpeg,
    Pdf,
}

impl RenderFormat {
    fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Pdf => "pdf",
        }
    }
}

impl FromStr for RenderFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "pdf" => Ok(Self::Pdf),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    chart_type: Option<ChartType>,
    config: Option<String>,
    width: Option<f64>,
    height: Option<f64>,
    render_format: RenderFormat,
    render_scale: f32,
    background: Option<String>,
    diagram_id: Option<String>,
    out: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InspectOut<'a> {
    columns: &'a [String],
    data_types: &'a IndexMap<String, FieldType>,
    row_count: usize,
    default_dimensions: DefaultDimensions,
}

fn usage() -> &'static str {
    "vizboard-cli\n\
\n\
USAGE:\n\
  vizboard-cli [render] [--format svg|png|jpg|pdf] [--type <chart>] [--config <path>] [--width <w>] [--height <h>] [--id <svg-id>] [--scale <n>] [--background <css-color>] [--out <path>] [<path>|-]\n\
  vizboard-cli inspect [--pretty] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - Without --config, render reads a render request: {\"type\", \"data\", \"config\", \"width\", \"height\"}.\n\
  - With --config, render reads a dataset (.json or .csv) and draws it with that chart config;\n\
    without dimensions, the dataset's first category and first numeric column are used and\n\
    unset axis, color, legend, tooltip and animation blocks take the editor defaults.\n\
  - --type, --width and --height override the request's values.\n\
  - render prints SVG to stdout by default; use --out to write a file.\n\
  - PNG/JPG/PDF output defaults to writing next to the input file (or ./out.<ext> for stdin).\n\
  - inspect prints the columns, inferred types, row count and default dimensions as JSON.\n\
"
}

fn next_value<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<&'a String, CliError> {
    it.next().ok_or(CliError::Usage(usage()))
}

fn parse_size(raw: &str) -> Result<f64, CliError> {
    let v = raw.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
    if !(v.is_finite() && v >= 0.0) {
        return Err(CliError::Usage(usage()));
    }
    Ok(v)
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        render_scale: 1.0,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "render" => args.command = Command::Render,
            "inspect" => args.command = Command::Inspect,
            "--pretty" => args.pretty = true,
            "--type" => {
                let ty = next_value(&mut it)?;
                args.chart_type = Some(ChartType::from(ty.trim().to_string()));
            }
            "--config" => args.config = Some(next_value(&mut it)?.clone()),
            "--width" => args.width = Some(parse_size(next_value(&mut it)?)?),
            "--height" => args.height = Some(parse_size(next_value(&mut it)?)?),
            "--format" => {
                args.render_format = next_value(&mut it)?
                    .parse::<RenderFormat>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--scale" => {
                args.render_scale = next_value(&mut it)?
                    .parse::<f32>()
                    .map_err(|_| CliError::Usage(usage()))?;
                if !(args.render_scale.is_finite() && args.render_scale > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
            }
            "--background" => {
                let bg = next_value(&mut it)?;
                if !bg.trim().is_empty() {
                    args.background = Some(bg.trim().to_string());
                }
            }
            "--id" => args.diagram_id = Some(next_value(&mut it)?.clone()),
            "--out" => args.out = Some(next_value(&mut it)?.clone()),
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut stdout, value)?;
    } else {
        serde_json::to_writer(&mut stdout, value)?;
    }
    writeln!(stdout)?;
    Ok(())
}

fn write_bytes(bytes: &[u8], out: &str) -> Result<(), CliError> {
    if out == "-" {
        std::io::stdout().lock().write_all(bytes)?;
    } else {
        std::fs::write(out, bytes)?;
    }
    Ok(())
}

fn default_raster_out_path(input: Option<&str>, ext: &str) -> PathBuf {
    match input {
        Some(path) if path != "-" => PathBuf::from(path).with_extension(ext),
        _ => PathBuf::from(format!("out.{ext}")),
    }
}

/// Dataset text is CSV when the file says so, or when stdin does not look like JSON.
fn load_table(input: Option<&str>, text: &str) -> Result<Table, CliError> {
    let is_csv = match input.filter(|p| *p != "-") {
        Some(path) => Path::new(path)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv")),
        None => !matches!(text.trim_start().chars().next(), Some('[' | '{')),
    };
    if is_csv {
        Ok(Table::from_csv_str(text)?)
    } else {
        Ok(Table::from_json_str(text)?)
    }
}

fn dataset_request(args: &Args, config_path: &str, text: &str) -> Result<RenderRequest, CliError> {
    let table = load_table(args.input.as_deref(), text)?;
    let mut config = ChartConfig::from_json_str(&std::fs::read_to_string(config_path)?)?;
    if config.dimensions.is_none() {
        let defaults = table.default_dimensions();
        config = match (defaults.x, defaults.y) {
            (Some(x), Some(y)) => config.or_editor_defaults(&x, &y),
            (Some(x), None) => ChartConfig {
                dimensions: Some(Dimensions::new(x)),
                ..config
            },
            (None, _) => config,
        };
    }
    Ok(RenderRequest {
        chart_type: args.chart_type.clone().unwrap_or(ChartType::Bar),
        data: table.data,
        config,
        width: None,
        height: None,
    })
}

fn render_chart(args: &Args, text: &str) -> Result<RenderedChart, CliError> {
    let mut request = match args.config.as_deref() {
        Some(config_path) => dataset_request(args, config_path, text)?,
        None => {
            let mut request = vizboard::render::parse_render_request(text)?;
            if let Some(ty) = &args.chart_type {
                request.chart_type = ty.clone();
            }
            request
        }
    };
    if args.width.is_some() {
        request.width = args.width;
    }
    if args.height.is_some() {
        request.height = args.height;
    }
    Ok(vizboard::render::render_request(&request))
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;

    match args.command {
        Command::Inspect => {
            let table = load_table(args.input.as_deref(), &text)?;
            let out = InspectOut {
                columns: &table.columns,
                data_types: &table.data_types,
                row_count: table.data.len(),
                default_dimensions: table.default_dimensions(),
            };
            write_json(&out, args.pretty)
        }
        Command::Render => {
            let chart = render_chart(&args, &text)?;
            let svg_options = SvgRenderOptions {
                diagram_id: args.diagram_id.as_deref().map(sanitize_svg_id),
                ..Default::default()
            };
            let svg = vizboard::render::render_svg(&chart, &svg_options);

            let raster = RasterOptions {
                scale: args.render_scale,
                background: args.background.clone(),
                ..Default::default()
            };
            let bytes = match args.render_format {
                RenderFormat::Svg => {
                    return match args.out.as_deref() {
                        None => {
                            print!("{svg}");
                            Ok(())
                        }
                        Some(path) => write_bytes(svg.as_bytes(), path),
                    };
                }
                RenderFormat::Png => vizboard::raster::svg_to_png(&svg, &raster)?,
                RenderFormat::Jpeg => vizboard::raster::svg_to_jpeg(&svg, &raster)?,
                RenderFormat::Pdf => vizboard::raster::svg_to_pdf(&svg)?,
            };
            let out = args.out.clone().unwrap_or_else(|| {
                default_raster_out_path(args.input.as_deref(), args.render_format.extension())
                    .to_string_lossy()
                    .to_string()
            });
            write_bytes(&bytes, &out)
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
