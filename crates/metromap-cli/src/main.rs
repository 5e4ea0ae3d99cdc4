use metromap::render::raster::{RasterError, RasterOptions, svg_to_png};
use metromap::render::{
    HeadlessError, OverlayFrame, RenderModel, SvgRenderOptions, Tier, layout_graph_sync,
    render_overlay_svg,
};
use metromap::{Graph, MapConfig, find_interchange_cluster};
use serde::Serialize;
use std::io::Read;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "METROMAP_LOG";

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Network(metromap::Error),
    Headless(HeadlessError),
    Raster(RasterError),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Network(err) => write!(f, "{err}"),
            CliError::Headless(err) => write!(f, "{err}"),
            CliError::Raster(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<metromap::Error> for CliError {
    fn from(value: metromap::Error) -> Self {
        Self::Network(value)
    }
}

impl From<HeadlessError> for CliError {
    fn from(value: HeadlessError) -> Self {
        Self::Headless(value)
    }
}

impl From<RasterError> for CliError {
    fn from(value: RasterError) -> Self {
        Self::Raster(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Validate,
    Layout,
    Render,
}

#[derive(Debug, Clone, Copy, Default)]
enum RenderFormat {
    #[default]
    Svg,
    Png,
}

impl FromStr for RenderFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    verbose: bool,
    zoom: Option<f64>,
    viewport_width: Option<f64>,
    viewport_height: Option<f64>,
    config: Option<String>,
    render_format: RenderFormat,
    render_scale: f32,
    background: Option<String>,
    out: Option<String>,
}

#[derive(Serialize)]
struct LayoutOut<'a> {
    zoom: f64,
    tier: Tier,
    frame: &'a OverlayFrame,
    model: &'a RenderModel,
}

fn usage() -> &'static str {
    "metromap-cli\n\
\n\
USAGE:\n\
  metromap-cli [validate] [-v] [<path>|-]\n\
  metromap-cli layout [--pretty] [--zoom <z>] [--viewport-width <w>] [--viewport-height <h>] [--config <path>] [-v] [<path>|-]\n\
  metromap-cli render [--format svg|png] [--scale <n>] [--background <css-color>] [--zoom <z>] [--viewport-width <w>] [--viewport-height <h>] [--config <path>] [--out <path>] [-v] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', the network JSON is read from stdin.\n\
  - validate prints a one-line summary of the network.\n\
  - layout prints the render model for one settled zoom as JSON.\n\
  - render prints SVG to stdout by default; use --out to write a file.\n\
  - PNG output defaults to writing next to the input file (or ./out.png for stdin).\n\
  - --config accepts JSON, or YAML when the path ends in .yaml/.yml.\n\
  - Log verbosity follows METROMAP_LOG (default: warn); -v switches to debug.\n\
"
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
            "validate" => args.command = Command::Validate,
            "layout" => args.command = Command::Layout,
            "render" => args.command = Command::Render,
            "--pretty" => args.pretty = true,
            "-v" | "--verbose" => args.verbose = true,
            "--zoom" => args.zoom = Some(parse_number(it.next())?),
            "--viewport-width" => args.viewport_width = Some(parse_positive(it.next())?),
            "--viewport-height" => args.viewport_height = Some(parse_positive(it.next())?),
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--format" => {
                let Some(fmt) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.render_format = fmt
                    .parse::<RenderFormat>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--scale" => {
                let Some(scale) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.render_scale = scale.parse::<f32>().map_err(|_| CliError::Usage(usage()))?;
                if !(args.render_scale.is_finite() && args.render_scale > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
            }
            "--background" => {
                let Some(bg) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                if !bg.trim().is_empty() {
                    args.background = Some(bg.trim().to_string());
                }
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
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
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
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

fn parse_number(value: Option<&String>) -> Result<f64, CliError> {
    let Some(value) = value else {
        return Err(CliError::Usage(usage()));
    };
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(CliError::Usage(usage())),
    }
}

fn parse_positive(value: Option<&String>) -> Result<f64, CliError> {
    let v = parse_number(value)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(CliError::Usage(usage()))
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
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

fn load_config(args: &Args) -> Result<MapConfig, CliError> {
    let mut config = match args.config.as_deref() {
        None => MapConfig::default(),
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            let is_yaml = std::path::Path::new(path)
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
            if is_yaml {
                MapConfig::from_yaml_str(&text)?
            } else {
                MapConfig::from_json_str(&text)?
            }
        }
    };
    if let Some(w) = args.viewport_width {
        config.set_value("view.viewportWidth", serde_json::json!(w));
    }
    if let Some(h) = args.viewport_height {
        config.set_value("view.viewportHeight", serde_json::json!(h));
    }
    Ok(config)
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn default_raster_out_path(input: Option<&str>, ext: &str) -> std::path::PathBuf {
    match input {
        Some(path) if path != "-" => std::path::PathBuf::from(path).with_extension(ext),
        _ => std::path::PathBuf::from(format!("out.{ext}")),
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

fn summarize(graph: &Graph) -> String {
    let clusters = graph
        .station_ids()
        .filter(|&s| find_interchange_cluster(graph, s).is_some())
        .count();
    format!(
        "ok: {}, {}, {}, {}, {}, {}",
        plural(graph.platforms().len(), "platform"),
        plural(graph.stations().len(), "station"),
        plural(graph.spans().len(), "span"),
        plural(graph.transfers().len(), "transfer"),
        plural(graph.routes().len(), "route"),
        plural(clusters, "interchange cluster"),
    )
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let graph = Graph::from_json(&text)?;
    tracing::debug!(
        platforms = graph.platforms().len(),
        stations = graph.stations().len(),
        "network decoded"
    );

    match args.command {
        Command::Validate => {
            println!("{}", summarize(&graph));
            Ok(())
        }
        Command::Layout => {
            let config = load_config(&args)?;
            let laid_out = layout_graph_sync(graph, &config, args.zoom)?;
            write_json(
                &LayoutOut {
                    zoom: laid_out.zoom,
                    tier: laid_out.tier,
                    frame: &laid_out.frame,
                    model: &laid_out.model,
                },
                args.pretty,
            )
        }
        Command::Render => {
            let config = load_config(&args)?;
            let laid_out = layout_graph_sync(graph, &config, args.zoom)?;
            match args.render_format {
                RenderFormat::Svg => {
                    let svg_options = SvgRenderOptions {
                        background: args.background.clone(),
                        ..Default::default()
                    };
                    let svg = render_overlay_svg(&laid_out.model, None, None, &svg_options);
                    write_text(&svg, args.out.as_deref())
                }
                RenderFormat::Png => {
                    let svg =
                        render_overlay_svg(&laid_out.model, None, None, &Default::default());
                    let png = svg_to_png(
                        &svg,
                        &RasterOptions {
                            scale: args.render_scale,
                            background: args.background.clone(),
                        },
                    )?;
                    let out = args.out.as_deref().map(std::path::PathBuf::from).unwrap_or_else(
                        || default_raster_out_path(args.input.as_deref(), "png"),
                    );
                    std::fs::write(&out, png)?;
                    tracing::info!(path = %out.display(), "wrote PNG");
                    Ok(())
                }
            }
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

    init_tracing(args.verbose);

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
