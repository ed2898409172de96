use crate::config::{Config, load_config};
use crate::dashboard::Dashboard;
use crate::dataset::{load_records, parse_records};
use crate::geo::{Region, load_regions};
use crate::render::{render_dashboard_svg, write_output_png, write_output_svg};
use crate::snapshot::write_snapshot;
use crate::views::{Interaction, ViewId};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "artv", version, about = "Linked depicts treemap and country choropleth")]
pub struct Args {
    /// Records file (JSON array) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// GeoJSON FeatureCollection with region names in properties.name
    #[arg(short = 'g', long = "geo")]
    pub geo: Option<PathBuf>,

    /// Output file (svg/png/json). Defaults to stdout for SVG and JSON.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config file (JSON or JSON5)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Canvas width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Canvas height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,

    /// Seed for tag colors
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// Hover this country on the map before rendering
    #[arg(long = "hover-country")]
    pub hover_country: Option<String>,

    /// Hover this tag in the treemap before rendering
    #[arg(long = "hover-tag")]
    pub hover_tag: Option<String>,

    /// JSON file of interaction events to replay before rendering
    #[arg(long = "events")]
    pub events: Option<PathBuf>,

    /// More log output (-v debug, -vv trace). RUST_LOG wins when set.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

/// One replayed event: `{"view": "map", "type": "pointerEnter", "id": "France"}`.
#[derive(Debug, Deserialize)]
struct ScriptedEvent {
    view: ViewId,
    #[serde(flatten)]
    interaction: Interaction,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = load_config(args.config.as_deref())
        .with_context(|| format!("failed to load config {:?}", args.config))?;
    apply_overrides(&mut config, &args);

    let records = read_records(args.input.as_deref())?;
    let regions = match args.geo.as_deref() {
        Some(path) => load_regions(path)
            .with_context(|| format!("failed to load regions from {}", path.display()))?,
        None => Vec::<Region>::new(),
    };
    info!(records = records.len(), regions = regions.len(), "data loaded");

    let mut dashboard = Dashboard::new(records, regions, &config);
    for (view, interaction) in scripted_events(&args)? {
        let state = dashboard.dispatch(view, &interaction);
        info!(?view, ?interaction, ?state, "event replayed");
    }

    match args.output_format {
        OutputFormat::Svg => {
            let svg = render_dashboard_svg(&dashboard, &config.theme, &config);
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            let svg = render_dashboard_svg(&dashboard, &config.theme, &config);
            write_output_png(&svg, &output, &config.render)?;
        }
        OutputFormat::Json => {
            write_snapshot(args.output.as_deref(), &dashboard)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn apply_overrides(config: &mut Config, args: &Args) {
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }
    if args.seed.is_some() {
        config.palette.seed = args.seed;
    }
}

fn read_records(path: Option<&Path>) -> Result<Vec<crate::record::Record>> {
    match path {
        Some(path) if path != Path::new("-") => {
            return load_records(path)
                .with_context(|| format!("failed to load records from {}", path.display()));
        }
        _ => {}
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(parse_records(&buf)?)
}

fn scripted_events(args: &Args) -> Result<Vec<(ViewId, Interaction)>> {
    let mut events = Vec::new();
    if let Some(path) = args.events.as_deref() {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read events {}", path.display()))?;
        events.extend(parse_events(&contents)?);
    }
    if let Some(tag) = &args.hover_tag {
        events.push((ViewId::Depicts, Interaction::enter(tag.clone())));
    }
    if let Some(country) = &args.hover_country {
        events.push((ViewId::Map, Interaction::enter(country.clone())));
    }
    Ok(events)
}

fn parse_events(input: &str) -> Result<Vec<(ViewId, Interaction)>> {
    let events: Vec<ScriptedEvent> = serde_json::from_str(input)?;
    Ok(events
        .into_iter()
        .map(|event| (event.view, event.interaction))
        .collect())
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}
