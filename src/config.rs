use crate::choropleth::RampConfig;
use crate::color::Rgb;
use crate::error::Result;
use crate::geo::Mercator;
use crate::layout::LabelPolicy;
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Serialize)]
pub struct TreemapConfig {
    pub label: LabelPolicy,
    /// Tooltip offset from the pointer.
    pub tooltip_offset: [f64; 2],
    /// Hovering a tag also filters the other views to records depicting it.
    pub filter_on_hover: bool,
}

impl Default for TreemapConfig {
    fn default() -> Self {
        Self {
            label: LabelPolicy::default(),
            tooltip_offset: [10.0, -10.0],
            filter_on_hover: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MapConfig {
    pub ramp: RampConfig,
    pub highlight: Rgb,
    pub tooltip_offset: [f64; 2],
    /// Explicit projection; derived from the viewport when unset.
    pub projection: Option<Mercator>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            ramp: RampConfig::default(),
            highlight: Rgb::new(0, 128, 0),
            tooltip_offset: [0.0, 10.0],
            projection: None,
        }
    }
}

impl MapConfig {
    pub fn projection_for(&self, render: &RenderConfig) -> Mercator {
        self.projection
            .unwrap_or_else(|| Mercator::europe(render.width as f64, render.height as f64))
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PaletteConfig {
    /// Fixed seed for tag colors; random per run when unset.
    pub seed: Option<u64>,
}

/// Canvas size. Each view takes a quarter of the width and a third of the
/// height; the treemap sits in the bottom third.
#[derive(Debug, Clone, Serialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1600.0,
            height: 900.0,
            background: "#FFFFFF".to_string(),
        }
    }
}

impl RenderConfig {
    pub fn view_size(&self) -> (f64, f64) {
        (self.width as f64 / 4.0, self.height as f64 / 3.0)
    }

    pub fn treemap_origin(&self) -> (f64, f64) {
        (0.0, 2.0 * self.height as f64 / 3.0)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub treemap: TreemapConfig,
    pub map: MapConfig,
    pub palette: PaletteConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::classic();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            treemap: TreemapConfig::default(),
            map: MapConfig::default(),
            palette: PaletteConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    label_font_size: Option<f32>,
    label_color: Option<String>,
    cell_stroke: Option<String>,
    region_stroke: Option<String>,
    border_color: Option<String>,
    tooltip_background: Option<String>,
    background: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TreemapConfigFile {
    label_min_width: Option<f64>,
    label_px_per_char: Option<f64>,
    tooltip_offset: Option<[f64; 2]>,
    filter_on_hover: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MapConfigFile {
    ramp_start: Option<f64>,
    ramp_end: Option<f64>,
    fallback_color: Option<Rgb>,
    highlight_color: Option<Rgb>,
    tooltip_offset: Option<[f64; 2]>,
    projection: Option<Mercator>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    width: Option<f32>,
    height: Option<f32>,
    seed: Option<u64>,
    treemap: Option<TreemapConfigFile>,
    map: Option<MapConfigFile>,
}

/// Defaults, overlaid with whatever the (JSON or JSON5) file sets.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    debug!(path = %path.display(), "loading config");
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = json5::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        if theme_name == "modern" {
            config.theme = Theme::modern();
        } else if theme_name == "classic" || theme_name == "default" {
            config.theme = Theme::classic();
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.label_font_size {
            config.theme.label_font_size = v;
        }
        if let Some(v) = vars.label_color {
            config.theme.label_color = v;
        }
        if let Some(v) = vars.cell_stroke {
            config.theme.cell_stroke = v;
        }
        if let Some(v) = vars.region_stroke {
            config.theme.region_stroke = v;
        }
        if let Some(v) = vars.border_color {
            config.theme.border_color = v;
        }
        if let Some(v) = vars.tooltip_background {
            config.theme.tooltip_background = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
    }

    if let Some(v) = parsed.width {
        config.render.width = v;
    }
    if let Some(v) = parsed.height {
        config.render.height = v;
    }
    if parsed.seed.is_some() {
        config.palette.seed = parsed.seed;
    }

    if let Some(treemap) = parsed.treemap {
        if let Some(v) = treemap.label_min_width {
            config.treemap.label.min_width = v;
        }
        if let Some(v) = treemap.label_px_per_char {
            config.treemap.label.px_per_char = v;
        }
        if let Some(v) = treemap.tooltip_offset {
            config.treemap.tooltip_offset = v;
        }
        if let Some(v) = treemap.filter_on_hover {
            config.treemap.filter_on_hover = v;
        }
    }

    if let Some(map) = parsed.map {
        if let Some(v) = map.ramp_start {
            config.map.ramp.start = v;
        }
        if let Some(v) = map.ramp_end {
            config.map.ramp.end = v;
        }
        if let Some(v) = map.fallback_color {
            config.map.ramp.fallback = v;
        }
        if let Some(v) = map.highlight_color {
            config.map.highlight = v;
        }
        if let Some(v) = map.tooltip_offset {
            config.map.tooltip_offset = v;
        }
        if map.projection.is_some() {
            config.map.projection = map.projection;
        }
    }

    config.render.background = config.theme.background.clone();

    Ok(config)
}
