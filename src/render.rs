use crate::config::{Config, RenderConfig, parse_config};
use crate::dashboard::Dashboard;
use crate::dataset::parse_records;
use crate::geo::{Mercator, parse_regions};
use crate::theme::Theme;
use crate::views::{DepictsView, MapView, Tooltip};
use anyhow::Result;
use std::path::Path;

pub fn render_dashboard_svg(dashboard: &Dashboard, theme: &Theme, config: &Config) -> String {
    let mut svg = String::new();
    let width = config.render.width.max(1.0);
    let height = config.render.height.max(1.0);

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));

    let projection = config.map.projection_for(&config.render);
    let map = dashboard.map();
    let depicts = dashboard.depicts();
    svg.push_str(&map_svg(&map, &projection, theme, &config.render));
    svg.push_str(&treemap_svg(&depicts, theme, &config.render));
    svg.push_str(&tooltip_svg(map.tooltip(), theme, "map-tooltip"));
    svg.push_str(&tooltip_svg(depicts.tooltip(), theme, "depicts-tooltip"));

    svg.push_str("</svg>");
    svg
}

/// One-shot render from JSON inputs: records array, optional GeoJSON, optional
/// JSON5 config.
pub fn render_json(
    records_json: &str,
    geo_json: Option<&str>,
    config_json: Option<&str>,
) -> crate::error::Result<String> {
    let config = match config_json {
        Some(raw) => parse_config(raw)?,
        None => Config::default(),
    };
    let records = parse_records(records_json)?;
    let regions = match geo_json {
        Some(raw) => parse_regions(raw)?,
        None => Vec::new(),
    };
    let dashboard = Dashboard::new(records, regions, &config);
    Ok(render_dashboard_svg(&dashboard, &config.theme, &config))
}

fn map_svg(map: &MapView, projection: &Mercator, theme: &Theme, render: &RenderConfig) -> String {
    let (view_w, view_h) = render.view_size();
    let mut out = String::new();
    out.push_str("<g class=\"map\">");
    out.push_str(&format!(
        "<clipPath id=\"rect-clip\"><rect x=\"0\" y=\"0\" width=\"{view_w:.2}\" height=\"{view_h:.2}\"/></clipPath>"
    ));
    out.push_str(&format!(
        "<rect x=\"0\" y=\"0\" width=\"{view_w:.2}\" height=\"{view_h:.2}\" fill=\"none\" stroke=\"{}\"/>",
        theme.border_color
    ));
    for region in map.regions() {
        let d = projection.path(region);
        if d.is_empty() {
            continue;
        }
        out.push_str(&format!(
            "<path class=\"countryPath\" data-name=\"{}\" clip-path=\"url(#rect-clip)\" d=\"{d}\" fill=\"{}\" stroke=\"{}\"/>",
            escape_xml(&region.name),
            map.fill(&region.name),
            theme.region_stroke
        ));
    }
    out.push_str("</g>");
    out
}

fn treemap_svg(depicts: &DepictsView, theme: &Theme, render: &RenderConfig) -> String {
    let (origin_x, origin_y) = render.treemap_origin();
    let mut out = String::new();
    out.push_str(&format!(
        "<g class=\"depicts\" transform=\"translate({origin_x:.2}, {origin_y:.2})\">"
    ));
    for cell in depicts.cells() {
        let rect = &cell.rect;
        let (w, h) = (rect.width(), rect.height());
        out.push_str(&format!(
            "<g transform=\"translate({:.2}, {:.2})\">",
            rect.x0, rect.y0
        ));
        out.push_str(&format!(
            "<rect width=\"{w:.2}\" height=\"{h:.2}\" fill=\"{}\" stroke=\"{}\"/>",
            cell.color, theme.cell_stroke
        ));
        if let Some(label) = cell.label.as_deref().filter(|label| !label.is_empty()) {
            out.push_str(&format!(
                "<text class=\"depicts-words\" x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" font-weight=\"bold\" fill=\"{}\" style=\"text-shadow: 0 0 2px {};\">{}</text>",
                w / 2.0,
                h / 2.0,
                theme.font_family,
                theme.label_font_size,
                theme.label_color,
                theme.label_shadow,
                escape_xml(label)
            ));
        }
        out.push_str("</g>");
    }
    out.push_str("</g>");
    out
}

fn tooltip_svg(tooltip: &Tooltip, theme: &Theme, class: &str) -> String {
    if !tooltip.visible || tooltip.text.is_empty() {
        return String::new();
    }
    let pad = 4.0;
    let text_h = f64::from(theme.font_size);
    let text_w = tooltip.text.chars().count() as f64 * text_h * 0.6;
    format!(
        "<g class=\"{class}\"><rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\"/><text x=\"{:.2}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text></g>",
        tooltip.x,
        tooltip.y,
        text_w + pad * 2.0,
        text_h + pad * 2.0,
        theme.tooltip_background,
        tooltip.x + pad,
        tooltip.y + pad + text_h * 0.8,
        theme.font_family,
        theme.font_size,
        theme.tooltip_text_color,
        escape_xml(&tooltip.text)
    )
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = "Inter".to_string();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .ok_or_else(|| anyhow::anyhow!("Invalid canvas size"))?;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _render_cfg: &RenderConfig) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::parse_regions;
    use crate::palette::ColorAssignment;
    use crate::record::Record;
    use crate::views::{Interaction, ViewId};

    fn dashboard(config: &Config) -> Dashboard {
        let regions = parse_regions(
            r#"{"features":[{"properties":{"name":"France"},
               "geometry":{"type":"Polygon","coordinates":[[[0,45],[5,45],[5,48],[0,48],[0,45]]]}}]}"#,
        )
        .unwrap();
        let records = vec![
            Record::new("France", &["cat & mouse", "dog"]),
            Record::new("France", &["cat & mouse", "dog"]),
        ];
        Dashboard::with_palette(records, regions, config, ColorAssignment::with_seed(11))
    }

    #[test]
    fn render_svg_basic() {
        let config = Config::default();
        let dashboard = dashboard(&config);
        let svg = render_dashboard_svg(&dashboard, &config.theme, &config);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("data-name=\"France\""));
        assert!(svg.contains("cat &amp; mouse"));
        assert!(svg.contains("translate(0.00, 600.00)"));
        assert!(!svg.contains("map-tooltip"));
    }

    #[test]
    fn renders_hover_state() {
        let config = Config::default();
        let mut dashboard = dashboard(&config);
        dashboard.dispatch(ViewId::Map, &Interaction::enter("France"));
        dashboard.dispatch(ViewId::Map, &Interaction::PointerMove { x: 20.0, y: 30.0 });
        let svg = render_dashboard_svg(&dashboard, &config.theme, &config);
        assert!(svg.contains("fill=\"#008000\""));
        assert!(svg.contains("class=\"map-tooltip\""));
        assert!(svg.contains("France: 2"));
    }

    #[test]
    fn renders_from_json_inputs() {
        let svg = render_json(
            r#"[{"creatorCountry":"Spain","depicts":["sea","sky"]},
                {"creatorCountry":"Spain","depicts":["sea","sky"]}]"#,
            None,
            Some("{ seed: 7, width: 800, height: 450 }"),
        )
        .unwrap();
        assert!(svg.contains("width=\"800\""));
        assert!(svg.contains(">sea</text>"));
        assert!(render_json("not json", None, None).is_err());
    }

    #[test]
    fn escapes_xml() {
        assert_eq!(escape_xml("<a&'b'>"), "&lt;a&amp;&apos;b&apos;&gt;");
    }
}
