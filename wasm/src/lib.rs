use artwork_views::render_json;
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ViewsRenderInput {
    records: serde_json::Value,
    regions: Option<serde_json::Value>,
    config: Option<serde_json::Value>,
}

fn render_input(input: ViewsRenderInput) -> Result<String, String> {
    let records = input.records.to_string();
    let regions = input.regions.map(|value| value.to_string());
    let config = input.config.map(|value| value.to_string());
    render_json(&records, regions.as_deref(), config.as_deref()).map_err(|error| error.to_string())
}

/// Renders both views from `{records, regions?, config?}`.
#[wasm_bindgen]
pub fn render_views_svg(input_json: &str) -> Result<String, JsValue> {
    let input = serde_json::from_str::<ViewsRenderInput>(input_json)
        .map_err(|error| JsValue::from_str(&error.to_string()))?;
    render_input(input).map_err(|error| JsValue::from_str(&error))
}
