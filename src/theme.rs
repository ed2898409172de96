use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub label_font_size: f32,
    pub label_color: String,
    pub label_shadow: String,
    pub cell_stroke: String,
    pub region_stroke: String,
    pub border_color: String,
    pub tooltip_background: String,
    pub tooltip_text_color: String,
    pub background: String,
}

impl Theme {
    /// Black outlines and white bold labels.
    pub fn classic() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            font_size: 12.0,
            label_font_size: 8.0,
            label_color: "#FFFFFF".to_string(),
            label_shadow: "#000000".to_string(),
            cell_stroke: "#000000".to_string(),
            region_stroke: "#000000".to_string(),
            border_color: "#000000".to_string(),
            tooltip_background: "#FFFFFF".to_string(),
            tooltip_text_color: "#000000".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            label_font_size: 8.0,
            label_color: "#FFFFFF".to_string(),
            label_shadow: "#1C2430".to_string(),
            cell_stroke: "#1C2430".to_string(),
            region_stroke: "#7A8AA6".to_string(),
            border_color: "#C7D2E5".to_string(),
            tooltip_background: "#F8FAFF".to_string(),
            tooltip_text_color: "#1C2430".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }
}
