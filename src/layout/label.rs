use serde::Serialize;

/// Maps a cell's width to whether (and how much of) its label is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabelPolicy {
    /// Cells at or below this width get no label.
    pub min_width: f64,
    /// Approximate pixels per character at the label font size.
    pub px_per_char: f64,
}

impl Default for LabelPolicy {
    fn default() -> Self {
        Self {
            min_width: 20.0,
            px_per_char: 5.0,
        }
    }
}

impl LabelPolicy {
    pub fn label_for(&self, text: &str, cell_width: f64) -> Option<String> {
        if !(cell_width > self.min_width) || self.px_per_char <= 0.0 {
            return None;
        }
        let budget = (cell_width / self.px_per_char).floor() as usize;
        Some(text.chars().take(budget).collect())
    }
}
