use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_family: Option<String>,
    pub font_size: f64,
    pub font_weight: Option<String>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: None,
            font_size: 14.0,
            font_weight: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    pub line_count: usize,
}

pub trait TextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics;
}

/// Font-free measurer: each terminal column of the widest line counts as
/// `font_size * char_width_factor` pixels.
#[derive(Debug, Clone, Default)]
pub struct DeterministicTextMeasurer {
    pub char_width_factor: f64,
    pub line_height_factor: f64,
}

impl DeterministicTextMeasurer {
    pub fn normalized_text_lines(text: &str) -> Vec<&str> {
        text.split('\n').map(|line| line.trim_end_matches('\r')).collect()
    }
}

impl TextMeasurer for DeterministicTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        let char_width_factor = if self.char_width_factor == 0.0 {
            0.6
        } else {
            self.char_width_factor
        };
        let line_height_factor = if self.line_height_factor == 0.0 {
            1.2
        } else {
            self.line_height_factor
        };

        let lines = Self::normalized_text_lines(text);
        let font_size = style.font_size.max(1.0);
        let max_columns = lines.iter().map(|l| l.width()).max().unwrap_or(0);

        TextMetrics {
            width: max_columns as f64 * font_size * char_width_factor,
            height: lines.len() as f64 * font_size * line_height_factor,
            line_count: lines.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widest_line_sets_the_width() {
        let m = DeterministicTextMeasurer::default();
        let style = TextStyle {
            font_size: 10.0,
            ..Default::default()
        };
        let metrics = m.measure("abc\nabcdef", &style);
        assert_eq!(metrics.line_count, 2);
        assert!((metrics.width - 36.0).abs() < 1e-9);
        assert!((metrics.height - 24.0).abs() < 1e-9);
    }

    #[test]
    fn wide_glyphs_count_double() {
        let m = DeterministicTextMeasurer::default();
        let style = TextStyle::default();
        let narrow = m.measure("ab", &style).width;
        let wide = m.measure("漢", &style).width;
        assert!((narrow - wide).abs() < 1e-9);
    }
}
