//! CSS font shorthand parsing.
//!
//! Accepts strings like "12px Arial" or "bold italic 14pt 'Segoe UI', sans-serif"
//! and turns them into attributes usable with cosmic-text.

use crate::error::{CanvasError, CanvasResult};
use cosmic_text::{Style, Weight};

/// Parsed font specification from a CSS font string.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFont {
    /// Font style (normal, italic, oblique).
    pub style: Style,
    /// Font weight.
    pub weight: Weight,
    /// Font size in pixels.
    pub size_px: f32,
    /// Font families in order of preference.
    pub families: Vec<String>,
}

impl Default for ParsedFont {
    fn default() -> Self {
        Self {
            style: Style::Normal,
            weight: Weight::NORMAL,
            size_px: 10.0,
            families: vec!["sans-serif".to_string()],
        }
    }
}

impl ParsedFont {
    /// Return a copy of this font with a different pixel size.
    pub fn with_size(&self, size_px: f32) -> Self {
        Self {
            size_px,
            ..self.clone()
        }
    }
}

/// Parse a CSS font string into components.
///
/// Format: `[style] [variant] [weight] size[/line-height] family[, family]*`.
/// An empty string yields the default font.
pub fn parse_font(font_str: &str) -> CanvasResult<ParsedFont> {
    let mut result = ParsedFont::default();
    let mut rest = font_str.trim();
    if rest.is_empty() {
        return Ok(result);
    }

    // Leading keywords up to the size token
    loop {
        let (token, after) = split_token(rest);
        if token.is_empty() {
            return Err(CanvasError::FontParseError(format!(
                "missing font size in '{font_str}'"
            )));
        }
        match token.to_ascii_lowercase().as_str() {
            "normal" | "small-caps" => {}
            "italic" => result.style = Style::Italic,
            "oblique" => result.style = Style::Oblique,
            "bold" => result.weight = Weight::BOLD,
            "bolder" => result.weight = Weight::EXTRA_BOLD,
            "lighter" => result.weight = Weight::LIGHT,
            t => {
                if let Some(weight) = parse_numeric_weight(t) {
                    result.weight = weight;
                } else {
                    break;
                }
            }
        }
        rest = after;
    }

    let (size_token, after) = split_token(rest);
    let size_token = size_token.split('/').next().unwrap_or_default();
    result.size_px = parse_font_size(size_token)?;

    let families = parse_font_families(after);
    if !families.is_empty() {
        result.families = families;
    }
    Ok(result)
}

fn split_token(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(i) => (&s[..i], &s[i..]),
        None => (s, ""),
    }
}

fn parse_numeric_weight(s: &str) -> Option<Weight> {
    let weight: u16 = s.parse().ok()?;
    ((100..=900).contains(&weight) && weight % 100 == 0).then_some(Weight(weight))
}

/// Parse a font size with an optional unit into pixels.
fn parse_font_size(s: &str) -> CanvasResult<f32> {
    let num_end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit() && *c != '.')
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    let (number, unit) = s.split_at(num_end);

    let size: f32 = number
        .parse()
        .map_err(|_| CanvasError::FontParseError(format!("invalid font size: '{s}'")))?;

    let multiplier = match unit {
        "" | "px" => 1.0,
        "pt" => 4.0 / 3.0,
        "em" | "rem" => 16.0,
        "%" => 16.0 / 100.0,
        other => {
            return Err(CanvasError::FontParseError(format!(
                "unsupported font size unit: '{other}'"
            )))
        }
    };
    Ok(size * multiplier)
}

fn parse_font_families(s: &str) -> Vec<String> {
    s.split(',')
        .map(|family| family.trim().trim_matches(|c| c == '"' || c == '\'').trim())
        .filter(|family| !family.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_font() {
        let font = parse_font("12px Arial").unwrap();
        assert_eq!(font.size_px, 12.0);
        assert_eq!(font.families, vec!["Arial"]);
        assert_eq!(font.weight, Weight::NORMAL);
        assert_eq!(font.style, Style::Normal);
    }

    #[test]
    fn test_bold_italic_points() {
        let font = parse_font("italic bold 12pt 'Times New Roman', serif").unwrap();
        assert!((font.size_px - 16.0).abs() < 0.01);
        assert_eq!(font.style, Style::Italic);
        assert_eq!(font.weight, Weight::BOLD);
        assert_eq!(font.families, vec!["Times New Roman", "serif"]);
    }

    #[test]
    fn test_numeric_weight_and_line_height() {
        let font = parse_font("600 16px/20px Helvetica").unwrap();
        assert_eq!(font.weight, Weight(600));
        assert_eq!(font.size_px, 16.0);
        assert_eq!(font.families, vec!["Helvetica"]);
    }

    #[test]
    fn test_size_without_family_keeps_default_family() {
        let font = parse_font("bold 20").unwrap();
        assert_eq!(font.size_px, 20.0);
        assert_eq!(font.families, vec!["sans-serif"]);
    }

    #[test]
    fn test_empty_is_default() {
        assert_eq!(parse_font("  ").unwrap(), ParsedFont::default());
    }

    #[test]
    fn test_missing_size_is_error() {
        assert!(parse_font("bold").is_err());
        assert!(parse_font("Arial").is_err());
    }
}
