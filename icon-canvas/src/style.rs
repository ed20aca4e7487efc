//! Style types and enums for canvas drawing operations.

use crate::error::{CanvasError, CanvasResult};
use std::str::FromStr;

/// Parse a CSS color string (`#rgb`, `#rrggbbaa`, `rgb()`, named colors, ...).
pub fn parse_color(s: &str) -> CanvasResult<tiny_skia::Color> {
    let parsed = csscolorparser::parse(s.trim())
        .map_err(|e| CanvasError::ColorParseError(format!("{s}: {e}")))?;
    let [r, g, b, a] = parsed.to_rgba8();
    Ok(tiny_skia::Color::from_rgba8(r, g, b, a))
}

/// Line cap style for stroke operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    /// Flat edge at the endpoint.
    #[default]
    Butt,
    /// Rounded edge extending past the endpoint.
    Round,
    /// Square edge extending past the endpoint.
    Square,
}

impl From<LineCap> for tiny_skia::LineCap {
    fn from(cap: LineCap) -> Self {
        match cap {
            LineCap::Butt => tiny_skia::LineCap::Butt,
            LineCap::Round => tiny_skia::LineCap::Round,
            LineCap::Square => tiny_skia::LineCap::Square,
        }
    }
}

impl FromStr for LineCap {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "butt" => Ok(LineCap::Butt),
            "round" => Ok(LineCap::Round),
            "square" => Ok(LineCap::Square),
            other => Err(format!("unknown line cap: {other}")),
        }
    }
}

/// Horizontal text alignment relative to the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Right,
    Center,
}

impl FromStr for TextAlign {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "start" => Ok(TextAlign::Left),
            "right" | "end" => Ok(TextAlign::Right),
            "center" | "centre" => Ok(TextAlign::Center),
            other => Err(format!("unknown text alignment: {other}")),
        }
    }
}

/// Vertical text anchor relative to the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextBaseline {
    /// Top of the em square.
    Top,
    /// Middle of the em square.
    Middle,
    /// Alphabetic baseline.
    #[default]
    Alphabetic,
    /// Bottom of the em square.
    Bottom,
}

impl FromStr for TextBaseline {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" | "hanging" => Ok(TextBaseline::Top),
            "middle" | "center" => Ok(TextBaseline::Middle),
            "alphabetic" | "baseline" => Ok(TextBaseline::Alphabetic),
            "bottom" | "ideographic" => Ok(TextBaseline::Bottom),
            other => Err(format!("unknown text baseline: {other}")),
        }
    }
}

/// Fill rule for fills, masks and clips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillRule {
    /// Non-zero winding rule (default).
    #[default]
    NonZero,
    /// Even-odd rule.
    EvenOdd,
}

impl From<FillRule> for tiny_skia::FillRule {
    fn from(rule: FillRule) -> Self {
        match rule {
            FillRule::NonZero => tiny_skia::FillRule::Winding,
            FillRule::EvenOdd => tiny_skia::FillRule::EvenOdd,
        }
    }
}

impl FromStr for FillRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nonzero" | "non-zero" | "winding" => Ok(FillRule::NonZero),
            "evenodd" | "even-odd" => Ok(FillRule::EvenOdd),
            other => Err(format!("unknown fill rule: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color_forms() {
        let red = parse_color("#ff0000").unwrap();
        assert_eq!(red.to_color_u8().red(), 255);
        assert_eq!(red.to_color_u8().alpha(), 255);

        let translucent = parse_color("#0000ff80").unwrap();
        assert_eq!(translucent.to_color_u8().blue(), 255);
        assert_eq!(translucent.to_color_u8().alpha(), 128);

        let named = parse_color(" green ").unwrap();
        assert_eq!(named.to_color_u8().green(), 128);
    }

    #[test]
    fn test_parse_color_invalid() {
        assert!(parse_color("not-a-color").is_err());
    }

    #[test]
    fn test_enum_parsing_is_case_insensitive() {
        assert_eq!("ROUND".parse::<LineCap>().unwrap(), LineCap::Round);
        assert_eq!("EvenOdd".parse::<FillRule>().unwrap(), FillRule::EvenOdd);
        assert_eq!("Center".parse::<TextAlign>().unwrap(), TextAlign::Center);
        assert!("sideways".parse::<TextBaseline>().is_err());
    }
}
