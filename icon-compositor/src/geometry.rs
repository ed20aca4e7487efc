//! Geometry kit: points, rectangles and sizes (from `kurbo`) plus the
//! percentage-or-absolute values and alignments used by layer fields.

use std::fmt;
use std::str::FromStr;

pub use kurbo::{Affine, BezPath, Point, Rect, Size, Vec2};

/// Curve flattening tolerance used when converting shapes to paths.
pub const PATH_TOLERANCE: f64 = 0.1;

/// Unit of a [`UnitValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Unit {
    /// Percentage of a reference length.
    #[default]
    Percent,
    /// Absolute pixels.
    Pixels,
}

/// A length given either in pixels or as a percentage of some reference length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitValue {
    pub value: f64,
    pub unit: Unit,
}

impl UnitValue {
    pub const ZERO: UnitValue = UnitValue::px(0.0);

    pub const fn percent(value: f64) -> Self {
        Self {
            value,
            unit: Unit::Percent,
        }
    }

    pub const fn px(value: f64) -> Self {
        Self {
            value,
            unit: Unit::Pixels,
        }
    }

    /// Resolve to pixels against `reference`.
    pub fn resolve(&self, reference: f64) -> f64 {
        match self.unit {
            Unit::Percent => self.value * reference / 100.0,
            Unit::Pixels => self.value,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.value == 0.0
    }
}

impl Default for UnitValue {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for UnitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            Unit::Percent => write!(f, "{}%", self.value),
            Unit::Pixels => write!(f, "{}px", self.value),
        }
    }
}

/// Parses `50%`, `12px` or a bare number (pixels).
impl FromStr for UnitValue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (number, unit) = if let Some(n) = s.strip_suffix('%') {
            (n, Unit::Percent)
        } else if let Some(n) = s.strip_suffix("px") {
            (n, Unit::Pixels)
        } else {
            (s, Unit::Pixels)
        };
        let value: f64 = number
            .trim()
            .parse()
            .map_err(|_| format!("invalid length: '{s}'"))?;
        if !value.is_finite() {
            return Err(format!("non-finite length: '{s}'"));
        }
        Ok(Self { value, unit })
    }
}

/// Width and height as unit values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeValue {
    pub width: UnitValue,
    pub height: UnitValue,
}

impl SizeValue {
    pub const FULL: SizeValue = SizeValue {
        width: UnitValue::percent(100.0),
        height: UnitValue::percent(100.0),
    };

    pub const fn new(width: UnitValue, height: UnitValue) -> Self {
        Self { width, height }
    }

    /// Resolve against a reference size (percentages are per axis).
    pub fn resolve(&self, reference: Size) -> Size {
        Size::new(
            self.width.resolve(reference.width),
            self.height.resolve(reference.height),
        )
    }
}

impl Default for SizeValue {
    fn default() -> Self {
        Self::FULL
    }
}

/// Parses `w,h` or a single value used for both axes.
impl FromStr for SizeValue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split([',', ' ']).filter(|p| !p.trim().is_empty());
        let width: UnitValue = parts.next().ok_or("empty size")?.parse()?;
        let height = match parts.next() {
            Some(h) => h.parse()?,
            None => width,
        };
        if parts.next().is_some() {
            return Err(format!("too many components in size: '{s}'"));
        }
        Ok(Self { width, height })
    }
}

/// Horizontal alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Vertical alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VAlign {
    Top,
    #[default]
    Middle,
    Bottom,
}

/// Placement of content within a destination rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Alignment {
    pub h: HAlign,
    pub v: VAlign,
}

impl Alignment {
    pub const CENTER: Alignment = Alignment {
        h: HAlign::Center,
        v: VAlign::Middle,
    };

    pub const fn new(h: HAlign, v: VAlign) -> Self {
        Self { h, v }
    }

    /// Rectangle of `size` aligned inside `within`.
    pub fn place(&self, size: Size, within: Rect) -> Rect {
        let content = Rect::from_origin_size(Point::ORIGIN, size);
        content + self.offset(content, within)
    }

    /// Translation that moves `content` to its aligned position inside `within`.
    pub fn offset(&self, content: Rect, within: Rect) -> Vec2 {
        Vec2::new(self.offset_x(content, within), self.offset_y(content, within))
    }

    pub fn offset_x(&self, content: Rect, within: Rect) -> f64 {
        match self.h {
            HAlign::Left => within.x0 - content.x0,
            HAlign::Center => within.center().x - content.center().x,
            HAlign::Right => within.x1 - content.x1,
        }
    }

    pub fn offset_y(&self, content: Rect, within: Rect) -> f64 {
        match self.v {
            VAlign::Top => within.y0 - content.y0,
            VAlign::Middle => within.center().y - content.center().y,
            VAlign::Bottom => within.y1 - content.y1,
        }
    }
}

/// Parses space or comma separated keywords such as `top left`, `right`,
/// `center` or `bottom,center`. Unnamed axes stay centered.
impl FromStr for Alignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut alignment = Alignment::CENTER;
        for token in s.split([',', ' ']).filter(|t| !t.is_empty()) {
            match token.to_ascii_lowercase().as_str() {
                "left" => alignment.h = HAlign::Left,
                "right" => alignment.h = HAlign::Right,
                "top" => alignment.v = VAlign::Top,
                "bottom" => alignment.v = VAlign::Bottom,
                "center" | "centre" | "middle" => {}
                other => return Err(format!("unknown alignment: '{other}'")),
            }
        }
        Ok(alignment)
    }
}
