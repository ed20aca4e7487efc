//! Tick and label generation for gauge-style layers.
//!
//! [`GaugeTicks`] holds everything that is shared between gauges: the major
//! and minor tick divisions, the labels, fitting the result into the layer
//! rectangle and caching the generated paths. A [`TickGeometry`] supplies the
//! shape specifics, either a (possibly partial) ellipse or a straight line.

mod circular;
mod linear;

pub use circular::Circular;
pub use linear::{Linear, Orientation};

use super::Drawable;
use crate::action_data::{set_color, set_count, set_number, set_parsed, ActionFields};
use crate::error::RenderResult;
use crate::geometry::{Affine, Alignment, BezPath, HAlign, Point, Rect, SizeValue, UnitValue, VAlign, Vec2};
use futures::future::{self, LocalBoxFuture};
use futures::FutureExt;
use icon_canvas::{parse_font, Canvas, Color, FillRule, LineCap, ParsedFont, TextAlign, TextBaseline};
use kurbo::Shape;
use log::{debug, warn};
use std::fmt::Debug;
use std::str::FromStr;

/// Circular gauge ticks (`cticks_` fields).
pub type CircularTicks = GaugeTicks<Circular>;
/// Linear gauge ticks (`lticks_` fields).
pub type LinearTicks = GaugeTicks<Linear>;

/// Gap in pixels between the longest tick and its labels.
const LABEL_GAP: f64 = 2.0;

/// Largest tick count accepted from action data.
pub const MAX_TICKS: usize = 10_000;

/// Side of the curve that ticks or labels are drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TickPlacement {
    Outside,
    #[default]
    Inside,
    /// Centred on the curve.
    Center,
}

impl TickPlacement {
    /// Direction multiplier along the outward normal.
    fn sign(self) -> f64 {
        match self {
            TickPlacement::Outside => 1.0,
            TickPlacement::Inside => -1.0,
            TickPlacement::Center => 0.0,
        }
    }
}

impl FromStr for TickPlacement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "outside" | "out" => Ok(TickPlacement::Outside),
            "inside" | "in" => Ok(TickPlacement::Inside),
            "center" | "centre" | "middle" => Ok(TickPlacement::Center),
            other => Err(format!("unknown tick placement: '{other}'")),
        }
    }
}

/// Label orientation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum LabelRotation {
    /// Upright.
    #[default]
    None,
    /// Follow the tangent, text top facing outward.
    Auto,
    /// Follow the tangent, text top facing inward.
    AutoInward,
    /// Fixed angle in degrees.
    Angle(f64),
}

impl FromStr for LabelRotation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(LabelRotation::None),
            "auto" | "outward" => Ok(LabelRotation::Auto),
            "autoinward" | "auto-inward" | "inward" => Ok(LabelRotation::AutoInward),
            other => other
                .parse::<f64>()
                .ok()
                .filter(|deg| deg.is_finite())
                .map(LabelRotation::Angle)
                .ok_or_else(|| format!("unknown label rotation: '{other}'")),
        }
    }
}

/// One set of evenly spaced ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct TickDivision {
    pub count: usize,
    /// Percentages are relative to the geometry's length scale.
    pub length: UnitValue,
    pub placement: TickPlacement,
    /// Stroke width in pixels.
    pub width: f64,
    pub color: Color,
    pub cap: LineCap,
}

impl TickDivision {
    pub fn major() -> Self {
        Self {
            count: 0,
            length: UnitValue::percent(15.0),
            placement: TickPlacement::Inside,
            width: 2.0,
            color: Color::WHITE,
            cap: LineCap::Butt,
        }
    }

    pub fn minor() -> Self {
        Self {
            length: UnitValue::percent(8.0),
            width: 1.0,
            ..Self::major()
        }
    }

    fn apply_field(&mut self, suffix: &str, field: &str, value: &str) -> bool {
        match suffix {
            "Count" => set_count(&mut self.count, MAX_TICKS, field, value),
            "Len" => set_parsed(&mut self.length, field, value),
            "Place" => set_parsed(&mut self.placement, field, value),
            "Width" => set_number(&mut self.width, field, value),
            "Color" => set_color(&mut self.color, field, value),
            "Cap" => set_parsed(&mut self.cap, field, value),
            _ => false,
        }
    }

    /// Extent of one tick away from the curve on its placement side.
    fn reach(&self, length_scale: f64) -> f64 {
        let length = self.length.resolve(length_scale).abs();
        match self.placement {
            TickPlacement::Center => length / 2.0,
            _ => length,
        }
    }
}

/// Text labels spread evenly over the gauge span.
#[derive(Debug, Clone, PartialEq)]
pub struct TickLabels {
    pub texts: Vec<String>,
    pub font: ParsedFont,
    pub color: Color,
    pub placement: TickPlacement,
    pub rotation: LabelRotation,
    /// Extra distance from the ticks in pixels.
    pub padding: f64,
}

impl Default for TickLabels {
    fn default() -> Self {
        Self {
            texts: Vec::new(),
            font: ParsedFont::default().with_size(12.0),
            color: Color::WHITE,
            placement: TickPlacement::Inside,
            rotation: LabelRotation::None,
            padding: 0.0,
        }
    }
}

impl TickLabels {
    fn apply_field(&mut self, field: &str, value: &str) -> bool {
        match field {
            "labels" => {
                self.texts = if value.trim().is_empty() {
                    Vec::new()
                } else {
                    value.split(',').map(|t| t.trim().to_string()).collect()
                };
                true
            }
            "labelFont" => {
                match parse_font(value) {
                    Ok(font) => self.font = font,
                    Err(err) => warn!("Keeping previous label font: {err}"),
                }
                true
            }
            "labelColor" => set_color(&mut self.color, field, value),
            "labelPlace" => set_parsed(&mut self.placement, field, value),
            "labelRotate" => set_parsed(&mut self.rotation, field, value),
            "labelPad" => set_number(&mut self.padding, field, value),
            _ => false,
        }
    }
}

/// Pixel metrics of a geometry inside the layer rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickMetrics {
    /// Centre (circular) or start point (linear).
    pub origin: Point,
    /// Radii (circular) or length and cross size (linear).
    pub extent: Vec2,
    /// Reference for percentage tick lengths.
    pub length_scale: f64,
}

/// A position along the curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Station {
    pub point: Point,
    /// Unit vector pointing to the outside.
    pub normal: Vec2,
    /// Direction of travel, in radians clockwise from the x axis.
    pub tangent_angle: f64,
}

/// Shape specifics of a gauge.
pub trait TickGeometry: Debug + Clone + Default + PartialEq {
    /// Id prefix of the layer.
    const PREFIX: &'static str;

    /// Apply a geometry specific field.
    fn apply_field(&mut self, field: &str, value: &str) -> bool;

    /// Metrics for the box the gauge is laid out in.
    fn metrics(&self, bounds: Rect) -> TickMetrics;

    /// Number of intervals `count` evenly spaced items divide the span into.
    fn divisor(&self, count: usize) -> usize;

    /// Position at fraction `t` (0..=1) of the span.
    fn station(&self, metrics: &TickMetrics, t: f64) -> Station;

    /// Fraction of the span of item `index` out of `count`.
    fn fraction(&self, index: usize, count: usize) -> f64 {
        index as f64 / self.divisor(count).max(1) as f64
    }

    /// One line segment per tick; zero lengths are skipped.
    fn tick_path(
        &self,
        metrics: &TickMetrics,
        lengths: &[f64],
        placement: TickPlacement,
    ) -> Option<BezPath> {
        let mut path = BezPath::new();
        let count = lengths.len();
        for (i, length) in lengths.iter().enumerate() {
            if *length == 0.0 {
                continue;
            }
            let station = self.station(metrics, self.fraction(i, count));
            let (from, to) = match placement {
                TickPlacement::Center => (
                    station.point - station.normal * (length.abs() / 2.0),
                    station.point + station.normal * (length.abs() / 2.0),
                ),
                _ => (station.point, station.point + station.normal * *length),
            };
            path.move_to(from);
            path.line_to(to);
        }
        (!path.elements().is_empty()).then_some(path)
    }
}

/// Paths and placement generated for one rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct TicksCache {
    pub rect: Rect,
    /// Layout before fitting, in rectangle coordinates.
    pub major: Option<BezPath>,
    pub minor: Option<BezPath>,
    pub labels: Option<BezPath>,
    /// Scale-to-fit and alignment applied when drawing.
    pub transform: Affine,
}

/// Gauge ticks with labels, generic over the curve geometry.
#[derive(Debug, Clone)]
pub struct GaugeTicks<G: TickGeometry> {
    geometry: G,
    size: SizeValue,
    align: Alignment,
    major: TickDivision,
    minor: TickDivision,
    labels: TickLabels,
    cache: Option<TicksCache>,
    dirty: bool,
    generation: u64,
}

impl<G: TickGeometry> Default for GaugeTicks<G> {
    fn default() -> Self {
        Self {
            geometry: G::default(),
            size: SizeValue::FULL,
            align: Alignment::CENTER,
            major: TickDivision::major(),
            minor: TickDivision::minor(),
            labels: TickLabels::default(),
            cache: None,
            dirty: true,
            generation: 0,
        }
    }
}

impl<G: TickGeometry> GaugeTicks<G> {
    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    pub fn geometry_mut(&mut self) -> &mut G {
        self.dirty = true;
        &mut self.geometry
    }

    pub fn major(&self) -> &TickDivision {
        &self.major
    }

    pub fn set_major(&mut self, major: TickDivision) {
        self.major = major;
        self.dirty = true;
    }

    pub fn minor(&self) -> &TickDivision {
        &self.minor
    }

    pub fn set_minor(&mut self, minor: TickDivision) {
        self.minor = minor;
        self.dirty = true;
    }

    pub fn labels(&self) -> &TickLabels {
        &self.labels
    }

    pub fn set_labels(&mut self, labels: TickLabels) {
        self.labels = labels;
        self.dirty = true;
    }

    pub fn set_size(&mut self, size: SizeValue) {
        self.size = size;
        self.dirty = true;
    }

    pub fn set_align(&mut self, align: Alignment) {
        self.align = align;
        self.dirty = true;
    }

    /// Number of times the geometry has been regenerated.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Generated geometry for `rect`, regenerated only when needed.
    pub fn layout(&mut self, canvas: &mut Canvas, rect: Rect) -> &TicksCache {
        let layout = match self.cache.take() {
            Some(cache) if !self.dirty && cache.rect == rect => cache,
            _ => {
                let layout = self.build(canvas, rect);
                self.dirty = false;
                self.generation += 1;
                debug!("Regenerated {} ticks for {:?}", G::PREFIX, rect);
                layout
            }
        };
        self.cache.insert(layout)
    }

    fn bounds(&self, rect: Rect) -> Rect {
        self.align.place(self.size.resolve(rect.size()), rect)
    }

    /// Signed lengths of the major ticks.
    fn major_lengths(&self, metrics: &TickMetrics) -> Vec<f64> {
        let length = self.major.length.resolve(metrics.length_scale).abs();
        let signed = if self.major.placement == TickPlacement::Inside {
            -length
        } else {
            length
        };
        vec![signed; self.major.count]
    }

    /// Signed lengths of the minor ticks, zero where a major tick sits.
    fn minor_lengths(&self, metrics: &TickMetrics) -> Vec<f64> {
        let length = self.minor.length.resolve(metrics.length_scale).abs();
        let signed = if self.minor.placement == TickPlacement::Inside {
            -length
        } else {
            length
        };
        let minor_div = self.geometry.divisor(self.minor.count).max(1);
        let major_div = self.geometry.divisor(self.major.count).max(1);
        (0..self.minor.count)
            .map(|i| {
                let on_major = self.major.count > 0 && (i * major_div) % minor_div == 0;
                if on_major {
                    0.0
                } else {
                    signed
                }
            })
            .collect()
    }

    /// Distance of the labels from the curve.
    fn label_offset(&self, metrics: &TickMetrics) -> f64 {
        if self.labels.placement == TickPlacement::Center {
            return 0.0;
        }
        let longest = [&self.major, &self.minor]
            .into_iter()
            .filter(|d| d.count > 0 && d.placement == self.labels.placement)
            .map(|d| d.reach(metrics.length_scale))
            .fold(0.0, f64::max);
        longest + LABEL_GAP + self.labels.padding
    }

    fn label_path(&self, canvas: &mut Canvas, metrics: &TickMetrics) -> Option<BezPath> {
        let count = self.labels.texts.len();
        if count == 0 {
            return None;
        }
        let offset = self.label_offset(metrics);
        let sign = self.labels.placement.sign();
        let mut path = BezPath::new();
        for (i, text) in self.labels.texts.iter().enumerate() {
            if text.is_empty() {
                continue;
            }
            let Some(mut outline) = canvas.text_path_with(
                text,
                &self.labels.font,
                TextAlign::Center,
                TextBaseline::Middle,
                0.0,
                0.0,
            ) else {
                continue;
            };
            let station = self.geometry.station(metrics, self.geometry.fraction(i, count));
            let angle = match self.labels.rotation {
                LabelRotation::None => 0.0,
                LabelRotation::Auto => station.tangent_angle,
                LabelRotation::AutoInward => station.tangent_angle + std::f64::consts::PI,
                LabelRotation::Angle(deg) => deg.to_radians(),
            };
            outline.apply_affine(Affine::rotate(angle));
            // Push the label box clear of the curve along the normal.
            let extent = outline.bounding_box();
            let half_extent = station.normal.x.abs() * extent.width() / 2.0
                + station.normal.y.abs() * extent.height() / 2.0;
            let anchor = station.point + station.normal * (sign * (offset + half_extent));
            outline.apply_affine(Affine::translate(anchor.to_vec2() - extent.center().to_vec2()));
            path.extend(outline.elements().iter().copied());
        }
        (!path.elements().is_empty()).then_some(path)
    }

    fn build(&self, canvas: &mut Canvas, rect: Rect) -> TicksCache {
        let bounds = self.bounds(rect);
        let metrics = self.geometry.metrics(bounds);

        let major = (self.major.count > 0)
            .then(|| {
                self.geometry
                    .tick_path(&metrics, &self.major_lengths(&metrics), self.major.placement)
            })
            .flatten();
        let minor = (self.minor.count > 0)
            .then(|| {
                self.geometry
                    .tick_path(&metrics, &self.minor_lengths(&metrics), self.minor.placement)
            })
            .flatten();
        let labels = self.label_path(canvas, &metrics);

        let stroke_bounds = |path: &Option<BezPath>, width: f64| {
            path.as_ref()
                .map(|p| p.bounding_box().inflate(width / 2.0, width / 2.0))
        };
        let tick_bounds = union(
            stroke_bounds(&major, self.major.width),
            stroke_bounds(&minor, self.minor.width),
        );
        let label_bounds = labels.as_ref().map(|p| p.bounding_box());
        let transform = match union(tick_bounds, label_bounds) {
            Some(content) => self.fit(content, tick_bounds, label_bounds.is_some(), bounds),
            None => Affine::IDENTITY,
        };

        TicksCache {
            rect,
            major,
            minor,
            labels,
            transform,
        }
    }

    /// Scale `content` down (never up) to the box and align it there.
    fn fit(
        &self,
        content: Rect,
        tick_bounds: Option<Rect>,
        has_labels: bool,
        target: Rect,
    ) -> Affine {
        let ratio = |target: f64, actual: f64| {
            if actual > 0.0 {
                target / actual
            } else {
                f64::INFINITY
            }
        };
        let scale = 1f64
            .min(ratio(target.width(), content.width()))
            .min(ratio(target.height(), content.height()))
            .max(0.0);
        let scaling = Affine::scale(scale);
        let scaled = scaling.transform_rect_bbox(content);
        // Centre on the ticks alone so label overhang does not skew them.
        let centring = match tick_bounds {
            Some(ticks) if has_labels => scaling.transform_rect_bbox(ticks),
            _ => scaled,
        };
        let dx = match self.align.h {
            HAlign::Center => self.align.offset_x(centring, target),
            _ => self.align.offset_x(scaled, target),
        };
        let dy = match self.align.v {
            VAlign::Middle => self.align.offset_y(centring, target),
            _ => self.align.offset_y(scaled, target),
        };
        Affine::translate((dx, dy)) * scaling
    }

    fn draw(&mut self, canvas: &mut Canvas, rect: Rect) {
        let (major_style, minor_style, label_color) =
            (self.major.clone(), self.minor.clone(), self.labels.color);
        let layout = self.layout(canvas, rect);

        canvas.save();
        canvas.transform(layout.transform);
        for (path, style) in [(&layout.major, &major_style), (&layout.minor, &minor_style)] {
            let Some(path) = path else { continue };
            if style.width <= 0.0 {
                continue;
            }
            canvas.set_line_cap(style.cap);
            canvas.set_line_width(style.width as f32);
            canvas.set_stroke_color(style.color);
            canvas.stroke_path(path);
        }
        if let Some(labels) = &layout.labels {
            canvas.set_fill_color(label_color);
            canvas.fill_path(labels, FillRule::NonZero);
        }
        canvas.restore();
    }
}

fn union(a: Option<Rect>, b: Option<Rect>) -> Option<Rect> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.union(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

impl<G: TickGeometry> Drawable for GaugeTicks<G> {
    fn render<'a>(
        &'a mut self,
        canvas: &'a mut Canvas,
        rect: Rect,
    ) -> LocalBoxFuture<'a, RenderResult<()>> {
        self.draw(canvas, rect);
        future::ready(Ok(())).boxed_local()
    }
}

impl<G: TickGeometry> ActionFields for GaugeTicks<G> {
    const PREFIX: &'static str = G::PREFIX;

    fn apply_field(&mut self, field: &str, value: &str) -> bool {
        let recognised = if let Some(suffix) = field.strip_prefix("majTicks") {
            self.major.apply_field(suffix, field, value)
        } else if let Some(suffix) = field.strip_prefix("minTicks") {
            self.minor.apply_field(suffix, field, value)
        } else {
            match field {
                "size" => set_parsed(&mut self.size, field, value),
                "align" => set_parsed(&mut self.align, field, value),
                _ => {
                    self.labels.apply_field(field, value)
                        || self.geometry.apply_field(field, value)
                }
            }
        };
        if recognised {
            self.dirty = true;
        }
        recognised
    }
}
