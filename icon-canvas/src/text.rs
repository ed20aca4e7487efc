//! Text shaping and glyph outline extraction using cosmic-text.

use crate::font_parser::ParsedFont;
use crate::style::{TextAlign, TextBaseline};
use cosmic_text::{Attrs, Buffer, Command, Family, FontSystem, Metrics, Shaping, SwashCache};
use kurbo::{BezPath, Point};

/// Line height as a multiple of the font size.
const LINE_HEIGHT_FACTOR: f32 = 1.2;

/// Text drawing parameters shared by measuring and outlining.
pub(crate) struct TextStyle<'a> {
    pub font: &'a ParsedFont,
    pub letter_spacing: f32,
    pub align: TextAlign,
    pub baseline: TextBaseline,
}

fn family(name: &str) -> Family<'_> {
    match name.to_ascii_lowercase().as_str() {
        "sans-serif" => Family::SansSerif,
        "serif" => Family::Serif,
        "monospace" => Family::Monospace,
        "cursive" => Family::Cursive,
        "fantasy" => Family::Fantasy,
        _ => Family::Name(name),
    }
}

fn shape(font_system: &mut FontSystem, text: &str, style: &TextStyle<'_>) -> Buffer {
    let font = style.font;
    let metrics = Metrics::new(font.size_px, font.size_px * LINE_HEIGHT_FACTOR);
    let mut buffer = Buffer::new(font_system, metrics);

    let attrs = Attrs::new()
        .family(font.families.first().map(|f| family(f)).unwrap_or(Family::SansSerif))
        .weight(font.weight)
        .style(font.style)
        .letter_spacing(style.letter_spacing);

    buffer.set_text(font_system, text, &attrs, Shaping::Advanced, None);
    buffer.shape_until_scroll(font_system, false);
    buffer
}

/// Horizontal offset of a line for the given alignment.
pub(crate) fn calculate_text_x_offset(width: f32, align: TextAlign) -> f32 {
    match align {
        TextAlign::Left => 0.0,
        TextAlign::Right => -width,
        TextAlign::Center => -width / 2.0,
    }
}

/// Whether any font face is loaded. cosmic-text panics when asked to shape
/// text without one.
pub(crate) fn has_fonts(font_system: &FontSystem) -> bool {
    font_system.db().faces().next().is_some()
}

/// Outline `text` into a single path anchored at `(x, y)`.
///
/// Each line is aligned on its own width. The baseline option anchors the
/// block: `Top`, `Middle` and `Bottom` refer to the whole block, `Alphabetic`
/// to the first line's baseline. Returns `None` when no glyph produced an
/// outline, including when the font database is empty.
pub(crate) fn outline_text(
    font_system: &mut FontSystem,
    swash_cache: &mut SwashCache,
    text: &str,
    style: &TextStyle<'_>,
    x: f32,
    y: f32,
) -> Option<BezPath> {
    if !has_fonts(font_system) {
        log::debug!(target: "canvas", "no fonts loaded, skipping text \"{}\"", text);
        return None;
    }
    let buffer = shape(font_system, text, style);

    let mut block_height: f32 = 0.0;
    let mut first_baseline: Option<f32> = None;
    for run in buffer.layout_runs() {
        block_height = block_height.max(run.line_top + run.line_height);
        first_baseline.get_or_insert(run.line_y);
    }
    let y_shift = match style.baseline {
        TextBaseline::Top => 0.0,
        TextBaseline::Middle => -block_height / 2.0,
        TextBaseline::Bottom => -block_height,
        TextBaseline::Alphabetic => -first_baseline.unwrap_or(0.0),
    };

    let mut path = BezPath::new();
    for run in buffer.layout_runs() {
        let line_x = x + calculate_text_x_offset(run.line_w, style.align);
        let line_y = y + y_shift + run.line_y;

        for glyph in run.glyphs.iter() {
            let physical = glyph.physical((0.0, 0.0), 1.0);
            let gx = (line_x + glyph.x + glyph.font_size * glyph.x_offset) as f64;
            let gy = (line_y + glyph.y - glyph.font_size * glyph.y_offset) as f64;

            let Some(commands) = swash_cache.get_outline_commands(font_system, physical.cache_key)
            else {
                continue;
            };

            // Font outlines have Y pointing up
            let pt = |px: f32, py: f32| Point::new(gx + px as f64, gy - py as f64);
            for cmd in commands {
                match *cmd {
                    Command::MoveTo(p) => path.move_to(pt(p.x, p.y)),
                    Command::LineTo(p) => path.line_to(pt(p.x, p.y)),
                    Command::QuadTo(c, p) => path.quad_to(pt(c.x, c.y), pt(p.x, p.y)),
                    Command::CurveTo(c1, c2, p) => {
                        path.curve_to(pt(c1.x, c1.y), pt(c2.x, c2.y), pt(p.x, p.y))
                    }
                    Command::Close => path.close_path(),
                }
            }
        }
    }

    (!path.elements().is_empty()).then_some(path)
}
