//! Action data: the ordered `{id, value}` records that configure layers.
//!
//! Ids follow `<layer-prefix>_<field>`. A layer consumes fields greedily from
//! an [`ActionDataCursor`] until it meets an id it does not recognise, leaving
//! the cursor positioned for the next layer.

use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// A single `{id, value}` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDatum {
    pub id: String,
    pub value: String,
}

impl ActionDatum {
    pub fn new(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
        }
    }
}

/// An owned, ordered list of action data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionData {
    items: Vec<ActionDatum>,
}

impl ActionData {
    pub fn new(items: Vec<ActionDatum>) -> Self {
        Self { items }
    }

    /// Build from `(id, value)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            items: pairs
                .into_iter()
                .map(|(id, value)| ActionDatum::new(id, value))
                .collect(),
        }
    }

    pub fn cursor(&self) -> ActionDataCursor<'_> {
        ActionDataCursor::new(&self.items)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Read position over a slice of action data.
#[derive(Debug, Clone)]
pub struct ActionDataCursor<'a> {
    items: &'a [ActionDatum],
    position: usize,
}

impl<'a> ActionDataCursor<'a> {
    pub fn new(items: &'a [ActionDatum]) -> Self {
        Self { items, position: 0 }
    }

    pub fn peek(&self) -> Option<&'a ActionDatum> {
        self.items.get(self.position)
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.items.len() - self.position
    }

    pub fn is_exhausted(&self) -> bool {
        self.position >= self.items.len()
    }

    /// Feed `<prefix>_<field>` entries to `apply` until an id has another
    /// prefix or `apply` reports the field as unrecognised (returns `false`).
    ///
    /// Returns the number of consumed entries. Unrecognised entries are not
    /// consumed.
    pub fn consume_fields(
        &mut self,
        prefix: &str,
        mut apply: impl FnMut(&str, &str) -> bool,
    ) -> usize {
        let start = self.position;
        while let Some(datum) = self.peek() {
            let Some(field) = datum
                .id
                .strip_prefix(prefix)
                .and_then(|rest| rest.strip_prefix('_'))
            else {
                break;
            };
            if !apply(field, &datum.value) {
                break;
            }
            self.position += 1;
        }
        self.position - start
    }
}

/// Types configured from action data.
pub trait ActionFields {
    /// Id prefix of this layer type.
    const PREFIX: &'static str;

    /// Apply one field. Returns `false` when `field` is not recognised.
    ///
    /// Malformed values must be absorbed (keeping the previous value) rather
    /// than reported.
    fn apply_field(&mut self, field: &str, value: &str) -> bool;

    /// Consume this type's fields from `cursor`.
    fn load(&mut self, cursor: &mut ActionDataCursor<'_>) -> usize {
        cursor.consume_fields(Self::PREFIX, |field, value| self.apply_field(field, value))
    }
}

/// Parse `value` into `target`, keeping the previous value on failure.
///
/// Always returns `true` so it can be used directly as the result of a
/// recognised field in [`ActionFields::apply_field`].
pub(crate) fn set_parsed<T>(target: &mut T, field: &str, value: &str) -> bool
where
    T: FromStr,
    T::Err: Display,
{
    match value.parse::<T>() {
        Ok(parsed) => *target = parsed,
        Err(err) => warn!("Keeping previous value of '{field}', cannot use '{value}': {err}"),
    }
    true
}

/// Parse a finite number into `target`, keeping the previous value on failure.
///
/// `NaN` and infinities parse as `f64` but are rejected here.
pub(crate) fn set_number(target: &mut f64, field: &str, value: &str) -> bool {
    match value.trim().parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => *target = parsed,
        Ok(_) => warn!("Keeping previous value of '{field}', '{value}' is not finite"),
        Err(err) => warn!("Keeping previous value of '{field}', cannot use '{value}': {err}"),
    }
    true
}

/// Parse a count of at most `max` into `target`, keeping the previous value
/// on failure.
pub(crate) fn set_count(target: &mut usize, max: usize, field: &str, value: &str) -> bool {
    match value.trim().parse::<usize>() {
        Ok(parsed) if parsed <= max => *target = parsed,
        Ok(parsed) => warn!("Keeping previous value of '{field}', {parsed} exceeds {max}"),
        Err(err) => warn!("Keeping previous value of '{field}', cannot use '{value}': {err}"),
    }
    true
}

/// Parse a CSS color string, keeping the previous color on failure.
pub(crate) fn set_color(target: &mut icon_canvas::Color, field: &str, value: &str) -> bool {
    match icon_canvas::parse_color(value) {
        Ok(color) => *target = color,
        Err(err) => warn!("Keeping previous color of '{field}': {err}"),
    }
    true
}

/// Optional color: an empty value or `none`/`transparent` disables it.
pub(crate) fn set_color_opt(
    target: &mut Option<icon_canvas::Color>,
    field: &str,
    value: &str,
) -> bool {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        *target = None;
        return true;
    }
    match icon_canvas::parse_color(trimmed) {
        Ok(color) if color.alpha() <= 0.0 => *target = None,
        Ok(color) => *target = Some(color),
        Err(err) => warn!("Keeping previous color of '{field}': {err}"),
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Default)]
    struct Swatch {
        width: f64,
        name: String,
    }

    impl ActionFields for Swatch {
        const PREFIX: &'static str = "swatch";

        fn apply_field(&mut self, field: &str, value: &str) -> bool {
            match field {
                "width" => set_number(&mut self.width, field, value),
                "name" => {
                    self.name = value.to_string();
                    true
                }
                _ => false,
            }
        }
    }

    #[test]
    fn test_greedy_consumption_stops_at_foreign_prefix() {
        let data = ActionData::from_pairs([
            ("swatch_width", "12"),
            ("swatch_name", "a"),
            ("other_width", "3"),
            ("swatch_width", "99"),
        ]);
        let mut cursor = data.cursor();
        let mut swatch = Swatch::default();
        assert_eq!(swatch.load(&mut cursor), 2);
        assert_eq!(swatch.width, 12.0);
        assert_eq!(swatch.name, "a");
        assert_eq!(cursor.peek().unwrap().id, "other_width");
    }

    #[test]
    fn test_unknown_field_is_left_for_next_layer() {
        let data = ActionData::from_pairs([("swatch_width", "1"), ("swatch_color", "red")]);
        let mut cursor = data.cursor();
        let mut swatch = Swatch::default();
        assert_eq!(swatch.load(&mut cursor), 1);
        assert_eq!(cursor.remaining(), 1);
    }

    #[test]
    fn test_prefix_requires_separator() {
        let data = ActionData::from_pairs([("swatchwidth", "1")]);
        let mut cursor = data.cursor();
        assert_eq!(Swatch::default().load(&mut cursor), 0);
    }

    #[test]
    fn test_malformed_value_keeps_previous() {
        let data = ActionData::from_pairs([("swatch_width", "4"), ("swatch_width", "wide")]);
        let mut cursor = data.cursor();
        let mut swatch = Swatch::default();
        assert_eq!(swatch.load(&mut cursor), 2);
        assert_eq!(swatch.width, 4.0);
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn test_optional_color() {
        let mut color = None;
        set_color_opt(&mut color, "c", "#ff0000");
        assert!(color.is_some());
        set_color_opt(&mut color, "c", "none");
        assert!(color.is_none());
        set_color_opt(&mut color, "c", "#00000000");
        assert!(color.is_none());
    }

    #[rstest]
    #[case("NaN")]
    #[case("inf")]
    #[case("-infinity")]
    #[case("1e400")]
    fn test_non_finite_numbers_keep_previous(#[case] value: &str) {
        let mut number = 7.5;
        assert!(set_number(&mut number, "n", value));
        assert_eq!(number, 7.5);
        set_number(&mut number, "n", " -2.25 ");
        assert_eq!(number, -2.25);
    }

    #[test]
    fn test_count_limit() {
        let mut count = 4;
        set_count(&mut count, 100, "c", "1000000000000");
        assert_eq!(count, 4);
        set_count(&mut count, 100, "c", "-1");
        assert_eq!(count, 4);
        set_count(&mut count, 100, "c", "100");
        assert_eq!(count, 100);
    }
}
