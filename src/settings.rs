//! Keyword settings and their resolution
//!
//! Plotting calls accept a loose bag of keyword arguments ([`Kwargs`]) where
//! several alias keys may feed the same logical setting. Each entity declares
//! a closed table of [`FieldSpec`]s; [`resolve`] turns the bag into a fixed
//! [`Settings`] record using that table.

use std::collections::BTreeMap;

use crate::color::{self, Color};
use crate::error::{PlotError, Result};
use crate::geo::MAX_PRECISION;

/// A dynamically typed keyword value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Color(Color),
    List(Vec<Value>),
}

impl Value {
    fn type_name(&self) -> &'static str {
        match self {
            Value::None => "none",
            Value::Bool(_) => "a boolean",
            Value::Int(_) => "an integer",
            Value::Float(_) => "a number",
            Value::Str(_) => "a string",
            Value::Color(_) => "a color",
            Value::List(_) => "a list",
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<Color> for Value {
    fn from(v: Color) -> Self {
        Value::Color(v)
    }
}

impl From<(f64, f64)> for Value {
    fn from((a, b): (f64, f64)) -> Self {
        Value::List(vec![Value::Float(a), Value::Float(b)])
    }
}

/// An RGBA gradient stop.
impl From<(u8, u8, u8, f64)> for Value {
    fn from((r, g, b, a): (u8, u8, u8, f64)) -> Self {
        Value::List(vec![
            Value::Int(r.into()),
            Value::Int(g.into()),
            Value::Int(b.into()),
            Value::Float(a),
        ])
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::None, Into::into)
    }
}

/// Keyword arguments passed to a plotting call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Kwargs {
    entries: BTreeMap<String, Value>,
}

impl Kwargs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a keyword, replacing any previous value
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys holding an explicit `None` never mask a later alias or default.
    fn present(&self, key: &str) -> Option<&Value> {
        self.entries.get(key).filter(|v| !matches!(v, Value::None))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Kwargs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut kwargs = Kwargs::new();
        for (k, v) in iter {
            kwargs.set(k, v);
        }
        kwargs
    }
}

/// Typed default for a logical setting
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fallback {
    /// No default; the setting stays unset.
    Absent,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(&'static str),
}

impl Fallback {
    fn to_value(self) -> Value {
        match self {
            Fallback::Absent => Value::None,
            Fallback::Bool(b) => Value::Bool(b),
            Fallback::Int(i) => Value::Int(i),
            Fallback::Float(f) => Value::Float(f),
            Fallback::Str(s) => Value::Str(s.to_string()),
        }
    }
}

/// One logical setting: its accepted keyword names, in precedence order, and
/// its default.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub default: Fallback,
}

impl FieldSpec {
    pub const fn new(
        name: &'static str,
        aliases: &'static [&'static str],
        default: Fallback,
    ) -> Self {
        Self {
            name,
            aliases,
            default,
        }
    }

    fn is_color(&self) -> bool {
        self.name.contains("color")
    }

    /// The first present alias and its value.
    fn lookup<'a>(&self, kwargs: &'a Kwargs) -> Option<(&'static str, &'a Value)> {
        self.aliases
            .iter()
            .find_map(|alias| kwargs.present(alias).map(|v| (*alias, v)))
    }
}

/// How color-named settings treat unresolvable tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorPolicy {
    /// Fail with `InvalidColorKind`.
    #[default]
    Strict,
    /// Warn and substitute black.
    Lenient,
}

/// Resolved settings for one drawable
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Settings {
    values: BTreeMap<&'static str, Value>,
}

impl Settings {
    /// Fetch a setting as a concrete type.
    ///
    /// Use `Option<T>` for settings without a default.
    pub fn get<T: FromValue>(&self, name: &str) -> Result<T> {
        T::from_value(name, self.values.get(name).filter(|v| !matches!(v, Value::None)))
    }

    pub fn raw(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// The `precision` setting, between 0 and [`MAX_PRECISION`] digits.
    pub fn precision(&self) -> Result<usize> {
        let precision: usize = self.get("precision")?;
        if precision > MAX_PRECISION {
            return Err(PlotError::invalid_argument("precision", "at most 15 decimal digits"));
        }
        Ok(precision)
    }
}

/// Resolve keyword arguments against a field table, failing on bad colors.
pub fn resolve(kwargs: &Kwargs, fields: &[FieldSpec]) -> Result<Settings> {
    resolve_with(kwargs, fields, ColorPolicy::Strict)
}

/// Resolve keyword arguments against a field table.
///
/// For each field the aliases are scanned in declared order and the first
/// present key wins; otherwise the field takes its default. Fields whose name
/// contains `color` are canonicalized through the color resolver, element-wise
/// for lists.
pub fn resolve_with(kwargs: &Kwargs, fields: &[FieldSpec], policy: ColorPolicy) -> Result<Settings> {
    let mut values = BTreeMap::new();
    for field in fields {
        let value = match field.lookup(kwargs) {
            Some((_, value)) => value.clone(),
            None => field.default.to_value(),
        };
        let value = if field.is_color() {
            resolve_color_value(field.name, value, policy)?
        } else {
            value
        };
        values.insert(field.name, value);
    }
    Ok(Settings { values })
}

/// Resolve keyword arguments for `n` points, failing on bad colors.
///
/// Scalar values are broadcast to every point; list values must hold exactly
/// `n` items.
pub fn resolve_broadcast(kwargs: &Kwargs, fields: &[FieldSpec], n: usize) -> Result<Vec<Settings>> {
    resolve_broadcast_with(kwargs, fields, n, |_| ColorPolicy::Strict)
}

/// Resolve keyword arguments for `n` points, choosing each point's color
/// policy from its other settings.
///
/// Color fields are canonicalized last, so `policy` sees every non-color
/// setting of the point already resolved.
pub fn resolve_broadcast_with(
    kwargs: &Kwargs,
    fields: &[FieldSpec],
    n: usize,
    policy: impl Fn(&Settings) -> ColorPolicy,
) -> Result<Vec<Settings>> {
    let mut points = vec![Settings::default(); n];
    for field in fields {
        let (key, value) = match field.lookup(kwargs) {
            Some((key, value)) => (key, value.clone()),
            None => (field.name, field.default.to_value()),
        };

        let items = match value {
            Value::List(items) => {
                if items.len() != n {
                    return Err(PlotError::length_mismatch(key, n, items.len()));
                }
                items
            }
            scalar => vec![scalar; n],
        };

        for (settings, item) in points.iter_mut().zip(items) {
            settings.values.insert(field.name, item);
        }
    }

    for settings in &mut points {
        let policy = policy(settings);
        for field in fields.iter().filter(|field| field.is_color()) {
            if let Some(value) = settings.values.remove(field.name) {
                let value = resolve_color_value(field.name, value, policy)?;
                settings.values.insert(field.name, value);
            }
        }
    }
    Ok(points)
}

fn resolve_color_value(name: &str, value: Value, policy: ColorPolicy) -> Result<Value> {
    match value {
        Value::None => Ok(Value::None),
        Value::Color(c) => Ok(Value::Color(c)),
        Value::Str(token) => match policy {
            ColorPolicy::Strict => color::resolve(&token).map(Value::Color),
            ColorPolicy::Lenient => Ok(Value::Color(color::resolve_or_black(&token))),
        },
        Value::List(items) => items
            .into_iter()
            .map(|item| resolve_color_value(name, item, policy))
            .collect::<Result<Vec<_>>>()
            .map(Value::List),
        other => Err(PlotError::InvalidColorKind(format!(
            "`{name}` must be a color string, found {}",
            other.type_name()
        ))),
    }
}

/// Conversion from a resolved setting into a concrete type
pub trait FromValue: Sized {
    fn from_value(name: &str, value: Option<&Value>) -> Result<Self>;
}

fn expect<T>(name: &str, value: Option<&Value>, expected: &str, f: impl FnOnce(&Value) -> Option<T>) -> Result<T> {
    value
        .and_then(f)
        .ok_or_else(|| PlotError::invalid_argument(name, expected))
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(name: &str, value: Option<&Value>) -> Result<Self> {
        match value {
            None | Some(Value::None) => Ok(None),
            Some(v) => T::from_value(name, Some(v)).map(Some),
        }
    }
}

impl FromValue for f64 {
    fn from_value(name: &str, value: Option<&Value>) -> Result<Self> {
        expect(name, value, "a number", Value::as_f64)
    }
}

impl FromValue for i64 {
    fn from_value(name: &str, value: Option<&Value>) -> Result<Self> {
        expect(name, value, "an integer", |v| match v {
            Value::Int(i) => Some(*i),
            Value::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        })
    }
}

impl FromValue for usize {
    fn from_value(name: &str, value: Option<&Value>) -> Result<Self> {
        let i = i64::from_value(name, value)?;
        usize::try_from(i).map_err(|_| PlotError::invalid_argument(name, "a non-negative integer"))
    }
}

impl FromValue for bool {
    fn from_value(name: &str, value: Option<&Value>) -> Result<Self> {
        expect(name, value, "a boolean", |v| match v {
            Value::Bool(b) => Some(*b),
            _ => None,
        })
    }
}

impl FromValue for String {
    fn from_value(name: &str, value: Option<&Value>) -> Result<Self> {
        expect(name, value, "a string", |v| match v {
            Value::Str(s) => Some(s.clone()),
            _ => None,
        })
    }
}

impl FromValue for Color {
    fn from_value(name: &str, value: Option<&Value>) -> Result<Self> {
        match value {
            Some(Value::Color(c)) => Ok(*c),
            Some(Value::Str(s)) => color::resolve(s),
            _ => Err(PlotError::InvalidColorKind(format!("`{name}` is not a color"))),
        }
    }
}

impl FromValue for Vec<Value> {
    fn from_value(name: &str, value: Option<&Value>) -> Result<Self> {
        expect(name, value, "a list", |v| v.as_list().map(<[Value]>::to_vec))
    }
}

/// Resolved edge and face styling shared by filled shapes
#[derive(Debug, Clone, PartialEq)]
pub struct StyleSettings {
    pub edge_color: Color,
    pub edge_alpha: f64,
    pub edge_width: f64,
    pub face_color: Color,
    pub face_alpha: f64,
    pub precision: usize,
}

impl StyleSettings {
    /// Build from settings resolved against a table with the `edge_*`,
    /// `face_*` and `precision` fields.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let style = Self {
            edge_color: settings.get("edge_color")?,
            edge_alpha: settings.get("edge_alpha")?,
            edge_width: settings.get("edge_width")?,
            face_color: settings.get("face_color")?,
            face_alpha: settings.get("face_alpha")?,
            precision: settings.precision()?,
        };
        style.validate()?;
        Ok(style)
    }

    /// Check opacities are within [0, 1] and the edge width is non-negative.
    pub fn validate(&self) -> Result<()> {
        check_alpha("edge_alpha", self.edge_alpha)?;
        check_alpha("face_alpha", self.face_alpha)?;
        check_non_negative("edge_width", self.edge_width)
    }
}

pub(crate) fn check_alpha(name: &str, alpha: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&alpha) {
        return Err(PlotError::invalid_argument(name, "an opacity between 0 and 1"));
    }
    Ok(())
}

pub(crate) fn check_non_negative(name: &str, value: f64) -> Result<()> {
    if value < 0.0 || value.is_nan() {
        return Err(PlotError::invalid_argument(name, "a non-negative number"));
    }
    Ok(())
}

/// Field tables for filled shapes. Most specific alias first.
pub(crate) const EDGE_COLOR: FieldSpec =
    FieldSpec::new("edge_color", &["edge_color", "ec", "color", "c"], Fallback::Str("#000000"));
pub(crate) const EDGE_ALPHA: FieldSpec =
    FieldSpec::new("edge_alpha", &["edge_alpha", "ea", "alpha"], Fallback::Float(1.0));
pub(crate) const EDGE_WIDTH: FieldSpec =
    FieldSpec::new("edge_width", &["edge_width", "ew"], Fallback::Float(1.0));
pub(crate) const FACE_COLOR: FieldSpec =
    FieldSpec::new("face_color", &["face_color", "fc", "color", "c"], Fallback::Str("#000000"));
pub(crate) const PRECISION: FieldSpec =
    FieldSpec::new("precision", &["precision"], Fallback::Int(crate::geo::DEFAULT_PRECISION as i64));

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS: &[FieldSpec] = &[
        EDGE_COLOR,
        EDGE_ALPHA,
        EDGE_WIDTH,
        FACE_COLOR,
        FieldSpec::new("face_alpha", &["face_alpha", "fa", "alpha"], Fallback::Float(0.3)),
        PRECISION,
    ];

    #[test]
    fn test_defaults_apply_exactly() {
        let settings = resolve(&Kwargs::new(), FIELDS).unwrap();
        let style = StyleSettings::from_settings(&settings).unwrap();
        assert_eq!(style.edge_color, Color::BLACK);
        assert_eq!(style.edge_alpha, 1.0);
        assert_eq!(style.edge_width, 1.0);
        assert_eq!(style.face_color, Color::BLACK);
        assert_eq!(style.face_alpha, 0.3);
        assert_eq!(style.precision, 6);
    }

    #[test]
    fn test_shared_alias_feeds_both_fields() {
        let kwargs = Kwargs::new().with("color", "red");
        let style = StyleSettings::from_settings(&resolve(&kwargs, FIELDS).unwrap()).unwrap();
        assert_eq!(style.edge_color, Color::RED);
        assert_eq!(style.face_color, Color::RED);
    }

    #[test]
    fn test_specific_alias_beats_generic() {
        let kwargs = Kwargs::new()
            .with("color", "red")
            .with("fc", "blue")
            .with("alpha", 0.2)
            .with("edge_alpha", 0.9);
        let style = StyleSettings::from_settings(&resolve(&kwargs, FIELDS).unwrap()).unwrap();
        assert_eq!(style.edge_color, Color::RED);
        assert_eq!(style.face_color, Color::rgb(0, 0, 255));
        assert_eq!(style.edge_alpha, 0.9);
        assert_eq!(style.face_alpha, 0.2);
    }

    #[test]
    fn test_explicit_none_does_not_mask() {
        let kwargs = Kwargs::new()
            .with("edge_color", Value::None)
            .with("c", "g")
            .with("ew", Option::<f64>::None);
        let settings = resolve(&kwargs, FIELDS).unwrap();
        assert_eq!(settings.get::<Color>("edge_color").unwrap(), Color::rgb(0, 128, 0));
        assert_eq!(settings.get::<f64>("edge_width").unwrap(), 1.0);
    }

    #[test]
    fn test_bad_color_is_fatal_when_strict() {
        let kwargs = Kwargs::new().with("ec", "#12");
        assert!(matches!(
            resolve(&kwargs, FIELDS),
            Err(PlotError::InvalidColorKind(_))
        ));
    }

    #[test]
    fn test_bad_color_degrades_when_lenient() {
        let kwargs = Kwargs::new().with("ec", "nope");
        let settings = resolve_with(&kwargs, FIELDS, ColorPolicy::Lenient).unwrap();
        assert_eq!(settings.get::<Color>("edge_color").unwrap(), Color::BLACK);
    }

    #[test]
    fn test_non_string_color_is_invalid() {
        let kwargs = Kwargs::new().with("color", 123);
        assert!(matches!(
            resolve(&kwargs, FIELDS),
            Err(PlotError::InvalidColorKind(_))
        ));
    }

    #[test]
    fn test_wrong_type_is_invalid_argument() {
        let kwargs = Kwargs::new().with("ew", "wide");
        let settings = resolve(&kwargs, FIELDS).unwrap();
        assert!(matches!(
            StyleSettings::from_settings(&settings),
            Err(PlotError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_alpha_out_of_range() {
        let kwargs = Kwargs::new().with("alpha", 1.5);
        let settings = resolve(&kwargs, FIELDS).unwrap();
        assert!(StyleSettings::from_settings(&settings).is_err());
    }

    #[test]
    fn test_broadcast_scalar_matches_list() {
        let scalar = Kwargs::new().with("color", "red");
        let list = Kwargs::new().with("color", vec!["red", "red", "red"]);
        let a = resolve_broadcast(&scalar, FIELDS, 3).unwrap();
        let b = resolve_broadcast(&list, FIELDS, 3).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 3);
        assert_eq!(a[2].get::<Color>("face_color").unwrap(), Color::RED);
    }

    #[test]
    fn test_broadcast_length_mismatch() {
        let kwargs = Kwargs::new().with("ew", vec![1.0, 2.0]);
        let err = resolve_broadcast(&kwargs, FIELDS, 3).unwrap_err();
        match err {
            PlotError::LengthMismatch {
                name,
                expected,
                actual,
            } => {
                assert_eq!(name, "ew");
                assert_eq!(expected, 3);
                assert_eq!(actual, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_broadcast_color_policy_per_point() {
        let fields = [
            FieldSpec::new("color", &["color"], Fallback::Str("#000000")),
            FieldSpec::new("marker", &["marker"], Fallback::Bool(true)),
        ];
        let kwargs = Kwargs::new()
            .with("color", vec!["notacolor", "red"])
            .with("marker", vec![true, false]);
        let lenient_markers = |point: &Settings| match point.get::<bool>("marker") {
            Ok(true) => ColorPolicy::Lenient,
            _ => ColorPolicy::Strict,
        };

        let points = resolve_broadcast_with(&kwargs, &fields, 2, lenient_markers).unwrap();
        assert_eq!(points[0].get::<Color>("color").unwrap(), Color::BLACK);
        assert_eq!(points[1].get::<Color>("color").unwrap(), Color::RED);

        let kwargs = kwargs.with("marker", false);
        let err = resolve_broadcast_with(&kwargs, &fields, 2, lenient_markers).unwrap_err();
        assert!(matches!(err, PlotError::InvalidColorKind(_)));
    }

    #[test]
    fn test_precision_is_capped() {
        let fields = [PRECISION];
        let settings = resolve(&Kwargs::new(), &fields).unwrap();
        assert_eq!(settings.precision().unwrap(), 6);

        let settings = resolve(&Kwargs::new().with("precision", 15), &fields).unwrap();
        assert_eq!(settings.precision().unwrap(), 15);

        let settings = resolve(&Kwargs::new().with("precision", 1_000_000_000), &fields).unwrap();
        assert!(matches!(
            settings.precision(),
            Err(PlotError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_optional_get() {
        let fields = [FieldSpec::new("title", &["title"], Fallback::Absent)];
        let settings = resolve(&Kwargs::new(), &fields).unwrap();
        assert_eq!(settings.get::<Option<String>>("title").unwrap(), None);
        assert!(settings.get::<String>("title").is_err());
    }
}
