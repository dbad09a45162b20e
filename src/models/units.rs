//! Shared value types used across the content model
//!
//! These are the measurement and addressing primitives the composition
//! engine works in: physical sizes with unit conversions, RGB colors
//! serialized as hex strings, placement rectangles, and content-repository
//! folder paths.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Add;
use std::str::FromStr;

const MM_TO_PT: f64 = 72.0 / 25.4;

/// Supported measurement units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeUnit {
    Points,
    Millimeters,
    Centimeters,
    Meters,
    Inches,
}

/// A physical size, stored internally in millimeters.
///
/// Serialized as a millimeter string (e.g. `"2.5mm"`) so the value survives
/// the JSON payload column without floating-point surprises in other tools.
/// Parsing accepts any supported unit suffix: `pt`, `mm`, `cm`, `m`, `in`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    millimeters: f64,
}

impl Size {
    pub fn new(value: f64, unit: SizeUnit) -> Self {
        let millimeters = match unit {
            SizeUnit::Points => value / MM_TO_PT,
            SizeUnit::Millimeters => value,
            SizeUnit::Centimeters => value * 10.0,
            SizeUnit::Meters => value * 1000.0,
            SizeUnit::Inches => value * 25.4,
        };
        Self { millimeters }
    }

    pub fn of_points(value: f64) -> Self {
        Self::new(value, SizeUnit::Points)
    }

    pub fn of_millimeters(value: f64) -> Self {
        Self::new(value, SizeUnit::Millimeters)
    }

    pub fn of_centimeters(value: f64) -> Self {
        Self::new(value, SizeUnit::Centimeters)
    }

    pub fn of_meters(value: f64) -> Self {
        Self::new(value, SizeUnit::Meters)
    }

    pub fn of_inches(value: f64) -> Self {
        Self::new(value, SizeUnit::Inches)
    }

    pub fn to_unit(&self, unit: SizeUnit) -> f64 {
        match unit {
            SizeUnit::Points => self.millimeters * MM_TO_PT,
            SizeUnit::Millimeters => self.millimeters,
            SizeUnit::Centimeters => self.millimeters / 10.0,
            SizeUnit::Meters => self.millimeters / 1000.0,
            SizeUnit::Inches => self.millimeters / 25.4,
        }
    }

    pub fn to_points(&self) -> f64 {
        self.to_unit(SizeUnit::Points)
    }

    pub fn to_millimeters(&self) -> f64 {
        self.millimeters
    }
}

impl Add for Size {
    type Output = Size;

    fn add(self, rhs: Size) -> Size {
        Size { millimeters: self.millimeters + rhs.millimeters }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}mm", self.millimeters)
    }
}

/// Error parsing a [`Size`] from its string form.
#[derive(Debug, thiserror::Error)]
#[error("invalid size format in '{input}'")]
pub struct ParseSizeError {
    input: String,
}

impl FromStr for Size {
    type Err = ParseSizeError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let err = || ParseSizeError { input: input.to_owned() };
        // "mm"/"cm" before bare "m", longest suffix first
        let (value, unit) = if let Some(v) = input.strip_suffix("mm") {
            (v, SizeUnit::Millimeters)
        } else if let Some(v) = input.strip_suffix("cm") {
            (v, SizeUnit::Centimeters)
        } else if let Some(v) = input.strip_suffix("pt") {
            (v, SizeUnit::Points)
        } else if let Some(v) = input.strip_suffix("in") {
            (v, SizeUnit::Inches)
        } else if let Some(v) = input.strip_suffix('m') {
            (v, SizeUnit::Meters)
        } else {
            return Err(err());
        };

        let value: f64 = value.trim().parse().map_err(|_| err())?;
        Ok(Size::new(value, unit))
    }
}

impl Serialize for Size {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Size {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// An RGB color, serialized as a `#rrggbb` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

/// Error parsing a [`Color`] from its hex form.
#[derive(Debug, thiserror::Error)]
#[error("invalid color '{input}', expected '#rrggbb'")]
pub struct ParseColorError {
    input: String,
}

impl Color {
    pub fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    pub fn from_hex(hex: &str) -> Result<Self, ParseColorError> {
        let err = || ParseColorError { input: hex.to_owned() };
        let rest = hex.strip_prefix('#').ok_or_else(err)?;
        if rest.len() != 6 {
            return Err(err());
        }
        let red = u8::from_str_radix(&rest[0..2], 16).map_err(|_| err())?;
        let green = u8::from_str_radix(&rest[2..4], 16).map_err(|_| err())?;
        let blue = u8::from_str_radix(&rest[4..6], 16).map_err(|_| err())?;
        Ok(Self { red, green, blue })
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Color::from_hex(&text).map_err(serde::de::Error::custom)
    }
}

/// Placement rectangle for positioned content areas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: Size,
    pub y: Size,
    pub width: Size,
    pub height: Size,
}

impl Position {
    pub fn left(&self) -> Size {
        self.x
    }

    pub fn top(&self) -> Size {
        self.y
    }

    pub fn right(&self) -> Size {
        self.x + self.width
    }

    pub fn bottom(&self) -> Size {
        self.y + self.height
    }
}

/// Error joining [`TargetPath`] values.
#[derive(Debug, thiserror::Error)]
#[error("cannot join with absolute path '{path}'")]
pub struct TargetPathJoinError {
    path: String,
}

/// A folder path in the target content repository (`icm://` scheme).
///
/// Construction normalizes the legacy `vcs:` scheme, backslashes, and
/// leading/trailing slashes so paths coming from different migration scripts
/// compare equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetPath {
    path: String,
}

const TARGET_PATH_SCHEME: &str = "icm://";

impl TargetPath {
    pub fn from(path: &str) -> Self {
        let normalized = path.replace("vcs:", "icm:").replace('\\', "/");
        let normalized = normalized
            .trim_start_matches('/')
            .trim_end_matches('/')
            .to_owned();
        // Trimming eats the scheme's own slashes on the bare root.
        if normalized == "icm:" {
            return Self::root();
        }
        Self { path: normalized }
    }

    pub fn root() -> Self {
        Self { path: TARGET_PATH_SCHEME.to_owned() }
    }

    pub fn is_absolute(&self) -> bool {
        self.path.starts_with(TARGET_PATH_SCHEME)
    }

    pub fn is_blank(&self) -> bool {
        self.path.trim().is_empty()
    }

    pub fn join(&self, other: &TargetPath) -> Result<TargetPath, TargetPathJoinError> {
        if other.is_blank() {
            return Ok(self.clone());
        }
        if other.is_absolute() {
            return Err(TargetPathJoinError { path: other.path.clone() });
        }
        if self.path == TARGET_PATH_SCHEME {
            return Ok(TargetPath { path: format!("{}{}", self.path, other.path) });
        }
        Ok(TargetPath { path: format!("{}/{}", self.path, other.path) })
    }

    pub fn join_str(&self, other: &str) -> Result<TargetPath, TargetPathJoinError> {
        self.join(&TargetPath::from(other))
    }

    pub fn as_str(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for TargetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

impl Serialize for TargetPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.path)
    }
}

impl<'de> Deserialize<'de> for TargetPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(TargetPath::from(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_converts_between_units() {
        let size = Size::of_inches(1.0);
        assert_eq!(size.to_millimeters(), 25.4);
        assert!((size.to_points() - 72.0).abs() < 1e-9);
        assert_eq!(Size::of_centimeters(2.0), Size::of_millimeters(20.0));
    }

    #[test]
    fn size_parses_unit_suffixes() {
        assert_eq!("2.5mm".parse::<Size>().unwrap(), Size::of_millimeters(2.5));
        assert_eq!("10pt".parse::<Size>().unwrap(), Size::of_points(10.0));
        assert_eq!("1cm".parse::<Size>().unwrap(), Size::of_millimeters(10.0));
        assert_eq!("2m".parse::<Size>().unwrap(), Size::of_meters(2.0));
        assert_eq!("0.5in".parse::<Size>().unwrap(), Size::of_inches(0.5));
        assert!("12".parse::<Size>().is_err());
        assert!("mm".parse::<Size>().is_err());
    }

    #[test]
    fn size_round_trips_through_json() {
        let size = Size::of_points(12.0);
        let json = serde_json::to_string(&size).unwrap();
        let back: Size = serde_json::from_str(&json).unwrap();
        assert_eq!(size, back);
    }

    #[test]
    fn color_hex_round_trip() {
        let color = Color::new(255, 128, 0);
        assert_eq!(color.to_hex(), "#ff8000");
        assert_eq!(Color::from_hex("#ff8000").unwrap(), color);
        assert!(Color::from_hex("ff8000").is_err());
        assert!(Color::from_hex("#ff80").is_err());
    }

    #[test]
    fn target_path_normalizes_on_construction() {
        assert_eq!(TargetPath::from("vcs://Blocks\\Sub/").as_str(), "icm://Blocks/Sub");
        assert_eq!(TargetPath::from("/relative/dir/").as_str(), "relative/dir");
    }

    #[test]
    fn root_path_survives_normalization() {
        assert_eq!(TargetPath::from("icm://"), TargetPath::root());
    }

    #[test]
    fn target_path_join_semantics() {
        let root = TargetPath::root();
        assert_eq!(root.join_str("Blocks").unwrap().as_str(), "icm://Blocks");

        let base = TargetPath::from("icm://Blocks");
        assert_eq!(base.join_str("Sub").unwrap().as_str(), "icm://Blocks/Sub");
        assert_eq!(base.join_str("").unwrap(), base);
        assert!(base.join_str("icm://Other").is_err());
    }
}
