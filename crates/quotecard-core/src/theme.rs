use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Channel-wise linear interpolation, truncating toward zero.
    pub fn lerp(self, other: Rgb, ratio: f32) -> Rgb {
        let mix = |a: u8, b: u8| (a as f32 * (1.0 - ratio) + b as f32 * ratio) as u8;
        Rgb(
            mix(self.0, other.0),
            mix(self.1, other.1),
            mix(self.2, other.2),
        )
    }

    pub(crate) fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.0, self.1, self.2, 255)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub bg_color1: Rgb,
    pub bg_color2: Rgb,
    pub text_color: Rgb,
    pub author_color: Rgb,
    pub signature_color: Rgb,
    pub decoration_color: Rgb,
}

static LIGHT: Theme = Theme {
    bg_color1: Rgb(255, 255, 250),
    bg_color2: Rgb(230, 230, 240),
    text_color: Rgb(30, 30, 30),
    author_color: Rgb(80, 80, 80),
    signature_color: Rgb(100, 100, 100),
    decoration_color: Rgb(150, 150, 180),
};

static DARK: Theme = Theme {
    bg_color1: Rgb(20, 20, 30),
    bg_color2: Rgb(40, 40, 80),
    text_color: Rgb(240, 240, 240),
    author_color: Rgb(180, 180, 180),
    signature_color: Rgb(150, 150, 150),
    decoration_color: Rgb(120, 120, 180),
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Light,
    Dark,
}

impl ThemeName {
    pub fn id(self) -> &'static str {
        match self {
            ThemeName::Light => "light",
            ThemeName::Dark => "dark",
        }
    }

    pub fn palette(self) -> &'static Theme {
        match self {
            ThemeName::Light => &LIGHT,
            ThemeName::Dark => &DARK,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BackgroundStyle {
    #[serde(alias = "uni")]
    Flat,
    #[default]
    #[serde(alias = "linear")]
    Gradient,
    Radial,
}

impl BackgroundStyle {
    pub fn id(self) -> &'static str {
        match self {
            BackgroundStyle::Flat => "flat",
            BackgroundStyle::Gradient => "gradient",
            BackgroundStyle::Radial => "radial",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            BackgroundStyle::Flat => &["uni"],
            BackgroundStyle::Gradient => &["linear"],
            BackgroundStyle::Radial => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GradientDirection {
    #[default]
    Vertical,
    Horizontal,
}

impl GradientDirection {
    pub fn id(self) -> &'static str {
        match self {
            GradientDirection::Vertical => "vertical",
            GradientDirection::Horizontal => "horizontal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DecorationStyle {
    #[default]
    #[serde(alias = "aucune")]
    None,
    #[serde(alias = "guillemets")]
    QuoteMarks,
    #[serde(alias = "cadre")]
    Border,
    #[serde(alias = "coins")]
    CornerMarks,
    #[serde(alias = "motif")]
    DotGrid,
}

impl DecorationStyle {
    pub fn id(self) -> &'static str {
        match self {
            DecorationStyle::None => "none",
            DecorationStyle::QuoteMarks => "quote-marks",
            DecorationStyle::Border => "border",
            DecorationStyle::CornerMarks => "corner-marks",
            DecorationStyle::DotGrid => "dot-grid",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            DecorationStyle::None => &["aucune"],
            DecorationStyle::QuoteMarks => &["guillemets"],
            DecorationStyle::Border => &["cadre"],
            DecorationStyle::CornerMarks => &["coins"],
            DecorationStyle::DotGrid => &["motif"],
        }
    }
}

const THEMES: &[ThemeName] = &[ThemeName::Light, ThemeName::Dark];

const BACKGROUND_STYLES: &[BackgroundStyle] = &[
    BackgroundStyle::Gradient,
    BackgroundStyle::Radial,
    BackgroundStyle::Flat,
];

const DECORATION_STYLES: &[DecorationStyle] = &[
    DecorationStyle::None,
    DecorationStyle::QuoteMarks,
    DecorationStyle::Border,
    DecorationStyle::CornerMarks,
    DecorationStyle::DotGrid,
];

pub fn valid_themes() -> &'static [ThemeName] {
    THEMES
}

pub fn valid_background_styles() -> &'static [BackgroundStyle] {
    BACKGROUND_STYLES
}

pub fn valid_decoration_styles() -> &'static [DecorationStyle] {
    DECORATION_STYLES
}

pub fn lookup_theme(id: &str) -> Result<&'static Theme> {
    Ok(id.parse::<ThemeName>()?.palette())
}

fn normalize_id(value: &str) -> String {
    value.trim().to_ascii_lowercase().replace('_', "-")
}

impl FromStr for ThemeName {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let key = normalize_id(value);
        THEMES
            .iter()
            .copied()
            .find(|theme| theme.id() == key)
            .ok_or_else(|| Error::UnknownTheme(value.to_string()))
    }
}

impl FromStr for BackgroundStyle {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let key = normalize_id(value);
        BACKGROUND_STYLES
            .iter()
            .copied()
            .find(|style| style.id() == key || style.aliases().contains(&key.as_str()))
            .ok_or_else(|| Error::InvalidInput(format!("unknown background style {value}")))
    }
}

impl FromStr for GradientDirection {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match normalize_id(value).as_str() {
            "vertical" => Ok(GradientDirection::Vertical),
            "horizontal" => Ok(GradientDirection::Horizontal),
            _ => Err(Error::InvalidInput(format!(
                "unknown gradient direction {value}"
            ))),
        }
    }
}

impl FromStr for DecorationStyle {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let key = normalize_id(value);
        DECORATION_STYLES
            .iter()
            .copied()
            .find(|style| style.id() == key || style.aliases().contains(&key.as_str()))
            .ok_or_else(|| Error::InvalidInput(format!("unknown decoration style {value}")))
    }
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl fmt::Display for BackgroundStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl fmt::Display for DecorationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
