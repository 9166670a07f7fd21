use serde::{Deserialize, Serialize};

use crate::{
    BackgroundStyle, DecorationStyle, GradientDirection, ThemeName, DEFAULT_API_TIMEOUT_MS,
    DEFAULT_API_URL, DEFAULT_AUTHOR_SIZE, DEFAULT_HISTORY_SIZE, DEFAULT_PNG_OPT_LEVEL,
    DEFAULT_QUOTE_SIZE, DEFAULT_SIGNATURE, DEFAULT_SIGNATURE_SIZE, DEFAULT_WATERMARK,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub theme: ThemeName,
    pub background: BackgroundStyle,
    pub gradient_direction: GradientDirection,
    pub decoration: DecorationStyle,
    pub signature: bool,
    pub watermark: bool,
    pub signature_text: String,
    pub watermark_text: String,
    pub font: FontOptions,
    pub png: PngOptions,
    pub api: ApiOptions,
    pub history: HistoryOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: ThemeName::Light,
            background: BackgroundStyle::Gradient,
            gradient_direction: GradientDirection::Vertical,
            decoration: DecorationStyle::None,
            signature: true,
            watermark: true,
            signature_text: DEFAULT_SIGNATURE.to_string(),
            watermark_text: DEFAULT_WATERMARK.to_string(),
            font: FontOptions::default(),
            png: PngOptions::default(),
            api: ApiOptions::default(),
            history: HistoryOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FontOptions {
    pub dir: String,
    pub regular: String,
    pub bold: String,
    pub light: String,
    pub quote_size: f32,
    pub author_size: f32,
    pub signature_size: f32,
}

impl Default for FontOptions {
    fn default() -> Self {
        Self {
            dir: "Lato".to_string(),
            regular: "Lato-Regular.ttf".to_string(),
            bold: "Lato-Bold.ttf".to_string(),
            light: "Lato-Light.ttf".to_string(),
            quote_size: DEFAULT_QUOTE_SIZE,
            author_size: DEFAULT_AUTHOR_SIZE,
            signature_size: DEFAULT_SIGNATURE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PngStrip {
    None,
    #[default]
    Safe,
    All,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PngOptions {
    pub optimize: bool,
    pub level: u8,
    pub strip: PngStrip,
}

impl Default for PngOptions {
    fn default() -> Self {
        Self {
            optimize: true,
            level: DEFAULT_PNG_OPT_LEVEL,
            strip: PngStrip::Safe,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiOptions {
    pub url: String,
    pub timeout_ms: u64,
}

impl Default for ApiOptions {
    fn default() -> Self {
        Self {
            url: DEFAULT_API_URL.to_string(),
            timeout_ms: DEFAULT_API_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryOptions {
    pub size: usize,
}

impl Default for HistoryOptions {
    fn default() -> Self {
        Self {
            size: DEFAULT_HISTORY_SIZE,
        }
    }
}
