use clap::{Parser, ValueEnum};
use quotecard_core::{BackgroundStyle, DecorationStyle, GradientDirection, PngStrip, ThemeName};

#[derive(Parser, Debug)]
#[command(
    name = "quotecard",
    about = "Render a quotation onto a decorated 1080x1080 PNG card.",
    version
)]
pub(crate) struct Args {
    /// Quote text. Use "-" to read it from stdin.
    pub(crate) quote: Option<String>,

    /// Fetch a random quote from the quote API instead.
    #[arg(long, conflicts_with = "quote")]
    pub(crate) random: bool,

    /// Author line (rendered as "— AUTHOR").
    #[arg(short, long)]
    pub(crate) author: Option<String>,

    /// Output PNG path.
    /// If omitted, writes to stdout (or a name derived from the card when stdout is a TTY).
    #[arg(short, long)]
    pub(crate) output: Option<std::path::PathBuf>,

    /// JSON config file path (default/full/user or custom file).
    #[arg(short, long)]
    pub(crate) config: Option<String>,

    /// Use interactive mode to build one or more cards.
    #[arg(short, long)]
    pub(crate) interactive: bool,

    /// Color theme.
    #[arg(short, long, value_enum)]
    pub(crate) theme: Option<ThemeArg>,

    /// Background style.
    #[arg(short, long, value_enum)]
    pub(crate) background: Option<BackgroundArg>,

    /// Axis of the linear gradient.
    #[arg(long, value_enum)]
    pub(crate) gradient: Option<GradientArg>,

    /// Decoration style.
    #[arg(short, long, value_enum)]
    pub(crate) decoration: Option<DecorationArg>,

    /// Draw the signature in the bottom-right corner.
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub(crate) signature: Option<bool>,

    /// Draw the watermark in the bottom-left corner.
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub(crate) watermark: Option<bool>,

    /// Signature text.
    #[arg(long = "signature.text")]
    pub(crate) signature_text: Option<String>,

    /// Watermark text.
    #[arg(long = "watermark.text")]
    pub(crate) watermark_text: Option<String>,

    /// Directory holding the Lato font files.
    #[arg(long = "font.dir")]
    pub(crate) font_dir: Option<String>,

    /// Quote API URL.
    #[arg(long = "api.url")]
    pub(crate) api_url: Option<String>,

    /// Quote API timeout (e.g. 500ms, 5s).
    #[arg(long = "api.timeout")]
    pub(crate) api_timeout: Option<String>,

    /// Optimize PNG output with oxipng.
    #[arg(long = "png-opt", num_args = 0..=1, default_missing_value = "true")]
    pub(crate) png_opt: Option<bool>,

    /// Oxipng optimization level (0-6).
    #[arg(long = "png-opt-level")]
    pub(crate) png_opt_level: Option<u8>,

    /// Strip PNG metadata (none, safe, all).
    #[arg(long = "png-strip", value_enum)]
    pub(crate) png_strip: Option<PngStripArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ThemeArg {
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum BackgroundArg {
    #[value(alias = "uni")]
    Flat,
    #[value(alias = "linear")]
    Gradient,
    Radial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum GradientArg {
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum DecorationArg {
    #[value(alias = "aucune")]
    None,
    #[value(alias = "guillemets")]
    QuoteMarks,
    #[value(alias = "cadre")]
    Border,
    #[value(alias = "coins")]
    CornerMarks,
    #[value(alias = "motif")]
    DotGrid,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum PngStripArg {
    None,
    Safe,
    All,
}

impl From<ThemeArg> for ThemeName {
    fn from(value: ThemeArg) -> Self {
        match value {
            ThemeArg::Light => ThemeName::Light,
            ThemeArg::Dark => ThemeName::Dark,
        }
    }
}

impl From<BackgroundArg> for BackgroundStyle {
    fn from(value: BackgroundArg) -> Self {
        match value {
            BackgroundArg::Flat => BackgroundStyle::Flat,
            BackgroundArg::Gradient => BackgroundStyle::Gradient,
            BackgroundArg::Radial => BackgroundStyle::Radial,
        }
    }
}

impl From<GradientArg> for GradientDirection {
    fn from(value: GradientArg) -> Self {
        match value {
            GradientArg::Vertical => GradientDirection::Vertical,
            GradientArg::Horizontal => GradientDirection::Horizontal,
        }
    }
}

impl From<DecorationArg> for DecorationStyle {
    fn from(value: DecorationArg) -> Self {
        match value {
            DecorationArg::None => DecorationStyle::None,
            DecorationArg::QuoteMarks => DecorationStyle::QuoteMarks,
            DecorationArg::Border => DecorationStyle::Border,
            DecorationArg::CornerMarks => DecorationStyle::CornerMarks,
            DecorationArg::DotGrid => DecorationStyle::DotGrid,
        }
    }
}

impl From<PngStripArg> for PngStrip {
    fn from(value: PngStripArg) -> Self {
        match value {
            PngStripArg::None => PngStrip::None,
            PngStripArg::Safe => PngStrip::Safe,
            PngStripArg::All => PngStrip::All,
        }
    }
}
