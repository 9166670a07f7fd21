extern crate png as png_crate;

use super::*;
use crate::fonts::dirs::*;
use crate::fonts::substitute;
use crate::layout::author_line;
use crate::png::*;
use crate::render::render_plan;
use crate::text::*;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, OnceLock};
use std::thread;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tiny_skia::Pixmap;

#[test]
fn canvas_is_square() {
    assert_eq!(canvas_size(), (1080, 1080));
}

#[test]
fn lookup_theme_returns_palettes() {
    let light = lookup_theme("light").expect("light");
    assert_eq!(light.bg_color1, Rgb(255, 255, 250));
    assert_eq!(light.bg_color2, Rgb(230, 230, 240));
    assert_eq!(light.text_color, Rgb(30, 30, 30));
    let dark = lookup_theme("Dark").expect("dark");
    assert_eq!(dark.bg_color1, Rgb(20, 20, 30));
    assert_eq!(dark.decoration_color, Rgb(120, 120, 180));
}

#[test]
fn lookup_theme_rejects_unknown() {
    let err = lookup_theme("sepia").expect_err("unknown theme");
    assert!(matches!(err, Error::UnknownTheme(ref id) if id == "sepia"));
}

#[test]
fn style_ids_accept_aliases() {
    assert_eq!("uni".parse::<BackgroundStyle>().unwrap(), BackgroundStyle::Flat);
    assert_eq!(
        "linear".parse::<BackgroundStyle>().unwrap(),
        BackgroundStyle::Gradient
    );
    assert_eq!(
        "aucune".parse::<DecorationStyle>().unwrap(),
        DecorationStyle::None
    );
    assert_eq!(
        "QUOTE_MARKS".parse::<DecorationStyle>().unwrap(),
        DecorationStyle::QuoteMarks
    );
    assert_eq!(
        "coins".parse::<DecorationStyle>().unwrap(),
        DecorationStyle::CornerMarks
    );
    assert!(matches!(
        "stars".parse::<DecorationStyle>(),
        Err(Error::InvalidInput(_))
    ));
    assert_eq!(
        "horizontal".parse::<GradientDirection>().unwrap(),
        GradientDirection::Horizontal
    );
}

#[test]
fn style_sets_are_closed() {
    assert_eq!(valid_themes(), &[ThemeName::Light, ThemeName::Dark]);
    assert_eq!(valid_background_styles().len(), 3);
    assert_eq!(valid_background_styles()[0], BackgroundStyle::Gradient);
    assert_eq!(valid_decoration_styles().len(), 5);
    assert!(valid_decoration_styles().contains(&DecorationStyle::DotGrid));
}

#[test]
fn config_defaults_from_empty_json() {
    let cfg: Config = serde_json::from_str("{}").expect("parse config");
    assert_eq!(cfg.theme, ThemeName::Light);
    assert_eq!(cfg.background, BackgroundStyle::Gradient);
    assert_eq!(cfg.decoration, DecorationStyle::None);
    assert!(cfg.signature);
    assert!(cfg.watermark);
    assert_eq!(cfg.font.regular, "Lato-Regular.ttf");
    assert_eq!(cfg.font.quote_size, 120.0);
    assert_eq!(cfg.api.timeout_ms, 5_000);
    assert_eq!(cfg.history.size, 10);
}

#[test]
fn config_accepts_legacy_ids() {
    let cfg: Config = serde_json::from_str(
        r#"{"theme":"dark","background":"uni","decoration":"cadre","font":{"dir":"/fonts"}}"#,
    )
    .expect("parse config");
    assert_eq!(cfg.theme, ThemeName::Dark);
    assert_eq!(cfg.background, BackgroundStyle::Flat);
    assert_eq!(cfg.decoration, DecorationStyle::Border);
    assert_eq!(cfg.font.dir, "/fonts");
    assert_eq!(cfg.font.bold, "Lato-Bold.ttf");
}

#[test]
fn lerp_truncates_channels() {
    let mixed = Rgb(255, 255, 250).lerp(Rgb(230, 230, 240), 0.5);
    assert_eq!(mixed, Rgb(242, 242, 245));
    assert_eq!(Rgb(10, 20, 30).lerp(Rgb(200, 200, 200), 0.0), Rgb(10, 20, 30));
}

#[test]
fn flat_background_is_uniform() {
    let theme = ThemeName::Light.palette();
    let pixmap = synthesize(BackgroundStyle::Flat, GradientDirection::Vertical, theme)
        .expect("synthesize");
    assert_eq!((pixmap.width(), pixmap.height()), (1080, 1080));
    for (x, y) in [(0, 0), (540, 540), (1079, 1079), (13, 977)] {
        assert_eq!(pixel_at(&pixmap, x, y), theme.bg_color1);
    }
    assert!(pixmap.pixels().iter().all(|p| p.alpha() == 255));
}

#[test]
fn vertical_gradient_runs_top_to_bottom() {
    let theme = ThemeName::Light.palette();
    let pixmap = synthesize(BackgroundStyle::Gradient, GradientDirection::Vertical, theme)
        .expect("synthesize");
    assert_eq!(pixel_at(&pixmap, 0, 0), theme.bg_color1);
    assert_eq!(pixel_at(&pixmap, 700, 0), theme.bg_color1);
    assert_close(pixel_at(&pixmap, 0, 1079), theme.bg_color2, 1);

    let mut previous = pixel_at(&pixmap, 10, 0).0;
    for y in 1..1080 {
        let red = pixel_at(&pixmap, 10, y).0;
        assert!(red <= previous, "row {y} brighter than row above");
        previous = red;
    }
    assert_eq!(pixel_at(&pixmap, 0, 300), pixel_at(&pixmap, 1079, 300));
}

#[test]
fn horizontal_gradient_runs_left_to_right() {
    let theme = ThemeName::Dark.palette();
    let pixmap = synthesize(
        BackgroundStyle::Gradient,
        GradientDirection::Horizontal,
        theme,
    )
    .expect("synthesize");
    assert_eq!(pixel_at(&pixmap, 0, 500), theme.bg_color1);
    assert_close(pixel_at(&pixmap, 1079, 500), theme.bg_color2, 1);
    assert_eq!(pixel_at(&pixmap, 400, 0), pixel_at(&pixmap, 400, 1079));
}

#[test]
fn radial_gradient_centers_on_first_color() {
    let theme = ThemeName::Dark.palette();
    let pixmap = synthesize(BackgroundStyle::Radial, GradientDirection::Vertical, theme)
        .expect("synthesize");
    let center = pixel_at(&pixmap, 540, 540);
    assert_close(center, theme.bg_color1, 1);

    let corner = pixel_at(&pixmap, 0, 0);
    assert!(distance(corner, theme.bg_color2) < distance(corner, theme.bg_color1));
    assert!(distance(corner, theme.bg_color2) < distance(center, theme.bg_color2));

    let right = pixel_at(&pixmap, 640, 540);
    assert_eq!(right, pixel_at(&pixmap, 440, 540));
    assert_eq!(right, pixel_at(&pixmap, 540, 640));
    assert_eq!(right, pixel_at(&pixmap, 540, 440));
}

#[test]
fn no_decoration_leaves_canvas_untouched() {
    let theme = ThemeName::Light.palette();
    let base = synthesize(BackgroundStyle::Radial, GradientDirection::Vertical, theme)
        .expect("synthesize");
    let mut pixmap = base.clone();
    let mut resolver = FontResolver::new(&FontOptions::default());
    apply_decoration(&mut pixmap, DecorationStyle::None, theme, &mut resolver)
        .expect("decorate");
    assert_eq!(pixmap.data(), base.data());
    assert!(!resolver.fallback_active());
}

#[test]
fn border_is_drawn_inward_from_margin() {
    let theme = ThemeName::Light.palette();
    let pixmap = decorated(DecorationStyle::Border, theme);
    let accent = theme.decoration_color;
    let bg = theme.bg_color1;
    assert_eq!(pixel_at(&pixmap, 50, 50), accent);
    assert_eq!(pixel_at(&pixmap, 54, 540), accent);
    assert_eq!(pixel_at(&pixmap, 55, 540), bg);
    assert_eq!(pixel_at(&pixmap, 49, 540), bg);
    assert_eq!(pixel_at(&pixmap, 1030, 540), accent);
    assert_eq!(pixel_at(&pixmap, 1026, 540), accent);
    assert_eq!(pixel_at(&pixmap, 1025, 540), bg);
    assert_eq!(pixel_at(&pixmap, 1031, 540), bg);
    assert_eq!(pixel_at(&pixmap, 540, 1030), accent);
    assert_eq!(pixel_at(&pixmap, 540, 540), bg);
}

#[test]
fn corner_marks_form_brackets() {
    let theme = ThemeName::Dark.palette();
    let pixmap = decorated(DecorationStyle::CornerMarks, theme);
    let accent = theme.decoration_color;
    let bg = theme.bg_color1;
    assert_eq!(pixel_at(&pixmap, 40, 40), accent);
    assert_eq!(pixel_at(&pixmap, 120, 40), accent);
    assert_eq!(pixel_at(&pixmap, 121, 40), bg);
    assert_eq!(pixel_at(&pixmap, 40, 120), accent);
    assert_eq!(pixel_at(&pixmap, 38, 80), accent);
    assert_eq!(pixel_at(&pixmap, 37, 80), bg);
    assert_eq!(pixel_at(&pixmap, 1040, 40), accent);
    assert_eq!(pixel_at(&pixmap, 960, 40), accent);
    assert_eq!(pixel_at(&pixmap, 959, 40), bg);
    assert_eq!(pixel_at(&pixmap, 1040, 1040), accent);
    assert_eq!(pixel_at(&pixmap, 1040, 960), accent);
    assert_eq!(pixel_at(&pixmap, 40, 1040), accent);
    assert_eq!(pixel_at(&pixmap, 540, 40), bg);
    assert_eq!(pixel_at(&pixmap, 540, 540), bg);
}

#[test]
fn dot_grid_covers_thirteen_by_thirteen() {
    let theme = ThemeName::Light.palette();
    let pixmap = decorated(DecorationStyle::DotGrid, theme);
    let accent = theme.decoration_color;
    for i in 0..13u32 {
        let pos = i * 80 + 40;
        assert_eq!(pixel_at(&pixmap, pos, 40), accent, "dot at column {i}");
        assert_eq!(pixel_at(&pixmap, 40, pos), accent, "dot at row {i}");
    }
    assert_eq!(pixel_at(&pixmap, 1000, 1000), accent);
    assert_eq!(pixel_at(&pixmap, 80, 80), theme.bg_color1);
    assert_eq!(pixel_at(&pixmap, 40, 50), theme.bg_color1);
    assert_eq!(count_blobs(&pixmap, theme.bg_color1), (1080 / 80) * (1080 / 80));
}

#[test]
fn quote_marks_fall_back_without_fonts() {
    let dir = temp_dir("no-fonts");
    with_font_dir(&dir, || {
        let theme = ThemeName::Light.palette();
        let mut pixmap = synthesize(BackgroundStyle::Flat, GradientDirection::Vertical, theme)
            .expect("synthesize");
        let mut resolver = FontResolver::new(&FontOptions::default());
        apply_decoration(&mut pixmap, DecorationStyle::QuoteMarks, theme, &mut resolver)
            .expect("decorate");
        assert!(resolver.fallback_active());
        assert_eq!(resolver.notices().len(), 1);
        assert_eq!(pixel_at(&pixmap, 101, 101), theme.decoration_color);
        assert_eq!(pixel_at(&pixmap, 103, 101), theme.decoration_color);
        assert_eq!(pixel_at(&pixmap, 107, 101), theme.decoration_color);
        assert_eq!(pixel_at(&pixmap, 102, 101), theme.bg_color1);
    });
}

#[test]
fn resolver_reports_fallback_once() {
    let dir = temp_dir("missing");
    with_font_dir(&dir, || {
        let mut resolver = FontResolver::new(&FontOptions::default());
        let quote = resolver.resolve(FontRole::Quote, 120.0);
        assert!(quote.is_fallback());
        let fonts = resolver.resolve_all();
        assert!(fonts.fallback_active);
        assert!(fonts.author.is_fallback());
        assert!(fonts.signature.is_fallback());
        assert_eq!(resolver.notices().len(), 1);
        assert!(resolver.notices()[0].contains("Lato-Regular.ttf"));
        assert!(resolver.notices()[0].contains(&dir.display().to_string()));

        let fresh = FontResolver::new(&FontOptions::default());
        assert!(!fresh.fallback_active());
        assert!(fresh.notices().is_empty());
    });
}

#[test]
fn unreadable_font_falls_back() {
    let dir = temp_dir("broken");
    for name in ["Lato-Regular.ttf", "Lato-Bold.ttf", "Lato-Light.ttf"] {
        std::fs::write(dir.join(name), b"not a font").expect("write font");
    }
    with_font_dir(&dir, || {
        let mut resolver = FontResolver::new(&FontOptions::default());
        let fonts = resolver.resolve_all();
        assert!(fonts.fallback_active);
        assert_eq!(resolver.notices().len(), 1);
        assert!(resolver.notices()[0].contains("unable to load"));
    });
}

#[test]
fn one_missing_role_forces_fallback_everywhere() {
    let Some(source) = system_font() else {
        return;
    };
    let dir = temp_dir("partial");
    std::fs::copy(&source, dir.join("Lato-Regular.ttf")).expect("copy font");
    with_font_dir(&dir, || {
        let mut resolver = FontResolver::new(&FontOptions::default());
        let fonts = resolver.resolve_all();
        assert!(fonts.fallback_active);
        assert!(fonts.quote.is_fallback());
        assert_eq!(resolver.notices().len(), 1);
    });
}

#[test]
fn font_dir_env_overrides_config() {
    let _guard = env_lock().lock().unwrap_or_else(|err| err.into_inner());
    let prev_dir = std::env::var("QUOTECARD_FONT_DIR").ok();
    let prev_home = std::env::var("HOME").ok();

    std::env::set_var("QUOTECARD_FONT_DIR", "/opt/fonts");
    let options = FontOptions::default();
    assert_eq!(resolve_font_dir(&options), PathBuf::from("/opt/fonts"));

    std::env::remove_var("QUOTECARD_FONT_DIR");
    assert_eq!(resolve_font_dir(&options), PathBuf::from("Lato"));

    if !cfg!(windows) {
        std::env::set_var("HOME", "/home/card");
        let options = FontOptions {
            dir: "~/fonts/Lato".to_string(),
            ..FontOptions::default()
        };
        assert_eq!(
            resolve_font_dir(&options),
            PathBuf::from("/home/card/fonts/Lato")
        );
    }

    restore_env_var("QUOTECARD_FONT_DIR", prev_dir);
    restore_env_var("HOME", prev_home);
}

#[test]
fn bitmap_substitutes_non_ascii() {
    assert_eq!(substitute('\u{2014}'), '-');
    assert_eq!(substitute('\u{201C}'), '"');
    assert_eq!(substitute('é'), 'e');
    assert_eq!(substitute('☆'), '*');
    assert_eq!(substitute('漢'), '?');
    assert_eq!(substitute('Q'), 'Q');
}

#[test]
fn wrap_collapses_whitespace() {
    assert_eq!(wrap_words("  a  b\t\tc \n d ", 10), vec!["a b c d"]);
    assert!(wrap_words("   ", 10).is_empty());
}

#[test]
fn wrap_breaks_at_word_boundaries() {
    let lines = wrap_words("the quick brown fox jumps over the lazy dog", 10);
    assert_eq!(lines, vec!["the quick", "brown fox", "jumps over", "the lazy", "dog"]);
    assert!(lines.iter().all(|line| line.chars().count() <= 10));
}

#[test]
fn wrap_splits_long_words() {
    assert_eq!(wrap_words("abcdefgh", 3), vec!["abc", "def", "gh"]);
    assert_eq!(wrap_words("ab cdefgh", 4), vec!["ab c", "defg", "h"]);
}

#[test]
fn fallback_layout_uses_fixed_metrics() {
    let fonts = FontSet::fallback();
    let quote = "word ".repeat(26);
    let plan = layout(&quote, "Ada", &fonts, 880.0).expect("layout");
    assert_eq!(plan.line_spacing, 10.0);
    assert!(plan.lines.len() > 1);
    for line in &plan.lines {
        assert!(line.text.chars().count() <= 60);
        assert_eq!(line.width, line.text.chars().count() as f32 * 6.0);
        assert_eq!(line.height, 10.0);
    }
    let author = plan.author.as_ref().expect("author line");
    assert_eq!(author.text, author_line("Ada"));
    assert_eq!(author.width, 30.0);

    let lines = plan.lines.len() as f32;
    let expected = lines * 10.0 + 10.0 * (lines - 1.0) + 10.0 + 2.0 * 10.0;
    assert_eq!(plan.total_height, expected);
}

#[test]
fn layout_without_author_skips_author_space() {
    let fonts = FontSet::fallback();
    let plan = layout("Short quote", "", &fonts, 880.0).expect("layout");
    assert_eq!(plan.lines.len(), 1);
    assert!(plan.author.is_none());
    assert_eq!(plan.total_height, 10.0);
}

#[test]
fn layout_rejects_invalid_width() {
    let fonts = FontSet::fallback();
    assert!(matches!(
        layout("quote", "", &fonts, f32::NAN),
        Err(Error::Render(_))
    ));
    assert!(matches!(
        layout("quote", "", &fonts, 0.0),
        Err(Error::Render(_))
    ));
}

#[test]
fn scalable_layout_measures_ink() {
    let Some(source) = system_font() else {
        return;
    };
    let dir = install_fonts(&source);
    with_font_dir(&dir, || {
        let mut resolver = FontResolver::new(&FontOptions::default());
        let fonts = resolver.resolve_all();
        assert!(!fonts.fallback_active);
        assert!(resolver.notices().is_empty());

        let plan = layout(
            "Imagination is more important than knowledge.",
            "Albert Einstein",
            &fonts,
            880.0,
        )
        .expect("layout");
        assert_eq!(plan.line_spacing, 15.0);
        assert!(plan.lines.len() > 1);
        for line in &plan.lines {
            assert!(line.width > 0.0);
            assert!(line.height > 0.0);
        }
        let author = plan.author.as_ref().expect("author");
        let sum: f32 = plan.lines.iter().map(|line| line.height).sum();
        let spacing = 15.0 * (plan.lines.len() - 1) as f32;
        let expected = sum + spacing + author.height + 30.0;
        assert!((plan.total_height - expected).abs() < 1e-3);
    });
}

#[test]
fn render_text_places_block_and_footers() {
    let theme = ThemeName::Light.palette();
    let mut pixmap = synthesize(BackgroundStyle::Flat, GradientDirection::Vertical, theme)
        .expect("synthesize");
    let fonts = FontSet::fallback();
    let status = render_text(
        &mut pixmap,
        "Stay hungry, stay foolish.",
        "Steve Jobs",
        &fonts,
        theme,
        &TextOptions::default(),
    );
    assert_eq!(status, RenderStatus::Complete);
    assert!(region_has(&pixmap, 400..680, 500..560, theme.text_color));
    assert!(region_has(&pixmap, 400..680, 520..580, theme.author_color));
    // signature: 12 glyphs of 6 px ending 20 px from the right edge
    assert!(region_has(&pixmap, 988..1060, 1050..1060, theme.signature_color));
    assert!(region_has(&pixmap, 20..100, 1050..1060, theme.signature_color));
    assert!(!region_has(&pixmap, 0..1080, 0..400, theme.text_color));
}

#[test]
fn footers_can_be_disabled() {
    let theme = ThemeName::Dark.palette();
    let mut pixmap = synthesize(BackgroundStyle::Flat, GradientDirection::Vertical, theme)
        .expect("synthesize");
    let options = TextOptions {
        signature: false,
        watermark: false,
        ..TextOptions::default()
    };
    let status = render_text(
        &mut pixmap,
        "Less is more.",
        "",
        &FontSet::fallback(),
        theme,
        &options,
    );
    assert!(status.is_complete());
    assert!(!region_has(&pixmap, 0..1080, 1000..1080, theme.signature_color));
    assert!(region_has(&pixmap, 480..600, 520..560, theme.text_color));
}

#[test]
fn failed_text_paints_red_notice() {
    let theme = ThemeName::Light.palette();
    let mut pixmap = synthesize(BackgroundStyle::Flat, GradientDirection::Vertical, theme)
        .expect("synthesize");
    let plan = LayoutPlan {
        lines: vec![MeasuredLine {
            text: "broken".to_string(),
            width: f32::NAN,
            height: 10.0,
        }],
        line_spacing: 10.0,
        total_height: 10.0,
        author: None,
    };
    let status = render_plan(
        &mut pixmap,
        &plan,
        &FontSet::fallback(),
        theme,
        &TextOptions::default(),
    );
    let RenderStatus::Degraded(reason) = status else {
        panic!("expected degraded status");
    };
    assert!(reason.contains("invalid text position"));
    assert!(region_has(&pixmap, 100..200, 100..110, ERROR_TEXT_COLOR));
}

#[test]
fn compose_rejects_empty_quote() {
    for quote in ["", "   \n\t"] {
        let request = ComposeRequest {
            quote: quote.to_string(),
            author: "Nobody".to_string(),
            config: Config::default(),
        };
        assert!(matches!(compose(&request), Err(Error::InvalidInput(_))));
    }
}

#[test]
fn compose_with_fallback_fonts() {
    let dir = temp_dir("compose-fallback");
    let rendered = with_font_dir(&dir, || {
        compose(&request("Simplicity is the soul of efficiency.", quick_config()))
    })
    .expect("compose");
    assert_eq!((rendered.width, rendered.height), (1080, 1080));
    assert!(rendered.fallback_font);
    assert_eq!(rendered.status, RenderStatus::Complete);
    assert_eq!(rendered.notices.len(), 1);

    let (rgb, width, height, color) = decode_png_rgb(&rendered.bytes).expect("decode");
    assert_eq!((width, height), (1080, 1080));
    assert_eq!(color, png_crate::ColorType::Rgb);
    let theme = ThemeName::Light.palette();
    assert_eq!(&rgb[..3], &[theme.bg_color1.0, theme.bg_color1.1, theme.bg_color1.2]);
}

#[test]
fn compose_plain_card_draws_only_the_quote() {
    let dir = temp_dir("compose-plain");
    let mut config = quick_config();
    config.background = "uni".parse().expect("flat alias");
    config.decoration = "aucune".parse().expect("none alias");
    config.signature = false;
    config.watermark = false;
    let rendered = with_font_dir(&dir, || {
        compose(&ComposeRequest {
            quote: "Test".to_string(),
            author: String::new(),
            config,
        })
    })
    .expect("compose");
    assert_eq!(rendered.status, RenderStatus::Complete);

    let (rgb, width, height, color) = decode_png_rgb(&rendered.bytes).expect("decode");
    assert_eq!((width, height), (1080, 1080));
    assert_eq!(color, png_crate::ColorType::Rgb);
    let theme = ThemeName::Light.palette();
    let total = (width * height) as usize;
    let background = (0..height)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .filter(|&(x, y)| rgb_at(&rgb, width, x, y) == theme.bg_color1)
        .count();
    assert!(background * 100 >= total * 99, "{background} of {total}");

    // "Test" in the bitmap font: 24x10 box centered at ((1080-24)/2, (1080-10-20)/2)
    let ink: Vec<(u32, u32)> = (0..height)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .filter(|&(x, y)| rgb_at(&rgb, width, x, y) == theme.text_color)
        .collect();
    assert!(!ink.is_empty());
    assert!(ink
        .iter()
        .all(|&(x, y)| (528..552).contains(&x) && (525..535).contains(&y)));
}

#[test]
fn compose_bordered_dark_card_wraps_centered_lines() {
    let dir = temp_dir("compose-border");
    let quote = "Courage is not the absence of fear, but the triumph over it, said the old mentor";
    assert_eq!(quote.chars().count(), 80);
    let mut config = quick_config();
    config.theme = ThemeName::Dark;
    config.background = BackgroundStyle::Gradient;
    config.decoration = "cadre".parse().expect("border alias");
    let rendered =
        with_font_dir(&dir, || compose(&request(quote, config))).expect("compose");
    assert_eq!(rendered.status, RenderStatus::Complete);

    let (rgb, width, height, _) = decode_png_rgb(&rendered.bytes).expect("decode");
    let theme = ThemeName::Dark.palette();
    for (x, y) in [(50, 540), (54, 540), (1030, 540), (540, 50), (540, 1030)] {
        assert_eq!(rgb_at(&rgb, width, x, y), theme.decoration_color, "border at {x},{y}");
    }
    assert_ne!(rgb_at(&rgb, width, 49, 540), theme.decoration_color);
    assert_ne!(rgb_at(&rgb, width, 55, 540), theme.decoration_color);

    let mut bands: Vec<(u32, u32)> = Vec::new();
    let mut previous_row_had_ink = false;
    for y in 0..height {
        let xs: Vec<u32> = (0..width)
            .filter(|&x| rgb_at(&rgb, width, x, y) == theme.text_color)
            .collect();
        match (xs.first(), xs.last()) {
            (Some(&min), Some(&max)) => {
                if previous_row_had_ink {
                    if let Some(band) = bands.last_mut() {
                        band.0 = band.0.min(min);
                        band.1 = band.1.max(max);
                    }
                } else {
                    bands.push((min, max));
                }
                previous_row_had_ink = true;
            }
            _ => previous_row_had_ink = false,
        }
    }
    assert!(bands.len() >= 2, "text rows: {bands:?}");
    assert_ne!(bands[0], bands[1]);
    for (min, max) in bands {
        let center = (min + max + 1) as i64;
        assert!((center - 1080).abs() <= 12, "row {min}..{max} is off center");
    }
}

#[test]
fn compose_is_deterministic() {
    let dir = temp_dir("compose-twice");
    let mut config = quick_config();
    config.decoration = DecorationStyle::DotGrid;
    config.background = BackgroundStyle::Radial;
    let (first, second) = with_font_dir(&dir, || {
        let req = request("Repeat after me.", config.clone());
        (compose(&req), compose(&req))
    });
    let first = first.expect("first");
    let second = second.expect("second");
    assert_eq!(first.bytes, second.bytes);
    // every generation starts with a clean fallback state
    assert_eq!(first.notices.len(), 1);
    assert_eq!(second.notices.len(), 1);
}

#[test]
fn compose_themes_differ() {
    let dir = temp_dir("compose-themes");
    let mut dark = quick_config();
    dark.theme = ThemeName::Dark;
    let (light, dark) = with_font_dir(&dir, || {
        (
            compose(&request("Contrast.", quick_config())),
            compose(&request("Contrast.", dark)),
        )
    });
    assert_ne!(light.expect("light").bytes, dark.expect("dark").bytes);
}

#[test]
fn optimized_png_keeps_rgb() {
    let dir = temp_dir("compose-opt");
    let mut config = quick_config();
    config.png.optimize = true;
    config.png.level = 0;
    let rendered =
        with_font_dir(&dir, || compose(&request("Small is beautiful.", config))).expect("compose");
    let (_, width, height, color) = decode_png_rgb(&rendered.bytes).expect("decode");
    assert_eq!((width, height), (1080, 1080));
    assert_eq!(color, png_crate::ColorType::Rgb);
}

#[test]
fn compose_with_scalable_fonts() {
    let Some(source) = system_font() else {
        return;
    };
    let dir = install_fonts(&source);
    let mut config = quick_config();
    config.decoration = DecorationStyle::QuoteMarks;
    let rendered = with_font_dir(&dir, || {
        compose(&ComposeRequest {
            quote: "The best way to predict the future is to invent it.".to_string(),
            author: "Alan Kay".to_string(),
            config,
        })
    })
    .expect("compose");
    assert!(!rendered.fallback_font);
    assert!(rendered.notices.is_empty());
    assert_eq!(rendered.status, RenderStatus::Complete);
}

#[test]
fn parse_quotes_fills_missing_fields() {
    let quotes = parse_quotes(
        br#"[{"text":"One","author":"A"},{"text":"Two","author":null},{"author":"C"},{"text":"Four"}]"#,
    )
    .expect("parse");
    assert_eq!(quotes.len(), 4);
    assert_eq!(quotes[0].author, "A");
    assert_eq!(quotes[1].author, "Unknown");
    assert_eq!(quotes[2].text, "");
    assert_eq!(quotes[3].author, "Unknown");
}

#[test]
fn parse_quotes_rejects_malformed_body() {
    assert!(matches!(
        parse_quotes(b"{\"text\":\"not a list\"}"),
        Err(Error::QuoteSource(_))
    ));
    assert!(matches!(parse_quotes(b"<html>"), Err(Error::QuoteSource(_))));
}

#[test]
fn pick_quote_draws_from_list() {
    let quotes = vec![
        Quote {
            text: "a".to_string(),
            author: "x".to_string(),
        },
        Quote {
            text: "b".to_string(),
            author: "y".to_string(),
        },
    ];
    let mut rng = StdRng::seed_from_u64(7);
    let picks: Vec<String> = (0..32)
        .map(|_| pick_quote(&quotes, &mut rng).expect("pick").text)
        .collect();
    assert!(picks.iter().any(|text| text == "a"));
    assert!(picks.iter().any(|text| text == "b"));

    let first = pick_quote(&quotes, &mut StdRng::seed_from_u64(42)).expect("pick");
    let again = pick_quote(&quotes, &mut StdRng::seed_from_u64(42)).expect("pick");
    assert_eq!(first, again);
    assert!(matches!(
        pick_quote(&[], &mut StdRng::seed_from_u64(1)),
        Err(Error::QuoteSource(_))
    ));
}

#[test]
fn fetch_random_quote_from_stub() {
    let body = br#"[{"text":"Hello","author":"World"},{"text":"Bye","author":"Moon"}]"#;
    let (url, handle) = serve_once(200, body.to_vec());
    let quote = fetch_random_quote(&ApiOptions {
        url,
        timeout_ms: 2_000,
    })
    .expect("fetch");
    handle.join().expect("server");
    assert!(["Hello", "Bye"].contains(&quote.text.as_str()));
    assert!(["World", "Moon"].contains(&quote.author.as_str()));
}

#[test]
fn fetch_random_quote_reports_status() {
    let (url, handle) = serve_once(500, b"oops".to_vec());
    let err = fetch_random_quote(&ApiOptions {
        url,
        timeout_ms: 2_000,
    })
    .expect_err("status error");
    handle.join().expect("server");
    assert!(matches!(err, Error::QuoteSource(ref msg) if msg.contains("500")));
}

#[test]
fn fetch_random_quote_rejects_empty_list() {
    let (url, handle) = serve_once(200, b"[]".to_vec());
    let err = fetch_random_quote(&ApiOptions {
        url,
        timeout_ms: 2_000,
    })
    .expect_err("empty list");
    handle.join().expect("server");
    assert!(matches!(err, Error::QuoteSource(_)));
}

#[test]
fn fetch_random_quote_reports_connection_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let err = fetch_random_quote(&ApiOptions {
        url: format!("http://{addr}/quotes"),
        timeout_ms: 500,
    })
    .expect_err("connection error");
    assert!(matches!(err, Error::QuoteSource(_)));
}

#[test]
fn history_keeps_newest_first() {
    let mut history = History::new(3);
    let mut ids = Vec::new();
    for i in 0..5u8 {
        ids.push(history.push(
            &format!("quote {i}"),
            "author",
            vec![i; 4],
            ThemeName::Light,
            BackgroundStyle::Gradient,
            DecorationStyle::None,
        ));
    }
    assert_eq!(history.len(), 3);
    assert_eq!(history.latest().map(|e| e.quote.as_str()), Some("quote 4"));
    let quotes: Vec<_> = history.iter().map(|e| e.quote.clone()).collect();
    assert_eq!(quotes, vec!["quote 4", "quote 3", "quote 2"]);
    assert!(history.get(&ids[0]).is_none());
    assert_eq!(history.get(&ids[3]).map(|e| e.image.clone()), Some(vec![3; 4]));

    let mut unique = ids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), ids.len());
}

#[test]
fn history_capacity_is_at_least_one() {
    let mut history = History::new(0);
    assert_eq!(history.capacity(), 1);
    history.push(
        "a",
        "b",
        Vec::new(),
        ThemeName::Dark,
        BackgroundStyle::Flat,
        DecorationStyle::Border,
    );
    history.push(
        "c",
        "d",
        Vec::new(),
        ThemeName::Dark,
        BackgroundStyle::Flat,
        DecorationStyle::Border,
    );
    assert_eq!(history.len(), 1);
    assert_eq!(History::default().capacity(), 10);
    history.clear();
    assert!(history.is_empty());
}

fn quick_config() -> Config {
    let mut config = Config::default();
    config.png.optimize = false;
    config
}

fn request(quote: &str, config: Config) -> ComposeRequest {
    ComposeRequest {
        quote: quote.to_string(),
        author: "Anonymous".to_string(),
        config,
    }
}

fn decorated(style: DecorationStyle, theme: &Theme) -> Pixmap {
    let mut pixmap = synthesize(BackgroundStyle::Flat, GradientDirection::Vertical, theme)
        .expect("synthesize");
    let mut resolver = FontResolver::new(&FontOptions::default());
    apply_decoration(&mut pixmap, style, theme, &mut resolver).expect("decorate");
    pixmap
}

fn pixel_at(pixmap: &Pixmap, x: u32, y: u32) -> Rgb {
    let pixel = pixmap.pixel(x, y).expect("pixel in bounds");
    Rgb(pixel.red(), pixel.green(), pixel.blue())
}

fn region_has(
    pixmap: &Pixmap,
    xs: std::ops::Range<u32>,
    ys: std::ops::Range<u32>,
    color: Rgb,
) -> bool {
    ys.flat_map(|y| xs.clone().map(move |x| (x, y)))
        .any(|(x, y)| pixel_at(pixmap, x, y) == color)
}

fn rgb_at(rgb: &[u8], width: u32, x: u32, y: u32) -> Rgb {
    let index = ((y * width + x) * 3) as usize;
    Rgb(rgb[index], rgb[index + 1], rgb[index + 2])
}

/// Number of 4-connected regions whose pixels differ from `background`.
fn count_blobs(pixmap: &Pixmap, background: Rgb) -> usize {
    let (width, height) = (pixmap.width(), pixmap.height());
    let mut seen = vec![false; (width * height) as usize];
    let mut blobs = 0;
    for start_y in 0..height {
        for start_x in 0..width {
            let start = (start_y * width + start_x) as usize;
            if seen[start] || pixel_at(pixmap, start_x, start_y) == background {
                continue;
            }
            blobs += 1;
            seen[start] = true;
            let mut stack = vec![(start_x, start_y)];
            while let Some((x, y)) = stack.pop() {
                let neighbors = [
                    (x.wrapping_sub(1), y),
                    (x + 1, y),
                    (x, y.wrapping_sub(1)),
                    (x, y + 1),
                ];
                for (nx, ny) in neighbors {
                    if nx >= width || ny >= height {
                        continue;
                    }
                    let index = (ny * width + nx) as usize;
                    if !seen[index] && pixel_at(pixmap, nx, ny) != background {
                        seen[index] = true;
                        stack.push((nx, ny));
                    }
                }
            }
        }
    }
    blobs
}

fn distance(a: Rgb, b: Rgb) -> i32 {
    (a.0 as i32 - b.0 as i32).abs() + (a.1 as i32 - b.1 as i32).abs() + (a.2 as i32 - b.2 as i32).abs()
}

fn assert_close(actual: Rgb, expected: Rgb, tolerance: u8) {
    for (a, e) in [
        (actual.0, expected.0),
        (actual.1, expected.1),
        (actual.2, expected.2),
    ] {
        assert!(
            a.abs_diff(e) <= tolerance,
            "{actual:?} not within {tolerance} of {expected:?}"
        );
    }
}

fn system_font() -> Option<PathBuf> {
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "/Library/Fonts/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ]
    .iter()
    .map(PathBuf::from)
    .find(|path| path.is_file())
}

fn install_fonts(source: &Path) -> PathBuf {
    let dir = temp_dir("fonts");
    for name in ["Lato-Regular.ttf", "Lato-Bold.ttf", "Lato-Light.ttf"] {
        std::fs::copy(source, dir.join(name)).expect("copy font");
    }
    dir
}

fn with_font_dir<T>(dir: &Path, f: impl FnOnce() -> T) -> T {
    let _guard = env_lock().lock().unwrap_or_else(|err| err.into_inner());
    let prev = std::env::var("QUOTECARD_FONT_DIR").ok();
    std::env::set_var("QUOTECARD_FONT_DIR", dir);
    let out = f();
    restore_env_var("QUOTECARD_FONT_DIR", prev);
    out
}

fn serve_once(status: u16, body: Vec<u8>) -> (String, thread::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let _ = read_request(&mut stream);
        write_response(
            &mut stream,
            status,
            &[("Content-Type", "application/json")],
            Some(&body),
        );
    });
    (format!("http://{addr}/api/quotes"), handle)
}

fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = [0u8; 4096];
    let mut data = Vec::new();
    loop {
        let read = stream.read(&mut buf).unwrap_or(0);
        if read == 0 {
            break;
        }
        data.extend_from_slice(&buf[..read]);
        if data.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }
    String::from_utf8_lossy(&data).to_string()
}

fn write_response(
    stream: &mut TcpStream,
    status: u16,
    headers: &[(&str, &str)],
    body: Option<&[u8]>,
) {
    let status_text = match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "OK",
    };
    let body_len = body.map_or(0, |b| b.len());
    let mut response = format!("HTTP/1.1 {} {}\r\n", status, status_text);
    response.push_str(&format!("Content-Length: {body_len}\r\n"));
    response.push_str("Connection: close\r\n");
    for (k, v) in headers {
        response.push_str(&format!("{k}: {v}\r\n"));
    }
    response.push_str("\r\n");
    stream.write_all(response.as_bytes()).expect("write");
    if let Some(body) = body {
        stream.write_all(body).expect("write body");
    }
}

fn restore_env_var(key: &str, value: Option<String>) {
    match value {
        Some(val) => std::env::set_var(key, val),
        None => std::env::remove_var(key),
    }
}

fn temp_dir(prefix: &str) -> PathBuf {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let id = COUNTER.fetch_add(1, Ordering::Relaxed);
    let mut path = std::env::temp_dir();
    path.push(format!("quotecard-{}-{}-{}", prefix, std::process::id(), id));
    let _ = std::fs::remove_dir_all(&path);
    std::fs::create_dir_all(&path).expect("create dir");
    path
}

fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}
