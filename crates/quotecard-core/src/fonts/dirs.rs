use crate::FontOptions;
use std::env;
use std::path::PathBuf;

pub(crate) fn resolve_font_dir(options: &FontOptions) -> PathBuf {
    if let Ok(raw) = env::var("QUOTECARD_FONT_DIR") {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            if let Some(path) = expand_home_dir(trimmed) {
                return path;
            }
        }
    }
    expand_home_dir(options.dir.trim()).unwrap_or_else(|| PathBuf::from(&options.dir))
}

pub(crate) fn expand_home_dir(value: &str) -> Option<PathBuf> {
    if value == "~" || value.starts_with("~/") || value.starts_with("~\\") {
        let home = home_dir()?;
        let rest = value.trim_start_matches('~');
        return Some(if rest.is_empty() {
            home
        } else {
            home.join(rest.trim_start_matches(['/', '\\']))
        });
    }
    Some(PathBuf::from(value))
}

pub(crate) fn home_dir() -> Option<PathBuf> {
    if cfg!(windows) {
        if let Some(path) = env::var_os("USERPROFILE") {
            return Some(PathBuf::from(path));
        }
        if let (Some(drive), Some(path)) = (env::var_os("HOMEDRIVE"), env::var_os("HOMEPATH")) {
            return Some(PathBuf::from(drive).join(path));
        }
        None
    } else {
        env::var_os("HOME").map(PathBuf::from)
    }
}
