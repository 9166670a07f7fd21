use quotecard_core::Config;
use std::error::Error;
use std::path::PathBuf;
use std::{env, fs};

const DEFAULT_CONFIG: &str = include_str!("../configurations/default.json");
const FULL_CONFIG: &str = include_str!("../configurations/full.json");

pub(crate) fn load_config(config_arg: Option<&str>) -> Result<Config, Box<dyn Error>> {
    let name = config_arg.unwrap_or("default");
    let config = match name {
        "default" => serde_json::from_str(DEFAULT_CONFIG)?,
        "full" => serde_json::from_str(FULL_CONFIG)?,
        "user" => load_user_config()?,
        _ => {
            let contents = fs::read_to_string(name)
                .map_err(|err| format!("unable to read config {name}: {err}"))?;
            serde_json::from_str(&contents)?
        }
    };
    log::debug!("loaded config {name}");
    Ok(config)
}

pub(crate) fn load_user_config() -> Result<Config, Box<dyn Error>> {
    let path = user_config_path()?;
    if path.exists() {
        let contents = fs::read_to_string(&path)?;
        return Ok(serde_json::from_str(&contents)?);
    }
    serde_json::from_str(DEFAULT_CONFIG).map_err(|err| err.into())
}

pub(crate) fn save_user_config(config: &Config) -> Result<PathBuf, Box<dyn Error>> {
    let path = user_config_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, serde_json::to_string_pretty(config)?)?;
    Ok(path)
}

pub(crate) fn user_config_path() -> Result<PathBuf, Box<dyn Error>> {
    if let Ok(path) = env::var("QUOTECARD_CONFIG_PATH") {
        return Ok(PathBuf::from(path));
    }
    let config_dir = if let Ok(path) = env::var("QUOTECARD_CONFIG_DIR") {
        PathBuf::from(path)
    } else {
        default_config_dir()?
    };
    Ok(config_dir.join("user.json"))
}

fn default_app_dir() -> Result<PathBuf, Box<dyn Error>> {
    if let Ok(path) = env::var("QUOTECARD_HOME") {
        return Ok(PathBuf::from(path));
    }
    let home = if cfg!(windows) {
        if let Some(path) = env::var_os("USERPROFILE") {
            PathBuf::from(path)
        } else if let (Some(drive), Some(path)) =
            (env::var_os("HOMEDRIVE"), env::var_os("HOMEPATH"))
        {
            PathBuf::from(drive).join(path)
        } else {
            return Err("unable to resolve home directory".into());
        }
    } else if let Some(path) = env::var_os("HOME") {
        PathBuf::from(path)
    } else {
        return Err("unable to resolve home directory".into());
    };
    Ok(home.join(".quotecard"))
}

fn default_config_dir() -> Result<PathBuf, Box<dyn Error>> {
    Ok(default_app_dir()?.join("config"))
}
