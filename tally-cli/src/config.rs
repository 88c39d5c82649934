use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tally_core::EngineConfig;

/// `~/.tally/config.toml`.
pub fn default_config_path() -> Result<PathBuf> {
    let home = std::env::var_os("HOME").context("HOME is not set; pass --config")?;
    Ok(PathBuf::from(home).join(".tally").join("config.toml"))
}

/// Load `path`, or `~/.tally/config.toml` when no path is given.
/// A missing default file means defaults; a missing explicit file is an error.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let p = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let p = default_config_path()?;
            if !p.exists() {
                log::debug!("no config at {}, using defaults", p.display());
                return Ok(EngineConfig::default());
            }
            p
        }
    };
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn parse_config(s: &str) -> Result<EngineConfig> {
    Ok(toml::from_str(s)?)
}

pub fn render_config(cfg: &EngineConfig) -> Result<String> {
    toml::to_string_pretty(cfg).context("serialize config")
}

pub fn save_config(cfg: &EngineConfig, path: &Path) -> Result<()> {
    let s = render_config(cfg)?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Write the default config to `path` (or the default location), creating its directory.
/// An existing file is left alone. Returns whether a file was written.
pub fn init_config(path: Option<&Path>) -> Result<bool> {
    let p = match path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(false);
    }
    if let Some(dir) = p.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    save_config(&EngineConfig::default(), &p)?;
    println!("Wrote {}", p.display());
    Ok(true)
}
