//! Configuration for the docqa binary.
//!
//! Settings come from three layers, later ones winning: the TOML file at
//! `$XDG_CONFIG_HOME/docqa/config.toml`, the `DOCQA_BACKEND_URL` environment
//! variable, and command-line flags. A missing or unparsable file is a soft
//! failure; defaults are used and a note goes to stderr.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use serde::Deserialize;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";
pub const DEFAULT_THEME: &str = "catppuccin-mocha";

/// Terminal client for a document question-answering backend.
#[derive(Debug, Parser)]
#[command(name = "docqa", version, about)]
pub struct Cli {
    /// PDF path or http(s) URL to analyze on startup.
    pub source: Option<String>,

    /// Backend base URL.
    #[arg(long, env = "DOCQA_BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Color theme: `dark` or `catppuccin-mocha`.
    #[arg(long)]
    pub theme: Option<String>,

    /// Alternate config file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Values read from `config.toml`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub backend_url: String,
    pub theme: String,
    /// Per-request timeout; `0` (the default) disables it.
    pub request_timeout_secs: u64,
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_owned(),
            theme: DEFAULT_THEME.to_owned(),
            request_timeout_secs: 0,
            log_file: None,
        }
    }
}

impl Settings {
    /// Loads the file layer, then applies command-line overrides.
    ///
    /// `DOCQA_BACKEND_URL` reaches here through clap's `env` attribute.
    pub fn resolve(cli: &Cli) -> Self {
        let path = cli.config.clone().unwrap_or_else(config_path);
        let mut settings = Self::load(&path);
        if let Some(url) = &cli.backend_url {
            settings.backend_url = url.clone();
        }
        if let Some(theme) = &cli.theme {
            settings.theme = theme.clone();
        }
        settings
    }

    /// Reads `path`, falling back to defaults when it is absent or invalid.
    pub fn load(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(_) => return Self::default(),
        };
        match toml::from_str(&raw) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("docqa: config parse error in {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    /// Where tracing output goes. The terminal is owned by the TUI.
    pub fn log_path(&self) -> PathBuf {
        if let Some(path) = &self.log_file {
            return path.clone();
        }
        xdg_dir("XDG_STATE_HOME", ".local/state")
            .map(|d| d.join("docqa").join("docqa.log"))
            .unwrap_or_else(|| PathBuf::from("docqa.log"))
    }
}

fn xdg_dir(var: &str, home_fallback: &str) -> Option<PathBuf> {
    std::env::var(var)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(home_fallback))
        })
}

/// `$XDG_CONFIG_HOME/docqa/config.toml`, else `~/.config/docqa/config.toml`.
pub fn config_path() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", ".config")
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("docqa")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let settings = Settings::load(&dir.path().join("nope.toml"));
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.request_timeout(), None);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "backend_url = \"http://10.0.0.2:8080\"\nrequest_timeout_secs = 30").unwrap();
        let settings = Settings::load(file.path());
        assert_eq!(settings.backend_url, "http://10.0.0.2:8080");
        assert_eq!(settings.theme, DEFAULT_THEME);
        assert_eq!(settings.request_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn invalid_file_falls_back() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "backend_url = [").unwrap();
        assert_eq!(Settings::load(file.path()), Settings::default());
    }

    #[test]
    fn flags_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "backend_url = \"http://a.example.com\"\ntheme = \"dark\"").unwrap();
        let cli = Cli::parse_from([
            "docqa",
            "--config",
            file.path().to_str().unwrap(),
            "--backend-url",
            "http://b.example.com",
            "report.pdf",
        ]);
        let settings = Settings::resolve(&cli);
        assert_eq!(settings.backend_url, "http://b.example.com");
        assert_eq!(settings.theme, "dark");
        assert_eq!(cli.source.as_deref(), Some("report.pdf"));
    }
}
