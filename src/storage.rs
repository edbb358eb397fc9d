use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080/api";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Terminal,
    Light,
    Dark,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Config {
    server_url: Option<String>,
    operator: Option<String>,
    theme: Option<ThemePreference>,
}

pub fn read_token() -> Option<String> {
    if let Ok(value) = env::var("WRENCHDESK_TOKEN") {
        if !value.trim().is_empty() {
            return Some(value.trim().to_string());
        }
    }

    let path = token_path()?;
    fs::read_to_string(path)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn write_token(token: &str) -> Result<(), io::Error> {
    let path = token_path()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Home directory not found"))?;
    fs::write(path, token)
}

pub fn read_server_url() -> String {
    read_config()
        .and_then(|config| config.server_url)
        .map(|url| normalize_server_url(&url))
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string())
}

pub fn write_server_url(url: &str) -> Result<(), io::Error> {
    let mut config = read_config().unwrap_or_default();
    config.server_url = Some(normalize_server_url(url));
    write_config(&config)
}

pub fn read_operator() -> Option<String> {
    read_config()
        .and_then(|config| config.operator)
        .filter(|name| !name.trim().is_empty())
}

pub fn write_operator(name: &str) -> Result<(), io::Error> {
    let mut config = read_config().unwrap_or_default();
    config.operator = Some(name.trim().to_string());
    write_config(&config)
}

pub fn read_theme() -> Option<ThemePreference> {
    read_config().and_then(|config| config.theme)
}

pub fn write_theme(theme: ThemePreference) -> Result<(), io::Error> {
    let mut config = read_config().unwrap_or_default();
    config.theme = Some(theme);
    write_config(&config)
}

pub fn normalize_server_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn token_path() -> Option<PathBuf> {
    let mut path = dirs::home_dir()?;
    path.push(".wrenchdesk-token");
    Some(path)
}

fn config_path() -> Option<PathBuf> {
    let mut path = dirs::home_dir()?;
    path.push(".wrenchdesk.json");
    Some(path)
}

fn read_config() -> Option<Config> {
    let path = config_path()?;
    let contents = fs::read_to_string(path).ok()?;
    serde_json::from_str(&contents).ok()
}

fn write_config(config: &Config) -> Result<(), io::Error> {
    let path = config_path()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Home directory not found"))?;
    let json = serde_json::to_string_pretty(config)
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err.to_string()))?;
    fs::write(path, json)
}
