use std::{collections::HashMap, fs, path::PathBuf};

use serde::Deserialize;
use shared::domain::UserId;
use url::Url;

use crate::error::Result;

pub const SETTINGS_FILE: &str = "portfolio.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api_base_url: String,
    pub auth_base_url: String,
    pub token_file: PathBuf,
    pub token_key: String,
    pub fallback_user_id: UserId,
    pub redirect_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "https://hng6-r5y3.onrender.com/".into(),
            auth_base_url: "https://staging.zuri.team/api/auth/".into(),
            token_file: default_token_file(),
            token_key: "zpt".into(),
            fallback_user_id: UserId::from("f8e1d17d-0d9e-4d21-89c5-7a564f8a1e90"),
            redirect_path: "/portfolio".into(),
        }
    }
}

impl Settings {
    pub fn api_base(&self) -> Result<Url> {
        Ok(Url::parse(&normalize_base_url(&self.api_base_url))?)
    }

    pub fn auth_base(&self) -> Result<Url> {
        Ok(Url::parse(&normalize_base_url(&self.auth_base_url))?)
    }
}

fn default_token_file() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("portfolio")
        .join("token.toml")
}

pub fn load_settings() -> Settings {
    let raw = fs::read_to_string(SETTINGS_FILE).ok();
    settings_from_sources(raw.as_deref(), |key| std::env::var(key).ok())
}

/// Layers defaults, then the flat `portfolio.toml` map, then environment
/// variables. Later layers win; `APP__*` names win over the short names.
pub fn settings_from_sources(
    file_contents: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file_contents {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) {
            if let Some(v) = file_cfg.get("api_url") {
                settings.api_base_url = v.clone();
            }
            if let Some(v) = file_cfg.get("auth_url") {
                settings.auth_base_url = v.clone();
            }
            if let Some(v) = file_cfg.get("token_file") {
                settings.token_file = PathBuf::from(v);
            }
            if let Some(v) = file_cfg.get("token_key") {
                settings.token_key = v.clone();
            }
            if let Some(v) = file_cfg.get("fallback_user_id") {
                settings.fallback_user_id = UserId::new(v.clone());
            }
            if let Some(v) = file_cfg.get("redirect_path") {
                settings.redirect_path = v.clone();
            }
        }
    }

    if let Some(v) = env("PORTFOLIO_API_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = env("APP__API_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = env("PORTFOLIO_AUTH_URL") {
        settings.auth_base_url = v;
    }
    if let Some(v) = env("APP__AUTH_URL") {
        settings.auth_base_url = v;
    }

    if let Some(v) = env("PORTFOLIO_TOKEN_FILE") {
        settings.token_file = PathBuf::from(v);
    }
    if let Some(v) = env("APP__TOKEN_FILE") {
        settings.token_file = PathBuf::from(v);
    }

    if let Some(v) = env("APP__FALLBACK_USER_ID") {
        settings.fallback_user_id = UserId::new(v);
    }
    if let Some(v) = env("APP__REDIRECT_PATH") {
        settings.redirect_path = v;
    }

    settings
}

pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    }
}
