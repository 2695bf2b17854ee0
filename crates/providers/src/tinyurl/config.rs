use directories::BaseDirs;
use miniurl_core::link::DEFAULT_DOMAIN;
use serde::Deserialize;
use std::{env, fs, path::PathBuf, time::Duration};

#[derive(Clone, Debug, Deserialize)]
pub struct TinyUrlFileConfig {
    pub base_url: Option<String>,
    pub domain: Option<String>,
    pub timeout_ms: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct TinyUrlConfig {
    pub api_token: String,
    pub base_url: String,
    pub domain: String,
    pub timeout: Duration,
    pub proxy: Option<String>,
}

impl TinyUrlConfig {
    pub fn from_env_and_file() -> anyhow::Result<Self> {
        let api_token = env::var("TINYURL_API_TOKEN")
            .map_err(|_| anyhow::anyhow!("TINYURL_API_TOKEN not set"))?;
        let base_url = env::var("TINYURL_API_URL")
            .unwrap_or_else(|_| "https://api.tinyurl.com".to_string());

        let mut domain = DEFAULT_DOMAIN.to_string();
        let mut timeout_ms = 30_000u64;
        let mut file_base_url = None;

        if let Some(path) = Self::config_path() {
            if path.exists() {
                if let Ok(text) = fs::read_to_string(&path) {
                    if let Ok(file_cfg) = toml::from_str::<TinyUrlFileConfig>(&text) {
                        if let Some(d) = file_cfg.domain {
                            domain = d;
                        }
                        if let Some(t) = file_cfg.timeout_ms {
                            timeout_ms = t;
                        }
                        file_base_url = file_cfg.base_url;
                    }
                }
            }
        }

        // Env wins over the config file for the endpoint.
        let base_url = if env::var("TINYURL_API_URL").is_ok() {
            base_url
        } else {
            file_base_url.unwrap_or(base_url)
        };

        let proxy = env::var("HTTPS_PROXY")
            .ok()
            .or_else(|| env::var("HTTP_PROXY").ok());

        Ok(TinyUrlConfig {
            api_token,
            base_url,
            domain,
            timeout: Duration::from_millis(timeout_ms),
            proxy,
        })
    }

    fn config_path() -> Option<PathBuf> {
        let base = BaseDirs::new()?;
        let p = if cfg!(target_os = "windows") {
            base.home_dir().join(".miniurl").join("config.toml")
        } else {
            base.config_dir().join("miniurl").join("config.toml")
        };
        Some(p)
    }
}
