use figment::{providers::Env, Figment};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

/// Server configuration, read from the environment.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: IpAddr,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory holding `graphics/`, `audio/`, `data/` and `settings.json`
    #[serde(default = "default_asset_root")]
    pub asset_root: PathBuf,
    /// Level to simulate; `<asset_root>/data/map.tmj` when unset
    pub level_path: Option<PathBuf>,
    /// Game settings; `<asset_root>/settings.json` when unset and present
    pub settings_path: Option<PathBuf>,
    /// Browser build served under `/play`; the route is absent when unset
    pub web_root: Option<PathBuf>,
    /// Graceful shutdown timeout in seconds
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_seconds: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            asset_root: default_asset_root(),
            level_path: None,
            settings_path: None,
            web_root: None,
            shutdown_timeout_seconds: default_shutdown_timeout(),
        }
    }
}

impl Config {
    /// Defaults, with every path resolved against `root`.
    pub fn with_asset_root(root: impl Into<PathBuf>) -> Self {
        Self {
            asset_root: root.into(),
            ..Self::default()
        }
    }

    pub fn level_path(&self) -> PathBuf {
        self.level_path
            .clone()
            .unwrap_or_else(|| self.asset_root.join("data").join("map.tmj"))
    }

    pub fn settings_path(&self) -> Option<PathBuf> {
        self.settings_path.clone().or_else(|| {
            let default = self.asset_root.join("settings.json");
            default.exists().then_some(default)
        })
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

fn default_asset_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_shutdown_timeout() -> u32 {
    5
}

const KEYS: &[&str] = &[
    "HOST",
    "PORT",
    "ASSET_ROOT",
    "LEVEL_PATH",
    "SETTINGS_PATH",
    "WEB_ROOT",
    "SHUTDOWN_TIMEOUT_SECONDS",
];

pub fn load_config() -> Result<Config, figment::Error> {
    Figment::new().merge(Env::raw().only(KEYS)).extract()
}
