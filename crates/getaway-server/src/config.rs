use std::env;
use std::path::PathBuf;

use getaway_core::paths;

const DEFAULT_PORT: u16 = 5000;

/// Server configuration, read once at startup and passed to every
/// component that needs it.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Deployment label reported by `GET /` (e.g. "development", "production").
    pub environment: String,
    /// Public base URL of this server, used to build the logo URL.
    pub server_url: String,
    /// Default logo file on disk.
    pub logo_path: PathBuf,
    /// Overrides the logo URL derived from `server_url`.
    pub logo_url: Option<String>,
    /// Directory holding the supplementary PDFs.
    pub pages_dir: PathBuf,
    pub template_path: PathBuf,
    /// Served under `/public`.
    pub public_dir: PathBuf,
    /// Destination for uploaded logos.
    pub upload_dir: PathBuf,
    /// Chrome binary; auto-detected when unset.
    pub chrome_path: Option<PathBuf>,
}

impl ServerConfig {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source. Empty
    /// values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let path = |key: &str, default: &str| PathBuf::from(var(key).unwrap_or_else(|| default.to_string()));

        let port = match var("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e| eyre::eyre!("invalid PORT {raw:?}: {e}"))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            port,
            environment: var("APP_ENV")
                .or_else(|| var("NODE_ENV"))
                .unwrap_or_else(|| "development".to_string()),
            server_url: var("SERVER_URL").unwrap_or_else(|| format!("http://localhost:{port}")),
            logo_path: path("LOGO_PATH", paths::DEFAULT_LOGO),
            logo_url: var("LOGO_URL"),
            pages_dir: path("STATIC_PAGES_PATH", paths::DEFAULT_PAGES_DIR),
            template_path: path("TEMPLATE_PATH", paths::DEFAULT_TEMPLATE),
            public_dir: path("PUBLIC_DIR", paths::DEFAULT_PUBLIC_DIR),
            upload_dir: path("UPLOAD_DIR", paths::DEFAULT_UPLOAD_DIR),
            chrome_path: var("CHROME_PATH").map(PathBuf::from),
        })
    }
}
