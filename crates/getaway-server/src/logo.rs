use std::path::PathBuf;

use getaway_core::paths;
use getaway_export::generate::LogoSource;

use crate::config::ServerConfig;

/// Finds the default company logo and the URL the browser should load it
/// from.
#[derive(Debug, Clone)]
pub struct LogoLocator {
    path: PathBuf,
    url: String,
}

impl LogoLocator {
    pub fn from_config(config: &ServerConfig) -> Self {
        let url = config.logo_url.clone().unwrap_or_else(|| {
            let public_path = paths::public_url_path(&config.public_dir, &config.logo_path)
                .unwrap_or_else(|| {
                    let file_name = config
                        .logo_path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    format!("{}/assets/default/{file_name}", paths::PUBLIC_PREFIX)
                });
            format!("{}{public_path}", config.server_url.trim_end_matches('/'))
        });

        Self {
            path: config.logo_path.clone(),
            url,
        }
    }

    /// The logo URL, or `None` when the logo file does not exist.
    ///
    /// Checked on every call so a logo added after startup is picked up.
    pub fn resolve(&self) -> Option<String> {
        self.path.is_file().then(|| self.url.clone())
    }
}

impl LogoSource for LogoLocator {
    fn logo_url(&self) -> Option<String> {
        self.resolve()
    }
}
