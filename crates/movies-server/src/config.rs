use std::path::PathBuf;

use crate::Result;
pub use clap::Parser;
use movies_app::{
    origin::{AllowedOrigins, DEFAULT_ALLOWED_ORIGINS},
    state::AppConfig,
};
use url::Url;

#[derive(Debug, Clone, clap::Parser)]
pub struct ServerConfig {
    #[arg(
        short,
        long,
        default_value_t = 1234,
        env = "PORT",
        help = "Port to listen on"
    )]
    pub port: u16,
    #[arg(
        short,
        long,
        default_value = "127.0.0.1",
        env = "MOVIES_LISTEN_ADDRESS",
        help = "Address to listen on"
    )]
    pub listen_address: String,

    #[arg(
        long,
        env = "MOVIES_ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_values_t = DEFAULT_ALLOWED_ORIGINS.map(String::from),
        value_parser = parse_origin,
        help = "Origins allowed to make cross-origin requests (comma separated), requests from other origins are rejected"
    )]
    pub allowed_origins: Vec<String>,

    #[arg(
        long,
        env = "MOVIES_SEED_FILE",
        help = "JSON file with movies loaded at startup, default is the bundled dataset"
    )]
    pub seed_file: Option<PathBuf>,

    #[arg(
        long,
        env = "MOVIES_NO_SEED",
        conflicts_with = "seed_file",
        help = "Start with an empty catalogue"
    )]
    pub no_seed: bool,
}

/// Accepts only a bare origin (scheme, host and optional port), as browsers send it.
fn parse_origin(s: &str) -> std::result::Result<String, String> {
    let url = Url::parse(s).map_err(|e| format!("invalid origin {s}: {e}"))?;
    let origin = url.origin().ascii_serialization();
    if origin == s {
        Ok(origin)
    } else {
        Err(format!("{s} is not an origin, did you mean {origin}?"))
    }
}

impl ServerConfig {
    pub fn load() -> Result<Self> {
        ServerConfig::try_parse().map_err(|e| e.into())
    }

    pub fn base_url(&self) -> Result<Url> {
        let url = Url::parse(&format!("http://{}:{}/", self.listen_address, self.port))?;
        Ok(url)
    }
}

impl From<&ServerConfig> for AppConfig {
    fn from(config: &ServerConfig) -> Self {
        AppConfig {
            allowed_origins: AllowedOrigins::new(config.allowed_origins.iter().cloned()),
        }
    }
}
