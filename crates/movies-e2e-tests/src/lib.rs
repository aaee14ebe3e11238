use std::{fmt::Display, path::Path, time::Duration};

use anyhow::{Result, anyhow};
use movies_dal::Movie;
use movies_server::{
    config::{Parser, ServerConfig},
    run::{build_state, run_graceful_with_state},
};
use rand::Rng as _;
use tempfile::TempDir;
use tracing::{error, info};
use url::Url;

pub const ALLOWED_ORIGIN: &str = "http://localhost:8080";

fn random_port() -> Result<u16> {
    let mut rng = rand::rng();

    let mut retries = 3;
    while retries > 0 {
        let port: u16 = rng.random_range(3030..4030);
        let addr: std::net::SocketAddr = format!("127.0.0.1:{}", port).parse()?;
        match std::net::TcpStream::connect_timeout(&addr, std::time::Duration::from_millis(100)) {
            Err(e) if e.kind() == std::io::ErrorKind::ConnectionRefused => return Ok(port),
            Err(_) => retries -= 1,
            Ok(_) => retries -= 1,
        }
    }

    Err(anyhow!("Could not find a free port"))
}

pub struct ConfigGuard {
    #[allow(dead_code)]
    data_dir: TempDir,
}

fn fixture_path() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/test-data/movies.json"))
}

/// Movies the test server starts with, in store order.
pub fn fixture_movies() -> Result<Vec<Movie>> {
    let json = std::fs::read_to_string(fixture_path())?;
    Ok(movies_dal::seed::parse_dataset(&json)?)
}

pub fn test_config(test_name: &str) -> Result<(ServerConfig, ConfigGuard)> {
    let tmp_data_dir = TempDir::with_prefix(format!("{}_", test_name))?;
    let seed_file = tmp_data_dir.path().join("movies.json");
    std::fs::copy(fixture_path(), &seed_file)?;
    let seed_file = seed_file.to_string_lossy().to_string();
    let port = random_port()?.to_string();
    let args = &[
        "movies-e2e-tests",
        "--port",
        &port,
        "--seed-file",
        &seed_file,
    ];
    let config = ServerConfig::try_parse_from(args)?;
    Ok((
        config,
        ConfigGuard {
            data_dir: tmp_data_dir,
        },
    ))
}

/// Starts the server in background and waits until it answers, returns its base URL.
pub async fn spawn_server(args: ServerConfig) -> Result<Url> {
    let base_url = args.base_url()?;
    let state = build_state(&args).await?;
    tokio::spawn(async move {
        if let Err(e) = run_graceful_with_state(args, state, std::future::pending::<()>()).await {
            error!("Test server failed: {e}");
        }
    });

    let health_url = base_url.join("health")?;
    let client = reqwest::Client::new();
    for _ in 0..50 {
        match client.get(health_url.clone()).send().await {
            Ok(response) if response.status().is_success() => {
                info!("Test server ready at {base_url}");
                return Ok(base_url);
            }
            _ => tokio::time::sleep(Duration::from_millis(100)).await,
        }
    }
    Err(anyhow!("Test server did not start at {base_url}"))
}

pub async fn launch_env(test_name: &str) -> Result<(reqwest::Client, Url, ConfigGuard)> {
    let (args, config_guard) = test_config(test_name)?;
    let base_url = spawn_server(args).await?;
    Ok((reqwest::Client::new(), base_url, config_guard))
}

pub fn extend_url(url: &Url, segment: impl Display) -> Url {
    let mut url = url.clone();
    url.path_segments_mut()
        .expect("base URL")
        .pop_if_empty()
        .push(&segment.to_string());
    url
}
