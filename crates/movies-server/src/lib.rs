pub mod config;
pub mod run;

pub type Error = anyhow::Error;
pub type Result<T, E = Error> = std::result::Result<T, E>;
