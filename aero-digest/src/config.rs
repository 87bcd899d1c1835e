use std::io::Read;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::types::DigestUri;

/// Mechanism parameters. Credentials are never read from here,
/// they are handed to the response builder by the caller.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct DigestConfig {
    #[serde(default)]
    pub digest_uri: DigestUri,
}

pub fn read_config(config_file: PathBuf) -> Result<DigestConfig> {
    let mut file = std::fs::OpenOptions::new()
        .read(true)
        .open(config_file.as_path())?;

    let mut config = String::new();
    file.read_to_string(&mut config)?;

    Ok(toml::from_str(&config)?)
}
