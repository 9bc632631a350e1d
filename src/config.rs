use anyhow::{Context, Result, anyhow, bail};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::process::Command;
use tracing::{debug, error};

/// Evaluate a Pkl file with the `pkl` CLI and deserialize its JSON rendering.
pub fn load_pkl<T: DeserializeOwned>(config_path: impl AsRef<Path>) -> Result<T> {
    let config_path = config_path.as_ref();
    let output = Command::new("pkl")
        .arg("eval")
        .arg("-f")
        .arg("json")
        .arg(config_path)
        .output()
        .context("Failed to execute pkl command")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        error!("pkl failed: {}", stderr);
        return Err(anyhow!("pkl failed: {}", stderr));
    }

    let json_str = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&json_str).context("Failed to parse config json")
}

pub fn load_json<T: DeserializeOwned>(config_path: impl AsRef<Path>) -> Result<T> {
    let config_path = config_path.as_ref();
    let json_str = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file {}", config_path.display()))?;
    serde_json::from_str(&json_str).context("Failed to parse config json")
}

/// Load a config file, picking the reader from its extension (`pkl` or `json`).
pub fn load_config<T: DeserializeOwned>(config_path: impl AsRef<Path>) -> Result<T> {
    let config_path = config_path.as_ref();
    let ext = config_path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    debug!("Loading config {} ({:?})", config_path.display(), ext);

    match ext.as_deref() {
        Some("pkl") => load_pkl(config_path),
        Some("json") => load_json(config_path),
        _ => bail!(
            "Unsupported config format: {} (expected .pkl or .json)",
            config_path.display()
        ),
    }
}
