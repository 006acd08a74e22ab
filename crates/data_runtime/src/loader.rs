//! Path resolution and read helpers for files under `data/`.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// Resolve the workspace `data/` tree so tests and tools can run from any crate.
pub fn data_root() -> PathBuf {
    let here = Path::new(env!("CARGO_MANIFEST_DIR"));
    let ws = here.join("../../data");
    if ws.is_dir() { ws } else { here.join("data") }
}

/// Read a raw text file under `data/` and return its contents.
pub fn read_text(rel: impl AsRef<Path>) -> Result<String> {
    let path = data_root().join(rel);
    let s = fs::read_to_string(&path).with_context(|| format!("read data: {}", path.display()))?;
    Ok(s)
}

/// Load and deserialize a TOML document under `data/`.
pub fn load_toml<T: DeserializeOwned>(rel: impl AsRef<Path>) -> Result<T> {
    let rel = rel.as_ref();
    let txt = read_text(rel)?;
    let v = toml::from_str::<T>(&txt).with_context(|| format!("parse TOML: {}", rel.display()))?;
    Ok(v)
}
