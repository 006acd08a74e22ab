//! data_runtime: data schemas and loaders for the combat server.
//!
//! Everything under `data/` is parsed here once at startup so the combat core
//! and tools depend on a stable, validated data API.

pub mod loader;
pub mod scenario;
pub mod specs {
    pub mod weapons;
}
pub mod configs {
    pub mod damage;
    pub mod telemetry;
}
