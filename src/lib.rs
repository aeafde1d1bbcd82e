//! Dockyard: Context-Scoped State Resolution
//!
//! The engine behind an admin workspace dock: a context addressing scheme,
//! an intent-classifying storage engine with buffered writes and cascading
//! reads, and a registry that hydrates render-ready workspace manifests
//! with per-widget failure isolation.

pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod intent;
pub mod logging;
pub mod registry;
pub mod storage;
