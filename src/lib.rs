//! Play/pause controls for page audio elements.
//!
//! On load the module waits for the document, pairs every `<audio>` with the
//! control placed before it, wires `#playpause` to toggle its element and
//! keeps `jp-state-playing` on each control while its element plays.

pub mod binder;
pub mod bootstrap;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod host;
#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(test)]
mod testing;

pub use binder::{bind_page, toggle, BindReport, BindingTable, Command};
pub use bootstrap::{on_document_ready, ReadyDispatch};
pub use config::PlayerConfig;
pub use error::{BindError, ConfigError, HostError};
