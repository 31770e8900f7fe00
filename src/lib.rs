//! Story Train - a local gateway that turns a sentence into an illustration.
//!
//! One [`ports::ImageGenerator`] contract sits over several third-party
//! providers. Whatever shape a provider answers with, callers get a single
//! `imageDataUrl` string or a `{"error": ...}` body.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod context;
pub mod env_file;
pub mod error;
pub mod normalize;
pub mod ports;
pub mod provider;
pub mod secret_store;
pub mod server;
pub mod static_files;
pub mod upstream_error;
