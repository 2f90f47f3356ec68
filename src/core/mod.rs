//! Core library components.
//!
//! Everything here is free of console output and process exit. Progress
//! and decisions are reported through `tracing` events only.

pub mod artifact;
pub mod cipher;
pub mod codec;
pub mod config;
pub mod constants;
pub mod keyfile;
pub mod merge;
pub mod pipeline;
pub mod registry;
pub mod source;
pub mod value;
