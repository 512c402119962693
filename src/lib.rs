//! snapcap library crate.
//!
//! Capture a still from the default camera, preview it in the terminal,
//! attach a caption and post it to an upload endpoint.

pub mod camera;
pub mod cli;
pub mod config;
pub mod preview;
pub mod prompt;
pub mod session;
pub mod snapshot;
pub mod upload;
pub mod workflow;
