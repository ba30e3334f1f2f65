//! Rpmforge library exports.
//!
//! The `rpmforge` binary and the integration tests both drive the crate
//! through these modules. The typical library entry point is
//! [`pipeline::run`] with a [`pipeline::BuildRequest`].

pub mod attrs;
pub mod commands;
pub mod common;
pub mod config;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod preflight;
pub mod process;
pub mod specfile;
pub mod stage;
