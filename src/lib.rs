//! Control-plane HTTP interface for a running load-generation engine.
//!
//! This crate provides the building blocks an engine embeds to expose a
//! resource-oriented control API: run status inspection and mutation,
//! metric snapshots, and an orderly stop, all wrapped in a JSON:API-style
//! document envelope. The `loadapi` binary runs the same surface over a
//! stub engine for protocol development; embedded engines construct a
//! [`api::Server`] from their own [`engine::Engine`] handle.
pub mod api;
pub mod args;
pub mod engine;
pub mod error;
pub mod logger;
pub mod shutdown;
