//! Core domain types
//!
//! These types describe the entities the fal.ai API reports on: queued jobs,
//! their log lines, catalog models and model prices. The remote service owns
//! all of them; the client only ever holds transient copies.

pub mod job;
pub mod log;
pub mod model;
pub mod pricing;
