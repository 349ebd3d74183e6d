//! Data Transfer Objects for the fal.ai API
//!
//! Request and response envelopes exchanged with the run, queue and
//! platform endpoints.

pub mod catalog;
pub mod payload;
pub mod queue;
