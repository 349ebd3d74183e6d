//! fal Core
//!
//! Core types shared by the fal.ai client and command-line interface.
//!
//! This crate contains:
//! - Domain types: queue job state, log lines, catalog models and prices
//! - DTOs: request/response shapes exchanged with the fal.ai API

pub mod domain;
pub mod dto;
