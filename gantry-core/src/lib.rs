//! Gantry Core
//!
//! Core types for the Gantry job submission system.
//!
//! This crate contains:
//! - Domain types: execution plans and the job vocabulary
//! - DTOs: wire types exchanged with a running cluster
//! - Configuration: the immutable key/value map read by the submission path

pub mod config;
pub mod domain;
pub mod dto;
