//! Core domain types
//!
//! This module contains the domain structures shared across the Gantry
//! submission path: the execution plan vocabulary on the caller side and the
//! job vocabulary reported back by a cluster.

pub mod job;
pub mod plan;
