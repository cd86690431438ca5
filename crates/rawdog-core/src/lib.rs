//! Core types for the rawdog declaration-driven generator.
//!
//! Provides the structural model ([`model::FileModel`], entities, interfaces,
//! service method sets), the naming conventions every synthesizer agrees on,
//! the zero-value table, relationship inference, configuration and atomic
//! output writing.

pub mod config;
pub mod error;
pub mod model;
pub mod output;
pub mod policy;
pub mod relations;
pub mod tags;
pub mod zero_value;
