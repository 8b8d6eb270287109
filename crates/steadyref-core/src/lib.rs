//! Core infrastructure for steadyref.
//!
//! This crate provides language-agnostic infrastructure:
//! - Patch IR for representing suggested fixes (spans, text edits, fix plans)
//! - Error types and error codes
//! - JSON output types for CLI responses
//! - Text utilities and diff generation

pub mod diff;
pub mod error;
pub mod output;
pub mod patch;
pub mod text;
pub mod types;
