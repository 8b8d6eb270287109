//! steadyref: stable references for TSX/JSX components
//!
//! Finds array, object and function values that are re-created on every
//! render where a stable reference is expected, and suggests the memoized
//! rewrite for each finding.

// Core infrastructure - re-exported from steadyref-core
pub use steadyref_core::diff;
pub use steadyref_core::error;
pub use steadyref_core::output;
pub use steadyref_core::patch;
pub use steadyref_core::text;
pub use steadyref_core::types;

// Front door
pub mod cli;
pub mod config;
pub mod files;

// Error bridges - converts front-door errors to SteadyError
mod error_bridges;
