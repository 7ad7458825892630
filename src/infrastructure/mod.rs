//! Infrastructure layer for filesystem and environment interactions.
//!
//! Resolves where the terminal host keeps its durable state and trace files.

pub mod paths;

pub use paths::{default_data_dir, expand_tilde, state_file, trace_file};
