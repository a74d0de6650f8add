//! Integration tests for the sweep generation engine
//!
//! Tests are organized by topic:
//! - `properties` - Coverage, partition and determinism guarantees
//! - `pipeline` - End-to-end runs into a temporary directory
//! - `builder_dsl` - Builder DSL for fluent sweep setup
//! - `presets` - Built-in studies and their output keys

mod pipeline;
