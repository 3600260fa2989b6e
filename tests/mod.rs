//! Integration tests for drilldown
//!
//! Tests are organized by component:
//! - loader_test: local and remote resource loading (mockito, temp files)
//! - query_test: debounce and cancellation on a paused clock
//! - interpreter_test: spec documents against a scripted selector
//! - navigator_test: whole chains down to a recording player
//! - cli_test: argument parsing, config layering, exit codes
//! - ui_test: the search prompt against the real query controller
//! - common: shared test doubles

// Note: Each test file is a separate integration test crate
// Tests are run individually by cargo, not via mod.rs
