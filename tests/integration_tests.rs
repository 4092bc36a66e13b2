//! Integration tests for the ctr-os platform layer.
//!
//! These tests drive the public API of `ctr-common` and `ctr-os` together:
//! - Tick counter timing against a deterministic clock
//! - Register, memory and time queries over a simulated console
//! - Configuration files feeding the simulation
//! - Version record retrieval and its signed result codes

mod integration;
