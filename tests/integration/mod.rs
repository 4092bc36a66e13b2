//! Integration test modules.

pub mod common;
mod config_test;
mod console_test;
mod sysver_test;
mod tick_test;
