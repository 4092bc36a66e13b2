#![doc = "Common types shared across the ctr-os workspace."]

pub mod clock;
pub mod config;
pub mod error;
pub mod layout;
pub mod result;
pub mod version;

pub use clock::*;
pub use config::*;
pub use error::*;
pub use layout::*;
pub use result::*;
pub use version::*;
