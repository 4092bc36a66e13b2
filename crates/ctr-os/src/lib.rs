#![doc = "Horizon OS platform layer: registers, timing, and OS queries."]

pub mod addr;
pub mod memory;
pub mod mmio;
pub mod registers;
pub mod sim;
pub mod speedup;
pub mod strerror;
pub mod svc;
pub mod sysver;
pub mod tick;
pub mod time;

pub use addr::*;
pub use memory::*;
pub use mmio::*;
pub use registers::*;
pub use sim::*;
pub use speedup::*;
pub use strerror::*;
pub use svc::*;
pub use sysver::*;
pub use tick::*;
pub use time::*;
