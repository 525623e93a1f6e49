//! Series derivation from stored observations.
//!
//! Responsibilities:
//!
//! - partition observations into the four category series plus the combined
//!   total (`partition`)
//! - join a historical series with its forecast for continuous rendering
//!   (`stitch`)

pub mod partition;
pub mod stitch;

pub use partition::*;
pub use stitch::*;
