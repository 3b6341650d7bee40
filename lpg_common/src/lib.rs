//! Value types shared by the loyalty engine and server.
//!
//! * [`Points`] is the monetary unit of the loyalty ledger. It is stored as an integer number of hundredths so that
//!   balances never accumulate floating point error, but it is presented as a decimal number on the wire.
//! * [`Secret`] wraps configuration values that must never end up in logs.
mod points;

pub mod helpers;
pub mod op;
mod secret;

pub use points::{Points, PointsConversionError, POINTS_SCALE};
pub use secret::Secret;
