//! Core types shared by every layer: the error model and readiness state.

pub mod error;
pub mod status;

pub use error::{AlgoError, AlgoResult};
pub use status::{ConfigSource, Readiness};
