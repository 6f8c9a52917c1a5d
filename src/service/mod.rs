//! Tracked services wrapping the algorithm engines, plus health checks,
//! batch loops, metrics and the container that wires them together.

pub mod batch;
pub mod container;
pub mod dto;
pub mod health;
pub mod median;
pub mod metrics;
pub mod palindrome;
pub mod stats;

pub use container::ServiceContainer;
