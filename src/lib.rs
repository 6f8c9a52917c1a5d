//! Algosix serves two algorithm engines over a JSON HTTP API: the median of
//! two sorted arrays and palindrome-pair search over word lists.
//!
//! It defines the modules for configuration, the engines, the services
//! wrapping them with statistics, and the HTTP surface.

pub mod api;
pub mod config;
pub mod core;
pub mod engine;
pub mod logging;
pub mod service;
pub mod utils;
