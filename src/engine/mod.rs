//! Pure algorithm engines. No I/O, no shared state.

pub mod median;
pub mod palindrome;
