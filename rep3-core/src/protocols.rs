//! MPC protocol implementations.

pub mod rep3;
