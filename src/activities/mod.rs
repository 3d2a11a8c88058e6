//! Activity state — the three controllers behind the kids' pages.
//!
//! Everything here is plain synchronous Rust. The WASM handle in `lib.rs`
//! owns one `session::Activities` and the route modules render it.

pub mod config;
pub mod error;
pub mod listeners;
pub mod map;
pub mod robot;
pub mod session;
pub mod water_cycle;

pub use error::ActivityError;
