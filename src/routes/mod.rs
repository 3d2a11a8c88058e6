//! Route handlers. Each takes the owned session plus the raw query or
//! body and returns an HTML fragment (or JSON for polling endpoints).

pub mod map;
pub mod menu;
pub mod robot;
pub mod util;
pub mod water;
