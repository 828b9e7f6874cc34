//! Data models for build representation

mod edge;
mod status;

pub use edge::*;
pub use status::*;
