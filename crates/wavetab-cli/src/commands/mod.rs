//! CLI command implementations.

pub mod common;
pub mod compare;
pub mod mipmap;
pub mod patches;
pub mod render;
pub mod response;
pub mod table;
