pub mod config;
mod decode;
mod import;
mod tree;

pub use decode::*;
pub use import::*;
pub use tree::*;
