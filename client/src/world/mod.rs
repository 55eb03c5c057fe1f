pub mod rendering;
pub mod streaming;

pub use streaming::*;
