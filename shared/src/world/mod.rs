pub mod data;
pub mod mesh;
mod utils;

pub use data::*;
pub use mesh::*;
pub use utils::*;
