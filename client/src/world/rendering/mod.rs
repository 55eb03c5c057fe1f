mod render;
mod water_material;

pub use render::*;
pub use water_material::*;
