mod allergen;
mod analysis;
mod image;

pub use allergen::*;
pub use analysis::*;
pub use image::*;
