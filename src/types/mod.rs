//! Value types shared by maps, layers and objects:
//! - `Colour` - RGBA colours in TMX hex notation
//! - `Properties` - ordered, typed custom property bags
//! - `Vector2` - offsets, sizes and parallax factors

mod colour;
mod property;
mod vector;

pub use colour::Colour;
pub use property::{Properties, Property, PropertyType, PropertyValue};
pub use vector::{Vector2, Vector2f, Vector2i, Vector2u};
