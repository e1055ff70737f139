//! Domain types
pub mod value_objects;
pub mod variants;
