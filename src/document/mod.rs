pub mod json;
pub mod node;
pub mod resource;
pub mod tree;
