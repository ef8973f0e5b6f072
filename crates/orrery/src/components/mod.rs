pub mod mesh;
pub mod node;
