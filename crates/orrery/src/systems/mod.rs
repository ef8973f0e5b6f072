pub mod animation;
pub mod builder;
pub mod lighting;
pub mod picking;
pub mod render;
