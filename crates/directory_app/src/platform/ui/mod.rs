pub mod commands;
pub mod map;
pub mod render;
