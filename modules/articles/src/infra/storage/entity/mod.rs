pub mod node;
pub mod paragraph;
