pub mod generation;
pub mod rendering;
