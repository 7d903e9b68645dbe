pub mod catalog;
pub mod model;
pub mod repository;

pub use catalog::*;
pub use model::*;
