pub mod entity;
pub mod grid;
pub mod placement;
