pub mod controls;
pub mod effects;
pub mod gamepad;
pub mod gesture;
pub mod input;
pub mod layout;
pub mod renderer;
pub mod sound;
