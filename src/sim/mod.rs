pub mod event;
pub mod save;
pub mod session;
pub mod step;
pub mod timer;
pub mod world;
