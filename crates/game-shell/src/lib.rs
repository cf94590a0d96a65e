pub mod config;
pub mod guess;
pub mod render;
pub mod session;
pub mod store;
pub mod twenty48;
