pub mod animation;
pub mod config;
pub mod driver;
pub mod events;
pub mod sink;
pub mod sys;
