pub mod commands;
pub mod events;
pub mod proxy;
pub mod state;
pub mod tasks;
