pub mod chain;
pub mod command;
pub mod observer;
pub mod state;
pub mod strategy;
