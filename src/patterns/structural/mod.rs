pub mod adapter;
pub mod decorator;
pub mod facade;
