pub mod shop;
pub mod user;
pub mod service;
pub mod barber;
pub mod block;
pub mod appointment;
