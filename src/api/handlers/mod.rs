pub mod health;
pub mod shop;
pub mod grid;
pub mod service;
pub mod barber;
pub mod block;
pub mod appointment;
pub mod availability;
pub mod dashboard;
pub mod profile;
