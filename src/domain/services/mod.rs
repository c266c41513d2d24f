pub mod time_grid;
pub mod availability;
pub mod schedule;
pub mod blocks;
pub mod lifecycle;
pub mod statistics;
pub mod dashboard;
