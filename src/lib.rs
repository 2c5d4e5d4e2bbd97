pub mod config;
pub mod shared;
pub mod tests;
pub mod tickets;
pub mod users;
