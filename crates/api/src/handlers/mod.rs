pub mod attendance;
pub mod members;
pub mod statistics;
pub mod tickets;
