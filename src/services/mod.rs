//! Shipped service endpoints

pub mod time;

pub use time::TimeService;
