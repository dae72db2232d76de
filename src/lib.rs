//! Kart availability for a karting venue: how many karts of each category are
//! free at each bookable slot of a day, computed from a fleet snapshot of
//! karts with their bookings and maintenance windows.

pub mod config;
pub mod engine;
pub mod fleet;
pub mod limits;
pub mod model;
pub mod observability;
pub mod protocol;
pub mod reloader;
pub mod schedule;
pub mod wire;
