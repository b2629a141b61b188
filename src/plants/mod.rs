pub mod model;
pub mod schedule;
pub mod services;
pub mod store;
