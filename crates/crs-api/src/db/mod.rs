//! Database layer

pub mod schema;
