//! Background Services

pub mod retention;
