//! Utilities shared by the Dashline server and client.

pub mod logger;
pub mod time;
