extern crate log;
pub mod boundary;
pub mod config;
pub mod imagery;
pub mod report;
