pub mod currency;
pub mod file_utils;
pub mod schedule;
