pub mod catalog;
pub mod employee;
pub mod export;
pub mod metrics;
pub mod movement;
pub mod records;
