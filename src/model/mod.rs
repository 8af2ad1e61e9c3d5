pub mod catalog;
pub mod employee;
pub mod role;
pub mod time_record;
