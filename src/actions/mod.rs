pub mod calendar;
pub mod jenkins;
