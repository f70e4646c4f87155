pub mod appointment;
pub mod build;
pub mod icon;
