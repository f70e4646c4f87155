pub mod build_status;
pub mod icon;
pub mod next_appointment;
