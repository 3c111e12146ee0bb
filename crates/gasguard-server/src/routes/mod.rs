pub mod control;
pub mod device;
pub mod readings;
pub mod schedules;
pub mod stream;
