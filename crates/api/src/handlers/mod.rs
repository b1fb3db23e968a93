pub mod calendar;
pub mod locks;
