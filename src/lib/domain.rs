//! Domain logic, independent of any mail server or user interface

pub mod communication;
pub mod dispatch;
