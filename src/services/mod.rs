// Service module exports

pub mod api;
pub mod calendar;
pub mod database;
pub mod event;
pub mod recurrence;
pub mod share;
pub mod slots;
pub mod store;
pub mod toast;
