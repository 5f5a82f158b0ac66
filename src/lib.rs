// Calendar Planner Library
// Client-side core of a REST-backed calendar: scheduling math, gestures,
// optimistic stores, share links and the offline cache

pub mod config;
pub mod interaction;
pub mod models;
pub mod services;
pub mod utils;
