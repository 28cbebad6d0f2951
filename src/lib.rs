//! Academia Online catalog core
//!
//! The reusable data layer of the course-catalog platform: typed services
//! over the hosted backend, the module → lesson → material tree assembler,
//! and the admin session gate. The view layer sits on top of `AppState`.

pub mod app;
pub mod config;
pub mod error;
pub mod services;
pub mod slug;
pub mod store;
pub mod video;
