pub mod admin_service;
pub mod auth_service;
pub mod stats_service;
