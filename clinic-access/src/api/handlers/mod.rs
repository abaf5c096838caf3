// src/api/handlers/mod.rs
pub mod access_handler;
pub mod role_handler;
pub mod screen_access_handler;
pub mod system_handler;
