// src/config.rs
pub mod app;
pub mod navigation;

pub use app::AppConfig;

// Backward compatibility
pub type Config = AppConfig;
