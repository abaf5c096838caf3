pub mod access_dto;
pub mod role_dto;
pub mod screen_access_dto;

pub use crate::types::ApiResponse;
