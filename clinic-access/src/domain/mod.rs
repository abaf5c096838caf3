pub mod access_warning;
pub mod actor;
pub mod navigation_model;
pub mod role_model;
pub mod scope;
pub mod screen_access_model;
