pub mod navigation_filter;
pub mod role_registry;
pub mod scope_resolver;
pub mod screen_access_resolver;
