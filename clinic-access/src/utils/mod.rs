pub mod path_pattern;
pub mod permission;
