// tests/unit/mod.rs

#[path = "../common/mod.rs"]
mod common;

mod role_registry_tests;
mod scope_resolver_tests;
