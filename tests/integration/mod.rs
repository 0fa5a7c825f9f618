//! Integration tests for the warden zone setting registry

mod config_integration;
mod persistence;
mod registry_lifecycle;
mod resolution;
mod service;
mod test_utils;
