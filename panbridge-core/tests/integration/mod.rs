//! Integration test modules

mod accumulator_tests;
mod service_tests;
mod session_tests;
pub mod support;
