//! Property test modules

mod cache_tests;
mod capacity_tests;
mod column_tests;
mod slug_tests;
mod tracing_tests;
mod window_tests;
