//! Integration test harness
mod harvest_tests;
