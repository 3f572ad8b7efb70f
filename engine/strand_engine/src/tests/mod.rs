//! Engine-level test suite.
//!
//! Exercises whole construction requests through the public `Engine` API;
//! component-level behavior is tested next to each module.

mod build_tests;
