//! Cross-module tests for the bound-service flow

mod snapshot_tests;
