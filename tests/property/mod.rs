//! Property-based tests for the dockyard engine

mod determinism;
