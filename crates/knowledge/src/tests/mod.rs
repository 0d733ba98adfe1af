//! Crate-level scenario tests.

mod ranking;
