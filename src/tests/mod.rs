//! Crate-internal test suites for Lanai.
//!
//! Unit tests live next to the code they cover. The suites here exercise whole
//! components: trie behavior against a model, allocation-failure atomicity, and
//! the configuration and error plumbing.

pub mod lanai_trie_tests;
