//! Shared test fixtures for LotForge crates.
//!
//! This crate provides instances and solution builders for testing. It only
//! depends on `lotforge-core`, so any crate above core can use it.
//!
//! - [`instances`] - hand-checkable and seeded generated instances
//! - [`solutions`] - solutions laid out from slot lists or at random
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! lotforge-test = { workspace = true }
//! ```
//!
//! Then import the fixtures you need:
//!
//! ```ignore
//! use lotforge_test::instances::two_by_two;
//! use lotforge_test::solutions::{random_solution, solution_with};
//! ```

pub mod instances;
pub mod solutions;

pub use instances::{generated, single_machine, tight_periods, two_by_two};
pub use solutions::{random_solution, solution_with};
