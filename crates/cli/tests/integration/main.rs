//! CLI integration tests, run against the fixtures in `tests/fixtures`.

mod common;
mod create_tests;
mod inspect_tests;
mod plan_tests;
