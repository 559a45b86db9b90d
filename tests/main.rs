// Test suite entry point.
//
// Layout:
//   common/       shared builders and test setup
//   unit/         focused tests for scoring and query logic
//   integration/  end-to-end tests against a mock Gemini server

mod common;
mod integration;
mod unit;
