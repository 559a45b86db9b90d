mod query_tests;
mod scoring_tests;
