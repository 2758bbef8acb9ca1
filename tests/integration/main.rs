//! Integration tests for scene-scraper
//!
//! These tests drive the public API end-to-end: fake extractors through the
//! orchestrator, and the bundled sites against wiremock servers.

mod javlibrary_tests;
mod orchestrator_tests;
mod vrporn_tests;
