//! Integration tests
//!
//! Both suites are ignored by default. Workflow tests need `DATABASE_URL`
//! pointing at a Postgres server where test databases can be created; API
//! tests need a server running on localhost:8080.

mod api_tests;
mod workflow_tests;
