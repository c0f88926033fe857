//! Integration Test Harness
//!
//! - `TestServer` - Runs a real server on a random port with in-memory DB
//! - `BinaryServer` - Runs the compiled `imaged` binary with CLI flags
//! - `MockGemini` - Canned Gemini backend the server is pointed at
//!
//! # Example
//!
//! ```rust,ignore
//! use harness::TestServer;
//!
//! #[tokio::test]
//! async fn test_generate() {
//!     let server = TestServer::start().await.unwrap();
//!     let body = server.generate("a red bicycle").await.unwrap();
//!     assert_eq!(body["prompt"], "a red bicycle");
//! }
//! ```

#![allow(dead_code)]

mod mock_gemini;

pub use binary::{BinaryOptions, BinaryServer};
pub use mock_gemini::{Behavior, MockGemini, PNG_B64};
pub use server::{TestOptions, TestServer, TEST_API_KEY};
