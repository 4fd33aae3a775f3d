//! Mock infrastructure for testing external services
//!
//! This module provides mock servers for the two backends the tools call:
//! - Health gateway (signed dialogue, skin diagnosis and drug QA calls)
//! - OCR service (token exchange and text recognition)

pub mod gateway;
pub mod ocr;

pub use gateway::*;
pub use ocr::*;
