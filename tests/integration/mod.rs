//! Integration tests for MedAssist
//!
//! These tests drive the tools against mock backends over real HTTP, so
//! signing, encoding and the error policy are checked end to end.

mod ocr;
