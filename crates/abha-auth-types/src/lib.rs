//! Session token types shared by ABHA services.
//!
//! Provides the signing interface, HS256 signer, token validation, and the
//! `BearerToken` extractor.

pub mod bearer;
pub mod token;
