//! Utility modules

pub mod base64url;
