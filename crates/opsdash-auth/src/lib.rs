//! # opsdash-auth
//!
//! Authentication and authorization for OpsDash: the [`Principal`] the
//! rest of the system trusts, pure access-policy functions, the OTP login
//! flow, Argon2 password verification, and signed session tokens.
//!
//! [`Principal`]: principal::Principal

pub mod otp;
pub mod password;
pub mod policy;
pub mod principal;
pub mod service;
pub mod token;

pub use principal::Principal;
