pub mod availability;
pub mod capability;
pub mod config;
pub mod error;
pub mod paths;
pub mod verifier;

pub use error::{PreflightError, ResolveError, Result};
