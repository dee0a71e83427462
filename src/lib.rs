//! octo-bridge: a small HTTP façade over a single OctoPrint-style printer
//! control server. Upstream responses are normalized into a handful of stable
//! JSON shapes; a mock mode serves synthetic data when no printer is attached.

pub mod config;
pub mod error;
pub mod octo;
pub mod web;

pub use error::{BridgeError, Result};
