//! Shared types, constants, error taxonomy, and the driver/application
//! traits an embedder implements.

pub mod callbacks;
pub mod constants;
pub mod error;
pub mod radio;
pub mod rng;
pub mod types;

pub use callbacks::NodeCallbacks;
pub use constants::*;
pub use error::{ConfigError, DecodeFailure, HandshakeMismatch, SendError};
pub use radio::Radio;
pub use types::{SiteKey, UnitAddr};
