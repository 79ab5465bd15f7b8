//! # lora-mesh-link
//!
//! Single-hop session and link layer for a LoRa mesh of fixed "site" radios.
//! This crate owns everything above the raw radio driver and below the
//! application: a framed, site-keyed, AES-128-CBC encrypted packet codec, a
//! four-message session-reset handshake, per-peer counter/session state, a
//! sliding-window duty-cycle governor, and the cooperative dispatcher that
//! ties them together.
//!
//! It provides:
//!
//! - **Confidentiality & framing**: every on-air packet is prefixed with a
//!   site identifier and encrypted under a shared site key ([`codec`]).
//! - **Liveness**: a four-step challenge handshake re-establishes a fresh
//!   session and counter baseline between two peers ([`handshake`]).
//! - **Replay resistance**: strictly increasing per-peer counters, enforced
//!   locally, never relying on anything the radio link guarantees ([`peer`]).
//! - **Regulatory compliance**: a sliding-window airtime budget that silently
//!   withholds transmissions once exhausted ([`duty_cycle`]).
//! - **Self-healing**: a randomized-backoff scheduler that retries handshakes
//!   with peers that have gone quiet ([`scheduler`]).
//!
//! ## Modules
//!
//! - [`core`]: shared types, constants, error taxonomy, and the [`core::Radio`]
//!   / [`core::NodeCallbacks`] traits an embedder implements.
//! - [`codec`]: plaintext record layout, CRC-16, and AES-128-CBC framing.
//! - [`peer`]: per-peer session/counter state and the roster/discovery table.
//! - [`handshake`]: the RST_1..RST_4 session-reset state machine.
//! - [`scheduler`]: randomized-backoff handshake retry policy.
//! - [`duty_cycle`]: sliding-window transmit-airtime governor.
//! - [`engine`]: [`engine::Engine`] and [`engine::EngineBuilder`], the public
//!   entry point that wires the above together.
//!
//! ## Example usage
//!
//! ```no_run
//! use lora_mesh_link::core::{NodeCallbacks, Radio, UnitAddr};
//! use lora_mesh_link::engine::EngineBuilder;
//!
//! struct App;
//! impl NodeCallbacks for App {
//!     fn process_message(&mut self, peer: UnitAddr, msg_type: u8, data: &[u8]) {
//!         println!("{peer:?} sent type {msg_type} ({} bytes)", data.len());
//!     }
//! }
//!
//! # fn run(radio: impl Radio) -> Result<(), lora_mesh_link::core::ConfigError> {
//! let mut engine = EngineBuilder::new(b"site-a".to_vec(), [0u8; 16])
//!     .local_addr(0x01)
//!     .roster([0x02, 0x03])
//!     .build(radio, App)?;
//!
//! loop {
//!     engine.process();
//! }
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod core;

pub mod codec;
pub mod duty_cycle;
pub mod engine;
pub mod handshake;
pub mod peer;
pub mod scheduler;

pub use crate::core::{ConfigError, DecodeFailure, NodeCallbacks, Radio, SendError, UnitAddr};
pub use crate::engine::{Engine, EngineBuilder};
