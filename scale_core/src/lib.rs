#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Stable-weight detection over a serial byte stream (transport-agnostic).
//!
//! All device I/O goes through `scale_traits::SerialLink`; with the default
//! `serial` feature, `runner::read_weight` opens a real port via
//! `scale_serial`.
//!
//! ## Architecture
//!
//! - **Framing**: lossy decode, `=`-delimited frames, reversed digits (`frame`)
//! - **Stability**: one held candidate, two equal readings confirm (`stability`)
//! - **Session loop**: read, fold, compare, pace (`parser`, `builder`)
//! - **Outcome**: `StableWeight` in `KG` or a typed `WeightError`
//!
//! A session with no `max_iterations` and no `overall_timeout` runs until
//! the scale settles, the link fails, or the shutdown flag is raised.

pub mod builder;
pub mod config;
pub mod conversions;
pub mod error;
pub mod frame;
pub mod hw_error;
pub mod mocks;
pub mod parser;
pub mod runner;
pub mod stability;
pub mod status;
pub mod weight;

pub use builder::ParserBuilder;
pub use config::SessionCfg;
pub use error::{BuildError, WeightError};
pub use frame::{FrameBuffer, Token, decode_reversed_digits};
pub use parser::StabilityParser;
pub use runner::read_weight_from;
#[cfg(feature = "serial")]
pub use runner::{ReadRequest, read_weight};
pub use stability::{StabilityState, Verdict};
pub use status::{ParseStatus, ParserState};
pub use weight::{StableWeight, Unit};
