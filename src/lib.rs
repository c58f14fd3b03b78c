#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

//! # Buzzbridge 📳
//!
//! A Rust library bridging web-view-hosted applications to native haptic
//! vibration and device identity.
//!
//! Hybrid mobile apps talk to native capabilities through a narrow envelope:
//! a named action plus a loosely-typed JSON argument list, answered through
//! asynchronous success/error callbacks. This crate models that boundary as a
//! typed facade, [`HapticBridge`], over two small platform traits, so the
//! same dispatch logic serves real hardware, headless hosts, and tests alike.
//!
//! Three actions are supported:
//!
//! - **vibrate**: play an ordered sequence of (duration, intensity) steps as
//!   a platform waveform, optionally looping until cancelled
//! - **cancel**: halt whatever is playing, unconditionally
//! - **getDeviceInfo**: report a static device metadata snapshot (UUID, OS
//!   version, platform label, model, manufacturer, serial, emulator flag)
//!
//! There is no state machine here: the platform vibrator is a
//! single shared exclusive resource that serializes conflicting requests on
//! its own, so the bridge submits and forgets. The one cached value is the
//! device UUID, resolved once per process.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use buzzbridge::{
//!     platform::{NoopVibrator, StaticIdentity},
//!     HapticBridge, VibrationPattern,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bridge = HapticBridge::new(
//!         Some(Arc::new(NoopVibrator)),
//!         Arc::new(StaticIdentity::default()),
//!     );
//!
//!     // Build a short buzz-pause-buzz pattern and play it.
//!     let mut pattern = VibrationPattern::new();
//!     pattern.add_vibration(0.25, 1.0)?;
//!     pattern.add_space(0.1)?;
//!     pattern.add_vibration(0.25, 0.5)?;
//!     bridge.play(&pattern).await?;
//!
//!     // Stop it early.
//!     bridge.cancel().await?;
//!
//!     Ok(())
//! }
//! ```

/// Bridge facade and dispatch entry point
pub mod bridge;
/// Error types and handling
pub mod error;
/// Platform seam traits and reference implementations
pub mod platform;
/// Invocation envelope, replies, and the pattern file format
pub mod protocol;
/// Type definitions and data structures
pub mod types;

// Re-export the main types for convenient usage
pub use bridge::HapticBridge;
pub use error::{BridgeError, Result};
pub use protocol::{Action, MpscReplyChannel, Reply, ReplyChannel, VibrationRequest};
pub use types::{DeviceInfo, Platform, VibrationPattern, VibrationStep, Waveform};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Platform label reported for stock Android devices
pub const ANDROID_PLATFORM_LABEL: &str = "Android Baby!";

/// Platform label reported for Amazon Fire OS devices
///
/// Fire OS is an Android derivative; host runtimes that need to special-case
/// it branch on this label rather than on the manufacturer string.
pub const AMAZON_PLATFORM_LABEL: &str = "amazon-fireos";

/// Manufacturer string identifying an Amazon device
///
/// Compared for exact equality against the device's reported manufacturer
/// when selecting the platform family at bridge construction.
pub const AMAZON_MANUFACTURER: &str = "Amazon";
