//! Device session: blocking command exchange, AEAD operations, and the
//! error taxonomy for the HSM client.
//!
//! A [`Session`] exclusively owns one byte-duplex channel to the device
//! and issues one command at a time: write the frame, block for the
//! response, map the status. The AEAD operations (seal caller plaintext,
//! seal device randomness, decrypt-and-compare) live here as session
//! methods, as do the echo/info/random queries and the monitor-exit mode
//! transition.
//!
//! ## Example
//!
//! ```rust,no_run
//! use hsm_session::{transport, Session};
//! use hsm_wire::WrappedSecret;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let stream = transport::connect_tcp("127.0.0.1:5000".parse()?).await?;
//! let mut session = Session::new(stream);
//!
//! let nonce = *b"\x4d\x4d\x4d\x4d\x4d\x4d";
//! let secret = WrappedSecret::new(&[0x41; 16], b"\x4d\x01\x4d\x02\x4d\x03")?;
//!
//! let aead = session.generate_aead_simple(nonce, 0x2000, &secret).await?;
//! assert!(session.validate_aead(nonce, 0x2000, &aead, &secret.pack()).await?);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod aead;
pub mod error;
pub mod session;
pub mod transport;

#[cfg(test)]
pub(crate) mod mock;

// Re-export main types
pub use error::HsmError;
pub use session::{DeviceMode, Session, SessionConfig, SessionStats};
pub use transport::{connect_tcp, Transport};
