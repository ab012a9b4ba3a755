//! Jsteg Steganography for JPEG Images
//!
//! This crate hides data in the quantized DCT coefficients of baseline JPEG
//! images. While an image is entropy coded, the lowest magnitude bit of each
//! luminance AC coefficient with a magnitude of at least 2 is replaced by one
//! payload bit. Reveal runs the entropy decoder only and reads the same bits
//! back; no pixels are reconstructed.
//!
//! # Layer Responsibilities
//!
//! This crate handles **encoding-level** concerns only:
//! - Encoding an image into a baseline JPEG carrying raw bytes
//! - Extracting raw bytes from a baseline JPEG
//! - Computing how many bits an image can carry
//!
//! Message framing (magic, length) is handled by the caller, e.g. `jsteg-cli`.
//! Reveal returns the bits of every eligible coefficient, not just the ones
//! written by hide.
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> jsteg::Result<()> {
//! let image = image::open("carrier.png").expect("readable image");
//!
//! let mut jpeg = Vec::new();
//! jsteg::hide(&mut jpeg, &image, b"Hello World", None)?;
//!
//! let revealed = jsteg::reveal(jpeg.as_slice())?;
//! assert_eq!(&revealed[..11], b"Hello World");
//! # Ok(())
//! # }
//! ```

mod decoder;
pub mod eligibility;
mod encoder;
mod error;
pub mod jpeg;
mod options;
pub mod payload;

pub use decoder::{jpeg_capacity, reveal};
pub use encoder::{capacity, frame_header, hide};
pub use error::{JstegError, Result};
pub use jpeg::CoefficientHook;
pub use options::{Options, DEFAULT_QUALITY};
