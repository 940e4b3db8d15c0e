//! # bmp-codec
//!
//! Reads and writes uncompressed 24 bit BMP files (BITMAPINFOHEADER, bottom-up rows) to and from an
//! in-memory RGB [`Image`].
//!
//! ```no_run
//! use bmp_codec::{bmp, Color, Image};
//!
//! let image = Image::new(2, 2, Color::WHITE);
//! let bytes = bmp::encode_to_vec(&image)?;
//! assert_eq!(bytes.len(), 70);
//!
//! let decoded = bmp::decode_from_slice(&bytes)?;
//! assert_eq!(decoded, image);
//! # Ok::<(), bmp_codec::BmpError>(())
//! ```

pub mod bmp;
pub mod common;
mod error;

pub use common::{Color, Image};
pub use error::BmpError;
