use std::io;

/// Errors from BMP encoding and decoding.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BmpError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("incorrect magic number of {0:?}")]
    BadMagic([u8; 2]),

    #[error("file header reports {reported} bytes but stream holds {actual}")]
    FileSizeMismatch { reported: u32, actual: u64 },

    #[error("reserved header fields must be zero (found {0:#06x}, {1:#06x})")]
    NonZeroReserved(u16, u16),

    #[error("unsupported pixel data offset {0} (only 54 is accepted)")]
    BadPixelOffset(u32),

    #[error("unsupported info header size {0} (only BITMAPINFOHEADER is accepted)")]
    BadInfoHeaderSize(u32),

    #[error("negative dimensions are not supported ({width}x{height})")]
    NegativeDimension { width: i32, height: i32 },

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u64, height: u64 },

    #[error("unexpected end of input")]
    UnexpectedEof
}

impl BmpError {
    /// True for every failure that means "this is not a BMP we can read", as opposed to an I/O
    /// failure of the underlying sink or source or an image too big to encode.
    pub fn is_invalid_format(&self) -> bool {
        !matches!(self, BmpError::Io(_) | BmpError::DimensionsTooLarge { .. })
    }

    /// Short reads surface as `UnexpectedEof`, everything else stays an I/O error.
    pub(crate) fn from_read(err: io::Error) -> BmpError {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            BmpError::UnexpectedEof
        }
        else {
            BmpError::Io(err)
        }
    }
}
