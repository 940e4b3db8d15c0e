use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use bytemuck::{bytes_of, pod_read_unaligned, Pod, Zeroable};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use crate::common::{Color, Image};
use crate::error::BmpError;




/*
File headers
 */

pub const BITMAP_FILE_HEADER_SIZE: u32 = 14;
pub const BITMAP_INFO_HEADER_SIZE: u32 = 40;
pub const PIXEL_DATA_OFFSET: u32 = BITMAP_FILE_HEADER_SIZE + BITMAP_INFO_HEADER_SIZE;

// "BM" read as a little endian u16
const BITMAP_MAGIC_NUMBER: u16 = 0x4d42;

/// 300 DPI expressed in pixels per meter.
pub const DPI_300_PELS_PER_METER: i32 = 11811;
const IMPORTANT_COLORS: i32 = 0x1000000;
const BYTES_PER_PIXEL: usize = 3;

// All fields are stored little endian on disk. `to_le`/`from_le` are no-ops on little endian hosts.
#[derive(Pod, Zeroable, Copy, Clone)]
#[repr(C, packed)]
pub struct BitmapFileHeader {
    pub bf_type: u16,
    pub bf_size: u32,
    pub bf_reserved_1: u16,
    pub bf_reserved_2: u16,
    pub bf_off_bits: u32
}

impl BitmapFileHeader {
    fn to_le(self) -> BitmapFileHeader {
        BitmapFileHeader {
            bf_type: self.bf_type.to_le(),
            bf_size: self.bf_size.to_le(),
            bf_reserved_1: self.bf_reserved_1.to_le(),
            bf_reserved_2: self.bf_reserved_2.to_le(),
            bf_off_bits: self.bf_off_bits.to_le()
        }
    }

    fn from_le(self) -> BitmapFileHeader {
        BitmapFileHeader {
            bf_type: u16::from_le(self.bf_type),
            bf_size: u32::from_le(self.bf_size),
            bf_reserved_1: u16::from_le(self.bf_reserved_1),
            bf_reserved_2: u16::from_le(self.bf_reserved_2),
            bf_off_bits: u32::from_le(self.bf_off_bits)
        }
    }
}

#[derive(Pod, Zeroable, Copy, Clone)]
#[repr(C, packed)]
pub struct BitmapInfoHeader {
    pub bi_size: u32,
    pub bi_width: i32,
    pub bi_height: i32,
    pub bi_planes: u16,
    pub bi_bit_count: u16,
    pub bi_compression: u32,
    pub bi_size_image: u32,
    pub bi_x_pels_per_meter: i32,
    pub bi_y_pels_per_meter: i32,
    pub bi_clr_used: i32,
    pub bi_clr_important: i32
}

impl BitmapInfoHeader {
    fn to_le(self) -> BitmapInfoHeader {
        BitmapInfoHeader {
            bi_size: self.bi_size.to_le(),
            bi_width: self.bi_width.to_le(),
            bi_height: self.bi_height.to_le(),
            bi_planes: self.bi_planes.to_le(),
            bi_bit_count: self.bi_bit_count.to_le(),
            bi_compression: self.bi_compression.to_le(),
            bi_size_image: self.bi_size_image.to_le(),
            bi_x_pels_per_meter: self.bi_x_pels_per_meter.to_le(),
            bi_y_pels_per_meter: self.bi_y_pels_per_meter.to_le(),
            bi_clr_used: self.bi_clr_used.to_le(),
            bi_clr_important: self.bi_clr_important.to_le()
        }
    }

    fn from_le(self) -> BitmapInfoHeader {
        BitmapInfoHeader {
            bi_size: u32::from_le(self.bi_size),
            bi_width: i32::from_le(self.bi_width),
            bi_height: i32::from_le(self.bi_height),
            bi_planes: u16::from_le(self.bi_planes),
            bi_bit_count: u16::from_le(self.bi_bit_count),
            bi_compression: u32::from_le(self.bi_compression),
            bi_size_image: u32::from_le(self.bi_size_image),
            bi_x_pels_per_meter: i32::from_le(self.bi_x_pels_per_meter),
            bi_y_pels_per_meter: i32::from_le(self.bi_y_pels_per_meter),
            bi_clr_used: i32::from_le(self.bi_clr_used),
            bi_clr_important: i32::from_le(self.bi_clr_important)
        }
    }
}


/*
Bit depths and compression types. Only 24 bit RGB is ever written; the rest exist so that headers
of other bitmaps can be described by `read_info`.
 */

#[derive(Debug, IntoPrimitive, TryFromPrimitive, Copy, Clone, Eq, PartialEq)]
#[repr(u16)]
pub enum BitDepth {
    One = 1,
    Two = 2,
    Four = 4,
    Eight = 8,
    Sixteen = 16,
    TwentyFour = 24,
    ThirtyTwo = 32
}

// constants documented in https://learn.microsoft.com/en-us/openspecs/windows_protocols/ms-wmf/4e588f70-bd92-4a6f-b77f-35d0feaf7a57
#[derive(Debug, IntoPrimitive, TryFromPrimitive, Copy, Clone, Eq, PartialEq)]
#[repr(u32)]
pub enum Compression {
    RGB = 0x0,
    RLE8 = 0x1,
    RLE4 = 0x2,
    Bitfields = 0x3
}


/*
Row stride
 */

/// Bytes per encoded row: 3 bytes per pixel, rounded up to a multiple of 4.
pub fn stride(width: usize) -> usize {
    4*((width*BYTES_PER_PIXEL + 3)/4)
}

/// Same as [`stride`], but `None` instead of overflowing. Used where the width is untrusted.
pub fn checked_stride(width: usize) -> Option<usize> {
    width.checked_mul(BYTES_PER_PIXEL)
        .and_then(|bytes| bytes.checked_add(3))
        .map(|bytes| 4*(bytes/4))
}


/*
Scanline conversion. The pixel part of a row is BGR triples, whatever follows is padding.
 */

fn encode_scanline(row: &[Color], scanline: &mut [u8]) {
    for (bgr, color) in scanline.chunks_exact_mut(BYTES_PER_PIXEL).zip(row) {
        bgr[0] = color.b;
        bgr[1] = color.g;
        bgr[2] = color.r;
    }
}

fn decode_scanline(scanline: &[u8], row: &mut [Color]) {
    for (color, bgr) in row.iter_mut().zip(scanline.chunks_exact(BYTES_PER_PIXEL)) {
        color.b = bgr[0];
        color.g = bgr[1];
        color.r = bgr[2];
    }
}


/*
Encoding
 */

/// Writes `image` as a 24 bit bottom-up BMP to `sink`.
///
/// Nothing is written if the image cannot be described by the header fields. On a write error
/// the sink may hold a truncated file.
pub fn encode<W: Write>(image: &Image, mut sink: W) -> Result<(), BmpError> {
    let too_large = || BmpError::DimensionsTooLarge { width: image.width() as u64, height: image.height() as u64 };

    let width = i32::try_from(image.width()).map_err(|_| too_large())?;
    let height = i32::try_from(image.height()).map_err(|_| too_large())?;
    let scanline_width = checked_stride(image.width()).ok_or_else(too_large)?;
    let image_size = scanline_width.checked_mul(image.height())
        .and_then(|size| u32::try_from(size).ok())
        .ok_or_else(too_large)?;
    let file_size = image_size.checked_add(PIXEL_DATA_OFFSET).ok_or_else(too_large)?;

    let file_header = BitmapFileHeader {
        bf_type: BITMAP_MAGIC_NUMBER,
        bf_size: file_size,
        bf_reserved_1: 0,
        bf_reserved_2: 0,
        bf_off_bits: PIXEL_DATA_OFFSET
    };
    sink.write_all(bytes_of(&file_header.to_le()))?;

    let info_header = BitmapInfoHeader {
        bi_size: BITMAP_INFO_HEADER_SIZE,
        bi_width: width,
        bi_height: height, // positive, rows are stored bottom up
        bi_planes: 1,
        bi_bit_count: BitDepth::TwentyFour.into(),
        bi_compression: Compression::RGB.into(),
        bi_size_image: image_size,
        bi_x_pels_per_meter: DPI_300_PELS_PER_METER,
        bi_y_pels_per_meter: DPI_300_PELS_PER_METER,
        bi_clr_used: 0,
        bi_clr_important: IMPORTANT_COLORS
    };
    sink.write_all(bytes_of(&info_header.to_le()))?;

    // padding bytes are never touched after allocation, so they stay zero for every row
    let mut scanline = vec![0u8; scanline_width];
    for y in (0..image.height()).rev() {
        encode_scanline(image.row(y), &mut scanline);
        sink.write_all(&scanline)?;
    }

    sink.flush()?;
    Ok(())
}

pub fn encode_to_vec(image: &Image) -> Result<Vec<u8>, BmpError> {
    let capacity = checked_stride(image.width())
        .and_then(|scanline_width| scanline_width.checked_mul(image.height()))
        .map_or(0, |size| size.saturating_add(PIXEL_DATA_OFFSET as usize));
    let mut buf = Vec::with_capacity(capacity);
    encode(image, &mut buf)?;
    Ok(buf)
}

pub fn save_bmp<P: AsRef<Path>>(path: P, image: &Image) -> Result<(), BmpError> {
    let file = File::create(path)?;
    encode(image, BufWriter::new(file))
}


/*
Decoding
 */

// Validates both headers and returns the info header.
fn read_headers<R: Read>(source: &mut R, total_length: u64) -> Result<BitmapInfoHeader, BmpError> {
    let mut file_header_bytes = [0u8; BITMAP_FILE_HEADER_SIZE as usize];
    source.read_exact(&mut file_header_bytes).map_err(BmpError::from_read)?;
    let file_header = pod_read_unaligned::<BitmapFileHeader>(&file_header_bytes).from_le();

    let bf_type = file_header.bf_type;
    if bf_type != BITMAP_MAGIC_NUMBER {
        return Err(BmpError::BadMagic(bf_type.to_le_bytes()));
    }
    let bf_size = file_header.bf_size;
    if u64::from(bf_size) != total_length {
        return Err(BmpError::FileSizeMismatch { reported: bf_size, actual: total_length });
    }
    let (reserved_1, reserved_2) = (file_header.bf_reserved_1, file_header.bf_reserved_2);
    if reserved_1 != 0 || reserved_2 != 0 {
        return Err(BmpError::NonZeroReserved(reserved_1, reserved_2));
    }
    let bf_off_bits = file_header.bf_off_bits;
    if bf_off_bits != PIXEL_DATA_OFFSET {
        return Err(BmpError::BadPixelOffset(bf_off_bits));
    }

    let mut info_header_bytes = [0u8; BITMAP_INFO_HEADER_SIZE as usize];
    source.read_exact(&mut info_header_bytes).map_err(BmpError::from_read)?;
    let info_header = pod_read_unaligned::<BitmapInfoHeader>(&info_header_bytes).from_le();

    let bi_size = info_header.bi_size;
    if bi_size != BITMAP_INFO_HEADER_SIZE {
        return Err(BmpError::BadInfoHeaderSize(bi_size));
    }

    Ok(info_header)
}

/// Reads a 24 bit bottom-up BMP from `source`, which must hold exactly `total_length` bytes.
///
/// Planes, bit count, compression, resolution and color counts are not checked. Any structural
/// problem or short read fails the whole call; a partially decoded image is never returned.
pub fn decode<R: Read>(mut source: R, total_length: u64) -> Result<Image, BmpError> {
    let info_header = read_headers(&mut source, total_length)?;

    let (bi_width, bi_height) = (info_header.bi_width, info_header.bi_height);
    let (Ok(width), Ok(height)) = (usize::try_from(bi_width), usize::try_from(bi_height)) else {
        return Err(BmpError::NegativeDimension { width: bi_width, height: bi_height });
    };

    // a file too short for its pixel rows would hit a short read anyway, reject it before allocating
    let needed = checked_stride(width)
        .and_then(|scanline_width| scanline_width.checked_mul(height))
        .and_then(|size| u64::try_from(size).ok())
        .and_then(|size| size.checked_add(u64::from(PIXEL_DATA_OFFSET)));
    match needed {
        Some(needed) if needed <= total_length => {}
        _ => return Err(BmpError::UnexpectedEof)
    }

    let mut image = Image::new(width, height, Color::BLACK);
    let scanline_width = stride(width);
    if scanline_width == 0 {
        return Ok(image);
    }

    let mut scanline = vec![0u8; scanline_width];
    for y in (0..height).rev() {
        source.read_exact(&mut scanline).map_err(BmpError::from_read)?;
        decode_scanline(&scanline, image.row_mut(y));
    }

    Ok(image)
}

pub fn decode_from_slice(bytes: &[u8]) -> Result<Image, BmpError> {
    decode(bytes, bytes.len() as u64)
}

/// Like [`decode`], but yields the empty image on any failure.
pub fn decode_or_empty<R: Read>(source: R, total_length: u64) -> Image {
    decode(source, total_length).unwrap_or_default()
}

pub fn load_bmp<P: AsRef<Path>>(path: P) -> Result<Image, BmpError> {
    let file = File::open(path)?;
    let total_length = file.metadata()?.len();
    decode(BufReader::new(file), total_length)
}


/*
Header inspection
 */

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BmpInfo {
    pub width: i32,
    pub height: i32,
    pub planes: u16,
    pub bit_count: u16,
    pub compression: u32,
    pub image_size: u32,
    pub x_pels_per_meter: i32,
    pub y_pels_per_meter: i32
}

impl BmpInfo {
    pub fn bit_depth(&self) -> Option<BitDepth> {
        BitDepth::try_from(self.bit_count).ok()
    }

    pub fn compression(&self) -> Option<Compression> {
        Compression::try_from(self.compression).ok()
    }

    /// Whether the pixel data is in the one layout this codec reads as intended.
    pub fn is_canonical(&self) -> bool {
        self.planes == 1 && self.bit_depth() == Some(BitDepth::TwentyFour) && self.compression() == Some(Compression::RGB)
    }
}

/// Validates the file and info headers the same way [`decode`] does and reports their contents
/// without touching the pixel data.
pub fn read_info<R: Read>(mut source: R, total_length: u64) -> Result<BmpInfo, BmpError> {
    let h = read_headers(&mut source, total_length)?;
    Ok(BmpInfo {
        width: h.bi_width,
        height: h.bi_height,
        planes: h.bi_planes,
        bit_count: h.bi_bit_count,
        compression: h.bi_compression,
        image_size: h.bi_size_image,
        x_pels_per_meter: h.bi_x_pels_per_meter,
        y_pels_per_meter: h.bi_y_pels_per_meter
    })
}


/*
Unit tests
 */
