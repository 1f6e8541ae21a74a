/// ZIP compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMethod {
    Stored,
    Deflate,
    Unknown(u16),
}

impl CompressionMethod {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0 => CompressionMethod::Stored,
            8 => CompressionMethod::Deflate,
            _ => CompressionMethod::Unknown(value),
        }
    }

    pub fn as_u16(&self) -> u16 {
        match self {
            CompressionMethod::Stored => 0,
            CompressionMethod::Deflate => 8,
            CompressionMethod::Unknown(v) => *v,
        }
    }
}

/// End of Central Directory (EOCD) signature
pub const EOCD_SIGNATURE: &[u8] = b"PK\x05\x06";
/// EOCD size without its trailing comment
pub const EOCD_SIZE: usize = 22;

/// Maximum ZIP comment size allowed by the format (65535 bytes).
///
/// Bounds the backward search for the EOCD signature.
pub const MAX_COMMENT_SIZE: usize = 0xFFFF;

/// Central Directory File Header (CDFH) signature
pub const CDFH_SIGNATURE: &[u8] = b"PK\x01\x02";
/// Fixed portion of a CDFH, before name, extra and comment
pub const CDFH_BASE_SIZE: usize = 46;

/// Local File Header (LFH) signature
pub const LFH_SIGNATURE: &[u8] = b"PK\x03\x04";
/// Fixed portion of a LFH, before name and extra
pub const LFH_SIZE: usize = 30;
