//! Errors of this crate.

/// Errors generated by this crate. Variants follow where in the stack the
/// failure happened: opening and seeking files, decoding the thrift
/// envelope, decoding pages and values, or invalid arguments from callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A caller passed an invalid argument.
    InvalidArgument(String),
    /// An operation was called in a state that does not admit it
    /// (e.g. writing a row group before `start`).
    InvalidState(String),
    /// An allocation of `usize` bytes was refused by the allocator.
    OutOfMemory(usize),
    /// The underlying IO (open, read, write or seek) failed.
    FileIo(String),
    /// The file ended before the bytes promised by its metadata.
    FileTruncated(String),
    /// The file does not start or end with `PAR1`.
    InvalidMagic,
    /// The footer length does not fit the file.
    InvalidFooter(String),
    /// The thrift metadata is not a valid description of a parquet file.
    InvalidMetadata(String),
    /// The schema tree is not valid.
    InvalidSchema(String),
    /// A page header or page body is not valid.
    InvalidPage(String),
    /// The file's version is not supported.
    VersionNotSupported(i32),
    /// The thrift compact stream is malformed.
    ThriftDecode(String),
    /// The thrift compact stream ended prematurely.
    ThriftTruncated,
    /// The thrift compact stream contains a wire type outside `1..=13`.
    ThriftInvalidType(u8),
    /// A value stream declares an encoding this crate cannot decode
    /// in its position.
    InvalidEncoding(String),
    /// A hybrid RLE/bit-packed stream is malformed.
    InvalidRle(String),
    /// A DELTA_BINARY_PACKED stream is malformed.
    InvalidDelta(String),
    /// A dictionary-encoded page appeared before any dictionary page.
    DictionaryNotFound,
    /// Decoding values or levels failed.
    Decode(String),
    /// Encoding values or levels failed.
    Encode(String),
    /// The codec is known but was not compiled in, or is not supported.
    UnsupportedCodec(String),
    /// The compressor failed.
    Compression(String),
    /// The decompressor failed or produced the wrong number of bytes.
    Decompression(String),
    /// The stored CRC32 does not match the computed one.
    Checksum { expected: u32, computed: u32 },
    /// A value of one physical type was requested from a column of another.
    TypeMismatch(String),
    /// No column with this name or index exists.
    ColumnNotFound(String),
    /// No row group with this index exists.
    RowGroupNotFound(usize),
    /// A cursor was consumed past its end. Normal termination signal.
    EndOfData,
}

impl Error {
    /// Out-of-spec shorthand used by decoders.
    pub(crate) fn oos<I: Into<String>>(message: I) -> Self {
        Self::InvalidMetadata(message.into())
    }
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::InvalidArgument(m) => write!(fmt, "invalid argument: {}", m),
            Error::InvalidState(m) => write!(fmt, "invalid state: {}", m),
            Error::OutOfMemory(bytes) => write!(fmt, "cannot allocate {} bytes", bytes),
            Error::FileIo(m) => write!(fmt, "underlying IO error: {}", m),
            Error::FileTruncated(m) => write!(fmt, "file truncated: {}", m),
            Error::InvalidMagic => write!(fmt, "the file does not carry the parquet magic"),
            Error::InvalidFooter(m) => write!(fmt, "invalid footer: {}", m),
            Error::InvalidMetadata(m) => write!(fmt, "metadata is out of spec: {}", m),
            Error::InvalidSchema(m) => write!(fmt, "invalid schema: {}", m),
            Error::InvalidPage(m) => write!(fmt, "invalid page: {}", m),
            Error::VersionNotSupported(v) => write!(fmt, "file version {} is not supported", v),
            Error::ThriftDecode(m) => write!(fmt, "thrift decode error: {}", m),
            Error::ThriftTruncated => write!(fmt, "thrift stream ended prematurely"),
            Error::ThriftInvalidType(t) => write!(fmt, "invalid thrift wire type {}", t),
            Error::InvalidEncoding(m) => write!(fmt, "invalid encoding: {}", m),
            Error::InvalidRle(m) => write!(fmt, "invalid RLE stream: {}", m),
            Error::InvalidDelta(m) => write!(fmt, "invalid delta stream: {}", m),
            Error::DictionaryNotFound => {
                write!(fmt, "dictionary-encoded page without a dictionary page")
            }
            Error::Decode(m) => write!(fmt, "decode error: {}", m),
            Error::Encode(m) => write!(fmt, "encode error: {}", m),
            Error::UnsupportedCodec(m) => write!(fmt, "codec not supported: {}", m),
            Error::Compression(m) => write!(fmt, "compression error: {}", m),
            Error::Decompression(m) => write!(fmt, "decompression error: {}", m),
            Error::Checksum { expected, computed } => write!(
                fmt,
                "page CRC mismatch: header declares {:#010x}, computed {:#010x}",
                expected, computed
            ),
            Error::TypeMismatch(m) => write!(fmt, "type mismatch: {}", m),
            Error::ColumnNotFound(m) => write!(fmt, "column not found: {}", m),
            Error::RowGroupNotFound(i) => write!(fmt, "row group {} does not exist", i),
            Error::EndOfData => write!(fmt, "no more data"),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::FileIo(e.to_string())
    }
}

impl From<std::num::TryFromIntError> for Error {
    fn from(e: std::num::TryFromIntError) -> Error {
        Error::InvalidMetadata(format!("number does not fit its target width: {}", e))
    }
}

impl From<std::collections::TryReserveError> for Error {
    fn from(_: std::collections::TryReserveError) -> Error {
        Error::OutOfMemory(0)
    }
}

#[cfg(feature = "snappy")]
impl From<snap::Error> for Error {
    fn from(e: snap::Error) -> Error {
        Error::Decompression(format!("underlying snap error: {}", e))
    }
}

#[cfg(feature = "lz4")]
impl From<lz4_flex::block::DecompressError> for Error {
    fn from(e: lz4_flex::block::DecompressError) -> Error {
        Error::Decompression(format!("underlying lz4 error: {}", e))
    }
}

/// A specialized `Result` for errors of this crate.
pub type Result<T> = std::result::Result<T, Error>;
