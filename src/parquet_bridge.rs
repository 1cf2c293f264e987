// Bridges the thrift wire representations to rust enums.
use crate::error::Error;
use crate::format;

/// The repetition of a parquet field
#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy)]
pub enum Repetition {
    /// When the field has no null values
    Required,
    /// When the field may have null values
    Optional,
    /// When the field may be repeated (list field)
    Repeated,
}

impl TryFrom<format::FieldRepetitionType> for Repetition {
    type Error = Error;

    fn try_from(repetition: format::FieldRepetitionType) -> Result<Self, Self::Error> {
        Ok(match repetition {
            format::FieldRepetitionType::REQUIRED => Repetition::Required,
            format::FieldRepetitionType::OPTIONAL => Repetition::Optional,
            format::FieldRepetitionType::REPEATED => Repetition::Repeated,
            _ => return Err(Error::oos("FieldRepetitionType value out of range")),
        })
    }
}

impl From<Repetition> for format::FieldRepetitionType {
    fn from(repetition: Repetition) -> Self {
        match repetition {
            Repetition::Required => format::FieldRepetitionType::REQUIRED,
            Repetition::Optional => format::FieldRepetitionType::OPTIONAL,
            Repetition::Repeated => format::FieldRepetitionType::REPEATED,
        }
    }
}

#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy)]
pub enum Compression {
    Uncompressed,
    Snappy,
    Gzip,
    Lzo,
    Brotli,
    Lz4,
    Zstd,
    Lz4Raw,
}

impl TryFrom<format::CompressionCodec> for Compression {
    type Error = Error;

    fn try_from(codec: format::CompressionCodec) -> Result<Self, Self::Error> {
        Ok(match codec {
            format::CompressionCodec::UNCOMPRESSED => Compression::Uncompressed,
            format::CompressionCodec::SNAPPY => Compression::Snappy,
            format::CompressionCodec::GZIP => Compression::Gzip,
            format::CompressionCodec::LZO => Compression::Lzo,
            format::CompressionCodec::BROTLI => Compression::Brotli,
            format::CompressionCodec::LZ4 => Compression::Lz4,
            format::CompressionCodec::ZSTD => Compression::Zstd,
            format::CompressionCodec::LZ4_RAW => Compression::Lz4Raw,
            _ => return Err(Error::oos("CompressionCodec value out of range")),
        })
    }
}

impl From<Compression> for format::CompressionCodec {
    fn from(codec: Compression) -> Self {
        match codec {
            Compression::Uncompressed => format::CompressionCodec::UNCOMPRESSED,
            Compression::Snappy => format::CompressionCodec::SNAPPY,
            Compression::Gzip => format::CompressionCodec::GZIP,
            Compression::Lzo => format::CompressionCodec::LZO,
            Compression::Brotli => format::CompressionCodec::BROTLI,
            Compression::Lz4 => format::CompressionCodec::LZ4,
            Compression::Zstd => format::CompressionCodec::ZSTD,
            Compression::Lz4Raw => format::CompressionCodec::LZ4_RAW,
        }
    }
}

/// Compression levels of the codecs that honor one.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CompressionLevel(pub Option<i32>);

impl CompressionLevel {
    pub fn new(level: i32) -> Self {
        Self(Some(level))
    }
}

#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy)]
pub enum PageType {
    DataPage,
    DataPageV2,
    DictionaryPage,
    IndexPage,
}

impl TryFrom<format::PageType> for PageType {
    type Error = Error;

    fn try_from(type_: format::PageType) -> Result<Self, Self::Error> {
        Ok(match type_ {
            format::PageType::DATA_PAGE => PageType::DataPage,
            format::PageType::DATA_PAGE_V2 => PageType::DataPageV2,
            format::PageType::DICTIONARY_PAGE => PageType::DictionaryPage,
            format::PageType::INDEX_PAGE => PageType::IndexPage,
            _ => return Err(Error::oos("PageType value out of range")),
        })
    }
}

impl From<PageType> for format::PageType {
    fn from(type_: PageType) -> Self {
        match type_ {
            PageType::DataPage => format::PageType::DATA_PAGE,
            PageType::DataPageV2 => format::PageType::DATA_PAGE_V2,
            PageType::DictionaryPage => format::PageType::DICTIONARY_PAGE,
            PageType::IndexPage => format::PageType::INDEX_PAGE,
        }
    }
}

#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy)]
pub enum Encoding {
    /// Default encoding.
    /// BOOLEAN - 1 bit per value. 0 is false; 1 is true.
    /// INT32 - 4 bytes per value. Stored as little-endian.
    /// INT64 - 8 bytes per value. Stored as little-endian.
    /// FLOAT - 4 bytes per value. IEEE. Stored as little-endian.
    /// DOUBLE - 8 bytes per value. IEEE. Stored as little-endian.
    /// BYTE_ARRAY - 4 byte length stored as little endian, followed by bytes.
    /// FIXED_LEN_BYTE_ARRAY - Just the bytes.
    Plain,
    /// Deprecated dictionary encoding. The values in the dictionary are encoded
    /// in the plain type. In a data page use RLE_DICTIONARY instead; in a
    /// dictionary page use PLAIN instead.
    PlainDictionary,
    /// Group packed run length encoding. Usable for definition/repetition
    /// levels encoding and booleans.
    Rle,
    /// Bit packed encoding. Only usable if the data has a known max width.
    BitPacked,
    /// Delta encoding for integers. Works best on sorted data.
    DeltaBinaryPacked,
    /// Encoding for byte arrays to separate the length values and the data.
    /// The lengths are encoded using DELTA_BINARY_PACKED.
    DeltaLengthByteArray,
    /// Incremental-encoded byte arrays. Prefix lengths are encoded using
    /// DELTA_BINARY_PACKED; suffixes are stored as delta length byte arrays.
    DeltaByteArray,
    /// Dictionary encoding: the ids are encoded using the RLE encoding
    RleDictionary,
    /// Byte-per-byte transposition of width-W types into W planes.
    ByteStreamSplit,
}

impl TryFrom<format::Encoding> for Encoding {
    type Error = Error;

    fn try_from(encoding: format::Encoding) -> Result<Self, Self::Error> {
        Ok(match encoding {
            format::Encoding::PLAIN => Encoding::Plain,
            format::Encoding::PLAIN_DICTIONARY => Encoding::PlainDictionary,
            format::Encoding::RLE => Encoding::Rle,
            format::Encoding::BIT_PACKED => Encoding::BitPacked,
            format::Encoding::DELTA_BINARY_PACKED => Encoding::DeltaBinaryPacked,
            format::Encoding::DELTA_LENGTH_BYTE_ARRAY => Encoding::DeltaLengthByteArray,
            format::Encoding::DELTA_BYTE_ARRAY => Encoding::DeltaByteArray,
            format::Encoding::RLE_DICTIONARY => Encoding::RleDictionary,
            format::Encoding::BYTE_STREAM_SPLIT => Encoding::ByteStreamSplit,
            _ => return Err(Error::oos("Encoding value out of range")),
        })
    }
}

impl From<Encoding> for format::Encoding {
    fn from(encoding: Encoding) -> Self {
        match encoding {
            Encoding::Plain => format::Encoding::PLAIN,
            Encoding::PlainDictionary => format::Encoding::PLAIN_DICTIONARY,
            Encoding::Rle => format::Encoding::RLE,
            Encoding::BitPacked => format::Encoding::BIT_PACKED,
            Encoding::DeltaBinaryPacked => format::Encoding::DELTA_BINARY_PACKED,
            Encoding::DeltaLengthByteArray => format::Encoding::DELTA_LENGTH_BYTE_ARRAY,
            Encoding::DeltaByteArray => format::Encoding::DELTA_BYTE_ARRAY,
            Encoding::RleDictionary => format::Encoding::RLE_DICTIONARY,
            Encoding::ByteStreamSplit => format::Encoding::BYTE_STREAM_SPLIT,
        }
    }
}

/// Enum to annotate whether lists of min/max elements inside ColumnIndex
/// are ordered and if so, in which direction.
#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy, Default)]
pub enum BoundaryOrder {
    #[default]
    Unordered,
    Ascending,
    Descending,
}

impl TryFrom<format::BoundaryOrder> for BoundaryOrder {
    type Error = Error;

    fn try_from(order: format::BoundaryOrder) -> Result<Self, Self::Error> {
        Ok(match order {
            format::BoundaryOrder::UNORDERED => BoundaryOrder::Unordered,
            format::BoundaryOrder::ASCENDING => BoundaryOrder::Ascending,
            format::BoundaryOrder::DESCENDING => BoundaryOrder::Descending,
            _ => return Err(Error::oos("BoundaryOrder value out of range")),
        })
    }
}

impl From<BoundaryOrder> for format::BoundaryOrder {
    fn from(order: BoundaryOrder) -> Self {
        match order {
            BoundaryOrder::Unordered => format::BoundaryOrder::UNORDERED,
            BoundaryOrder::Ascending => format::BoundaryOrder::ASCENDING,
            BoundaryOrder::Descending => format::BoundaryOrder::DESCENDING,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Milliseconds,
    Microseconds,
    Nanoseconds,
}

impl From<format::TimeUnit> for TimeUnit {
    fn from(unit: format::TimeUnit) -> Self {
        match unit {
            format::TimeUnit::MILLIS => TimeUnit::Milliseconds,
            format::TimeUnit::MICROS => TimeUnit::Microseconds,
            format::TimeUnit::NANOS => TimeUnit::Nanoseconds,
        }
    }
}

impl From<TimeUnit> for format::TimeUnit {
    fn from(unit: TimeUnit) -> Self {
        match unit {
            TimeUnit::Milliseconds => format::TimeUnit::MILLIS,
            TimeUnit::Microseconds => format::TimeUnit::MICROS,
            TimeUnit::Nanoseconds => format::TimeUnit::NANOS,
        }
    }
}

/// Enum of all valid logical integer types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntegerType {
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
}

impl From<(i8, bool)> for IntegerType {
    fn from((bit_width, is_signed): (i8, bool)) -> Self {
        match (bit_width, is_signed) {
            (8, true) => IntegerType::Int8,
            (16, true) => IntegerType::Int16,
            (32, true) => IntegerType::Int32,
            (64, true) => IntegerType::Int64,
            (8, false) => IntegerType::UInt8,
            (16, false) => IntegerType::UInt16,
            (32, false) => IntegerType::UInt32,
            (64, false) => IntegerType::UInt64,
            // Anything else deviates from the specification; default to
            // the widest signed type.
            _ => IntegerType::Int64,
        }
    }
}

impl From<IntegerType> for (i8, bool) {
    fn from(type_: IntegerType) -> (i8, bool) {
        match type_ {
            IntegerType::Int8 => (8, true),
            IntegerType::Int16 => (16, true),
            IntegerType::Int32 => (32, true),
            IntegerType::Int64 => (64, true),
            IntegerType::UInt8 => (8, false),
            IntegerType::UInt16 => (16, false),
            IntegerType::UInt32 => (32, false),
            IntegerType::UInt64 => (64, false),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveLogicalType {
    String,
    Enum,
    Decimal(usize, usize),
    Date,
    Time {
        unit: TimeUnit,
        is_adjusted_to_utc: bool,
    },
    Timestamp {
        unit: TimeUnit,
        is_adjusted_to_utc: bool,
    },
    Integer(IntegerType),
    Unknown,
    Json,
    Bson,
    Uuid,
    Float16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupLogicalType {
    Map,
    List,
}

impl TryFrom<format::LogicalType> for PrimitiveLogicalType {
    type Error = Error;

    fn try_from(type_: format::LogicalType) -> Result<Self, Self::Error> {
        Ok(match type_ {
            format::LogicalType::STRING => PrimitiveLogicalType::String,
            format::LogicalType::ENUM => PrimitiveLogicalType::Enum,
            format::LogicalType::DECIMAL { precision, scale } => PrimitiveLogicalType::Decimal(
                precision.try_into()?,
                scale.try_into()?,
            ),
            format::LogicalType::DATE => PrimitiveLogicalType::Date,
            format::LogicalType::TIME {
                unit,
                is_adjusted_to_u_t_c,
            } => PrimitiveLogicalType::Time {
                unit: unit.into(),
                is_adjusted_to_utc: is_adjusted_to_u_t_c,
            },
            format::LogicalType::TIMESTAMP {
                unit,
                is_adjusted_to_u_t_c,
            } => PrimitiveLogicalType::Timestamp {
                unit: unit.into(),
                is_adjusted_to_utc: is_adjusted_to_u_t_c,
            },
            format::LogicalType::INTEGER {
                bit_width,
                is_signed,
            } => PrimitiveLogicalType::Integer((bit_width, is_signed).into()),
            format::LogicalType::UNKNOWN => PrimitiveLogicalType::Unknown,
            format::LogicalType::JSON => PrimitiveLogicalType::Json,
            format::LogicalType::BSON => PrimitiveLogicalType::Bson,
            format::LogicalType::UUID => PrimitiveLogicalType::Uuid,
            format::LogicalType::FLOAT16 => PrimitiveLogicalType::Float16,
            _ => return Err(Error::oos("LogicalType value out of range")),
        })
    }
}

impl TryFrom<format::LogicalType> for GroupLogicalType {
    type Error = Error;

    fn try_from(type_: format::LogicalType) -> Result<Self, Self::Error> {
        Ok(match type_ {
            format::LogicalType::LIST => GroupLogicalType::List,
            format::LogicalType::MAP => GroupLogicalType::Map,
            _ => return Err(Error::oos("LogicalType value out of range")),
        })
    }
}

impl From<PrimitiveLogicalType> for format::LogicalType {
    fn from(type_: PrimitiveLogicalType) -> Self {
        match type_ {
            PrimitiveLogicalType::String => format::LogicalType::STRING,
            PrimitiveLogicalType::Enum => format::LogicalType::ENUM,
            PrimitiveLogicalType::Decimal(precision, scale) => format::LogicalType::DECIMAL {
                precision: precision as i32,
                scale: scale as i32,
            },
            PrimitiveLogicalType::Date => format::LogicalType::DATE,
            PrimitiveLogicalType::Time {
                unit,
                is_adjusted_to_utc,
            } => format::LogicalType::TIME {
                unit: unit.into(),
                is_adjusted_to_u_t_c: is_adjusted_to_utc,
            },
            PrimitiveLogicalType::Timestamp {
                unit,
                is_adjusted_to_utc,
            } => format::LogicalType::TIMESTAMP {
                unit: unit.into(),
                is_adjusted_to_u_t_c: is_adjusted_to_utc,
            },
            PrimitiveLogicalType::Integer(integer) => {
                let (bit_width, is_signed) = integer.into();
                format::LogicalType::INTEGER {
                    bit_width,
                    is_signed,
                }
            }
            PrimitiveLogicalType::Unknown => format::LogicalType::UNKNOWN,
            PrimitiveLogicalType::Json => format::LogicalType::JSON,
            PrimitiveLogicalType::Bson => format::LogicalType::BSON,
            PrimitiveLogicalType::Uuid => format::LogicalType::UUID,
            PrimitiveLogicalType::Float16 => format::LogicalType::FLOAT16,
        }
    }
}

impl From<GroupLogicalType> for format::LogicalType {
    fn from(type_: GroupLogicalType) -> Self {
        match type_ {
            GroupLogicalType::Map => format::LogicalType::MAP,
            GroupLogicalType::List => format::LogicalType::LIST,
        }
    }
}
