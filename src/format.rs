//! Typed mirrors of the parquet thrift structures and their
//! compact-protocol serialization.
//!
//! Readers skip unknown or reserved field ids and bound every
//! variable-length collection; writers emit fields in id order and omit
//! unset optionals.

use std::io::{Read, Write};

use crate::error::{Error, Result};
use crate::thrift::{wire, CompactReader, CompactWriter};

// caps on collections a crafted footer could otherwise inflate
const MAX_SCHEMA_ELEMENTS: usize = 10_000;
const MAX_ROW_GROUPS: usize = 100_000;
const MAX_COLUMNS_PER_ROW_GROUP: usize = 10_000;
const MAX_KEY_VALUE_PAIRS: usize = 10_000;
const MAX_ENCODINGS: usize = 100;
const MAX_PATH_ELEMENTS: usize = 100;
const MAX_ENCODING_STATS: usize = 100;

fn check_cap(len: usize, cap: usize, what: &str) -> Result<()> {
    if len > cap {
        return Err(Error::InvalidMetadata(format!(
            "{} declares {} entries, more than the {} this reader accepts",
            what, len, cap
        )));
    }
    Ok(())
}

macro_rules! i32_enum {
    ($(#[$attr:meta])* $name:ident { $($variant:ident = $value:literal,)* }) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub i32);

        impl $name {
            $(pub const $variant: $name = $name($value);)*
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> i32 {
                value.0
            }
        }

        impl From<i32> for $name {
            fn from(value: i32) -> Self {
                Self(value)
            }
        }
    };
}

i32_enum!(
    /// On-disk physical types.
    Type {
        BOOLEAN = 0,
        INT32 = 1,
        INT64 = 2,
        INT96 = 3,
        FLOAT = 4,
        DOUBLE = 5,
        BYTE_ARRAY = 6,
        FIXED_LEN_BYTE_ARRAY = 7,
    }
);

i32_enum!(
    /// Legacy type annotations, superseded by `LogicalType`.
    ConvertedType {
        UTF8 = 0,
        MAP = 1,
        MAP_KEY_VALUE = 2,
        LIST = 3,
        ENUM = 4,
        DECIMAL = 5,
        DATE = 6,
        TIME_MILLIS = 7,
        TIME_MICROS = 8,
        TIMESTAMP_MILLIS = 9,
        TIMESTAMP_MICROS = 10,
        UINT_8 = 11,
        UINT_16 = 12,
        UINT_32 = 13,
        UINT_64 = 14,
        INT_8 = 15,
        INT_16 = 16,
        INT_32 = 17,
        INT_64 = 18,
        JSON = 19,
        BSON = 20,
        INTERVAL = 21,
    }
);

i32_enum!(
    FieldRepetitionType {
        REQUIRED = 0,
        OPTIONAL = 1,
        REPEATED = 2,
    }
);

i32_enum!(
    Encoding {
        PLAIN = 0,
        PLAIN_DICTIONARY = 2,
        RLE = 3,
        BIT_PACKED = 4,
        DELTA_BINARY_PACKED = 5,
        DELTA_LENGTH_BYTE_ARRAY = 6,
        DELTA_BYTE_ARRAY = 7,
        RLE_DICTIONARY = 8,
        BYTE_STREAM_SPLIT = 9,
    }
);

i32_enum!(
    CompressionCodec {
        UNCOMPRESSED = 0,
        SNAPPY = 1,
        GZIP = 2,
        LZO = 3,
        BROTLI = 4,
        LZ4 = 5,
        ZSTD = 6,
        LZ4_RAW = 7,
    }
);

i32_enum!(
    PageType {
        DATA_PAGE = 0,
        INDEX_PAGE = 1,
        DICTIONARY_PAGE = 2,
        DATA_PAGE_V2 = 3,
    }
);

i32_enum!(
    BoundaryOrder {
        UNORDERED = 0,
        ASCENDING = 1,
        DESCENDING = 2,
    }
);

/// Time resolution of TIME/TIMESTAMP logical types.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    MILLIS,
    MICROS,
    NANOS,
}

impl TimeUnit {
    fn read_from<R: Read>(reader: &mut CompactReader<R>) -> Result<Self> {
        reader.read_struct_begin()?;
        let mut unit = None;
        while let Some((field_type, field_id)) = reader.read_field_header()? {
            match field_id {
                1 => {
                    reader.skip(field_type)?;
                    unit = Some(TimeUnit::MILLIS)
                }
                2 => {
                    reader.skip(field_type)?;
                    unit = Some(TimeUnit::MICROS)
                }
                3 => {
                    reader.skip(field_type)?;
                    unit = Some(TimeUnit::NANOS)
                }
                _ => reader.skip(field_type)?,
            }
        }
        reader.read_struct_end();
        unit.ok_or_else(|| Error::InvalidMetadata("TimeUnit union carries no variant".into()))
    }

    fn write_to<W: Write>(&self, writer: &mut CompactWriter<W>) -> Result<()> {
        let field_id = match self {
            TimeUnit::MILLIS => 1,
            TimeUnit::MICROS => 2,
            TimeUnit::NANOS => 3,
        };
        writer.write_struct_begin();
        writer.write_field_header(wire::STRUCT, field_id)?;
        write_empty_struct(writer)?;
        writer.write_struct_end()
    }
}

/// Logical (semantic) type annotations over the physical types.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalType {
    STRING,
    MAP,
    LIST,
    ENUM,
    DECIMAL { scale: i32, precision: i32 },
    DATE,
    TIME { is_adjusted_to_u_t_c: bool, unit: TimeUnit },
    TIMESTAMP { is_adjusted_to_u_t_c: bool, unit: TimeUnit },
    INTEGER { bit_width: i8, is_signed: bool },
    UNKNOWN,
    JSON,
    BSON,
    UUID,
    FLOAT16,
}

fn read_empty_struct<R: Read>(reader: &mut CompactReader<R>) -> Result<()> {
    reader.read_struct_begin()?;
    while let Some((field_type, _)) = reader.read_field_header()? {
        reader.skip(field_type)?;
    }
    reader.read_struct_end();
    Ok(())
}

fn write_empty_struct<W: Write>(writer: &mut CompactWriter<W>) -> Result<()> {
    writer.write_struct_begin();
    writer.write_struct_end()
}

impl LogicalType {
    fn read_from<R: Read>(reader: &mut CompactReader<R>) -> Result<Self> {
        reader.read_struct_begin()?;
        let mut result = None;
        while let Some((field_type, field_id)) = reader.read_field_header()? {
            result = Some(match field_id {
                1 => {
                    read_empty_struct(reader)?;
                    LogicalType::STRING
                }
                2 => {
                    read_empty_struct(reader)?;
                    LogicalType::MAP
                }
                3 => {
                    read_empty_struct(reader)?;
                    LogicalType::LIST
                }
                4 => {
                    read_empty_struct(reader)?;
                    LogicalType::ENUM
                }
                5 => {
                    // DecimalType { 1: scale, 2: precision }
                    reader.read_struct_begin()?;
                    let (mut scale, mut precision) = (0, 0);
                    while let Some((field_type, field_id)) = reader.read_field_header()? {
                        match field_id {
                            1 => scale = reader.read_i32()?,
                            2 => precision = reader.read_i32()?,
                            _ => reader.skip(field_type)?,
                        }
                    }
                    reader.read_struct_end();
                    LogicalType::DECIMAL { scale, precision }
                }
                6 => {
                    read_empty_struct(reader)?;
                    LogicalType::DATE
                }
                7 | 8 => {
                    // TimeType / TimestampType { 1: isAdjustedToUTC, 2: unit }
                    reader.read_struct_begin()?;
                    let mut is_adjusted_to_u_t_c = false;
                    let mut unit = None;
                    while let Some((field_type, inner_id)) = reader.read_field_header()? {
                        match inner_id {
                            1 => is_adjusted_to_u_t_c = reader.read_bool()?,
                            2 => unit = Some(TimeUnit::read_from(reader)?),
                            _ => reader.skip(field_type)?,
                        }
                    }
                    reader.read_struct_end();
                    let unit = unit.ok_or_else(|| {
                        Error::InvalidMetadata("TIME/TIMESTAMP annotation without a unit".into())
                    })?;
                    if field_id == 7 {
                        LogicalType::TIME {
                            is_adjusted_to_u_t_c,
                            unit,
                        }
                    } else {
                        LogicalType::TIMESTAMP {
                            is_adjusted_to_u_t_c,
                            unit,
                        }
                    }
                }
                10 => {
                    // IntType { 1: bitWidth (byte), 2: isSigned }
                    reader.read_struct_begin()?;
                    let mut bit_width = 0i8;
                    let mut is_signed = false;
                    while let Some((field_type, inner_id)) = reader.read_field_header()? {
                        match inner_id {
                            1 => bit_width = reader.read_byte_i8()?,
                            2 => is_signed = reader.read_bool()?,
                            _ => reader.skip(field_type)?,
                        }
                    }
                    reader.read_struct_end();
                    LogicalType::INTEGER {
                        bit_width,
                        is_signed,
                    }
                }
                11 => {
                    read_empty_struct(reader)?;
                    LogicalType::UNKNOWN
                }
                12 => {
                    read_empty_struct(reader)?;
                    LogicalType::JSON
                }
                13 => {
                    read_empty_struct(reader)?;
                    LogicalType::BSON
                }
                14 => {
                    read_empty_struct(reader)?;
                    LogicalType::UUID
                }
                15 => {
                    read_empty_struct(reader)?;
                    LogicalType::FLOAT16
                }
                _ => {
                    reader.skip(field_type)?;
                    continue;
                }
            });
        }
        reader.read_struct_end();
        result.ok_or_else(|| Error::InvalidMetadata("LogicalType union carries no variant".into()))
    }

    fn write_to<W: Write>(&self, writer: &mut CompactWriter<W>) -> Result<()> {
        writer.write_struct_begin();
        match self {
            LogicalType::STRING => {
                writer.write_field_header(wire::STRUCT, 1)?;
                write_empty_struct(writer)?;
            }
            LogicalType::MAP => {
                writer.write_field_header(wire::STRUCT, 2)?;
                write_empty_struct(writer)?;
            }
            LogicalType::LIST => {
                writer.write_field_header(wire::STRUCT, 3)?;
                write_empty_struct(writer)?;
            }
            LogicalType::ENUM => {
                writer.write_field_header(wire::STRUCT, 4)?;
                write_empty_struct(writer)?;
            }
            LogicalType::DECIMAL { scale, precision } => {
                writer.write_field_header(wire::STRUCT, 5)?;
                writer.write_struct_begin();
                writer.write_field_header(wire::I32, 1)?;
                writer.write_i32(*scale)?;
                writer.write_field_header(wire::I32, 2)?;
                writer.write_i32(*precision)?;
                writer.write_struct_end()?;
            }
            LogicalType::DATE => {
                writer.write_field_header(wire::STRUCT, 6)?;
                write_empty_struct(writer)?;
            }
            LogicalType::TIME {
                is_adjusted_to_u_t_c,
                unit,
            }
            | LogicalType::TIMESTAMP {
                is_adjusted_to_u_t_c,
                unit,
            } => {
                let field_id = if matches!(self, LogicalType::TIME { .. }) {
                    7
                } else {
                    8
                };
                writer.write_field_header(wire::STRUCT, field_id)?;
                writer.write_struct_begin();
                writer.write_bool_field(1, *is_adjusted_to_u_t_c)?;
                writer.write_field_header(wire::STRUCT, 2)?;
                unit.write_to(writer)?;
                writer.write_struct_end()?;
            }
            LogicalType::INTEGER {
                bit_width,
                is_signed,
            } => {
                writer.write_field_header(wire::STRUCT, 10)?;
                writer.write_struct_begin();
                writer.write_field_header(wire::BYTE, 1)?;
                writer.write_byte_i8(*bit_width)?;
                writer.write_bool_field(2, *is_signed)?;
                writer.write_struct_end()?;
            }
            LogicalType::UNKNOWN => {
                writer.write_field_header(wire::STRUCT, 11)?;
                write_empty_struct(writer)?;
            }
            LogicalType::JSON => {
                writer.write_field_header(wire::STRUCT, 12)?;
                write_empty_struct(writer)?;
            }
            LogicalType::BSON => {
                writer.write_field_header(wire::STRUCT, 13)?;
                write_empty_struct(writer)?;
            }
            LogicalType::UUID => {
                writer.write_field_header(wire::STRUCT, 14)?;
                write_empty_struct(writer)?;
            }
            LogicalType::FLOAT16 => {
                writer.write_field_header(wire::STRUCT, 15)?;
                write_empty_struct(writer)?;
            }
        }
        writer.write_struct_end()
    }
}

/// Column statistics, min/max in the column's plain encoding.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Statistics {
    /// Legacy min/max with ambiguous ordering; written by old producers.
    pub max: Option<Vec<u8>>,
    pub min: Option<Vec<u8>>,
    pub null_count: Option<i64>,
    pub distinct_count: Option<i64>,
    pub max_value: Option<Vec<u8>>,
    pub min_value: Option<Vec<u8>>,
    pub is_max_value_exact: Option<bool>,
    pub is_min_value_exact: Option<bool>,
}

impl Statistics {
    pub fn read_from<R: Read>(reader: &mut CompactReader<R>) -> Result<Self> {
        let mut this = Self::default();
        reader.read_struct_begin()?;
        while let Some((field_type, field_id)) = reader.read_field_header()? {
            match field_id {
                1 => this.max = Some(reader.read_binary()?),
                2 => this.min = Some(reader.read_binary()?),
                3 => this.null_count = Some(reader.read_i64()?),
                4 => this.distinct_count = Some(reader.read_i64()?),
                5 => this.max_value = Some(reader.read_binary()?),
                6 => this.min_value = Some(reader.read_binary()?),
                7 => this.is_max_value_exact = Some(reader.read_bool()?),
                8 => this.is_min_value_exact = Some(reader.read_bool()?),
                _ => reader.skip(field_type)?,
            }
        }
        reader.read_struct_end();
        Ok(this)
    }

    pub fn write_to<W: Write>(&self, writer: &mut CompactWriter<W>) -> Result<()> {
        writer.write_struct_begin();
        if let Some(max) = &self.max {
            writer.write_field_header(wire::BINARY, 1)?;
            writer.write_binary(max)?;
        }
        if let Some(min) = &self.min {
            writer.write_field_header(wire::BINARY, 2)?;
            writer.write_binary(min)?;
        }
        if let Some(null_count) = self.null_count {
            writer.write_field_header(wire::I64, 3)?;
            writer.write_i64(null_count)?;
        }
        if let Some(distinct_count) = self.distinct_count {
            writer.write_field_header(wire::I64, 4)?;
            writer.write_i64(distinct_count)?;
        }
        if let Some(max_value) = &self.max_value {
            writer.write_field_header(wire::BINARY, 5)?;
            writer.write_binary(max_value)?;
        }
        if let Some(min_value) = &self.min_value {
            writer.write_field_header(wire::BINARY, 6)?;
            writer.write_binary(min_value)?;
        }
        if let Some(exact) = self.is_max_value_exact {
            writer.write_bool_field(7, exact)?;
        }
        if let Some(exact) = self.is_min_value_exact {
            writer.write_bool_field(8, exact)?;
        }
        writer.write_struct_end()
    }
}

/// One node of the flattened schema tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaElement {
    pub type_: Option<Type>,
    pub type_length: Option<i32>,
    pub repetition_type: Option<FieldRepetitionType>,
    pub name: String,
    pub num_children: Option<i32>,
    pub converted_type: Option<ConvertedType>,
    pub scale: Option<i32>,
    pub precision: Option<i32>,
    pub field_id: Option<i32>,
    pub logical_type: Option<LogicalType>,
}

impl SchemaElement {
    pub fn read_from<R: Read>(reader: &mut CompactReader<R>) -> Result<Self> {
        let mut type_ = None;
        let mut type_length = None;
        let mut repetition_type = None;
        let mut name = None;
        let mut num_children = None;
        let mut converted_type = None;
        let mut scale = None;
        let mut precision = None;
        let mut field_id = None;
        let mut logical_type = None;

        reader.read_struct_begin()?;
        while let Some((field_type, id)) = reader.read_field_header()? {
            match id {
                1 => type_ = Some(Type(reader.read_i32()?)),
                2 => type_length = Some(reader.read_i32()?),
                3 => repetition_type = Some(FieldRepetitionType(reader.read_i32()?)),
                4 => name = Some(reader.read_string()?),
                5 => num_children = Some(reader.read_i32()?),
                6 => converted_type = Some(ConvertedType(reader.read_i32()?)),
                7 => scale = Some(reader.read_i32()?),
                8 => precision = Some(reader.read_i32()?),
                9 => field_id = Some(reader.read_i32()?),
                10 => logical_type = Some(LogicalType::read_from(reader)?),
                _ => reader.skip(field_type)?,
            }
        }
        reader.read_struct_end();

        Ok(Self {
            type_,
            type_length,
            repetition_type,
            name: name
                .ok_or_else(|| Error::InvalidMetadata("schema element without a name".into()))?,
            num_children,
            converted_type,
            scale,
            precision,
            field_id,
            logical_type,
        })
    }

    pub fn write_to<W: Write>(&self, writer: &mut CompactWriter<W>) -> Result<()> {
        writer.write_struct_begin();
        if let Some(type_) = self.type_ {
            writer.write_field_header(wire::I32, 1)?;
            writer.write_i32(type_.0)?;
        }
        if let Some(length) = self.type_length {
            writer.write_field_header(wire::I32, 2)?;
            writer.write_i32(length)?;
        }
        if let Some(repetition) = self.repetition_type {
            writer.write_field_header(wire::I32, 3)?;
            writer.write_i32(repetition.0)?;
        }
        writer.write_field_header(wire::BINARY, 4)?;
        writer.write_string(&self.name)?;
        if let Some(num_children) = self.num_children {
            writer.write_field_header(wire::I32, 5)?;
            writer.write_i32(num_children)?;
        }
        if let Some(converted) = self.converted_type {
            writer.write_field_header(wire::I32, 6)?;
            writer.write_i32(converted.0)?;
        }
        if let Some(scale) = self.scale {
            writer.write_field_header(wire::I32, 7)?;
            writer.write_i32(scale)?;
        }
        if let Some(precision) = self.precision {
            writer.write_field_header(wire::I32, 8)?;
            writer.write_i32(precision)?;
        }
        if let Some(field_id) = self.field_id {
            writer.write_field_header(wire::I32, 9)?;
            writer.write_i32(field_id)?;
        }
        if let Some(logical_type) = &self.logical_type {
            writer.write_field_header(wire::STRUCT, 10)?;
            logical_type.write_to(writer)?;
        }
        writer.write_struct_end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPageHeader {
    pub num_values: i32,
    pub encoding: Encoding,
    pub definition_level_encoding: Encoding,
    pub repetition_level_encoding: Encoding,
    pub statistics: Option<Statistics>,
}

impl DataPageHeader {
    fn read_from<R: Read>(reader: &mut CompactReader<R>) -> Result<Self> {
        let mut num_values = None;
        let mut encoding = None;
        let mut definition_level_encoding = None;
        let mut repetition_level_encoding = None;
        let mut statistics = None;

        reader.read_struct_begin()?;
        while let Some((field_type, id)) = reader.read_field_header()? {
            match id {
                1 => num_values = Some(reader.read_i32()?),
                2 => encoding = Some(Encoding(reader.read_i32()?)),
                3 => definition_level_encoding = Some(Encoding(reader.read_i32()?)),
                4 => repetition_level_encoding = Some(Encoding(reader.read_i32()?)),
                5 => statistics = Some(Statistics::read_from(reader)?),
                _ => reader.skip(field_type)?,
            }
        }
        reader.read_struct_end();

        let missing = || Error::InvalidPage("data page header missing a required field".into());
        Ok(Self {
            num_values: num_values.ok_or_else(missing)?,
            encoding: encoding.ok_or_else(missing)?,
            definition_level_encoding: definition_level_encoding.ok_or_else(missing)?,
            repetition_level_encoding: repetition_level_encoding.ok_or_else(missing)?,
            statistics,
        })
    }

    fn write_to<W: Write>(&self, writer: &mut CompactWriter<W>) -> Result<()> {
        writer.write_struct_begin();
        writer.write_field_header(wire::I32, 1)?;
        writer.write_i32(self.num_values)?;
        writer.write_field_header(wire::I32, 2)?;
        writer.write_i32(self.encoding.0)?;
        writer.write_field_header(wire::I32, 3)?;
        writer.write_i32(self.definition_level_encoding.0)?;
        writer.write_field_header(wire::I32, 4)?;
        writer.write_i32(self.repetition_level_encoding.0)?;
        if let Some(statistics) = &self.statistics {
            writer.write_field_header(wire::STRUCT, 5)?;
            statistics.write_to(writer)?;
        }
        writer.write_struct_end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPageHeaderV2 {
    pub num_values: i32,
    pub num_nulls: i32,
    pub num_rows: i32,
    pub encoding: Encoding,
    pub definition_levels_byte_length: i32,
    pub repetition_levels_byte_length: i32,
    /// Whether the values block is compressed; levels never are.
    pub is_compressed: Option<bool>,
    pub statistics: Option<Statistics>,
}

impl DataPageHeaderV2 {
    fn read_from<R: Read>(reader: &mut CompactReader<R>) -> Result<Self> {
        let mut num_values = None;
        let mut num_nulls = None;
        let mut num_rows = None;
        let mut encoding = None;
        let mut definition_levels_byte_length = None;
        let mut repetition_levels_byte_length = None;
        let mut is_compressed = None;
        let mut statistics = None;

        reader.read_struct_begin()?;
        while let Some((field_type, id)) = reader.read_field_header()? {
            match id {
                1 => num_values = Some(reader.read_i32()?),
                2 => num_nulls = Some(reader.read_i32()?),
                3 => num_rows = Some(reader.read_i32()?),
                4 => encoding = Some(Encoding(reader.read_i32()?)),
                5 => definition_levels_byte_length = Some(reader.read_i32()?),
                6 => repetition_levels_byte_length = Some(reader.read_i32()?),
                7 => is_compressed = Some(reader.read_bool()?),
                8 => statistics = Some(Statistics::read_from(reader)?),
                _ => reader.skip(field_type)?,
            }
        }
        reader.read_struct_end();

        let missing = || Error::InvalidPage("data page v2 header missing a required field".into());
        Ok(Self {
            num_values: num_values.ok_or_else(missing)?,
            num_nulls: num_nulls.ok_or_else(missing)?,
            num_rows: num_rows.ok_or_else(missing)?,
            encoding: encoding.ok_or_else(missing)?,
            definition_levels_byte_length: definition_levels_byte_length.ok_or_else(missing)?,
            repetition_levels_byte_length: repetition_levels_byte_length.ok_or_else(missing)?,
            is_compressed,
            statistics,
        })
    }

    fn write_to<W: Write>(&self, writer: &mut CompactWriter<W>) -> Result<()> {
        writer.write_struct_begin();
        writer.write_field_header(wire::I32, 1)?;
        writer.write_i32(self.num_values)?;
        writer.write_field_header(wire::I32, 2)?;
        writer.write_i32(self.num_nulls)?;
        writer.write_field_header(wire::I32, 3)?;
        writer.write_i32(self.num_rows)?;
        writer.write_field_header(wire::I32, 4)?;
        writer.write_i32(self.encoding.0)?;
        writer.write_field_header(wire::I32, 5)?;
        writer.write_i32(self.definition_levels_byte_length)?;
        writer.write_field_header(wire::I32, 6)?;
        writer.write_i32(self.repetition_levels_byte_length)?;
        if let Some(is_compressed) = self.is_compressed {
            writer.write_bool_field(7, is_compressed)?;
        }
        if let Some(statistics) = &self.statistics {
            writer.write_field_header(wire::STRUCT, 8)?;
            statistics.write_to(writer)?;
        }
        writer.write_struct_end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryPageHeader {
    pub num_values: i32,
    pub encoding: Encoding,
    pub is_sorted: Option<bool>,
}

impl DictionaryPageHeader {
    fn read_from<R: Read>(reader: &mut CompactReader<R>) -> Result<Self> {
        let mut num_values = None;
        let mut encoding = None;
        let mut is_sorted = None;

        reader.read_struct_begin()?;
        while let Some((field_type, id)) = reader.read_field_header()? {
            match id {
                1 => num_values = Some(reader.read_i32()?),
                2 => encoding = Some(Encoding(reader.read_i32()?)),
                3 => is_sorted = Some(reader.read_bool()?),
                _ => reader.skip(field_type)?,
            }
        }
        reader.read_struct_end();

        let missing =
            || Error::InvalidPage("dictionary page header missing a required field".into());
        Ok(Self {
            num_values: num_values.ok_or_else(missing)?,
            encoding: encoding.ok_or_else(missing)?,
            is_sorted,
        })
    }

    fn write_to<W: Write>(&self, writer: &mut CompactWriter<W>) -> Result<()> {
        writer.write_struct_begin();
        writer.write_field_header(wire::I32, 1)?;
        writer.write_i32(self.num_values)?;
        writer.write_field_header(wire::I32, 2)?;
        writer.write_i32(self.encoding.0)?;
        if let Some(is_sorted) = self.is_sorted {
            writer.write_bool_field(3, is_sorted)?;
        }
        writer.write_struct_end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageHeader {
    pub type_: PageType,
    pub uncompressed_page_size: i32,
    pub compressed_page_size: i32,
    /// CRC32 of the compressed page body.
    pub crc: Option<i32>,
    pub data_page_header: Option<DataPageHeader>,
    pub dictionary_page_header: Option<DictionaryPageHeader>,
    pub data_page_header_v2: Option<DataPageHeaderV2>,
}

impl PageHeader {
    pub fn read_from<R: Read>(reader: &mut CompactReader<R>) -> Result<Self> {
        let mut type_ = None;
        let mut uncompressed_page_size = None;
        let mut compressed_page_size = None;
        let mut crc = None;
        let mut data_page_header = None;
        let mut dictionary_page_header = None;
        let mut data_page_header_v2 = None;

        reader.read_struct_begin()?;
        while let Some((field_type, id)) = reader.read_field_header()? {
            match id {
                1 => type_ = Some(PageType(reader.read_i32()?)),
                2 => uncompressed_page_size = Some(reader.read_i32()?),
                3 => compressed_page_size = Some(reader.read_i32()?),
                4 => crc = Some(reader.read_i32()?),
                5 => data_page_header = Some(DataPageHeader::read_from(reader)?),
                7 => dictionary_page_header = Some(DictionaryPageHeader::read_from(reader)?),
                8 => data_page_header_v2 = Some(DataPageHeaderV2::read_from(reader)?),
                _ => reader.skip(field_type)?,
            }
        }
        reader.read_struct_end();

        let missing = || Error::InvalidPage("page header missing a required field".into());
        Ok(Self {
            type_: type_.ok_or_else(missing)?,
            uncompressed_page_size: uncompressed_page_size.ok_or_else(missing)?,
            compressed_page_size: compressed_page_size.ok_or_else(missing)?,
            crc,
            data_page_header,
            dictionary_page_header,
            data_page_header_v2,
        })
    }

    pub fn write_to<W: Write>(&self, writer: &mut CompactWriter<W>) -> Result<()> {
        writer.write_struct_begin();
        writer.write_field_header(wire::I32, 1)?;
        writer.write_i32(self.type_.0)?;
        writer.write_field_header(wire::I32, 2)?;
        writer.write_i32(self.uncompressed_page_size)?;
        writer.write_field_header(wire::I32, 3)?;
        writer.write_i32(self.compressed_page_size)?;
        if let Some(crc) = self.crc {
            writer.write_field_header(wire::I32, 4)?;
            writer.write_i32(crc)?;
        }
        if let Some(header) = &self.data_page_header {
            writer.write_field_header(wire::STRUCT, 5)?;
            header.write_to(writer)?;
        }
        if let Some(header) = &self.dictionary_page_header {
            writer.write_field_header(wire::STRUCT, 7)?;
            header.write_to(writer)?;
        }
        if let Some(header) = &self.data_page_header_v2 {
            writer.write_field_header(wire::STRUCT, 8)?;
            header.write_to(writer)?;
        }
        writer.write_struct_end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: Option<String>,
}

impl KeyValue {
    pub fn new(key: String, value: Option<String>) -> Self {
        Self { key, value }
    }

    fn read_from<R: Read>(reader: &mut CompactReader<R>) -> Result<Self> {
        let mut key = None;
        let mut value = None;
        reader.read_struct_begin()?;
        while let Some((field_type, id)) = reader.read_field_header()? {
            match id {
                1 => key = Some(reader.read_string()?),
                2 => value = Some(reader.read_string()?),
                _ => reader.skip(field_type)?,
            }
        }
        reader.read_struct_end();
        Ok(Self {
            key: key.ok_or_else(|| Error::InvalidMetadata("key/value pair without a key".into()))?,
            value,
        })
    }

    fn write_to<W: Write>(&self, writer: &mut CompactWriter<W>) -> Result<()> {
        writer.write_struct_begin();
        writer.write_field_header(wire::BINARY, 1)?;
        writer.write_string(&self.key)?;
        if let Some(value) = &self.value {
            writer.write_field_header(wire::BINARY, 2)?;
            writer.write_string(value)?;
        }
        writer.write_struct_end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortingColumn {
    pub column_idx: i32,
    pub descending: bool,
    pub nulls_first: bool,
}

impl SortingColumn {
    fn read_from<R: Read>(reader: &mut CompactReader<R>) -> Result<Self> {
        let mut column_idx = None;
        let mut descending = None;
        let mut nulls_first = None;
        reader.read_struct_begin()?;
        while let Some((field_type, id)) = reader.read_field_header()? {
            match id {
                1 => column_idx = Some(reader.read_i32()?),
                2 => descending = Some(reader.read_bool()?),
                3 => nulls_first = Some(reader.read_bool()?),
                _ => reader.skip(field_type)?,
            }
        }
        reader.read_struct_end();
        let missing = || Error::InvalidMetadata("sorting column missing a required field".into());
        Ok(Self {
            column_idx: column_idx.ok_or_else(missing)?,
            descending: descending.ok_or_else(missing)?,
            nulls_first: nulls_first.ok_or_else(missing)?,
        })
    }

    fn write_to<W: Write>(&self, writer: &mut CompactWriter<W>) -> Result<()> {
        writer.write_struct_begin();
        writer.write_field_header(wire::I32, 1)?;
        writer.write_i32(self.column_idx)?;
        writer.write_bool_field(2, self.descending)?;
        writer.write_bool_field(3, self.nulls_first)?;
        writer.write_struct_end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEncodingStats {
    pub page_type: PageType,
    pub encoding: Encoding,
    pub count: i32,
}

impl PageEncodingStats {
    fn read_from<R: Read>(reader: &mut CompactReader<R>) -> Result<Self> {
        let mut page_type = None;
        let mut encoding = None;
        let mut count = None;
        reader.read_struct_begin()?;
        while let Some((field_type, id)) = reader.read_field_header()? {
            match id {
                1 => page_type = Some(PageType(reader.read_i32()?)),
                2 => encoding = Some(Encoding(reader.read_i32()?)),
                3 => count = Some(reader.read_i32()?),
                _ => reader.skip(field_type)?,
            }
        }
        reader.read_struct_end();
        let missing = || Error::InvalidMetadata("encoding stats missing a required field".into());
        Ok(Self {
            page_type: page_type.ok_or_else(missing)?,
            encoding: encoding.ok_or_else(missing)?,
            count: count.ok_or_else(missing)?,
        })
    }

    fn write_to<W: Write>(&self, writer: &mut CompactWriter<W>) -> Result<()> {
        writer.write_struct_begin();
        writer.write_field_header(wire::I32, 1)?;
        writer.write_i32(self.page_type.0)?;
        writer.write_field_header(wire::I32, 2)?;
        writer.write_i32(self.encoding.0)?;
        writer.write_field_header(wire::I32, 3)?;
        writer.write_i32(self.count)?;
        writer.write_struct_end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMetaData {
    pub type_: Type,
    pub encodings: Vec<Encoding>,
    pub path_in_schema: Vec<String>,
    pub codec: CompressionCodec,
    pub num_values: i64,
    pub total_uncompressed_size: i64,
    pub total_compressed_size: i64,
    pub key_value_metadata: Option<Vec<KeyValue>>,
    pub data_page_offset: i64,
    pub index_page_offset: Option<i64>,
    pub dictionary_page_offset: Option<i64>,
    pub statistics: Option<Statistics>,
    pub encoding_stats: Option<Vec<PageEncodingStats>>,
    pub bloom_filter_offset: Option<i64>,
    pub bloom_filter_length: Option<i32>,
}

impl ColumnMetaData {
    fn read_from<R: Read>(reader: &mut CompactReader<R>) -> Result<Self> {
        let mut type_ = None;
        let mut encodings = None;
        let mut path_in_schema = None;
        let mut codec = None;
        let mut num_values = None;
        let mut total_uncompressed_size = None;
        let mut total_compressed_size = None;
        let mut key_value_metadata = None;
        let mut data_page_offset = None;
        let mut index_page_offset = None;
        let mut dictionary_page_offset = None;
        let mut statistics = None;
        let mut encoding_stats = None;
        let mut bloom_filter_offset = None;
        let mut bloom_filter_length = None;

        reader.read_struct_begin()?;
        while let Some((field_type, id)) = reader.read_field_header()? {
            match id {
                1 => type_ = Some(Type(reader.read_i32()?)),
                2 => {
                    let (_, count) = reader.read_list_header()?;
                    check_cap(count, MAX_ENCODINGS, "a column's encoding list")?;
                    let mut values = Vec::with_capacity(count);
                    for _ in 0..count {
                        values.push(Encoding(reader.read_i32()?));
                    }
                    encodings = Some(values);
                }
                3 => {
                    let (_, count) = reader.read_list_header()?;
                    check_cap(count, MAX_PATH_ELEMENTS, "a column's path in the schema")?;
                    let mut values = Vec::with_capacity(count);
                    for _ in 0..count {
                        values.push(reader.read_string()?);
                    }
                    path_in_schema = Some(values);
                }
                4 => codec = Some(CompressionCodec(reader.read_i32()?)),
                5 => num_values = Some(reader.read_i64()?),
                6 => total_uncompressed_size = Some(reader.read_i64()?),
                7 => total_compressed_size = Some(reader.read_i64()?),
                8 => {
                    let (_, count) = reader.read_list_header()?;
                    check_cap(count, MAX_KEY_VALUE_PAIRS, "a column's key/value metadata")?;
                    let mut values = Vec::with_capacity(count);
                    for _ in 0..count {
                        values.push(KeyValue::read_from(reader)?);
                    }
                    key_value_metadata = Some(values);
                }
                9 => data_page_offset = Some(reader.read_i64()?),
                10 => index_page_offset = Some(reader.read_i64()?),
                11 => dictionary_page_offset = Some(reader.read_i64()?),
                12 => statistics = Some(Statistics::read_from(reader)?),
                13 => {
                    let (_, count) = reader.read_list_header()?;
                    check_cap(count, MAX_ENCODING_STATS, "a column's encoding stats")?;
                    let mut values = Vec::with_capacity(count);
                    for _ in 0..count {
                        values.push(PageEncodingStats::read_from(reader)?);
                    }
                    encoding_stats = Some(values);
                }
                14 => bloom_filter_offset = Some(reader.read_i64()?),
                15 => bloom_filter_length = Some(reader.read_i32()?),
                _ => reader.skip(field_type)?,
            }
        }
        reader.read_struct_end();

        let missing = || Error::InvalidMetadata("column metadata missing a required field".into());
        Ok(Self {
            type_: type_.ok_or_else(missing)?,
            encodings: encodings.ok_or_else(missing)?,
            path_in_schema: path_in_schema.ok_or_else(missing)?,
            codec: codec.ok_or_else(missing)?,
            num_values: num_values.ok_or_else(missing)?,
            total_uncompressed_size: total_uncompressed_size.ok_or_else(missing)?,
            total_compressed_size: total_compressed_size.ok_or_else(missing)?,
            key_value_metadata,
            data_page_offset: data_page_offset.ok_or_else(missing)?,
            index_page_offset,
            dictionary_page_offset,
            statistics,
            encoding_stats,
            bloom_filter_offset,
            bloom_filter_length,
        })
    }

    pub fn write_to<W: Write>(&self, writer: &mut CompactWriter<W>) -> Result<()> {
        writer.write_struct_begin();
        writer.write_field_header(wire::I32, 1)?;
        writer.write_i32(self.type_.0)?;
        writer.write_field_header(wire::LIST, 2)?;
        writer.write_list_header(wire::I32, self.encodings.len())?;
        for encoding in &self.encodings {
            writer.write_i32(encoding.0)?;
        }
        writer.write_field_header(wire::LIST, 3)?;
        writer.write_list_header(wire::BINARY, self.path_in_schema.len())?;
        for element in &self.path_in_schema {
            writer.write_string(element)?;
        }
        writer.write_field_header(wire::I32, 4)?;
        writer.write_i32(self.codec.0)?;
        writer.write_field_header(wire::I64, 5)?;
        writer.write_i64(self.num_values)?;
        writer.write_field_header(wire::I64, 6)?;
        writer.write_i64(self.total_uncompressed_size)?;
        writer.write_field_header(wire::I64, 7)?;
        writer.write_i64(self.total_compressed_size)?;
        if let Some(key_value_metadata) = &self.key_value_metadata {
            writer.write_field_header(wire::LIST, 8)?;
            writer.write_list_header(wire::STRUCT, key_value_metadata.len())?;
            for key_value in key_value_metadata {
                key_value.write_to(writer)?;
            }
        }
        writer.write_field_header(wire::I64, 9)?;
        writer.write_i64(self.data_page_offset)?;
        if let Some(offset) = self.index_page_offset {
            writer.write_field_header(wire::I64, 10)?;
            writer.write_i64(offset)?;
        }
        if let Some(offset) = self.dictionary_page_offset {
            writer.write_field_header(wire::I64, 11)?;
            writer.write_i64(offset)?;
        }
        if let Some(statistics) = &self.statistics {
            writer.write_field_header(wire::STRUCT, 12)?;
            statistics.write_to(writer)?;
        }
        if let Some(encoding_stats) = &self.encoding_stats {
            writer.write_field_header(wire::LIST, 13)?;
            writer.write_list_header(wire::STRUCT, encoding_stats.len())?;
            for stats in encoding_stats {
                stats.write_to(writer)?;
            }
        }
        if let Some(offset) = self.bloom_filter_offset {
            writer.write_field_header(wire::I64, 14)?;
            writer.write_i64(offset)?;
        }
        if let Some(length) = self.bloom_filter_length {
            writer.write_field_header(wire::I32, 15)?;
            writer.write_i32(length)?;
        }
        writer.write_struct_end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnChunk {
    pub file_path: Option<String>,
    pub file_offset: i64,
    pub meta_data: Option<ColumnMetaData>,
    pub offset_index_offset: Option<i64>,
    pub offset_index_length: Option<i32>,
    pub column_index_offset: Option<i64>,
    pub column_index_length: Option<i32>,
}

impl ColumnChunk {
    pub fn read_from<R: Read>(reader: &mut CompactReader<R>) -> Result<Self> {
        let mut file_path = None;
        let mut file_offset = None;
        let mut meta_data = None;
        let mut offset_index_offset = None;
        let mut offset_index_length = None;
        let mut column_index_offset = None;
        let mut column_index_length = None;

        reader.read_struct_begin()?;
        while let Some((field_type, id)) = reader.read_field_header()? {
            match id {
                1 => file_path = Some(reader.read_string()?),
                2 => file_offset = Some(reader.read_i64()?),
                3 => meta_data = Some(ColumnMetaData::read_from(reader)?),
                4 => offset_index_offset = Some(reader.read_i64()?),
                5 => offset_index_length = Some(reader.read_i32()?),
                6 => column_index_offset = Some(reader.read_i64()?),
                7 => column_index_length = Some(reader.read_i32()?),
                _ => reader.skip(field_type)?,
            }
        }
        reader.read_struct_end();

        Ok(Self {
            file_path,
            file_offset: file_offset.ok_or_else(|| {
                Error::InvalidMetadata("column chunk without a file offset".into())
            })?,
            meta_data,
            offset_index_offset,
            offset_index_length,
            column_index_offset,
            column_index_length,
        })
    }

    pub fn write_to<W: Write>(&self, writer: &mut CompactWriter<W>) -> Result<()> {
        writer.write_struct_begin();
        if let Some(file_path) = &self.file_path {
            writer.write_field_header(wire::BINARY, 1)?;
            writer.write_string(file_path)?;
        }
        writer.write_field_header(wire::I64, 2)?;
        writer.write_i64(self.file_offset)?;
        if let Some(meta_data) = &self.meta_data {
            writer.write_field_header(wire::STRUCT, 3)?;
            meta_data.write_to(writer)?;
        }
        if let Some(offset) = self.offset_index_offset {
            writer.write_field_header(wire::I64, 4)?;
            writer.write_i64(offset)?;
        }
        if let Some(length) = self.offset_index_length {
            writer.write_field_header(wire::I32, 5)?;
            writer.write_i32(length)?;
        }
        if let Some(offset) = self.column_index_offset {
            writer.write_field_header(wire::I64, 6)?;
            writer.write_i64(offset)?;
        }
        if let Some(length) = self.column_index_length {
            writer.write_field_header(wire::I32, 7)?;
            writer.write_i32(length)?;
        }
        writer.write_struct_end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowGroup {
    pub columns: Vec<ColumnChunk>,
    pub total_byte_size: i64,
    pub num_rows: i64,
    pub sorting_columns: Option<Vec<SortingColumn>>,
    pub file_offset: Option<i64>,
    pub total_compressed_size: Option<i64>,
    pub ordinal: Option<i16>,
}

impl RowGroup {
    fn read_from<R: Read>(reader: &mut CompactReader<R>) -> Result<Self> {
        let mut columns = None;
        let mut total_byte_size = None;
        let mut num_rows = None;
        let mut sorting_columns = None;
        let mut file_offset = None;
        let mut total_compressed_size = None;
        let mut ordinal = None;

        reader.read_struct_begin()?;
        while let Some((field_type, id)) = reader.read_field_header()? {
            match id {
                1 => {
                    let (_, count) = reader.read_list_header()?;
                    check_cap(count, MAX_COLUMNS_PER_ROW_GROUP, "a row group's column list")?;
                    let mut values = Vec::with_capacity(count);
                    for _ in 0..count {
                        values.push(ColumnChunk::read_from(reader)?);
                    }
                    columns = Some(values);
                }
                2 => total_byte_size = Some(reader.read_i64()?),
                3 => num_rows = Some(reader.read_i64()?),
                4 => {
                    let (_, count) = reader.read_list_header()?;
                    check_cap(count, MAX_COLUMNS_PER_ROW_GROUP, "a row group's sorting columns")?;
                    let mut values = Vec::with_capacity(count);
                    for _ in 0..count {
                        values.push(SortingColumn::read_from(reader)?);
                    }
                    sorting_columns = Some(values);
                }
                5 => file_offset = Some(reader.read_i64()?),
                6 => total_compressed_size = Some(reader.read_i64()?),
                7 => ordinal = Some(reader.read_i16()?),
                _ => reader.skip(field_type)?,
            }
        }
        reader.read_struct_end();

        let missing = || Error::InvalidMetadata("row group missing a required field".into());
        Ok(Self {
            columns: columns.ok_or_else(missing)?,
            total_byte_size: total_byte_size.ok_or_else(missing)?,
            num_rows: num_rows.ok_or_else(missing)?,
            sorting_columns,
            file_offset,
            total_compressed_size,
            ordinal,
        })
    }

    fn write_to<W: Write>(&self, writer: &mut CompactWriter<W>) -> Result<()> {
        writer.write_struct_begin();
        writer.write_field_header(wire::LIST, 1)?;
        writer.write_list_header(wire::STRUCT, self.columns.len())?;
        for column in &self.columns {
            column.write_to(writer)?;
        }
        writer.write_field_header(wire::I64, 2)?;
        writer.write_i64(self.total_byte_size)?;
        writer.write_field_header(wire::I64, 3)?;
        writer.write_i64(self.num_rows)?;
        if let Some(sorting_columns) = &self.sorting_columns {
            writer.write_field_header(wire::LIST, 4)?;
            writer.write_list_header(wire::STRUCT, sorting_columns.len())?;
            for sorting_column in sorting_columns {
                sorting_column.write_to(writer)?;
            }
        }
        if let Some(file_offset) = self.file_offset {
            writer.write_field_header(wire::I64, 5)?;
            writer.write_i64(file_offset)?;
        }
        if let Some(size) = self.total_compressed_size {
            writer.write_field_header(wire::I64, 6)?;
            writer.write_i64(size)?;
        }
        if let Some(ordinal) = self.ordinal {
            writer.write_field_header(wire::I16, 7)?;
            writer.write_i16(ordinal)?;
        }
        writer.write_struct_end()
    }
}

/// Sort order of a column, a union with a single empty variant.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnOrder {
    TYPE_ORDER,
}

impl ColumnOrder {
    fn read_from<R: Read>(reader: &mut CompactReader<R>) -> Result<Self> {
        read_empty_struct(reader)?;
        Ok(ColumnOrder::TYPE_ORDER)
    }

    fn write_to<W: Write>(&self, writer: &mut CompactWriter<W>) -> Result<()> {
        writer.write_struct_begin();
        writer.write_field_header(wire::STRUCT, 1)?;
        write_empty_struct(writer)?;
        writer.write_struct_end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetaData {
    pub version: i32,
    pub schema: Vec<SchemaElement>,
    pub num_rows: i64,
    pub row_groups: Vec<RowGroup>,
    pub key_value_metadata: Option<Vec<KeyValue>>,
    pub created_by: Option<String>,
    pub column_orders: Option<Vec<ColumnOrder>>,
}

impl FileMetaData {
    pub fn read_from<R: Read>(reader: &mut CompactReader<R>) -> Result<Self> {
        let mut version = None;
        let mut schema = None;
        let mut num_rows = None;
        let mut row_groups = None;
        let mut key_value_metadata = None;
        let mut created_by = None;
        let mut column_orders = None;

        reader.read_struct_begin()?;
        while let Some((field_type, id)) = reader.read_field_header()? {
            match id {
                1 => version = Some(reader.read_i32()?),
                2 => {
                    let (_, count) = reader.read_list_header()?;
                    check_cap(count, MAX_SCHEMA_ELEMENTS, "the schema")?;
                    let mut values = Vec::with_capacity(count);
                    for _ in 0..count {
                        values.push(SchemaElement::read_from(reader)?);
                    }
                    schema = Some(values);
                }
                3 => num_rows = Some(reader.read_i64()?),
                4 => {
                    let (_, count) = reader.read_list_header()?;
                    check_cap(count, MAX_ROW_GROUPS, "the row group list")?;
                    let mut values = Vec::with_capacity(count);
                    for _ in 0..count {
                        values.push(RowGroup::read_from(reader)?);
                    }
                    row_groups = Some(values);
                }
                5 => {
                    let (_, count) = reader.read_list_header()?;
                    check_cap(count, MAX_KEY_VALUE_PAIRS, "the key/value metadata")?;
                    let mut values = Vec::with_capacity(count);
                    for _ in 0..count {
                        values.push(KeyValue::read_from(reader)?);
                    }
                    key_value_metadata = Some(values);
                }
                6 => created_by = Some(reader.read_string()?),
                7 => {
                    let (_, count) = reader.read_list_header()?;
                    check_cap(count, MAX_SCHEMA_ELEMENTS, "the column orders")?;
                    let mut values = Vec::with_capacity(count);
                    for _ in 0..count {
                        values.push(ColumnOrder::read_from(reader)?);
                    }
                    column_orders = Some(values);
                }
                _ => reader.skip(field_type)?,
            }
        }
        reader.read_struct_end();

        let missing = || Error::InvalidMetadata("file metadata missing a required field".into());
        Ok(Self {
            version: version.ok_or_else(missing)?,
            schema: schema.ok_or_else(missing)?,
            num_rows: num_rows.ok_or_else(missing)?,
            row_groups: row_groups.ok_or_else(missing)?,
            key_value_metadata,
            created_by,
            column_orders,
        })
    }

    pub fn write_to<W: Write>(&self, writer: &mut CompactWriter<W>) -> Result<()> {
        writer.write_struct_begin();
        writer.write_field_header(wire::I32, 1)?;
        writer.write_i32(self.version)?;
        writer.write_field_header(wire::LIST, 2)?;
        writer.write_list_header(wire::STRUCT, self.schema.len())?;
        for element in &self.schema {
            element.write_to(writer)?;
        }
        writer.write_field_header(wire::I64, 3)?;
        writer.write_i64(self.num_rows)?;
        writer.write_field_header(wire::LIST, 4)?;
        writer.write_list_header(wire::STRUCT, self.row_groups.len())?;
        for row_group in &self.row_groups {
            row_group.write_to(writer)?;
        }
        if let Some(key_value_metadata) = &self.key_value_metadata {
            writer.write_field_header(wire::LIST, 5)?;
            writer.write_list_header(wire::STRUCT, key_value_metadata.len())?;
            for key_value in key_value_metadata {
                key_value.write_to(writer)?;
            }
        }
        if let Some(created_by) = &self.created_by {
            writer.write_field_header(wire::BINARY, 6)?;
            writer.write_string(created_by)?;
        }
        if let Some(column_orders) = &self.column_orders {
            writer.write_field_header(wire::LIST, 7)?;
            writer.write_list_header(wire::STRUCT, column_orders.len())?;
            for column_order in column_orders {
                column_order.write_to(writer)?;
            }
        }
        writer.write_struct_end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLocation {
    /// Absolute offset of the page (header included) in the file.
    pub offset: i64,
    pub compressed_page_size: i32,
    pub first_row_index: i64,
}

impl PageLocation {
    fn read_from<R: Read>(reader: &mut CompactReader<R>) -> Result<Self> {
        let mut offset = None;
        let mut compressed_page_size = None;
        let mut first_row_index = None;
        reader.read_struct_begin()?;
        while let Some((field_type, id)) = reader.read_field_header()? {
            match id {
                1 => offset = Some(reader.read_i64()?),
                2 => compressed_page_size = Some(reader.read_i32()?),
                3 => first_row_index = Some(reader.read_i64()?),
                _ => reader.skip(field_type)?,
            }
        }
        reader.read_struct_end();
        let missing = || Error::InvalidMetadata("page location missing a required field".into());
        Ok(Self {
            offset: offset.ok_or_else(missing)?,
            compressed_page_size: compressed_page_size.ok_or_else(missing)?,
            first_row_index: first_row_index.ok_or_else(missing)?,
        })
    }

    fn write_to<W: Write>(&self, writer: &mut CompactWriter<W>) -> Result<()> {
        writer.write_struct_begin();
        writer.write_field_header(wire::I64, 1)?;
        writer.write_i64(self.offset)?;
        writer.write_field_header(wire::I32, 2)?;
        writer.write_i32(self.compressed_page_size)?;
        writer.write_field_header(wire::I64, 3)?;
        writer.write_i64(self.first_row_index)?;
        writer.write_struct_end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetIndex {
    pub page_locations: Vec<PageLocation>,
}

impl OffsetIndex {
    pub fn read_from<R: Read>(reader: &mut CompactReader<R>) -> Result<Self> {
        let mut page_locations = None;
        reader.read_struct_begin()?;
        while let Some((field_type, id)) = reader.read_field_header()? {
            match id {
                1 => {
                    let (_, count) = reader.read_list_header()?;
                    let mut values = Vec::with_capacity(count);
                    for _ in 0..count {
                        values.push(PageLocation::read_from(reader)?);
                    }
                    page_locations = Some(values);
                }
                _ => reader.skip(field_type)?,
            }
        }
        reader.read_struct_end();
        Ok(Self {
            page_locations: page_locations.ok_or_else(|| {
                Error::InvalidMetadata("offset index without page locations".into())
            })?,
        })
    }

    pub fn write_to<W: Write>(&self, writer: &mut CompactWriter<W>) -> Result<()> {
        writer.write_struct_begin();
        writer.write_field_header(wire::LIST, 1)?;
        writer.write_list_header(wire::STRUCT, self.page_locations.len())?;
        for location in &self.page_locations {
            location.write_to(writer)?;
        }
        writer.write_struct_end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnIndex {
    pub null_pages: Vec<bool>,
    pub min_values: Vec<Vec<u8>>,
    pub max_values: Vec<Vec<u8>>,
    pub boundary_order: BoundaryOrder,
    pub null_counts: Option<Vec<i64>>,
}

impl ColumnIndex {
    pub fn read_from<R: Read>(reader: &mut CompactReader<R>) -> Result<Self> {
        let mut null_pages = None;
        let mut min_values = None;
        let mut max_values = None;
        let mut boundary_order = None;
        let mut null_counts = None;

        reader.read_struct_begin()?;
        while let Some((field_type, id)) = reader.read_field_header()? {
            match id {
                1 => {
                    let (_, count) = reader.read_list_header()?;
                    let mut values = Vec::with_capacity(count);
                    for _ in 0..count {
                        values.push(reader.read_bool()?);
                    }
                    null_pages = Some(values);
                }
                2 => {
                    let (_, count) = reader.read_list_header()?;
                    let mut values = Vec::with_capacity(count);
                    for _ in 0..count {
                        values.push(reader.read_binary()?);
                    }
                    min_values = Some(values);
                }
                3 => {
                    let (_, count) = reader.read_list_header()?;
                    let mut values = Vec::with_capacity(count);
                    for _ in 0..count {
                        values.push(reader.read_binary()?);
                    }
                    max_values = Some(values);
                }
                4 => boundary_order = Some(BoundaryOrder(reader.read_i32()?)),
                5 => {
                    let (_, count) = reader.read_list_header()?;
                    let mut values = Vec::with_capacity(count);
                    for _ in 0..count {
                        values.push(reader.read_i64()?);
                    }
                    null_counts = Some(values);
                }
                _ => reader.skip(field_type)?,
            }
        }
        reader.read_struct_end();

        let missing = || Error::InvalidMetadata("column index missing a required field".into());
        Ok(Self {
            null_pages: null_pages.ok_or_else(missing)?,
            min_values: min_values.ok_or_else(missing)?,
            max_values: max_values.ok_or_else(missing)?,
            boundary_order: boundary_order.ok_or_else(missing)?,
            null_counts,
        })
    }

    pub fn write_to<W: Write>(&self, writer: &mut CompactWriter<W>) -> Result<()> {
        writer.write_struct_begin();
        writer.write_field_header(wire::LIST, 1)?;
        writer.write_list_header(wire::BOOLEAN_TRUE, self.null_pages.len())?;
        for is_null in &self.null_pages {
            writer.write_bool(*is_null)?;
        }
        writer.write_field_header(wire::LIST, 2)?;
        writer.write_list_header(wire::BINARY, self.min_values.len())?;
        for min in &self.min_values {
            writer.write_binary(min)?;
        }
        writer.write_field_header(wire::LIST, 3)?;
        writer.write_list_header(wire::BINARY, self.max_values.len())?;
        for max in &self.max_values {
            writer.write_binary(max)?;
        }
        writer.write_field_header(wire::I32, 4)?;
        writer.write_i32(self.boundary_order.0)?;
        if let Some(null_counts) = &self.null_counts {
            writer.write_field_header(wire::LIST, 5)?;
            writer.write_list_header(wire::I64, null_counts.len())?;
            for null_count in null_counts {
                writer.write_i64(*null_count)?;
            }
        }
        writer.write_struct_end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip_file_metadata(metadata: &FileMetaData) -> Result<FileMetaData> {
        let mut writer = CompactWriter::new(vec![]);
        metadata.write_to(&mut writer)?;
        let data = writer.into_inner();
        let mut reader = CompactReader::new(data.as_slice(), data.len());
        FileMetaData::read_from(&mut reader)
    }

    fn minimal_metadata() -> FileMetaData {
        FileMetaData {
            version: 2,
            schema: vec![
                SchemaElement {
                    type_: None,
                    type_length: None,
                    repetition_type: None,
                    name: "schema".to_string(),
                    num_children: Some(1),
                    converted_type: None,
                    scale: None,
                    precision: None,
                    field_id: None,
                    logical_type: None,
                },
                SchemaElement {
                    type_: Some(Type::INT32),
                    type_length: None,
                    repetition_type: Some(FieldRepetitionType::OPTIONAL),
                    name: "col".to_string(),
                    num_children: None,
                    converted_type: Some(ConvertedType::INT_32),
                    scale: None,
                    precision: None,
                    field_id: Some(42),
                    logical_type: Some(LogicalType::INTEGER {
                        bit_width: 32,
                        is_signed: true,
                    }),
                },
            ],
            num_rows: 10,
            row_groups: vec![],
            key_value_metadata: Some(vec![KeyValue::new(
                "writer".to_string(),
                Some("tests".to_string()),
            )]),
            created_by: Some("tests".to_string()),
            column_orders: Some(vec![ColumnOrder::TYPE_ORDER]),
        }
    }

    #[test]
    fn file_metadata_round_trip() -> Result<()> {
        let metadata = minimal_metadata();
        assert_eq!(roundtrip_file_metadata(&metadata)?, metadata);
        Ok(())
    }

    #[test]
    fn logical_types_round_trip() -> Result<()> {
        for logical_type in [
            LogicalType::STRING,
            LogicalType::DECIMAL {
                scale: 2,
                precision: 18,
            },
            LogicalType::TIMESTAMP {
                is_adjusted_to_u_t_c: true,
                unit: TimeUnit::MICROS,
            },
            LogicalType::TIME {
                is_adjusted_to_u_t_c: false,
                unit: TimeUnit::NANOS,
            },
            LogicalType::INTEGER {
                bit_width: 16,
                is_signed: false,
            },
            LogicalType::UUID,
            LogicalType::FLOAT16,
        ] {
            let mut writer = CompactWriter::new(vec![]);
            logical_type.write_to(&mut writer)?;
            let data = writer.into_inner();
            let mut reader = CompactReader::new(data.as_slice(), data.len());
            assert_eq!(LogicalType::read_from(&mut reader)?, logical_type);
        }
        Ok(())
    }

    #[test]
    fn page_header_round_trip() -> Result<()> {
        let header = PageHeader {
            type_: PageType::DATA_PAGE,
            uncompressed_page_size: 100,
            compressed_page_size: 60,
            crc: Some(0x1234_5678),
            data_page_header: Some(DataPageHeader {
                num_values: 10,
                encoding: Encoding::PLAIN,
                definition_level_encoding: Encoding::RLE,
                repetition_level_encoding: Encoding::RLE,
                statistics: Some(Statistics {
                    null_count: Some(3),
                    min_value: Some(vec![1, 0, 0, 0]),
                    max_value: Some(vec![9, 0, 0, 0]),
                    ..Default::default()
                }),
            }),
            dictionary_page_header: None,
            data_page_header_v2: None,
        };

        let mut writer = CompactWriter::new(vec![]);
        header.write_to(&mut writer)?;
        let data = writer.into_inner();
        let mut reader = CompactReader::new(data.as_slice(), data.len());
        assert_eq!(PageHeader::read_from(&mut reader)?, header);
        Ok(())
    }

    #[test]
    fn unknown_fields_are_skipped() -> Result<()> {
        // KeyValue with an extra field id 5 the reader does not know
        let mut writer = CompactWriter::new(vec![]);
        writer.write_struct_begin();
        writer.write_field_header(wire::BINARY, 1)?;
        writer.write_string("key")?;
        writer.write_field_header(wire::I64, 5)?;
        writer.write_i64(12)?;
        writer.write_struct_end()?;
        let data = writer.into_inner();

        let mut reader = CompactReader::new(data.as_slice(), data.len());
        let key_value = KeyValue::read_from(&mut reader)?;
        assert_eq!(key_value, KeyValue::new("key".to_string(), None));
        Ok(())
    }

    #[test]
    fn indexes_round_trip() -> Result<()> {
        let column_index = ColumnIndex {
            null_pages: vec![false, true],
            min_values: vec![vec![1, 0, 0, 0], vec![]],
            max_values: vec![vec![9, 0, 0, 0], vec![]],
            boundary_order: BoundaryOrder::ASCENDING,
            null_counts: Some(vec![0, 10]),
        };
        let mut writer = CompactWriter::new(vec![]);
        column_index.write_to(&mut writer)?;
        let data = writer.into_inner();
        let mut reader = CompactReader::new(data.as_slice(), data.len());
        assert_eq!(ColumnIndex::read_from(&mut reader)?, column_index);

        let offset_index = OffsetIndex {
            page_locations: vec![PageLocation {
                offset: 4,
                compressed_page_size: 100,
                first_row_index: 0,
            }],
        };
        let mut writer = CompactWriter::new(vec![]);
        offset_index.write_to(&mut writer)?;
        let data = writer.into_inner();
        let mut reader = CompactReader::new(data.as_slice(), data.len());
        assert_eq!(OffsetIndex::read_from(&mut reader)?, offset_index);
        Ok(())
    }

    #[test]
    fn oversized_schema_is_rejected() -> Result<()> {
        let mut writer = CompactWriter::new(vec![]);
        writer.write_struct_begin();
        writer.write_field_header(wire::I32, 1)?;
        writer.write_i32(2)?;
        writer.write_field_header(wire::LIST, 2)?;
        // claim far more elements than the stream (or the cap) allows
        writer.write_list_header(wire::STRUCT, 1_000_000)?;
        let mut data = writer.into_inner();
        data.resize(data.len() + 2_000_000, 0);

        let mut reader = CompactReader::new(data.as_slice(), data.len());
        let result = FileMetaData::read_from(&mut reader);
        assert!(matches!(result, Err(Error::InvalidMetadata(_))));
        Ok(())
    }
}
