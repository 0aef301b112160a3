//! Wire-level structures of the parquet footer and page headers.
//!
//! Field ids and enum values follow `parquet.thrift`. Only the fields we make
//! use of are modeled, everything else is skipped when reading.
//!
//! Enums are kept as thin wrappers around the raw `i32` so that values
//! written by newer writers still decode. Conversion into the logical types
//! in [`crate::types`] is where unknown values get rejected.

use thrift::protocol::{
    field_id,
    verify_required_field_exists,
    TInputProtocol,
    TOutputProtocol,
    TStructIdentifier,
    TType,
};

use crate::thrift_ext::{
    impl_struct_list_element,
    protocol_error,
    read_empty_struct,
    read_list,
    write_empty_struct,
    write_field,
    write_list,
    ListElement,
    TSerializable,
};

macro_rules! thrift_enum {
    ($name:ident { $($variant:ident = $val:expr),* $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub i32);

        #[allow(non_upper_case_globals)]
        impl $name {
            $(pub const $variant: $name = $name($val);)*
        }

        impl ListElement for $name {
            const ELEMENT_TYPE: TType = TType::I32;

            fn read_element<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<Self> {
                Ok($name(i_prot.read_i32()?))
            }

            fn write_element<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()> {
                o_prot.write_i32(self.0)
            }
        }
    };
}

thrift_enum!(Type {
    BOOLEAN = 0,
    INT32 = 1,
    INT64 = 2,
    INT96 = 3,
    FLOAT = 4,
    DOUBLE = 5,
    BYTE_ARRAY = 6,
    FIXED_LEN_BYTE_ARRAY = 7,
});

thrift_enum!(ConvertedType {
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
});

thrift_enum!(FieldRepetitionType {
    REQUIRED = 0,
    OPTIONAL = 1,
    REPEATED = 2,
});

thrift_enum!(Encoding {
    PLAIN = 0,
    PLAIN_DICTIONARY = 2,
    RLE = 3,
    BIT_PACKED = 4,
    DELTA_BINARY_PACKED = 5,
    DELTA_LENGTH_BYTE_ARRAY = 6,
    DELTA_BYTE_ARRAY = 7,
    RLE_DICTIONARY = 8,
    BYTE_STREAM_SPLIT = 9,
});

thrift_enum!(CompressionCodec {
    UNCOMPRESSED = 0,
    SNAPPY = 1,
    GZIP = 2,
    LZO = 3,
    BROTLI = 4,
    LZ4 = 5,
    ZSTD = 6,
    LZ4_RAW = 7,
});

thrift_enum!(PageType {
    DATA_PAGE = 0,
    INDEX_PAGE = 1,
    DICTIONARY_PAGE = 2,
    DATA_PAGE_V2 = 3,
});

thrift_enum!(BoundaryOrder {
    UNORDERED = 0,
    ASCENDING = 1,
    DESCENDING = 2,
});

impl_struct_list_element!(
    SchemaElement,
    KeyValue,
    PageEncodingStats,
    ColumnChunk,
    RowGroup,
    ColumnOrder,
    PageLocation,
);

/// Begin reading a struct, returning the next field id or `None` on stop.
fn next_field<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<Option<(i16, TType)>> {
    let field_ident = i_prot.read_field_begin()?;
    if field_ident.field_type == TType::Stop {
        return Ok(None);
    }
    let id = field_id(&field_ident)?;
    Ok(Some((id, field_ident.field_type)))
}

/// Column statistics as stored in the footer and in page headers.
///
/// `min`/`max` are the deprecated sort-order-agnostic values, newer writers
/// use `min_value`/`max_value`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    pub max: Option<Vec<u8>>,
    pub min: Option<Vec<u8>>,
    pub null_count: Option<i64>,
    pub distinct_count: Option<i64>,
    pub max_value: Option<Vec<u8>>,
    pub min_value: Option<Vec<u8>>,
}

impl TSerializable for Statistics {
    fn read_from_in_protocol<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<Self> {
        i_prot.read_struct_begin()?;
        let mut stats = Statistics::default();
        while let Some((id, field_type)) = next_field(i_prot)? {
            match id {
                1 => stats.max = Some(i_prot.read_bytes()?),
                2 => stats.min = Some(i_prot.read_bytes()?),
                3 => stats.null_count = Some(i_prot.read_i64()?),
                4 => stats.distinct_count = Some(i_prot.read_i64()?),
                5 => stats.max_value = Some(i_prot.read_bytes()?),
                6 => stats.min_value = Some(i_prot.read_bytes()?),
                _ => i_prot.skip(field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        Ok(stats)
    }

    fn write_to_out_protocol<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()> {
        o_prot.write_struct_begin(&TStructIdentifier::new("Statistics"))?;
        if let Some(v) = &self.max {
            write_field(o_prot, "max", TType::String, 1, |p| p.write_bytes(v))?;
        }
        if let Some(v) = &self.min {
            write_field(o_prot, "min", TType::String, 2, |p| p.write_bytes(v))?;
        }
        if let Some(v) = self.null_count {
            write_field(o_prot, "null_count", TType::I64, 3, |p| p.write_i64(v))?;
        }
        if let Some(v) = self.distinct_count {
            write_field(o_prot, "distinct_count", TType::I64, 4, |p| p.write_i64(v))?;
        }
        if let Some(v) = &self.max_value {
            write_field(o_prot, "max_value", TType::String, 5, |p| p.write_bytes(v))?;
        }
        if let Some(v) = &self.min_value {
            write_field(o_prot, "min_value", TType::String, 6, |p| p.write_bytes(v))?;
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Millis,
    Micros,
    Nanos,
}

impl TSerializable for TimeUnit {
    fn read_from_in_protocol<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<Self> {
        i_prot.read_struct_begin()?;
        let mut unit = None;
        while let Some((id, field_type)) = next_field(i_prot)? {
            match id {
                1 => {
                    read_empty_struct(i_prot)?;
                    unit = Some(TimeUnit::Millis);
                }
                2 => {
                    read_empty_struct(i_prot)?;
                    unit = Some(TimeUnit::Micros);
                }
                3 => {
                    read_empty_struct(i_prot)?;
                    unit = Some(TimeUnit::Nanos);
                }
                _ => i_prot.skip(field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        unit.ok_or_else(|| protocol_error("received empty union from remote TimeUnit"))
    }

    fn write_to_out_protocol<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()> {
        o_prot.write_struct_begin(&TStructIdentifier::new("TimeUnit"))?;
        match self {
            Self::Millis => write_field(o_prot, "MILLIS", TType::Struct, 1, |p| {
                write_empty_struct(p, "MilliSeconds")
            })?,
            Self::Micros => write_field(o_prot, "MICROS", TType::Struct, 2, |p| {
                write_empty_struct(p, "MicroSeconds")
            })?,
            Self::Nanos => write_field(o_prot, "NANOS", TType::Struct, 3, |p| {
                write_empty_struct(p, "NanoSeconds")
            })?,
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

/// Reads the `{isAdjustedToUTC, unit}` struct shared by TIME and TIMESTAMP.
fn read_time_like<T: TInputProtocol>(i_prot: &mut T, name: &str) -> thrift::Result<(bool, TimeUnit)> {
    i_prot.read_struct_begin()?;
    let mut f_1 = None;
    let mut f_2 = None;
    while let Some((id, field_type)) = next_field(i_prot)? {
        match id {
            1 => f_1 = Some(i_prot.read_bool()?),
            2 => f_2 = Some(TimeUnit::read_from_in_protocol(i_prot)?),
            _ => i_prot.skip(field_type)?,
        }
        i_prot.read_field_end()?;
    }
    i_prot.read_struct_end()?;
    verify_required_field_exists(&format!("{name}.isAdjustedToUTC"), &f_1)?;
    verify_required_field_exists(&format!("{name}.unit"), &f_2)?;
    Ok((f_1.unwrap_or_default(), f_2.unwrap_or(TimeUnit::Millis)))
}

fn write_time_like<T: TOutputProtocol>(
    o_prot: &mut T,
    name: &'static str,
    is_adjusted_to_utc: bool,
    unit: &TimeUnit,
) -> thrift::Result<()> {
    o_prot.write_struct_begin(&TStructIdentifier::new(name))?;
    write_field(o_prot, "isAdjustedToUTC", TType::Bool, 1, |p| {
        p.write_bool(is_adjusted_to_utc)
    })?;
    write_field(o_prot, "unit", TType::Struct, 2, |p| unit.write_to_out_protocol(p))?;
    o_prot.write_field_stop()?;
    o_prot.write_struct_end()
}

/// Logical type annotation union.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalType {
    String,
    Map,
    List,
    Enum,
    Decimal { scale: i32, precision: i32 },
    Date,
    Time { is_adjusted_to_utc: bool, unit: TimeUnit },
    Timestamp { is_adjusted_to_utc: bool, unit: TimeUnit },
    Integer { bit_width: i8, is_signed: bool },
    Unknown,
    Json,
    Bson,
    Uuid,
    Float16,
}

impl LogicalType {
    /// Read the union, returning `None` if its member isn't one we know of.
    fn read_union<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<Option<Self>> {
        i_prot.read_struct_begin()?;
        let mut ret = None;
        while let Some((id, field_type)) = next_field(i_prot)? {
            let val = match id {
                1 => Some(Self::String),
                2 => Some(Self::Map),
                3 => Some(Self::List),
                4 => Some(Self::Enum),
                6 => Some(Self::Date),
                11 => Some(Self::Unknown),
                12 => Some(Self::Json),
                13 => Some(Self::Bson),
                14 => Some(Self::Uuid),
                15 => Some(Self::Float16),
                _ => None,
            };
            match (id, val) {
                (_, Some(val)) => {
                    read_empty_struct(i_prot)?;
                    ret = Some(val);
                }
                (5, None) => {
                    i_prot.read_struct_begin()?;
                    let mut scale = None;
                    let mut precision = None;
                    while let Some((id, field_type)) = next_field(i_prot)? {
                        match id {
                            1 => scale = Some(i_prot.read_i32()?),
                            2 => precision = Some(i_prot.read_i32()?),
                            _ => i_prot.skip(field_type)?,
                        }
                        i_prot.read_field_end()?;
                    }
                    i_prot.read_struct_end()?;
                    verify_required_field_exists("DecimalType.scale", &scale)?;
                    verify_required_field_exists("DecimalType.precision", &precision)?;
                    ret = Some(Self::Decimal {
                        scale: scale.unwrap_or_default(),
                        precision: precision.unwrap_or_default(),
                    });
                }
                (7, None) => {
                    let (is_adjusted_to_utc, unit) = read_time_like(i_prot, "TimeType")?;
                    ret = Some(Self::Time {
                        is_adjusted_to_utc,
                        unit,
                    });
                }
                (8, None) => {
                    let (is_adjusted_to_utc, unit) = read_time_like(i_prot, "TimestampType")?;
                    ret = Some(Self::Timestamp {
                        is_adjusted_to_utc,
                        unit,
                    });
                }
                (10, None) => {
                    i_prot.read_struct_begin()?;
                    let mut bit_width = None;
                    let mut is_signed = None;
                    while let Some((id, field_type)) = next_field(i_prot)? {
                        match id {
                            1 => bit_width = Some(i_prot.read_i8()?),
                            2 => is_signed = Some(i_prot.read_bool()?),
                            _ => i_prot.skip(field_type)?,
                        }
                        i_prot.read_field_end()?;
                    }
                    i_prot.read_struct_end()?;
                    verify_required_field_exists("IntType.bitWidth", &bit_width)?;
                    verify_required_field_exists("IntType.isSigned", &is_signed)?;
                    ret = Some(Self::Integer {
                        bit_width: bit_width.unwrap_or_default(),
                        is_signed: is_signed.unwrap_or_default(),
                    });
                }
                _ => i_prot.skip(field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        Ok(ret)
    }
}

impl TSerializable for LogicalType {
    fn read_from_in_protocol<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<Self> {
        Self::read_union(i_prot)?
            .ok_or_else(|| protocol_error("received empty union from remote LogicalType"))
    }

    fn write_to_out_protocol<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()> {
        o_prot.write_struct_begin(&TStructIdentifier::new("LogicalType"))?;
        let empty = |o_prot: &mut T, name: &'static str, id: i16, struct_name: &'static str| {
            write_field(o_prot, name, TType::Struct, id, |p| {
                write_empty_struct(p, struct_name)
            })
        };
        match self {
            Self::String => empty(o_prot, "STRING", 1, "StringType")?,
            Self::Map => empty(o_prot, "MAP", 2, "MapType")?,
            Self::List => empty(o_prot, "LIST", 3, "ListType")?,
            Self::Enum => empty(o_prot, "ENUM", 4, "EnumType")?,
            Self::Decimal { scale, precision } => {
                write_field(o_prot, "DECIMAL", TType::Struct, 5, |p| {
                    p.write_struct_begin(&TStructIdentifier::new("DecimalType"))?;
                    write_field(p, "scale", TType::I32, 1, |p| p.write_i32(*scale))?;
                    write_field(p, "precision", TType::I32, 2, |p| p.write_i32(*precision))?;
                    p.write_field_stop()?;
                    p.write_struct_end()
                })?
            }
            Self::Date => empty(o_prot, "DATE", 6, "DateType")?,
            Self::Time {
                is_adjusted_to_utc,
                unit,
            } => write_field(o_prot, "TIME", TType::Struct, 7, |p| {
                write_time_like(p, "TimeType", *is_adjusted_to_utc, unit)
            })?,
            Self::Timestamp {
                is_adjusted_to_utc,
                unit,
            } => write_field(o_prot, "TIMESTAMP", TType::Struct, 8, |p| {
                write_time_like(p, "TimestampType", *is_adjusted_to_utc, unit)
            })?,
            Self::Integer {
                bit_width,
                is_signed,
            } => write_field(o_prot, "INTEGER", TType::Struct, 10, |p| {
                p.write_struct_begin(&TStructIdentifier::new("IntType"))?;
                write_field(p, "bitWidth", TType::I08, 1, |p| p.write_i8(*bit_width))?;
                write_field(p, "isSigned", TType::Bool, 2, |p| p.write_bool(*is_signed))?;
                p.write_field_stop()?;
                p.write_struct_end()
            })?,
            Self::Unknown => empty(o_prot, "UNKNOWN", 11, "NullType")?,
            Self::Json => empty(o_prot, "JSON", 12, "JsonType")?,
            Self::Bson => empty(o_prot, "BSON", 13, "BsonType")?,
            Self::Uuid => empty(o_prot, "UUID", 14, "UUIDType")?,
            Self::Float16 => empty(o_prot, "FLOAT16", 15, "Float16Type")?,
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

/// One node of the flattened schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
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

impl TSerializable for SchemaElement {
    fn read_from_in_protocol<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<Self> {
        i_prot.read_struct_begin()?;
        let mut elem = SchemaElement::default();
        let mut name = None;
        while let Some((id, field_type)) = next_field(i_prot)? {
            match id {
                1 => elem.type_ = Some(Type(i_prot.read_i32()?)),
                2 => elem.type_length = Some(i_prot.read_i32()?),
                3 => elem.repetition_type = Some(FieldRepetitionType(i_prot.read_i32()?)),
                4 => name = Some(i_prot.read_string()?),
                5 => elem.num_children = Some(i_prot.read_i32()?),
                6 => elem.converted_type = Some(ConvertedType(i_prot.read_i32()?)),
                7 => elem.scale = Some(i_prot.read_i32()?),
                8 => elem.precision = Some(i_prot.read_i32()?),
                9 => elem.field_id = Some(i_prot.read_i32()?),
                // Members added by newer format versions leave the
                // annotation unset.
                10 => elem.logical_type = LogicalType::read_union(i_prot)?,
                _ => i_prot.skip(field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("SchemaElement.name", &name)?;
        elem.name = name.unwrap_or_default();
        Ok(elem)
    }

    fn write_to_out_protocol<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()> {
        o_prot.write_struct_begin(&TStructIdentifier::new("SchemaElement"))?;
        if let Some(v) = self.type_ {
            write_field(o_prot, "type", TType::I32, 1, |p| p.write_i32(v.0))?;
        }
        if let Some(v) = self.type_length {
            write_field(o_prot, "type_length", TType::I32, 2, |p| p.write_i32(v))?;
        }
        if let Some(v) = self.repetition_type {
            write_field(o_prot, "repetition_type", TType::I32, 3, |p| p.write_i32(v.0))?;
        }
        write_field(o_prot, "name", TType::String, 4, |p| p.write_string(&self.name))?;
        if let Some(v) = self.num_children {
            write_field(o_prot, "num_children", TType::I32, 5, |p| p.write_i32(v))?;
        }
        if let Some(v) = self.converted_type {
            write_field(o_prot, "converted_type", TType::I32, 6, |p| p.write_i32(v.0))?;
        }
        if let Some(v) = self.scale {
            write_field(o_prot, "scale", TType::I32, 7, |p| p.write_i32(v))?;
        }
        if let Some(v) = self.precision {
            write_field(o_prot, "precision", TType::I32, 8, |p| p.write_i32(v))?;
        }
        if let Some(v) = self.field_id {
            write_field(o_prot, "field_id", TType::I32, 9, |p| p.write_i32(v))?;
        }
        if let Some(v) = &self.logical_type {
            write_field(o_prot, "logicalType", TType::Struct, 10, |p| {
                v.write_to_out_protocol(p)
            })?;
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: Option<String>,
}

impl TSerializable for KeyValue {
    fn read_from_in_protocol<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<Self> {
        i_prot.read_struct_begin()?;
        let mut key = None;
        let mut value = None;
        while let Some((id, field_type)) = next_field(i_prot)? {
            match id {
                1 => key = Some(i_prot.read_string()?),
                2 => value = Some(i_prot.read_string()?),
                _ => i_prot.skip(field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("KeyValue.key", &key)?;
        Ok(KeyValue {
            key: key.unwrap_or_default(),
            value,
        })
    }

    fn write_to_out_protocol<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()> {
        o_prot.write_struct_begin(&TStructIdentifier::new("KeyValue"))?;
        write_field(o_prot, "key", TType::String, 1, |p| p.write_string(&self.key))?;
        if let Some(v) = &self.value {
            write_field(o_prot, "value", TType::String, 2, |p| p.write_string(v))?;
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageEncodingStats {
    pub page_type: PageType,
    pub encoding: Encoding,
    pub count: i32,
}

impl TSerializable for PageEncodingStats {
    fn read_from_in_protocol<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<Self> {
        i_prot.read_struct_begin()?;
        let mut f_1 = None;
        let mut f_2 = None;
        let mut f_3 = None;
        while let Some((id, field_type)) = next_field(i_prot)? {
            match id {
                1 => f_1 = Some(PageType(i_prot.read_i32()?)),
                2 => f_2 = Some(Encoding(i_prot.read_i32()?)),
                3 => f_3 = Some(i_prot.read_i32()?),
                _ => i_prot.skip(field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("PageEncodingStats.page_type", &f_1)?;
        verify_required_field_exists("PageEncodingStats.encoding", &f_2)?;
        verify_required_field_exists("PageEncodingStats.count", &f_3)?;
        Ok(PageEncodingStats {
            page_type: f_1.unwrap_or(PageType::DATA_PAGE),
            encoding: f_2.unwrap_or(Encoding::PLAIN),
            count: f_3.unwrap_or_default(),
        })
    }

    fn write_to_out_protocol<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()> {
        o_prot.write_struct_begin(&TStructIdentifier::new("PageEncodingStats"))?;
        write_field(o_prot, "page_type", TType::I32, 1, |p| p.write_i32(self.page_type.0))?;
        write_field(o_prot, "encoding", TType::I32, 2, |p| p.write_i32(self.encoding.0))?;
        write_field(o_prot, "count", TType::I32, 3, |p| p.write_i32(self.count))?;
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
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

impl TSerializable for ColumnMetaData {
    fn read_from_in_protocol<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<Self> {
        i_prot.read_struct_begin()?;
        let mut f_1 = None;
        let mut f_2 = None;
        let mut f_3 = None;
        let mut f_4 = None;
        let mut f_5 = None;
        let mut f_6 = None;
        let mut f_7 = None;
        let mut f_8 = None;
        let mut f_9 = None;
        let mut f_10 = None;
        let mut f_11 = None;
        let mut f_12 = None;
        let mut f_13 = None;
        let mut f_14 = None;
        let mut f_15 = None;
        while let Some((id, field_type)) = next_field(i_prot)? {
            match id {
                1 => f_1 = Some(Type(i_prot.read_i32()?)),
                2 => f_2 = Some(read_list(i_prot)?),
                3 => f_3 = Some(read_list(i_prot)?),
                4 => f_4 = Some(CompressionCodec(i_prot.read_i32()?)),
                5 => f_5 = Some(i_prot.read_i64()?),
                6 => f_6 = Some(i_prot.read_i64()?),
                7 => f_7 = Some(i_prot.read_i64()?),
                8 => f_8 = Some(read_list(i_prot)?),
                9 => f_9 = Some(i_prot.read_i64()?),
                10 => f_10 = Some(i_prot.read_i64()?),
                11 => f_11 = Some(i_prot.read_i64()?),
                12 => f_12 = Some(Statistics::read_from_in_protocol(i_prot)?),
                13 => f_13 = Some(read_list(i_prot)?),
                14 => f_14 = Some(i_prot.read_i64()?),
                15 => f_15 = Some(i_prot.read_i32()?),
                _ => i_prot.skip(field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("ColumnMetaData.type_", &f_1)?;
        verify_required_field_exists("ColumnMetaData.encodings", &f_2)?;
        verify_required_field_exists("ColumnMetaData.path_in_schema", &f_3)?;
        verify_required_field_exists("ColumnMetaData.codec", &f_4)?;
        verify_required_field_exists("ColumnMetaData.num_values", &f_5)?;
        verify_required_field_exists("ColumnMetaData.total_uncompressed_size", &f_6)?;
        verify_required_field_exists("ColumnMetaData.total_compressed_size", &f_7)?;
        verify_required_field_exists("ColumnMetaData.data_page_offset", &f_9)?;
        Ok(ColumnMetaData {
            type_: f_1.unwrap_or(Type::BOOLEAN),
            encodings: f_2.unwrap_or_default(),
            path_in_schema: f_3.unwrap_or_default(),
            codec: f_4.unwrap_or(CompressionCodec::UNCOMPRESSED),
            num_values: f_5.unwrap_or_default(),
            total_uncompressed_size: f_6.unwrap_or_default(),
            total_compressed_size: f_7.unwrap_or_default(),
            key_value_metadata: f_8,
            data_page_offset: f_9.unwrap_or_default(),
            index_page_offset: f_10,
            dictionary_page_offset: f_11,
            statistics: f_12,
            encoding_stats: f_13,
            bloom_filter_offset: f_14,
            bloom_filter_length: f_15,
        })
    }

    fn write_to_out_protocol<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()> {
        o_prot.write_struct_begin(&TStructIdentifier::new("ColumnMetaData"))?;
        write_field(o_prot, "type", TType::I32, 1, |p| p.write_i32(self.type_.0))?;
        write_field(o_prot, "encodings", TType::List, 2, |p| {
            write_list(p, &self.encodings)
        })?;
        write_field(o_prot, "path_in_schema", TType::List, 3, |p| {
            write_list(p, &self.path_in_schema)
        })?;
        write_field(o_prot, "codec", TType::I32, 4, |p| p.write_i32(self.codec.0))?;
        write_field(o_prot, "num_values", TType::I64, 5, |p| {
            p.write_i64(self.num_values)
        })?;
        write_field(o_prot, "total_uncompressed_size", TType::I64, 6, |p| {
            p.write_i64(self.total_uncompressed_size)
        })?;
        write_field(o_prot, "total_compressed_size", TType::I64, 7, |p| {
            p.write_i64(self.total_compressed_size)
        })?;
        if let Some(v) = &self.key_value_metadata {
            write_field(o_prot, "key_value_metadata", TType::List, 8, |p| {
                write_list(p, v)
            })?;
        }
        write_field(o_prot, "data_page_offset", TType::I64, 9, |p| {
            p.write_i64(self.data_page_offset)
        })?;
        if let Some(v) = self.index_page_offset {
            write_field(o_prot, "index_page_offset", TType::I64, 10, |p| p.write_i64(v))?;
        }
        if let Some(v) = self.dictionary_page_offset {
            write_field(o_prot, "dictionary_page_offset", TType::I64, 11, |p| {
                p.write_i64(v)
            })?;
        }
        if let Some(v) = &self.statistics {
            write_field(o_prot, "statistics", TType::Struct, 12, |p| {
                v.write_to_out_protocol(p)
            })?;
        }
        if let Some(v) = &self.encoding_stats {
            write_field(o_prot, "encoding_stats", TType::List, 13, |p| write_list(p, v))?;
        }
        if let Some(v) = self.bloom_filter_offset {
            write_field(o_prot, "bloom_filter_offset", TType::I64, 14, |p| p.write_i64(v))?;
        }
        if let Some(v) = self.bloom_filter_length {
            write_field(o_prot, "bloom_filter_length", TType::I32, 15, |p| p.write_i32(v))?;
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnChunk {
    pub file_path: Option<String>,
    pub file_offset: i64,
    pub meta_data: Option<ColumnMetaData>,
    pub offset_index_offset: Option<i64>,
    pub offset_index_length: Option<i32>,
    pub column_index_offset: Option<i64>,
    pub column_index_length: Option<i32>,
    pub encrypted_column_metadata: Option<Vec<u8>>,
}

impl TSerializable for ColumnChunk {
    fn read_from_in_protocol<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<Self> {
        i_prot.read_struct_begin()?;
        let mut chunk = ColumnChunk::default();
        let mut file_offset = None;
        while let Some((id, field_type)) = next_field(i_prot)? {
            match id {
                1 => chunk.file_path = Some(i_prot.read_string()?),
                2 => file_offset = Some(i_prot.read_i64()?),
                3 => chunk.meta_data = Some(ColumnMetaData::read_from_in_protocol(i_prot)?),
                4 => chunk.offset_index_offset = Some(i_prot.read_i64()?),
                5 => chunk.offset_index_length = Some(i_prot.read_i32()?),
                6 => chunk.column_index_offset = Some(i_prot.read_i64()?),
                7 => chunk.column_index_length = Some(i_prot.read_i32()?),
                9 => chunk.encrypted_column_metadata = Some(i_prot.read_bytes()?),
                _ => i_prot.skip(field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("ColumnChunk.file_offset", &file_offset)?;
        chunk.file_offset = file_offset.unwrap_or_default();
        Ok(chunk)
    }

    fn write_to_out_protocol<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()> {
        o_prot.write_struct_begin(&TStructIdentifier::new("ColumnChunk"))?;
        if let Some(v) = &self.file_path {
            write_field(o_prot, "file_path", TType::String, 1, |p| p.write_string(v))?;
        }
        write_field(o_prot, "file_offset", TType::I64, 2, |p| {
            p.write_i64(self.file_offset)
        })?;
        if let Some(v) = &self.meta_data {
            write_field(o_prot, "meta_data", TType::Struct, 3, |p| {
                v.write_to_out_protocol(p)
            })?;
        }
        if let Some(v) = self.offset_index_offset {
            write_field(o_prot, "offset_index_offset", TType::I64, 4, |p| p.write_i64(v))?;
        }
        if let Some(v) = self.offset_index_length {
            write_field(o_prot, "offset_index_length", TType::I32, 5, |p| p.write_i32(v))?;
        }
        if let Some(v) = self.column_index_offset {
            write_field(o_prot, "column_index_offset", TType::I64, 6, |p| p.write_i64(v))?;
        }
        if let Some(v) = self.column_index_length {
            write_field(o_prot, "column_index_length", TType::I32, 7, |p| p.write_i32(v))?;
        }
        if let Some(v) = &self.encrypted_column_metadata {
            write_field(o_prot, "encrypted_column_metadata", TType::String, 9, |p| {
                p.write_bytes(v)
            })?;
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowGroup {
    pub columns: Vec<ColumnChunk>,
    pub total_byte_size: i64,
    pub num_rows: i64,
    pub file_offset: Option<i64>,
    pub total_compressed_size: Option<i64>,
    pub ordinal: Option<i16>,
}

impl TSerializable for RowGroup {
    fn read_from_in_protocol<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<Self> {
        i_prot.read_struct_begin()?;
        let mut f_1 = None;
        let mut f_2 = None;
        let mut f_3 = None;
        let mut row_group = RowGroup::default();
        while let Some((id, field_type)) = next_field(i_prot)? {
            match id {
                1 => f_1 = Some(read_list(i_prot)?),
                2 => f_2 = Some(i_prot.read_i64()?),
                3 => f_3 = Some(i_prot.read_i64()?),
                5 => row_group.file_offset = Some(i_prot.read_i64()?),
                6 => row_group.total_compressed_size = Some(i_prot.read_i64()?),
                7 => row_group.ordinal = Some(i_prot.read_i16()?),
                _ => i_prot.skip(field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("RowGroup.columns", &f_1)?;
        verify_required_field_exists("RowGroup.total_byte_size", &f_2)?;
        verify_required_field_exists("RowGroup.num_rows", &f_3)?;
        row_group.columns = f_1.unwrap_or_default();
        row_group.total_byte_size = f_2.unwrap_or_default();
        row_group.num_rows = f_3.unwrap_or_default();
        Ok(row_group)
    }

    fn write_to_out_protocol<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()> {
        o_prot.write_struct_begin(&TStructIdentifier::new("RowGroup"))?;
        write_field(o_prot, "columns", TType::List, 1, |p| write_list(p, &self.columns))?;
        write_field(o_prot, "total_byte_size", TType::I64, 2, |p| {
            p.write_i64(self.total_byte_size)
        })?;
        write_field(o_prot, "num_rows", TType::I64, 3, |p| p.write_i64(self.num_rows))?;
        if let Some(v) = self.file_offset {
            write_field(o_prot, "file_offset", TType::I64, 5, |p| p.write_i64(v))?;
        }
        if let Some(v) = self.total_compressed_size {
            write_field(o_prot, "total_compressed_size", TType::I64, 6, |p| {
                p.write_i64(v)
            })?;
        }
        if let Some(v) = self.ordinal {
            write_field(o_prot, "ordinal", TType::I16, 7, |p| p.write_i16(v))?;
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

/// Sort order used for min/max statistics of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnOrder {
    TypeDefinedOrder,
}

impl TSerializable for ColumnOrder {
    fn read_from_in_protocol<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<Self> {
        i_prot.read_struct_begin()?;
        let mut ret = None;
        while let Some((id, field_type)) = next_field(i_prot)? {
            match id {
                1 => {
                    read_empty_struct(i_prot)?;
                    ret = Some(ColumnOrder::TypeDefinedOrder);
                }
                _ => i_prot.skip(field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        ret.ok_or_else(|| protocol_error("received empty union from remote ColumnOrder"))
    }

    fn write_to_out_protocol<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()> {
        o_prot.write_struct_begin(&TStructIdentifier::new("ColumnOrder"))?;
        match self {
            Self::TypeDefinedOrder => write_field(o_prot, "TYPE_ORDER", TType::Struct, 1, |p| {
                write_empty_struct(p, "TypeDefinedOrder")
            })?,
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

/// Parameters shared by both AES encryption algorithms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AesParameters {
    pub aad_prefix: Option<Vec<u8>>,
    pub aad_file_unique: Option<Vec<u8>>,
    pub supply_aad_prefix: Option<bool>,
}

impl AesParameters {
    fn read<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<Self> {
        i_prot.read_struct_begin()?;
        let mut params = AesParameters::default();
        while let Some((id, field_type)) = next_field(i_prot)? {
            match id {
                1 => params.aad_prefix = Some(i_prot.read_bytes()?),
                2 => params.aad_file_unique = Some(i_prot.read_bytes()?),
                3 => params.supply_aad_prefix = Some(i_prot.read_bool()?),
                _ => i_prot.skip(field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        Ok(params)
    }

    fn write<T: TOutputProtocol>(&self, o_prot: &mut T, name: &'static str) -> thrift::Result<()> {
        o_prot.write_struct_begin(&TStructIdentifier::new(name))?;
        if let Some(v) = &self.aad_prefix {
            write_field(o_prot, "aad_prefix", TType::String, 1, |p| p.write_bytes(v))?;
        }
        if let Some(v) = &self.aad_file_unique {
            write_field(o_prot, "aad_file_unique", TType::String, 2, |p| p.write_bytes(v))?;
        }
        if let Some(v) = self.supply_aad_prefix {
            write_field(o_prot, "supply_aad_prefix", TType::Bool, 3, |p| p.write_bool(v))?;
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncryptionAlgorithm {
    AesGcmV1(AesParameters),
    AesGcmCtrV1(AesParameters),
}

impl TSerializable for EncryptionAlgorithm {
    fn read_from_in_protocol<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<Self> {
        i_prot.read_struct_begin()?;
        let mut ret = None;
        while let Some((id, field_type)) = next_field(i_prot)? {
            match id {
                1 => ret = Some(Self::AesGcmV1(AesParameters::read(i_prot)?)),
                2 => ret = Some(Self::AesGcmCtrV1(AesParameters::read(i_prot)?)),
                _ => i_prot.skip(field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        ret.ok_or_else(|| protocol_error("received empty union from remote EncryptionAlgorithm"))
    }

    fn write_to_out_protocol<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()> {
        o_prot.write_struct_begin(&TStructIdentifier::new("EncryptionAlgorithm"))?;
        match self {
            Self::AesGcmV1(params) => write_field(o_prot, "AES_GCM_V1", TType::Struct, 1, |p| {
                params.write(p, "AesGcmV1")
            })?,
            Self::AesGcmCtrV1(params) => {
                write_field(o_prot, "AES_GCM_CTR_V1", TType::Struct, 2, |p| {
                    params.write(p, "AesGcmCtrV1")
                })?
            }
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

/// Plaintext header preceding an encrypted footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCryptoMetaData {
    pub encryption_algorithm: EncryptionAlgorithm,
    pub key_metadata: Option<Vec<u8>>,
}

impl TSerializable for FileCryptoMetaData {
    fn read_from_in_protocol<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<Self> {
        i_prot.read_struct_begin()?;
        let mut f_1 = None;
        let mut key_metadata = None;
        while let Some((id, field_type)) = next_field(i_prot)? {
            match id {
                1 => f_1 = Some(EncryptionAlgorithm::read_from_in_protocol(i_prot)?),
                2 => key_metadata = Some(i_prot.read_bytes()?),
                _ => i_prot.skip(field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("FileCryptoMetaData.encryption_algorithm", &f_1)?;
        let encryption_algorithm =
            f_1.ok_or_else(|| protocol_error("missing FileCryptoMetaData.encryption_algorithm"))?;
        Ok(FileCryptoMetaData {
            encryption_algorithm,
            key_metadata,
        })
    }

    fn write_to_out_protocol<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()> {
        o_prot.write_struct_begin(&TStructIdentifier::new("FileCryptoMetaData"))?;
        write_field(o_prot, "encryption_algorithm", TType::Struct, 1, |p| {
            self.encryption_algorithm.write_to_out_protocol(p)
        })?;
        if let Some(v) = &self.key_metadata {
            write_field(o_prot, "key_metadata", TType::String, 2, |p| p.write_bytes(v))?;
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

/// The footer's top-level structure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileMetaData {
    pub version: i32,
    pub schema: Vec<SchemaElement>,
    pub num_rows: i64,
    pub row_groups: Vec<RowGroup>,
    pub key_value_metadata: Option<Vec<KeyValue>>,
    pub created_by: Option<String>,
    pub column_orders: Option<Vec<ColumnOrder>>,
    pub encryption_algorithm: Option<EncryptionAlgorithm>,
    pub footer_signing_key_metadata: Option<Vec<u8>>,
}

impl TSerializable for FileMetaData {
    fn read_from_in_protocol<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<Self> {
        i_prot.read_struct_begin()?;
        let mut f_1 = None;
        let mut f_2 = None;
        let mut f_3 = None;
        let mut f_4 = None;
        let mut md = FileMetaData::default();
        while let Some((id, field_type)) = next_field(i_prot)? {
            match id {
                1 => f_1 = Some(i_prot.read_i32()?),
                2 => f_2 = Some(read_list(i_prot)?),
                3 => f_3 = Some(i_prot.read_i64()?),
                4 => f_4 = Some(read_list(i_prot)?),
                5 => md.key_value_metadata = Some(read_list(i_prot)?),
                6 => md.created_by = Some(i_prot.read_string()?),
                7 => md.column_orders = Some(read_list(i_prot)?),
                8 => {
                    md.encryption_algorithm =
                        Some(EncryptionAlgorithm::read_from_in_protocol(i_prot)?)
                }
                9 => md.footer_signing_key_metadata = Some(i_prot.read_bytes()?),
                _ => i_prot.skip(field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("FileMetaData.version", &f_1)?;
        verify_required_field_exists("FileMetaData.schema", &f_2)?;
        verify_required_field_exists("FileMetaData.num_rows", &f_3)?;
        verify_required_field_exists("FileMetaData.row_groups", &f_4)?;
        md.version = f_1.unwrap_or_default();
        md.schema = f_2.unwrap_or_default();
        md.num_rows = f_3.unwrap_or_default();
        md.row_groups = f_4.unwrap_or_default();
        Ok(md)
    }

    fn write_to_out_protocol<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()> {
        o_prot.write_struct_begin(&TStructIdentifier::new("FileMetaData"))?;
        write_field(o_prot, "version", TType::I32, 1, |p| p.write_i32(self.version))?;
        write_field(o_prot, "schema", TType::List, 2, |p| write_list(p, &self.schema))?;
        write_field(o_prot, "num_rows", TType::I64, 3, |p| p.write_i64(self.num_rows))?;
        write_field(o_prot, "row_groups", TType::List, 4, |p| {
            write_list(p, &self.row_groups)
        })?;
        if let Some(v) = &self.key_value_metadata {
            write_field(o_prot, "key_value_metadata", TType::List, 5, |p| {
                write_list(p, v)
            })?;
        }
        if let Some(v) = &self.created_by {
            write_field(o_prot, "created_by", TType::String, 6, |p| p.write_string(v))?;
        }
        if let Some(v) = &self.column_orders {
            write_field(o_prot, "column_orders", TType::List, 7, |p| write_list(p, v))?;
        }
        if let Some(v) = &self.encryption_algorithm {
            write_field(o_prot, "encryption_algorithm", TType::Struct, 8, |p| {
                v.write_to_out_protocol(p)
            })?;
        }
        if let Some(v) = &self.footer_signing_key_metadata {
            write_field(o_prot, "footer_signing_key_metadata", TType::String, 9, |p| {
                p.write_bytes(v)
            })?;
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLocation {
    pub offset: i64,
    pub compressed_page_size: i32,
    pub first_row_index: i64,
}

impl TSerializable for PageLocation {
    fn read_from_in_protocol<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<Self> {
        i_prot.read_struct_begin()?;
        let mut f_1 = None;
        let mut f_2 = None;
        let mut f_3 = None;
        while let Some((id, field_type)) = next_field(i_prot)? {
            match id {
                1 => f_1 = Some(i_prot.read_i64()?),
                2 => f_2 = Some(i_prot.read_i32()?),
                3 => f_3 = Some(i_prot.read_i64()?),
                _ => i_prot.skip(field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("PageLocation.offset", &f_1)?;
        verify_required_field_exists("PageLocation.compressed_page_size", &f_2)?;
        verify_required_field_exists("PageLocation.first_row_index", &f_3)?;
        Ok(PageLocation {
            offset: f_1.unwrap_or_default(),
            compressed_page_size: f_2.unwrap_or_default(),
            first_row_index: f_3.unwrap_or_default(),
        })
    }

    fn write_to_out_protocol<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()> {
        o_prot.write_struct_begin(&TStructIdentifier::new("PageLocation"))?;
        write_field(o_prot, "offset", TType::I64, 1, |p| p.write_i64(self.offset))?;
        write_field(o_prot, "compressed_page_size", TType::I32, 2, |p| {
            p.write_i32(self.compressed_page_size)
        })?;
        write_field(o_prot, "first_row_index", TType::I64, 3, |p| {
            p.write_i64(self.first_row_index)
        })?;
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OffsetIndex {
    pub page_locations: Vec<PageLocation>,
}

impl TSerializable for OffsetIndex {
    fn read_from_in_protocol<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<Self> {
        i_prot.read_struct_begin()?;
        let mut f_1 = None;
        while let Some((id, field_type)) = next_field(i_prot)? {
            match id {
                1 => f_1 = Some(read_list(i_prot)?),
                _ => i_prot.skip(field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("OffsetIndex.page_locations", &f_1)?;
        Ok(OffsetIndex {
            page_locations: f_1.unwrap_or_default(),
        })
    }

    fn write_to_out_protocol<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()> {
        o_prot.write_struct_begin(&TStructIdentifier::new("OffsetIndex"))?;
        write_field(o_prot, "page_locations", TType::List, 1, |p| {
            write_list(p, &self.page_locations)
        })?;
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
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

impl TSerializable for ColumnIndex {
    fn read_from_in_protocol<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<Self> {
        i_prot.read_struct_begin()?;
        let mut f_1 = None;
        let mut f_2 = None;
        let mut f_3 = None;
        let mut f_4 = None;
        let mut f_5 = None;
        while let Some((id, field_type)) = next_field(i_prot)? {
            match id {
                1 => f_1 = Some(read_list(i_prot)?),
                2 => f_2 = Some(read_list(i_prot)?),
                3 => f_3 = Some(read_list(i_prot)?),
                4 => f_4 = Some(BoundaryOrder(i_prot.read_i32()?)),
                5 => f_5 = Some(read_list(i_prot)?),
                _ => i_prot.skip(field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("ColumnIndex.null_pages", &f_1)?;
        verify_required_field_exists("ColumnIndex.min_values", &f_2)?;
        verify_required_field_exists("ColumnIndex.max_values", &f_3)?;
        verify_required_field_exists("ColumnIndex.boundary_order", &f_4)?;
        Ok(ColumnIndex {
            null_pages: f_1.unwrap_or_default(),
            min_values: f_2.unwrap_or_default(),
            max_values: f_3.unwrap_or_default(),
            boundary_order: f_4.unwrap_or(BoundaryOrder::UNORDERED),
            null_counts: f_5,
        })
    }

    fn write_to_out_protocol<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()> {
        o_prot.write_struct_begin(&TStructIdentifier::new("ColumnIndex"))?;
        write_field(o_prot, "null_pages", TType::List, 1, |p| {
            write_list(p, &self.null_pages)
        })?;
        write_field(o_prot, "min_values", TType::List, 2, |p| {
            write_list(p, &self.min_values)
        })?;
        write_field(o_prot, "max_values", TType::List, 3, |p| {
            write_list(p, &self.max_values)
        })?;
        write_field(o_prot, "boundary_order", TType::I32, 4, |p| {
            p.write_i32(self.boundary_order.0)
        })?;
        if let Some(v) = &self.null_counts {
            write_field(o_prot, "null_counts", TType::List, 5, |p| write_list(p, v))?;
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
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

impl TSerializable for DataPageHeader {
    fn read_from_in_protocol<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<Self> {
        i_prot.read_struct_begin()?;
        let mut f_1 = None;
        let mut f_2 = None;
        let mut f_3 = None;
        let mut f_4 = None;
        let mut f_5 = None;
        while let Some((id, field_type)) = next_field(i_prot)? {
            match id {
                1 => f_1 = Some(i_prot.read_i32()?),
                2 => f_2 = Some(Encoding(i_prot.read_i32()?)),
                3 => f_3 = Some(Encoding(i_prot.read_i32()?)),
                4 => f_4 = Some(Encoding(i_prot.read_i32()?)),
                5 => f_5 = Some(Statistics::read_from_in_protocol(i_prot)?),
                _ => i_prot.skip(field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("DataPageHeader.num_values", &f_1)?;
        verify_required_field_exists("DataPageHeader.encoding", &f_2)?;
        verify_required_field_exists("DataPageHeader.definition_level_encoding", &f_3)?;
        verify_required_field_exists("DataPageHeader.repetition_level_encoding", &f_4)?;
        Ok(DataPageHeader {
            num_values: f_1.unwrap_or_default(),
            encoding: f_2.unwrap_or(Encoding::PLAIN),
            definition_level_encoding: f_3.unwrap_or(Encoding::RLE),
            repetition_level_encoding: f_4.unwrap_or(Encoding::RLE),
            statistics: f_5,
        })
    }

    fn write_to_out_protocol<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()> {
        o_prot.write_struct_begin(&TStructIdentifier::new("DataPageHeader"))?;
        write_field(o_prot, "num_values", TType::I32, 1, |p| p.write_i32(self.num_values))?;
        write_field(o_prot, "encoding", TType::I32, 2, |p| p.write_i32(self.encoding.0))?;
        write_field(o_prot, "definition_level_encoding", TType::I32, 3, |p| {
            p.write_i32(self.definition_level_encoding.0)
        })?;
        write_field(o_prot, "repetition_level_encoding", TType::I32, 4, |p| {
            p.write_i32(self.repetition_level_encoding.0)
        })?;
        if let Some(v) = &self.statistics {
            write_field(o_prot, "statistics", TType::Struct, 5, |p| {
                v.write_to_out_protocol(p)
            })?;
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryPageHeader {
    pub num_values: i32,
    pub encoding: Encoding,
    pub is_sorted: Option<bool>,
}

impl TSerializable for DictionaryPageHeader {
    fn read_from_in_protocol<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<Self> {
        i_prot.read_struct_begin()?;
        let mut f_1 = None;
        let mut f_2 = None;
        let mut f_3 = None;
        while let Some((id, field_type)) = next_field(i_prot)? {
            match id {
                1 => f_1 = Some(i_prot.read_i32()?),
                2 => f_2 = Some(Encoding(i_prot.read_i32()?)),
                3 => f_3 = Some(i_prot.read_bool()?),
                _ => i_prot.skip(field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("DictionaryPageHeader.num_values", &f_1)?;
        verify_required_field_exists("DictionaryPageHeader.encoding", &f_2)?;
        Ok(DictionaryPageHeader {
            num_values: f_1.unwrap_or_default(),
            encoding: f_2.unwrap_or(Encoding::PLAIN),
            is_sorted: f_3,
        })
    }

    fn write_to_out_protocol<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()> {
        o_prot.write_struct_begin(&TStructIdentifier::new("DictionaryPageHeader"))?;
        write_field(o_prot, "num_values", TType::I32, 1, |p| p.write_i32(self.num_values))?;
        write_field(o_prot, "encoding", TType::I32, 2, |p| p.write_i32(self.encoding.0))?;
        if let Some(v) = self.is_sorted {
            write_field(o_prot, "is_sorted", TType::Bool, 3, |p| p.write_bool(v))?;
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
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
    /// Defaults to true when absent.
    pub is_compressed: Option<bool>,
    pub statistics: Option<Statistics>,
}

impl TSerializable for DataPageHeaderV2 {
    fn read_from_in_protocol<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<Self> {
        i_prot.read_struct_begin()?;
        let mut f_1 = None;
        let mut f_2 = None;
        let mut f_3 = None;
        let mut f_4 = None;
        let mut f_5 = None;
        let mut f_6 = None;
        let mut f_7 = None;
        let mut f_8 = None;
        while let Some((id, field_type)) = next_field(i_prot)? {
            match id {
                1 => f_1 = Some(i_prot.read_i32()?),
                2 => f_2 = Some(i_prot.read_i32()?),
                3 => f_3 = Some(i_prot.read_i32()?),
                4 => f_4 = Some(Encoding(i_prot.read_i32()?)),
                5 => f_5 = Some(i_prot.read_i32()?),
                6 => f_6 = Some(i_prot.read_i32()?),
                7 => f_7 = Some(i_prot.read_bool()?),
                8 => f_8 = Some(Statistics::read_from_in_protocol(i_prot)?),
                _ => i_prot.skip(field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("DataPageHeaderV2.num_values", &f_1)?;
        verify_required_field_exists("DataPageHeaderV2.num_nulls", &f_2)?;
        verify_required_field_exists("DataPageHeaderV2.num_rows", &f_3)?;
        verify_required_field_exists("DataPageHeaderV2.encoding", &f_4)?;
        verify_required_field_exists("DataPageHeaderV2.definition_levels_byte_length", &f_5)?;
        verify_required_field_exists("DataPageHeaderV2.repetition_levels_byte_length", &f_6)?;
        Ok(DataPageHeaderV2 {
            num_values: f_1.unwrap_or_default(),
            num_nulls: f_2.unwrap_or_default(),
            num_rows: f_3.unwrap_or_default(),
            encoding: f_4.unwrap_or(Encoding::PLAIN),
            definition_levels_byte_length: f_5.unwrap_or_default(),
            repetition_levels_byte_length: f_6.unwrap_or_default(),
            is_compressed: f_7,
            statistics: f_8,
        })
    }

    fn write_to_out_protocol<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()> {
        o_prot.write_struct_begin(&TStructIdentifier::new("DataPageHeaderV2"))?;
        write_field(o_prot, "num_values", TType::I32, 1, |p| p.write_i32(self.num_values))?;
        write_field(o_prot, "num_nulls", TType::I32, 2, |p| p.write_i32(self.num_nulls))?;
        write_field(o_prot, "num_rows", TType::I32, 3, |p| p.write_i32(self.num_rows))?;
        write_field(o_prot, "encoding", TType::I32, 4, |p| p.write_i32(self.encoding.0))?;
        write_field(o_prot, "definition_levels_byte_length", TType::I32, 5, |p| {
            p.write_i32(self.definition_levels_byte_length)
        })?;
        write_field(o_prot, "repetition_levels_byte_length", TType::I32, 6, |p| {
            p.write_i32(self.repetition_levels_byte_length)
        })?;
        if let Some(v) = self.is_compressed {
            write_field(o_prot, "is_compressed", TType::Bool, 7, |p| p.write_bool(v))?;
        }
        if let Some(v) = &self.statistics {
            write_field(o_prot, "statistics", TType::Struct, 8, |p| {
                v.write_to_out_protocol(p)
            })?;
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageHeader {
    pub type_: PageType,
    pub uncompressed_page_size: i32,
    pub compressed_page_size: i32,
    pub crc: Option<i32>,
    pub data_page_header: Option<DataPageHeader>,
    /// Index pages carry no fields.
    pub index_page_header: bool,
    pub dictionary_page_header: Option<DictionaryPageHeader>,
    pub data_page_header_v2: Option<DataPageHeaderV2>,
}

impl TSerializable for PageHeader {
    fn read_from_in_protocol<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<Self> {
        i_prot.read_struct_begin()?;
        let mut f_1 = None;
        let mut f_2 = None;
        let mut f_3 = None;
        let mut header = PageHeader {
            type_: PageType::DATA_PAGE,
            uncompressed_page_size: 0,
            compressed_page_size: 0,
            crc: None,
            data_page_header: None,
            index_page_header: false,
            dictionary_page_header: None,
            data_page_header_v2: None,
        };
        while let Some((id, field_type)) = next_field(i_prot)? {
            match id {
                1 => f_1 = Some(PageType(i_prot.read_i32()?)),
                2 => f_2 = Some(i_prot.read_i32()?),
                3 => f_3 = Some(i_prot.read_i32()?),
                4 => header.crc = Some(i_prot.read_i32()?),
                5 => {
                    header.data_page_header = Some(DataPageHeader::read_from_in_protocol(i_prot)?)
                }
                6 => {
                    read_empty_struct(i_prot)?;
                    header.index_page_header = true;
                }
                7 => {
                    header.dictionary_page_header =
                        Some(DictionaryPageHeader::read_from_in_protocol(i_prot)?)
                }
                8 => {
                    header.data_page_header_v2 =
                        Some(DataPageHeaderV2::read_from_in_protocol(i_prot)?)
                }
                _ => i_prot.skip(field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("PageHeader.type_", &f_1)?;
        verify_required_field_exists("PageHeader.uncompressed_page_size", &f_2)?;
        verify_required_field_exists("PageHeader.compressed_page_size", &f_3)?;
        header.type_ = f_1.unwrap_or(PageType::DATA_PAGE);
        header.uncompressed_page_size = f_2.unwrap_or_default();
        header.compressed_page_size = f_3.unwrap_or_default();
        Ok(header)
    }

    fn write_to_out_protocol<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()> {
        o_prot.write_struct_begin(&TStructIdentifier::new("PageHeader"))?;
        write_field(o_prot, "type", TType::I32, 1, |p| p.write_i32(self.type_.0))?;
        write_field(o_prot, "uncompressed_page_size", TType::I32, 2, |p| {
            p.write_i32(self.uncompressed_page_size)
        })?;
        write_field(o_prot, "compressed_page_size", TType::I32, 3, |p| {
            p.write_i32(self.compressed_page_size)
        })?;
        if let Some(v) = self.crc {
            write_field(o_prot, "crc", TType::I32, 4, |p| p.write_i32(v))?;
        }
        if let Some(v) = &self.data_page_header {
            write_field(o_prot, "data_page_header", TType::Struct, 5, |p| {
                v.write_to_out_protocol(p)
            })?;
        }
        if self.index_page_header {
            write_field(o_prot, "index_page_header", TType::Struct, 6, |p| {
                write_empty_struct(p, "IndexPageHeader")
            })?;
        }
        if let Some(v) = &self.dictionary_page_header {
            write_field(o_prot, "dictionary_page_header", TType::Struct, 7, |p| {
                v.write_to_out_protocol(p)
            })?;
        }
        if let Some(v) = &self.data_page_header_v2 {
            write_field(o_prot, "data_page_header_v2", TType::Struct, 8, |p| {
                v.write_to_out_protocol(p)
            })?;
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}
