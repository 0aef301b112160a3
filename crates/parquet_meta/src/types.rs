use parquet_meta_error::{MetaError, Result};

use crate::thrift_gen;
pub use crate::thrift_gen::{LogicalType, TimeUnit};

/// Physical types representable in parquet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhysicalType {
    Boolean,
    Int32,
    Int64,
    Int96,
    Float,
    Double,
    ByteArray,
    FixedLenByteArray,
}

impl TryFrom<thrift_gen::Type> for PhysicalType {
    type Error = MetaError;

    fn try_from(value: thrift_gen::Type) -> Result<Self> {
        Ok(match value {
            thrift_gen::Type::BOOLEAN => Self::Boolean,
            thrift_gen::Type::INT32 => Self::Int32,
            thrift_gen::Type::INT64 => Self::Int64,
            thrift_gen::Type::INT96 => Self::Int96,
            thrift_gen::Type::FLOAT => Self::Float,
            thrift_gen::Type::DOUBLE => Self::Double,
            thrift_gen::Type::BYTE_ARRAY => Self::ByteArray,
            thrift_gen::Type::FIXED_LEN_BYTE_ARRAY => Self::FixedLenByteArray,
            other => {
                return Err(MetaError::corrupt(format!(
                    "unsupported physical type: {}",
                    other.0
                )))
            }
        })
    }
}

impl From<PhysicalType> for thrift_gen::Type {
    fn from(value: PhysicalType) -> Self {
        match value {
            PhysicalType::Boolean => Self::BOOLEAN,
            PhysicalType::Int32 => Self::INT32,
            PhysicalType::Int64 => Self::INT64,
            PhysicalType::Int96 => Self::INT96,
            PhysicalType::Float => Self::FLOAT,
            PhysicalType::Double => Self::DOUBLE,
            PhysicalType::ByteArray => Self::BYTE_ARRAY,
            PhysicalType::FixedLenByteArray => Self::FIXED_LEN_BYTE_ARRAY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Repetition {
    Required,
    Optional,
    Repeated,
}

impl TryFrom<thrift_gen::FieldRepetitionType> for Repetition {
    type Error = MetaError;

    fn try_from(value: thrift_gen::FieldRepetitionType) -> Result<Self> {
        Ok(match value {
            thrift_gen::FieldRepetitionType::REQUIRED => Self::Required,
            thrift_gen::FieldRepetitionType::OPTIONAL => Self::Optional,
            thrift_gen::FieldRepetitionType::REPEATED => Self::Repeated,
            other => {
                return Err(MetaError::corrupt(format!(
                    "unsupported repetition type: {}",
                    other.0
                )))
            }
        })
    }
}

impl From<Repetition> for thrift_gen::FieldRepetitionType {
    fn from(value: Repetition) -> Self {
        match value {
            Repetition::Required => Self::REQUIRED,
            Repetition::Optional => Self::OPTIONAL,
            Repetition::Repeated => Self::REPEATED,
        }
    }
}

/// Parquet converted type, deprecated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConvertedType {
    Utf8,
    Map,
    MapKeyValue,
    List,
    Enum,
    Decimal,
    Date,
    TimeMillis,
    TimeMicros,
    TimestampMillis,
    TimestampMicros,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Int8,
    Int16,
    Int32,
    Int64,
    Json,
    Bson,
    Interval,
}

/// Wire values paired with their converted type.
const CONVERTED_TYPES: [(thrift_gen::ConvertedType, ConvertedType); 22] = [
    (thrift_gen::ConvertedType::UTF8, ConvertedType::Utf8),
    (thrift_gen::ConvertedType::MAP, ConvertedType::Map),
    (thrift_gen::ConvertedType::MAP_KEY_VALUE, ConvertedType::MapKeyValue),
    (thrift_gen::ConvertedType::LIST, ConvertedType::List),
    (thrift_gen::ConvertedType::ENUM, ConvertedType::Enum),
    (thrift_gen::ConvertedType::DECIMAL, ConvertedType::Decimal),
    (thrift_gen::ConvertedType::DATE, ConvertedType::Date),
    (thrift_gen::ConvertedType::TIME_MILLIS, ConvertedType::TimeMillis),
    (thrift_gen::ConvertedType::TIME_MICROS, ConvertedType::TimeMicros),
    (thrift_gen::ConvertedType::TIMESTAMP_MILLIS, ConvertedType::TimestampMillis),
    (thrift_gen::ConvertedType::TIMESTAMP_MICROS, ConvertedType::TimestampMicros),
    (thrift_gen::ConvertedType::UINT_8, ConvertedType::Uint8),
    (thrift_gen::ConvertedType::UINT_16, ConvertedType::Uint16),
    (thrift_gen::ConvertedType::UINT_32, ConvertedType::Uint32),
    (thrift_gen::ConvertedType::UINT_64, ConvertedType::Uint64),
    (thrift_gen::ConvertedType::INT_8, ConvertedType::Int8),
    (thrift_gen::ConvertedType::INT_16, ConvertedType::Int16),
    (thrift_gen::ConvertedType::INT_32, ConvertedType::Int32),
    (thrift_gen::ConvertedType::INT_64, ConvertedType::Int64),
    (thrift_gen::ConvertedType::JSON, ConvertedType::Json),
    (thrift_gen::ConvertedType::BSON, ConvertedType::Bson),
    (thrift_gen::ConvertedType::INTERVAL, ConvertedType::Interval),
];

impl TryFrom<thrift_gen::ConvertedType> for ConvertedType {
    type Error = MetaError;

    fn try_from(value: thrift_gen::ConvertedType) -> Result<Self> {
        CONVERTED_TYPES
            .iter()
            .find(|(wire, _)| *wire == value)
            .map(|(_, converted)| *converted)
            .ok_or_else(|| {
                MetaError::corrupt(format!("unsupported converted type: {}", value.0))
            })
    }
}

impl From<ConvertedType> for thrift_gen::ConvertedType {
    fn from(value: ConvertedType) -> Self {
        match value {
            ConvertedType::Utf8 => Self::UTF8,
            ConvertedType::Map => Self::MAP,
            ConvertedType::MapKeyValue => Self::MAP_KEY_VALUE,
            ConvertedType::List => Self::LIST,
            ConvertedType::Enum => Self::ENUM,
            ConvertedType::Decimal => Self::DECIMAL,
            ConvertedType::Date => Self::DATE,
            ConvertedType::TimeMillis => Self::TIME_MILLIS,
            ConvertedType::TimeMicros => Self::TIME_MICROS,
            ConvertedType::TimestampMillis => Self::TIMESTAMP_MILLIS,
            ConvertedType::TimestampMicros => Self::TIMESTAMP_MICROS,
            ConvertedType::Uint8 => Self::UINT_8,
            ConvertedType::Uint16 => Self::UINT_16,
            ConvertedType::Uint32 => Self::UINT_32,
            ConvertedType::Uint64 => Self::UINT_64,
            ConvertedType::Int8 => Self::INT_8,
            ConvertedType::Int16 => Self::INT_16,
            ConvertedType::Int32 => Self::INT_32,
            ConvertedType::Int64 => Self::INT_64,
            ConvertedType::Json => Self::JSON,
            ConvertedType::Bson => Self::BSON,
            ConvertedType::Interval => Self::INTERVAL,
        }
    }
}

/// Sort order for min/max values of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnOrder {
    /// Ordering is defined by the column's type.
    TypeDefined,
    /// No ordering is defined, min/max statistics and column indexes must not
    /// be written or used.
    Undefined,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    pub name: String,
    pub repetition: Option<Repetition>,
    pub converted_type: Option<ConvertedType>,
    pub logical_type: Option<LogicalType>,
    pub id: Option<i32>,
}

impl TypeInfo {
    pub fn new(name: impl Into<String>) -> Self {
        TypeInfo {
            name: name.into(),
            repetition: None,
            converted_type: None,
            logical_type: None,
            id: None,
        }
    }

    pub fn with_repetition(mut self, repetition: Repetition) -> Self {
        self.repetition = Some(repetition);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParquetType {
    Primitive(PrimitiveType),
    Group(GroupType),
}

impl ParquetType {
    pub fn info(&self) -> &TypeInfo {
        match self {
            Self::Primitive(p) => &p.info,
            Self::Group(g) => &g.info,
        }
    }

    pub fn name(&self) -> &str {
        &self.info().name
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimitiveType {
    pub info: TypeInfo,
    pub physical_type: PhysicalType,
    /// Byte width, only meaningful for FIXED_LEN_BYTE_ARRAY.
    pub type_length: Option<i32>,
    pub precision: Option<i32>,
    pub scale: Option<i32>,
}

impl PrimitiveType {
    pub fn new(info: TypeInfo, physical_type: PhysicalType) -> Self {
        PrimitiveType {
            info,
            physical_type,
            type_length: None,
            precision: None,
            scale: None,
        }
    }

    /// Column order for this type.
    ///
    /// INT96 and INTERVAL columns have no defined order.
    pub fn column_order(&self) -> ColumnOrder {
        if self.physical_type == PhysicalType::Int96
            || self.info.converted_type == Some(ConvertedType::Interval)
        {
            ColumnOrder::Undefined
        } else {
            ColumnOrder::TypeDefined
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupType {
    pub info: TypeInfo,
    pub fields: Vec<ParquetType>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converted_type_wire_values() {
        assert_eq!(
            ConvertedType::Interval,
            ConvertedType::try_from(thrift_gen::ConvertedType(21)).unwrap()
        );
        assert_eq!(
            thrift_gen::ConvertedType(11),
            thrift_gen::ConvertedType::from(ConvertedType::Uint8)
        );

        let err = ConvertedType::try_from(thrift_gen::ConvertedType(22)).unwrap_err();
        assert!(err.is_corrupt());
    }

    #[test]
    fn unknown_physical_type() {
        let err = PhysicalType::try_from(thrift_gen::Type(8)).unwrap_err();
        assert!(err.is_corrupt());
    }

    #[test]
    fn column_order_undefined_for_int96_and_interval() {
        let int96 = PrimitiveType::new(TypeInfo::new("a"), PhysicalType::Int96);
        assert_eq!(ColumnOrder::Undefined, int96.column_order());

        let mut interval = PrimitiveType::new(TypeInfo::new("b"), PhysicalType::FixedLenByteArray);
        interval.type_length = Some(12);
        interval.info.converted_type = Some(ConvertedType::Interval);
        assert_eq!(ColumnOrder::Undefined, interval.column_order());

        let int32 = PrimitiveType::new(TypeInfo::new("c"), PhysicalType::Int32);
        assert_eq!(ColumnOrder::TypeDefined, int32.column_order());
    }
}
