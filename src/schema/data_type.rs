//! Database type tags and their chart-facing classification.
//!
//! Engine type strings are matched against a closed enumeration of known
//! names. Unrecognized strings map to [`DataType::Unknown`] instead of
//! failing, so engine upgrades that add or rename types never break schema
//! extraction.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Detailed database type tag, one per known engine type name.
///
/// Serialized as its engine name, the same string `Display` prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "&'static str", from = "String")]
pub enum DataType {
    // Integer family
    TinyInt,
    SmallInt,
    Integer,
    Int,
    Int1,
    Int2,
    Int4,
    Int8,
    BigInt,
    HugeInt,
    UTinyInt,
    USmallInt,
    UInteger,
    UBigInt,
    UHugeInt,
    Signed,
    Short,
    Long,
    // Floating-point family
    Float,
    Float4,
    Real,
    Double,
    Float8,
    Decimal,
    Numeric,
    // Boolean family
    Boolean,
    Bool,
    Logical,
    // Date/time family
    Date,
    Time,
    Timestamp,
    Datetime,
    TimestampTz,
    TimestampWithTimeZone,
    Interval,
    // String family
    Varchar,
    Char,
    Bpchar,
    Text,
    String,
    Uuid,
    Enum,
    // Structured/binary family
    Blob,
    Bytea,
    Binary,
    Varbinary,
    Bit,
    Bitstring,
    List,
    Map,
    Struct,
    Union,
    Null,
    /// Any type name outside the enumeration
    Unknown,
}

/// Every known type with its canonical lower-case engine name.
const TYPE_NAMES: &[(&str, DataType)] = &[
    ("tinyint", DataType::TinyInt),
    ("smallint", DataType::SmallInt),
    ("integer", DataType::Integer),
    ("int", DataType::Int),
    ("int1", DataType::Int1),
    ("int2", DataType::Int2),
    ("int4", DataType::Int4),
    ("int8", DataType::Int8),
    ("bigint", DataType::BigInt),
    ("hugeint", DataType::HugeInt),
    ("utinyint", DataType::UTinyInt),
    ("usmallint", DataType::USmallInt),
    ("uinteger", DataType::UInteger),
    ("ubigint", DataType::UBigInt),
    ("uhugeint", DataType::UHugeInt),
    ("signed", DataType::Signed),
    ("short", DataType::Short),
    ("long", DataType::Long),
    ("float", DataType::Float),
    ("float4", DataType::Float4),
    ("real", DataType::Real),
    ("double", DataType::Double),
    ("float8", DataType::Float8),
    ("decimal", DataType::Decimal),
    ("numeric", DataType::Numeric),
    ("boolean", DataType::Boolean),
    ("bool", DataType::Bool),
    ("logical", DataType::Logical),
    ("date", DataType::Date),
    ("time", DataType::Time),
    ("timestamp", DataType::Timestamp),
    ("datetime", DataType::Datetime),
    ("timestamptz", DataType::TimestampTz),
    ("timestamp with time zone", DataType::TimestampWithTimeZone),
    ("interval", DataType::Interval),
    ("varchar", DataType::Varchar),
    ("char", DataType::Char),
    ("bpchar", DataType::Bpchar),
    ("text", DataType::Text),
    ("string", DataType::String),
    ("uuid", DataType::Uuid),
    ("enum", DataType::Enum),
    ("blob", DataType::Blob),
    ("bytea", DataType::Bytea),
    ("binary", DataType::Binary),
    ("varbinary", DataType::Varbinary),
    ("bit", DataType::Bit),
    ("bitstring", DataType::Bitstring),
    ("list", DataType::List),
    ("map", DataType::Map),
    ("struct", DataType::Struct),
    ("union", DataType::Union),
    ("null", DataType::Null),
];

impl DataType {
    /// Canonical lower-case engine name
    pub fn as_str(&self) -> &'static str {
        TYPE_NAMES
            .iter()
            .find(|(_, data_type)| data_type == self)
            .map(|(name, _)| *name)
            .unwrap_or("unknown")
    }

    /// Reduced classification used to pick mark geometry
    pub fn simplified(&self) -> SimplifiedType {
        simplified_data_type(*self)
    }

    /// Icon and colour used when presenting this type
    pub fn metadata(&self) -> DataTypeMetadata {
        data_type_metadata(*self)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<DataType> for &'static str {
    fn from(data_type: DataType) -> Self {
        data_type.as_str()
    }
}

impl From<String> for DataType {
    fn from(type_name: String) -> Self {
        classify_data_type(&type_name)
    }
}

/// Map an engine type string to its tag.
///
/// The string is trimmed and lower-cased, then matched exactly. Total:
/// unrecognized strings (including parameterized forms like `decimal(18,3)`)
/// become [`DataType::Unknown`].
pub fn classify_data_type(type_name: &str) -> DataType {
    let normalized = type_name.trim().to_lowercase();
    TYPE_NAMES
        .iter()
        .find(|(name, _)| *name == normalized)
        .map(|(_, data_type)| *data_type)
        .unwrap_or(DataType::Unknown)
}

/// Five-way classification of a detailed type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimplifiedType {
    Temporal,
    Quantitative,
    Ordinal,
    Nominal,
    Unknown,
}

impl SimplifiedType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SimplifiedType::Temporal => "temporal",
            SimplifiedType::Quantitative => "quantitative",
            SimplifiedType::Ordinal => "ordinal",
            SimplifiedType::Nominal => "nominal",
            SimplifiedType::Unknown => "unknown",
        }
    }

    /// Continuous axes (temporal or quantitative)
    pub fn is_continuous(&self) -> bool {
        matches!(self, SimplifiedType::Temporal | SimplifiedType::Quantitative)
    }

    /// Vega-Lite encoding type; unknown columns are treated as nominal
    pub fn vega_type(&self) -> &'static str {
        match self {
            SimplifiedType::Unknown => "nominal",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for SimplifiedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reduce a detailed type tag to its chart classification.
pub fn simplified_data_type(data_type: DataType) -> SimplifiedType {
    use DataType::*;

    match data_type {
        Date | Time | Timestamp | Datetime | TimestampTz | TimestampWithTimeZone => {
            SimplifiedType::Temporal
        }
        TinyInt | SmallInt | Integer | Int | Int1 | Int2 | Int4 | Int8 | BigInt | HugeInt
        | UTinyInt | USmallInt | UInteger | UBigInt | UHugeInt | Signed | Short | Long
        | Float | Float4 | Real | Double | Float8 | Decimal | Numeric => {
            SimplifiedType::Quantitative
        }
        Boolean | Bool | Logical => SimplifiedType::Ordinal,
        Varchar | Char | Bpchar | Text | String | Uuid | Enum | Interval => {
            SimplifiedType::Nominal
        }
        Blob | Bytea | Binary | Varbinary | Bit | Bitstring | List | Map | Struct | Union
        | Null | Unknown => SimplifiedType::Unknown,
    }
}

/// Icon shown next to a column of a given type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeIcon {
    Hash,
    Decimal,
    Toggle,
    Calendar,
    Clock,
    Text,
    Binary,
    Braces,
    Empty,
    Question,
}

/// Display metadata for a type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DataTypeMetadata {
    pub icon: TypeIcon,
    pub color: &'static str,
}

/// Display metadata lookup. Total and side-effect free.
pub fn data_type_metadata(data_type: DataType) -> DataTypeMetadata {
    use DataType::*;

    let (icon, color) = match data_type {
        TinyInt | SmallInt | Integer | Int | Int1 | Int2 | Int4 | Int8 | BigInt | HugeInt
        | UTinyInt | USmallInt | UInteger | UBigInt | UHugeInt | Signed | Short | Long => {
            (TypeIcon::Hash, "blue")
        }
        Float | Float4 | Real | Double | Float8 | Decimal | Numeric => {
            (TypeIcon::Decimal, "indigo")
        }
        Boolean | Bool | Logical => (TypeIcon::Toggle, "green"),
        Date | Timestamp | Datetime | TimestampTz | TimestampWithTimeZone => {
            (TypeIcon::Calendar, "orange")
        }
        Time | Interval => (TypeIcon::Clock, "amber"),
        Varchar | Char | Bpchar | Text | String | Uuid | Enum => (TypeIcon::Text, "gray"),
        Blob | Bytea | Binary | Varbinary | Bit | Bitstring => (TypeIcon::Binary, "purple"),
        List | Map | Struct | Union => (TypeIcon::Braces, "pink"),
        Null => (TypeIcon::Empty, "slate"),
        Unknown => (TypeIcon::Question, "red"),
    };

    DataTypeMetadata { icon, color }
}
