//! Typed destinations for flag values.
//!
//! A [`Value`] is a closed set of sinks: a single bool, string or number, or
//! a growable sequence of one of those. Text is converted on
//! [`Value::apply`]; single sinks keep the last applied value, sequences
//! append.

use std::fmt;

use thiserror::Error;

/// Failure to convert command line text into the sink's type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("invalid boolean `{0}`")]
    Bool(String),
    #[error("invalid number `{0}`")]
    Number(String),
    #[error("`{0}` is not an integer")]
    Fraction(String),
    #[error("`{value}` is out of range for {kind}")]
    OutOfRange { value: String, kind: NumKind },
}

/// Accepts `true, t, yes, y, 1` and `false, f, no, n, 0`, ignoring case.
pub fn parse_bool(text: &str) -> Result<bool, ConversionError> {
    match text.to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" => Ok(true),
        "false" | "f" | "no" | "n" | "0" => Ok(false),
        _ => Err(ConversionError::Bool(text.to_string())),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumKind {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl NumKind {
    pub fn name(self) -> &'static str {
        match self {
            NumKind::I8 => "i8",
            NumKind::I16 => "i16",
            NumKind::I32 => "i32",
            NumKind::I64 => "i64",
            NumKind::U8 => "u8",
            NumKind::U16 => "u16",
            NumKind::U32 => "u32",
            NumKind::U64 => "u64",
            NumKind::F32 => "f32",
            NumKind::F64 => "f64",
        }
    }

    pub fn zero(self) -> Number {
        match self {
            NumKind::I8 => Number::I8(0),
            NumKind::I16 => Number::I16(0),
            NumKind::I32 => Number::I32(0),
            NumKind::I64 => Number::I64(0),
            NumKind::U8 => Number::U8(0),
            NumKind::U16 => Number::U16(0),
            NumKind::U32 => Number::U32(0),
            NumKind::U64 => Number::U64(0),
            NumKind::F32 => Number::F32(0.0),
            NumKind::F64 => Number::F64(0.0),
        }
    }
}

impl fmt::Display for NumKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
}

impl Number {
    /// Parses `text` as an `f64` to validate it, then narrows it to `kind`.
    ///
    /// Integer kinds reject fractional and out-of-range values instead of
    /// truncating them.
    pub fn parse(kind: NumKind, text: &str) -> Result<Number, ConversionError> {
        let float =
            text.parse::<f64>().map_err(|_| ConversionError::Number(text.to_string()))?;

        macro_rules! narrow {
            ($variant:ident, $ty:ty) => {{
                if let Ok(exact) = text.parse::<$ty>() {
                    return Ok(Number::$variant(exact));
                }
                // Integer literal that didn't fit; its f64 may round back into range.
                if text.parse::<i128>().is_ok() {
                    return Err(ConversionError::OutOfRange { value: text.to_string(), kind });
                }
                if !float.is_finite() || float.fract() != 0.0 {
                    return Err(ConversionError::Fraction(text.to_string()));
                }
                // `MAX as f64` rounds up for 64-bit types, so compare against
                // the exact power of two above `MAX`.
                let upper = (<$ty>::MAX / 2 + 1) as f64 * 2.0;
                if float < <$ty>::MIN as f64 || float >= upper {
                    return Err(ConversionError::OutOfRange { value: text.to_string(), kind });
                }
                Number::$variant(float as $ty)
            }};
        }

        let number = match kind {
            NumKind::I8 => narrow!(I8, i8),
            NumKind::I16 => narrow!(I16, i16),
            NumKind::I32 => narrow!(I32, i32),
            NumKind::I64 => narrow!(I64, i64),
            NumKind::U8 => narrow!(U8, u8),
            NumKind::U16 => narrow!(U16, u16),
            NumKind::U32 => narrow!(U32, u32),
            NumKind::U64 => narrow!(U64, u64),
            NumKind::F32 => {
                if float.is_finite() && float.abs() > f32::MAX as f64 {
                    return Err(ConversionError::OutOfRange { value: text.to_string(), kind });
                }
                Number::F32(float as f32)
            }
            NumKind::F64 => Number::F64(float),
        };
        Ok(number)
    }

    pub fn kind(self) -> NumKind {
        match self {
            Number::I8(_) => NumKind::I8,
            Number::I16(_) => NumKind::I16,
            Number::I32(_) => NumKind::I32,
            Number::I64(_) => NumKind::I64,
            Number::U8(_) => NumKind::U8,
            Number::U16(_) => NumKind::U16,
            Number::U32(_) => NumKind::U32,
            Number::U64(_) => NumKind::U64,
            Number::F32(_) => NumKind::F32,
            Number::F64(_) => NumKind::F64,
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Number::I8(it) => it.into(),
            Number::I16(it) => it.into(),
            Number::I32(it) => it.into(),
            Number::I64(it) => it as f64,
            Number::U8(it) => it.into(),
            Number::U16(it) => it.into(),
            Number::U32(it) => it.into(),
            Number::U64(it) => it as f64,
            Number::F32(it) => it.into(),
            Number::F64(it) => it,
        }
    }

    /// Returns `None` for floats and for values that don't fit.
    pub fn as_i64(self) -> Option<i64> {
        match self {
            Number::I8(it) => Some(it.into()),
            Number::I16(it) => Some(it.into()),
            Number::I32(it) => Some(it.into()),
            Number::I64(it) => Some(it),
            Number::U8(it) => Some(it.into()),
            Number::U16(it) => Some(it.into()),
            Number::U32(it) => Some(it.into()),
            Number::U64(it) => i64::try_from(it).ok(),
            Number::F32(_) | Number::F64(_) => None,
        }
    }

    /// Returns `None` for floats and for negative values.
    pub fn as_u64(self) -> Option<u64> {
        match self {
            Number::I8(it) => u64::try_from(it).ok(),
            Number::I16(it) => u64::try_from(it).ok(),
            Number::I32(it) => u64::try_from(it).ok(),
            Number::I64(it) => u64::try_from(it).ok(),
            Number::U8(it) => Some(it.into()),
            Number::U16(it) => Some(it.into()),
            Number::U32(it) => Some(it.into()),
            Number::U64(it) => Some(it),
            Number::F32(_) | Number::F64(_) => None,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I8(it) => fmt::Display::fmt(it, f),
            Number::I16(it) => fmt::Display::fmt(it, f),
            Number::I32(it) => fmt::Display::fmt(it, f),
            Number::I64(it) => fmt::Display::fmt(it, f),
            Number::U8(it) => fmt::Display::fmt(it, f),
            Number::U16(it) => fmt::Display::fmt(it, f),
            Number::U32(it) => fmt::Display::fmt(it, f),
            Number::U64(it) => fmt::Display::fmt(it, f),
            Number::F32(it) => fmt::Display::fmt(it, f),
            Number::F64(it) => fmt::Display::fmt(it, f),
        }
    }
}

/// A single converted element, before it is stored into a sink.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    String(String),
    Number(Number),
}

impl Scalar {
    /// Numbers compare by value regardless of width, strings exactly.
    pub(crate) fn same(&self, other: &Scalar) -> bool {
        match (self, other) {
            (Scalar::Bool(l), Scalar::Bool(r)) => l == r,
            (Scalar::String(l), Scalar::String(r)) => l == r,
            (Scalar::Number(l), Scalar::Number(r)) => l.as_f64() == r.as_f64(),
            _ => false,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(it) => fmt::Display::fmt(it, f),
            Scalar::String(it) => f.write_str(it),
            Scalar::Number(it) => fmt::Display::fmt(it, f),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    String(String),
    Number(Number),
    BoolSeq(Vec<bool>),
    StringSeq(Vec<String>),
    NumberSeq(NumKind, Vec<Number>),
}

impl Value {
    pub fn bool() -> Value {
        Value::Bool(false)
    }
    pub fn string() -> Value {
        Value::String(String::new())
    }
    pub fn number(kind: NumKind) -> Value {
        Value::Number(kind.zero())
    }
    pub fn bool_seq() -> Value {
        Value::BoolSeq(Vec::new())
    }
    pub fn string_seq() -> Value {
        Value::StringSeq(Vec::new())
    }
    pub fn number_seq(kind: NumKind) -> Value {
        Value::NumberSeq(kind, Vec::new())
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_) | Value::BoolSeq(_))
    }

    pub fn is_seq(&self) -> bool {
        matches!(self, Value::BoolSeq(_) | Value::StringSeq(_) | Value::NumberSeq(..))
    }

    pub fn type_name(&self) -> String {
        match self {
            Value::Bool(_) => "bool".to_string(),
            Value::String(_) => "string".to_string(),
            Value::Number(it) => it.kind().to_string(),
            Value::BoolSeq(_) => "[bool]".to_string(),
            Value::StringSeq(_) => "[string]".to_string(),
            Value::NumberSeq(kind, _) => format!("[{kind}]"),
        }
    }

    /// Converts `text` into this sink's element type without storing it.
    pub fn convert(&self, text: &str) -> Result<Scalar, ConversionError> {
        let scalar = match self {
            Value::Bool(_) | Value::BoolSeq(_) => Scalar::Bool(parse_bool(text)?),
            Value::String(_) | Value::StringSeq(_) => Scalar::String(text.to_string()),
            Value::Number(it) => Scalar::Number(Number::parse(it.kind(), text)?),
            Value::NumberSeq(kind, _) => Scalar::Number(Number::parse(*kind, text)?),
        };
        Ok(scalar)
    }

    pub fn apply(&mut self, text: &str) -> Result<(), ConversionError> {
        let scalar = self.convert(text)?;
        self.store(scalar);
        Ok(())
    }

    pub(crate) fn store(&mut self, scalar: Scalar) {
        match (self, scalar) {
            (Value::Bool(slot), Scalar::Bool(it)) => *slot = it,
            (Value::String(slot), Scalar::String(it)) => *slot = it,
            (Value::Number(slot), Scalar::Number(it)) => *slot = it,
            (Value::BoolSeq(seq), Scalar::Bool(it)) => seq.push(it),
            (Value::StringSeq(seq), Scalar::String(it)) => seq.push(it),
            (Value::NumberSeq(_, seq), Scalar::Number(it)) => seq.push(it),
            // `convert` only ever produces the element type of the sink.
            (value, scalar) => unreachable!("{scalar:?} stored into {}", value.type_name()),
        }
    }

    /// Restores the zero value: `false`, empty string, zero, empty sequence.
    pub fn reset(&mut self) {
        match self {
            Value::Bool(it) => *it = false,
            Value::String(it) => it.clear(),
            Value::Number(it) => *it = it.kind().zero(),
            Value::BoolSeq(it) => it.clear(),
            Value::StringSeq(it) => it.clear(),
            Value::NumberSeq(_, it) => it.clear(),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(it) => Some(*it),
            _ => None,
        }
    }
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(it) => Some(it.as_str()),
            _ => None,
        }
    }
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(it) => Some(*it),
            _ => None,
        }
    }
    pub fn as_bools(&self) -> Option<&[bool]> {
        match self {
            Value::BoolSeq(it) => Some(it.as_slice()),
            _ => None,
        }
    }
    pub fn as_strs(&self) -> Option<&[String]> {
        match self {
            Value::StringSeq(it) => Some(it.as_slice()),
            _ => None,
        }
    }
    pub fn as_numbers(&self) -> Option<&[Number]> {
        match self {
            Value::NumberSeq(_, it) => Some(it.as_slice()),
            _ => None,
        }
    }
}
