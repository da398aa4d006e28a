//! Scalar constant values and casting between element types.
//!
//! Values are stored at their widest width (`i64`/`u64`/`f64`) and tagged with
//! the storage family; the element type they are used at lives in the
//! surrounding literal/shape. Casting routes through the target width so that
//! narrowing behaves like the generated code would.

use crate::ElementType;

/// A scalar constant value.
///
/// `PartialEq` only (no `Eq`/`Hash`) because of the float payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarValue {
    Int(i64),
    UInt(u64),
    Float(f64),
    Pred(bool),
}

/// Cast to the target width and back to the storage type, so narrowing
/// truncates/extends the way the target type would.
macro_rules! cast_via {
    ($v:expr, $target:ty, $storage:ty) => {
        ($v as $target) as $storage
    };
}

impl ScalarValue {
    /// The widest element type that stores this value exactly.
    pub const fn storage_type(&self) -> ElementType {
        match self {
            Self::Int(_) => ElementType::S64,
            Self::UInt(_) => ElementType::U64,
            Self::Float(_) => ElementType::F64,
            Self::Pred(_) => ElementType::Pred,
        }
    }

    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Lossy view of the value as `f64`, for diagnostics and comparisons.
    pub fn to_f64(&self) -> f64 {
        match self {
            Self::Int(v) => *v as f64,
            Self::UInt(v) => *v as f64,
            Self::Float(v) => *v,
            Self::Pred(v) => *v as u8 as f64,
        }
    }

    /// Cast this value to `to`, with `as`-operator semantics for conversions
    /// (float to int saturates, integer narrowing truncates).
    pub fn cast(self, to: ElementType) -> ScalarValue {
        match self {
            Self::Pred(v) => cast_pred(v, to),
            Self::Int(v) => cast_int(v, to),
            Self::UInt(v) => cast_uint(v, to),
            Self::Float(v) => cast_float(v, to),
        }
    }
}

fn cast_pred(v: bool, to: ElementType) -> ScalarValue {
    use ElementType::*;
    match to {
        Pred => ScalarValue::Pred(v),
        S8 | S16 | S32 | S64 => ScalarValue::Int(v as i64),
        U8 | U16 | U32 | U64 => ScalarValue::UInt(v as u64),
        F32 | F64 => ScalarValue::Float(v as u8 as f64),
    }
}

fn cast_int(v: i64, to: ElementType) -> ScalarValue {
    use ElementType::*;
    match to {
        Pred => ScalarValue::Pred(v != 0),
        S8 => ScalarValue::Int(cast_via!(v, i8, i64)),
        S16 => ScalarValue::Int(cast_via!(v, i16, i64)),
        S32 => ScalarValue::Int(cast_via!(v, i32, i64)),
        S64 => ScalarValue::Int(v),
        U8 => ScalarValue::UInt(cast_via!(v, u8, u64)),
        U16 => ScalarValue::UInt(cast_via!(v, u16, u64)),
        U32 => ScalarValue::UInt(cast_via!(v, u32, u64)),
        U64 => ScalarValue::UInt(v as u64),
        F32 => ScalarValue::Float(cast_via!(v, f32, f64)),
        F64 => ScalarValue::Float(v as f64),
    }
}

fn cast_uint(v: u64, to: ElementType) -> ScalarValue {
    use ElementType::*;
    match to {
        Pred => ScalarValue::Pred(v != 0),
        S8 => ScalarValue::Int(cast_via!(v, i8, i64)),
        S16 => ScalarValue::Int(cast_via!(v, i16, i64)),
        S32 => ScalarValue::Int(cast_via!(v, i32, i64)),
        S64 => ScalarValue::Int(v as i64),
        U8 => ScalarValue::UInt(cast_via!(v, u8, u64)),
        U16 => ScalarValue::UInt(cast_via!(v, u16, u64)),
        U32 => ScalarValue::UInt(cast_via!(v, u32, u64)),
        U64 => ScalarValue::UInt(v),
        F32 => ScalarValue::Float(cast_via!(v, f32, f64)),
        F64 => ScalarValue::Float(v as f64),
    }
}

fn cast_float(v: f64, to: ElementType) -> ScalarValue {
    use ElementType::*;
    match to {
        Pred => ScalarValue::Pred(v != 0.0),
        S8 => ScalarValue::Int(cast_via!(v, i8, i64)),
        S16 => ScalarValue::Int(cast_via!(v, i16, i64)),
        S32 => ScalarValue::Int(cast_via!(v, i32, i64)),
        S64 => ScalarValue::Int(v as i64),
        U8 => ScalarValue::UInt(cast_via!(v, u8, u64)),
        U16 => ScalarValue::UInt(cast_via!(v, u16, u64)),
        U32 => ScalarValue::UInt(cast_via!(v, u32, u64)),
        U64 => ScalarValue::UInt(v as u64),
        F32 => ScalarValue::Float(cast_via!(v, f32, f64)),
        F64 => ScalarValue::Float(v),
    }
}

impl std::fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::UInt(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Pred(v) => write!(f, "{v}"),
        }
    }
}
