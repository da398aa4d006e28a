//! Scalar element types for HLO values.
//!
//! Every value flowing through the graph has an [`ElementType`] describing its
//! scalar kind. Shapes pair an element type with dimensions; this crate only
//! knows about the scalar kinds and how constant values cast between them.

pub mod cast;


pub use cast::ScalarValue;

/// Scalar element type of an HLO value.
///
/// Closed set, matched exhaustively at every dispatch site so that adding a
/// kind forces all typing rules to be revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(strum::EnumIter, strum::EnumCount)]
pub enum ElementType {
    /// Boolean predicate.
    Pred,

    S8,
    S16,
    S32,
    S64,

    U8,
    U16,
    U32,
    U64,

    F32,
    F64,
}

impl ElementType {
    /// Storage width in bytes.
    pub const fn bytes(&self) -> usize {
        match self {
            Self::Pred => 1,
            Self::S8 | Self::U8 => 1,
            Self::S16 | Self::U16 => 2,
            Self::S32 | Self::U32 | Self::F32 => 4,
            Self::S64 | Self::U64 | Self::F64 => 8,
        }
    }

    pub const fn is_pred(&self) -> bool {
        matches!(self, Self::Pred)
    }

    pub const fn is_signed(&self) -> bool {
        matches!(self, Self::S8 | Self::S16 | Self::S32 | Self::S64)
    }

    pub const fn is_unsigned(&self) -> bool {
        matches!(self, Self::U8 | Self::U16 | Self::U32 | Self::U64)
    }

    pub const fn is_integral(&self) -> bool {
        self.is_signed() || self.is_unsigned()
    }

    pub const fn is_float(&self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    /// True for every type arithmetic is defined on (everything but `Pred`).
    pub const fn is_numeric(&self) -> bool {
        self.is_integral() || self.is_float()
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Pred => "pred",
            Self::S8 => "s8",
            Self::S16 => "s16",
            Self::S32 => "s32",
            Self::S64 => "s64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
        };
        f.write_str(name)
    }
}
