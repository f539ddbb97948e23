//! Field kinds and their wire widths
//!
//! Every descriptor field is one of four fixed-width little-endian integers, or
//! a list of one of them. Lists carry no count prefix on the wire; their
//! element count only shows up in the descriptor's length byte.

use byteorder::{LittleEndian, WriteBytesExt};
use std::fmt;
use std::io::{self, Write};

/// Fixed-width unsigned integer encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// 1 byte
    U8,
    /// 2 bytes, little-endian
    U16,
    /// 3 bytes, little-endian
    U24,
    /// 4 bytes, little-endian
    U32,
}

impl ScalarKind {
    /// Encoded width in bytes
    pub const fn width(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::U24 => 3,
            Self::U32 => 4,
        }
    }

    /// Largest value representable in this width
    pub const fn max_value(self) -> u32 {
        match self {
            Self::U8 => 0xFF,
            Self::U16 => 0xFFFF,
            Self::U24 => 0x00FF_FFFF,
            Self::U32 => u32::MAX,
        }
    }

    /// Whether `value` fits without truncation
    pub const fn fits(self, value: u32) -> bool {
        value <= self.max_value()
    }

    /// Write `value` little-endian using exactly `width()` bytes.
    ///
    /// The caller must have checked `fits(value)`.
    pub(crate) fn write_le<W: Write>(self, writer: &mut W, value: u32) -> io::Result<()> {
        match self {
            Self::U8 => writer.write_u8(value as u8),
            Self::U16 => writer.write_u16::<LittleEndian>(value as u16),
            Self::U24 => writer.write_u24::<LittleEndian>(value),
            Self::U32 => writer.write_u32::<LittleEndian>(value),
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U24 => "u24",
            Self::U32 => "u32",
        };
        f.write_str(name)
    }
}

/// Kind of a descriptor field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Single integer
    Scalar(ScalarKind),
    /// Variable number of integers, each of the element kind
    List(ScalarKind),
}

impl FieldKind {
    pub const U8: Self = Self::Scalar(ScalarKind::U8);
    pub const U16: Self = Self::Scalar(ScalarKind::U16);
    pub const U24: Self = Self::Scalar(ScalarKind::U24);
    pub const U32: Self = Self::Scalar(ScalarKind::U32);

    /// List of `element` values
    pub const fn list(element: ScalarKind) -> Self {
        Self::List(element)
    }

    /// Width of one encoded element.
    ///
    /// For lists this is the per-element width; multiply by the runtime
    /// element count to get the field's encoded size.
    pub const fn width(self) -> usize {
        self.element().width()
    }

    /// Scalar kind of the value, or of each list element
    pub const fn element(self) -> ScalarKind {
        match self {
            Self::Scalar(kind) | Self::List(kind) => kind,
        }
    }

    pub const fn is_list(self) -> bool {
        matches!(self, Self::List(_))
    }
}

impl From<ScalarKind> for FieldKind {
    fn from(kind: ScalarKind) -> Self {
        Self::Scalar(kind)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => write!(f, "{}", kind),
            Self::List(kind) => write!(f, "list<{}>", kind),
        }
    }
}
