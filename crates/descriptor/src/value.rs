//! Field values

use crate::kind::FieldKind;
use serde::{Deserialize, Serialize};

/// Value bound to a descriptor field
///
/// Deserializes from a bare integer or an integer array, so config files can
/// write `bcdUVC = 0x0150` or `baInterfaceNr = [1, 2]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Scalar(u32),
    List(Vec<u32>),
}

impl FieldValue {
    pub fn as_scalar(&self) -> Option<u32> {
        match self {
            Self::Scalar(value) => Some(*value),
            Self::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[u32]> {
        match self {
            Self::Scalar(_) => None,
            Self::List(values) => Some(values),
        }
    }

    /// Scalar values match scalar kinds, lists match list kinds
    pub fn matches_shape(&self, kind: FieldKind) -> bool {
        matches!(
            (self, kind),
            (Self::Scalar(_), FieldKind::Scalar(_)) | (Self::List(_), FieldKind::List(_))
        )
    }

    /// Shape matches and every integer fits the element width
    pub fn fits(&self, kind: FieldKind) -> bool {
        let element = kind.element();
        self.matches_shape(kind) && self.integers().all(|value| element.fits(value))
    }

    /// Encoded size in bytes when stored in a field of `kind`
    pub fn encoded_width(&self, kind: FieldKind) -> usize {
        match self {
            Self::Scalar(_) => kind.width(),
            Self::List(values) => kind.width() * values.len(),
        }
    }

    /// Integers in wire order
    pub fn integers(&self) -> impl Iterator<Item = u32> + '_ {
        let slice: &[u32] = match self {
            Self::Scalar(value) => std::slice::from_ref(value),
            Self::List(values) => values,
        };
        slice.iter().copied()
    }
}

impl From<u8> for FieldValue {
    fn from(value: u8) -> Self {
        Self::Scalar(value.into())
    }
}

impl From<u16> for FieldValue {
    fn from(value: u16) -> Self {
        Self::Scalar(value.into())
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<u32>> for FieldValue {
    fn from(values: Vec<u32>) -> Self {
        Self::List(values)
    }
}

impl From<&[u8]> for FieldValue {
    fn from(values: &[u8]) -> Self {
        Self::List(values.iter().copied().map(u32::from).collect())
    }
}

impl<const N: usize> From<[u8; N]> for FieldValue {
    fn from(values: [u8; N]) -> Self {
        Self::from(&values[..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::ScalarKind;

    #[test]
    fn test_shape_matching() {
        assert!(FieldValue::Scalar(1).matches_shape(FieldKind::U8));
        assert!(!FieldValue::Scalar(1).matches_shape(FieldKind::list(ScalarKind::U8)));
        assert!(FieldValue::List(vec![1]).matches_shape(FieldKind::list(ScalarKind::U8)));
        assert!(!FieldValue::List(vec![1]).matches_shape(FieldKind::U8));
    }

    #[test]
    fn test_fits_checks_every_element() {
        let kind = FieldKind::list(ScalarKind::U8);
        assert!(FieldValue::from([1u8, 2, 3]).fits(kind));
        assert!(!FieldValue::List(vec![1, 0x100]).fits(kind));
    }

    #[test]
    fn test_encoded_width() {
        assert_eq!(FieldValue::Scalar(7).encoded_width(FieldKind::U32), 4);
        let list = FieldValue::List(vec![1, 2, 3]);
        assert_eq!(list.encoded_width(FieldKind::list(ScalarKind::U16)), 6);
        assert_eq!(FieldValue::List(Vec::new()).encoded_width(FieldKind::list(ScalarKind::U8)), 0);
    }

    #[test]
    fn test_deserialize_from_toml() {
        #[derive(Deserialize)]
        struct Values {
            scalar: FieldValue,
            list: FieldValue,
        }

        let parsed: Values = toml::from_str("scalar = 0x0150\nlist = [1, 2]").unwrap();
        assert_eq!(parsed.scalar, FieldValue::Scalar(0x0150));
        assert_eq!(parsed.list, FieldValue::List(vec![1, 2]));
    }
}
