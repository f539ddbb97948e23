//! Descriptor encoding
//!
//! Turns a bound [`DescriptorRecord`] into its wire bytes.
//!
//! # Descriptor Format
//!
//! ```text
//! [bLength: u8][bDescriptorType: u8]([bDescriptorSubType: u8])[fields...]
//! ```
//!
//! Fields follow in effective schema order, little-endian. List fields are the
//! concatenation of their elements with no count prefix.

use crate::error::{EncodeError, OverflowError};
use crate::kind::{FieldKind, ScalarKind};
use crate::record::DescriptorRecord;
use crate::value::FieldValue;
use byteorder::WriteBytesExt;
use std::io::Write;
use tracing::trace;

/// Encode a record to descriptor bytes
///
/// # Example
/// ```
/// use descriptor::{DescriptorRecord, DescriptorSchema, FieldKind, HeaderConstants, encode};
///
/// let schema = DescriptorSchema::builder("cs_interrupt_endpoint", HeaderConstants::with_subtype(0x25, 0x03))
///     .field("wMaxTransferSize", FieldKind::U16, 0x0040u16)
///     .build()
///     .unwrap();
/// let record = DescriptorRecord::with_defaults(&schema);
/// let bytes = encode(&record).unwrap();
/// assert_eq!(bytes, [0x05, 0x25, 0x03, 0x40, 0x00]);
/// ```
pub fn encode(record: &DescriptorRecord) -> Result<Vec<u8>, EncodeError> {
    let schema = record.schema();
    let length = record.length()?;
    let header = schema.header();

    let mut bytes = Vec::with_capacity(usize::from(length));
    bytes.write_u8(length)?;
    bytes.write_u8(header.type_tag)?;
    if let Some(subtype) = header.subtype_tag {
        bytes.write_u8(subtype)?;
    }

    for (field, value) in record.bindings() {
        let value = value.ok_or_else(|| EncodeError::Unbound {
            schema: schema.name().to_string(),
            field: field.name().to_string(),
        })?;

        match (field.kind(), value) {
            (FieldKind::Scalar(kind), FieldValue::Scalar(value)) => {
                write_scalar(&mut bytes, field.name(), kind, *value)?;
            }
            (FieldKind::List(kind), FieldValue::List(values)) => {
                for value in values {
                    write_scalar(&mut bytes, field.name(), kind, *value)?;
                }
            }
            (kind, _) => {
                return Err(EncodeError::ShapeMismatch {
                    schema: schema.name().to_string(),
                    field: field.name().to_string(),
                    kind,
                });
            }
        }
    }

    debug_assert_eq!(bytes.len(), usize::from(length));
    trace!(schema = %schema.name(), length, "Encoded descriptor");

    Ok(bytes)
}

/// Encode a record into a writer
///
/// The record is fully encoded before anything is written, so a failed encode
/// leaves the writer untouched. Returns the number of bytes written.
pub fn encode_into<W: Write>(record: &DescriptorRecord, writer: &mut W) -> Result<usize, EncodeError> {
    let bytes = encode(record)?;
    writer.write_all(&bytes)?;
    Ok(bytes.len())
}

/// Encode records back to back, in order
///
/// This is the byte block a configuration assembler splices after an
/// interface descriptor.
pub fn encode_all<'a, I>(records: I) -> Result<Vec<u8>, EncodeError>
where
    I: IntoIterator<Item = &'a DescriptorRecord>,
{
    let mut block = Vec::new();
    for record in records {
        encode_into(record, &mut block)?;
    }
    Ok(block)
}

/// Summed bLength of a sequence of records
///
/// Suitable for class-specific `wTotalLength` fields.
pub fn total_length<'a, I>(records: I) -> Result<usize, OverflowError>
where
    I: IntoIterator<Item = &'a DescriptorRecord>,
{
    records
        .into_iter()
        .map(|record| record.length().map(usize::from))
        .sum()
}

fn write_scalar<W: Write>(
    writer: &mut W,
    field: &str,
    kind: ScalarKind,
    value: u32,
) -> Result<(), EncodeError> {
    if !kind.fits(value) {
        return Err(OverflowError::Value {
            field: field.to_string(),
            value,
            kind,
        }
        .into());
    }
    kind.write_le(writer, value)?;
    Ok(())
}
