//! Descriptor encoding library for fake UVC webcams
//!
//! This crate turns typed field definitions into the exact byte layout of USB
//! Video Class and standard USB descriptors. A [`DescriptorSchema`] lists a
//! descriptor's fields in wire order; a [`DescriptorRecord`] binds values to
//! them; [`encode`] produces the bytes, computing the `bLength` prefix from the
//! bound values.
//!
//! # Example
//!
//! ```
//! use descriptor::{DescriptorRecord, DescriptorSchema, FieldKind, HeaderConstants, ScalarKind};
//! use descriptor::encode;
//!
//! let schema = DescriptorSchema::builder("vc_header", HeaderConstants::with_subtype(0x24, 0x01))
//!     .field("bcdUVC", FieldKind::U16, 0x0150u16)
//!     .field("wTotalLength", FieldKind::U16, 0x0028u16)
//!     .field("dwClockFrequency", FieldKind::U32, 27_000_000u32)
//!     .field("bInCollection", FieldKind::U8, 1u8)
//!     .field("baInterfaceNr", FieldKind::list(ScalarKind::U8), [1u8])
//!     .build()
//!     .unwrap();
//!
//! let record = DescriptorRecord::with_defaults(&schema);
//! let bytes = encode(&record).unwrap();
//! assert_eq!(bytes[0], 13);
//! assert_eq!(bytes.len(), 13);
//! ```
//!
//! # Built-in Schemas
//!
//! The [`catalog`] holds the UVC descriptors a video function needs, from the
//! interface association down to MJPEG frame descriptors:
//!
//! ```
//! use descriptor::{DescriptorRecord, catalog};
//!
//! let schema = catalog().unwrap().get("output_terminal").unwrap();
//! let record = DescriptorRecord::bind(schema, [("bSourceID", 5u8)]).unwrap();
//! assert_eq!(record.encode().unwrap(), [0x09, 0x24, 0x03, 0x02, 0x01, 0x01, 0x00, 0x05, 0x00]);
//! ```

pub mod catalog;
pub mod encoder;
pub mod error;
pub mod kind;
pub mod record;
pub mod registry;
pub mod role;
pub mod schema;
pub mod uvc;
pub mod value;

pub use catalog::{Catalog, catalog};
pub use encoder::{encode, encode_all, encode_into, total_length};
pub use error::{
    DescriptorError, EncodeError, OverflowError, Result, SchemaError, UnknownCodeError,
    ValidationError,
};
pub use kind::{FieldKind, ScalarKind};
pub use record::DescriptorRecord;
pub use registry::{CodeEntry, CodeTable};
pub use role::{DescriptorRole, UsbDescriptor};
pub use schema::{DescriptorSchema, FieldRole, FieldSpec, HeaderConstants, SchemaBuilder};
pub use uvc::UvcError;
pub use value::FieldValue;
