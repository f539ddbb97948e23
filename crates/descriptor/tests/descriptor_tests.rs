//! Integration tests for schema definition, binding and encoding
//!
//! Covers the length invariant, override precedence, constant immutability,
//! overflow rejection and the UVC error-code registry through the public API.

use descriptor::uvc::request;
use descriptor::{
    DescriptorRecord, DescriptorSchema, EncodeError, FieldKind, FieldValue, HeaderConstants,
    OverflowError, ScalarKind, UnknownCodeError, UvcError, ValidationError, encode, encode_all,
    total_length,
};
use std::sync::Arc;

/// Class-specific VideoControl interface header with UVC 1.5 defaults
fn vc_interface_header() -> Arc<DescriptorSchema> {
    DescriptorSchema::builder("vc_header", HeaderConstants::with_subtype(0x24, 0x01))
        .field("bcdUVC", FieldKind::U16, 0x0150u16)
        .field("wTotalLength", FieldKind::U16, 0x0028u16)
        .field("dwClockFrequency", FieldKind::U32, 27_000_000u32)
        .field("bInCollection", FieldKind::U8, 1u8)
        .field("baInterfaceNr", FieldKind::list(ScalarKind::U8), [1u8])
        .build()
        .expect("Failed to define vc_header")
}

fn input_terminal() -> Arc<DescriptorSchema> {
    DescriptorSchema::builder("input_terminal", HeaderConstants::with_subtype(0x24, 0x02))
        .field("bTerminalID", FieldKind::U8, 1u8)
        .field("wTerminalType", FieldKind::U16, 0x0201u16)
        .field("bAssocTerminal", FieldKind::U8, 0u8)
        .field("iTerminal", FieldKind::U8, 0u8)
        .build()
        .expect("Failed to define input_terminal")
}

mod encoding {
    use super::*;

    #[test]
    fn test_vc_interface_header_bytes() {
        let record = DescriptorRecord::with_defaults(&vc_interface_header());
        let bytes = encode(&record).expect("Failed to encode");

        assert_eq!(
            bytes,
            [0x0D, 0x24, 0x01, 0x50, 0x01, 0x28, 0x00, 0xC0, 0xFC, 0x9B, 0x01, 0x01, 0x01]
        );
    }

    #[test]
    fn test_encode_is_deterministic() {
        let record = DescriptorRecord::with_defaults(&vc_interface_header());
        assert_eq!(encode(&record).unwrap(), encode(&record).unwrap());
    }

    #[test]
    fn test_encode_does_not_mutate_record() {
        let record = DescriptorRecord::bind(&vc_interface_header(), [("bInCollection", 2u8)])
            .expect("Failed to bind");
        let before: Vec<_> = record.bindings().map(|(_, v)| v.cloned()).collect();

        encode(&record).unwrap();

        let after: Vec<_> = record.bindings().map(|(_, v)| v.cloned()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_standard_descriptor_has_no_subtype_byte() {
        let schema = DescriptorSchema::builder("endpoint", HeaderConstants::new(0x05))
            .field("bEndpointAddress", FieldKind::U8, 0x82u8)
            .field("bmAttributes", FieldKind::U8, 0x02u8)
            .field("wMaxPacketSize", FieldKind::U16, 0x0200u16)
            .field("bInterval", FieldKind::U8, 0u8)
            .build()
            .unwrap();

        let bytes = encode(&DescriptorRecord::with_defaults(&schema)).unwrap();
        assert_eq!(bytes, [0x07, 0x05, 0x82, 0x02, 0x00, 0x02, 0x00]);
    }

    #[test]
    fn test_value_overflow_is_rejected_not_truncated() {
        let schema = DescriptorSchema::builder("unit", HeaderConstants::with_subtype(0x24, 0x04))
            .field("bUnitID", FieldKind::U8, 1u8)
            .build()
            .unwrap();
        let record = DescriptorRecord::bind(&schema, [("bUnitID", 256u32)])
            .expect("Binding does not range-check");

        let result = encode(&record);
        let Err(EncodeError::Overflow(OverflowError::Value { field, value, kind })) = result else {
            panic!("Expected value overflow, got {:?}", result);
        };
        assert_eq!(field, "bUnitID");
        assert_eq!(value, 256);
        assert_eq!(kind, ScalarKind::U8);
    }

    #[test]
    fn test_unbound_required_field_fails() {
        let schema = DescriptorSchema::builder("header", HeaderConstants::with_subtype(0x24, 0x01))
            .required("dwClockFrequency", FieldKind::U32)
            .build()
            .unwrap();

        let result = encode(&DescriptorRecord::with_defaults(&schema));
        assert!(matches!(result, Err(EncodeError::Unbound { .. })));

        let bound = DescriptorRecord::bind(&schema, [("dwClockFrequency", 6_000_000u32)]).unwrap();
        assert_eq!(encode(&bound).unwrap(), [0x07, 0x24, 0x01, 0x80, 0x8D, 0x5B, 0x00]);
    }

    #[test]
    fn test_encode_all_concatenates_in_order() {
        let header = DescriptorRecord::with_defaults(&vc_interface_header());
        let terminal = DescriptorRecord::with_defaults(&input_terminal());

        let block = encode_all([&header, &terminal]).unwrap();
        assert_eq!(block.len(), 13 + 8);
        assert_eq!(block[0], 13);
        assert_eq!(block[13], 8);
        assert_eq!(total_length([&header, &terminal]).unwrap(), block.len());
    }
}

mod schemas {
    use super::*;

    #[test]
    fn test_override_precedence() {
        let base = input_terminal();
        let composite = base.override_default("wTerminalType", 0x0401u16).unwrap();

        let record = DescriptorRecord::with_defaults(&composite);
        let bytes = encode(&record).unwrap();
        assert_eq!(&bytes[4..6], &[0x01, 0x04]);

        // The base keeps its own default
        let base_bytes = encode(&DescriptorRecord::with_defaults(&base)).unwrap();
        assert_eq!(&base_bytes[4..6], &[0x01, 0x02]);
    }

    #[test]
    fn test_derived_fields_follow_base_fields() {
        let base = input_terminal();
        let camera = DescriptorSchema::builder("camera_terminal", base.header())
            .extends(&base)
            .constant("wTerminalType", FieldKind::U16, 0x0201u16)
            .field("wObjectiveFocalLengthMin", FieldKind::U16, 0x1234u16)
            .build()
            .unwrap();

        let bytes = encode(&DescriptorRecord::with_defaults(&camera)).unwrap();
        assert_eq!(bytes, [0x0A, 0x24, 0x02, 0x01, 0x01, 0x02, 0x00, 0x00, 0x34, 0x12]);
    }

    #[test]
    fn test_constant_field_cannot_be_bound() {
        let base = input_terminal();
        let composite = DescriptorSchema::builder("composite", base.header())
            .extends(&base)
            .constant("wTerminalType", FieldKind::U16, 0x0401u16)
            .build()
            .unwrap();

        let result = DescriptorRecord::bind(&composite, [("wTerminalType", 0x0201u16)]);
        let Err(ValidationError::ConstantField { schema, field }) = result else {
            panic!("Expected ConstantField error, got {:?}", result);
        };
        assert_eq!(schema, "composite");
        assert_eq!(field, "wTerminalType");
    }

    #[test]
    fn test_schema_shared_across_threads() {
        let schema = vc_interface_header();
        let handles: Vec<_> = (0..4u8)
            .map(|id| {
                let schema = Arc::clone(&schema);
                std::thread::spawn(move || {
                    let record = DescriptorRecord::bind(&schema, [("bInCollection", id)]).unwrap();
                    encode(&record).unwrap()
                })
            })
            .collect();

        for (id, handle) in handles.into_iter().enumerate() {
            let bytes = handle.join().expect("Encoder thread panicked");
            assert_eq!(bytes[11], id as u8);
        }
    }
}

mod overflow {
    use super::*;

    #[test]
    fn test_length_above_255_is_rejected() {
        let schema = DescriptorSchema::builder("xu", HeaderConstants::with_subtype(0x24, 0x06))
            .field("baSourceID", FieldKind::list(ScalarKind::U8), Vec::<u32>::new())
            .build()
            .unwrap();

        let mut record = DescriptorRecord::with_defaults(&schema);
        record.set("baSourceID", vec![0u32; 252]).unwrap();
        assert_eq!(record.length().unwrap(), 255);

        record.set("baSourceID", vec![0u32; 253]).unwrap();
        let result = record.length();
        assert!(matches!(result, Err(OverflowError::Length { length: 256, .. })));
        assert!(matches!(
            encode(&record),
            Err(EncodeError::Overflow(OverflowError::Length { .. }))
        ));
    }
}

mod codes {
    use super::*;

    #[test]
    fn test_unknown_error_code() {
        let result = UvcError::from_code(-42);
        assert_eq!(
            result,
            Err(UnknownCodeError {
                registry: UvcError::REGISTRY,
                code: -42
            })
        );
    }

    #[test]
    fn test_timeout_error_code() {
        let error = UvcError::from_code(-7).expect("-7 is a known code");
        assert_eq!(error, UvcError::Timeout);
        assert_eq!(error.name(), "ERROR_TIMEOUT");
        assert!(error.description().contains("timed out"));
    }

    #[test]
    fn test_entry_and_integer_comparison_agree() {
        for a in UvcError::ALL {
            for b in UvcError::ALL {
                assert_eq!(a == b, a == b.code());
            }
            assert!(a == a.code());
            assert!(a.code() == a);
        }
    }

    #[test]
    fn test_request_lookup() {
        let entry = request::TABLE.from_code(0x81).unwrap();
        assert_eq!(entry.name, "GET_CUR");
        assert!(*entry == i32::from(request::GET_CUR));
        assert!(request::TABLE.from_code(0x7F).is_err());
    }
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    fn scalar_kind_strategy() -> impl Strategy<Value = ScalarKind> {
        prop_oneof![
            Just(ScalarKind::U8),
            Just(ScalarKind::U16),
            Just(ScalarKind::U24),
            Just(ScalarKind::U32),
        ]
    }

    /// Scalar kind with an in-range value for it
    fn scalar_field_strategy() -> impl Strategy<Value = (ScalarKind, u32)> {
        scalar_kind_strategy().prop_flat_map(|kind| (Just(kind), 0..=kind.max_value()))
    }

    /// Schema with the given scalar fields and one list field at the end
    fn schema_with(fields: &[(ScalarKind, u32)], element: ScalarKind) -> Arc<DescriptorSchema> {
        let mut builder = DescriptorSchema::builder("generated", HeaderConstants::with_subtype(0x24, 0x10));
        for (index, (kind, value)) in fields.iter().enumerate() {
            builder = builder.field(&format!("field{index}"), FieldKind::Scalar(*kind), *value);
        }
        builder
            .field("items", FieldKind::list(element), Vec::<u32>::new())
            .build()
            .expect("Failed to define generated schema")
    }

    proptest! {
        /// Property: Encoding the same record twice gives the same bytes
        #[test]
        fn prop_encode_deterministic(
            fields in proptest::collection::vec(scalar_field_strategy(), 0..12),
            element in scalar_kind_strategy(),
        ) {
            let schema = schema_with(&fields, element);
            let record = DescriptorRecord::with_defaults(&schema);
            prop_assert_eq!(encode(&record).unwrap(), encode(&record).unwrap());
        }

        /// Property: The first byte, the computed length and the byte count agree
        #[test]
        fn prop_length_prefix_matches_size(
            fields in proptest::collection::vec(scalar_field_strategy(), 0..12),
            element in scalar_kind_strategy(),
            count in 0usize..40,
        ) {
            let schema = schema_with(&fields, element);
            let mut record = DescriptorRecord::with_defaults(&schema);
            record.set("items", vec![0u32; count]).unwrap();

            let expected = 3
                + fields.iter().map(|(kind, _)| kind.width()).sum::<usize>()
                + count * element.width();
            prop_assume!(expected <= 255);

            let bytes = encode(&record).unwrap();
            let length = record.length().unwrap();
            prop_assert_eq!(bytes[0], length);
            prop_assert_eq!(usize::from(length), bytes.len());
            prop_assert_eq!(bytes.len(), expected);
        }

        /// Property: Each added list element grows the length by its width
        #[test]
        fn prop_list_length_sensitivity(
            element in scalar_kind_strategy(),
            before in 0usize..20,
            after in 0usize..20,
        ) {
            let schema = schema_with(&[], element);
            let mut record = DescriptorRecord::with_defaults(&schema);

            record.set("items", vec![0u32; before]).unwrap();
            let short = i64::from(record.length().unwrap());
            record.set("items", vec![0u32; after]).unwrap();
            let long = i64::from(record.length().unwrap());

            let delta = after as i64 - before as i64;
            prop_assert_eq!(long - short, element.width() as i64 * delta);
        }

        /// Property: Scalars are written little-endian at their declared width
        #[test]
        fn prop_scalar_little_endian((kind, value) in scalar_field_strategy()) {
            let schema = schema_with(&[(kind, value)], ScalarKind::U8);
            let bytes = encode(&DescriptorRecord::with_defaults(&schema)).unwrap();

            let width = kind.width();
            let mut expected = value.to_le_bytes().to_vec();
            expected.truncate(width);
            prop_assert_eq!(&bytes[3..3 + width], expected.as_slice());
        }

        /// Property: Values above the declared width always fail to encode
        #[test]
        fn prop_oversized_value_rejected(
            kind in prop_oneof![Just(ScalarKind::U8), Just(ScalarKind::U16), Just(ScalarKind::U24)],
            excess in 1u32..1000,
        ) {
            let schema = schema_with(&[(kind, 0)], ScalarKind::U8);
            let value = kind.max_value() + excess;
            let record = DescriptorRecord::bind(&schema, [("field0", FieldValue::Scalar(value))]).unwrap();

            let overflowed = matches!(
                encode(&record),
                Err(EncodeError::Overflow(OverflowError::Value { .. }))
            );
            prop_assert!(overflowed);
        }

        /// Property: Unknown error codes never resolve to an entry
        #[test]
        fn prop_error_lookup_exact(code in -200i32..200) {
            match UvcError::from_code(code) {
                Ok(error) => prop_assert_eq!(error.code(), code),
                Err(err) => {
                    prop_assert_eq!(err.code, code);
                    prop_assert!(UvcError::ALL.iter().all(|e| e.code() != code));
                }
            }
        }
    }
}
