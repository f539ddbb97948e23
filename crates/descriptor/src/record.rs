//! Descriptor records: a schema with values bound to its fields

use crate::encoder;
use crate::error::{EncodeError, OverflowError, ValidationError};
use crate::schema::{DescriptorSchema, FieldSpec, HeaderConstants};
use crate::value::FieldValue;
use std::sync::Arc;

/// Concrete descriptor instance
///
/// Values are stored in effective-field order. A slot is `None` only for a
/// configurable field the schema gives no default and the caller never set;
/// encoding such a record fails.
#[derive(Debug, Clone)]
pub struct DescriptorRecord {
    schema: Arc<DescriptorSchema>,
    values: Vec<Option<FieldValue>>,
}

impl DescriptorRecord {
    /// Bind caller values over the schema defaults.
    ///
    /// Fails if a name is unknown, names a constant field, or the value shape
    /// (scalar vs list) does not match the field.
    pub fn bind<I, K, V>(schema: &Arc<DescriptorSchema>, overrides: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<FieldValue>,
    {
        let mut record = Self::with_defaults(schema);
        for (name, value) in overrides {
            record.set(name.as_ref(), value)?;
        }
        Ok(record)
    }

    /// Record holding only schema defaults
    pub fn with_defaults(schema: &Arc<DescriptorSchema>) -> Self {
        let values = schema
            .effective_fields()
            .iter()
            .map(|field| field.default().cloned())
            .collect();
        Self {
            schema: Arc::clone(schema),
            values,
        }
    }

    /// Replace one configurable field's value
    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<(), ValidationError> {
        let value = value.into();
        let index = self
            .schema
            .position(name)
            .ok_or_else(|| ValidationError::UnknownField {
                schema: self.schema.name().to_string(),
                field: name.to_string(),
            })?;

        let field = &self.schema.effective_fields()[index];
        if field.is_constant() {
            return Err(ValidationError::ConstantField {
                schema: self.schema.name().to_string(),
                field: name.to_string(),
            });
        }
        if !value.matches_shape(field.kind()) {
            return Err(ValidationError::ShapeMismatch {
                schema: self.schema.name().to_string(),
                field: name.to_string(),
                kind: field.kind(),
            });
        }

        self.values[index] = Some(value);
        Ok(())
    }

    /// Bound value of a field, if any
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.schema
            .position(name)
            .and_then(|index| self.values[index].as_ref())
    }

    pub fn schema(&self) -> &Arc<DescriptorSchema> {
        &self.schema
    }

    pub fn header(&self) -> HeaderConstants {
        self.schema.header()
    }

    /// Fields paired with their bound values, in wire order
    pub fn bindings(&self) -> impl Iterator<Item = (&FieldSpec, Option<&FieldValue>)> {
        self.schema
            .effective_fields()
            .iter()
            .zip(self.values.iter().map(Option::as_ref))
    }

    /// Computed bLength: header bytes plus every field's encoded width.
    ///
    /// An unbound list contributes nothing; an unbound scalar still counts
    /// its width. Computed fresh on every call.
    pub fn length(&self) -> Result<u8, OverflowError> {
        let fields: usize = self
            .bindings()
            .map(|(field, value)| match value {
                Some(value) => value.encoded_width(field.kind()),
                None if field.kind().is_list() => 0,
                None => field.kind().width(),
            })
            .sum();
        let length = self.header().encoded_len() + fields;

        u8::try_from(length).map_err(|_| OverflowError::Length {
            schema: self.schema.name().to_string(),
            length,
        })
    }

    /// Encode to descriptor bytes
    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        encoder::encode(self)
    }
}
