//! Descriptor schemas
//!
//! A schema is the ordered field list of one descriptor kind plus its header
//! tags. Derived schemas compose a base schema: their effective field list is
//! the base's effective list with the derived fields appended, except that a
//! derived field sharing a base field's name replaces it in place.
//!
//! ```text
//! input_terminal:    [bTerminalID, wTerminalType, bAssocTerminal, iTerminal]
//! camera_terminal:   [bTerminalID, wTerminalType*, bAssocTerminal, iTerminal,
//!                     wObjectiveFocalLengthMin, ...]
//!                                  * default replaced by the derived schema
//! ```
//!
//! Schemas are immutable once defined and are shared as `Arc<DescriptorSchema>`.

use crate::error::SchemaError;
use crate::kind::FieldKind;
use crate::value::FieldValue;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Names of the header bytes the encoder emits itself
pub const RESERVED_FIELD_NAMES: [&str; 3] = ["bLength", "bDescriptorType", "bDescriptorSubType"];

/// Whether a field is fixed by the schema or set per descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldRole {
    /// Value baked into the schema, never supplied by callers
    Constant,
    /// Callers may replace the default
    Configurable,
}

/// One named field of a descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    name: String,
    kind: FieldKind,
    role: FieldRole,
    default: Option<FieldValue>,
}

impl FieldSpec {
    pub fn new(
        name: impl Into<String>,
        kind: FieldKind,
        role: FieldRole,
        default: Option<FieldValue>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            role,
            default,
        }
    }

    /// Field whose value is fixed by the schema
    pub fn constant(name: impl Into<String>, kind: FieldKind, value: impl Into<FieldValue>) -> Self {
        Self::new(name, kind, FieldRole::Constant, Some(value.into()))
    }

    /// Caller-settable field with a default
    pub fn configurable(
        name: impl Into<String>,
        kind: FieldKind,
        default: impl Into<FieldValue>,
    ) -> Self {
        Self::new(name, kind, FieldRole::Configurable, Some(default.into()))
    }

    /// Caller-settable field with no default; encoding fails until it is set
    pub fn required(name: impl Into<String>, kind: FieldKind) -> Self {
        Self::new(name, kind, FieldRole::Configurable, None)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn role(&self) -> FieldRole {
        self.role
    }

    pub fn default(&self) -> Option<&FieldValue> {
        self.default.as_ref()
    }

    pub fn is_constant(&self) -> bool {
        self.role == FieldRole::Constant
    }
}

/// Header tags emitted after the length byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeaderConstants {
    /// bDescriptorType
    pub type_tag: u8,
    /// bDescriptorSubType, absent for standard descriptors
    pub subtype_tag: Option<u8>,
}

impl HeaderConstants {
    pub const fn new(type_tag: u8) -> Self {
        Self {
            type_tag,
            subtype_tag: None,
        }
    }

    pub const fn with_subtype(type_tag: u8, subtype_tag: u8) -> Self {
        Self {
            type_tag,
            subtype_tag: Some(subtype_tag),
        }
    }

    /// Length byte + type byte + optional subtype byte
    pub const fn encoded_len(&self) -> usize {
        if self.subtype_tag.is_some() { 3 } else { 2 }
    }
}

/// Field layout of one descriptor kind
#[derive(Debug, Clone)]
pub struct DescriptorSchema {
    name: String,
    header: HeaderConstants,
    base: Option<Arc<DescriptorSchema>>,
    own_fields: Vec<FieldSpec>,
    effective: Vec<FieldSpec>,
}

impl DescriptorSchema {
    /// Define a schema, optionally extending `base`.
    ///
    /// Own fields that share a name with a base field replace it in place and
    /// must keep its kind; all other own fields are appended in order.
    pub fn define(
        name: impl Into<String>,
        own_fields: Vec<FieldSpec>,
        header: HeaderConstants,
        base: Option<Arc<DescriptorSchema>>,
    ) -> Result<Arc<Self>, SchemaError> {
        let name = name.into();
        Self::check_own_fields(&name, &own_fields)?;

        let mut effective = base
            .as_ref()
            .map(|base| base.effective.clone())
            .unwrap_or_default();

        for field in &own_fields {
            match effective.iter().position(|f| f.name == field.name) {
                Some(index) => {
                    let inherited = &effective[index];
                    if inherited.kind != field.kind {
                        return Err(SchemaError::KindMismatch {
                            schema: name,
                            field: field.name.clone(),
                            base: inherited.kind,
                            derived: field.kind,
                        });
                    }
                    effective[index] = field.clone();
                }
                None => effective.push(field.clone()),
            }
        }

        debug!(
            schema = %name,
            base = base.as_ref().map(|b| b.name.as_str()),
            fields = effective.len(),
            "Defined descriptor schema"
        );

        Ok(Arc::new(Self {
            name,
            header,
            base,
            own_fields,
            effective,
        }))
    }

    /// Start a schema definition with the builder API
    pub fn builder(name: impl Into<String>, header: HeaderConstants) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            header,
            base: None,
            fields: Vec::new(),
        }
    }

    /// Derived schema identical to this one except for one field's default
    pub fn override_default(
        self: &Arc<Self>,
        field: &str,
        default: impl Into<FieldValue>,
    ) -> Result<Arc<Self>, SchemaError> {
        let spec = self.field(field).ok_or_else(|| SchemaError::UnknownField {
            schema: self.name.clone(),
            field: field.to_string(),
        })?;
        let replacement = FieldSpec::new(spec.name(), spec.kind, spec.role, Some(default.into()));
        Self::define(
            self.name.clone(),
            vec![replacement],
            self.header,
            Some(Arc::clone(self)),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn header(&self) -> HeaderConstants {
        self.header
    }

    pub fn base(&self) -> Option<&Arc<DescriptorSchema>> {
        self.base.as_ref()
    }

    /// Fields declared by this schema itself, in declaration order
    pub fn own_fields(&self) -> &[FieldSpec] {
        &self.own_fields
    }

    /// Base fields followed by own fields, overrides applied in place
    pub fn effective_fields(&self) -> &[FieldSpec] {
        &self.effective
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.effective.iter().find(|f| f.name == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.effective.iter().position(|f| f.name == name)
    }

    fn check_own_fields(schema: &str, fields: &[FieldSpec]) -> Result<(), SchemaError> {
        let mut seen = HashSet::new();
        for field in fields {
            let name = field.name.as_str();
            if RESERVED_FIELD_NAMES.contains(&name) {
                return Err(SchemaError::ReservedName {
                    schema: schema.to_string(),
                    field: name.to_string(),
                });
            }
            if !seen.insert(name) {
                return Err(SchemaError::DuplicateField {
                    schema: schema.to_string(),
                    field: name.to_string(),
                });
            }
            match &field.default {
                None if field.is_constant() => {
                    return Err(SchemaError::MissingConstantDefault {
                        schema: schema.to_string(),
                        field: name.to_string(),
                    });
                }
                Some(default) if !default.fits(field.kind) => {
                    return Err(SchemaError::InvalidDefault {
                        schema: schema.to_string(),
                        field: name.to_string(),
                        kind: field.kind,
                    });
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Builder for [`DescriptorSchema::define`]
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    name: String,
    header: HeaderConstants,
    base: Option<Arc<DescriptorSchema>>,
    fields: Vec<FieldSpec>,
}

impl SchemaBuilder {
    pub fn extends(mut self, base: &Arc<DescriptorSchema>) -> Self {
        self.base = Some(Arc::clone(base));
        self
    }

    pub fn constant(self, name: &str, kind: FieldKind, value: impl Into<FieldValue>) -> Self {
        self.spec(FieldSpec::constant(name, kind, value))
    }

    pub fn field(self, name: &str, kind: FieldKind, default: impl Into<FieldValue>) -> Self {
        self.spec(FieldSpec::configurable(name, kind, default))
    }

    pub fn required(self, name: &str, kind: FieldKind) -> Self {
        self.spec(FieldSpec::required(name, kind))
    }

    pub fn spec(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    pub fn build(self) -> Result<Arc<DescriptorSchema>, SchemaError> {
        DescriptorSchema::define(self.name, self.fields, self.header, self.base)
    }
}
