//! Descriptor roles seen by a configuration assembler

use crate::error::EncodeError;
use crate::record::DescriptorRecord;
use crate::schema::HeaderConstants;
use crate::uvc::{cs_descriptor, standard_descriptor};

/// Where a descriptor sits in a configuration descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorRole {
    /// Standard interface descriptor
    Interface,
    /// Standard endpoint descriptor
    Endpoint,
    /// Interface association, placed before the interfaces it groups
    Association,
    /// Class-specific descriptor following its interface or endpoint
    ClassSpecific,
}

impl DescriptorRole {
    /// Role implied by a bDescriptorType tag
    pub fn from_type_tag(type_tag: u8) -> Option<Self> {
        match type_tag {
            standard_descriptor::INTERFACE => Some(Self::Interface),
            standard_descriptor::ENDPOINT => Some(Self::Endpoint),
            standard_descriptor::INTERFACE_ASSOCIATION => Some(Self::Association),
            cs_descriptor::CS_UNDEFINED..=cs_descriptor::CS_ENDPOINT => Some(Self::ClassSpecific),
            _ => None,
        }
    }
}

/// Anything that can stand in a configuration descriptor
pub trait UsbDescriptor {
    /// Type and subtype tags
    fn header(&self) -> HeaderConstants;

    /// Encoded descriptor bytes
    fn descriptor_bytes(&self) -> Result<Vec<u8>, EncodeError>;

    fn role(&self) -> Option<DescriptorRole> {
        DescriptorRole::from_type_tag(self.header().type_tag)
    }
}

impl UsbDescriptor for DescriptorRecord {
    fn header(&self) -> HeaderConstants {
        DescriptorRecord::header(self)
    }

    fn descriptor_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        self.encode()
    }
}
