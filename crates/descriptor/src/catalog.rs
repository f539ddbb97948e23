//! Built-in UVC descriptor schemas
//!
//! The catalog is defined once, on first use, and shared read-only for the
//! rest of the process.
//!
//! | Name | Type | Subtype |
//! |------|------|---------|
//! | `interface_association` | `0x0B` | - |
//! | `vc_header` | `0x24` | `VC_HEADER` |
//! | `input_terminal` | `0x24` | `VC_INPUT_TERMINAL` |
//! | `input_terminal_composite` | `0x24` | `VC_INPUT_TERMINAL` |
//! | `camera_terminal` | `0x24` | `VC_INPUT_TERMINAL` |
//! | `output_terminal` | `0x24` | `VC_OUTPUT_TERMINAL` |
//! | `selector_unit` | `0x24` | `VC_SELECTOR_UNIT` |
//! | `processing_unit` | `0x24` | `VC_PROCESSING_UNIT` |
//! | `vs_input_header` | `0x24` | `VS_INPUT_HEADER` |
//! | `vs_format_mjpeg` | `0x24` | `VS_FORMAT_MJPEG` |
//! | `vs_frame_mjpeg` | `0x24` | `VS_FRAME_MJPEG` |
//! | `interrupt_endpoint` | `0x05` | - |
//! | `cs_interrupt_endpoint` | `0x25` | `EP_INTERRUPT` |

use crate::error::SchemaError;
use crate::kind::{FieldKind, ScalarKind};
use crate::schema::{DescriptorSchema, HeaderConstants};
use crate::uvc::{
    class, cs_descriptor, ep_subtype, protocol, standard_descriptor, subclass, terminal_type,
    vc_subtype, vs_subtype,
};
use std::sync::{Arc, LazyLock};
use tracing::info;

/// bmAttributes transfer type bits for an interrupt endpoint
const TRANSFER_TYPE_INTERRUPT: u8 = 0x03;

static CATALOG: LazyLock<Result<Catalog, SchemaError>> = LazyLock::new(Catalog::build);

/// Process-wide catalog of built-in schemas
pub fn catalog() -> Result<&'static Catalog, SchemaError> {
    CATALOG.as_ref().map_err(Clone::clone)
}

/// Named collection of descriptor schemas
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    schemas: Vec<Arc<DescriptorSchema>>,
}

impl Catalog {
    /// Define every built-in schema
    pub fn build() -> Result<Self, SchemaError> {
        let cs_interface =
            |subtype| HeaderConstants::with_subtype(cs_descriptor::CS_INTERFACE, subtype);
        let u8_list = FieldKind::list(ScalarKind::U8);

        let interface_association = DescriptorSchema::builder(
            "interface_association",
            HeaderConstants::new(standard_descriptor::INTERFACE_ASSOCIATION),
        )
        .field("bFirstInterface", FieldKind::U8, 0x01u8)
        .field("bInterfaceCount", FieldKind::U8, 0x01u8)
        .field("bFunctionClass", FieldKind::U8, class::CC_VIDEO)
        .field(
            "bFunctionSubClass",
            FieldKind::U8,
            subclass::SC_VIDEO_INTERFACE_COLLECTION,
        )
        .field("bFunctionProtocol", FieldKind::U8, protocol::PC_PROTOCOL_UNDEFINED)
        .field("iFunction", FieldKind::U8, 0x00u8)
        .build()?;

        let vc_header = DescriptorSchema::builder("vc_header", cs_interface(vc_subtype::VC_HEADER))
            .field("bcdUVC", FieldKind::U16, 0x0100u16)
            .field("wTotalLength", FieldKind::U16, 0x0000u16)
            .required("dwClockFrequency", FieldKind::U32)
            .field("bInCollection", FieldKind::U8, 0x01u8)
            .field("baInterfaceNr", u8_list, [0x01u8])
            .build()?;

        let input_terminal =
            DescriptorSchema::builder("input_terminal", cs_interface(vc_subtype::VC_INPUT_TERMINAL))
                .field("bTerminalID", FieldKind::U8, 0x01u8)
                .required("wTerminalType", FieldKind::U16)
                .field("bAssocTerminal", FieldKind::U8, 0x00u8)
                .field("iTerminal", FieldKind::U8, 0x00u8)
                .build()?;

        let input_terminal_composite =
            DescriptorSchema::builder("input_terminal_composite", input_terminal.header())
                .extends(&input_terminal)
                .constant(
                    "wTerminalType",
                    FieldKind::U16,
                    terminal_type::COMPOSITE_CONNECTOR,
                )
                .build()?;

        // bControlSize is the byte count of bmControls
        let camera_terminal =
            DescriptorSchema::builder("camera_terminal", input_terminal.header())
                .extends(&input_terminal)
                .constant("wTerminalType", FieldKind::U16, terminal_type::ITT_CAMERA)
                .field("wObjectiveFocalLengthMin", FieldKind::U16, 0x0000u16)
                .field("wObjectiveFocalLengthMax", FieldKind::U16, 0x0000u16)
                .field("wOcularFocalLength", FieldKind::U16, 0x0000u16)
                .field("bControlSize", FieldKind::U8, 3u8)
                .field("bmControls", u8_list, [0x00u8; 3])
                .build()?;

        let output_terminal =
            DescriptorSchema::builder("output_terminal", cs_interface(vc_subtype::VC_OUTPUT_TERMINAL))
                .field("bTerminalID", FieldKind::U8, 0x02u8)
                .field("wTerminalType", FieldKind::U16, terminal_type::TT_STREAMING)
                .field("bAssocTerminal", FieldKind::U8, 0x00u8)
                .field("bSourceID", FieldKind::U8, 0x01u8)
                .field("iTerminal", FieldKind::U8, 0x00u8)
                .build()?;

        let selector_unit =
            DescriptorSchema::builder("selector_unit", cs_interface(vc_subtype::VC_SELECTOR_UNIT))
                .field("bUnitID", FieldKind::U8, 0x05u8)
                .field("bNrInPins", FieldKind::U8, 0x01u8)
                .field("baSourceID", u8_list, [0x01u8])
                .field("iSelector", FieldKind::U8, 0x00u8)
                .build()?;

        let processing_unit =
            DescriptorSchema::builder("processing_unit", cs_interface(vc_subtype::VC_PROCESSING_UNIT))
                .field("bUnitID", FieldKind::U8, 0x05u8)
                .field("bSourceID", FieldKind::U8, 0x04u8)
                .field("wMaxMultiplier", FieldKind::U16, 0x0000u16)
                .field("bControlSize", FieldKind::U8, 3u8)
                .field("bmControls", FieldKind::U24, 0x00_0000u32)
                .field("iProcessing", FieldKind::U8, 0x00u8)
                .field("bmVideoStandards", FieldKind::U8, 0x00u8)
                .build()?;

        let vs_input_header =
            DescriptorSchema::builder("vs_input_header", cs_interface(vs_subtype::VS_INPUT_HEADER))
                .field("bNumFormats", FieldKind::U8, 0x01u8)
                .field("wTotalLength", FieldKind::U16, 0x0000u16)
                .field("bEndpointAddress", FieldKind::U8, 0x81u8)
                .field("bmInfo", FieldKind::U8, 0x00u8)
                .field("bTerminalLink", FieldKind::U8, 0x01u8)
                .field("bStillCaptureMethod", FieldKind::U8, 0x00u8)
                .field("bTriggerSupport", FieldKind::U8, 0x00u8)
                .field("bTriggerUsage", FieldKind::U8, 0x00u8)
                .field("bControlSize", FieldKind::U8, 0x01u8)
                .field("bmaControls", u8_list, [0x00u8])
                .build()?;

        let vs_format_mjpeg =
            DescriptorSchema::builder("vs_format_mjpeg", cs_interface(vs_subtype::VS_FORMAT_MJPEG))
                .field("bFormatIndex", FieldKind::U8, 0x01u8)
                .field("bNumFrameDescriptors", FieldKind::U8, 0x01u8)
                .field("bmFlags", FieldKind::U8, 0x00u8)
                .field("bDefaultFrameIndex", FieldKind::U8, 0x01u8)
                .field("bAspectRatioX", FieldKind::U8, 0x00u8)
                .field("bAspectRatioY", FieldKind::U8, 0x00u8)
                .field("bmInterlaceFlags", FieldKind::U8, 0x00u8)
                .field("bCopyProtect", FieldKind::U8, 0x00u8)
                .build()?;

        // 176x144 at 15 fps
        let vs_frame_mjpeg =
            DescriptorSchema::builder("vs_frame_mjpeg", cs_interface(vs_subtype::VS_FRAME_MJPEG))
                .field("bFrameIndex", FieldKind::U8, 0x01u8)
                .field("bmCapabilities", FieldKind::U8, 0x03u8)
                .field("wWidth", FieldKind::U16, 0x00B0u16)
                .field("wHeight", FieldKind::U16, 0x0090u16)
                .field("dwMinBitRate", FieldKind::U32, 0x000D_EC00u32)
                .field("dwMaxBitRate", FieldKind::U32, 0x000D_EC00u32)
                .field("dwMaxVideoFrameBufSize", FieldKind::U32, 0x0000_9480u32)
                .field("dwDefaultFrameInterval", FieldKind::U32, 0x000A_2C2Au32)
                .field("bFrameIntervalType", FieldKind::U8, 0x00u8)
                .field("dwMinFrameInterval", FieldKind::U32, 0x000A_2C2Au32)
                .field("dwMaxFrameInterval", FieldKind::U32, 0x000A_2C2Au32)
                .field("dwFrameIntervalStep", FieldKind::U32, 0x0000_0000u32)
                .build()?;

        let interrupt_endpoint = DescriptorSchema::builder(
            "interrupt_endpoint",
            HeaderConstants::new(standard_descriptor::ENDPOINT),
        )
        .field("bEndpointAddress", FieldKind::U8, 0x81u8)
        .constant("bmAttributes", FieldKind::U8, TRANSFER_TYPE_INTERRUPT)
        .field("wMaxPacketSize", FieldKind::U16, 0x0040u16)
        .field("bInterval", FieldKind::U8, 0x20u8)
        .build()?;

        let cs_interrupt_endpoint = DescriptorSchema::builder(
            "cs_interrupt_endpoint",
            HeaderConstants::with_subtype(cs_descriptor::CS_ENDPOINT, ep_subtype::EP_INTERRUPT),
        )
        .field("wMaxTransferSize", FieldKind::U16, 0x0040u16)
        .build()?;

        let catalog = Self {
            schemas: vec![
                interface_association,
                vc_header,
                input_terminal,
                input_terminal_composite,
                camera_terminal,
                output_terminal,
                selector_unit,
                processing_unit,
                vs_input_header,
                vs_format_mjpeg,
                vs_frame_mjpeg,
                interrupt_endpoint,
                cs_interrupt_endpoint,
            ],
        };
        info!(schemas = catalog.schemas.len(), "Built UVC descriptor catalog");
        Ok(catalog)
    }

    /// Schema by name
    pub fn get(&self, name: &str) -> Option<&Arc<DescriptorSchema>> {
        self.schemas.iter().find(|schema| schema.name() == name)
    }

    /// Add a schema, replacing any schema with the same name
    pub fn insert(&mut self, schema: Arc<DescriptorSchema>) {
        match self.schemas.iter().position(|s| s.name() == schema.name()) {
            Some(index) => self.schemas[index] = schema,
            None => self.schemas.push(schema),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.iter().map(|schema| schema.name())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<DescriptorSchema>> {
        self.schemas.iter()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
