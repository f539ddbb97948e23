//! USB Video Class code vocabulary
//!
//! Constant groups from the UVC 1.5 specification, each with a lookup table,
//! plus the UVC error codes reported by the host-side library.

use crate::error::UnknownCodeError;
use crate::registry::{CodeEntry, CodeTable, code_table};
use std::fmt;

code_table! {
    /// Standard USB descriptor types (USB 2.0 Table 9-5 and IAD ECN)
    pub mod standard_descriptor: u8 = "standard descriptor type" {
        DEVICE = 0x01 => "Device descriptor",
        CONFIGURATION = 0x02 => "Configuration descriptor",
        STRING = 0x03 => "String descriptor",
        INTERFACE = 0x04 => "Interface descriptor",
        ENDPOINT = 0x05 => "Endpoint descriptor",
        DEVICE_QUALIFIER = 0x06 => "Device qualifier descriptor",
        OTHER_SPEED_CONFIGURATION = 0x07 => "Other speed configuration descriptor",
        INTERFACE_POWER = 0x08 => "Interface power descriptor",
        OTG = 0x09 => "On-The-Go descriptor",
        DEBUG = 0x0A => "Debug descriptor",
        INTERFACE_ASSOCIATION = 0x0B => "Interface association descriptor",
    }
}

code_table! {
    /// Video interface class code
    pub mod class: u8 = "video class" {
        CC_VIDEO = 0x0E => "Video",
    }
}

code_table! {
    /// Video interface subclass codes
    pub mod subclass: u8 = "video subclass" {
        SC_UNDEFINED = 0x00 => "Undefined",
        SC_VIDEOCONTROL = 0x01 => "VideoControl",
        SC_VIDEOSTREAMING = 0x02 => "VideoStreaming",
        SC_VIDEO_INTERFACE_COLLECTION = 0x03 => "Video interface collection",
    }
}

code_table! {
    /// Video interface protocol codes
    pub mod protocol: u8 = "video protocol" {
        PC_PROTOCOL_UNDEFINED = 0x00 => "Undefined",
        PC_PROTOCOL_15 = 0x01 => "UVC 1.5",
    }
}

code_table! {
    /// Video class-specific descriptor types
    pub mod cs_descriptor: u8 = "class-specific descriptor type" {
        CS_UNDEFINED = 0x20 => "Undefined",
        CS_DEVICE = 0x21 => "Class-specific device",
        CS_CONFIGURATION = 0x22 => "Class-specific configuration",
        CS_STRING = 0x23 => "Class-specific string",
        CS_INTERFACE = 0x24 => "Class-specific interface",
        CS_ENDPOINT = 0x25 => "Class-specific endpoint",
    }
}

code_table! {
    /// Class-specific VideoControl interface descriptor subtypes
    pub mod vc_subtype: u8 = "VC descriptor subtype" {
        VC_DESCRIPTOR_UNDEFINED = 0x00 => "Undefined",
        VC_HEADER = 0x01 => "VideoControl interface header",
        VC_INPUT_TERMINAL = 0x02 => "Input terminal",
        VC_OUTPUT_TERMINAL = 0x03 => "Output terminal",
        VC_SELECTOR_UNIT = 0x04 => "Selector unit",
        VC_PROCESSING_UNIT = 0x05 => "Processing unit",
        VC_EXTENSION_UNIT = 0x06 => "Extension unit",
        VC_ENCODING_UNIT = 0x07 => "Encoding unit",
    }
}

code_table! {
    /// Class-specific VideoStreaming interface descriptor subtypes
    pub mod vs_subtype: u8 = "VS descriptor subtype" {
        VS_UNDEFINED = 0x00 => "Undefined",
        VS_INPUT_HEADER = 0x01 => "Input header",
        VS_OUTPUT_HEADER = 0x02 => "Output header",
        VS_STILL_IMAGE_FRAME = 0x03 => "Still image frame",
        VS_FORMAT_UNCOMPRESSED = 0x04 => "Uncompressed format",
        VS_FRAME_UNCOMPRESSED = 0x05 => "Uncompressed frame",
        VS_FORMAT_MJPEG = 0x06 => "MJPEG format",
        VS_FRAME_MJPEG = 0x07 => "MJPEG frame",
        VS_FORMAT_MPEG2TS = 0x0A => "MPEG-2 TS format",
        VS_FORMAT_DV = 0x0C => "DV format",
        VS_COLORFORMAT = 0x0D => "Color matching",
        VS_FORMAT_FRAME_BASED = 0x10 => "Frame-based format",
        VS_FRAME_FRAME_BASED = 0x11 => "Frame-based frame",
        VS_FORMAT_STREAM_BASED = 0x12 => "Stream-based format",
        VS_FORMAT_H264 = 0x13 => "H.264 format",
        VS_FRAME_H264 = 0x14 => "H.264 frame",
        VS_FORMAT_H264_SIMULCAST = 0x15 => "H.264 simulcast format",
        VS_FORMAT_VP8 = 0x16 => "VP8 format",
        VS_FRAME_VP8 = 0x17 => "VP8 frame",
        VS_FORMAT_VP8_SIMULCAST = 0x18 => "VP8 simulcast format",
    }
}

code_table! {
    /// Class-specific endpoint descriptor subtypes
    pub mod ep_subtype: u8 = "endpoint descriptor subtype" {
        EP_UNDEFINED = 0x00 => "Undefined",
        EP_GENERAL = 0x01 => "General",
        EP_ENDPOINT = 0x02 => "Endpoint",
        EP_INTERRUPT = 0x03 => "Interrupt",
    }
}

code_table! {
    /// Video class-specific request codes (bRequest)
    pub mod request: u8 = "video request" {
        RC_UNDEFINED = 0x00 => "Undefined",
        SET_CUR = 0x01 => "Set current value",
        SET_CUR_ALL = 0x11 => "Set current value of all controls",
        GET_CUR = 0x81 => "Get current value",
        GET_MIN = 0x82 => "Get minimum value",
        GET_MAX = 0x83 => "Get maximum value",
        GET_RES = 0x84 => "Get resolution",
        GET_LEN = 0x85 => "Get length",
        GET_INFO = 0x86 => "Get capabilities and status",
        GET_DEF = 0x87 => "Get default value",
        GET_CUR_ALL = 0x91 => "Get current value of all controls",
        GET_MIN_ALL = 0x92 => "Get minimum value of all controls",
        GET_MAX_ALL = 0x93 => "Get maximum value of all controls",
        GET_RES_ALL = 0x94 => "Get resolution of all controls",
        GET_DEF_ALL = 0x97 => "Get default value of all controls",
    }
}

code_table! {
    /// VideoControl interface control selectors
    pub mod vc_control: u8 = "VC control selector" {
        VC_CONTROL_UNDEFINED = 0x00 => "Undefined",
        VC_VIDEO_POWER_MODE_CONTROL = 0x01 => "Video power mode",
        VC_REQUEST_ERROR_CODE_CONTROL = 0x02 => "Request error code",
    }
}

code_table! {
    /// Terminal control selectors
    pub mod te_control: u8 = "terminal control selector" {
        TE_CONTROL_UNDEFINED = 0x00 => "Undefined",
    }
}

code_table! {
    /// Selector unit control selectors
    pub mod su_control: u8 = "selector unit control selector" {
        SU_CONTROL_UNDEFINED = 0x00 => "Undefined",
        SU_INPUT_SELECT_CONTROL = 0x01 => "Input select",
    }
}

code_table! {
    /// Camera terminal control selectors
    pub mod ct_control: u8 = "camera terminal control selector" {
        CT_CONTROL_UNDEFINED = 0x00 => "Undefined",
        CT_SCANNING_MODE_CONTROL = 0x01 => "Scanning mode",
        CT_AE_MODE_CONTROL = 0x02 => "Auto-exposure mode",
        CT_AE_PRIORITY_CONTROL = 0x03 => "Auto-exposure priority",
        CT_EXPOSURE_TIME_ABSOLUTE_CONTROL = 0x04 => "Exposure time (absolute)",
        CT_EXPOSURE_TIME_RELATIVE_CONTROL = 0x05 => "Exposure time (relative)",
        CT_FOCUS_ABSOLUTE_CONTROL = 0x06 => "Focus (absolute)",
        CT_FOCUS_RELATIVE_CONTROL = 0x07 => "Focus (relative)",
        CT_FOCUS_AUTO_CONTROL = 0x08 => "Focus, auto",
        CT_IRIS_ABSOLUTE_CONTROL = 0x09 => "Iris (absolute)",
        CT_IRIS_RELATIVE_CONTROL = 0x0A => "Iris (relative)",
        CT_ZOOM_ABSOLUTE_CONTROL = 0x0B => "Zoom (absolute)",
        CT_ZOOM_RELATIVE_CONTROL = 0x0C => "Zoom (relative)",
        CT_PANTILT_ABSOLUTE_CONTROL = 0x0D => "PanTilt (absolute)",
        CT_PANTILT_RELATIVE_CONTROL = 0x0E => "PanTilt (relative)",
        CT_ROLL_ABSOLUTE_CONTROL = 0x0F => "Roll (absolute)",
        CT_ROLL_RELATIVE_CONTROL = 0x10 => "Roll (relative)",
        CT_PRIVACY_CONTROL = 0x11 => "Privacy",
        CT_FOCUS_SIMPLE_CONTROL = 0x12 => "Focus, simple",
        CT_WINDOW_CONTROL = 0x13 => "Window",
        CT_REGION_OF_INTEREST_CONTROL = 0x14 => "Region of interest",
    }
}

code_table! {
    /// Processing unit control selectors
    pub mod pu_control: u8 = "processing unit control selector" {
        PU_CONTROL_UNDEFINED = 0x00 => "Undefined",
        PU_BACKLIGHT_COMPENSATION_CONTROL = 0x01 => "Backlight compensation",
        PU_BRIGHTNESS_CONTROL = 0x02 => "Brightness",
        PU_CONTRAST_CONTROL = 0x03 => "Contrast",
        PU_GAIN_CONTROL = 0x04 => "Gain",
        PU_POWER_LINE_FREQUENCY_CONTROL = 0x05 => "Power line frequency",
        PU_HUE_CONTROL = 0x06 => "Hue",
        PU_SATURATION_CONTROL = 0x07 => "Saturation",
        PU_SHARPNESS_CONTROL = 0x08 => "Sharpness",
        PU_GAMMA_CONTROL = 0x09 => "Gamma",
        PU_WHITE_BALANCE_TEMPERATURE_CONTROL = 0x0A => "White balance temperature",
        PU_WHITE_BALANCE_TEMPERATURE_AUTO_CONTROL = 0x0B => "White balance temperature, auto",
        PU_WHITE_BALANCE_COMPONENT_CONTROL = 0x0C => "White balance component",
        PU_WHITE_BALANCE_COMPONENT_AUTO_CONTROL = 0x0D => "White balance component, auto",
        PU_DIGITAL_MULTIPLIER_CONTROL = 0x0E => "Digital multiplier",
        PU_DIGITAL_MULTIPLIER_LIMIT_CONTROL = 0x0F => "Digital multiplier limit",
        PU_HUE_AUTO_CONTROL = 0x10 => "Hue, auto",
        PU_ANALOG_VIDEO_STANDARD_CONTROL = 0x11 => "Analog video standard",
        PU_ANALOG_LOCK_STATUS_CONTROL = 0x12 => "Analog video lock status",
        PU_CONTRAST_AUTO_CONTROL = 0x13 => "Contrast, auto",
    }
}

code_table! {
    /// Encoding unit control selectors
    pub mod eu_control: u8 = "encoding unit control selector" {
        EU_CONTROL_UNDEFINED = 0x00 => "Undefined",
        EU_SELECT_LAYER_CONTROL = 0x01 => "Select layer",
        EU_PROFILE_TOOLSET_CONTROL = 0x02 => "Profile and toolset",
        EU_VIDEO_RESOLUTION_CONTROL = 0x03 => "Video resolution",
        EU_MIN_FRAME_INTERVAL_CONTROL = 0x04 => "Minimum frame interval",
        EU_SLICE_MODE_CONTROL = 0x05 => "Slice mode",
        EU_RATE_CONTROL_MODE_CONTROL = 0x06 => "Rate control mode",
        EU_AVERAGE_BITRATE_CONTROL = 0x07 => "Average bitrate",
        EU_CPB_SIZE_CONTROL = 0x08 => "CPB size",
        EU_PEAK_BIT_RATE_CONTROL = 0x09 => "Peak bit rate",
        EU_QUANTIZATION_PARAMS_CONTROL = 0x0A => "Quantization parameters",
        EU_SYNC_REF_FRAME_CONTROL = 0x0B => "Synchronization and long-term reference frame",
        EU_LTR_BUFFER_CONTROL = 0x0C => "Long-term buffer",
        EU_LTR_PICTURE_CONTROL = 0x0D => "Long-term reference picture",
        EU_LTR_VALIDATION_CONTROL = 0x0E => "Long-term reference validation",
        EU_LEVEL_IDC_LIMIT_CONTROL = 0x0F => "Level IDC limit",
        EU_SEI_PAYLOADTYPE_CONTROL = 0x10 => "SEI payload type",
        EU_QP_RANGE_CONTROL = 0x11 => "QP range",
        EU_PRIORITY_CONTROL = 0x12 => "Priority",
        EU_START_OR_STOP_LAYER_CONTROL = 0x13 => "Start or stop layer",
        EU_ERROR_RESILIENCY_CONTROL = 0x14 => "Error resiliency",
    }
}

code_table! {
    /// Extension unit control selectors
    pub mod xu_control: u8 = "extension unit control selector" {
        XU_CONTROL_UNDEFINED = 0x00 => "Undefined",
    }
}

code_table! {
    /// VideoStreaming interface control selectors
    pub mod vs_control: u8 = "VS control selector" {
        VS_CONTROL_UNDEFINED = 0x00 => "Undefined",
        VS_PROBE_CONTROL = 0x01 => "Probe",
        VS_COMMIT_CONTROL = 0x02 => "Commit",
        VS_STILL_PROBE_CONTROL = 0x03 => "Still probe",
        VS_STILL_COMMIT_CONTROL = 0x04 => "Still commit",
        VS_STILL_IMAGE_TRIGGER_CONTROL = 0x05 => "Still image trigger",
        VS_STREAM_ERROR_CODE_CONTROL = 0x06 => "Stream error code",
        VS_GENERATE_KEY_FRAME_CONTROL = 0x07 => "Generate key frame",
        VS_UPDATE_FRAME_SEGMENT_CONTROL = 0x08 => "Update frame segment",
        VS_SYNCH_DELAY_CONTROL = 0x09 => "Synch delay",
    }
}

code_table! {
    /// Terminal types (wTerminalType)
    pub mod terminal_type: u16 = "terminal type" {
        TT_VENDOR_SPECIFIC = 0x0100 => "Vendor-specific USB terminal",
        TT_STREAMING = 0x0101 => "USB streaming terminal",
        ITT_VENDOR_SPECIFIC = 0x0200 => "Vendor-specific input terminal",
        ITT_CAMERA = 0x0201 => "Camera sensor",
        ITT_MEDIA_TRANSPORT_INPUT = 0x0202 => "Sequential media",
        OTT_VENDOR_SPECIFIC = 0x0300 => "Vendor-specific output terminal",
        OTT_DISPLAY = 0x0301 => "Display",
        OTT_MEDIA_TRANSPORT_OUTPUT = 0x0302 => "Sequential media output",
        EXTERNAL_VENDOR_SPECIFIC = 0x0400 => "Vendor-specific external terminal",
        COMPOSITE_CONNECTOR = 0x0401 => "Composite video connector",
        SVIDEO_CONNECTOR = 0x0402 => "S-Video connector",
        COMPONENT_CONNECTOR = 0x0403 => "Component video connector",
    }
}

/// Every constant table in this module
pub const TABLES: [CodeTable; 18] = [
    standard_descriptor::TABLE,
    class::TABLE,
    subclass::TABLE,
    protocol::TABLE,
    cs_descriptor::TABLE,
    vc_subtype::TABLE,
    vs_subtype::TABLE,
    ep_subtype::TABLE,
    request::TABLE,
    vc_control::TABLE,
    te_control::TABLE,
    su_control::TABLE,
    ct_control::TABLE,
    pu_control::TABLE,
    eu_control::TABLE,
    xu_control::TABLE,
    vs_control::TABLE,
    terminal_type::TABLE,
];

/// UVC error codes
///
/// Compares equal to a raw `i32` holding the same code, and two errors are
/// equal exactly when their codes are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum UvcError {
    Success = 0,
    Io = -1,
    InvalidParam = -2,
    Access = -3,
    NoDevice = -4,
    NotFound = -5,
    Busy = -6,
    Timeout = -7,
    Overflow = -8,
    Pipe = -9,
    Interrupted = -10,
    NoMem = -11,
    NotSupported = -12,
    InvalidDevice = -50,
    InvalidMode = -51,
    CallbackExists = -52,
    Other = -99,
}

impl UvcError {
    pub const REGISTRY: &'static str = "UVC error";

    pub const ALL: [UvcError; 17] = [
        Self::Success,
        Self::Io,
        Self::InvalidParam,
        Self::Access,
        Self::NoDevice,
        Self::NotFound,
        Self::Busy,
        Self::Timeout,
        Self::Overflow,
        Self::Pipe,
        Self::Interrupted,
        Self::NoMem,
        Self::NotSupported,
        Self::InvalidDevice,
        Self::InvalidMode,
        Self::CallbackExists,
        Self::Other,
    ];

    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Symbolic name, e.g. `ERROR_TIMEOUT`
    pub const fn name(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Io => "ERROR_IO",
            Self::InvalidParam => "ERROR_INVALID_PARAM",
            Self::Access => "ERROR_ACCESS",
            Self::NoDevice => "ERROR_NO_DEVICE",
            Self::NotFound => "ERROR_NOT_FOUND",
            Self::Busy => "ERROR_BUSY",
            Self::Timeout => "ERROR_TIMEOUT",
            Self::Overflow => "ERROR_OVERFLOW",
            Self::Pipe => "ERROR_PIPE",
            Self::Interrupted => "ERROR_INTERRUPTED",
            Self::NoMem => "ERROR_NO_MEM",
            Self::NotSupported => "ERROR_NOT_SUPPORTED",
            Self::InvalidDevice => "ERROR_INVALID_DEVICE",
            Self::InvalidMode => "ERROR_INVALID_MODE",
            Self::CallbackExists => "ERROR_CALLBACK_EXISTS",
            Self::Other => "ERROR_OTHER",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Success => "Success (no error)",
            Self::Io => "Input/output error",
            Self::InvalidParam => "Invalid parameter",
            Self::Access => "Access denied",
            Self::NoDevice => "No such device",
            Self::NotFound => "Not found",
            Self::Busy => "Resource busy",
            Self::Timeout => "Operation timed out",
            Self::Overflow => "Overflow",
            Self::Pipe => "Pipe error",
            Self::Interrupted => "System call interrupted (perhaps due to signal)",
            Self::NoMem => "Insufficient memory",
            Self::NotSupported => "Not supported",
            Self::InvalidDevice => "Invalid device",
            Self::InvalidMode => "Invalid mode",
            Self::CallbackExists => "Callback exists, cannot poll",
            Self::Other => "Unknown error",
        }
    }

    /// Error whose numeric code equals `code`
    pub fn from_code(code: i32) -> Result<Self, UnknownCodeError> {
        Self::ALL
            .into_iter()
            .find(|error| error.code() == code)
            .ok_or(UnknownCodeError {
                registry: Self::REGISTRY,
                code,
            })
    }

    /// Symbolic name, code and description as a registry entry
    pub const fn entry(self) -> CodeEntry {
        CodeEntry {
            name: self.name(),
            code: self.code(),
            description: self.description(),
        }
    }
}

impl TryFrom<i32> for UvcError {
    type Error = UnknownCodeError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

impl From<UvcError> for i32 {
    fn from(error: UvcError) -> Self {
        error.code()
    }
}

impl PartialEq<i32> for UvcError {
    fn eq(&self, other: &i32) -> bool {
        self.code() == *other
    }
}

impl PartialEq<UvcError> for i32 {
    fn eq(&self, other: &UvcError) -> bool {
        *self == other.code()
    }
}

impl fmt::Display for UvcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.name(), self.code(), self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_tables_have_unique_codes() {
        for table in TABLES {
            let mut seen = HashSet::new();
            for entry in table.entries() {
                assert!(
                    seen.insert(entry.code),
                    "duplicate code {:#x} in {}",
                    entry.code,
                    table.name()
                );
            }
        }
    }

    #[test]
    fn test_request_lookup() {
        let entry = request::TABLE.from_code(0x81).unwrap();
        assert_eq!(entry.name, "GET_CUR");
        assert_eq!(request::TABLE.from_name("GET_DEF").unwrap().code, 0x87);
        assert!(request::TABLE.from_code(0x88).is_err());
    }

    #[test]
    fn test_uvc_error_lookup() {
        let timeout = UvcError::from_code(-7).unwrap();
        assert_eq!(timeout, UvcError::Timeout);
        assert_eq!(timeout.description(), "Operation timed out");
        assert_eq!(timeout.name(), "ERROR_TIMEOUT");
    }

    #[test]
    fn test_uvc_error_unknown_code() {
        let err = UvcError::from_code(-42).unwrap_err();
        assert_eq!(err.code, -42);
        assert_eq!(err.registry, UvcError::REGISTRY);
        assert!(UvcError::try_from(1).is_err());
    }

    #[test]
    fn test_uvc_error_integer_equality_agrees() {
        for error in UvcError::ALL {
            let code = error.code();
            assert!(error == code);
            assert!(code == error);
            assert_eq!(UvcError::from_code(code).unwrap(), error);
            for other in UvcError::ALL {
                assert_eq!(error == other, error == other.code());
            }
        }
    }

    #[test]
    fn test_uvc_error_codes_unique() {
        let codes: HashSet<i32> = UvcError::ALL.iter().map(|e| e.code()).collect();
        assert_eq!(codes.len(), UvcError::ALL.len());
    }

    #[test]
    fn test_entry_matches_enum() {
        let entry = UvcError::Pipe.entry();
        assert_eq!(entry, -9);
        assert_eq!(entry.name, "ERROR_PIPE");
    }

    #[test]
    fn test_entry_equality_agrees_across_tables() {
        let entries: Vec<CodeEntry> = TABLES
            .iter()
            .flat_map(|table| table.entries().iter().copied())
            .chain(UvcError::ALL.iter().map(|error| error.entry()))
            .collect();
        for a in &entries {
            for b in &entries {
                assert_eq!(*a == *b, *a == b.code, "{} vs {}", a.name, b.name);
            }
        }

        let set_cur = request::TABLE.from_code(request::SET_CUR.into()).unwrap();
        let vc_header = vc_subtype::TABLE.from_code(vc_subtype::VC_HEADER.into()).unwrap();
        assert!(*set_cur == vc_header.code);
        assert_eq!(set_cur, vc_header);
    }

    #[test]
    fn test_entry_display_signed_codes() {
        let timeout = UvcError::Timeout.entry().to_string();
        assert_eq!(timeout, "ERROR_TIMEOUT (-7): Operation timed out");
        assert_eq!(timeout, UvcError::Timeout.to_string());

        let get_cur = request::TABLE.from_code(0x81).unwrap().to_string();
        assert!(get_cur.starts_with("GET_CUR (0x81)"));
    }
}
