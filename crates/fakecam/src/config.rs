//! Webcam profile configuration
//!
//! A profile lists the descriptors of one video function in configuration
//! order. Each entry names a catalog schema, the interface it belongs to, and
//! the field values that differ from the schema defaults.

use anyhow::{Context, Result, anyhow};
use descriptor::{Catalog, FieldValue};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FakeCamConfig {
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub assembly: AssemblySettings,
    /// Descriptors in the order they appear in the configuration descriptor
    #[serde(default)]
    pub descriptors: Vec<DescriptorEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "LoggingSettings::default_level")]
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
        }
    }
}

impl LoggingSettings {
    fn default_level() -> String {
        "info".to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblySettings {
    /// Fill each class-specific header's wTotalLength from its interface group
    #[serde(default = "AssemblySettings::default_auto_total_length")]
    pub auto_total_length: bool,
    /// Set list count fields (bInCollection, bNrInPins, bControlSize) from
    /// their lists; when off, mismatches are only logged
    #[serde(default = "AssemblySettings::default_auto_counts")]
    pub auto_counts: bool,
    /// Write the concatenated descriptor block to this file (supports `~`)
    #[serde(default)]
    pub output: Option<String>,
}

impl Default for AssemblySettings {
    fn default() -> Self {
        Self {
            auto_total_length: Self::default_auto_total_length(),
            auto_counts: Self::default_auto_counts(),
            output: None,
        }
    }
}

impl AssemblySettings {
    fn default_auto_total_length() -> bool {
        true
    }

    fn default_auto_counts() -> bool {
        true
    }

    /// Output path with `~` expanded
    pub fn output_path(&self) -> Option<PathBuf> {
        self.output.as_deref().map(expand_path)
    }
}

/// One descriptor of the profile
///
/// ```toml
/// [[descriptors]]
/// schema = "selector_unit"
/// interface = 0
/// values = { bUnitID = 4, bNrInPins = 2, baSourceID = [1, 2] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptorEntry {
    /// Catalog schema name
    pub schema: String,
    /// Interface number the descriptor is grouped under
    pub interface: u8,
    /// Field overrides; unlisted fields keep their schema defaults
    #[serde(default)]
    pub values: BTreeMap<String, FieldValue>,
}

impl DescriptorEntry {
    pub fn new(schema: &str, interface: u8) -> Self {
        Self {
            schema: schema.to_string(),
            interface,
            values: BTreeMap::new(),
        }
    }

    pub fn with(mut self, field: &str, value: impl Into<FieldValue>) -> Self {
        self.values.insert(field.to_string(), value.into());
        self
    }
}

/// 176x144 MJPEG webcam: one VideoControl and one VideoStreaming interface
impl Default for FakeCamConfig {
    fn default() -> Self {
        Self {
            logging: LoggingSettings::default(),
            assembly: AssemblySettings::default(),
            descriptors: vec![
                DescriptorEntry::new("interface_association", 0)
                    .with("bFirstInterface", 0u8)
                    .with("bInterfaceCount", 2u8),
                DescriptorEntry::new("vc_header", 0)
                    .with("dwClockFrequency", 0x005B_8D80u32)
                    .with("baInterfaceNr", vec![1u32]),
                DescriptorEntry::new("camera_terminal", 0)
                    .with("bTerminalID", 1u8)
                    .with("bControlSize", 2u8)
                    .with("bmControls", vec![0u32, 0]),
                DescriptorEntry::new("input_terminal_composite", 0).with("bTerminalID", 2u8),
                DescriptorEntry::new("selector_unit", 0)
                    .with("bUnitID", 4u8)
                    .with("bNrInPins", 2u8)
                    .with("baSourceID", vec![1u32, 2]),
                DescriptorEntry::new("processing_unit", 0)
                    .with("bUnitID", 5u8)
                    .with("bSourceID", 4u8),
                DescriptorEntry::new("output_terminal", 0)
                    .with("bTerminalID", 3u8)
                    .with("bSourceID", 5u8),
                DescriptorEntry::new("interrupt_endpoint", 0).with("bEndpointAddress", 0x81u8),
                DescriptorEntry::new("cs_interrupt_endpoint", 0),
                DescriptorEntry::new("vs_input_header", 1)
                    .with("bEndpointAddress", 0x82u8)
                    .with("bTerminalLink", 3u8)
                    .with("bStillCaptureMethod", 1u8)
                    .with("bTriggerSupport", 1u8),
                DescriptorEntry::new("vs_format_mjpeg", 1).with("bmFlags", 1u8),
                DescriptorEntry::new("vs_frame_mjpeg", 1),
            ],
        }
    }
}

impl FakeCamConfig {
    /// Load configuration from the specified path
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p,
            None => {
                let candidates = vec![Self::default_path(), PathBuf::from("/etc/fakecam/fakecam.toml")];
                candidates
                    .into_iter()
                    .find(|p| p.exists())
                    .ok_or_else(|| anyhow!("No configuration file found"))?
            }
        };

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: FakeCamConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        config.validate()?;

        tracing::info!("Loaded configuration from: {}", config_path.display());
        Ok(config)
    }

    /// Load configuration or return the built-in webcam profile if not found
    pub fn load_or_default() -> Self {
        match Self::load(None) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config: {:#}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Save configuration to the specified path
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!("Saved configuration to: {}", path.display());
        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_path() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("fakecam").join("fakecam.toml")
        } else {
            PathBuf::from(".config/fakecam/fakecam.toml")
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !common::LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(anyhow!(
                "Invalid log level '{}', must be one of: {}",
                self.logging.level,
                common::LOG_LEVELS.join(", ")
            ));
        }

        let catalog = descriptor::catalog().context("Failed to build descriptor catalog")?;
        self.validate_schemas(catalog)?;
        self.validate_interface_order()
    }

    fn validate_schemas(&self, catalog: &Catalog) -> Result<()> {
        for (index, entry) in self.descriptors.iter().enumerate() {
            let schema = catalog.get(&entry.schema).ok_or_else(|| {
                anyhow!(
                    "Descriptor #{} uses unknown schema '{}' (known: {})",
                    index,
                    entry.schema,
                    catalog.names().collect::<Vec<_>>().join(", ")
                )
            })?;
            for field in entry.values.keys() {
                if schema.field(field).is_none() {
                    return Err(anyhow!(
                        "Descriptor #{} ({}) sets unknown field '{}'",
                        index,
                        entry.schema,
                        field
                    ));
                }
            }
        }
        Ok(())
    }

    /// Descriptors of one interface must be contiguous
    fn validate_interface_order(&self) -> Result<()> {
        let mut finished = HashSet::new();
        let mut current = None;
        for entry in &self.descriptors {
            if current == Some(entry.interface) {
                continue;
            }
            if finished.contains(&entry.interface) {
                return Err(anyhow!(
                    "Descriptors of interface {} are not contiguous",
                    entry.interface
                ));
            }
            if let Some(previous) = current {
                finished.insert(previous);
            }
            current = Some(entry.interface);
        }
        Ok(())
    }
}

/// Expand a leading `~` in a user-supplied path
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}
