//! Configuration descriptor assembly
//!
//! Binds profile entries to catalog schemas, groups the resulting records by
//! interface and concatenates their bytes in profile order.

use crate::config::{DescriptorEntry, FakeCamConfig};
use common::{Error, Result};
use descriptor::uvc::cs_descriptor;
use descriptor::{Catalog, DescriptorRecord, DescriptorRole, UsbDescriptor, encode_all, encode_into};
use std::io::Write;
use tracing::{debug, info, warn};

/// Header field holding the byte count of an interface's class-specific block
const TOTAL_LENGTH_FIELD: &str = "wTotalLength";

/// A count field that tracks the element count of a list field
struct CountRule {
    count: &'static str,
    list: &'static str,
    /// Field the list length is divided by, for per-item sizes
    per: Option<&'static str>,
}

const COUNT_RULES: [CountRule; 4] = [
    CountRule {
        count: "bInCollection",
        list: "baInterfaceNr",
        per: None,
    },
    CountRule {
        count: "bNrInPins",
        list: "baSourceID",
        per: None,
    },
    CountRule {
        count: "bControlSize",
        list: "bmControls",
        per: None,
    },
    CountRule {
        count: "bControlSize",
        list: "bmaControls",
        per: Some("bNumFormats"),
    },
];

/// Count value implied by the rule's list, if the record carries both fields
fn expected_count(record: &DescriptorRecord, rule: &CountRule) -> Result<Option<u32>> {
    let schema = record.schema();
    if !schema
        .field(rule.count)
        .is_some_and(|field| !field.is_constant())
    {
        return Ok(None);
    }
    let Some(list) = record.get(rule.list).and_then(|value| value.as_list()) else {
        return Ok(None);
    };
    let len = list.len() as u32;

    let Some(per) = rule.per else {
        return Ok(Some(len));
    };
    let divisor = record.get(per).and_then(|value| value.as_scalar()).unwrap_or(0);
    if divisor == 0 || len % divisor != 0 {
        return Err(Error::Config(format!(
            "{}: {} has {} entries, not a multiple of {} = {}",
            schema.name(),
            rule.list,
            len,
            per,
            divisor
        )));
    }
    Ok(Some(len / divisor))
}

/// Set count fields from their list lengths, or only warn when `fill` is off.
///
/// Returns the number of fields that disagreed with their list.
pub fn sync_counts(record: &mut DescriptorRecord, fill: bool) -> Result<usize> {
    let mut mismatched = 0;
    for rule in &COUNT_RULES {
        let Some(expected) = expected_count(record, rule)? else {
            continue;
        };
        let current = record.get(rule.count).and_then(|value| value.as_scalar());
        if current == Some(expected) {
            continue;
        }
        mismatched += 1;

        let schema = record.schema().name().to_string();
        if fill {
            record.set(rule.count, expected)?;
            debug!(schema = %schema, field = rule.count, expected, "Filled count field");
        } else {
            warn!(
                schema = %schema,
                field = rule.count,
                ?current,
                expected,
                "Count field disagrees with {}",
                rule.list
            );
        }
    }
    Ok(mismatched)
}

/// Descriptors that belong to one interface, in profile order
#[derive(Debug, Clone)]
pub struct InterfaceGroup {
    pub interface: u8,
    pub records: Vec<DescriptorRecord>,
}

impl InterfaceGroup {
    /// Summed length of the class-specific interface descriptors
    pub fn class_specific_length(&self) -> Result<u16> {
        let mut total = 0usize;
        for record in self.records.iter().filter(|r| is_cs_interface(r)) {
            total += usize::from(record.length()?);
        }
        u16::try_from(total).map_err(|_| {
            Error::Config(format!(
                "Interface {} class-specific block is {} bytes (max {})",
                self.interface,
                total,
                u16::MAX
            ))
        })
    }

    /// Set the class-specific header's wTotalLength to the block length.
    ///
    /// Returns the value written, or `None` if the group has no header
    /// carrying the field.
    pub fn fill_total_length(&mut self) -> Result<Option<u16>> {
        let total = self.class_specific_length()?;
        let Some(header) = self.records.iter_mut().find(|r| {
            is_cs_interface(r)
                && r.schema()
                    .field(TOTAL_LENGTH_FIELD)
                    .is_some_and(|field| !field.is_constant())
        }) else {
            return Ok(None);
        };

        header.set(TOTAL_LENGTH_FIELD, total)?;
        debug!(
            interface = self.interface,
            schema = header.schema().name(),
            total,
            "Filled wTotalLength"
        );
        Ok(Some(total))
    }
}

/// Encoded descriptor set of a whole profile
#[derive(Debug, Clone)]
pub struct Assembly {
    pub groups: Vec<InterfaceGroup>,
}

impl Assembly {
    /// Bind every profile entry and group the records by interface
    pub fn from_config(config: &FakeCamConfig, catalog: &Catalog) -> Result<Self> {
        let mut groups: Vec<InterfaceGroup> = Vec::new();
        for entry in &config.descriptors {
            let record = bind_entry(entry, catalog)?;
            match groups.last_mut() {
                Some(group) if group.interface == entry.interface => group.records.push(record),
                _ => groups.push(InterfaceGroup {
                    interface: entry.interface,
                    records: vec![record],
                }),
            }
        }

        let mut assembly = Self { groups };
        for group in &mut assembly.groups {
            for record in &mut group.records {
                sync_counts(record, config.assembly.auto_counts)?;
            }
        }
        if config.assembly.auto_total_length {
            for group in &mut assembly.groups {
                group.fill_total_length()?;
            }
        }

        info!(
            interfaces = assembly.groups.len(),
            descriptors = assembly.records().count(),
            "Assembled descriptor set"
        );
        Ok(assembly)
    }

    /// All records in configuration order
    pub fn records(&self) -> impl Iterator<Item = &DescriptorRecord> {
        self.groups.iter().flat_map(|group| group.records.iter())
    }

    /// Concatenated descriptor bytes
    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(encode_all(self.records())?)
    }

    /// Stream the descriptor block into `writer` and flush it
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<usize> {
        let mut written = 0;
        for record in self.records() {
            written += encode_into(record, writer)?;
        }
        writer.flush()?;
        Ok(written)
    }
}

fn bind_entry(entry: &DescriptorEntry, catalog: &Catalog) -> Result<DescriptorRecord> {
    let schema = catalog.get(&entry.schema).ok_or_else(|| {
        Error::Config(format!(
            "Unknown descriptor schema '{}' (known: {})",
            entry.schema,
            catalog.names().collect::<Vec<_>>().join(", ")
        ))
    })?;
    let values = entry.values.iter().map(|(field, value)| (field, value.clone()));
    let record = DescriptorRecord::bind(schema, values)?;
    debug!(schema = %entry.schema, interface = entry.interface, "Bound descriptor");
    Ok(record)
}

fn is_cs_interface(record: &DescriptorRecord) -> bool {
    record.role() == Some(DescriptorRole::ClassSpecific)
        && UsbDescriptor::header(record).type_tag == cs_descriptor::CS_INTERFACE
}

/// Lowercase hex with a space between bytes
pub fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
