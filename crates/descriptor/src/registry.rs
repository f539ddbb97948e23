//! Code registries: symbolic names paired with numeric codes
//!
//! Each table holds unique numeric codes, so a lookup by code either finds
//! exactly one entry or fails with [`UnknownCodeError`]. There is no fallback
//! entry for unknown codes.

use crate::error::UnknownCodeError;
use std::fmt;
use std::hash::{Hash, Hasher};

/// One registry entry
///
/// Entries are equal when their numeric codes are equal, whatever their names.
/// Comparing two entries always agrees with comparing one to the other's code.
#[derive(Debug, Clone, Copy)]
pub struct CodeEntry {
    pub name: &'static str,
    pub code: i32,
    pub description: &'static str,
}

impl PartialEq for CodeEntry {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for CodeEntry {}

impl Hash for CodeEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

impl PartialEq<i32> for CodeEntry {
    fn eq(&self, other: &i32) -> bool {
        self.code == *other
    }
}

impl PartialEq<CodeEntry> for i32 {
    fn eq(&self, other: &CodeEntry) -> bool {
        *self == other.code
    }
}

/// Non-negative codes print as hex, negative codes as signed decimal
impl fmt::Display for CodeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.code < 0 {
            write!(f, "{} ({}): {}", self.name, self.code, self.description)
        } else {
            write!(f, "{} ({:#04x}): {}", self.name, self.code, self.description)
        }
    }
}

/// Named table of code entries
#[derive(Debug, Clone, Copy)]
pub struct CodeTable {
    name: &'static str,
    entries: &'static [CodeEntry],
}

impl CodeTable {
    pub const fn new(name: &'static str, entries: &'static [CodeEntry]) -> Self {
        Self { name, entries }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn entries(&self) -> &'static [CodeEntry] {
        self.entries
    }

    /// Entry whose numeric code equals `code`
    pub fn from_code(&self, code: i32) -> Result<&'static CodeEntry, UnknownCodeError> {
        self.entries
            .iter()
            .find(|entry| entry.code == code)
            .ok_or(UnknownCodeError {
                registry: self.name,
                code,
            })
    }

    /// Entry with the given symbolic name
    pub fn from_name(&self, name: &str) -> Option<&'static CodeEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Whether any entry carries `code`
    pub fn contains_code(&self, code: i32) -> bool {
        self.entries.iter().any(|entry| *entry == code)
    }
}

/// Declare a module of typed constants together with its [`CodeTable`].
///
/// ```ignore
/// code_table! {
///     /// Request codes
///     pub mod request: u8 = "request" {
///         SET_CUR = 0x01 => "Set current value",
///     }
/// }
/// ```
macro_rules! code_table {
    (
        $(#[$meta:meta])*
        $vis:vis mod $module:ident: $ty:ty = $table:literal {
            $($name:ident = $code:expr => $description:literal),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis mod $module {
            $(
                #[doc = $description]
                pub const $name: $ty = $code;
            )*

            /// All constants of this module as a code table
            pub const TABLE: $crate::registry::CodeTable = $crate::registry::CodeTable::new(
                $table,
                &[$(
                    $crate::registry::CodeEntry {
                        name: stringify!($name),
                        code: $name as i32,
                        description: $description,
                    }
                ),*],
            );
        }
    };
}

pub(crate) use code_table;

#[cfg(test)]
mod tests {
    use super::*;

    code_table! {
        mod sample: u8 = "sample" {
            FIRST = 0x01 => "First entry",
            SECOND = 0x81 => "Second entry",
        }
    }

    #[test]
    fn test_lookup_by_code_and_name() {
        let entry = sample::TABLE.from_code(0x81).unwrap();
        assert_eq!(entry.name, "SECOND");
        assert_eq!(entry.description, "Second entry");
        assert_eq!(sample::TABLE.from_name("FIRST").unwrap().code, 1);
        assert_eq!(sample::SECOND, 0x81);
    }

    #[test]
    fn test_unknown_code_fails() {
        let err = sample::TABLE.from_code(0x02).unwrap_err();
        assert_eq!(err.registry, "sample");
        assert_eq!(err.code, 2);
        assert!(sample::TABLE.from_name("THIRD").is_none());
    }

    #[test]
    fn test_entry_compares_with_integer() {
        let entry = sample::TABLE.from_code(1).unwrap();
        assert!(*entry == 1);
        assert!(1 == *entry);
        assert!(*entry != 0x81);
    }

    #[test]
    fn test_equality_ignores_name() {
        let first = *sample::TABLE.from_code(1).unwrap();
        let renamed = CodeEntry {
            name: "RENAMED",
            code: 1,
            description: "Same code, other name",
        };
        assert_eq!(first, renamed);
        assert!(first == renamed.code);

        let mut set = std::collections::HashSet::new();
        set.insert(first);
        assert!(set.contains(&renamed));
    }

    #[test]
    fn test_contains_code() {
        assert!(sample::TABLE.contains_code(0x81));
        assert!(!sample::TABLE.contains_code(0x02));
    }

    #[test]
    fn test_display_sign() {
        let entry = sample::TABLE.from_code(0x81).unwrap();
        assert_eq!(entry.to_string(), "SECOND (0x81): Second entry");

        let negative = CodeEntry {
            name: "NEGATIVE",
            code: -7,
            description: "Below zero",
        };
        assert_eq!(negative.to_string(), "NEGATIVE (-7): Below zero");
    }
}
