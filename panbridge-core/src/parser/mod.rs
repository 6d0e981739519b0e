//! Parsers that turn PanCLI text into domain records
//!
//! Appliance output is not uniformly structured, so each command is paired
//! with one of four strategies:
//!
//! - [`columns`]: header-aligned tables (`bladeset list`, `volume list`, `sysmap`)
//! - [`tokens`]: positional numeric tokens (`sysstat`)
//! - [`kv`]: `key: value` blocks (`about`, `... detail`)
//! - tab-delimited rows (`eventlog -output tab`)
//!
//! List parsers never fail as a whole. A row that cannot be turned into a
//! record is logged and skipped.

pub mod about;
pub mod bladeset;
pub mod columns;
pub mod eventlog;
pub mod fields;
pub mod kv;
pub mod sysmap;
pub mod sysstat;
pub mod tokens;
pub mod values;
pub mod volume;

pub use about::AboutParser;
pub use bladeset::{BladesetDetailParser, BladesetListParser};
pub use eventlog::EventlogParser;
pub use fields::Fields;
pub use sysmap::{SysmapCapacityParser, SysmapNodesParser};
pub use sysstat::{SysstatDirectorParser, SysstatStorageParser};
pub use volume::{VolumeDetailsParser, VolumeListParser};

/// How a parser reads its command's output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStrategy {
    /// Columns inferred from header text
    HeaderAligned,
    /// Numbers assigned by position, key-value fallback
    TokenExtraction,
    /// `key: value` or `key   value` lines
    KeyValue,
    /// Tab-separated columns with a header row
    TabDelimited,
}

/// A stateless parser for one PanCLI command
pub trait CommandParser {
    /// Command text, or its prefix for commands that take an argument
    const COMMAND: &'static str;
    /// Strategy used on the output
    const STRATEGY: ParseStrategy;
    /// Parsed result
    type Output;

    /// Parses cleaned command output
    fn parse(raw: &str) -> Self::Output;
}

/// Quotes a command argument when it contains whitespace
#[must_use]
pub fn quote_arg(arg: &str) -> String {
    let arg = arg.trim();
    if arg.contains(char::is_whitespace) {
        format!("\"{arg}\"")
    } else {
        arg.to_string()
    }
}
