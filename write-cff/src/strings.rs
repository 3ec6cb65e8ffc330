//! String identifiers and the custom string table.

use indexmap::IndexSet;
use read_fonts::tables::postscript::STANDARD_STRINGS;

use crate::error::{Error, Undefined};

pub use read_fonts::tables::postscript::StringId;

/// The number of strings in the standard string set.
pub const NUM_STANDARD_STRINGS: usize = STANDARD_STRINGS.len();

/// Returns the identifier of a standard string, if `bytes` is one.
pub fn standard_sid(bytes: &[u8]) -> Option<StringId> {
    STANDARD_STRINGS
        .iter()
        .position(|s| s.as_bytes() == bytes)
        .map(|ix| StringId::new(ix as u16))
}

/// The custom strings of a font, in first-insertion order.
///
/// A table is filled while preparing a font and then only read: every
/// layout pass must resolve exactly the same strings to the same ids.
#[derive(Clone, Debug, Default)]
pub struct StringTable {
    custom: IndexSet<Vec<u8>>,
    capacity: usize,
}

impl StringTable {
    /// Creates a table that holds at most `capacity` custom strings.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.min(u16::MAX as usize + 1 - NUM_STANDARD_STRINGS);
        Self {
            custom: IndexSet::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    /// Returns the identifier of a string, entering it if needed.
    pub fn sid(&mut self, bytes: &[u8]) -> Result<StringId, Error> {
        if let Some(sid) = self.lookup(bytes) {
            return Ok(sid);
        }
        if self.custom.len() >= self.capacity {
            return Err(Error::LimitCheck(self.capacity));
        }
        let (ix, _) = self.custom.insert_full(bytes.to_vec());
        Ok(StringId::new((NUM_STANDARD_STRINGS + ix) as u16))
    }

    /// Returns the identifier of a string without entering it.
    pub fn lookup(&self, bytes: &[u8]) -> Option<StringId> {
        standard_sid(bytes).or_else(|| {
            self.custom
                .get_index_of(bytes)
                .map(|ix| StringId::new((NUM_STANDARD_STRINGS + ix) as u16))
        })
    }

    /// Like [`lookup`](Self::lookup), but a missing string is an error.
    pub(crate) fn require(&self, bytes: &[u8]) -> Result<StringId, Error> {
        self.lookup(bytes).ok_or_else(|| {
            Error::Undefined(Undefined::String(
                String::from_utf8_lossy(bytes).into_owned(),
            ))
        })
    }

    /// Returns the string for an identifier.
    pub fn get(&self, sid: StringId) -> Option<&[u8]> {
        match sid.standard_string() {
            Ok(standard) => Some(standard.bytes()),
            Err(ix) => self.custom.get_index(ix).map(Vec::as_slice),
        }
    }

    /// The number of custom strings.
    pub fn len(&self) -> usize {
        self.custom.len()
    }

    pub fn is_empty(&self) -> bool {
        self.custom.is_empty()
    }

    /// The combined length of the custom strings.
    pub fn total_len(&self) -> u32 {
        self.custom.iter().map(|s| s.len() as u32).sum()
    }

    /// The custom strings, in the order of their identifiers.
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.custom.iter().map(Vec::as_slice)
    }
}
