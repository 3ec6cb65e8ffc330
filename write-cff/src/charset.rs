//! Format 0 charsets.

use crate::{
    font::Cid,
    strings::StringId,
    write::{CffWrite, CffWriter},
};

/// A format 0 charset: one id per glyph, excluding `.notdef`.
///
/// For base fonts the ids are glyph name SIDs; for CIDFonts they are CIDs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Charset {
    ids: Vec<u16>,
}

impl Charset {
    /// Builds the charset of a base font from the names of all glyphs after
    /// `.notdef`.
    pub(crate) fn from_sids(sids: impl IntoIterator<Item = StringId>) -> Self {
        Self {
            ids: sids.into_iter().map(StringId::to_u16).collect(),
        }
    }

    /// Builds the charset of a CIDFont from its CIDs in glyph order,
    /// skipping CID 0.
    pub(crate) fn from_cids(cids: &[Cid]) -> Self {
        Self {
            ids: cids.iter().copied().filter(|cid| *cid != 0).collect(),
        }
    }

    pub(crate) fn size(&self) -> u32 {
        1 + 2 * self.ids.len() as u32
    }
}

impl CffWrite for Charset {
    fn write_into(&self, writer: &mut CffWriter) {
        0u8.write_into(writer);
        self.ids.write_into(writer);
    }
}
