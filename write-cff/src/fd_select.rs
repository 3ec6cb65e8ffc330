//! Mapping glyphs to font dicts.
//!
//! See "19 FDSelect" at <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5176.CFF.pdf>

use crate::write::{CffWrite, CffWriter};

/// An FDSelect in whichever of formats 0 and 3 is smaller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum FdSelect {
    /// One font dict index per glyph.
    Format0 { fds: Vec<u8> },
    /// Runs of glyphs sharing a font dict, as `(first glyph, fd)`.
    Format3 { ranges: Vec<(u16, u8)>, sentinel: u16 },
}

impl FdSelect {
    /// Chooses the encoding for the font dict indices of glyphs in glyph
    /// order.
    ///
    /// Format 3 is only used when it is strictly smaller.
    pub(crate) fn new(fds: &[u8]) -> Self {
        let mut ranges: Vec<(u16, u8)> = Vec::new();
        for (gid, fd) in fds.iter().copied().enumerate() {
            if ranges.last().map(|(_, last)| *last) != Some(fd) {
                ranges.push((gid as u16, fd));
            }
        }
        let format0_size = 1 + fds.len();
        let format3_size = 5 + 3 * ranges.len();
        if format3_size < format0_size {
            FdSelect::Format3 {
                ranges,
                sentinel: fds.len() as u16,
            }
        } else {
            FdSelect::Format0 { fds: fds.to_vec() }
        }
    }

    pub(crate) fn format(&self) -> u8 {
        match self {
            FdSelect::Format0 { .. } => 0,
            FdSelect::Format3 { .. } => 3,
        }
    }

    pub(crate) fn size(&self) -> u32 {
        match self {
            FdSelect::Format0 { fds } => 1 + fds.len() as u32,
            FdSelect::Format3 { ranges, .. } => 5 + 3 * ranges.len() as u32,
        }
    }
}

impl CffWrite for FdSelect {
    fn write_into(&self, writer: &mut CffWriter) {
        self.format().write_into(writer);
        match self {
            FdSelect::Format0 { fds } => writer.write_slice(fds),
            FdSelect::Format3 { ranges, sentinel } => {
                (ranges.len() as u16).write_into(writer);
                for (first, fd) in ranges {
                    first.write_into(writer);
                    fd.write_into(writer);
                }
                sentinel.write_into(writer);
            }
        }
    }
}
