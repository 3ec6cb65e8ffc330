//! Custom encodings of base fonts.
//!
//! See "12 Encodings" at <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5176.CFF.pdf>

use crate::{
    error::Error,
    font::Type1Font,
    strings::{StringId, StringTable},
    subset::GlyphSubset,
    write::{CffWrite, CffWriter},
};

/// The number of code slots a format 0 encoding can hold.
const MAX_CODES: usize = 255;

/// A format 0 encoding, with supplements for multiply-encoded glyphs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Encoding {
    /// The code of each encoded glyph, indexed by its position after
    /// `.notdef`.
    codes: Vec<u8>,
    supplements: Vec<(u8, StringId)>,
}

impl Encoding {
    /// Builds the encoding of a font restricted to a subset.
    ///
    /// Each encoded glyph takes the first code that maps to it; any other
    /// code mapping to the same glyph becomes a supplement.
    pub(crate) fn new<F: Type1Font + ?Sized>(
        font: &F,
        subset: &GlyphSubset,
        strings: &mut StringTable,
    ) -> Result<Self, Error> {
        let mut codes = Vec::new();
        let mut used = [false; MAX_CODES];
        let mut supplements = Vec::new();
        for code in 0..=255u8 {
            let Some(gid) = font.encode_char(code) else {
                continue;
            };
            if gid == subset.notdef() {
                continue;
            }
            let Some(slot) = subset.encoded_index(gid) else {
                continue;
            };
            let Some(name) = font.glyph_name(gid) else {
                continue;
            };
            if slot >= MAX_CODES || used[slot] {
                supplements.push((code, strings.sid(&name)?));
            } else {
                used[slot] = true;
                if slot >= codes.len() {
                    codes.resize(slot + 1, 0);
                }
                codes[slot] = code;
            }
        }
        if codes.is_empty() {
            codes.push(0);
        }
        Ok(Self { codes, supplements })
    }

    pub(crate) fn size(&self) -> u32 {
        let nsupp = self.supplements.len() as u32;
        2 + self.codes.len() as u32 + 3 * nsupp + (nsupp > 0) as u32
    }
}

impl CffWrite for Encoding {
    fn write_into(&self, writer: &mut CffWriter) {
        let format: u8 = if self.supplements.is_empty() { 0 } else { 0x80 };
        format.write_into(writer);
        (self.codes.len() as u8).write_into(writer);
        writer.write_slice(&self.codes);
        if !self.supplements.is_empty() {
            (self.supplements.len() as u8).write_into(writer);
            for (code, sid) in &self.supplements {
                code.write_into(writer);
                sid.write_into(writer);
            }
        }
    }
}
