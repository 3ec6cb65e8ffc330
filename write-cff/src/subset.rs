//! Ordering the glyphs of a base font.

use font_types::GlyphId;

use crate::{
    error::{Error, InvalidFontReason, Undefined},
    font::Type1Font,
    index::MAX_INDEX_COUNT,
};

pub(crate) const NOTDEF: &[u8] = b".notdef";

/// The glyphs to write, in output order.
///
/// `.notdef` comes first, then every glyph the Encoding reaches, then the
/// remaining glyphs. Both of the latter groups are sorted by glyph id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct GlyphSubset {
    glyphs: Vec<GlyphId>,
    num_encoded: usize,
}

impl GlyphSubset {
    /// Orders the requested glyphs, or all glyphs of the font if `requested`
    /// is `None`.
    pub(crate) fn new<F: Type1Font + ?Sized>(
        font: &F,
        requested: Option<&[GlyphId]>,
    ) -> Result<Self, Error> {
        let mut members = match requested {
            Some(glyphs) => glyphs.to_vec(),
            None => font.glyphs(),
        };
        members.sort_unstable();
        members.dedup();

        let mut notdef = None;
        for gid in &members {
            let name = font
                .glyph_name(*gid)
                .ok_or(Error::Undefined(Undefined::GlyphName(*gid)))?;
            if &*name == NOTDEF {
                notdef = Some(*gid);
                break;
            }
        }
        let notdef = notdef.ok_or(Error::InvalidFont(InvalidFontReason::MissingNotdef))?;

        let mut encoded: Vec<GlyphId> = (0..=255u8)
            .filter_map(|code| font.encode_char(code))
            .filter(|gid| *gid != notdef && members.binary_search(gid).is_ok())
            .collect();
        encoded.sort_unstable();
        encoded.dedup();

        let num_encoded = encoded.len();
        let mut glyphs = Vec::with_capacity(members.len());
        glyphs.push(notdef);
        glyphs.extend(encoded.iter().copied());
        glyphs.extend(
            members
                .iter()
                .copied()
                .filter(|gid| *gid != notdef && encoded.binary_search(gid).is_err()),
        );
        if glyphs.len() > MAX_INDEX_COUNT {
            return Err(Error::InvalidFont(InvalidFontReason::TooManyGlyphs(
                glyphs.len(),
            )));
        }
        Ok(Self {
            glyphs,
            num_encoded,
        })
    }

    /// All glyphs, in output order.
    pub(crate) fn glyphs(&self) -> &[GlyphId] {
        &self.glyphs
    }

    pub(crate) fn notdef(&self) -> GlyphId {
        self.glyphs[0]
    }

    /// The glyphs reached through the Encoding, sorted.
    pub(crate) fn encoded(&self) -> &[GlyphId] {
        &self.glyphs[1..1 + self.num_encoded]
    }

    /// The position of a glyph among the encoded glyphs.
    pub(crate) fn encoded_index(&self, gid: GlyphId) -> Option<usize> {
        self.encoded().binary_search(&gid).ok()
    }

    pub(crate) fn len(&self) -> usize {
        self.glyphs.len()
    }
}
