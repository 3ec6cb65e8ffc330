//! Fixtures and decoders shared by unit tests.

use std::{borrow::Cow, collections::BTreeMap, ops::Range};

use font_types::GlyphId;
use read_fonts::{
    tables::{
        cff::Cff,
        postscript::{
            dict::{entries, Entry},
            Index1,
        },
    },
    FontData, FontRead,
};

use crate::{
    font::{
        CharstringFormat, Cid, CidFont, CidSystemInfo, ConvertError, FontDescriptor, FontInfo,
        FontMatrix, OutlineFont, PrivateDict, SubrKind, Type1Font, Uid, DEFAULT_CID_COUNT,
    },
    options::CffOptions,
    strings::StringTable,
    write::{CffWrite, CffWriter, StreamSink},
};

/// Writes an object with an empty string table and default options.
pub(crate) fn write_to_vec<T: CffWrite + ?Sized>(obj: &T) -> Vec<u8> {
    let strings = StringTable::new(0);
    let mut sink = StreamSink::new(Vec::new());
    let mut writer = CffWriter::frozen(&mut sink, &strings, CffOptions::default());
    obj.write_into(&mut writer);
    sink.finish().unwrap()
}

/// Encrypts a charstring the way Type 1 fonts store them.
pub(crate) fn encrypt_charstring(plain: &[u8]) -> Vec<u8> {
    let mut r: u16 = 4330;
    plain
        .iter()
        .map(|&byte| {
            let cipher = byte ^ (r >> 8) as u8;
            r = (cipher as u16)
                .wrapping_add(r)
                .wrapping_mul(52845)
                .wrapping_add(22719);
            cipher
        })
        .collect()
}

/// Decodes an integer operand, returning it with its encoded length.
pub(crate) fn decode_int(data: &[u8]) -> Option<(i32, usize)> {
    let b0 = *data.first()? as i32;
    match b0 {
        32..=246 => Some((b0 - 139, 1)),
        247..=250 => Some(((b0 - 247) * 256 + *data.get(1)? as i32 + 108, 2)),
        251..=254 => Some((-(b0 - 251) * 256 - *data.get(1)? as i32 - 108, 2)),
        28 => {
            let bytes = data.get(1..3)?;
            Some((i16::from_be_bytes([bytes[0], bytes[1]]) as i32, 3))
        }
        29 => {
            let bytes = data.get(1..5)?;
            Some((i32::from_be_bytes(bytes.try_into().ok()?), 5))
        }
        _ => None,
    }
}

/// Parses a DICT with read-fonts.
pub(crate) fn dict_entries(data: &[u8]) -> Vec<Entry> {
    entries(data, None).collect::<Result<_, _>>().unwrap()
}

/// Reads the INDEX at the start of `data`, returning its objects and its
/// size.
pub(crate) fn read_index(data: &[u8]) -> (Vec<&[u8]>, usize) {
    // read-fonts reads an offSize byte even when the count is zero
    if data.starts_with(&[0, 0]) {
        return (Vec::new(), 2);
    }
    let index = Index1::read(FontData::new(data)).unwrap();
    let objects = (0..index.count() as usize)
        .map(|ix| index.get(ix).unwrap())
        .collect();
    (objects, index.size_in_bytes().unwrap())
}

/// Reads the single Top DICT of a font.
pub(crate) fn top_dict(data: &[u8]) -> Vec<Entry> {
    let cff = Cff::read(FontData::new(data)).unwrap();
    dict_entries(cff.top_dicts().get(0).unwrap())
}

/// The range of the Private DICT named by a Top or Font DICT.
pub(crate) fn private_range(dict: &[Entry]) -> Range<usize> {
    dict.iter()
        .find_map(|entry| match entry {
            Entry::PrivateDictRange(range) => Some(range.clone()),
            _ => None,
        })
        .unwrap()
}

/// A base font held in memory.
#[derive(Clone, Debug)]
pub(crate) struct TestType1Font {
    pub name: Vec<u8>,
    pub key_name: Vec<u8>,
    pub info: FontInfo,
    pub font_matrix: FontMatrix,
    pub uid: Uid,
    pub paint_type: i32,
    pub stroke_width: f64,
    pub format: CharstringFormat,
    pub private: PrivateDict,
    pub subrs: Vec<Option<Vec<u8>>>,
    pub gsubrs: Vec<Option<Vec<u8>>>,
    pub glyph_names: Vec<Vec<u8>>,
    pub glyph_data: Vec<Option<Vec<u8>>>,
    /// Indexed by character code.
    pub encoding: Vec<Option<GlyphId>>,
    pub fail_conversion: bool,
}

impl Default for TestType1Font {
    fn default() -> Self {
        Self {
            name: Vec::new(),
            key_name: Vec::new(),
            info: FontInfo::default(),
            font_matrix: FontMatrix::DEFAULT,
            uid: Uid::None,
            paint_type: 0,
            stroke_width: 0.0,
            format: CharstringFormat::Type1,
            private: PrivateDict::default(),
            subrs: Vec::new(),
            gsubrs: Vec::new(),
            glyph_names: Vec::new(),
            glyph_data: Vec::new(),
            encoding: vec![None; 256],
            fail_conversion: false,
        }
    }
}

impl TestType1Font {
    /// A font with the given `(name, charstring)` glyphs and an empty
    /// Encoding.
    pub(crate) fn with_glyphs(glyphs: &[(&str, &str)]) -> Self {
        Self {
            glyph_names: glyphs
                .iter()
                .map(|(name, _)| name.as_bytes().to_vec())
                .collect(),
            glyph_data: glyphs
                .iter()
                .map(|(_, data)| Some(data.as_bytes().to_vec()))
                .collect(),
            ..Default::default()
        }
    }
}

impl FontDescriptor for TestType1Font {
    fn font_name(&self) -> &[u8] {
        &self.name
    }

    fn key_name(&self) -> &[u8] {
        &self.key_name
    }

    fn font_info(&self) -> FontInfo {
        self.info.clone()
    }

    fn font_matrix(&self) -> FontMatrix {
        self.font_matrix
    }

    fn uid(&self) -> Uid {
        self.uid.clone()
    }

    fn paint_type(&self) -> i32 {
        self.paint_type
    }

    fn stroke_width(&self) -> f64 {
        self.stroke_width
    }
}

impl OutlineFont for TestType1Font {
    fn charstring_format(&self) -> CharstringFormat {
        self.format
    }

    fn private_dict(&self) -> &PrivateDict {
        &self.private
    }

    fn subr_count(&self, kind: SubrKind) -> usize {
        match kind {
            SubrKind::Global => self.gsubrs.len(),
            SubrKind::Local => self.subrs.len(),
        }
    }

    fn subr_data(&self, index: usize, kind: SubrKind) -> Option<Cow<'_, [u8]>> {
        let subrs = match kind {
            SubrKind::Global => &self.gsubrs,
            SubrKind::Local => &self.subrs,
        };
        subrs.get(index)?.as_deref().map(Cow::Borrowed)
    }

    // the operators used by these tests are the same in both formats
    fn convert_to_type2(&self, charstring: &[u8]) -> Result<Vec<u8>, ConvertError> {
        if self.fail_conversion {
            return Err("unsupported operator".into());
        }
        Ok(charstring.to_vec())
    }
}

impl Type1Font for TestType1Font {
    fn glyphs(&self) -> Vec<GlyphId> {
        (0..self.glyph_names.len() as u32).map(GlyphId::new).collect()
    }

    fn glyph_name(&self, glyph: GlyphId) -> Option<Cow<'_, [u8]>> {
        self.glyph_names
            .get(glyph.to_u32() as usize)
            .map(|name| Cow::Borrowed(name.as_slice()))
    }

    fn encode_char(&self, code: u8) -> Option<GlyphId> {
        self.encoding.get(code as usize).copied().flatten()
    }

    fn glyph_data(&self, glyph: GlyphId) -> Option<Cow<'_, [u8]>> {
        self.glyph_data
            .get(glyph.to_u32() as usize)?
            .as_deref()
            .map(Cow::Borrowed)
    }
}

/// A CIDFont whose font dicts are [`TestType1Font`]s.
#[derive(Clone, Debug)]
pub(crate) struct TestCidFont {
    pub name: Vec<u8>,
    pub ros: CidSystemInfo,
    pub cid_count: u32,
    pub font_dicts: Vec<TestType1Font>,
    /// Charstring and font dict index of each CID.
    pub glyphs: BTreeMap<Cid, (Vec<u8>, usize)>,
}

impl TestCidFont {
    pub(crate) fn new(font_dicts: Vec<TestType1Font>) -> Self {
        Self {
            name: Vec::new(),
            ros: CidSystemInfo::default(),
            cid_count: DEFAULT_CID_COUNT,
            font_dicts,
            glyphs: BTreeMap::new(),
        }
    }
}

impl FontDescriptor for TestCidFont {
    fn font_name(&self) -> &[u8] {
        &self.name
    }
}

impl CidFont for TestCidFont {
    fn cid_system_info(&self) -> &CidSystemInfo {
        &self.ros
    }

    fn cid_count(&self) -> u32 {
        self.cid_count
    }

    fn font_dict_count(&self) -> usize {
        self.font_dicts.len()
    }

    fn font_dict(&self, index: usize) -> &dyn OutlineFont {
        &self.font_dicts[index]
    }

    fn cids(&self) -> Vec<Cid> {
        self.glyphs.keys().copied().collect()
    }

    fn glyph_data(&self, cid: Cid) -> Option<(Cow<'_, [u8]>, usize)> {
        self.glyphs
            .get(&cid)
            .map(|(data, fd)| (Cow::Borrowed(data.as_slice()), *fd))
    }
}
