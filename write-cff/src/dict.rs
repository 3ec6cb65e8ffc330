//! Writing PostScript DICTs.
//!
//! See "Table 9 Top DICT Operator Entries" and "Table 23 Private DICT
//! Operators" at <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5176.CFF.pdf>

use std::ops::Deref;

use crate::{
    error::Error,
    font::{
        CharstringFormat, CidSystemInfo, FontBBox, FontDescriptor, FontInfo, FontMatrix,
        PrivateDict, Uid, DEFAULT_CID_COUNT,
    },
    number::{encode_int, encode_real},
    write::CffWriter,
};

/// The escape byte preceding two-byte operators.
const ESCAPE: u8 = 12;

/// Adobe products cannot handle longer XUIDs.
const MAX_XUID_LEN: usize = 16;

/// The CharstringType assumed when the Top DICT omits it.
const DEFAULT_CHARSTRING_TYPE: i32 = 2;

/// PostScript DICT operator.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub(crate) enum Operator {
    Notice,
    FullName,
    FamilyName,
    FontBbox,
    CharstringsOffset,
    PrivateDictRange,
    Copyright,
    IsFixedPitch,
    ItalicAngle,
    UnderlinePosition,
    UnderlineThickness,
    PaintType,
    CharstringType,
    FontMatrix,
    StrokeWidth,
    FdArrayOffset,
    FdSelectOffset,
    BlueValues,
    OtherBlues,
    FamilyBlues,
    FamilyOtherBlues,
    SubrsOffset,
    BlueScale,
    BlueShift,
    BlueFuzz,
    LanguageGroup,
    ExpansionFactor,
    Encoding,
    Charset,
    UniqueId,
    Xuid,
    Ros,
    CidCount,
    FontName,
    StdHw,
    StdVw,
    DefaultWidthX,
    NominalWidthX,
    StemSnapH,
    StemSnapV,
    ForceBold,
    LenIv,
    InitialRandomSeed,
}

/// The encoded form of an [Operator]: one or two bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct OperatorBytes {
    bytes: [u8; 2],
    len: usize,
}

impl Deref for OperatorBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

impl Operator {
    /// Returns the opcode and whether it follows the escape byte.
    fn opcode(self) -> (u8, bool) {
        use Operator::*;
        match self {
            // Top DICT operators
            Notice => (1, false),
            FullName => (2, false),
            FamilyName => (3, false),
            FontBbox => (5, false),
            UniqueId => (13, false),
            Xuid => (14, false),
            Charset => (15, false),
            Encoding => (16, false),
            CharstringsOffset => (17, false),
            PrivateDictRange => (18, false),
            Copyright => (0, true),
            IsFixedPitch => (1, true),
            ItalicAngle => (2, true),
            UnderlinePosition => (3, true),
            UnderlineThickness => (4, true),
            PaintType => (5, true),
            CharstringType => (6, true),
            FontMatrix => (7, true),
            StrokeWidth => (8, true),
            Ros => (30, true),
            CidCount => (34, true),
            FdArrayOffset => (36, true),
            FdSelectOffset => (37, true),
            FontName => (38, true),
            // Private DICT operators
            BlueValues => (6, false),
            OtherBlues => (7, false),
            FamilyBlues => (8, false),
            FamilyOtherBlues => (9, false),
            StdHw => (10, false),
            StdVw => (11, false),
            SubrsOffset => (19, false),
            DefaultWidthX => (20, false),
            NominalWidthX => (21, false),
            BlueScale => (9, true),
            BlueShift => (10, true),
            BlueFuzz => (11, true),
            StemSnapH => (12, true),
            StemSnapV => (13, true),
            ForceBold => (14, true),
            LenIv => (16, true),
            LanguageGroup => (17, true),
            ExpansionFactor => (18, true),
            InitialRandomSeed => (19, true),
        }
    }

    pub(crate) fn to_bytes(self) -> OperatorBytes {
        match self.opcode() {
            (opcode, false) => OperatorBytes {
                bytes: [opcode, 0],
                len: 1,
            },
            (opcode, true) => OperatorBytes {
                bytes: [ESCAPE, opcode],
                len: 2,
            },
        }
    }
}

/// Writes DICT entries, eliding those that match their defaults.
pub(crate) struct DictWriter<'w, 'a> {
    writer: &'w mut CffWriter<'a>,
}

impl<'w, 'a> DictWriter<'w, 'a> {
    pub(crate) fn new(writer: &'w mut CffWriter<'a>) -> Self {
        Self { writer }
    }

    fn operator(&mut self, op: Operator) {
        self.writer.write_slice(&op.to_bytes());
    }

    fn int(&mut self, value: i32) {
        self.writer.write_slice(&encode_int(value));
    }

    fn real(&mut self, value: f64) {
        self.writer.write_slice(&encode_real(value));
    }

    /// Writes an offset or size operand.
    fn offset(&mut self, value: u32) {
        self.int(value.min(i32::MAX as u32) as i32);
    }

    fn string(&mut self, value: &[u8]) -> Result<(), Error> {
        let sid = self.writer.sid(value)?;
        self.int(sid.to_u16() as i32);
        Ok(())
    }

    fn int_entry(&mut self, op: Operator, value: i32) {
        self.int(value);
        self.operator(op);
    }

    fn offset_entry(&mut self, op: Operator, value: u32) {
        self.offset(value);
        self.operator(op);
    }

    fn int_entry_if_ne(&mut self, op: Operator, value: i32, default: i32) {
        if value != default {
            self.int_entry(op, value);
        }
    }

    fn real_entry(&mut self, op: Operator, value: f64) {
        self.real(value);
        self.operator(op);
    }

    // defaults are compared at the precision the values are stored with
    fn real_entry_if_ne(&mut self, op: Operator, value: f64, default: f64) {
        if value as f32 != default as f32 {
            self.real_entry(op, value);
        }
    }

    fn bool_entry(&mut self, op: Operator, value: bool) {
        self.int_entry(op, value as i32);
    }

    fn delta_entry(&mut self, op: Operator, values: &[f64]) {
        if values.is_empty() {
            return;
        }
        let mut prev = 0.0;
        for &value in values {
            self.real(value - prev);
            prev = value;
        }
        self.operator(op);
    }

    fn string_entry(&mut self, op: Operator, value: Option<&[u8]>) -> Result<(), Error> {
        if let Some(value) = value {
            self.string(value)?;
            self.operator(op);
        }
        Ok(())
    }

    /// Writes a Private DICT range: `size offset Private`.
    fn private_entry(&mut self, range: PrivateRange) {
        self.offset(range.size);
        self.offset_entry(Operator::PrivateDictRange, range.offset);
    }
}

/// The location of a Private DICT.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct PrivateRange {
    pub size: u32,
    pub offset: u32,
}

/// The Top DICT entries shared by base fonts, CIDFonts and font dicts.
#[derive(Clone, Debug)]
pub(crate) struct TopCommon {
    info: FontInfo,
    bbox: FontBBox,
    uid: Uid,
    paint_type: i32,
    font_matrix: FontMatrix,
    stroke_width: f64,
}

impl TopCommon {
    /// Captures the entries of a font.
    ///
    /// Without `full_info` only the string entries of the font's info are
    /// kept.
    pub(crate) fn new<F: FontDescriptor + ?Sized>(
        font: &F,
        bbox: FontBBox,
        full_info: bool,
    ) -> Self {
        let info = font.font_info();
        Self {
            info: if full_info { info } else { info.strings_only() },
            bbox,
            uid: font.uid(),
            paint_type: font.paint_type(),
            font_matrix: font.font_matrix(),
            stroke_width: font.stroke_width(),
        }
    }

    fn write(&self, dict: &mut DictWriter, force_font_matrix: bool) -> Result<(), Error> {
        let options = *dict.writer.options();
        let info = &self.info;
        dict.string_entry(Operator::Notice, info.notice.as_deref())?;
        dict.string_entry(Operator::FullName, info.full_name.as_deref())?;
        dict.string_entry(Operator::FamilyName, info.family_name.as_deref())?;
        if !self.bbox.is_empty() {
            let bbox = &self.bbox;
            for value in [bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max] {
                dict.real(value as f64);
            }
            dict.operator(Operator::FontBbox);
        }
        match &self.uid {
            Uid::UniqueId(id) => dict.int_entry(Operator::UniqueId, *id),
            Uid::Xuid(values) if options.cap_xuid => {
                if values.len() > MAX_XUID_LEN {
                    log::warn!(
                        "truncating XUID of {} entries to {MAX_XUID_LEN}",
                        values.len()
                    );
                }
                for value in values.iter().take(MAX_XUID_LEN) {
                    dict.int(*value);
                }
                dict.operator(Operator::Xuid);
            }
            _ => (),
        }
        // Acrobat Reader 3 rejects these
        if !options.ar3_compat {
            dict.string_entry(Operator::Copyright, info.copyright.as_deref())?;
            if info.is_fixed_pitch {
                dict.bool_entry(Operator::IsFixedPitch, true);
            }
            dict.real_entry_if_ne(
                Operator::ItalicAngle,
                info.italic_angle,
                FontInfo::DEFAULT_ITALIC_ANGLE,
            );
            dict.int_entry_if_ne(
                Operator::UnderlinePosition,
                info.underline_position,
                FontInfo::DEFAULT_UNDERLINE_POSITION,
            );
            dict.int_entry_if_ne(
                Operator::UnderlineThickness,
                info.underline_thickness,
                FontInfo::DEFAULT_UNDERLINE_THICKNESS,
            );
            dict.int_entry_if_ne(Operator::PaintType, self.paint_type, 0);
        }
        // A CIDFont without FontMatrix scales its font dicts by 1000, so
        // CID-keyed dicts always carry one.
        if force_font_matrix || !self.font_matrix.is_default() {
            for value in self.font_matrix.0 {
                dict.real(value);
            }
            dict.operator(Operator::FontMatrix);
        }
        dict.real_entry_if_ne(Operator::StrokeWidth, self.stroke_width, 0.0);
        Ok(())
    }
}

/// A Top DICT of some kind.
pub(crate) trait TopDict {
    fn write_dict(&self, writer: &mut CffWriter) -> Result<(), Error>;
}

/// Offsets referenced from the Top DICT of a base font.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct SimpleTopOffsets {
    pub encoding: u32,
    pub charset: u32,
    pub charstrings: u32,
    pub private: PrivateRange,
}

/// The Top DICT of a base font.
pub(crate) struct SimpleFontTop<'a> {
    pub common: &'a TopCommon,
    pub charstring_type: i32,
    pub offsets: SimpleTopOffsets,
}

impl TopDict for SimpleFontTop<'_> {
    fn write_dict(&self, writer: &mut CffWriter) -> Result<(), Error> {
        let mut dict = DictWriter::new(writer);
        self.common.write(&mut dict, false)?;
        dict.private_entry(self.offsets.private);
        dict.offset_entry(Operator::CharstringsOffset, self.offsets.charstrings);
        if self.offsets.charset != 0 {
            dict.offset_entry(Operator::Charset, self.offsets.charset);
        }
        if self.offsets.encoding != 0 {
            dict.offset_entry(Operator::Encoding, self.offsets.encoding);
        }
        dict.int_entry_if_ne(
            Operator::CharstringType,
            self.charstring_type,
            DEFAULT_CHARSTRING_TYPE,
        );
        Ok(())
    }
}

/// Offsets referenced from the Top DICT of a CIDFont.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct CidTopOffsets {
    pub charset: u32,
    pub charstrings: u32,
    pub fd_select: u32,
    pub fd_array: u32,
}

/// The Top DICT of a CIDFont.
pub(crate) struct CidFontTop<'a> {
    pub common: &'a TopCommon,
    pub ros: &'a CidSystemInfo,
    pub cid_count: u32,
    pub offsets: CidTopOffsets,
}

impl TopDict for CidFontTop<'_> {
    fn write_dict(&self, writer: &mut CffWriter) -> Result<(), Error> {
        let mut dict = DictWriter::new(writer);
        // ROS must come first
        dict.string(&self.ros.registry)?;
        dict.string(&self.ros.ordering)?;
        dict.int_entry(Operator::Ros, self.ros.supplement);
        self.common.write(&mut dict, true)?;
        if self.offsets.charset != 0 {
            dict.offset_entry(Operator::Charset, self.offsets.charset);
        }
        dict.offset_entry(Operator::CharstringsOffset, self.offsets.charstrings);
        if self.cid_count != DEFAULT_CID_COUNT {
            dict.offset_entry(Operator::CidCount, self.cid_count);
        }
        dict.offset_entry(Operator::FdArrayOffset, self.offsets.fd_array);
        dict.offset_entry(Operator::FdSelectOffset, self.offsets.fd_select);
        Ok(())
    }
}

/// An entry of the FDArray of a CIDFont.
pub(crate) struct FontDictTop<'a> {
    pub common: &'a TopCommon,
    pub font_name: &'a [u8],
    pub private: PrivateRange,
}

impl TopDict for FontDictTop<'_> {
    fn write_dict(&self, writer: &mut CffWriter) -> Result<(), Error> {
        let mut dict = DictWriter::new(writer);
        self.common.write(&mut dict, true)?;
        dict.private_entry(self.private);
        if !self.font_name.is_empty() {
            dict.string_entry(Operator::FontName, Some(self.font_name))?;
        }
        Ok(())
    }
}

/// A Private DICT, with the location of its Subrs.
pub(crate) struct PrivateDictRecord<'a> {
    pub dict: &'a PrivateDict,
    pub format: CharstringFormat,
    /// The Subrs offset, relative to the start of the Private DICT.
    pub subrs: Option<u32>,
}

impl PrivateDictRecord<'_> {
    pub(crate) fn write_dict(&self, writer: &mut CffWriter) {
        let suppress_leniv = writer.options().suppress_leniv;
        let mut dict = DictWriter::new(writer);
        let private = self.dict;
        dict.delta_entry(Operator::BlueValues, &private.blue_values);
        dict.delta_entry(Operator::OtherBlues, &private.other_blues);
        dict.delta_entry(Operator::FamilyBlues, &private.family_blues);
        dict.delta_entry(Operator::FamilyOtherBlues, &private.family_other_blues);
        if let Some(std_hw) = private.std_hw {
            dict.real_entry(Operator::StdHw, std_hw);
        }
        if let Some(std_vw) = private.std_vw {
            dict.real_entry(Operator::StdVw, std_vw);
        }
        if let Some(subrs) = self.subrs {
            dict.offset_entry(Operator::SubrsOffset, subrs);
        }
        // Type 1 fonts have no widths (a converted one gets 0 for both,
        // which are the defaults) and no random seed.
        if self.format == CharstringFormat::Type2 {
            dict.real_entry_if_ne(
                Operator::DefaultWidthX,
                private.default_width_x,
                PrivateDict::DEFAULT_WIDTH_X,
            );
            dict.real_entry_if_ne(
                Operator::NominalWidthX,
                private.nominal_width_x,
                PrivateDict::DEFAULT_NOMINAL_WIDTH_X,
            );
            dict.int_entry_if_ne(
                Operator::InitialRandomSeed,
                private.initial_random_seed,
                PrivateDict::DEFAULT_INITIAL_RANDOM_SEED,
            );
        }
        dict.real_entry_if_ne(
            Operator::BlueScale,
            private.blue_scale,
            PrivateDict::DEFAULT_BLUE_SCALE,
        );
        dict.real_entry_if_ne(
            Operator::BlueShift,
            private.blue_shift,
            PrivateDict::DEFAULT_BLUE_SHIFT,
        );
        dict.int_entry_if_ne(
            Operator::BlueFuzz,
            private.blue_fuzz,
            PrivateDict::DEFAULT_BLUE_FUZZ,
        );
        dict.delta_entry(Operator::StemSnapH, &private.stem_snap_h);
        dict.delta_entry(Operator::StemSnapV, &private.stem_snap_v);
        if private.force_bold {
            dict.bool_entry(Operator::ForceBold, true);
        }
        if !suppress_leniv {
            dict.int_entry_if_ne(
                Operator::LenIv,
                private.len_iv,
                PrivateDict::DEFAULT_LEN_IV,
            );
        }
        dict.int_entry_if_ne(
            Operator::LanguageGroup,
            private.language_group,
            PrivateDict::DEFAULT_LANGUAGE_GROUP,
        );
        dict.real_entry_if_ne(
            Operator::ExpansionFactor,
            private.expansion_factor,
            PrivateDict::DEFAULT_EXPANSION_FACTOR,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        options::CffOptions,
        strings::{StringId, StringTable},
        test_helpers::{dict_entries, TestType1Font},
        write::PositionOnly,
    };
    use font_types::Fixed;
    use read_fonts::tables::postscript::dict::{tokens, Blues, Entry, Operator as Op, Token};

    fn write_with(
        strings: &mut StringTable,
        options: CffOptions,
        f: impl FnOnce(&mut CffWriter) -> Result<(), Error>,
    ) -> Vec<u8> {
        let mut sink = crate::write::StreamSink::new(Vec::new());
        let mut writer = CffWriter::interning(&mut sink, strings, options);
        f(&mut writer).unwrap();
        sink.finish().unwrap()
    }

    fn ops(data: &[u8]) -> Vec<Op> {
        tokens(data)
            .filter_map(|token| match token.unwrap() {
                Token::Operator(op) => Some(op),
                Token::Operand(..) => None,
            })
            .collect()
    }

    #[test]
    fn operator_bytes() {
        assert_eq!(&*Operator::Notice.to_bytes(), &[1]);
        assert_eq!(&*Operator::PrivateDictRange.to_bytes(), &[18]);
        assert_eq!(&*Operator::Copyright.to_bytes(), &[12, 0]);
        assert_eq!(&*Operator::Ros.to_bytes(), &[12, 30]);
        assert_eq!(&*Operator::FontName.to_bytes(), &[12, 38]);
        assert_eq!(&*Operator::LenIv.to_bytes(), &[12, 16]);
        assert_eq!(&*Operator::InitialRandomSeed.to_bytes(), &[12, 19]);
    }

    #[test]
    fn simple_top_defaults_are_omitted() {
        let font = TestType1Font::default();
        let common = TopCommon::new(&font, FontBBox::default(), true);
        let top = SimpleFontTop {
            common: &common,
            charstring_type: 2,
            offsets: SimpleTopOffsets {
                charstrings: 200,
                private: PrivateRange {
                    size: 10,
                    offset: 300,
                },
                ..Default::default()
            },
        };
        let mut strings = StringTable::new(8);
        let data = write_with(&mut strings, CffOptions::default(), |w| top.write_dict(w));
        assert_eq!(
            dict_entries(&data),
            [
                Entry::PrivateDictRange(300..310),
                Entry::CharstringsOffset(200),
            ]
        );
    }

    #[test]
    fn simple_top_entries_in_order() {
        let mut font = TestType1Font::default();
        font.info.notice = Some(b"Copyleft".to_vec());
        font.info.family_name = Some(b"Test".to_vec());
        font.info.copyright = Some(b"nobody".to_vec());
        font.info.is_fixed_pitch = true;
        font.info.italic_angle = -12.5;
        font.info.underline_position = -75;
        font.uid = Uid::UniqueId(4000000);
        font.font_matrix = FontMatrix([0.002, 0.0, 0.0, 0.002, 0.0, 0.0]);
        let common = TopCommon::new(&font, FontBBox::new(-10, -250, 1000, 900), true);
        let top = SimpleFontTop {
            common: &common,
            charstring_type: 1,
            offsets: SimpleTopOffsets {
                encoding: 40,
                charset: 50,
                charstrings: 60,
                private: PrivateRange {
                    size: 5,
                    offset: 70,
                },
            },
        };
        let mut strings = StringTable::new(8);
        let data = write_with(&mut strings, CffOptions::default(), |w| top.write_dict(w));
        assert_eq!(
            ops(&data),
            [
                Op::Notice,
                Op::FamilyName,
                Op::FontBbox,
                Op::UniqueId,
                Op::Copyright,
                Op::IsFixedPitch,
                Op::ItalicAngle,
                Op::UnderlinePosition,
                Op::FontMatrix,
                Op::PrivateDictRange,
                Op::CharstringsOffset,
                Op::Charset,
                Op::Encoding,
                Op::CharstringType,
            ]
        );
        // custom strings were entered in order of appearance
        assert_eq!(
            strings.iter().collect::<Vec<_>>(),
            [b"Copyleft".as_slice(), b"Test", b"nobody"]
        );
        let entries = dict_entries(&data);
        assert_eq!(entries[0], Entry::Notice(StringId::new(391)));
        assert_eq!(
            entries[2],
            Entry::FontBbox([-10, -250, 1000, 900].map(Fixed::from_i32))
        );
        assert_eq!(entries[6], Entry::ItalicAngle(Fixed::from_f64(-12.5)));
    }

    #[test]
    fn ar3_compat_drops_entries() {
        let mut font = TestType1Font::default();
        font.info.copyright = Some(b"nobody".to_vec());
        font.info.is_fixed_pitch = true;
        font.info.underline_thickness = 20;
        font.paint_type = 2;
        let common = TopCommon::new(&font, FontBBox::default(), true);
        let top = SimpleFontTop {
            common: &common,
            charstring_type: 2,
            offsets: Default::default(),
        };
        let mut strings = StringTable::new(8);
        let options = CffOptions::default().with_ar3_compat(true);
        let data = write_with(&mut strings, options, |w| top.write_dict(w));
        assert_eq!(ops(&data), [Op::PrivateDictRange, Op::CharstringsOffset]);
        assert!(strings.is_empty());
    }

    #[test]
    fn xuid_needs_option_and_is_capped() {
        let mut font = TestType1Font::default();
        font.uid = Uid::Xuid((0..20).collect());
        let common = TopCommon::new(&font, FontBBox::default(), true);
        let top = SimpleFontTop {
            common: &common,
            charstring_type: 2,
            offsets: Default::default(),
        };
        let mut strings = StringTable::new(8);
        let data = write_with(&mut strings, CffOptions::default(), |w| top.write_dict(w));
        assert_eq!(ops(&data), [Op::PrivateDictRange, Op::CharstringsOffset]);

        let options = CffOptions::default().with_cap_xuid(true);
        let data = write_with(&mut strings, options, |w| top.write_dict(w));
        let tokens = tokens(&data).collect::<Result<Vec<_>, _>>().unwrap();
        let values: Vec<Token> = (0..16).map(|value: i32| Token::from(value)).collect();
        assert_eq!(&tokens[..16], values.as_slice());
        assert_eq!(tokens[16], Token::Operator(Op::Xuid));
    }

    #[test]
    fn cid_top_starts_with_ros_and_forces_matrix() {
        let font = TestType1Font::default();
        let common = TopCommon::new(&font, FontBBox::default(), true);
        let ros = CidSystemInfo {
            registry: b"Adobe".to_vec(),
            ordering: b"Identity".to_vec(),
            supplement: 0,
        };
        let top = CidFontTop {
            common: &common,
            ros: &ros,
            cid_count: 65535,
            offsets: CidTopOffsets {
                charset: 100,
                charstrings: 200,
                fd_select: 150,
                fd_array: 3000,
            },
        };
        let mut strings = StringTable::new(8);
        let data = write_with(&mut strings, CffOptions::default(), |w| top.write_dict(w));
        assert_eq!(
            ops(&data),
            [
                Op::Ros,
                Op::FontMatrix,
                Op::Charset,
                Op::CharstringsOffset,
                Op::CidCount,
                Op::FdArrayOffset,
                Op::FdSelectOffset,
            ]
        );
        assert_eq!(
            dict_entries(&data)[0],
            Entry::Ros {
                registry: StringId::new(391),
                ordering: StringId::new(392),
                supplement: Fixed::ZERO,
            }
        );
        let scale = encode_real(0.001);
        let zero = encode_int(0);
        let matrix: Vec<u8> = [&scale[..], &zero, &zero, &scale, &zero, &zero, &[12, 7][..]].concat();
        assert!(data.windows(matrix.len()).any(|window| window == matrix));
    }

    #[test]
    fn font_dict_uses_key_name_fallback() {
        let font = TestType1Font::default();
        let common = TopCommon::new(&font, FontBBox::default(), false);
        let top = FontDictTop {
            common: &common,
            font_name: b"Sub-0",
            private: PrivateRange {
                size: 20,
                offset: 5000,
            },
        };
        let mut strings = StringTable::new(8);
        let data = write_with(&mut strings, CffOptions::default(), |w| top.write_dict(w));
        assert_eq!(
            ops(&data),
            [Op::FontMatrix, Op::PrivateDictRange, Op::FontName]
        );
        let unnamed = FontDictTop {
            font_name: b"",
            ..top
        };
        let data = write_with(&mut strings, CffOptions::default(), |w| unnamed.write_dict(w));
        assert_eq!(ops(&data), [Op::FontMatrix, Op::PrivateDictRange]);
    }

    #[test]
    fn font_dict_keeps_only_strings() {
        let mut font = TestType1Font::default();
        font.info.full_name = Some(b"Test Regular".to_vec());
        font.info.italic_angle = 10.0;
        let common = TopCommon::new(&font, FontBBox::default(), false);
        let top = FontDictTop {
            common: &common,
            font_name: b"",
            private: PrivateRange::default(),
        };
        let mut strings = StringTable::new(8);
        let data = write_with(&mut strings, CffOptions::default(), |w| top.write_dict(w));
        assert_eq!(
            ops(&data),
            [Op::FullName, Op::FontMatrix, Op::PrivateDictRange]
        );
    }

    #[test]
    fn private_dict_entries() {
        let private = PrivateDict {
            blue_values: vec![-20.0, 0.0, 500.0, 520.0],
            std_hw: Some(50.0),
            std_vw: Some(80.0),
            stem_snap_h: vec![50.0, 60.0],
            blue_scale: 0.05,
            force_bold: true,
            len_iv: 4,
            default_width_x: 500.0,
            ..Default::default()
        };
        let record = PrivateDictRecord {
            dict: &private,
            format: CharstringFormat::Type1,
            subrs: Some(40),
        };
        let mut strings = StringTable::new(0);
        let data = write_with(&mut strings, CffOptions::default(), |w| {
            record.write_dict(w);
            Ok(())
        });
        // lenIV comes last; read-fonts does not know the operator
        let (entries, len_iv) = data.split_at(data.len() - 3);
        assert_eq!(len_iv, [143, 12, 16]);
        let entries = dict_entries(entries);
        assert_eq!(entries.len(), 7);
        assert_eq!(
            entries[0],
            Entry::BlueValues(Blues::new(
                [-20, 0, 500, 520].into_iter().map(Fixed::from_i32)
            ))
        );
        assert_eq!(
            &entries[1..4],
            [
                Entry::StdHw(Fixed::from_i32(50)),
                Entry::StdVw(Fixed::from_i32(80)),
                Entry::SubrsOffset(40),
            ]
        );
        // read-fonts scales BlueScale by 1000 when reading it
        assert!(matches!(entries[4], Entry::BlueScale(_)));
        assert!(matches!(
            &entries[5],
            Entry::StemSnapH(snaps) if snaps.values() == [Fixed::from_i32(50), Fixed::from_i32(60)]
        ));
        assert_eq!(entries[6], Entry::ForceBold(true));
    }

    #[test]
    fn private_dict_type2_widths_and_no_leniv() {
        let private = PrivateDict {
            len_iv: 4,
            default_width_x: 500.0,
            nominal_width_x: 600.0,
            initial_random_seed: 7,
            ..Default::default()
        };
        let record = PrivateDictRecord {
            dict: &private,
            format: CharstringFormat::Type2,
            subrs: None,
        };
        let mut strings = StringTable::new(0);
        let options = CffOptions::default().with_suppress_leniv(true);
        let data = write_with(&mut strings, options, |w| {
            record.write_dict(w);
            Ok(())
        });
        assert_eq!(
            ops(&data),
            [Op::DefaultWidthX, Op::NominalWidthX, Op::InitialRandomSeed]
        );
    }

    #[test]
    fn defaults_compare_at_single_precision() {
        let private = PrivateDict {
            blue_scale: 0.039625f32 as f64,
            ..Default::default()
        };
        let record = PrivateDictRecord {
            dict: &private,
            format: CharstringFormat::Type1,
            subrs: None,
        };
        let mut sink = PositionOnly::default();
        let strings = StringTable::default();
        let mut writer = CffWriter::frozen(&mut sink, &strings, CffOptions::default());
        record.write_dict(&mut writer);
        assert_eq!(writer.position(), 0);
    }

    #[test]
    fn single_precision_font_matrix_is_default() {
        let mut font = TestType1Font::default();
        let scale = 0.001f32 as f64;
        font.font_matrix = FontMatrix([scale, 0.0, 0.0, scale, 0.0, 0.0]);
        assert_ne!(font.font_matrix, FontMatrix::DEFAULT);
        assert!(font.font_matrix.is_default());
        let common = TopCommon::new(&font, FontBBox::default(), true);
        let top = SimpleFontTop {
            common: &common,
            charstring_type: 2,
            offsets: SimpleTopOffsets::default(),
        };
        let mut strings = StringTable::new(8);
        let data = write_with(&mut strings, CffOptions::default(), |w| top.write_dict(w));
        assert!(!ops(&data).contains(&Op::FontMatrix));

        font.font_matrix = FontMatrix([0.002, 0.0, 0.0, 0.002, 0.0, 0.0]);
        assert!(!font.font_matrix.is_default());
    }
}
