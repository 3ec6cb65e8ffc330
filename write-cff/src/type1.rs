//! Writing base fonts.

use std::io;

use font_types::GlyphId;

use crate::{
    charset::Charset,
    charstrings::{global_subrs, local_subrs, Treatment},
    dict::{
        PrivateDictRecord, PrivateRange, SimpleFontTop, SimpleTopOffsets, TopCommon, TopDict,
    },
    encoding::Encoding,
    error::{Error, Section, Undefined},
    font::{CharstringFormat, FontBBox, PrivateDict, Type1Font},
    index::{index_size, Index},
    layout::{
        check_offset, dict_size, write_font, write_top_dict_index, Header, Layout, HEADER_SIZE,
        WIDEST_OFFSET,
    },
    options::CffOptions,
    strings::StringTable,
    subset::GlyphSubset,
    write::{CffWrite, CffWriter, PositionOnly},
};

/// Room in the string table for strings other than glyph names.
pub(crate) const MAX_MISC_STRINGS: usize = 40;

/// What to write of a base font.
#[derive(Clone, Copy, Debug, Default)]
pub struct Type1Request<'a> {
    /// The glyphs to write; all glyphs if `None`.
    ///
    /// Must include `.notdef`.
    pub subset: Option<&'a [GlyphId]>,
    /// A name to use instead of the font's own name.
    pub font_name: Option<&'a [u8]>,
    /// The FontBBox to write; an empty box is omitted.
    pub font_bbox: FontBBox,
}

/// Writes a Type 1 (or Type 2) font as a CFF font.
pub fn write_type1_font<F, W>(
    font: &F,
    request: &Type1Request,
    options: &CffOptions,
    out: W,
) -> Result<(), Error>
where
    F: Type1Font + ?Sized,
    W: io::Write,
{
    let layout = Type1Layout::new(font, request, options)?;
    write_font(&layout, out)?;
    Ok(())
}

/// Writes a Type 1 (or Type 2) font as a CFF font and returns the bytes.
pub fn dump_type1_font<F: Type1Font + ?Sized>(
    font: &F,
    request: &Type1Request,
    options: &CffOptions,
) -> Result<Vec<u8>, Error> {
    let layout = Type1Layout::new(font, request, options)?;
    write_font(&layout, Vec::new())
}

/// A base font with every section prepared.
struct Type1Layout<'a> {
    options: CffOptions,
    font_name: &'a [u8],
    common: TopCommon,
    charstring_type: i32,
    strings: StringTable,
    gsubrs: Vec<Vec<u8>>,
    encoding: Encoding,
    charset: Charset,
    charstrings: Vec<Vec<u8>>,
    private: &'a PrivateDict,
    format: CharstringFormat,
    subrs: Option<Vec<Vec<u8>>>,
}

/// The offsets and sizes of a base font.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Type1Plan {
    top_size: u32,
    gsubrs: u32,
    encoding: u32,
    charset: u32,
    charstrings: u32,
    private: u32,
    private_size: u32,
    end: u32,
}

impl<'a> Type1Layout<'a> {
    fn new<F: Type1Font + ?Sized>(
        font: &'a F,
        request: &Type1Request<'a>,
        options: &CffOptions,
    ) -> Result<Self, Error> {
        let options = options.effective();
        let subset = GlyphSubset::new(font, request.subset)?;
        let format = font.charstring_format();
        let font_name = request.font_name.unwrap_or(font.font_name());
        log::debug!(
            "preparing {} with {} of {} glyphs",
            String::from_utf8_lossy(font_name),
            subset.len(),
            font.glyphs().len()
        );
        let common = TopCommon::new(font, request.font_bbox, true);
        let charstring_type =
            if options.use_type2_charstrings || format == CharstringFormat::Type2 {
                2
            } else {
                1
            };

        let mut strings = StringTable::new(subset.len() + MAX_MISC_STRINGS);
        {
            let mut sink = PositionOnly::default();
            let mut writer = CffWriter::interning(&mut sink, &mut strings, options);
            SimpleFontTop {
                common: &common,
                charstring_type,
                offsets: SimpleTopOffsets::default(),
            }
            .write_dict(&mut writer)?;
        }
        let sids = subset.glyphs()[1..]
            .iter()
            .map(|gid| {
                let name = font
                    .glyph_name(*gid)
                    .ok_or(Error::Undefined(Undefined::GlyphName(*gid)))?;
                strings.sid(&name)
            })
            .collect::<Result<Vec<_>, _>>()?;
        let charset = Charset::from_sids(sids);
        let encoding = Encoding::new(font, &subset, &mut strings)?;

        let treatment = Treatment::new(font, &options);
        let charstrings = subset
            .glyphs()
            .iter()
            .map(|gid| {
                let data = font
                    .glyph_data(*gid)
                    .ok_or(Error::Undefined(Undefined::GlyphData(*gid)))?;
                treatment.apply(font, &data, || glyph_label(font, *gid))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            options,
            font_name,
            common,
            charstring_type,
            strings,
            gsubrs: global_subrs(font, &options)?,
            encoding,
            charset,
            charstrings,
            private: font.private_dict(),
            format,
            subrs: local_subrs(font, &options)?,
        })
    }

    fn top_dict(&self, plan: &Type1Plan) -> SimpleFontTop<'_> {
        SimpleFontTop {
            common: &self.common,
            charstring_type: self.charstring_type,
            offsets: SimpleTopOffsets {
                encoding: plan.encoding,
                charset: plan.charset,
                charstrings: plan.charstrings,
                private: PrivateRange {
                    size: plan.private_size,
                    offset: plan.private,
                },
            },
        }
    }

    fn private_dict(&self, subrs_offset: u32) -> PrivateDictRecord<'_> {
        PrivateDictRecord {
            dict: self.private,
            format: self.format,
            subrs: self.subrs.as_ref().map(|_| subrs_offset),
        }
    }
}

impl Layout for Type1Layout<'_> {
    type Plan = Type1Plan;

    fn strings(&self) -> &StringTable {
        &self.strings
    }

    fn options(&self) -> CffOptions {
        self.options
    }

    fn initial_plan(&self) -> Result<Type1Plan, Error> {
        let widest = Type1Plan {
            top_size: WIDEST_OFFSET,
            gsubrs: WIDEST_OFFSET,
            encoding: WIDEST_OFFSET,
            charset: WIDEST_OFFSET,
            charstrings: WIDEST_OFFSET,
            private: WIDEST_OFFSET,
            private_size: WIDEST_OFFSET,
            end: WIDEST_OFFSET,
        };
        let top_size = dict_size(&self.strings, self.options, |writer| {
            self.top_dict(&widest).write_dict(writer)
        })?;
        let private_size = dict_size(&self.strings, self.options, |writer| {
            self.private_dict(WIDEST_OFFSET).write_dict(writer);
            Ok(())
        })?;
        let gsubrs = HEADER_SIZE
            + index_size(1, self.font_name.len() as u32)
            + index_size(1, top_size)
            + index_size(self.strings.len(), self.strings.total_len());
        let encoding = gsubrs + Index::from_vecs(&self.gsubrs).size();
        let charset = encoding + self.encoding.size();
        let charstrings = charset + self.charset.size();
        let private = charstrings + Index::from_vecs(&self.charstrings).size();
        let subrs_size = self
            .subrs
            .as_ref()
            .map(|subrs| Index::from_vecs(subrs).size())
            .unwrap_or_default();
        Ok(Type1Plan {
            top_size,
            gsubrs,
            encoding,
            charset,
            charstrings,
            private,
            private_size,
            end: private + private_size + subrs_size,
        })
    }

    fn write_pass(&self, plan: &Type1Plan, writer: &mut CffWriter) -> Result<Type1Plan, Error> {
        Header { end: plan.end }.write_into(writer);
        Index::new([self.font_name]).write_into(writer);
        let top_size = write_top_dict_index(writer, &self.top_dict(plan), plan.top_size)?;
        Index::new(self.strings.iter()).write_into(writer);
        writer.check_io()?;

        let gsubrs = check_offset(Section::GlobalSubrs, plan.gsubrs, writer.position())?;
        Index::from_vecs(&self.gsubrs).write_into(writer);
        let encoding = check_offset(Section::Encoding, plan.encoding, writer.position())?;
        self.encoding.write_into(writer);
        let charset = check_offset(Section::Charset, plan.charset, writer.position())?;
        self.charset.write_into(writer);
        let charstrings = check_offset(Section::CharStrings, plan.charstrings, writer.position())?;
        Index::from_vecs(&self.charstrings).write_into(writer);
        writer.check_io()?;

        let private = check_offset(Section::Private(0), plan.private, writer.position())?;
        // the Subrs immediately follow the Private DICT
        self.private_dict(plan.private_size).write_dict(writer);
        let private_size = check_offset(
            Section::Subrs(0),
            plan.private_size,
            writer.position() - private,
        )?;
        if let Some(subrs) = &self.subrs {
            Index::from_vecs(subrs).write_into(writer);
        }
        let end = check_offset(Section::End, plan.end, writer.position())?;
        writer.check_io()?;
        Ok(Type1Plan {
            top_size,
            gsubrs,
            encoding,
            charset,
            charstrings,
            private,
            private_size,
            end,
        })
    }
}

fn glyph_label<F: Type1Font + ?Sized>(font: &F, gid: GlyphId) -> String {
    match font.glyph_name(gid) {
        Some(name) => String::from_utf8_lossy(&name).into_owned(),
        None => gid.to_string(),
    }
}
