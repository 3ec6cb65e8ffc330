//! Writing CIDFontType 0 fonts.

use std::io;

use crate::{
    charset::Charset,
    charstrings::{global_subrs, local_subrs, Treatment},
    dict::{
        CidFontTop, CidTopOffsets, FontDictTop, PrivateDictRecord, PrivateRange, TopCommon,
        TopDict,
    },
    error::{Error, InvalidFontReason, Section, Undefined},
    fd_select::FdSelect,
    font::{CharstringFormat, Cid, CidFont, CidSystemInfo, FontBBox, OutlineFont, PrivateDict},
    index::{index_size, Index, IndexHeader, MAX_INDEX_COUNT},
    layout::{
        check_offset, dict_size, write_font, write_top_dict_index, Header, Layout, HEADER_SIZE,
        WIDEST_OFFSET,
    },
    options::CffOptions,
    strings::StringTable,
    type1::MAX_MISC_STRINGS,
    write::{CffWrite, CffWriter, PositionOnly},
};

/// FDSelect stores font dict indices in a single byte.
const MAX_FONT_DICTS: usize = 256;

/// Room in the string table for the strings of each font dict.
const STRINGS_PER_FONT_DICT: usize = 5;

/// What to write of a CIDFont.
#[derive(Clone, Copy, Debug, Default)]
pub struct CidRequest<'a> {
    /// The CIDs to write; all CIDs with a glyph if `None`.
    ///
    /// Must include CID 0.
    pub subset: Option<&'a [Cid]>,
    /// A name to use instead of the font's own name.
    pub font_name: Option<&'a [u8]>,
}

/// Writes a CIDFontType 0 font as a CID-keyed CFF font.
pub fn write_cid_font<F, W>(
    font: &F,
    request: &CidRequest,
    options: &CffOptions,
    out: W,
) -> Result<(), Error>
where
    F: CidFont + ?Sized,
    W: io::Write,
{
    let layout = CidLayout::new(font, request, options)?;
    write_font(&layout, out)?;
    Ok(())
}

/// Writes a CIDFontType 0 font as a CID-keyed CFF font and returns the
/// bytes.
pub fn dump_cid_font<F: CidFont + ?Sized>(
    font: &F,
    request: &CidRequest,
    options: &CffOptions,
) -> Result<Vec<u8>, Error> {
    let layout = CidLayout::new(font, request, options)?;
    write_font(&layout, Vec::new())
}

/// One entry of the FDArray, prepared.
struct FontDictLayout<'a> {
    common: TopCommon,
    font_name: &'a [u8],
    private: &'a PrivateDict,
    format: CharstringFormat,
    subrs: Option<Vec<Vec<u8>>>,
}

impl FontDictLayout<'_> {
    fn top_dict(&self, private: PrivateRange) -> FontDictTop<'_> {
        FontDictTop {
            common: &self.common,
            font_name: self.font_name,
            private,
        }
    }

    fn private_dict(&self, subrs_offset: u32) -> PrivateDictRecord<'_> {
        PrivateDictRecord {
            dict: self.private,
            format: self.format,
            subrs: self.subrs.as_ref().map(|_| subrs_offset),
        }
    }

    fn subrs_size(&self) -> u32 {
        self.subrs
            .as_ref()
            .map(|subrs| Index::from_vecs(subrs).size())
            .unwrap_or_default()
    }
}

/// A CIDFont with every section prepared.
struct CidLayout<'a> {
    options: CffOptions,
    font_name: &'a [u8],
    common: TopCommon,
    ros: &'a CidSystemInfo,
    cid_count: u32,
    strings: StringTable,
    gsubrs: Vec<Vec<u8>>,
    charset: Charset,
    fd_select: FdSelect,
    charstrings: Vec<Vec<u8>>,
    font_dicts: Vec<FontDictLayout<'a>>,
}

/// The offsets and sizes of a CIDFont.
///
/// The font dict, Private DICT and Subrs arrays have one entry per font
/// dict plus one for the end of the last. Subrs offsets are relative to
/// the Private DICT of the same font dict.
#[derive(Clone, Debug, PartialEq, Eq)]
struct CidPlan {
    top_size: u32,
    gsubrs: u32,
    charset: u32,
    fd_select: u32,
    charstrings: u32,
    fd_array: u32,
    font_dicts: Vec<u32>,
    privates: Vec<u32>,
    subrs: Vec<u32>,
    end: u32,
}

impl<'a> CidLayout<'a> {
    fn new<F: CidFont + ?Sized>(
        font: &'a F,
        request: &CidRequest<'a>,
        options: &CffOptions,
    ) -> Result<Self, Error> {
        let options = options.effective();
        let num_fds = font.font_dict_count();
        if num_fds == 0 {
            return Err(Error::InvalidFont(InvalidFontReason::NoFontDicts));
        }
        if num_fds > MAX_FONT_DICTS {
            return Err(Error::InvalidFont(InvalidFontReason::TooManyFontDicts(
                num_fds,
            )));
        }

        let mut cids = match request.subset {
            Some(cids) => cids.to_vec(),
            None => font.cids(),
        };
        cids.sort_unstable();
        cids.dedup();
        if cids.first() != Some(&0) {
            return Err(Error::InvalidFont(InvalidFontReason::MissingNotdef));
        }
        if cids.len() > MAX_INDEX_COUNT {
            return Err(Error::InvalidFont(InvalidFontReason::TooManyGlyphs(
                cids.len(),
            )));
        }

        let font_name = match request.font_name.unwrap_or(font.font_name()) {
            [] => font.key_name(),
            name => name,
        };
        log::debug!(
            "preparing CIDFont {} with {} glyphs and {num_fds} font dicts",
            String::from_utf8_lossy(font_name),
            cids.len()
        );

        let fd_fonts: Vec<&dyn OutlineFont> =
            (0..num_fds).map(|ix| font.font_dict(ix)).collect();
        let treatments: Vec<Treatment> = fd_fonts
            .iter()
            .map(|fd| Treatment::new(*fd, &options))
            .collect();
        let mut fds = Vec::with_capacity(cids.len());
        let mut charstrings = Vec::with_capacity(cids.len());
        for cid in &cids {
            let (data, fd) = font
                .glyph_data(*cid)
                .ok_or(Error::Undefined(Undefined::CidData(*cid)))?;
            if fd >= num_fds {
                return Err(Error::InvalidFont(InvalidFontReason::FontDictOutOfRange {
                    cid: *cid,
                    index: fd,
                    count: num_fds,
                }));
            }
            charstrings.push(treatments[fd].apply(fd_fonts[fd], &data, || {
                format!("CID {cid}")
            })?);
            fds.push(fd as u8);
        }

        let common = TopCommon::new(font, FontBBox::default(), true);
        let ros = font.cid_system_info();
        let cid_count = font.cid_count();
        let font_dicts: Vec<_> = fd_fonts
            .iter()
            .map(|fd| {
                Ok(FontDictLayout {
                    common: TopCommon::new(*fd, FontBBox::default(), false),
                    font_name: font_dict_name(*fd),
                    private: fd.private_dict(),
                    format: fd.charstring_format(),
                    subrs: local_subrs(*fd, &options)?,
                })
            })
            .collect::<Result<_, Error>>()?;

        let mut strings = StringTable::new(MAX_MISC_STRINGS + STRINGS_PER_FONT_DICT * num_fds);
        {
            let mut sink = PositionOnly::default();
            let mut writer = CffWriter::interning(&mut sink, &mut strings, options);
            CidFontTop {
                common: &common,
                ros,
                cid_count,
                offsets: CidTopOffsets::default(),
            }
            .write_dict(&mut writer)?;
            for fd in &font_dicts {
                fd.top_dict(PrivateRange::default())
                    .write_dict(&mut writer)?;
            }
        }

        Ok(Self {
            options,
            font_name,
            common,
            ros,
            cid_count,
            strings,
            // the global Subrs are taken from the first font dict
            gsubrs: global_subrs(fd_fonts[0], &options)?,
            charset: Charset::from_cids(&cids),
            fd_select: FdSelect::new(&fds),
            charstrings,
            font_dicts,
        })
    }

    fn top_dict(&self, offsets: CidTopOffsets) -> CidFontTop<'_> {
        CidFontTop {
            common: &self.common,
            ros: self.ros,
            cid_count: self.cid_count,
            offsets,
        }
    }
}

fn font_dict_name(fd: &dyn OutlineFont) -> &[u8] {
    match fd.font_name() {
        [] => fd.key_name(),
        name => name,
    }
}

impl Layout for CidLayout<'_> {
    type Plan = CidPlan;

    fn strings(&self) -> &StringTable {
        &self.strings
    }

    fn options(&self) -> CffOptions {
        self.options
    }

    fn initial_plan(&self) -> Result<CidPlan, Error> {
        let widest = CidTopOffsets {
            charset: WIDEST_OFFSET,
            charstrings: WIDEST_OFFSET,
            fd_select: WIDEST_OFFSET,
            fd_array: WIDEST_OFFSET,
        };
        let top_size = dict_size(&self.strings, self.options, |writer| {
            self.top_dict(widest).write_dict(writer)
        })?;
        let gsubrs = HEADER_SIZE
            + index_size(1, self.font_name.len() as u32)
            + index_size(1, top_size)
            + index_size(self.strings.len(), self.strings.total_len());
        let charset = gsubrs + Index::from_vecs(&self.gsubrs).size();
        let fd_select = charset + self.charset.size();
        let charstrings = fd_select + self.fd_select.size();
        let fd_array = charstrings + Index::from_vecs(&self.charstrings).size();

        let widest_private = PrivateRange {
            size: WIDEST_OFFSET,
            offset: WIDEST_OFFSET,
        };
        let fd_sizes = self
            .font_dicts
            .iter()
            .map(|fd| {
                dict_size(&self.strings, self.options, |writer| {
                    fd.top_dict(widest_private).write_dict(writer)
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let fd_total: u32 = fd_sizes.iter().sum();
        let mut font_dicts = Vec::with_capacity(fd_sizes.len() + 1);
        let mut pos = fd_array + index_size(fd_sizes.len(), fd_total) - fd_total;
        font_dicts.push(pos);
        for size in fd_sizes {
            pos += size;
            font_dicts.push(pos);
        }

        let mut privates = vec![pos];
        for fd in &self.font_dicts {
            pos += dict_size(&self.strings, self.options, |writer| {
                fd.private_dict(WIDEST_OFFSET).write_dict(writer);
                Ok(())
            })?;
            privates.push(pos);
        }

        let mut subrs = Vec::with_capacity(privates.len());
        let mut subrs_total = 0;
        for (j, private) in privates.iter().enumerate() {
            subrs.push(pos - private + subrs_total);
            if let Some(fd) = self.font_dicts.get(j) {
                subrs_total += fd.subrs_size();
            }
        }

        Ok(CidPlan {
            top_size,
            gsubrs,
            charset,
            fd_select,
            charstrings,
            fd_array,
            font_dicts,
            privates,
            subrs,
            end: pos + subrs_total,
        })
    }

    fn write_pass(&self, plan: &CidPlan, writer: &mut CffWriter) -> Result<CidPlan, Error> {
        Header { end: plan.end }.write_into(writer);
        Index::new([self.font_name]).write_into(writer);
        let top = self.top_dict(CidTopOffsets {
            charset: plan.charset,
            charstrings: plan.charstrings,
            fd_select: plan.fd_select,
            fd_array: plan.fd_array,
        });
        let top_size = write_top_dict_index(writer, &top, plan.top_size)?;
        Index::new(self.strings.iter()).write_into(writer);
        writer.check_io()?;

        let gsubrs = check_offset(Section::GlobalSubrs, plan.gsubrs, writer.position())?;
        Index::from_vecs(&self.gsubrs).write_into(writer);
        let charset = check_offset(Section::Charset, plan.charset, writer.position())?;
        self.charset.write_into(writer);
        let fd_select = check_offset(Section::FdSelect, plan.fd_select, writer.position())?;
        self.fd_select.write_into(writer);
        let charstrings = check_offset(Section::CharStrings, plan.charstrings, writer.position())?;
        Index::from_vecs(&self.charstrings).write_into(writer);
        writer.check_io()?;

        // the FDArray INDEX, with offsets taken from the plan
        let fd_array = check_offset(Section::FdArray, plan.fd_array, writer.position())?;
        let first = plan.font_dicts[0];
        let header = IndexHeader {
            count: self.font_dicts.len() as u16,
            total: plan.font_dicts[self.font_dicts.len()] - first,
        };
        header.write_into(writer);
        for end in &plan.font_dicts[1..] {
            writer.write_offset(end - first + 1, header.off_size());
        }
        let mut font_dicts = Vec::with_capacity(plan.font_dicts.len());
        font_dicts.push(check_offset(
            Section::FontDict(0),
            first,
            writer.position(),
        )?);
        for (j, fd) in self.font_dicts.iter().enumerate() {
            let private = PrivateRange {
                size: plan.privates[j + 1] - plan.privates[j],
                offset: plan.privates[j],
            };
            fd.top_dict(private).write_dict(writer)?;
            font_dicts.push(check_offset(
                Section::FontDict(j + 1),
                plan.font_dicts[j + 1],
                writer.position(),
            )?);
        }
        writer.check_io()?;

        let mut privates = Vec::with_capacity(plan.privates.len());
        for (j, assumed) in plan.privates.iter().enumerate() {
            privates.push(check_offset(
                Section::Private(j),
                *assumed,
                writer.position(),
            )?);
            if let Some(fd) = self.font_dicts.get(j) {
                fd.private_dict(plan.subrs[j]).write_dict(writer);
            }
        }
        writer.check_io()?;

        let mut subrs = Vec::with_capacity(plan.subrs.len());
        for (j, assumed) in plan.subrs.iter().enumerate() {
            let relative = writer.position() - privates[j];
            subrs.push(check_offset(Section::Subrs(j), *assumed, relative)?);
            if let Some(local) = self.font_dicts.get(j).and_then(|fd| fd.subrs.as_ref()) {
                Index::from_vecs(local).write_into(writer);
            }
        }
        let end = check_offset(Section::End, plan.end, writer.position())?;
        writer.check_io()?;

        Ok(CidPlan {
            top_size,
            gsubrs,
            charset,
            fd_select,
            charstrings,
            fd_array,
            font_dicts,
            privates,
            subrs,
            end,
        })
    }
}
