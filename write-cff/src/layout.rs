//! Converging on the offsets of a font.
//!
//! The Top DICT references sections that follow it, and the size of the Top
//! DICT depends on the values of those references (operands use a variable
//! length encoding). The same holds for Private DICTs and their Subrs.
//!
//! Layout therefore starts from a plan in which every offset and size is an
//! upper bound, and repeatedly writes the font to a counting sink using the
//! assumed plan while measuring the actual one. Since encoded sizes grow
//! monotonically with the values encoded, no offset can grow from one pass
//! to the next; once a pass measures exactly what it assumed, the plan is
//! written for real.

use std::{fmt::Debug, io};

use crate::{
    dict::TopDict,
    error::{Error, Section},
    index::IndexHeader,
    options::CffOptions,
    strings::StringTable,
    write::{CffWrite, CffWriter, PositionOnly, StreamSink},
};

/// An offset value whose operand encoding is as long as any can be.
pub(crate) const WIDEST_OFFSET: u32 = i32::MAX as u32;

/// Size of the header.
pub(crate) const HEADER_SIZE: u32 = 4;

/// The absolute offset size above which the header announces 3 bytes.
const SHORT_FONT_LIMIT: u32 = 0x7fff;

/// The CFF header.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Header {
    /// The offset of the end of the font.
    pub end: u32,
}

impl CffWrite for Header {
    fn write_into(&self, writer: &mut CffWriter) {
        let off_size: u8 = if self.end > SHORT_FONT_LIMIT { 3 } else { 2 };
        writer.write_slice(&[1, 0, HEADER_SIZE as u8, off_size]);
    }
}

/// A font prepared for output.
pub(crate) trait Layout {
    /// The offsets and sizes that determine the encoded font.
    type Plan: Clone + PartialEq + Debug;

    fn strings(&self) -> &StringTable;

    fn options(&self) -> CffOptions;

    /// Returns a plan in which no offset or size is smaller than it will
    /// turn out to be.
    fn initial_plan(&self) -> Result<Self::Plan, Error>;

    /// Writes the font according to `plan` and returns the plan actually
    /// measured while doing so.
    fn write_pass(&self, plan: &Self::Plan, writer: &mut CffWriter) -> Result<Self::Plan, Error>;
}

/// Lays out a font and writes it to `out`.
pub(crate) fn write_font<L: Layout, W: io::Write>(layout: &L, out: W) -> Result<W, Error> {
    let plan = converge(layout.initial_plan()?, |assumed| {
        let mut sink = PositionOnly::default();
        let mut writer = CffWriter::frozen(&mut sink, layout.strings(), layout.options());
        layout.write_pass(assumed, &mut writer)
    })?;
    let mut sink = StreamSink::new(out);
    let mut writer = CffWriter::frozen(&mut sink, layout.strings(), layout.options());
    let written = layout.write_pass(&plan, &mut writer)?;
    writer.check_io()?;
    debug_assert_eq!(written, plan);
    sink.finish()
}

/// Measures passes until a plan reproduces itself.
pub(crate) fn converge<P, F>(initial: P, mut measure: F) -> Result<P, Error>
where
    P: Clone + PartialEq + Debug,
    F: FnMut(&P) -> Result<P, Error>,
{
    let mut assumed = initial;
    let mut pass = 0;
    loop {
        pass += 1;
        let measured = measure(&assumed)?;
        log::debug!("layout pass {pass}: {measured:?}");
        if measured == assumed {
            return Ok(measured);
        }
        assumed = measured;
    }
}

/// Compares the offset a section was actually written at with the offset
/// that was assumed for it.
pub(crate) fn check_offset(section: Section, assumed: u32, measured: u32) -> Result<u32, Error> {
    log::trace!("{section}: {assumed} => {measured}");
    if measured > assumed {
        return Err(Error::RangeCheck {
            section,
            assumed,
            measured,
        });
    }
    Ok(measured)
}

/// Writes an INDEX holding a single Top DICT whose size is assumed to be
/// `assumed_size`, and returns its actual size.
pub(crate) fn write_top_dict_index(
    writer: &mut CffWriter,
    top: &dyn TopDict,
    assumed_size: u32,
) -> Result<u32, Error> {
    let header = IndexHeader {
        count: 1,
        total: assumed_size,
    };
    header.write_into(writer);
    writer.write_offset(assumed_size + 1, header.off_size());
    let start = writer.position();
    top.write_dict(writer)?;
    Ok(writer.position() - start)
}

/// Measures the size of a DICT.
pub(crate) fn dict_size(
    strings: &StringTable,
    options: CffOptions,
    write: impl FnOnce(&mut CffWriter) -> Result<(), Error>,
) -> Result<u32, Error> {
    let mut sink = PositionOnly::default();
    let mut writer = CffWriter::frozen(&mut sink, strings, options);
    write(&mut writer)?;
    Ok(writer.position())
}
