//! Errors that occur during writing

use font_types::GlyphId;
use thiserror::Error;

/// An error occured while writing a CFF font.
#[derive(Debug, Error)]
pub enum Error {
    /// The output sink reported a failure.
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),

    /// A section ended up further into the font than the layout assumed.
    ///
    /// Layout passes only ever shrink offsets, so this indicates an
    /// internal inconsistency rather than bad input.
    #[error("{section} offset {measured} exceeds assumed offset {assumed}")]
    RangeCheck {
        section: Section,
        assumed: u32,
        measured: u32,
    },

    /// The font cannot be represented in CFF.
    #[error("invalid font: {0}")]
    InvalidFont(InvalidFontReason),

    /// A glyph or string needed for the output could not be resolved.
    #[error("undefined: {0}")]
    Undefined(Undefined),

    /// The string table is full.
    #[error("string table capacity of {0} exceeded")]
    LimitCheck(usize),

    /// The Type 1 to Type 2 charstring converter failed.
    #[error("charstring conversion failed for {glyph}: {message}")]
    Transcode { glyph: String, message: String },
}

/// The reason a font was rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvalidFontReason {
    #[error("the glyph subset does not include .notdef")]
    MissingNotdef,
    #[error("{0} font dicts (at most 256 are allowed)")]
    TooManyFontDicts(usize),
    #[error("CID {cid} refers to font dict {index}, but there are only {count}")]
    FontDictOutOfRange { cid: u16, index: usize, count: usize },
    #[error("{0} glyphs do not fit in a CFF INDEX")]
    TooManyGlyphs(usize),
    #[error("{0} subroutines do not fit in a CFF INDEX")]
    TooManySubrs(usize),
    #[error("the font has no font dicts")]
    NoFontDicts,
}

/// Something that was referenced but could not be found.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Undefined {
    #[error("glyph {0} has no name")]
    GlyphName(GlyphId),
    #[error("glyph {0} has no charstring")]
    GlyphData(GlyphId),
    #[error("CID {0} has no charstring")]
    CidData(u16),
    #[error("string {0:?} was not entered in the string table")]
    String(String),
}

/// The named sections of a CFF font, for error reporting and logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    GlobalSubrs,
    Encoding,
    Charset,
    FdSelect,
    CharStrings,
    FdArray,
    FontDict(usize),
    Private(usize),
    Subrs(usize),
    End,
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Section::GlobalSubrs => f.write_str("GSubrs"),
            Section::Encoding => f.write_str("Encoding"),
            Section::Charset => f.write_str("charset"),
            Section::FdSelect => f.write_str("FDSelect"),
            Section::CharStrings => f.write_str("CharStrings"),
            Section::FdArray => f.write_str("FDArray"),
            Section::FontDict(i) => write!(f, "FDArray[{i}]"),
            Section::Private(i) => write!(f, "Private[{i}]"),
            Section::Subrs(i) => write!(f, "Subrs[{i}]"),
            Section::End => f.write_str("End"),
        }
    }
}
