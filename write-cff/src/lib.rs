//! Writing [Compact Font Format][cff] font programs.
//!
//! This crate serializes an already parsed outline font into a CFF
//! `FontSet` holding a single font. Two kinds of input are supported:
//!
//! * base fonts with Type 1 or Type 2 charstrings, via [`write_type1_font`]
//! * CIDFontType 0 fonts, via [`write_cid_font`]
//!
//! The font is accessed through the traits in the [`font`] module; callers
//! implement them for their own font representation. A subset of the glyphs
//! may be requested, and [`CffOptions`] control charstring conversion,
//! `lenIV` handling and compatibility tweaks.
//!
//! ```rust,ignore
//! use write_cff::{dump_type1_font, CffOptions, Type1Request};
//!
//! let options = CffOptions::default().with_type2_charstrings(true);
//! let bytes = dump_type1_font(&font, &Type1Request::default(), &options)?;
//! ```
//!
//! Offsets in a CFF font are encoded with a variable number of bytes, so
//! fonts are laid out by writing them repeatedly to a counting sink until
//! the offsets stop changing; only the final pass touches the output.
//!
//! [cff]: https://adobe-type-tools.github.io/font-tech-notes/pdfs/5176.CFF.pdf

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

mod charset;
mod charstrings;
mod cid;
mod dict;
mod encoding;
mod error;
mod fd_select;
pub mod font;
pub mod index;
mod layout;
pub mod number;
mod options;
pub mod strings;
mod subset;
mod type1;
mod write;

#[cfg(test)]
mod test_helpers;

pub use charstrings::decrypt_charstring;
pub use cid::{dump_cid_font, write_cid_font, CidRequest};
pub use error::{Error, InvalidFontReason, Section, Undefined};
pub use font::{
    CharstringFormat, Cid, CidFont, CidSystemInfo, FontBBox, FontDescriptor, FontInfo,
    FontMatrix, OutlineFont, PrivateDict, SubrKind, Type1Font, Uid,
};
pub use options::CffOptions;
pub use type1::{dump_type1_font, write_type1_font, Type1Request};

pub extern crate font_types as types;
