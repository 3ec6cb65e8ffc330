//! Preparing charstrings and subroutines for output.

use crate::{
    error::{Error, InvalidFontReason},
    font::{CharstringFormat, OutlineFont, SubrKind},
    index::MAX_INDEX_COUNT,
    options::CffOptions,
};

/// The initial key of charstring encryption.
const CHARSTRING_KEY: u16 = 4330;
const C1: u16 = 52845;
const C2: u16 = 22719;

/// Decrypts a Type 1 charstring.
///
/// The result still starts with the `lenIV` random bytes.
pub fn decrypt_charstring(data: &[u8]) -> Vec<u8> {
    let mut r = CHARSTRING_KEY;
    data.iter()
        .map(|&cipher| {
            let plain = cipher ^ (r >> 8) as u8;
            r = (cipher as u16)
                .wrapping_add(r)
                .wrapping_mul(C1)
                .wrapping_add(C2);
            plain
        })
        .collect()
}

/// Returns `true` if the font's charstrings are converted to Type 2.
pub(crate) fn converts<F: OutlineFont + ?Sized>(font: &F, options: &CffOptions) -> bool {
    options.use_type2_charstrings && font.charstring_format() == CharstringFormat::Type1
}

/// How the charstrings of one font are transformed on output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Treatment {
    Verbatim,
    Decrypt { len_iv: usize },
    /// `len_iv` is `None` for unencrypted charstrings.
    Convert { len_iv: Option<usize> },
}

impl Treatment {
    pub(crate) fn new<F: OutlineFont + ?Sized>(font: &F, options: &CffOptions) -> Self {
        let len_iv = font.private_dict().len_iv;
        if converts(font, options) {
            Treatment::Convert {
                len_iv: usize::try_from(len_iv).ok(),
            }
        } else if len_iv < 0 || !options.suppress_leniv {
            Treatment::Verbatim
        } else {
            Treatment::Decrypt {
                len_iv: len_iv as usize,
            }
        }
    }

    /// Applies this treatment to one charstring.
    ///
    /// `label` names the glyph in conversion errors.
    pub(crate) fn apply<F: OutlineFont + ?Sized>(
        self,
        font: &F,
        data: &[u8],
        label: impl FnOnce() -> String,
    ) -> Result<Vec<u8>, Error> {
        match self {
            Treatment::Verbatim => Ok(data.to_vec()),
            Treatment::Decrypt { len_iv } => Ok(strip_len_iv(font, data, len_iv)),
            Treatment::Convert { len_iv } => {
                let plain = match len_iv {
                    Some(len_iv) => strip_len_iv(font, data, len_iv),
                    None => data.to_vec(),
                };
                if plain.is_empty() {
                    return Ok(plain);
                }
                font.convert_to_type2(&plain)
                    .map_err(|e| Error::Transcode {
                        glyph: label(),
                        message: e.to_string(),
                    })
            }
        }
    }
}

fn strip_len_iv<F: OutlineFont + ?Sized>(font: &F, data: &[u8], len_iv: usize) -> Vec<u8> {
    if data.len() < len_iv {
        return Vec::new();
    }
    let mut plain = font.decrypt(data);
    plain.drain(..len_iv.min(plain.len()));
    plain
}

/// Returns the subroutines of a font, ready to be written.
///
/// Undefined slots become empty objects.
pub(crate) fn prepare_subrs<F: OutlineFont + ?Sized>(
    font: &F,
    kind: SubrKind,
    options: &CffOptions,
) -> Result<Vec<Vec<u8>>, Error> {
    let count = font.subr_count(kind);
    if count > MAX_INDEX_COUNT {
        return Err(Error::InvalidFont(InvalidFontReason::TooManySubrs(count)));
    }
    let treatment = Treatment::new(font, options);
    Ok((0..count)
        .map(|ix| match font.subr_data(ix, kind) {
            // subroutines are never converted; fonts that convert skip them
            Some(data) => match treatment {
                Treatment::Decrypt { len_iv } => strip_len_iv(font, &data, len_iv),
                _ => data.into_owned(),
            },
            None => Vec::new(),
        })
        .collect())
}

/// The global Subrs to write for a font.
pub(crate) fn global_subrs<F: OutlineFont + ?Sized>(
    font: &F,
    options: &CffOptions,
) -> Result<Vec<Vec<u8>>, Error> {
    if options.omit_global_subrs || converts(font, options) {
        Ok(Vec::new())
    } else {
        prepare_subrs(font, SubrKind::Global, options)
    }
}

/// The local Subrs to write for a font, if any.
pub(crate) fn local_subrs<F: OutlineFont + ?Sized>(
    font: &F,
    options: &CffOptions,
) -> Result<Option<Vec<Vec<u8>>>, Error> {
    if converts(font, options) {
        return Ok(None);
    }
    let subrs = prepare_subrs(font, SubrKind::Local, options)?;
    Ok(subrs.iter().any(|subr| !subr.is_empty()).then_some(subrs))
}
