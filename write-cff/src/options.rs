//! Configuration for the CFF writer.

/// Options controlling how a font is written.
///
/// The default writes the charstrings in their native format, keeps any
/// `lenIV` encryption, writes the global Subrs and omits XUID.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CffOptions {
    /// Convert Type 1 charstrings to Type 2.
    ///
    /// This implies `suppress_leniv`. Fonts whose charstrings are already
    /// Type 2 are unaffected.
    pub use_type2_charstrings: bool,
    /// Strip `lenIV` encryption from charstrings and omit `lenIV` from the
    /// Private DICT.
    pub suppress_leniv: bool,
    /// Write an empty global Subrs INDEX.
    pub omit_global_subrs: bool,
    /// Write the font's XUID, truncated to 16 entries.
    ///
    /// Acrobat (and the PLRM) cannot handle longer XUIDs. Without this
    /// option the XUID is dropped entirely.
    pub cap_xuid: bool,
    /// Avoid operators that Acrobat Reader 3 rejects.
    ///
    /// This drops Copyright, isFixedPitch, ItalicAngle, UnderlinePosition,
    /// UnderlineThickness and PaintType from the Top DICT.
    pub ar3_compat: bool,
}

impl CffOptions {
    pub fn with_type2_charstrings(mut self, flag: bool) -> Self {
        self.use_type2_charstrings = flag;
        self
    }

    pub fn with_suppress_leniv(mut self, flag: bool) -> Self {
        self.suppress_leniv = flag;
        self
    }

    pub fn with_omit_global_subrs(mut self, flag: bool) -> Self {
        self.omit_global_subrs = flag;
        self
    }

    pub fn with_cap_xuid(mut self, flag: bool) -> Self {
        self.cap_xuid = flag;
        self
    }

    pub fn with_ar3_compat(mut self, flag: bool) -> Self {
        self.ar3_compat = flag;
        self
    }

    /// The options actually in effect for a write.
    ///
    /// Writing Type 2 charstrings never keeps their encryption.
    pub(crate) fn effective(&self) -> Self {
        let mut result = *self;
        if result.use_type2_charstrings {
            result.suppress_leniv = true;
        }
        result
    }
}
