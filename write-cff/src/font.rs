//! The font model consumed by the writer.
//!
//! Fonts are not owned by this crate. A caller wraps its own representation
//! of a parsed Type 1 font (or CIDFontType 0 font) in implementations of the
//! traits below; plain data records carry the font-wide parameters.

use std::borrow::Cow;

use font_types::GlyphId;

/// A CID, as stored in a CID-keyed charset.
pub type Cid = u16;

/// The CIDCount assumed when the Top DICT omits it.
pub const DEFAULT_CID_COUNT: u32 = 8720;

/// The charstring format a font stores natively.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CharstringFormat {
    /// Type 1 charstrings (FontType 1).
    #[default]
    Type1,
    /// Type 2 charstrings (FontType 2).
    Type2,
}

/// Selects the global or the local (Private DICT) subroutines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SubrKind {
    Global,
    Local,
}

/// A font's unique identifier.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Uid {
    #[default]
    None,
    UniqueId(i32),
    Xuid(Vec<i32>),
}

/// Optional descriptive entries of a font.
#[derive(Clone, Debug, PartialEq)]
pub struct FontInfo {
    pub notice: Option<Vec<u8>>,
    pub full_name: Option<Vec<u8>>,
    pub family_name: Option<Vec<u8>>,
    pub copyright: Option<Vec<u8>>,
    pub is_fixed_pitch: bool,
    pub italic_angle: f64,
    pub underline_position: i32,
    pub underline_thickness: i32,
}

impl FontInfo {
    pub const DEFAULT_ITALIC_ANGLE: f64 = 0.0;
    pub const DEFAULT_UNDERLINE_POSITION: i32 = -100;
    pub const DEFAULT_UNDERLINE_THICKNESS: i32 = 50;

    /// Returns only the string entries, with everything else at its default.
    ///
    /// Font dicts of a CIDFont only carry these.
    pub(crate) fn strings_only(&self) -> Self {
        Self {
            notice: self.notice.clone(),
            full_name: self.full_name.clone(),
            family_name: self.family_name.clone(),
            copyright: self.copyright.clone(),
            ..Default::default()
        }
    }
}

impl Default for FontInfo {
    fn default() -> Self {
        Self {
            notice: None,
            full_name: None,
            family_name: None,
            copyright: None,
            is_fixed_pitch: false,
            italic_angle: Self::DEFAULT_ITALIC_ANGLE,
            underline_position: Self::DEFAULT_UNDERLINE_POSITION,
            underline_thickness: Self::DEFAULT_UNDERLINE_THICKNESS,
        }
    }
}

/// A PostScript font matrix, `[xx xy yx yy tx ty]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontMatrix(pub [f64; 6]);

impl FontMatrix {
    /// The matrix assumed when the Top DICT omits FontMatrix.
    pub const DEFAULT: FontMatrix = FontMatrix([0.001, 0.0, 0.0, 0.001, 0.0, 0.0]);

    /// Compares at single precision, the precision the matrix is stored with.
    pub fn is_default(&self) -> bool {
        self.0
            .iter()
            .zip(Self::DEFAULT.0)
            .all(|(value, default)| *value as f32 == default as f32)
    }
}

impl Default for FontMatrix {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(feature = "kurbo")]
impl From<kurbo::Affine> for FontMatrix {
    fn from(value: kurbo::Affine) -> Self {
        FontMatrix(value.as_coeffs())
    }
}

/// An integer font bounding box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FontBBox {
    pub x_min: i32,
    pub y_min: i32,
    pub x_max: i32,
    pub y_max: i32,
}

impl FontBBox {
    pub fn new(x_min: i32, y_min: i32, x_max: i32, y_max: i32) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// An all-zero box is equivalent to an omitted one.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(feature = "kurbo")]
impl From<kurbo::Rect> for FontBBox {
    fn from(value: kurbo::Rect) -> Self {
        let rect = value.abs().expand();
        FontBBox::new(
            rect.x0 as i32,
            rect.y0 as i32,
            rect.x1 as i32,
            rect.y1 as i32,
        )
    }
}

/// The Registry, Ordering and Supplement of a CIDFont.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CidSystemInfo {
    pub registry: Vec<u8>,
    pub ordering: Vec<u8>,
    pub supplement: i32,
}

/// Hinting and charstring parameters of a Private dictionary.
///
/// Array entries hold absolute values; they are delta-encoded on output.
#[derive(Clone, Debug, PartialEq)]
pub struct PrivateDict {
    pub blue_values: Vec<f64>,
    pub other_blues: Vec<f64>,
    pub family_blues: Vec<f64>,
    pub family_other_blues: Vec<f64>,
    pub std_hw: Option<f64>,
    pub std_vw: Option<f64>,
    pub stem_snap_h: Vec<f64>,
    pub stem_snap_v: Vec<f64>,
    pub blue_scale: f64,
    pub blue_shift: f64,
    pub blue_fuzz: i32,
    pub force_bold: bool,
    pub len_iv: i32,
    pub language_group: i32,
    pub expansion_factor: f64,
    pub initial_random_seed: i32,
    pub default_width_x: f64,
    pub nominal_width_x: f64,
}

impl PrivateDict {
    pub const DEFAULT_BLUE_SCALE: f64 = 0.039625;
    pub const DEFAULT_BLUE_SHIFT: f64 = 7.0;
    pub const DEFAULT_BLUE_FUZZ: i32 = 1;
    pub const DEFAULT_LEN_IV: i32 = -1;
    pub const DEFAULT_LANGUAGE_GROUP: i32 = 0;
    pub const DEFAULT_EXPANSION_FACTOR: f64 = 0.06;
    pub const DEFAULT_INITIAL_RANDOM_SEED: i32 = 0;
    pub const DEFAULT_WIDTH_X: f64 = 0.0;
    pub const DEFAULT_NOMINAL_WIDTH_X: f64 = 0.0;
}

impl Default for PrivateDict {
    fn default() -> Self {
        Self {
            blue_values: Vec::new(),
            other_blues: Vec::new(),
            family_blues: Vec::new(),
            family_other_blues: Vec::new(),
            std_hw: None,
            std_vw: None,
            stem_snap_h: Vec::new(),
            stem_snap_v: Vec::new(),
            blue_scale: Self::DEFAULT_BLUE_SCALE,
            blue_shift: Self::DEFAULT_BLUE_SHIFT,
            blue_fuzz: Self::DEFAULT_BLUE_FUZZ,
            force_bold: false,
            len_iv: Self::DEFAULT_LEN_IV,
            language_group: Self::DEFAULT_LANGUAGE_GROUP,
            expansion_factor: Self::DEFAULT_EXPANSION_FACTOR,
            initial_random_seed: Self::DEFAULT_INITIAL_RANDOM_SEED,
            default_width_x: Self::DEFAULT_WIDTH_X,
            nominal_width_x: Self::DEFAULT_NOMINAL_WIDTH_X,
        }
    }
}

/// An error returned by a charstring converter.
pub type ConvertError = Box<dyn std::error::Error + Send + Sync>;

/// Font-wide properties shared by every kind of font (and font dict).
pub trait FontDescriptor {
    /// The PostScript name of the font.
    fn font_name(&self) -> &[u8];

    /// The name the font was defined under, used when `font_name` is empty.
    fn key_name(&self) -> &[u8] {
        &[]
    }

    fn font_info(&self) -> FontInfo {
        FontInfo::default()
    }

    fn font_matrix(&self) -> FontMatrix {
        FontMatrix::DEFAULT
    }

    fn uid(&self) -> Uid {
        Uid::None
    }

    fn paint_type(&self) -> i32 {
        0
    }

    fn stroke_width(&self) -> f64 {
        0.0
    }
}

/// A font (or CIDFont font dict) with a Private dictionary and subroutines.
pub trait OutlineFont: FontDescriptor {
    fn charstring_format(&self) -> CharstringFormat;

    fn private_dict(&self) -> &PrivateDict;

    /// The number of subroutines of the given kind.
    fn subr_count(&self, kind: SubrKind) -> usize;

    /// The (possibly encrypted) data of a subroutine.
    ///
    /// `None` for an index below [`subr_count`](Self::subr_count) means the
    /// slot is undefined; it is written as an empty object.
    fn subr_data(&self, index: usize, kind: SubrKind) -> Option<Cow<'_, [u8]>>;

    /// Decrypts a charstring, including its `lenIV` prefix.
    fn decrypt(&self, data: &[u8]) -> Vec<u8> {
        crate::charstrings::decrypt_charstring(data)
    }

    /// Converts a Type 1 charstring of this font to a Type 2 charstring.
    ///
    /// The converter is expected to expand subroutine calls inline, since
    /// no Subrs are written for converted fonts.
    fn convert_to_type2(&self, charstring: &[u8]) -> Result<Vec<u8>, ConvertError> {
        let _ = charstring;
        Err("this font does not provide a Type 2 charstring converter".into())
    }
}

/// A base font with named glyphs and an Encoding.
pub trait Type1Font: OutlineFont {
    /// Every glyph in the font, in any order.
    fn glyphs(&self) -> Vec<GlyphId>;

    fn glyph_name(&self, glyph: GlyphId) -> Option<Cow<'_, [u8]>>;

    /// The glyph the Encoding maps the given code to.
    fn encode_char(&self, code: u8) -> Option<GlyphId>;

    /// The (possibly encrypted) charstring of a glyph.
    fn glyph_data(&self, glyph: GlyphId) -> Option<Cow<'_, [u8]>>;
}

/// A CIDFontType 0 font.
pub trait CidFont: FontDescriptor {
    fn cid_system_info(&self) -> &CidSystemInfo;

    fn cid_count(&self) -> u32 {
        DEFAULT_CID_COUNT
    }

    /// The number of font dicts in the FDArray.
    fn font_dict_count(&self) -> usize;

    fn font_dict(&self, index: usize) -> &dyn OutlineFont;

    /// Every CID with a glyph, in any order.
    fn cids(&self) -> Vec<Cid>;

    /// The charstring of a CID and the index of its font dict.
    fn glyph_data(&self, cid: Cid) -> Option<(Cow<'_, [u8]>, usize)>;
}
