//! Operand encoding for DICT data.
//!
//! See "Table 3 Operand Encoding" and "Table 5 Nibble Definitions" at
//! <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5176.CFF.pdf>

use std::ops::Deref;

/// Prefix of a three byte integer operand.
pub(crate) const SHORT_INT: u8 = 28;
/// Prefix of a five byte integer operand.
pub(crate) const LONG_INT: u8 = 29;
/// Prefix of a real number operand.
pub(crate) const REAL: u8 = 30;

const REAL_POINT: u8 = 0xa;
const REAL_EXPONENT: u8 = 0xb;
const REAL_NEGATIVE_EXPONENT: u8 = 0xc;
const REAL_RESERVED: u8 = 0xd;
const REAL_MINUS: u8 = 0xe;
const REAL_END: u8 = 0xf;

/// Significant digits used when rendering a real (as C's `%g` does).
const REAL_PRECISION: i32 = 6;

/// An encoded integer operand: between one and five bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodedInt {
    bytes: [u8; 5],
    len: u8,
}

impl Deref for EncodedInt {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }
}

/// Encodes an integer operand using the shortest form.
pub fn encode_int(value: i32) -> EncodedInt {
    // Size   b0 range     Value range              Value calculation
    //--------------------------------------------------------------------------------
    // 1      32 to 246    -107 to +107             b0 - 139
    // 2      247 to 250   +108 to +1131            (b0 - 247) * 256 + b1 + 108
    // 2      251 to 254   -1131 to -108            -(b0 - 251) * 256 - b1 - 108
    // 3      28           -32768 to +32767         b1 << 8 | b2
    // 5      29           -(2^31) to +(2^31 - 1)   b1 << 24 | b2 << 16 | b3 << 8 | b4
    let mut bytes = [0u8; 5];
    let len = match value {
        -107..=107 => {
            bytes[0] = (value + 139) as u8;
            1
        }
        108..=1131 => {
            let value = value - 108;
            bytes[0] = ((value >> 8) + 247) as u8;
            bytes[1] = value as u8;
            2
        }
        -1131..=-108 => {
            let value = -value - 108;
            bytes[0] = ((value >> 8) + 251) as u8;
            bytes[1] = value as u8;
            2
        }
        -32768..=32767 => {
            bytes[0] = SHORT_INT;
            bytes[1..3].copy_from_slice(&(value as i16).to_be_bytes());
            3
        }
        _ => {
            bytes[0] = LONG_INT;
            bytes[1..5].copy_from_slice(&value.to_be_bytes());
            5
        }
    };
    EncodedInt { bytes, len }
}

/// Encodes a real operand.
///
/// Integral values use the (shorter) integer encoding. Everything else is
/// written as packed decimal nibbles of the value's `%g` rendering, so the
/// encoded length is exactly what a C implementation would produce.
pub fn encode_real(value: f64) -> Vec<u8> {
    if let Some(int) = as_integral(value) {
        return encode_int(int).to_vec();
    }
    let text = format_g(value);
    let mut out = Vec::with_capacity(2 + text.len() / 2);
    out.push(REAL);
    let mut pending: Option<u8> = None;
    let mut push_nibble = |nibble: u8| match pending.take() {
        Some(high) => out.push((high << 4) | nibble),
        None => pending = Some(nibble),
    };
    let mut chars = text.bytes().peekable();
    while let Some(ch) = chars.next() {
        let nibble = match ch {
            b'0'..=b'9' => ch - b'0',
            b'.' => REAL_POINT,
            b'+' => continue,
            b'-' => REAL_MINUS,
            b'e' | b'E' => {
                if chars.peek() == Some(&b'-') {
                    chars.next();
                    REAL_NEGATIVE_EXPONENT
                } else {
                    REAL_EXPONENT
                }
            }
            _ => REAL_RESERVED,
        };
        push_nibble(nibble);
    }
    out.push(match pending {
        Some(high) => (high << 4) | REAL_END,
        None => (REAL_END << 4) | REAL_END,
    });
    out
}

fn as_integral(value: f64) -> Option<i32> {
    (value.fract() == 0.0 && value >= i32::MIN as f64 && value <= i32::MAX as f64)
        .then_some(value as i32)
}

/// Renders a value the way C's `printf("%g")` does.
pub(crate) fn format_g(value: f64) -> String {
    if value.is_nan() {
        return "nan".into();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-inf" } else { "inf" }.into();
    }
    let scientific = format!("{:.*e}", (REAL_PRECISION - 1) as usize, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return scientific;
    };
    if exponent < -4 || exponent >= REAL_PRECISION {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{sign}{:02}",
            strip_trailing_zeros(mantissa),
            exponent.abs()
        )
    } else {
        let decimals = (REAL_PRECISION - 1 - exponent) as usize;
        strip_trailing_zeros(&format!("{value:.decimals$}")).to_string()
    }
}

fn strip_trailing_zeros(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}
