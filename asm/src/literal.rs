//! Operand text to machine values.
//!
//! Every converter returns a `Result`; the assembler reports the error and
//! continues with a zero value, fallback chains (`to_word`, `to_word_array`)
//! simply try the next form.

use arch::op::RoundingMode;
use arch::reg::Reg;
use thiserror::Error;

pub type Word = u32;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LiteralError {
    #[error("Cannot convert `{0}` to int")]
    Int(String),

    #[error("`{0}` cannot be represented with 32 bit")]
    OutOfRange(String),

    #[error("Cannot convert `{0}` to float")]
    Float(String),

    #[error("Cannot convert `{0}` to char")]
    Char(String),

    #[error("Cannot convert `{0}` to char array")]
    Str(String),

    #[error("Cannot convert `{0}` to 32 bit word")]
    Word(String),

    #[error("Cannot convert `{0}` to word array")]
    WordArray(String),

    #[error("Unknown register `{0}`")]
    Register(String),

    #[error("Unknown rounding mode `{0}`")]
    RoundingMode(String),
}

// ----------------------------------------------------------------------------
// Classification

fn split_sign(s: &str) -> (bool, &str) {
    match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    }
}

fn digits_of<'a>(s: &'a str, prefix: &str, is_digit: fn(&u8) -> bool) -> Option<&'a str> {
    let (_, body) = split_sign(s);
    let digits = body.strip_prefix(prefix)?;
    if !digits.is_empty() && digits.as_bytes().iter().all(is_digit) {
        Some(digits)
    } else {
        None
    }
}

pub fn is_dec(s: &str) -> bool {
    digits_of(s, "", u8::is_ascii_digit).is_some()
}

pub fn is_hex(s: &str) -> bool {
    digits_of(s, "0x", u8::is_ascii_hexdigit).is_some()
}

pub fn is_bin(s: &str) -> bool {
    digits_of(s, "0b", |b| *b == b'0' || *b == b'1').is_some()
}

pub fn is_int(s: &str) -> bool {
    is_dec(s) || is_hex(s) || is_bin(s)
}

pub fn is_register(s: &str) -> bool {
    to_register(s).is_ok()
}

/// Strip one pair of surrounding double quotes.
pub fn remove_quotes(s: &str) -> &str {
    match s.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        Some(inner) => inner,
        None => s,
    }
}

// ----------------------------------------------------------------------------
// Conversion

fn parse_radix(s: &str, digits: &str, radix: u32) -> Result<Word, LiteralError> {
    let (neg, _) = split_sign(s);
    let magnitude = i64::from_str_radix(digits, radix)
        .map_err(|_| LiteralError::OutOfRange(s.to_string()))?;
    let value = if neg { -magnitude } else { magnitude };
    if value < i32::MIN as i64 || value > u32::MAX as i64 {
        return Err(LiteralError::OutOfRange(s.to_string()));
    }
    Ok(value as Word)
}

/// Decimal, `0x` hex or `0b` binary, optionally signed, in [i32::MIN, u32::MAX].
/// Anything else is tried as a char literal.
pub fn to_int(s: &str) -> Result<Word, LiteralError> {
    if let Some(digits) = digits_of(s, "", u8::is_ascii_digit) {
        return parse_radix(s, digits, 10);
    }
    if let Some(digits) = digits_of(s, "0x", u8::is_ascii_hexdigit) {
        return parse_radix(s, digits, 16);
    }
    if let Some(digits) = digits_of(s, "0b", |b| *b == b'0' || *b == b'1') {
        return parse_radix(s, digits, 2);
    }
    to_char(s).map_err(|_| LiteralError::Int(s.to_string()))
}

/// IEEE-754 single precision bit pattern. Integer literals are rejected.
pub fn to_float(s: &str) -> Result<Word, LiteralError> {
    if s.is_empty() || is_int(s) {
        return Err(LiteralError::Float(s.to_string()));
    }
    let value: f32 = s
        .parse()
        .map_err(|_| LiteralError::Float(s.to_string()))?;
    if value.is_infinite() && !s.to_ascii_lowercase().contains("inf") {
        return Err(LiteralError::OutOfRange(s.to_string()));
    }
    if value == 0.0 && has_nonzero_mantissa(s) {
        return Err(LiteralError::OutOfRange(s.to_string()));
    }
    Ok(value.to_bits())
}

/// Underflow check: any non-zero digit ahead of the exponent.
fn has_nonzero_mantissa(s: &str) -> bool {
    s.chars()
        .take_while(|c| !matches!(c, 'e' | 'E'))
        .any(|c| matches!(c, '1'..='9'))
}

fn unescape(c: char) -> Option<char> {
    match c {
        '\'' => Some('\''),
        '"' => Some('"'),
        '?' => Some('?'),
        '\\' => Some('\\'),
        'a' => Some('\x07'),
        'b' => Some('\x08'),
        'f' => Some('\x0C'),
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        'v' => Some('\x0B'),
        '0' => Some('\0'),
        _ => None,
    }
}

pub fn to_char(s: &str) -> Result<Word, LiteralError> {
    let err = || LiteralError::Char(s.to_string());
    let body = s
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .ok_or_else(err)?;
    let mut chars = body.chars();
    let ch = match (chars.next(), chars.next(), chars.next()) {
        (Some('\\'), Some(esc), None) => unescape(esc).ok_or_else(err)?,
        (Some(ch), None, None) if ch != '\\' => ch,
        _ => return Err(err()),
    };
    Ok(ch as Word)
}

/// One word per character plus a NUL terminator (unless already present).
pub fn to_string(s: &str) -> Result<Vec<Word>, LiteralError> {
    let err = || LiteralError::Str(s.to_string());
    let body = s
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .ok_or_else(err)?;

    let mut words = Vec::with_capacity(body.len() + 1);
    let mut chars = body.chars();
    while let Some(ch) = chars.next() {
        let ch = match ch {
            '\\' => chars.next().and_then(unescape).ok_or_else(err)?,
            _ => ch,
        };
        words.push(ch as Word);
    }
    if words.last() != Some(&0) {
        words.push(0);
    }
    Ok(words)
}

/// Integer, else float.
pub fn to_word(s: &str) -> Result<Word, LiteralError> {
    match to_int(s) {
        Ok(word) => Ok(word),
        Err(err @ LiteralError::OutOfRange(_)) => Err(err),
        Err(_) => to_float(s).map_err(|err| match err {
            LiteralError::OutOfRange(_) => err,
            _ => LiteralError::Word(s.to_string()),
        }),
    }
}

/// A single word, else a string.
pub fn to_word_array(s: &str) -> Result<Vec<Word>, LiteralError> {
    to_word(s)
        .map(|word| vec![word])
        .or_else(|_| to_string(s))
        .map_err(|_| LiteralError::WordArray(s.to_string()))
}

/// `r0`..`r63` (or `R`), `sp`, `sr`, `pc`.
pub fn to_register(s: &str) -> Result<u8, LiteralError> {
    let err = || LiteralError::Register(s.to_string());
    if let Some(idx) = s.strip_prefix(['r', 'R']) {
        if !idx.is_empty() && idx.bytes().all(|b| b.is_ascii_digit()) {
            return match idx.parse::<u8>() {
                Ok(idx) if idx < Reg::COUNT => Ok(idx),
                _ => Err(err()),
            };
        }
    }
    Reg::by_name(s).ok_or_else(err)
}

/// Rounding-mode bits for the high nibble of an FPU function code.
pub fn to_rounding_mode(s: &str) -> Result<u8, LiteralError> {
    if let Some(rm) = RoundingMode::parse(s) {
        return Ok(rm.into());
    }
    match to_int(s) {
        Ok(rm) if rm <= 4 => Ok((rm as u8) << 4),
        _ => Err(LiteralError::RoundingMode(s.to_string())),
    }
}
