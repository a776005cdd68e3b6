//! PostgreSQL `numeric` in its binary wire format.
//!
//! The server sends `numeric` as base-10000 digit groups with a weight, a
//! sign word and a display scale. Values are converted straight to and from
//! decimal text, so precision is bounded only by the server and `NaN` and
//! `±Infinity` survive.

use std::error::Error;
use std::fmt::Write;

use bytes::{BufMut, BytesMut};
use tokio_postgres::types::IsNull;

type BoxError = Box<dyn Error + Sync + Send>;

const NUMERIC_POS: u16 = 0x0000;
const NUMERIC_NEG: u16 = 0x4000;
const NUMERIC_NAN: u16 = 0xC000;
const NUMERIC_PINF: u16 = 0xD000;
const NUMERIC_NINF: u16 = 0xF000;

const MAX_DSCALE: usize = 0x3FFF;

/// Decode a binary `numeric` into the text PostgreSQL would print.
pub(crate) fn numeric_to_text(raw: &[u8]) -> Result<String, BoxError> {
    if raw.len() < 8 {
        return Err("numeric value too short".into());
    }
    let ndigits = i16::from_be_bytes([raw[0], raw[1]]);
    let weight = i16::from_be_bytes([raw[2], raw[3]]);
    let sign = u16::from_be_bytes([raw[4], raw[5]]);
    let dscale = usize::from(u16::from_be_bytes([raw[6], raw[7]]));

    let ndigits = usize::try_from(ndigits).map_err(|_| "negative numeric digit count")?;
    let body = &raw[8..];
    if body.len() != ndigits * 2 {
        return Err("numeric digit count does not match payload".into());
    }
    let digits: Vec<i16> = body
        .chunks_exact(2)
        .map(|d| i16::from_be_bytes([d[0], d[1]]))
        .collect();

    match sign {
        NUMERIC_NAN => return Ok("NaN".into()),
        NUMERIC_PINF => return Ok("Infinity".into()),
        NUMERIC_NINF => return Ok("-Infinity".into()),
        NUMERIC_POS | NUMERIC_NEG => {}
        other => return Err(format!("invalid numeric sign 0x{:04x}", other).into()),
    }

    // Digit group at index `idx` has weight `weight - idx`
    let group = |idx: i32| -> i16 {
        usize::try_from(idx)
            .ok()
            .and_then(|i| digits.get(i).copied())
            .unwrap_or(0)
    };

    let mut text = String::new();
    if sign == NUMERIC_NEG {
        text.push('-');
    }

    let weight = i32::from(weight);
    if weight < 0 {
        text.push('0');
    } else {
        for idx in 0..=weight {
            if idx == 0 {
                write!(text, "{}", group(idx))?;
            } else {
                write!(text, "{:04}", group(idx))?;
            }
        }
    }

    if dscale > 0 {
        let mut frac = String::with_capacity(dscale + 4);
        let mut idx = weight + 1;
        while frac.len() < dscale {
            write!(frac, "{:04}", group(idx))?;
            idx += 1;
        }
        frac.truncate(dscale);
        text.push('.');
        text.push_str(&frac);
    }

    Ok(text)
}

/// Encode decimal text (`-12.50`, `1e30`, `NaN`, `-Infinity`, ...) as a
/// binary `numeric`.
pub(crate) fn text_to_numeric(s: &str, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    let s = s.trim();

    let special = match s.to_ascii_lowercase().as_str() {
        "nan" => Some(NUMERIC_NAN),
        "inf" | "+inf" | "infinity" | "+infinity" => Some(NUMERIC_PINF),
        "-inf" | "-infinity" => Some(NUMERIC_NINF),
        _ => None,
    };
    if let Some(sign) = special {
        write_header(out, 0, 0, sign, 0);
        return Ok(IsNull::No);
    }

    let invalid = || -> BoxError { format!("invalid numeric '{}'", s).into() };

    let (negative, unsigned) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let (mantissa, exponent) = match unsigned.find(|c: char| c == 'e' || c == 'E') {
        Some(pos) => (
            &unsigned[..pos],
            unsigned[pos + 1..].parse::<i64>().map_err(|_| invalid())?,
        ),
        None => (unsigned, 0),
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(invalid());
    }
    if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let frac_len = i64::try_from(frac_part.len()).map_err(|_| invalid())?;
    let scale = frac_len.checked_sub(exponent).ok_or_else(invalid)?;
    let dscale = usize::try_from(scale.max(0)).map_err(|_| invalid())?;
    if dscale > MAX_DSCALE {
        return Err(format!("numeric scale {} out of range", dscale).into());
    }

    // Significant digits and how many of them sit before the decimal point
    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes())
        .map(|b| b - b'0')
        .collect();
    let mut point = i64::try_from(int_part.len())
        .map_err(|_| invalid())?
        .checked_add(exponent)
        .ok_or_else(invalid)?;

    let leading = digits.iter().take_while(|d| **d == 0).count();
    digits.drain(..leading);
    point -= i64::try_from(leading).map_err(|_| invalid())?;
    while digits.last() == Some(&0) {
        digits.pop();
    }

    let dscale = u16::try_from(dscale).map_err(|_| invalid())?;
    if digits.is_empty() {
        write_header(out, 0, 0, NUMERIC_POS, dscale);
        return Ok(IsNull::No);
    }

    // Align the decimal point on a group boundary
    let pad = (4 - point.rem_euclid(4)) % 4;
    let mut aligned = vec![0u8; usize::try_from(pad).map_err(|_| invalid())?];
    aligned.extend_from_slice(&digits);
    point += pad;
    while aligned.len() % 4 != 0 {
        aligned.push(0);
    }

    let weight = i16::try_from(point / 4 - 1)
        .map_err(|_| format!("numeric '{}' out of range", s))?;
    let groups: Vec<i16> = aligned
        .chunks_exact(4)
        .map(|c| c.iter().fold(0i16, |acc, d| acc * 10 + i16::from(*d)))
        .collect();
    let ndigits = i16::try_from(groups.len()).map_err(|_| invalid())?;

    let sign = if negative { NUMERIC_NEG } else { NUMERIC_POS };
    write_header(out, ndigits, weight, sign, dscale);
    for g in groups {
        out.put_i16(g);
    }
    Ok(IsNull::No)
}

fn write_header(out: &mut BytesMut, ndigits: i16, weight: i16, sign: u16, dscale: u16) {
    out.put_i16(ndigits);
    out.put_i16(weight);
    out.put_u16(sign);
    out.put_u16(dscale);
}
