//! Decoding result cells into [`CellValue`].
//!
//! Results arrive in PostgreSQL's binary format. Integer, float, boolean and
//! bytea columns keep their shape; everything else is turned into the text
//! psql would print. Types with no known text form are shown as raw bytes.

use std::error::Error;
use std::fmt::Write;
use std::net::{Ipv4Addr, Ipv6Addr};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use tokio_postgres::types::{Field, FromSql, Kind, Type};
use tokio_postgres::Row;

use crate::core::value::CellValue;
use crate::error::Result;

use super::numeric::numeric_to_text;

type BoxError = Box<dyn Error + Sync + Send>;

/// Decode every cell of `row` by its column type.
pub(crate) fn decode_row(row: &Row) -> Result<Vec<CellValue>> {
    (0..row.len()).map(|idx| decode_cell(row, idx)).collect()
}

/// Decode one cell; NULL becomes [`CellValue::Null`].
pub(crate) fn decode_cell(row: &Row, idx: usize) -> Result<CellValue> {
    let cell = row.try_get::<_, Option<Cell>>(idx)?;
    Ok(cell.map_or(CellValue::Null, |c| c.0))
}

/// A cell of any column type.
struct Cell(CellValue);

impl<'a> FromSql<'a> for Cell {
    fn from_sql(ty: &Type, raw: &'a [u8]) -> std::result::Result<Self, BoxError> {
        decode_value(ty, raw).map(Cell)
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }
}

fn decode_value(ty: &Type, raw: &[u8]) -> std::result::Result<CellValue, BoxError> {
    let cell = match *ty {
        Type::BOOL => CellValue::Boolean(bool::from_sql(ty, raw)?),
        Type::INT2 => CellValue::Integer(i16::from_sql(ty, raw)?.into()),
        Type::INT4 => CellValue::Integer(i32::from_sql(ty, raw)?.into()),
        Type::INT8 => CellValue::Integer(i64::from_sql(ty, raw)?),
        Type::OID => CellValue::Integer(u32::from_sql(ty, raw)?.into()),
        Type::FLOAT4 => CellValue::Float(f32::from_sql(ty, raw)?.into()),
        Type::FLOAT8 => CellValue::Float(f64::from_sql(ty, raw)?),
        Type::BYTEA => CellValue::Bytes(raw.to_vec()),
        Type::NUMERIC => CellValue::Text(numeric_to_text(raw)?),
        Type::MONEY => CellValue::Text(money_to_text(Reader::new(raw).i64()?)),
        Type::CHAR => CellValue::Text(char::from(i8::from_sql(ty, raw)? as u8).to_string()),
        Type::DATE => CellValue::Text(date_to_text(ty, raw)?),
        Type::TIME => {
            let mut text = String::new();
            push_clock(&mut text, Reader::new(raw).i64()?.unsigned_abs())?;
            CellValue::Text(text)
        }
        Type::TIMETZ => CellValue::Text(timetz_to_text(raw)?),
        Type::TIMESTAMP | Type::TIMESTAMPTZ => CellValue::Text(timestamp_to_text(ty, raw)?),
        Type::INTERVAL => CellValue::Text(interval_to_text(raw)?),
        Type::UUID => CellValue::Text(uuid::Uuid::from_sql(ty, raw)?.to_string()),
        Type::JSON | Type::JSONB => {
            CellValue::Text(serde_json::Value::from_sql(ty, raw)?.to_string())
        }
        Type::XML => CellValue::Text(std::str::from_utf8(raw)?.to_string()),
        Type::INET | Type::CIDR => CellValue::Text(inet_to_text(raw)?),
        Type::MACADDR | Type::MACADDR8 => CellValue::Text(
            raw.iter()
                .map(|b| format!("{:02x}", b))
                .collect::<Vec<_>>()
                .join(":"),
        ),
        Type::POINT => {
            let mut r = Reader::new(raw);
            CellValue::Text(format!("({},{})", r.f64()?, r.f64()?))
        }
        Type::BIT | Type::VARBIT => CellValue::Text(bits_to_text(raw)?),
        _ if <&str as FromSql>::accepts(ty) => {
            CellValue::Text(<&str as FromSql>::from_sql(ty, raw)?.to_string())
        }
        _ => match ty.kind() {
            Kind::Enum(_) => CellValue::Text(std::str::from_utf8(raw)?.to_string()),
            Kind::Domain(inner) => decode_value(inner, raw)?,
            Kind::Array(element) => CellValue::Text(array_to_text(element, raw)?),
            Kind::Range(inner) => CellValue::Text(range_to_text(inner, raw)?),
            Kind::Composite(fields) => CellValue::Text(composite_to_text(fields, raw)?),
            _ => CellValue::Bytes(raw.to_vec()),
        },
    };
    Ok(cell)
}

/// Big-endian cursor over a binary value.
struct Reader<'a> {
    buf: &'a [u8],
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    fn take(&mut self, n: usize) -> std::result::Result<&'a [u8], BoxError> {
        if self.buf.len() < n {
            return Err("unexpected end of value".into());
        }
        let (head, rest) = self.buf.split_at(n);
        self.buf = rest;
        Ok(head)
    }

    fn array<const N: usize>(&mut self) -> std::result::Result<[u8; N], BoxError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn u8(&mut self) -> std::result::Result<u8, BoxError> {
        Ok(self.array::<1>()?[0])
    }

    fn i32(&mut self) -> std::result::Result<i32, BoxError> {
        Ok(i32::from_be_bytes(self.array()?))
    }

    fn i64(&mut self) -> std::result::Result<i64, BoxError> {
        Ok(i64::from_be_bytes(self.array()?))
    }

    fn f64(&mut self) -> std::result::Result<f64, BoxError> {
        Ok(f64::from_be_bytes(self.array()?))
    }

    /// A length-prefixed value; `None` for NULL.
    fn value(&mut self) -> std::result::Result<Option<&'a [u8]>, BoxError> {
        match self.i32()? {
            -1 => Ok(None),
            len => Ok(Some(self.take(usize::try_from(len)?)?)),
        }
    }
}

fn date_to_text(ty: &Type, raw: &[u8]) -> std::result::Result<String, BoxError> {
    match Reader::new(raw).i32()? {
        i32::MAX => Ok("infinity".into()),
        i32::MIN => Ok("-infinity".into()),
        _ => Ok(NaiveDate::from_sql(ty, raw)?.to_string()),
    }
}

fn timestamp_to_text(ty: &Type, raw: &[u8]) -> std::result::Result<String, BoxError> {
    match Reader::new(raw).i64()? {
        i64::MAX => return Ok("infinity".into()),
        i64::MIN => return Ok("-infinity".into()),
        _ => {}
    }
    if *ty == Type::TIMESTAMPTZ {
        let ts = DateTime::<FixedOffset>::from_sql(ty, raw)?;
        Ok(ts.format("%Y-%m-%d %H:%M:%S%.f%:z").to_string())
    } else {
        let ts = NaiveDateTime::from_sql(ty, raw)?;
        Ok(ts.format("%Y-%m-%d %H:%M:%S%.f").to_string())
    }
}

/// Append `HH:MM:SS[.ffffff]`; hours are not wrapped at 24.
fn push_clock(text: &mut String, micros: u64) -> std::fmt::Result {
    let secs = micros / 1_000_000;
    let frac = micros % 1_000_000;
    write!(text, "{:02}:{:02}:{:02}", secs / 3600, secs / 60 % 60, secs % 60)?;
    if frac > 0 {
        let digits = format!("{:06}", frac);
        write!(text, ".{}", digits.trim_end_matches('0'))?;
    }
    Ok(())
}

fn timetz_to_text(raw: &[u8]) -> std::result::Result<String, BoxError> {
    let mut r = Reader::new(raw);
    let micros = r.i64()?;
    // The zone travels as seconds west of UTC
    let east = -i64::from(r.i32()?);

    let mut text = String::new();
    push_clock(&mut text, micros.unsigned_abs())?;
    let sign = if east < 0 { '-' } else { '+' };
    let east = east.unsigned_abs();
    write!(text, "{}{:02}", sign, east / 3600)?;
    if east % 3600 != 0 {
        write!(text, ":{:02}", east / 60 % 60)?;
    }
    if east % 60 != 0 {
        write!(text, ":{:02}", east % 60)?;
    }
    Ok(text)
}

/// Same layout as PostgreSQL's default `postgres` interval style, for
/// example `1 year 2 mons -3 days +04:05:06.5`.
fn interval_to_text(raw: &[u8]) -> std::result::Result<String, BoxError> {
    let mut r = Reader::new(raw);
    let micros = r.i64()?;
    let days = r.i32()?;
    let months = r.i32()?;

    let mut text = String::new();
    let mut is_before = false;
    for (value, unit) in [(months / 12, "year"), (months % 12, "mon"), (days, "day")] {
        if value == 0 {
            continue;
        }
        if !text.is_empty() {
            text.push(' ');
        }
        if is_before && value > 0 {
            text.push('+');
        }
        write!(text, "{} {}{}", value, unit, if value == 1 { "" } else { "s" })?;
        is_before = value < 0;
    }

    if micros != 0 || text.is_empty() {
        if !text.is_empty() {
            text.push(' ');
        }
        if micros < 0 {
            text.push('-');
        } else if is_before {
            text.push('+');
        }
        push_clock(&mut text, micros.unsigned_abs())?;
    }
    Ok(text)
}

fn inet_to_text(raw: &[u8]) -> std::result::Result<String, BoxError> {
    let mut r = Reader::new(raw);
    let family = r.u8()?;
    let bits = r.u8()?;
    let is_cidr = r.u8()? != 0;
    let len = r.u8()?;

    let (addr, max_bits) = match (family, len) {
        (2, 4) => (Ipv4Addr::from(r.array::<4>()?).to_string(), 32),
        (3, 16) => (Ipv6Addr::from(r.array::<16>()?).to_string(), 128),
        _ => return Err(format!("unsupported address family {}", family).into()),
    };

    if is_cidr || bits != max_bits {
        Ok(format!("{}/{}", addr, bits))
    } else {
        Ok(addr)
    }
}

/// Cents with thousands separators, as in the `C` monetary locale.
fn money_to_text(cents: i64) -> String {
    let abs = cents.unsigned_abs();
    let units = (abs / 100).to_string();

    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (i, ch) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if cents < 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, abs % 100)
}

fn bits_to_text(raw: &[u8]) -> std::result::Result<String, BoxError> {
    let mut r = Reader::new(raw);
    let len = usize::try_from(r.i32()?)?;
    let bytes = r.take(len.div_ceil(8))?;
    Ok((0..len)
        .map(|i| if bytes[i / 8] & (0x80 >> (i % 8)) != 0 { '1' } else { '0' })
        .collect())
}

fn element_text(ty: &Type, raw: Option<&[u8]>) -> std::result::Result<Option<String>, BoxError> {
    raw.map(|r| decode_value(ty, r).map(|cell| cell.to_string()))
        .transpose()
}

/// Quote an array element the way `array_out` does.
fn push_array_element(text: &mut String, element: Option<&str>) {
    let Some(s) = element else {
        text.push_str("NULL");
        return;
    };
    let needs_quotes = s.is_empty()
        || s.eq_ignore_ascii_case("NULL")
        || s.chars()
            .any(|c| matches!(c, '{' | '}' | ',' | '"' | '\\') || c.is_whitespace());
    if !needs_quotes {
        text.push_str(s);
        return;
    }
    text.push('"');
    for c in s.chars() {
        if c == '"' || c == '\\' {
            text.push('\\');
        }
        text.push(c);
    }
    text.push('"');
}

fn array_to_text(element: &Type, raw: &[u8]) -> std::result::Result<String, BoxError> {
    let mut r = Reader::new(raw);
    let ndim = usize::try_from(r.i32()?)?;
    let _has_nulls = r.i32()?;
    let _element_oid = r.i32()?;

    let mut dims = Vec::with_capacity(ndim);
    for _ in 0..ndim {
        let len = usize::try_from(r.i32()?)?;
        let lower = r.i32()?;
        dims.push((len, lower));
    }
    if dims.is_empty() {
        return Ok("{}".into());
    }

    let mut text = String::new();
    if dims.iter().any(|(_, lower)| *lower != 1) {
        for (len, lower) in &dims {
            let upper = i64::from(*lower) + i64::try_from(*len)? - 1;
            write!(text, "[{}:{}]", lower, upper)?;
        }
        text.push('=');
    }

    let lens: Vec<usize> = dims.iter().map(|(len, _)| *len).collect();
    push_array_level(&mut text, element, &lens, &mut r)?;
    Ok(text)
}

fn push_array_level(
    text: &mut String,
    element: &Type,
    lens: &[usize],
    r: &mut Reader<'_>,
) -> std::result::Result<(), BoxError> {
    let Some((len, inner)) = lens.split_first() else {
        return Ok(());
    };
    text.push('{');
    for i in 0..*len {
        if i > 0 {
            text.push(',');
        }
        if inner.is_empty() {
            let value = element_text(element, r.value()?)?;
            push_array_element(text, value.as_deref());
        } else {
            push_array_level(text, element, inner, r)?;
        }
    }
    text.push('}');
    Ok(())
}

/// Quote a range bound or composite field. Quotes and backslashes inside
/// are doubled.
fn push_quoted_if_needed(text: &mut String, s: &str, specials: &[char]) {
    let needs_quotes =
        s.is_empty() || s.chars().any(|c| specials.contains(&c) || c.is_whitespace());
    if !needs_quotes {
        text.push_str(s);
        return;
    }
    text.push('"');
    for c in s.chars() {
        if c == '"' || c == '\\' {
            text.push(c);
        }
        text.push(c);
    }
    text.push('"');
}

const RANGE_EMPTY: u8 = 0x01;
const RANGE_LB_INC: u8 = 0x02;
const RANGE_UB_INC: u8 = 0x04;
const RANGE_LB_INF: u8 = 0x08;
const RANGE_UB_INF: u8 = 0x10;

const RANGE_SPECIALS: &[char] = &['(', ')', '[', ']', ',', '"', '\\'];
const COMPOSITE_SPECIALS: &[char] = &['(', ')', ',', '"', '\\'];

fn range_to_text(inner: &Type, raw: &[u8]) -> std::result::Result<String, BoxError> {
    let mut r = Reader::new(raw);
    let flags = r.u8()?;
    if flags & RANGE_EMPTY != 0 {
        return Ok("empty".into());
    }

    let mut text = String::new();
    text.push(if flags & RANGE_LB_INC != 0 { '[' } else { '(' });
    if flags & RANGE_LB_INF == 0 {
        if let Some(lower) = element_text(inner, r.value()?)? {
            push_quoted_if_needed(&mut text, &lower, RANGE_SPECIALS);
        }
    }
    text.push(',');
    if flags & RANGE_UB_INF == 0 {
        if let Some(upper) = element_text(inner, r.value()?)? {
            push_quoted_if_needed(&mut text, &upper, RANGE_SPECIALS);
        }
    }
    text.push(if flags & RANGE_UB_INC != 0 { ']' } else { ')' });
    Ok(text)
}

fn composite_to_text(fields: &[Field], raw: &[u8]) -> std::result::Result<String, BoxError> {
    let mut r = Reader::new(raw);
    let count = usize::try_from(r.i32()?)?;
    if count != fields.len() {
        return Err(format!("expected {} fields, got {}", fields.len(), count).into());
    }

    let mut text = String::from("(");
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            text.push(',');
        }
        let _oid = r.i32()?;
        if let Some(value) = element_text(field.type_(), r.value()?)? {
            push_quoted_if_needed(&mut text, &value, COMPOSITE_SPECIALS);
        }
    }
    text.push(')');
    Ok(text)
}
