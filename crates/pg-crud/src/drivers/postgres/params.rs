//! Binding [`TypedValue`] parameters.
//!
//! Values are coerced from console text using only three shapes, while the
//! server reports a concrete type for every placeholder. `to_sql` adapts the
//! value to that type: integers narrow with a range check, floats widen to
//! `numeric`, and text is parsed into the target type when the column is not
//! a text type. Anything unparsable fails the statement with a conversion
//! error instead of being silently rewritten.

use std::error::Error;

use bytes::BytesMut;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use tokio_postgres::types::{to_sql_checked, IsNull, Kind, ToSql, Type};

use crate::core::value::TypedValue;

use super::numeric::text_to_numeric;

type BoxError = Box<dyn Error + Sync + Send>;

impl ToSql for TypedValue {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        match self {
            TypedValue::Integer(v) => integer_to_sql(*v, ty, out),
            TypedValue::Float(v) => float_to_sql(*v, ty, out),
            TypedValue::Text(s) => text_to_sql(s, ty, out),
        }
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

fn integer_to_sql(v: i64, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    match *ty {
        Type::INT2 => i16::try_from(v)?.to_sql(ty, out),
        Type::INT4 => i32::try_from(v)?.to_sql(ty, out),
        Type::INT8 => v.to_sql(ty, out),
        Type::FLOAT4 => (v as f32).to_sql(ty, out),
        Type::FLOAT8 => (v as f64).to_sql(ty, out),
        Type::NUMERIC => text_to_numeric(&v.to_string(), out),
        _ => text_to_sql(&v.to_string(), ty, out),
    }
}

fn float_to_sql(v: f64, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    match *ty {
        Type::FLOAT8 => v.to_sql(ty, out),
        Type::FLOAT4 => (v as f32).to_sql(ty, out),
        // Going through the shortest decimal text keeps 3.14 as 3.14
        Type::NUMERIC => text_to_numeric(&v.to_string(), out),
        Type::INT2 | Type::INT4 | Type::INT8 => {
            if v.fract() != 0.0 || !v.is_finite() {
                return Err(format!("{} is not a whole number", v).into());
            }
            integer_to_sql(v as i64, ty, out)
        }
        _ => text_to_sql(&v.to_string(), ty, out),
    }
}

fn text_to_sql(s: &str, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    if <&str as ToSql>::accepts(ty) {
        return s.to_sql(ty, out);
    }

    match *ty {
        Type::BOOL => parse_bool(s)?.to_sql(ty, out),
        Type::INT2 => s.trim().parse::<i16>()?.to_sql(ty, out),
        Type::INT4 => s.trim().parse::<i32>()?.to_sql(ty, out),
        Type::INT8 => s.trim().parse::<i64>()?.to_sql(ty, out),
        Type::FLOAT4 => s.trim().parse::<f32>()?.to_sql(ty, out),
        Type::FLOAT8 => s.trim().parse::<f64>()?.to_sql(ty, out),
        Type::NUMERIC => text_to_numeric(s, out),
        Type::DATE => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")?.to_sql(ty, out),
        Type::TIME => parse_time(s)?.to_sql(ty, out),
        Type::TIMESTAMP => parse_timestamp(s)?.to_sql(ty, out),
        Type::TIMESTAMPTZ => parse_timestamptz(s)?.to_sql(ty, out),
        Type::UUID => uuid::Uuid::parse_str(s.trim())?.to_sql(ty, out),
        Type::JSON | Type::JSONB => serde_json::from_str::<serde_json::Value>(s)?.to_sql(ty, out),
        Type::BYTEA => parse_bytea(s)?.to_sql(ty, out),
        _ => match ty.kind() {
            // Enum labels travel as their text in the binary format
            Kind::Enum(_) => {
                out.extend_from_slice(s.as_bytes());
                Ok(IsNull::No)
            }
            Kind::Domain(inner) => text_to_sql(s, inner, out),
            _ => Err(format!("cannot bind text to a parameter of type {}", ty).into()),
        },
    }
}

fn parse_bool(s: &str) -> Result<bool, BoxError> {
    match s.trim().to_lowercase().as_str() {
        "t" | "true" | "y" | "yes" | "on" | "1" => Ok(true),
        "f" | "false" | "n" | "no" | "off" | "0" => Ok(false),
        other => Err(format!("invalid boolean '{}'", other).into()),
    }
}

fn parse_time(s: &str) -> Result<NaiveTime, BoxError> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(Into::into)
}

fn parse_timestamp(s: &str) -> Result<NaiveDateTime, BoxError> {
    let s = s.trim();
    if let Ok(ts) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return Ok(ts);
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(ts);
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")?;
    Ok(date.and_time(NaiveTime::MIN))
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS[.f]+hh[:mm]`, or a zone-less value
/// taken as UTC.
fn parse_timestamptz(s: &str) -> Result<DateTime<FixedOffset>, BoxError> {
    let s = s.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts);
    }
    if let Ok(ts) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Ok(ts);
    }
    Ok(parse_timestamp(s)?.and_utc().fixed_offset())
}

/// `\x`-prefixed input is hex; anything else is taken as raw bytes.
fn parse_bytea(s: &str) -> Result<Vec<u8>, BoxError> {
    match s.strip_prefix("\\x") {
        Some(hex_digits) => Ok(hex::decode(hex_digits)?),
        None => Ok(s.as_bytes().to_vec()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: TypedValue, ty: &Type) -> Result<Vec<u8>, BoxError> {
        let mut buf = BytesMut::new();
        value.to_sql(ty, &mut buf)?;
        Ok(buf.to_vec())
    }

    #[test]
    fn test_integer_narrows_to_column_width() {
        assert_eq!(
            encode(TypedValue::Integer(1), &Type::INT4).unwrap(),
            1i32.to_be_bytes().to_vec()
        );
        assert_eq!(
            encode(TypedValue::Integer(-2), &Type::INT2).unwrap(),
            (-2i16).to_be_bytes().to_vec()
        );
        assert!(encode(TypedValue::Integer(i64::MAX), &Type::INT4).is_err());
    }

    #[test]
    fn test_integer_widens_to_float() {
        assert_eq!(
            encode(TypedValue::Integer(3), &Type::FLOAT8).unwrap(),
            3f64.to_be_bytes().to_vec()
        );
    }

    #[test]
    fn test_float_to_integer_requires_whole_number() {
        assert_eq!(
            encode(TypedValue::Float(4.0), &Type::INT8).unwrap(),
            4i64.to_be_bytes().to_vec()
        );
        assert!(encode(TypedValue::Float(4.5), &Type::INT8).is_err());
    }

    #[test]
    fn test_float_to_numeric() {
        // ndigits 2, weight 0, positive, dscale 1, groups 9 and 5000
        assert_eq!(
            encode(TypedValue::Float(9.5), &Type::NUMERIC).unwrap(),
            vec![0, 2, 0, 0, 0, 0, 0, 1, 0, 9, 0x13, 0x88]
        );
    }

    #[test]
    fn test_numeric_beyond_decimal_range() {
        // 1e30 is a single group 100 at weight 7
        assert_eq!(
            encode(TypedValue::Float(1e30), &Type::NUMERIC).unwrap(),
            vec![0, 1, 0, 7, 0, 0, 0, 0, 0, 100]
        );
        assert_eq!(
            encode(TypedValue::Float(f64::NAN), &Type::NUMERIC).unwrap(),
            vec![0, 0, 0, 0, 0xC0, 0, 0, 0]
        );
        let forty_digits = format!("1{}", "0".repeat(39));
        assert!(encode(TypedValue::Text(forty_digits), &Type::NUMERIC).is_ok());
        assert_eq!(
            encode(TypedValue::Integer(i64::MAX), &Type::NUMERIC).unwrap()[..4],
            [0, 5, 0, 4]
        );
        assert!(encode(TypedValue::Text("12abc".into()), &Type::NUMERIC).is_err());
    }

    #[test]
    fn test_text_passes_through_for_text_types() {
        for ty in [Type::TEXT, Type::VARCHAR, Type::BPCHAR, Type::NAME] {
            assert_eq!(
                encode(TypedValue::Text("ann".into()), &ty).unwrap(),
                b"ann".to_vec()
            );
        }
    }

    #[test]
    fn test_text_parsed_into_typed_columns() {
        assert_eq!(
            encode(TypedValue::Text("true".into()), &Type::BOOL).unwrap(),
            vec![1]
        );
        assert_eq!(
            encode(TypedValue::Text(" 12 ".into()), &Type::INT8).unwrap(),
            12i64.to_be_bytes().to_vec()
        );
        assert!(encode(TypedValue::Text("2024-01-31".into()), &Type::DATE).is_ok());
        assert!(encode(TypedValue::Text("2024-01-31 10:00:00".into()), &Type::TIMESTAMP).is_ok());
        assert!(encode(
            TypedValue::Text("2024-01-31T10:00:00+02:00".into()),
            &Type::TIMESTAMPTZ
        )
        .is_ok());
        assert!(encode(
            TypedValue::Text("67e55044-10b1-426f-9247-bb680e5fe0c8".into()),
            &Type::UUID
        )
        .is_ok());
        assert!(encode(TypedValue::Text("{\"a\": 1}".into()), &Type::JSONB).is_ok());
    }

    #[test]
    fn test_unparsable_text_is_an_error() {
        assert!(encode(TypedValue::Text("maybe".into()), &Type::BOOL).is_err());
        assert!(encode(TypedValue::Text("31/01/2024".into()), &Type::DATE).is_err());
        assert!(encode(TypedValue::Text("not-a-uuid".into()), &Type::UUID).is_err());
        assert!(encode(TypedValue::Text("x".into()), &Type::POINT).is_err());
    }

    #[test]
    fn test_bytea_hex_and_raw() {
        assert_eq!(
            encode(TypedValue::Text("\\x01ff".into()), &Type::BYTEA).unwrap(),
            vec![0x01, 0xff]
        );
        assert_eq!(
            encode(TypedValue::Text("ab".into()), &Type::BYTEA).unwrap(),
            b"ab".to_vec()
        );
    }

    #[test]
    fn test_time_formats() {
        assert_eq!(parse_time("10:30").unwrap(), NaiveTime::from_hms_opt(10, 30, 0).unwrap());
        assert!(parse_time("10:30:15.5").is_ok());
        assert_eq!(
            parse_timestamp("2024-01-31").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }
}
