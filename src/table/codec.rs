//! Fixed-width text encoding of field values.
//!
//! | type      | width    | on disk                          |
//! |-----------|----------|----------------------------------|
//! | Character | `length` | left-justified, space padded     |
//! | Numeric   | `length` | right-justified integer text     |
//! | Float     | `length` | right-justified decimal text     |
//! | Date      | 8        | `YYYYMMDD`                       |
//! | Logical   | 1        | `0x01` true, any zero byte false |

use chrono::{Datelike, NaiveDate};

use crate::core::DbfError;
use crate::format::layout::{ACTIVE, DELETED};
use crate::format::{FieldDescriptor, FieldType};

use super::{Record, Value};

/// Decode one field from exactly `field.length` bytes.
pub fn decode_value(field: &FieldDescriptor, raw: &[u8]) -> Result<Value, DbfError> {
    match field.field_type {
        FieldType::Character => {
            let text: String = raw.iter().map(|&b| b as char).collect();
            let trimmed = text.trim_matches(|c: char| c == '\0' || c.is_whitespace());
            Ok(Value::Character(trimmed.to_string()))
        }
        FieldType::Numeric => {
            let text = ascii_text(field, raw)?;
            text.trim()
                .parse::<i64>()
                .map(Value::Numeric)
                .map_err(|e| DbfError::decode(&field.name, raw, e.to_string()))
        }
        FieldType::Float => {
            let text = ascii_text(field, raw)?;
            text.trim()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|e| DbfError::decode(&field.name, raw, e.to_string()))
        }
        FieldType::Date => {
            let text = ascii_text(field, raw)?;
            if text.len() != 8 || !text.bytes().all(|b| b.is_ascii_digit()) {
                return Err(DbfError::decode(&field.name, raw, "expected YYYYMMDD"));
            }
            NaiveDate::parse_from_str(text, "%Y%m%d")
                .map(Value::Date)
                .map_err(|e| DbfError::decode(&field.name, raw, e.to_string()))
        }
        FieldType::Logical => Ok(Value::Logical(raw.iter().any(|&b| b != 0))),
    }
}

/// Append the fixed-width form of `value` to `out`. Nothing is appended on error.
pub fn encode_value(
    field: &FieldDescriptor,
    value: &Value,
    out: &mut Vec<u8>,
) -> Result<(), DbfError> {
    let width = field.length as usize;
    match (field.field_type, value) {
        (FieldType::Character, Value::Character(s)) => {
            let mut bytes = Vec::with_capacity(width);
            for ch in s.chars() {
                let code = ch as u32;
                if code > 0xFF {
                    return Err(DbfError::encode(
                        &field.name,
                        format!("character {ch:?} is outside the single-byte charset"),
                    ));
                }
                bytes.push(code as u8);
            }
            if bytes.len() > width {
                return Err(DbfError::encode(
                    &field.name,
                    format!("{} bytes do not fit in width {width}", bytes.len()),
                ));
            }
            bytes.resize(width, b' ');
            out.extend_from_slice(&bytes);
        }
        (FieldType::Numeric, Value::Numeric(n)) => right_justify(field, &n.to_string(), out)?,
        (FieldType::Float, Value::Float(v)) => {
            if !v.is_finite() {
                return Err(DbfError::encode(&field.name, format!("{v} is not finite")));
            }
            right_justify(field, &v.to_string(), out)?
        }
        (FieldType::Float, Value::Numeric(n)) => right_justify(field, &n.to_string(), out)?,
        (FieldType::Date, Value::Date(d)) => {
            if !(0..=9999).contains(&d.year()) {
                return Err(DbfError::encode(
                    &field.name,
                    format!("year {} cannot be written as YYYY", d.year()),
                ));
            }
            out.extend_from_slice(d.format("%Y%m%d").to_string().as_bytes());
        }
        (FieldType::Logical, Value::Logical(b)) => out.push(if *b { 0x01 } else { 0x00 }),
        (expected, other) => {
            return Err(DbfError::encode(
                &field.name,
                format!("expected a {expected:?} value, got {:?}", other.field_type()),
            ));
        }
    }
    Ok(())
}

/// Decode a full record image: tombstone byte followed by the fields in order.
pub(crate) fn decode_record(fields: &[FieldDescriptor], bytes: &[u8]) -> Result<Record, DbfError> {
    let deleted = bytes.first() == Some(&DELETED);
    let mut pos = 1;
    let mut values = Vec::with_capacity(fields.len());
    for field in fields {
        let end = pos + field.length as usize;
        let raw = bytes.get(pos..end).ok_or_else(|| {
            DbfError::FormatError(format!(
                "record image of {} bytes is too short for field '{}'",
                bytes.len(),
                field.name
            ))
        })?;
        values.push((field.name.clone(), decode_value(field, raw)?));
        pos = end;
    }
    Ok(Record::new(deleted, values))
}

/// Encode a full record image of `record_size` bytes. Bytes past the last
/// field, if the header declares any, are filled with spaces.
pub(crate) fn encode_record(
    fields: &[FieldDescriptor],
    record_size: usize,
    deleted: bool,
    values: &[&Value],
) -> Result<Vec<u8>, DbfError> {
    if values.len() != fields.len() {
        return Err(DbfError::ArityError {
            expected: fields.len(),
            got: values.len(),
        });
    }
    let mut out = Vec::with_capacity(record_size);
    out.push(if deleted { DELETED } else { ACTIVE });
    for (field, value) in fields.iter().zip(values) {
        encode_value(field, value, &mut out)?;
    }
    out.resize(record_size, b' ');
    Ok(out)
}

fn right_justify(field: &FieldDescriptor, text: &str, out: &mut Vec<u8>) -> Result<(), DbfError> {
    let width = field.length as usize;
    if text.len() > width {
        return Err(DbfError::encode(
            &field.name,
            format!("'{text}' does not fit in width {width}"),
        ));
    }
    out.extend(std::iter::repeat_n(b' ', width - text.len()));
    out.extend_from_slice(text.as_bytes());
    Ok(())
}

fn ascii_text<'a>(field: &FieldDescriptor, raw: &'a [u8]) -> Result<&'a str, DbfError> {
    std::str::from_utf8(raw)
        .ok()
        .filter(|s| s.is_ascii())
        .ok_or_else(|| DbfError::decode(&field.name, raw, "non-ASCII bytes in text field"))
}
