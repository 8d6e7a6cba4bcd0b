use std::borrow::Cow;

use crate::core::DbfError;
use crate::format::FieldType;
use crate::table::{Record, Value};

use super::compare::{Comparator, equals, istartswith};
use super::source::RecordSource;

/// Name of the synthetic key every record carries besides its fields.
pub const DELETED_KEY: &str = "deleted";

enum Key {
    Field(String, FieldType),
    Deleted,
}

impl Key {
    fn value<'r>(&self, record: &'r Record) -> Option<Cow<'r, Value>> {
        match self {
            Key::Field(name, _) => record.get(name).map(Cow::Borrowed),
            Key::Deleted => Some(Cow::Owned(Value::Logical(record.deleted))),
        }
    }
}

/// Linear scans over any [`RecordSource`].
///
/// `field` is matched case-insensitively against the schema, then against
/// `deleted`. Without an explicit comparator, Character fields match by
/// case-insensitive prefix and Numeric, Float and Date fields by equality;
/// Logical fields and `deleted` need a comparator. Deleted records are
/// scanned like any other.
pub trait Search: RecordSource {
    /// First match at or after `start`, with its index.
    fn search(
        &mut self,
        field: &str,
        value: &Value,
        start: usize,
        cmp: Option<&Comparator>,
    ) -> Result<Option<(usize, Record)>, DbfError> {
        let key = resolve_key(&*self, field)?;
        let cmp = pick_comparator(&key, field, value, cmp)?;
        for index in start..self.len() {
            let record = self.record(index)?;
            let matched = key.value(&record).is_some_and(|have| cmp(&*have, value));
            if matched {
                return Ok(Some((index, record)));
            }
        }
        Ok(None)
    }

    fn find(
        &mut self,
        field: &str,
        value: &Value,
        cmp: Option<&Comparator>,
    ) -> Result<Option<Record>, DbfError> {
        Ok(self.search(field, value, 0, cmp)?.map(|(_, record)| record))
    }

    fn index_of(
        &mut self,
        field: &str,
        value: &Value,
        cmp: Option<&Comparator>,
    ) -> Result<Option<usize>, DbfError> {
        Ok(self.search(field, value, 0, cmp)?.map(|(index, _)| index))
    }

    /// Indices of every match, ascending.
    fn positions(
        &mut self,
        field: &str,
        value: &Value,
        cmp: Option<&Comparator>,
    ) -> Result<Vec<usize>, DbfError> {
        Ok(self
            .matches(field, value, cmp)?
            .into_iter()
            .map(|(index, _)| index)
            .collect())
    }

    /// Every matching record, in index order.
    fn filter(
        &mut self,
        field: &str,
        value: &Value,
        cmp: Option<&Comparator>,
    ) -> Result<Vec<Record>, DbfError> {
        Ok(self
            .matches(field, value, cmp)?
            .into_iter()
            .map(|(_, record)| record)
            .collect())
    }

    fn matches(
        &mut self,
        field: &str,
        value: &Value,
        cmp: Option<&Comparator>,
    ) -> Result<Vec<(usize, Record)>, DbfError> {
        let mut found = Vec::new();
        let mut start = 0;
        while let Some((index, record)) = self.search(field, value, start, cmp)? {
            found.push((index, record));
            start = index + 1;
        }
        Ok(found)
    }
}

impl<T: RecordSource + ?Sized> Search for T {}

fn resolve_key<S: RecordSource + ?Sized>(source: &S, field: &str) -> Result<Key, DbfError> {
    let name = field.trim();
    if let Some(f) = source
        .fields()
        .iter()
        .find(|f| f.name.eq_ignore_ascii_case(name))
    {
        return Ok(Key::Field(f.name.clone(), f.field_type));
    }
    if name.eq_ignore_ascii_case(DELETED_KEY) {
        return Ok(Key::Deleted);
    }
    Err(DbfError::UnknownField(field.to_string()))
}

fn pick_comparator<'c>(
    key: &Key,
    field: &str,
    value: &Value,
    cmp: Option<&'c Comparator>,
) -> Result<&'c Comparator, DbfError> {
    if let Some(cmp) = cmp {
        return Ok(cmp);
    }
    let field_type = match key {
        Key::Field(_, field_type) => *field_type,
        Key::Deleted => {
            return Err(DbfError::UnsupportedComparison(format!(
                "'{DELETED_KEY}' has no default comparator"
            )));
        }
    };
    let compatible = match field_type {
        FieldType::Character => matches!(value, Value::Character(_)),
        FieldType::Numeric | FieldType::Float => {
            matches!(value, Value::Numeric(_) | Value::Float(_))
        }
        FieldType::Date => matches!(value, Value::Date(_)),
        FieldType::Logical => {
            return Err(DbfError::UnsupportedComparison(format!(
                "logical field '{field}' has no default comparator"
            )));
        }
    };
    if !compatible {
        return Err(DbfError::UnsupportedComparison(format!(
            "cannot compare {field_type:?} field '{field}' with a {:?} value",
            value.field_type()
        )));
    }
    let default: &'static Comparator = match field_type {
        FieldType::Character => &istartswith,
        _ => &equals,
    };
    Ok(default)
}
