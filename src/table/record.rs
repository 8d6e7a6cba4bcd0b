use std::ops::Index;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::core::DbfError;

use super::Value;

/// One decoded row: field values in declared order plus the tombstone flag.
///
/// A record's identity is its position in the table, which compaction
/// renumbers.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub deleted: bool,
    values: Vec<(String, Value)>,
}

impl Record {
    pub fn new(deleted: bool, values: Vec<(String, Value)>) -> Self {
        Self { deleted, values }
    }

    /// Look a value up by field name, exact match first, then ignoring case.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.position(name).map(|i| &self.values[i].1)
    }

    /// Replace the value of an existing field.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), DbfError> {
        let i = self
            .position(name)
            .ok_or_else(|| DbfError::UnknownField(name.to_string()))?;
        self.values[i].1 = value.into();
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.values
            .iter()
            .position(|(n, _)| n == name)
            .or_else(|| {
                self.values
                    .iter()
                    .position(|(n, _)| n.eq_ignore_ascii_case(name))
            })
    }
}

impl Index<&str> for Record {
    type Output = Value;

    fn index(&self, name: &str) -> &Value {
        match self.get(name) {
            Some(v) => v,
            None => panic!("no field named '{name}' in record"),
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len() + 1))?;
        for (name, value) in &self.values {
            map.serialize_entry(name, value)?;
        }
        map.serialize_entry("deleted", &self.deleted)?;
        map.end()
    }
}
