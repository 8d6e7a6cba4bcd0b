//! Test and benchmark utilities.
//!
//! This module is only available when the `testutil` feature is enabled.

use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::{DbfError, FixedClock};
use crate::format::{FieldDescriptor, FieldSpec, FieldType};
use crate::table::{TableFile, TableOptions, Value};

/// Date every fixture table is stamped with.
pub fn fixture_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 15).unwrap_or_default()
}

/// Options with a [`FixedClock`] on [`fixture_date`].
pub fn fixed_options() -> TableOptions {
    TableOptions {
        clock: Arc::new(FixedClock(fixture_date())),
        sync_writes: false,
    }
}

/// `name: Character(50)`, `age: Numeric(3)`.
pub fn people_fields() -> Vec<FieldSpec> {
    vec![FieldSpec::character("name", 50), FieldSpec::numeric("age", 3, 0)]
}

/// One field of every supported type.
pub fn mixed_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::character("name", 16),
        FieldSpec::numeric("qty", 6, 0),
        FieldSpec::float("price", 10, 2),
        FieldSpec::date("added"),
        FieldSpec::logical("active"),
    ]
}

/// A people table holding `("John Doe", 30)` and `("Jane Doe", 25)`.
pub fn create_people(path: &Path) -> Result<TableFile, DbfError> {
    let mut table = TableFile::create_with(path, &people_fields(), fixed_options())?;
    table.append(&[Value::from("John Doe"), Value::Numeric(30)])?;
    table.append(&[Value::from("Jane Doe"), Value::Numeric(25)])?;
    Ok(table)
}

/// Deterministic random rows that fit `fields`.
pub struct RowGenerator {
    rng: StdRng,
}

impl RowGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn row(&mut self, fields: &[FieldDescriptor]) -> Vec<Value> {
        fields.iter().map(|f| self.value(f)).collect()
    }

    pub fn value(&mut self, field: &FieldDescriptor) -> Value {
        match field.field_type {
            FieldType::Character => {
                let len = self.rng.gen_range(0..=field.length as usize);
                let text: String = (0..len)
                    .map(|_| self.rng.gen_range(b'a'..=b'z') as char)
                    .collect();
                Value::Character(text)
            }
            FieldType::Numeric => {
                // leave room for a minus sign
                let digits = (field.length as u32).saturating_sub(1).min(18);
                let bound = 10i64.pow(digits);
                Value::Numeric(self.rng.gen_range(-bound + 1..bound))
            }
            FieldType::Float => {
                let digits = (field.length as u32).saturating_sub(4).min(12);
                let bound = 10i64.pow(digits);
                let cents = self.rng.gen_range(0..bound * 100);
                Value::Float(cents as f64 / 100.0)
            }
            FieldType::Date => {
                let offset = self.rng.gen_range(0..36_500);
                let base = NaiveDate::from_ymd_opt(1950, 1, 1).unwrap_or_default();
                Value::Date(base + chrono::Duration::days(offset))
            }
            FieldType::Logical => Value::Logical(self.rng.r#gen()),
        }
    }
}

/// Create a table of `fields` at `path` holding `rows` random records.
pub fn generate_table(
    path: &Path,
    fields: &[FieldSpec],
    rows: usize,
    seed: u64,
) -> Result<TableFile, DbfError> {
    let mut table = TableFile::create_with(path, fields, fixed_options())?;
    let mut generator = RowGenerator::new(seed);
    let descriptors = table.fields().to_vec();
    for _ in 0..rows {
        table.append(&generator.row(&descriptors))?;
    }
    Ok(table)
}
