use std::fmt;
use std::str::FromStr;

use bytemuck::{Pod, Zeroable};

use crate::core::DbfError;

use super::layout::{DATE_LEN, DESCRIPTOR_LEN, LOGICAL_LEN, NAME_LEN, TERMINATOR};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Character,
    Numeric,
    Float,
    Date,
    Logical,
}

impl FieldType {
    pub fn tag(self) -> u8 {
        match self {
            FieldType::Character => b'C',
            FieldType::Numeric => b'N',
            FieldType::Float => b'F',
            FieldType::Date => b'D',
            FieldType::Logical => b'L',
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag.to_ascii_uppercase() {
            b'C' => Some(FieldType::Character),
            b'N' => Some(FieldType::Numeric),
            b'F' => Some(FieldType::Float),
            b'D' => Some(FieldType::Date),
            b'L' => Some(FieldType::Logical),
            _ => None,
        }
    }

    /// Width forced by the type, if any.
    pub fn fixed_length(self) -> Option<u8> {
        match self {
            FieldType::Date => Some(DATE_LEN),
            FieldType::Logical => Some(LOGICAL_LEN),
            _ => None,
        }
    }

    /// Character values are left-justified on disk, everything else right-justified.
    pub fn left_justified(self) -> bool {
        matches!(self, FieldType::Character)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag() as char)
    }
}

impl FromStr for FieldType {
    type Err = DbfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = match s.to_ascii_lowercase().as_str() {
            "c" | "character" | "char" => Some(FieldType::Character),
            "n" | "numeric" => Some(FieldType::Numeric),
            "f" | "float" => Some(FieldType::Float),
            "d" | "date" => Some(FieldType::Date),
            "l" | "logical" | "bool" => Some(FieldType::Logical),
            _ => None,
        };
        parsed.ok_or_else(|| DbfError::SchemaError(format!("unknown field type '{s}'")))
    }
}

#[derive(Clone, Copy, Pod, Zeroable)]
#[repr(C)]
struct RawDescriptor {
    name: [u8; 11],
    type_tag: u8,
    stored_offset: [u8; 4],
    length: u8,
    decimal: u8,
    reserved: [u8; 14],
}

const _: () = assert!(std::mem::size_of::<RawDescriptor>() == DESCRIPTOR_LEN);

/// Metadata for one column. Immutable once the table exists.
#[derive(Debug, Clone, PartialEq, Eq)]
///
/// Only built by schema validation or by decoding a descriptor, so the name
/// always fits the 11-byte single-byte slot.
pub struct FieldDescriptor {
    pub(crate) name: String,
    pub(crate) field_type: FieldType,
    /// Offset recorded on disk. Kept for fidelity; access uses cumulative lengths.
    pub(crate) stored_offset: u32,
    pub(crate) length: u8,
    pub(crate) decimal: u8,
    pub(crate) reserved: [u8; 14],
}

impl FieldDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Width in bytes inside a record.
    pub fn length(&self) -> u8 {
        self.length
    }

    pub fn decimal(&self) -> u8 {
        self.decimal
    }

    pub fn stored_offset(&self) -> u32 {
        self.stored_offset
    }

    /// A descriptor slot that ends the table rather than describing a field.
    pub(crate) fn is_end_marker(bytes: &[u8]) -> bool {
        match bytes.first() {
            None => true,
            Some(&b) => b == 0 || b == TERMINATOR,
        }
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, DbfError> {
        if bytes.len() != DESCRIPTOR_LEN {
            return Err(DbfError::FormatError(format!(
                "field descriptor must be {DESCRIPTOR_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        let raw: &RawDescriptor = bytemuck::from_bytes(bytes);

        let name_end = raw.name.iter().position(|&b| b == 0).unwrap_or(NAME_LEN);
        let name: String = raw.name[..name_end].iter().map(|&b| b as char).collect();
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(DbfError::FormatError("field name: empty".into()));
        }

        let field_type = FieldType::from_tag(raw.type_tag).ok_or_else(|| {
            DbfError::FormatError(format!(
                "field '{name}' type: unsupported tag {:?}",
                raw.type_tag as char
            ))
        })?;

        let descriptor = Self {
            name,
            field_type,
            stored_offset: u32::from_le_bytes(raw.stored_offset),
            length: raw.length,
            decimal: raw.decimal,
            reserved: raw.reserved,
        };
        descriptor.validate_length()?;
        Ok(descriptor)
    }

    pub fn encode(&self) -> [u8; DESCRIPTOR_LEN] {
        debug_assert!(self.name.chars().count() <= NAME_LEN);
        let mut name = [0u8; NAME_LEN];
        for (slot, ch) in name.iter_mut().zip(self.name.chars()) {
            *slot = ch as u32 as u8;
        }
        let raw = RawDescriptor {
            name,
            type_tag: self.field_type.tag(),
            stored_offset: self.stored_offset.to_le_bytes(),
            length: self.length,
            decimal: self.decimal,
            reserved: self.reserved,
        };
        let mut out = [0u8; DESCRIPTOR_LEN];
        out.copy_from_slice(bytemuck::bytes_of(&raw));
        out
    }

    fn validate_length(&self) -> Result<(), DbfError> {
        if self.length == 0 {
            return Err(DbfError::FormatError(format!(
                "field '{}' length: must be at least 1",
                self.name
            )));
        }
        if let Some(fixed) = self.field_type.fixed_length() {
            if self.length != fixed {
                return Err(DbfError::FormatError(format!(
                    "field '{}' length: {} fields are {} bytes wide, got {}",
                    self.name, self.field_type, fixed, self.length
                )));
            }
        }
        Ok(())
    }
}

/// Field definition handed to `TableFile::create`.
///
/// Parses from `name:TYPE[:LENGTH[:DECIMALS]]`, e.g. `name:C:50` or `born:D`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub field_type: FieldType,
    pub length: u8,
    pub decimal: u8,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, field_type: FieldType, length: u8, decimal: u8) -> Self {
        Self {
            name: name.into(),
            field_type,
            length,
            decimal,
        }
    }

    pub fn character(name: impl Into<String>, length: u8) -> Self {
        Self::new(name, FieldType::Character, length, 0)
    }

    pub fn numeric(name: impl Into<String>, length: u8, decimal: u8) -> Self {
        Self::new(name, FieldType::Numeric, length, decimal)
    }

    pub fn float(name: impl Into<String>, length: u8, decimal: u8) -> Self {
        Self::new(name, FieldType::Float, length, decimal)
    }

    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Date, DATE_LEN, 0)
    }

    pub fn logical(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Logical, LOGICAL_LEN, 0)
    }

    /// Validate a whole field list and build descriptors with their stored offsets.
    pub(crate) fn to_descriptors(specs: &[FieldSpec]) -> Result<Vec<FieldDescriptor>, DbfError> {
        if specs.is_empty() {
            return Err(DbfError::SchemaError("at least one field is required".into()));
        }
        let mut descriptors: Vec<FieldDescriptor> = Vec::with_capacity(specs.len());
        // offset 0 is the tombstone byte
        let mut offset: u32 = 1;
        for spec in specs {
            spec.validate()?;
            if descriptors
                .iter()
                .any(|d| d.name.eq_ignore_ascii_case(&spec.name))
            {
                return Err(DbfError::SchemaError(format!(
                    "duplicate field name '{}'",
                    spec.name
                )));
            }
            descriptors.push(FieldDescriptor {
                name: spec.name.clone(),
                field_type: spec.field_type,
                stored_offset: offset,
                length: spec.length,
                decimal: spec.decimal,
                reserved: [0; 14],
            });
            offset += spec.length as u32;
        }
        Ok(descriptors)
    }

    fn validate(&self) -> Result<(), DbfError> {
        let name = &self.name;
        if name.is_empty() || name.len() > NAME_LEN {
            return Err(DbfError::SchemaError(format!(
                "field name '{name}' must be 1-{NAME_LEN} bytes"
            )));
        }
        if !name.bytes().all(|b| b.is_ascii_graphic()) {
            return Err(DbfError::SchemaError(format!(
                "field name '{name}' must be printable ASCII without spaces"
            )));
        }
        if self.length == 0 {
            return Err(DbfError::SchemaError(format!(
                "field '{name}' must have a length of at least 1"
            )));
        }
        if let Some(fixed) = self.field_type.fixed_length() {
            if self.length != fixed {
                return Err(DbfError::SchemaError(format!(
                    "field '{name}' of type {} must be {fixed} bytes, got {}",
                    self.field_type, self.length
                )));
            }
        }
        Ok(())
    }
}

impl FromStr for FieldSpec {
    type Err = DbfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() < 2 || parts.len() > 4 {
            return Err(DbfError::SchemaError(format!(
                "expected name:TYPE[:LENGTH[:DECIMALS]], got '{s}'"
            )));
        }
        let field_type: FieldType = parts[1].parse()?;
        let number = |text: &str, what: &str| {
            text.parse::<u8>().map_err(|_| {
                DbfError::SchemaError(format!("invalid {what} '{text}' in '{s}'"))
            })
        };
        let length = match (parts.get(2).copied(), field_type.fixed_length()) {
            (Some(text), _) => number(text, "length")?,
            (None, Some(fixed)) => fixed,
            (None, None) => {
                return Err(DbfError::SchemaError(format!(
                    "field type {field_type} needs a length in '{s}'"
                )));
            }
        };
        let decimal = match parts.get(3).copied() {
            Some(text) => number(text, "decimal count")?,
            None => 0,
        };
        Ok(FieldSpec::new(parts[0], field_type, length, decimal))
    }
}
