use bytemuck::{Pod, Zeroable};
use chrono::{Datelike, NaiveDate};

use crate::core::DbfError;

use super::layout::{DEFAULT_VERSION, HEADER_LEN, VERSION_FAMILY};

/// On-disk image of the 32-byte file header. Multi-byte integers are kept as
/// little-endian byte arrays so the struct has no padding and alignment 1.
#[derive(Clone, Copy, Pod, Zeroable)]
#[repr(C)]
struct RawHeader {
    version: u8,
    year: u8,
    month: u8,
    day: u8,
    record_count: [u8; 4],
    header_size: [u8; 2],
    record_size: [u8; 2],
    reserved: [u8; 20],
}

const _: () = assert!(std::mem::size_of::<RawHeader>() == HEADER_LEN);

/// Last-modified stamp as stored: years since 1900, month, day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastModified {
    pub year: u8,
    pub month: u8,
    pub day: u8,
}

impl LastModified {
    pub fn from_date(date: NaiveDate) -> Result<Self, DbfError> {
        let year = u8::try_from(date.year() - 1900).map_err(|_| {
            DbfError::FormatError(format!(
                "year {} cannot be stored (supported range 1900-2155)",
                date.year()
            ))
        })?;
        Ok(Self {
            year,
            month: date.month() as u8,
            day: date.day() as u8,
        })
    }

    /// Calendar date, if the stored triple names a real day.
    pub fn to_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(1900 + self.year as i32, self.month as u32, self.day as u32)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub version: u8,
    pub last_modified: LastModified,
    /// Logical records, soft-deleted ones included.
    pub record_count: u32,
    pub header_size: u16,
    pub record_size: u16,
    /// Opaque, preserved verbatim across rewrites.
    pub reserved: [u8; 20],
}

impl Header {
    pub(crate) fn new(
        header_size: u16,
        record_size: u16,
        last_modified: LastModified,
    ) -> Self {
        Self {
            version: DEFAULT_VERSION,
            last_modified,
            record_count: 0,
            header_size,
            record_size,
            reserved: [0; 20],
        }
    }

    /// Number of descriptor slots the header size leaves room for.
    pub fn field_slots(&self) -> usize {
        (self.header_size as usize - HEADER_LEN) / 32
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, DbfError> {
        if bytes.len() != HEADER_LEN {
            return Err(DbfError::FormatError(format!(
                "header must be {HEADER_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        let raw: &RawHeader = bytemuck::from_bytes(bytes);
        let header = Self {
            version: raw.version,
            last_modified: LastModified {
                year: raw.year,
                month: raw.month,
                day: raw.day,
            },
            record_count: u32::from_le_bytes(raw.record_count),
            header_size: u16::from_le_bytes(raw.header_size),
            record_size: u16::from_le_bytes(raw.record_size),
            reserved: raw.reserved,
        };
        header.validate()?;
        Ok(header)
    }

    pub fn encode(&self) -> [u8; HEADER_LEN] {
        let raw = RawHeader {
            version: self.version,
            year: self.last_modified.year,
            month: self.last_modified.month,
            day: self.last_modified.day,
            record_count: self.record_count.to_le_bytes(),
            header_size: self.header_size.to_le_bytes(),
            record_size: self.record_size.to_le_bytes(),
            reserved: self.reserved,
        };
        let mut out = [0u8; HEADER_LEN];
        out.copy_from_slice(bytemuck::bytes_of(&raw));
        out
    }

    pub fn validate(&self) -> Result<(), DbfError> {
        if self.version & 0b111 != VERSION_FAMILY {
            return Err(DbfError::FormatError(format!(
                "version: expected dBase III family (low bits = 3), got {:#04x}",
                self.version
            )));
        }
        let LastModified { month, day, .. } = self.last_modified;
        if !(1..=12).contains(&month) {
            return Err(DbfError::FormatError(format!(
                "month: expected 1-12, got {month}"
            )));
        }
        if !(1..=31).contains(&day) {
            return Err(DbfError::FormatError(format!(
                "day: expected 1-31, got {day}"
            )));
        }
        if (self.header_size as usize) < HEADER_LEN + 1 {
            return Err(DbfError::FormatError(format!(
                "header_size: expected at least {}, got {}",
                HEADER_LEN + 1,
                self.header_size
            )));
        }
        if self.record_size == 0 {
            return Err(DbfError::FormatError(
                "record_size: must include the tombstone byte".into(),
            ));
        }
        Ok(())
    }
}
