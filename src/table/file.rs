use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info, warn};
use tempfile::NamedTempFile;

use crate::core::{Clock, DbfError, SystemClock};
use crate::format::layout::{
    self, ACTIVE, DELETED, DESCRIPTOR_LEN, HEADER_LEN, TERMINATOR,
};
use crate::format::{FieldDescriptor, FieldSpec, Header, LastModified};

use super::codec::{decode_record, encode_record};
use super::{Record, Value, slice};

/// Runtime knobs for an open table.
#[derive(Clone)]
pub struct TableOptions {
    /// Supplies the date stamped into the header by `create` and `append`.
    pub clock: Arc<dyn Clock>,
    /// `fsync` after every mutation instead of only flushing.
    pub sync_writes: bool,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            clock: Arc::new(SystemClock),
            sync_writes: false,
        }
    }
}

impl fmt::Debug for TableOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableOptions")
            .field("today", &self.clock.today())
            .field("sync_writes", &self.sync_writes)
            .finish()
    }
}

/// An open dBase III table.
///
/// Owns its file handle exclusively. Only one `TableFile` (in one process)
/// may have a given path open for writing at a time; nothing here locks.
///
/// Layout: `[header 32][descriptor 32 × n][0x0D][record × record_count]`,
/// every record `record_size` bytes starting with a tombstone byte.
pub struct TableFile {
    path: PathBuf,
    file: File,
    header: Header,
    fields: Vec<FieldDescriptor>,
    options: TableOptions,
}

impl TableFile {
    /// Create a new, empty table at `path`. Fails with `AlreadyExists` if
    /// anything is already there, leaving it untouched.
    pub fn create(path: impl AsRef<Path>, specs: &[FieldSpec]) -> Result<Self, DbfError> {
        Self::create_with(path, specs, TableOptions::default())
    }

    pub fn create_with(
        path: impl AsRef<Path>,
        specs: &[FieldSpec],
        options: TableOptions,
    ) -> Result<Self, DbfError> {
        let path = path.as_ref();
        let fields = FieldSpec::to_descriptors(specs)?;

        let header_size = u16::try_from(layout::header_size_for(fields.len())).map_err(|_| {
            DbfError::SchemaError(format!("{} fields do not fit in one header", fields.len()))
        })?;
        let data_len: usize = 1 + fields.iter().map(|f| f.length as usize).sum::<usize>();
        let record_size = u16::try_from(data_len).map_err(|_| {
            DbfError::SchemaError(format!("record of {data_len} bytes exceeds 65535"))
        })?;
        let stamp = LastModified::from_date(options.clock.today())?;
        let header = Header::new(header_size, record_size, stamp);

        let mut image = Vec::with_capacity(header_size as usize);
        image.extend_from_slice(&header.encode());
        for field in &fields {
            image.extend_from_slice(&field.encode());
        }
        image.push(TERMINATOR);

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| match e.kind() {
                io::ErrorKind::AlreadyExists => DbfError::AlreadyExists(path.display().to_string()),
                _ => DbfError::IoError(format!("creating {}: {}", path.display(), e)),
            })?;
        if let Err(e) = file.write_all(&image).and_then(|_| file.sync_all()) {
            drop(file);
            let _ = std::fs::remove_file(path);
            return Err(DbfError::IoError(format!("writing {}: {}", path.display(), e)));
        }
        drop(file);

        info!(
            "created table {} with {} fields, record size {}",
            path.display(),
            fields.len(),
            record_size
        );
        Self::open_with(path, options)
    }

    /// Open an existing table for reading and in-place updates.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DbfError> {
        Self::open_with(path, TableOptions::default())
    }

    pub fn open_with(path: impl AsRef<Path>, options: TableOptions) -> Result<Self, DbfError> {
        let path = path.as_ref();
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| DbfError::IoError(format!("opening {}: {}", path.display(), e)))?;
        let file_size = file.metadata()?.len();

        let mut buf = [0u8; HEADER_LEN];
        file.read_exact(&mut buf).map_err(|_| {
            DbfError::FormatError(format!(
                "file too small: {file_size} bytes, minimum {HEADER_LEN}"
            ))
        })?;
        let header = Header::decode(&buf)?;

        let mut fields = Vec::with_capacity(header.field_slots());
        let mut slot = [0u8; DESCRIPTOR_LEN];
        for i in 0..header.field_slots() {
            file.read_exact(&mut slot).map_err(|_| {
                DbfError::FormatError(format!("field descriptor table truncated at slot {i}"))
            })?;
            if FieldDescriptor::is_end_marker(&slot) {
                warn!(
                    "{}: descriptor table ends after {} of {} slots",
                    path.display(),
                    i,
                    header.field_slots()
                );
                break;
            }
            let field = FieldDescriptor::decode(&slot)?;
            if fields
                .iter()
                .any(|f: &FieldDescriptor| f.name.eq_ignore_ascii_case(&field.name))
            {
                return Err(DbfError::FormatError(format!(
                    "duplicate field name '{}'",
                    field.name
                )));
            }
            fields.push(field);
        }

        let data_len: usize = 1 + fields.iter().map(|f| f.length as usize).sum::<usize>();
        let record_size = header.record_size as usize;
        if data_len > record_size {
            return Err(DbfError::FormatError(format!(
                "record_size {record_size} is smaller than the {data_len} bytes the fields need"
            )));
        }
        if data_len < record_size {
            warn!(
                "{}: records carry {} bytes of padding",
                path.display(),
                record_size - data_len
            );
        }

        let expected = layout::expected_file_size(
            header.header_size,
            header.record_size,
            header.record_count,
        );
        if expected != file_size {
            return Err(DbfError::FormatError(format!(
                "file size {file_size} does not match header: {} + {} × {} = {expected}",
                header.header_size, header.record_size, header.record_count
            )));
        }

        let mut table = Self {
            path: path.to_path_buf(),
            file,
            header,
            fields,
            options,
        };
        table.check_terminator()?;
        debug!(
            "opened table {} ({} fields, {} records)",
            path.display(),
            table.fields.len(),
            table.header.record_count
        );
        Ok(table)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Field descriptors in declared order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Case-insensitive field lookup.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        let name = name.trim();
        self.fields.iter().find(|f| f.name.eq_ignore_ascii_case(name))
    }

    /// Number of records, soft-deleted ones included.
    pub fn len(&self) -> usize {
        self.header.record_count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.header.record_count == 0
    }

    /// Size the file has according to its header.
    pub fn file_size(&self) -> u64 {
        layout::expected_file_size(
            self.header.header_size,
            self.header.record_size,
            self.header.record_count,
        )
    }

    pub fn get(&mut self, index: usize) -> Result<Record, DbfError> {
        let raw = self.read_raw(index)?;
        decode_record(&self.fields, &raw)
    }

    /// Decode every record in order.
    pub fn records(&mut self) -> Records<'_> {
        Records {
            table: self,
            next: 0,
        }
    }

    pub fn all(&mut self) -> Result<Vec<Record>, DbfError> {
        self.records().collect()
    }

    /// Multi-record access; see [`slice::resolve`] for how the bounds are read.
    pub fn slice(
        &mut self,
        start: Option<i64>,
        stop: Option<i64>,
        step: Option<i64>,
    ) -> Result<Vec<Record>, DbfError> {
        slice::resolve(self.len(), start, stop, step)
            .into_iter()
            .map(|i| self.get(i))
            .collect()
    }

    /// Append a record built from `values` in field order. Returns its index.
    pub fn append(&mut self, values: &[Value]) -> Result<usize, DbfError> {
        let refs: Vec<&Value> = values.iter().collect();
        let image = encode_record(
            &self.fields,
            self.header.record_size as usize,
            false,
            &refs,
        )?;
        let index = self.len();
        let record_count = self.header.record_count.checked_add(1).ok_or_else(|| {
            DbfError::FormatError("record count would overflow 32 bits".into())
        })?;
        let stamp = LastModified::from_date(self.options.clock.today())?;

        let mut header = self.header.clone();
        header.record_count = record_count;
        header.last_modified = stamp;

        let offset =
            layout::record_offset(self.header.header_size, self.header.record_size, index);
        if let Err(e) = self.commit_append(offset, &image, &header) {
            if let Err(undo) = self.rollback_append(offset) {
                warn!(
                    "{}: rolling back failed append left the file inconsistent: {}",
                    self.path.display(),
                    undo
                );
            }
            return Err(e);
        }
        self.header = header;
        debug!("{}: appended record {}", self.path.display(), index);
        Ok(index)
    }

    fn commit_append(
        &mut self,
        offset: u64,
        image: &[u8],
        header: &Header,
    ) -> Result<(), DbfError> {
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(image)?;
        self.write_header(header)?;
        self.finish_write()
    }

    /// Cut the file back to `offset` and restore the header still held in
    /// memory.
    fn rollback_append(&mut self, offset: u64) -> Result<(), DbfError> {
        self.file.set_len(offset)?;
        let header = self.header.clone();
        self.write_header(&header)?;
        self.finish_write()
    }

    /// Overwrite record `index` in place and mark it active.
    pub fn update(&mut self, index: usize, record: &Record) -> Result<(), DbfError> {
        self.write_record(index, false, record)
    }

    /// Overwrite record `index` in place, keeping `record.deleted` as given.
    pub fn save(&mut self, index: usize, record: &Record) -> Result<(), DbfError> {
        self.write_record(index, record.deleted, record)
    }

    /// Set or clear the tombstone of record `index`. The bytes stay on disk
    /// until [`compact`](Self::compact).
    pub fn soft_delete(&mut self, index: usize, deleted: bool) -> Result<(), DbfError> {
        self.check_index(index)?;
        let offset =
            layout::record_offset(self.header.header_size, self.header.record_size, index);
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(&[if deleted { DELETED } else { ACTIVE }])?;
        self.finish_write()?;
        debug!(
            "{}: record {} marked {}",
            self.path.display(),
            index,
            if deleted { "deleted" } else { "active" }
        );
        Ok(())
    }

    pub fn is_deleted(&mut self, index: usize) -> Result<bool, DbfError> {
        self.check_index(index)?;
        let offset =
            layout::record_offset(self.header.header_size, self.header.record_size, index);
        self.file.seek(SeekFrom::Start(offset))?;
        let mut tombstone = [0u8; 1];
        self.file.read_exact(&mut tombstone)?;
        Ok(tombstone[0] == DELETED)
    }

    /// Drop soft-deleted records and rewrite the file in place.
    ///
    /// The new image is written to a temporary file beside the original and
    /// renamed over it, so an interruption leaves either the old or the new
    /// file. Consumes the table: record indices from before the call no
    /// longer name the same records.
    pub fn compact(self) -> Result<Self, DbfError> {
        let dest = self.path.clone();
        self.rewrite(&dest, true)
    }

    /// Like [`compact`](Self::compact) but writes to `dest`, leaving the
    /// original file as it is. The returned table refers to `dest`.
    pub fn compact_into(self, dest: impl AsRef<Path>) -> Result<Self, DbfError> {
        let dest = dest.as_ref();
        if dest.exists() {
            return Err(DbfError::AlreadyExists(dest.display().to_string()));
        }
        self.rewrite(dest, false)
    }

    /// Flush and close the file handle.
    pub fn close(self) -> Result<(), DbfError> {
        self.file.sync_all()?;
        Ok(())
    }

    /// Write the compacted image to a temporary file and move it to `dest`.
    /// Without `replace`, an existing `dest` is never overwritten.
    fn rewrite(mut self, dest: &Path, replace: bool) -> Result<Self, DbfError> {
        let dir = match dest.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let mut tmp = NamedTempFile::new_in(&dir)?;

        // header bytes past the fixed 32 (descriptors, terminator, anything
        // else the writer left there) are copied verbatim
        let mut preamble = vec![0u8; self.header.header_size as usize - HEADER_LEN];
        self.file.seek(SeekFrom::Start(HEADER_LEN as u64))?;
        self.file.read_exact(&mut preamble)?;

        let record_size = self.header.record_size as usize;
        let mut kept: u32 = 0;
        {
            let mut out = BufWriter::new(tmp.as_file_mut());
            out.write_all(&[0u8; HEADER_LEN])?;
            out.write_all(&preamble)?;

            let mut input = BufReader::new(&mut self.file);
            let mut image = vec![0u8; record_size];
            for _ in 0..self.header.record_count {
                input.read_exact(&mut image)?;
                if image[0] == DELETED {
                    continue;
                }
                image[0] = ACTIVE;
                out.write_all(&image)?;
                kept += 1;
            }
            out.flush()?;
        }

        let dropped = self.header.record_count - kept;
        let mut header = self.header.clone();
        header.record_count = kept;
        let tmp_file = tmp.as_file_mut();
        tmp_file.seek(SeekFrom::Start(0))?;
        tmp_file.write_all(&header.encode())?;
        tmp_file.sync_all()?;

        let TableFile {
            file,
            options,
            path,
            ..
        } = self;
        drop(file);
        if replace {
            tmp.persist(dest)?;
        } else {
            tmp.persist_noclobber(dest).map_err(|e| match e.error.kind() {
                io::ErrorKind::AlreadyExists => DbfError::AlreadyExists(dest.display().to_string()),
                _ => DbfError::from(e),
            })?;
        }

        info!(
            "compacted {} into {}: kept {} records, dropped {}",
            path.display(),
            dest.display(),
            kept,
            dropped
        );
        Self::open_with(dest, options)
    }

    fn write_record(
        &mut self,
        index: usize,
        deleted: bool,
        record: &Record,
    ) -> Result<(), DbfError> {
        self.check_index(index)?;
        let values = self
            .fields
            .iter()
            .map(|f| {
                record
                    .get(&f.name)
                    .ok_or_else(|| DbfError::encode(&f.name, "record has no value for this field"))
            })
            .collect::<Result<Vec<&Value>, DbfError>>()?;
        let image = encode_record(
            &self.fields,
            self.header.record_size as usize,
            deleted,
            &values,
        )?;
        let offset =
            layout::record_offset(self.header.header_size, self.header.record_size, index);
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(&image)?;
        self.finish_write()?;
        debug!("{}: rewrote record {}", self.path.display(), index);
        Ok(())
    }

    fn read_raw(&mut self, index: usize) -> Result<Vec<u8>, DbfError> {
        self.check_index(index)?;
        let offset =
            layout::record_offset(self.header.header_size, self.header.record_size, index);
        self.file.seek(SeekFrom::Start(offset))?;
        let mut image = vec![0u8; self.header.record_size as usize];
        self.file.read_exact(&mut image)?;
        Ok(image)
    }

    fn check_index(&self, index: usize) -> Result<(), DbfError> {
        if index >= self.len() {
            return Err(DbfError::IndexOutOfRange {
                index,
                count: self.len(),
            });
        }
        Ok(())
    }

    fn check_terminator(&mut self) -> Result<(), DbfError> {
        self.file
            .seek(SeekFrom::Start(self.header.header_size as u64 - 1))?;
        let mut byte = [0u8; 1];
        self.file.read_exact(&mut byte)?;
        if byte[0] != TERMINATOR {
            warn!(
                "{}: header does not end with 0x0D (found {:#04x})",
                self.path.display(),
                byte[0]
            );
        }
        Ok(())
    }

    fn write_header(&mut self, header: &Header) -> Result<(), DbfError> {
        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(&header.encode())?;
        Ok(())
    }

    fn finish_write(&mut self) -> Result<(), DbfError> {
        self.file.flush()?;
        if self.options.sync_writes {
            self.file.sync_data()?;
        }
        Ok(())
    }
}

impl fmt::Display for TableFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let modified = match self.header.last_modified.to_date() {
            Some(d) => d.format("%Y-%m-%d").to_string(),
            None => {
                let LastModified { year, month, day } = self.header.last_modified;
                format!("invalid ({}-{month:02}-{day:02})", 1900 + year as u32)
            }
        };
        writeln!(f, "File: {}", self.path.display())?;
        writeln!(f, "Size: {}", self.file_size())?;
        writeln!(f, "Last Modified: {modified}")?;
        write!(f, "Records: {}", self.header.record_count)
    }
}

/// Iterator over decoded records, in index order.
pub struct Records<'a> {
    table: &'a mut TableFile,
    next: usize,
}

impl Iterator for Records<'_> {
    type Item = Result<Record, DbfError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.table.len() {
            return None;
        }
        let item = self.table.get(self.next);
        self.next += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.table.len().saturating_sub(self.next);
        (left, Some(left))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FixedClock;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn options(y: i32, m: u32, d: u32) -> TableOptions {
        TableOptions {
            clock: Arc::new(FixedClock(NaiveDate::from_ymd_opt(y, m, d).unwrap())),
            sync_writes: false,
        }
    }

    fn people(dir: &TempDir) -> TableFile {
        TableFile::create_with(
            dir.path().join("people.dbf"),
            &[FieldSpec::character("name", 10), FieldSpec::numeric("age", 3, 0)],
            options(2024, 1, 15),
        )
        .unwrap()
    }

    fn size_on_disk(table: &TableFile) -> u64 {
        std::fs::metadata(table.path()).unwrap().len()
    }

    #[test]
    fn test_create_layout() {
        let dir = TempDir::new().unwrap();
        let table = people(&dir);
        let bytes = std::fs::read(table.path()).unwrap();

        assert_eq!(bytes.len(), 32 + 2 * 32 + 1);
        assert_eq!(bytes[0], 0x03);
        assert_eq!(&bytes[1..4], &[124, 1, 15]);
        assert_eq!(&bytes[4..8], &0u32.to_le_bytes());
        assert_eq!(&bytes[8..10], &97u16.to_le_bytes());
        assert_eq!(&bytes[10..12], &14u16.to_le_bytes());
        assert_eq!(&bytes[32..36], b"name");
        assert_eq!(bytes[43], b'C');
        assert_eq!(&bytes[64..67], b"age");
        assert_eq!(bytes[75], b'N');
        assert_eq!(bytes[96], TERMINATOR);
    }

    #[test]
    fn test_create_existing_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("taken.dbf");
        std::fs::write(&path, b"keep me").unwrap();

        let err = TableFile::create(&path, &[FieldSpec::character("name", 4)]).err();
        assert_eq!(err, Some(DbfError::AlreadyExists(path.display().to_string())));
        assert_eq!(std::fs::read(&path).unwrap(), b"keep me");
    }

    #[test]
    fn test_append_stamps_header() {
        let dir = TempDir::new().unwrap();
        let path = people(&dir).path().to_path_buf();

        let mut table = TableFile::open_with(&path, options(2025, 6, 30)).unwrap();
        let index = table
            .append(&[Value::from("Ann"), Value::Numeric(41)])
            .unwrap();
        assert_eq!(index, 0);
        assert_eq!(table.len(), 1);
        assert_eq!(
            table.header().last_modified,
            LastModified { year: 125, month: 6, day: 30 }
        );
        assert_eq!(size_on_disk(&table), table.file_size());

        drop(table);
        let reopened = TableFile::open(&path).unwrap();
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.header().last_modified.to_date(), NaiveDate::from_ymd_opt(2025, 6, 30));
    }

    #[test]
    fn test_append_rejects_before_touching_file() {
        let dir = TempDir::new().unwrap();
        let mut table = people(&dir);
        let before = std::fs::read(table.path()).unwrap();

        let arity = table.append(&[Value::from("Ann")]).unwrap_err();
        assert_eq!(arity, DbfError::ArityError { expected: 2, got: 1 });

        let wide = table
            .append(&[Value::from("Bartholomew"), Value::Numeric(1)])
            .unwrap_err();
        assert!(matches!(wide, DbfError::FieldEncodeError { .. }));

        assert_eq!(std::fs::read(table.path()).unwrap(), before);
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn test_failed_append_leaves_table_consistent() {
        let dir = TempDir::new().unwrap();
        let mut table = people(&dir);
        table.append(&[Value::from("Ann"), Value::Numeric(41)]).unwrap();
        let path = table.path().to_path_buf();
        let before = std::fs::read(&path).unwrap();

        let writable = std::mem::replace(&mut table.file, File::open(&path).unwrap());
        let err = table.append(&[Value::from("Bob"), Value::Numeric(35)]);
        assert!(matches!(err, Err(DbfError::IoError(_))), "{err:?}");
        assert_eq!(table.len(), 1);
        assert_eq!(std::fs::read(&path).unwrap(), before);

        table.file = writable;
        assert_eq!(table.append(&[Value::from("Bob"), Value::Numeric(35)]), Ok(1));
        drop(table);
        assert_eq!(TableFile::open(&path).unwrap().len(), 2);
    }

    #[test]
    fn test_rollback_append_restores_layout() {
        let dir = TempDir::new().unwrap();
        let mut table = people(&dir);
        table.append(&[Value::from("Ann"), Value::Numeric(41)]).unwrap();
        let path = table.path().to_path_buf();
        let before = std::fs::read(&path).unwrap();

        // record image and bumped header both reached the disk
        let offset = table.file_size();
        let mut header = table.header().clone();
        header.record_count += 1;
        table.file.seek(SeekFrom::Start(offset)).unwrap();
        table.file.write_all(&[b' '; 14]).unwrap();
        table.write_header(&header).unwrap();

        table.rollback_append(offset).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(std::fs::read(&path).unwrap(), before);
        drop(table);
        assert_eq!(TableFile::open(&path).unwrap().len(), 1);
    }

    #[test]
    fn test_get_out_of_range() {
        let dir = TempDir::new().unwrap();
        let mut table = people(&dir);
        table.append(&[Value::from("Ann"), Value::Numeric(41)]).unwrap();
        assert_eq!(
            table.get(1).unwrap_err(),
            DbfError::IndexOutOfRange { index: 1, count: 1 }
        );
        assert!(table.soft_delete(5, true).is_err());
    }

    #[test]
    fn test_soft_delete_and_update() {
        let dir = TempDir::new().unwrap();
        let mut table = people(&dir);
        table.append(&[Value::from("Ann"), Value::Numeric(41)]).unwrap();

        table.soft_delete(0, true).unwrap();
        assert!(table.is_deleted(0).unwrap());
        let mut record = table.get(0).unwrap();
        assert!(record.deleted);

        record.set("age", Value::Numeric(42)).unwrap();
        table.update(0, &record).unwrap();
        let record = table.get(0).unwrap();
        assert!(!record.deleted);
        assert_eq!(record["age"], Value::Numeric(42));
        assert_eq!(size_on_disk(&table), table.file_size());
    }

    #[test]
    fn test_save_keeps_tombstone() {
        let dir = TempDir::new().unwrap();
        let mut table = people(&dir);
        table.append(&[Value::from("Ann"), Value::Numeric(41)]).unwrap();

        let mut record = table.get(0).unwrap();
        record.deleted = true;
        table.save(0, &record).unwrap();
        assert!(table.get(0).unwrap().deleted);
    }

    #[test]
    fn test_open_rejects_size_mismatch() {
        let dir = TempDir::new().unwrap();
        let path = {
            let mut table = people(&dir);
            table.append(&[Value::from("Ann"), Value::Numeric(41)]).unwrap();
            table.path().to_path_buf()
        };
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        file.write_all(&[0x1A]).unwrap();
        drop(file);

        let err = TableFile::open(&path).err().unwrap();
        assert!(err.to_string().contains("does not match header"), "{err}");
    }

    #[test]
    fn test_open_stops_at_empty_descriptor() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gappy.dbf");
        let fields =
            FieldSpec::to_descriptors(&[FieldSpec::character("name", 4)]).unwrap();
        // room for two descriptors, only one filled in
        let stamp = LastModified { year: 124, month: 1, day: 1 };
        let header = Header::new(32 + 64 + 1, 5, stamp);
        let mut bytes = header.encode().to_vec();
        bytes.extend_from_slice(&fields[0].encode());
        bytes.extend_from_slice(&[0u8; 32]);
        bytes.push(TERMINATOR);
        std::fs::write(&path, &bytes).unwrap();

        let table = TableFile::open(&path).unwrap();
        assert_eq!(table.fields().len(), 1);
        assert_eq!(table.fields()[0].name, "name");
    }

    #[test]
    fn test_compact_drops_deleted() {
        let dir = TempDir::new().unwrap();
        let mut table = people(&dir);
        for (name, age) in [("Ann", 41), ("Bob", 35), ("Cid", 29), ("Dee", 52)] {
            table.append(&[Value::from(name), Value::Numeric(age)]).unwrap();
        }
        table.soft_delete(1, true).unwrap();
        table.soft_delete(3, true).unwrap();

        let mut table = table.compact().unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(size_on_disk(&table), table.file_size());
        let names: Vec<Value> = table
            .all()
            .unwrap()
            .into_iter()
            .map(|r| {
                assert!(!r.deleted);
                r["name"].clone()
            })
            .collect();
        assert_eq!(names, vec![Value::from("Ann"), Value::from("Cid")]);

        let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[test]
    fn test_compact_into_other_path() {
        let dir = TempDir::new().unwrap();
        let mut table = people(&dir);
        let source = table.path().to_path_buf();
        table.append(&[Value::from("Ann"), Value::Numeric(41)]).unwrap();
        table.append(&[Value::from("Bob"), Value::Numeric(35)]).unwrap();
        table.soft_delete(0, true).unwrap();

        let dest = dir.path().join("clean.dbf");
        let table = table.compact_into(&dest).unwrap();
        assert_eq!(table.path(), dest.as_path());
        assert_eq!(table.len(), 1);
        assert_eq!(TableFile::open(&source).unwrap().len(), 2);

        let again = TableFile::open(&source).unwrap().compact_into(&dest).err();
        assert_eq!(again, Some(DbfError::AlreadyExists(dest.display().to_string())));
    }

    #[test]
    fn test_rewrite_keeps_existing_destination() {
        let dir = TempDir::new().unwrap();
        let table = people(&dir);
        let dest = dir.path().join("late.dbf");
        std::fs::write(&dest, b"arrived late").unwrap();

        let err = table.rewrite(&dest, false).err();
        assert_eq!(err, Some(DbfError::AlreadyExists(dest.display().to_string())));
        assert_eq!(std::fs::read(&dest).unwrap(), b"arrived late");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_display_summary() {
        let dir = TempDir::new().unwrap();
        let table = people(&dir);
        let text = table.to_string();
        assert!(text.contains("Size: 97"));
        assert!(text.contains("Last Modified: 2024-01-15"));
        assert!(text.ends_with("Records: 0"));
    }

    #[test]
    fn test_records_iterator() {
        let dir = TempDir::new().unwrap();
        let mut table = people(&dir);
        table.append(&[Value::from("Ann"), Value::Numeric(41)]).unwrap();
        table.append(&[Value::from("Bob"), Value::Numeric(35)]).unwrap();
        assert_eq!(table.records().size_hint(), (2, Some(2)));
        let ages: Vec<i64> = table
            .records()
            .map(|r| r.unwrap()["age"].as_i64().unwrap())
            .collect();
        assert_eq!(ages, vec![41, 35]);

        let reversed: Vec<Value> = table
            .slice(Some(2), Some(-6), None)
            .unwrap()
            .into_iter()
            .map(|r| r["age"].clone())
            .collect();
        assert_eq!(reversed, vec![Value::Numeric(35), Value::Numeric(41)]);
    }
}
