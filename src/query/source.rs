use crate::core::DbfError;
use crate::format::FieldDescriptor;
use crate::table::{Record, TableFile};

/// Anything that can hand out decoded records by position.
pub trait RecordSource {
    fn fields(&self) -> &[FieldDescriptor];

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn record(&mut self, index: usize) -> Result<Record, DbfError>;
}

impl RecordSource for TableFile {
    fn fields(&self) -> &[FieldDescriptor] {
        TableFile::fields(self)
    }

    fn len(&self) -> usize {
        TableFile::len(self)
    }

    fn record(&mut self, index: usize) -> Result<Record, DbfError> {
        self.get(index)
    }
}

/// Records held in memory together with the schema they were decoded with.
/// What `filter` and `slice` results look like once collected.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSet {
    fields: Vec<FieldDescriptor>,
    records: Vec<Record>,
}

impl RecordSet {
    pub fn new(fields: Vec<FieldDescriptor>, records: Vec<Record>) -> Self {
        Self { fields, records }
    }

    /// Decode every record of `table`.
    pub fn load(table: &mut TableFile) -> Result<Self, DbfError> {
        let records = table.all()?;
        Ok(Self::new(table.fields().to_vec(), records))
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

impl RecordSource for RecordSet {
    fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    fn record(&mut self, index: usize) -> Result<Record, DbfError> {
        self.records
            .get(index)
            .cloned()
            .ok_or(DbfError::IndexOutOfRange {
                index,
                count: self.records.len(),
            })
    }
}
