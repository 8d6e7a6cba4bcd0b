pub(crate) const HEADER_LEN: usize = 32;
pub(crate) const DESCRIPTOR_LEN: usize = 32;
pub(crate) const NAME_LEN: usize = 11;
pub(crate) const TERMINATOR: u8 = 0x0D;

pub(crate) const ACTIVE: u8 = b' ';
pub(crate) const DELETED: u8 = b'*';

/// Low three bits of the version byte for the dBase III family.
pub(crate) const VERSION_FAMILY: u8 = 3;
pub(crate) const DEFAULT_VERSION: u8 = 0x03;

pub(crate) const DATE_LEN: u8 = 8;
pub(crate) const LOGICAL_LEN: u8 = 1;

/// `header_size` for a table with `field_count` descriptors, terminator included.
pub(crate) fn header_size_for(field_count: usize) -> usize {
    HEADER_LEN + DESCRIPTOR_LEN * field_count + 1
}

/// Byte offset of record `index`.
pub(crate) fn record_offset(header_size: u16, record_size: u16, index: usize) -> u64 {
    header_size as u64 + record_size as u64 * index as u64
}

/// Expected file length for `record_count` records.
pub(crate) fn expected_file_size(header_size: u16, record_size: u16, record_count: u32) -> u64 {
    record_offset(header_size, record_size, record_count as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_size_for() {
        assert_eq!(header_size_for(0), 33);
        assert_eq!(header_size_for(2), 97);
    }

    #[test]
    fn test_record_offset() {
        assert_eq!(record_offset(97, 54, 0), 97);
        assert_eq!(record_offset(97, 54, 3), 97 + 3 * 54);
        assert_eq!(expected_file_size(97, 54, 2), 205);
    }
}
