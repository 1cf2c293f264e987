use std::cmp::min;
use std::io::{Read, Seek, SeekFrom};

use tracing::debug;

use crate::error::{Error, Result};
use crate::format;
use crate::metadata::FileMetaData;
use crate::thrift::CompactReader;
use crate::{DEFAULT_FOOTER_READ_SIZE, FOOTER_SIZE, PARQUET_MAGIC};

pub(super) fn metadata_len(buffer: &[u8], len: usize) -> i32 {
    i32::from_le_bytes(buffer[len - 8..len - 4].try_into().unwrap())
}

// see (unstable) Seek::stream_len
fn stream_len(seek: &mut impl Seek) -> std::result::Result<u64, std::io::Error> {
    let old_pos = seek.seek(SeekFrom::Current(0))?;
    let len = seek.seek(SeekFrom::End(0))?;

    // Avoid seeking a third time when we were already at the end of the
    // stream. The branch is usually way cheaper than a seek operation.
    if old_pos != len {
        seek.seek(SeekFrom::Start(old_pos))?;
    }

    Ok(len)
}

/// Reads a file's metadata.
// Layout of Parquet file
// +---------------------------+-----+---+
// |      Rest of file         |  B  | A |
// +---------------------------+-----+---+
// where A: parquet footer, B: parquet metadata.
//
// The reader first reads DEFAULT_FOOTER_READ_SIZE bytes from the end of
// the file. If that is not enough according to the length indicated in
// the footer, it reads the rest directly. The declared length is bounded
// by the file size before anything is allocated for it.
pub fn read_metadata<R: Read + Seek>(reader: &mut R) -> Result<FileMetaData> {
    let file_size = stream_len(reader)?;
    if file_size < FOOTER_SIZE + PARQUET_MAGIC.len() as u64 {
        return Err(Error::InvalidFooter(
            "a parquet file cannot be smaller than its magic and footer".into(),
        ));
    }

    // read and cache up to DEFAULT_FOOTER_READ_SIZE bytes from the end
    let default_end_len = min(DEFAULT_FOOTER_READ_SIZE, file_size) as usize;
    reader.seek(SeekFrom::End(-(default_end_len as i64)))?;
    let mut buffer = vec![0; default_end_len];
    reader.read_exact(&mut buffer)?;

    if buffer[default_end_len - 4..] != PARQUET_MAGIC {
        return Err(Error::InvalidMagic);
    }

    let metadata_len = metadata_len(&buffer, default_end_len);
    let metadata_len = u64::try_from(metadata_len).map_err(|_| {
        Error::InvalidFooter(format!("negative footer length {}", metadata_len))
    })?;

    let footer_len = FOOTER_SIZE + metadata_len;
    if footer_len > file_size {
        return Err(Error::InvalidFooter(format!(
            "the footer claims {} bytes but the file holds {}",
            footer_len,
            file_size
        )));
    }
    debug!(metadata_len, file_size, "reading parquet footer");

    let metadata = if (footer_len as usize) <= buffer.len() {
        // the whole metadata is in the bytes already read
        let start = buffer.len() - footer_len as usize;
        let mut thrift_reader =
            CompactReader::new(&buffer[start..], metadata_len as usize);
        format::FileMetaData::read_from(&mut thrift_reader)?
    } else {
        // the end of file read by default is not long enough; seek back
        reader.seek(SeekFrom::End(-(footer_len as i64)))?;
        let mut thrift_reader = CompactReader::new(&mut *reader, metadata_len as usize);
        format::FileMetaData::read_from(&mut thrift_reader)?
    };

    if metadata.version != 1 && metadata.version != 2 {
        return Err(Error::VersionNotSupported(metadata.version));
    }

    FileMetaData::try_from_thrift(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn too_small_is_invalid() {
        let mut reader = Cursor::new(vec![0u8; 4]);
        assert!(matches!(
            read_metadata(&mut reader),
            Err(Error::InvalidFooter(_))
        ));
    }

    #[test]
    fn missing_magic_is_invalid() {
        let mut reader = Cursor::new(b"PAR1........ZZZZ".to_vec());
        assert!(matches!(read_metadata(&mut reader), Err(Error::InvalidMagic)));
    }

    #[test]
    fn oversized_footer_is_invalid_without_allocation() {
        // footer length u32::MAX / 2: would be gigabytes if trusted
        let mut data = b"PAR1".to_vec();
        data.extend_from_slice(&(u32::MAX / 2).to_le_bytes());
        data.extend_from_slice(b"PAR1");
        let mut reader = Cursor::new(data);
        assert!(matches!(
            read_metadata(&mut reader),
            Err(Error::InvalidFooter(_))
        ));
    }
}
