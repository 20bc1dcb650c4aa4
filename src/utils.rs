use std::io::{self, Read, Seek, SeekFrom};

/// Reads exactly `buffer.len()` bytes from a source at an absolute byte offset.
///
/// # Arguments
///
/// - `source`: The seekable byte source to read from.
/// - `offset`: The absolute offset in bytes of the first byte to read.
/// - `buffer`: The buffer to fill.
///
/// # Errors
///
/// Returns an `io::Error` if the seek fails or the source ends before the buffer is full.
pub fn read_exact_at<T: Read + Seek>(source: &mut T, offset: u64, buffer: &mut [u8]) -> io::Result<()> {
    source.seek(SeekFrom::Start(offset))?;

    source.read_exact(buffer).map_err(|err| {
        io::Error::new(
            err.kind(),
            format!("Failed to read {} bytes at offset {}: {}", buffer.len(), offset, err),
        )
    })
}

/// Reads from `reader` until `buffer` is full or the reader is exhausted.
///
/// # Returns
///
/// The count of bytes stored in `buffer`. Fewer than `buffer.len()` means end of stream.
pub fn read_up_to<T: Read>(reader: &mut T, buffer: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buffer.len() {
        match reader.read(&mut buffer[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
    Ok(filled)
}

/// Extracts a 32-bit unsigned integer from a buffer at a given offset.
///
/// # Arguments
///
/// - `buffer`: A slice of bytes from which the value will be extracted.
/// - `offset`: The offset within the buffer where the 32-bit value starts.
///
/// # Panics
///
/// Panics if the slice does not contain enough bytes starting from the offset.
pub fn u32_at(buffer: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        buffer[offset],
        buffer[offset + 1],
        buffer[offset + 2],
        buffer[offset + 3],
    ])
}

/// Trims the space and NUL padding of a fixed-width ASCII field.
pub fn trim_padded(raw: &[u8]) -> String {
    let end = raw
        .iter()
        .rposition(|b| *b != b' ' && *b != 0)
        .map_or(0, |i| i + 1);
    raw[..end].iter().map(|b| char::from(*b)).collect()
}
