//! Hash utilities
//!
//! Streaming SHA256 hashing of resource files.

use crate::error::{HashgenError, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Default read size when streaming a file through the hasher
pub const DEFAULT_BLOCK_SIZE: usize = 65536;

/// Calculate the SHA256 hash of a file, reading it `block_size` bytes at a time.
///
/// Returns the lowercase hex digest. The file is closed before returning,
/// including when a read fails.
pub fn sha256_file(path: &Path, block_size: usize) -> Result<String> {
    if block_size == 0 {
        return Err(HashgenError::InvalidBlockSize);
    }

    let file = File::open(path).map_err(|e| HashgenError::io(path, e))?;
    sha256_reader(file, block_size).map_err(|e| HashgenError::io(path, e))
}

/// Feed a reader through SHA256 until it reports end of input.
pub fn sha256_reader<R: Read>(mut reader: R, block_size: usize) -> std::io::Result<String> {
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; block_size];

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Verify a stored digest matches a computed one (hex case is ignored)
pub fn digest_matches(actual: &str, expected: &str) -> bool {
    actual.eq_ignore_ascii_case(expected.trim())
}
