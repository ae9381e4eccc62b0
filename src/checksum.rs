//! CRC-32 content checksums used as asset fingerprints.

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use crc32fast::Hasher;

const CHUNK_SIZE: usize = 8 * 1024;

/// CRC-32 of a file's bytes, rendered in decimal when embedded in URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Checksum(u32);

impl Checksum {
  /// Wrap a precomputed CRC-32 value.
  pub const fn new(value: u32) -> Self {
    Self(value)
  }

  /// Raw CRC-32 value.
  pub const fn value(self) -> u32 {
    self.0
  }

  /// Checksum of an in-memory buffer.
  pub fn of_bytes(bytes: &[u8]) -> Self {
    let mut hasher = Hasher::new();
    hasher.update(bytes);
    Self(hasher.finalize())
  }
}

impl fmt::Display for Checksum {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Stream a file through the CRC-32 accumulator.
///
/// Only the byte content participates; timestamps and other metadata never do.
pub fn checksum_file(path: &Path) -> io::Result<Checksum> {
  let file = File::open(path)?;
  checksum_reader(BufReader::new(file))
}

/// Fold everything `reader` yields into a checksum.
pub fn checksum_reader<R: Read>(mut reader: R) -> io::Result<Checksum> {
  let mut hasher = Hasher::new();
  let mut buffer = [0u8; CHUNK_SIZE];

  loop {
    let read = match reader.read(&mut buffer) {
      Ok(0) => break,
      Ok(read) => read,
      Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
      Err(err) => return Err(err),
    };
    hasher.update(&buffer[..read]);
  }

  Ok(Checksum(hasher.finalize()))
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use tempfile::tempdir;

  #[test]
  fn matches_standard_crc32_check_value() {
    assert_eq!(Checksum::of_bytes(b"123456789").value(), 0xCBF4_3926);
    assert_eq!(Checksum::of_bytes(b"123456789").to_string(), "3421780262");
    assert_eq!(Checksum::of_bytes(b"").value(), 0);
  }

  #[test]
  fn file_checksum_is_deterministic_and_content_sensitive() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("app.js");
    fs::write(&file, "console.log(1)").unwrap();

    let first = checksum_file(&file).unwrap();
    let second = checksum_file(&file).unwrap();
    assert_eq!(first, second);

    fs::write(&file, "console.log(2)").unwrap();
    assert_ne!(first, checksum_file(&file).unwrap());
  }

  #[test]
  fn checksum_ignores_file_location() {
    let dir = tempdir().unwrap();
    let one = dir.path().join("one.css");
    let two = dir.path().join("nested").join("two.css");
    fs::create_dir_all(two.parent().unwrap()).unwrap();
    fs::write(&one, "body {}").unwrap();
    fs::write(&two, "body {}").unwrap();

    assert_eq!(checksum_file(&one).unwrap(), checksum_file(&two).unwrap());
  }

  #[test]
  fn streams_files_larger_than_one_chunk() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("large.bin");
    let content: Vec<u8> = (0..(CHUNK_SIZE * 3 + 17)).map(|i| (i % 251) as u8).collect();
    fs::write(&file, &content).unwrap();

    assert_eq!(checksum_file(&file).unwrap(), Checksum::of_bytes(&content));
  }

  #[test]
  fn missing_file_is_an_error() {
    let dir = tempdir().unwrap();
    assert!(checksum_file(&dir.path().join("missing.png")).is_err());
  }
}
