//! SHA-256 hashing for commitment digests.
//!
//! Streamed inputs are read in fixed [`CHUNK_SIZE`] blocks so memory use does
//! not depend on content size. Salts are fed to the running hash as the first
//! update instead of being concatenated with the content.

use sarmenta_types::Hash256;
use sha2::{Digest, Sha256};
use std::io::{self, Read};

/// Read block size for streamed content (64 KiB).
pub const CHUNK_SIZE: usize = 65_536;

fn finish(hasher: Sha256) -> Hash256 {
    let mut output = [0u8; 32];
    output.copy_from_slice(&hasher.finalize());
    Hash256::new(output)
}

/// Compute the SHA-256 digest of arbitrary data.
pub fn sha256(data: &[u8]) -> Hash256 {
    let mut hasher = Sha256::new();
    hasher.update(data);
    finish(hasher)
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn sha256_multi(parts: &[&[u8]]) -> Hash256 {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    finish(hasher)
}

/// Hash `prefix ‖ stream` reading the stream in [`CHUNK_SIZE`] blocks.
pub fn sha256_reader<R: Read>(prefix: &[u8], reader: R) -> io::Result<Hash256> {
    let mut hasher = Sha256::new();
    hasher.update(prefix);
    for_each_chunk(reader, |chunk| hasher.update(chunk))?;
    Ok(finish(hasher))
}

/// Single pass over a stream producing both `H(stream)` and `H(salt ‖ stream)`.
///
/// Returns `(plain, salted)`.
pub fn sha256_reader_pair<R: Read>(salt: &[u8], reader: R) -> io::Result<(Hash256, Hash256)> {
    let mut plain = Sha256::new();
    let mut salted = Sha256::new();
    salted.update(salt);
    for_each_chunk(reader, |chunk| {
        plain.update(chunk);
        salted.update(chunk);
    })?;
    Ok((finish(plain), finish(salted)))
}

fn for_each_chunk<R: Read>(mut reader: R, mut f: impl FnMut(&[u8])) -> io::Result<()> {
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => return Ok(()),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        f(&buf[..n]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn sha256_known_vector() {
        // FIPS 180-2 "abc" test vector.
        assert_eq!(
            sha256(b"abc").to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn sha256_empty() {
        assert_eq!(
            sha256(b"").to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn sha256_multi_equivalent() {
        let single = sha256(b"helloworld");
        let multi = sha256_multi(&[b"hello", b"world"]);
        assert_eq!(single, multi);
    }

    #[test]
    fn reader_matches_one_shot_across_chunk_boundaries() {
        let data: Vec<u8> = (0..(CHUNK_SIZE * 2 + 17)).map(|i| (i % 251) as u8).collect();
        let streamed = sha256_reader(b"", Cursor::new(&data)).unwrap();
        assert_eq!(streamed, sha256(&data));
    }

    #[test]
    fn reader_prefix_is_initial_update() {
        let streamed = sha256_reader(b"salt", Cursor::new(b"content")).unwrap();
        assert_eq!(streamed, sha256(b"saltcontent"));
    }

    #[test]
    fn reader_pair_matches_separate_hashes() {
        let data = vec![7u8; CHUNK_SIZE + 1];
        let (plain, salted) = sha256_reader_pair(b"nonce", Cursor::new(&data)).unwrap();
        assert_eq!(plain, sha256(&data));
        assert_eq!(salted, sha256_multi(&[b"nonce", &data]));
    }

    #[test]
    fn reader_propagates_io_errors() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "disk gone"))
            }
        }
        assert!(sha256_reader(b"", Broken).is_err());
    }
}
