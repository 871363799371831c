//! Content hashing for transfer deduplication.
//!
//! A peer offering a file sends the MD5 of its content as lowercase hex; if a
//! local file at the target path already hashes to the same value the transfer
//! is skipped entirely. MD5 is a dedup fingerprint here, not an integrity or
//! authenticity mechanism (content authentication is out of scope for this
//! core).

use crate::error::Result;
use md5::{Digest, Md5};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Buffer size for streaming file reads while hashing.
const HASH_READ_BUF: usize = 64 * 1024;

/// Hash a byte slice, rendering the digest as lowercase hex.
pub fn md5_hex(bytes: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(bytes);
    hex_string(&hasher.finalize())
}

/// Hash a file's full content, rendering the digest as lowercase hex.
///
/// Streams the file through a fixed buffer so large resources never get
/// pulled into memory just to be fingerprinted.
pub fn file_md5_hex<P: AsRef<Path>>(path: P) -> Result<String> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut hasher = Md5::new();
    let mut buf = [0u8; HASH_READ_BUF];

    loop {
        let read = reader.read(&mut buf)?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
    }

    Ok(hex_string(&hasher.finalize()))
}

/// Compare two hex digests for equality, ignoring ASCII case.
///
/// Offered checksums arrive from the remote peer and are not guaranteed to
/// share our casing convention.
pub fn checksum_matches(local_hex: &str, offered_hex: &str) -> bool {
    local_hex.eq_ignore_ascii_case(offered_hex)
}

fn hex_string(digest: &[u8]) -> String {
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}
