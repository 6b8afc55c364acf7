//! Streaming file digests
//!
//! Hashes an arbitrarily large byte stream with one bounded buffer: memory
//! use is proportional to the chunk size, never to the input size. The
//! chunk size has no effect on the resulting digest.

use std::io::{self, ErrorKind, Read};

use costamp_types::{Digest, Suite};

/// Reference chunk size: one megabyte.
pub const CHUNK_SIZE: usize = 1024 * 1024;

/// Computes suite digests of byte streams without buffering them fully.
#[derive(Debug, Clone, Copy)]
pub struct StreamHasher {
    suite: Suite,
}

impl StreamHasher {
    pub fn new(suite: Suite) -> Self {
        Self { suite }
    }

    /// Begin an incremental digest. Useful when the input arrives as
    /// externally driven chunks (e.g. a multipart upload) rather than as
    /// an `io::Read`.
    pub fn begin(&self) -> DigestAccumulator {
        DigestAccumulator {
            inner: self.suite.hasher(),
        }
    }

    /// Hash a stream to completion using the reference chunk size.
    ///
    /// Any I/O error other than end-of-stream aborts hashing; no partial
    /// digest is ever returned.
    pub fn hash<R: Read>(&self, reader: &mut R) -> io::Result<Digest> {
        self.hash_chunked(reader, CHUNK_SIZE)
    }

    /// Hash a stream with an explicit chunk size. Produces the identical
    /// digest for every `chunk_size >= 1`.
    pub fn hash_chunked<R: Read>(&self, reader: &mut R, chunk_size: usize) -> io::Result<Digest> {
        assert!(chunk_size > 0, "chunk size must be at least 1");

        let mut acc = self.begin();
        let mut buf = vec![0u8; chunk_size];

        loop {
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => acc.update(&buf[..n]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        Ok(acc.finish())
    }

    /// Hash an in-memory buffer. Identical to streaming the same bytes.
    pub fn hash_bytes(&self, data: &[u8]) -> Digest {
        let mut acc = self.begin();
        acc.update(data);
        acc.finish()
    }
}

/// Incremental digest state for one hashing invocation.
pub struct DigestAccumulator {
    inner: blake3::Hasher,
}

impl DigestAccumulator {
    pub fn update(&mut self, chunk: &[u8]) {
        self.inner.update(chunk);
    }

    pub fn finish(self) -> Digest {
        Digest::new(*self.inner.finalize().as_bytes())
    }
}
