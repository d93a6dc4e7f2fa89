//! Binary index artifact.
//!
//! Layout, all integers little-endian:
//!
//! ```text
//! magic      8 bytes  "MEDRAGIX"
//! version    u32      1
//! dim        u32
//! count      u64
//! id_len     u32      length of the embedding model id
//! model_id   id_len bytes, UTF-8
//! vectors    count * dim f32
//! checksum   32 bytes, blake3 of everything above
//! ```
//!
//! Floats are written bit-exact, so a reloaded index answers every query
//! exactly as the one that was saved.

use std::fs;
use std::path::Path;
use tracing::info;

use medrag_core::error::{Error, Result};

use crate::index::FlatIndex;

const MAGIC: &[u8; 8] = b"MEDRAGIX";
const VERSION: u32 = 1;
const CHECKSUM_LEN: usize = 32;

impl FlatIndex {
    pub fn to_bytes(&self) -> Vec<u8> {
        let id = self.model_id.as_bytes();
        let mut out = Vec::with_capacity(28 + id.len() + self.data.len() * 4 + CHECKSUM_LEN);
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&VERSION.to_le_bytes());
        out.extend_from_slice(&(self.dim as u32).to_le_bytes());
        out.extend_from_slice(&(self.len() as u64).to_le_bytes());
        out.extend_from_slice(&(id.len() as u32).to_le_bytes());
        out.extend_from_slice(id);
        for x in &self.data {
            out.extend_from_slice(&x.to_le_bytes());
        }
        let checksum = blake3::hash(&out);
        out.extend_from_slice(checksum.as_bytes());
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < MAGIC.len() + CHECKSUM_LEN || &bytes[..MAGIC.len()] != MAGIC {
            return Err(Error::CorruptIndex("missing MEDRAGIX header".to_string()));
        }
        let (payload, checksum) = bytes.split_at(bytes.len() - CHECKSUM_LEN);
        if blake3::hash(payload).as_bytes().as_slice() != checksum {
            return Err(Error::CorruptIndex("checksum mismatch".to_string()));
        }

        let mut r = Reader { buf: payload, pos: MAGIC.len() };
        let version = r.u32()?;
        if version != VERSION {
            return Err(Error::CorruptIndex(format!("unsupported version {version}")));
        }
        let dim = r.u32()? as usize;
        let count = r.u64()? as usize;
        let id_len = r.u32()? as usize;
        let model_id = String::from_utf8(r.take(id_len)?.to_vec())
            .map_err(|_| Error::CorruptIndex("model id is not UTF-8".to_string()))?;
        if dim == 0 || count == 0 {
            return Err(Error::CorruptIndex(format!("empty index (dim={dim}, count={count})")));
        }
        let byte_len = count
            .checked_mul(dim)
            .and_then(|floats| floats.checked_mul(4))
            .ok_or_else(|| Error::CorruptIndex("vector count overflows".to_string()))?;
        let raw = r.take(byte_len)?;
        if r.pos != payload.len() {
            return Err(Error::CorruptIndex(format!("{} trailing bytes", payload.len() - r.pos)));
        }
        let data = raw
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        Ok(Self { dim, data, model_id })
    }

    /// Write the artifact, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_bytes())?;
        info!(path = %path.display(), vectors = self.len(), dim = self.dim, "index saved");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let index = Self::from_bytes(&fs::read(path)?)?;
        info!(path = %path.display(), vectors = index.len(), dim = index.dim, "index loaded");
        Ok(index)
    }
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.buf.len())
            .ok_or_else(|| Error::CorruptIndex("truncated artifact".to_string()))?;
        let out = &self.buf[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    fn u32(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn u64(&mut self) -> Result<u64> {
        let b = self.take(8)?;
        let mut a = [0u8; 8];
        a.copy_from_slice(b);
        Ok(u64::from_le_bytes(a))
    }
}
