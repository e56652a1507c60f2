use std::io::{self, Cursor};
use std::path::Path;
use std::sync::Arc;

use zip::ZipArchive;

use super::CrackOracle;
use crate::error::{CrackError, Result};

type ArchiveReader = Cursor<Arc<[u8]>>;

/// Oracle for password-protected ZIP archives (ZipCrypto or AES).
///
/// The archive is read into memory once. Each attempt works on a cheap clone
/// of the parsed archive, so workers never contend on a shared reader.
///
/// A candidate is accepted only if every encrypted entry decrypts and
/// decompresses to the end with a matching checksum. ZipCrypto's one-byte
/// header check lets roughly one wrong password in 256 through, and reading the
/// full entry is what rejects those.
pub struct ZipOracle {
    archive: ZipArchive<ArchiveReader>,
    encrypted: Vec<usize>,
}

impl ZipOracle {
    /// Load and index an archive from disk
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| CrackError::ArchiveUnavailable {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!("Loaded {} ({} bytes)", path.display(), bytes.len());
        Self::from_bytes(bytes.into())
    }

    /// Index an in-memory archive
    pub fn from_bytes(bytes: Arc<[u8]>) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| CrackError::InvalidArchive(e.to_string()))?;

        let mut files = 0usize;
        let mut encrypted = Vec::new();
        for index in 0..archive.len() {
            let entry = archive
                .by_index_raw(index)
                .map_err(|e| CrackError::InvalidArchive(e.to_string()))?;
            if entry.is_dir() {
                continue;
            }
            files += 1;
            if entry.encrypted() {
                encrypted.push(index);
            }
        }

        if files == 0 {
            return Err(CrackError::InvalidArchive(
                "archive contains no files".to_string(),
            ));
        }
        if encrypted.is_empty() {
            return Err(CrackError::InvalidArchive(
                "archive has no encrypted entries".to_string(),
            ));
        }

        tracing::debug!(
            "Indexed {} file(s), {} encrypted",
            files,
            encrypted.len()
        );
        Ok(Self { archive, encrypted })
    }

    /// Number of encrypted entries a candidate must unlock
    pub fn encrypted_entries(&self) -> usize {
        self.encrypted.len()
    }

    fn unlocks(&self, password: &str) -> zip::result::ZipResult<()> {
        let mut archive = self.archive.clone();
        for &index in &self.encrypted {
            let mut entry = archive.by_index_decrypt(index, password.as_bytes())?;
            io::copy(&mut entry, &mut io::sink())?;
        }
        Ok(())
    }
}

impl CrackOracle for ZipOracle {
    fn try_password(&self, password: &str) -> bool {
        match self.unlocks(password) {
            Ok(()) => true,
            Err(e) => {
                tracing::trace!("Rejected {:?}: {}", password, e);
                false
            }
        }
    }
}
