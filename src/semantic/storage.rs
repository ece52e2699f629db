//! Binary storage for the flat vector index.
//!
//! File format: monuments.index
//!
//! Header (47 bytes):
//! - version: u8 (1)
//! - model_id: [u8; 32] (SHA256 hash of model name)
//! - dimensions: u16 (little-endian)
//! - entry_count: u64 (little-endian)
//! - checksum: u32 (CRC32 of header fields before checksum)
//!
//! Entries (repeated `entry_count` times, in id order):
//! - embedding: [f32; dimensions] (little-endian)

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::semantic::index::FlatIndex;

/// Current file format version
const FORMAT_VERSION: u8 = 1;

/// Header size in bytes: version(1) + model_id(32) + dimensions(2) + entry_count(8) + checksum(4)
const HEADER_SIZE: usize = 47;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum IndexStorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Version mismatch: file version {0}, supported version {1}")]
    VersionMismatch(u8, u8),

    #[error("Model mismatch: index was built with a different embedding model")]
    ModelMismatch,

    #[error("Checksum mismatch: file may be corrupted")]
    ChecksumMismatch,

    #[error("Dimension mismatch: expected {expected}, file has {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Index too wide to store: {0} dimensions")]
    TooManyDimensions(usize),
}

/// Reads and writes a [`FlatIndex`] at a fixed path.
pub struct IndexStorage {
    path: PathBuf,
}

impl IndexStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the vector index from storage.
    ///
    /// # Arguments
    /// * `expected_model_id` - SHA256 hash of the expected model name
    /// * `expected_dimensions` - Expected embedding dimensions
    pub fn load(
        &self,
        expected_model_id: &[u8; 32],
        expected_dimensions: usize,
    ) -> Result<FlatIndex, IndexStorageError> {
        let file = File::open(&self.path)?;
        let mut reader = BufReader::new(file);

        let header = Self::read_header(&mut reader)?;
        Self::validate_header(&header, expected_model_id, expected_dimensions)?;

        let dimensions = header.dimensions as usize;
        let mut vectors = Vec::with_capacity(header.entry_count as usize);
        for _ in 0..header.entry_count {
            vectors.push(Self::read_entry(&mut reader, dimensions)?);
        }

        let mut index = FlatIndex::with_capacity(dimensions, vectors.len());
        index
            .add(vectors)
            .map_err(|_| IndexStorageError::DimensionMismatch {
                expected: expected_dimensions,
                got: dimensions,
            })?;

        Ok(index)
    }

    /// Save the vector index to storage.
    ///
    /// Uses atomic write: temp file -> fsync -> rename
    pub fn save(&self, index: &FlatIndex, model_id: &[u8; 32]) -> Result<(), IndexStorageError> {
        let dimensions = u16::try_from(index.dimensions())
            .map_err(|_| IndexStorageError::TooManyDimensions(index.dimensions()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let temp_path = self.path.with_extension("tmp");

        let result = Self::write_to_file(&temp_path, index, model_id, dimensions);

        if result.is_err() {
            let _ = std::fs::remove_file(&temp_path);
            return result;
        }

        std::fs::rename(&temp_path, &self.path)?;

        Ok(())
    }

    fn write_to_file(
        path: &Path,
        index: &FlatIndex,
        model_id: &[u8; 32],
        dimensions: u16,
    ) -> Result<(), IndexStorageError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        let header = Header {
            version: FORMAT_VERSION,
            model_id: *model_id,
            dimensions,
            entry_count: index.len() as u64,
        };
        Self::write_header(&mut writer, &header)?;

        for vector in index.iter() {
            for &value in vector {
                writer.write_all(&value.to_le_bytes())?;
            }
        }

        writer.flush()?;
        let file = writer
            .into_inner()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        file.sync_all()?;

        Ok(())
    }

    fn read_header(reader: &mut impl Read) -> Result<Header, IndexStorageError> {
        let mut header_bytes = [0u8; HEADER_SIZE];
        reader.read_exact(&mut header_bytes)?;

        let version = header_bytes[0];
        if version > FORMAT_VERSION {
            return Err(IndexStorageError::VersionMismatch(version, FORMAT_VERSION));
        }

        let mut model_id = [0u8; 32];
        model_id.copy_from_slice(&header_bytes[1..33]);

        let dimensions = u16::from_le_bytes([header_bytes[33], header_bytes[34]]);

        let mut count_bytes = [0u8; 8];
        count_bytes.copy_from_slice(&header_bytes[35..43]);
        let entry_count = u64::from_le_bytes(count_bytes);

        let mut checksum_bytes = [0u8; 4];
        checksum_bytes.copy_from_slice(&header_bytes[43..47]);
        let stored_checksum = u32::from_le_bytes(checksum_bytes);

        if stored_checksum != crc32fast::hash(&header_bytes[0..43]) {
            return Err(IndexStorageError::ChecksumMismatch);
        }

        Ok(Header {
            version,
            model_id,
            dimensions,
            entry_count,
        })
    }

    fn validate_header(
        header: &Header,
        expected_model_id: &[u8; 32],
        expected_dimensions: usize,
    ) -> Result<(), IndexStorageError> {
        if header.model_id != *expected_model_id {
            return Err(IndexStorageError::ModelMismatch);
        }

        if header.dimensions as usize != expected_dimensions {
            return Err(IndexStorageError::DimensionMismatch {
                expected: expected_dimensions,
                got: header.dimensions as usize,
            });
        }

        Ok(())
    }

    fn write_header(writer: &mut impl Write, header: &Header) -> Result<(), IndexStorageError> {
        let mut header_bytes = [0u8; HEADER_SIZE];

        header_bytes[0] = header.version;
        header_bytes[1..33].copy_from_slice(&header.model_id);
        header_bytes[33..35].copy_from_slice(&header.dimensions.to_le_bytes());
        header_bytes[35..43].copy_from_slice(&header.entry_count.to_le_bytes());

        let checksum = crc32fast::hash(&header_bytes[0..43]);
        header_bytes[43..47].copy_from_slice(&checksum.to_le_bytes());

        writer.write_all(&header_bytes)?;
        Ok(())
    }

    fn read_entry(reader: &mut impl Read, dimensions: usize) -> Result<Vec<f32>, IndexStorageError> {
        let mut embedding = Vec::with_capacity(dimensions);
        for _ in 0..dimensions {
            let mut float_bytes = [0u8; 4];
            reader.read_exact(&mut float_bytes)?;
            embedding.push(f32::from_le_bytes(float_bytes));
        }
        Ok(embedding)
    }
}

#[derive(Debug)]
struct Header {
    version: u8,
    model_id: [u8; 32],
    dimensions: u16,
    entry_count: u64,
}
