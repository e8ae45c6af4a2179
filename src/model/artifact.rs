use crate::error::ArtifactError;
use crate::model::CompiledProcess;
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use std::fs;
use std::io::{Read, Write};

impl CompiledProcess {
    /// Serializes the compiled process using the bincode format.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ArtifactError> {
        encode_to_vec(self, standard()).map_err(|e| ArtifactError::Encode(e.to_string()))
    }

    /// Saves the compiled process to a file using the bincode format.
    pub fn save(&self, path: &str) -> Result<(), ArtifactError> {
        let bytes = self.to_bytes()?;
        let mut file = fs::File::create(path).map_err(|e| ArtifactError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        file.write_all(&bytes).map_err(|e| ArtifactError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Loads a compiled process from a file.
    pub fn from_file(path: &str) -> Result<Self, ArtifactError> {
        let mut file = fs::File::open(path).map_err(|e| ArtifactError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(|e| ArtifactError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Self::from_bytes(&bytes)
    }

    /// Deserializes a compiled process from a byte slice.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ArtifactError> {
        decode_from_slice(bytes, standard())
            .map(|(process, _)| process) // bincode 2 returns a tuple (data, bytes_read)
            .map_err(|e| ArtifactError::Decode(e.to_string()))
    }
}
