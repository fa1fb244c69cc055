//! Fixed-width binary encoding of embedding vectors.
//!
//! A vector is stored as consecutive little-endian `f32`s, 4 bytes per
//! component, with no header.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use byteorder::{ByteOrder, LittleEndian};

use dmensions_embeddings::Embedding;

use crate::error::{Result, StoreError};

pub fn vector_to_blob(vector: &[f32]) -> Vec<u8> {
    let mut blob = vec![0u8; vector.len() * 4];
    LittleEndian::write_f32_into(vector, &mut blob);
    blob
}

pub fn blob_to_vector(blob: &[u8]) -> Result<Embedding> {
    if blob.len() % 4 != 0 {
        return Err(StoreError::CorruptBlob { len: blob.len() });
    }
    let mut vector = vec![0f32; blob.len() / 4];
    LittleEndian::read_f32_into(blob, &mut vector);
    Ok(vector)
}

/// Blob wrapped in base64 so it can live inside a JSON document.
pub(crate) fn encode(vector: &[f32]) -> String {
    STANDARD.encode(vector_to_blob(vector))
}

pub(crate) fn decode(encoded: &str) -> Result<Embedding> {
    blob_to_vector(&STANDARD.decode(encoded)?)
}
