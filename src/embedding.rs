//! Character-code query embedding
//!
//! Turns free text into the fixed 128-dimension vector the knowledge index
//! is populated with. Each of the first 128 characters of the lowercased
//! input maps to its code point divided by 255; unused positions stay 0.0.
//!
//! This is not a semantic embedding. It only has to agree with the vectors
//! that were written into the collection, so the transform is kept exactly
//! as-is (including components above 1.0 for code points past U+00FF).

/// Number of components in a query vector.
pub const EMBEDDING_DIM: usize = 128;

/// Divisor applied to each character code.
const CHAR_SCALE: f32 = 255.0;

/// Fixed-length query vector.
pub type QueryVector = [f32; EMBEDDING_DIM];

/// Embed `text` into a 128-component query vector.
///
/// Pure and deterministic: the same input always yields the same vector.
/// Inputs longer than 128 characters are truncated without error.
pub fn embed(text: &str) -> QueryVector {
    let mut vector = [0.0_f32; EMBEDDING_DIM];
    for (slot, ch) in vector.iter_mut().zip(text.to_lowercase().chars()) {
        *slot = ch as u32 as f32 / CHAR_SCALE;
    }
    vector
}

/// Embed `text` into an owned `Vec`, for request bodies.
pub fn embed_vec(text: &str) -> Vec<f32> {
    embed(text).to_vec()
}
