//! Fixed-size chunking with overlap.

use eduquiz_core::{Chunk, ChunkError};
use tracing::debug;

/// Configuration for fixed-size chunking.
#[derive(Debug, Clone, Copy)]
pub struct ChunkConfig {
    /// Window size in characters
    pub chunk_size: usize,
    /// Characters shared between consecutive windows
    pub overlap: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: 2000,
            overlap: 200,
        }
    }
}

/// Split `text` into overlapping character windows.
///
/// Windows are contiguous; the last window may be shorter than
/// `chunk_size`. Fails with [`ChunkError::EmptyDocument`] if `text` is
/// empty, so the pipeline halts before any model call is spent on a
/// contentless upload.
pub fn split(text: &str, config: &ChunkConfig) -> Result<Vec<Chunk>, ChunkError> {
    if config.chunk_size == 0 {
        return Err(ChunkError::InvalidConfig("chunk_size must be > 0".into()));
    }
    if config.overlap >= config.chunk_size {
        return Err(ChunkError::InvalidConfig(format!(
            "overlap {} must be smaller than chunk_size {}",
            config.overlap, config.chunk_size
        )));
    }
    if text.is_empty() {
        return Err(ChunkError::EmptyDocument);
    }

    // Character windows, not byte windows: byte offsets could split a
    // multi-byte sequence.
    let chars: Vec<char> = text.chars().collect();
    let total = chars.len();
    let step = config.chunk_size - config.overlap;

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < total {
        let end = (start + config.chunk_size).min(total);
        chunks.push(Chunk {
            text: chars[start..end].iter().collect(),
            index: chunks.len(),
        });
        if end >= total {
            break;
        }
        start += step;
    }

    debug!("Split {} characters into {} chunks", total, chunks.len());
    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(chunk_size: usize, overlap: usize) -> ChunkConfig {
        ChunkConfig {
            chunk_size,
            overlap,
        }
    }

    #[test]
    fn test_empty_text_is_rejected() {
        let err = split("", &ChunkConfig::default()).unwrap_err();
        assert!(matches!(err, ChunkError::EmptyDocument));
    }

    #[test]
    fn test_short_text_yields_single_chunk() {
        let text = "a".repeat(500);
        let chunks = split(&text, &ChunkConfig::default()).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, text);
        assert_eq!(chunks[0].index, 0);
    }

    #[test]
    fn test_windows_overlap() {
        let text: String = ('a'..='z').cycle().take(25).collect();
        let chunks = split(&text, &cfg(10, 3)).unwrap();

        for pair in chunks.windows(2) {
            let prev: Vec<char> = pair[0].text.chars().collect();
            let next: Vec<char> = pair[1].text.chars().collect();
            assert_eq!(&prev[prev.len() - 3..], &next[..3]);
        }
    }

    #[test]
    fn test_every_character_is_covered() {
        let text: String = (0..997).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
        let chunks = split(&text, &cfg(100, 17)).unwrap();

        let step = 100 - 17;
        let mut covered = vec![false; text.chars().count()];
        for chunk in &chunks {
            let start = chunk.index * step;
            for (offset, _) in chunk.text.chars().enumerate() {
                covered[start + offset] = true;
            }
        }
        assert!(covered.iter().all(|&c| c));
    }

    #[test]
    fn test_chunk_indexes_are_sequential() {
        let text = "x".repeat(5000);
        let chunks = split(&text, &ChunkConfig::default()).unwrap();
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
        }
    }

    #[test]
    fn test_multibyte_text_splits_on_char_boundaries() {
        let text = "é".repeat(30);
        let chunks = split(&text, &cfg(8, 2)).unwrap();
        assert!(chunks.iter().all(|c| c.text.chars().count() <= 8));
        assert!(chunks.iter().all(|c| c.text.chars().all(|ch| ch == 'é')));
    }

    #[test]
    fn test_zero_chunk_size_is_invalid() {
        assert!(matches!(
            split("abc", &cfg(0, 0)),
            Err(ChunkError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_overlap_must_be_smaller_than_chunk_size() {
        assert!(matches!(
            split("abc", &cfg(10, 10)),
            Err(ChunkError::InvalidConfig(_))
        ));
    }
}
