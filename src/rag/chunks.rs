use std::fs;
use std::path::Path;

use super::error::IndexUnavailable;

/// Chunk texts, positionally aligned with the vector index ids.
#[derive(Debug, Clone, Default)]
pub struct ChunkStore {
    chunks: Vec<String>,
}

impl ChunkStore {
    pub fn new(chunks: Vec<String>) -> Self {
        Self { chunks }
    }

    /// Reads a JSON array of strings.
    pub fn load(path: &Path) -> Result<Self, IndexUnavailable> {
        if !path.exists() {
            return Err(IndexUnavailable::MissingArtifact(path.to_path_buf()));
        }
        let contents = fs::read_to_string(path).map_err(|source| IndexUnavailable::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let chunks: Vec<String> =
            serde_json::from_str(&contents).map_err(|source| IndexUnavailable::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::new(chunks))
    }

    /// Looks up a chunk by vector id. Negative or out-of-range ids yield `None`.
    pub fn get(&self, id: i64) -> Option<&str> {
        let idx = usize::try_from(id).ok()?;
        self.chunks.get(idx).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_is_bounds_checked() {
        let store = ChunkStore::new(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(store.get(0), Some("a"));
        assert_eq!(store.get(1), Some("b"));
        assert_eq!(store.get(2), None);
        assert_eq!(store.get(-1), None);
    }

    #[test]
    fn loads_json_array() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("chunks.json");
        fs::write(&path, r#"["Rule X does Y.", "Rule Z does W."]"#).expect("write");

        let store = ChunkStore::load(&path).expect("load");
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(1), Some("Rule Z does W."));
    }

    #[test]
    fn non_string_entries_fail_to_parse() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("chunks.json");
        fs::write(&path, r#"[1, 2, 3]"#).expect("write");

        let err = ChunkStore::load(&path).unwrap_err();
        assert!(matches!(err, IndexUnavailable::Parse { .. }));
    }
}
