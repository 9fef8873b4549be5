//! BLAKE3 hashing utilities for bundle integrity

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use blake3::Hasher;

use crate::error::{Result, fs::read_failed};

/// Hash prefix for BLAKE3 hashes
pub const HASH_PREFIX: &str = "blake3:";

/// Name of the manifest written at the root of each bundle
pub const CHECKSUM_FILE: &str = "checksums.txt";

/// Calculate BLAKE3 hash of a file
pub fn hash_file(path: &Path) -> Result<String> {
    let file =
        File::open(path).map_err(|e| read_failed(path.display().to_string(), e.to_string()))?;

    let mut reader = BufReader::new(file);
    let mut hasher = Hasher::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .map_err(|e| read_failed(path.display().to_string(), e.to_string()))?;

        if bytes_read == 0 {
            break;
        }

        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{}{}", HASH_PREFIX, hasher.finalize().to_hex()))
}

/// Calculate BLAKE3 hash of in-memory contents
pub fn hash_bytes(contents: &[u8]) -> String {
    format!("{}{}", HASH_PREFIX, blake3::hash(contents).to_hex())
}

/// Render a checksum manifest from `(relative path, hash)` entries
///
/// One `blake3:<hex>  <relpath>` line per entry, sorted by path. An entry for
/// the manifest itself is skipped.
pub fn checksum_manifest<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let mut entries: Vec<(&str, &str)> = entries
        .into_iter()
        .filter(|(relative, _)| *relative != CHECKSUM_FILE)
        .collect();

    // Sort for deterministic manifests
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries.dedup_by(|a, b| a.0 == b.0);

    let mut manifest = String::new();
    for (relative, hash) in entries {
        manifest.push_str(hash);
        manifest.push_str("  ");
        manifest.push_str(relative);
        manifest.push('\n');
    }
    manifest
}

/// Compare the manifest under `root` with the files on disk
///
/// Returns the relative paths that are missing or whose hash differs.
pub fn verify_manifest(root: &Path) -> Result<Vec<String>> {
    let manifest_path = root.join(CHECKSUM_FILE);
    let manifest = std::fs::read_to_string(&manifest_path)
        .map_err(|e| read_failed(manifest_path.display().to_string(), e.to_string()))?;

    let mut mismatched = Vec::new();
    for line in manifest.lines().filter(|l| !l.trim().is_empty()) {
        let Some((expected, relative)) = line.split_once("  ") else {
            mismatched.push(line.to_string());
            continue;
        };
        let path = root.join(relative);
        let matches = path.is_file() && hash_file(&path)? == expected;
        if !matches {
            mismatched.push(relative.to_string());
        }
    }
    Ok(mismatched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_hash_file() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("test.txt");
        std::fs::write(&file_path, "test content").unwrap();

        let hash = hash_file(&file_path).unwrap();
        assert!(hash.starts_with(HASH_PREFIX));
        assert_eq!(hash.len(), HASH_PREFIX.len() + 64);
    }

    #[test]
    fn test_hash_file_not_found() {
        let result = hash_file(Path::new("/nonexistent/file.txt"));
        assert!(result.is_err());
    }

    #[test]
    fn test_hash_bytes_matches_hash_file() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("values.yaml");
        std::fs::write(&file_path, "a: 1").unwrap();

        assert_eq!(hash_bytes(b"a: 1"), hash_file(&file_path).unwrap());
    }

    #[test]
    fn test_manifest_sorted_and_relative() {
        let values = hash_bytes(b"a: 1");
        let notes = hash_bytes(b"notes");
        let readme = hash_bytes(b"readme");

        let manifest = checksum_manifest([
            ("values.yaml", values.as_str()),
            ("docs/notes.md", notes.as_str()),
            ("README.md", readme.as_str()),
        ]);
        let paths: Vec<&str> = manifest
            .lines()
            .map(|l| l.split_once("  ").unwrap().1)
            .collect();
        assert_eq!(paths, vec!["README.md", "docs/notes.md", "values.yaml"]);
        assert!(manifest.lines().all(|l| l.starts_with(HASH_PREFIX)));
    }

    #[test]
    fn test_manifest_excludes_itself() {
        let hash = hash_bytes(b"a: 1");
        let manifest = checksum_manifest([
            ("values.yaml", hash.as_str()),
            (CHECKSUM_FILE, hash.as_str()),
        ]);
        assert_eq!(manifest.lines().count(), 1);
    }

    #[test]
    fn test_verify_manifest_detects_tampering() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("values.yaml"), "a: 1").unwrap();
        std::fs::write(temp.path().join("README.md"), "readme").unwrap();
        let values = hash_bytes(b"a: 1");
        let readme = hash_bytes(b"readme");
        let manifest = checksum_manifest([
            ("values.yaml", values.as_str()),
            ("README.md", readme.as_str()),
        ]);
        std::fs::write(temp.path().join(CHECKSUM_FILE), manifest).unwrap();

        assert!(verify_manifest(temp.path()).unwrap().is_empty());

        std::fs::write(temp.path().join("values.yaml"), "a: 2").unwrap();
        std::fs::remove_file(temp.path().join("README.md")).unwrap();
        let mismatched = verify_manifest(temp.path()).unwrap();
        assert_eq!(mismatched, vec!["README.md", "values.yaml"]);
    }
}
