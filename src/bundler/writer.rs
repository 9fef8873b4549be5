//! Output writing for bundlers
//!
//! This module handles:
//! - Creating `<output>/<bundle-type>/`
//! - Writing files and recording their paths, sizes and hashes
//! - Emitting the checksum manifest over what this writer wrote
//!
//! All file I/O goes through `tokio::fs`, so plugins can write from inside
//! their task without blocking a runtime worker.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;

use super::{BundleResult, BundleType};
use crate::error::{Result, fs::write_failed};
use crate::hash::{self, CHECKSUM_FILE};

#[derive(Debug)]
pub struct BundleWriter {
    root: PathBuf,
    result: BundleResult,
    /// Relative path → hash and size of what was written there
    digests: BTreeMap<String, (String, u64)>,
    started: Instant,
}

impl BundleWriter {
    /// Prepare the bundle directory for `bundle_type` under `output_dir`
    pub async fn create(output_dir: &Path, bundle_type: &BundleType) -> Result<Self> {
        let root = output_dir.join(bundle_type.as_str());
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| write_failed(root.display().to_string(), e.to_string()))?;
        Ok(Self {
            root,
            result: BundleResult::new(bundle_type.clone()),
            digests: BTreeMap::new(),
            started: Instant::now(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.root
    }

    /// Write `contents` to `relative` inside the bundle directory
    pub async fn write(&mut self, relative: &str, contents: impl AsRef<[u8]>) -> Result<PathBuf> {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| write_failed(parent.display().to_string(), e.to_string()))?;
        }
        let contents = contents.as_ref();
        tokio::fs::write(&path, contents)
            .await
            .map_err(|e| write_failed(path.display().to_string(), e.to_string()))?;

        let size = contents.len() as u64;
        let digest = (hash::hash_bytes(contents), size);
        match self.digests.insert(relative.to_string(), digest) {
            Some((_, previous)) => self.result.size = self.result.size - previous + size,
            None => self.result.add_file(path.clone(), size),
        }
        Ok(path)
    }

    pub async fn write_yaml<T>(&mut self, relative: &str, value: &T) -> Result<PathBuf>
    where
        T: Serialize + Sync,
    {
        let yaml = serde_yaml::to_string(value).map_err(|e| {
            write_failed(self.root.join(relative).display().to_string(), e.to_string())
        })?;
        self.write(relative, yaml).await
    }

    /// Write `checksums.txt` covering every file this writer wrote
    ///
    /// Files already in the directory from an earlier run are not listed.
    pub async fn write_checksums(&mut self) -> Result<PathBuf> {
        let manifest = hash::checksum_manifest(
            self.digests
                .iter()
                .map(|(relative, (hash, _))| (relative.as_str(), hash.as_str())),
        );
        self.write(CHECKSUM_FILE, manifest).await
    }

    pub fn finish(mut self) -> BundleResult {
        self.result.duration = self.started.elapsed();
        self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_writes_under_type_directory() {
        let temp = TempDir::new().unwrap();
        let mut writer = BundleWriter::create(temp.path(), &BundleType::new("demo"))
            .await
            .unwrap();

        let path = writer.write("README.md", "hello").await.unwrap();
        assert_eq!(path, temp.path().join("demo/README.md"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello");

        let result = writer.finish();
        assert!(result.success);
        assert_eq!(result.size, 5);
        assert_eq!(result.files, vec![path]);
    }

    #[tokio::test]
    async fn test_checksums_cover_written_files() {
        let temp = TempDir::new().unwrap();
        let mut writer = BundleWriter::create(temp.path(), &BundleType::new("demo"))
            .await
            .unwrap();

        let values: BTreeMap<&str, bool> = [("enabled", true)].into();
        writer.write_yaml("values.yaml", &values).await.unwrap();
        writer.write("nested/extra.txt", "x").await.unwrap();
        writer.write_checksums().await.unwrap();
        let dir = writer.dir().to_path_buf();
        let result = writer.finish();

        assert_eq!(result.files.len(), 3);
        let manifest = std::fs::read_to_string(dir.join(CHECKSUM_FILE)).unwrap();
        assert_eq!(manifest.lines().count(), 2);
        assert!(manifest.contains("  nested/extra.txt\n"));
        assert!(hash::verify_manifest(&dir).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_checksums_ignore_files_from_earlier_runs() {
        let temp = TempDir::new().unwrap();
        let stale = temp.path().join("demo/README.md");
        std::fs::create_dir_all(stale.parent().unwrap()).unwrap();
        std::fs::write(&stale, "from a previous run").unwrap();

        let mut writer = BundleWriter::create(temp.path(), &BundleType::new("demo"))
            .await
            .unwrap();
        writer.write("values.yaml", "a: 1\n").await.unwrap();
        writer.write_checksums().await.unwrap();
        let dir = writer.dir().to_path_buf();
        let result = writer.finish();

        let manifest = std::fs::read_to_string(dir.join(CHECKSUM_FILE)).unwrap();
        let listed: Vec<&str> = manifest
            .lines()
            .filter_map(|l| l.split_once("  ").map(|(_, path)| path))
            .collect();
        assert_eq!(listed, vec!["values.yaml"]);
        assert_eq!(result.files.len(), listed.len() + 1);
    }

    #[tokio::test]
    async fn test_rewriting_a_file_is_recorded_once() {
        let temp = TempDir::new().unwrap();
        let mut writer = BundleWriter::create(temp.path(), &BundleType::new("demo"))
            .await
            .unwrap();
        writer.write("values.yaml", "a: 1\n").await.unwrap();
        writer.write("values.yaml", "a: 2\n").await.unwrap();
        writer.write_checksums().await.unwrap();
        let dir = writer.dir().to_path_buf();
        let result = writer.finish();

        assert_eq!(result.files.len(), 2);
        let on_disk: u64 = result
            .files
            .iter()
            .map(|f| std::fs::metadata(f).unwrap().len())
            .sum();
        assert_eq!(result.size, on_disk);
        assert!(hash::verify_manifest(&dir).unwrap().is_empty());
    }
}
