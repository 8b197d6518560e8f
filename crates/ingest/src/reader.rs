use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

const SUPPORTED_EXTENSIONS: [&str; 2] = ["txt", "md"];
const UTF8_BOM: char = '\u{feff}';

/// A raw text block and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub source: String,
    pub text: String,
}

pub struct FileReader;

impl FileReader {
    /// Plain text or markdown, matched case-insensitively on the extension.
    pub fn is_supported(path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| SUPPORTED_EXTENSIONS.iter().any(|s| ext.eq_ignore_ascii_case(s)))
    }

    /// Read one UTF-8 document. A leading byte-order mark is dropped.
    pub async fn read_file(path: &Path) -> Result<Document> {
        if !Self::is_supported(path) {
            let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            anyhow::bail!("Unsupported file format: {:?} (expected .txt or .md)", extension);
        }

        let bytes = fs::read(path)
            .await
            .with_context(|| format!("Failed to read file: {:?}", path))?;
        let mut text =
            String::from_utf8(bytes).with_context(|| format!("File is not valid UTF-8: {:?}", path))?;
        if text.starts_with(UTF8_BOM) {
            text.drain(..UTF8_BOM.len_utf8());
        }

        Ok(Document {
            source: path.to_string_lossy().to_string(),
            text,
        })
    }

    /// Every supported file directly inside `dir`, sorted by path. Other
    /// files and subdirectories are skipped.
    pub async fn read_directory(dir: &Path) -> Result<Vec<Document>> {
        let mut entries = fs::read_dir(dir)
            .await
            .with_context(|| format!("Failed to list directory: {:?}", dir))?;

        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.is_file() && Self::is_supported(&path) {
                paths.push(path);
            }
        }
        paths.sort();

        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            documents.push(Self::read_file(&path).await?);
        }
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_supported_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.MD"), "华为公司").unwrap();
        std::fs::write(dir.path().join("a.txt"), "环保部门").unwrap();
        std::fs::write(dir.path().join("c.json"), "{}").unwrap();
        std::fs::create_dir(dir.path().join("nested.txt")).unwrap();

        let documents = FileReader::read_directory(dir.path()).await.unwrap();

        assert_eq!(documents.len(), 2);
        assert!(documents[0].source.ends_with("a.txt"));
        assert_eq!(documents[1].text, "华为公司");
    }

    #[tokio::test]
    async fn test_strips_byte_order_mark() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.txt");
        std::fs::write(&path, "\u{feff}国务院领导生态环境部").unwrap();

        let document = FileReader::read_file(&path).await.unwrap();
        assert_eq!(document.text, "国务院领导生态环境部");
    }

    #[tokio::test]
    async fn test_rejects_unsupported_and_invalid_files() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("data.csv");
        std::fs::write(&csv, "a,b").unwrap();
        let err = FileReader::read_file(&csv).await.unwrap_err();
        assert!(err.to_string().contains("Unsupported file format"));

        let binary = dir.path().join("blob.txt");
        std::fs::write(&binary, [0xff, 0xfe, 0x00]).unwrap();
        assert!(FileReader::read_file(&binary).await.is_err());

        assert!(FileReader::read_file(&dir.path().join("missing.txt")).await.is_err());
    }
}
