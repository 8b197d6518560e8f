pub mod preprocess;
pub mod reader;

pub use preprocess::{char_len, char_offset, preprocess};
pub use reader::{Document, FileReader};

use anyhow::Result;
use std::path::Path;

/// Read a single text file.
pub async fn ingest_file(file_path: &Path) -> Result<Document> {
    let document = FileReader::read_file(file_path).await?;
    tracing::debug!(source = %document.source, chars = char_len(&document.text), "Read document");
    Ok(document)
}

/// Read every supported file in a directory.
pub async fn ingest_directory(dir_path: &Path) -> Result<Vec<Document>> {
    let documents = FileReader::read_directory(dir_path).await?;
    tracing::debug!(dir = ?dir_path, documents = documents.len(), "Read directory");
    Ok(documents)
}
