use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::Document;

/// Treats every payload as UTF-8 text regardless of content type.
pub struct MockFileLoader;

#[async_trait::async_trait]
impl FileLoader for MockFileLoader {
    async fn extract_text(&self, data: &[u8], doc: &Document) -> Result<String, FileLoaderError> {
        let text = String::from_utf8(data.to_vec())
            .map_err(|e| FileLoaderError::ExtractionFailed(e.to_string()))?;
        if text.trim().is_empty() {
            return Err(FileLoaderError::NoTextFound(doc.name.clone()));
        }
        Ok(text)
    }
}
