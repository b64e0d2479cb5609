use async_trait::async_trait;

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::{ContentType, Document};

/// Renders every record as `header: value` pairs so each line stands on its
/// own once chunked.
pub struct CsvAdapter;

impl CsvAdapter {
    fn render(data: &[u8]) -> Result<String, FileLoaderError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(data);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| FileLoaderError::ExtractionFailed(e.to_string()))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut lines = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| FileLoaderError::ExtractionFailed(e.to_string()))?;

            let fields: Vec<String> = record
                .iter()
                .enumerate()
                .filter(|(_, value)| !value.is_empty())
                .map(|(i, value)| match headers.get(i).filter(|h| !h.is_empty()) {
                    Some(header) => format!("{header}: {value}"),
                    None => value.to_string(),
                })
                .collect();

            if !fields.is_empty() {
                lines.push(fields.join("; "));
            }
        }

        Ok(lines.join("\n"))
    }
}

#[async_trait]
impl FileLoader for CsvAdapter {
    async fn extract_text(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<String, FileLoaderError> {
        if document.content_type != ContentType::Csv {
            return Err(FileLoaderError::UnsupportedContentType(
                document.content_type.as_mime().to_string(),
            ));
        }

        Self::render(data)
    }
}
