use super::{ChatbotId, DocumentId};

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub chatbot_id: ChatbotId,
    /// Original filename, or the page URL for crawled content.
    pub name: String,
    pub content_type: ContentType,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    Pdf,
    Docx,
    Text,
    Csv,
    Html,
}

impl ContentType {
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence {
            "application/pdf" => Some(Self::Pdf),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Some(Self::Docx)
            }
            "text/plain" | "text/markdown" => Some(Self::Text),
            "text/csv" | "application/csv" => Some(Self::Csv),
            "text/html" | "application/xhtml+xml" => Some(Self::Html),
            _ => None,
        }
    }

    pub fn from_extension(filename: &str) -> Option<Self> {
        let (_, extension) = filename.rsplit_once('.')?;
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "txt" | "md" => Some(Self::Text),
            "csv" => Some(Self::Csv),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }

    /// Extension wins over the declared MIME type; browsers frequently send
    /// `application/octet-stream` for uploads.
    pub fn detect(filename: &str, mime: Option<&str>) -> Option<Self> {
        Self::from_extension(filename).or_else(|| mime.and_then(Self::from_mime))
    }

    pub fn as_mime(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Docx => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            Self::Text => "text/plain",
            Self::Csv => "text/csv",
            Self::Html => "text/html",
        }
    }
}

impl Document {
    pub fn new(
        chatbot_id: ChatbotId,
        name: String,
        content_type: ContentType,
        size_bytes: u64,
    ) -> Self {
        Self {
            id: DocumentId::new(),
            chatbot_id,
            name,
            content_type,
            size_bytes,
        }
    }

    pub fn with_id(mut self, id: DocumentId) -> Self {
        self.id = id;
        self
    }
}
