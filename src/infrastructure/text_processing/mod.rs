mod composite_file_loader;
mod csv_adapter;
mod docx_adapter;
mod html_adapter;
mod mock_file_loader;
mod pdf_adapter;
mod plain_text_adapter;
mod recursive_character_splitter;
mod text_sanitizer;

pub use composite_file_loader::CompositeFileLoader;
pub use csv_adapter::CsvAdapter;
pub use docx_adapter::DocxAdapter;
pub use html_adapter::{HtmlAdapter, html_to_text};
pub use mock_file_loader::MockFileLoader;
pub use pdf_adapter::PdfAdapter;
pub use plain_text_adapter::PlainTextAdapter;
pub use recursive_character_splitter::RecursiveCharacterSplitter;
pub use text_sanitizer::sanitize_extracted_text;
