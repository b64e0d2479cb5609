use chatforge::domain::ContentType;

#[test]
fn given_known_extension_when_detecting_then_extension_wins_over_generic_mime() {
    assert_eq!(
        ContentType::detect("Handbook.PDF", Some("application/octet-stream")),
        Some(ContentType::Pdf)
    );
    assert_eq!(
        ContentType::detect("prices.csv", None),
        Some(ContentType::Csv)
    );
    assert_eq!(
        ContentType::detect("notes.md", None),
        Some(ContentType::Text)
    );
}

#[test]
fn given_no_extension_when_detecting_then_mime_type_is_used() {
    assert_eq!(
        ContentType::detect("upload", Some("text/html; charset=utf-8")),
        Some(ContentType::Html)
    );
    assert_eq!(
        ContentType::detect(
            "contract",
            Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document")
        ),
        Some(ContentType::Docx)
    );
}

#[test]
fn given_unsupported_file_when_detecting_then_returns_none() {
    assert_eq!(ContentType::detect("tool.exe", Some("application/x-msdownload")), None);
    assert_eq!(ContentType::detect("archive", None), None);
}

#[test]
fn given_content_type_when_rendering_mime_then_it_detects_back() {
    for content_type in [
        ContentType::Pdf,
        ContentType::Docx,
        ContentType::Text,
        ContentType::Csv,
        ContentType::Html,
    ] {
        assert_eq!(ContentType::from_mime(content_type.as_mime()), Some(content_type));
    }
}
