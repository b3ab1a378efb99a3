//! Turning user-supplied documents into plain input text.

use lopdf::Document;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::errors::{StudyError, StudyResult};

/// A page-oriented document that can hand out the text of each page in order.
pub trait PageSource {
    fn page_texts(&self) -> StudyResult<Vec<String>>;
}

/// Concatenates page texts in order with no separator between pages.
pub fn join_pages<I, S>(pages: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    pages.into_iter().fold(String::new(), |mut acc, page| {
        acc.push_str(page.as_ref());
        acc
    })
}

pub fn extract_pages(source: &dyn PageSource) -> StudyResult<String> {
    Ok(join_pages(source.page_texts()?))
}

/// A PDF whose text layer is read page by page
#[derive(Debug)]
pub struct PdfDocument {
    document: Document,
}

impl PdfDocument {
    pub fn from_bytes(bytes: &[u8]) -> StudyResult<Self> {
        let document = Document::load_mem(bytes)
            .map_err(|e| StudyError::Parsing(format!("Failed to read PDF: {}", e)))?;
        Ok(Self { document })
    }

    pub fn load(path: &Path) -> StudyResult<Self> {
        Self::from_bytes(&fs::read(path)?)
    }
}

impl PageSource for PdfDocument {
    /// Pages without a text layer contribute an empty string.
    fn page_texts(&self) -> StudyResult<Vec<String>> {
        self.document
            .get_pages()
            .keys()
            .map(|&page_number| {
                self.document.extract_text(&[page_number]).map_err(|e| {
                    StudyError::Parsing(format!("Failed to extract page {}: {}", page_number, e))
                })
            })
            .collect()
    }
}

/// Decodes raw bytes as UTF-8. Invalid sequences are an error, not replaced.
pub fn decode_text(bytes: Vec<u8>) -> StudyResult<String> {
    String::from_utf8(bytes)
        .map_err(|e| StudyError::Parsing(format!("Document is not valid UTF-8: {}", e)))
}

/// Reads a document from disk as input text.
///
/// Plain-text files (`.txt`, `.md`, or no extension) are decoded as UTF-8. PDFs
/// are read through [`PdfDocument`] with their pages joined in order.
pub fn load_document(path: &Path) -> StudyResult<String> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        None | Some("txt") | Some("md") | Some("text") => {
            debug!("Reading text document {}", path.display());
            decode_text(fs::read(path)?)
        }
        Some("pdf") => {
            debug!("Extracting PDF text from {}", path.display());
            extract_pages(&PdfDocument::load(path)?)
        }
        Some(other) => Err(StudyError::UnsupportedDocument(format!(
            "{} (.{} files are not supported; use a plain-text or PDF file)",
            path.display(),
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    struct FakePages(Vec<&'static str>);

    impl PageSource for FakePages {
        fn page_texts(&self) -> StudyResult<Vec<String>> {
            Ok(self.0.iter().map(|p| p.to_string()).collect())
        }
    }

    #[test]
    fn test_join_pages_without_separator() {
        assert_eq!(join_pages(["Page one.", "Page two."]), "Page one.Page two.");
        assert_eq!(join_pages(Vec::<String>::new()), "");

        let doc = FakePages(vec!["Cells ", "divide", "."]);
        assert_eq!(extract_pages(&doc).unwrap(), "Cells divide.");
    }

    #[test]
    fn test_load_plain_text() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "Mitochondria make ATP.\n").unwrap();
        assert_eq!(load_document(&path).unwrap(), "Mitochondria make ATP.\n");
    }

    #[test]
    fn test_invalid_utf8_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        fs::write(&path, [0x66, 0x6f, 0xff, 0xfe]).unwrap();
        assert!(matches!(load_document(&path), Err(StudyError::Parsing(_))));
    }

    /// Builds a PDF with one line of Helvetica text per page.
    fn pdf_with_pages(lines: &[&str]) -> Vec<u8> {
        use lopdf::content::{Content, Operation};
        use lopdf::{dictionary, Object, Stream};

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for line in lines {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 700.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*line)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Count" => kids.len() as i64,
                "Kids" => kids,
                "Resources" => resources_id,
                "MediaBox" => Object::Array(vec![0.into(), 0.into(), 595.into(), 842.into()]),
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_pdf_pages_joined_in_order_without_separator() {
        let bytes = pdf_with_pages(&["Cells divide.", "Mitosis has phases."]);
        let pages = PdfDocument::from_bytes(&bytes).unwrap().page_texts().unwrap();
        assert_eq!(pages.len(), 2);
        assert!(pages[0].contains("Cells divide."));
        assert!(pages[1].contains("Mitosis has phases."));

        let dir = tempdir().unwrap();
        let path = dir.path().join("lecture.PDF");
        fs::write(&path, &bytes).unwrap();
        assert_eq!(load_document(&path).unwrap(), pages.concat());
    }

    #[test]
    fn test_corrupt_pdf_is_parsing_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        fs::write(&path, b"not a pdf at all").unwrap();
        assert!(matches!(load_document(&path), Err(StudyError::Parsing(_))));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("slides.docx");
        fs::write(&path, b"PK").unwrap();
        assert!(matches!(
            load_document(&path),
            Err(StudyError::UnsupportedDocument(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            load_document(&dir.path().join("nope.txt")),
            Err(StudyError::Io(_))
        ));
    }
}
