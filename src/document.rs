//! Document collaborators
//!
//! The transformation never reaches for an ambient "active document". Callers
//! hand it anything that can read and write its full text.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::DocumentError;
use crate::transform::{normalize_with, LineEndingPolicy};

/// Plain-text read/write access to a document body
pub trait DocumentBody {
    /// Read the full text
    fn get_text(&self) -> Result<String, DocumentError>;

    /// Replace the full text
    fn set_text(&mut self, text: String) -> Result<(), DocumentError>;
}

/// Read the body, double its newlines, and write it back.
///
/// Collaborator failures propagate as-is. Nothing is written if the read fails.
pub fn double_newlines<B: DocumentBody + ?Sized>(
    body: &mut B,
    policy: LineEndingPolicy,
) -> Result<(), DocumentError> {
    let text = body.get_text()?;
    let updated = normalize_with(&text, policy);
    body.set_text(updated)
}

/// Represents the state of a text document open in the editor
#[derive(Debug, Clone)]
pub struct Document {
    /// The document text content
    pub text: String,
    /// The document version
    pub version: i32,
}

impl Document {
    /// Create a new document with the given text and version
    pub fn new(text: String, version: i32) -> Self {
        Self { text, version }
    }
}

impl DocumentBody for Document {
    fn get_text(&self) -> Result<String, DocumentError> {
        Ok(self.text.clone())
    }

    fn set_text(&mut self, text: String) -> Result<(), DocumentError> {
        self.text = text;
        Ok(())
    }
}

/// A document stored as a UTF-8 file on disk
#[derive(Debug, Clone)]
pub struct FileDocument {
    path: PathBuf,
}

impl FileDocument {
    /// Create a document backed by the file at `path`; nothing is read yet
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentBody for FileDocument {
    fn get_text(&self) -> Result<String, DocumentError> {
        fs::read_to_string(&self.path).map_err(|source| DocumentError::Read {
            path: self.path.clone(),
            source,
        })
    }

    fn set_text(&mut self, text: String) -> Result<(), DocumentError> {
        fs::write(&self.path, text).map_err(|source| DocumentError::Write {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!("Wrote {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Body whose reads or writes can be made to fail
    #[derive(Default)]
    struct FlakyBody {
        text: String,
        fail_read: bool,
        fail_write: bool,
        writes: usize,
    }

    impl DocumentBody for FlakyBody {
        fn get_text(&self) -> Result<String, DocumentError> {
            if self.fail_read {
                return Err(DocumentError::Read {
                    path: PathBuf::from("flaky"),
                    source: std::io::Error::other("unavailable"),
                });
            }
            Ok(self.text.clone())
        }

        fn set_text(&mut self, text: String) -> Result<(), DocumentError> {
            self.writes += 1;
            if self.fail_write {
                return Err(DocumentError::Write {
                    path: PathBuf::from("flaky"),
                    source: std::io::Error::other("read-only"),
                });
            }
            self.text = text;
            Ok(())
        }
    }

    #[test]
    fn test_double_newlines_in_memory_document() {
        let mut doc = Document::new("one\ntwo".to_string(), 3);
        double_newlines(&mut doc, LineEndingPolicy::Preserve).unwrap();

        assert_eq!(doc.text, "one\n\ntwo");
        assert_eq!(doc.version, 3);
    }

    #[test]
    fn test_failed_read_skips_write() {
        let mut body = FlakyBody {
            text: "a\nb".to_string(),
            fail_read: true,
            ..Default::default()
        };

        let result = double_newlines(&mut body, LineEndingPolicy::Preserve);

        assert!(matches!(result, Err(DocumentError::Read { .. })));
        assert_eq!(body.writes, 0);
        assert_eq!(body.text, "a\nb");
    }

    #[test]
    fn test_failed_write_propagates() {
        let mut body = FlakyBody {
            text: "a\nb".to_string(),
            fail_write: true,
            ..Default::default()
        };

        let result = double_newlines(&mut body, LineEndingPolicy::Preserve);

        assert!(matches!(result, Err(DocumentError::Write { .. })));
        assert_eq!(body.writes, 1);
        assert_eq!(body.text, "a\nb");
    }

    #[test]
    fn test_repeated_calls_keep_doubling() {
        let mut doc = Document::new("a\nb".to_string(), 1);
        double_newlines(&mut doc, LineEndingPolicy::Preserve).unwrap();
        double_newlines(&mut doc, LineEndingPolicy::Preserve).unwrap();

        assert_eq!(doc.text, "a\n\n\n\nb");
    }

    #[test]
    fn test_works_through_trait_object() {
        let mut doc = Document::new("x\r\ny".to_string(), 1);
        let body: &mut dyn DocumentBody = &mut doc;
        double_newlines(body, LineEndingPolicy::NormalizeToLf).unwrap();

        assert_eq!(doc.text, "x\n\ny");
    }
}
