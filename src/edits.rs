//! Workspace edits sent back to the editor

use tower_lsp::lsp_types::{
    DocumentChanges, OneOf, OptionalVersionedTextDocumentIdentifier, Position, Range,
    TextDocumentEdit, TextEdit, Url, WorkspaceEdit,
};

use crate::document::{double_newlines, Document};
use crate::error::DocumentError;
use crate::transform::LineEndingPolicy;

/// Range spanning the whole of `text`.
///
/// Lines end at `\n`, `\r\n` or a lone `\r`; characters are counted in UTF-16
/// code units as LSP positions require.
pub fn full_range(text: &str) -> Range {
    let mut line = 0u32;
    let mut character = 0u32;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\n' => {
                line += 1;
                character = 0;
            }
            '\r' => {
                if chars.peek() != Some(&'\n') {
                    line += 1;
                    character = 0;
                }
            }
            _ => character += ch.len_utf16() as u32,
        }
    }

    Range {
        start: Position::new(0, 0),
        end: Position::new(line, character),
    }
}

/// Edit replacing the entire content of `old_text` with `new_text`.
///
/// The edit is pinned to `version`, so a client whose buffer has moved past
/// that version rejects it instead of overwriting newer text.
pub fn replace_document_edit(
    uri: &Url,
    version: i32,
    old_text: &str,
    new_text: String,
) -> WorkspaceEdit {
    let edit = TextEdit {
        range: full_range(old_text),
        new_text,
    };

    WorkspaceEdit {
        document_changes: Some(DocumentChanges::Edits(vec![TextDocumentEdit {
            text_document: OptionalVersionedTextDocumentIdentifier {
                uri: uri.clone(),
                version: Some(version),
            },
            edits: vec![OneOf::Left(edit)],
        }])),
        ..Default::default()
    }
}

/// Edit that doubles the newlines of `document`.
///
/// The stored document is not modified; the editor applies the edit and
/// syncs the new text back. Returns `None` when the text would not change.
pub fn double_newlines_edit(
    uri: &Url,
    document: &Document,
    policy: LineEndingPolicy,
) -> Result<Option<WorkspaceEdit>, DocumentError> {
    let mut updated = document.clone();
    double_newlines(&mut updated, policy)?;

    if updated.text == document.text {
        return Ok(None);
    }

    Ok(Some(replace_document_edit(
        uri,
        document.version,
        &document.text,
        updated.text,
    )))
}
