use std::collections::VecDeque;

use async_trait::async_trait;

use crate::application::ports::{TextSplitter, TextSplitterError};
use crate::domain::{Chunk, Document};

/// Coarsest first; the empty separator splits between characters.
const SEPARATORS: &[&str] = &["\n\n", "\n", " ", ""];

/// Splits on paragraph, line, then word boundaries, falling back to single
/// characters, and packs the pieces into chunks of at most `chunk_size`
/// characters that share up to `chunk_overlap` characters with their
/// predecessor.
#[derive(Debug)]
pub struct RecursiveCharacterSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

impl RecursiveCharacterSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self, TextSplitterError> {
        if chunk_size == 0 {
            return Err(TextSplitterError::InvalidConfiguration(
                "chunk_size must be positive".to_string(),
            ));
        }
        if chunk_overlap >= chunk_size {
            return Err(TextSplitterError::InvalidConfiguration(format!(
                "chunk_overlap ({chunk_overlap}) must be smaller than chunk_size ({chunk_size})"
            )));
        }

        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    pub fn split_text(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, SEPARATORS)
    }

    fn split_recursive(&self, text: &str, separators: &[&str]) -> Vec<String> {
        let position = separators
            .iter()
            .position(|s| s.is_empty() || text.contains(s))
            .unwrap_or(separators.len().saturating_sub(1));
        let separator = separators.get(position).copied().unwrap_or("");
        let finer = separators.get(position + 1..).unwrap_or_default();

        let splits: Vec<&str> = if separator.is_empty() {
            text.char_indices()
                .map(|(i, c)| &text[i..i + c.len_utf8()])
                .collect()
        } else {
            text.split(separator).filter(|s| !s.is_empty()).collect()
        };

        let mut chunks = Vec::new();
        let mut fitting: Vec<&str> = Vec::new();

        for split in splits {
            if char_len(split) <= self.chunk_size {
                fitting.push(split);
                continue;
            }

            if !fitting.is_empty() {
                chunks.extend(self.merge_splits(&fitting, separator));
                fitting.clear();
            }
            if finer.is_empty() {
                chunks.push(split.to_string());
            } else {
                chunks.extend(self.split_recursive(split, finer));
            }
        }

        if !fitting.is_empty() {
            chunks.extend(self.merge_splits(&fitting, separator));
        }
        chunks
    }

    /// Greedily joins pieces no longer than `chunk_size`; when a chunk is
    /// emitted, pieces are dropped from the front until at most
    /// `chunk_overlap` characters remain to seed the next one.
    fn merge_splits(&self, splits: &[&str], separator: &str) -> Vec<String> {
        let separator_len = char_len(separator);
        let mut chunks = Vec::new();
        let mut current: VecDeque<&str> = VecDeque::new();
        let mut total = 0;

        for split in splits {
            let len = char_len(split);
            let joined_len = if current.is_empty() { 0 } else { separator_len };

            if total + len + joined_len > self.chunk_size && !current.is_empty() {
                push_joined(&mut chunks, &current, separator);

                loop {
                    let pending = if current.is_empty() { 0 } else { separator_len };
                    let too_long = total > 0 && total + len + pending > self.chunk_size;
                    if total <= self.chunk_overlap && !too_long {
                        break;
                    }
                    let Some(first) = current.pop_front() else {
                        break;
                    };
                    total -= char_len(first);
                    if !current.is_empty() {
                        total -= separator_len;
                    }
                }
            }

            if !current.is_empty() {
                total += separator_len;
            }
            current.push_back(split);
            total += len;
        }

        push_joined(&mut chunks, &current, separator);
        chunks
    }
}

fn push_joined(chunks: &mut Vec<String>, pieces: &VecDeque<&str>, separator: &str) {
    let joined = pieces.iter().copied().collect::<Vec<_>>().join(separator);
    let trimmed = joined.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

#[async_trait]
impl TextSplitter for RecursiveCharacterSplitter {
    async fn split(&self, text: &str, document: &Document) -> Result<Vec<Chunk>, TextSplitterError> {
        let mut search_from = 0;

        let chunks = self
            .split_text(text)
            .into_iter()
            .map(|chunk_text| {
                // Byte offset of the chunk in the source text when it appears verbatim.
                let offset = text
                    .get(search_from..)
                    .and_then(|rest| rest.find(&chunk_text))
                    .map(|pos| search_from + pos)
                    .unwrap_or(search_from);
                search_from = offset + chunk_text.chars().next().map_or(1, char::len_utf8);

                Chunk::new(
                    chunk_text,
                    document.id,
                    document.chatbot_id,
                    document.name.clone(),
                    offset,
                )
            })
            .collect();

        Ok(chunks)
    }
}
