//! Paragraph-packing text chunker
//!
//! Splits document text into retrieval-sized chunks. Paragraph boundaries
//! are respected where possible; paragraphs larger than the chunk size are
//! split on whitespace.

/// Default chunk size in characters
pub const DEFAULT_CHUNK_SIZE: usize = 1200;

/// Split text into chunks of at most `chunk_size` characters
///
/// Consecutive paragraphs are packed into one chunk until the next
/// paragraph would overflow it. Whitespace-only input yields no chunks.
#[must_use]
pub fn chunk_text(text: &str, chunk_size: usize) -> Vec<String> {
    if text.trim().is_empty() || chunk_size == 0 {
        return Vec::new();
    }

    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();

    for paragraph in text.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
        if paragraph.chars().count() > chunk_size {
            // Oversized paragraph: flush what we have, then split it on words
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            chunks.extend(split_long_paragraph(paragraph, chunk_size));
            continue;
        }

        let needed = if current.is_empty() {
            paragraph.chars().count()
        } else {
            current.chars().count() + 2 + paragraph.chars().count()
        };

        if needed > chunk_size && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
        }

        if current.is_empty() {
            current.push_str(paragraph);
        } else {
            current.push_str("\n\n");
            current.push_str(paragraph);
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

/// Split an oversized paragraph on word boundaries
fn split_long_paragraph(paragraph: &str, chunk_size: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for word in paragraph.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };

        if needed > chunk_size && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
        }

        if current.is_empty() {
            // A single word longer than the chunk size becomes its own chunk
            current.push_str(word);
        } else {
            current.push(' ');
            current.push_str(word);
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
