//! Text document model: the ordered list of text blocks of a page.

mod builder;
mod label;
mod text_block;

pub use builder::{build_text_document, ElementAction};
pub use label::Label;
pub use text_block::TextBlock;

/// Blocks of a page in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextDocument {
    pub blocks: Vec<TextBlock>,
}

impl TextDocument {
    #[must_use]
    pub fn new(blocks: Vec<TextBlock>) -> Self {
        Self { blocks }
    }

    /// Text of the content blocks, each followed by a newline.
    #[must_use]
    pub fn content_text(&self) -> String {
        let mut out = String::new();
        for block in self.blocks.iter().filter(|b| b.is_content) {
            out.push_str(&block.text);
            out.push('\n');
        }
        out
    }

    /// Number of words in the content blocks.
    #[must_use]
    pub fn content_word_count(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| b.is_content)
            .map(|b| b.num_words)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_text_and_word_count() {
        let mut a = TextBlock::new("one two", 2, 0);
        a.is_content = true;
        let b = TextBlock::new("menu", 1, 1);
        let mut c = TextBlock::new("three", 1, 0);
        c.is_content = true;
        let doc = TextDocument::new(vec![a, b, c]);

        assert_eq!(doc.content_text(), "one two\nthree\n");
        assert_eq!(doc.content_word_count(), 3);
    }
}
