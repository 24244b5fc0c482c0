/// Number of lines in `text`: line terminators plus one.
///
/// A `\r\n` pair counts once; a trailing terminator opens an (empty) last line.
pub fn line_count(text: &str) -> usize {
    text.bytes().filter(|&b| b == b'\n').count() + 1
}

/// Maps byte offsets in a source text to 1-based line numbers.
pub struct LineIndex {
    /// Byte offset of the first byte of every line after the first.
    starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let starts = text
            .bytes()
            .enumerate()
            .filter(|&(_, b)| b == b'\n')
            .map(|(i, _)| i + 1)
            .collect();
        Self { starts }
    }

    /// Line containing `offset`, counting from 1.
    pub fn line_of(&self, offset: usize) -> usize {
        self.starts.partition_point(|&start| start <= offset) + 1
    }
}
