use crate::{Lexer, Line};

/// Streaming iterator over classified lines
pub struct LineIter<'a> {
    lexer: Lexer<'a>,
}

impl<'a> LineIter<'a> {
    pub fn new(lexer: Lexer<'a>) -> Self {
        Self { lexer }
    }
}

impl<'a> Iterator for LineIter<'a> {
    type Item = Line<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.lexer.next_line()
    }
}

impl std::iter::FusedIterator for LineIter<'_> {}
