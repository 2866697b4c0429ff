#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Line<'a> {
    pub index: usize,
    pub content: &'a str,
}

impl<'a> Line<'a> {
    pub fn new(index: usize, content: &'a str) -> Line<'a> {
        Line { index, content }
    }
}
