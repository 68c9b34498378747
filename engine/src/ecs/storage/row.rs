/// A row in an archetype table. Indexes the table's entity list and every column alike.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Row(usize);

impl Row {
    #[inline]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for Row {
    fn from(value: usize) -> Self {
        Self::new(value)
    }
}
