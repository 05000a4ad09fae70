use std::{fmt, ops::Range};

/// A contiguous run of elements inside an allocator's backing store.
///
/// ```text
///   offset  0   1   2   3   4   5   6   7   8   9
///         ┌───┬───┬───┬───┬───┬───┬───┬───┬───┬───┐
///         │ A │ A │ A │ A │ . │ . │ . │ . │ . │ . │
///         └───┴───┴───┴───┴───┴───┴───┴───┴───┴───┘
///
///   A = Section { offset: 0, len: 4 }  (allocated)
///   . = Section { offset: 4, len: 6 }  (free)
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Section {
  pub offset: usize,
  pub len: usize,
}

impl Section {
  pub const fn new(
    offset: usize,
    len: usize,
  ) -> Self {
    Self { offset, len }
  }

  /// One past the last element of the section.
  pub const fn end(&self) -> usize {
    self.offset + self.len
  }

  pub const fn range(&self) -> Range<usize> {
    self.offset..self.end()
  }

  /// Splits off the first `n` elements, shrinking `self` to the remainder.
  pub(crate) fn take_front(
    &mut self,
    n: usize,
  ) -> Section {
    let front = Section::new(self.offset, n);
    self.offset += n;
    self.len -= n;
    front
  }
}

impl fmt::Display for Section {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    write!(f, "[{}..{})", self.offset, self.end())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_take_front() {
    let mut section = Section::new(4, 6);
    let front = section.take_front(2);

    assert_eq!(front, Section::new(4, 2));
    assert_eq!(section, Section::new(6, 4));
    assert_eq!(front.end(), section.offset);
  }

  #[test]
  fn test_display() {
    assert_eq!(Section::new(3, 5).to_string(), "[3..8)");
  }
}
