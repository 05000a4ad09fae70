use thiserror::Error;

/// Errors reported by the allocators in this crate.
///
/// Every variant is recoverable: the allocator that returned it is left in
/// exactly the state it had before the failed call.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AllocError {
  /// No free section is large enough for the request.
  #[error("out of capacity: requested {requested} element(s), largest free section is {largest_free}")]
  OutOfCapacity { requested: usize, largest_free: usize },

  /// The `(offset, len)` pair does not name a live allocation.
  #[error("invalid deallocation: no live section at offset {offset} with length {len}")]
  InvalidDeallocation { offset: usize, len: usize },

  /// A request for zero elements.
  #[error("zero-length allocation request")]
  ZeroLength,

  /// `n * size_of::<T>()` does not fit in a `Layout`.
  #[error("layout overflow: {requested} element(s) exceed the addressable size")]
  LayoutOverflow { requested: usize },

  /// The C heap refused the request.
  #[error("out of memory: the system allocator could not provide {bytes} bytes")]
  OutOfMemory { bytes: usize },
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_messages_carry_fields() {
    let err = AllocError::OutOfCapacity {
      requested: 7,
      largest_free: 3,
    };
    assert_eq!(
      err.to_string(),
      "out of capacity: requested 7 element(s), largest free section is 3"
    );

    let err = AllocError::InvalidDeallocation { offset: 4, len: 2 };
    assert!(err.to_string().contains("offset 4"));
    assert!(err.to_string().contains("length 2"));
  }
}
