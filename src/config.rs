/// What happens to a section when it is handed back to the free list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Coalesce {
  /// Append the section as-is. Neighbouring free sections stay separate, so
  /// the free list can fragment even though total free capacity is conserved.
  #[default]
  Never,
  /// Merge the section with any free section that touches it on either side.
  Adjacent,
}

/// Construction-time settings for [`FreeListAllocator`](crate::FreeListAllocator).
///
/// Capacity is not part of the config; it is the `MAX` const parameter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AllocatorConfig {
  pub coalesce: Coalesce,
}

impl AllocatorConfig {
  /// Default settings: no coalescing.
  pub const fn new() -> Self {
    Self {
      coalesce: Coalesce::Never,
    }
  }

  /// Settings that merge adjacent free sections on deallocation.
  pub const fn coalescing() -> Self {
    Self {
      coalesce: Coalesce::Adjacent,
    }
  }

  pub const fn with_coalesce(
    mut self,
    coalesce: Coalesce,
  ) -> Self {
    self.coalesce = coalesce;
    self
  }
}
