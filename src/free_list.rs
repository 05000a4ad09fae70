use std::{fmt, mem::MaybeUninit, ptr::NonNull, slice};

use tracing::{debug, trace, warn};

use crate::{
  config::{AllocatorConfig, Coalesce},
  error::AllocError,
  section::Section,
};

/// Point-in-time accounting of a [`FreeListAllocator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Usage {
  pub capacity: usize,
  pub free: usize,
  pub allocated: usize,
  pub free_sections: usize,
  pub allocated_sections: usize,
  pub largest_free: usize,
}

impl fmt::Display for Usage {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    write!(
      f,
      "{}/{} allocated in {} section(s), {} free in {} section(s), largest free {}",
      self.allocated,
      self.capacity,
      self.allocated_sections,
      self.free,
      self.free_sections,
      self.largest_free
    )
  }
}

/// First-fit allocator over a fixed store of `MAX` elements of `T`.
///
/// The store is owned by the allocator and never reallocated. Requests are
/// answered with [`Section`]s (offset plus length); the elements behind a live
/// section are reached through [`get`](Self::get), [`get_mut`](Self::get_mut)
/// or [`as_mut_ptr`](Self::as_mut_ptr).
///
/// The allocator only tracks capacity. It never initializes, reads or drops
/// the `T` values stored in a section; that is up to the caller.
pub struct FreeListAllocator<T, const MAX: usize> {
  // Leaked `Box<[MaybeUninit<T>]>` of length `MAX`, reclaimed in `Drop`.
  // Every slice and pointer is derived from this base, so borrowing one
  // section never retags the elements of another.
  store: NonNull<MaybeUninit<T>>,
  allocated: Vec<Section>,
  free: Vec<Section>,
  config: AllocatorConfig,
}

impl<T, const MAX: usize> FreeListAllocator<T, MAX> {
  pub fn new() -> Self {
    Self::with_config(AllocatorConfig::default())
  }

  pub fn with_config(config: AllocatorConfig) -> Self {
    let free = if MAX == 0 {
      Vec::new()
    } else {
      vec![Section::new(0, MAX)]
    };

    Self {
      store: leak_store::<T>(MAX),
      allocated: Vec::new(),
      free,
      config,
    }
  }

  /// Carves `n` elements out of the first free section that can hold them.
  ///
  /// An exact fit consumes the whole free section; a larger one is split and
  /// its tail stays in the free list at the same position.
  pub fn allocate(
    &mut self,
    n: usize,
  ) -> Result<Section, AllocError> {
    if n == 0 {
      return Err(AllocError::ZeroLength);
    }

    let Some(index) = self.free.iter().position(|section| section.len >= n) else {
      return Err(AllocError::OutOfCapacity {
        requested: n,
        largest_free: self.largest_free(),
      });
    };

    let section = if self.free[index].len == n {
      self.free.remove(index)
    } else {
      self.free[index].take_front(n)
    };

    self.allocated.push(section);

    debug!(
      offset = section.offset,
      len = section.len,
      free = self.free_capacity(),
      "allocated section"
    );

    Ok(section)
  }

  /// Returns the live section `(offset, len)` to the free list.
  ///
  /// The pair must match a section handed out by [`allocate`](Self::allocate)
  /// exactly; anything else is rejected and nothing changes.
  pub fn deallocate(
    &mut self,
    offset: usize,
    len: usize,
  ) -> Result<(), AllocError> {
    let wanted = Section::new(offset, len);

    let Some(index) = self.allocated.iter().position(|section| *section == wanted) else {
      warn!(offset, len, "rejected deallocation of a section that is not live");
      return Err(AllocError::InvalidDeallocation { offset, len });
    };

    let section = self.allocated.swap_remove(index);

    match self.config.coalesce {
      Coalesce::Never => self.free.push(section),
      Coalesce::Adjacent => self.insert_coalesced(section),
    }

    debug!(
      offset,
      len,
      free = self.free_capacity(),
      "deallocated section"
    );

    Ok(())
  }

  pub fn release(
    &mut self,
    section: Section,
  ) -> Result<(), AllocError> {
    self.deallocate(section.offset, section.len)
  }

  fn insert_coalesced(
    &mut self,
    section: Section,
  ) {
    let before = self.free.iter().position(|free| free.end() == section.offset);
    let after = self.free.iter().position(|free| free.offset == section.end());

    match (before, after) {
      (Some(before), Some(after)) => {
        let tail = self.free[after];
        self.free[before].len += section.len + tail.len;
        self.free.remove(after);
        trace!(merged = %section, "joined free sections on both sides");
      }
      (Some(before), None) => {
        self.free[before].len += section.len;
        trace!(merged = %section, "extended preceding free section");
      }
      (None, Some(after)) => {
        self.free[after].offset = section.offset;
        self.free[after].len += section.len;
        trace!(merged = %section, "extended following free section");
      }
      (None, None) => self.free.push(section),
    }
  }

  pub const fn capacity(&self) -> usize {
    MAX
  }

  pub fn config(&self) -> AllocatorConfig {
    self.config
  }

  pub fn free_capacity(&self) -> usize {
    self.free.iter().map(|section| section.len).sum()
  }

  pub fn allocated_capacity(&self) -> usize {
    self.allocated.iter().map(|section| section.len).sum()
  }

  /// Length of the biggest free section, i.e. the largest request that can
  /// currently succeed.
  pub fn largest_free(&self) -> usize {
    self.free.iter().map(|section| section.len).max().unwrap_or(0)
  }

  /// Free sections in free-list (search) order.
  pub fn free_sections(&self) -> &[Section] {
    &self.free
  }

  pub fn allocated_sections(&self) -> &[Section] {
    &self.allocated
  }

  pub fn is_live(
    &self,
    section: Section,
  ) -> bool {
    self.allocated.contains(&section)
  }

  pub fn usage(&self) -> Usage {
    Usage {
      capacity: MAX,
      free: self.free_capacity(),
      allocated: self.allocated_capacity(),
      free_sections: self.free.len(),
      allocated_sections: self.allocated.len(),
      largest_free: self.largest_free(),
    }
  }

  pub fn get(
    &self,
    section: Section,
  ) -> Option<&[MaybeUninit<T>]> {
    if !self.is_live(section) {
      return None;
    }

    // SAFETY: live sections lie inside the store and `&self` rules out a
    // concurrent `&mut` borrow of the same elements.
    Some(unsafe { slice::from_raw_parts(self.store.add(section.offset).as_ptr(), section.len) })
  }

  pub fn get_mut(
    &mut self,
    section: Section,
  ) -> Option<&mut [MaybeUninit<T>]> {
    if !self.is_live(section) {
      return None;
    }

    // SAFETY: live sections lie inside the store and never overlap, and the
    // slice only covers `section`, leaving other sections' pointers intact.
    Some(unsafe { slice::from_raw_parts_mut(self.store.add(section.offset).as_ptr(), section.len) })
  }

  /// Start address of a live section, valid for `section.len` elements until
  /// the section is deallocated or the allocator is dropped.
  ///
  /// Borrowing other sections through [`get_mut`](Self::get_mut) or
  /// `as_mut_ptr` does not invalidate the pointer. Holding it alongside a
  /// slice of the *same* section is the caller's aliasing problem.
  pub fn as_mut_ptr(
    &mut self,
    section: Section,
  ) -> Option<NonNull<T>> {
    if !self.is_live(section) {
      return None;
    }

    // SAFETY: live sections are non-empty and lie inside the store, so
    // `offset < MAX` and the result stays in bounds.
    Some(unsafe { self.store.add(section.offset) }.cast::<T>())
  }

  /// Checks that the allocated and free sections tile `0..MAX` exactly, with
  /// no overlaps and no empty sections.
  pub fn is_consistent(&self) -> bool {
    let mut sections: Vec<Section> = self.allocated.iter().chain(&self.free).copied().collect();
    sections.sort_unstable();

    let mut cursor = 0;
    for section in sections {
      if section.len == 0 || section.offset != cursor {
        return false;
      }
      cursor = section.end();
    }

    cursor == MAX
  }
}

fn leak_store<T>(len: usize) -> NonNull<MaybeUninit<T>> {
  let store: Box<[MaybeUninit<T>]> = Box::new_uninit_slice(len);
  NonNull::from(Box::leak(store)).cast::<MaybeUninit<T>>()
}

impl<T, const MAX: usize> Drop for FreeListAllocator<T, MAX> {
  fn drop(&mut self) {
    let store = NonNull::slice_from_raw_parts(self.store, MAX);

    // SAFETY: `store` came from `leak_store(MAX)` and is reclaimed once.
    // `MaybeUninit` has no drop glue, so element values are left alone.
    drop(unsafe { Box::from_raw(store.as_ptr()) });
  }
}

// SAFETY: the allocator uniquely owns its store, exactly as a
// `Box<[MaybeUninit<T>]>` field would.
unsafe impl<T: Send, const MAX: usize> Send for FreeListAllocator<T, MAX> {}
unsafe impl<T: Sync, const MAX: usize> Sync for FreeListAllocator<T, MAX> {}

impl<T, const MAX: usize> Default for FreeListAllocator<T, MAX> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T, const MAX: usize> fmt::Debug for FreeListAllocator<T, MAX> {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    f.debug_struct("FreeListAllocator")
      .field("capacity", &MAX)
      .field("allocated", &self.allocated)
      .field("free", &self.free)
      .field("config", &self.config)
      .finish()
  }
}
