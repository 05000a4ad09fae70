use std::{alloc::Layout, marker::PhantomData, mem, ptr::NonNull};

use libc::c_void;
use tracing::{debug, warn};

use crate::error::AllocError;

/// Allocator backed by the C heap that keeps a running count of the
/// elements it has handed out.
///
/// Each call to [`allocate`](Self::allocate) is an independent
/// `posix_memalign(3)` block; [`deallocate`](Self::deallocate) gives it back
/// with `free(3)`.
pub struct CountingAllocator<T> {
  outstanding: usize,
  allocations: usize,
  _marker: PhantomData<T>,
}

impl<T> CountingAllocator<T> {
  pub const fn new() -> Self {
    Self {
      outstanding: 0,
      allocations: 0,
      _marker: PhantomData,
    }
  }

  /// Allocates uninitialized room for `n` values of `T`.
  ///
  /// Zero-byte requests get a dangling, well-aligned pointer and never touch
  /// the C heap.
  pub fn allocate(
    &mut self,
    n: usize,
  ) -> Result<NonNull<T>, AllocError> {
    let layout = Layout::array::<T>(n).map_err(|_| AllocError::LayoutOverflow { requested: n })?;

    let ptr = if layout.size() == 0 {
      NonNull::dangling()
    } else {
      // posix_memalign wants a power of two that is a multiple of the word size.
      let align = layout.align().max(mem::size_of::<usize>());
      let mut raw: *mut c_void = std::ptr::null_mut();

      let status = unsafe { libc::posix_memalign(&mut raw, align, layout.size()) };
      if status != 0 {
        return Err(AllocError::OutOfMemory {
          bytes: layout.size(),
        });
      }

      NonNull::new(raw.cast::<T>()).ok_or(AllocError::OutOfMemory {
        bytes: layout.size(),
      })?
    };

    self.outstanding += n;
    self.allocations += 1;

    debug!(
      elements = n,
      address = ?ptr,
      outstanding_bytes = self.allocated_bytes(),
      "counting allocator handed out block"
    );

    Ok(ptr)
  }

  /// Frees a block obtained from [`allocate`](Self::allocate).
  ///
  /// # Safety
  ///
  /// `ptr` must come from `allocate(n)` on this allocator with the same `n`,
  /// and must not have been deallocated already.
  pub unsafe fn deallocate(
    &mut self,
    ptr: NonNull<T>,
    n: usize,
  ) {
    if mem::size_of::<T>() != 0 && n != 0 {
      unsafe { libc::free(ptr.as_ptr().cast::<c_void>()) };
    }

    if n > self.outstanding {
      warn!(
        elements = n,
        outstanding = self.outstanding,
        "counting allocator released more elements than are outstanding"
      );
    }
    self.outstanding = self.outstanding.saturating_sub(n);

    debug!(
      elements = n,
      address = ?ptr,
      outstanding_bytes = self.allocated_bytes(),
      "counting allocator released block"
    );
  }

  /// Elements currently handed out.
  pub fn allocated_elements(&self) -> usize {
    self.outstanding
  }

  pub fn allocated_bytes(&self) -> usize {
    self.outstanding * mem::size_of::<T>()
  }

  /// Successful `allocate` calls over the allocator's lifetime.
  pub fn total_allocations(&self) -> usize {
    self.allocations
  }
}

impl<T> Default for CountingAllocator<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T> Drop for CountingAllocator<T> {
  fn drop(&mut self) {
    if self.outstanding > 0 {
      warn!(
        elements = self.outstanding,
        "counting allocator dropped with outstanding elements"
      );
    }
  }
}
