//! # rallocator - Fixed-Capacity Allocators
//!
//! This crate provides a **free-list allocator** that serves requests from a
//! fixed-size backing store, plus a small **counting allocator** over the C heap.
//!
//! ## Overview
//!
//! The free-list allocator owns a buffer of `MAX` elements and hands out
//! contiguous [`Section`]s of it using a first-fit search:
//!
//! ```text
//!   Free-List Allocator (MAX = 10):
//!
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                        BACKING STORE                                 │
//!   │                                                                      │
//!   │   ┌───────────────┬───────────┬───────────┬───────────────────────┐  │
//!   │   │  A (0, 4)     │ free(4,2) │ B (6, 2)  │      free (8, 2)      │  │
//!   │   └───────────────┴───────────┴───────────┴───────────────────────┘  │
//!   │                                                                      │
//!   │   free list: [(4, 2), (8, 2)]   searched front to back               │
//!   │   allocated: [(0, 4), (6, 2)]                                        │
//!   └──────────────────────────────────────────────────────────────────────┘
//!
//!   allocate(n): first free section with len >= n wins.
//!                exact fit -> whole section moves to the allocated set.
//!                larger    -> first n elements are split off.
//! ```
//!
//! Allocated and free sections always tile the store exactly: no overlaps, no
//! gaps, and their lengths add up to `MAX`.
//!
//! ## Crate Structure
//!
//! ```text
//!   rallocator
//!   ├── config     - AllocatorConfig and the Coalesce policy
//!   ├── counting   - CountingAllocator (C heap, element accounting)
//!   ├── error      - AllocError
//!   ├── free_list  - FreeListAllocator and Usage
//!   └── section    - Section (offset, len)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use rallocator::{AllocError, FreeListAllocator, Section};
//!
//! let mut allocator = FreeListAllocator::<i32, 10>::new();
//!
//! let head = allocator.allocate(4)?;
//! assert_eq!(head, Section::new(0, 4));
//!
//! let tail = allocator.allocate(6)?;
//! assert!(matches!(allocator.allocate(1), Err(AllocError::OutOfCapacity { .. })));
//!
//! allocator.release(tail)?;
//! assert_eq!(allocator.free_sections(), &[Section::new(4, 6)]);
//! # Ok::<(), AllocError>(())
//! ```
//!
//! ## Coalescing
//!
//! By default a released section is appended to the free list untouched, so
//! neighbouring free sections are never merged:
//!
//! ```text
//!   release (0,5) then (5,5), Coalesce::Never:     free = [(0,5), (5,5)]
//!   release (0,5) then (5,5), Coalesce::Adjacent:  free = [(0,10)]
//! ```
//!
//! With [`Coalesce::Never`] total free capacity is conserved but a request
//! larger than every single free section fails even when the sum would fit.
//! Pick [`Coalesce::Adjacent`] through [`AllocatorConfig`] to merge on release.
//!
//! ## Logging
//!
//! Operations emit [`tracing`] events (`debug` on success, `warn` on a rejected
//! deallocation). The crate never installs a subscriber.
//!
//! ## Limitations
//!
//! - **Single mutator**: mutation takes `&mut self`; share it across threads
//!   only behind a lock of your own
//! - **No reallocation**: sections never grow or shrink in place
//! - **Capacity only**: the allocator does not construct or drop `T` values
//! - **Unix-only**: `CountingAllocator` requires `libc` (POSIX systems)

mod config;
mod counting;
mod error;
mod free_list;
mod section;

pub use config::{AllocatorConfig, Coalesce};
pub use counting::CountingAllocator;
pub use error::AllocError;
pub use free_list::{FreeListAllocator, Usage};
pub use section::Section;
