use rallocator::{AllocError, AllocatorConfig, CountingAllocator, FreeListAllocator};
use tracing_subscriber::EnvFilter;

const MAX: usize = 10;

fn print_state<T>(
  label: &str,
  allocator: &FreeListAllocator<T, MAX>,
) {
  println!("[{label}] {}", allocator.usage());
  println!("    allocated = {:?}", allocator.allocated_sections());
  println!("    free      = {:?}", allocator.free_sections());
}

/// Allocates two halves, frees both, then asks for the whole store again.
fn fragmentation(config: AllocatorConfig) -> Result<(), AllocError> {
  let mut allocator = FreeListAllocator::<u8, MAX>::with_config(config);

  let left = allocator.allocate(5)?;
  let right = allocator.allocate(5)?;
  allocator.release(left)?;
  allocator.release(right)?;
  print_state(&format!("{:?} after freeing both halves", config.coalesce), &allocator);

  match allocator.allocate(MAX) {
    Ok(section) => println!("    allocate({MAX}) -> {section}"),
    Err(err) => println!("    allocate({MAX}) -> {err}"),
  }

  Ok(())
}

fn main() -> Result<(), AllocError> {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
  tracing_subscriber::fmt().with_env_filter(filter).init();

  let mut allocator = FreeListAllocator::<i32, MAX>::new();
  print_state("start", &allocator);

  // --------------------------------------------------------------------
  // 1) Split the single free section.
  // --------------------------------------------------------------------
  let head = allocator.allocate(4)?;
  for (i, slot) in allocator.get_mut(head).into_iter().flatten().enumerate() {
    slot.write(i as i32 * 10);
  }
  print_state("1: allocate(4)", &allocator);

  // --------------------------------------------------------------------
  // 2) Exact fit consumes the remainder.
  // --------------------------------------------------------------------
  let tail = allocator.allocate(6)?;
  print_state("2: allocate(6)", &allocator);

  // --------------------------------------------------------------------
  // 3) Nothing left.
  // --------------------------------------------------------------------
  if let Err(err) = allocator.allocate(1) {
    println!("[3: allocate(1)] {err}");
  }

  // --------------------------------------------------------------------
  // 4) A deallocation that does not match a live section.
  // --------------------------------------------------------------------
  if let Err(err) = allocator.deallocate(tail.offset, tail.len - 1) {
    println!("[4: deallocate({}, {})] {err}", tail.offset, tail.len - 1);
  }

  // --------------------------------------------------------------------
  // 5) Hand the tail back.
  // --------------------------------------------------------------------
  allocator.release(tail)?;
  print_state("5: release(tail)", &allocator);

  // --------------------------------------------------------------------
  // 6) Fragmentation with and without coalescing.
  // --------------------------------------------------------------------
  fragmentation(AllocatorConfig::new())?;
  fragmentation(AllocatorConfig::coalescing())?;

  // --------------------------------------------------------------------
  // 7) The counting allocator tracks outstanding elements on the C heap.
  // --------------------------------------------------------------------
  let mut counting = CountingAllocator::<i32>::new();
  let block = counting.allocate(16)?;
  println!(
    "[7] counting allocator: {} element(s), {} bytes outstanding",
    counting.allocated_elements(),
    counting.allocated_bytes()
  );
  unsafe { counting.deallocate(block, 16) };
  println!(
    "[7] after deallocate: {} element(s) outstanding",
    counting.allocated_elements()
  );

  Ok(())
}
