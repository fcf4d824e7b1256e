//! Payload batching for size-limited marketplace endpoints.

use std::num::NonZeroUsize;

/// Splits `items` into consecutive chunks of `size`, the last one possibly shorter.
pub fn batches<T>(items: &[T], size: NonZeroUsize) -> impl Iterator<Item = &[T]> {
    items.chunks(size.get())
}
