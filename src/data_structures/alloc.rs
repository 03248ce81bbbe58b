// Copyright (c) 2025 Lanai Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Fallible buffer growth.
//!
//! Every buffer the data structures grow goes through [`reserve`], which surfaces
//! allocation failure as an [`AllocError`] instead of aborting the process. This is
//! what lets trie mutations roll back cleanly when memory runs out.

/// An allocation request the allocator could not satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Failed to allocate room for {requested} additional element(s)")]
pub struct AllocError {
    /// Number of additional elements that were requested.
    pub requested: usize,
}

/// Ensures `buf` can hold `additional` more elements without reallocating.
///
/// A call that fits in the existing capacity never allocates and never fails.
pub(crate) fn reserve<T>(buf: &mut Vec<T>, additional: usize) -> Result<(), AllocError> {
    if buf.capacity() - buf.len() >= additional {
        return Ok(());
    }

    #[cfg(test)]
    failpoint::hit(additional)?;

    buf.try_reserve(additional)
        .map_err(|_| AllocError { requested: additional })
}

/// Like [`reserve`] but without speculative over-allocation.
pub(crate) fn reserve_exact<T>(buf: &mut Vec<T>, additional: usize) -> Result<(), AllocError> {
    if buf.capacity() - buf.len() >= additional {
        return Ok(());
    }

    #[cfg(test)]
    failpoint::hit(additional)?;

    buf.try_reserve_exact(additional)
        .map_err(|_| AllocError { requested: additional })
}

/// Copies `bytes` into a freshly allocated, exactly sized buffer.
pub(crate) fn copy_bytes(bytes: &[u8]) -> Result<Vec<u8>, AllocError> {
    let mut buf = Vec::new();
    reserve_exact(&mut buf, bytes.len())?;
    buf.extend_from_slice(bytes);
    Ok(buf)
}
