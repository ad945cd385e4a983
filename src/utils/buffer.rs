// utils/buffer.rs

/// Growable byte area whose logical length is reset between uses while the
/// allocation is kept around for the next one.
#[derive(Debug, Default)]
pub struct ScratchBuffer {
    data: Vec<u8>,
}

impl ScratchBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Append bytes after the current contents.
    pub fn add(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Grow the allocation so it holds at least `capacity` bytes in total.
    /// Never shrinks.
    pub fn ensure_capacity(&mut self, capacity: usize) {
        if capacity > self.data.capacity() {
            self.data.reserve_exact(capacity - self.data.len());
        }
    }

    /// Reset the logical length. The allocation is retained.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Drop the contents and give the allocation back.
    pub fn release(&mut self) {
        self.data = Vec::new();
    }

    pub(crate) fn vec_mut(&mut self) -> &mut Vec<u8> {
        &mut self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_capacity_only_grows() {
        let mut buf = ScratchBuffer::with_capacity(32);
        buf.ensure_capacity(100);
        assert!(buf.capacity() >= 100);

        let grown = buf.capacity();
        buf.ensure_capacity(10);
        assert_eq!(buf.capacity(), grown);
    }

    #[test]
    fn ensure_capacity_accounts_for_existing_length() {
        let mut buf = ScratchBuffer::with_capacity(4);
        buf.add(b"abcd");
        buf.ensure_capacity(16);
        assert!(buf.capacity() >= 16);
        assert_eq!(buf.as_bytes(), b"abcd");
    }

    #[test]
    fn clear_keeps_allocation() {
        let mut buf = ScratchBuffer::with_capacity(64);
        buf.add(b"2024-01-01 00:00:00.000000 hello\n");
        let capacity = buf.capacity();

        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), capacity);
    }

    #[test]
    fn add_appends_after_existing_contents() {
        let mut buf = ScratchBuffer::with_capacity(8);
        buf.add(b"new");
        buf.add(b" line");
        assert_eq!(buf.as_bytes(), b"new line");
    }

    #[test]
    fn release_frees_everything() {
        let mut buf = ScratchBuffer::with_capacity(128);
        buf.add(b"pending");
        buf.release();
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.capacity(), 0);
    }
}
