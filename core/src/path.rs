//! Cursor over the segments of a connection path.

/// Reads bytes from a connection path while tracking the cursor position.
///
/// Reads never panic: anything past the end of the buffer yields `None`.
#[derive(Debug, Clone, Copy)]
pub struct PathReader<'a> {
    data: &'a [u8],
    x: usize,
}

impl<'a> PathReader<'a> {
    pub fn new(data: &'a [u8]) -> Self { Self { data, x: 0 } }

    /// Cursor position in bytes from the start of the path.
    pub fn position(&self) -> usize { self.x }

    /// Number of unread bytes.
    pub fn size(&self) -> usize { self.data.len() - self.x }

    /// Unread bytes, without advancing.
    pub fn rest(&self) -> &'a [u8] { &self.data[self.x..] }

    /// Byte at `offset` from the cursor, without advancing.
    pub fn peek_at(&self, offset: usize) -> Option<u8> { self.rest().get(offset).copied() }

    /// Next `N` bytes as an array, without advancing.
    pub fn peek_array<const N: usize>(&self, offset: usize) -> Option<[u8; N]> {
        let end = offset.checked_add(N)?;
        self.rest().get(offset..end)?.try_into().ok()
    }

    /// Advance the cursor. Fails without moving if fewer than `length` bytes remain.
    pub fn skip(&mut self, length: usize) -> Option<()> {
        if length > self.size() {
            return None;
        }
        self.x += length;
        Some(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peeks_do_not_advance() {
        let data = [1u8, 2, 3, 4];
        let mut r = PathReader::new(&data);
        assert_eq!(r.peek_at(0), Some(1));
        assert_eq!(r.peek_array::<2>(1), Some([2, 3]));
        assert_eq!(r.position(), 0);
        r.skip(3).unwrap();
        assert_eq!(r.rest(), &[4]);
        assert_eq!(r.peek_array::<2>(0), None);
        assert_eq!(r.skip(2), None);
        assert_eq!(r.position(), 3);
        assert_eq!(r.peek_array::<1>(usize::MAX), None);
    }
}
