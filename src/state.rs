/// Index of the visible slide. Wraps around instead of clamping, so it stays
/// inside `[0, len)` whenever the sequence is non-empty.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct Cursor {
    index: usize,
}

impl Cursor {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }

    pub fn previous(&mut self, len: usize) {
        if len <= 1 {
            return;
        }
        self.index = (self.index + len - 1) % len;
    }

    pub fn next(&mut self, len: usize) {
        if len <= 1 {
            return;
        }
        self.index = (self.index + 1) % len;
    }

    // Callers only pass indices enumerated from the current sequence; anything
    // else is clamped to the last slide.
    pub fn jump(&mut self, index: usize, len: usize) {
        debug_assert!(len == 0 || index < len, "slide {} out of range ({})", index, len);
        self.index = index.min(len.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn previous_wraps_to_last() {
        let mut cursor = Cursor::default();
        cursor.previous(3);
        assert_eq!(cursor.index(), 2);
    }

    #[test]
    fn next_wraps_to_first() {
        let mut cursor = Cursor::default();
        cursor.jump(2, 3);
        cursor.next(3);
        assert_eq!(cursor.index(), 0);
    }

    #[test]
    fn single_slide_is_a_no_op() {
        let mut cursor = Cursor::default();
        cursor.next(1);
        cursor.previous(1);
        cursor.next(0);
        assert_eq!(cursor.index(), 0);
    }

    #[test]
    fn full_cycle_returns_to_start() {
        for len in 1..8 {
            for start in 0..len {
                let mut cursor = Cursor::default();
                cursor.jump(start, len);
                for _ in 0..len {
                    cursor.next(len);
                }
                assert_eq!(cursor.index(), start, "len {}", len);
            }
        }
    }

    #[test]
    fn stays_in_range_for_mixed_moves() {
        let len = 4;
        let mut cursor = Cursor::default();
        // deterministic pseudo-random walk
        let mut seed: u32 = 0x9e37_79b9;
        for _ in 0..500 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            if seed % 2 == 0 {
                cursor.next(len);
            } else {
                cursor.previous(len);
            }
            assert!(cursor.index() < len);
        }
    }
}
