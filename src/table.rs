pub const SIZE: usize = 256;

/// Streaming accumulator for adjacent byte-pair counts.
///
/// Feed chunks in stream order with [`BinaryTable::ingest`]; the pair that
/// straddles two chunks is reconstructed from the carried tail byte.
pub struct BinaryTable {
    max: u64,
    bytes: u64,
    carry: Option<u8>,
    dots: Box<[[u64; SIZE]; SIZE]>,
}

impl BinaryTable {
    pub fn new() -> Self {
        Self {
            max: 0,
            bytes: 0,
            carry: None,
            dots: Box::new([[0; SIZE]; SIZE]),
        }
    }

    pub fn ingest(&mut self, chunk: &[u8]) {
        let Some(&first) = chunk.first() else {
            return;
        };
        if let Some(carry) = self.carry {
            self.bump(carry, first);
        }
        for window in chunk.windows(2) {
            self.bump(window[0], window[1]);
        }
        self.carry = chunk.last().copied();
        self.bytes += chunk.len() as u64;
    }

    /// Number of bytes ingested so far.
    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    pub fn max(&self) -> u64 {
        self.max
    }

    pub fn finalize(self) -> CountMatrix {
        CountMatrix {
            max: self.max,
            dots: self.dots,
        }
    }

    fn bump(&mut self, pred: u8, succ: u8) {
        let cell = &mut self.dots[pred as usize][succ as usize];
        *cell = cell.saturating_add(1);
        if *cell > self.max {
            self.max = *cell;
        }
    }
}

impl Default for BinaryTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Finalized pair counts, indexed `[predecessor][successor]`.
pub struct CountMatrix {
    max: u64,
    dots: Box<[[u64; SIZE]; SIZE]>,
}

impl CountMatrix {
    pub fn get(&self, pred: u8, succ: u8) -> u64 {
        self.dots[pred as usize][succ as usize]
    }

    /// Largest cell value, 0 when the stream held fewer than two bytes.
    pub fn max(&self) -> u64 {
        self.max
    }

    pub fn total(&self) -> u64 {
        self.dots.iter().flatten().sum()
    }

    pub fn rows(&self) -> &[[u64; SIZE]; SIZE] {
        &self.dots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(chunks: &[&[u8]]) -> CountMatrix {
        let mut table = BinaryTable::new();
        for chunk in chunks {
            table.ingest(chunk);
        }
        table.finalize()
    }

    #[test]
    fn empty_stream_is_all_zero() {
        let matrix = counts(&[]);
        assert_eq!(matrix.max(), 0);
        assert_eq!(matrix.total(), 0);

        let matrix = counts(&[&[], &[]]);
        assert_eq!(matrix.max(), 0);
        assert_eq!(matrix.total(), 0);
    }

    #[test]
    fn single_byte_has_no_pair() {
        let matrix = counts(&[&[0x42]]);
        assert_eq!(matrix.max(), 0);
        assert_eq!(matrix.total(), 0);
    }

    #[test]
    fn predecessor_is_the_row() {
        let matrix = counts(&[&[1, 2]]);
        assert_eq!(matrix.get(1, 2), 1);
        assert_eq!(matrix.get(2, 1), 0);
        assert_eq!(matrix.rows()[1][2], 1);
    }

    #[test]
    fn boundary_pair_is_counted_once() {
        let matrix = counts(&[&[7, 8], &[9, 10]]);
        assert_eq!(matrix.get(8, 9), 1);
        assert_eq!(matrix.total(), 3);
    }

    #[test]
    fn one_byte_chunks_carry_through() {
        let matrix = counts(&[&[3], &[], &[4], &[5]]);
        assert_eq!(matrix.get(3, 4), 1);
        assert_eq!(matrix.get(4, 5), 1);
        assert_eq!(matrix.total(), 2);
        assert_eq!(matrix.max(), 1);
    }

    #[test]
    fn running_max_matches_scan() {
        let data: Vec<u8> = (0..5000u32).map(|i| (i * 31 % 7) as u8).collect();
        let mut table = BinaryTable::new();
        for chunk in data.chunks(13) {
            table.ingest(chunk);
        }
        assert_eq!(table.bytes(), 5000);
        let running = table.max();
        let matrix = table.finalize();
        assert_eq!(matrix.max(), running);
        let scanned = matrix.rows().iter().flatten().copied().max().unwrap_or(0);
        assert_eq!(matrix.max(), scanned);
        assert_eq!(matrix.total(), 4999);
    }

    #[test]
    fn identical_bytes_fill_the_diagonal_cell() {
        let matrix = counts(&[&[0xAA; 10], &[0xAA; 6]]);
        assert_eq!(matrix.get(0xAA, 0xAA), 15);
        assert_eq!(matrix.max(), 15);
        assert_eq!(matrix.total(), 15);
    }
}
