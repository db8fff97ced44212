use std::collections::VecDeque;

use crate::float::{from_usize, Float};

/// Number of `u64` words needed to hold `bits` bits.
pub fn word_count(bits: usize) -> usize {
    (bits + 63) / 64
}

pub fn get_bit(words: &[u64], index: usize) -> bool {
    (words[index / 64] >> (index % 64)) & 1 == 1
}

pub fn set_bit(words: &mut [u64], index: usize, bit: bool) {
    let mask = 1u64 << (index % 64);
    if bit {
        words[index / 64] |= mask;
    } else {
        words[index / 64] &= !mask;
    }
}

/// The 64 bits of `words` starting at bit `offset`. Bits past the end read as zero.
pub fn word_at(words: &[u64], offset: usize) -> u64 {
    let (index, shift) = (offset / 64, offset % 64);
    let low = words.get(index).copied().unwrap_or(0) >> shift;
    if shift == 0 {
        low
    } else {
        let high = words.get(index + 1).copied().unwrap_or(0);
        low | (high << (64 - shift))
    }
}

/// A fixed-capacity ring buffer of bits packed into `u64` words.
///
/// Once `capacity` bits have been pushed every further push overwrites the
/// oldest bit. Storage is allocated once in [BitWindow::new].
///
/// ```rust
/// use pitch_tracker::utils::buffer::BitWindow;
///
/// let mut window = BitWindow::new(3);
/// for bit in [true, false, true, true] {
///     window.push(bit);
/// }
/// // The first `true` has been pushed out.
/// assert!(window.is_full());
/// assert_eq!(window.iter().collect::<Vec<_>>(), vec![false, true, true]);
/// ```
#[derive(Debug, Clone)]
pub struct BitWindow {
    words: Vec<u64>,
    capacity: usize,
    head: usize,
    len: usize,
}

impl BitWindow {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "A bit window needs a non-zero capacity");
        BitWindow {
            words: vec![0; word_count(capacity)],
            capacity,
            head: 0,
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity
    }

    pub fn push(&mut self, bit: bool) {
        set_bit(&mut self.words, self.head, bit);
        self.head += 1;
        if self.head == self.capacity {
            self.head = 0;
        }
        if self.len < self.capacity {
            self.len += 1;
        }
    }

    pub fn clear(&mut self) {
        self.words.iter_mut().for_each(|w| *w = 0);
        self.head = 0;
        self.len = 0;
    }

    /// Bit `index`, counted from the oldest stored bit.
    pub fn get(&self, index: usize) -> bool {
        assert!(index < self.len, "Index {} past window length", index);
        let oldest = (self.head + self.capacity - self.len) % self.capacity;
        get_bit(&self.words, (oldest + index) % self.capacity)
    }

    /// Bits from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |i| self.get(i))
    }

    /// Unroll the ring into `output` so that bit `i` of `output` is [BitWindow::get]`(i)`.
    /// Bits of `output` past the window length are cleared.
    pub fn linearize(&self, output: &mut [u64]) {
        assert!(output.len() >= word_count(self.len));
        output.iter_mut().for_each(|w| *w = 0);
        let oldest = (self.head + self.capacity - self.len) % self.capacity;
        let tail = (self.capacity - oldest).min(self.len);
        copy_bits(&self.words, oldest, tail, output, 0);
        copy_bits(&self.words, 0, self.len - tail, output, tail);
    }
}

/// Mask of the low `bits` bits of a word.
pub fn low_mask(bits: usize) -> u64 {
    if bits >= 64 {
        !0
    } else {
        (1u64 << bits) - 1
    }
}

/// OR `count` bits of `source` starting at bit `from` into `target` starting at
/// bit `to`, a word at a time.
fn copy_bits(source: &[u64], from: usize, count: usize, target: &mut [u64], to: usize) {
    let mut done = 0;
    while done < count {
        let index = to + done;
        let take = (count - done).min(64 - index % 64);
        let bits = word_at(source, from + done) & low_mask(take);
        target[index / 64] |= bits << (index % 64);
        done += take;
    }
}

/// Sub-sample time of a rising zero crossing: it lies `fraction` of the way
/// from sample `index` to sample `index + 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge<T> {
    pub index: u64,
    pub fraction: T,
    /// Highest sample of the cycle that ends at this edge. `None` when that
    /// cycle began before the signal rose above the gate.
    pub peak: Option<T>,
}

impl<T: Float> Edge<T> {
    /// Time in samples from `self` to a `later` edge.
    pub fn distance_to(&self, later: &Edge<T>) -> T {
        let whole = later.index.saturating_sub(self.index) as usize;
        from_usize::<T>(whole) + later.fraction - self.fraction
    }
}

/// Fixed-capacity FIFO of edges. When full, the oldest edge makes room.
#[derive(Debug, Clone)]
pub struct EdgeBuffer<T> {
    edges: VecDeque<Edge<T>>,
    capacity: usize,
}

impl<T: Float> EdgeBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        EdgeBuffer {
            edges: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, edge: Edge<T>) {
        if self.capacity == 0 {
            return;
        }
        if self.edges.len() == self.capacity {
            self.edges.pop_front();
        }
        self.edges.push_back(edge);
    }

    /// Drop every edge that starts before sample `index`.
    pub fn prune_before(&mut self, index: u64) {
        while self.edges.front().map_or(false, |e| e.index < index) {
            self.edges.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.edges.clear();
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Edge<T>> {
        self.edges.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Edge<T>> + '_ {
        self.edges.iter()
    }
}
