//! Block segmentation of a waveform into fixed-duration spans.
//!
//! Blocks are `division * sample_rate` frames long. Rather than leaving a
//! short tail block, the last block absorbs the remainder, so it is between
//! one and two block lengths long. A waveform shorter than one block becomes
//! a single block covering everything.
//!
//! ```text
//!  0        L        2L       3L         frames
//!  |--------|--------|--------|------------|
//!   block 0  block 1  block 2  block 3 (L + remainder)
//! ```

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::error::ConfigurationError;

/// A half-open frame range `[start, end)` belonging to one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSpan {
    /// Position of the block in its segmentation.
    pub index: usize,
    /// First frame of the block.
    pub start: usize,
    /// One past the last frame of the block.
    pub end: usize,
}

impl BlockSpan {
    /// Number of frames in the block.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the block holds no frames.
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    /// Whether `frame` lies inside the block.
    pub fn contains(&self, frame: usize) -> bool {
        (self.start..self.end).contains(&frame)
    }
}

/// Ordered, contiguous block spans covering a whole waveform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segmentation {
    block_len: usize,
    spans: Vec<BlockSpan>,
}

impl Segmentation {
    /// Nominal block length in frames.
    pub fn block_len(&self) -> usize {
        self.block_len
    }

    /// The spans in frame order.
    pub fn spans(&self) -> &[BlockSpan] {
        &self.spans
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Whether there are no blocks (empty waveform).
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Total number of frames covered.
    pub fn frames(&self) -> usize {
        self.spans.last().map_or(0, |span| span.end)
    }

    /// Index of the block that owns `frame`.
    pub fn block_of(&self, frame: usize) -> Option<usize> {
        if frame >= self.frames() {
            return None;
        }
        Some(self.spans.partition_point(|span| span.end <= frame))
    }
}

/// Splits a waveform into blocks of `division` seconds.
#[derive(Debug, Clone, Copy)]
pub struct BlockSegmenter {
    division_secs: f64,
}

impl BlockSegmenter {
    /// Create a segmenter for blocks of `division_secs` seconds.
    pub fn new(division_secs: f64) -> Result<Self, ConfigurationError> {
        if !division_secs.is_finite() || division_secs <= 0.0 {
            return Err(ConfigurationError::InvalidDivision(division_secs));
        }
        Ok(Self { division_secs })
    }

    /// Block duration in seconds.
    pub fn division_secs(&self) -> f64 {
        self.division_secs
    }

    /// Nominal block length in frames at `sample_rate` (at least one frame).
    pub fn block_len(&self, sample_rate: u32) -> usize {
        let frames = libm::round(self.division_secs * f64::from(sample_rate));
        (frames as usize).max(1)
    }

    /// Segment `frames` frames recorded at `sample_rate`.
    pub fn segment(&self, frames: usize, sample_rate: u32) -> Segmentation {
        let block_len = self.block_len(sample_rate);
        Segmentation {
            block_len,
            spans: regular_spans(0, frames, block_len, 0),
        }
    }

    /// Segment with the block grid shifted right by `offset` frames.
    ///
    /// The frames before the grid form a shorter lead-in block at index 0.
    /// An `offset` of zero, or one that leaves nothing after the lead-in,
    /// falls back to [`segment`](Self::segment).
    pub fn segment_shifted(&self, frames: usize, sample_rate: u32, offset: usize) -> Segmentation {
        if offset == 0 || offset >= frames {
            return self.segment(frames, sample_rate);
        }

        let block_len = self.block_len(sample_rate);
        let mut spans = Vec::with_capacity(1 + (frames - offset) / block_len);
        spans.push(BlockSpan {
            index: 0,
            start: 0,
            end: offset,
        });
        spans.extend(regular_spans(offset, frames, block_len, 1));

        Segmentation { block_len, spans }
    }
}

/// Regular grid over `[start, end)`; the last span absorbs the remainder.
fn regular_spans(start: usize, end: usize, block_len: usize, first_index: usize) -> Vec<BlockSpan> {
    let frames = end - start;
    if frames == 0 {
        return Vec::new();
    }

    let count = (frames / block_len).max(1);
    (0..count)
        .map(|i| {
            let span_start = start + i * block_len;
            let span_end = if i + 1 == count {
                end
            } else {
                span_start + block_len
            };
            BlockSpan {
                index: first_index + i,
                start: span_start,
                end: span_end,
            }
        })
        .collect()
}
