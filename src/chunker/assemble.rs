//! Turns per-buffer cut positions into owned chunks.
//!
//! Shared by the blocking iterator and the async stream: both read blocks,
//! feed them here and hand out whatever chunks became complete.

use std::collections::VecDeque;
use std::mem;

use bytes::BytesMut;
use tracing::trace;

use super::CutSource;
use crate::chunk::Chunk;

pub(crate) struct Assembler<C> {
    chunker: C,
    // Lead-in for the first block only.
    prepend_bytes: usize,
    pending: BytesMut,
    ready: VecDeque<Chunk>,
    offset: u64,
}

impl<C: CutSource> Assembler<C> {
    pub(crate) fn new(chunker: C, prepend_bytes: usize) -> Self {
        Self {
            chunker,
            prepend_bytes,
            pending: BytesMut::new(),
            ready: VecDeque::new(),
            offset: 0,
        }
    }

    /// Runs the chunker over `block` and queues every chunk it completes.
    pub(crate) fn feed(&mut self, block: &[u8]) {
        let prepend_bytes = mem::take(&mut self.prepend_bytes);
        let cuts = self.chunker.next_cuts(block, prepend_bytes);

        let carried = self.pending.len();
        self.pending.extend_from_slice(block);

        let mut emitted = 0;
        for (position, level) in cuts {
            let end = carried + position;
            let data = self.pending.split_to(end - emitted).freeze();
            emitted = end;
            self.push(Chunk::new(data, self.offset, level));
        }
    }

    /// Queues the bytes after the last cut as a final, level-less chunk.
    pub(crate) fn finish(&mut self) {
        if !self.pending.is_empty() {
            let data = self.pending.split().freeze();
            self.push(Chunk::new(data, self.offset, None));
        }
    }

    pub(crate) fn pop(&mut self) -> Option<Chunk> {
        self.ready.pop_front()
    }

    pub(crate) fn chunker(&self) -> &C {
        &self.chunker
    }

    pub(crate) fn into_chunker(self) -> C {
        self.chunker
    }

    fn push(&mut self, chunk: Chunk) {
        trace!(offset = chunk.offset, len = chunk.len(), level = ?chunk.level, "chunk");
        self.offset = chunk.end();
        self.ready.push_back(chunk);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunker::StaticChunker;

    fn drain<C: CutSource>(assembler: &mut Assembler<C>) -> Vec<Chunk> {
        std::iter::from_fn(|| assembler.pop()).collect()
    }

    #[test]
    fn test_chunks_span_blocks() {
        let mut assembler = Assembler::new(StaticChunker::new(4).unwrap(), 0);
        assembler.feed(b"abc");
        assert!(assembler.pop().is_none());

        assembler.feed(b"defghij");
        let chunks = drain(&mut assembler);
        assert_eq!(chunks.len(), 2);
        assert_eq!(&chunks[0].data[..], b"abcd");
        assert_eq!(chunks[0].offset, 0);
        assert_eq!(&chunks[1].data[..], b"efgh");
        assert_eq!(chunks[1].offset, 4);

        assembler.finish();
        let tail = drain(&mut assembler);
        assert_eq!(tail.len(), 1);
        assert_eq!(&tail[0].data[..], b"ij");
        assert_eq!(tail[0].offset, 8);
        assert_eq!(tail[0].level, None);
    }

    #[test]
    fn test_lead_in_applies_to_first_block_only() {
        let mut assembler = Assembler::new(StaticChunker::new(4).unwrap(), 3);
        assembler.feed(b"abcde");
        assembler.feed(b"fgh");
        let chunks = drain(&mut assembler);
        let lens: Vec<usize> = chunks.iter().map(Chunk::len).collect();
        assert_eq!(lens, vec![1, 4]);
        assert_eq!(assembler.chunker().phase().get(), 1);
    }

    #[test]
    fn test_finish_without_pending() {
        let mut assembler = Assembler::new(StaticChunker::new(2).unwrap(), 0);
        assembler.feed(b"abcd");
        assembler.finish();
        assert_eq!(drain(&mut assembler).len(), 2);
    }
}
