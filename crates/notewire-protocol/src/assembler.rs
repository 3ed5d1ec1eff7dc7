//! Incremental frame assembly over arbitrary chunk boundaries.
//!
//! A [`FrameAssembler`] owns the parse buffer for one connection. Chunks are
//! appended as they arrive; every complete frame at the front of the buffer
//! is emitted in arrival order and its bytes are split off. Whatever is left
//! belongs to a frame that has not fully arrived yet.
//!
//! One assembler per connection; it is never shared.

use bytes::{Buf, BytesMut};

use crate::framing::{Decoded, try_decode_one};
use crate::types::Frame;

/// Initial capacity of the parse buffer.
const INITIAL_CAPACITY: usize = 4 * 1024;

/// Stateful frame decoder for a single byte stream.
#[derive(Debug, Default)]
pub struct FrameAssembler {
    buffer: BytesMut,
}

impl FrameAssembler {
    /// Creates an empty assembler.
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(INITIAL_CAPACITY),
        }
    }

    /// Appends `chunk` and hands every frame completed by it to `on_frame`.
    ///
    /// Frames are emitted in the order they appear on the wire. The call
    /// returns once the buffer no longer starts with a complete frame.
    pub fn on_chunk<F>(&mut self, chunk: &[u8], mut on_frame: F)
    where
        F: FnMut(Frame),
    {
        self.buffer.extend_from_slice(chunk);

        while let Decoded::Frame { frame, consumed } = try_decode_one(&self.buffer) {
            self.buffer.advance(consumed);
            on_frame(frame);
        }
    }

    /// Appends `chunk` and returns the frames it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Frame> {
        let mut frames = Vec::new();
        self.on_chunk(chunk, |frame| frames.push(frame));
        frames
    }

    /// Number of buffered bytes not yet forming a complete frame.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true if no partial frame is buffered.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Drops any buffered partial frame.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framing::encode_frame;
    use crate::types::FrameType;

    fn stream(frames: &[Frame]) -> Vec<u8> {
        frames
            .iter()
            .flat_map(|f| encode_frame(f.frame_type, &f.payload).unwrap())
            .collect()
    }

    fn sample_frames() -> Vec<Frame> {
        vec![
            Frame::new(FrameType::Info, "START_NOTES_STREAM"),
            Frame::new(FrameType::Record, r#"{"title":"one","body":"d1cf","encrypted":true}"#),
            Frame::new(FrameType::Unknown(0x10), "skip me"),
            Frame::new(FrameType::Record, ""),
            Frame::new(FrameType::EndOfStream, "END"),
        ]
    }

    #[test]
    fn whole_buffer_at_once() {
        let frames = sample_frames();
        let mut assembler = FrameAssembler::new();

        assert_eq!(assembler.push(&stream(&frames)), frames);
        assert!(assembler.is_empty());
    }

    #[test]
    fn one_byte_at_a_time() {
        let frames = sample_frames();
        let bytes = stream(&frames);
        let mut assembler = FrameAssembler::new();

        let mut out = Vec::new();
        for byte in &bytes {
            assembler.on_chunk(std::slice::from_ref(byte), |f| out.push(f));
        }

        assert_eq!(out, frames);
        assert_eq!(assembler.buffered_len(), 0);
    }

    #[test]
    fn partial_header_is_kept() {
        let bytes = encode_frame(FrameType::Record, "abc").unwrap();
        let mut assembler = FrameAssembler::new();

        assert!(assembler.push(&bytes[..2]).is_empty());
        assert_eq!(assembler.buffered_len(), 2);

        let frames = assembler.push(&bytes[2..]);
        assert_eq!(frames, vec![Frame::new(FrameType::Record, "abc")]);
        assert!(assembler.is_empty());
    }

    #[test]
    fn leftover_belongs_to_next_frame() {
        let mut bytes = encode_frame(FrameType::Info, "first").unwrap();
        let second = encode_frame(FrameType::Info, "second").unwrap();
        bytes.extend_from_slice(&second[..4]);

        let mut assembler = FrameAssembler::new();
        assert_eq!(
            assembler.push(&bytes),
            vec![Frame::new(FrameType::Info, "first")]
        );
        assert_eq!(assembler.buffered_len(), 4);

        assert_eq!(
            assembler.push(&second[4..]),
            vec![Frame::new(FrameType::Info, "second")]
        );
    }

    #[test]
    fn empty_chunk_is_harmless() {
        let mut assembler = FrameAssembler::new();
        assert!(assembler.push(&[]).is_empty());
        assert!(assembler.is_empty());
    }

    #[test]
    fn clear_drops_partial_frame() {
        let mut assembler = FrameAssembler::new();
        assembler.push(&[0x00, 0x10, 0x01, b'x']);
        assert_eq!(assembler.buffered_len(), 4);

        assembler.clear();
        assert!(assembler.is_empty());

        let frames = assembler.push(&encode_frame(FrameType::EndOfStream, "END").unwrap());
        assert_eq!(frames, vec![Frame::new(FrameType::EndOfStream, "END")]);
    }

    #[test]
    fn assemblers_are_independent() {
        let bytes = encode_frame(FrameType::Record, "payload").unwrap();
        let mut a = FrameAssembler::new();
        let mut b = FrameAssembler::new();

        assert!(a.push(&bytes[..5]).is_empty());
        assert_eq!(b.push(&bytes).len(), 1);
        assert_eq!(a.buffered_len(), 5);
        assert!(b.is_empty());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn frame_strategy() -> impl Strategy<Value = Frame> {
            (any::<u8>(), "\\PC{0,300}")
                .prop_map(|(tag, payload)| Frame::new(FrameType::from(tag), payload))
        }

        proptest! {
            #[test]
            fn chunking_does_not_change_output(
                frames in prop::collection::vec(frame_strategy(), 0..16),
                cuts in prop::collection::vec(any::<prop::sample::Index>(), 0..32),
            ) {
                let bytes = stream(&frames);

                let mut offsets: Vec<usize> = cuts.iter().map(|i| i.index(bytes.len() + 1)).collect();
                offsets.push(0);
                offsets.push(bytes.len());
                offsets.sort_unstable();
                offsets.dedup();

                let mut whole = FrameAssembler::new();
                let expected = whole.push(&bytes);

                let mut chunked = FrameAssembler::new();
                let mut actual = Vec::new();
                for pair in offsets.windows(2) {
                    chunked.on_chunk(&bytes[pair[0]..pair[1]], |f| actual.push(f));
                }

                prop_assert_eq!(&expected, &frames);
                prop_assert_eq!(actual, expected);
                prop_assert!(chunked.is_empty());
            }
        }
    }
}
