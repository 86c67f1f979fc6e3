#![no_main]
use libfuzzer_sys::arbitrary::{self, Arbitrary};
use libfuzzer_sys::fuzz_target;
use scale_core::{FrameBuffer, SessionCfg, StabilityParser};
use scale_traits::clock::test_clock::TestClock;
use scale_traits::{Chunk, SerialLink};

#[derive(Debug, Arbitrary)]
struct Input {
    reads: Vec<Vec<u8>>,
    chunk_size: u8,
}

struct Replay(std::vec::IntoIter<Vec<u8>>);

impl SerialLink for Replay {
    fn read_chunk(&mut self, max_bytes: usize) -> Chunk {
        match self.0.next() {
            Some(mut bytes) => {
                bytes.truncate(max_bytes);
                Chunk::Data(bytes)
            }
            None => Chunk::Empty,
        }
    }
}

fuzz_target!(|input: Input| {
    let mut frames = FrameBuffer::new();
    for read in &input.reads {
        let _ = frames.fold(read);
    }

    let max = input.reads.len() as u64 + 1;
    let parser = StabilityParser::builder()
        .with_link(Replay(input.reads.into_iter()))
        .with_clock(TestClock::new())
        .with_session(SessionCfg {
            chunk_size: usize::from(input.chunk_size).max(1),
            max_iterations: Some(max),
            ..SessionCfg::default()
        })
        .build();
    // Every session ends in a weight or a typed error within the cap.
    if let Ok(mut parser) = parser {
        let _ = parser.run();
        assert!(parser.iterations() <= max);
    }
});
