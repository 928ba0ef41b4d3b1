//! Frame-synchronization decoder for the telemetry byte stream
//!
//! Alignment acquisition is lenient: a 4-byte window slides one byte at a
//! time over arbitrary leading garbage until it reads the marker. Once a
//! frame boundary is established the loop is strict: a marker mismatch ends
//! the sequence instead of rescanning. The asymmetry matches the deployed
//! link monitors; acceptable behavior on mid-stream corruption is left as
//! observed rather than guessed at.
//!
//! A stream that never contains the marker keeps the acquisition scan reading
//! for as long as the source produces bytes; resynchronization time is
//! unbounded by the protocol. `bytes_skipped` exposes the scan's progress so
//! a caller can impose its own bound.

use crate::core::{ChannelReading, CodeTable, Sample, FRAME_MAGIC, MAGIC_LEN};
use crate::hardware::{ByteSource, SourceError, SourceResult};
use crate::processing::layout::{FieldKind, FrameLayout};
use std::fmt;

/// Why a decoding sequence stopped
#[derive(Debug, Clone, PartialEq)]
pub enum StopReason {
    /// The byte source closed, or came up short mid-frame
    SourceExhausted,
    /// The byte source failed with a transport error
    SourceFailed(SourceError),
    /// An established frame boundary no longer carried the marker
    Desynchronized { found: u32 },
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::SourceExhausted => write!(f, "source exhausted"),
            StopReason::SourceFailed(err) => write!(f, "source failed: {}", err),
            StopReason::Desynchronized { found } => {
                write!(f, "desynchronized: expected marker, found 0x{:08x}", found)
            }
        }
    }
}

/// Pull-based decoder turning a byte stream into a sequence of `Sample`s
///
/// Drives its byte source on demand: the sequence is infinite if the source
/// is infinite, finite otherwise, and a short read at end of stream ends the
/// sequence silently with no partial sample.
pub struct FrameDecoder<S: ByteSource> {
    source: S,
    layout: FrameLayout,
    fault_codes: CodeTable,
    state_codes: CodeTable,
    frame: Vec<u8>,
    aligned: bool,
    bytes_skipped: u64,
    stop: Option<StopReason>,
}

impl<S: ByteSource> FrameDecoder<S> {
    /// Create a decoder for one session with an externally selected layout
    pub fn new(source: S, layout: FrameLayout) -> Self {
        let frame_len = layout.frame_len();
        Self {
            source,
            layout,
            fault_codes: CodeTable::default_faults(),
            state_codes: CodeTable::default_states(),
            frame: vec![0u8; frame_len],
            aligned: false,
            bytes_skipped: 0,
            stop: None,
        }
    }

    /// Replace the enumerated-code lookup tables
    pub fn with_code_tables(mut self, fault_codes: CodeTable, state_codes: CodeTable) -> Self {
        self.fault_codes = fault_codes;
        self.state_codes = state_codes;
        self
    }

    /// Why iteration ended, once it has
    pub fn stop_reason(&self) -> Option<&StopReason> {
        self.stop.as_ref()
    }

    /// Garbage bytes discarded during alignment acquisition
    pub fn bytes_skipped(&self) -> u64 {
        self.bytes_skipped
    }

    /// Release the byte source
    pub fn into_source(self) -> S {
        self.source
    }

    /// Slide a 4-byte window over the stream until it reads the marker, then
    /// consume the layout's header segment unread. Runs once per session.
    fn acquire(&mut self) -> SourceResult<()> {
        let mut window = [0u8; MAGIC_LEN];
        self.source.read_exact(&mut window)?;
        while u32::from_le_bytes(window) != FRAME_MAGIC {
            window.copy_within(1.., 0);
            let mut next = [0u8; 1];
            self.source.read_exact(&mut next)?;
            window[MAGIC_LEN - 1] = next[0];
            self.bytes_skipped += 1;
        }

        // Header is consumed once at the start of the aligned stream,
        // not per sample.
        let mut header = vec![0u8; self.layout.header_len()];
        self.source.read_exact(&mut header)?;
        Ok(())
    }

    fn stop_on(&mut self, err: SourceError) {
        self.stop = Some(if err.is_exhausted() {
            StopReason::SourceExhausted
        } else {
            StopReason::SourceFailed(err)
        });
    }

    fn next_sample(&mut self) -> Option<Sample> {
        if self.stop.is_some() {
            return None;
        }

        if !self.aligned {
            if let Err(err) = self.acquire() {
                self.stop_on(err);
                return None;
            }
            self.aligned = true;
        }

        // Marker plus payload are read as one unit per frame.
        if let Err(err) = self.source.read_exact(&mut self.frame) {
            self.stop_on(err);
            return None;
        }

        let marker = u32::from_le_bytes([self.frame[0], self.frame[1], self.frame[2], self.frame[3]]);
        if marker != FRAME_MAGIC {
            // Steady state is strict: no byte-level recovery mid-loop.
            self.stop = Some(StopReason::Desynchronized { found: marker });
            return None;
        }

        Some(self.decode_payload())
    }

    fn decode_payload(&self) -> Sample {
        let buf = &self.frame;
        let mut offset = MAGIC_LEN;
        let mut channels = Vec::new();
        let mut fault = None;
        let mut state = None;

        for field in self.layout.fields() {
            match field.kind {
                FieldKind::Analog { scale } => {
                    let raw = f32::from_le_bytes([
                        buf[offset],
                        buf[offset + 1],
                        buf[offset + 2],
                        buf[offset + 3],
                    ]) as f64;
                    channels.push(ChannelReading {
                        name: field.name,
                        value: scale.apply(raw),
                    });
                }
                FieldKind::Setpoint { scale } => {
                    let raw = u16::from_le_bytes([buf[offset], buf[offset + 1]]) as f64;
                    channels.push(ChannelReading {
                        name: field.name,
                        value: scale.apply(raw),
                    });
                }
                FieldKind::Fault => {
                    fault = Some(self.fault_codes.resolve(buf[offset]));
                }
                FieldKind::State => {
                    state = Some(self.state_codes.resolve(buf[offset]));
                }
                FieldKind::Padding => {}
            }
            offset += field.kind.width();
        }

        Sample {
            channels,
            fault,
            state,
        }
    }
}

impl<S: ByteSource> Iterator for FrameDecoder<S> {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        self.next_sample()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ResolvedCode;
    use crate::hardware::MockByteSource;
    use crate::processing::layout::{FieldSpec, FrameFormat, Scale};

    fn push_magic(stream: &mut Vec<u8>) {
        stream.extend_from_slice(&FRAME_MAGIC.to_le_bytes());
    }

    fn push_header(stream: &mut Vec<u8>, layout: &FrameLayout) {
        stream.extend(std::iter::repeat(0xEEu8).take(layout.header_len()));
    }

    fn push_v3_frame(stream: &mut Vec<u8>, floats: [f32; 6], refs: [u16; 2]) {
        push_magic(stream);
        for value in floats {
            stream.extend_from_slice(&value.to_le_bytes());
        }
        for value in refs {
            stream.extend_from_slice(&value.to_le_bytes());
        }
    }

    fn v3_decoder(stream: Vec<u8>) -> FrameDecoder<MockByteSource> {
        FrameDecoder::new(
            MockByteSource::from_bytes(&stream),
            FrameLayout::for_format(FrameFormat::V3),
        )
    }

    #[test]
    fn test_decodes_known_byte_vector() {
        // Marker 0x74656c65 + floats 1..6 + setpoints 10, 20 must come back
        // exactly in order.
        let layout = FrameLayout::for_format(FrameFormat::V3);
        let mut stream = Vec::new();
        push_magic(&mut stream);
        push_header(&mut stream, &layout);
        push_v3_frame(&mut stream, [1.0, 2.0, 3.0, 4.0, 5.0, 6.0], [10, 20]);

        let samples: Vec<Sample> = v3_decoder(stream).collect();
        assert_eq!(samples.len(), 1);

        let values: Vec<f64> = samples[0].channels.iter().map(|c| c.value).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 10.0, 20.0]);
    }

    #[test]
    fn test_k_frames_yield_k_samples() {
        let layout = FrameLayout::for_format(FrameFormat::V3);
        let mut stream = Vec::new();
        push_magic(&mut stream);
        push_header(&mut stream, &layout);
        for k in 0..5 {
            let base = k as f32;
            push_v3_frame(
                &mut stream,
                [base, base + 0.5, 0.0, 0.0, 0.0, 0.0],
                [k as u16, 0],
            );
        }

        let samples: Vec<Sample> = v3_decoder(stream).collect();
        assert_eq!(samples.len(), 5);
        for (k, sample) in samples.iter().enumerate() {
            assert_eq!(sample.channel("v_in"), Some(k as f64));
            assert_eq!(sample.channel("ref_v_q"), Some(k as f64));
        }
    }

    #[test]
    fn test_leading_garbage_does_not_change_first_sample() {
        let layout = FrameLayout::for_format(FrameFormat::V3);
        let mut clean = Vec::new();
        push_magic(&mut clean);
        push_header(&mut clean, &layout);
        push_v3_frame(&mut clean, [9.25, 0.5, 1.5, 2.5, 3.5, 4.5], [100, 200]);

        let baseline: Vec<Sample> = v3_decoder(clean.clone()).collect();

        // Garbage deliberately contains a marker prefix ("tel" without the
        // final byte) to exercise the one-byte window slide.
        let garbage_runs: [&[u8]; 4] = [
            &[0x00],
            &[0xFF; 17],
            &[0x65, 0x6c, 0x65, 0x00, 0x74],
            &[0x65, 0x6c, 0x65],
        ];
        for garbage in garbage_runs {
            let mut stream = garbage.to_vec();
            stream.extend_from_slice(&clean);

            let mut decoder = v3_decoder(stream);
            let first = decoder.next().expect("sample after garbage");
            assert_eq!(first, baseline[0]);
            assert_eq!(decoder.bytes_skipped(), garbage.len() as u64);
        }
    }

    #[test]
    fn test_truncated_final_frame_emits_no_partial_sample() {
        let layout = FrameLayout::for_format(FrameFormat::V3);
        let mut stream = Vec::new();
        push_magic(&mut stream);
        push_header(&mut stream, &layout);
        push_v3_frame(&mut stream, [1.0; 6], [1, 1]);
        push_v3_frame(&mut stream, [2.0; 6], [2, 2]);
        // Truncate the second frame mid-payload
        stream.truncate(stream.len() - 10);

        let mut decoder = v3_decoder(stream);
        let samples: Vec<Sample> = decoder.by_ref().collect();
        assert_eq!(samples.len(), 1);
        assert_eq!(decoder.stop_reason(), Some(&StopReason::SourceExhausted));
    }

    #[test]
    fn test_header_skipped_once_not_per_frame() {
        // Two back-to-back frames with a single header segment between the
        // first marker and the first frame; both must decode.
        let layout = FrameLayout::for_format(FrameFormat::V3);
        let mut stream = Vec::new();
        push_magic(&mut stream);
        push_header(&mut stream, &layout);
        push_v3_frame(&mut stream, [1.0; 6], [0, 0]);
        push_v3_frame(&mut stream, [2.0; 6], [0, 0]);

        let samples: Vec<Sample> = v3_decoder(stream).collect();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1].channel("v_in"), Some(2.0));
    }

    #[test]
    fn test_midstream_desync_terminates_strictly() {
        let layout = FrameLayout::for_format(FrameFormat::V3);
        let mut stream = Vec::new();
        push_magic(&mut stream);
        push_header(&mut stream, &layout);
        push_v3_frame(&mut stream, [1.0; 6], [0, 0]);
        // A full frame's worth of bytes with a bad marker, then a valid frame
        // that must NOT be recovered.
        stream.extend_from_slice(&0xDEADBEEFu32.to_le_bytes());
        stream.extend(std::iter::repeat(0u8).take(layout.payload_len()));
        push_v3_frame(&mut stream, [3.0; 6], [0, 0]);

        let mut decoder = v3_decoder(stream);
        let samples: Vec<Sample> = decoder.by_ref().collect();
        assert_eq!(samples.len(), 1);
        assert_eq!(
            decoder.stop_reason(),
            Some(&StopReason::Desynchronized { found: 0xDEADBEEF })
        );
    }

    #[test]
    fn test_v1_fault_resolution_and_padding() {
        let layout = FrameLayout::for_format(FrameFormat::V1);
        let mut stream = Vec::new();
        push_magic(&mut stream);
        push_header(&mut stream, &layout);
        push_magic(&mut stream);
        for value in [48.0f32, 1.2, 350.0, 0.04, 15.5, 2.2] {
            stream.extend_from_slice(&value.to_le_bytes());
        }
        stream.extend_from_slice(&1589u16.to_le_bytes());
        stream.push(3); // I limit
        stream.push(0xAA); // pad, must be ignored

        let samples: Vec<Sample> = FrameDecoder::new(
            MockByteSource::from_bytes(&stream),
            layout,
        )
        .collect();

        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].channels.len(), 7);
        assert_eq!(samples[0].channel("ref_i_q"), Some(1589.0));
        assert_eq!(
            samples[0].fault,
            Some(ResolvedCode::Known {
                code: 3,
                label: "I limit".to_string()
            })
        );
        assert_eq!(samples[0].state, None);
    }

    #[test]
    fn test_v2_state_byte_and_unknown_code_sentinel() {
        let layout = FrameLayout::for_format(FrameFormat::V2);
        let mut stream = Vec::new();
        push_magic(&mut stream);
        push_header(&mut stream, &layout);
        push_magic(&mut stream);
        for value in [48.0f32, 1.2, 350.0, 0.04, 15.5, 2.2, -0.75] {
            stream.extend_from_slice(&value.to_le_bytes());
        }
        stream.extend_from_slice(&2048u16.to_le_bytes());
        stream.push(0); // no fault
        stream.push(9); // not in the state table

        let samples: Vec<Sample> = FrameDecoder::new(
            MockByteSource::from_bytes(&stream),
            layout,
        )
        .collect();

        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].channel("pid_term"), Some(-0.75f32 as f64));
        assert!(samples[0].fault.as_ref().unwrap().is_known());
        assert_eq!(samples[0].state, Some(ResolvedCode::Unknown { code: 9 }));
    }

    #[test]
    fn test_custom_scale_applied_to_setpoint() {
        // Calibrated capture: one scaled setpoint channel, no header.
        let counts_to_volts = Scale::new(3.3 * 200.6 / 4096.0, 0.0);
        let layout = FrameLayout::custom(
            vec![FieldSpec::scaled_setpoint("v_out_counts", counts_to_volts)],
            0,
        );

        let mut stream = Vec::new();
        push_magic(&mut stream);
        push_magic(&mut stream);
        stream.extend_from_slice(&1024u16.to_le_bytes());

        let samples: Vec<Sample> = FrameDecoder::new(
            MockByteSource::from_bytes(&stream),
            layout,
        )
        .collect();

        assert_eq!(samples.len(), 1);
        let expected = 1024.0 * 3.3 * 200.6 / 4096.0;
        assert!((samples[0].channel("v_out_counts").unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_garbage_only_stream_stops_on_exhaustion() {
        let stream = vec![0x42u8; 64];
        let mut decoder = v3_decoder(stream);
        assert!(decoder.next().is_none());
        assert_eq!(decoder.stop_reason(), Some(&StopReason::SourceExhausted));
    }

    #[test]
    fn test_chunked_source_still_decodes() {
        // One-byte reads from the source must not perturb framing.
        let layout = FrameLayout::for_format(FrameFormat::V3);
        let mut stream = Vec::new();
        push_magic(&mut stream);
        push_header(&mut stream, &layout);
        push_v3_frame(&mut stream, [1.0, 2.0, 3.0, 4.0, 5.0, 6.0], [10, 20]);

        let source = MockByteSource::from_bytes(&stream).with_chunk_limit(1);
        let samples: Vec<Sample> = FrameDecoder::new(source, layout).collect();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].channel("i_q"), Some(6.0));
    }
}
