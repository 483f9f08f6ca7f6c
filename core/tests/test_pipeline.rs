// ## 🧪 Stream pipeline suite
//
// In-memory transcoding: frames are built with flate2/prost, pushed through
// `run_transcode_pipeline`, and the output is re-parsed frame by frame.

#[cfg(test)]
mod tests {
    use std::io::{self, Cursor, Write};

    use bytes::Bytes;
    use flate2::{write::ZlibEncoder, Compression};
    use proptest::prelude::*;

    use pbf_core::{
        blob::{encode_blob, read_blob, Blob, BlobData, BlobError, BlobKind},
        compression::CompressionLevel,
        constants::{LENGTH_PREFIX_LEN, MAX_BLOB_HEADER_SIZE},
        headers::{encode_frame_header, read_frame, BlobHeader, HeaderError},
        stream::{run_transcode_pipeline, PipelineState, TranscodeConfig, TranscodePipeline},
        telemetry::Stage,
        types::{ErrorKind, StreamError},
    };

    // --- Fixtures ---

    fn zlib_blob(data: &[u8]) -> Blob {
        let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
        enc.write_all(data).unwrap();
        Blob {
            raw_size: Some(data.len() as i32),
            data: Some(BlobData::ZlibData(Bytes::from(enc.finish().unwrap()))),
        }
    }

    fn push_frame(out: &mut Vec<u8>, mut header: BlobHeader, blob: &Blob) {
        let body = encode_blob(blob);
        header.set_blob_len(body.len()).unwrap();
        out.extend_from_slice(&encode_frame_header(&header).unwrap());
        out.extend_from_slice(&body);
    }

    fn data_header() -> BlobHeader {
        BlobHeader::new("OSMData", 0)
    }

    /// Output frame as seen by a reader: header, blob and the raw blob bytes.
    struct OutFrame {
        header: BlobHeader,
        blob: Blob,
        blob_wire_len: usize,
    }

    fn parse_output(mut bytes: &[u8]) -> Vec<OutFrame> {
        let mut frames = Vec::new();
        while !bytes.is_empty() {
            let prefix = u32::from_be_bytes(bytes[..LENGTH_PREFIX_LEN].try_into().unwrap()) as usize;
            let header = read_frame(&mut bytes).unwrap().unwrap();
            assert_eq!(prefix, prost::Message::encoded_len(&header));
            let blob_wire_len = header.blob_len().unwrap();
            let blob = read_blob(&header, &mut bytes).unwrap();
            frames.push(OutFrame { header, blob, blob_wire_len });
        }
        frames
    }

    fn zstd_payload(blob: &Blob) -> Vec<u8> {
        match &blob.data {
            Some(BlobData::ZstdData(p)) => zstd::decode_all(&p[..]).unwrap(),
            other => panic!("expected zstd payload, got {other:?}"),
        }
    }

    fn transcode(input: &[u8], level: CompressionLevel) -> Result<Vec<u8>, StreamError> {
        let mut out = Vec::new();
        run_transcode_pipeline(Cursor::new(input), &mut out, &TranscodeConfig::new(level))?;
        Ok(out)
    }

    // --- Scenarios ---

    #[test]
    fn hello_world_zlib_frame() {
        let mut input = Vec::new();
        push_frame(&mut input, data_header(), &zlib_blob(b"hello world"));

        let out = transcode(&input, CompressionLevel::Default).unwrap();
        let frames = parse_output(&out);

        assert_eq!(frames.len(), 1);
        let f = &frames[0];
        assert_eq!(f.blob.kind(), Some(BlobKind::Zstd));
        assert_eq!(f.blob.raw_size, Some(11));
        assert_eq!(zstd_payload(&f.blob), b"hello world");
        assert_eq!(f.header.datasize as usize, encode_blob(&f.blob).len());
        assert_eq!(f.blob_wire_len, f.header.datasize as usize);
    }

    #[test]
    fn empty_input_is_success_with_empty_output() {
        let mut out = Vec::new();
        let snapshot = run_transcode_pipeline(io::empty(), &mut out, &TranscodeConfig::default()).unwrap();

        assert!(out.is_empty());
        assert_eq!(snapshot.frames, 0);
        assert_eq!(snapshot.bytes_in, 0);
        assert_eq!(snapshot.bytes_out, 0);
    }

    #[test]
    fn raw_blob_gains_raw_size() {
        let mut input = Vec::new();
        push_frame(&mut input, BlobHeader::new("OSMHeader", 0), &Blob::raw(&b"header block"[..]));

        let frames = parse_output(&transcode(&input, CompressionLevel::Fastest).unwrap());
        assert_eq!(frames[0].blob.raw_size, Some(12));
        assert_eq!(zstd_payload(&frames[0].blob), b"header block");
    }

    #[test]
    fn header_fields_pass_through() {
        let mut header = BlobHeader::new("OSMData", 0);
        header.indexdata = Some(Bytes::from_static(b"\x01\x02index\xff"));

        let mut input = Vec::new();
        push_frame(&mut input, header.clone(), &zlib_blob(b"nodes"));

        let frames = parse_output(&transcode(&input, CompressionLevel::Default).unwrap());
        assert_eq!(frames[0].header.r#type, header.r#type);
        assert_eq!(frames[0].header.indexdata, header.indexdata);
    }

    #[test]
    fn zstd_source_is_unsupported() {
        let mut input = Vec::new();
        push_frame(&mut input, data_header(), &zlib_blob(b"first"));
        let zstd_blob = Blob {
            raw_size: Some(3),
            data: Some(BlobData::ZstdData(Bytes::from(zstd::encode_all(&b"abc"[..], 3).unwrap()))),
        };
        push_frame(&mut input, data_header(), &zstd_blob);

        let err = transcode(&input, CompressionLevel::Default).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
        assert_eq!(err.stage(), Some(Stage::Decompress));
        assert!(matches!(err, StreamError::Frame { index: 1, .. }));
        assert!(matches!(err.root(), StreamError::Blob(BlobError::Unsupported(BlobKind::Zstd))));
    }

    #[test]
    fn oversize_header_prefix_is_format_error() {
        let input = MAX_BLOB_HEADER_SIZE.to_be_bytes();
        let err = transcode(&input, CompressionLevel::Default).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Format);
        assert_eq!(err.stage(), Some(Stage::Read));
        assert!(matches!(err.root(), StreamError::Header(HeaderError::TooLarge { .. })));
    }

    #[test]
    fn header_missing_type_aborts_without_output() {
        #[derive(Clone, PartialEq, prost::Message)]
        struct DatasizeOnly {
            #[prost(int32, required, tag = "3")]
            datasize: i32,
        }

        let blob = encode_blob(&Blob::raw(&b"nodes"[..]));
        let header = prost::Message::encode_to_vec(&DatasizeOnly { datasize: blob.len() as i32 });
        let mut input = (header.len() as u32).to_be_bytes().to_vec();
        input.extend_from_slice(&header);
        input.extend_from_slice(&blob);

        let mut out = Vec::new();
        let err = run_transcode_pipeline(Cursor::new(input), &mut out, &TranscodeConfig::default()).unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Read));
        assert_eq!(err.kind(), ErrorKind::Format);
        assert!(matches!(err.root(), StreamError::Header(HeaderError::MissingField { field: "type" })));
        assert!(out.is_empty());
    }

    #[test]
    fn trailing_partial_prefix_fails() {
        let mut input = Vec::new();
        push_frame(&mut input, data_header(), &zlib_blob(b"ok"));
        input.extend_from_slice(&[0x00, 0x00, 0x00]);

        let err = transcode(&input, CompressionLevel::Default).unwrap_err();
        assert!(matches!(err, StreamError::Frame { index: 1, stage: Stage::Read, .. }));
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn truncated_blob_fails_at_read() {
        let mut input = Vec::new();
        push_frame(&mut input, data_header(), &zlib_blob(b"cut short"));
        input.truncate(input.len() - 3);

        let err = transcode(&input, CompressionLevel::Default).unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Read));
        assert!(matches!(err.root(), StreamError::Blob(BlobError::Truncated { .. })));
    }

    #[test]
    fn malformed_blob_fails_at_decode() {
        let mut header = data_header();
        header.set_blob_len(3).unwrap();
        let mut input = encode_frame_header(&header).unwrap();
        input.extend_from_slice(&[0x0a, 0x05, 0x01]);

        let err = transcode(&input, CompressionLevel::Default).unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Decode));
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn corrupt_zlib_fails_at_decompress() {
        let mut blob = zlib_blob(b"declared wrong");
        blob.raw_size = Some(3);
        let mut input = Vec::new();
        push_frame(&mut input, data_header(), &blob);

        let err = transcode(&input, CompressionLevel::Default).unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Decompress));
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn nothing_after_failing_frame_is_written() {
        let mut input = Vec::new();
        push_frame(&mut input, data_header(), &zlib_blob(b"zero"));
        push_frame(&mut input, data_header(), &Blob::default());
        push_frame(&mut input, data_header(), &zlib_blob(b"two"));

        let mut out = Vec::new();
        let err = run_transcode_pipeline(Cursor::new(&input), &mut out, &TranscodeConfig::default()).unwrap_err();

        assert!(matches!(err, StreamError::Frame { index: 1, .. }));
        let written = parse_output(&out);
        assert_eq!(written.len(), 1);
        assert_eq!(zstd_payload(&written[0].blob), b"zero");
    }

    #[test]
    fn write_failure_is_tagged_write() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "disk full"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut input = Vec::new();
        push_frame(&mut input, data_header(), &zlib_blob(b"data"));

        let err = run_transcode_pipeline(Cursor::new(input), Broken, &TranscodeConfig::default()).unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Write));
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    // --- State machine ---

    #[test]
    fn states_progress_running_draining_done() {
        let mut input = Vec::new();
        push_frame(&mut input, data_header(), &zlib_blob(b"one"));

        let mut out = Vec::new();
        let mut p = TranscodePipeline::new(Cursor::new(input), &mut out, &TranscodeConfig::default());

        assert!(matches!(p.state(), PipelineState::Running));
        assert!(matches!(p.step(), PipelineState::Running));
        assert_eq!(p.frames_written(), 1);
        assert!(matches!(p.step(), PipelineState::Draining));
        assert!(matches!(p.step(), PipelineState::Done));
        assert!(p.state().is_terminal());
        // Terminal states are sticky.
        assert!(matches!(p.step(), PipelineState::Done));
    }

    #[test]
    fn failure_is_terminal() {
        let input = [0u8, 0];
        let mut out = Vec::new();
        let mut p = TranscodePipeline::new(Cursor::new(input), &mut out, &TranscodeConfig::default());

        assert!(matches!(p.step(), PipelineState::Failed(_)));
        assert!(matches!(p.step(), PipelineState::Failed(_)));
        assert_eq!(p.frames_written(), 0);
    }

    // --- Telemetry wiring ---

    #[test]
    fn snapshot_counts_frames_and_bytes() {
        let mut input = Vec::new();
        push_frame(&mut input, BlobHeader::new("OSMHeader", 0), &Blob::raw(&b"hdr"[..]));
        push_frame(&mut input, data_header(), &zlib_blob(&b"x".repeat(4096)));

        let mut out = Vec::new();
        let snapshot = run_transcode_pipeline(Cursor::new(&input), &mut out, &TranscodeConfig::default()).unwrap();

        assert_eq!(snapshot.frames, 2);
        assert_eq!(snapshot.frames_raw, 1);
        assert_eq!(snapshot.frames_zlib, 1);
        assert_eq!(snapshot.bytes_in, input.len() as u64);
        assert_eq!(snapshot.bytes_out, out.len() as u64);
        assert_eq!(snapshot.bytes_raw, 3 + 4096);
        assert!(snapshot.stage_times.get(Stage::Compress) > std::time::Duration::ZERO);
        assert!(snapshot.sanity_check());
    }

    #[test]
    fn verify_mode_transcodes_identically() {
        let mut input = Vec::new();
        push_frame(&mut input, data_header(), &zlib_blob(b"verified payload"));

        let mut plain = Vec::new();
        run_transcode_pipeline(Cursor::new(&input), &mut plain, &TranscodeConfig::default()).unwrap();
        let mut verified = Vec::new();
        let config = TranscodeConfig::default().with_verify(true);
        run_transcode_pipeline(Cursor::new(&input), &mut verified, &config).unwrap();

        assert_eq!(plain, verified);
    }

    // --- Properties ---

    fn arb_payload() -> impl Strategy<Value = (bool, Vec<u8>)> {
        (any::<bool>(), prop::collection::vec(any::<u8>(), 0..2048))
    }

    fn arb_level() -> impl Strategy<Value = CompressionLevel> {
        prop::sample::select(CompressionLevel::ALL.to_vec())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn roundtrip_preserves_payloads_and_order(
            payloads in prop::collection::vec(arb_payload(), 0..8),
            level in arb_level(),
        ) {
            let mut input = Vec::new();
            for (as_zlib, data) in &payloads {
                let blob = if *as_zlib { zlib_blob(data) } else { Blob::raw(Bytes::from(data.clone())) };
                push_frame(&mut input, data_header(), &blob);
            }

            let out = transcode(&input, level).unwrap();
            let frames = parse_output(&out);

            prop_assert_eq!(frames.len(), payloads.len());
            for (frame, (_, data)) in frames.iter().zip(&payloads) {
                prop_assert_eq!(&zstd_payload(&frame.blob), data);
                prop_assert_eq!(frame.blob.raw_size, Some(data.len() as i32));
                prop_assert_eq!(frame.header.datasize as usize, encode_blob(&frame.blob).len());
            }
        }

        #[test]
        fn same_level_is_decompress_identical(
            payloads in prop::collection::vec(arb_payload(), 1..4),
            level in arb_level(),
        ) {
            let mut input = Vec::new();
            for (_, data) in &payloads {
                push_frame(&mut input, data_header(), &zlib_blob(data));
            }

            let first = parse_output(&transcode(&input, level).unwrap());
            let second = parse_output(&transcode(&input, level).unwrap());
            prop_assert_eq!(first.len(), second.len());
            for (a, b) in first.iter().zip(&second) {
                prop_assert_eq!(zstd_payload(&a.blob), zstd_payload(&b.blob));
            }
        }
    }
}
