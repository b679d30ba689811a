use chrono::NaiveDate;

use dlis_writer::codec::ReprCode;
use dlis_writer::model::{FileHeader, Item, Set, SetKind, Values};
use dlis_writer::source::{ColumnSource, Samples};
use dlis_writer::write::{
    ChannelBinding, FrameStream, LogicalFile, NoFormatData, Writer, WriterConfig,
};

/// A reassembled logical record with its segment metadata.
#[derive(Debug)]
struct ParsedRecord {
    is_eflr: bool,
    record_type: u8,
    body: Vec<u8>,
}

/// Walks the visible records and logical record segments of a DLIS file,
/// checking the framing invariants along the way.
fn parse_records(bytes: &[u8], visible_record_length: usize) -> Vec<ParsedRecord> {
    assert!(bytes.len() >= 80, "missing storage unit label");
    let mut records: Vec<ParsedRecord> = Vec::new();
    let mut open: Option<ParsedRecord> = None;

    let mut pos = 80;
    while pos < bytes.len() {
        let vr_len = u16::from_be_bytes([bytes[pos], bytes[pos + 1]]) as usize;
        assert_eq!(&bytes[pos + 2..pos + 4], &[0xFF, 0x01], "format version");
        assert!(vr_len <= visible_record_length, "visible record too long");
        assert_eq!(vr_len % 2, 0, "odd visible record length");
        let vr_end = pos + vr_len;
        assert!(vr_end <= bytes.len(), "truncated visible record");

        let mut seg_pos = pos + 4;
        while seg_pos < vr_end {
            let seg_len =
                u16::from_be_bytes([bytes[seg_pos], bytes[seg_pos + 1]]) as usize;
            assert!(seg_len >= 16, "segment below the minimum size");
            assert_eq!(seg_len % 2, 0, "odd segment length");
            assert!(seg_pos + seg_len <= vr_end, "segment crosses a VR header");

            let attrs = bytes[seg_pos + 2];
            let record_type = bytes[seg_pos + 3];
            let is_eflr = attrs & 0x80 != 0;
            let has_predecessor = attrs & 0x40 != 0;
            let has_successor = attrs & 0x20 != 0;
            let padded = attrs & 0x01 != 0;
            assert_eq!(attrs & 0x1E, 0, "encryption/checksum flags must be clear");

            let body_end = seg_pos + seg_len - usize::from(padded);
            if padded {
                assert_eq!(bytes[seg_pos + seg_len - 1], 0x01, "padding byte");
            }
            let body = &bytes[seg_pos + 4..body_end];

            match open.as_mut() {
                Some(record) => {
                    assert!(has_predecessor, "continuation without predecessor flag");
                    assert_eq!(record.is_eflr, is_eflr);
                    assert_eq!(record.record_type, record_type);
                    record.body.extend_from_slice(body);
                }
                None => {
                    assert!(!has_predecessor, "first segment with predecessor flag");
                    open = Some(ParsedRecord {
                        is_eflr,
                        record_type,
                        body: body.to_vec(),
                    });
                }
            }
            if !has_successor {
                records.push(open.take().unwrap());
            }
            seg_pos += seg_len;
        }
        pos = vr_end;
    }
    assert!(open.is_none(), "file ends inside a logical record");
    records
}

fn minimal_file() -> LogicalFile {
    let mut origin = Item::new("O1");
    origin.set("FILE-SET-NUMBER", 1i64);
    origin.set(
        "CREATION-TIME",
        NaiveDate::from_ymd_opt(1987, 4, 19)
            .unwrap()
            .and_hms_milli_opt(21, 20, 15, 620)
            .unwrap(),
    );

    let mut channel = Item::new("C");
    channel.set("REPRESENTATION-CODE", i64::from(ReprCode::Fdoubl.tag()));
    channel.set("DIMENSION", vec![1i64]);

    let mut frame = Item::new("F");
    frame.set("INDEX-TYPE", "TIME");
    frame.set("CHANNELS", Values::from(vec![channel.reference()]));

    let mut channels = Set::new(SetKind::Channel, None);
    channels.add_item(channel).unwrap();
    let mut frames = Set::new(SetKind::Frame, None);
    frames.add_item(frame).unwrap();

    let mut file = LogicalFile::new(FileHeader::new("FILE", 1).unwrap(), origin).unwrap();
    file.add_set(channels).unwrap();
    file.add_set(frames).unwrap();
    file
}

fn minimal_source() -> ColumnSource {
    let mut source = ColumnSource::new();
    source
        .add_column("c", Samples::F64(vec![1.0, 2.0, 3.0]), vec![1])
        .unwrap();
    source
}

fn minimal_stream(source: &ColumnSource) -> FrameStream<'_> {
    FrameStream::new(
        "F",
        vec![ChannelBinding::scalar("C", "c", ReprCode::Fdoubl)],
        source,
    )
}

#[test]
fn minimal_time_based_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("minimal.dlis");

    let source = minimal_source();
    let total = Writer::new(WriterConfig::default())
        .write(minimal_file(), vec![minimal_stream(&source)], &path)
        .unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes.len() as u64, total);

    // Storage unit label.
    assert_eq!(&bytes[..4], b"   1");
    assert_eq!(&bytes[4..9], b"V1.00");
    assert_eq!(&bytes[9..15], b"RECORD");
    assert_eq!(&bytes[15..20], b" 8192");
    assert_eq!(&bytes[20..39], b"DEFAULT STORAGE SET");

    let records = parse_records(&bytes, 8192);
    let kinds: Vec<(bool, u8)> = records
        .iter()
        .map(|record| (record.is_eflr, record.record_type))
        .collect();
    assert_eq!(
        kinds,
        [
            (true, 0),  // FILE-HEADER
            (true, 1),  // ORIGIN
            (true, 3),  // CHANNEL
            (true, 4),  // FRAME
            (false, 0), // three frame data rows
            (false, 0),
            (false, 0),
        ],
    );

    // The file header set opens with an unnamed set component.
    let fh = &records[0].body;
    assert_eq!(fh[0], 0xF0);
    assert_eq!(fh[1], 11);
    assert_eq!(&fh[2..13], b"FILE-HEADER");

    // The origin record carries the creation time.
    let dtime = [0x57, 0x14, 0x13, 0x15, 0x14, 0x0F, 0x02, 0x6C];
    assert!(
        records[1]
            .body
            .windows(dtime.len())
            .any(|window| window == dtime),
        "origin record does not contain the expected DTIME bytes",
    );

    // Frame data bodies: OBNAME(F), 1-based index, FDOUBL sample.
    for (i, record) in records[4..].iter().enumerate() {
        let mut expected = vec![0x01, 0x00, 0x01, b'F'];
        expected.push(i as u8 + 1);
        expected.extend_from_slice(&(i as f64 + 1.0).to_be_bytes());
        assert_eq!(record.body, expected, "frame data row {}", i + 1);
    }
}

#[test]
fn writing_twice_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let path_a = dir.path().join("a.dlis");
    let path_b = dir.path().join("b.dlis");

    let source = minimal_source();
    let writer = Writer::new(WriterConfig::default());
    writer
        .write(minimal_file(), vec![minimal_stream(&source)], &path_a)
        .unwrap();
    writer
        .write(minimal_file(), vec![minimal_stream(&source)], &path_b)
        .unwrap();

    assert_eq!(
        std::fs::read(&path_a).unwrap(),
        std::fs::read(&path_b).unwrap(),
    );
}

#[test]
fn small_visible_records_split_the_sets() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("small-vr.dlis");

    let source = minimal_source();
    let config = WriterConfig {
        visible_record_length: 64,
        ..WriterConfig::default()
    };
    Writer::new(config)
        .write(minimal_file(), vec![minimal_stream(&source)], &path)
        .unwrap();

    let bytes = std::fs::read(&path).unwrap();
    let records = parse_records(&bytes, 64);
    assert_eq!(records.len(), 7);

    // The same model written with default framing must reassemble to the
    // same record bodies.
    let path_wide = dir.path().join("wide-vr.dlis");
    Writer::new(WriterConfig::default())
        .write(minimal_file(), vec![minimal_stream(&source)], &path_wide)
        .unwrap();
    let wide = parse_records(&std::fs::read(&path_wide).unwrap(), 8192);
    for (narrow, wide) in records.iter().zip(&wide) {
        assert_eq!(narrow.body, wide.body);
    }
}

#[test]
fn no_format_records_follow_the_sets() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no-format.dlis");

    let mut file = minimal_file();
    let mut no_format = Set::new(SetKind::NoFormat, None);
    let mut item = Item::new("NF");
    item.set("CONSUMER-NAME", "ops");
    item.set("DESCRIPTION", "free text notes");
    no_format.add_item(item).unwrap();
    file.add_set(no_format).unwrap();
    file.add_no_format_data(NoFormatData::new("NF", b"hello dlis".to_vec()));

    let source = minimal_source();
    Writer::new(WriterConfig::default())
        .write(file, vec![minimal_stream(&source)], &path)
        .unwrap();

    let records = parse_records(&std::fs::read(&path).unwrap(), 8192);
    let kinds: Vec<(bool, u8)> = records
        .iter()
        .map(|record| (record.is_eflr, record.record_type))
        .collect();
    assert_eq!(
        kinds,
        [
            (true, 0),
            (true, 1),
            (true, 3),
            (true, 4),
            (true, 8),  // NO-FORMAT set (UDI)
            (false, 1), // no-format data
            (false, 0),
            (false, 0),
            (false, 0),
        ],
    );
    let body = &records[5].body;
    assert_eq!(&body[..5], &[0x01, 0x00, 0x02, b'N', b'F']);
    assert_eq!(&body[5..], b"hello dlis");
}

#[test]
fn validation_failures_leave_no_file_behind() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("never-created.dlis");

    // The stream is missing, so validation must fail before the
    // destination is touched.
    let err = Writer::new(WriterConfig::default())
        .write(minimal_file(), vec![], &path)
        .unwrap_err();
    assert!(matches!(err, dlis_writer::Error::Validation(_)));
    assert!(!path.exists());
}

#[test]
fn chunked_input_produces_the_same_file() {
    let dir = tempfile::tempdir().unwrap();
    let path_whole = dir.path().join("whole.dlis");
    let path_chunked = dir.path().join("chunked.dlis");

    let mut source = ColumnSource::new();
    let rows: Vec<f64> = (0..100).map(f64::from).collect();
    source.add_column("c", Samples::F64(rows), vec![1]).unwrap();

    let writer = Writer::new(WriterConfig::default());
    writer
        .write(minimal_file(), vec![minimal_stream(&source)], &path_whole)
        .unwrap();
    writer
        .write(
            minimal_file(),
            vec![minimal_stream(&source).with_chunk_rows(7)],
            &path_chunked,
        )
        .unwrap();

    assert_eq!(
        std::fs::read(&path_whole).unwrap(),
        std::fs::read(&path_chunked).unwrap(),
    );
}
