#![no_main]

use libfuzzer_sys::fuzz_target;
use logsift_core::pipeline::{LineParser, NullSink};
use logsift_core::types::RecordId;
use logsift_pipeline::parser::BoxLogParser;

fuzz_target!(|data: &[u8]| {
    let line = String::from_utf8_lossy(data);
    let parser = BoxLogParser::new();
    let id = RecordId {
        batch: uuid::Uuid::nil(),
        file: 0,
        line: 0,
    };

    // 어떤 입력이든 패닉 없이 레코드 하나가 나와야 한다
    let record = parser.parse_line(id, &line, &NullSink);
    assert_eq!(record.raw_line(), line.as_ref());
    assert_eq!(record.is_valid(), record.error().is_none());
});
