#![no_main]

use libfuzzer_sys::fuzz_target;
use logsift_core::pipeline::{LineParser, NullSink};
use logsift_core::types::RecordId;
use logsift_pipeline::parser::SyslogParser;

fuzz_target!(|data: &[u8]| {
    let Ok(parser) = SyslogParser::new() else {
        return;
    };
    let line = String::from_utf8_lossy(data);
    let id = RecordId {
        batch: uuid::Uuid::nil(),
        file: 0,
        line: 0,
    };

    // Logger 재해석 경로까지 포함해 패닉 없이 레코드 하나
    let record = parser.parse_line(id, &line, &NullSink);
    assert_eq!(record.raw_line(), line.as_ref());
});
