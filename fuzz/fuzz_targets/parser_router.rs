#![no_main]

use libfuzzer_sys::fuzz_target;
use logsift_core::pipeline::NullSink;
use logsift_core::types::LogSource;
use logsift_pipeline::parser::ParserRouter;

fuzz_target!(|data: &[u8]| {
    let Ok(router) = ParserRouter::with_defaults() else {
        return;
    };
    let content = String::from_utf8_lossy(data);
    let non_blank = content.lines().filter(|l| !l.trim().is_empty()).count();

    for source in [LogSource::Box, LogSource::Syslog] {
        let records = router.parse_text(source, uuid::Uuid::nil(), 0, &content, &NullSink);
        // 공백이 아닌 라인마다 정확히 레코드 하나
        assert_eq!(records.len(), non_blank);
    }
});
