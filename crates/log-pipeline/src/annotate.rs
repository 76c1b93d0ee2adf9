//! 레코드 주석 -- 표시용 태그 도출
//!
//! 유효 레코드에서 상세 보기/목록에 붙일 태그를 계산합니다.
//!
//! | 조건 | 태그 |
//! |------|------|
//! | Box `meta.version` 존재 | `v{version}` |
//! | Box `meta.process != "box"` | 프로세스 이름 |
//! | `name == "manager"` && 메시지가 `video event`로 시작 | `Multi Video Player` |
//! | `name == "manager"` && 메시지가 소켓 서버 이벤트 접두어로 시작 | `Socket Server Event` |

use logsift_core::types::{BoxCrash, LogRecord, StructuredEntry};

/// 영상 재생기 이벤트 태그
pub const MULTI_VIDEO_PLAYER_TAG: &str = "Multi Video Player";

/// 소켓 서버 이벤트 태그
pub const SOCKET_SERVER_EVENT_TAG: &str = "Socket Server Event";

const MANAGER_NAME: &str = "manager";
const VIDEO_EVENT_PREFIX: &str = "video event";
const DEFAULT_BOX_PROCESS: &str = "box";

/// manager 서비스가 남기는 소켓 서버 이벤트 메시지 접두어
pub const SOCKET_SERVER_LOG_PREFIXES: &[&str] = &[
    "update sockets connecting",
    "stream stop",
    "video stop",
    "widget stop",
    "port-check stop",
    "stop",
    "stream join",
    "video start",
    "widget start",
    "preview connect",
    "stream custom",
    "stream freeze",
    "stream hibernate",
    "stream hide",
    "stream move",
    "stream smoothness",
    "webrtc receive message",
    "timer adjust",
    "timer hide",
    "timer pause",
    "timer position",
    "timer reset",
    "timer show",
    "timer start",
    "local video pre response",
    "video custom",
    "video error_set",
    "video get_preview_url",
    "video next",
    "video pause",
    "video play",
    "video previous",
    "video seek",
    "video select",
    "video subtitles",
    "widget lap",
    "widget pause",
    "widget play",
    "widget reset",
    "screenshot",
    "screenshot fullscreen",
    "set mute",
    "set volume",
    "chain established",
    "chain broken",
    "announcements video init device",
    "announcements video setup transport and consumer",
    "announcements video stop",
    "first presenter id",
];

/// 레코드의 표시 태그를 계산합니다. 무효 레코드는 태그가 없습니다.
pub fn tags(record: &LogRecord) -> Vec<String> {
    let Some(entry) = record.parsed() else {
        return Vec::new();
    };

    let mut tags = Vec::new();

    if let StructuredEntry::Box(entry) = entry {
        if let Some(version) = &entry.meta.version {
            tags.push(format!("v{version}"));
        }
        if entry.meta.process != DEFAULT_BOX_PROCESS {
            tags.push(entry.meta.process.clone());
        }
    }

    if entry.name() == MANAGER_NAME {
        let message = entry.message();
        if message.starts_with(VIDEO_EVENT_PREFIX) {
            tags.push(MULTI_VIDEO_PLAYER_TAG.to_owned());
        }
        if is_socket_server_event(message) {
            tags.push(SOCKET_SERVER_EVENT_TAG.to_owned());
        }
    }

    tags
}

/// 소켓 서버 이벤트 메시지인지 확인합니다.
pub fn is_socket_server_event(message: &str) -> bool {
    SOCKET_SERVER_LOG_PREFIXES
        .iter()
        .any(|prefix| message.starts_with(prefix))
}

/// 크래시 형태 Box 엔트리의 중첩 진단 객체
pub fn crash(record: &LogRecord) -> Option<&BoxCrash> {
    match record.parsed()? {
        StructuredEntry::Box(entry) => entry.error.as_ref(),
        StructuredEntry::Syslog(_) => None,
    }
}
