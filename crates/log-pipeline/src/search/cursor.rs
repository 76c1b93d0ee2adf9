//! 매치 탐색 커서
//!
//! 하이라이트 모드에서 "현재 매치" 위치를 관리합니다.
//! 다음/이전 이동은 양 끝에서 멈추며 순환하지 않습니다.

/// 매치 커서
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchCursor {
    /// 매치 개수
    len: usize,
    /// 현재 위치 (0..len)
    position: usize,
}

impl MatchCursor {
    /// 매치 개수로 새 커서를 생성합니다. 위치는 0입니다.
    pub fn new(len: usize) -> Self {
        Self { len, position: 0 }
    }

    /// 새 매치 개수로 재설정하고 위치를 0으로 되돌립니다.
    pub fn reset(&mut self, len: usize) {
        self.len = len;
        self.position = 0;
    }

    /// 다음 매치로 이동합니다. 마지막 매치에서 멈춥니다.
    pub fn next(&mut self) -> usize {
        if self.position + 1 < self.len {
            self.position += 1;
        }
        self.position
    }

    /// 이전 매치로 이동합니다. 첫 매치에서 멈춥니다.
    pub fn previous(&mut self) -> usize {
        self.position = self.position.saturating_sub(1);
        self.position
    }

    /// 현재 위치 (매치가 없어도 0)
    pub fn position(&self) -> usize {
        self.position
    }

    /// 매치가 있을 때만 현재 위치를 반환합니다.
    pub fn current(&self) -> Option<usize> {
        (self.len > 0).then_some(self.position)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
