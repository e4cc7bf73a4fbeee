//! 완료된 번역 결과 보관소 (메모리, 최신순).

use lingshot_core::models::task::TranslationResult;
use parking_lot::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct ResultStore {
    // 인덱스 0이 가장 최근
    entries: RwLock<Vec<TranslationResult>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 최종 결과 추가 (맨 앞)
    pub fn push(&self, result: TranslationResult) {
        self.entries.write().insert(0, result);
    }

    /// 전체 목록 (최신순)
    pub fn list(&self) -> Vec<TranslationResult> {
        self.entries.read().clone()
    }

    pub fn get(&self, id: Uuid) -> Option<TranslationResult> {
        self.entries.read().iter().find(|r| r.id == id).cloned()
    }

    /// 결과 삭제. 존재했으면 true.
    pub fn delete(&self, id: Uuid) -> bool {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|r| r.id != id);
        entries.len() != before
    }

    /// 전체 삭제. 삭제된 개수 반환.
    pub fn clear(&self) -> usize {
        let mut entries = self.entries.write();
        let count = entries.len();
        entries.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
