//! InMemory participant registry.
//!
//! A `Vec` behind a `parking_lot::Mutex`. The palette cursor lives under the same lock
//! but outside the participant list, so [`ParticipantRegistry::clear`] leaves it alone.

use parking_lot::Mutex;

use crate::domain::{PaletteCursor, Participant, ParticipantRegistry};

#[derive(Debug, Default)]
struct RegistryInner {
    participants: Vec<Participant>,
    cursor: PaletteCursor,
}

/// In-memory participant registry shared between the chat thread and the tick loop.
#[derive(Debug, Default)]
pub struct InMemoryParticipantRegistry {
    inner: Mutex<RegistryInner>,
}

impl InMemoryParticipantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of colors handed out since creation.
    pub fn palette_position(&self) -> u64 {
        self.inner.lock().cursor.position()
    }
}

impl ParticipantRegistry for InMemoryParticipantRegistry {
    fn add_if_absent(&self, name: &str) -> bool {
        if name.is_empty() {
            return false;
        }

        let mut inner = self.inner.lock();
        if inner.participants.iter().any(|p| p.name() == name) {
            return false;
        }

        let color = inner.cursor.next_color();
        inner.participants.push(Participant::new(name, color));
        drop(inner);

        tracing::info!("Added player: {}", name);
        true
    }

    fn clear(&self) {
        self.inner.lock().participants.clear();
    }

    fn snapshot(&self) -> Vec<Participant> {
        self.inner.lock().participants.clone()
    }

    fn len(&self) -> usize {
        self.inner.lock().participants.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PALETTE;
    use std::{sync::Arc, thread};

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - InMemoryParticipantRegistry の追加・クリア・スナップショット
    // - 名前の一意性と挿入順の保持
    // - クリア後もパレットのカーソルが進み続けること
    //
    // 【なぜこのテストが必要か】
    // - Registry はチャットスレッドとティックループの両方から使われる唯一の共有資源
    // - スライスの並びと色は挿入順とカーソルで決まるため、表示の一貫性を保証する必要がある
    // ========================================

    fn names(registry: &InMemoryParticipantRegistry) -> Vec<String> {
        registry
            .snapshot()
            .iter()
            .map(|p| p.name().to_string())
            .collect()
    }

    #[test]
    fn test_add_if_absent_ignores_duplicates() {
        // テスト項目: 同じ名前を再度追加しても重複しない
        // given (前提条件):
        let registry = InMemoryParticipantRegistry::new();

        // when (操作):
        let alice = registry.add_if_absent("alice");
        let bob = registry.add_if_absent("bob");
        let alice_again = registry.add_if_absent("alice");

        // then (期待する結果):
        assert!(alice);
        assert!(bob);
        assert!(!alice_again);
        assert_eq!(names(&registry), vec!["alice", "bob"]);
    }

    #[test]
    fn test_add_if_absent_ignores_empty_name() {
        // テスト項目: 空の名前は追加されない
        // given (前提条件):
        let registry = InMemoryParticipantRegistry::new();

        // when (操作):
        let added = registry.add_if_absent("");

        // then (期待する結果):
        assert!(!added);
        assert!(registry.is_empty());
        assert_eq!(registry.palette_position(), 0);
    }

    #[test]
    fn test_names_are_case_sensitive() {
        // テスト項目: 名前の比較は大文字小文字を区別する
        // given (前提条件):
        let registry = InMemoryParticipantRegistry::new();

        // when (操作):
        registry.add_if_absent("Alice");
        registry.add_if_absent("alice");

        // then (期待する結果):
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_insertion_order_survives_failed_inserts() {
        // テスト項目: 重複追加を挟んでも最初に成功した順序が保たれる
        // given (前提条件):
        let registry = InMemoryParticipantRegistry::new();
        let attempts = ["carol", "alice", "carol", "bob", "alice", "dave", "bob"];

        // when (操作):
        for name in attempts {
            registry.add_if_absent(name);
        }

        // then (期待する結果):
        assert_eq!(names(&registry), vec!["carol", "alice", "bob", "dave"]);
    }

    #[test]
    fn test_colors_follow_palette_and_survive_clear() {
        // テスト項目: 色はパレット順に割り当てられ、クリア後もカーソルは戻らない
        // given (前提条件):
        let registry = InMemoryParticipantRegistry::new();
        registry.add_if_absent("alice");
        registry.add_if_absent("bob");
        registry.add_if_absent("bob");

        // when (操作):
        registry.clear();
        registry.add_if_absent("alice");

        // then (期待する結果):
        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].color(), PALETTE[2]);
        assert_eq!(registry.palette_position(), 3);
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        // テスト項目: スナップショットはその後の変更の影響を受けない
        // given (前提条件):
        let registry = InMemoryParticipantRegistry::new();
        registry.add_if_absent("alice");

        // when (操作):
        let snapshot = registry.snapshot();
        registry.add_if_absent("bob");
        registry.clear();

        // then (期待する結果):
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].name(), "alice");
        assert!(registry.is_empty());
    }

    #[test]
    fn test_concurrent_adds_keep_names_unique() {
        // テスト項目: 複数スレッドから同時に追加しても名前は一意に保たれる
        // given (前提条件):
        let registry = Arc::new(InMemoryParticipantRegistry::new());

        // when (操作):
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    for i in 0..50 {
                        registry.add_if_absent(&format!("viewer{}", (i + worker) % 20));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        // then (期待する結果):
        let mut all = names(&registry);
        assert_eq!(all.len(), 20);
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 20);
    }
}
