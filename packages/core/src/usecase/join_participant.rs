//! UseCase: 参加コマンド処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinParticipantUseCase::execute() メソッド
//! - チャットメッセージが参加コマンドかどうかの判定とゲートによる受付制御
//!
//! ### なぜこのテストが必要か
//! - ゲートが閉じている間に参加者が増えないことを保証する
//! - 同じ視聴者が何度コマンドを送っても一度しか登録されないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：ゲートが開いている間の参加
//! - 異常系：ゲートが閉じている間の参加、参加コマンド以外のメッセージ
//! - エッジケース：同じ視聴者による重複参加

use std::sync::Arc;

use crate::domain::{EngagementGate, ParticipantRegistry, is_join_command};

/// Result of one chat message passed to [`JoinParticipantUseCase::execute`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// The sender entered the wheel
    Added,
    /// The sender was already on the wheel
    AlreadyJoined,
    /// A join command arrived while joins were closed
    GateClosed,
    /// The message was not a join command
    NotACommand,
}

/// 参加コマンドのユースケース
#[derive(Clone)]
pub struct JoinParticipantUseCase {
    /// Registry（参加者の共有リスト）
    registry: Arc<dyn ParticipantRegistry>,
    /// EngagementGate（参加受付中かどうか）
    gate: EngagementGate,
}

impl JoinParticipantUseCase {
    /// 新しい JoinParticipantUseCase を作成
    pub fn new(registry: Arc<dyn ParticipantRegistry>, gate: EngagementGate) -> Self {
        Self { registry, gate }
    }

    /// チャットメッセージを処理
    ///
    /// # Arguments
    ///
    /// * `sender` - 送信者のニックネーム
    /// * `text` - メッセージ本文
    ///
    /// # Returns
    ///
    /// 処理結果の [`JoinOutcome`]
    pub fn execute(&self, sender: &str, text: &str) -> JoinOutcome {
        if !is_join_command(text) {
            return JoinOutcome::NotACommand;
        }

        if !self.gate.is_open() {
            tracing::info!("Ignoring !join from {} (wheel closed)", sender);
            return JoinOutcome::GateClosed;
        }

        if self.registry.add_if_absent(sender) {
            JoinOutcome::Added
        } else {
            JoinOutcome::AlreadyJoined
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::NoopCountdown, infrastructure::registry::InMemoryParticipantRegistry};

    fn create_test_usecase(open: bool) -> (JoinParticipantUseCase, Arc<InMemoryParticipantRegistry>) {
        let registry = Arc::new(InMemoryParticipantRegistry::new());
        let gate = EngagementGate::new();
        gate.set_open(open, &mut NoopCountdown, 60);
        (JoinParticipantUseCase::new(registry.clone(), gate), registry)
    }

    #[test]
    fn test_join_while_open_adds_sender() {
        // テスト項目: ゲートが開いている間の参加コマンドで送信者が追加される
        // given (前提条件):
        let (usecase, registry) = create_test_usecase(true);

        // when (操作):
        let result = usecase.execute("alice", "!JOIN");

        // then (期待する結果):
        assert_eq!(result, JoinOutcome::Added);
        assert_eq!(registry.snapshot()[0].name(), "alice");
    }

    #[test]
    fn test_join_while_closed_is_dropped() {
        // テスト項目: ゲートが閉じている間の参加コマンドは無視される
        // given (前提条件):
        let (usecase, registry) = create_test_usecase(false);

        // when (操作):
        let result = usecase.execute("alice", "!join");

        // then (期待する結果):
        assert_eq!(result, JoinOutcome::GateClosed);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_repeated_join_registers_once() {
        // テスト項目: 同じ視聴者が何度参加コマンドを送っても一度だけ登録される
        // given (前提条件):
        let (usecase, registry) = create_test_usecase(true);
        usecase.execute("alice", "!join");

        // when (操作):
        let result = usecase.execute("alice", "!join again");

        // then (期待する結果):
        assert_eq!(result, JoinOutcome::AlreadyJoined);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_other_messages_are_not_commands() {
        // テスト項目: 参加コマンド以外のメッセージでは何も起きない
        // given (前提条件):
        let (usecase, registry) = create_test_usecase(true);

        // when (操作):
        let result = usecase.execute("alice", "hello !join");

        // then (期待する結果):
        assert_eq!(result, JoinOutcome::NotACommand);
        assert!(registry.is_empty());
    }
}
