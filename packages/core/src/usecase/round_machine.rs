//! UseCase: ラウンドの状態遷移
//!
//! The round state machine owns [`RoundState`] and is driven from a single simulation
//! thread: trigger operations from host input, plus one [`RoundStateMachine::tick`] per frame.
//! Every (phase, event) pair is total; events that do not apply are ignored.
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - 参加受付の開閉、回転開始、勝者決定、長押しによるリセット
//! - ゲートの開閉に伴うカウントダウンタイマーの開始・停止
//!
//! ### なぜこのテストが必要か
//! - 勝者表示中に誤って回転や受付の開閉が起きないことを保証する
//! - リセット後にホストが自動で再登録されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：受付 → 締切 → 回転 → 勝者表示 → リセット
//! - 異常系：参加者不足、二重の回転要求、異なる入力元による長押し解除
//! - エッジケース：閾値未満で離した長押し、ホスト未設定でのリセット

use std::sync::Arc;

use rand::Rng;

use crate::domain::{
    Celebration, CountdownTimer, EngagementGate, HoldSource, Participant, ParticipantRegistry,
    RoundPhase, RoundSnapshot, RoundState, SpinDraw, SpinStep, sanitize_dt,
};

/// Countdown started when joins open, in seconds.
pub const DEFAULT_COUNTDOWN_SECS: u32 = 60;

/// Fewest participants a spin needs.
pub const MIN_PARTICIPANTS_TO_SPIN: usize = 2;

/// Fixed settings of a wheel session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundSettings {
    /// Host participant reseeded after every reset
    pub host: Option<String>,
    /// Countdown length passed to the timer when joins open
    pub countdown_secs: u32,
    /// Result of the stream allow-list check
    pub authorized: bool,
}

impl Default for RoundSettings {
    fn default() -> Self {
        Self {
            host: None,
            countdown_secs: DEFAULT_COUNTDOWN_SECS,
            authorized: false,
        }
    }
}

/// ラウンドの状態遷移を管理するユースケース
pub struct RoundStateMachine<R> {
    state: RoundState,
    /// Registry（チャットスレッドと共有）
    registry: Arc<dyn ParticipantRegistry>,
    /// EngagementGate（チャットスレッドが読み取る）
    gate: EngagementGate,
    /// 外部のカウントダウン表示
    timer: Box<dyn CountdownTimer>,
    rng: R,
    settings: RoundSettings,
}

impl<R: Rng> RoundStateMachine<R> {
    /// 新しい RoundStateMachine を作成
    ///
    /// # Arguments
    ///
    /// * `registry` - 参加者の共有リスト
    /// * `gate` - 参加受付ゲート（チャットセッションと共有）
    /// * `timer` - ゲートの開閉で開始・停止されるカウントダウン
    /// * `rng` - 回転の初速と摩擦を決める乱数源
    /// * `settings` - ホスト名などの固定設定
    pub fn new(
        registry: Arc<dyn ParticipantRegistry>,
        gate: EngagementGate,
        timer: Box<dyn CountdownTimer>,
        rng: R,
        settings: RoundSettings,
    ) -> Self {
        Self {
            state: RoundState::default(),
            registry,
            gate,
            timer,
            rng,
            settings,
        }
    }

    /// Add the configured host to the wheel, as if they had joined.
    pub fn seed_host(&self) -> bool {
        match &self.settings.host {
            Some(host) => self.registry.add_if_absent(host),
            None => false,
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.state.phase(self.gate.is_open())
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn gate(&self) -> &EngagementGate {
        &self.gate
    }

    pub fn settings(&self) -> &RoundSettings {
        &self.settings
    }

    /// Flip the engagement gate between open and closed.
    pub fn toggle_engagement(&mut self) -> bool {
        let open = !self.gate.is_open();
        self.set_engagement(open)
    }

    /// Open or close joins. Setting the current value again is a no-op.
    ///
    /// Ignored while the wheel turns or a winner is shown.
    pub fn set_engagement(&mut self, open: bool) -> bool {
        if self.state.is_winner_displayed() {
            tracing::info!("Join toggle ignored (winner selected)");
            return false;
        }
        if self.state.spin.spinning {
            tracing::debug!("Join toggle ignored (wheel spinning)");
            return false;
        }

        self.gate
            .set_open(open, self.timer.as_mut(), self.settings.countdown_secs)
    }

    /// Start a spin with randomized velocity and friction.
    ///
    /// Needs at least two participants, a closed gate, and an idle wheel with no winner shown.
    pub fn spin_trigger(&mut self) -> bool {
        if self.state.is_winner_displayed() {
            tracing::debug!("Spin ignored (winner selected)");
            return false;
        }
        if self.state.spin.spinning || self.gate.is_open() {
            return false;
        }

        let count = self.registry.len();
        if count < MIN_PARTICIPANTS_TO_SPIN {
            tracing::debug!("Spin ignored ({} participant(s))", count);
            return false;
        }

        let draw = SpinDraw::random(&mut self.rng);
        self.state.clear_winner();
        self.state.spin.launch(draw);
        tracing::info!(
            "Spin started (velocity {:.2} rad/s, friction {:.2} rad/s²)",
            draw.angular_velocity,
            draw.friction
        );

        true
    }

    /// Begin the reset gesture while a winner is shown.
    pub fn hold_start(&mut self, source: HoldSource) -> bool {
        if source == HoldSource::None
            || !self.state.is_winner_displayed()
            || self.state.reset_hold.active
        {
            return false;
        }

        self.state.reset_hold.begin(source);
        true
    }

    /// End the reset gesture early. Only the source that started the hold can release it.
    pub fn hold_release(&mut self, source: HoldSource) -> bool {
        let hold = &mut self.state.reset_hold;
        if !hold.active || hold.source != source {
            return false;
        }

        hold.cancel();
        true
    }

    /// Advance the round by `dt` seconds. Negative or non-finite `dt` is treated as zero.
    pub fn tick(&mut self, dt: f32) {
        let dt = sanitize_dt(dt);

        if self.state.advance_reset_hold(dt) {
            self.reset_for_next_round();
        }

        if self.state.spin.spinning {
            let participants = self.registry.snapshot();
            if let SpinStep::Stopped { winner } = self.state.spin.advance(dt, participants.len())
            {
                let winner = winner.and_then(|index| participants.get(index).map(|p| (index, p)));
                self.announce_winner(winner);
            }
        }

        self.state.flash.advance(dt);
        if let Some(celebration) = self.state.celebration.as_mut() {
            celebration.elapsed += dt;
        }
    }

    /// Read-only copy of the round for presentation.
    pub fn snapshot(&self) -> RoundSnapshot {
        let participants = self.registry.snapshot();
        let engagement_open = self.gate.is_open();

        RoundSnapshot {
            phase: self.state.phase(engagement_open),
            highlighted_index: self.state.spin.highlighted_index(participants.len()),
            participants,
            rotation_angle: self.state.spin.rotation_angle,
            angular_velocity: self.state.spin.angular_velocity,
            is_spinning: self.state.spin.spinning,
            winner_index: self.state.winner_index,
            celebration: self.state.celebration.clone(),
            engagement_open,
            flash_on: self.state.flash.is_on(),
            flash_remaining: self.state.flash.remaining,
            reset_hold: self.state.reset_hold,
            authorized: self.settings.authorized,
        }
    }

    fn announce_winner(&mut self, winner: Option<(usize, &Participant)>) {
        let Some((index, participant)) = winner else {
            tracing::info!("Wheel stopped without participants");
            return;
        };

        self.state.winner_index = Some(index);
        self.state.celebration = Some(Celebration::new(participant));
        self.state.flash.arm();
        tracing::info!("Winner: {}", participant.name());
    }

    fn reset_for_next_round(&mut self) {
        self.state.clear_winner();
        self.state.spin.halt();
        self.registry.clear();
        self.gate
            .set_open(false, self.timer.as_mut(), self.settings.countdown_secs);
        tracing::info!("Reset for next round");

        self.seed_host();
    }
}
