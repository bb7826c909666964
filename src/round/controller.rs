//! Round controller
//!
//! Owns the deck, counters, timer and both gesture channels for one round.
//! Every handler re-checks `mode` itself, so a stale listener firing after
//! the round ended is harmless.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::deck::{Card, Deck};
use super::state::{Action, Counters, EndReason, Mode, RoundEvent, RoundResults, RoundState};
use super::timer::{RoundTimer, TimerTick};
use crate::consts::FEEDBACK_DELAY_MS;
use crate::error::GameError;
use crate::input::{SwipeClassifier, TiltCalibration, TiltRecognizer, TiltStatus};
use crate::platform::{MotionPermission, PermissionOutcome};
use crate::settings::Settings;

#[derive(Debug, Clone)]
pub struct RoundController {
    settings: Settings,
    /// Source list the working deck is rebuilt from on every start
    source: Vec<Card>,
    deck: Deck,
    state: RoundState,
    results: Option<RoundResults>,
    rng: Pcg32,
    timer: RoundTimer,
    swipe: SwipeClassifier,
    tilt: TiltRecognizer,
    status: TiltStatus,
    awaiting_permission: bool,
    /// When the next card may be shown after an accepted action
    reveal_at_ms: Option<f64>,
    events: Vec<RoundEvent>,
}

impl RoundController {
    pub fn new(settings: Settings, seed: u64) -> Self {
        Self {
            settings: settings.sanitized(),
            source: Vec::new(),
            deck: Deck::default(),
            state: RoundState::default(),
            results: None,
            rng: Pcg32::seed_from_u64(seed),
            timer: RoundTimer::new(),
            swipe: SwipeClassifier::new(),
            tilt: TiltRecognizer::new(),
            status: TiltStatus::Off,
            awaiting_permission: false,
            reveal_at_ms: None,
            events: Vec::new(),
        }
    }

    // === Accessors ===

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn counters(&self) -> Counters {
        self.state.counters
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Card at the current position (only while running)
    pub fn current_card(&self) -> Option<&Card> {
        if self.state.mode != Mode::Running {
            return None;
        }
        self.deck.get(self.state.index)
    }

    pub fn results(&self) -> Option<&RoundResults> {
        self.results.as_ref()
    }

    pub fn status(&self) -> TiltStatus {
        self.status
    }

    pub fn tilt_calibration(&self) -> &TiltCalibration {
        self.tilt.calibration()
    }

    pub fn tilt_attached(&self) -> bool {
        self.tilt.is_attached()
    }

    pub fn awaiting_permission(&self) -> bool {
        self.awaiting_permission
    }

    /// Take all queued presentation events
    pub fn drain_events(&mut self) -> Vec<RoundEvent> {
        std::mem::take(&mut self.events)
    }

    /// Replace settings. Refused while a round is running.
    pub fn set_settings(&mut self, settings: Settings) -> bool {
        if self.state.mode == Mode::Running {
            log::warn!("settings change ignored while a round is running");
            return false;
        }
        self.settings = settings.sanitized();
        if !self.settings.tilt_enabled {
            self.set_status(TiltStatus::Off);
        }
        true
    }

    // === Transitions ===

    /// Start a round from `source`. Fails without any state change if the
    /// source is empty.
    pub fn start_round(
        &mut self,
        source: &[Card],
        permission: &dyn MotionPermission,
        now_ms: f64,
    ) -> Result<(), GameError> {
        if source.is_empty() {
            log::warn!("refusing to start a round with an empty deck");
            return Err(GameError::EmptyDeck);
        }
        self.source = source.to_vec();
        let shuffle = self.settings.shuffle;
        self.begin(shuffle, permission, now_ms);
        Ok(())
    }

    /// Replay the last source list from `Finished`, always shuffled. The
    /// forced shuffle is not written back to settings.
    pub fn play_again(
        &mut self,
        permission: &dyn MotionPermission,
        now_ms: f64,
    ) -> Result<(), GameError> {
        if self.state.mode != Mode::Finished {
            return Ok(());
        }
        if self.source.is_empty() {
            return Err(GameError::EmptyDeck);
        }
        self.begin(true, permission, now_ms);
        Ok(())
    }

    /// Back to `Setup` from `Finished`
    pub fn reset(&mut self) {
        if self.state.mode != Mode::Finished {
            return;
        }
        self.state = RoundState::default();
        self.results = None;
        self.deck = Deck::default();
    }

    fn begin(&mut self, shuffle: bool, permission: &dyn MotionPermission, now_ms: f64) {
        // Re-entry retires the previous round's channels first
        self.retire_channels();
        if self.state.mode == Mode::Finished {
            self.reset();
        }
        self.state.mode = Mode::Setup;

        self.deck = Deck::build(&self.source, shuffle, &mut self.rng);
        self.results = None;
        let secs = self.settings.round_seconds;
        self.state = RoundState {
            mode: Mode::Running,
            index: 0,
            counters: Counters::default(),
            time_left_secs: secs,
        };
        self.tilt.reset();
        self.timer.start(secs, now_ms);

        log::info!(
            "Round started: {} cards, {}s, shuffle={}, loop={}",
            self.deck.len(),
            secs,
            shuffle,
            self.settings.loop_deck
        );
        self.events.push(RoundEvent::SaveSettings(self.settings.clone()));
        self.events.push(RoundEvent::Started {
            deck_size: self.deck.len(),
            time_left_secs: secs,
        });
        self.connect_tilt(permission);
    }

    /// End the running round. No-op in any other mode.
    pub fn end_round(&mut self, reason: EndReason) {
        if self.state.mode != Mode::Running {
            return;
        }
        self.retire_channels();
        self.state.mode = Mode::Finished;
        let c = self.state.counters;
        let results = RoundResults {
            shown: c.shown,
            got: c.got,
            pass: c.pass,
            deck_size: self.deck.len(),
            reason,
        };
        log::info!(
            "Round finished ({}): shown={}, got={}, pass={}",
            reason,
            c.shown,
            c.got,
            c.pass
        );
        self.results = Some(results);
        self.events.push(RoundEvent::Finished(results));
    }

    /// Manual "end" affordance
    pub fn end_now(&mut self) {
        self.end_round(EndReason::Manual);
    }

    fn retire_channels(&mut self) {
        self.timer.stop();
        if self.tilt.is_attached() {
            self.events.push(RoundEvent::TiltDetached);
        }
        self.tilt.detach();
        self.swipe.cancel();
        self.reveal_at_ms = None;
        self.awaiting_permission = false;
    }

    // === Tilt channel lifecycle ===

    fn connect_tilt(&mut self, permission: &dyn MotionPermission) {
        if !self.settings.tilt_enabled {
            self.set_status(TiltStatus::Off);
            return;
        }
        if permission.gate_required() && !permission.granted() {
            log::info!("Tilt waiting for motion permission");
            self.awaiting_permission = true;
            self.set_status(TiltStatus::NeedsPermission);
            return;
        }
        self.attach_tilt();
    }

    fn attach_tilt(&mut self) {
        self.tilt.attach();
        self.events.push(RoundEvent::TiltAttached);
        self.set_status(TiltStatus::Ready);
    }

    /// Feed back the result of a motion permission request
    pub fn resolve_permission(&mut self, outcome: PermissionOutcome) {
        self.awaiting_permission = false;
        match outcome {
            Ok(()) => {
                log::info!("Motion permission granted");
                if self.state.mode == Mode::Running
                    && self.settings.tilt_enabled
                    && !self.tilt.is_attached()
                {
                    self.attach_tilt();
                }
            }
            Err(e) => {
                log::warn!("Tilt disabled: {}", e);
                self.settings.tilt_enabled = false;
                if self.tilt.is_attached() {
                    self.tilt.detach();
                    self.events.push(RoundEvent::TiltDetached);
                }
                self.set_status(TiltStatus::Off);
            }
        }
    }

    fn set_status(&mut self, status: TiltStatus) {
        if self.status != status {
            self.status = status;
            self.events.push(RoundEvent::Status(status));
        }
    }

    // === Input ===

    pub fn pointer_down(&mut self, x: f32, y: f32, now_ms: f64) {
        if self.state.mode != Mode::Running || !self.settings.swipe_enabled {
            return;
        }
        self.swipe.begin(x, y, now_ms);
    }

    pub fn pointer_up(&mut self, x: f32, y: f32, now_ms: f64) {
        if self.state.mode != Mode::Running {
            self.swipe.cancel();
            return;
        }
        if let Some(action) = self.swipe.finish(x, y, now_ms) {
            self.advance(action, now_ms);
        }
    }

    /// One device orientation sample; `None` when the event carried no angle
    pub fn orientation_sample(&mut self, beta: Option<f64>, now_ms: f64) {
        if self.state.mode != Mode::Running {
            return;
        }
        let Some(beta) = beta else {
            log::trace!("orientation sample without beta dropped");
            return;
        };
        let Some(reading) = self.tilt.sample(beta, now_ms) else {
            return;
        };
        self.set_status(reading.status);
        if let Some(action) = reading.action {
            self.advance(action, now_ms);
        }
    }

    /// Button taps map straight to actions
    pub fn tap(&mut self, action: Action, now_ms: f64) {
        self.advance(action, now_ms);
    }

    /// Apply one action to the running round
    pub fn advance(&mut self, action: Action, now_ms: f64) {
        if self.state.mode != Mode::Running {
            return;
        }
        let len = self.deck.len();

        if self.state.index >= len {
            if self.settings.loop_deck && len > 0 {
                self.state.index = 0;
            } else {
                self.end_round(EndReason::DeckExhausted);
                return;
            }
        }

        self.state.counters.apply(action);
        self.state.index += 1;

        let exhausted = self.state.index >= len;
        if exhausted && self.settings.loop_deck {
            log::debug!("deck exhausted, looping");
            self.state.index = 0;
        }

        self.events.push(RoundEvent::ActionApplied {
            action,
            index: self.state.index,
            counters: self.state.counters,
        });

        if exhausted && !self.settings.loop_deck {
            self.end_round(EndReason::DeckExhausted);
            return;
        }
        self.reveal_at_ms = Some(now_ms + FEEDBACK_DELAY_MS);
    }

    /// Host poll: refresh the countdown and release a pending card reveal
    pub fn tick(&mut self, now_ms: f64) {
        if self.state.mode != Mode::Running {
            return;
        }
        match self.timer.poll(now_ms) {
            TimerTick::Running { time_left_secs } => {
                if time_left_secs != self.state.time_left_secs {
                    self.state.time_left_secs = time_left_secs;
                    self.events.push(RoundEvent::TimeLeft(time_left_secs));
                }
            }
            TimerTick::Expired => {
                self.state.time_left_secs = 0;
                self.events.push(RoundEvent::TimeLeft(0));
                self.end_round(EndReason::TimeUp);
                return;
            }
            TimerTick::Idle => {}
        }

        if let Some(at) = self.reveal_at_ms {
            if now_ms >= at {
                self.reveal_at_ms = None;
                self.events.push(RoundEvent::CardRevealed {
                    index: self.state.index,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{NoPermissionGate, StaticPermission};
    use proptest::prelude::*;

    fn cards(n: usize) -> Vec<Card> {
        (0..n)
            .map(|i| Card::new(format!("phrase {i}"), format!("hint {i}")))
            .collect()
    }

    fn settings(loop_deck: bool, tilt_enabled: bool) -> Settings {
        Settings {
            shuffle: false,
            loop_deck,
            tilt_enabled,
            ..Default::default()
        }
    }

    fn running(n: usize, loop_deck: bool) -> RoundController {
        let mut rc = RoundController::new(settings(loop_deck, false), 1);
        rc.start_round(&cards(n), &NoPermissionGate, 0.0).unwrap();
        rc.drain_events();
        rc
    }

    #[test]
    fn test_empty_deck_rejected() {
        let mut rc = RoundController::new(Settings::default(), 1);
        assert_eq!(
            rc.start_round(&[], &NoPermissionGate, 0.0),
            Err(GameError::EmptyDeck)
        );
        assert_eq!(rc.mode(), Mode::Setup);
        assert!(rc.drain_events().is_empty());
    }

    #[test]
    fn test_start_emits_save_and_started() {
        let mut rc = RoundController::new(settings(false, false), 1);
        rc.start_round(&cards(3), &NoPermissionGate, 0.0).unwrap();
        let events = rc.drain_events();
        assert!(matches!(events[0], RoundEvent::SaveSettings(_)));
        assert_eq!(
            events[1],
            RoundEvent::Started {
                deck_size: 3,
                time_left_secs: 60
            }
        );
        assert_eq!(rc.mode(), Mode::Running);
        assert_eq!(rc.current_card().unwrap().phrase, "phrase 0");
    }

    #[test]
    fn test_deck_exhaustion_without_loop() {
        let mut rc = running(3, false);
        rc.advance(Action::Got, 100.0);
        assert_eq!(rc.state().index, 1);
        rc.advance(Action::Got, 200.0);
        assert_eq!(rc.state().index, 2);
        rc.advance(Action::Got, 300.0);
        assert_eq!(rc.state().index, 3);
        assert_eq!(rc.mode(), Mode::Finished);

        let results = rc.results().unwrap();
        assert_eq!(results.reason, EndReason::DeckExhausted);
        assert_eq!(results.reason.as_str(), "reached end of list");
        assert_eq!(results.shown, 3);
        assert_eq!(results.got, 3);
        assert_eq!(results.deck_size, 3);

        // Final card's action is reported before the round finishes
        let events = rc.drain_events();
        let n = events.len();
        assert!(matches!(
            events[n - 2],
            RoundEvent::ActionApplied { index: 3, .. }
        ));
        assert!(matches!(events[n - 1], RoundEvent::Finished(_)));
    }

    #[test]
    fn test_deck_loops_when_enabled() {
        let mut rc = running(3, true);
        for i in 0..3 {
            rc.advance(Action::Pass, i as f64 * 100.0);
        }
        // Wrap happens eagerly on the action that used the last card
        assert_eq!(rc.state().index, 0);
        assert_eq!(rc.mode(), Mode::Running);

        rc.advance(Action::Got, 400.0);
        assert_eq!(rc.state().index, 1);
        assert_eq!(rc.mode(), Mode::Running);
        assert_eq!(rc.counters().shown, 4);
        assert_eq!(rc.counters().got, 1);
        assert_eq!(rc.counters().pass, 3);
    }

    #[test]
    fn test_next_scores_nothing() {
        let mut rc = running(5, false);
        rc.advance(Action::Next, 0.0);
        rc.advance(Action::Got, 0.0);
        let c = rc.counters();
        assert_eq!(c.shown, 2);
        assert_eq!(c.got, 1);
        assert_eq!(c.pass, 0);
        assert_eq!(c.nexts(), 1);
        assert_eq!(rc.state().index, 2);
    }

    #[test]
    fn test_advance_ignored_outside_running() {
        let mut rc = RoundController::new(Settings::default(), 1);
        rc.advance(Action::Got, 0.0);
        assert_eq!(rc.counters(), Counters::default());

        let mut rc = running(3, false);
        rc.end_now();
        rc.advance(Action::Got, 0.0);
        assert_eq!(rc.counters().shown, 0);
    }

    #[test]
    fn test_end_round_idempotent() {
        let mut rc = running(3, false);
        rc.advance(Action::Got, 0.0);
        rc.end_now();
        let snapshot = *rc.results().unwrap();
        let state = *rc.state();
        rc.drain_events();

        rc.end_now();
        rc.end_round(EndReason::TimeUp);
        assert_eq!(rc.results(), Some(&snapshot));
        assert_eq!(rc.state(), &state);
        assert_eq!(snapshot.reason, EndReason::Manual);
        assert!(rc.drain_events().is_empty());
    }

    #[test]
    fn test_timer_expiry_ends_round() {
        let mut rc = running(3, false);
        rc.tick(1_000.0);
        assert_eq!(rc.state().time_left_secs, 59);
        assert_eq!(rc.drain_events(), vec![RoundEvent::TimeLeft(59)]);

        rc.tick(60_000.0);
        assert_eq!(rc.mode(), Mode::Finished);
        assert_eq!(rc.results().unwrap().reason, EndReason::TimeUp);
        assert_eq!(rc.state().time_left_secs, 0);
    }

    #[test]
    fn test_card_reveal_after_feedback_delay() {
        let mut rc = running(5, false);
        rc.advance(Action::Got, 1_000.0);
        rc.drain_events();

        rc.tick(1_200.0);
        assert_eq!(rc.drain_events(), vec![RoundEvent::TimeLeft(59)]);

        // A second action during the delay is still accepted
        rc.advance(Action::Pass, 1_300.0);
        assert_eq!(rc.state().index, 2);
        rc.drain_events();

        rc.tick(1_500.0);
        assert!(rc.drain_events().is_empty());
        rc.tick(1_720.0);
        assert_eq!(
            rc.drain_events(),
            vec![RoundEvent::CardRevealed { index: 2 }]
        );
    }

    #[test]
    fn test_swipe_drives_round() {
        let mut rc = running(5, false);
        rc.pointer_down(100.0, 100.0, 0.0);
        rc.pointer_up(160.0, 105.0, 200.0);
        rc.pointer_down(300.0, 100.0, 1_000.0);
        rc.pointer_up(200.0, 90.0, 1_300.0);
        let c = rc.counters();
        assert_eq!((c.got, c.pass), (1, 1));
    }

    #[test]
    fn test_swipe_disabled_in_settings() {
        let mut rc = RoundController::new(
            Settings {
                swipe_enabled: false,
                ..settings(false, false)
            },
            1,
        );
        rc.start_round(&cards(3), &NoPermissionGate, 0.0).unwrap();
        rc.pointer_down(0.0, 0.0, 0.0);
        rc.pointer_up(100.0, 0.0, 100.0);
        assert_eq!(rc.counters().shown, 0);
    }

    #[test]
    fn test_pointer_down_before_start_is_ignored() {
        let mut rc = RoundController::new(settings(false, false), 1);
        rc.pointer_down(0.0, 0.0, 0.0);
        rc.start_round(&cards(3), &NoPermissionGate, 10.0).unwrap();
        rc.pointer_up(100.0, 0.0, 100.0);
        assert_eq!(rc.counters().shown, 0);
    }

    #[test]
    fn test_tilt_drives_round() {
        let mut rc = RoundController::new(settings(false, true), 1);
        rc.start_round(&cards(5), &NoPermissionGate, 0.0).unwrap();
        assert!(rc.tilt_attached());
        assert_eq!(rc.status(), TiltStatus::Ready);

        rc.orientation_sample(Some(5.0), 100.0);
        assert_eq!(rc.status(), TiltStatus::Neutral);
        rc.orientation_sample(Some(30.0), 1_000.0);
        assert_eq!(rc.counters().got, 1);
        assert_eq!(rc.status(), TiltStatus::Forward);
        rc.orientation_sample(Some(5.0), 1_500.0);
        rc.orientation_sample(Some(-20.0), 2_000.0);
        assert_eq!(rc.counters().pass, 1);
    }

    #[test]
    fn test_missing_beta_dropped() {
        let mut rc = RoundController::new(settings(false, true), 1);
        rc.start_round(&cards(5), &NoPermissionGate, 0.0).unwrap();
        rc.orientation_sample(None, 100.0);
        assert!(!rc.tilt_calibration().has_baseline);
        assert_eq!(rc.mode(), Mode::Running);
    }

    #[test]
    fn test_tilt_off_when_disabled() {
        let mut rc = running(3, false);
        assert!(!rc.tilt_attached());
        assert_eq!(rc.status(), TiltStatus::Off);
        rc.orientation_sample(Some(0.0), 0.0);
        rc.orientation_sample(Some(40.0), 1_000.0);
        assert_eq!(rc.counters().shown, 0);
    }

    #[test]
    fn test_permission_gate_then_granted() {
        let mut rc = RoundController::new(settings(false, true), 1);
        let gate = StaticPermission {
            required: true,
            granted: false,
        };
        rc.start_round(&cards(3), &gate, 0.0).unwrap();
        assert!(!rc.tilt_attached());
        assert!(rc.awaiting_permission());
        assert_eq!(rc.status(), TiltStatus::NeedsPermission);

        // Samples before the grant go nowhere
        rc.orientation_sample(Some(0.0), 0.0);
        assert!(!rc.tilt_calibration().has_baseline);

        rc.drain_events();
        rc.resolve_permission(Ok(()));
        assert!(rc.tilt_attached());
        assert_eq!(
            rc.drain_events(),
            vec![
                RoundEvent::TiltAttached,
                RoundEvent::Status(TiltStatus::Ready)
            ]
        );
    }

    #[test]
    fn test_permission_denied_disables_tilt() {
        let mut rc = RoundController::new(settings(false, true), 1);
        let gate = StaticPermission {
            required: true,
            granted: false,
        };
        rc.start_round(&cards(3), &gate, 0.0).unwrap();
        rc.resolve_permission(Err(GameError::PermissionDenied));
        assert!(!rc.tilt_attached());
        assert!(!rc.settings().tilt_enabled);
        assert_eq!(rc.status(), TiltStatus::Off);
        assert_eq!(rc.mode(), Mode::Running);
    }

    #[test]
    fn test_end_detaches_tilt() {
        let mut rc = RoundController::new(settings(false, true), 1);
        rc.start_round(&cards(3), &NoPermissionGate, 0.0).unwrap();
        rc.drain_events();
        rc.end_now();
        assert!(!rc.tilt_attached());
        assert!(!rc.tilt_calibration().armed);
        let events = rc.drain_events();
        assert_eq!(events[0], RoundEvent::TiltDetached);
    }

    #[test]
    fn test_restart_resets_calibration_and_counters() {
        let mut rc = RoundController::new(settings(false, true), 1);
        let deck = cards(5);
        rc.start_round(&deck, &NoPermissionGate, 0.0).unwrap();
        rc.orientation_sample(Some(0.0), 100.0);
        rc.orientation_sample(Some(25.0), 1_000.0);
        assert!(rc.tilt_calibration().has_baseline);
        assert_eq!(rc.counters().got, 1);

        rc.end_now();
        rc.start_round(&deck, &NoPermissionGate, 5_000.0).unwrap();
        let cal = rc.tilt_calibration();
        assert!(!cal.has_baseline);
        assert!(cal.armed);
        assert_eq!(cal.debounce.last_fire_ms, None);
        assert_eq!(rc.counters(), Counters::default());
        assert_eq!(rc.state().index, 0);
        assert_eq!(rc.results(), None);
    }

    #[test]
    fn test_restart_while_running_retires_previous_round() {
        let mut rc = RoundController::new(settings(false, true), 1);
        rc.start_round(&cards(3), &NoPermissionGate, 0.0).unwrap();
        rc.advance(Action::Got, 100.0);
        rc.drain_events();

        rc.start_round(&cards(4), &NoPermissionGate, 10_000.0).unwrap();
        let events = rc.drain_events();
        assert_eq!(events[0], RoundEvent::TiltDetached);
        assert!(events.contains(&RoundEvent::TiltAttached));
        assert_eq!(rc.deck().len(), 4);
        assert_eq!(rc.counters().shown, 0);
        // Timer restarted from the new start time
        rc.tick(10_500.0);
        assert_eq!(rc.state().time_left_secs, 60);
    }

    #[test]
    fn test_play_again_forces_shuffle_without_persisting() {
        let mut rc = RoundController::new(settings(false, false), 3);
        let deck = cards(30);
        rc.start_round(&deck, &NoPermissionGate, 0.0).unwrap();
        rc.end_now();
        rc.play_again(&NoPermissionGate, 1_000.0).unwrap();
        assert_eq!(rc.mode(), Mode::Running);
        assert!(!rc.settings().shuffle);
        assert_ne!(rc.deck().cards(), &deck[..]);
        assert_eq!(rc.deck().len(), deck.len());
    }

    #[test]
    fn test_play_again_only_from_finished() {
        let mut rc = running(3, false);
        rc.advance(Action::Got, 0.0);
        rc.play_again(&NoPermissionGate, 100.0).unwrap();
        assert_eq!(rc.counters().shown, 1);
    }

    #[test]
    fn test_reset_returns_to_setup() {
        let mut rc = running(3, false);
        rc.reset();
        assert_eq!(rc.mode(), Mode::Running);
        rc.end_now();
        rc.reset();
        assert_eq!(rc.mode(), Mode::Setup);
        assert_eq!(rc.results(), None);
        assert!(rc.current_card().is_none());
    }

    #[test]
    fn test_settings_locked_while_running() {
        let mut rc = running(3, false);
        assert!(!rc.set_settings(settings(true, false)));
        assert!(!rc.settings().loop_deck);
        rc.end_now();
        assert!(rc.set_settings(settings(true, false)));
        assert!(rc.settings().loop_deck);
    }

    proptest! {
        #[test]
        fn prop_counters_and_index_stay_consistent(
            n in 1usize..8,
            loop_deck in any::<bool>(),
            actions in proptest::collection::vec(0u8..3, 0..40),
        ) {
            let mut rc = running(n, loop_deck);
            for (i, a) in actions.iter().enumerate() {
                let action = match a {
                    0 => Action::Got,
                    1 => Action::Pass,
                    _ => Action::Next,
                };
                rc.advance(action, i as f64 * 10.0);
                let c = rc.counters();
                prop_assert_eq!(c.shown, c.got + c.pass + c.nexts());
                prop_assert!(rc.state().index <= n);
                if loop_deck {
                    prop_assert_eq!(rc.mode(), Mode::Running);
                    prop_assert!(rc.state().index < n);
                } else {
                    prop_assert!(c.shown as usize <= n);
                }
            }
            let expected = if loop_deck { actions.len() } else { actions.len().min(n) };
            prop_assert_eq!(rc.counters().shown as usize, expected);
        }
    }
}
