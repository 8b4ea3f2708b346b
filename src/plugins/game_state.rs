// Game session: round state, score history, shot charge and the round clock.

use std::collections::VecDeque;
use std::time::Duration;

use bevy::prelude::*;

use crate::config::{GameConfig, ShotConfig};
use crate::plugins::game_clock::{ClockEvent, GameClock};
use crate::plugins::input::GameCommand;
use crate::plugins::sync::{despawn_pair, EntityPair, EntityRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundPhase {
    #[default]
    Inactive,
    Active,
}

#[derive(Debug, Clone, Default)]
pub struct RoundState {
    pub phase: RoundPhase,
    pub score: u32,
    pub remaining_seconds: i32,
    /// Balls waiting to be shot, oldest first.
    pub spawned_balls: VecDeque<Entity>,
    /// Balls already shot this round (still in the world until the round ends).
    pub shot_balls: Vec<Entity>,
}

impl RoundState {
    pub fn is_active(&self) -> bool { self.phase == RoundPhase::Active }

    pub fn owns_ball(&self, ball: Entity) -> bool {
        self.spawned_balls.contains(&ball) || self.shot_balls.contains(&ball)
    }
}

/// Final scores of past rounds, in play order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreHistory {
    scores: Vec<u32>,
}

impl ScoreHistory {
    pub fn push(&mut self, score: u32) { self.scores.push(score); }
    pub fn len(&self) -> usize { self.scores.len() }
    pub fn is_empty(&self) -> bool { self.scores.is_empty() }
    pub fn in_play_order(&self) -> &[u32] { &self.scores }
    pub fn best(&self) -> Option<u32> { self.scores.iter().copied().max() }

    pub fn sorted_desc(&self) -> Vec<u32> {
        let mut sorted = self.scores.clone();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        sorted
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShotMode {
    #[default]
    Idle,
    Charging,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ShotCharge {
    pub mode: ShotMode,
    pub started_ms: f64,
}

impl ShotCharge {
    pub fn is_charging(&self) -> bool { self.mode == ShotMode::Charging }

    /// Charge fraction in 0..=1 at `now_ms` (0 when idle).
    pub fn fraction(&self, now_ms: f64, max_charge_ms: f64) -> f32 {
        if !self.is_charging() || max_charge_ms <= 0.0 {
            return 0.0;
        }
        ((now_ms - self.started_ms).clamp(0.0, max_charge_ms) / max_charge_ms) as f32
    }
}

/// A ball leaving the rack with its clamped charge time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotRelease {
    pub ball: Entity,
    pub charge_ms: f64,
}

/// What a finished round leaves behind.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundOutcome {
    pub final_score: u32,
    /// Pairs already removed from the registry; both halves still need despawning.
    pub removed: Vec<EntityPair<Entity>>,
}

#[derive(Resource, Debug, Default)]
pub struct GameSession {
    pub round: RoundState,
    pub history: ScoreHistory,
    pub charge: ShotCharge,
    clock: GameClock,
    last_spawn_ms: Option<f64>,
}

impl GameSession {
    pub fn is_active(&self) -> bool { self.round.is_active() }

    pub fn clock(&self) -> &GameClock { &self.clock }

    /// Starts a round. Rejected (returns `false`, nothing changes) while one is active.
    pub fn start_round(&mut self, duration_seconds: i32) -> bool {
        if self.round.is_active() || !self.clock.start(duration_seconds) {
            return false;
        }
        self.round = RoundState {
            phase: RoundPhase::Active,
            score: 0,
            remaining_seconds: duration_seconds,
            ..default()
        };
        self.charge = ShotCharge::default();
        self.last_spawn_ms = None;
        true
    }

    /// Advances the round clock; on expiry the round is ended against `registry`.
    pub fn tick(&mut self, delta: Duration, registry: &mut EntityRegistry) -> Option<RoundOutcome> {
        match self.clock.advance(delta) {
            ClockEvent::Idle => None,
            ClockEvent::Ticked(_) => {
                self.round.remaining_seconds = self.clock.remaining_seconds();
                None
            }
            ClockEvent::Expired => Some(self.end_round(registry)),
        }
    }

    /// Records the final score, takes every ball of the round out of the session and
    /// the registry, and resets the round.
    pub fn end_round(&mut self, registry: &mut EntityRegistry) -> RoundOutcome {
        self.clock.stop();
        let final_score = self.round.score;
        self.history.push(final_score);

        let round = std::mem::take(&mut self.round);
        let removed = round
            .spawned_balls
            .into_iter()
            .chain(round.shot_balls)
            .filter_map(|ball| registry.remove_by_physics(ball))
            .collect();
        self.charge = ShotCharge::default();
        RoundOutcome { final_score, removed }
    }

    /// Debounce gate for spawning. On success the spawn time is recorded and the
    /// caller must follow with [`GameSession::add_ball`].
    pub fn try_begin_spawn(&mut self, now_ms: f64, debounce_ms: f64) -> bool {
        if !self.round.is_active() {
            return false;
        }
        if let Some(last) = self.last_spawn_ms {
            if now_ms - last < debounce_ms {
                return false;
            }
        }
        self.last_spawn_ms = Some(now_ms);
        true
    }

    pub fn add_ball(&mut self, ball: Entity) {
        self.round.spawned_balls.push_back(ball);
    }

    /// Begins charging if a ball is waiting and no charge is in progress.
    pub fn begin_charge(&mut self, now_ms: f64) -> bool {
        if self.round.spawned_balls.is_empty() || self.charge.is_charging() {
            return false;
        }
        self.charge = ShotCharge { mode: ShotMode::Charging, started_ms: now_ms };
        true
    }

    /// Ends a charge and hands out the oldest waiting ball. No-op without an active charge.
    pub fn release_charge(&mut self, now_ms: f64, max_charge_ms: f64) -> Option<ShotRelease> {
        if !self.charge.is_charging() {
            return None;
        }
        let charge_ms = (now_ms - self.charge.started_ms).clamp(0.0, max_charge_ms.max(0.0));
        self.charge = ShotCharge::default();
        let ball = self.round.spawned_balls.pop_front()?;
        self.round.shot_balls.push(ball);
        Some(ShotRelease { ball, charge_ms })
    }

    /// Scores a basket for `ball` if the round is active and the ball belongs to it.
    /// Returns the new score.
    pub fn record_basket(&mut self, ball: Entity) -> Option<u32> {
        if !self.round.is_active() || !self.round.owns_ball(ball) {
            return None;
        }
        self.round.score += 1;
        Some(self.round.score)
    }
}

/// Linear force between `min_force` and `max_force` by the clamped charge fraction.
pub fn shot_force(charge_ms: f64, cfg: &ShotConfig) -> f32 {
    let (lo, hi) = (cfg.min_force.min(cfg.max_force), cfg.min_force.max(cfg.max_force));
    if cfg.max_charge_ms <= 0.0 {
        return cfg.max_force.clamp(lo, hi);
    }
    let fraction = (charge_ms.max(0.0).min(cfg.max_charge_ms) / cfg.max_charge_ms) as f32;
    (cfg.min_force + fraction * (cfg.max_force - cfg.min_force)).clamp(lo, hi)
}

/// Unit launch direction: forward (-Z) tilted up by `angle_deg`.
pub fn launch_direction(angle_deg: f32) -> Vec3 {
    let angle = angle_deg.to_radians();
    Vec3::new(0.0, angle.sin(), -angle.cos())
}

#[derive(Event, Debug, Clone, Copy)]
pub struct RoundStartedEvent {
    pub duration_seconds: i32,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct RoundEndedEvent {
    pub final_score: u32,
}

/// Ordering of gameplay work inside `Update`. The clock runs before commands so
/// a round never loses the delta of the frame it was started in.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoundSet {
    /// Keyboard/buttons -> `GameCommand`.
    Input,
    /// Collision scoring.
    Score,
    /// Clock and round-end cleanup.
    Clock,
    /// Start, spawn, charge, release.
    Act,
}

pub struct GameStatePlugin;
impl Plugin for GameStatePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GameConfig>()
            .init_resource::<GameSession>()
            .init_resource::<EntityRegistry>()
            .add_event::<GameCommand>()
            .add_event::<RoundStartedEvent>()
            .add_event::<RoundEndedEvent>()
            .configure_sets(
                Update,
                (RoundSet::Input, RoundSet::Score, RoundSet::Clock, RoundSet::Act).chain(),
            )
            .add_systems(Update, handle_round_commands.in_set(RoundSet::Act))
            .add_systems(Update, tick_round_clock.in_set(RoundSet::Clock));
    }
}

fn handle_round_commands(
    mut ev_cmd: EventReader<GameCommand>,
    mut session: ResMut<GameSession>,
    cfg: Res<GameConfig>,
    mut ev_started: EventWriter<RoundStartedEvent>,
) {
    for cmd in ev_cmd.read() {
        if *cmd != GameCommand::StartRound {
            continue;
        }
        let duration = cfg.round.duration_seconds;
        if session.start_round(duration) {
            info!("ROUND start duration={duration}");
            ev_started.send(RoundStartedEvent { duration_seconds: duration });
        } else {
            debug!("ROUND start ignored: round already active");
        }
    }
}

fn tick_round_clock(
    time: Res<Time>,
    mut commands: Commands,
    mut session: ResMut<GameSession>,
    mut registry: ResMut<EntityRegistry>,
    mut ev_ended: EventWriter<RoundEndedEvent>,
) {
    let Some(outcome) = session.tick(time.delta(), &mut registry) else { return; };
    for pair in &outcome.removed {
        despawn_pair(&mut commands, *pair);
    }
    info!(
        "ROUND end score={} cleared_balls={} history={:?}",
        outcome.final_score,
        outcome.removed.len(),
        session.history.sorted_desc()
    );
    ev_ended.send(RoundEndedEvent { final_score: outcome.final_score });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ball(n: u32) -> Entity { Entity::from_raw(n) }

    fn registry_with(balls: &[Entity]) -> EntityRegistry {
        let mut registry = EntityRegistry::default();
        registry.push(EntityPair { visual: Entity::from_raw(900), physics: Entity::from_raw(901) });
        for &b in balls {
            registry.push(EntityPair { visual: Entity::from_raw(b.index() + 1000), physics: b });
        }
        registry
    }

    #[test]
    fn second_start_is_rejected() {
        let mut s = GameSession::default();
        assert!(s.start_round(60));
        s.add_ball(ball(1));
        assert_eq!(s.record_basket(ball(1)), Some(1));
        s.tick(Duration::from_secs(3), &mut EntityRegistry::default());
        assert!(!s.start_round(60));
        assert_eq!(s.round.score, 1);
        assert_eq!(s.round.remaining_seconds, 57);
    }

    #[test]
    fn round_end_clears_balls_from_session_and_registry() {
        let balls = [ball(1), ball(2), ball(3)];
        let mut registry = registry_with(&balls);
        let mut s = GameSession::default();
        s.start_round(1);
        for (i, b) in balls.iter().enumerate() {
            assert!(s.try_begin_spawn(i as f64 * 1000.0, 300.0));
            s.add_ball(*b);
        }
        assert!(s.begin_charge(5000.0));
        assert!(s.release_charge(5200.0, 1000.0).is_some());

        assert!(s.tick(Duration::from_secs(1), &mut registry).is_none());
        let outcome = s.tick(Duration::from_secs(1), &mut registry).expect("round should end");
        assert_eq!(outcome.removed.len(), 3);
        assert!(s.round.spawned_balls.is_empty());
        assert!(s.round.shot_balls.is_empty());
        for b in balls {
            assert!(!registry.contains_physics(b));
        }
        assert_eq!(registry.len(), 1, "non-ball pairs stay registered");
        assert!(!s.is_active());
    }

    #[test]
    fn force_table() {
        let cfg = ShotConfig::default();
        assert_eq!(shot_force(0.0, &cfg), 200.0);
        assert_eq!(shot_force(500.0, &cfg), 350.0);
        assert_eq!(shot_force(1000.0, &cfg), 500.0);
        assert_eq!(shot_force(2000.0, &cfg), 500.0);
        assert_eq!(shot_force(-50.0, &cfg), 200.0);
    }

    #[test]
    fn inactive_collisions_do_not_score() {
        let mut s = GameSession::default();
        s.round.spawned_balls.push_back(ball(1));
        assert_eq!(s.record_basket(ball(1)), None);
        assert_eq!(s.round.score, 0);
    }

    #[test]
    fn unknown_ball_does_not_score() {
        let mut s = GameSession::default();
        s.start_round(60);
        s.add_ball(ball(1));
        assert_eq!(s.record_basket(ball(2)), None);
        assert_eq!(s.record_basket(ball(1)), Some(1));
    }

    #[test]
    fn shot_ball_still_scores() {
        let mut s = GameSession::default();
        s.start_round(60);
        s.add_ball(ball(4));
        s.begin_charge(0.0);
        let release = s.release_charge(300.0, 1000.0).unwrap();
        assert_eq!(release.ball, ball(4));
        assert_eq!(s.record_basket(ball(4)), Some(1));
    }

    #[test]
    fn history_sorted_descending() {
        let mut registry = EntityRegistry::default();
        let mut s = GameSession::default();
        for score in [3, 7, 1] {
            s.start_round(30);
            s.round.score = score;
            s.end_round(&mut registry);
        }
        assert_eq!(s.history.sorted_desc(), vec![7, 3, 1]);
        assert_eq!(s.history.in_play_order(), &[3, 7, 1]);
        assert_eq!(s.history.best(), Some(7));
    }

    #[test]
    fn spawn_debounce() {
        let mut s = GameSession::default();
        s.start_round(60);
        assert!(s.try_begin_spawn(1000.0, 300.0));
        assert!(!s.try_begin_spawn(1100.0, 300.0));

        let mut s = GameSession::default();
        s.start_round(60);
        assert!(s.try_begin_spawn(1000.0, 300.0));
        assert!(s.try_begin_spawn(1350.0, 300.0));
    }

    #[test]
    fn spawn_requires_active_round() {
        let mut s = GameSession::default();
        assert!(!s.try_begin_spawn(0.0, 300.0));
    }

    #[test]
    fn shoot_with_no_balls_is_noop() {
        let mut s = GameSession::default();
        s.start_round(60);
        assert!(!s.begin_charge(0.0));
        assert_eq!(s.release_charge(500.0, 1000.0), None);
        assert!(s.round.spawned_balls.is_empty());
        assert!(s.round.shot_balls.is_empty());
    }

    #[test]
    fn release_without_charge_keeps_ball() {
        let mut s = GameSession::default();
        s.start_round(60);
        s.add_ball(ball(1));
        assert_eq!(s.release_charge(500.0, 1000.0), None);
        assert_eq!(s.round.spawned_balls.len(), 1);
    }

    #[test]
    fn release_is_fifo_and_clamped() {
        let mut s = GameSession::default();
        s.start_round(60);
        s.add_ball(ball(1));
        s.add_ball(ball(2));
        assert!(s.begin_charge(100.0));
        assert!(!s.begin_charge(200.0), "already charging");
        let r = s.release_charge(5000.0, 1000.0).unwrap();
        assert_eq!(r, ShotRelease { ball: ball(1), charge_ms: 1000.0 });
        assert_eq!(s.round.spawned_balls.front(), Some(&ball(2)));
        assert!(!s.charge.is_charging());
    }

    #[test]
    fn charge_fraction() {
        let charge = ShotCharge { mode: ShotMode::Charging, started_ms: 1000.0 };
        assert_eq!(charge.fraction(1500.0, 1000.0), 0.5);
        assert_eq!(charge.fraction(4000.0, 1000.0), 1.0);
        assert_eq!(ShotCharge::default().fraction(4000.0, 1000.0), 0.0);
    }

    #[test]
    fn launch_direction_is_forward_and_up() {
        let d = launch_direction(45.0);
        assert!((d.length() - 1.0).abs() < 1e-6);
        assert!(d.y > 0.0 && d.z < 0.0);
        assert!((d.y + d.z).abs() < 1e-6);
    }
}
