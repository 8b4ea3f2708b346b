// Basket detection: sensor collisions are checked against the current round at the
// moment they arrive, so stale events for cleared balls are dropped.
use bevy::prelude::*;
use bevy_rapier3d::prelude::CollisionEvent;

use crate::plugins::game_state::{GameSession, RoundSet};

/// Trigger volume just below the rim.
#[derive(Component)]
pub struct ScoreSensor;

#[derive(Event, Debug, Clone, Copy)]
pub struct BasketScoredEvent {
    pub ball: Entity,
    pub pos: Vec3,
    pub score: u32,
}

pub struct ScoringPlugin;
impl Plugin for ScoringPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<BasketScoredEvent>()
            .add_systems(Update, detect_baskets.in_set(RoundSet::Score));
    }
}

/// Returns `(sensor, other)` when one side of a contact is a sensor.
fn split_sensor_contact(a: Entity, b: Entity, is_sensor: impl Fn(Entity) -> bool) -> Option<(Entity, Entity)> {
    if is_sensor(a) {
        Some((a, b))
    } else if is_sensor(b) {
        Some((b, a))
    } else {
        None
    }
}

fn detect_baskets(
    mut collisions: EventReader<CollisionEvent>,
    mut session: ResMut<GameSession>,
    q_sensor: Query<&Transform, With<ScoreSensor>>,
    mut ev_scored: EventWriter<BasketScoredEvent>,
) {
    for event in collisions.read() {
        let CollisionEvent::Started(a, b, _) = event else { continue; };
        let Some((sensor, ball)) = split_sensor_contact(*a, *b, |e| q_sensor.contains(e)) else { continue; };
        let Some(score) = session.record_basket(ball) else {
            debug!("SCORE ignored entity={ball:?} active={}", session.is_active());
            continue;
        };
        let pos = q_sensor.get(sensor).map(|t| t.translation).unwrap_or_default();
        info!("SCORE basket entity={ball:?} score={score}");
        ev_scored.send(BasketScoredEvent { ball, pos, score });
    }
}
