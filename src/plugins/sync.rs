// Entity pairs (visual + physics) and the per-frame physics -> visual pose copy.
use bevy::prelude::*;
use bevy::transform::TransformSystem;
use bevy_rapier3d::prelude::PhysicsSet;

/// Position + orientation of one handle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl From<&Transform> for Pose {
    fn from(t: &Transform) -> Self {
        Self { position: t.translation, orientation: t.rotation }
    }
}

/// Anything that can read and write poses by handle. The game implements it over
/// a `Transform` query; tests implement it over a map.
pub trait PoseStore<H> {
    fn pose(&self, handle: H) -> Option<Pose>;
    fn set_pose(&mut self, handle: H, pose: Pose);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityPair<H> {
    pub visual: H,
    pub physics: H,
}

/// Ordered pairs tracked for synchronisation.
#[derive(Resource, Debug, Clone)]
pub struct EntityRegistry<H = Entity> {
    pairs: Vec<EntityPair<H>>,
}

impl<H> Default for EntityRegistry<H> {
    fn default() -> Self {
        Self { pairs: Vec::new() }
    }
}

impl<H: Copy + PartialEq> EntityRegistry<H> {
    pub fn push(&mut self, pair: EntityPair<H>) {
        self.pairs.push(pair);
    }

    pub fn pairs(&self) -> &[EntityPair<H>] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn find_by_physics(&self, physics: H) -> Option<EntityPair<H>> {
        self.pairs.iter().copied().find(|p| p.physics == physics)
    }

    pub fn contains_physics(&self, physics: H) -> bool {
        self.find_by_physics(physics).is_some()
    }

    /// Removes the pair owning `physics`, preserving the order of the rest.
    pub fn remove_by_physics(&mut self, physics: H) -> Option<EntityPair<H>> {
        let idx = self.pairs.iter().position(|p| p.physics == physics)?;
        Some(self.pairs.remove(idx))
    }
}

/// Copies each pair's physics pose onto its visual handle. Pairs whose physics
/// handle has no pose are skipped. Returns the number of visuals written.
pub fn sync_visuals<H: Copy + PartialEq, S: PoseStore<H>>(registry: &EntityRegistry<H>, store: &mut S) -> usize {
    let mut written = 0;
    for pair in registry.pairs() {
        let Some(pose) = store.pose(pair.physics) else { continue; };
        store.set_pose(pair.visual, pose);
        written += 1;
    }
    written
}

/// Marker for the physics half of a pair (rigid body + collider, no mesh).
#[derive(Component)]
pub struct PhysicsProxy;

/// Marker for the visual half of a pair (mesh only, pose driven by sync).
#[derive(Component)]
pub struct VisualProxy;

type ProxyTransforms<'w, 's> =
    Query<'w, 's, &'static mut Transform, Or<(With<PhysicsProxy>, With<VisualProxy>)>>;

struct TransformStore<'q, 'w, 's> {
    q: &'q mut ProxyTransforms<'w, 's>,
}

impl PoseStore<Entity> for TransformStore<'_, '_, '_> {
    fn pose(&self, handle: Entity) -> Option<Pose> {
        self.q.get(handle).ok().map(Pose::from)
    }

    fn set_pose(&mut self, handle: Entity, pose: Pose) {
        if let Ok(mut t) = self.q.get_mut(handle) {
            t.translation = pose.position;
            t.rotation = pose.orientation;
        }
    }
}

/// Runs between the physics writeback and transform propagation so that the
/// frame renders visuals at the pose of the step that just ran.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct VisualSyncSet;

pub struct SyncPlugin;
impl Plugin for SyncPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EntityRegistry>()
            .configure_sets(
                PostUpdate,
                VisualSyncSet
                    .after(PhysicsSet::Writeback)
                    .before(TransformSystem::TransformPropagate),
            )
            .add_systems(PostUpdate, sync_entity_pairs.in_set(VisualSyncSet));
    }
}

fn sync_entity_pairs(registry: Res<EntityRegistry>, mut q: ProxyTransforms) {
    let mut store = TransformStore { q: &mut q };
    sync_visuals(&registry, &mut store);
}

/// Spawns a physics/visual pair and registers it. Both halves start at `transform`.
pub fn spawn_pair(
    commands: &mut Commands,
    registry: &mut EntityRegistry,
    transform: Transform,
    physics: impl Bundle,
    visual: impl Bundle,
) -> EntityPair<Entity> {
    let physics = commands
        .spawn((TransformBundle::from_transform(transform), PhysicsProxy, physics))
        .id();
    let visual = commands.spawn((visual, VisualProxy)).id();
    commands.entity(visual).insert(transform);
    let pair = EntityPair { visual, physics };
    registry.push(pair);
    pair
}

/// Removes both halves of a pair from the world.
pub fn despawn_pair(commands: &mut Commands, pair: EntityPair<Entity>) {
    for e in [pair.physics, pair.visual] {
        if let Some(cmd) = commands.get_entity(e) {
            cmd.despawn_recursive();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MockStore {
        poses: HashMap<u32, Pose>,
    }

    impl PoseStore<u32> for MockStore {
        fn pose(&self, handle: u32) -> Option<Pose> {
            self.poses.get(&handle).copied()
        }
        fn set_pose(&mut self, handle: u32, pose: Pose) {
            self.poses.insert(handle, pose);
        }
    }

    fn pose(x: f32, angle: f32) -> Pose {
        Pose { position: Vec3::new(x, 1.0, 2.0), orientation: Quat::from_rotation_y(angle) }
    }

    #[test]
    fn visuals_take_physics_pose() {
        let mut registry = EntityRegistry::<u32>::default();
        registry.push(EntityPair { visual: 1, physics: 2 });
        registry.push(EntityPair { visual: 3, physics: 4 });
        let mut store = MockStore::default();
        store.poses.insert(1, pose(0.0, 0.0));
        store.poses.insert(2, pose(5.0, 0.5));
        store.poses.insert(3, pose(0.0, 0.0));
        store.poses.insert(4, pose(-3.0, 1.2));

        assert_eq!(sync_visuals(&registry, &mut store), 2);
        assert_eq!(store.poses[&1], store.poses[&2]);
        assert_eq!(store.poses[&3], store.poses[&4]);
    }

    #[test]
    fn physics_pose_is_never_written() {
        let mut registry = EntityRegistry::<u32>::default();
        registry.push(EntityPair { visual: 1, physics: 2 });
        let mut store = MockStore::default();
        store.poses.insert(1, pose(9.0, 0.3));
        store.poses.insert(2, pose(1.0, 0.0));
        sync_visuals(&registry, &mut store);
        assert_eq!(store.poses[&2], pose(1.0, 0.0));
    }

    #[test]
    fn missing_physics_handle_is_skipped() {
        let mut registry = EntityRegistry::<u32>::default();
        registry.push(EntityPair { visual: 1, physics: 2 });
        let mut store = MockStore::default();
        store.poses.insert(1, pose(9.0, 0.3));
        assert_eq!(sync_visuals(&registry, &mut store), 0);
        assert_eq!(store.poses[&1], pose(9.0, 0.3));
    }

    #[test]
    fn remove_keeps_order() {
        let mut registry = EntityRegistry::<u32>::default();
        for i in 0..4 {
            registry.push(EntityPair { visual: i * 10, physics: i });
        }
        let removed = registry.remove_by_physics(1);
        assert_eq!(removed, Some(EntityPair { visual: 10, physics: 1 }));
        let order: Vec<u32> = registry.pairs().iter().map(|p| p.physics).collect();
        assert_eq!(order, vec![0, 2, 3]);
        assert!(registry.remove_by_physics(1).is_none());
    }
}
