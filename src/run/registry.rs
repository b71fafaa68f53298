// Distributed under the OSI-approved BSD 2-Clause License.
// See accompanying LICENSE file for details.

use std::collections::btree_map::BTreeMap;

use crate::run::{Shot, ShotId};

/// Shots created since the last tick started.
///
/// Spawns always land here; the queue is merged into the live set at the start of the next
/// tick, so nothing spawned while stepping is visited by the same traversal.
#[derive(Debug, Default)]
pub struct SpawnQueue {
    pending: Vec<Shot>,
    next_id: u64,
}

impl SpawnQueue {
    /// Issue the identifier for a shot about to be created.
    pub(crate) fn issue(&mut self) -> ShotId {
        self.next_id += 1;
        ShotId::from_raw(self.next_id)
    }

    pub(crate) fn push(&mut self, shot: Shot) -> ShotId {
        let id = shot.id;
        self.pending.push(shot);
        id
    }

    /// The number of queued shots.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Whether the scheduler keeps a shot after stepping it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Verdict {
    Keep,
    Retire,
}

/// The owner of every shot.
#[derive(Debug, Default)]
pub struct Registry {
    live: BTreeMap<ShotId, Shot>,
    queue: SpawnQueue,
    marked: Vec<ShotId>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn issue(&mut self) -> ShotId {
        self.queue.issue()
    }

    /// Add a shot; it is first stepped on the next tick.
    pub fn insert(&mut self, shot: Shot) -> ShotId {
        self.queue.push(shot)
    }

    /// Look up a shot, live or queued.
    pub fn get(&self, id: ShotId) -> Option<&Shot> {
        self.live
            .get(&id)
            .or_else(|| self.queue.pending.iter().find(|shot| shot.id == id))
    }

    /// Whether a shot exists, live or queued.
    pub fn contains(&self, id: ShotId) -> bool {
        self.get(id).is_some()
    }

    /// The number of shots, live or queued.
    pub fn len(&self) -> usize {
        self.live.len() + self.queue.len()
    }

    /// Whether there are no shots at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The number of shots which have been stepped at least once.
    pub fn live_len(&self) -> usize {
        self.live.len()
    }

    /// Visit every shot, live ones in identifier order and then queued ones.
    pub fn for_each<F>(&self, mut visitor: F)
    where
        F: FnMut(&Shot),
    {
        self.live.values().for_each(&mut visitor);
        self.queue.pending.iter().for_each(visitor);
    }

    /// Remove every shot matching a predicate, handing each to `release`.
    ///
    /// Returns the number of shots removed. Removed shots are never stepped again.
    pub fn remove_where<P, R>(&mut self, mut predicate: P, mut release: R) -> usize
    where
        P: FnMut(&Shot) -> bool,
        R: FnMut(&Shot),
    {
        let before = self.len();

        self.live.retain(|_, shot| {
            if predicate(shot) {
                release(shot);
                false
            } else {
                true
            }
        });
        self.queue.pending.retain(|shot| {
            if predicate(shot) {
                release(shot);
                false
            } else {
                true
            }
        });

        before - self.len()
    }

    /// Remove a single shot.
    pub fn remove(&mut self, id: ShotId) -> Option<Shot> {
        self.live.remove(&id).or_else(|| {
            self.queue
                .pending
                .iter()
                .position(|shot| shot.id == id)
                .map(|idx| self.queue.pending.remove(idx))
        })
    }

    /// Start a tick: age the live shots and merge the queue at frame `0`.
    pub(crate) fn advance(&mut self) -> usize {
        self.live
            .values_mut()
            .for_each(|shot| shot.frame += 1);

        let merged = self.queue.pending.len();
        for shot in self.queue.pending.drain(..) {
            self.live.insert(shot.id, shot);
        }

        merged
    }

    /// Run `f` over every live shot, marking the ones it retires.
    pub(crate) fn step_all<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut Shot, &mut SpawnQueue) -> Verdict,
    {
        self.marked.clear();

        for (id, shot) in self.live.iter_mut() {
            if f(shot, &mut self.queue) == Verdict::Retire {
                self.marked.push(*id);
            }
        }
    }

    /// Remove the shots marked by `step_all`.
    pub(crate) fn retire_marked<R>(&mut self, mut release: R) -> usize
    where
        R: FnMut(&Shot),
    {
        let mut retired = 0;

        for id in self.marked.drain(..) {
            if let Some(shot) = self.live.remove(&id) {
                release(&shot);
                retired += 1;
            }
        }

        retired
    }

    pub(crate) fn split_queue(&mut self) -> &mut SpawnQueue {
        &mut self.queue
    }
}

#[cfg(test)]
mod test {
    use glam::Vec2;

    use crate::run::registry::Verdict;
    use crate::run::{CollisionList, OwnerRef, Registry, Shot};

    fn add(registry: &mut Registry, list: CollisionList) -> crate::run::ShotId {
        let id = registry.issue();
        registry.insert(Shot {
            id,
            frame: 0,
            owner: OwnerRef::None,
            origin: Vec2::ZERO,
            step: None,
            list,
            body: None,
            damage: 1,
        })
    }

    #[test]
    fn test_ids_increase() {
        let mut registry = Registry::new();
        let a = add(&mut registry, CollisionList::EnemyShot);
        let b = add(&mut registry, CollisionList::EnemyShot);

        assert!(a < b);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.live_len(), 0);
    }

    #[test]
    fn test_advance_merges_at_frame_zero() {
        let mut registry = Registry::new();
        let a = add(&mut registry, CollisionList::EnemyShot);

        assert_eq!(registry.advance(), 1);
        assert_eq!(registry.get(a).unwrap().frame(), 0);

        let b = add(&mut registry, CollisionList::EnemyShot);
        registry.advance();
        assert_eq!(registry.get(a).unwrap().frame(), 1);
        assert_eq!(registry.get(b).unwrap().frame(), 0);
    }

    #[test]
    fn test_step_all_defers_spawns() {
        let mut registry = Registry::new();
        add(&mut registry, CollisionList::EnemyShot);
        registry.advance();

        let mut visited = 0;
        registry.step_all(|shot, queue| {
            visited += 1;
            let id = queue.issue();
            queue.push(Shot {
                id,
                ..shot.clone()
            });
            Verdict::Keep
        });

        assert_eq!(visited, 1);
        assert_eq!(registry.live_len(), 1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_retire_marked() {
        let mut registry = Registry::new();
        let a = add(&mut registry, CollisionList::EnemyShot);
        let b = add(&mut registry, CollisionList::EnemyShot);
        registry.advance();

        registry.step_all(|shot, _| {
            if shot.id() == a {
                Verdict::Retire
            } else {
                Verdict::Keep
            }
        });
        // Still present until the marks are applied.
        assert!(registry.contains(a));

        let mut released = Vec::new();
        assert_eq!(registry.retire_marked(|shot| released.push(shot.id())), 1);
        assert_eq!(released, [a]);
        assert!(!registry.contains(a));
        assert!(registry.contains(b));
    }

    #[test]
    fn test_remove_where_covers_queue() {
        let mut registry = Registry::new();
        let live = add(&mut registry, CollisionList::EnemyShot);
        let kept = add(&mut registry, CollisionList::PlayerShot);
        registry.advance();
        let queued = add(&mut registry, CollisionList::EnemyShot);

        let mut released = Vec::new();
        let removed = registry.remove_where(
            |shot| shot.collision_list() == CollisionList::EnemyShot,
            |shot| released.push(shot.id()),
        );

        assert_eq!(removed, 2);
        assert_eq!(released, [live, queued]);
        assert!(registry.contains(kept));

        // Idempotent.
        assert_eq!(
            registry.remove_where(
                |shot| shot.collision_list() == CollisionList::EnemyShot,
                |_| panic!("nothing left to release"),
            ),
            0,
        );
    }

    #[test]
    fn test_remove_single() {
        let mut registry = Registry::new();
        let a = add(&mut registry, CollisionList::EnemyShot);
        registry.advance();
        let b = add(&mut registry, CollisionList::EnemyShot);

        assert_eq!(registry.remove(b).map(|shot| shot.id()), Some(b));
        assert_eq!(registry.remove(a).map(|shot| shot.id()), Some(a));
        assert!(registry.remove(a).is_none());
        assert!(registry.is_empty());
    }
}
