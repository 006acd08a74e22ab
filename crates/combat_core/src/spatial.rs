//! Spatial queries over the actor store: uniform XZ grid broad-phase for
//! radius queries, plus ray casts against actor spheres and static obstacle
//! boxes (terrain blockers registered by the host).

use std::collections::HashMap;

use glam::Vec3;

use crate::actor::ActorId;
use crate::ecs::{WorldEcs, geom};

const CELL_M: f32 = 4.0;

#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

/// Nearest hit along a cast ray. `target` is `None` for terrain.
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    pub t: f32,
    pub point: Vec3,
    pub target: Option<ActorId>,
}

#[derive(Default)]
pub struct SpatialIndex {
    cell: f32,
    buckets: HashMap<(i32, i32), Vec<ActorId>>,
    obstacles: Vec<Aabb>,
}

impl SpatialIndex {
    /// Rebuild the broad-phase grid. Called once per tick.
    pub fn rebuild(&mut self, world: &WorldEcs) {
        self.cell = CELL_M;
        self.buckets.clear();
        for a in world.iter() {
            if !a.hp.alive() {
                continue;
            }
            let key = self.key(a.tr.pos.x, a.tr.pos.z);
            self.buckets.entry(key).or_default().push(a.id);
        }
    }

    pub fn add_obstacle(&mut self, min: Vec3, max: Vec3) {
        self.obstacles.push(Aabb { min, max });
    }

    pub fn obstacles(&self) -> &[Aabb] {
        &self.obstacles
    }

    fn key(&self, x: f32, z: f32) -> (i32, i32) {
        let cx = (x / self.cell).floor() as i32;
        let cz = (z / self.cell).floor() as i32;
        (cx, cz)
    }

    /// Entities whose sphere intersects the query sphere, one entry each,
    /// sorted by ascending center distance (ties by id) for determinism.
    pub fn query_in_radius(
        &self,
        world: &WorldEcs,
        center: Vec3,
        radius: f32,
        exclude: &[ActorId],
    ) -> Vec<(ActorId, f32)> {
        let mut out: Vec<(ActorId, f32)> = Vec::new();
        if self.buckets.is_empty() {
            return out;
        }
        // One extra cell ring covers actor radii up to the cell size.
        let cr = ((radius + self.cell) / self.cell).ceil() as i32;
        let (cx, cz) = self.key(center.x, center.z);
        for dx in -cr..=cr {
            for dz in -cr..=cr {
                let Some(ids) = self.buckets.get(&(cx + dx, cz + dz)) else {
                    continue;
                };
                for id in ids {
                    if exclude.contains(id) {
                        continue;
                    }
                    let Some(a) = world.get(*id) else { continue };
                    if !a.hp.alive() {
                        continue;
                    }
                    let dist = (a.tr.pos - center).length();
                    if dist <= radius + a.tr.radius {
                        out.push((*id, dist));
                    }
                }
            }
        }
        out.sort_unstable_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        out
    }

    /// Cast a ray and return the nearest actor-sphere or obstacle hit within
    /// `max_dist`, or `None`. `dir` need not be normalized.
    pub fn cast_ray(
        &self,
        world: &WorldEcs,
        origin: Vec3,
        dir: Vec3,
        max_dist: f32,
        exclude: &[ActorId],
    ) -> Option<RayHit> {
        let d = dir.normalize_or_zero();
        if d == Vec3::ZERO || max_dist <= 0.0 {
            return None;
        }
        let p1 = origin + d * max_dist;
        let mut best: Option<RayHit> = None;
        for a in world.iter() {
            if !a.hp.alive() || exclude.contains(&a.id) {
                continue;
            }
            if let Some(t) = geom::segment_sphere_enter_t(origin, p1, a.tr.pos, a.tr.radius)
                && best.map(|h| t < h.t).unwrap_or(true)
            {
                best = Some(RayHit {
                    t,
                    point: origin + (p1 - origin) * t,
                    target: Some(a.id),
                });
            }
        }
        for ob in &self.obstacles {
            if let Some(t) = geom::segment_aabb_enter_t(origin, p1, ob.min, ob.max)
                && best.map(|h| t < h.t).unwrap_or(true)
            {
                best = Some(RayHit {
                    t,
                    point: origin + (p1 - origin) * t,
                    target: None,
                });
            }
        }
        best
    }

    /// Terrain-only line-of-sight check between two points.
    pub fn los_clear(&self, from: Vec3, to: Vec3) -> bool {
        self.obstacles
            .iter()
            .all(|ob| geom::segment_aabb_enter_t(from, to, ob.min, ob.max).is_none())
    }
}
