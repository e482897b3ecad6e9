use crate::bodies::RigidBody;
use crate::core::{BodyId, BodyStorage};

/// Margin added to every bounding box for more robust pairing
const AABB_MARGIN: f32 = 0.05;

/// Naive all-pairs broadphase over the bodies' compound bounding boxes.
///
/// O(n^2) in the body count is the documented policy here: the engine
/// targets scenes of a handful of bodies, and the all-pairs sweep keeps
/// candidate ordering identical to insertion order, which the determinism
/// guarantee depends on. Pairs of two static bodies are skipped.
pub fn candidate_pairs(bodies: &BodyStorage<RigidBody>) -> Vec<(BodyId, BodyId)> {
    let boxed: Vec<_> = bodies
        .iter()
        .map(|(id, body)| (id, body.is_static(), body.world_bounds().expanded(AABB_MARGIN)))
        .collect();

    let mut pairs = Vec::new();
    for i in 0..boxed.len() {
        let (id_a, static_a, ref aabb_a) = boxed[i];
        for (id_b, static_b, aabb_b) in &boxed[(i + 1)..] {
            if static_a && *static_b {
                continue;
            }
            if aabb_a.intersects(aabb_b) {
                pairs.push((id_a, *id_b));
            }
        }
    }
    pairs
}
