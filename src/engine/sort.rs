use super::types::TriangleArena;

/// Order the visible list far → near (painter's algorithm).
///
/// Stable, so triangles at equal depth keep submission order.
pub fn sort_back_to_front(arena: &mut TriangleArena) {
    let TriangleArena { all, visible } = arena;
    visible.sort_by(|&a, &b| all[b].sort_key.total_cmp(&all[a].sort_key));
}
