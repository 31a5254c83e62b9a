/// Collision resolver: axis-separated rectangle vs. tile grid.
///
/// ## Order
///
/// Every moving body runs the same two-phase sweep per tick:
///   1. `x += vx * dt`, then `resolve_horizontal`
///   2. `y += vy * dt`, then `resolve_vertical`
///
/// The horizontal pass uses the pre-vertical-move footprint; the vertical
/// pass sees the corrected x. No combined-axis resolution is done, so a
/// diagonal corner contact resolves along whichever axis moved into it.
///
/// ## Per-axis resolution
///
/// For each solid tile in the covered range (row-major scan) that strictly
/// overlaps the body, the body is pushed fully out of the tile against its
/// direction of travel and the velocity on that axis becomes exactly zero.
/// A tile that no longer overlaps after an earlier push is skipped.
///
/// `on_ground` is cleared at the start of every vertical pass and set only
/// by a downward contact.

use super::entity::Body;
use super::tile::{TileGrid, TileRange};

// ══════════════════════════════════════════════════════════════
// Per-axis resolution
// ══════════════════════════════════════════════════════════════

/// Push the body out of solid tiles along x. No-op when `vx == 0`.
pub fn resolve_horizontal(body: &mut Body, grid: &TileGrid) {
    if body.vx == 0.0 { return; }
    let moving_right = body.vx > 0.0;

    for (tx, ty) in TileRange::covering(&body.rect()).cells() {
        if !grid.is_solid(tx, ty) { continue; }
        let tile = TileGrid::cell_rect(tx, ty);
        if !body.rect().overlaps(&tile) { continue; }

        body.x = if moving_right { tile.x - body.w } else { tile.right() };
        body.vx = 0.0;
    }
}

/// Push the body out of solid tiles along y. Clears `on_ground` first,
/// sets it when landing on a tile top.
pub fn resolve_vertical(body: &mut Body, grid: &TileGrid) {
    body.on_ground = false;
    if body.vy == 0.0 { return; }
    let moving_down = body.vy > 0.0;

    for (tx, ty) in TileRange::covering(&body.rect()).cells() {
        if !grid.is_solid(tx, ty) { continue; }
        let tile = TileGrid::cell_rect(tx, ty);
        if !body.rect().overlaps(&tile) { continue; }

        if moving_down {
            body.y = tile.y - body.h;
            body.on_ground = true;
        } else {
            body.y = tile.bottom();
        }
        body.vy = 0.0;
    }
}

// ══════════════════════════════════════════════════════════════
// Integration helpers
// ══════════════════════════════════════════════════════════════

/// Advance x by one step and resolve horizontally.
#[inline]
pub fn move_horizontal(body: &mut Body, grid: &TileGrid, dt: f64) {
    body.x += body.vx * dt;
    resolve_horizontal(body, grid);
}

/// Advance y by one step without resolving. Callers check
/// `below_world` between this and `resolve_vertical`.
#[inline]
pub fn integrate_vertical(body: &mut Body, dt: f64) {
    body.y += body.vy * dt;
}

/// Has the body dropped past the off-level threshold?
#[inline]
pub fn below_world(body: &Body, grid: &TileGrid, margin: f64) -> bool {
    body.y > grid.pixel_height() + margin
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
