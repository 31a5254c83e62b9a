/// Interaction rules: coins, enemy contact, goal unlock.
///
/// Runs once per playing tick after kinematics and AI. Mutates only the
/// entities involved (coin flags, enemy HP, player bounce/invulnerability)
/// and reports everything else as an `Interactions` outcome for the
/// progression layer to act on. Score, lives and mode are never touched here.
///
/// ## Contact Truth Table
///
/// Evaluated per alive enemy overlapping the player, in list order.
/// ┌────────────────────────────────────────┬───────────┬──────────────────┐
/// │ Condition (priority order)              │ Result    │ Effect           │
/// ├────────────────────────────────────────┼───────────┼──────────────────┤
/// │ player.vy > min fall speed              │           │                  │
/// │   AND player bottom − enemy top < depth │ Stomp     │ hp −1, bounce,   │
/// │   AND player top < enemy top            │           │ points, continue │
/// │ player invulnerable                     │ Ignored   │ continue         │
/// │ otherwise                               │ Damage    │ invuln, STOP     │
/// └────────────────────────────────────────┴───────────┴──────────────────┘
///
/// A stomp bounce makes `vy` negative, so a second overlapping enemy in the
/// same tick can never also be stomped.
///
/// ## Goal
///
/// After all contacts (skipped on damage): unlocked iff no coin is untaken
/// and no enemy is alive. Recomputed from scratch every call. The goal is a
/// trigger zone; overlapping it while locked does nothing.

use crate::config::RulesConfig;

use super::entity::{Body, Coin, Enemy, EnemyKind, Kinematic, Player};
use super::rect::Rect;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Contact {
    Stomp,
    Damage,
    Ignored,
}

/// One enemy hit from above.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Stomp {
    pub enemy: usize,
    pub kind: EnemyKind,
    /// HP reached zero.
    pub defeated: bool,
    pub points: u32,
}

/// Outcome of one interaction pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Interactions {
    /// Indexes of coins collected this pass.
    pub coins: Vec<usize>,
    pub stomps: Vec<Stomp>,
    /// Non-stomp contact while vulnerable. Ends the pass.
    pub damaged: bool,
    /// Not evaluated when `damaged`.
    pub goal_unlocked: bool,
    pub goal_reached: bool,
    /// Coin and stomp points combined.
    pub points: u32,
}

/// Classify an overlapping player/enemy pair.
pub fn classify_contact(player: &Body, enemy: &Body, invulnerable: bool, rules: &RulesConfig) -> Contact {
    let depth = player.y + player.h - enemy.y;
    if player.vy > rules.stomp_min_fall_speed && depth < rules.stomp_max_depth && player.y < enemy.y {
        Contact::Stomp
    } else if invulnerable {
        Contact::Ignored
    } else {
        Contact::Damage
    }
}

/// Stomp reward for a variant.
pub fn stomp_points(kind: &EnemyKind, rules: &RulesConfig) -> u32 {
    match kind {
        EnemyKind::Blob => rules.blob_points,
        EnemyKind::Beetle => rules.beetle_points,
        EnemyKind::Flyer { .. } => rules.flyer_points,
    }
}

/// Is the goal open?
pub fn goal_unlocked(enemies: &[Enemy], coins: &[Coin]) -> bool {
    enemies.iter().all(|e| !e.alive) && coins.iter().all(|c| c.taken)
}

/// Run coin, enemy and goal checks for one tick.
pub fn resolve_interactions(
    player: &mut Player,
    enemies: &mut [Enemy],
    coins: &mut [Coin],
    goal: &Rect,
    rules: &RulesConfig,
) -> Interactions {
    let mut out = Interactions::default();

    // ── Coins ──
    for (i, coin) in coins.iter_mut().enumerate() {
        if coin.taken || !player.overlaps(&coin.rect) { continue; }
        coin.taken = true;
        out.coins.push(i);
        out.points += rules.coin_points;
    }

    // ── Enemies ──
    for (i, enemy) in enemies.iter_mut().enumerate() {
        if !enemy.alive || !player.overlaps(&enemy.rect()) { continue; }

        match classify_contact(&player.body, &enemy.body, player.is_invulnerable(), rules) {
            Contact::Stomp => {
                enemy.hp = enemy.hp.saturating_sub(1);
                enemy.alive = enemy.hp > 0;
                player.body.vy = -rules.stomp_bounce;
                let points = stomp_points(&enemy.kind, rules);
                out.points += points;
                out.stomps.push(Stomp { enemy: i, kind: enemy.kind, defeated: !enemy.alive, points });
            }
            Contact::Ignored => {}
            Contact::Damage => {
                player.invuln = rules.invulnerability_secs;
                out.damaged = true;
                return out;
            }
        }
    }

    // ── Goal ──
    out.goal_unlocked = goal_unlocked(enemies, coins);
    out.goal_reached = out.goal_unlocked && player.overlaps(goal);
    out
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
