/// Entities: Player, Enemy (three variants), Coin.
///
/// Player and Enemy share a kinematic `Body`; variant-specific data
/// lives only on the variant that needs it.

use crate::consts::TILE;

use super::rect::Rect;

#[derive(Clone, Copy, PartialEq, Eq, Debug, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    Left,
    Right,
}

/// Frame input: held directions are continuous, `jump` is an
/// edge-triggered request queued until the player update consumes it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

impl FrameInput {
    /// -1, 0 or +1.
    pub fn axis(&self) -> f64 {
        (self.right as i32 - self.left as i32) as f64
    }
}

/// Rectangle plus velocity and grounded flag.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Body {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub vx: f64,
    pub vy: f64,
    pub on_ground: bool,
}

impl Body {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Body { x, y, w, h, vx: 0.0, vy: 0.0, on_ground: false }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }
}

/// Anything that moves through the tile grid.
pub trait Kinematic {
    fn body(&self) -> &Body;

    fn rect(&self) -> Rect {
        self.body().rect()
    }

    fn overlaps(&self, other: &Rect) -> bool {
        self.rect().overlaps(other)
    }
}

// ── Player ──

pub const PLAYER_W: f64 = 58.0;
pub const PLAYER_H: f64 = 88.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub body: Body,
    pub facing: Facing,
    /// Seconds of contact immunity left.
    pub invuln: f64,
    /// Seconds accumulated for run-cycle animation.
    pub run_clock: f64,
}

impl Player {
    pub fn new(x: f64, y: f64) -> Self {
        Player {
            body: Body::new(x, y, PLAYER_W, PLAYER_H),
            facing: Facing::Right,
            invuln: 0.0,
            run_clock: 0.0,
        }
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invuln > 0.0
    }
}

impl Kinematic for Player {
    fn body(&self) -> &Body { &self.body }
}

// ── Enemy ──

/// Initial horizontal velocity for every enemy; patrols start leftward.
pub const ENEMY_START_VX: f64 = -120.0;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum EnemyKind {
    /// Ground patrol, 1 HP.
    Blob,
    /// Armored ground patrol, 2 HP, slightly faster.
    Beetle,
    /// Gravity-free; bobs around `anchor_y` as `phase` advances.
    Flyer { phase: f64, anchor_y: f64 },
}

impl EnemyKind {
    pub fn name(&self) -> &'static str {
        match self {
            EnemyKind::Blob => "blob",
            EnemyKind::Beetle => "beetle",
            EnemyKind::Flyer { .. } => "flyer",
        }
    }

    /// (width, height)
    pub fn size(&self) -> (f64, f64) {
        match self {
            EnemyKind::Blob => (56.0, 52.0),
            EnemyKind::Beetle => (60.0, 44.0),
            EnemyKind::Flyer { .. } => (56.0, 42.0),
        }
    }

    /// Patrol speed, px/s.
    pub fn speed(&self) -> f64 {
        match self {
            EnemyKind::Blob => 120.0,
            EnemyKind::Beetle => 150.0,
            EnemyKind::Flyer { .. } => 140.0,
        }
    }

    pub fn max_hp(&self) -> u32 {
        match self {
            EnemyKind::Beetle => 2,
            _ => 1,
        }
    }

    pub fn is_flyer(&self) -> bool {
        matches!(self, EnemyKind::Flyer { .. })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub body: Body,
    pub kind: EnemyKind,
    pub hp: u32,
    pub alive: bool,
    pub speed: f64,
}

impl Enemy {
    /// Spawn at tile (tx, ty).
    pub fn blob(tx: usize, ty: usize) -> Self {
        Enemy::spawn(EnemyKind::Blob, tx, ty)
    }

    pub fn beetle(tx: usize, ty: usize) -> Self {
        Enemy::spawn(EnemyKind::Beetle, tx, ty)
    }

    /// Flyers bob around a row slightly below their spawn tile's top.
    pub fn flyer(tx: usize, ty: usize, phase: f64) -> Self {
        let anchor_y = ty as f64 * TILE + 10.0;
        Enemy::spawn(EnemyKind::Flyer { phase, anchor_y }, tx, ty)
    }

    fn spawn(kind: EnemyKind, tx: usize, ty: usize) -> Self {
        let (w, h) = kind.size();
        let mut body = Body::new(tx as f64 * TILE + 8.0, ty as f64 * TILE + 6.0, w, h);
        body.vx = ENEMY_START_VX;
        Enemy {
            body,
            kind,
            hp: kind.max_hp(),
            alive: true,
            speed: kind.speed(),
        }
    }

    /// Patrol direction: +1 right, -1 left. A stationary enemy heads left.
    pub fn direction(&self) -> f64 {
        if self.body.vx > 0.0 { 1.0 } else { -1.0 }
    }
}

impl Kinematic for Enemy {
    fn body(&self) -> &Body { &self.body }
}

// ── Coin ──

pub const COIN_SIZE: f64 = 28.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coin {
    pub rect: Rect,
    /// One-way: once set it stays set for the rest of the attempt.
    pub taken: bool,
}

impl Coin {
    pub fn at_tile(tx: usize, ty: usize) -> Self {
        Coin {
            rect: Rect::new(tx as f64 * TILE + 18.0, ty as f64 * TILE + 18.0, COIN_SIZE, COIN_SIZE),
            taken: false,
        }
    }
}
