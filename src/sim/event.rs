/// Events emitted during a simulation step.
/// The presentation layer consumes these for animation/sound.

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    Jumped,
    CoinCollected { index: usize },
    EnemyStomped { index: usize, kind: &'static str },
    EnemyDefeated { index: usize, kind: &'static str },
    PlayerDamaged,
    PlayerFell,
    LifeLost { lives_left: u32 },
    GoalUnlocked,
    LevelCleared { level: usize },
    LevelLoaded { level: usize },
    GameOver { score: u32 },
    Victory { score: u32 },
}
