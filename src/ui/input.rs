/// Keyboard input, mapped to game actions.
///
/// Terminals rarely report key releases, so a key counts as held for
/// `HOLD_TIMEOUT` after its last Press/Repeat event. When the keyboard
/// enhancement protocol is active, only explicit Release events end the
/// hold.
///
/// Two views of the same state:
///   - `is_held(action)` for continuous movement
///   - `was_pressed(action)` for edge-triggered jump, start and debug keys

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use skyline_run::domain::entity::FrameInput;

/// Held-key expiry when no Release event arrives.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Action {
    Left,
    Right,
    Jump,
    Start,
    Quit,
    DebugLoseLife,
    DebugClearCoins,
    DebugClearEnemies,
    DebugWarp,
}

impl Action {
    fn from_key(code: KeyCode) -> Option<Action> {
        let action = match code {
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Action::Left,
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Action::Right,
            KeyCode::Up | KeyCode::Char(' ') | KeyCode::Char('w') | KeyCode::Char('W') => Action::Jump,
            KeyCode::Enter => Action::Start,
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Action::Quit,
            KeyCode::F(9) => Action::DebugLoseLife,
            KeyCode::F(10) => Action::DebugClearCoins,
            KeyCode::F(11) => Action::DebugClearEnemies,
            KeyCode::F(12) => Action::DebugWarp,
            _ => return None,
        };
        Some(action)
    }
}

pub struct InputState {
    /// Last Press/Repeat per action.
    last_active: HashMap<Action, Instant>,
    /// Actions that went from released to held during the last drain.
    fresh_presses: Vec<Action>,
    ctrl_c: bool,
    /// Honor Release events (keyboard enhancement confirmed).
    pub honor_release: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            ctrl_c: false,
            honor_release: false,
        }
    }

    /// Drain all pending terminal events without blocking.
    /// Call once per frame, before running ticks.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.ctrl_c = false;

        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.apply(key);
            }
        }

        if !self.honor_release {
            let now = Instant::now();
            self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
        }
    }

    fn apply(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
        {
            self.ctrl_c = true;
            return;
        }
        let Some(action) = Action::from_key(key.code) else { return; };

        match key.kind {
            KeyEventKind::Release if self.honor_release => {
                self.last_active.remove(&action);
            }
            KeyEventKind::Release => {}
            _ => {
                if !self.is_held(action) {
                    self.fresh_presses.push(action);
                }
                self.last_active.insert(action, Instant::now());
            }
        }
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.last_active
            .get(&action)
            .is_some_and(|t| self.honor_release || t.elapsed() < HOLD_TIMEOUT)
    }

    pub fn was_pressed(&self, action: Action) -> bool {
        self.fresh_presses.contains(&action)
    }

    pub fn ctrl_c_pressed(&self) -> bool {
        self.ctrl_c
    }

    /// Merge this frame's keys into the simulation input. Directions follow
    /// the held state; a fresh jump press is queued until a tick consumes it.
    pub fn update_frame_input(&self, input: &mut FrameInput) {
        input.left = self.is_held(Action::Left);
        input.right = self.is_held(Action::Right);
        if self.was_pressed(Action::Jump) {
            input.jump = true;
        }
    }
}
