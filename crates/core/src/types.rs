use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct EnemyId;
}

/// Integer grid cell coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub fn center(self) -> Vec2 {
        Vec2 { x: self.x as f32 + 0.5, y: self.y as f32 + 0.5 }
    }

    pub fn neighbors4(self) -> [Pos; 4] {
        [
            Pos { y: self.y - 1, x: self.x },
            Pos { y: self.y, x: self.x + 1 },
            Pos { y: self.y + 1, x: self.x },
            Pos { y: self.y, x: self.x - 1 },
        ]
    }
}

/// Continuous position or displacement measured in cell units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn from_angle(angle: f32) -> Self {
        Self { x: angle.cos(), y: angle.sin() }
    }

    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    pub fn distance(self, other: Vec2) -> f32 {
        (self - other).length()
    }

    /// Unit vector in the same direction, or zero for a degenerate vector.
    pub fn normalized(self) -> Vec2 {
        let len = self.length();
        if len <= f32::EPSILON || !len.is_finite() {
            return Vec2::ZERO;
        }
        Vec2 { x: self.x / len, y: self.y / len }
    }

    pub fn angle(self) -> f32 {
        self.y.atan2(self.x)
    }

    /// Grid cell containing this point.
    pub fn cell(self) -> Pos {
        Pos { y: self.y.floor() as i32, x: self.x.floor() as i32 }
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2 { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2 { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2 { x: self.x * rhs, y: self.y * rhs }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CellKind {
    Floor,
    Wall,
    Key,
    Exit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Archetype {
    Patrol,
    Ambush,
    Phase,
    Lurker,
    Screamer,
    Boss,
}

impl Archetype {
    pub const ALL: [Archetype; 6] = [
        Archetype::Patrol,
        Archetype::Ambush,
        Archetype::Phase,
        Archetype::Lurker,
        Archetype::Screamer,
        Archetype::Boss,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    Key,
    Torch,
    Potion,
    Shield,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelPhase {
    Loading,
    Playing,
    LevelComplete,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageSource {
    Trap,
    Contact(Archetype),
    Starvation,
}

/// Per-tick commands supplied by the input layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    pub move_x: f32,
    pub move_y: f32,
    pub sprint: bool,
    pub attack: bool,
    pub use_potion: bool,
}

impl TickInput {
    pub fn movement(self) -> Vec2 {
        Vec2 { x: self.move_x, y: self.move_y }
    }
}

/// Discrete happenings surfaced to audio and presentation layers.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    LevelLoaded { level: u32, keys_required: u32, boss_present: bool },
    KeyCollected { held: u32, required: u32 },
    PickupCollected { kind: PickupKind },
    PotionUsed { healed: f32 },
    AttackWhiffed,
    EnemyHit { archetype: Archetype },
    EnemySlain { archetype: Archetype, coins: u32 },
    BossDefeated,
    MinionSpawned { pos: Pos },
    Scream,
    ScreenShake,
    PlayerHurt { source: DamageSource, hp_lost: f32, shield_absorbed: f32 },
    TorchDepleted,
    LevelComplete { level: u32 },
    PlayerDied { level: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickResult {
    pub simulated_dt: f32,
    pub phase: LevelPhase,
}

/// Final stats an external score store may persist.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub level_reached: u32,
    pub levels_cleared: u32,
    pub kills: u32,
    pub coins: u32,
    pub survival_time: f32,
}
