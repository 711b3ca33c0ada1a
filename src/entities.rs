/// All game entity types: pure data, no gameplay logic.

use crate::config::Tuning;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStatus {
    /// Waiting for the first jump.
    NotStarted,
    Running,
    GameOver,
}

/// The only input the core understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input {
    None,
    Jump,
}

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in canvas pixels (y grows downward).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    /// Fixed for the whole run.
    pub x: f64,
    pub y: f64,
    /// Vertical velocity in pixels/frame (negative = upward).
    pub vy: f64,
    pub on_ground: bool,
    pub size: f64,
}

impl Player {
    pub fn rect(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: self.size,
            height: self.size,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PenguinPose {
    Walk,
    Jump,
    Die,
}

impl PenguinPose {
    /// Number of sprite cells in the pose's animation strip.
    pub fn frame_count(&self) -> usize {
        match self {
            PenguinPose::Walk => 4,
            PenguinPose::Jump => 3,
            PenguinPose::Die => 4,
        }
    }
}

/// Penguin animation phase, advanced by the core so renderers stay read-only.
#[derive(Clone, Debug, PartialEq)]
pub struct PenguinAnim {
    pub pose: PenguinPose,
    /// Fractional cell index; `floor(frame)` selects the sprite.
    pub frame: f64,
    /// Frames spent in the die pose, used to hold the first cell.
    pub timer: u32,
}

impl PenguinAnim {
    pub fn cell(&self) -> usize {
        (self.frame.floor() as usize) % self.pose.frame_count()
    }
}

// ── Obstacles ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroundSprite {
    Block1,
    Block2,
    Block3,
    Block4,
    Block5,
    Block6,
    SnowMan,
}

impl GroundSprite {
    pub const ALL: [GroundSprite; 7] = [
        GroundSprite::Block1,
        GroundSprite::Block2,
        GroundSprite::Block3,
        GroundSprite::Block4,
        GroundSprite::Block5,
        GroundSprite::Block6,
        GroundSprite::SnowMan,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlyingSprite {
    SnowBall,
}

impl FlyingSprite {
    pub const ALL: [FlyingSprite; 1] = [FlyingSprite::SnowBall];

    pub fn frame_count(&self) -> usize {
        match self {
            FlyingSprite::SnowBall => 6,
        }
    }
}

/// Ground-bound vs airborne family; drives the spawn-exclusion policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    Ground,
    Flying,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ObstacleKind {
    Ground(GroundSprite),
    Flying {
        sprite: FlyingSprite,
        /// Fractional animation cell, +0.1 per frame.
        anim_frame: f64,
    },
}

impl ObstacleKind {
    pub fn category(&self) -> Category {
        match self {
            ObstacleKind::Ground(_) => Category::Ground,
            ObstacleKind::Flying { .. } => Category::Flying,
        }
    }

    pub fn is_flying(&self) -> bool {
        self.category() == Category::Flying
    }

    /// Animation cell for renderers; static sprites always report 0.
    pub fn anim_cell(&self) -> usize {
        match self {
            ObstacleKind::Ground(_) => 0,
            ObstacleKind::Flying { sprite, anim_frame } => {
                (anim_frame.floor() as usize) % sprite.frame_count()
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub active: bool,
    /// Set once the trailing edge passes the penguin.
    pub scored: bool,
}

impl Obstacle {
    pub fn rect(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

/// Predicted time window (in frames) during which a ground obstacle
/// will sit in front of the penguin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObstacleWindow {
    pub start: f64,
    pub end: f64,
    /// Index into `RunState::obstacles`.
    pub index: usize,
}

// ── Master run state ──────────────────────────────────────────────────────────

/// The entire run state.  Cloneable so pure update functions can return a
/// new copy without mutating the original.
#[derive(Clone, Debug, PartialEq)]
pub struct RunState {
    pub player: Player,
    pub anim: PenguinAnim,
    /// Ordered by spawn time; the last element is the newest.
    pub obstacles: Vec<Obstacle>,
    pub score: u32,
    /// Current horizontal speed in pixels/frame.
    pub speed: f64,
    /// Timestamp (ms) after which the next spawn attempt may happen.
    pub next_spawn_at: f64,
    pub status: RunStatus,
    pub platform_offset: f64,
    pub background_offset: f64,
    pub frame: u64,
    pub tuning: Tuning,
}

impl RunState {
    pub fn is_game_over(&self) -> bool {
        self.status == RunStatus::GameOver
    }

    /// The "press space to jump" hint is shown until the first obstacle.
    pub fn show_start_hint(&self) -> bool {
        self.status != RunStatus::GameOver && self.score == 0 && self.obstacles.is_empty()
    }

    /// Read-only snapshot for the render layer.
    pub fn view(&self) -> FrameView<'_> {
        FrameView {
            player: self.player.rect(),
            pose: self.anim.pose,
            pose_cell: self.anim.cell(),
            obstacles: self
                .obstacles
                .iter()
                .filter(|o| o.active)
                .map(|o| ObstacleView {
                    kind: &o.kind,
                    rect: o.rect(),
                    anim_cell: o.kind.anim_cell(),
                })
                .collect(),
            score: self.score,
            status: self.status,
            show_start_hint: self.show_start_hint(),
            platform_offset: self.platform_offset,
            background_offset: self.background_offset,
            canvas_width: self.tuning.canvas_width,
            canvas_height: self.tuning.canvas_height,
            platform_level: self.tuning.platform_level(),
        }
    }
}

// ── Render boundary ───────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct ObstacleView<'a> {
    pub kind: &'a ObstacleKind,
    pub rect: Rect,
    pub anim_cell: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FrameView<'a> {
    pub player: Rect,
    pub pose: PenguinPose,
    pub pose_cell: usize,
    pub obstacles: Vec<ObstacleView<'a>>,
    pub score: u32,
    pub status: RunStatus,
    pub show_start_hint: bool,
    pub platform_offset: f64,
    pub background_offset: f64,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub platform_level: f64,
}
