/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `RunState` (and, where needed, an RNG handle) and returns a brand-new
/// `RunState`.  Side effects are limited to the injected RNG and `log`.

use log::{debug, info, trace};
use rand::Rng;

use crate::config::Tuning;
use crate::entities::{
    Category, FlyingSprite, GroundSprite, Input, Obstacle, ObstacleKind, ObstacleWindow,
    PenguinAnim, PenguinPose, Player, Rect, RunState, RunStatus,
};

/// Flying animation advance per frame.
const FLYING_ANIM_STEP: f64 = 0.1;

/// Background scrolls slower than the platform for a depth effect.
const BACKGROUND_PARALLAX: f64 = 0.2;

/// Frames the die pose holds its first cell.
const DIE_HOLD_FRAMES: u32 = 6;

/// How far ahead (in frames) the autopilot looks for ground obstacles.
pub const AUTOPILOT_LOOKAHEAD_FRAMES: f64 = 60.0;

/// Upper bound on a simulated jump; a sane tuning lands long before.
const MAX_FLIGHT_FRAMES: u32 = 1000;

// ── Constructors ─────────────────────────────────────────────────────────────

fn grounded_player(tuning: &Tuning) -> Player {
    Player {
        x: tuning.player_x,
        y: tuning.platform_level() - tuning.player_size,
        vy: 0.0,
        on_ground: true,
        size: tuning.player_size,
    }
}

fn fresh_state(tuning: Tuning, status: RunStatus) -> RunState {
    RunState {
        player: grounded_player(&tuning),
        anim: PenguinAnim {
            pose: PenguinPose::Walk,
            frame: 0.0,
            timer: 0,
        },
        obstacles: Vec::new(),
        score: 0,
        speed: tuning.base_speed,
        next_spawn_at: 0.0,
        status,
        platform_offset: 0.0,
        background_offset: 0.0,
        frame: 0,
        tuning,
    }
}

/// Build the initial state, waiting for the first jump.
pub fn init_state(tuning: Tuning) -> RunState {
    fresh_state(tuning, RunStatus::NotStarted)
}

/// Reinitialise every piece of run state and go straight to `Running`.
pub fn restart(state: &RunState) -> RunState {
    info!("run restarted (previous score {})", state.score);
    fresh_state(state.tuning, RunStatus::Running)
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

/// Launch the penguin if it is standing on the platform.  Airborne jumps
/// are dropped, not buffered.
pub fn jump(state: &RunState) -> RunState {
    if state.status != RunStatus::Running || !state.player.on_ground {
        return state.clone();
    }
    RunState {
        player: Player {
            vy: state.tuning.jump_power,
            on_ground: false,
            ..state.player.clone()
        },
        ..state.clone()
    }
}

/// Route one input through the run state machine.
///
/// `NotStarted --Jump--> Running`, `GameOver --Jump--> Running` (restart),
/// `Running --Jump-->` jump attempt.
pub fn apply_input(state: &RunState, input: Input) -> RunState {
    match (state.status, input) {
        (_, Input::None) => state.clone(),
        (RunStatus::NotStarted, Input::Jump) => {
            info!("run started");
            RunState {
                status: RunStatus::Running,
                ..state.clone()
            }
        }
        (RunStatus::GameOver, Input::Jump) => restart(state),
        (RunStatus::Running, Input::Jump) => jump(state),
    }
}

// ── Physics ──────────────────────────────────────────────────────────────────

/// One gravity step followed by the ground clamp.
pub fn apply_physics(player: &Player, tuning: &Tuning) -> Player {
    let mut y = player.y + player.vy;
    let mut vy = player.vy + tuning.gravity;
    let mut on_ground = player.on_ground;

    let level = tuning.platform_level();
    if y + player.size >= level {
        y = level - player.size;
        vy = 0.0;
        on_ground = true;
    }

    Player {
        y,
        vy,
        on_ground,
        ..player.clone()
    }
}

/// Strict axis-aligned overlap; touching edges do not collide.
pub fn collides(a: &Rect, b: &Rect) -> bool {
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}

/// Add one point, stepping the speed up on every `points_per_speed_step`th.
pub fn award_point(score: u32, speed: f64, tuning: &Tuning) -> (u32, f64) {
    let score = score + 1;
    if score % tuning.points_per_speed_step == 0 {
        let speed = speed + tuning.speed_step;
        debug!("score {score}: speed up to {speed:.1}");
        (score, speed)
    } else {
        (score, speed)
    }
}

fn obstacle_speed(kind: &ObstacleKind, speed: f64, tuning: &Tuning) -> f64 {
    match kind {
        ObstacleKind::Flying {
            sprite: FlyingSprite::SnowBall,
            ..
        } => speed * tuning.flying_speed_multiplier,
        ObstacleKind::Ground(_) => speed,
    }
}

// ── Spawning ─────────────────────────────────────────────────────────────────

/// `(has_flying, has_ground)` over the active obstacles.
pub fn families_on_screen(obstacles: &[Obstacle]) -> (bool, bool) {
    let active = || obstacles.iter().filter(|o| o.active);
    (
        active().any(|o| o.kind.is_flying()),
        active().any(|o| !o.kind.is_flying()),
    )
}

/// Pick the family of the next obstacle, or `None` to skip this attempt.
///
/// Both families on screen suppresses the spawn; a lone airborne obstacle
/// is followed by a ground one; a lone ground obstacle is followed by an
/// airborne one with probability `flying_bias`; an empty screen starts
/// with ground.
pub fn choose_category(
    obstacles: &[Obstacle],
    tuning: &Tuning,
    rng: &mut impl Rng,
) -> Option<Category> {
    match families_on_screen(obstacles) {
        (true, true) => None,
        (true, false) => Some(Category::Ground),
        (false, true) => {
            if rng.gen::<f64>() < tuning.flying_bias {
                Some(Category::Flying)
            } else {
                Some(Category::Ground)
            }
        }
        (false, false) => Some(Category::Ground),
    }
}

/// Vertical band `(top, bottom)` for airborne obstacle `y`, derived from
/// the max jump height so every snowball can be cleared.
pub fn flying_y_range(tuning: &Tuning) -> (f64, f64) {
    let level = tuning.platform_level();
    let height = tuning.obstacle_size;
    let top = level - tuning.max_jump_height() - height - tuning.flying_top_margin;
    let bottom = level - height - tuning.flying_bottom_margin;
    (top, bottom)
}

/// Ground obstacles are capped below the max jump height.
pub fn ground_obstacle_height(tuning: &Tuning) -> f64 {
    tuning
        .obstacle_size
        .min(tuning.max_jump_height() - tuning.ground_height_margin)
}

/// Build a new obstacle just off the right edge, or `None` when the
/// category policy suppresses spawning.
pub fn create_obstacle(state: &RunState, rng: &mut impl Rng) -> Option<Obstacle> {
    let tuning = &state.tuning;
    let category = choose_category(&state.obstacles, tuning, rng)?;
    let width = tuning.obstacle_size;

    let (kind, y, height) = match category {
        Category::Flying => {
            let sprite = FlyingSprite::ALL[rng.gen_range(0..FlyingSprite::ALL.len())];
            let height = tuning.obstacle_size;
            let (top, bottom) = flying_y_range(tuning);
            let y = top + rng.gen::<f64>() * (bottom - top);
            let kind = ObstacleKind::Flying {
                sprite,
                anim_frame: 0.0,
            };
            (kind, y, height)
        }
        Category::Ground => {
            let sprite = GroundSprite::ALL[rng.gen_range(0..GroundSprite::ALL.len())];
            let height = ground_obstacle_height(tuning);
            let y = tuning.platform_level() - height + tuning.ground_sink;
            (ObstacleKind::Ground(sprite), y, height)
        }
    };

    Some(Obstacle {
        kind,
        x: tuning.canvas_width + tuning.spawn_margin,
        y,
        width,
        height,
        active: true,
        scored: false,
    })
}

/// Horizontal clearance the newest obstacle must have travelled before
/// another may spawn.  Grows with speed and after airborne obstacles.
pub fn min_spawn_gap(
    last: Option<&Obstacle>,
    speed: f64,
    tuning: &Tuning,
    rng: &mut impl Rng,
) -> f64 {
    let mut gap = tuning.base_gap
        + rng.gen::<f64>() * tuning.gap_jitter
        + (speed - tuning.base_speed) * tuning.gap_per_speed;
    if last.map_or(false, |o| o.kind.is_flying()) {
        gap += tuning.flying_extra_gap;
    }
    gap
}

/// Spawn attempt at `now` (ms).  Always recomputes `next_spawn_at` when the
/// deadline has passed, whether or not an obstacle was added.
pub fn try_spawn(state: &RunState, now: f64, rng: &mut impl Rng) -> RunState {
    if state.status != RunStatus::Running || now <= state.next_spawn_at {
        return state.clone();
    }
    let tuning = &state.tuning;

    let last = state.obstacles.last();
    let gap = min_spawn_gap(last, state.speed, tuning, rng);
    let room = last.map_or(true, |o| o.x + o.width < tuning.canvas_width - gap);
    if !room {
        return RunState {
            next_spawn_at: now + tuning.gap_retry_ms,
            ..state.clone()
        };
    }

    match create_obstacle(state, rng) {
        Some(obstacle) => {
            let (has_flying, has_ground) = families_on_screen(&state.obstacles);
            debug!(
                "spawning {:?} obstacle at y={:.1} (flying on screen: {has_flying}, ground on screen: {has_ground})",
                obstacle.kind.category(),
                obstacle.y,
            );
            let mut delay = tuning.spawn_delay_ms + rng.gen::<f64>() * tuning.spawn_delay_jitter_ms;
            if obstacle.kind.is_flying() {
                delay += tuning.flying_extra_delay_ms;
            }
            let mut obstacles = state.obstacles.clone();
            obstacles.push(obstacle);
            RunState {
                obstacles,
                next_spawn_at: now + delay,
                ..state.clone()
            }
        }
        None => {
            trace!("spawn suppressed: both categories on screen");
            RunState {
                next_spawn_at: now + tuning.suppressed_retry_ms,
                ..state.clone()
            }
        }
    }
}

// ── Animation ────────────────────────────────────────────────────────────────

pub fn advance_anim(anim: &PenguinAnim, on_ground: bool, game_over: bool) -> PenguinAnim {
    let mut next = anim.clone();
    if game_over {
        next.pose = PenguinPose::Die;
        next.timer += 1;
        if next.timer > DIE_HOLD_FRAMES {
            next.frame += 0.15;
        }
    } else if !on_ground {
        next.pose = PenguinPose::Jump;
        next.frame += 0.15;
    } else {
        next.pose = PenguinPose::Walk;
        next.frame += 0.18;
    }
    if next.frame >= next.pose.frame_count() as f64 {
        next.frame = 0.0;
    }
    next
}

// ── Per-frame update ─────────────────────────────────────────────────────────

/// Advance one frame at monotonic timestamp `now` (ms).  A no-op unless
/// the run is `Running`.
pub fn advance_frame(state: &RunState, now: f64, rng: &mut impl Rng) -> RunState {
    if state.status != RunStatus::Running {
        return state.clone();
    }
    let tuning = state.tuning;

    // ── 1. Scroll ────────────────────────────────────────────────────────────
    let platform_offset = state.platform_offset + state.speed;
    let background_offset = state.background_offset + state.speed * BACKGROUND_PARALLAX;

    // ── 2. Penguin physics ───────────────────────────────────────────────────
    let player = apply_physics(&state.player, &tuning);
    let player_rect = player.rect();

    // ── 3. Obstacles: move, collide, score, retire ───────────────────────────
    let mut score = state.score;
    let mut speed = state.speed;
    let mut game_over = false;

    let mut obstacles = state.obstacles.clone();
    for obs in obstacles.iter_mut().filter(|o| o.active) {
        obs.x -= obstacle_speed(&obs.kind, speed, &tuning);
        if let ObstacleKind::Flying { anim_frame, .. } = &mut obs.kind {
            *anim_frame += FLYING_ANIM_STEP;
        }

        if collides(&player_rect, &obs.rect()) {
            game_over = true;
        }

        if !obs.scored && obs.x + obs.width < player.x {
            obs.scored = true;
            (score, speed) = award_point(score, speed, &tuning);
        }

        if obs.x + obs.width < 0.0 {
            obs.active = false;
        }
    }
    obstacles.retain(|o| o.active);

    if game_over {
        info!("game over with score {score}");
    }

    let anim = advance_anim(&state.anim, player.on_ground, game_over);

    let next = RunState {
        player,
        anim,
        obstacles,
        score,
        speed,
        status: if game_over {
            RunStatus::GameOver
        } else {
            RunStatus::Running
        },
        platform_offset,
        background_offset,
        frame: state.frame + 1,
        ..state.clone()
    };

    // ── 4. Spawn (skipped once the run is over) ──────────────────────────────
    try_spawn(&next, now, rng)
}

/// `update(state, input, now) -> state'`.
///
/// A jump that starts or restarts the run returns the fresh state without
/// advancing it; the new run's first frame is the next call.
pub fn update(state: &RunState, input: Input, now: f64, rng: &mut impl Rng) -> RunState {
    let after_input = apply_input(state, input);
    if state.status != RunStatus::Running {
        return after_input;
    }
    advance_frame(&after_input, now, rng)
}

// ── Lookahead ────────────────────────────────────────────────────────────────

/// First active ground obstacle that will reach the penguin within
/// `frames_ahead` frames, with the window it will occupy in front of it.
pub fn predict_ground_obstacle(state: &RunState, frames_ahead: f64) -> Option<ObstacleWindow> {
    state
        .obstacles
        .iter()
        .enumerate()
        .filter(|(_, o)| o.active && !o.kind.is_flying())
        .find_map(|(index, o)| {
            let start = (o.x - state.player.x) / state.speed;
            if (0.0..=frames_ahead).contains(&start) {
                Some(ObstacleWindow {
                    start,
                    end: start + o.width / state.speed,
                    index,
                })
            } else {
                None
            }
        })
}

/// Replay a jump issued now against `obstacle` alone.  True when the
/// penguin never touches it and lands with the obstacle fully behind.
fn jump_clears(state: &RunState, obstacle: &Obstacle) -> bool {
    let tuning = state.tuning;
    let mut player = jump(state).player;
    let mut rect = obstacle.rect();
    let step = obstacle_speed(&obstacle.kind, state.speed, &tuning);

    for _ in 0..MAX_FLIGHT_FRAMES {
        player = apply_physics(&player, &tuning);
        rect.x -= step;
        if collides(&player.rect(), &rect) {
            return false;
        }
        if player.on_ground {
            return rect.right() <= player.x;
        }
    }
    false
}

/// Demo-mode decision for the current frame: jump at the earliest moment
/// a jump carries the penguin over the next ground obstacle.
pub fn autopilot_input(state: &RunState) -> Input {
    if state.status != RunStatus::Running || !state.player.on_ground {
        return Input::None;
    }
    let clears = predict_ground_obstacle(state, AUTOPILOT_LOOKAHEAD_FRAMES)
        .and_then(|window| state.obstacles.get(window.index))
        .map_or(false, |obstacle| jump_clears(state, obstacle));
    if clears {
        trace!("autopilot jump at frame {}", state.frame);
        Input::Jump
    } else {
        Input::None
    }
}
