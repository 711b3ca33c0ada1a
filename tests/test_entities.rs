use penguin_run::compute::init_state;
use penguin_run::config::Tuning;
use penguin_run::entities::*;

fn snowball(x: f64, anim_frame: f64) -> Obstacle {
    Obstacle {
        kind: ObstacleKind::Flying {
            sprite: FlyingSprite::SnowBall,
            anim_frame,
        },
        x,
        y: 150.0,
        width: 64.0,
        height: 64.0,
        active: true,
        scored: false,
    }
}

#[test]
fn obstacle_kind_categories() {
    assert_eq!(ObstacleKind::Ground(GroundSprite::SnowMan).category(), Category::Ground);
    assert!(!ObstacleKind::Ground(GroundSprite::Block3).is_flying());
    assert!(snowball(0.0, 0.0).kind.is_flying());
}

#[test]
fn flying_anim_cell_wraps_over_six_frames() {
    assert_eq!(snowball(0.0, 0.0).kind.anim_cell(), 0);
    assert_eq!(snowball(0.0, 2.95).kind.anim_cell(), 2);
    assert_eq!(snowball(0.0, 6.2).kind.anim_cell(), 0);
    assert_eq!(ObstacleKind::Ground(GroundSprite::Block1).anim_cell(), 0);
}

#[test]
fn rect_edges() {
    let r = Rect { x: 10.0, y: 20.0, width: 5.0, height: 7.0 };
    assert_eq!(r.right(), 15.0);
    assert_eq!(r.bottom(), 27.0);
}

#[test]
fn pose_frame_counts() {
    assert_eq!(PenguinPose::Walk.frame_count(), 4);
    assert_eq!(PenguinPose::Jump.frame_count(), 3);
    assert_eq!(PenguinPose::Die.frame_count(), 4);
}

#[test]
fn view_lists_only_active_obstacles() {
    let mut s = init_state(Tuning::default());
    s.obstacles.push(snowball(400.0, 1.5));
    let mut retired = snowball(-100.0, 0.0);
    retired.active = false;
    s.obstacles.push(retired);

    let view = s.view();
    assert_eq!(view.obstacles.len(), 1);
    assert_eq!(view.obstacles[0].rect.x, 400.0);
    assert_eq!(view.obstacles[0].anim_cell, 1);
    assert_eq!(view.player, s.player.rect());
    assert_eq!(view.platform_level, 336.0);
}

#[test]
fn start_hint_hides_once_obstacles_appear() {
    let mut s = init_state(Tuning::default());
    s.status = RunStatus::Running;
    assert!(s.show_start_hint());

    s.obstacles.push(snowball(900.0, 0.0));
    assert!(!s.show_start_hint());

    s.obstacles.clear();
    s.status = RunStatus::GameOver;
    assert!(!s.show_start_hint());
}

#[test]
fn start_hint_prompts_before_first_jump() {
    let s = init_state(Tuning::default());
    assert_eq!(s.status, RunStatus::NotStarted);
    assert!(s.show_start_hint());
    assert!(s.view().show_start_hint);
}

#[test]
fn run_state_clone_is_independent() {
    let original = init_state(Tuning::default());
    let mut cloned = original.clone();

    cloned.player.y = 0.0;
    cloned.score = 999;
    cloned.obstacles.push(snowball(5.0, 0.0));

    assert_eq!(original.player.y, 272.0);
    assert_eq!(original.score, 0);
    assert!(original.obstacles.is_empty());
}
