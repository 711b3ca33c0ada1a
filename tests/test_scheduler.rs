use penguin_run::config::Tuning;
use penguin_run::entities::*;
use penguin_run::scheduler::{FrameScheduler, GameLoop, PendingFrame};

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Counts every frame request so tests can see the chain.
#[derive(Default)]
struct CountingScheduler {
    requests: u32,
}

impl FrameScheduler for CountingScheduler {
    fn request_frame(&mut self) {
        self.requests += 1;
    }
}

fn new_loop() -> GameLoop<CountingScheduler, StdRng> {
    GameLoop::new(
        Tuning::default(),
        CountingScheduler::default(),
        StdRng::seed_from_u64(42),
    )
}

#[test]
fn pending_frame_take_consumes_request() {
    let mut p = PendingFrame::default();
    assert!(!p.is_pending());
    assert!(!p.take());

    p.request_frame();
    p.request_frame();
    assert!(p.is_pending());
    assert!(p.take());
    assert!(!p.take());
}

#[test]
fn no_frames_requested_before_start() {
    let mut game = new_loop();
    game.on_frame(16.0);
    game.on_input(Input::None);
    assert_eq!(game.scheduler().requests, 0);
    assert_eq!(game.state().status, RunStatus::NotStarted);
    assert_eq!(game.state().frame, 0);
}

#[test]
fn first_jump_arms_the_chain() {
    let mut game = new_loop();
    game.on_input(Input::Jump);
    assert_eq!(game.state().status, RunStatus::Running);
    assert_eq!(game.scheduler().requests, 1);

    // Jumping mid-run does not add extra frame requests.
    game.on_input(Input::Jump);
    assert_eq!(game.scheduler().requests, 1);
}

#[test]
fn each_running_frame_requests_the_next() {
    let mut game = new_loop();
    game.on_input(Input::Jump);
    for i in 1..=10u32 {
        game.on_frame(i as f64 * 16.0);
    }
    assert_eq!(game.state().frame, 10);
    assert_eq!(game.scheduler().requests, 11);
}

#[test]
fn game_over_halts_chain_and_jump_restarts() {
    let mut game = new_loop();
    game.on_input(Input::Jump);

    // Without input the penguin eventually runs into the first ground obstacle.
    let mut now = 0.0;
    while game.state().status == RunStatus::Running {
        now += 16.0;
        game.on_frame(now);
        assert!(now < 60_000.0, "run never ended");
    }
    let frames = game.state().frame;
    let requests = game.scheduler().requests;
    assert_eq!(requests as u64, frames); // the fatal frame did not re-request

    // Stray frames after game over change nothing.
    game.on_frame(now + 16.0);
    assert_eq!(game.state().frame, frames);
    assert_eq!(game.scheduler().requests, requests);

    game.on_input(Input::Jump);
    let s = game.state();
    assert_eq!(s.status, RunStatus::Running);
    assert_eq!(s.score, 0);
    assert_eq!(s.speed, 6.0);
    assert!(s.obstacles.is_empty());
    assert_eq!(game.scheduler().requests, requests + 1);
}

#[test]
fn pending_frame_drives_a_run() {
    let mut game = GameLoop::new(
        Tuning::default(),
        PendingFrame::default(),
        StdRng::seed_from_u64(9),
    );
    game.on_input(Input::Jump);

    let mut frames = 0;
    let mut now = 0.0;
    while game.scheduler_mut().take() {
        now += 16.0;
        game.on_frame(now);
        frames += 1;
    }
    assert_eq!(game.state().status, RunStatus::GameOver);
    assert_eq!(game.state().frame, frames);
    assert!(!game.scheduler().is_pending());
}
