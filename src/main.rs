mod display;

use std::fs::OpenOptions;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal, ExecutableCommand,
};
use log::{info, warn};
use rand::thread_rng;

use penguin_run::compute::autopilot_input;
use penguin_run::config::GameConfig;
use penguin_run::entities::Input;
use penguin_run::scheduler::{GameLoop, PendingFrame};

// ── Logging ───────────────────────────────────────────────────────────────────

/// Route `env_logger` to a file: stderr would scribble over the raw-mode
/// screen.  `RUST_LOG` still controls the filter.
fn init_logging(config: &GameConfig) -> anyhow::Result<()> {
    let path = config.log_path();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .context("installing logger")?;
    Ok(())
}

// ── Input ─────────────────────────────────────────────────────────────────────

enum Command {
    Game(Input),
    Quit,
}

fn translate(event: Event) -> Option<Command> {
    let Event::Key(KeyEvent {
        code, kind, modifiers, ..
    }) = event
    else {
        return None;
    };
    if kind == KeyEventKind::Release {
        return None;
    }
    match code {
        KeyCode::Char(' ') | KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => {
            Some(Command::Game(Input::Jump))
        }
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
        _ => None,
    }
}

// ── Frame loop ────────────────────────────────────────────────────────────────

/// Real-time driver: drains input, runs the pending frame (if any) and
/// redraws.  After game over no frame is pending, so the screen stays
/// frozen until a jump restarts the run.
fn game_loop<W: Write>(
    out: &mut W,
    config: &GameConfig,
    rx: &mpsc::Receiver<Event>,
) -> anyhow::Result<()> {
    let frame_period = Duration::from_millis(config.frame_ms);
    let clock = Instant::now();
    let mut game = GameLoop::new(config.tuning, PendingFrame::default(), thread_rng());

    loop {
        let frame_start = Instant::now();

        while let Ok(event) = rx.try_recv() {
            match translate(event) {
                Some(Command::Quit) => return Ok(()),
                Some(Command::Game(input)) => game.on_input(input),
                None => {}
            }
        }

        if config.autopilot && autopilot_input(game.state()) == Input::Jump {
            game.on_input(Input::Jump);
        }

        if game.scheduler_mut().take() {
            let now = clock.elapsed().as_secs_f64() * 1000.0;
            game.on_frame(now);
        }

        let (width, height) = terminal::size().context("querying terminal size")?;
        display::render(out, &game.state().view(), width, height).context("drawing frame")?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_period {
            thread::sleep(frame_period - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let config = GameConfig::load().context("loading configuration")?;
    init_logging(&config)?;
    info!("starting with {:?}", config);

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode().context("enabling raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the frame loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(err) => {
                warn!("event reader stopped: {err}");
                break;
            }
        }
    });

    let result = game_loop(&mut out, &config, &rx);

    // Always restore the terminal
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}
