/// Rendering layer: all terminal I/O lives here.
///
/// Each function receives a mutable writer and a read-only `FrameView`.
/// No game logic is performed; this module only translates canvas
/// coordinates into terminal cells.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use penguin_run::entities::{
    FrameView, GroundSprite, ObstacleKind, ObstacleView, PenguinPose, Rect, RunStatus,
};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_SKY: Color = Color::DarkGrey;
const C_PLATFORM: Color = Color::White;
const C_PLATFORM_SEAM: Color = Color::Grey;
const C_PENGUIN: Color = Color::White;
const C_PENGUIN_DEAD: Color = Color::Red;
const C_BLOCK: Color = Color::Cyan;
const C_SNOWMAN: Color = Color::White;
const C_SNOWBALL: Color = Color::Blue;
const C_HINT: Color = Color::DarkGrey;

/// Width in canvas pixels of one snow block in the platform strip.
const BLOCK_PX: f64 = 64.0;

/// Horizontal spacing in canvas pixels between background snowflakes.
const FLAKE_SPACING_PX: f64 = 90.0;

const SNOWBALL_CELLS: [&str; 6] = ["◐", "◓", "◑", "◒", "◐", "◓"];

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Maps canvas pixels onto the play area inside the border
/// (columns `1..width-1`, rows `2..height-2`).
struct Viewport {
    width: u16,
    height: u16,
    sx: f64,
    sy: f64,
}

impl Viewport {
    fn new(view: &FrameView<'_>, width: u16, height: u16) -> Self {
        let cols = width.saturating_sub(2).max(1) as f64;
        let rows = height.saturating_sub(4).max(1) as f64;
        Self {
            width,
            height,
            sx: cols / view.canvas_width,
            sy: rows / view.canvas_height,
        }
    }

    fn col(&self, x: f64) -> i32 {
        1 + (x * self.sx).floor() as i32
    }

    fn row(&self, y: f64) -> i32 {
        2 + (y * self.sy).floor() as i32
    }

    fn in_bounds(&self, col: i32, row: i32) -> bool {
        col >= 1 && col < self.width as i32 - 1 && row >= 2 && row < self.height as i32 - 2
    }

    /// Cells covered by `rect`, at least one in each direction.
    fn cells(&self, rect: &Rect) -> (i32, i32, i32, i32) {
        let left = self.col(rect.x);
        let top = self.row(rect.y);
        let right = self.col(rect.right()).max(left + 1);
        let bottom = self.row(rect.bottom()).max(top + 1);
        (left, top, right, bottom)
    }
}

fn put<W: Write>(out: &mut W, vp: &Viewport, col: i32, row: i32, s: &str) -> std::io::Result<()> {
    if vp.in_bounds(col, row) {
        out.queue(cursor::MoveTo(col as u16, row as u16))?;
        out.queue(Print(s))?;
    }
    Ok(())
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame into a `width` × `height` terminal.
pub fn render<W: Write>(
    out: &mut W,
    view: &FrameView<'_>,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let vp = Viewport::new(view, width, height);

    draw_border(out, &vp)?;
    draw_hud(out, view, &vp)?;
    draw_background(out, view, &vp)?;
    draw_platform(out, view, &vp)?;

    for obstacle in &view.obstacles {
        draw_obstacle(out, obstacle, &vp)?;
    }

    draw_penguin(out, view, &vp)?;
    draw_controls_hint(out, &vp)?;

    if view.show_start_hint {
        draw_start_hint(out, &vp)?;
    }
    if view.status == RunStatus::GameOver {
        draw_game_over(out, view, &vp)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, vp: &Viewport) -> std::io::Result<()> {
    let w = vp.width as usize;
    let h = vp.height;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(vp.width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, view: &FrameView<'_>, vp: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score: {:>6}", view.score)))?;

    let title = "~ PENGUIN RUN ~";
    let tx = (vp.width / 2).saturating_sub(title.len() as u16 / 2);
    out.queue(cursor::MoveTo(tx, 0))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    Ok(())
}

// ── Scenery ───────────────────────────────────────────────────────────────────

fn draw_background<W: Write>(out: &mut W, view: &FrameView<'_>, vp: &Viewport) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_SKY))?;
    let shift = view.background_offset % FLAKE_SPACING_PX;
    let mut x = -shift;
    let mut i = 0usize;
    while x < view.canvas_width {
        // Stagger flakes over three bands of sky.
        let y = view.platform_level * (0.15 + 0.25 * (i % 3) as f64);
        put(out, vp, vp.col(x), vp.row(y), "·")?;
        x += FLAKE_SPACING_PX;
        i += 1;
    }
    Ok(())
}

fn draw_platform<W: Write>(out: &mut W, view: &FrameView<'_>, vp: &Viewport) -> std::io::Result<()> {
    let top = vp.row(view.platform_level);
    let bottom = vp.row(view.canvas_height).max(top + 1);
    let first_col = vp.col(0.0);
    let last_col = vp.col(view.canvas_width);

    out.queue(style::SetForegroundColor(C_PLATFORM))?;
    for row in top..bottom {
        let fill = if row == top { "▀" } else { "█" };
        for col in first_col..last_col {
            put(out, vp, col, row, fill)?;
        }
    }

    // Block seams scroll with the platform.
    out.queue(style::SetForegroundColor(C_PLATFORM_SEAM))?;
    let mut x = -(view.platform_offset % BLOCK_PX);
    while x < view.canvas_width {
        put(out, vp, vp.col(x), top, "▚")?;
        x += BLOCK_PX;
    }
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_obstacle<W: Write>(out: &mut W, obstacle: &ObstacleView<'_>, vp: &Viewport) -> std::io::Result<()> {
    let (left, top, right, bottom) = vp.cells(&obstacle.rect);
    match obstacle.kind {
        ObstacleKind::Ground(GroundSprite::SnowMan) => {
            out.queue(style::SetForegroundColor(C_SNOWMAN))?;
            for row in top..bottom {
                let glyph = if row == top { "o" } else { "O" };
                for col in left..right {
                    put(out, vp, col, row, glyph)?;
                }
            }
        }
        ObstacleKind::Ground(sprite) => {
            // Alternate fill per block variant so neighbours stay distinct.
            let glyph = match sprite {
                GroundSprite::Block1 | GroundSprite::Block4 => "▓",
                GroundSprite::Block2 | GroundSprite::Block5 => "▒",
                _ => "█",
            };
            out.queue(style::SetForegroundColor(C_BLOCK))?;
            for row in top..bottom {
                for col in left..right {
                    put(out, vp, col, row, glyph)?;
                }
            }
        }
        ObstacleKind::Flying { .. } => {
            out.queue(style::SetForegroundColor(C_SNOWBALL))?;
            let glyph = SNOWBALL_CELLS[obstacle.anim_cell % SNOWBALL_CELLS.len()];
            for row in top..bottom {
                for col in left..right {
                    put(out, vp, col, row, glyph)?;
                }
            }
        }
    }
    Ok(())
}

fn draw_penguin<W: Write>(out: &mut W, view: &FrameView<'_>, vp: &Viewport) -> std::io::Result<()> {
    // Head row plus a body row that carries the animation cell:
    //   (o>      ← head
    //   /█\      ← walk / jump / die body
    let (left, top, _, bottom) = vp.cells(&view.player);
    let (color, head, body) = match view.pose {
        PenguinPose::Walk => {
            let legs = ["/█\\", "|█|", "\\█/", "|█|"];
            (C_PENGUIN, "(o>", legs[view.pose_cell % legs.len()])
        }
        PenguinPose::Jump => {
            let wings = ["\\█/", "-█-", "/█\\"];
            (C_PENGUIN, "(o>", wings[view.pose_cell % wings.len()])
        }
        PenguinPose::Die => {
            let slump = ["/█\\", "_█_", "___", "___"];
            (C_PENGUIN_DEAD, "(x>", slump[view.pose_cell % slump.len()])
        }
    };

    out.queue(style::SetForegroundColor(color))?;
    put(out, vp, left, top, head)?;
    for row in top + 1..bottom {
        put(out, vp, left, row, body)?;
    }
    Ok(())
}

// ── Messages ──────────────────────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, vp: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, vp.height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("SPACE / ↑ : Jump   Q : Quit"))?;
    Ok(())
}

fn draw_centered<W: Write>(
    out: &mut W,
    vp: &Viewport,
    start_row: u16,
    lines: &[(&str, Color)],
) -> std::io::Result<()> {
    let cx = vp.width / 2;
    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }
    Ok(())
}

fn draw_start_hint<W: Write>(out: &mut W, vp: &Viewport) -> std::io::Result<()> {
    let row = vp.height / 2;
    draw_centered(out, vp, row, &[("Press SPACE to jump!", Color::White)])
}

fn draw_game_over<W: Write>(out: &mut W, view: &FrameView<'_>, vp: &Viewport) -> std::io::Result<()> {
    let score_line = format!("Final Score: {}", view.score);
    let lines: &[(&str, Color)] = &[
        ("╔══════════════════╗", Color::Red),
        ("║    GAME  OVER    ║", Color::Red),
        ("╚══════════════════╝", Color::Red),
        (score_line.as_str(), Color::Yellow),
        ("SPACE - Play Again  Q - Quit", Color::White),
    ];
    let start_row = (vp.height / 2).saturating_sub(lines.len() as u16 / 2);
    draw_centered(out, vp, start_row, lines)
}
