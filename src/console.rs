//! Terminal front end.
//!
//! Draws the scene into the alternate screen at roughly 30 fps and feeds key
//! presses back into the session: space toggles cutting, the arrow keys move
//! the volume, q or escape leaves. The tick loop keeps running on its own
//! thread; this loop only reads the scene and sweeps the spark field so
//! leftover sparks fade even while the session is stopped.

use std::io::{stdout, Write};
use std::panic;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode},
    execute, queue, style, terminal,
};

use crate::error::Result;
use crate::scene::{ControlButton, Scene};
use crate::session::SessionController;

// Scene coordinates are mapped onto a fixed character pane
const SCENE_WIDTH: f32 = 300.0;
const SCENE_HEIGHT: f32 = 240.0;
const PANE_COLS: usize = 60;
const PANE_ROWS: usize = 24;

const FRAME: Duration = Duration::from_millis(33);
const FRESH_SPARK_AGE: Duration = Duration::from_millis(500);
const VOLUME_STEP: i32 = 5;

/// Run the interactive view until the user quits
pub fn run(controller: &mut SessionController) -> Result<()> {
    // Restore the terminal before any panic message prints
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        default_hook(info);
    }));

    setup_terminal()?;
    controller.schedule_intro(Instant::now());

    let result = event_loop(controller);
    restore_terminal()?;
    result
}

fn setup_terminal() -> Result<()> {
    terminal::enable_raw_mode()?;
    execute!(
        stdout(),
        terminal::EnterAlternateScreen,
        terminal::DisableLineWrap,
        cursor::Hide
    )?;
    Ok(())
}

fn restore_terminal() -> Result<()> {
    execute!(
        stdout(),
        terminal::LeaveAlternateScreen,
        terminal::EnableLineWrap,
        cursor::Show
    )?;
    terminal::disable_raw_mode()?;
    Ok(())
}

fn event_loop(controller: &mut SessionController) -> Result<()> {
    let mut stdout = stdout();
    loop {
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Char(' ') => controller.toggle()?,
                    KeyCode::Up => {
                        controller.volume().adjust(VOLUME_STEP);
                    }
                    KeyCode::Down => {
                        controller.volume().adjust(-VOLUME_STEP);
                    }
                    _ => {}
                },
                Event::Resize(..) => {
                    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
                }
                _ => {}
            }
        }

        draw(&mut stdout, controller)?;
        thread::sleep(FRAME);
    }
}

/// Paint one frame: pane border, cut line, sparks, status rows
fn draw(stdout: &mut impl Write, controller: &SessionController) -> Result<()> {
    let now = Instant::now();
    let scene = controller.scene();
    let Ok(mut scene) = scene.lock() else {
        return Ok(());
    };
    scene.sparks_mut().sweep(now);

    let grid = paint_pane(&scene, now);

    queue!(
        stdout,
        cursor::MoveTo(0, 0),
        style::Print(format!("┌─ glass cutter {}┐", "─".repeat(PANE_COLS - 15)))
    )?;
    for (row, line) in grid.iter().enumerate() {
        let text: String = line.iter().collect();
        queue!(
            stdout,
            cursor::MoveTo(0, row as u16 + 1),
            style::Print(format!("│{}│", text))
        )?;
    }
    queue!(
        stdout,
        cursor::MoveTo(0, PANE_ROWS as u16 + 1),
        style::Print(format!("└{}┘", "─".repeat(PANE_COLS)))
    )?;

    let volume = controller.volume().get();
    let filled = (volume / 10) as usize;
    let status = format!(
        "state {:<8}  progress {:>3}  volume {:>3}% [{}{}]",
        controller.state(),
        controller.progress(),
        volume,
        "#".repeat(filled),
        "-".repeat(10 - filled),
    );
    let action = match scene.visible_control() {
        ControlButton::Start => "start",
        ControlButton::Stop => "stop",
    };
    let hint = format!("[space] {:<5}  [↑/↓] volume  [q] quit", action);

    queue!(
        stdout,
        cursor::MoveTo(0, PANE_ROWS as u16 + 2),
        style::Print(format!("{:<width$}", status, width = PANE_COLS + 2)),
        cursor::MoveTo(0, PANE_ROWS as u16 + 3),
        style::Print(format!("{:<width$}", hint, width = PANE_COLS + 2))
    )?;

    stdout.flush()?;
    Ok(())
}

/// Stamp the cut line and sparks into a character grid
fn paint_pane(scene: &Scene, now: Instant) -> Vec<Vec<char>> {
    let mut grid = vec![vec![' '; PANE_COLS]; PANE_ROWS];

    let kerf_col = to_col(scene.kerf_x());
    let cut_row = to_row(scene.cut_extent());
    for row in grid.iter_mut().take(cut_row + 1) {
        row[kerf_col] = '│';
    }

    for spark in scene.sparks().sparks() {
        let (x, y) = spark.drifted(now);
        let glyph = if spark.age(now) < FRESH_SPARK_AGE {
            '*'
        } else {
            '.'
        };
        grid[to_row(y)][to_col(x)] = glyph;
    }

    grid
}

fn to_col(x: f32) -> usize {
    let col = (x.max(0.0) / SCENE_WIDTH * PANE_COLS as f32) as usize;
    col.min(PANE_COLS - 1)
}

fn to_row(y: f32) -> usize {
    let row = (y.max(0.0) / SCENE_HEIGHT * PANE_ROWS as f32) as usize;
    row.min(PANE_ROWS - 1)
}
