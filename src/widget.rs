use crate::config::Args;
use crate::driver::{Control, Driver};
use crate::graphics::Canvas;
use crate::render::{render, RenderParams, Surface};
use crate::state::{Simulator, Snapshot};
use crate::terminal::{self, TerminalGuard};
use anyhow::{Context, Result};
use crossterm::cursor::MoveTo;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Color, Print, SetBackgroundColor, SetForegroundColor, Stylize};
use crossterm::QueueableCommand;
use std::io::{self, Write};
use std::time::{Duration, Instant};

/// Upper bound on how long the UI waits for input before checking for new snapshots
const FRAME: Duration = Duration::from_millis(16);

/// What the main loop should do after an event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reaction {
    Ignore,
    Redraw,
    Send(Control),
    Quit,
}

/// Spring view drawn into the terminal
pub struct SpringWidget {
    args: Args,
    params: RenderParams,
    surface: Surface,
    canvas: Canvas,
    snapshot: Snapshot,
    debug: bool,
    dirty: bool,
    frames_since_last_update: usize,
    last_fps_calculation: Instant,
    fps: f64,
}

impl SpringWidget {
    pub fn new(args: &Args, cols: u16, rows: u16, snapshot: Snapshot) -> Self {
        let canvas = Canvas::for_terminal(cols, rows);
        let surface = surface_for(args, &canvas);
        SpringWidget {
            args: args.clone(),
            params: args.render_params(),
            surface,
            canvas,
            snapshot,
            debug: args.debug,
            dirty: true,
            frames_since_last_update: 0,
            last_fps_calculation: Instant::now(),
            fps: 0.0,
        }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Pause state as last reported by the ticker
    pub fn is_paused(&self) -> bool {
        self.snapshot.paused
    }

    pub fn needs_paint(&self) -> bool {
        self.dirty
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.canvas = Canvas::for_terminal(cols, rows);
        self.surface = surface_for(&self.args, &self.canvas);
        self.dirty = true;
        log::debug!(
            "resized to {cols}x{rows} cells, scale {:.4}",
            self.surface.scale
        );
    }

    pub fn update(&mut self, snapshot: Snapshot) {
        if snapshot != self.snapshot {
            self.snapshot = snapshot;
            self.dirty = true;
        }
    }

    /// Handle events for the spring widget
    pub fn event(&mut self, event: &Event) -> Reaction {
        match event {
            Event::Key(key) => self.key(key),
            Event::Resize(cols, rows) => {
                self.resize(*cols, *rows);
                Reaction::Redraw
            }
            _ => Reaction::Ignore,
        }
    }

    fn key(&mut self, key: &KeyEvent) -> Reaction {
        if key.kind != KeyEventKind::Press {
            return Reaction::Ignore;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Reaction::Quit,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Reaction::Quit,
            KeyCode::Char('d') | KeyCode::Char('D') => {
                self.debug = !self.debug;
                self.dirty = true;
                Reaction::Redraw
            }
            KeyCode::Char('p') | KeyCode::Char('P') => Reaction::Send(Control::TogglePause),
            KeyCode::Char('r') | KeyCode::Char('R') if !self.is_paused() => {
                Reaction::Send(Control::Reset)
            }
            _ => Reaction::Ignore,
        }
    }

    /// Paint the spring widget
    pub fn paint<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        // Update FPS calculation
        self.frames_since_last_update += 1;
        let now = Instant::now();
        let duration = now.duration_since(self.last_fps_calculation);
        if duration.as_secs_f64() >= 1.0 {
            self.fps = self.frames_since_last_update as f64 / duration.as_secs_f64();
            self.frames_since_last_update = 0;
            self.last_fps_calculation = now;
        }

        self.canvas.clear();
        for command in render(&self.surface, &self.params, self.snapshot.position) {
            self.canvas.draw(&command);
        }
        self.canvas.present(out)?;

        if self.debug {
            let lines = [
                format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
                format!("Tick: {}", self.snapshot.tick),
                format!(
                    "Position: {:.2}  Velocity: {:.2}",
                    self.snapshot.position, self.snapshot.velocity
                ),
                format!(
                    "Displacement: {:.2}",
                    self.snapshot.position - self.args.equilibrium
                ),
                format!("Scale: {:.4}", self.surface.scale),
                format!("FPS: {:.2}", self.fps),
            ];
            out.queue(SetForegroundColor(Color::White))?;
            out.queue(SetBackgroundColor(Color::Reset))?;
            for (row, line) in lines.iter().enumerate() {
                out.queue(MoveTo(1, row as u16))?;
                out.queue(Print(line))?;
            }
            out.queue(SetForegroundColor(Color::Reset))?;
        }

        // Display 'Paused' if the simulation is paused
        if self.is_paused() {
            let text = "Paused";
            let cols = self.canvas.width();
            let rows = self.canvas.height().div_ceil(2);
            let x = cols.saturating_sub(text.len()) / 2;
            let y = rows / 2;
            out.queue(MoveTo(x as u16, y as u16))?;
            out.queue(Print(text.bold().white().on_black()))?;
        }

        self.dirty = false;
        Ok(())
    }
}

fn surface_for(args: &Args, canvas: &Canvas) -> Surface {
    let width = canvas.width() as f64;
    let height = canvas.height() as f64;
    Surface {
        width,
        height,
        scale: args.scale_for(height),
    }
}

/// Runs the interactive view until the user quits
pub fn run(args: &Args) -> Result<()> {
    let simulator = Simulator::new(args.spring_params());
    let (cols, rows) = terminal::size();
    let mut widget = SpringWidget::new(args, cols, rows, simulator.snapshot());
    log::info!(
        "starting {cols}x{rows}, k={} equilibrium={} displacement={}",
        args.spring_constant,
        args.equilibrium,
        args.displacement
    );

    let mut terminal = TerminalGuard::enter()?;
    let driver = Driver::start(simulator, args.interval())?;
    let poll = args.interval().min(FRAME);

    loop {
        if let Some(snapshot) = driver.latest() {
            widget.update(snapshot);
        }
        if widget.needs_paint() {
            let out = terminal.out();
            widget.paint(out).context("failed to draw frame")?;
            out.flush().context("failed to flush frame")?;
        }
        if event::poll(poll).context("failed to poll terminal events")? {
            let event = event::read().context("failed to read terminal event")?;
            match widget.event(&event) {
                Reaction::Quit => break,
                Reaction::Send(control) => driver.send(control),
                Reaction::Redraw | Reaction::Ignore => {}
            }
        }
    }

    let simulator = driver.stop()?;
    log::info!(
        "stopped after {} ticks at displacement {:.3}",
        simulator.tick(),
        simulator.displacement()
    );
    Ok(())
}
