use std::io;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use clap::Parser;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use term_desktop::constants::Metrics;
use term_desktop::desktop::Desktop;
use term_desktop::dispatch::WindowKind;
use term_desktop::ui::UiFrame;

#[derive(Parser, Debug)]
#[command(
    name = "desk-bench",
    version = env!("CARGO_PKG_VERSION"),
    about = "Drives the desktop with random input offscreen and checks window invariants"
)]
struct BenchCli {
    /// Number of random actions to perform.
    #[arg(short = 'n', long = "steps", value_name = "STEPS", default_value_t = 5_000)]
    steps: u64,

    /// Seed for the action generator. Defaults to the clock.
    #[arg(short = 's', long = "seed", value_name = "SEED")]
    seed: Option<u64>,

    /// Virtual terminal width in cells.
    #[arg(long = "width", default_value_t = 120)]
    width: u16,

    /// Virtual terminal height in cells.
    #[arg(long = "height", default_value_t = 40)]
    height: u16,
}

struct BenchConfig {
    steps: u64,
    seed: u64,
    area: Rect,
}

impl TryFrom<&BenchCli> for BenchConfig {
    type Error = String;

    fn try_from(cli: &BenchCli) -> Result<Self, Self::Error> {
        if !(1..=10_000_000).contains(&cli.steps) {
            return Err("steps must be between 1 and 10000000".to_string());
        }
        if cli.width < 20 || cli.height < 8 {
            return Err("the virtual terminal must be at least 20x8".to_string());
        }
        let seed = cli.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0)
                ^ 0xA5A5_A5A5_1234_5678
        });
        Ok(Self {
            steps: cli.steps,
            seed,
            area: Rect::new(0, 0, cli.width, cli.height),
        })
    }
}

fn main() -> io::Result<()> {
    let args = BenchCli::parse();
    let config = BenchConfig::try_from(&args)
        .map_err(|msg| io::Error::new(io::ErrorKind::InvalidInput, msg))?;

    let stats = run_bench(&config);
    println!("{}", stats.final_report(&config));
    if stats.violations.is_empty() {
        Ok(())
    } else {
        Err(io::Error::other(format!(
            "{} invariant violation(s)",
            stats.violations.len()
        )))
    }
}

fn run_bench(config: &BenchConfig) -> BenchStats {
    let mut desk = Desktop::new(Metrics::cells(), config.area, None);
    let mut rng = Lcg::new(config.seed);
    let mut stats = BenchStats::new();
    let mut buffer = Buffer::empty(config.area);
    let mut clock = Instant::now();

    let mut area = config.area;

    for step in 0..config.steps {
        // spread clicks out so double-clicks only happen when chosen
        clock += Duration::from_millis(rng.below(900) + 50);
        let action = Action::pick(&mut rng);
        let events = action.events(&desk, &mut rng, config.area);
        for event in &events {
            if let Event::Resize(width, height) = event {
                area = Rect::new(0, 0, *width, *height);
            }
            desk.handle_event_at(event, clock);
        }
        match action {
            Action::Launch(kind) => {
                desk.launch(kind);
                desk.pump();
            }
            Action::DoubleClickTitle => {
                if let Some(first) = events.first() {
                    desk.handle_event_at(first, clock + Duration::from_millis(120));
                }
            }
            _ => {}
        }
        stats.record_action(action);

        let frame_start = Instant::now();
        buffer.resize(area);
        buffer.reset();
        let mut frame = UiFrame::from_parts(area, &mut buffer);
        desk.render(&mut frame);
        stats.record_frame(frame_start.elapsed());

        for violation in check_invariants(&desk) {
            stats.violations.push(format!("step {step}: {violation}"));
        }
    }
    stats.final_windows = desk.window_count();
    stats.mark_completed();
    stats
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Launch(WindowKind),
    Click,
    DragTitle,
    Resize,
    DoubleClickTitle,
    Key(KeyCode, KeyModifiers),
    TaskbarClick,
    TerminalResize,
}

impl Action {
    fn pick(rng: &mut Lcg) -> Self {
        match rng.below(20) {
            0..=2 => Action::Launch(WindowKind::ALL[rng.below(WindowKind::ALL.len() as u64) as usize]),
            3..=5 => Action::Click,
            6..=8 => Action::DragTitle,
            9 | 10 => Action::Resize,
            11 => Action::DoubleClickTitle,
            12 => Action::Key(KeyCode::Tab, KeyModifiers::NONE),
            13 => Action::Key(KeyCode::F(11), KeyModifiers::NONE),
            14 => Action::Key(KeyCode::Char('n'), KeyModifiers::CONTROL),
            15 => Action::Key(KeyCode::Char('w'), KeyModifiers::CONTROL),
            16 => Action::Key(KeyCode::F(2), KeyModifiers::NONE),
            17 | 18 => Action::TaskbarClick,
            _ => Action::TerminalResize,
        }
    }

    fn events(self, desk: &Desktop, rng: &mut Lcg, area: Rect) -> Vec<Event> {
        match self {
            Action::Launch(_) => Vec::new(),
            Action::Click => vec![down(rng.below(area.width as u64) as u16, rng.below(area.height as u64) as u16)],
            Action::DragTitle | Action::DoubleClickTitle => {
                let Some((x, y)) = random_title_cell(desk, rng) else {
                    return Vec::new();
                };
                if self == Action::DoubleClickTitle {
                    return vec![down(x, y), up(x, y)];
                }
                let tx = rng.below(area.width as u64) as u16;
                let ty = rng.below(area.height as u64) as u16;
                vec![down(x, y), drag((x + tx) / 2, (y + ty) / 2), drag(tx, ty), up(tx, ty)]
            }
            Action::Resize => {
                let Some((x, y)) = random_grip_cell(desk, rng) else {
                    return Vec::new();
                };
                let tx = rng.below(area.width as u64) as u16;
                let ty = rng.below(area.height as u64) as u16;
                vec![down(x, y), drag(tx, ty), up(tx, ty)]
            }
            Action::Key(code, modifiers) => vec![Event::Key(KeyEvent::new(code, modifiers))],
            Action::TaskbarClick => {
                let row = area.height.saturating_sub(1);
                vec![down(rng.below(area.width as u64) as u16, row)]
            }
            Action::TerminalResize => {
                let width = 40 + rng.below(area.width.saturating_sub(40) as u64 + 1) as u16;
                let height = 12 + rng.below(area.height.saturating_sub(12) as u64 + 1) as u16;
                vec![Event::Resize(width.min(area.width), height.min(area.height))]
            }
        }
    }

    fn label(self) -> &'static str {
        match self {
            Action::Launch(_) => "launch",
            Action::Click => "click",
            Action::DragTitle => "drag",
            Action::Resize => "resize",
            Action::DoubleClickTitle => "double-click",
            Action::Key(..) => "key",
            Action::TaskbarClick => "taskbar",
            Action::TerminalResize => "terminal resize",
        }
    }
}

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
    Event::Mouse(MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

fn down(column: u16, row: u16) -> Event {
    mouse(MouseEventKind::Down(MouseButton::Left), column, row)
}

fn drag(column: u16, row: u16) -> Event {
    mouse(MouseEventKind::Drag(MouseButton::Left), column, row)
}

fn up(column: u16, row: u16) -> Event {
    mouse(MouseEventKind::Up(MouseButton::Left), column, row)
}

/// An on-screen cell of the title row of the front-most visible window.
fn random_title_cell(desk: &Desktop, rng: &mut Lcg) -> Option<(u16, u16)> {
    let entry = desk.registry().windows().into_iter().rev().find(|e| !e.is_minimized)?;
    let bounds = desk.window_bounds(&entry.id)?;
    let left = bounds.x.max(0);
    let right = (bounds.x + bounds.width - 10).max(left + 1);
    let x = left + rng.below((right - left) as u64) as i32;
    Some((u16::try_from(x).ok()?, u16::try_from(bounds.y).ok()?))
}

fn random_grip_cell(desk: &Desktop, rng: &mut Lcg) -> Option<(u16, u16)> {
    let visible: Vec<_> = desk
        .registry()
        .windows()
        .into_iter()
        .filter(|e| !e.is_minimized)
        .collect();
    if visible.is_empty() {
        return None;
    }
    let entry = &visible[rng.below(visible.len() as u64) as usize];
    let bounds = desk.window_bounds(&entry.id)?;
    let x = u16::try_from(bounds.x + bounds.width - 1).ok()?;
    let y = u16::try_from(bounds.y + bounds.height - 1).ok()?;
    Some((x, y))
}

fn check_invariants(desk: &Desktop) -> Vec<String> {
    let mut out = Vec::new();
    let entries = desk.registry().windows();
    let active: Vec<_> = entries.iter().filter(|e| e.is_active).collect();
    if active.len() > 1 {
        out.push(format!("{} windows marked active", active.len()));
    }
    if let Some(active) = active.first()
        && active.is_minimized
    {
        out.push(format!("active window {} is minimized", active.id));
    }
    if entries.windows(2).any(|pair| pair[0].z_index >= pair[1].z_index) {
        out.push("z order is not strictly increasing".to_string());
    }
    if entries.len() != desk.window_count() {
        out.push(format!(
            "registry has {} entries for {} mounted windows",
            entries.len(),
            desk.window_count()
        ));
    }
    let metrics = desk.metrics();
    for window in desk.windows() {
        let geometry = window.surface().geometry();
        let viewport = window.surface().viewport();
        let height = geometry.size.height.fixed();
        if geometry.size.width < 1 || height.is_some_and(|h| h < 1) {
            out.push(format!("{} has a degenerate size", window.surface().id()));
        }
        if !geometry.is_maximized {
            let sliver = metrics.min_header_visible.min(geometry.size.width);
            let x = geometry.position.x;
            if x + geometry.size.width < sliver || x > viewport.width - sliver {
                out.push(format!("{} header is out of reach at x={x}", window.surface().id()));
            }
        }
    }
    out
}

struct BenchStats {
    start: Instant,
    completed_at: Option<Instant>,
    frame_count: u64,
    total_draw_time: Duration,
    slowest_frame: Duration,
    actions: Vec<(&'static str, u64)>,
    final_windows: usize,
    violations: Vec<String>,
}

impl BenchStats {
    fn new() -> Self {
        Self {
            start: Instant::now(),
            completed_at: None,
            frame_count: 0,
            total_draw_time: Duration::ZERO,
            slowest_frame: Duration::ZERO,
            actions: Vec::new(),
            final_windows: 0,
            violations: Vec::new(),
        }
    }

    fn elapsed(&self) -> Duration {
        match self.completed_at {
            Some(done) => done.duration_since(self.start),
            None => self.start.elapsed(),
        }
    }

    fn mark_completed(&mut self) {
        self.completed_at = Some(Instant::now());
    }

    fn record_action(&mut self, action: Action) {
        let label = action.label();
        match self.actions.iter_mut().find(|(name, _)| *name == label) {
            Some((_, count)) => *count += 1,
            None => self.actions.push((label, 1)),
        }
    }

    fn record_frame(&mut self, draw_time: Duration) {
        self.frame_count = self.frame_count.saturating_add(1);
        self.total_draw_time += draw_time;
        self.slowest_frame = self.slowest_frame.max(draw_time);
    }

    fn average_frame_ms(&self) -> f64 {
        if self.frame_count == 0 {
            return 0.0;
        }
        (self.total_draw_time.as_secs_f64() / self.frame_count as f64) * 1_000.0
    }

    fn final_report(&self, config: &BenchConfig) -> String {
        let mut actions = self.actions.clone();
        actions.sort_by(|a, b| b.1.cmp(&a.1));
        let actions = actions
            .iter()
            .map(|(name, count)| format!("{name} {count}"))
            .collect::<Vec<_>>()
            .join(", ");
        let violations = if self.violations.is_empty() {
            "none".to_string()
        } else {
            self.violations
                .iter()
                .take(10)
                .cloned()
                .collect::<Vec<_>>()
                .join("\n  ")
        };
        indoc::formatdoc!(
            r#"
            Desk bench finished {steps} steps in {elapsed:.2}s (seed {seed}).
            Terminal: {width}x{height} | Windows left open: {windows}
            Frames: {frames} | Avg frame: {avg:.3} ms | Worst: {worst:.3} ms
            Actions: {actions}
            Violations: {violations}
            "#,
            steps = config.steps,
            elapsed = self.elapsed().as_secs_f64(),
            seed = config.seed,
            width = config.area.width,
            height = config.area.height,
            windows = self.final_windows,
            frames = self.frame_count,
            avg = self.average_frame_ms(),
            worst = self.slowest_frame.as_secs_f64() * 1_000.0,
        )
    }
}

struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }

    fn below(&mut self, bound: u64) -> u64 {
        if bound == 0 {
            return 0;
        }
        u64::from(self.next()) % bound
    }
}
