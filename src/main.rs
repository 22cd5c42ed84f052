use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{ExecutableCommand, QueueableCommand};
use hupman::{Decision, Engine, GameState, MazeGraph, Outcome, Pos, SessionConfig};
use log::info;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::io::{self, Stdout, Write};
use std::thread;
use std::time::{Duration, Instant};
use unicode_width::UnicodeWidthStr;

const CELL_W: usize = 2;
const DEFAULT_TICK_MS: u64 = 120;

/// Wall codes per cell: 0 open, 1 top, 2 right, 3 top and right.
const SAMPLE_MAZE: [[u8; 11]; 9] = [
    [0, 0, 0, 2, 0, 0, 0, 2, 0, 0, 0],
    [0, 1, 1, 0, 0, 1, 0, 0, 1, 1, 0],
    [0, 2, 0, 0, 3, 0, 2, 0, 0, 2, 0],
    [0, 0, 1, 1, 0, 0, 0, 1, 1, 0, 0],
    [2, 0, 0, 2, 0, 1, 0, 2, 0, 0, 0],
    [0, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0],
    [0, 0, 2, 1, 1, 0, 1, 1, 2, 0, 0],
    [0, 1, 0, 0, 0, 2, 0, 0, 0, 1, 0],
    [0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0],
];
const AGENT_START: Pos = Pos::new(5, 8);
const ADVERSARY_STARTS: [Pos; 2] = [Pos::new(0, 0), Pos::new(10, 0)];

#[derive(Clone, Copy, PartialEq)]
enum Glyph {
    Agent,
    Adversary,
    Caught,
    Wall,
    Empty,
    Pellet,
}

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    glyph: Glyph,
    color: Color,
}

/// Draws the maze on a lattice where cell `(x, y)` sits at `(2x + 1, 2y + 1)`
/// and the points between cells are wall segments.
struct Renderer {
    last: Vec<Cell>,
    last_hud: String,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
    lattice_w: usize,
    lattice_h: usize,
}

impl Renderer {
    fn new(graph: &MazeGraph) -> Self {
        let lattice_w = graph.width() * 2 + 1;
        let lattice_h = graph.height() * 2 + 1;
        Self {
            last: vec![
                Cell {
                    glyph: Glyph::Empty,
                    color: Color::Reset,
                };
                lattice_w * lattice_h
            ],
            last_hud: String::new(),
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
            lattice_w,
            lattice_h,
        }
    }
}

fn main() -> io::Result<()> {
    env_logger::init();

    let config = SessionConfig::from_env();
    let rows: Vec<Vec<u8>> = SAMPLE_MAZE.iter().map(|row| row.to_vec()).collect();
    let mut engine = Engine::from_codes(&rows, config).map_err(io::Error::other)?;
    let state = initial_state(engine.graph())?;

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout, &mut engine, state);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn initial_state(graph: &MazeGraph) -> io::Result<GameState> {
    let starts: Vec<Pos> = std::iter::once(AGENT_START)
        .chain(ADVERSARY_STARTS)
        .collect();
    if let Some(p) = starts.iter().find(|p| !graph.contains(**p)) {
        return Err(io::Error::other(hupman::Error::UnknownCell(*p)));
    }
    let pellets: Vec<Pos> = graph.positions().filter(|p| !starts.contains(p)).collect();
    Ok(GameState::new(
        AGENT_START,
        ADVERSARY_STARTS.to_vec(),
        pellets,
    ))
}

fn run(stdout: &mut Stdout, engine: &mut Engine, mut state: GameState) -> io::Result<()> {
    let (tick_ms, seed) = read_driver_settings();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut renderer = Renderer::new(engine.graph());
    info!("session {:?}, seed {}", engine.config(), seed);

    loop {
        let tick_start = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && key.code == KeyCode::Char('q') {
                    return Ok(());
                }
            }
        }

        match engine.decide(&state, &mut rng).map_err(io::Error::other)? {
            Decision::Next(next) => state = next,
            Decision::Finished(outcome) => {
                render(stdout, engine, &state, &mut renderer)?;
                return render_game_over(stdout, &renderer, &state, outcome);
            }
        }
        render(stdout, engine, &state, &mut renderer)?;

        let elapsed = tick_start.elapsed();
        let tick = Duration::from_millis(tick_ms);
        if elapsed < tick {
            thread::sleep(tick - elapsed);
        }
    }
}

fn read_driver_settings() -> (u64, u64) {
    let tick_ms = std::env::var("HUPMAN_TICK_MS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_TICK_MS);
    let seed = std::env::var("HUPMAN_SEED")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or_else(rand::random);
    (tick_ms, seed)
}

fn render(
    stdout: &mut Stdout,
    engine: &Engine,
    state: &GameState,
    renderer: &mut Renderer,
) -> io::Result<()> {
    let needed_h = (renderer.lattice_h + 2) as u16;
    let needed_w = (renderer.lattice_w * CELL_W) as u16;

    stdout.queue(MoveTo(0, 0))?;

    let (term_w, term_h) = terminal::size()?;
    if term_w < needed_w || term_h < needed_h {
        stdout.queue(Clear(ClearType::All))?;
        let msg = format!(
            "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
            needed_w, needed_h, term_w, term_h
        );
        stdout.queue(Print(msg))?;
        stdout.flush()?;
        renderer.needs_full = true;
        return Ok(());
    }

    let origin_x = (term_w - needed_w) / 2;
    let origin_y = (term_h - needed_h) / 2 + 1;
    if origin_x != renderer.origin_x || origin_y != renderer.origin_y {
        renderer.origin_x = origin_x;
        renderer.origin_y = origin_y;
        renderer.needs_full = true;
    }

    let stats = engine.last_stats();
    let hud = format!(
        "Pellets: {}  Steps: {}  Turn: {}  Searched: {}  Profile: {}  (q to quit)",
        state.pellets().len(),
        state.steps(),
        state.turn(),
        stats.nodes,
        engine.config().profile
    );
    if renderer.needs_full || hud != renderer.last_hud {
        stdout.queue(MoveTo(renderer.origin_x, renderer.origin_y - 1))?;
        stdout.queue(SetForegroundColor(Color::White))?;
        stdout.queue(Clear(ClearType::CurrentLine))?;
        stdout.queue(Print(&hud))?;
        stdout.queue(ResetColor)?;
        renderer.last_hud = hud;
    }

    for ly in 0..renderer.lattice_h {
        for lx in 0..renderer.lattice_w {
            let cell = cell_for(engine.graph(), state, lx, ly);
            let idx = ly * renderer.lattice_w + lx;
            if renderer.needs_full || cell != renderer.last[idx] {
                renderer.last[idx] = cell;
                draw_cell(stdout, renderer, lx, ly, cell)?;
            }
        }
    }
    renderer.needs_full = false;

    stdout.flush()?;
    Ok(())
}

fn cell_for(graph: &MazeGraph, state: &GameState, lx: usize, ly: usize) -> Cell {
    let wall = Cell {
        glyph: Glyph::Wall,
        color: Color::Blue,
    };
    let empty = Cell {
        glyph: Glyph::Empty,
        color: Color::Reset,
    };
    let last_x = graph.width() * 2;
    let last_y = graph.height() * 2;

    match (lx % 2 == 1, ly % 2 == 1) {
        (false, false) => wall,
        (false, true) => {
            // Edge between (lx/2 - 1, y) and (lx/2, y).
            if lx == 0 || lx == last_x {
                return wall;
            }
            let left = Pos::new(lx / 2 - 1, ly / 2);
            match graph.walls_at(left) {
                Some(code) if code.blocks_right() => wall,
                _ => empty,
            }
        }
        (true, false) => {
            // Edge between (x, ly/2 - 1) and (x, ly/2).
            if ly == 0 || ly == last_y {
                return wall;
            }
            let below = Pos::new(lx / 2, ly / 2);
            match graph.walls_at(below) {
                Some(code) if code.blocks_top() => wall,
                _ => empty,
            }
        }
        (true, true) => {
            let pos = Pos::new(lx / 2, ly / 2);
            if pos == state.agent() {
                if state.is_dead() {
                    return Cell {
                        glyph: Glyph::Caught,
                        color: Color::Red,
                    };
                }
                return Cell {
                    glyph: Glyph::Agent,
                    color: Color::Yellow,
                };
            }
            if state.adversaries().contains(&pos) {
                return Cell {
                    glyph: Glyph::Adversary,
                    color: Color::Red,
                };
            }
            if state.pellets().contains(&pos) {
                return Cell {
                    glyph: Glyph::Pellet,
                    color: Color::White,
                };
            }
            empty
        }
    }
}

fn draw_cell(stdout: &mut Stdout, renderer: &Renderer, lx: usize, ly: usize, cell: Cell) -> io::Result<()> {
    let (text, color) = match cell.glyph {
        Glyph::Agent => ("😃", cell.color),
        Glyph::Adversary => ("👻", cell.color),
        Glyph::Caught => ("😱", cell.color),
        Glyph::Wall => ("██", cell.color),
        Glyph::Empty => ("  ", cell.color),
        Glyph::Pellet => ("· ", cell.color),
    };
    let x_pos = renderer.origin_x + (lx * CELL_W) as u16;
    let y_pos = renderer.origin_y + ly as u16;
    stdout.queue(MoveTo(x_pos, y_pos))?;
    stdout.queue(SetForegroundColor(color))?;
    stdout.queue(Print(text))?;
    let w = UnicodeWidthStr::width(text);
    if w < CELL_W {
        for _ in 0..(CELL_W - w) {
            stdout.queue(Print(' '))?;
        }
    }
    stdout.queue(ResetColor)?;
    Ok(())
}

fn render_game_over(
    stdout: &mut Stdout,
    renderer: &Renderer,
    state: &GameState,
    outcome: Outcome,
) -> io::Result<()> {
    let banner = match outcome {
        Outcome::Cleared => "MAZE CLEARED",
        Outcome::Caught => "CAUGHT",
    };
    stdout.queue(MoveTo(
        renderer.origin_x,
        renderer.origin_y + renderer.lattice_h as u16,
    ))?;
    stdout.queue(Print(format!(
        "{} after {} steps (press q to quit)",
        banner,
        state.steps()
    )))?;
    stdout.flush()?;
    loop {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && key.code == KeyCode::Char('q') {
                    return Ok(());
                }
            }
        }
    }
}
