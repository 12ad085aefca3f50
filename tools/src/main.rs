//! petri-runner: headless dish runner for PetriVerse.
//!
//! Usage:
//!   petri-runner --seed 42 --seconds 120 --fps 30 --db dish.db
//!   petri-runner --seed 42 --ipc-mode

use anyhow::Result;
use petriverse_core::{
    clock::SystemClock,
    config::MAX_FRAME_DELTA,
    environment::Environment,
    rng::PcgSource,
    session::{SimCommand, SimSession},
    state::SimulationState,
    store::SimStore,
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Step { delta: f64 },
    Command { command: SimCommand },
    Quit,
}

#[derive(serde::Serialize)]
struct UiState<'a> {
    tick: f64,
    organisms: usize,
    predators: usize,
    foods: usize,
    max_generation: u32,
    encyclopedia: usize,
    environment: &'a Environment,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let seconds = parse_arg(&args, "--seconds", 120.0f64);
    let fps = parse_arg(&args, "--fps", 30.0f64);
    let feed_every = parse_arg(&args, "--feed-every", 0.0f64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let db = args
        .windows(2)
        .find(|w| w[0] == "--db")
        .map(|w| w[1].as_str())
        .unwrap_or(":memory:");

    if !ipc_mode {
        println!("PetriVerse — petri-runner");
        println!("  seed:    {seed}");
        println!("  seconds: {seconds}");
        println!("  fps:     {fps}");
        println!("  db:      {db}");
        println!();
    }

    let store = if db == ":memory:" {
        SimStore::in_memory()?
    } else {
        SimStore::open(db)?
    };
    store.migrate()?;

    let mut session = SimSession::with_parts(store, PcgSource::seeded(seed), SystemClock)?;

    if ipc_mode {
        run_ipc_loop(&mut session)?;
    } else {
        run_frame_loop(&mut session, seconds, fps, feed_every);
        print_summary(session.state());
    }

    Ok(())
}

/// Drive the dish the way a rendering host would: one advance per frame
/// with the delta clamped to the engine's sane maximum.
fn run_frame_loop(
    session: &mut SimSession<PcgSource, SystemClock>,
    seconds: f64,
    fps: f64,
    feed_every: f64,
) {
    let delta = (1.0 / fps).min(MAX_FRAME_DELTA);
    let frames = (seconds * fps) as u64;
    let mut since_feed = 0.0;

    for _ in 0..frames {
        session.advance(delta);
        if feed_every > 0.0 {
            since_feed += delta;
            if since_feed >= feed_every {
                since_feed = 0.0;
                session.feed_with_type(petriverse_core::food::FoodType::High, 45.0);
            }
        }
    }
}

fn run_ipc_loop(session: &mut SimSession<PcgSource, SystemClock>) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{err_json}")?;
                stdout.flush()?;
                continue;
            }
        };

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::Step { delta } => {
                session.advance(delta.clamp(0.0, MAX_FRAME_DELTA));
                writeln!(stdout, "{}", serde_json::to_string(&ui_state(session.state()))?)?;
            }
            IpcCommand::GetState => {
                writeln!(stdout, "{}", serde_json::to_string(session.state())?)?;
            }
            IpcCommand::Command { command } => {
                session.apply(command);
                writeln!(stdout, "{}", serde_json::to_string(&ui_state(session.state()))?)?;
            }
        }
        stdout.flush()?;
    }
    Ok(())
}

fn ui_state(state: &SimulationState) -> UiState<'_> {
    UiState {
        tick: state.tick,
        organisms: state.organisms.len(),
        predators: state.predators.len(),
        foods: state.foods.len(),
        max_generation: state
            .organisms
            .iter()
            .map(|o| o.generation)
            .max()
            .unwrap_or(0),
        encyclopedia: state.encyclopedia.len(),
        environment: &state.environment,
    }
}

fn print_summary(state: &SimulationState) {
    println!("=== RUN SUMMARY ===");
    println!("  final tick:     {:.1}", state.tick);
    println!("  organisms:      {}", state.organisms.len());
    println!(
        "  max generation: {}",
        state
            .organisms
            .iter()
            .map(|o| o.generation)
            .max()
            .unwrap_or(0)
    );
    println!("  predators:      {}", state.predators.len());
    println!("  foods:          {}", state.foods.len());
    println!("  encyclopedia:   {}", state.encyclopedia.len());
    println!(
        "  environment:    {:.1} °C, oxygen {:.2}, pH {:.1}, mutation {:.2}",
        state.environment.temperature,
        state.environment.oxygen,
        state.environment.acidity,
        state.environment.mutation_rate
    );

    println!();
    println!("=== RECENT HISTORY ===");
    if state.evolution_log.is_empty() {
        println!("  (Nothing happened yet)");
    } else {
        for entry in state.evolution_log.iter().take(8) {
            println!("  [{:?}] {}", entry.tone, entry.message);
        }
    }
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
