use anyhow::{bail, Context, Result};
use clap::Parser;
use sketch_calc::calc::typeset::TerminalTypesetter;
use sketch_calc::calc::HttpSolver;
use sketch_calc::draw::raster::RasterSurface;
use sketch_calc::draw::{settings_store, EngineEvent, SketchEngine};
use sketch_calc::logging;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

const REVEAL_POLL: Duration = Duration::from_millis(50);

/// Sends a sketch to the calculation service and prints the placed answers.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct CliArgs {
    /// Settings file; defaults to the one next to the executable.
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Overrides the configured calculation service URL.
    #[arg(long)]
    api_url: Option<String>,
    /// PNG sketch to import.
    image: PathBuf,
}

fn main() -> Result<()> {
    let args = CliArgs::parse();
    let mut settings = settings_store::load(args.settings.as_deref())?;
    if let Some(url) = args.api_url {
        settings.api_url = url;
        settings.sanitize();
    }
    logging::init(settings.debug_logging);

    let bytes = std::fs::read(&args.image)
        .with_context(|| format!("read sketch {}", args.image.display()))?;
    let sketch = RasterSurface::decode_png(&bytes)?;

    let solver = Arc::new(HttpSolver::new(&settings.api_url, settings.request_timeout())?);
    tracing::info!(endpoint = solver.endpoint(), "using calculation service");
    let wait = settings.request_timeout() + Duration::from_secs(1);
    let mut engine = SketchEngine::with_typesetter(
        settings,
        sketch.size(),
        solver,
        Box::new(TerminalTypesetter::new(std::io::stderr())),
    );
    engine.import(&sketch);
    engine.tick(Instant::now());

    engine.calculate()?;
    let events = engine.wait_for_calculation(wait);
    if let Some(err) = engine.take_last_error() {
        eprintln!("{err}");
        std::process::exit(1);
    }
    if !events
        .iter()
        .any(|event| matches!(event, EngineEvent::CalculationCompleted { .. }))
    {
        bail!("no answer from the calculation service within {wait:?}");
    }

    while !engine.pending_reveals().is_empty() {
        std::thread::sleep(REVEAL_POLL);
        engine.tick(Instant::now());
    }

    let overlays: Vec<_> = engine
        .overlays()
        .records()
        .iter()
        .map(|record| {
            serde_json::json!({
                "x": record.position.x,
                "y": record.position.y,
                "markup": record.entry.display,
            })
        })
        .collect();
    let summary = serde_json::json!({
        "overlays": overlays,
        "variables": engine.variables().get_all(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
