// Threat Feed Runner: drives the engine on the wall clock without a browser
//
// Usage:
//   cargo run --bin feed                                  # 10 ticks, default 2 s period
//   cargo run --bin feed -- --ticks 30 --period-ms 250    # faster cadence
//   cargo run --bin feed -- --seed 42 --vote escalate     # scripted vote after tick 1
//   cargo run --bin feed -- --params overrides.json       # JSON parameter overrides
//   cargo run --bin feed -- --jsonl feed/run.jsonl        # per-tick JSONL output

mod time_series;

use std::path::PathBuf;
use std::time::Duration;

use threat_index_engine::clock::{Clock, SystemClock};
use threat_index_engine::{EngineParams, ThreatEngine, Vote};
use time_series::TimeSeriesRecorder;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

// ─── CLI Parsing ────────────────────────────────────────────────────────────

struct CliArgs {
    ticks: u64,
    seed: u64,
    period_ms: Option<u64>,
    params: Option<PathBuf>,
    votes: Vec<Vote>,
    jsonl: Option<PathBuf>,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut cli = CliArgs {
        ticks: 10,
        seed: 0,
        period_ms: None,
        params: None,
        votes: Vec::new(),
        jsonl: None,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--ticks" => {
                i += 1;
                if i < args.len() {
                    cli.ticks = args[i].parse().unwrap_or(10);
                }
            }
            "--seed" => {
                i += 1;
                if i < args.len() {
                    cli.seed = args[i].parse().unwrap_or(0);
                }
            }
            "--period-ms" => {
                i += 1;
                if i < args.len() {
                    cli.period_ms = args[i].parse().ok();
                }
            }
            "--params" => {
                i += 1;
                if i < args.len() {
                    cli.params = Some(PathBuf::from(&args[i]));
                }
            }
            "--vote" => {
                i += 1;
                match args.get(i).and_then(|raw| Vote::parse(raw)) {
                    Some(vote) => cli.votes.push(vote),
                    None => eprintln!("Ignoring unknown vote: {:?}", args.get(i)),
                }
            }
            "--jsonl" => {
                i += 1;
                if i < args.len() {
                    cli.jsonl = Some(PathBuf::from(&args[i]));
                }
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
            }
        }
        i += 1;
    }

    cli
}

fn init_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(true).init();
}

fn load_params(cli: &CliArgs) -> Result<EngineParams, String> {
    let mut params = match &cli.params {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
            EngineParams::from_json(&raw).map_err(|e| e.to_string())?
        }
        None => EngineParams::default(),
    };
    if let Some(period_ms) = cli.period_ms {
        params.tick_period_ms = period_ms;
    }
    params.validate().map_err(|e| e.to_string())?;
    Ok(params)
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() {
    init_logger();
    let cli = parse_args();

    let params = match load_params(&cli) {
        Ok(params) => params,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    let mut engine = match ThreatEngine::with_params(params, cli.seed) {
        Ok(engine) => engine,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    info!(
        seed = cli.seed,
        ticks = cli.ticks,
        index = engine.index(),
        price = engine.price(),
        "threat feed initialised"
    );

    let clock = SystemClock;
    let mut recorder = cli.jsonl.as_ref().map(|_| TimeSeriesRecorder::new());
    engine.start_at(clock.now_ms());

    while engine.tick_count() < cli.ticks {
        let wait = engine
            .scheduler()
            .time_until_due(clock.now_ms())
            .unwrap_or(engine.params().tick_period_ms);
        std::thread::sleep(Duration::from_millis(wait));

        let result = match engine.poll_clock(&clock) {
            Ok(Some(result)) => result,
            Ok(None) => continue,
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        };

        info!(
            tick = result.tick,
            index = %format!("{:.2}", result.admitted.value),
            price = %format!("{:.7}", result.price),
            risk = ?result.snapshot.risk,
            "index update"
        );
        if let Some(ref mut ts) = recorder {
            ts.record(&result);
        }

        if result.tick == 1 {
            for vote in &cli.votes {
                let outcome = engine.cast(*vote);
                info!(?outcome, ledger = ?engine.ledger(), "scripted vote");
            }
        }
    }

    engine.stop_feed();

    if let (Some(path), Some(ts)) = (&cli.jsonl, &recorder) {
        match ts.write_jsonl(path) {
            Ok(()) => info!(rows = ts.len(), path = %path.display(), "time series written"),
            Err(e) => {
                error!("failed to write {}: {}", path.display(), e);
                std::process::exit(1);
            }
        }
    }
}
