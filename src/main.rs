//! Slime Jump entry point
//!
//! Native builds run headless: the autopilot plays a number of runs
//! back-to-back and a summary is printed per run. The browser build is
//! driven from JavaScript through `slime_jump::web`.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use anyhow::{Context, Result, anyhow};
    use clap::Parser;
    use serde::Serialize;

    use slime_jump::persistence::JsonFileStore;
    use slime_jump::sim::{DeathCause, GameEvent, autopilot_input};
    use slime_jump::{Run, Tuning};

    #[derive(Parser, Debug)]
    #[command(name = "slime-jump", about = "Headless autopilot runs of Slime Jump")]
    struct Args {
        /// Seed of the first run (later runs use seed + run index)
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// Tick limit per run
        #[arg(long, default_value_t = 60 * 60 * 5)]
        max_ticks: u64,
        /// Number of runs
        #[arg(long, default_value_t = 1)]
        runs: u32,
        /// Best score file
        #[arg(long, default_value = "slime-jump-score.json")]
        store: PathBuf,
        /// Tuning overrides (JSON)
        #[arg(long)]
        tuning: Option<PathBuf>,
        /// Print summaries as JSON lines
        #[arg(long)]
        json: bool,
    }

    #[derive(Debug, Serialize)]
    struct RunSummary {
        run: u32,
        seed: u64,
        ticks: u64,
        score: u64,
        best: u64,
        jumps: u32,
        pickups: u32,
        death: Option<DeathCause>,
    }

    pub fn main() -> Result<()> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        let args = Args::parse();
        if args.max_ticks == 0 {
            return Err(anyhow!("max_ticks must be > 0"));
        }

        let tuning = match &args.tuning {
            Some(path) => Tuning::load(path),
            None => Tuning::default(),
        };
        tuning.validate().context("invalid tuning")?;

        log::info!("Slime Jump (headless) starting...");
        let mut run = Run::new(args.seed, tuning, JsonFileStore::new(&args.store));

        for index in 0..args.runs {
            let seed = args.seed.wrapping_add(index as u64);
            if index > 0 {
                run.restart(seed);
            }
            let summary = play(&mut run, index, seed, args.max_ticks);
            if args.json {
                let line = serde_json::to_string(&summary).context("encoding run summary")?;
                println!("{}", line);
            } else {
                println!(
                    "run {:>3}  seed {:<20} ticks {:>7}  score {:>5}  best {:>5}  jumps {:>4}  pickups {:>4}  {}",
                    summary.run,
                    summary.seed,
                    summary.ticks,
                    summary.score,
                    summary.best,
                    summary.jumps,
                    summary.pickups,
                    match summary.death {
                        Some(cause) => format!("died: {:?}", cause),
                        None => "survived".to_string(),
                    }
                );
            }
        }
        Ok(())
    }

    fn play(run: &mut Run<JsonFileStore>, index: u32, seed: u64, max_ticks: u64) -> RunSummary {
        let mut jumps = 0;
        let mut pickups = 0;
        let mut death = None;

        while run.state().time_ticks < max_ticks && !run.is_dead() {
            let input = autopilot_input(run.state());
            run.step(&input);
            for event in run.drain_events() {
                log::debug!("tick {}: {:?}", run.state().time_ticks, event);
                match event {
                    GameEvent::JumpImpulse => jumps += 1,
                    GameEvent::PickupCollected { .. } => pickups += 1,
                    GameEvent::Died { cause } => death = Some(cause),
                    _ => {}
                }
            }
        }

        RunSummary {
            run: index,
            seed,
            ticks: run.state().time_ticks,
            score: run.score(),
            best: run.best_score(),
            jumps,
            pickups,
            death,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    headless::main()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser entry point is `slime_jump::web::wasm_start`
}
