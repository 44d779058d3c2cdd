//! Cyber Serpent entry point
//!
//! The browser build is driven from JavaScript through `platform::web`, so
//! the wasm binary has nothing to do. Natively this runs headless autopilot
//! games, optionally against a save file.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use anyhow::{Context, Result, bail};

    use cyber_serpent::autopilot::Autopilot;
    use cyber_serpent::persistence::{FileStore, KeyValueStore, MemoryStore};
    use cyber_serpent::{GameConfig, Session};

    /// Fixed frame step for headless runs (60 fps)
    const FRAME_MS: f32 = 1000.0 / 60.0;
    const USAGE: &str = "usage: [--save FILE] [--config FILE] [--seed N] [--runs N]";
    /// Runs longer than this are cut off
    const MAX_RUN_MS: f64 = 10.0 * 60.0 * 1000.0;

    #[derive(Debug)]
    pub struct Args {
        save: Option<PathBuf>,
        config: Option<PathBuf>,
        seed: u64,
        runs: u32,
    }

    impl Args {
        pub fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
            let mut parsed = Args {
                save: None,
                config: None,
                seed: 1,
                runs: 3,
            };
            while let Some(arg) = args.next() {
                let mut value = |name: &str| {
                    args.next()
                        .with_context(|| format!("{} needs a value", name))
                };
                match arg.as_str() {
                    "--save" => parsed.save = Some(PathBuf::from(value("--save")?)),
                    "--config" => parsed.config = Some(PathBuf::from(value("--config")?)),
                    "--seed" => {
                        parsed.seed = value("--seed")?.parse().context("--seed must be a number")?
                    }
                    "--runs" => {
                        parsed.runs = value("--runs")?.parse().context("--runs must be a number")?
                    }
                    other => bail!("unknown argument {:?} ({})", other, USAGE),
                }
            }
            Ok(parsed)
        }
    }

    pub fn run(args: Args) -> Result<()> {
        let config = match &args.config {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                GameConfig::from_json(&json)
            }
            None => GameConfig::default(),
        };

        match &args.save {
            Some(path) => {
                let store = FileStore::open(path)?;
                let store = play(Session::new(config, store), &args);
                store.flush()?;
                log::info!("Progress saved to {}", store.path().display());
            }
            None => {
                play(Session::new(config, MemoryStore::new()), &args);
            }
        }
        Ok(())
    }

    fn play<S: KeyValueStore>(mut session: Session<S>, args: &Args) -> S {
        let pilot = Autopilot::default();

        for i in 0..args.runs {
            session.start_run(args.seed.wrapping_add(i as u64));
            loop {
                let Some(state) = session.state() else {
                    break;
                };
                if !state.is_playing() || state.run.elapsed_ms >= MAX_RUN_MS {
                    break;
                }
                let input = pilot.steer(state);
                session.set_input(input);

                let report = session.step(FRAME_MS);
                for unlock in &report.unlocks {
                    println!(
                        "  mission {} complete: skin {}",
                        unlock.mission.as_str(),
                        unlock.skin
                    );
                }
            }

            if let Some(state) = session.state() {
                let run = &state.run;
                println!(
                    "run {}: score {}, level {}, {:.1}s, {} kills, {} coins",
                    i + 1,
                    run.score,
                    run.level,
                    run.elapsed_ms / 1000.0,
                    run.kills,
                    run.coins_earned
                );
            }
        }

        let stats = session.ledger().stats();
        println!(
            "{} games, best score {}, best level {}, wallet {} coins",
            stats.games_played,
            stats.max_score,
            stats.max_level,
            session.shop().coins()
        );
        session.into_store()
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Cyber Serpent (headless) starting...");

    let args = headless::Args::parse(std::env::args().skip(1))?;
    headless::run(args)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The wasm entry point is `platform::web::start`
}
