//! Seed Racer headless demo
//!
//! Generates a track from a seed and lets the autopilot race it.
//!
//! Usage: `seed-racer [SEED] [--laps N] [--tier NAME] [--difficulty easy|normal|hard]`

#[cfg(not(target_arch = "wasm32"))]
use seed_racer::{
    Difficulty, RaceEvent, RaceSession, Settings, Tuning, consts::SIM_DT, random_seed,
    sim::autopilot,
};

/// Give up on the race after this much simulated time
#[cfg(not(target_arch = "wasm32"))]
const MAX_SIM_SECONDS: f32 = 600.0;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let (seed, settings) = match parse_args(std::env::args().skip(1)) {
        Ok(parsed) => parsed,
        Err(message) => {
            eprintln!("{message}");
            eprintln!(
                "usage: seed-racer [SEED] [--laps N] [--tier NAME] [--difficulty easy|normal|hard]"
            );
            std::process::exit(2);
        }
    };

    let tuning = Tuning::default();
    let mut session = RaceSession::from_settings(&seed, &settings, &tuning);
    let track = &session.track;
    println!(
        "Track '{}' ({}): {} samples, {:.0} units, {} checkpoints, {} boost pads{}",
        track.seed,
        track.difficulty.as_str(),
        track.total_samples,
        track.total_arc_length,
        track.checkpoints.len(),
        track.boost_pads.len(),
        if track.attempt > 0 {
            format!(", retry {}", track.attempt)
        } else {
            String::new()
        }
    );
    println!(
        "Ship tier '{}', {} laps",
        session.vehicle.tier.name, session.race.total_laps
    );

    let max_steps = (MAX_SIM_SECONDS / SIM_DT) as u32;
    for _ in 0..max_steps {
        let input = autopilot(&session.vehicle, &session.track);
        for event in session.step(SIM_DT, &input) {
            print_event(&event);
        }
        if session.race.is_finished() {
            return;
        }
    }

    println!(
        "Autopilot gave up after {:.0}s (lap {}, next checkpoint {})",
        MAX_SIM_SECONDS, session.race.current_lap, session.race.next_checkpoint
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library-only on the web; the host page drives RaceSession directly
}

#[cfg(not(target_arch = "wasm32"))]
fn parse_args(mut args: impl Iterator<Item = String>) -> Result<(String, Settings), String> {
    let mut seed = None;
    let mut settings = Settings::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--laps" => {
                let value = args.next().ok_or("--laps needs a value")?;
                let laps: u32 = value
                    .parse()
                    .map_err(|_| format!("invalid lap count '{value}'"))?;
                settings.set_laps(laps);
            }
            "--tier" => {
                settings.tier = args.next().ok_or("--tier needs a value")?;
            }
            "--difficulty" => {
                let value = args.next().ok_or("--difficulty needs a value")?;
                settings.difficulty = Difficulty::from_name(&value)
                    .ok_or_else(|| format!("unknown difficulty '{value}'"))?;
            }
            flag if flag.starts_with("--") => return Err(format!("unknown option '{flag}'")),
            _ => seed = Some(arg),
        }
    }

    let seed = seed.unwrap_or_else(|| {
        let entropy = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        random_seed(entropy)
    });
    Ok((seed, settings))
}

#[cfg(not(target_arch = "wasm32"))]
fn print_event(event: &RaceEvent) {
    match event {
        RaceEvent::CountdownBeat { remaining } => println!("{remaining}..."),
        RaceEvent::RaceStarted => println!("GO!"),
        RaceEvent::CheckpointCrossed { index } => println!("  checkpoint {index}"),
        RaceEvent::WrongWay { index } => println!("  wrong way at checkpoint {index}"),
        RaceEvent::MissedCheckpoint { index, expected } => {
            println!("  missed checkpoint: crossed {index}, expected {expected}")
        }
        RaceEvent::LapComplete {
            lap,
            time,
            new_best,
        } => println!(
            "Lap {lap}: {}{}",
            format_time(*time),
            if *new_best { " (best)" } else { "" }
        ),
        RaceEvent::RaceFinished(result) => {
            println!("Finished in {}", format_time(result.total_time));
            if let Some(best) = result.best_lap_index {
                println!("Best lap: {}", best + 1);
            }
        }
    }
}

/// `m:ss.mmm`
#[cfg(not(target_arch = "wasm32"))]
fn format_time(seconds: f32) -> String {
    let millis = (seconds.max(0.0) * 1000.0).round() as u64;
    format!("{}:{:02}.{:03}", millis / 60_000, (millis / 1000) % 60, millis % 1000)
}
