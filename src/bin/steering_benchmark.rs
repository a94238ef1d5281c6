// Timing benchmark over the steering state spaces
//
// Generates seeded random configuration pairs inside a fixed operating
// region, times repeated controls/path queries per variant and reports
// mean +/- standard deviation. Per-trial records can optionally be
// written as CSV with `--write-stats`.

use std::f64::consts::PI;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use rust_steering::{
    CcDubinsStateSpace, CcReedsSheppStateSpace, Direction, DubinsStateSpace, Hc00StateSpace,
    Hc0pmStateSpace, Hcpm0StateSpace, HcpmpmStateSpace, ReedsSheppStateSpace, State, StateSpace,
};

const KAPPA: f64 = 1.0; // [1/m]
const SIGMA: f64 = 1.0; // [1/m^2]
const DISCRETIZATION: f64 = 0.1; // [m]
const SAMPLES: usize = 1000;
const OPERATING_REGION_X: f64 = 20.0; // [m]
const OPERATING_REGION_Y: f64 = 20.0; // [m]
const SEED: u64 = 0;

struct Statistic {
    start: State,
    goal: State,
    computation_time: f64,
    path_length: f64,
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn std_dev(values: &[f64]) -> f64 {
    let m = mean(values);
    (values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64).sqrt()
}

fn random_state(rng: &mut StdRng) -> State {
    State::new(
        rng.gen_range(-OPERATING_REGION_X / 2.0..OPERATING_REGION_X / 2.0),
        rng.gen_range(-OPERATING_REGION_Y / 2.0..OPERATING_REGION_Y / 2.0),
        rng.gen_range(-PI..PI),
        0.0,
        Direction::Forward,
    )
}

fn time_controls(space: &dyn StateSpace, pairs: &[(State, State)]) -> Vec<Statistic> {
    let mut stats = Vec::with_capacity(pairs.len());
    for (start, goal) in pairs {
        let clock = Instant::now();
        let controls = space.controls(start, goal);
        let computation_time = clock.elapsed().as_secs_f64();
        let path_length = controls
            .map(|c| c.iter().map(|s| s.delta_s.abs()).sum())
            .unwrap_or(f64::NAN);
        stats.push(Statistic {
            start: *start,
            goal: *goal,
            computation_time,
            path_length,
        });
    }
    stats
}

fn time_paths(space: &dyn StateSpace, pairs: &[(State, State)]) -> Vec<Statistic> {
    let mut stats = Vec::with_capacity(pairs.len());
    for (start, goal) in pairs {
        let clock = Instant::now();
        let _ = space.path(start, goal);
        let computation_time = clock.elapsed().as_secs_f64();
        stats.push(Statistic {
            start: *start,
            goal: *goal,
            computation_time,
            path_length: 0.0,
        });
    }
    stats
}

fn report(label: &str, id: &str, stats: &[Statistic]) {
    let times: Vec<f64> = stats.iter().map(|s| s.computation_time).collect();
    println!(
        "[{}] {} mean [s] +/- std [s]: {:.3e} +/- {:.3e}",
        label,
        id,
        mean(&times),
        std_dev(&times)
    );
}

fn state_fields(state: &State) -> String {
    format!(
        "{} {} {} {} {}",
        state.x,
        state.y,
        state.theta,
        state.kappa,
        state.d.signum()
    )
}

fn write_stats(id: &str, stats: &[Statistic]) -> std::io::Result<()> {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("test");
    fs::create_dir_all(&path)?;
    path.push(format!("{}_stats.csv", id));
    let mut file = fs::File::create(&path)?;
    writeln!(file, "start,goal,computation_time,path_length")?;
    for stat in stats {
        writeln!(
            file,
            "{},{},{},{}",
            state_fields(&stat.start),
            state_fields(&stat.goal),
            stat.computation_time,
            stat.path_length
        )?;
    }
    println!("stats written to {}", path.display());
    Ok(())
}

fn main() {
    let write_csv = std::env::args().any(|arg| arg == "--write-stats");

    let mut rng = StdRng::seed_from_u64(SEED);
    let pairs: Vec<(State, State)> = (0..SAMPLES)
        .map(|_| (random_state(&mut rng), random_state(&mut rng)))
        .collect();

    let spaces: Vec<(&str, Box<dyn StateSpace>)> = vec![
        (
            "CC_Dubins",
            Box::new(CcDubinsStateSpace::new(KAPPA, SIGMA, DISCRETIZATION, true).unwrap())
                as Box<dyn StateSpace>,
        ),
        (
            "Dubins",
            Box::new(DubinsStateSpace::new(KAPPA, DISCRETIZATION, true).unwrap()),
        ),
        (
            "CC_RS",
            Box::new(CcReedsSheppStateSpace::new(KAPPA, SIGMA, DISCRETIZATION).unwrap()),
        ),
        (
            "HC00",
            Box::new(Hc00StateSpace::new(KAPPA, SIGMA, DISCRETIZATION).unwrap()),
        ),
        (
            "HC0pm",
            Box::new(Hc0pmStateSpace::new(KAPPA, SIGMA, DISCRETIZATION).unwrap()),
        ),
        (
            "HCpm0",
            Box::new(Hcpm0StateSpace::new(KAPPA, SIGMA, DISCRETIZATION).unwrap()),
        ),
        (
            "HCpmpm",
            Box::new(HcpmpmStateSpace::new(KAPPA, SIGMA, DISCRETIZATION).unwrap()),
        ),
        (
            "RS",
            Box::new(ReedsSheppStateSpace::new(KAPPA, DISCRETIZATION).unwrap()),
        ),
    ];

    println!("timing get_controls over {} samples", SAMPLES);
    for (id, space) in &spaces {
        let stats = time_controls(space.as_ref(), &pairs);
        report("controls", id, &stats);
        if write_csv {
            if let Err(e) = write_stats(id, &stats) {
                eprintln!("failed to write stats for {}: {}", id, e);
            }
        }
    }

    println!("timing get_path over {} samples", SAMPLES);
    for (id, space) in &spaces {
        let stats = time_paths(space.as_ref(), &pairs);
        report("path", id, &stats);
    }
}
