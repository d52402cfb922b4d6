//! Propensity logging and an offline estimate of a policy that was never deployed.
//!
//! A softmax explorer serves one of three article layouts per request and records
//! `(context, action, probability, key)`. Afterwards the log alone is enough to
//! estimate how a different policy would have done (inverse propensity scoring).
//!
//! Run:
//! `RUST_LOG=mwt_explore=debug cargo run --example propensity_logging`

use mwt_explore::{
    ActionCount, InMemoryRecorder, Interaction, MwtExplorer, Recorder, SoftmaxConfig,
    SoftmaxExplorer, TracingRecorder,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
struct Visit {
    mobile: bool,
    returning: bool,
}

impl mwt_explore::Context for Visit {}

fn layout_scores(v: &Visit) -> Vec<f32> {
    // compact, gallery, long-form
    match (v.mobile, v.returning) {
        (true, _) => vec![2.0, 1.0, 0.2],
        (false, true) => vec![0.5, 0.8, 2.0],
        (false, false) => vec![1.0, 1.5, 1.0],
    }
}

/// Simulated click probability; unknown to the explorer.
fn click_rate(v: &Visit, layout: u32) -> f64 {
    match (layout, v.mobile, v.returning) {
        (1, true, _) => 0.30,
        (1, false, _) => 0.10,
        (2, _, false) => 0.25,
        (2, _, true) => 0.15,
        (3, false, true) => 0.40,
        _ => 0.05,
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(true)
        .init();

    let explorer = SoftmaxExplorer::new(
        layout_scores,
        SoftmaxConfig {
            lambda: 1.0,
            num_actions: ActionCount::Fixed(3),
            minimum_uniform: 0.1,
        },
    )
    .expect("valid softmax config");

    let log = InMemoryRecorder::<Visit>::new();
    let traced = TracingRecorder;
    let both = |i: &Interaction<'_, Visit>| {
        log.record(i);
        if i.unique_key.ends_with("000") {
            traced.record(i);
        }
    };
    let mwt = MwtExplorer::new("layout-demo", both);

    let mut env = StdRng::seed_from_u64(7);
    let mut clicks = Vec::new();
    for t in 0..20_000u32 {
        let visit = Visit {
            mobile: env.random_bool(0.6),
            returning: env.random_bool(0.3),
        };
        let key = format!("visit-{t}");
        let layout = mwt
            .choose_action(&explorer, &key, &visit)
            .expect("scores always match the action count");
        clicks.push(env.random_bool(click_rate(&visit, layout)));
    }

    let records = log.take();
    let served: f64 = clicks.iter().filter(|&&c| c).count() as f64 / clicks.len() as f64;
    println!("served policy click rate: {served:.4}");

    // Candidate: long-form for returning desktop visitors, compact otherwise.
    let candidate = |v: &Visit| if !v.mobile && v.returning { 3 } else { 1 };
    let ips: f64 = records
        .iter()
        .zip(&clicks)
        .filter(|(r, _)| r.action() == Some(candidate(&r.context)))
        .map(|(r, &c)| if c { 1.0 / f64::from(r.probability) } else { 0.0 })
        .sum::<f64>()
        / records.len() as f64;
    println!("candidate policy click rate (IPS estimate): {ips:.4}");
}
