//! Explorer behavior through the `MwtExplorer` entry point.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use mwt_explore::{
    ActionCount, BootstrapConfig, BootstrapExplorer, Context, EpsilonGreedyConfig,
    EpsilonGreedyExplorer, ExploreError, Explorer, GenericConfig, GenericExplorer,
    InMemoryRecorder, Interaction, MwtExplorer, SoftmaxConfig, SoftmaxExplorer, TauFirstConfig,
    TauFirstExplorer, VariableActionContext,
};

type Ctx = VariableActionContext<String>;

fn variable_ctx(n: u32) -> Ctx {
    VariableActionContext::new("ctx".to_string(), n)
}

/// One of each explorer, all preferring action 3 out of 5.
fn explorers<C: Context + 'static>(num_actions: ActionCount) -> Vec<Box<dyn Explorer<C>>> {
    let scores = |_: &C| vec![0.1f32, 0.2, 5.0, 0.3, 0.4];
    vec![
        Box::new(
            EpsilonGreedyExplorer::new(
                |_: &C| 3u32,
                EpsilonGreedyConfig {
                    epsilon: 0.2,
                    num_actions,
                },
            )
            .unwrap(),
        ),
        Box::new(
            TauFirstExplorer::new(
                |_: &C| 3u32,
                TauFirstConfig {
                    tau: 10,
                    num_actions,
                },
            )
            .unwrap(),
        ),
        Box::new(
            BootstrapExplorer::new(vec![|_: &C| 3u32; 3], BootstrapConfig { num_actions }).unwrap(),
        ),
        Box::new(
            SoftmaxExplorer::new(
                scores,
                SoftmaxConfig {
                    num_actions,
                    ..SoftmaxConfig::default()
                },
            )
            .unwrap(),
        ),
        Box::new(
            GenericExplorer::new(
                scores,
                GenericConfig {
                    num_actions,
                    ..GenericConfig::default()
                },
            )
            .unwrap(),
        ),
    ]
}

#[test]
fn fixed_explorers_reject_variable_contexts() {
    let mwt = MwtExplorer::new("", InMemoryRecorder::<Ctx>::new());
    for ex in explorers::<Ctx>(ActionCount::Fixed(5)) {
        let err = mwt.choose_action(&*ex, "k", &variable_ctx(5)).unwrap_err();
        assert!(
            matches!(err, ExploreError::MisconfiguredExplorer(_)),
            "{}: {err:?}",
            ex.kind()
        );
    }
    assert!(mwt.recorder().is_empty());
}

#[test]
fn variable_explorers_reject_fixed_contexts() {
    let mwt = MwtExplorer::new("", InMemoryRecorder::<String>::new());
    for ex in explorers::<String>(ActionCount::Variable) {
        let err = mwt.choose_action(&*ex, "k", &"plain".to_string()).unwrap_err();
        assert!(
            matches!(err, ExploreError::MisconfiguredExplorer(_)),
            "{}: {err:?}",
            ex.kind()
        );
    }
    assert!(mwt.recorder().is_empty());
}

#[test]
fn matching_contracts_succeed() {
    let fixed = MwtExplorer::new("", InMemoryRecorder::<String>::new());
    for ex in explorers::<String>(ActionCount::Fixed(5)) {
        let a = fixed.choose_action(&*ex, "k", &"plain".to_string()).unwrap();
        assert!((1..=5).contains(&a), "{}", ex.kind());
    }
    let variable = MwtExplorer::new("", InMemoryRecorder::<Ctx>::new());
    for ex in explorers::<Ctx>(ActionCount::Variable) {
        let a = variable.choose_action(&*ex, "k", &variable_ctx(5)).unwrap();
        assert!((1..=5).contains(&a), "{}", ex.kind());
    }
    assert_eq!(fixed.recorder().len(), 5);
    assert_eq!(variable.recorder().len(), 5);
}

#[test]
fn frozen_explorers_serve_the_top_action() {
    let mwt = MwtExplorer::new("", InMemoryRecorder::<String>::new());
    let ctx = "c".to_string();
    for ex in explorers::<String>(ActionCount::Fixed(5)) {
        ex.enable_explore(false);
        assert!(!ex.explore_enabled());
        for i in 0..100 {
            let d = mwt.decide(&*ex, &format!("k{i}"), &ctx).unwrap();
            assert_eq!(d.action, 3, "{}", ex.kind());
            assert_eq!(d.probability, 1.0);
            assert!(!d.explored());
        }
    }
    assert!(mwt
        .recorder()
        .interactions()
        .iter()
        .all(|r| r.actions == vec![3] && r.probability == 1.0));
}

#[test]
fn variable_explorers_follow_the_context_count() {
    let v = ActionCount::Variable;
    let ex = SoftmaxExplorer::new(
        |c: &Ctx| vec![0.0f32; c.num_actions as usize],
        SoftmaxConfig {
            num_actions: v,
            ..SoftmaxConfig::default()
        },
    )
    .unwrap();
    let mwt = MwtExplorer::new("", InMemoryRecorder::<Ctx>::new());
    for n in [1u32, 2, 7, 20] {
        let ranking = mwt.choose_ranking(&ex, "k", &variable_ctx(n)).unwrap();
        assert_eq!(ranking.len(), n as usize);
        let mut sorted = ranking.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (1..=n).collect::<Vec<_>>());
    }
}

#[test]
fn softmax_covers_every_action() {
    // n ln n + ln(cover / n) * C * n draws, with cover = 100 and C = 5.
    let n = 10u32;
    let nf = f64::from(n);
    let draws = (nf * nf.ln() + (100.0 / nf).ln() * 5.0 * nf) as usize;
    assert_eq!(draws, 138);

    let ex = SoftmaxExplorer::new(
        |_: &String| vec![1.0f32; 10],
        SoftmaxConfig {
            lambda: 0.5,
            num_actions: ActionCount::Fixed(n),
            minimum_uniform: 0.0,
        },
    )
    .unwrap();
    let mwt = MwtExplorer::new("", ());
    let ctx = String::new();
    let mut seen = [false; 10];
    for i in 0..draws {
        let d = ex.choose_action(mwt.seed_for(&format!("coverage-{i}")), &ctx).unwrap();
        seen[(d.action - 1) as usize] = true;
    }
    assert!(seen.iter().all(|&s| s), "{seen:?}");
}

#[test]
fn increasing_scores_favor_the_top_action() {
    let scorer = |_: &String| (1..=10).map(|i| i as f32).collect::<Vec<f32>>();
    let cfg = SoftmaxConfig {
        lambda: 0.5,
        num_actions: ActionCount::Fixed(10),
        minimum_uniform: 0.0,
    };
    let ex = SoftmaxExplorer::new(scorer, cfg).unwrap();
    let mwt = MwtExplorer::new("", ());
    let ctx = String::new();

    let d = ex.choose_action(mwt.seed_for("k"), &ctx).unwrap();
    assert!(d.pmf.iter().all(|&p| p != 0.1));

    ex.enable_explore(false);
    let top = (0..1000)
        .filter(|i| {
            let d = ex.choose_action(mwt.seed_for(&i.to_string()), &ctx).unwrap();
            d.action == 10
        })
        .count();
    assert_eq!(top, 1000);
}

#[test]
fn recorder_sees_exactly_one_interaction_per_call() {
    let calls = AtomicUsize::new(0);
    let last_probability = std::sync::Mutex::new(0.0f32);
    let rec = |i: &Interaction<'_, String>| {
        calls.fetch_add(1, Ordering::SeqCst);
        *last_probability.lock().unwrap() = i.probability;
    };
    let mwt = MwtExplorer::new("app", rec);
    let ex = EpsilonGreedyExplorer::new(
        |_: &String| 2u32,
        EpsilonGreedyConfig {
            epsilon: 0.0,
            num_actions: ActionCount::Fixed(3),
        },
    )
    .unwrap();
    let ctx = String::from("c");
    for i in 0..25 {
        mwt.choose_action(&ex, &format!("k{i}"), &ctx).unwrap();
    }
    mwt.choose_ranking(&ex, "r", &ctx).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 26);
    assert_eq!(*last_probability.lock().unwrap(), 1.0);
}

#[test]
fn read_only_explorers_are_shareable_across_threads() {
    let ex = Arc::new(
        SoftmaxExplorer::new(
            |_: &String| vec![0.3f32, 0.1, 0.9, 0.4],
            SoftmaxConfig {
                lambda: 2.0,
                num_actions: ActionCount::Fixed(4),
                minimum_uniform: 0.0,
            },
        )
        .unwrap(),
    );
    let mwt = Arc::new(MwtExplorer::new("threads", InMemoryRecorder::<String>::new()));
    let ctx = "c".to_string();

    let expected: Vec<u32> = (0..200)
        .map(|i| {
            ex.choose_action(mwt.seed_for(&format!("k{i}")), &ctx)
                .unwrap()
                .action
        })
        .collect();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let ex = Arc::clone(&ex);
            let mwt = Arc::clone(&mwt);
            let ctx = ctx.clone();
            std::thread::spawn(move || {
                (0..200)
                    .map(|i| mwt.choose_action(&*ex, &format!("k{i}"), &ctx).unwrap())
                    .collect::<Vec<u32>>()
            })
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), expected);
    }
    assert_eq!(mwt.recorder().len(), 800);
}
