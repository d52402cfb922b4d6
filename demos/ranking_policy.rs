//! Serving a full ranking with exploration on the top slot.
//!
//! The policy orders five search results; epsilon-greedy occasionally promotes another
//! result to the top. Each served ranking is written to a text log.
//!
//! Run:
//! `cargo run --example ranking_policy`

use mwt_explore::{
    ActionCount, EpsilonGreedyConfig, EpsilonGreedyExplorer, MwtExplorer, Policy, StringRecorder,
};

/// Query text as context.
struct Query(String);

impl mwt_explore::Context for Query {}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "q={}", self.0)
    }
}

/// Ranks results by how many characters of the query they share.
struct Lexical {
    results: Vec<&'static str>,
}

impl Lexical {
    fn overlap(&self, q: &Query, idx: usize) -> usize {
        self.results[idx].chars().filter(|c| q.0.contains(*c)).count()
    }
}

impl Policy<Query> for Lexical {
    fn choose_action(&self, q: &Query) -> u32 {
        self.choose_ranking(q, self.results.len() as u32)[0]
    }

    fn choose_ranking(&self, q: &Query, num_actions: u32) -> Vec<u32> {
        let mut idx: Vec<usize> = (0..num_actions as usize).collect();
        idx.sort_by_key(|&i| std::cmp::Reverse(self.overlap(q, i)));
        idx.into_iter().map(|i| i as u32 + 1).collect()
    }
}

fn main() {
    tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

    let policy = Lexical {
        results: vec!["rust book", "rustlings", "cargo guide", "async book", "embedded"],
    };
    let explorer = EpsilonGreedyExplorer::new(
        policy,
        EpsilonGreedyConfig {
            epsilon: 0.25,
            num_actions: ActionCount::Fixed(5),
        },
    )
    .expect("valid epsilon");

    let mwt = MwtExplorer::new("search", StringRecorder::new());
    for (i, q) in ["rust", "async", "cargo", "rust", "embedded"].iter().enumerate() {
        let query = Query((*q).to_string());
        let ranking = mwt
            .choose_ranking(&explorer, &format!("search-{i}"), &query)
            .expect("policy ranks every result");
        println!("{q:>10} -> {ranking:?}");
    }

    explorer.enable_explore(false);
    let frozen = mwt
        .choose_ranking(&explorer, "search-frozen", &Query("rust".into()))
        .expect("policy ranks every result");
    println!("{:>10} -> {frozen:?} (exploration off)", "rust");

    print!("{}", mwt.recorder().contents());
}
