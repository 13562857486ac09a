criterion::criterion_main!(benches);
criterion::criterion_group! {
    name = benches;
    config = criterion::Criterion::default()
        .without_plots()
        .noise_threshold(3.0)
        .significance_level(0.01)
        .sample_size(10)
        .measurement_time(std::time::Duration::from_secs(1));
    targets =
        scoring_random_action,
        previewing_self_drawn_win,
        replaying_random_session,
        undoing_full_history,
        summarizing_session_stats,
        saving_and_loading_session,
}

fn scoring_random_action(c: &mut criterion::Criterion) {
    c.bench_function("apply a random Action to a played Table", |b| {
        let table = played(64).table().clone();
        b.iter_batched(
            Action::random,
            |action| table.apply(&action),
            criterion::BatchSize::SmallInput,
        )
    });
}

fn previewing_self_drawn_win(c: &mut criterion::Criterion) {
    c.bench_function("preview a self-drawn win", |b| {
        let table = played(64).table().clone();
        let action = Action::SelfDrawn {
            winner: 2,
            points: 8,
        };
        b.iter(|| table.preview(&action))
    });
}

fn replaying_random_session(c: &mut criterion::Criterion) {
    c.bench_function("play 256 random Actions into a Session", |b| {
        b.iter(|| played(256))
    });
}

fn undoing_full_history(c: &mut criterion::Criterion) {
    c.bench_function("undo every entry of a 256-Action Session", |b| {
        b.iter_batched(
            || played(256),
            |mut session| while session.undo().is_ok() {},
            criterion::BatchSize::SmallInput,
        )
    });
}

fn summarizing_session_stats(c: &mut criterion::Criterion) {
    c.bench_function("compute Stats over 1024 Actions", |b| {
        let session = played(1024);
        b.iter(|| session.stats())
    });
}

fn saving_and_loading_session(c: &mut criterion::Criterion) {
    c.bench_function("save and load a 256-Action Session", |b| {
        let session = played(256);
        b.iter(|| session.save().and_then(|blob| Session::load(&blob)))
    });
}

fn played(n: usize) -> Session {
    let mut session = Session::default();
    for _ in 0..n {
        let _ = session.apply(Action::random());
    }
    session
}

use mahjong_tally::Arbitrary;
use mahjong_tally::engine::Session;
use mahjong_tally::scoring::Action;
