use auto_2048::engine::{Board, Move};
use auto_2048::expectimax::{Expectimax, ExpectimaxConfig, Heuristic};
use criterion::{criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, SeedableRng};
use std::hint::black_box;

fn corpus() -> Vec<Board> {
    let mut rng = StdRng::seed_from_u64(4242);
    let mut boards = Vec::new();
    let mut b = Board::new_game(&mut rng);
    boards.push(b);
    let seq = [Move::Left, Move::Up, Move::Right, Move::Down];
    for i in 0..64 {
        let nb = b.make_move(seq[i % seq.len()], &mut rng);
        if nb.is_game_over() { break; }
        b = nb;
        boards.push(b);
    }
    boards
}

fn bench_heuristic(c: &mut Criterion) {
    let boards = corpus();
    let h = Heuristic::default();
    c.bench_function("heuristic/evaluate", |bch| {
        bch.iter(|| {
            let mut acc = 0f64;
            for &bd in &boards {
                acc += h.evaluate(bd);
            }
            black_box(acc)
        })
    });
}

fn bench_search(c: &mut Criterion) {
    let boards = corpus();
    for depth in [1, 2, 3] {
        let mut ex = Expectimax::with_config(ExpectimaxConfig { max_depth: depth, ..Default::default() }).unwrap();
        c.bench_function(&format!("expectimax/choose_move/depth{depth}"), |bch| {
            bch.iter(|| {
                let mut acc = 0u64;
                for &bd in &boards {
                    if let Ok(m) = ex.choose_move(bd) {
                        acc ^= m as u64;
                    }
                }
                black_box(acc)
            })
        });
    }
}

fn bench_e2e(c: &mut Criterion) {
    let cfg = ExpectimaxConfig { max_depth: 2, ..Default::default() };
    let mut ex = Expectimax::with_config(cfg).unwrap();
    c.bench_function("e2e/64_moves", |bch| {
        bch.iter(|| {
            let mut rng = StdRng::seed_from_u64(13);
            let mut b = Board::new_game(&mut rng);
            let mut steps = 0;
            while steps < 64 {
                match ex.choose_move(b) {
                    Ok(dir) => b = b.make_move(dir, &mut rng),
                    Err(_) => break,
                }
                steps += 1;
            }
            black_box((b.raw(), steps))
        })
    });
}

criterion_group!(benches, bench_heuristic, bench_search, bench_e2e);
criterion_main!(benches);
