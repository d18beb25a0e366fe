// benches/generation.rs - Generation throughput per strategy

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use door_world::dungeon::helpers::find_room_at;
use door_world::{generate_dungeon_blocking, GenerateOptions, Position, StrategyType};

fn bench_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_dungeon");
    group.sample_size(20);

    for strategy in StrategyType::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(strategy), &strategy, |b, &strategy| {
            b.iter(|| {
                let options = GenerateOptions::builder()
                    .seed(1974)
                    .strategy(strategy)
                    .max_rooms(100)
                    .build()
                    .unwrap();
                black_box(generate_dungeon_blocking(options).unwrap())
            })
        });
    }
    group.finish();
}

fn bench_room_lookup(c: &mut Criterion) {
    let options = GenerateOptions::builder()
        .seed(42)
        .max_rooms(200)
        .build()
        .unwrap();
    let dungeon = generate_dungeon_blocking(options).unwrap();

    c.bench_function("find_room_at", |b| {
        b.iter(|| find_room_at(black_box(&dungeon), black_box(Position::new(120.0, -340.0))))
    });
}

criterion_group!(benches, bench_strategies, bench_room_lookup);
criterion_main!(benches);
