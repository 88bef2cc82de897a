use citrine_calc::calc::{total_cost, CostCalculator};
use citrine_calc::data::defaults::{default_breakthroughs, default_stages, DEFAULT_STAGES};
use citrine_calc::data::schema::{AbilityRecord, Document};
use citrine_calc::data::ReferenceData;
use citrine_calc::store::{LevelStore, MemoryLevelStore};
use citrine_calc::CitrineSource;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn build_data(per_stage: usize) -> ReferenceData {
    let abilities: Vec<AbilityRecord> = DEFAULT_STAGES
        .iter()
        .flat_map(|&(stage, _)| {
            (0..per_stage).map(move |i| AbilityRecord {
                ability_name: format!("Ability {}", i),
                cultivation_stage: stage.to_string(),
                ability_type: ["Sword", "Fist", "Body"][i % 3].to_string(),
                max_level: 100,
                citrine_per_book: None,
            })
        })
        .collect();

    ReferenceData::from_json(
        &serde_json::to_string(&Document::new(abilities)).unwrap(),
        &serde_json::to_string(&Document::new(default_stages())).unwrap(),
        &serde_json::to_string(&Document::new(default_breakthroughs())).unwrap(),
        10,
    )
    .unwrap()
}

fn bench_total(c: &mut Criterion) {
    let data = build_data(50);
    let calc = CostCalculator::new(&data, CitrineSource::Stage);
    let mut store = MemoryLevelStore::new(10);
    for (i, ability) in data.abilities().iter().enumerate() {
        store.set_level(ability, (i % 11 * 10) as f64).unwrap();
    }

    c.bench_function("total_cost_950_abilities", |b| {
        b.iter(|| total_cost(black_box(data.abilities()), &calc, &store))
    });
}

criterion_group!(benches, bench_total);
criterion_main!(benches);
