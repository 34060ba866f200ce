use std::collections::{BTreeMap, BTreeSet};

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use gutguard::{
    ConditionSettings, FoodItem, GutCondition, GutProfile, IngredientMatcher, MatcherConfig,
    SeverityLevel, VerdictAggregator,
};

const INGREDIENTS: &[&str] = &[
    "enriched wheat flour",
    "sugar",
    "sorbitol (E420)",
    "natural flavoring",
    "soy lecithin",
    "carrageenan",
    "sea salt",
    "organic quinoa",
    "high fructose corn syrup",
    "garlic powder",
];

fn bench_match_ingredient(c: &mut Criterion) {
    let conditions: BTreeSet<GutCondition> = GutCondition::ALL.into_iter().collect();
    let triggers = BTreeMap::new();

    let mut group = c.benchmark_group("match_ingredient");
    group.throughput(Throughput::Elements(INGREDIENTS.len() as u64));

    let uncached = IngredientMatcher::new(&MatcherConfig {
        cache_enabled: false,
        ..MatcherConfig::default()
    });
    group.bench_function("uncached", |b| {
        b.iter(|| {
            for ingredient in INGREDIENTS {
                black_box(uncached.match_ingredient(ingredient, &conditions, &triggers));
            }
        });
    });

    let cached = IngredientMatcher::default();
    group.bench_function("cached", |b| {
        b.iter(|| {
            for ingredient in INGREDIENTS {
                black_box(cached.match_ingredient(ingredient, &conditions, &triggers));
            }
        });
    });
    group.finish();
}

fn bench_analyze_food(c: &mut Criterion) {
    let profile = GutProfile::new()
        .with_condition(GutCondition::Gluten, ConditionSettings::enabled(SeverityLevel::Severe))
        .with_condition(GutCondition::IbsFodmap, ConditionSettings::enabled(SeverityLevel::Moderate))
        .with_condition(GutCondition::Additives, ConditionSettings::enabled(SeverityLevel::Mild));
    let food = FoodItem::new("bench-1", "Snack bar").with_ingredients(INGREDIENTS.iter().copied());
    let aggregator = VerdictAggregator::default();

    c.bench_function("analyze_food", |b| {
        b.iter(|| black_box(aggregator.analyze_food(&food, &profile)));
    });
}

criterion_group!(benches, bench_match_ingredient, bench_analyze_food);
criterion_main!(benches);
