//! Benchmark for composable invocation overhead.
//!
//! # Benchmark Categories
//!
//! 1. **Constructor**: validation with each adapter before the handler runs
//! 2. **Pipe**: stage hand-off cost as the number of stages grows
//! 3. **Combinators**: `map`, `map_error` and `branch` around one composable
//!
//! Every benchmark drives the composable on a current-thread Tokio runtime
//! through `to_async`, so runtime enter/drop is batched per sample.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use composables::combinator::{branch, map_error, pipe};
use composables::composable::{Composable, composable};
use composables::outcome::{ErrorData, Outcome};
use composables::parser::Deserialized;
use composables::parser::schema::{array, integer, object, string};
use composables::pipe;
use serde::Deserialize;
use serde_json::{Value, json};
use std::hint::black_box;

#[derive(Deserialize)]
struct Order {
    id: i64,
    items: Vec<String>,
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("Failed to create tokio runtime")
}

fn order() -> Value {
    json!({ "id": 7, "items": ["apple", "pear", "plum"], "note": "dropped" })
}

fn increment() -> Composable<i64> {
    composable(Deserialized::<i64>::new()).handle(|number, _| Ok(number + 1))
}

// =============================================================================
// Constructor Benchmarks
// =============================================================================

fn bench_constructor(criterion: &mut Criterion) {
    let runtime = runtime();
    let mut group = criterion.benchmark_group("composable_constructor");

    let deserialized =
        composable(Deserialized::<Order>::new()).handle(|order, _| Ok(order.id + order.items.len() as i64));
    let schema = composable(
        object([("id", integer()), ("items", array(string()))]).deserialize::<Order>(),
    )
    .handle(|order, _| Ok(order.id + order.items.len() as i64));

    group.bench_function("deserialized", |bencher| {
        bencher
            .to_async(&runtime)
            .iter(|| deserialized.call(black_box(order()), Value::Null));
    });
    group.bench_function("schema", |bencher| {
        bencher
            .to_async(&runtime)
            .iter(|| schema.call(black_box(order()), Value::Null));
    });
    group.bench_function("schema_rejection", |bencher| {
        bencher
            .to_async(&runtime)
            .iter(|| schema.call(black_box(json!({ "items": [1, 2] })), Value::Null));
    });

    group.finish();
}

// =============================================================================
// Pipe Benchmarks
// =============================================================================

fn bench_pipe(criterion: &mut Criterion) {
    let runtime = runtime();
    let mut group = criterion.benchmark_group("pipe_stages");

    let two = pipe((increment(), increment()));
    let four = pipe!(increment(), increment(), increment(), increment());
    let eight = pipe!(
        increment(),
        increment(),
        increment(),
        increment(),
        increment(),
        increment(),
        increment(),
        increment()
    );

    for (stages, pipeline) in [(2, two), (4, four), (8, eight)] {
        group.bench_with_input(BenchmarkId::new("increment", stages), &pipeline, |bencher, pipeline| {
            bencher
                .to_async(&runtime)
                .iter(|| pipeline.call(black_box(json!(0)), Value::Null));
        });
    }

    group.finish();
}

// =============================================================================
// Combinator Benchmarks
// =============================================================================

fn bench_combinators(criterion: &mut Criterion) {
    let runtime = runtime();
    let mut group = criterion.benchmark_group("combinators");

    let mapped = increment().map(|number| number * 2);
    let remapped = map_error(increment(), |error_data| {
        Ok(ErrorData {
            errors: error_data.errors,
            ..ErrorData::default()
        })
    });
    let branched = branch(increment(), |number| (number % 2 == 0).then(increment));

    group.bench_function("map", |bencher| {
        bencher
            .to_async(&runtime)
            .iter(|| mapped.call(black_box(json!(1)), Value::Null));
    });
    group.bench_function("map_error", |bencher| {
        bencher
            .to_async(&runtime)
            .iter(|| remapped.call(black_box(json!("x")), Value::Null));
    });
    group.bench_function("branch_continued", |bencher| {
        bencher
            .to_async(&runtime)
            .iter(|| branched.call(black_box(json!(1)), Value::Null));
    });
    group.bench_function("constant", |bencher| {
        let constant = Composable::success(1);
        bencher.to_async(&runtime).iter(|| async {
            let outcome: Outcome<i32> = constant.call(Value::Null, Value::Null).await;
            black_box(outcome)
        });
    });

    group.finish();
}

criterion_group!(benches, bench_constructor, bench_pipe, bench_combinators);
criterion_main!(benches);
