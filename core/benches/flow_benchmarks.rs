use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;
use storefront_flow::{ContextData, Flow, FlowControl, FlowError, FlowRegistry, SkipCondition};
use tokio::runtime::Runtime;

#[derive(Clone, Debug, Default)]
struct BenchContext {
  counter: u64,
  refresh_only: bool,
}

fn step_names(count: usize) -> Vec<String> {
  (0..count).map(|i| format!("step_{}", i)).collect()
}

fn build_flow(names: &[String], skip_first: bool) -> Flow<BenchContext, FlowError> {
  let defs: Vec<(&str, bool, Option<SkipCondition<BenchContext>>)> = names
    .iter()
    .enumerate()
    .map(|(i, name)| {
      let skip: Option<SkipCondition<BenchContext>> = if skip_first && i == 0 {
        Some(Arc::new(|ctx: ContextData<BenchContext>| ctx.read().refresh_only))
      } else {
        None
      };
      (name.as_str(), false, skip)
    })
    .collect();

  let mut flow = Flow::<BenchContext, FlowError>::new(&defs);
  for name in names {
    flow.on(name, |ctx: ContextData<BenchContext>| {
      Box::pin(async move {
        ctx.write().counter += 1;
        Ok::<_, FlowError>(FlowControl::Continue)
      })
    });
  }
  flow
}

fn bench_flow_run(c: &mut Criterion) {
  let mut group = c.benchmark_group("FlowRun");
  let rt = Runtime::new().unwrap();

  for num_steps in [1usize, 4, 16] {
    let names = step_names(num_steps);
    let flow = build_flow(&names, false);
    group.bench_with_input(BenchmarkId::new("direct", num_steps), &num_steps, |b, _| {
      b.to_async(&rt).iter(|| async {
        let ctx = ContextData::new(BenchContext::default());
        flow.run(ctx).await.unwrap();
      })
    });

    let registry = FlowRegistry::<FlowError>::new();
    registry.register(build_flow(&names, true));
    group.bench_with_input(BenchmarkId::new("registry_with_skip", num_steps), &num_steps, |b, _| {
      b.to_async(&rt).iter(|| async {
        let ctx = ContextData::new(BenchContext {
          refresh_only: true,
          ..Default::default()
        });
        registry.run(ctx).await.unwrap();
      })
    });
  }
  group.finish();
}

criterion_group!(benches, bench_flow_run);
criterion_main!(benches);
