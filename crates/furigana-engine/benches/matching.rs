use criterion::{Criterion, criterion_group, criterion_main};
use furigana_engine::{
    Matcher, RenderContext, Renderer, SelectionRange, StaticAnnotator, build_decorations,
};
use xi_rope::Rope;
mod common;

fn bench_find_matches(c: &mut Criterion) {
    let mut group = c.benchmark_group("matching");

    let content = common::generate_markdown_content(100);
    let matcher = Matcher::default();
    group.bench_function("find_and_validate", |b| {
        b.iter(|| {
            let units: Vec<_> = matcher
                .find_matches(std::hint::black_box(&content))
                .filter_map(|m| m.validate())
                .collect();
            std::hint::black_box(units);
        });
    });

    group.finish();
}

fn bench_static_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("static");
    group.sample_size(20);

    let content = common::generate_markdown_content(100);
    let mut renderer = Renderer::new();
    renderer.register(StaticAnnotator::default());
    let ctx = RenderContext::default();

    group.bench_function("render_and_annotate", |b| {
        b.iter(|| std::hint::black_box(renderer.render_html(&content, &ctx)));
    });

    group.finish();
}

fn bench_overlay_recompute(c: &mut Criterion) {
    let mut group = c.benchmark_group("overlay");

    let rope = Rope::from(common::generate_markdown_content(100).as_str());
    let matcher = Matcher::default();
    let selections = [SelectionRange::cursor(rope.len() / 2)];

    group.bench_function("build_decorations", |b| {
        b.iter(|| std::hint::black_box(build_decorations(&matcher, &rope, &selections)));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_find_matches,
    bench_static_pass,
    bench_overlay_recompute
);
criterion_main!(benches);
