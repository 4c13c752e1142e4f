//! Benchmarks for sanetap rendering performance.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sanetap::{ContentBlockGroup, RenderOptions};
use serde_json::json;

/// Creates a synthetic node with `group_count` block groups mixing both schemas.
fn create_test_groups(group_count: usize) -> Vec<ContentBlockGroup> {
    (0..group_count)
        .map(|i| match i % 4 {
            0 => ContentBlockGroup::encoded(
                json!([
                    {"type": "text", "isHeading": true, "content": format!("Section {}", i)},
                    {"type": "text", "text": "Benchmark content with a "},
                    {"type": "link", "href": "https://example.com", "content": [{"text": "link"}]}
                ])
                .to_string(),
            ),
            1 => ContentBlockGroup::new(json!({"isBulletListItem": true, "content": "item"})),
            2 => ContentBlockGroup::encoded("{}"),
            _ => ContentBlockGroup::new(json!([
                {"type": "pdf", "pdfFileKey": format!("key-{}", i), "originalFilename": "doc.pdf"},
                {"type": "image", "imageSrc": "https://img.example.com/a.png"}
            ])),
        })
        .collect()
}

/// Benchmark rendering at various sizes.
fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let options = RenderOptions::default();

    for group_count in [10, 100, 1000].iter() {
        let groups = create_test_groups(*group_count);

        group.bench_function(format!("{}_groups", group_count), |b| {
            b.iter(|| sanetap::render::to_markdown(black_box(&groups), &options).unwrap());
        });
    }

    group.finish();
}

/// Benchmark parsing groups from JSON text.
fn bench_parse_groups(c: &mut Criterion) {
    let groups = create_test_groups(100);
    let data = serde_json::to_string(&groups).unwrap();

    c.bench_function("blocks_from_json_100", |b| {
        b.iter(|| sanetap::blocks_from_json(black_box(&data)).unwrap());
    });
}

criterion_group!(benches, bench_render, bench_parse_groups);
criterion_main!(benches);
