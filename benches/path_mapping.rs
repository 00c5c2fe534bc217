use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sitecard::routes::{screenshot_rel_path, screenshot_url};
use url::Url;

fn bench_rel_path(c: &mut Criterion) {
    c.bench_function("screenshot_rel_path", |b| {
        b.iter(|| {
            black_box(screenshot_rel_path(black_box("/blog/a-fairly-long-post-slug/")));
        })
    });
}

fn bench_public_url(c: &mut Criterion) {
    let site = Url::parse("https://example.com").unwrap();
    c.bench_function("screenshot_url", |b| {
        b.iter(|| {
            black_box(screenshot_url(black_box("/blog/a-fairly-long-post-slug/"), &site).unwrap());
        })
    });
}

criterion_group!(benches, bench_rel_path, bench_public_url);
criterion_main!(benches);
