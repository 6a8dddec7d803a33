//! Benchmarks for fragment matching.

#![allow(clippy::format_push_string)] // Benchmark setup code, performance not critical

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use lens_catalog::{DisplayMode, PatternCatalog};
use lens_engine::LiquidMatcher;

/// Generate a message template with `blocks` conditional sections.
fn generate_template(blocks: usize) -> String {
    let mut text = String::with_capacity(blocks * 160);
    text.push_str("Hi {{ ${first_name} | default: 'there' }},\n");

    for i in 0..blocks {
        text.push_str(&format!(
            "{{% if custom_attribute.${{tier_{i}}} == 'gold' %}}\n\
             Your {{{{ event_properties.${{item_{i}}} | upcase }}}} is ready.\n\
             {{% for product in catalog_items.shoes limit: 3 %}}{{{{ product.name }}}}{{% endfor %}}\n\
             {{% endif %}}\n"
        ));
    }
    text
}

fn bench_find_simple(c: &mut Criterion) {
    let matcher = LiquidMatcher::new(Arc::new(PatternCatalog::builtin()), DisplayMode::Friendly);

    c.bench_function("find_fragments_simple", |b| {
        b.iter(|| {
            matcher.find_fragments("Hello {{first_name}}, {% if vip %}welcome back{% endif %}")
        });
    });
}

fn bench_find_by_size(c: &mut Criterion) {
    let catalog = Arc::new(PatternCatalog::builtin());
    let mut group = c.benchmark_group("find_fragments_by_size");

    for mode in [DisplayMode::Friendly, DisplayMode::Technical] {
        let matcher = LiquidMatcher::new(Arc::clone(&catalog), mode);
        for blocks in [5, 50, 200] {
            let text = generate_template(blocks);
            group.throughput(Throughput::Bytes(text.len() as u64));
            group.bench_with_input(
                BenchmarkId::new(mode.as_str(), format!("{blocks}_blocks")),
                &text,
                |b, text| b.iter(|| matcher.find_fragments(text)),
            );
        }
    }

    group.finish();
}

fn bench_catalog_load(c: &mut Criterion) {
    c.bench_function("catalog_builtin", |b| b.iter(PatternCatalog::builtin));
}

criterion_group!(benches, bench_find_simple, bench_find_by_size, bench_catalog_load);
criterion_main!(benches);
