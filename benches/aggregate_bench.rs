//! Criterion benchmarks for feed parsing and grouping

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dropfeed::parsers::{CsvSchema, FeedSchema};
use dropfeed::services::Aggregator;
use dropfeed::types::{DateBasis, GroupMode};
use std::fmt::Write;
use std::hint::black_box;

const COLORS: &[&str] = &["Noir", "Gold", "Etoupe", "Rouge Sellier", "Craie", "Bleu Nuit"];
const TITLES: &[&str] = &[
    "Picotin Lock 18 bag",
    "Twilly, silk",
    "Collier de Chien bracelet",
    "Evelyne 16 bag",
    "Oran sandal",
    "Kelly pochette",
];

/// Synthetic feed: `rows` listings spread over roughly a year,
/// with items reappearing so dedup has work to do
fn synthetic_feed(rows: usize) -> String {
    let start = 1_704_067_200_i64; // 2024-01-01 00:00 UTC
    let mut out = String::from("uuid,item_id,timestamp,price,url,color,title,is_new\n");
    for i in 0..rows {
        let item_id = format!("H{:05}", i % (rows / 3).max(1));
        let timestamp = start + (i as i64 * 7_919) % 31_536_000;
        let title = TITLES[i % TITLES.len()];
        let color = COLORS[(i / TITLES.len()) % COLORS.len()];
        let _ = writeln!(
            out,
            "{id}{ts},{id},{ts},{price},/p/{id}/,{color},\"{title}\",{new}",
            id = item_id,
            ts = timestamp,
            price = 500 + (i % 40) * 125,
            color = color,
            title = title,
            new = u8::from(i % 4 != 0),
        );
    }
    out
}

fn bench_parse_feed(c: &mut Criterion) {
    let mut group = c.benchmark_group("feed");

    for rows in [1_000, 10_000] {
        let content = synthetic_feed(rows);
        group.throughput(Throughput::Bytes(content.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse", rows), &content, |b, content| {
            b.iter(|| FeedSchema.parse_str(black_box(content)));
        });
    }

    group.finish();
}

fn bench_group(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");

    for rows in [1_000, 10_000] {
        let content = synthetic_feed(rows);
        let listings = match FeedSchema.parse_str(&content) {
            Ok((listings, _)) => listings,
            Err(e) => {
                eprintln!("Skipping aggregate/{}: {}", rows, e);
                continue;
            }
        };
        group.throughput(Throughput::Elements(listings.len() as u64));

        for mode in GroupMode::all() {
            group.bench_with_input(
                BenchmarkId::new(mode.label(), rows),
                &listings,
                |b, listings| {
                    b.iter(|| Aggregator::group(black_box(listings), *mode, DateBasis::Utc));
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_parse_feed, bench_group);
criterion_main!(benches);
