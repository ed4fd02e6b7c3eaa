use chapter_tracker::chapters::normalize_metadata;
use chapter_tracker::{parse_chapters_from_description, parse_timestamp, RawVideoMetadata};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn long_description(chapters: usize) -> String {
    let mut text = String::from("⭐️ Contents ⭐️\nThanks for watching, links below.\n");
    for i in 0..chapters {
        let seconds = i * 97;
        text.push_str(&format!(
            "🎤 ({:02}:{:02}:{:02}) Section {} - working through the material\n",
            seconds / 3600,
            (seconds % 3600) / 60,
            seconds % 60,
            i + 1
        ));
        if i % 5 == 0 {
            text.push_str("Some commentary without a timestamp\n");
        }
    }
    text
}

fn bench_timestamp_parsing(c: &mut Criterion) {
    c.bench_function("timestamp_two_groups", |b| {
        b.iter(|| black_box(parse_timestamp(black_box("05:30 Middle Part"))))
    });

    c.bench_function("timestamp_decorated", |b| {
        b.iter(|| black_box(parse_timestamp(black_box("🎤 (00:16:56) Google Cloud Certifications"))))
    });

    c.bench_function("timestamp_no_match", |b| {
        b.iter(|| black_box(parse_timestamp(black_box("Thanks for watching, links below."))))
    });
}

fn bench_description_parsing(c: &mut Criterion) {
    let small = long_description(10);
    let large = long_description(500);

    c.bench_function("description_10_chapters", |b| {
        b.iter(|| black_box(parse_chapters_from_description(black_box(&small), 1_000)))
    });

    c.bench_function("description_500_chapters", |b| {
        b.iter(|| black_box(parse_chapters_from_description(black_box(&large), 50_000)))
    });
}

fn bench_normalization(c: &mut Criterion) {
    let metadata = RawVideoMetadata {
        id: "dQw4w9WgXcQ".to_string(),
        title: "Bench".to_string(),
        description: Some(long_description(50)),
        thumbnail: None,
        duration: Some(5_000.0),
        chapters: None,
    };

    c.bench_function("normalize_with_description", |b| {
        b.iter(|| black_box(normalize_metadata(metadata.clone(), true)))
    });
}

criterion_group!(benches, bench_timestamp_parsing, bench_description_parsing, bench_normalization);
criterion_main!(benches);
