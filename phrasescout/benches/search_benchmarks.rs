use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use phrasescout::{Document, PhraseSet, SearchConfig, SearchEngine};
use std::num::NonZeroUsize;

const WORDS: &[&str] = &[
    "now", "is", "the", "winter", "of", "our", "discontent", "made", "glorious", "summer", "by",
    "this", "sun", "york", "and", "all", "clouds", "that", "lour'd", "upon", "house",
];

fn create_documents(count: usize, words_per_document: usize) -> Vec<Document> {
    (0..count)
        .map(|i| {
            let body: Vec<&str> = (0..words_per_document)
                .map(|j| WORDS[(i * 31 + j * 17 + j / 3) % WORDS.len()])
                .collect();
            Document::new(format!("ACT {}", i), body.join(" "))
        })
        .collect()
}

fn create_phrases(count: usize) -> PhraseSet {
    (0..count)
        .map(|i| format!("{} {}", WORDS[i % WORDS.len()], WORDS[(i * 5 + 1) % WORDS.len()]))
        .collect()
}

fn create_engine(
    threads: usize,
    document_split: Option<usize>,
    phrase_split: Option<usize>,
) -> SearchEngine {
    let config = SearchConfig {
        thread_count: NonZeroUsize::new(threads).unwrap(),
        document_split_threshold: document_split,
        phrase_split_threshold: phrase_split,
        ..SearchConfig::default()
    };
    SearchEngine::new(&config).unwrap()
}

fn bench_thread_scaling(c: &mut Criterion) {
    let documents = create_documents(200, 2_000);
    let phrases = create_phrases(40);

    let mut group = c.benchmark_group("Thread Scaling");
    for threads in [1, 2, 4, 8] {
        let engine = create_engine(threads, None, None);
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, _| {
            b.iter(|| black_box(engine.search(&documents, &phrases).unwrap()));
        });
    }
    group.finish();
}

fn bench_split_thresholds(c: &mut Criterion) {
    let documents = create_documents(200, 2_000);
    let phrases = create_phrases(40);

    let mut group = c.benchmark_group("Split Thresholds");
    let settings = [
        ("sequential", Some(usize::MAX), Some(usize::MAX)),
        ("half", None, None),
        ("documents_only", Some(1), Some(usize::MAX)),
        ("maximal", Some(1), Some(1)),
    ];
    for (name, document_split, phrase_split) in settings {
        let engine = create_engine(num_cpus_hint(), document_split, phrase_split);
        group.bench_function(name, |b| {
            b.iter(|| black_box(engine.search(&documents, &phrases).unwrap()));
        });
    }
    group.finish();
}

fn bench_corpus_scaling(c: &mut Criterion) {
    let phrases = create_phrases(20);

    let mut group = c.benchmark_group("Corpus Scaling");
    for count in [10, 100, 1_000] {
        let documents = create_documents(count, 500);
        let engine = create_engine(num_cpus_hint(), None, None);
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| black_box(engine.search(&documents, &phrases).unwrap()));
        });
    }
    group.finish();
}

fn num_cpus_hint() -> usize {
    SearchConfig::default().thread_count.get()
}

criterion_group!(
    benches,
    bench_thread_scaling,
    bench_split_thresholds,
    bench_corpus_scaling
);
criterion_main!(benches);
