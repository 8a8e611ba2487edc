//! Pipeline performance benchmarks.
//!
//! Measures per-field classification and whole-table processing.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mobclean::{classify_field, normalize_digits, DataTable, Pipeline, WorkbookWriter};

/// Generate a contact table with `rows` rows.
fn generate_table(rows: usize) -> DataTable {
    let data = (0..rows)
        .map(|row| {
            let contact = match row % 5 {
                0 => format!("017{:08}", row),
                1 => format!("+880-18{:08} / 019{:08}", row, row),
                2 => format!("{}", row % 10_000),
                3 => format!("৮৮০১৫{:08}", row),
                _ => String::new(),
            };
            vec![
                Some(format!("Person {}", row)),
                (!contact.is_empty()).then_some(contact),
            ]
        })
        .collect();
    DataTable::new(vec!["name".into(), "mobile".into()], data)
}

/// Benchmark the per-field steps.
fn bench_field(c: &mut Criterion) {
    let mut group = c.benchmark_group("field");

    let fields = [
        ("single", "01712345678"),
        ("bengali", "৮৮০১৭১২৩৪৫৬৭৮"),
        ("multi", "+880 1712-345678, 01812345678 / 123, 01812345678"),
    ];

    for (name, field) in fields.iter() {
        group.bench_with_input(BenchmarkId::new("normalize_digits", name), field, |b, f| {
            b.iter(|| black_box(normalize_digits(f)))
        });
        group.bench_with_input(BenchmarkId::new("classify_field", name), field, |b, f| {
            b.iter(|| black_box(classify_field(Some(*f))))
        });
    }

    group.finish();
}

/// Benchmark the whole-table pipeline.
fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let pipeline = Pipeline::new();

    for rows in [100, 1_000, 10_000, 100_000].iter() {
        let table = generate_table(*rows);

        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &table, |b, table| {
            b.iter(|| black_box(pipeline.run(table, "mobile").unwrap()))
        });
    }

    group.finish();
}

/// Benchmark writing the output workbook.
fn bench_write_workbook(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_workbook");
    let writer = WorkbookWriter::new();

    for rows in [1_000, 10_000].iter() {
        let output = Pipeline::new().run(&generate_table(*rows), "mobile").unwrap();

        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &output, |b, output| {
            b.iter(|| black_box(writer.to_buffer(output).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_field, bench_pipeline, bench_write_workbook);
criterion_main!(benches);
