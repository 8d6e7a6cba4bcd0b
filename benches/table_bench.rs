use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use tempfile::TempDir;

use dbase3::query::Search;
use dbase3::table::{TableFile, Value};
use dbase3::testutil::{RowGenerator, fixed_options, generate_table, mixed_fields};

const ROW_COUNTS: &[usize] = &[1_000, 10_000, 100_000];

fn bench_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("table/append");
    group.throughput(Throughput::Elements(1));
    group.bench_function("mixed", |b| {
        let dir = TempDir::new().unwrap();
        let mut table =
            TableFile::create_with(dir.path().join("append.dbf"), &mixed_fields(), fixed_options())
                .unwrap();
        let fields = table.fields().to_vec();
        let mut generator = RowGenerator::new(42);
        let rows: Vec<Vec<Value>> = (0..1024).map(|_| generator.row(&fields)).collect();
        let mut i = 0;
        b.iter(|| {
            table.append(black_box(&rows[i % rows.len()])).unwrap();
            i += 1;
        })
    });
    group.finish();
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("table/scan");
    for &num_rows in ROW_COUNTS {
        let dir = TempDir::new().unwrap();
        let mut table = generate_table(
            &dir.path().join(format!("scan_{num_rows}.dbf")),
            &mixed_fields(),
            num_rows,
            42,
        )
        .unwrap();

        group.throughput(Throughput::Elements(num_rows as u64));
        group.bench_with_input(BenchmarkId::new("filter", num_rows), &num_rows, |b, _| {
            // no generated name starts with a digit, so every record is visited
            b.iter(|| table.filter("name", black_box(&Value::from("0")), None).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("get", num_rows), &num_rows, |b, &n| {
            let mut i = 0;
            b.iter(|| {
                i = (i + 7919) % n;
                table.get(black_box(i)).unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_append, bench_scan);
criterion_main!(benches);
