use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tinysql_parser::parse;

fn parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    let select = "SELECT * FROM s WHERE id = 1";
    group.bench_function("simple select", |b| {
        b.iter(|| black_box(parse(black_box(select)).unwrap()));
    });

    let derived = "
        SELECT agg.name, agg.total
        FROM (SELECT s.name, COUNT(*) AS total FROM s JOIN e ON s.id = e.sid GROUP BY s.name) agg
        WHERE agg.total > 1
        ORDER BY agg.total DESC
        ";
    group.bench_function("derived table with join and aggregate", |b| {
        b.iter(|| black_box(parse(black_box(derived)).unwrap()));
    });

    let create = "CREATE TABLE s (id INTEGER PRIMARY KEY, name STRING, age INTEGER)";
    group.bench_function("create table", |b| {
        b.iter(|| black_box(parse(black_box(create)).unwrap()));
    });
}

criterion_group!(benches, parsing);
criterion_main!(benches);
