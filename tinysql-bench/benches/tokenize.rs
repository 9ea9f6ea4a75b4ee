use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tinysql_lexer::Lexer;

fn tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");

    let short = "SELECT * FROM s WHERE age > 20";
    let long = "
        SELECT s.name, c.title, COUNT(*)
        FROM s
        JOIN e ON s.id = e.sid
        JOIN c ON c.id = e.cid
        WHERE c.credits > 3
        GROUP BY s.name, c.title
        HAVING COUNT(*) >= 1
        ORDER BY s.name ASC
        LIMIT 10 OFFSET 0
        ";

    group.bench_function("short statement", |b| {
        b.iter(|| {
            let mut lexer = Lexer::new(black_box(short));
            black_box(lexer.tokenize().unwrap());
        });
    });

    group.bench_function("joins and aggregation", |b| {
        b.iter(|| {
            let mut lexer = Lexer::new(black_box(long));
            black_box(lexer.tokenize().unwrap());
        });
    });
}

criterion_group!(benches, tokenize);
criterion_main!(benches);
