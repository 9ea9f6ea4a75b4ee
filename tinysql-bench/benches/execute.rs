use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tinysql::Database;

fn populated() -> (tempfile::TempDir, Database) {
    let dir = tempfile::tempdir().unwrap();
    let mut db = Database::open(dir.path()).unwrap();
    db.run("CREATE TABLE s (id INTEGER PRIMARY KEY, name STRING, age INTEGER)").unwrap();
    for i in 1..=200 {
        db.run(&format!("INSERT INTO s VALUES ({i}, 'student{i}', {})", 18 + i % 10)).unwrap();
    }
    (dir, db)
}

fn execute(c: &mut Criterion) {
    let mut group = c.benchmark_group("execute");

    let (_dir, mut db) = populated();
    group.bench_function("select with where and order by", |b| {
        b.iter(|| black_box(db.run("SELECT name FROM s WHERE age > 20 ORDER BY age DESC").unwrap()));
    });

    group.bench_function("group by with having", |b| {
        b.iter(|| black_box(db.run("SELECT age, COUNT(*) FROM s GROUP BY age HAVING COUNT(*) >= 1").unwrap()));
    });

    group.bench_function("insert a single row", |b| {
        let mut i = 1000;
        b.iter(|| {
            i += 1;
            black_box(db.run(&format!("INSERT INTO s VALUES ({i}, 'extra', 30)")).unwrap());
        });
    });
}

criterion_group!(benches, execute);
criterion_main!(benches);
