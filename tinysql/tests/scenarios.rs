//! End-to-end coverage of `spec.md` §8's concrete scenario: a students /
//! courses / enrollments schema run through the full pipeline, checked
//! against the expected outputs listed there.

use tinysql::{Database, Outcome};

fn populated() -> (tempfile::TempDir, Database) {
    let dir = tempfile::tempdir().unwrap();
    let mut db = Database::open(dir.path()).unwrap();

    db.run("CREATE TABLE s (id INTEGER PRIMARY KEY, name STRING, age INTEGER)").unwrap();
    db.run("INSERT INTO s VALUES (1, 'John Doe', 20)").unwrap();
    db.run("INSERT INTO s VALUES (2, 'Jane Smith', 22)").unwrap();
    db.run("INSERT INTO s VALUES (3, 'Bob', 19)").unwrap();

    db.run("CREATE TABLE c (id INTEGER PRIMARY KEY, title STRING, credits INTEGER)").unwrap();
    db.run("INSERT INTO c VALUES (101, 'DB', 3)").unwrap();
    db.run("INSERT INTO c VALUES (102, 'DS', 4)").unwrap();

    db.run(
        "CREATE TABLE e (sid INTEGER, cid INTEGER, grade STRING, \
         FOREIGN KEY (sid) REFERENCES s(id), FOREIGN KEY (cid) REFERENCES c(id))",
    )
    .unwrap();
    db.run("INSERT INTO e VALUES (1, 101, 'A')").unwrap();
    db.run("INSERT INTO e VALUES (1, 102, 'B')").unwrap();
    db.run("INSERT INTO e VALUES (2, 101, 'A')").unwrap();
    db.run("INSERT INTO e VALUES (3, 102, 'C')").unwrap();

    (dir, db)
}

fn rows(outcome: Outcome) -> (Vec<String>, Vec<Vec<String>>) {
    match outcome {
        Outcome::Rows(rs) => (rs.columns, rs.rows),
        other => panic!("expected rows, got {:?}", other),
    }
}

#[test]
fn where_and_order_by() {
    let (_dir, mut db) = populated();
    let (columns, rows) = rows(db.run("SELECT name FROM s WHERE age > 20 ORDER BY age DESC").unwrap());
    assert_eq!(columns, vec!["name"]);
    assert_eq!(rows, vec![vec!["Jane Smith".to_string()]]);
}

#[test]
fn two_joins_with_a_post_join_filter() {
    let (_dir, mut db) = populated();
    let (_, rows) = rows(
        db.run("SELECT s.name, c.title FROM s JOIN e ON s.id = e.sid JOIN c ON c.id = e.cid WHERE c.credits > 3")
            .unwrap(),
    );
    assert_eq!(
        rows,
        vec![
            vec!["John Doe".to_string(), "DS".to_string()],
            vec!["Bob".to_string(), "DS".to_string()],
        ]
    );
}

#[test]
fn group_by_with_having_and_count_star() {
    let (_dir, mut db) = populated();
    let (columns, rows) = rows(db.run("SELECT age, COUNT(*) FROM s GROUP BY age HAVING COUNT(*) >= 1 ORDER BY age ASC").unwrap());
    assert_eq!(columns, vec!["age", "COUNT(*)"]);
    assert_eq!(
        rows,
        vec![
            vec!["19".to_string(), "1".to_string()],
            vec!["20".to_string(), "1".to_string()],
            vec!["22".to_string(), "1".to_string()],
        ]
    );
}

#[test]
fn count_star_over_the_whole_table() {
    let (_dir, mut db) = populated();
    let (_, rows) = rows(db.run("SELECT COUNT(*) FROM s").unwrap());
    assert_eq!(rows, vec![vec!["3".to_string()]]);
}

#[test]
fn delete_blocked_by_a_dangling_reference_leaves_the_table_untouched() {
    let (_dir, mut db) = populated();
    let err = db.run("DELETE FROM c WHERE id = 101").unwrap_err();
    assert!(matches!(err, tinysql::DbmsError::Execution(_)));

    let (_, rows) = rows(db.run("SELECT COUNT(*) FROM c").unwrap());
    assert_eq!(rows, vec![vec!["2".to_string()]]);
}

#[test]
fn missing_primary_key_auto_assigns_the_next_id() {
    let (_dir, mut db) = populated();
    db.run("INSERT INTO s (name, age) VALUES ('New', 30)").unwrap();

    let (_, rows) = rows(db.run("SELECT id FROM s WHERE name = 'New'").unwrap());
    assert_eq!(rows, vec![vec!["4".to_string()]]);
}

#[test]
fn limit_zero_and_offset_past_the_end_return_no_rows() {
    let (_dir, mut db) = populated();
    let (_, rows) = rows(db.run("SELECT name FROM s LIMIT 0").unwrap());
    assert!(rows.is_empty());

    let (_, rows) = rows(db.run("SELECT name FROM s ORDER BY id ASC OFFSET 10").unwrap());
    assert!(rows.is_empty());
}

#[test]
fn in_subquery_filters_against_a_nested_select() {
    let (_dir, mut db) = populated();
    let (_, rows) = rows(
        db.run("SELECT name FROM s WHERE id IN (SELECT sid FROM e WHERE cid = 101) ORDER BY id ASC")
            .unwrap(),
    );
    assert_eq!(rows, vec![vec!["John Doe".to_string()], vec!["Jane Smith".to_string()]]);
}
