use criterion::{black_box, criterion_group, criterion_main, Criterion};
use quill_sql::Parser;

const SIMPLE_SELECT: &str = "SELECT id, name FROM users WHERE id = 1";

const MULTI_JOIN_SELECT: &str = "
    SELECT u.id, o.total, p.name
    FROM users u
    JOIN orders o ON o.user_id = u.id
    LEFT JOIN order_items i ON i.order_id = o.id
    JOIN products p ON p.id = i.product_id
    WHERE o.status = 'paid' AND u.active = TRUE
    ORDER BY o.total DESC
    LIMIT 50
";

const WINDOW_FUNCTION: &str = "
    SELECT
        id,
        amount,
        SUM(amount) OVER (PARTITION BY account_id ORDER BY posted_at
            ROWS BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW) AS running_total
    FROM ledger_entries
";

const RECURSIVE_CTE: &str = "
    WITH RECURSIVE tree(id, parent_id, depth) AS (
        SELECT id, parent_id, 0 FROM categories WHERE parent_id IS NULL
        UNION ALL
        SELECT c.id, c.parent_id, t.depth + 1
        FROM categories c JOIN tree t ON c.parent_id = t.id
    )
    SELECT id, depth FROM tree ORDER BY depth
";

const INSERT_ON_CONFLICT: &str = "
    INSERT INTO inventory (sku, quantity)
    VALUES ('sku-1', 10), ('sku-2', 5)
    ON CONFLICT (sku) DO UPDATE SET quantity = inventory.quantity + EXCLUDED.quantity
";

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for (name, sql) in [
        ("simple_select", SIMPLE_SELECT),
        ("multi_join_select", MULTI_JOIN_SELECT),
        ("window_function", WINDOW_FUNCTION),
        ("recursive_cte", RECURSIVE_CTE),
        ("insert_on_conflict", INSERT_ON_CONFLICT),
    ] {
        group.bench_function(name, |b| {
            let mut parser = Parser::with_defaults();
            b.iter(|| {
                let ast = parser.parse(black_box(sql)).unwrap();
                black_box(ast.node_count());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
