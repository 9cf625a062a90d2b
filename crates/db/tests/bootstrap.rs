use sqlx::PgPool;

/// Connect, migrate, verify every table exists.
#[sqlx::test(migrations = "./migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    tiledash_db::health_check(&pool).await.unwrap();

    let tables = [
        "users",
        "password_reset_tokens",
        "categories",
        "colors",
        "tiles",
        "tile_submissions",
        "drafts",
    ];

    for table in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}

/// Tiles hold weak references: no foreign keys point at categories or colors.
#[sqlx::test(migrations = "./migrations")]
async fn test_tiles_have_no_foreign_keys(pool: PgPool) {
    let fks: Vec<(String,)> = sqlx::query_as(
        "SELECT constraint_name
         FROM information_schema.table_constraints
         WHERE table_name = 'tiles' AND constraint_type = 'FOREIGN KEY'",
    )
    .fetch_all(&pool)
    .await
    .unwrap();
    assert!(fks.is_empty(), "tiles should not have foreign keys: {fks:?}");
}
