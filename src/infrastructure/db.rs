use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

/// Tables in creation order: every parent is created before the first
/// table whose foreign keys reference it.
const SCHEMA: &[(&str, &str)] = &[
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            phone TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            deleted_at TEXT
        )
        "#,
    ),
    (
        "businesses",
        r#"
        CREATE TABLE IF NOT EXISTS businesses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            description TEXT,
            address TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            deleted_at TEXT,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE RESTRICT
        )
        "#,
    ),
    (
        "products",
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            business_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            description TEXT,
            price REAL NOT NULL DEFAULT 0,
            stock INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            deleted_at TEXT,
            FOREIGN KEY (business_id) REFERENCES businesses(id) ON DELETE RESTRICT
        )
        "#,
    ),
    (
        "orders",
        r#"
        CREATE TABLE IF NOT EXISTS orders (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            status TEXT NOT NULL DEFAULT 'pending',
            total REAL NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            deleted_at TEXT,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE RESTRICT
        )
        "#,
    ),
    (
        "payments",
        r#"
        CREATE TABLE IF NOT EXISTS payments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            order_id INTEGER UNIQUE,
            amount REAL NOT NULL,
            method TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'pending',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            deleted_at TEXT,
            FOREIGN KEY (order_id) REFERENCES orders(id) ON DELETE SET NULL
        )
        "#,
    ),
    (
        "chats",
        r#"
        CREATE TABLE IF NOT EXISTS chats (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER,
            business_id INTEGER,
            message TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            deleted_at TEXT,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE SET NULL,
            FOREIGN KEY (business_id) REFERENCES businesses(id) ON DELETE SET NULL
        )
        "#,
    ),
    (
        "notifications",
        r#"
        CREATE TABLE IF NOT EXISTS notifications (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER,
            message TEXT NOT NULL,
            read BOOLEAN NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            deleted_at TEXT,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE SET NULL
        )
        "#,
    ),
    (
        "reviews",
        r#"
        CREATE TABLE IF NOT EXISTS reviews (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER,
            product_id INTEGER,
            rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
            comment TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            deleted_at TEXT,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE SET NULL,
            FOREIGN KEY (product_id) REFERENCES products(id) ON DELETE SET NULL
        )
        "#,
    ),
    (
        "carts",
        r#"
        CREATE TABLE IF NOT EXISTS carts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            deleted_at TEXT,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE SET NULL
        )
        "#,
    ),
    (
        "cart_items",
        r#"
        CREATE TABLE IF NOT EXISTS cart_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            cart_id INTEGER,
            product_id INTEGER,
            quantity INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            deleted_at TEXT,
            FOREIGN KEY (cart_id) REFERENCES carts(id) ON DELETE CASCADE,
            FOREIGN KEY (product_id) REFERENCES products(id) ON DELETE CASCADE
        )
        "#,
    ),
];

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_businesses_user_id ON businesses(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_products_business_id ON products(business_id)",
    "CREATE INDEX IF NOT EXISTS idx_orders_user_id ON orders(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_reviews_product_id ON reviews(product_id)",
    "CREATE INDEX IF NOT EXISTS idx_cart_items_cart_id ON cart_items(cart_id)",
    "CREATE INDEX IF NOT EXISTS idx_cart_items_product_id ON cart_items(product_id)",
];

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    // Only the SQLite driver is compiled in and the DDL below is SQLite's
    if !database_url.starts_with("sqlite:") {
        return Err(DbErr::Custom(format!(
            "unsupported database url {:?}: expected a sqlite: url",
            database_url
        )));
    }

    let db = Database::connect(database_url).await?;

    // SQLite only enforces foreign keys when asked to
    execute(&db, "PRAGMA foreign_keys = ON").await?;

    run_migrations(&db).await?;

    Ok(db)
}

/// Create every table and index. Safe to run on each start: statements are
/// `IF NOT EXISTS`, so constraints are never declared twice.
pub async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    for (table, ddl) in SCHEMA {
        execute(db, ddl).await?;
        tracing::debug!("Table {} ready", table);
    }

    for ddl in INDEXES {
        execute(db, ddl).await?;
    }

    Ok(())
}

async fn execute(db: &DatabaseConnection, sql: &str) -> Result<(), DbErr> {
    db.execute(Statement::from_string(
        db.get_database_backend(),
        sql.to_owned(),
    ))
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AssociationGraph;
    use crate::models::EntityKind;

    #[test]
    fn test_schema_follows_kind_order() {
        let tables: Vec<&str> = SCHEMA.iter().map(|(table, _)| *table).collect();
        let kinds: Vec<&str> = EntityKind::ALL.iter().map(|k| k.table_name()).collect();
        assert_eq!(tables, kinds);
    }

    #[tokio::test]
    async fn test_non_sqlite_url_rejected() {
        let err = init_db("postgres://localhost/foodglobal").await.unwrap_err();
        assert!(matches!(err, DbErr::Custom(_)));
        assert!(err.to_string().contains("sqlite"));
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let db = init_db("sqlite::memory:").await.unwrap();
        run_migrations(&db).await.unwrap();
        run_migrations(&db).await.unwrap();

        // One foreign key per declared column, however often migrations ran
        let rows = db
            .query_all(Statement::from_string(
                db.get_database_backend(),
                "SELECT COUNT(*) AS n FROM pragma_foreign_key_list('cart_items')".to_owned(),
            ))
            .await
            .unwrap();
        let count: i64 = rows[0].try_get("", "n").unwrap();
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn test_foreign_keys_match_association_graph() {
        let db = init_db("sqlite::memory:").await.unwrap();
        let graph = AssociationGraph::standard().unwrap();
        let backend = db.get_database_backend();

        for kind in EntityKind::ALL {
            let table = kind.table_name();
            let parents: Vec<_> = graph.parents_of(kind).collect();

            let rows = db
                .query_all(Statement::from_string(
                    backend,
                    format!("SELECT COUNT(*) AS n FROM pragma_foreign_key_list('{table}')"),
                ))
                .await
                .unwrap();
            let declared: i64 = rows[0].try_get("", "n").unwrap();
            assert_eq!(declared as usize, parents.len(), "foreign keys on {table}");

            for edge in parents {
                let fk = edge.foreign_key;

                let rows = db
                    .query_all(Statement::from_string(
                        backend,
                        format!(
                            "SELECT \"table\" AS t FROM pragma_foreign_key_list('{table}') WHERE \"from\" = '{fk}'"
                        ),
                    ))
                    .await
                    .unwrap();
                assert_eq!(rows.len(), 1, "{table}.{fk} has no foreign key");
                let referenced: String = rows[0].try_get("", "t").unwrap();
                assert_eq!(referenced, edge.target.table_name(), "{table}.{fk}");

                let rows = db
                    .query_all(Statement::from_string(
                        backend,
                        format!(
                            "SELECT \"notnull\" AS n FROM pragma_table_info('{table}') WHERE name = '{fk}'"
                        ),
                    ))
                    .await
                    .unwrap();
                let not_null: i64 = rows[0].try_get("", "n").unwrap();
                assert_eq!(not_null == 1, !edge.nullable, "nullability of {table}.{fk}");
            }
        }
    }
}
