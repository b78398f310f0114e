use rusqlite::params;
use signup_core::db::open_db_in_memory;
use signup_core::{
    CatalogRepository, CatalogService, NewCategory, NewProduct, Price, RepoError, SeedOutcome,
    SqliteCatalogRepository,
};

fn price(value: &str) -> Price {
    value.parse().unwrap()
}

#[test]
fn seeding_populates_once() {
    let conn = open_db_in_memory().unwrap();
    let service = CatalogService::new(SqliteCatalogRepository::new(&conn));

    assert_eq!(
        service.seed_default_catalog().unwrap(),
        SeedOutcome::Seeded {
            categories: 3,
            products: 5,
        }
    );
    assert_eq!(
        service.seed_default_catalog().unwrap(),
        SeedOutcome::AlreadyPopulated
    );

    let products: i64 = conn
        .query_row("SELECT COUNT(*) FROM products;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(products, 5);
}

#[test]
fn catalog_lists_categories_with_their_products() {
    let conn = open_db_in_memory().unwrap();
    let service = CatalogService::new(SqliteCatalogRepository::new(&conn));
    service.seed_default_catalog().unwrap();

    let catalog = service.catalog().unwrap();
    let names: Vec<&str> = catalog
        .iter()
        .map(|entry| entry.category.name.as_str())
        .collect();
    assert_eq!(names, vec!["Electronics", "Books", "Clothing"]);

    let electronics = &catalog[0];
    assert_eq!(electronics.category.description, "Gadgets and devices.");
    let products: Vec<(&str, String)> = electronics
        .products
        .iter()
        .map(|product| (product.name.as_str(), product.price.to_string()))
        .collect();
    assert_eq!(
        products,
        vec![
            ("Smartphone", "299.99".to_string()),
            ("Laptop", "499.99".to_string()),
        ]
    );
    assert!(electronics
        .products
        .iter()
        .all(|product| product.in_stock && product.category_id == Some(electronics.category.id)));
}

#[test]
fn reprice_first_updates_only_the_first_match() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCatalogRepository::new(&conn);
    repo.create_category(
        &NewCategory::new("Electronics", "Gadgets and devices.")
            .with_product(NewProduct::new("Smartphone", price("299.99")))
            .with_product(NewProduct::new("Smartphone", price("199.99"))),
    )
    .unwrap();
    let service = CatalogService::new(SqliteCatalogRepository::new(&conn));

    let change = service
        .reprice_first("Smartphone", price("349.99"))
        .unwrap()
        .unwrap();
    assert_eq!(change.old, price("299.99"));
    assert_eq!(change.new, price("349.99"));

    let updated = repo.get_product(change.product_id).unwrap().unwrap();
    assert_eq!(updated.price.to_string(), "349.99");

    let mut stmt = conn
        .prepare("SELECT price_cents FROM products ORDER BY id ASC;")
        .unwrap();
    let prices: Vec<i64> = stmt
        .query_map([], |row| row.get(0))
        .unwrap()
        .map(Result::unwrap)
        .collect();
    assert_eq!(prices, vec![34_999, 19_999]);
}

#[test]
fn reprice_unknown_product_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let service = CatalogService::new(SqliteCatalogRepository::new(&conn));
    service.seed_default_catalog().unwrap();

    assert_eq!(service.reprice_first("Tablet", price("1.00")).unwrap(), None);
}

#[test]
fn update_missing_product_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCatalogRepository::new(&conn);

    let err = repo.update_product_price(404, price("1.00")).unwrap_err();
    assert!(matches!(err, RepoError::ProductNotFound(404)));
}

#[test]
fn product_counts_skip_empty_categories() {
    let conn = open_db_in_memory().unwrap();
    let service = CatalogService::new(SqliteCatalogRepository::new(&conn));
    service.seed_default_catalog().unwrap();
    service
        .add_category(&NewCategory::new("Toys", "Games for children."))
        .unwrap();

    let counts: Vec<(String, u32)> = service
        .product_counts()
        .unwrap()
        .into_iter()
        .map(|count| (count.name, count.product_count))
        .collect();
    assert_eq!(
        counts,
        vec![
            ("Electronics".to_string(), 2),
            ("Books".to_string(), 1),
            ("Clothing".to_string(), 2),
        ]
    );
}

#[test]
fn crowded_categories_have_more_than_one_product() {
    let conn = open_db_in_memory().unwrap();
    let service = CatalogService::new(SqliteCatalogRepository::new(&conn));
    service.seed_default_catalog().unwrap();

    let names: Vec<String> = service
        .crowded_categories()
        .unwrap()
        .into_iter()
        .map(|count| count.name)
        .collect();
    assert_eq!(names, vec!["Electronics".to_string(), "Clothing".to_string()]);
}

#[test]
fn invalid_category_is_rejected_before_write() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCatalogRepository::new(&conn);

    let err = repo
        .create_category(&NewCategory::new("Books", "d".repeat(256)))
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert_eq!(repo.category_count().unwrap(), 0);
}

#[test]
fn corrupted_in_stock_value_is_reported() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCatalogRepository::new(&conn);
    let category_id = repo
        .create_category(
            &NewCategory::new("Clothing", "Clothing for men and women.")
                .with_product(NewProduct::new("Jeans", price("40.50"))),
        )
        .unwrap();

    conn.execute_batch("PRAGMA ignore_check_constraints = ON;")
        .unwrap();
    conn.execute(
        "UPDATE products SET in_stock = 7 WHERE category_id = ?1;",
        params![category_id],
    )
    .unwrap();

    let err = repo.find_first_product_by_name("Jeans").unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}
