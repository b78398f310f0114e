//! Catalog repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist categories with their products.
//! - Serve listing, lookup, repricing and per-category aggregates.
//!
//! # Invariants
//! - Writes call `NewCategory::validate()` before any SQL runs.
//! - A category and its initial products are inserted atomically.
//! - Reads reject persisted rows that violate model invariants.

use crate::db::DbError;
use crate::model::catalog::{
    CatalogValidationError, Category, CategoryId, CategoryProductCount, CategoryWithProducts,
    NewCategory, Price, Product, ProductId,
};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PRODUCT_SELECT_SQL: &str = "SELECT
    id,
    name,
    price_cents,
    in_stock,
    category_id
FROM products";

pub type RepoResult<T> = Result<T, RepoError>;

/// Catalog persistence error.
#[derive(Debug)]
pub enum RepoError {
    Validation(CatalogValidationError),
    Db(DbError),
    ProductNotFound(ProductId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::ProductNotFound(id) => write!(f, "product not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted catalog data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::ProductNotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<CatalogValidationError> for RepoError {
    fn from(value: CatalogValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for the category/product catalog.
pub trait CatalogRepository {
    fn create_category(&self, category: &NewCategory) -> RepoResult<CategoryId>;
    fn category_count(&self) -> RepoResult<u32>;
    fn list_categories_with_products(&self) -> RepoResult<Vec<CategoryWithProducts>>;
    fn get_product(&self, id: ProductId) -> RepoResult<Option<Product>>;
    fn find_first_product_by_name(&self, name: &str) -> RepoResult<Option<Product>>;
    fn update_product_price(&self, id: ProductId, price: Price) -> RepoResult<()>;
    /// Categories without products are not listed.
    fn count_products_per_category(&self) -> RepoResult<Vec<CategoryProductCount>>;
    /// Categories holding strictly more than `min_products` products.
    fn categories_with_more_than(&self, min_products: u32)
        -> RepoResult<Vec<CategoryProductCount>>;
}

/// SQLite-backed catalog repository.
pub struct SqliteCatalogRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCatalogRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn product_counts(&self, min_products: Option<u32>) -> RepoResult<Vec<CategoryProductCount>> {
        let mut stmt = self.conn.prepare(
            "SELECT c.id, c.name, COUNT(p.id) AS product_count
             FROM categories c
             JOIN products p ON p.category_id = c.id
             GROUP BY c.id
             HAVING (?1 IS NULL OR COUNT(p.id) > ?1)
             ORDER BY c.id ASC;",
        )?;

        let rows = stmt.query_map(params![min_products], |row| {
            Ok(CategoryProductCount {
                category_id: row.get(0)?,
                name: row.get(1)?,
                product_count: row.get(2)?,
            })
        })?;

        let mut counts = Vec::new();
        for row in rows {
            counts.push(row?);
        }
        Ok(counts)
    }
}

impl CatalogRepository for SqliteCatalogRepository<'_> {
    fn create_category(&self, category: &NewCategory) -> RepoResult<CategoryId> {
        category.validate()?;

        // A shared `&Connection` cannot open a checked transaction.
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO categories (name, description) VALUES (?1, ?2);",
            params![category.name.as_str(), category.description.as_str()],
        )?;
        let category_id = tx.last_insert_rowid();

        {
            let mut insert = tx.prepare(
                "INSERT INTO products (name, price_cents, in_stock, category_id)
                 VALUES (?1, ?2, ?3, ?4);",
            )?;
            for product in &category.products {
                insert.execute(params![
                    product.name.as_str(),
                    product.price.cents(),
                    bool_to_int(product.in_stock),
                    category_id,
                ])?;
            }
        }
        tx.commit()?;

        Ok(category_id)
    }

    fn category_count(&self) -> RepoResult<u32> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM categories;", [], |row| row.get(0))?;
        Ok(count)
    }

    fn list_categories_with_products(&self) -> RepoResult<Vec<CategoryWithProducts>> {
        let mut category_stmt = self
            .conn
            .prepare("SELECT id, name, description FROM categories ORDER BY id ASC;")?;
        let categories = category_stmt.query_map([], |row| {
            Ok(Category {
                id: row.get("id")?,
                name: row.get("name")?,
                description: row.get("description")?,
            })
        })?;

        let mut product_stmt = self.conn.prepare(&format!(
            "{PRODUCT_SELECT_SQL}
             WHERE category_id = ?1
             ORDER BY id ASC;"
        ))?;

        let mut listing = Vec::new();
        for category in categories {
            let category = category?;
            let mut rows = product_stmt.query([category.id])?;
            let mut products = Vec::new();
            while let Some(row) = rows.next()? {
                products.push(parse_product_row(row)?);
            }
            listing.push(CategoryWithProducts { category, products });
        }
        Ok(listing)
    }

    fn get_product(&self, id: ProductId) -> RepoResult<Option<Product>> {
        let row = self
            .conn
            .query_row(
                &format!("{PRODUCT_SELECT_SQL} WHERE id = ?1;"),
                [id],
                |row| Ok(parse_product_row(row)),
            )
            .optional()?;
        row.transpose()
    }

    fn find_first_product_by_name(&self, name: &str) -> RepoResult<Option<Product>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PRODUCT_SELECT_SQL}
             WHERE name = ?1
             ORDER BY id ASC
             LIMIT 1;"
        ))?;

        let mut rows = stmt.query([name])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_product_row(row)?));
        }

        Ok(None)
    }

    fn update_product_price(&self, id: ProductId, price: Price) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE products SET price_cents = ?1 WHERE id = ?2;",
            params![price.cents(), id],
        )?;

        if changed == 0 {
            return Err(RepoError::ProductNotFound(id));
        }
        Ok(())
    }

    fn count_products_per_category(&self) -> RepoResult<Vec<CategoryProductCount>> {
        self.product_counts(None)
    }

    fn categories_with_more_than(
        &self,
        min_products: u32,
    ) -> RepoResult<Vec<CategoryProductCount>> {
        self.product_counts(Some(min_products))
    }
}

fn parse_product_row(row: &Row<'_>) -> RepoResult<Product> {
    let cents: i64 = row.get("price_cents")?;
    let price = Price::from_cents(cents).map_err(|err| {
        RepoError::InvalidData(format!("invalid value `{cents}` in products.price_cents: {err}"))
    })?;

    let in_stock = match row.get::<_, i64>("in_stock")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid in_stock value `{other}` in products.in_stock"
            )));
        }
    };

    Ok(Product {
        id: row.get("id")?,
        name: row.get("name")?,
        price,
        in_stock,
        category_id: row.get("category_id")?,
    })
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
