//! Catalog use-case service.
//!
//! # Responsibility
//! - Seed the default shop catalog once.
//! - Expose listing, repricing and aggregate reports over a repository.
//!
//! # Invariants
//! - Seeding never runs against a catalog that already has categories.
//! - Repricing touches at most one product: the lowest id with that name.

use crate::model::catalog::{
    CategoryId, CategoryProductCount, CategoryWithProducts, NewCategory, NewProduct, Price,
    PriceError, ProductId,
};
use crate::repo::catalog_repo::{CatalogRepository, RepoError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for catalog use-cases.
#[derive(Debug)]
pub enum CatalogServiceError {
    InvalidPrice(PriceError),
    Repo(RepoError),
}

impl Display for CatalogServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPrice(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CatalogServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidPrice(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for CatalogServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<PriceError> for CatalogServiceError {
    fn from(value: PriceError) -> Self {
        Self::InvalidPrice(value)
    }
}

pub type CatalogServiceResult<T> = Result<T, CatalogServiceError>;

/// Result of `seed_default_catalog`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Seeded { categories: usize, products: usize },
    AlreadyPopulated,
}

/// Old and new price of a repriced product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceChange {
    pub product_id: ProductId,
    pub old: Price,
    pub new: Price,
}

/// Use-case service over a catalog repository.
pub struct CatalogService<R: CatalogRepository> {
    repo: R,
}

impl<R: CatalogRepository> CatalogService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Inserts the default categories and products unless data exists.
    pub fn seed_default_catalog(&self) -> CatalogServiceResult<SeedOutcome> {
        if self.repo.category_count()? > 0 {
            info!("event=catalog_seed module=service status=skipped reason=already_populated");
            return Ok(SeedOutcome::AlreadyPopulated);
        }

        let categories = default_catalog()?;
        let mut products = 0;
        for category in &categories {
            self.repo.create_category(category)?;
            products += category.products.len();
        }

        info!(
            "event=catalog_seed module=service status=ok categories={} products={}",
            categories.len(),
            products
        );
        Ok(SeedOutcome::Seeded {
            categories: categories.len(),
            products,
        })
    }

    /// Adds one category with its products.
    pub fn add_category(&self, category: &NewCategory) -> CatalogServiceResult<CategoryId> {
        Ok(self.repo.create_category(category)?)
    }

    /// Every category with its products.
    pub fn catalog(&self) -> CatalogServiceResult<Vec<CategoryWithProducts>> {
        Ok(self.repo.list_categories_with_products()?)
    }

    /// Sets a new price on the first product called `name`.
    ///
    /// Returns `None` when no product has that name.
    pub fn reprice_first(
        &self,
        name: &str,
        price: Price,
    ) -> CatalogServiceResult<Option<PriceChange>> {
        let Some(product) = self.repo.find_first_product_by_name(name)? else {
            info!("event=catalog_reprice module=service status=not_found");
            return Ok(None);
        };

        self.repo.update_product_price(product.id, price)?;
        info!(
            "event=catalog_reprice module=service status=ok product_id={} old_cents={} new_cents={}",
            product.id,
            product.price.cents(),
            price.cents()
        );
        Ok(Some(PriceChange {
            product_id: product.id,
            old: product.price,
            new: price,
        }))
    }

    /// Product count per non-empty category.
    pub fn product_counts(&self) -> CatalogServiceResult<Vec<CategoryProductCount>> {
        Ok(self.repo.count_products_per_category()?)
    }

    /// Categories holding more than one product.
    pub fn crowded_categories(&self) -> CatalogServiceResult<Vec<CategoryProductCount>> {
        Ok(self.repo.categories_with_more_than(1)?)
    }
}

/// The shop's starter catalog: three categories, five products.
pub fn default_catalog() -> Result<Vec<NewCategory>, PriceError> {
    let product = |name: &str, price: &str| -> Result<NewProduct, PriceError> {
        Ok(NewProduct::new(name, price.parse()?))
    };

    Ok(vec![
        NewCategory::new("Electronics", "Gadgets and devices.")
            .with_product(product("Smartphone", "299.99")?)
            .with_product(product("Laptop", "499.99")?),
        NewCategory::new("Books", "Printed books and e-books.")
            .with_product(product("Science fiction novel", "15.99")?),
        NewCategory::new("Clothing", "Clothing for men and women.")
            .with_product(product("Jeans", "40.50")?)
            .with_product(product("T-shirt", "20.00")?),
    ])
}
