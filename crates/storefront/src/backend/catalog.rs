//! Catalog read methods.
//!
//! All catalog endpoints are public; results are cached for 5 minutes
//! except search, which is always live.

use tracing::{debug, instrument};

use arbor_core::{Category, CategoryId, Department, DepartmentId, Product, ProductId};

use super::cache::CacheValue;
use super::{ApiError, ShopClient};

impl ShopClient {
    /// Get all departments.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn departments(&self) -> Result<Vec<Department>, ApiError> {
        let cache_key = "departments".to_string();

        if let Some(CacheValue::Departments(departments)) =
            self.inner.cache.get(&cache_key).await
        {
            debug!("cache hit for departments");
            return Ok(departments);
        }

        let departments: Vec<Department> = self.get_json("/departments", None).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Departments(departments.clone()))
            .await;

        Ok(departments)
    }

    /// Get the categories of a department.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(department_id = %department_id))]
    pub async fn categories(
        &self,
        department_id: DepartmentId,
    ) -> Result<Vec<Category>, ApiError> {
        let cache_key = format!("categories:{department_id}");

        if let Some(CacheValue::Categories(categories)) = self.inner.cache.get(&cache_key).await {
            debug!("cache hit for categories");
            return Ok(categories);
        }

        let categories: Vec<Category> = self
            .get_json(&format!("/departments/{department_id}/categories"), None)
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Categories(categories.clone()))
            .await;

        Ok(categories)
    }

    /// Get the products of a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(category_id = %category_id))]
    pub async fn products_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, ApiError> {
        let cache_key = format!("products:{category_id}");

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("cache hit for products");
            return Ok(products);
        }

        let products: Vec<Product> = self
            .get_json(&format!("/categories/{category_id}/products"), None)
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Get a product with its options.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn product(&self, product_id: ProductId) -> Result<Product, ApiError> {
        let cache_key = format!("product:{product_id}");

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("cache hit for product");
            return Ok(*product);
        }

        let product: Product = self
            .get_json(&format!("/products/{product_id}"), None)
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Get recommendations for a product. Not cached; the backend varies
    /// them per call.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn recommendations(&self, product_id: ProductId) -> Result<Vec<Product>, ApiError> {
        self.get_json(&format!("/products/{product_id}/recommendations"), None)
            .await
    }

    /// Search products by name. Always live.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn search_products(&self, query: &str) -> Result<Vec<Product>, ApiError> {
        self.get_json_query("/products/search", &[("query", query)], None)
            .await
    }

    /// Invalidate all cached catalog data.
    pub async fn invalidate_catalog(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}
