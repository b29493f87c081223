//! Catalog queries: shop, collections, products.

use serde_json::json;
use storefront_core::{Catalog, Collection, Product, Shop};

use crate::error::ClientError;
use crate::normalize::{normalize_collection, normalize_product, normalize_shop};
use crate::queries::{COLLECTIONS_QUERY, PRODUCTS_QUERY, PRODUCT_BY_HANDLE_QUERY, SHOP_QUERY};
use crate::types::{CollectionsData, PageInfo, ProductByHandleData, ProductsData, ShopData};

use super::{StorefrontClient, MAX_PAGES};

impl StorefrontClient {
    /// Fetches the shop's name and description.
    ///
    /// # Errors
    ///
    /// Propagates any error from the GraphQL request.
    pub async fn fetch_shop(&self) -> Result<Shop, ClientError> {
        let data: ShopData = self.execute("getShop", SHOP_QUERY, &json!({})).await?;
        Ok(normalize_shop(data.shop))
    }

    /// Fetches the first 10 collections.
    ///
    /// # Errors
    ///
    /// Propagates any error from the GraphQL request.
    pub async fn fetch_collections(&self) -> Result<Vec<Collection>, ClientError> {
        let data: CollectionsData = self
            .execute("getCollections", COLLECTIONS_QUERY, &json!({}))
            .await?;
        Ok(data
            .collections
            .into_nodes()
            .map(normalize_collection)
            .collect())
    }

    /// Fetches one page of products starting after `after`.
    ///
    /// Returns the page's products and the cursor for the next page, or
    /// `None` when this was the last page.
    ///
    /// # Errors
    ///
    /// Propagates any error from the GraphQL request.
    pub async fn fetch_products_page(
        &self,
        after: Option<&str>,
    ) -> Result<(Vec<Product>, Option<String>), ClientError> {
        let variables = json!({ "first": self.options.page_size, "after": after });
        let data: ProductsData = self
            .execute("getAllProducts", PRODUCTS_QUERY, &variables)
            .await?;

        let next_cursor = data.products.page_info.clone().and_then(next_cursor);
        let products = data.products.into_nodes().map(normalize_product).collect();
        Ok((products, next_cursor))
    }

    /// Fetches every product by following `pageInfo` cursors.
    ///
    /// All-or-nothing: if any page fails, products from earlier pages are
    /// discarded and the error is returned.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::fetch_products_page`].
    /// Returns [`ClientError::PaginationLimit`] if the number of pages exceeds
    /// [`MAX_PAGES`].
    pub async fn fetch_all_products(&self) -> Result<Vec<Product>, ClientError> {
        let mut all_products = Vec::new();
        let mut cursor: Option<String> = None;
        let mut page_count = 0usize;

        loop {
            page_count += 1;
            if page_count > MAX_PAGES {
                return Err(ClientError::PaginationLimit {
                    max_pages: MAX_PAGES,
                });
            }

            let (products, next) = self.fetch_products_page(cursor.as_deref()).await?;
            all_products.extend(products);

            cursor = next;
            if cursor.is_none() {
                break;
            }
        }

        tracing::debug!(
            pages = page_count,
            products = all_products.len(),
            "fetched product catalog"
        );
        Ok(all_products)
    }

    /// Fetches a single product by handle. `Ok(None)` when no product has
    /// that handle.
    ///
    /// # Errors
    ///
    /// Propagates any error from the GraphQL request.
    pub async fn fetch_product_by_handle(
        &self,
        handle: &str,
    ) -> Result<Option<Product>, ClientError> {
        let data: ProductByHandleData = self
            .execute(
                "getProductByHandle",
                PRODUCT_BY_HANDLE_QUERY,
                &json!({ "handle": handle }),
            )
            .await?;
        Ok(data.product.map(normalize_product))
    }

    /// Fetches shop, collections and all products concurrently and assembles
    /// them into one [`Catalog`] snapshot.
    ///
    /// # Errors
    ///
    /// Returns the first error from any of the three fetches.
    pub async fn fetch_catalog(&self) -> Result<Catalog, ClientError> {
        let (shop, collections, products) = tokio::try_join!(
            self.fetch_shop(),
            self.fetch_collections(),
            self.fetch_all_products()
        )?;

        tracing::info!(
            shop = %shop.name,
            collections = collections.len(),
            products = products.len(),
            "catalog fetched"
        );

        Ok(Catalog {
            shop,
            collections,
            products,
        })
    }
}

/// The cursor to continue from, if the backend reports another page.
///
/// A `hasNextPage` without an `endCursor` is treated as the last page.
fn next_cursor(page_info: PageInfo) -> Option<String> {
    if page_info.has_next_page {
        page_info.end_cursor.filter(|c| !c.is_empty())
    } else {
        None
    }
}
