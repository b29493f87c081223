//! GraphQL documents sent to the Storefront API.

/// Fields shared by every query that returns a product.
macro_rules! product_fields {
    () => {
        r"
      id
      title
      handle
      descriptionHtml
      productType
      tags
      priceRange {
        minVariantPrice {
          amount
          currencyCode
        }
      }
      images(first: 10) {
        edges {
          node {
            url
            altText
          }
        }
      }
      options {
        name
        values
      }
      variants(first: 100) {
        edges {
          node {
            id
            title
            price {
              amount
              currencyCode
            }
            selectedOptions {
              name
              value
            }
            image {
              url
              altText
            }
            availableForSale
          }
        }
      }
"
    };
}

/// Fields returned by both cart mutations.
macro_rules! cart_fields {
    () => {
        r"
      cart {
        id
        checkoutUrl
        totalQuantity
      }
      userErrors {
        field
        message
        code
      }
"
    };
}

pub(crate) const SHOP_QUERY: &str = r"
query getShop {
  shop {
    name
    description
  }
}
";

pub(crate) const COLLECTIONS_QUERY: &str = r"
query getCollections {
  collections(first: 10) {
    edges {
      node {
        id
        title
        handle
      }
    }
  }
}
";

pub(crate) const PRODUCTS_QUERY: &str = concat!(
    r"
query getAllProducts($first: Int!, $after: String) {
  products(first: $first, after: $after) {
    pageInfo {
      hasNextPage
      endCursor
    }
    edges {
      node {",
    product_fields!(),
    r"      }
    }
  }
}
"
);

pub(crate) const PRODUCT_BY_HANDLE_QUERY: &str = concat!(
    r"
query getProductByHandle($handle: String!) {
  product(handle: $handle) {",
    product_fields!(),
    r"  }
}
"
);

pub(crate) const CART_CREATE_MUTATION: &str = concat!(
    r"
mutation cartCreate($input: CartInput!) {
  cartCreate(input: $input) {",
    cart_fields!(),
    r"  }
}
"
);

pub(crate) const CART_LINES_ADD_MUTATION: &str = concat!(
    r"
mutation cartLinesAdd($cartId: ID!, $lines: [CartLineInput!]!) {
  cartLinesAdd(cartId: $cartId, lines: $lines) {",
    cart_fields!(),
    r"  }
}
"
);
