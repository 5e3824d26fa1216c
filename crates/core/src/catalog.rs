//! Catalog queries: filter, sort, and paginate the in-memory product list.
//!
//! The whole catalog is small enough to ship in one response, so queries
//! run over the already-fetched slice instead of being pushed to the
//! backend files. Every operation is pure: the input list is never
//! mutated, and the same query over the same list always yields the same
//! page.

use serde::{Deserialize, Serialize};

use crate::types::product::Product;

/// Page size of the public storefront grid.
pub const STOREFRONT_PAGE_SIZE: usize = 12;
/// Page size of the admin product table.
pub const ADMIN_PAGE_SIZE: usize = 10;

/// Sort orders offered by the storefront and the admin table.
///
/// All sorts are stable: products that compare equal keep the order the
/// API returned them in (newest first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Featured products first, otherwise input order.
    #[default]
    Featured,
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
    IdAsc,
    IdDesc,
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Featured => "featured",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::NameAsc => "name-asc",
            Self::NameDesc => "name-desc",
            Self::IdAsc => "id-asc",
            Self::IdDesc => "id-desc",
        };
        write!(f, "{name}")
    }
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "featured" => Ok(Self::Featured),
            "price-asc" => Ok(Self::PriceAsc),
            "price-desc" => Ok(Self::PriceDesc),
            "name-asc" => Ok(Self::NameAsc),
            "name-desc" => Ok(Self::NameDesc),
            "id-asc" => Ok(Self::IdAsc),
            "id-desc" => Ok(Self::IdDesc),
            _ => Err(format!("invalid sort key: {s}")),
        }
    }
}

/// A catalog query.
///
/// Setters reset `page` to 1, so a stale page number never outlives a
/// filter or sort change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    search: String,
    category: Option<String>,
    featured_only: bool,
    sort: SortKey,
    page: usize,
    page_size: usize,
}

impl CatalogQuery {
    /// Query with the storefront page size (12).
    #[must_use]
    pub fn storefront() -> Self {
        Self::with_page_size(STOREFRONT_PAGE_SIZE)
    }

    /// Query with the admin table page size (10).
    #[must_use]
    pub fn admin() -> Self {
        Self::with_page_size(ADMIN_PAGE_SIZE)
    }

    #[must_use]
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            search: String::new(),
            category: None,
            featured_only: false,
            sort: SortKey::default(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Case-insensitive substring filter over name, description, and
    /// category.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page = 1;
    }

    /// Exact category filter; `None` shows every category.
    pub fn set_category(&mut self, category: Option<String>) {
        self.category = category;
        self.page = 1;
    }

    /// Restrict to featured products (admin toggle).
    pub fn set_featured_only(&mut self, featured_only: bool) {
        self.featured_only = featured_only;
        self.page = 1;
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
        self.page = 1;
    }

    /// Jump to a 1-based page. Out-of-range pages simply yield an empty
    /// item list.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    #[must_use]
    pub const fn sort(&self) -> SortKey {
        self.sort
    }

    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Evaluate the query over `products` without mutating them.
    #[must_use]
    pub fn run(&self, products: &[Product]) -> CatalogPage {
        let needle = self.search.trim().to_lowercase();
        let mut matches: Vec<&Product> = products
            .iter()
            .filter(|p| {
                let text_ok = needle.is_empty()
                    || p.name.to_lowercase().contains(&needle)
                    || p.description.to_lowercase().contains(&needle)
                    || p.category.to_lowercase().contains(&needle);
                let category_ok = self.category.as_deref().is_none_or(|c| p.category == c);
                let featured_ok = !self.featured_only || p.featured;
                text_ok && category_ok && featured_ok
            })
            .collect();

        match self.sort {
            SortKey::Featured => matches.sort_by_key(|p| !p.featured),
            SortKey::PriceAsc => matches.sort_by(|a, b| a.price.cmp(&b.price)),
            SortKey::PriceDesc => matches.sort_by(|a, b| b.price.cmp(&a.price)),
            SortKey::NameAsc => matches.sort_by_cached_key(|p| collation_key(&p.name)),
            SortKey::NameDesc => {
                matches.sort_by(|a, b| collation_key(&b.name).cmp(&collation_key(&a.name)));
            }
            SortKey::IdAsc => matches.sort_by_key(|p| p.id),
            SortKey::IdDesc => matches.sort_by_key(|p| std::cmp::Reverse(p.id)),
        }

        let total_matches = matches.len();
        let total_pages = total_matches.div_ceil(self.page_size).max(1);
        let start = self.page.saturating_sub(1).saturating_mul(self.page_size);
        let items: Vec<Product> = matches
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .cloned()
            .collect();

        CatalogPage {
            items,
            total_matches,
            total_pages,
            page: self.page,
        }
    }
}

/// One page of catalog results.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogPage {
    pub items: Vec<Product>,
    pub total_matches: usize,
    pub total_pages: usize,
    /// The 1-based page the items came from.
    pub page: usize,
}

/// Collation key approximating Spanish dictionary order: lowercase, accents
/// folded to the base vowel, and `ñ` ordered as its own letter right after
/// `n`.
#[must_use]
pub fn collation_key(name: &str) -> String {
    let mut key = String::with_capacity(name.len());
    for c in name.chars().flat_map(char::to_lowercase) {
        match c {
            'á' | 'à' | 'ä' | 'â' => key.push('a'),
            'é' | 'è' | 'ë' | 'ê' => key.push('e'),
            'í' | 'ì' | 'ï' | 'î' => key.push('i'),
            'ó' | 'ò' | 'ö' | 'ô' => key.push('o'),
            'ú' | 'ù' | 'ü' | 'û' => key.push('u'),
            'ñ' => key.push_str("n~"),
            _ => key.push(c),
        }
    }
    key
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::id::ProductId;
    use rust_decimal::Decimal;

    fn product(id: i32, name: &str, price: i64, category: &str, featured: bool) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_owned(),
            image: format!("https://cdn.example.com/{id}.jpg"),
            images: vec![format!("https://cdn.example.com/{id}.jpg")],
            price: Decimal::from(price),
            description: format!("{name} hecho a mano"),
            category: category.to_owned(),
            stock: 10,
            featured,
            created_at: None,
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product(1, "Taza Azul", 1500, "Tazas", false),
            product(2, "Plato Rojo", 2200, "Platos", true),
            product(3, "Bol Ñandubay", 1800, "Bols", false),
            product(4, "Árbol de la vida", 5000, "Decoración", true),
            product(5, "Taza Ocre", 1400, "Tazas", false),
        ]
    }

    fn names(page: &CatalogPage) -> Vec<&str> {
        page.items.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn search_is_case_insensitive_over_name_description_and_category() {
        let mut query = CatalogQuery::storefront();

        query.set_search("taza");
        assert_eq!(names(&query.run(&catalog())), ["Taza Azul", "Taza Ocre"]);

        // "platos" only appears in the category of product 2.
        query.set_search("PLATOS");
        assert_eq!(names(&query.run(&catalog())), ["Plato Rojo"]);

        // "mano" appears in every generated description.
        query.set_search("mano");
        assert_eq!(query.run(&catalog()).total_matches, 5);
    }

    #[test]
    fn category_filter_is_exact() {
        let mut query = CatalogQuery::storefront();
        query.set_category(Some("Tazas".to_owned()));
        assert_eq!(query.run(&catalog()).total_matches, 2);

        query.set_category(Some("Taza".to_owned()));
        assert_eq!(query.run(&catalog()).total_matches, 0);
    }

    #[test]
    fn featured_only_restricts_to_featured_products() {
        let mut query = CatalogQuery::admin();
        query.set_featured_only(true);
        assert_eq!(
            names(&query.run(&catalog())),
            ["Plato Rojo", "Árbol de la vida"]
        );
    }

    #[test]
    fn featured_sort_is_stable_featured_first() {
        let mut query = CatalogQuery::storefront();
        query.set_sort(SortKey::Featured);
        assert_eq!(
            names(&query.run(&catalog())),
            ["Plato Rojo", "Árbol de la vida", "Taza Azul", "Bol Ñandubay", "Taza Ocre"]
        );
    }

    #[test]
    fn price_sorts_are_monotonic() {
        let mut query = CatalogQuery::storefront();

        query.set_sort(SortKey::PriceAsc);
        let prices: Vec<Decimal> = query.run(&catalog()).items.iter().map(|p| p.price).collect();
        assert!(prices.windows(2).all(|w| w.first() <= w.get(1)));

        query.set_sort(SortKey::PriceDesc);
        let prices: Vec<Decimal> = query.run(&catalog()).items.iter().map(|p| p.price).collect();
        assert!(prices.windows(2).all(|w| w.first() >= w.get(1)));
    }

    #[test]
    fn name_sort_folds_accents_and_orders_enie_after_n() {
        let mut query = CatalogQuery::storefront();
        query.set_sort(SortKey::NameAsc);
        assert_eq!(
            names(&query.run(&catalog())),
            ["Árbol de la vida", "Bol Ñandubay", "Plato Rojo", "Taza Azul", "Taza Ocre"]
        );

        assert!(collation_key("Ñandú") > collation_key("Nube"));
        assert!(collation_key("Ñandú") < collation_key("Obelisco"));
        assert_eq!(collation_key("Árbol"), "arbol");
    }

    #[test]
    fn pagination_splits_at_page_size_with_a_minimum_of_one_page() {
        let many: Vec<Product> = (1..=25)
            .map(|i| product(i, &format!("Pieza {i:02}"), 100, "Varios", false))
            .collect();

        let mut query = CatalogQuery::storefront();
        let page = query.run(&many);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items.len(), 12);

        query.set_page(3);
        let page = query.run(&many);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.page, 3);

        query.set_search("no existe");
        let page = query.run(&many);
        assert_eq!(page.total_matches, 0);
        assert_eq!(page.total_pages, 1);
        assert!(page.items.is_empty());
    }

    #[test]
    fn out_of_range_page_yields_no_items() {
        let mut query = CatalogQuery::storefront();
        query.set_page(40);
        let page = query.run(&catalog());
        assert!(page.items.is_empty());
        assert_eq!(page.total_matches, 5);
    }

    #[test]
    fn any_filter_change_resets_the_page() {
        let mut query = CatalogQuery::storefront();
        query.set_page(3);
        assert_eq!(query.page(), 3);

        query.set_search("taza");
        assert_eq!(query.page(), 1);

        query.set_page(3);
        query.set_category(Some("Tazas".to_owned()));
        assert_eq!(query.page(), 1);

        query.set_page(3);
        query.set_sort(SortKey::PriceAsc);
        assert_eq!(query.page(), 1);

        query.set_page(3);
        query.set_featured_only(true);
        assert_eq!(query.page(), 1);
    }

    #[test]
    fn admin_id_sorts_and_sort_key_parsing() {
        let mut query = CatalogQuery::admin();
        query.set_sort("id-desc".parse().unwrap());
        let ids: Vec<i32> = query.run(&catalog()).items.iter().map(|p| p.id.as_i32()).collect();
        assert_eq!(ids, [5, 4, 3, 2, 1]);

        assert_eq!("price-asc".parse::<SortKey>().unwrap(), SortKey::PriceAsc);
        assert!("precio".parse::<SortKey>().is_err());
        assert_eq!(SortKey::NameDesc.to_string(), "name-desc");
    }
}
