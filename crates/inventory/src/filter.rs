//! Single-column equality filters over inventory records.

use stockkeep_core::{DomainError, DomainResult};

use crate::item::InventoryItem;

/// Exact-match filter on one column. Comparisons are case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryFilter {
    SupplierName(String),
    ProductName(String),
    SupplierId(i32),
}

impl InventoryFilter {
    /// Pick the filter to apply from the list query parameters.
    ///
    /// At most one filter is honored: `supplier_name`, then `product_name`,
    /// then `supplier_id`. Empty values count as absent.
    pub fn from_query(
        supplier_name: Option<&str>,
        product_name: Option<&str>,
        supplier_id: Option<&str>,
    ) -> DomainResult<Option<Self>> {
        fn present(v: Option<&str>) -> Option<&str> {
            v.filter(|s| !s.is_empty())
        }

        if let Some(name) = present(supplier_name) {
            return Ok(Some(Self::SupplierName(name.to_string())));
        }
        if let Some(name) = present(product_name) {
            return Ok(Some(Self::ProductName(name.to_string())));
        }
        if let Some(raw) = present(supplier_id) {
            let id = raw.parse::<i32>().map_err(|_| {
                DomainError::validation(format!("supplier_id must be an integer (got '{raw}')"))
            })?;
            return Ok(Some(Self::SupplierId(id)));
        }
        Ok(None)
    }

    /// Column the filter applies to.
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::SupplierName(_) => "supplier_name",
            Self::ProductName(_) => "product_name",
            Self::SupplierId(_) => "supplier_id",
        }
    }

    pub fn matches(&self, item: &InventoryItem) -> bool {
        match self {
            Self::SupplierName(name) => item.supplier_name.as_deref() == Some(name.as_str()),
            Self::ProductName(name) => item.product_name == *name,
            Self::SupplierId(id) => item.supplier_id == *id,
        }
    }
}

impl core::fmt::Display for InventoryFilter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::SupplierName(v) | Self::ProductName(v) => write!(f, "{}={v}", self.field_name()),
            Self::SupplierId(v) => write!(f, "{}={v}", self.field_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::SupplierStatus;

    fn item(product_name: &str, supplier_name: Option<&str>, supplier_id: i32) -> InventoryItem {
        InventoryItem {
            id: None,
            product_id: 1,
            product_name: product_name.to_string(),
            quantity: 10,
            restock_threshold: None,
            supplier_id,
            supplier_name: supplier_name.map(str::to_string),
            unit_price: 1.0,
            supplier_status: SupplierStatus::Enabled,
        }
    }

    #[test]
    fn supplier_name_wins_over_other_parameters() {
        let f = InventoryFilter::from_query(Some("acme"), Some("bolt"), Some("3")).unwrap();
        assert_eq!(f, Some(InventoryFilter::SupplierName("acme".into())));

        let f = InventoryFilter::from_query(None, Some("bolt"), Some("3")).unwrap();
        assert_eq!(f, Some(InventoryFilter::ProductName("bolt".into())));

        let f = InventoryFilter::from_query(None, None, Some("3")).unwrap();
        assert_eq!(f, Some(InventoryFilter::SupplierId(3)));

        assert_eq!(InventoryFilter::from_query(None, None, None).unwrap(), None);
    }

    #[test]
    fn empty_values_are_skipped() {
        let f = InventoryFilter::from_query(Some(""), Some("bolt"), None).unwrap();
        assert_eq!(f, Some(InventoryFilter::ProductName("bolt".into())));
    }

    #[test]
    fn all_empty_values_mean_no_filter() {
        assert_eq!(InventoryFilter::from_query(Some(""), Some(""), Some("")).unwrap(), None);
        let f = InventoryFilter::from_query(Some(""), Some(""), Some("4")).unwrap();
        assert_eq!(f, Some(InventoryFilter::SupplierId(4)));
    }

    #[test]
    fn non_numeric_supplier_id_is_a_validation_error() {
        let err = InventoryFilter::from_query(None, None, Some("nine")).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn matching_is_exact_and_case_sensitive() {
        let a = item("bolt", Some("Acme"), 9);
        let b = item("bolt-xl", None, 9);

        let by_supplier = InventoryFilter::SupplierName("Acme".into());
        assert!(by_supplier.matches(&a));
        assert!(!by_supplier.matches(&b));
        assert!(!InventoryFilter::SupplierName("acme".into()).matches(&a));

        let by_product = InventoryFilter::ProductName("bolt".into());
        assert!(by_product.matches(&a));
        assert!(!by_product.matches(&b));

        let by_id = InventoryFilter::SupplierId(9);
        assert!(by_id.matches(&a) && by_id.matches(&b));
    }
}
