//! Golden vectors for page identifiers.
//!
//! Servers key comments and profile permissions by these strings, so they
//! must stay stable across releases.

use pagegate_core::{slugify, PageId};

/// Expected names for one catalog page.
#[derive(Debug, Clone)]
pub struct PageVector {
    pub page: PageId,
    pub display_name: &'static str,
    pub slug: &'static str,
    pub legacy_key: &'static str,
}

/// All catalog pages, in catalog order.
pub fn page_vectors() -> Vec<PageVector> {
    vec![
        PageVector {
            page: PageId::ProductsList,
            display_name: "Products List",
            slug: "products-list",
            legacy_key: "products_list",
        },
        PageVector {
            page: PageId::MarketingList,
            display_name: "Marketing List",
            slug: "marketing-list",
            legacy_key: "marketing_list",
        },
        PageVector {
            page: PageId::OrderList,
            display_name: "Order List",
            slug: "order-list",
            legacy_key: "order_list",
        },
        PageVector {
            page: PageId::MediaPlans,
            display_name: "Media Plans",
            slug: "media-plans",
            legacy_key: "media_plans",
        },
        PageVector {
            page: PageId::OfferPricingSkus,
            display_name: "Offer Pricing SKUs",
            slug: "offer-pricing-skus",
            legacy_key: "offer_pricing_skus",
        },
        PageVector {
            page: PageId::Clients,
            display_name: "Clients",
            slug: "clients",
            legacy_key: "clients",
        },
        PageVector {
            page: PageId::Suppliers,
            display_name: "Suppliers",
            slug: "suppliers",
            legacy_key: "suppliers",
        },
        PageVector {
            page: PageId::CustomerSupport,
            display_name: "Customer Support",
            slug: "customer-support",
            legacy_key: "customer_support",
        },
        PageVector {
            page: PageId::SalesReports,
            display_name: "Sales Reports",
            slug: "sales-reports",
            legacy_key: "sales_reports",
        },
        PageVector {
            page: PageId::FinanceAndAccounting,
            display_name: "Finance & Accounting",
            slug: "finance-and-accounting",
            legacy_key: "finance_&_accounting",
        },
    ]
}

/// Check every vector against the catalog. Returns the names of mismatches.
pub fn verify_page_vectors() -> Vec<String> {
    let mut mismatches = Vec::new();
    for v in page_vectors() {
        if v.page.display_name() != v.display_name {
            mismatches.push(format!("{}: display name", v.slug));
        }
        if v.page.slug() != v.slug || slugify(v.display_name) != v.slug {
            mismatches.push(format!("{}: slug", v.slug));
        }
        if v.page.legacy_key() != v.legacy_key {
            mismatches.push(format!("{}: legacy key", v.slug));
        }
        if PageId::from_wire_key(v.slug) != Some(v.page)
            || PageId::from_wire_key(v.legacy_key) != Some(v.page)
        {
            mismatches.push(format!("{}: wire key lookup", v.slug));
        }
    }
    mismatches
}
