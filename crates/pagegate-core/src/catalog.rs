//! The page catalog.
//!
//! The catalog is a fixed, ordered set of ten pages known at build time.
//! Each page has three names that must never drift apart:
//!
//! - the **display name** shown to people (`"Finance & Accounting"`),
//! - the **slug**, which is the wire-level page id (`"finance-and-accounting"`),
//! - the **legacy key** older servers stored comments under
//!   (`"finance_&_accounting"`).
//!
//! All three are held in one static registry instead of being derived by
//! string transformation at each call site.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

/// Identifier of a catalog page.
///
/// Ordering follows catalog order, so `BTreeMap<PageId, _>` iterates pages
/// the way navigation lists them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PageId {
    ProductsList,
    MarketingList,
    OrderList,
    MediaPlans,
    OfferPricingSkus,
    Clients,
    Suppliers,
    CustomerSupport,
    SalesReports,
    FinanceAndAccounting,
}

/// One row of the registry.
struct PageEntry {
    id: PageId,
    display_name: &'static str,
    slug: &'static str,
    legacy_key: &'static str,
}

const REGISTRY: [PageEntry; 10] = [
    PageEntry {
        id: PageId::ProductsList,
        display_name: "Products List",
        slug: "products-list",
        legacy_key: "products_list",
    },
    PageEntry {
        id: PageId::MarketingList,
        display_name: "Marketing List",
        slug: "marketing-list",
        legacy_key: "marketing_list",
    },
    PageEntry {
        id: PageId::OrderList,
        display_name: "Order List",
        slug: "order-list",
        legacy_key: "order_list",
    },
    PageEntry {
        id: PageId::MediaPlans,
        display_name: "Media Plans",
        slug: "media-plans",
        legacy_key: "media_plans",
    },
    PageEntry {
        id: PageId::OfferPricingSkus,
        display_name: "Offer Pricing SKUs",
        slug: "offer-pricing-skus",
        legacy_key: "offer_pricing_skus",
    },
    PageEntry {
        id: PageId::Clients,
        display_name: "Clients",
        slug: "clients",
        legacy_key: "clients",
    },
    PageEntry {
        id: PageId::Suppliers,
        display_name: "Suppliers",
        slug: "suppliers",
        legacy_key: "suppliers",
    },
    PageEntry {
        id: PageId::CustomerSupport,
        display_name: "Customer Support",
        slug: "customer-support",
        legacy_key: "customer_support",
    },
    PageEntry {
        id: PageId::SalesReports,
        display_name: "Sales Reports",
        slug: "sales-reports",
        legacy_key: "sales_reports",
    },
    PageEntry {
        id: PageId::FinanceAndAccounting,
        display_name: "Finance & Accounting",
        slug: "finance-and-accounting",
        legacy_key: "finance_&_accounting",
    },
];

impl PageId {
    /// Every page, in catalog order.
    pub const ALL: [PageId; 10] = [
        PageId::ProductsList,
        PageId::MarketingList,
        PageId::OrderList,
        PageId::MediaPlans,
        PageId::OfferPricingSkus,
        PageId::Clients,
        PageId::Suppliers,
        PageId::CustomerSupport,
        PageId::SalesReports,
        PageId::FinanceAndAccounting,
    ];

    fn entry(self) -> &'static PageEntry {
        // REGISTRY is declared in the same order as the enum.
        &REGISTRY[self as usize]
    }

    /// Position of this page in the catalog (0-based).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Human-readable name.
    pub fn display_name(self) -> &'static str {
        self.entry().display_name
    }

    /// Wire-level page id.
    pub fn slug(self) -> &'static str {
        self.entry().slug
    }

    /// Underscore key used by older comment records.
    pub fn legacy_key(self) -> &'static str {
        self.entry().legacy_key
    }

    /// Navigation route for this page.
    pub fn path(self) -> String {
        format!("/pages/{}", self.slug())
    }

    /// Look up a page by its slug.
    pub fn from_slug(slug: &str) -> Option<Self> {
        REGISTRY.iter().find(|e| e.slug == slug).map(|e| e.id)
    }

    /// Look up a page by its exact display name.
    pub fn from_display_name(name: &str) -> Option<Self> {
        REGISTRY
            .iter()
            .find(|e| e.display_name == name)
            .map(|e| e.id)
    }

    /// Look up a page by a key received from a server.
    ///
    /// Accepts the slug or the legacy underscore key.
    pub fn from_wire_key(key: &str) -> Option<Self> {
        REGISTRY
            .iter()
            .find(|e| e.slug == key || e.legacy_key == key)
            .map(|e| e.id)
    }
}

/// Derive a slug from a display name.
///
/// Lower-cases, collapses each run of whitespace into a single `-`, then
/// replaces `&` with `and`.
pub fn slugify(display_name: &str) -> String {
    let lowered = display_name.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut in_whitespace = false;

    for ch in lowered.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                out.push('-');
                in_whitespace = true;
            }
        } else {
            in_whitespace = false;
            out.push(ch);
        }
    }

    out.replace('&', "and")
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for PageId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PageId::from_wire_key(s).ok_or_else(|| CoreError::UnknownPage(s.to_string()))
    }
}

impl Serialize for PageId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.slug())
    }
}

impl<'de> Deserialize<'de> for PageId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        key.parse().map_err(serde::de::Error::custom)
    }
}
