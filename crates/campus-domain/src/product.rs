//! Listing domain types.
//!
//! Status and category are persisted by their display string. Internal code
//! matches on the symbolic variants; `label()`/`from_label()` and
//! `key()`/`from_key()` are the only places the two spellings meet.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownVariant;

/// Moderation state of a listing.
///
/// ```text
/// Pending --approve--> OnSale --mark_sold--> Sold
///                      OnSale --remove-----> Removed
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductStatus {
    #[default]
    #[serde(rename = "待审核")]
    Pending,
    #[serde(rename = "在售")]
    OnSale,
    #[serde(rename = "已售")]
    Sold,
    #[serde(rename = "下架")]
    Removed,
}

impl ProductStatus {
    pub const ALL: [ProductStatus; 4] = [
        ProductStatus::Pending,
        ProductStatus::OnSale,
        ProductStatus::Sold,
        ProductStatus::Removed,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::OnSale => "on_sale",
            Self::Sold => "sold",
            Self::Removed => "removed",
        }
    }

    /// Persisted display string.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "待审核",
            Self::OnSale => "在售",
            Self::Sold => "已售",
            Self::Removed => "下架",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.key() == key)
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }

    /// Only on-sale listings show up in browse and search.
    pub fn is_visible(self) -> bool {
        self == Self::OnSale
    }

    /// Sold and removed listings never change state again.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Sold | Self::Removed)
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ProductStatus {
    type Err = UnknownVariant;

    /// Accepts either the symbolic key or the display string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s)
            .or_else(|| Self::from_label(s))
            .ok_or_else(|| UnknownVariant::new("product status", s))
    }
}

/// Fixed listing categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductCategory {
    #[serde(rename = "电子数码")]
    Electronics,
    #[serde(rename = "图书资料")]
    Books,
    #[serde(rename = "服装鞋帽")]
    Clothing,
    #[serde(rename = "运动器材")]
    Sports,
    #[serde(rename = "生活用品")]
    Daily,
    #[serde(rename = "其他")]
    Other,
}

impl ProductCategory {
    pub const ALL: [ProductCategory; 6] = [
        ProductCategory::Electronics,
        ProductCategory::Books,
        ProductCategory::Clothing,
        ProductCategory::Sports,
        ProductCategory::Daily,
        ProductCategory::Other,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Electronics => "electronics",
            Self::Books => "books",
            Self::Clothing => "clothing",
            Self::Sports => "sports",
            Self::Daily => "daily",
            Self::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Electronics => "电子数码",
            Self::Books => "图书资料",
            Self::Clothing => "服装鞋帽",
            Self::Sports => "运动器材",
            Self::Daily => "生活用品",
            Self::Other => "其他",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ProductCategory {
    type Err = UnknownVariant;

    /// Accepts either the symbolic key or the display string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s)
            .or_else(|| Self::from_label(s))
            .ok_or_else(|| UnknownVariant::new("product category", s))
    }
}

/// Suggested item conditions. Condition is free text; these feed pickers.
pub const SUGGESTED_CONDITIONS: [&str; 5] = ["全新", "九成新", "七成新", "五成新", "其他"];

/// Condition assumed when a record or request omits one.
pub const DEFAULT_CONDITION: &str = "九成新";

/// Known campus tags. Campus is a free categorical tag; these feed pickers.
pub const KNOWN_CAMPUSES: [&str; 5] = ["东校区", "西校区", "主校区", "南校区", "北校区"];

/// Ratio used to derive an informational original price when none is given.
pub const ORIGINAL_PRICE_RATIO: f64 = 1.2;
