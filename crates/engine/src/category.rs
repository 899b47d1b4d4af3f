//! The closed set of payroll categories.
//!
//! Every concept on a closing ends up in exactly one of these buckets (or
//! stays unclassified). The set is fixed: new categories are a schema change
//! on the server side, not runtime data, so this is an enum rather than
//! strings.

use serde::{Deserialize, Serialize};

/// Target category for a classified concept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    TaxableEarning,
    NonTaxableEarning,
    LegalDeduction,
    OtherDeduction,
    EmployerContribution,
    Informational,
    Identifier,
    Ignore,
}

impl Category {
    /// All categories, in the order the closing screen lists them.
    pub const ALL: [Category; 8] = [
        Category::TaxableEarning,
        Category::NonTaxableEarning,
        Category::LegalDeduction,
        Category::OtherDeduction,
        Category::EmployerContribution,
        Category::Informational,
        Category::Identifier,
        Category::Ignore,
    ];

    /// Wire name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TaxableEarning => "taxable_earning",
            Self::NonTaxableEarning => "non_taxable_earning",
            Self::LegalDeduction => "legal_deduction",
            Self::OtherDeduction => "other_deduction",
            Self::EmployerContribution => "employer_contribution",
            Self::Informational => "informational",
            Self::Identifier => "identifier",
            Self::Ignore => "ignore",
        }
    }

    /// Parse a wire name. Returns `None` for anything outside the closed set.
    pub fn parse(s: &str) -> Option<Category> {
        Category::ALL.iter().copied().find(|c| c.as_str() == s)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
