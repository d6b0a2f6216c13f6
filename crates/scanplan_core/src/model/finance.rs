//! Finance Planner document model.
//!
//! # Invariants
//! - All amounts and ages are finite and non-negative once written through
//!   `mutate::finance`.

use crate::store::AppDocument;
use serde::{Deserialize, Serialize};

/// One monthly expense line.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpenseRow {
    pub name: String,
    pub amount: f64,
}

/// Persisted state of the Finance Planner app.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FinanceDocument {
    /// Monthly income.
    pub income: f64,
    pub expenses: Vec<ExpenseRow>,
    pub goal_name: String,
    pub goal_amount: f64,
    pub goal_years: f64,
    /// Current age.
    pub ret_age: f64,
    /// Age at which the retirement corpus should be reached.
    pub ret_target_age: f64,
    /// Retirement corpus target.
    pub ret_target_amt: f64,
}

impl AppDocument for FinanceDocument {
    const STORAGE_KEY: &'static str = "finance_planner_data";
}
