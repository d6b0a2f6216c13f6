//! Finance Planner mutators.
//!
//! Every numeric input is sanitized on write: non-finite or negative values
//! become `0`, so derived calculations never see NaN or infinities from
//! stored data.

use crate::model::finance::{ExpenseRow, FinanceDocument};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinanceError {
    IndexOutOfRange { index: usize, len: usize },
}

impl Display for FinanceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexOutOfRange { index, len } => {
                write!(f, "expense index {index} is out of range for {len} row(s)")
            }
        }
    }
}

impl Error for FinanceError {}

/// Parses user-entered numeric text; empty or invalid input yields `0`.
pub fn parse_amount(text: &str) -> f64 {
    text.trim().parse::<f64>().map_or(0.0, sanitize_amount)
}

/// Clamps a number to a finite, non-negative value.
pub fn sanitize_amount(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

impl ExpenseRow {
    /// Builds a row from raw form input.
    pub fn parse(name: &str, amount: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            amount: parse_amount(amount),
        }
    }
}

pub fn set_income(doc: &mut FinanceDocument, income: f64) {
    doc.income = sanitize_amount(income);
}

/// Replaces the whole expense list.
pub fn set_expenses(doc: &mut FinanceDocument, expenses: Vec<ExpenseRow>) {
    doc.expenses = expenses
        .into_iter()
        .map(|row| ExpenseRow {
            name: row.name,
            amount: sanitize_amount(row.amount),
        })
        .collect();
}

pub fn add_expense(doc: &mut FinanceDocument, row: ExpenseRow) {
    doc.expenses.push(ExpenseRow {
        name: row.name,
        amount: sanitize_amount(row.amount),
    });
}

pub fn remove_expense(doc: &mut FinanceDocument, index: usize) -> Result<ExpenseRow, FinanceError> {
    if index >= doc.expenses.len() {
        return Err(FinanceError::IndexOutOfRange {
            index,
            len: doc.expenses.len(),
        });
    }
    Ok(doc.expenses.remove(index))
}

pub fn set_goal(doc: &mut FinanceDocument, name: &str, amount: f64, years: f64) {
    doc.goal_name = name.trim().to_string();
    doc.goal_amount = sanitize_amount(amount);
    doc.goal_years = sanitize_amount(years);
}

pub fn set_retirement(doc: &mut FinanceDocument, age: f64, target_age: f64, target_amount: f64) {
    doc.ret_age = sanitize_amount(age);
    doc.ret_target_age = sanitize_amount(target_age);
    doc.ret_target_amt = sanitize_amount(target_amount);
}
