//! Finance Planner views: totals, breakdown, goal and retirement plans.

use crate::model::finance::FinanceDocument;
use serde::Serialize;

/// Expected annual return used for SIP projections.
pub const ANNUAL_RETURN_RATE: f64 = 0.15;
pub const MONTHS_PER_YEAR: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FinanceTotals {
    pub total_expense: f64,
    /// `income - total_expense`; negative when overspending.
    pub savings: f64,
}

pub fn finance_totals(doc: &FinanceDocument) -> FinanceTotals {
    let total_expense: f64 = doc.expenses.iter().map(|row| row.amount).sum();
    FinanceTotals {
        total_expense,
        savings: doc.income - total_expense,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseShare {
    pub name: String,
    pub amount: f64,
    /// Share of total expense, 0..=100.
    pub percent: f64,
}

/// Per-row share of total expense, in list order.
pub fn expense_breakdown(doc: &FinanceDocument) -> Vec<ExpenseShare> {
    let total = finance_totals(doc).total_expense;
    doc.expenses
        .iter()
        .map(|row| ExpenseShare {
            name: row.name.clone(),
            amount: row.amount,
            percent: if total > 0.0 {
                row.amount * 100.0 / total
            } else {
                0.0
            },
        })
        .collect()
}

/// Savings as a percentage of income; `None` without income.
pub fn savings_rate(doc: &FinanceDocument) -> Option<f64> {
    if doc.income > 0.0 {
        Some(finance_totals(doc).savings * 100.0 / doc.income)
    } else {
        None
    }
}

/// `goal_amount / (goal_years * 12)`, or `None` when `goal_years <= 0` or
/// the quotient overflows.
pub fn monthly_saving_for_goal(goal_amount: f64, goal_years: f64) -> Option<f64> {
    if !is_positive(goal_years) || !goal_amount.is_finite() {
        return None;
    }
    finite(goal_amount / (goal_years * MONTHS_PER_YEAR))
}

/// Monthly contribution that grows to `target` in `years` at
/// [`ANNUAL_RETURN_RATE`], compounded monthly:
/// `target * r / ((1 + r)^n - 1)` with `r = rate / 12`, `n = years * 12`.
///
/// `None` unless both inputs are positive.
pub fn required_monthly_sip(target: f64, years: f64) -> Option<f64> {
    if !is_positive(target) || !is_positive(years) {
        return None;
    }
    let rate = monthly_rate();
    let months = years * MONTHS_PER_YEAR;
    let growth = (1.0 + rate).powf(months) - 1.0;
    if !is_positive(growth) {
        return None;
    }
    finite(target * rate / growth)
}

pub fn monthly_rate() -> f64 {
    ANNUAL_RETURN_RATE / MONTHS_PER_YEAR
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalPlan {
    pub goal_name: String,
    pub goal_amount: f64,
    pub goal_years: f64,
    pub monthly_saving: f64,
}

pub fn goal_plan(doc: &FinanceDocument) -> Option<GoalPlan> {
    if !is_positive(doc.goal_amount) {
        return None;
    }
    let monthly_saving = monthly_saving_for_goal(doc.goal_amount, doc.goal_years)?;
    Some(GoalPlan {
        goal_name: doc.goal_name.clone(),
        goal_amount: doc.goal_amount,
        goal_years: doc.goal_years,
        monthly_saving,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetirementPlan {
    pub years: f64,
    pub months: f64,
    pub monthly_rate: f64,
    pub monthly_sip: f64,
    /// `monthly_sip * months`.
    pub total_invested: f64,
    /// Target corpus minus the contributions themselves.
    pub estimated_growth: f64,
}

/// Retirement section; `None` unless `ret_target_age > ret_age` and all
/// three inputs are positive.
pub fn retirement_plan(doc: &FinanceDocument) -> Option<RetirementPlan> {
    let inputs_positive = is_positive(doc.ret_age)
        && is_positive(doc.ret_target_age)
        && is_positive(doc.ret_target_amt);
    if !inputs_positive || doc.ret_target_age <= doc.ret_age {
        return None;
    }
    let years = doc.ret_target_age - doc.ret_age;
    let monthly_sip = required_monthly_sip(doc.ret_target_amt, years)?;
    let months = years * MONTHS_PER_YEAR;
    let total_invested = finite(monthly_sip * months)?;
    let estimated_growth = finite(doc.ret_target_amt - total_invested)?;
    Some(RetirementPlan {
        years,
        months,
        monthly_rate: monthly_rate(),
        monthly_sip,
        total_invested,
        estimated_growth,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinanceOverview {
    pub income: f64,
    pub totals: FinanceTotals,
    pub savings_rate: Option<f64>,
    pub breakdown: Vec<ExpenseShare>,
    pub goal: Option<GoalPlan>,
    pub retirement: Option<RetirementPlan>,
}

pub fn finance_overview(doc: &FinanceDocument) -> FinanceOverview {
    FinanceOverview {
        income: doc.income,
        totals: finance_totals(doc),
        savings_rate: savings_rate(doc),
        breakdown: expense_breakdown(doc),
        goal: goal_plan(doc),
        retirement: retirement_plan(doc),
    }
}
