//! Finance Planner use-case service.

use crate::derive::finance::{finance_overview, FinanceOverview};
use crate::model::finance::{ExpenseRow, FinanceDocument};
use crate::mutate::finance::{self, FinanceError};
use crate::repo::kv_repo::KeyValueRepository;
use crate::store::{DocumentStore, StoreError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum FinanceServiceError {
    Finance(FinanceError),
    Store(StoreError),
}

impl Display for FinanceServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Finance(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for FinanceServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Finance(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<FinanceError> for FinanceServiceError {
    fn from(value: FinanceError) -> Self {
        Self::Finance(value)
    }
}

impl From<StoreError> for FinanceServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

pub type FinanceResult<T> = Result<T, FinanceServiceError>;

/// Finance Planner facade over a key/value repository.
pub struct FinanceService<R: KeyValueRepository> {
    store: DocumentStore<R, FinanceDocument>,
}

impl<R: KeyValueRepository> FinanceService<R> {
    pub fn new(repo: R) -> Self {
        Self {
            store: DocumentStore::new(repo),
        }
    }

    pub fn document(&self) -> FinanceResult<FinanceDocument> {
        Ok(self.store.load()?)
    }

    pub fn set_income(&self, income: f64) -> FinanceResult<FinanceDocument> {
        self.apply("set_income", |doc| {
            finance::set_income(doc, income);
            Ok(())
        })
    }

    pub fn set_expenses(&self, expenses: Vec<ExpenseRow>) -> FinanceResult<FinanceDocument> {
        self.apply("set_expenses", |doc| {
            finance::set_expenses(doc, expenses);
            Ok(())
        })
    }

    pub fn add_expense(&self, row: ExpenseRow) -> FinanceResult<FinanceDocument> {
        self.apply("add_expense", |doc| {
            finance::add_expense(doc, row);
            Ok(())
        })
    }

    pub fn remove_expense(&self, index: usize) -> FinanceResult<FinanceDocument> {
        self.apply("remove_expense", |doc| {
            finance::remove_expense(doc, index).map(|_| ())
        })
    }

    pub fn set_goal(&self, name: &str, amount: f64, years: f64) -> FinanceResult<FinanceDocument> {
        self.apply("set_goal", |doc| {
            finance::set_goal(doc, name, amount, years);
            Ok(())
        })
    }

    pub fn set_retirement(
        &self,
        age: f64,
        target_age: f64,
        target_amount: f64,
    ) -> FinanceResult<FinanceDocument> {
        self.apply("set_retirement", |doc| {
            finance::set_retirement(doc, age, target_age, target_amount);
            Ok(())
        })
    }

    /// Totals, breakdown, goal and retirement sections for the stored
    /// document.
    pub fn overview(&self) -> FinanceResult<FinanceOverview> {
        Ok(finance_overview(&self.document()?))
    }

    pub fn clear_all(&self) -> FinanceResult<bool> {
        Ok(self.store.clear()?)
    }

    fn apply(
        &self,
        action: &'static str,
        mutate: impl FnOnce(&mut FinanceDocument) -> Result<(), FinanceError>,
    ) -> FinanceResult<FinanceDocument> {
        let mut doc = self.store.load()?;
        if let Err(err) = mutate(&mut doc) {
            warn!("event={action} module=finance status=rejected error={err}");
            return Err(err.into());
        }
        self.store.save(&doc)?;
        info!(
            "event={action} module=finance status=ok expenses={}",
            doc.expenses.len()
        );
        Ok(doc)
    }
}
