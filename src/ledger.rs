use crate::models::expense::{Category, ExpenseRecord};
use chrono::{Local, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Description cannot be empty")]
    EmptyDescription,
    #[error("Invalid amount '{0}'. Must be a positive number")]
    InvalidAmount(String),
    #[error("Unknown category '{0}'. Use Food, Transport, Bills, Shopping or Other")]
    InvalidCategory(String),
    #[error("Invalid date '{0}'. Use YYYY-MM-DD")]
    InvalidDate(String),
    #[error("No expense with id {0}")]
    NotFound(String),
}

/// The authoritative in-memory collection of expense records.
///
/// All mutations go through `add`/`update`/`remove`; every other component
/// only reads snapshots. Mutating operations take raw string input and do
/// the parsing and validation themselves, so the command loop, the browse
/// screen and the tests all share one rule set. A failed operation leaves
/// the record sequence untouched.
///
/// Amounts are rounded to 2 decimal places on the way in, half away from
/// zero. Aggregates sum the stored (already rounded) amounts, so rounding
/// error does not compound across records.
#[derive(Debug, Default)]
pub struct Ledger {
    records: Vec<ExpenseRecord>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<ExpenseRecord>) -> Self {
        Self { records }
    }

    /// Read-only snapshot, newest first.
    pub fn list(&self) -> &[ExpenseRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Validates the raw input and prepends a new record. An empty date
    /// defaults to today.
    pub fn add(
        &mut self,
        description: &str,
        amount: &str,
        category: &str,
        date: &str,
    ) -> Result<ExpenseRecord, LedgerError> {
        let (description, amount, category, date) =
            parse_fields(description, amount, category, date)?;

        let record = ExpenseRecord::new(
            Uuid::new_v4().to_string(),
            description,
            amount,
            category,
            date,
        );
        self.records.insert(0, record.clone());
        Ok(record)
    }

    /// Validates the raw input and replaces the matching record in place,
    /// preserving its position and id.
    pub fn update(
        &mut self,
        id: &str,
        description: &str,
        amount: &str,
        category: &str,
        date: &str,
    ) -> Result<ExpenseRecord, LedgerError> {
        let (description, amount, category, date) =
            parse_fields(description, amount, category, date)?;

        let record = self
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| LedgerError::NotFound(id.to_string()))?;

        record.description = description;
        record.amount = amount;
        record.category = category;
        record.date = date;
        Ok(record.clone())
    }

    /// Removes the record with the given id if present. Removing an id that
    /// does not exist is a no-op, not an error.
    pub fn remove(&mut self, id: &str) -> bool {
        if let Some(pos) = self.records.iter().position(|r| r.id == id) {
            self.records.remove(pos);
            true
        } else {
            false
        }
    }

    /// Summed amount per category, every fixed category present (zero when
    /// unused), in `Category::ALL` order.
    pub fn totals_by_category(&self) -> Vec<(Category, Decimal)> {
        Category::ALL
            .iter()
            .map(|&category| {
                let total: Decimal = self
                    .records
                    .iter()
                    .filter(|r| r.category == category)
                    .map(|r| r.amount)
                    .sum();
                (category, round_amount(total))
            })
            .collect()
    }

    pub fn overall_total(&self) -> Decimal {
        let total: Decimal = self.records.iter().map(|r| r.amount).sum();
        round_amount(total)
    }
}

fn round_amount(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn parse_fields(
    description: &str,
    amount: &str,
    category: &str,
    date: &str,
) -> Result<(String, Decimal, Category, NaiveDate), LedgerError> {
    let description = description.trim();
    if description.is_empty() {
        return Err(LedgerError::EmptyDescription);
    }

    let amount = match Decimal::from_str(amount.trim()) {
        Ok(parsed) if parsed > Decimal::ZERO => round_amount(parsed),
        _ => return Err(LedgerError::InvalidAmount(amount.trim().to_string())),
    };

    let category = Category::from_str(category)
        .map_err(|_| LedgerError::InvalidCategory(category.trim().to_string()))?;

    let date = date.trim();
    let date = if date.is_empty() {
        Local::now().date_naive()
    } else {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| LedgerError::InvalidDate(date.to_string()))?
    };

    Ok((description.to_string(), amount, category, date))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger_with_lunch() -> Ledger {
        let mut ledger = Ledger::new();
        ledger
            .add("Lunch", "12.345", "Food", "2024-01-01")
            .unwrap();
        ledger
    }

    #[test]
    fn test_add_success_rounds_to_two_places() {
        let ledger = ledger_with_lunch();

        assert_eq!(ledger.len(), 1);
        let record = &ledger.list()[0];
        assert_eq!(record.description, "Lunch");
        assert_eq!(record.amount, Decimal::from_str("12.35").unwrap());
        assert_eq!(record.category, Category::Food);
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert!(!record.id.is_empty());
    }

    #[test]
    fn test_add_trims_description() {
        let mut ledger = Ledger::new();
        let record = ledger.add("  Coffee  ", "3.50", "Food", "2024-01-01").unwrap();
        assert_eq!(record.description, "Coffee");
    }

    #[test]
    fn test_add_empty_description_rejected() {
        let mut ledger = Ledger::new();
        let result = ledger.add("   ", "10", "Food", "2024-01-01");
        assert_eq!(result.unwrap_err(), LedgerError::EmptyDescription);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_add_invalid_amounts_rejected() {
        let mut ledger = Ledger::new();
        for bad in ["0", "-5", "abc", "", "NaN"] {
            let result = ledger.add("Lunch", bad, "Food", "2024-01-01");
            assert!(
                matches!(result, Err(LedgerError::InvalidAmount(_))),
                "amount '{}' should be rejected",
                bad
            );
        }
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_add_invalid_category_rejected() {
        let mut ledger = Ledger::new();
        let result = ledger.add("Lunch", "10", "Groceries", "2024-01-01");
        assert_eq!(
            result.unwrap_err(),
            LedgerError::InvalidCategory("Groceries".to_string())
        );
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_add_invalid_date_rejected() {
        let mut ledger = Ledger::new();
        let result = ledger.add("Lunch", "10", "Food", "01/02/2024");
        assert_eq!(
            result.unwrap_err(),
            LedgerError::InvalidDate("01/02/2024".to_string())
        );
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_add_empty_date_defaults_to_today() {
        let mut ledger = Ledger::new();
        let record = ledger.add("Lunch", "10", "Food", "").unwrap();
        assert_eq!(record.date, Local::now().date_naive());
    }

    #[test]
    fn test_add_prepends_newest_first() {
        let mut ledger = Ledger::new();
        ledger.add("First", "1", "Food", "2024-01-01").unwrap();
        ledger.add("Second", "2", "Bills", "2024-01-02").unwrap();

        let descriptions: Vec<&str> =
            ledger.list().iter().map(|r| r.description.as_str()).collect();
        assert_eq!(descriptions, ["Second", "First"]);
    }

    #[test]
    fn test_update_replaces_in_place() {
        let mut ledger = Ledger::new();
        ledger.add("First", "1", "Food", "2024-01-01").unwrap();
        let target = ledger.add("Second", "2", "Bills", "2024-01-02").unwrap();
        ledger.add("Third", "3", "Other", "2024-01-03").unwrap();

        let updated = ledger
            .update(&target.id, "Second fixed", "2.555", "Shopping", "2024-02-02")
            .unwrap();

        assert_eq!(updated.id, target.id);
        assert_eq!(updated.amount, Decimal::from_str("2.56").unwrap());
        assert_eq!(updated.category, Category::Shopping);

        // Position in the sequence is preserved.
        assert_eq!(ledger.list()[1].id, target.id);
        assert_eq!(ledger.list()[1].description, "Second fixed");
        assert_eq!(ledger.len(), 3);
    }

    #[test]
    fn test_update_unknown_id_leaves_ledger_unchanged() {
        let mut ledger = ledger_with_lunch();
        let before: Vec<ExpenseRecord> = ledger.list().to_vec();

        let result = ledger.update("missing-id", "Dinner", "20", "Food", "2024-01-02");
        assert_eq!(
            result.unwrap_err(),
            LedgerError::NotFound("missing-id".to_string())
        );
        assert_eq!(ledger.list(), before.as_slice());
    }

    #[test]
    fn test_update_validation_failure_leaves_ledger_unchanged() {
        let mut ledger = ledger_with_lunch();
        let id = ledger.list()[0].id.clone();
        let before: Vec<ExpenseRecord> = ledger.list().to_vec();

        let result = ledger.update(&id, "Dinner", "-1", "Food", "2024-01-02");
        assert!(matches!(result, Err(LedgerError::InvalidAmount(_))));
        assert_eq!(ledger.list(), before.as_slice());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut ledger = ledger_with_lunch();
        let id = ledger.list()[0].id.clone();

        assert!(ledger.remove(&id));
        assert!(!ledger.remove(&id));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut ledger = ledger_with_lunch();
        assert!(!ledger.remove("missing-id"));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_totals_by_category_includes_every_category() {
        let ledger = Ledger::new();
        let totals = ledger.totals_by_category();

        assert_eq!(totals.len(), Category::ALL.len());
        for (_, total) in totals {
            assert_eq!(total, Decimal::ZERO);
        }
    }

    #[test]
    fn test_totals_by_category_sums_stored_amounts() {
        let mut ledger = Ledger::new();
        ledger.add("Lunch", "12.345", "Food", "2024-01-01").unwrap();
        ledger.add("Bus", "5.00", "Transport", "2024-01-01").unwrap();
        ledger.add("Dinner", "7.65", "Food", "2024-01-02").unwrap();

        let totals = ledger.totals_by_category();
        let food = totals.iter().find(|(c, _)| *c == Category::Food).unwrap().1;
        let transport = totals
            .iter()
            .find(|(c, _)| *c == Category::Transport)
            .unwrap()
            .1;

        // 12.345 is stored as 12.35, so Food sums to 20.00 exactly.
        assert_eq!(food, Decimal::from_str("20.00").unwrap());
        assert_eq!(transport, Decimal::from_str("5.00").unwrap());
    }

    #[test]
    fn test_overall_total_matches_category_totals() {
        let mut ledger = Ledger::new();
        ledger.add("Lunch", "12.345", "Food", "2024-01-01").unwrap();
        ledger.add("Bus", "5.00", "Transport", "2024-01-01").unwrap();
        ledger.add("Rent", "700", "Bills", "2024-01-01").unwrap();

        let sum_of_categories: Decimal = ledger
            .totals_by_category()
            .iter()
            .map(|(_, total)| *total)
            .sum();
        assert_eq!(ledger.overall_total(), sum_of_categories);
    }

    #[test]
    fn test_lunch_rounding_flows_into_aggregates() {
        let ledger = ledger_with_lunch();

        let expected = Decimal::from_str("12.35").unwrap();
        assert_eq!(ledger.list()[0].amount, expected);
        let food = ledger
            .totals_by_category()
            .into_iter()
            .find(|(c, _)| *c == Category::Food)
            .unwrap()
            .1;
        assert_eq!(food, expected);
        assert_eq!(ledger.overall_total(), expected);
    }
}
