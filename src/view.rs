use crate::ledger::{Ledger, LedgerError};
use crate::models::expense::{Category, ExpenseRecord};
use chrono::Local;
use std::str::FromStr;

/// The user-selected criterion restricting which records are displayed.
/// Independent of the underlying ledger contents; totals always cover the
/// whole ledger regardless of the active filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(selected) => *selected == category,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CategoryFilter::All => "All",
            CategoryFilter::Only(category) => category.as_str(),
        }
    }

    /// All -> Food -> Transport -> ... -> Other -> All.
    pub fn next(self) -> CategoryFilter {
        match self {
            CategoryFilter::All => CategoryFilter::Only(Category::ALL[0]),
            CategoryFilter::Only(category) => {
                let idx = Category::ALL
                    .iter()
                    .position(|c| *c == category)
                    .unwrap_or(0);
                if idx + 1 == Category::ALL.len() {
                    CategoryFilter::All
                } else {
                    CategoryFilter::Only(Category::ALL[idx + 1])
                }
            }
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        Category::from_str(s).map(CategoryFilter::Only)
    }
}

/// Raw field buffers for the add/edit form. Amount and date stay as typed
/// text until the ledger validates them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseForm {
    pub description: String,
    pub amount: String,
    pub category: Category,
    pub date: String,
}

impl ExpenseForm {
    pub fn empty(category: Category) -> Self {
        Self {
            description: String::new(),
            amount: String::new(),
            category,
            date: Local::now().date_naive().format("%Y-%m-%d").to_string(),
        }
    }

    pub fn from_record(record: &ExpenseRecord) -> Self {
        Self {
            description: record.description.clone(),
            amount: record.amount.to_string(),
            category: record.category,
            date: record.date.format("%Y-%m-%d").to_string(),
        }
    }
}

/// An in-progress inline edit, bound to the id of the record it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    pub id: String,
    pub fields: ExpenseForm,
}

/// Ephemeral display state: the active category filter, the add form's
/// default category, and the record currently in inline-edit mode (at most
/// one at a time). Never persisted.
#[derive(Debug, Default)]
pub struct ViewState {
    pub filter: CategoryFilter,
    pub form_category: Category,
    editing: Option<EditDraft>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the active filter. Choosing a specific category also makes it
    /// the add form's default, so consecutive entries in the same category
    /// don't require re-selecting it.
    pub fn set_filter(&mut self, filter: CategoryFilter) {
        self.filter = filter;
        if let CategoryFilter::Only(category) = filter {
            self.form_category = category;
        }
    }

    /// The visible subset of the ledger under the active filter, ledger
    /// order preserved.
    pub fn filtered<'a>(&self, ledger: &'a Ledger) -> Vec<&'a ExpenseRecord> {
        ledger
            .list()
            .iter()
            .filter(|r| self.filter.matches(r.category))
            .collect()
    }

    pub fn editing(&self) -> Option<&EditDraft> {
        self.editing.as_ref()
    }

    pub fn editing_mut(&mut self) -> Option<&mut EditDraft> {
        self.editing.as_mut()
    }

    pub fn is_editing(&self, id: &str) -> bool {
        self.editing.as_ref().is_some_and(|draft| draft.id == id)
    }

    /// Copies the record's current field values into a draft bound to its
    /// id. Starting a new edit replaces any previous draft.
    pub fn begin_edit(&mut self, record: &ExpenseRecord) {
        self.editing = Some(EditDraft {
            id: record.id.clone(),
            fields: ExpenseForm::from_record(record),
        });
    }

    /// Applies the draft through `Ledger::update`. Returns `None` when no
    /// edit is in progress. On success the draft is cleared; on a
    /// validation failure it is retained so the user can correct the input.
    pub fn commit_edit(
        &mut self,
        ledger: &mut Ledger,
    ) -> Option<Result<ExpenseRecord, LedgerError>> {
        let draft = self.editing.as_ref()?;
        let result = ledger.update(
            &draft.id,
            &draft.fields.description,
            &draft.fields.amount,
            draft.fields.category.as_str(),
            &draft.fields.date,
        );
        if result.is_ok() {
            self.editing = None;
        }
        Some(result)
    }

    /// Discards the draft without touching the ledger.
    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }
}
