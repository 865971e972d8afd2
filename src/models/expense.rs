use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The closed set of expense categories. Anything outside this set is
/// rejected at the ledger boundary, so stored records can never carry an
/// arbitrary category string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Food,
    Transport,
    Bills,
    Shopping,
    Other,
}

impl Category {
    /// Fixed display and aggregation order.
    pub const ALL: [Category; 5] = [
        Category::Food,
        Category::Transport,
        Category::Bills,
        Category::Shopping,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Bills => "Bills",
            Category::Shopping => "Shopping",
            Category::Other => "Other",
        }
    }

    /// The next category in `ALL` order, wrapping around. Used by the
    /// browse form to cycle the category field.
    pub fn next(self) -> Category {
        let idx = Category::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Category::ALL[(idx + 1) % Category::ALL.len()]
    }

    /// The previous category in `ALL` order, wrapping around.
    pub fn prev(self) -> Category {
        let idx = Category::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Category::ALL[(idx + Category::ALL.len() - 1) % Category::ALL.len()]
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "food" => Ok(Category::Food),
            "transport" => Ok(Category::Transport),
            "bills" => Ok(Category::Bills),
            "shopping" => Ok(Category::Shopping),
            "other" => Ok(Category::Other),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single expense entry. `id` is assigned once at creation and never
/// changes; the other fields are replaceable through a validated update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub category: Category,
    pub date: NaiveDate,
}

impl ExpenseRecord {
    pub fn new(
        id: String,
        description: String,
        amount: Decimal,
        category: Category,
        date: NaiveDate,
    ) -> Self {
        Self {
            id,
            description,
            amount,
            category,
            date,
        }
    }
}
