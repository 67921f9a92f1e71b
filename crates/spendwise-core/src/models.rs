//! Domain models for Spendwise
//!
//! All records serialize with camelCase field names so the browser client
//! can consume them directly. Months are zero-based (0 = January) to match
//! the client's date handling.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// Expense classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Transport,
    Entertainment,
    Shopping,
    Utilities,
    Healthcare,
    Education,
    Travel,
    Rent,
    Subscriptions,
    Other,
}

impl Category {
    pub const ALL: [Category; 11] = [
        Self::Food,
        Self::Transport,
        Self::Entertainment,
        Self::Shopping,
        Self::Utilities,
        Self::Healthcare,
        Self::Education,
        Self::Travel,
        Self::Rent,
        Self::Subscriptions,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Transport => "transport",
            Self::Entertainment => "entertainment",
            Self::Shopping => "shopping",
            Self::Utilities => "utilities",
            Self::Healthcare => "healthcare",
            Self::Education => "education",
            Self::Travel => "travel",
            Self::Rent => "rent",
            Self::Subscriptions => "subscriptions",
            Self::Other => "other",
        }
    }

    /// Human-readable name shown in charts and insights
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Food => "Food & Dining",
            Self::Transport => "Transportation",
            Self::Entertainment => "Entertainment",
            Self::Shopping => "Shopping",
            Self::Utilities => "Utilities",
            Self::Healthcare => "Healthcare",
            Self::Education => "Education",
            Self::Travel => "Travel",
            Self::Rent => "Rent & Housing",
            Self::Subscriptions => "Subscriptions",
            Self::Other => "Other",
        }
    }

    /// Chart color (CSS hsl)
    pub fn color(&self) -> &'static str {
        match self {
            Self::Food => "hsl(38, 92%, 50%)",
            Self::Transport => "hsl(238, 84%, 67%)",
            Self::Entertainment => "hsl(280, 84%, 60%)",
            Self::Shopping => "hsl(340, 82%, 52%)",
            Self::Utilities => "hsl(200, 98%, 39%)",
            Self::Healthcare => "hsl(0, 84%, 60%)",
            Self::Education => "hsl(160, 84%, 39%)",
            Self::Travel => "hsl(180, 70%, 45%)",
            Self::Rent => "hsl(25, 95%, 53%)",
            Self::Subscriptions => "hsl(260, 67%, 55%)",
            Self::Other => "hsl(220, 9%, 46%)",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Accepts either a plain date or a full RFC 3339 timestamp (clients often
/// send `Date.toISOString()` output); the time part is dropped.
fn deserialize_lenient_date<'de, D>(deserializer: D) -> std::result::Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_lenient_date(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date: {}", raw)))
}

fn deserialize_lenient_date_opt<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|s| {
        parse_lenient_date(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid date: {}", s)))
    })
    .transpose()
}

/// Parse `YYYY-MM-DD` or an RFC 3339 timestamp into a date
pub fn parse_lenient_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

fn default_true() -> bool {
    true
}

fn require_positive(field: &str, amount: f64) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidData(format!("{} must be a positive number", field)));
    }
    Ok(())
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidData(format!("{} is required", field)));
    }
    Ok(())
}

/// First and last day of a zero-based month
pub fn month_range(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month + 1, 1)
        .ok_or_else(|| Error::InvalidData(format!("Invalid month {} for year {}", month, year)))?;
    let next = if month == 11 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 2, 1)
    }
    .ok_or_else(|| Error::InvalidData(format!("Invalid month {} for year {}", month, year)))?;
    Ok((start, next.pred_opt().unwrap_or(start)))
}

// ============================================================================
// Expenses
// ============================================================================

/// A recorded expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: i64,
    pub user_id: String,
    pub amount: f64,
    pub category: Category,
    pub description: String,
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub is_worthy: bool,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating an expense
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub amount: f64,
    pub category: Category,
    pub description: String,
    #[serde(deserialize_with = "deserialize_lenient_date")]
    pub date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default = "default_true")]
    pub is_worthy: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl NewExpense {
    pub fn validate(&self) -> Result<()> {
        require_positive("amount", self.amount)?;
        require_text("description", &self.description)
    }
}

/// Partial update for an expense; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseUpdate {
    pub amount: Option<f64>,
    pub category: Option<Category>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_date_opt")]
    pub date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub is_worthy: Option<bool>,
    pub tags: Option<Vec<String>>,
}

impl ExpenseUpdate {
    /// Apply the update to an existing expense, validating the result
    pub fn apply(&self, expense: &mut Expense) -> Result<()> {
        if let Some(amount) = self.amount {
            require_positive("amount", amount)?;
            expense.amount = amount;
        }
        if let Some(category) = self.category {
            expense.category = category;
        }
        if let Some(ref description) = self.description {
            require_text("description", description)?;
            expense.description = description.clone();
        }
        if let Some(date) = self.date {
            expense.date = date;
        }
        if let Some(ref notes) = self.notes {
            expense.notes = Some(notes.clone()).filter(|n| !n.is_empty());
        }
        if let Some(is_worthy) = self.is_worthy {
            expense.is_worthy = is_worthy;
        }
        if let Some(ref tags) = self.tags {
            expense.tags = tags.clone();
        }
        Ok(())
    }
}

// ============================================================================
// Income
// ============================================================================

/// How often recurring income arrives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurringFrequency {
    Weekly,
    Biweekly,
    Monthly,
    Yearly,
}

impl RecurringFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl std::str::FromStr for RecurringFrequency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "weekly" => Ok(Self::Weekly),
            "biweekly" => Ok(Self::Biweekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(format!("Unknown frequency: {}", s)),
        }
    }
}

/// A recorded income entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Income {
    pub id: i64,
    pub user_id: String,
    pub amount: f64,
    pub source: String,
    pub description: String,
    pub date: NaiveDate,
    pub is_recurring: bool,
    pub recurring_frequency: Option<RecurringFrequency>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating an income entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIncome {
    pub amount: f64,
    pub source: String,
    pub description: String,
    #[serde(deserialize_with = "deserialize_lenient_date")]
    pub date: NaiveDate,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub recurring_frequency: Option<RecurringFrequency>,
}

impl NewIncome {
    pub fn validate(&self) -> Result<()> {
        require_positive("amount", self.amount)?;
        require_text("source", &self.source)?;
        require_text("description", &self.description)?;
        if self.is_recurring && self.recurring_frequency.is_none() {
            return Err(Error::InvalidData(
                "recurringFrequency is required for recurring income".to_string(),
            ));
        }
        Ok(())
    }

    /// Frequency is only meaningful for recurring income
    pub fn normalized_frequency(&self) -> Option<RecurringFrequency> {
        self.recurring_frequency.filter(|_| self.is_recurring)
    }
}

/// Partial update for an income entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeUpdate {
    pub amount: Option<f64>,
    pub source: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_date_opt")]
    pub date: Option<NaiveDate>,
    pub is_recurring: Option<bool>,
    pub recurring_frequency: Option<RecurringFrequency>,
}

impl IncomeUpdate {
    pub fn apply(&self, income: &mut Income) -> Result<()> {
        if let Some(amount) = self.amount {
            require_positive("amount", amount)?;
            income.amount = amount;
        }
        if let Some(ref source) = self.source {
            require_text("source", source)?;
            income.source = source.clone();
        }
        if let Some(ref description) = self.description {
            require_text("description", description)?;
            income.description = description.clone();
        }
        if let Some(date) = self.date {
            income.date = date;
        }
        if let Some(is_recurring) = self.is_recurring {
            income.is_recurring = is_recurring;
        }
        if self.recurring_frequency.is_some() {
            income.recurring_frequency = self.recurring_frequency;
        }
        if !income.is_recurring {
            income.recurring_frequency = None;
        } else if income.recurring_frequency.is_none() {
            return Err(Error::InvalidData(
                "recurringFrequency is required for recurring income".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Budgets
// ============================================================================

/// A monthly spending limit for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: i64,
    pub user_id: String,
    pub category: Category,
    pub amount: f64,
    /// Zero-based month (0 = January)
    pub month: u32,
    pub year: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Budget {
    pub fn period(&self) -> BudgetPeriod {
        BudgetPeriod {
            category: self.category,
            month: self.month,
            year: self.year,
        }
    }
}

/// The (category, month, year) a budget applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BudgetPeriod {
    pub category: Category,
    pub month: u32,
    pub year: i32,
}

impl BudgetPeriod {
    pub fn new(category: Category, month: u32, year: i32) -> Self {
        Self {
            category,
            month,
            year,
        }
    }

    /// The period an expense dated `date` falls into
    pub fn containing(category: Category, date: NaiveDate) -> Self {
        Self::new(category, date.month0(), date.year())
    }

    /// Inclusive first/last day of the period
    pub fn date_range(&self) -> Result<(NaiveDate, NaiveDate)> {
        month_range(self.year, self.month)
    }

    /// "3/2024" style label (one-based month)
    pub fn label(&self) -> String {
        format!("{}/{}", self.month + 1, self.year)
    }
}

fn validate_budget_fields(amount: f64, month: u32, year: i32) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidData(
            "amount must be zero or a positive number".to_string(),
        ));
    }
    if month > 11 {
        return Err(Error::InvalidData(format!(
            "month must be between 0 and 11 (got {})",
            month
        )));
    }
    if !(1970..=9999).contains(&year) {
        return Err(Error::InvalidData(format!("year {} is out of range", year)));
    }
    Ok(())
}

/// Payload for creating (or upserting) a budget
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBudget {
    pub category: Category,
    pub amount: f64,
    pub month: u32,
    pub year: i32,
}

impl NewBudget {
    pub fn validate(&self) -> Result<()> {
        validate_budget_fields(self.amount, self.month, self.year)
    }

    pub fn period(&self) -> BudgetPeriod {
        BudgetPeriod::new(self.category, self.month, self.year)
    }
}

/// Partial update for a budget
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetUpdate {
    pub category: Option<Category>,
    pub amount: Option<f64>,
    pub month: Option<u32>,
    pub year: Option<i32>,
}

impl BudgetUpdate {
    pub fn apply(&self, budget: &mut Budget) -> Result<()> {
        let amount = self.amount.unwrap_or(budget.amount);
        let month = self.month.unwrap_or(budget.month);
        let year = self.year.unwrap_or(budget.year);
        validate_budget_fields(amount, month, year)?;

        if let Some(category) = self.category {
            budget.category = category;
        }
        budget.amount = amount;
        budget.month = month;
        budget.year = year;
        Ok(())
    }
}

/// Where spending stands relative to a budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    Ok,
    NearLimit,
    Exceeded,
}

impl BudgetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::NearLimit => "near_limit",
            Self::Exceeded => "exceeded",
        }
    }
}

/// A budget together with its recomputed spend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetWithSpent {
    #[serde(flatten)]
    pub budget: Budget,
    pub spent: f64,
    pub remaining: f64,
    /// Spent as a percentage of the limit, capped at 100
    pub percentage: f64,
    pub status: BudgetStatus,
}

// ============================================================================
// Notifications
// ============================================================================

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl std::str::FromStr for NotificationType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" => Ok(Self::Info),
            "success" => Ok(Self::Success),
            "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            _ => Err(format!("Unknown notification type: {}", s)),
        }
    }
}

/// A user-facing notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub created_at: DateTime<Utc>,
}

/// Payload for a manually created notification
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNotification {
    pub title: String,
    pub message: String,
    #[serde(rename = "type", default)]
    pub notification_type: NotificationType,
}

impl NewNotification {
    pub fn validate(&self) -> Result<()> {
        require_text("title", &self.title)?;
        require_text("message", &self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_roundtrip_names() {
        for category in Category::ALL {
            let parsed: Category = category.as_str().parse().unwrap();
            assert_eq!(parsed, category);
        }
        assert!("groceries".parse::<Category>().is_err());
        assert_eq!("FOOD".parse::<Category>().unwrap(), Category::Food);
    }

    #[test]
    fn test_month_range_handles_december_and_leap_years() {
        let (start, end) = month_range(2024, 1).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let (start, end) = month_range(2023, 11).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2023, 12, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());

        assert!(month_range(2024, 12).is_err());
    }

    #[test]
    fn test_new_expense_defaults_and_lenient_date() {
        let expense: NewExpense = serde_json::from_str(
            r#"{"amount": 12.5, "category": "food", "description": "Lunch", "date": "2024-03-05T18:30:00.000Z"}"#,
        )
        .unwrap();
        assert!(expense.is_worthy);
        assert!(expense.tags.is_empty());
        assert_eq!(expense.date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert!(expense.validate().is_ok());
    }

    #[test]
    fn test_new_expense_rejects_non_positive_amount() {
        let expense = NewExpense {
            amount: 0.0,
            category: Category::Food,
            description: "Free lunch".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            notes: None,
            is_worthy: true,
            tags: vec![],
        };
        assert!(matches!(expense.validate(), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_recurring_income_requires_frequency() {
        let income = NewIncome {
            amount: 3000.0,
            source: "Employer".to_string(),
            description: "Salary".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            is_recurring: true,
            recurring_frequency: None,
        };
        assert!(income.validate().is_err());

        let income = NewIncome {
            recurring_frequency: Some(RecurringFrequency::Monthly),
            ..income
        };
        assert!(income.validate().is_ok());
    }

    #[test]
    fn test_budget_update_validates_month() {
        let now = Utc::now();
        let mut budget = Budget {
            id: 1,
            user_id: "u".to_string(),
            category: Category::Food,
            amount: 500.0,
            month: 2,
            year: 2024,
            created_at: now,
            updated_at: now,
        };
        let update = BudgetUpdate {
            month: Some(12),
            ..Default::default()
        };
        assert!(update.apply(&mut budget).is_err());
        assert_eq!(budget.month, 2);

        let update = BudgetUpdate {
            amount: Some(650.0),
            ..Default::default()
        };
        update.apply(&mut budget).unwrap();
        assert_eq!(budget.amount, 650.0);
    }

    #[test]
    fn test_notification_type_serializes_as_type() {
        let now = Utc::now();
        let n = Notification {
            id: 7,
            user_id: "u".to_string(),
            title: "Budget Alert".to_string(),
            message: "msg".to_string(),
            is_read: false,
            notification_type: NotificationType::Warning,
            created_at: now,
        };
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["type"], "warning");
        assert_eq!(json["isRead"], false);
        assert_eq!(json["userId"], "u");
    }

    #[test]
    fn test_budget_period_label() {
        let period = BudgetPeriod::containing(
            Category::Food,
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
        );
        assert_eq!(period.month, 2);
        assert_eq!(period.label(), "3/2024");
    }
}
