//! Expense filter builder for constructing dynamic SQL queries
//!
//! Shared by the list endpoint (search/category/window) and the budget
//! evaluator (category + month range).

use chrono::NaiveDate;

use crate::models::Category;

/// Builder for expense query filters. The user id is always applied by the
/// query itself and is not part of the filter.
#[derive(Debug, Default, Clone)]
pub struct ExpenseFilter<'query> {
    pub category: Option<Category>,
    /// Inclusive date range
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    /// Dates on or after this day (open-ended windows)
    pub since: Option<NaiveDate>,
    /// Free-text search over description, category and notes
    pub search: Option<&'query str>,
}

/// SQL components produced by [`ExpenseFilter::build`]
pub struct FilterResult {
    /// Conditions joined with AND, each prefixed for appending after `WHERE user_id = ?`
    pub conditions: String,
    pub params: Vec<Box<dyn rusqlite::ToSql>>,
}

impl FilterResult {
    pub fn params_refs(&self) -> Vec<&dyn rusqlite::ToSql> {
        self.params.iter().map(|p| p.as_ref()).collect()
    }
}

impl<'query> ExpenseFilter<'query> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: Option<Category>) -> Self {
        self.category = category;
        self
    }

    pub fn date_range(mut self, range: Option<(NaiveDate, NaiveDate)>) -> Self {
        self.date_range = range;
        self
    }

    pub fn since(mut self, date: Option<NaiveDate>) -> Self {
        self.since = date;
        self
    }

    pub fn search(mut self, query: Option<&'query str>) -> Self {
        self.search = query.map(str::trim).filter(|q| !q.is_empty());
        self
    }

    /// Build the filter components
    pub fn build(&self) -> FilterResult {
        let mut conditions = String::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(category) = self.category {
            conditions.push_str(" AND category = ?");
            params.push(Box::new(category.as_str()));
        }

        if let Some((start, end)) = self.date_range {
            conditions.push_str(" AND date >= ? AND date <= ?");
            params.push(Box::new(start.to_string()));
            params.push(Box::new(end.to_string()));
        }

        if let Some(since) = self.since {
            conditions.push_str(" AND date >= ?");
            params.push(Box::new(since.to_string()));
        }

        if let Some(search) = self.search {
            conditions.push_str(
                " AND (description LIKE ? COLLATE NOCASE OR category LIKE ? COLLATE NOCASE OR COALESCE(notes, '') LIKE ? COLLATE NOCASE)",
            );
            let pattern = format!("%{}%", search);
            params.push(Box::new(pattern.clone()));
            params.push(Box::new(pattern.clone()));
            params.push(Box::new(pattern));
        }

        FilterResult { conditions, params }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_has_no_conditions() {
        let result = ExpenseFilter::new().build();
        assert!(result.conditions.is_empty());
        assert!(result.params.is_empty());
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let result = ExpenseFilter::new().search(Some("   ")).build();
        assert!(result.conditions.is_empty());
    }

    #[test]
    fn test_combined_filter() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let result = ExpenseFilter::new()
            .category(Some(Category::Food))
            .date_range(Some((start, end)))
            .search(Some("lunch"))
            .build();
        assert!(result.conditions.contains("category = ?"));
        assert!(result.conditions.contains("date <= ?"));
        assert_eq!(result.params.len(), 6);
    }
}
