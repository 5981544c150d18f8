//! Row selection in PostgREST query syntax.

use serde_json::Value;
use std::cmp::Ordering;

/// Equality filter on one column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Filter {
    pub column: String,
    pub value: String,
}

impl Filter {
    /// Whether `row` carries `value` in `column`, comparing the way PostgREST
    /// compares a text literal against a typed column.
    pub fn matches(&self, row: &Value) -> bool {
        match row.get(&self.column) {
            Some(Value::String(s)) => s == &self.value,
            Some(Value::Number(n)) => n.to_string() == self.value,
            Some(Value::Bool(b)) => b.to_string() == self.value,
            Some(Value::Null) | None => self.value == "null",
            Some(_) => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

impl Order {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: true,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: false,
        }
    }

    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        let ord = compare_values(a.get(&self.column), b.get(&self.column));
        if self.ascending {
            ord
        } else {
            ord.reverse()
        }
    }

    fn to_param(&self) -> String {
        let dir = if self.ascending { "asc" } else { "desc" };
        format!("{}.{}", self.column, dir)
    }
}

// Nulls sort last in ascending order, as in Postgres.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Greater,
        (_, None | Some(Value::Null)) => Ordering::Less,
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}

/// Which rows to read or modify.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowQuery {
    pub columns: String,
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
    pub limit: Option<usize>,
}

impl Default for RowQuery {
    fn default() -> Self {
        Self {
            columns: "*".to_string(),
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }
}

impl RowQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn select(mut self, columns: impl Into<String>) -> Self {
        self.columns = columns.into();
        self
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl ToString) -> Self {
        self.filters.push(Filter {
            column: column.into(),
            value: value.to_string(),
        });
        self
    }

    pub fn order(mut self, order: Order) -> Self {
        self.order = Some(order);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, row: &Value) -> bool {
        self.filters.iter().all(|f| f.matches(row))
    }

    /// Filter, order and truncate an in-memory row set.
    pub fn apply<'a>(&self, rows: impl IntoIterator<Item = &'a Value>) -> Vec<Value> {
        let mut selected: Vec<Value> = rows
            .into_iter()
            .filter(|row| self.matches(row))
            .cloned()
            .collect();
        if let Some(order) = &self.order {
            // stable, so ties keep insertion order
            selected.sort_by(|a, b| order.compare(a, b));
        }
        if let Some(limit) = self.limit {
            selected.truncate(limit);
        }
        selected
    }

    /// Query-string pairs for a read.
    pub fn to_select_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), self.columns.clone())];
        params.extend(self.to_filter_params());
        if let Some(order) = &self.order {
            params.push(("order".to_string(), order.to_param()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        params
    }

    /// Query-string pairs for a write (filters only).
    pub fn to_filter_params(&self) -> Vec<(String, String)> {
        self.filters
            .iter()
            .map(|f| (f.column.clone(), format!("eq.{}", f.value)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_select_params() {
        let query = RowQuery::all()
            .eq("id", 7)
            .order(Order::desc("created_at"))
            .limit(1);
        assert_eq!(
            query.to_select_params(),
            vec![
                ("select".to_string(), "*".to_string()),
                ("id".to_string(), "eq.7".to_string()),
                ("order".to_string(), "created_at.desc".to_string()),
                ("limit".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_filter_matches_numbers_and_strings() {
        let row = json!({"id": 3, "title": "Site"});
        assert!(RowQuery::all().eq("id", 3).matches(&row));
        assert!(RowQuery::all().eq("title", "Site").matches(&row));
        assert!(!RowQuery::all().eq("id", 4).matches(&row));
    }

    #[test]
    fn test_apply_orders_descending_with_nulls_last() {
        let rows = vec![
            json!({"id": 1, "created_at": "2026-01-01T00:00:00.000000Z"}),
            json!({"id": 2, "created_at": null}),
            json!({"id": 3, "created_at": "2026-03-01T00:00:00.000000Z"}),
        ];
        let ordered = RowQuery::all().order(Order::asc("created_at")).apply(&rows);
        let ids: Vec<i64> = ordered.iter().map(|r| r["id"].as_i64().unwrap()).collect();
        assert_eq!(ids, vec![1, 3, 2]);

        let newest = RowQuery::all()
            .order(Order::desc("created_at"))
            .limit(1)
            .apply(&rows);
        assert_eq!(newest.len(), 1);
    }
}
