/*
[INPUT]:  Field selections, filters, joins and sort clauses
[OUTPUT]: Query parameters understood by the CRUD endpoints of the web service
[POS]:    HTTP layer - query string construction for resource listings
[UPDATE]: When new filter operators or query clauses are needed
*/

use crate::types::SortOrder;

/// Filter operators supported by the CRUD endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CondOperator {
    Equals,
    NotEquals,
    In,
}

impl CondOperator {
    fn as_str(&self) -> &'static str {
        match self {
            CondOperator::Equals => "$eq",
            CondOperator::NotEquals => "$ne",
            CondOperator::In => "$in",
        }
    }
}

/// Builder for `fields` / `filter` / `join` / `sort` query parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrudQuery {
    params: Vec<(String, String)>,
}

impl CrudQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(mut self, fields: &[&str]) -> Self {
        self.params.push(("fields".to_string(), fields.join(",")));
        self
    }

    pub fn filter(mut self, field: &str, operator: CondOperator, value: &str) -> Self {
        self.params.push((
            "filter".to_string(),
            format!("{field}||{}||{value}", operator.as_str()),
        ));
        self
    }

    pub fn filter_in<S: AsRef<str>>(mut self, field: &str, values: &[S]) -> Self {
        let joined = values
            .iter()
            .map(|value| value.as_ref())
            .collect::<Vec<_>>()
            .join(",");
        self.params.push((
            "filter".to_string(),
            format!("{field}||{}||{joined}", CondOperator::In.as_str()),
        ));
        self
    }

    /// Join a relation, optionally restricting the selected columns
    pub fn join(mut self, field: &str, select: &[&str]) -> Self {
        let value = if select.is_empty() {
            field.to_string()
        } else {
            format!("{field}||{}", select.join(","))
        };
        self.params.push(("join".to_string(), value));
        self
    }

    pub fn sort(mut self, field: &str, order: SortOrder) -> Self {
        self.params
            .push(("sort".to_string(), format!("{field},{}", order.as_str())));
        self
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// URL-encoded query string (without the leading `?`)
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.iter())
            .finish()
    }
}
