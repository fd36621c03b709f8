//! Query objects for the remote store.
//!
//! # Responsibilities
//! - Build filter/sort/page criteria with a fluent builder
//! - Render the store's JSON query object (`$gt`, `$nin`, `$or`, `$sort`,
//!   `$limit`, `$skip`)
//! - Render the equivalent REST query-string pairs for the HTTP transport
//! - Evaluate queries locally for the in-process store

use serde_json::{json, Map, Value};

/// Sort direction for a `$sort` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    fn as_flag(&self) -> i64 {
        match self {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        }
    }
}

/// A single field filter.
#[derive(Debug, Clone)]
enum Clause {
    Eq(String, Value),
    Gt(String, Value),
    Nin(String, Vec<Value>),
}

/// Filter, sort, and page criteria for a store collection.
#[derive(Debug, Clone, Default)]
pub struct Query {
    clauses: Vec<Clause>,
    /// Equality alternatives rendered as a `$or` group.
    any_of: Vec<(String, Value)>,
    sort: Option<(String, SortOrder)>,
    limit: Option<u64>,
    skip: Option<u64>,
    /// Store-side response shaping hint (related-detail expansion).
    schema: Option<String>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Field must equal the value.
    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.clauses.push(Clause::Eq(field.to_string(), value.into()));
        self
    }

    /// Field must be strictly greater than the value.
    pub fn gt(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.clauses.push(Clause::Gt(field.to_string(), value.into()));
        self
    }

    /// Field must not be any of the values.
    pub fn nin(mut self, field: &str, values: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        self.clauses.push(Clause::Nin(
            field.to_string(),
            values.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// At least one of the field/value equalities must hold (`$or`).
    pub fn any_of(mut self, alternatives: impl IntoIterator<Item = (&'static str, Value)>) -> Self {
        self.any_of
            .extend(alternatives.into_iter().map(|(f, v)| (f.to_string(), v)));
        self
    }

    pub fn sort_desc(mut self, field: &str) -> Self {
        self.sort = Some((field.to_string(), SortOrder::Descending));
        self
    }

    pub fn sort_asc(mut self, field: &str) -> Self {
        self.sort = Some((field.to_string(), SortOrder::Ascending));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    /// Ask the store to expand related details using the named schema.
    pub fn schema(mut self, name: &str) -> Self {
        self.schema = Some(name.to_string());
        self
    }

    /// Render the store's JSON query object.
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        for clause in &self.clauses {
            match clause {
                Clause::Eq(field, value) => {
                    object.insert(field.clone(), value.clone());
                }
                Clause::Gt(field, value) => {
                    object.insert(field.clone(), json!({ "$gt": value }));
                }
                Clause::Nin(field, values) => {
                    object.insert(field.clone(), json!({ "$nin": values }));
                }
            }
        }
        if !self.any_of.is_empty() {
            let alternatives: Vec<Value> = self
                .any_of
                .iter()
                .map(|(field, value)| {
                    let mut alternative = Map::new();
                    alternative.insert(field.clone(), value.clone());
                    Value::Object(alternative)
                })
                .collect();
            object.insert("$or".to_string(), Value::Array(alternatives));
        }
        if let Some((field, order)) = &self.sort {
            let mut sort = Map::new();
            sort.insert(field.clone(), json!(order.as_flag()));
            object.insert("$sort".to_string(), json!(sort));
        }
        if let Some(limit) = self.limit {
            object.insert("$limit".to_string(), json!(limit));
        }
        if let Some(skip) = self.skip {
            object.insert("$skip".to_string(), json!(skip));
        }
        if let Some(schema) = &self.schema {
            object.insert("$schema".to_string(), json!(schema));
        }
        Value::Object(object)
    }

    /// Render REST query-string pairs, bracket notation for operators
    /// (`status[$nin][]=Canceled`, `$sort[createdAt]=-1`).
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for clause in &self.clauses {
            match clause {
                Clause::Eq(field, value) => pairs.push((field.clone(), scalar(value))),
                Clause::Gt(field, value) => {
                    pairs.push((format!("{field}[$gt]"), scalar(value)));
                }
                Clause::Nin(field, values) => {
                    for value in values {
                        pairs.push((format!("{field}[$nin][]"), scalar(value)));
                    }
                }
            }
        }
        for (i, (field, value)) in self.any_of.iter().enumerate() {
            pairs.push((format!("$or[{i}][{field}]"), scalar(value)));
        }
        if let Some((field, order)) = &self.sort {
            pairs.push((format!("$sort[{field}]"), order.as_flag().to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("$limit".to_string(), limit.to_string()));
        }
        if let Some(skip) = self.skip {
            pairs.push(("$skip".to_string(), skip.to_string()));
        }
        if let Some(schema) = &self.schema {
            pairs.push(("$schema".to_string(), schema.clone()));
        }
        pairs
    }

    /// Whether a record satisfies every filter clause.
    pub fn matches(&self, record: &Value) -> bool {
        for clause in &self.clauses {
            let holds = match clause {
                Clause::Eq(field, value) => record.get(field) == Some(value),
                Clause::Gt(field, value) => match (numeric(record.get(field)), numeric(Some(value))) {
                    (Some(actual), Some(bound)) => actual > bound,
                    _ => false,
                },
                Clause::Nin(field, values) => match record.get(field) {
                    Some(actual) => !values.contains(actual),
                    None => true,
                },
            };
            if !holds {
                return false;
            }
        }
        if !self.any_of.is_empty()
            && !self
                .any_of
                .iter()
                .any(|(field, value)| record.get(field) == Some(value))
        {
            return false;
        }
        true
    }

    /// Evaluate the full query against an in-process collection: filter,
    /// sort, and page. `total` counts all matches before paging.
    pub fn evaluate(&self, records: &[Value]) -> (Vec<Value>, u64) {
        let mut matched: Vec<Value> = records
            .iter()
            .filter(|record| self.matches(record))
            .cloned()
            .collect();
        let total = matched.len() as u64;

        if let Some((field, order)) = &self.sort {
            matched.sort_by(|a, b| {
                let ordering = compare(a.get(field), b.get(field));
                match order {
                    SortOrder::Ascending => ordering,
                    SortOrder::Descending => ordering.reverse(),
                }
            });
        }

        let skip = self.skip.unwrap_or(0) as usize;
        let mut page: Vec<Value> = matched.into_iter().skip(skip).collect();
        if let Some(limit) = self.limit {
            page.truncate(limit as usize);
        }
        (page, total)
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn numeric(value: Option<&Value>) -> Option<f64> {
    value.and_then(Value::as_f64)
}

fn compare(a: Option<&Value>, b: Option<&Value>) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}
