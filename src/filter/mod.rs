pub mod error;
pub mod types;

pub use error::FilterError;
pub use types::{FilterOp, Ordering, Predicate, SortDirection};

/// Accumulates AND predicates, a single ordering column, and a limit, and
/// renders them as query pairs in the data service's wire format
/// (`column=op.value`, `order=column.direction`, `limit=n`).
///
/// Identifiers are validated before they touch the wire; values are handed
/// to the URL serializer, which percent-escapes them.
#[derive(Debug, Clone, Default)]
pub struct QueryFilters {
    predicates: Vec<Predicate>,
    ordering: Option<Ordering>,
    limit: Option<u32>,
}

impl QueryFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &str, value: impl ToString) -> Result<Self, FilterError> {
        self.push(column, FilterOp::Eq, value.to_string())?;
        Ok(self)
    }

    pub fn gte(mut self, column: &str, value: impl ToString) -> Result<Self, FilterError> {
        self.push(column, FilterOp::Gte, value.to_string())?;
        Ok(self)
    }

    pub fn lte(mut self, column: &str, value: impl ToString) -> Result<Self, FilterError> {
        self.push(column, FilterOp::Lte, value.to_string())?;
        Ok(self)
    }

    pub fn order(mut self, column: &str, direction: SortDirection) -> Result<Self, FilterError> {
        validate_identifier(column).map_err(|_| FilterError::InvalidColumn(column.to_string()))?;
        self.ordering = Some(Ordering { column: column.to_string(), direction });
        Ok(self)
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty() && self.ordering.is_none() && self.limit.is_none()
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Render as `(key, value)` pairs for the request URL.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .predicates
            .iter()
            .map(|p| (p.column.clone(), format!("{}.{}", p.op.as_wire(), p.value)))
            .collect();

        if let Some(ref ord) = self.ordering {
            pairs.push((
                "order".to_string(),
                format!("{}.{}", ord.column, ord.direction.as_wire()),
            ));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs
    }

    fn push(&mut self, column: &str, op: FilterOp, value: String) -> Result<(), FilterError> {
        validate_identifier(column).map_err(|_| FilterError::InvalidColumn(column.to_string()))?;
        self.predicates.push(Predicate { column: column.to_string(), op, value });
        Ok(())
    }
}

/// Table and column names: alphanumeric plus `_`, non-digit first character.
pub fn validate_identifier(name: &str) -> Result<(), FilterError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(FilterError::InvalidTableName(name.to_string()))
    }
}
