//! Query representation handed to data sources.
//!
//! - [`Predicate`] - Conditions produced by filters and AND-ed by the table
//! - [`Expr`] / [`Alias`] - What a predicate or ordering applies to
//! - [`OrderBy`] - Ordering specification, and [`resolve_order`] for reading it
//!   from request parameters
//! - [`Query`] - A fully composed query: entity, filter, ordering and slice

mod expr;
mod order;
mod predicate;

pub use expr::Alias;
pub use expr::Expr;
pub use order::Direction;
pub use order::OrderBy;
pub use order::resolve_order;
pub use predicate::Predicate;

use crate::model::Entity;

/// A composed query against one entity.
///
/// `predicates` are AND-ed. `offset` and `limit` are `None` for an unsliced
/// query. Counting ignores ordering and slicing.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub entity: Entity,
    pub predicates: Vec<Predicate>,
    pub order_by: OrderBy,
    pub offset: Option<usize>,
    pub limit: Option<usize>,
}

impl Query {
    /// Creates an unfiltered, unordered query over an entity.
    pub fn new(entity: Entity) -> Self {
        Self {
            entity,
            predicates: Vec::new(),
            order_by: OrderBy::new(),
            offset: None,
            limit: None,
        }
    }

    /// Adds a predicate, AND-ed with the existing ones.
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Sets the ordering of results.
    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order_by = order;
        self
    }

    /// Skips the first `offset` matching rows.
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Returns at most `limit` rows.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns the AND of all predicates, or `None` when unfiltered.
    pub fn combined_predicate(&self) -> Option<Predicate> {
        match self.predicates.as_slice() {
            [] => None,
            [single] => Some(single.clone()),
            many => Some(Predicate::and(many.iter().cloned())),
        }
    }
}
