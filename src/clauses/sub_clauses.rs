//! Capability sub-clauses shared across statement clauses.
//!
//! Each capability is a small stateful object lazily created on first fluent
//! use and owned by its clause, so it renders against the same environment as
//! everything else in the tree. Capabilities that were never invoked render
//! nothing at all.

use std::cell::RefCell;

use crate::errors::CypherBuildError;
use crate::expr::operators;
use crate::expr::Expr;
use crate::references::PropertyAccess;
use crate::scope::Environment;
use crate::tree::ToCypher;
use crate::utils::escape_label;

/// WHERE capability. Subsequent predicates are AND-folded into the existing
/// one, never replacing it.
#[derive(Debug, Default)]
pub(crate) struct WhereSubClause {
    predicate: Option<Expr>,
}

impl WhereSubClause {
    pub(crate) fn merge_into(slot: &RefCell<Option<WhereSubClause>>, predicate: Expr) {
        let mut slot = slot.borrow_mut();
        let sub = slot.get_or_insert_with(WhereSubClause::default);
        sub.predicate = operators::and([sub.predicate.take(), Some(predicate)]);
    }
}

impl ToCypher for WhereSubClause {
    fn to_cypher(&self, env: &mut Environment) -> Result<String, CypherBuildError> {
        match &self.predicate {
            Some(predicate) => Ok(format!("WHERE {}", predicate.to_cypher(env)?)),
            None => Ok(String::new()),
        }
    }
}

#[derive(Debug)]
pub(crate) enum SetItem {
    Property { target: PropertyAccess, value: Expr },
    Labels { subject: Expr, labels: Vec<String> },
}

/// SET capability; also backs Merge's ON CREATE SET / ON MATCH SET via a
/// different keyword at render time.
#[derive(Debug, Default)]
pub(crate) struct SetSubClause {
    items: Vec<SetItem>,
}

impl SetSubClause {
    pub(crate) fn push_into(slot: &RefCell<Option<SetSubClause>>, item: SetItem) {
        slot.borrow_mut()
            .get_or_insert_with(SetSubClause::default)
            .push(item);
    }

    pub(crate) fn push(&mut self, item: SetItem) {
        self.items.push(item);
    }

    pub(crate) fn render_with_keyword(
        &self,
        keyword: &str,
        env: &mut Environment,
    ) -> Result<String, CypherBuildError> {
        let rendered = self
            .items
            .iter()
            .map(|item| match item {
                SetItem::Property { target, value } => Ok(format!(
                    "{} = {}",
                    target.to_cypher(env)?,
                    value.to_cypher(env)?
                )),
                SetItem::Labels { subject, labels } => {
                    let mut out = subject.to_cypher(env)?;
                    for label in labels {
                        out.push(':');
                        out.push_str(&escape_label(label));
                    }
                    Ok(out)
                }
            })
            .collect::<Result<Vec<String>, CypherBuildError>>()?;
        Ok(format!("{} {}", keyword, rendered.join(", ")))
    }
}

impl ToCypher for SetSubClause {
    fn to_cypher(&self, env: &mut Environment) -> Result<String, CypherBuildError> {
        self.render_with_keyword("SET", env)
    }
}

#[derive(Debug)]
pub(crate) enum RemoveItem {
    Property(PropertyAccess),
    Labels { subject: Expr, labels: Vec<String> },
}

#[derive(Debug, Default)]
pub(crate) struct RemoveSubClause {
    items: Vec<RemoveItem>,
}

impl RemoveSubClause {
    pub(crate) fn push_into(slot: &RefCell<Option<RemoveSubClause>>, item: RemoveItem) {
        slot.borrow_mut()
            .get_or_insert_with(RemoveSubClause::default)
            .items
            .push(item);
    }
}

impl ToCypher for RemoveSubClause {
    fn to_cypher(&self, env: &mut Environment) -> Result<String, CypherBuildError> {
        let rendered = self
            .items
            .iter()
            .map(|item| match item {
                RemoveItem::Property(target) => target.to_cypher(env),
                RemoveItem::Labels { subject, labels } => {
                    let mut out = subject.to_cypher(env)?;
                    for label in labels {
                        out.push(':');
                        out.push_str(&escape_label(label));
                    }
                    Ok(out)
                }
            })
            .collect::<Result<Vec<String>, CypherBuildError>>()?;
        Ok(format!("REMOVE {}", rendered.join(", ")))
    }
}

#[derive(Debug, Default)]
pub(crate) struct DeleteSubClause {
    detach: bool,
    items: Vec<Expr>,
}

impl DeleteSubClause {
    pub(crate) fn push_into<I>(slot: &RefCell<Option<DeleteSubClause>>, detach: bool, items: I)
    where
        I: IntoIterator<Item = Expr>,
    {
        let mut slot = slot.borrow_mut();
        let sub = slot.get_or_insert_with(DeleteSubClause::default);
        sub.detach = detach;
        sub.items.extend(items);
    }
}

impl ToCypher for DeleteSubClause {
    fn to_cypher(&self, env: &mut Environment) -> Result<String, CypherBuildError> {
        let rendered = self
            .items
            .iter()
            .map(|item| item.to_cypher(env))
            .collect::<Result<Vec<String>, CypherBuildError>>()?;
        let keyword = if self.detach { "DETACH DELETE" } else { "DELETE" };
        Ok(format!("{} {}", keyword, rendered.join(", ")))
    }
}

/// Column projection backing both WITH and RETURN. Rendering with zero
/// columns and no star is a construction error surfaced at compile time.
#[derive(Debug)]
pub(crate) struct Projection {
    keyword: &'static str,
    distinct: bool,
    star: bool,
    columns: Vec<(Expr, Option<String>)>,
}

impl Projection {
    pub(crate) fn new(keyword: &'static str) -> Self {
        Projection {
            keyword,
            distinct: false,
            star: false,
            columns: Vec::new(),
        }
    }

    pub(crate) fn slot_mut<'a>(
        slot: &'a RefCell<Option<Projection>>,
        keyword: &'static str,
    ) -> std::cell::RefMut<'a, Option<Projection>> {
        let mut borrowed = slot.borrow_mut();
        borrowed.get_or_insert_with(|| Projection::new(keyword));
        borrowed
    }

    pub(crate) fn push_columns<I>(slot: &RefCell<Option<Projection>>, keyword: &'static str, cols: I)
    where
        I: IntoIterator<Item = Expr>,
    {
        let mut borrowed = Self::slot_mut(slot, keyword);
        if let Some(projection) = borrowed.as_mut() {
            projection.columns.extend(cols.into_iter().map(|c| (c, None)));
        }
    }

    pub(crate) fn push_aliased(
        slot: &RefCell<Option<Projection>>,
        keyword: &'static str,
        column: Expr,
        alias: String,
    ) {
        let mut borrowed = Self::slot_mut(slot, keyword);
        if let Some(projection) = borrowed.as_mut() {
            projection.columns.push((column, Some(alias)));
        }
    }

    pub(crate) fn mark_distinct(slot: &RefCell<Option<Projection>>, keyword: &'static str) {
        let mut borrowed = Self::slot_mut(slot, keyword);
        if let Some(projection) = borrowed.as_mut() {
            projection.distinct = true;
        }
    }

    pub(crate) fn mark_star(slot: &RefCell<Option<Projection>>, keyword: &'static str) {
        let mut borrowed = Self::slot_mut(slot, keyword);
        if let Some(projection) = borrowed.as_mut() {
            projection.star = true;
        }
    }

    fn empty_error(&self) -> CypherBuildError {
        if self.keyword == "WITH" {
            CypherBuildError::EmptyWith
        } else {
            CypherBuildError::EmptyReturn
        }
    }
}

impl ToCypher for Projection {
    fn to_cypher(&self, env: &mut Environment) -> Result<String, CypherBuildError> {
        if self.columns.is_empty() && !self.star {
            return Err(self.empty_error());
        }
        let mut parts: Vec<String> = Vec::new();
        if self.star {
            parts.push("*".to_string());
        }
        for (column, alias) in &self.columns {
            let rendered = column.to_cypher(env)?;
            match alias {
                Some(alias) => parts.push(format!(
                    "{} AS {}",
                    rendered,
                    crate::utils::escape_identifier(alias)
                )),
                None => parts.push(rendered),
            }
        }
        let distinct = if self.distinct { "DISTINCT " } else { "" };
        Ok(format!("{} {}{}", self.keyword, distinct, parts.join(", ")))
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Order {
    Asc,
    Desc,
}

/// ORDER BY / SKIP / LIMIT capability.
#[derive(Debug, Default)]
pub(crate) struct OrderPaging {
    items: Vec<(Expr, Order)>,
    skip: Option<Expr>,
    limit: Option<Expr>,
}

impl OrderPaging {
    pub(crate) fn push_order(
        slot: &RefCell<Option<OrderPaging>>,
        expr: Expr,
        order: Order,
    ) {
        slot.borrow_mut()
            .get_or_insert_with(OrderPaging::default)
            .items
            .push((expr, order));
    }

    pub(crate) fn set_skip(slot: &RefCell<Option<OrderPaging>>, expr: Expr) {
        slot.borrow_mut()
            .get_or_insert_with(OrderPaging::default)
            .skip = Some(expr);
    }

    pub(crate) fn set_limit(slot: &RefCell<Option<OrderPaging>>, expr: Expr) {
        slot.borrow_mut()
            .get_or_insert_with(OrderPaging::default)
            .limit = Some(expr);
    }

    /// One fragment per line: ORDER BY, then SKIP, then LIMIT.
    pub(crate) fn fragments(&self, env: &mut Environment) -> Result<Vec<String>, CypherBuildError> {
        let mut out = Vec::new();
        if !self.items.is_empty() {
            let rendered = self
                .items
                .iter()
                .map(|(expr, order)| {
                    let direction = match order {
                        Order::Asc => "ASC",
                        Order::Desc => "DESC",
                    };
                    Ok(format!("{} {}", expr.to_cypher(env)?, direction))
                })
                .collect::<Result<Vec<String>, CypherBuildError>>()?;
            out.push(format!("ORDER BY {}", rendered.join(", ")));
        }
        if let Some(skip) = &self.skip {
            out.push(format!("SKIP {}", skip.to_cypher(env)?));
        }
        if let Some(limit) = &self.limit {
            out.push(format!("LIMIT {}", limit.to_cypher(env)?));
        }
        Ok(out)
    }
}
