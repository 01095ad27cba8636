//! Translation of a [`QueryPlan`] into a SeaORM select.

use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Alias, Expr, Func, LikeExpr, NullOrdering, SimpleExpr};
use sea_orm::{
    Condition, DbErr, EntityTrait, Order, QueryFilter, QueryOrder, QuerySelect, Select, SqlErr,
};

use folio_core::error::RepoError;
use folio_core::query::{Field, Predicate, QueryPlan, SortOrder};

/// Maps plan fields onto the columns of one entity.
pub trait PlanColumns: EntityTrait {
    /// `None` when the entity has no such column.
    fn column(field: Field) -> Option<Self::Column>;
}

/// Escape `%`, `_` and `\` so user input matches literally inside LIKE.
pub(crate) fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn column_expr<E: PlanColumns>(field: Field) -> Option<Expr> {
    E::column(field).map(|col| Expr::col((E::default(), col)))
}

fn predicate_condition<E: PlanColumns>(predicate: &Predicate) -> Condition {
    match predicate {
        Predicate::Equals { field, value } => {
            let expr: SimpleExpr = match column_expr::<E>(*field) {
                Some(col) => col.eq(value.as_str()),
                None => Expr::value(false),
            };
            Condition::all().add(expr)
        }
        Predicate::Search { fields, needle } => {
            let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
            // An empty `any` renders as FALSE.
            fields
                .iter()
                .filter_map(|f| column_expr::<E>(*f))
                .fold(Condition::any(), |cond, col| {
                    cond.add(
                        Expr::expr(Func::lower(col)).like(LikeExpr::new(pattern.clone()).escape('\\')),
                    )
                })
        }
        Predicate::HasTag { field, tag } => {
            let expr: SimpleExpr = match column_expr::<E>(*field) {
                Some(col) => PgExpr::contains(
                    col,
                    Expr::value(serde_json::json!([tag])).cast_as(Alias::new("jsonb")),
                ),
                None => Expr::value(false),
            };
            Condition::all().add(expr)
        }
    }
}

/// AND of every predicate in the plan.
pub(crate) fn condition<E: PlanColumns>(predicates: &[Predicate]) -> Condition {
    predicates
        .iter()
        .fold(Condition::all(), |cond, p| cond.add(predicate_condition::<E>(p)))
}

/// Filtered select, before ordering and paging. Used for counting.
pub(crate) fn filtered<E: PlanColumns>(plan: &QueryPlan) -> Select<E> {
    if plan.predicates.is_empty() {
        return E::find();
    }
    E::find().filter(condition::<E>(&plan.predicates))
}

/// Apply the plan's order (text lowercased, nulls last, id tiebreak) and window.
pub(crate) fn ordered_page<E: PlanColumns>(select: Select<E>, plan: &QueryPlan) -> Select<E> {
    let direction = match plan.order.direction {
        SortOrder::Asc => Order::Asc,
        SortOrder::Desc => Order::Desc,
    };
    let mut select = match E::column(plan.order.field) {
        Some(col) if plan.order.field.is_text() => {
            let key: SimpleExpr = Func::lower(Expr::col((E::default(), col))).into();
            select.order_by_with_nulls(key, direction, NullOrdering::Last)
        }
        Some(col) => select.order_by_with_nulls(col, direction, NullOrdering::Last),
        None => select,
    };
    if let Some(id) = E::column(Field::Id) {
        select = select.order_by_asc(id);
    }
    select
        .offset(plan.window.offset())
        .limit(plan.window.limit)
}

/// Classify a SeaORM error.
pub(crate) fn map_db_err(err: DbErr) -> RepoError {
    if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
        return RepoError::Constraint(detail);
    }
    match err {
        DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => RepoError::NotFound,
        DbErr::Conn(e) => RepoError::Connection(e.to_string()),
        DbErr::ConnectionAcquire(e) => RepoError::Connection(e.to_string()),
        other => RepoError::Query(other.to_string()),
    }
}
