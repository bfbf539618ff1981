use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::ColumnTrait;

/// `LOWER(col) LIKE '%term%'` with LIKE wildcards in `term` escaped.
pub(crate) fn contains_ci<C: ColumnTrait>(col: C, term: &str) -> SimpleExpr {
    let escaped = term
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    Expr::expr(Func::lower(Expr::col(col)))
        .like(LikeExpr::new(format!("%{escaped}%")).escape('\\'))
}

/// In-memory counterpart of [`contains_ci`].
pub(crate) fn matches_ci(value: &str, term: &str) -> bool {
    value.to_lowercase().contains(&term.to_lowercase())
}
