//! Generic utilities for working with diesel.

pub use crate::{eq, query};
use std::slice::Chunks;

pub const PG_MAX_PARAMS: usize = 65535;

/// Helper macro for `column.eq(value)` where the value is in a variable of the same name.
///
/// ```ignore
/// let hanzi = "猫".to_string();
/// let pinyin = "māo".to_string();
/// eq!(vocabulary, hanzi, pinyin);
/// // (vocabulary::hanzi.eq(hanzi), vocabulary::pinyin.eq(pinyin))
/// ```
#[macro_export]
macro_rules! eq {
    ($t:ident, $c: ident $(,)?) => {
        $t::$c.eq($c)
    };
    ($t:ident, $($c: ident),* $(,)?) => {
        ( $($t::$c.eq($c)),* )
    };
}

/// Helper macro for implementing Queryable and Selectable and ensures the implementations match.
///
/// ```ignore
/// query! {
///     #[derive(Debug)]
///     pub struct TextRow {
///         pub id: String = texts::id,
///         pub title: String = texts::title,
///     }
/// }
/// ```
#[macro_export]
macro_rules! query {
    (
        $(#[ $attr:meta ])*
        $v:vis $kw:ident $name:ident {
            $(
                $fv:vis $field:ident: $t:ty = $table:ident :: $column:ident
            ),* $(,)?
        }
    ) => {
        $(#[ $attr ])*
        #[derive(::diesel::Queryable)]
        #[diesel(check_for_backend(::diesel::pg::Pg))]
        $v $kw $name {
            $($fv $field: $t),*
        }

        impl<DB: ::diesel::backend::Backend> ::diesel::Selectable<DB> for $name {
            type SelectExpression = ($( $crate::schema::$table::$column, )*);

            fn construct_selection() -> Self::SelectExpression {
                ($( $crate::schema::$table::$column, )*)
            }
        }
    };
}

/// Splits rows into chunks that stay under PostgreSQL's bind parameter limit.
pub trait PostgresChunks<T> {
    fn pg_chunks(&self) -> Chunks<'_, T>;
}

macro_rules! impl_postgres_chunks {
    (
        $lit:literal, $($ty:ident),*
    ) => {
        impl<$($ty),*,> PostgresChunks<($($ty),*,)> for Vec<($($ty),*,)> {
            fn pg_chunks(&self) -> Chunks<'_, ($($ty),*,)> {
                self.chunks(PG_MAX_PARAMS / $lit)
            }
        }
    };
}

impl_postgres_chunks!(3, A, B, C);
