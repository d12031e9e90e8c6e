use std::collections::HashMap;

use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::{Either, FromRow, Postgres};
use tracing::error;

use todolist_errors::{TodolistError, TodolistResult};

/// A value bound to one named parameter of a stored routine.
#[derive(Debug, Clone)]
pub enum RoutineValue {
    BigInt(Option<i64>),
    Int(Option<i32>),
    Text(Option<String>),
    Timestamp(Option<DateTime<Utc>>),
    Bool(Option<bool>),
}

impl From<i64> for RoutineValue {
    fn from(value: i64) -> Self {
        Self::BigInt(Some(value))
    }
}

impl From<Option<i64>> for RoutineValue {
    fn from(value: Option<i64>) -> Self {
        Self::BigInt(value)
    }
}

impl From<i32> for RoutineValue {
    fn from(value: i32) -> Self {
        Self::Int(Some(value))
    }
}

impl From<Option<i32>> for RoutineValue {
    fn from(value: Option<i32>) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for RoutineValue {
    fn from(value: &str) -> Self {
        Self::Text(Some(value.to_string()))
    }
}

impl From<String> for RoutineValue {
    fn from(value: String) -> Self {
        Self::Text(Some(value))
    }
}

impl From<Option<String>> for RoutineValue {
    fn from(value: Option<String>) -> Self {
        Self::Text(value)
    }
}

impl From<DateTime<Utc>> for RoutineValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(Some(value))
    }
}

impl From<Option<DateTime<Utc>>> for RoutineValue {
    fn from(value: Option<DateTime<Utc>>) -> Self {
        Self::Timestamp(value)
    }
}

impl From<bool> for RoutineValue {
    fn from(value: bool) -> Self {
        Self::Bool(Some(value))
    }
}

/// One invocation of a named stored routine with named-parameter binding.
///
/// The result is shaped by the method the caller picks, which declares the
/// expected cardinality up front: [`execute`](Self::execute) for routines
/// returning nothing, [`fetch_single`](Self::fetch_single) for first-row-or-
/// none, [`fetch_sets`](Self::fetch_sets) for every row-set in order, and
/// [`fetch_labeled_sets`](Self::fetch_labeled_sets) to map caller labels onto
/// row-sets positionally.
///
/// Every method takes any `PgExecutor`, so a transaction handle can stand in
/// for the shared pool.
#[derive(Debug, Clone)]
pub struct RoutineCall {
    routine: String,
    params: Vec<(String, RoutineValue)>,
}

impl RoutineCall {
    pub fn new(routine: impl Into<String>) -> Self {
        Self {
            routine: routine.into(),
            params: Vec::new(),
        }
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<RoutineValue>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// Postgres named-argument call syntax; values bind positionally.
    fn sql(&self) -> String {
        let args = self
            .params
            .iter()
            .enumerate()
            .map(|(i, (name, _))| format!("{} => ${}", name, i + 1))
            .collect::<Vec<_>>()
            .join(", ");
        format!("SELECT * FROM {}({})", self.routine, args)
    }

    fn bind<'q>(
        &'q self,
        mut query: sqlx::query::Query<'q, Postgres, PgArguments>,
    ) -> sqlx::query::Query<'q, Postgres, PgArguments> {
        for (_, value) in &self.params {
            query = match value {
                RoutineValue::BigInt(v) => query.bind(*v),
                RoutineValue::Int(v) => query.bind(*v),
                RoutineValue::Text(v) => query.bind(v.as_deref()),
                RoutineValue::Timestamp(v) => query.bind(*v),
                RoutineValue::Bool(v) => query.bind(*v),
            };
        }
        query
    }

    fn classify(&self, err: sqlx::Error) -> TodolistError {
        let err = TodolistError::from_routine_error(err);
        // Business-rule rejections are the routine talking, not a fault.
        if !err.is_business_rule() {
            error!(routine = %self.routine, error = %err, "database routine call failed");
        }
        err
    }

    /// Declared cardinality: none.
    pub async fn execute<'c, E>(&self, executor: E) -> TodolistResult<()>
    where
        E: sqlx::PgExecutor<'c>,
    {
        let sql = self.sql();
        self.bind(sqlx::query(&sql))
            .execute(executor)
            .await
            .map_err(|e| self.classify(e))?;
        Ok(())
    }

    /// Declared cardinality: single. First row of the first row-set, or
    /// `None` when the routine returned nothing.
    pub async fn fetch_single<'c, T, E>(&self, executor: E) -> TodolistResult<Option<T>>
    where
        T: for<'r> FromRow<'r, PgRow>,
        E: sqlx::PgExecutor<'c>,
    {
        let sql = self.sql();
        let row = self
            .bind(sqlx::query(&sql))
            .fetch_optional(executor)
            .await
            .map_err(|e| self.classify(e))?;
        row.map(|r| T::from_row(&r))
            .transpose()
            .map_err(|e| self.classify(e))
    }

    /// Declared cardinality: multi. All row-sets, in the order the routine
    /// produced them. Row-set boundaries come from the driver's
    /// per-statement completion events.
    pub async fn fetch_sets<'c, T, E>(&self, executor: E) -> TodolistResult<Vec<Vec<T>>>
    where
        T: for<'r> FromRow<'r, PgRow>,
        E: sqlx::PgExecutor<'c>,
    {
        let sql = self.sql();
        let mut stream = self.bind(sqlx::query(&sql)).fetch_many(executor);

        let mut sets: Vec<Vec<T>> = Vec::new();
        let mut current: Vec<T> = Vec::new();
        let mut open = false;
        while let Some(step) = stream.try_next().await.map_err(|e| self.classify(e))? {
            match step {
                Either::Left(_done) => {
                    sets.push(std::mem::take(&mut current));
                    open = false;
                }
                Either::Right(row) => {
                    current.push(T::from_row(&row).map_err(|e| self.classify(e))?);
                    open = true;
                }
            }
        }
        if open {
            sets.push(current);
        }
        Ok(sets)
    }

    /// Declared cardinality: multi, with caller-supplied labels mapped onto
    /// row-sets by position. Labels beyond the returned sets map to empty
    /// sets.
    pub async fn fetch_labeled_sets<'c, T, E>(
        &self,
        executor: E,
        labels: &[&str],
    ) -> TodolistResult<HashMap<String, Vec<T>>>
    where
        T: for<'r> FromRow<'r, PgRow>,
        E: sqlx::PgExecutor<'c>,
    {
        let sets = self.fetch_sets(executor).await?;
        Ok(label_sets(labels, sets))
    }
}

fn label_sets<T>(labels: &[&str], sets: Vec<Vec<T>>) -> HashMap<String, Vec<T>> {
    let mut sets = sets.into_iter();
    labels
        .iter()
        .map(|label| (label.to_string(), sets.next().unwrap_or_default()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_without_params() {
        let call = RoutineCall::new("functional.sp_task_purge");
        assert_eq!(call.sql(), "SELECT * FROM functional.sp_task_purge()");
    }

    #[test]
    fn test_sql_named_argument_order() {
        let call = RoutineCall::new("functional.sp_task_create")
            .param("id_account", 1i64)
            .param("title", "Buy milk")
            .param("id_category", Option::<i64>::None);
        assert_eq!(
            call.sql(),
            "SELECT * FROM functional.sp_task_create(id_account => $1, title => $2, id_category => $3)"
        );
    }

    #[test]
    fn test_label_sets_positional() {
        let sets = vec![vec![1, 2], vec![3]];
        let labeled = label_sets(&["open", "closed"], sets);
        assert_eq!(labeled["open"], vec![1, 2]);
        assert_eq!(labeled["closed"], vec![3]);
    }

    #[test]
    fn test_label_sets_extra_labels_are_empty() {
        let sets: Vec<Vec<i32>> = vec![vec![1]];
        let labeled = label_sets(&["first", "second"], sets);
        assert_eq!(labeled["first"], vec![1]);
        assert!(labeled["second"].is_empty());
    }

    #[test]
    fn test_routine_value_conversions() {
        assert!(matches!(RoutineValue::from(5i64), RoutineValue::BigInt(Some(5))));
        assert!(matches!(
            RoutineValue::from(Option::<String>::None),
            RoutineValue::Text(None)
        ));
        assert!(matches!(RoutineValue::from("x"), RoutineValue::Text(Some(_))));
        assert!(matches!(RoutineValue::from(true), RoutineValue::Bool(Some(true))));
    }
}
