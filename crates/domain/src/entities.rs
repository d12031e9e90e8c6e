use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted task. Field names serialize in camelCase, matching the wire
/// format the stored routines and the web client already speak.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id_task: i64,
    pub id_account: i64,
    pub id_user_creator: i64,
    pub id_category: Option<i64>,
    pub title: String,
    pub description: String,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub recurrence: TaskRecurrence,
    pub recurrence_config_json: Option<String>,
    pub date_created: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
    pub deleted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i32")]
pub enum TaskPriority {
    Low = 0,
    Medium = 1,
    High = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i32")]
pub enum TaskStatus {
    Pending = 0,
    InProgress = 1,
    Completed = 2,
    Canceled = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i32")]
pub enum TaskRecurrence {
    None = 0,
    Daily = 1,
    Weekly = 2,
    Monthly = 3,
    Custom = 4,
}

impl Default for TaskPriority {
    fn default() -> Self {
        TaskPriority::Medium
    }
}

impl Default for TaskRecurrence {
    fn default() -> Self {
        TaskRecurrence::None
    }
}

impl TryFrom<i64> for TaskPriority {
    type Error = String;
    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TaskPriority::Low),
            1 => Ok(TaskPriority::Medium),
            2 => Ok(TaskPriority::High),
            _ => Err(format!("invalid task priority: {value}")),
        }
    }
}

impl From<TaskPriority> for i32 {
    fn from(value: TaskPriority) -> Self {
        value as i32
    }
}

impl TryFrom<i64> for TaskStatus {
    type Error = String;
    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TaskStatus::Pending),
            1 => Ok(TaskStatus::InProgress),
            2 => Ok(TaskStatus::Completed),
            3 => Ok(TaskStatus::Canceled),
            _ => Err(format!("invalid task status: {value}")),
        }
    }
}

impl From<TaskStatus> for i32 {
    fn from(value: TaskStatus) -> Self {
        value as i32
    }
}

impl TryFrom<i64> for TaskRecurrence {
    type Error = String;
    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TaskRecurrence::None),
            1 => Ok(TaskRecurrence::Daily),
            2 => Ok(TaskRecurrence::Weekly),
            3 => Ok(TaskRecurrence::Monthly),
            4 => Ok(TaskRecurrence::Custom),
            _ => Err(format!("invalid task recurrence: {value}")),
        }
    }
}

impl From<TaskRecurrence> for i32 {
    fn from(value: TaskRecurrence) -> Self {
        value as i32
    }
}

// The enums live in INT4 columns.

macro_rules! impl_pg_int_enum {
    ($ty:ty) => {
        impl sqlx::Type<sqlx::Postgres> for $ty {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <i32 as sqlx::Type<sqlx::Postgres>>::type_info()
            }
        }

        impl<'r> sqlx::Decode<'r, sqlx::Postgres> for $ty {
            fn decode(
                value: sqlx::postgres::PgValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let raw = <i32 as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
                Self::try_from(raw as i64).map_err(Into::into)
            }
        }

        impl<'q> sqlx::Encode<'q, sqlx::Postgres> for $ty {
            fn encode_by_ref(
                &self,
                buf: &mut sqlx::postgres::PgArgumentBuffer,
            ) -> Result<sqlx::encode::IsNull, Box<dyn std::error::Error + Send + Sync>> {
                <i32 as sqlx::Encode<sqlx::Postgres>>::encode(i32::from(*self), buf)
            }
        }
    };
}

impl_pg_int_enum!(TaskPriority);
impl_pg_int_enum!(TaskStatus);
impl_pg_int_enum!(TaskRecurrence);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_serde_as_integer() {
        assert_eq!(serde_json::to_string(&TaskPriority::High).unwrap(), "2");
        let parsed: TaskPriority = serde_json::from_str("1").unwrap();
        assert_eq!(parsed, TaskPriority::Medium);
    }

    #[test]
    fn test_out_of_range_enum_values_rejected() {
        assert!(serde_json::from_str::<TaskPriority>("3").is_err());
        assert!(serde_json::from_str::<TaskStatus>("4").is_err());
        assert!(serde_json::from_str::<TaskRecurrence>("5").is_err());
        assert!(serde_json::from_str::<TaskRecurrence>("-1").is_err());
    }

    #[test]
    fn test_recurrence_roundtrip() {
        for raw in 0..=4i64 {
            let recurrence = TaskRecurrence::try_from(raw).unwrap();
            assert_eq!(i32::from(recurrence) as i64, raw);
        }
    }

    #[test]
    fn test_task_serializes_camel_case() {
        let task = Task {
            id_task: 7,
            id_account: 1,
            id_user_creator: 1,
            id_category: None,
            title: "Buy milk".to_string(),
            description: "2%".to_string(),
            due_date: None,
            priority: TaskPriority::Medium,
            status: TaskStatus::Pending,
            recurrence: TaskRecurrence::None,
            recurrence_config_json: None,
            date_created: Utc::now(),
            date_modified: Utc::now(),
            deleted: false,
        };
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["idTask"], 7);
        assert_eq!(json["idUserCreator"], 1);
        assert_eq!(json["title"], "Buy milk");
        assert_eq!(json["priority"], 1);
        assert_eq!(json["recurrenceConfigJson"], serde_json::Value::Null);
        assert_eq!(json["deleted"], false);
    }
}
