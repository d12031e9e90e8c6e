use chrono::NaiveDate;
use serde::Serialize;

use todolist_domain::entities::{TaskPriority, TaskRecurrence};
use todolist_domain::rules;

/// Raw form state, as the user typed it. Date and time are separate inputs;
/// empty strings mean "not filled in".
#[derive(Debug, Clone, Default)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    /// `YYYY-MM-DD`
    pub due_date: String,
    /// `HH:MM`
    pub due_time: String,
    pub priority: TaskPriority,
    pub id_category: Option<i64>,
    pub recurrence: TaskRecurrence,
    pub recurrence_config_json: String,
}

/// Outbound create-task request body. Blank optional fields are omitted
/// entirely rather than sent as null or empty strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskDto {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub priority: TaskPriority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_category: Option<i64>,
    pub recurrence: TaskRecurrence,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence_config_json: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl TaskForm {
    /// Same constraints the server enforces, for immediate feedback before
    /// the request is ever sent.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if !rules::title_length_valid(&self.title) {
            errors.push(FieldError::new(
                "title",
                format!(
                    "The title must have between {} and {} characters",
                    rules::TITLE_MIN_CHARS,
                    rules::TITLE_MAX_CHARS
                ),
            ));
        }
        if !rules::description_length_valid(&self.description) {
            errors.push(FieldError::new(
                "description",
                format!(
                    "The description must have between {} and {} characters",
                    rules::DESCRIPTION_MIN_CHARS,
                    rules::DESCRIPTION_MAX_CHARS
                ),
            ));
        }
        if !self.due_date.is_empty() && NaiveDate::parse_from_str(&self.due_date, "%Y-%m-%d").is_err()
        {
            errors.push(FieldError::new("dueDate", "The due date is not a valid date"));
        }
        let config = (!self.recurrence_config_json.is_empty())
            .then_some(self.recurrence_config_json.as_str());
        if !rules::recurrence_config_valid(self.recurrence, config) {
            errors.push(FieldError::new(
                "recurrenceConfigJson",
                "The recurrence configuration is required for recurring tasks",
            ));
        }

        errors
    }

    /// Validates and composes the submission body. The date and time inputs
    /// collapse into one RFC 3339 timestamp; time defaults to midnight.
    pub fn to_dto(&self) -> Result<CreateTaskDto, Vec<FieldError>> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }

        let due_date = if self.due_date.is_empty() {
            None
        } else {
            let date = NaiveDate::parse_from_str(&self.due_date, "%Y-%m-%d")
                .map_err(|_| vec![FieldError::new("dueDate", "The due date is not a valid date")])?;
            let time = if self.due_time.is_empty() {
                "00:00"
            } else {
                self.due_time.as_str()
            };
            let timestamp = format!("{}T{}:00", date.format("%Y-%m-%d"), time);
            let parsed = chrono::NaiveDateTime::parse_from_str(&timestamp, "%Y-%m-%dT%H:%M:%S")
                .map_err(|_| vec![FieldError::new("dueTime", "The due time is not a valid time")])?;
            Some(parsed.and_utc().to_rfc3339())
        };

        Ok(CreateTaskDto {
            title: self.title.clone(),
            description: self.description.clone(),
            due_date,
            priority: self.priority,
            id_category: self.id_category,
            recurrence: self.recurrence,
            recurrence_config_json: (!self.recurrence_config_json.is_empty())
                .then(|| self.recurrence_config_json.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> TaskForm {
        TaskForm {
            title: "Buy milk".to_string(),
            description: "2%".to_string(),
            ..TaskForm::default()
        }
    }

    #[test]
    fn test_defaults_mirror_server() {
        let form = valid_form();
        assert_eq!(form.priority, TaskPriority::Medium);
        assert_eq!(form.recurrence, TaskRecurrence::None);
        assert!(form.validate().is_empty());
    }

    #[test]
    fn test_short_title_caught_locally() {
        let form = TaskForm {
            title: "Hi".to_string(),
            ..valid_form()
        };
        let errors = form.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "title");
    }

    #[test]
    fn test_recurring_without_config_caught_locally() {
        let form = TaskForm {
            recurrence: TaskRecurrence::Weekly,
            ..valid_form()
        };
        let errors = form.validate();
        assert_eq!(errors[0].field, "recurrenceConfigJson");
    }

    #[test]
    fn test_blank_optionals_are_omitted() {
        let dto = valid_form().to_dto().unwrap();
        let json = serde_json::to_value(&dto).unwrap();

        assert_eq!(json["title"], "Buy milk");
        assert!(json.get("dueDate").is_none());
        assert!(json.get("idCategory").is_none());
        assert!(json.get("recurrenceConfigJson").is_none());
        assert_eq!(json["priority"], 1);
        assert_eq!(json["recurrence"], 0);
    }

    #[test]
    fn test_due_time_defaults_to_midnight() {
        let form = TaskForm {
            due_date: "2026-09-01".to_string(),
            ..valid_form()
        };
        let dto = form.to_dto().unwrap();
        assert_eq!(dto.due_date.as_deref(), Some("2026-09-01T00:00:00+00:00"));
    }

    #[test]
    fn test_date_and_time_compose() {
        let form = TaskForm {
            due_date: "2026-09-01".to_string(),
            due_time: "14:30".to_string(),
            ..valid_form()
        };
        let dto = form.to_dto().unwrap();
        assert_eq!(dto.due_date.as_deref(), Some("2026-09-01T14:30:00+00:00"));
    }

    #[test]
    fn test_recurring_config_sent_when_present() {
        let form = TaskForm {
            recurrence: TaskRecurrence::Daily,
            recurrence_config_json: r#"{"interval":1}"#.to_string(),
            ..valid_form()
        };
        let dto = form.to_dto().unwrap();
        assert_eq!(dto.recurrence_config_json.as_deref(), Some(r#"{"interval":1}"#));
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["recurrence"], 1);
    }

    #[test]
    fn test_invalid_form_does_not_compose() {
        let form = TaskForm {
            title: String::new(),
            description: String::new(),
            ..TaskForm::default()
        };
        let errors = form.to_dto().unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
