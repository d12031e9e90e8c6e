use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use todolist_domain::entities::{TaskPriority, TaskRecurrence};
use todolist_domain::rules;

use super::{
    int_enum_with_default, nullable_fk, optional_datetime, optional_string, required_string,
    Violation,
};

/// A fully validated and defaulted create-task request. Construction goes
/// through [`validate_create_task`] only.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: String,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: TaskPriority,
    pub id_category: Option<i64>,
    pub recurrence: TaskRecurrence,
    pub recurrence_config_json: Option<String>,
}

/// Cross-field rules, applied after every per-field rule passed.
const REFINEMENTS: &[fn(&CreateTaskRequest) -> Option<Violation>] = &[recurrence_requires_config];

fn recurrence_requires_config(request: &CreateTaskRequest) -> Option<Violation> {
    if rules::recurrence_config_valid(
        request.recurrence,
        request.recurrence_config_json.as_deref(),
    ) {
        None
    } else {
        Some(Violation::new(
            "recurrenceConfigJson",
            "The recurrence configuration is required for recurring tasks",
        ))
    }
}

pub fn validate_create_task(
    params: &Map<String, Value>,
) -> Result<CreateTaskRequest, Vec<Violation>> {
    let mut violations = Vec::new();

    let title = required_string(params, "title", "The title is required", &mut violations)
        .and_then(|title| {
            let chars = title.chars().count();
            if chars < rules::TITLE_MIN_CHARS {
                violations.push(Violation::new(
                    "title",
                    format!("The title must have at least {} characters", rules::TITLE_MIN_CHARS),
                ));
                None
            } else if chars > rules::TITLE_MAX_CHARS {
                violations.push(Violation::new(
                    "title",
                    format!("The title must have at most {} characters", rules::TITLE_MAX_CHARS),
                ));
                None
            } else {
                Some(title)
            }
        });

    let description = required_string(
        params,
        "description",
        "The task description is required",
        &mut violations,
    )
    .and_then(|description| {
        let chars = description.chars().count();
        if chars < rules::DESCRIPTION_MIN_CHARS {
            violations.push(Violation::new("description", "The task description is required"));
            None
        } else if chars > rules::DESCRIPTION_MAX_CHARS {
            violations.push(Violation::new(
                "description",
                format!(
                    "The description must have at most {} characters",
                    rules::DESCRIPTION_MAX_CHARS
                ),
            ));
            None
        } else {
            Some(description)
        }
    });

    let due_date = optional_datetime(
        params,
        "dueDate",
        "The due date must be a valid date and time",
        &mut violations,
    );
    let priority = int_enum_with_default(params, "priority", TaskPriority::Medium, &mut violations);
    let id_category = nullable_fk(params, "idCategory", &mut violations);
    let recurrence =
        int_enum_with_default(params, "recurrence", TaskRecurrence::None, &mut violations);
    let recurrence_config_json = optional_string(params, "recurrenceConfigJson", &mut violations);

    let request = match (
        title,
        description,
        due_date,
        priority,
        id_category,
        recurrence,
        recurrence_config_json,
    ) {
        (
            Some(title),
            Some(description),
            Some(due_date),
            Some(priority),
            Some(id_category),
            Some(recurrence),
            Some(recurrence_config_json),
        ) => CreateTaskRequest {
            title,
            description,
            due_date,
            priority,
            id_category,
            recurrence,
            recurrence_config_json,
        },
        _ => return Err(violations),
    };

    violations.extend(REFINEMENTS.iter().filter_map(|refine| refine(&request)));

    if violations.is_empty() {
        Ok(request)
    } else {
        Err(violations)
    }
}
