//! Field constraints for task creation. Both the server-side schema and the
//! client form check against these, so the two sides cannot drift.

use crate::entities::TaskRecurrence;

pub const TITLE_MIN_CHARS: usize = 3;
pub const TITLE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MIN_CHARS: usize = 1;
pub const DESCRIPTION_MAX_CHARS: usize = 500;

pub fn title_length_valid(title: &str) -> bool {
    let len = title.chars().count();
    (TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&len)
}

pub fn description_length_valid(description: &str) -> bool {
    let len = description.chars().count();
    (DESCRIPTION_MIN_CHARS..=DESCRIPTION_MAX_CHARS).contains(&len)
}

/// Recurring tasks must carry a non-empty recurrence configuration.
pub fn recurrence_config_valid(recurrence: TaskRecurrence, config: Option<&str>) -> bool {
    recurrence == TaskRecurrence::None || config.is_some_and(|c| !c.is_empty())
}
