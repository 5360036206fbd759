use serde::Deserialize;

/// Form body for task creation: a title plus an optional description.
#[derive(Debug, Deserialize)]
pub struct NewTaskForm {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}
