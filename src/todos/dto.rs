use serde::{Deserialize, Serialize};

use super::repo_types::Todo;

#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TodoListResponse {
    pub success: bool,
    pub todos: Vec<Todo>,
}

#[derive(Debug, Serialize)]
pub struct TodoResponse {
    pub success: bool,
    pub todo: Todo,
}
