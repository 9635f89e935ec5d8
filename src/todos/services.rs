use tracing::info;

use super::{repo::TodoStore, repo_types::Todo};
use crate::error::AppError;

/// Validates and persists a todo for `owner_id`. Blank or missing text
/// is rejected before touching the store.
pub async fn create_todo(
    todos: &dyn TodoStore,
    owner_id: i64,
    text: Option<&str>,
) -> Result<Todo, AppError> {
    let text = text.map(str::trim).unwrap_or_default();
    if text.is_empty() {
        return Err(AppError::validation("Todo text is required"));
    }
    let todo = todos.create(owner_id, text).await?;
    info!(user_id = owner_id, todo_id = todo.id, "todo created");
    Ok(todo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    #[tokio::test]
    async fn missing_text_persists_nothing() {
        let store = MemoryStore::default();
        let owner = store.seed_user("alice").await;

        for text in [None, Some(""), Some("   ")] {
            let err = create_todo(&store, owner, text).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
        assert!(store.list(owner).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_is_scoped_to_owner() {
        let store = MemoryStore::default();
        let alice = store.seed_user("alice").await;
        let bob = store.seed_user("bob").await;

        create_todo(&store, alice, Some("buy milk")).await.unwrap();
        create_todo(&store, bob, Some("walk dog")).await.unwrap();
        create_todo(&store, alice, Some(" call mom ")).await.unwrap();

        let mine = store.list(alice).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|t| t.user_id == alice));
        assert_eq!(mine[1].text, "call mom");
        assert!(!mine[0].completed);

        let theirs = store.list(bob).await.unwrap();
        assert_eq!(theirs.len(), 1);
        assert_eq!(theirs[0].text, "walk dog");
    }
}
