use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use super::{StoreError, StoreResult};
use crate::{
    auth::{
        repo::UserStore,
        repo_types::{NewUser, User, EMAIL_MAX_LEN, USERNAME_MAX_LEN},
    },
    todos::{repo::TodoStore, repo_types::Todo},
    transactions::{
        repo::TransactionStore,
        repo_types::{NewTransaction, Transaction, STATUS_MAX_LEN},
    },
};

/// Mirrors Postgres rejecting a value wider than its VARCHAR column.
fn check_width(column: &str, value: &str, max: usize) -> StoreResult<()> {
    if value.chars().count() > max {
        return Err(StoreError::Backend(anyhow::anyhow!(
            "value too long for column {} (max {})",
            column,
            max
        )));
    }
    Ok(())
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    todos: Vec<Todo>,
    transactions: Vec<Transaction>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn ensure_owner(&self, owner_id: i64) -> StoreResult<()> {
        if self.users.iter().any(|u| u.id == owner_id) {
            Ok(())
        } else {
            Err(StoreError::Backend(anyhow::anyhow!(
                "owner {} does not exist",
                owner_id
            )))
        }
    }
}

/// In-process store mirroring the Postgres schema constraints.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Inserts a user with an unusable password hash and returns its id.
    pub async fn seed_user(&self, username: &str) -> i64 {
        UserStore::create(
            self,
            NewUser {
                username,
                password_hash: "!",
                email: None,
            },
        )
        .await
        .expect("seed user")
        .id
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let t = self.tables.read().await;
        Ok(t.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        let t = self.tables.read().await;
        Ok(t.users.iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, user: NewUser<'_>) -> StoreResult<User> {
        check_width("username", user.username, USERNAME_MAX_LEN)?;
        if let Some(email) = user.email {
            check_width("email", email, EMAIL_MAX_LEN)?;
        }
        let mut t = self.tables.write().await;
        if t.users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::Conflict);
        }
        let row = User {
            id: t.next_id(),
            username: user.username.to_string(),
            password_hash: user.password_hash.to_string(),
            email: user.email.map(str::to_string),
            created_at: OffsetDateTime::now_utc(),
        };
        t.users.push(row.clone());
        Ok(row)
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn list(&self, owner_id: i64) -> StoreResult<Vec<Todo>> {
        let t = self.tables.read().await;
        Ok(t.todos
            .iter()
            .filter(|todo| todo.user_id == owner_id)
            .cloned()
            .collect())
    }

    async fn create(&self, owner_id: i64, text: &str) -> StoreResult<Todo> {
        let mut t = self.tables.write().await;
        t.ensure_owner(owner_id)?;
        let now = OffsetDateTime::now_utc();
        let row = Todo {
            id: t.next_id(),
            user_id: owner_id,
            text: text.to_string(),
            completed: false,
            created_at: now,
            updated_at: now,
        };
        t.todos.push(row.clone());
        Ok(row)
    }
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn list(&self, owner_id: i64) -> StoreResult<Vec<Transaction>> {
        let t = self.tables.read().await;
        let mut rows: Vec<Transaction> = t
            .transactions
            .iter()
            .filter(|tx| tx.user_id == owner_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn create(&self, owner_id: i64, tx: NewTransaction) -> StoreResult<Transaction> {
        check_width("status", &tx.status, STATUS_MAX_LEN)?;
        let mut t = self.tables.write().await;
        t.ensure_owner(owner_id)?;
        let row = Transaction {
            id: t.next_id(),
            user_id: owner_id,
            amount: tx.amount,
            date: tx.date,
            status: tx.status,
            description: tx.description,
            created_at: OffsetDateTime::now_utc(),
        };
        t.transactions.push(row.clone());
        Ok(row)
    }
}
