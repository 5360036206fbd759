use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use time::OffsetDateTime;

/// Task record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub owner_id: i64,
    pub created_at: OffsetDateTime,
}

impl Task {
    /// Titles are stored as submitted; the empty string is a valid title.
    pub async fn create(
        db: &SqlitePool,
        owner_id: i64,
        title: &str,
        description: Option<&str>,
    ) -> anyhow::Result<Task> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, owner_id)
            VALUES (?1, ?2, ?3)
            RETURNING id, title, description, owner_id, created_at
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(owner_id)
        .fetch_one(db)
        .await?;
        Ok(task)
    }

    /// All tasks of one owner, in insertion order.
    pub async fn list_for_owner(db: &SqlitePool, owner_id: i64) -> anyhow::Result<Vec<Task>> {
        let rows = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, owner_id, created_at
            FROM tasks
            WHERE owner_id = ?1
            ORDER BY id
            "#,
        )
        .bind(owner_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Owner-scoped delete. A task that exists but belongs to someone else
    /// is indistinguishable from a missing one: both return `false`.
    pub async fn delete_for_owner(
        db: &SqlitePool,
        task_id: i64,
        owner_id: i64,
    ) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?1 AND owner_id = ?2")
            .bind(task_id)
            .bind(owner_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::{hash_password, verify_password};
    use crate::auth::repo::User;
    use crate::db::test_pool;

    #[tokio::test]
    async fn list_is_per_owner_and_in_insertion_order() {
        let db = test_pool().await;
        let alice = User::create(&db, "alice", "hash").await.expect("user");
        let bob = User::create(&db, "bob", "hash").await.expect("user");

        Task::create(&db, alice.id, "first", None).await.expect("task");
        Task::create(&db, bob.id, "other", None).await.expect("task");
        Task::create(&db, alice.id, "second", Some("notes")).await.expect("task");
        Task::create(&db, alice.id, "", None).await.expect("empty title accepted");

        let titles: Vec<String> = Task::list_for_owner(&db, alice.id)
            .await
            .expect("list")
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["first", "second", ""]);

        let bobs = Task::list_for_owner(&db, bob.id).await.expect("list");
        assert_eq!(bobs.len(), 1);
        assert_eq!(bobs[0].title, "other");
    }

    #[tokio::test]
    async fn delete_is_scoped_to_the_owner() {
        let db = test_pool().await;
        let alice = User::create(&db, "alice", "hash").await.expect("user");
        let bob = User::create(&db, "bob", "hash").await.expect("user");
        let task = Task::create(&db, alice.id, "private", None).await.expect("task");

        // bob cannot tell alice's task from a missing one
        assert!(!Task::delete_for_owner(&db, task.id, bob.id).await.expect("delete"));
        assert_eq!(Task::list_for_owner(&db, alice.id).await.expect("list").len(), 1);

        assert!(Task::delete_for_owner(&db, task.id, alice.id).await.expect("delete"));
        assert!(Task::list_for_owner(&db, alice.id).await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn register_login_create_delete_scenario() {
        let db = test_pool().await;

        // register bob
        let hash = hash_password("pw123").expect("hash");
        let bob = User::create(&db, "bob", &hash).await.expect("register");

        // login: name lookup + password verification yield the same identity
        let found = User::find_by_name(&db, "bob")
            .await
            .expect("query")
            .expect("present");
        assert_eq!(found.id, bob.id);
        assert!(verify_password("pw123", &found.password_hash).expect("verify"));

        let task = Task::create(&db, bob.id, "Buy milk", None).await.expect("task");
        let listed = Task::list_for_owner(&db, bob.id).await.expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Buy milk");

        assert!(Task::delete_for_owner(&db, task.id, bob.id).await.expect("delete"));
        assert!(Task::list_for_owner(&db, bob.id).await.expect("list").is_empty());

        // a second delete of the same id reports not-found
        assert!(!Task::delete_for_owner(&db, task.id, bob.id).await.expect("delete"));
    }
}
