use crate::auth::repo_types::{Role, User};
use anyhow::Context;
use sqlx::SqlitePool;

/// Outcome of an insert into `users`.
#[derive(Debug)]
pub enum CreateUser {
    Created(User),
    /// Username or email hit a UNIQUE constraint.
    Duplicate,
}

impl User {
    /// Find a user by username.
    pub async fn find_by_username(db: &SqlitePool, username: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, role
            FROM users
            WHERE username = ?1
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await
        .context("find user by username")?;
        Ok(user)
    }

    /// Create a new user with an already hashed password.
    pub async fn create(
        db: &SqlitePool,
        username: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> anyhow::Result<CreateUser> {
        let res = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash, role)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id, username, email, password_hash, role
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(role.as_str())
        .fetch_one(db)
        .await;

        match res {
            Ok(user) => Ok(CreateUser::Created(user)),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Ok(CreateUser::Duplicate),
            Err(e) => Err(anyhow::Error::new(e).context("insert user")),
        }
    }
}

#[cfg(test)]
impl User {
    pub(crate) async fn count(db: &SqlitePool) -> anyhow::Result<i64> {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(db)
            .await
            .context("count users")?;
        Ok(n)
    }
}
