//! SurrealDB implementation of [`CommentRepository`].

use aduan_core::error::AduanResult;
use aduan_core::models::comment::{Comment, CommentWithAuthor, CreateComment};
use aduan_core::models::user::UserRole;
use aduan_core::repository::CommentRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::response::load_authors;
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct CommentRow {
    record_id: String,
    complaint_id: String,
    user_id: String,
    message: String,
    created_at: DateTime<Utc>,
}

impl CommentRow {
    fn try_into_comment(self) -> Result<Comment, DbError> {
        let parse = |raw: &str, what: &str| {
            Uuid::parse_str(raw).map_err(|e| DbError::Corrupt(format!("invalid {what} UUID: {e}")))
        };
        Ok(Comment {
            id: parse(&self.record_id, "comment")?,
            complaint_id: parse(&self.complaint_id, "complaint_id")?,
            user_id: parse(&self.user_id, "user_id")?,
            message: self.message,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the Comment repository.
#[derive(Clone)]
pub struct SurrealCommentRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealCommentRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> CommentRepository for SurrealCommentRepository<C> {
    async fn create(&self, input: CreateComment) -> AduanResult<Comment> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        self.db
            .query(
                "CREATE type::record('comment', $id) SET \
                 complaint_id = $complaint_id, user_id = $user_id, \
                 message = $message",
            )
            .bind(("id", id_str.clone()))
            .bind(("complaint_id", input.complaint_id.to_string()))
            .bind(("user_id", input.user_id.to_string()))
            .bind(("message", input.message))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let mut result = self
            .db
            .query("SELECT meta::id(id) AS record_id, * FROM type::record('comment', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CommentRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "comment".into(),
            id: id_str,
        })?;

        Ok(row.try_into_comment()?)
    }

    async fn list_by_complaint(&self, complaint_id: Uuid) -> AduanResult<Vec<CommentWithAuthor>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM comment \
                 WHERE complaint_id = $complaint_id ORDER BY created_at ASC",
            )
            .bind(("complaint_id", complaint_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CommentRow> = result.take(0).map_err(DbError::from)?;
        let comments = rows
            .into_iter()
            .map(|row| row.try_into_comment())
            .collect::<Result<Vec<_>, DbError>>()?;

        let ids = comments.iter().map(|c| c.user_id.to_string()).collect();
        let authors = load_authors(&self.db, ids).await?;

        let items = comments
            .into_iter()
            .map(|comment| {
                let (full_name, role) = match authors.get(&comment.user_id.to_string()) {
                    Some(author) => (
                        author.full_name.clone(),
                        author
                            .role
                            .parse::<UserRole>()
                            .map_err(DbError::Corrupt)?,
                    ),
                    None => (String::new(), UserRole::Citizen),
                };
                Ok(CommentWithAuthor {
                    comment,
                    full_name,
                    role,
                })
            })
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(items)
    }
}
