//! SurrealDB implementation of [`ResponseRepository`].

use std::collections::HashMap;

use aduan_core::error::AduanResult;
use aduan_core::models::response::{ComplaintResponse, CreateResponse, ResponseWithAuthor};
use aduan_core::repository::ResponseRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ResponseRow {
    record_id: String,
    complaint_id: String,
    admin_id: String,
    message: String,
    created_at: DateTime<Utc>,
}

impl ResponseRow {
    fn try_into_response(self) -> Result<ComplaintResponse, DbError> {
        let parse = |raw: &str, what: &str| {
            Uuid::parse_str(raw).map_err(|e| DbError::Corrupt(format!("invalid {what} UUID: {e}")))
        };
        Ok(ComplaintResponse {
            id: parse(&self.record_id, "response")?,
            complaint_id: parse(&self.complaint_id, "complaint_id")?,
            admin_id: parse(&self.admin_id, "admin_id")?,
            message: self.message,
            created_at: self.created_at,
        })
    }
}

/// Display fields of a response or comment author.
#[derive(Debug, SurrealValue)]
pub(crate) struct AuthorRow {
    pub(crate) record_id: String,
    pub(crate) full_name: String,
    pub(crate) email: String,
    pub(crate) role: String,
}

/// Look up the authors behind `ids`, keyed by user id.
pub(crate) async fn load_authors<C: Connection>(
    db: &Surreal<C>,
    ids: Vec<String>,
) -> Result<HashMap<String, AuthorRow>, DbError> {
    let mut result = db
        .query(
            "SELECT meta::id(id) AS record_id, full_name, email, role FROM user \
             WHERE meta::id(id) IN $ids",
        )
        .bind(("ids", ids))
        .await?;
    let rows: Vec<AuthorRow> = result.take(0)?;
    Ok(rows
        .into_iter()
        .map(|row| (row.record_id.clone(), row))
        .collect())
}

/// SurrealDB implementation of the Response repository.
#[derive(Clone)]
pub struct SurrealResponseRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealResponseRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ResponseRepository for SurrealResponseRepository<C> {
    async fn create(&self, input: CreateResponse) -> AduanResult<ComplaintResponse> {
        let id = Uuid::new_v4();

        self.db
            .query(
                "CREATE type::record('response', $id) SET \
                 complaint_id = $complaint_id, admin_id = $admin_id, \
                 message = $message",
            )
            .bind(("id", id.to_string()))
            .bind(("complaint_id", input.complaint_id.to_string()))
            .bind(("admin_id", input.admin_id.to_string()))
            .bind(("message", input.message))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        self.get_by_id(id).await
    }

    async fn get_by_id(&self, id: Uuid) -> AduanResult<ComplaintResponse> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT meta::id(id) AS record_id, * FROM type::record('response', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ResponseRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "response".into(),
            id: id_str,
        })?;

        Ok(row.try_into_response()?)
    }

    async fn list_by_complaint(&self, complaint_id: Uuid) -> AduanResult<Vec<ResponseWithAuthor>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM response \
                 WHERE complaint_id = $complaint_id ORDER BY created_at ASC",
            )
            .bind(("complaint_id", complaint_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ResponseRow> = result.take(0).map_err(DbError::from)?;
        let responses = rows
            .into_iter()
            .map(|row| row.try_into_response())
            .collect::<Result<Vec<_>, DbError>>()?;

        let ids = responses.iter().map(|r| r.admin_id.to_string()).collect();
        let authors = load_authors(&self.db, ids).await?;

        Ok(responses
            .into_iter()
            .map(|response| {
                let author = authors.get(&response.admin_id.to_string());
                ResponseWithAuthor {
                    full_name: author.map(|a| a.full_name.clone()).unwrap_or_default(),
                    email: author.map(|a| a.email.clone()).unwrap_or_default(),
                    response,
                }
            })
            .collect())
    }

    async fn delete(&self, id: Uuid) -> AduanResult<()> {
        self.get_by_id(id).await?;

        self.db
            .query("DELETE type::record('response', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        Ok(())
    }
}
