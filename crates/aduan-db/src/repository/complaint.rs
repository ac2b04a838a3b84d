//! SurrealDB implementation of [`ComplaintRepository`].

use aduan_core::error::AduanResult;
use aduan_core::models::complaint::{
    Complaint, ComplaintCategory, ComplaintPriority, ComplaintStatus, CreateComplaint,
    UpdateComplaint,
};
use aduan_core::repository::ComplaintRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::{SurrealValue, Value};
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ComplaintRow {
    record_id: String,
    user_id: String,
    title: String,
    description: String,
    category: String,
    priority: String,
    status: String,
    location: Option<String>,
    image_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ComplaintRow {
    fn try_into_complaint(self) -> Result<Complaint, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Corrupt(format!("invalid UUID: {e}")))?;
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| DbError::Corrupt(format!("invalid user_id UUID: {e}")))?;
        Ok(Complaint {
            id,
            user_id,
            title: self.title,
            description: self.description,
            category: self
                .category
                .parse::<ComplaintCategory>()
                .map_err(DbError::Corrupt)?,
            priority: self
                .priority
                .parse::<ComplaintPriority>()
                .map_err(DbError::Corrupt)?,
            status: self
                .status
                .parse::<ComplaintStatus>()
                .map_err(DbError::Corrupt)?,
            location: self.location,
            image_url: self.image_url,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Complaint repository.
#[derive(Clone)]
pub struct SurrealComplaintRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealComplaintRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ComplaintRepository for SurrealComplaintRepository<C> {
    async fn create(&self, input: CreateComplaint) -> AduanResult<Complaint> {
        let id = Uuid::new_v4();

        self.db
            .query(
                "CREATE type::record('complaint', $id) SET \
                 user_id = $user_id, title = $title, \
                 description = $description, category = $category, \
                 priority = $priority, status = $status, \
                 location = $location, image_url = $image_url",
            )
            .bind(("id", id.to_string()))
            .bind(("user_id", input.user_id.to_string()))
            .bind(("title", input.title))
            .bind(("description", input.description))
            .bind(("category", input.category.as_str().to_string()))
            .bind(("priority", input.priority.as_str().to_string()))
            .bind(("status", ComplaintStatus::Pending.as_str().to_string()))
            .bind(("location", input.location))
            .bind(("image_url", input.image_url))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        self.get_by_id(id).await
    }

    async fn get_by_id(&self, id: Uuid) -> AduanResult<Complaint> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT meta::id(id) AS record_id, * FROM type::record('complaint', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ComplaintRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "complaint".into(),
            id: id_str,
        })?;

        Ok(row.try_into_complaint()?)
    }

    async fn list(&self, owner: Option<Uuid>) -> AduanResult<Vec<Complaint>> {
        let mut result = match owner {
            Some(user_id) => self
                .db
                .query(
                    "SELECT meta::id(id) AS record_id, * FROM complaint \
                     WHERE user_id = $user_id ORDER BY created_at DESC",
                )
                .bind(("user_id", user_id.to_string()))
                .await
                .map_err(DbError::from)?,
            None => self
                .db
                .query(
                    "SELECT meta::id(id) AS record_id, * FROM complaint \
                     ORDER BY created_at DESC",
                )
                .await
                .map_err(DbError::from)?,
        };

        let rows: Vec<ComplaintRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .map(|row| row.try_into_complaint())
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    async fn update(&self, id: Uuid, input: UpdateComplaint) -> AduanResult<Complaint> {
        self.get_by_id(id).await?;

        let mut sets = Vec::new();
        if input.status.is_some() {
            sets.push("status = $status");
        }
        if input.priority.is_some() {
            sets.push("priority = $priority");
        }
        sets.push("updated_at = time::now()");

        // The status guard is evaluated by the store, so a concurrent
        // forward move cannot be overwritten by a stale backward one.
        let guard = if input.status.is_some() {
            " WHERE status IN $allowed"
        } else {
            ""
        };
        let query = format!(
            "UPDATE type::record('complaint', $id) SET {}{guard}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id.to_string()));

        if let Some(status) = input.status {
            let allowed: Vec<String> = ComplaintStatus::ALL
                .iter()
                .filter(|from| from.can_transition_to(status))
                .map(|from| from.as_str().to_string())
                .collect();
            builder = builder
                .bind(("status", status.as_str().to_string()))
                .bind(("allowed", allowed));
        }
        if let Some(priority) = input.priority {
            builder = builder.bind(("priority", priority.as_str().to_string()));
        }

        let mut result = builder
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let updated: Vec<Value> = result.take(0).map_err(DbError::from)?;
        if updated.is_empty() {
            return Err(DbError::StaleStatus { id: id.to_string() }.into());
        }

        self.get_by_id(id).await
    }

    async fn delete(&self, id: Uuid) -> AduanResult<()> {
        self.get_by_id(id).await?;

        self.db
            .query(
                "BEGIN TRANSACTION; \
                 DELETE response WHERE complaint_id = $id; \
                 DELETE comment WHERE complaint_id = $id; \
                 DELETE type::record('complaint', $id); \
                 COMMIT TRANSACTION;",
            )
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        Ok(())
    }
}
