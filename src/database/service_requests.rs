use crate::api::middleware::error::ApiResult;
use crate::database::Database;
use crate::models::{
    CreateServiceRequest, Priority, RequestStatus, ServiceCategory, ServiceRequest,
};

use sqlx::any::AnyRow;
use sqlx::Row;

fn request_from_row(row: &AnyRow) -> ApiResult<ServiceRequest> {
    let status: String = row.try_get("status")?;
    let category: String = row.try_get("category")?;
    let priority: String = row.try_get("priority")?;

    Ok(ServiceRequest {
        id: row.try_get("id")?,
        room_number: row.try_get("room_number")?,
        guest_id: row.try_get("guest_id")?,
        category: ServiceCategory::from(category),
        status: RequestStatus::from(status),
        priority: Priority::from(priority),
        description: row.try_get("description")?,
        assigned_to: row.try_get("assigned_to")?,
        assigned_staff_name: row.try_get("assigned_staff_name")?,
        requested_at: row.try_get("requested_at")?,
        completed_at: row.try_get("completed_at")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

const REQUEST_COLUMNS: &str = "id, room_number, guest_id, category, status, priority, \
     description, assigned_to, assigned_staff_name, requested_at, completed_at, \
     created_at, updated_at";

impl Database {
    pub async fn create_service_request(
        &self,
        create: &CreateServiceRequest,
    ) -> ApiResult<ServiceRequest> {
        let now = chrono::Utc::now().to_rfc3339();
        let priority = create.priority.unwrap_or(Priority::Medium);
        let description = create.description.clone().unwrap_or_default();

        tracing::debug!(
            "Creating service request for room {} ({})",
            create.room_number,
            create.category
        );

        let result = sqlx::query(
            "INSERT INTO service_requests
                 (room_number, guest_id, category, status, priority, description,
                  requested_at, created_at, updated_at)
             VALUES (?, ?, ?, 'pending', ?, ?, ?, ?, ?)",
        )
        .bind(&create.room_number)
        .bind(create.guest_id)
        .bind(create.category.to_string())
        .bind(priority.to_string())
        .bind(&description)
        .bind(&now)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_id().unwrap_or_default();

        let row = sqlx::query(&format!(
            "SELECT {} FROM service_requests WHERE id = ?",
            REQUEST_COLUMNS
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        let request = request_from_row(&row)?;
        tracing::info!(
            "Service request created: id={}, category={}, priority={}",
            request.id,
            request.category,
            request.priority
        );
        Ok(request)
    }

    pub async fn get_service_request_by_id(&self, id: i64) -> ApiResult<Option<ServiceRequest>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM service_requests WHERE id = ?",
            REQUEST_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(request_from_row(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn list_service_requests(
        &self,
        status: Option<RequestStatus>,
        category: Option<ServiceCategory>,
        limit: i64,
        offset: i64,
    ) -> ApiResult<(Vec<ServiceRequest>, i64)> {
        let mut conditions = Vec::new();
        if status.is_some() {
            conditions.push("status = ?");
        }
        if category.is_some() {
            conditions.push("category = ?");
        }
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let list_sql = format!(
            "SELECT {} FROM service_requests{} ORDER BY requested_at DESC LIMIT ? OFFSET ?",
            REQUEST_COLUMNS, where_clause
        );
        let mut list_query = sqlx::query(&list_sql);
        if let Some(status) = status {
            list_query = list_query.bind(status.to_string());
        }
        if let Some(category) = category {
            list_query = list_query.bind(category.to_string());
        }
        let rows = list_query
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let mut requests = Vec::with_capacity(rows.len());
        for row in &rows {
            requests.push(request_from_row(row)?);
        }

        let count_sql = format!("SELECT COUNT(*) as count FROM service_requests{}", where_clause);
        let mut count_query = sqlx::query(&count_sql);
        if let Some(status) = status {
            count_query = count_query.bind(status.to_string());
        }
        if let Some(category) = category {
            count_query = count_query.bind(category.to_string());
        }
        let count_row = count_query.fetch_one(&self.pool).await?;
        let total: i64 = count_row.try_get("count")?;

        Ok((requests, total))
    }

    /// Requests the reconcile pass cares about: pending and unassigned.
    pub async fn get_pending_unassigned_requests(&self) -> ApiResult<Vec<ServiceRequest>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM service_requests
             WHERE status = 'pending' AND assigned_to IS NULL
             ORDER BY requested_at ASC",
            REQUEST_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        let mut requests = Vec::with_capacity(rows.len());
        for row in &rows {
            requests.push(request_from_row(row)?);
        }
        Ok(requests)
    }

    /// Bind a staff member to a request. The WHERE clause is the arbiter of
    /// the manual/auto race: only a still-pending, still-unassigned request
    /// can be bound, and the loser sees zero rows affected.
    pub async fn bind_request_to_staff(
        &self,
        request_id: i64,
        staff_id: i64,
        staff_name: &str,
    ) -> ApiResult<bool> {
        let now = chrono::Utc::now().to_rfc3339();
        let result = sqlx::query(
            "UPDATE service_requests
             SET assigned_to = ?, assigned_staff_name = ?, status = 'in-progress', updated_at = ?
             WHERE id = ? AND status = 'pending' AND assigned_to IS NULL",
        )
        .bind(staff_id)
        .bind(staff_name)
        .bind(&now)
        .bind(request_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Compensation for a failed staff claim: put the request back the way
    /// `bind_request_to_staff` found it.
    pub async fn unbind_request(&self, request_id: i64) -> ApiResult<()> {
        let now = chrono::Utc::now().to_rfc3339();
        sqlx::query(
            "UPDATE service_requests
             SET assigned_to = NULL, assigned_staff_name = NULL, status = 'pending', updated_at = ?
             WHERE id = ?",
        )
        .bind(&now)
        .bind(request_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Conditional status update; `from` must still hold. Sets completed_at
    /// when the new status is completed.
    pub async fn update_request_status(
        &self,
        request_id: i64,
        from: RequestStatus,
        to: RequestStatus,
    ) -> ApiResult<bool> {
        let now = chrono::Utc::now().to_rfc3339();
        let result = if to == RequestStatus::Completed {
            sqlx::query(
                "UPDATE service_requests
                 SET status = ?, completed_at = ?, updated_at = ?
                 WHERE id = ? AND status = ?",
            )
            .bind(to.to_string())
            .bind(&now)
            .bind(&now)
            .bind(request_id)
            .bind(from.to_string())
            .execute(&self.pool)
            .await?
        } else {
            sqlx::query(
                "UPDATE service_requests
                 SET status = ?, updated_at = ?
                 WHERE id = ? AND status = ?",
            )
            .bind(to.to_string())
            .bind(&now)
            .bind(request_id)
            .bind(from.to_string())
            .execute(&self.pool)
            .await?
        };

        Ok(result.rows_affected() > 0)
    }
}
