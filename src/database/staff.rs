use crate::api::middleware::error::ApiResult;
use crate::database::Database;
use crate::models::{CreateStaffRequest, Department, StaffMember};

use sqlx::any::AnyRow;
use sqlx::Row;

fn staff_from_row(row: &AnyRow) -> ApiResult<StaffMember> {
    let department: String = row.try_get("department")?;

    Ok(StaffMember {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        department: Department::from(department),
        position: row.try_get("position")?,
        is_on_duty: row.try_get::<i64, _>("is_on_duty")? != 0,
        is_available: row.try_get::<i64, _>("is_available")? != 0,
        current_task_id: row.try_get("current_task_id")?,
        last_assigned_at: row.try_get("last_assigned_at")?,
        tasks_today: row.try_get("tasks_today")?,
        tasks_completed: row.try_get("tasks_completed")?,
        clock_in_time: row.try_get("clock_in_time")?,
        clock_out_time: row.try_get("clock_out_time")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

const STAFF_COLUMNS: &str = "id, name, email, phone, department, position, is_on_duty, \
     is_available, current_task_id, last_assigned_at, tasks_today, tasks_completed, \
     clock_in_time, clock_out_time, created_at, updated_at";

impl Database {
    pub async fn create_staff(&self, create: &CreateStaffRequest) -> ApiResult<StaffMember> {
        let now = chrono::Utc::now().to_rfc3339();
        let phone = create.phone.clone().unwrap_or_default();
        let position = create.position.clone().unwrap_or_default();

        let result = sqlx::query(
            "INSERT INTO staff (name, email, phone, department, position, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&create.name)
        .bind(&create.email)
        .bind(&phone)
        .bind(create.department.to_string())
        .bind(&position)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_id().unwrap_or_default();

        let row = sqlx::query(&format!("SELECT {} FROM staff WHERE id = ?", STAFF_COLUMNS))
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        let staff = staff_from_row(&row)?;
        tracing::info!(
            "Staff member created: id={}, department={}",
            staff.id,
            staff.department
        );
        Ok(staff)
    }

    pub async fn get_staff_by_id(&self, id: i64) -> ApiResult<Option<StaffMember>> {
        let row = sqlx::query(&format!("SELECT {} FROM staff WHERE id = ?", STAFF_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(staff_from_row(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn list_staff(
        &self,
        department: Option<Department>,
        limit: i64,
        offset: i64,
    ) -> ApiResult<(Vec<StaffMember>, i64)> {
        let where_clause = if department.is_some() {
            " WHERE department = ?"
        } else {
            ""
        };

        let list_sql = format!(
            "SELECT {} FROM staff{} ORDER BY name ASC LIMIT ? OFFSET ?",
            STAFF_COLUMNS, where_clause
        );
        let mut list_query = sqlx::query(&list_sql);
        if let Some(department) = department {
            list_query = list_query.bind(department.to_string());
        }
        let rows = list_query
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let mut staff = Vec::with_capacity(rows.len());
        for row in &rows {
            staff.push(staff_from_row(row)?);
        }

        let count_sql = format!("SELECT COUNT(*) as count FROM staff{}", where_clause);
        let mut count_query = sqlx::query(&count_sql);
        if let Some(department) = department {
            count_query = count_query.bind(department.to_string());
        }
        let count_row = count_query.fetch_one(&self.pool).await?;
        let total: i64 = count_row.try_get("count")?;

        Ok((staff, total))
    }

    pub async fn get_available_staff(&self) -> ApiResult<Vec<StaffMember>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM staff WHERE is_on_duty = 1 AND is_available = 1 ORDER BY name ASC",
            STAFF_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        let mut staff = Vec::with_capacity(rows.len());
        for row in &rows {
            staff.push(staff_from_row(row)?);
        }
        Ok(staff)
    }

    pub async fn get_on_duty_staff(&self) -> ApiResult<Vec<StaffMember>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM staff WHERE is_on_duty = 1 ORDER BY name ASC",
            STAFF_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        let mut staff = Vec::with_capacity(rows.len());
        for row in &rows {
            staff.push(staff_from_row(row)?);
        }
        Ok(staff)
    }

    /// Pick an assignment candidate: eligible staff in the given department,
    /// least recently assigned first. Falls back to any eligible staff member
    /// when the department has nobody free.
    pub async fn find_assignable_staff(
        &self,
        department: Department,
    ) -> ApiResult<Option<StaffMember>> {
        let in_department = sqlx::query(&format!(
            "SELECT {} FROM staff
             WHERE is_on_duty = 1 AND is_available = 1 AND department = ?
             ORDER BY last_assigned_at IS NOT NULL, last_assigned_at ASC
             LIMIT 1",
            STAFF_COLUMNS
        ))
        .bind(department.to_string())
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = in_department {
            return Ok(Some(staff_from_row(&row)?));
        }

        let fallback = sqlx::query(&format!(
            "SELECT {} FROM staff
             WHERE is_on_duty = 1 AND is_available = 1
             ORDER BY last_assigned_at IS NOT NULL, last_assigned_at ASC
             LIMIT 1",
            STAFF_COLUMNS
        ))
        .fetch_optional(&self.pool)
        .await?;

        match fallback {
            Some(row) => Ok(Some(staff_from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Conditionally claim a staff member for a task. Eligibility is checked
    /// in the WHERE clause so concurrent claims cannot double-book.
    pub async fn claim_staff_for_task(&self, staff_id: i64, task_id: i64) -> ApiResult<bool> {
        let now = chrono::Utc::now().to_rfc3339();
        let result = sqlx::query(
            "UPDATE staff
             SET is_available = 0, current_task_id = ?, last_assigned_at = ?,
                 tasks_today = tasks_today + 1, updated_at = ?
             WHERE id = ? AND is_on_duty = 1 AND is_available = 1",
        )
        .bind(task_id)
        .bind(&now)
        .bind(&now)
        .bind(staff_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Release a staff member from the given task. Availability only comes
    /// back while on duty; the completion counter moves only for completions.
    pub async fn release_staff_from_task(
        &self,
        staff_id: i64,
        task_id: i64,
        completed: bool,
    ) -> ApiResult<()> {
        let now = chrono::Utc::now().to_rfc3339();
        let completed_increment = if completed { 1 } else { 0 };
        sqlx::query(
            "UPDATE staff
             SET is_available = is_on_duty, current_task_id = NULL,
                 tasks_completed = tasks_completed + ?, updated_at = ?
             WHERE id = ? AND current_task_id = ?",
        )
        .bind(completed_increment)
        .bind(&now)
        .bind(staff_id)
        .bind(task_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn clock_in_staff(&self, staff_id: i64) -> ApiResult<bool> {
        let now = chrono::Utc::now().to_rfc3339();
        let result = sqlx::query(
            "UPDATE staff
             SET is_on_duty = 1, is_available = 1, clock_in_time = ?, clock_out_time = NULL,
                 tasks_today = 0, updated_at = ?
             WHERE id = ? AND is_on_duty = 0",
        )
        .bind(&now)
        .bind(&now)
        .bind(staff_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Clock-out drops duty and assignment eligibility together. Any task
    /// already in progress stays bound to the request.
    pub async fn clock_out_staff(&self, staff_id: i64) -> ApiResult<bool> {
        let now = chrono::Utc::now().to_rfc3339();
        let result = sqlx::query(
            "UPDATE staff
             SET is_on_duty = 0, is_available = 0, clock_out_time = ?, updated_at = ?
             WHERE id = ? AND is_on_duty = 1",
        )
        .bind(&now)
        .bind(&now)
        .bind(staff_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Availability toggle, valid only while on duty.
    pub async fn set_staff_availability(&self, staff_id: i64, available: bool) -> ApiResult<bool> {
        let now = chrono::Utc::now().to_rfc3339();
        let result = sqlx::query(
            "UPDATE staff
             SET is_available = ?, updated_at = ?
             WHERE id = ? AND is_on_duty = 1",
        )
        .bind(if available { 1 } else { 0 })
        .bind(&now)
        .bind(staff_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
