use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};

use crate::core::error::{AppError, Result};
use crate::features::requests::models::{
    NewProblemLink, NewRequest, ProblemLink, ProblemLinkChanges, Request, RequestChanges,
};
use crate::features::requests::repositories::{ProblemLinkFilter, RequestFilter, RequestStore};

const REQUEST_COLUMNS: &str = "id, attendant_name, applicant_name, applicant_phone, place, \
     description, created_at, workstation_id";

const PROBLEM_LINK_COLUMNS: &str =
    "request_id, problem_id, category_id, is_event, event_date, request_status, priority";

/// PostgreSQL-backed store
pub struct PgRequestStore {
    pool: PgPool,
}

impl PgRequestStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> AppError {
    move |e| {
        tracing::error!("{}: {:?}", context, e);
        AppError::Database(e)
    }
}

/// Push `WHERE` before the first condition and `AND` before the rest
fn push_condition(builder: &mut QueryBuilder<'_, Postgres>, first: &mut bool) {
    builder.push(if *first { " WHERE " } else { " AND " });
    *first = false;
}

async fn insert_request(conn: &mut PgConnection, data: &NewRequest) -> sqlx::Result<Request> {
    let query = format!(
        r#"
        INSERT INTO requests (
            attendant_name, applicant_name, applicant_phone, place,
            description, created_at, workstation_id
        ) VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {}
        "#,
        REQUEST_COLUMNS
    );

    sqlx::query_as::<_, Request>(&query)
        .bind(&data.attendant_name)
        .bind(&data.applicant_name)
        .bind(&data.applicant_phone)
        .bind(&data.place)
        .bind(&data.description)
        .bind(data.created_at)
        .bind(data.workstation_id)
        .fetch_one(conn)
        .await
}

async fn insert_problem_link(
    conn: &mut PgConnection,
    request_id: i32,
    data: &NewProblemLink,
) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO request_problems (
            request_id, problem_id, category_id, is_event, event_date, request_status, priority
        ) VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(request_id)
    .bind(data.problem_id)
    .bind(data.category_id)
    .bind(data.is_event)
    .bind(data.event_date)
    .bind(&data.request_status)
    .bind(&data.priority)
    .execute(conn)
    .await?;
    Ok(())
}

#[async_trait]
impl RequestStore for PgRequestStore {
    async fn create_request(
        &self,
        request: NewRequest,
        problems: Vec<NewProblemLink>,
    ) -> Result<Request> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to open transaction"))?;

        let created = insert_request(&mut *tx, &request)
            .await
            .map_err(db_error("Failed to insert request"))?;

        for problem in &problems {
            insert_problem_link(&mut *tx, created.id, problem)
                .await
                .map_err(db_error("Failed to insert problem link"))?;
        }

        // Dropping `tx` on any early return above rolls everything back
        tx.commit()
            .await
            .map_err(db_error("Failed to commit request"))?;

        Ok(created)
    }

    async fn find_requests(&self, filter: &RequestFilter) -> Result<Vec<Request>> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM requests",
            REQUEST_COLUMNS
        ));

        if let Some(ref ids) = filter.ids {
            builder.push(" WHERE id = ANY(").push_bind(ids.clone()).push(")");
        }
        builder.push(" ORDER BY id");

        builder
            .build_query_as::<Request>()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list requests"))
    }

    async fn find_problem_links(&self, filter: &ProblemLinkFilter) -> Result<Vec<ProblemLink>> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM request_problems",
            PROBLEM_LINK_COLUMNS
        ));
        let mut first = true;

        if let Some(ref ids) = filter.request_ids {
            push_condition(&mut builder, &mut first);
            builder
                .push("request_id = ANY(")
                .push_bind(ids.clone())
                .push(")");
        }
        if let Some(problem_id) = filter.problem_id {
            push_condition(&mut builder, &mut first);
            builder.push("problem_id = ").push_bind(problem_id);
        }
        if let Some(ref status) = filter.status_not {
            push_condition(&mut builder, &mut first);
            builder.push("request_status <> ").push_bind(status.clone());
        }
        if let Some(window) = filter.event_window {
            push_condition(&mut builder, &mut first);
            builder
                .push("is_event AND event_date >= ")
                .push_bind(window.from);
            if let Some(until) = window.until {
                builder.push(" AND event_date <= ").push_bind(until);
            }
        }
        builder.push(" ORDER BY id");

        builder
            .build_query_as::<ProblemLink>()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list problem links"))
    }

    async fn update_request(&self, id: i32, changes: &RequestChanges) -> Result<u64> {
        let mut builder = QueryBuilder::<Postgres>::new("UPDATE requests SET ");
        {
            let mut sets = builder.separated(", ");
            if let Some(ref v) = changes.applicant_name {
                sets.push("applicant_name = ").push_bind_unseparated(v.clone());
            }
            if let Some(ref v) = changes.applicant_phone {
                sets.push("applicant_phone = ").push_bind_unseparated(v.clone());
            }
            if let Some(ref v) = changes.place {
                sets.push("place = ").push_bind_unseparated(v.clone());
            }
            if let Some(ref v) = changes.description {
                sets.push("description = ").push_bind_unseparated(v.clone());
            }
            if let Some(v) = changes.created_at {
                sets.push("created_at = ").push_bind_unseparated(v);
            }
            if let Some(v) = changes.workstation_id {
                sets.push("workstation_id = ").push_bind_unseparated(v);
            }
            if changes.is_empty() {
                sets.push("id = id");
            }
        }
        builder.push(" WHERE id = ").push_bind(id);

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to update request"))?;

        Ok(result.rows_affected())
    }

    async fn update_problem_link(
        &self,
        request_id: i32,
        problem_id: i32,
        changes: &ProblemLinkChanges,
    ) -> Result<u64> {
        let mut builder = QueryBuilder::<Postgres>::new("UPDATE request_problems SET ");
        {
            let mut sets = builder.separated(", ");
            if let Some(v) = changes.category_id {
                sets.push("category_id = ").push_bind_unseparated(v);
            }
            if let Some(v) = changes.is_event {
                sets.push("is_event = ").push_bind_unseparated(v);
            }
            if let Some(v) = changes.event_date {
                sets.push("event_date = ").push_bind_unseparated(v);
            }
            if let Some(ref v) = changes.request_status {
                sets.push("request_status = ").push_bind_unseparated(v.clone());
            }
            if let Some(ref v) = changes.priority {
                sets.push("priority = ").push_bind_unseparated(v.clone());
            }
            if changes.is_empty() {
                sets.push("problem_id = problem_id");
            }
        }
        builder
            .push(" WHERE request_id = ")
            .push_bind(request_id)
            .push(" AND problem_id = ")
            .push_bind(problem_id);

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to update problem link"))?;

        Ok(result.rows_affected())
    }
}
