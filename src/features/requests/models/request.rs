use chrono::NaiveDateTime;
use sqlx::FromRow;

/// Database model for a request (chamado)
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Request {
    pub id: i32,
    pub attendant_name: String,
    pub applicant_name: String,
    pub applicant_phone: String,
    pub place: String,
    pub description: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub workstation_id: i32,
}

/// Row to insert; the id is generated by the store
#[derive(Debug, Clone)]
pub struct NewRequest {
    pub attendant_name: String,
    pub applicant_name: String,
    pub applicant_phone: String,
    pub place: String,
    pub description: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub workstation_id: i32,
}

/// Partial update of the mutable request columns.
///
/// `None` leaves a column untouched. For nullable columns `Some(None)` clears it.
/// `attendant_name` has no slot here: it cannot change after creation.
#[derive(Debug, Clone, Default)]
pub struct RequestChanges {
    pub applicant_name: Option<String>,
    pub applicant_phone: Option<String>,
    pub place: Option<String>,
    pub description: Option<Option<String>>,
    pub created_at: Option<Option<NaiveDateTime>>,
    pub workstation_id: Option<i32>,
}

impl RequestChanges {
    pub fn is_empty(&self) -> bool {
        self.applicant_name.is_none()
            && self.applicant_phone.is_none()
            && self.place.is_none()
            && self.description.is_none()
            && self.created_at.is_none()
            && self.workstation_id.is_none()
    }
}
