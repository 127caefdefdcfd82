use crate::utils::AppError;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use serde::{Deserialize, Serialize};

/// Fixed response messages (Spanish, as consumed by existing clients)
pub mod messages {
    pub const LIST_FAILED: &str = "Error al obtener los usuarios";
    pub const SEARCH_EMPTY: &str = "No se encontraron usuarios";
    pub const SEARCH_FAILED: &str = "Error al buscar usuarios";
    pub const INVALID_ID: &str = "El ID proporcionado no es válido";
    pub const INVALID_BODY: &str = "El cuerpo de la solicitud no es válido";
    pub const UPDATED: &str = "Usuario actualizado correctamente";
    pub const CREATED: &str = "Usuario creado correctamente";
    pub const UPSERT_FAILED: &str = "Error al actualizar o crear el usuario";
    pub const DELETE_NOT_FOUND: &str = "No se encontró el usuario para eliminar";
    pub const DELETED: &str = "Usuario eliminado correctamente";
    pub const DELETE_FAILED: &str = "Error al eliminar el usuario";
}

/// The seven writable fields. Used as the PUT body and as the `$set` document:
/// a field missing from the body is written as `null`, never left untouched.
///
/// Only the searchable names are typed; the rest are stored as sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UserFields {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub gender: Option<serde_json::Value>,
    #[schema(value_type = Option<Object>)]
    pub address: Option<serde_json::Value>,
    #[schema(value_type = Option<Object>)]
    pub card: Option<serde_json::Value>,
    #[schema(value_type = Option<Object>)]
    pub married_status: Option<serde_json::Value>,
}

impl UserFields {
    /// Builds the `$set` document, keeping explicit nulls
    pub fn to_set_document(&self) -> Result<Document, AppError> {
        Ok(mongodb::bson::to_document(self)?)
    }

    /// Decodes a PUT body. An empty body, or one that is not declared as JSON,
    /// carries no fields.
    pub fn from_body(content_type: &str, body: &[u8]) -> Result<Self, AppError> {
        let is_json = content_type.to_ascii_lowercase().contains("json");
        if !is_json || body.iter().all(u8::is_ascii_whitespace) {
            return Ok(UserFields::default());
        }

        serde_json::from_slice(body).map_err(|e| AppError::InvalidRequest(e.to_string()))
    }
}

/// Renders a stored document as JSON. Every stored field is kept; `_id` is
/// rendered as a 24-char hex string.
pub fn render_user(mut document: Document) -> serde_json::Value {
    let id = match document.remove("_id") {
        Some(Bson::ObjectId(oid)) => Some(serde_json::Value::String(oid.to_hex())),
        Some(other) => Some(other.into_relaxed_extjson()),
        None => None,
    };

    let mut rendered = serde_json::Map::new();
    if let Some(id) = id {
        rendered.insert("_id".to_string(), id);
    }
    if let serde_json::Value::Object(fields) = Bson::Document(document).into_relaxed_extjson() {
        rendered.extend(fields);
    }
    serde_json::Value::Object(rendered)
}

/// Query string of `GET /users/search`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserSearchQuery {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl UserSearchQuery {
    /// Equality constraints for the supplied parameters. Absent or empty
    /// parameters impose nothing.
    pub fn constraints(&self) -> Vec<(&'static str, &str)> {
        [
            ("first_name", self.first_name.as_deref()),
            ("last_name", self.last_name.as_deref()),
            ("email", self.email.as_deref()),
        ]
        .into_iter()
        .filter_map(|(field, value)| match value {
            Some(v) if !v.is_empty() => Some((field, v)),
            _ => None,
        })
        .collect()
    }

    pub fn to_filter(&self) -> Document {
        let mut filter = doc! {};
        for (field, value) in self.constraints() {
            filter.insert(field, value);
        }
        filter
    }

    pub fn matches(&self, document: &Document) -> bool {
        self.constraints()
            .iter()
            .all(|(field, value)| document.get_str(field).ok() == Some(*value))
    }
}

/// Generic `{ message }` body
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        MessageResponse { message: message.to_string() }
    }
}

/// Body of a `201 Created` upsert
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreatedResponse {
    pub message: String,
    #[serde(rename = "newUser")]
    pub new_user: String,
}

/// Result of an upsert against the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Updated,
    Created(ObjectId),
}

/// Parses a path identifier. Only 24-char hex ObjectIds are accepted.
pub fn parse_user_id(raw: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw).map_err(|_| AppError::InvalidId(raw.to_string()))
}
