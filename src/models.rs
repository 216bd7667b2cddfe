use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::entities::listing;

/// A row of the listings table as it is returned to clients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub title: String,
    pub year: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub poster_url: Option<String>,
    pub active: Option<bool>,
    pub description: Option<String>,
    pub location: Option<String>,
}

impl From<listing::Model> for Listing {
    fn from(row: listing::Model) -> Self {
        Self {
            id: row.id,
            title: row.title,
            year: row.year,
            kind: row.r#type,
            poster_url: row.poster_url,
            active: row.active,
            description: row.description,
            location: row.location,
        }
    }
}

/// Request body for create and update. Every field is optional at the wire
/// level; the create handler decides which ones are mandatory.
///
/// The aliases keep clients written against the older field names working.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPayload {
    #[serde(alias = "imdbID")]
    pub id: Option<String>,
    #[serde(alias = "Title")]
    pub title: Option<String>,
    #[serde(alias = "Year")]
    pub year: Option<String>,
    #[serde(rename = "type", alias = "Type")]
    pub kind: Option<String>,
    #[serde(alias = "Poster")]
    pub poster_url: Option<String>,
    #[serde(alias = "Estado")]
    pub active: Option<bool>,
    pub description: Option<String>,
    #[serde(alias = "Ubication")]
    pub location: Option<String>,
}

impl ListingPayload {
    /// Turns the payload into a full listing, or `None` when `id`, `title` or
    /// `year` is absent or empty.
    pub fn into_listing(self) -> Option<Listing> {
        let id = self.id.filter(|s| !s.is_empty())?;
        let title = self.title.filter(|s| !s.is_empty())?;
        let year = self.year.filter(|s| !s.is_empty())?;

        Some(Listing {
            id,
            title,
            year,
            kind: self.kind,
            poster_url: self.poster_url,
            active: self.active,
            description: self.description,
            location: self.location,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateQuery {
    #[serde(alias = "imdbID")]
    pub id: Option<String>,
}

/// The `{codError, msgRespuesta}` wrapper used by every non-list response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "codError")]
    pub cod_error: String,
    #[serde(rename = "msgRespuesta")]
    pub msg_respuesta: String,
}

impl Envelope {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { cod_error: status.as_u16().to_string(), msg_respuesta: message.into() }
    }

    pub fn respond(status: StatusCode, message: impl Into<String>) -> Response {
        (status, Json(Self::new(status, message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_requires_non_empty_keys() {
        let payload = ListingPayload {
            id: Some("tt1".into()),
            title: Some(String::new()),
            year: Some("2001".into()),
            ..Default::default()
        };
        assert!(payload.into_listing().is_none());

        let payload = ListingPayload {
            id: Some("tt1".into()),
            title: Some("Title".into()),
            ..Default::default()
        };
        assert!(payload.into_listing().is_none());
    }

    #[test]
    fn payload_accepts_legacy_field_names() {
        let payload: ListingPayload = serde_json::from_str(
            r#"{"imdbID":"tt42","Title":"Legacy","Year":"1999","Type":"Drama",
                "Poster":"https://demo/p.png","Estado":true,"Ubication":"SALA 2"}"#,
        )
        .unwrap();

        let listing = payload.into_listing().unwrap();
        assert_eq!(listing.id, "tt42");
        assert_eq!(listing.kind.as_deref(), Some("Drama"));
        assert_eq!(listing.poster_url.as_deref(), Some("https://demo/p.png"));
        assert_eq!(listing.active, Some(true));
        assert_eq!(listing.location.as_deref(), Some("SALA 2"));
        assert_eq!(listing.description, None);
    }

    #[test]
    fn listing_serializes_with_wire_names() {
        let listing = Listing {
            id: "tt1".into(),
            title: "A".into(),
            year: "2000".into(),
            kind: Some("Accion".into()),
            poster_url: None,
            active: Some(false),
            description: None,
            location: None,
        };
        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(json["type"], "Accion");
        assert_eq!(json["posterUrl"], serde_json::Value::Null);
        assert_eq!(json["active"], false);
    }

    #[test]
    fn envelope_uses_status_code_as_string() {
        let env = Envelope::new(StatusCode::CREATED, "Registro Insertado");
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"codError": "201", "msgRespuesta": "Registro Insertado"})
        );
    }
}
