use serde_json::{Value, json};

use crate::{
    config::Config,
    error::{MISSING_FIELDS, MISSING_KEY, NOT_FOUND},
    routes::LISTINGS_PATH,
};

/// OpenAPI 3.0 description of the listings API.
pub fn document(config: &Config) -> Value {
    let mut paths = serde_json::Map::new();
    paths.insert(
        LISTINGS_PATH.to_string(),
        json!({
            "get": {
                "summary": "List every listing",
                "tags": ["Listings"],
                "responses": {
                    "200": {
                        "description": "All listings, in store order",
                        "content": { "application/json": { "schema": {
                            "type": "array",
                            "items": { "$ref": "#/components/schemas/Listing" }
                        } } }
                    },
                    "500": envelope_response("Store or connection failure", None)
                }
            },
            "post": {
                "summary": "Create a listing",
                "tags": ["Listings"],
                "requestBody": listing_body(),
                "responses": {
                    "201": envelope_response(
                        "Listing created",
                        Some(("201", "Registro Insertado"))
                    ),
                    "400": envelope_response(
                        "Missing key fields or rejected by the store (duplicate id)",
                        Some(("400", MISSING_FIELDS))
                    ),
                    "500": envelope_response("Database connection unavailable", None)
                }
            },
            "put": {
                "summary": "Replace the mutable fields of a listing",
                "tags": ["Listings"],
                "parameters": [{
                    "in": "query",
                    "name": "id",
                    "required": true,
                    "schema": { "type": "string" },
                    "description": "Id of the listing to update"
                }],
                "requestBody": listing_body(),
                "responses": {
                    "200": envelope_response(
                        "Listing updated",
                        Some(("200", "Registro actualizado correctamente"))
                    ),
                    "400": envelope_response(
                        "Missing id parameter or rejected by the store",
                        Some(("400", MISSING_KEY))
                    ),
                    "404": envelope_response("No listing with that id", Some(("404", NOT_FOUND))),
                    "500": envelope_response("Database connection unavailable", None)
                }
            }
        }),
    );

    json!({
        "openapi": "3.0.0",
        "info": {
            "title": "API Cartelera",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Create, list and update the movies currently showing."
        },
        "servers": [{
            "url": format!("http://localhost:{}", config.addr.port()),
            "description": "Local server"
        }],
        "tags": [{ "name": "Listings", "description": "Operations on the listings table" }],
        "paths": paths,
        "components": { "schemas": {
            "Listing": listing_schema(),
            "Envelope": {
                "type": "object",
                "required": ["codError", "msgRespuesta"],
                "properties": {
                    "codError": { "type": "string", "example": "400" },
                    "msgRespuesta": { "type": "string" }
                }
            }
        } }
    })
}

fn listing_schema() -> Value {
    json!({
        "type": "object",
        "required": ["id", "title", "year"],
        "properties": {
            "id": {
                "type": "string",
                "maxLength": 50,
                "description": "Primary key, ttXXXX",
                "example": "tt80000"
            },
            "title": { "type": "string", "maxLength": 255, "example": "Titanes del Atlantico" },
            "year": { "type": "string", "maxLength": 10, "example": "2013" },
            "type": {
                "type": "string",
                "maxLength": 50,
                "nullable": true,
                "example": "Ciencia Ficcion"
            },
            "posterUrl": {
                "type": "string",
                "maxLength": 500,
                "nullable": true,
                "example": "https://demo/demoimages.png"
            },
            "active": {
                "type": "boolean",
                "nullable": true,
                "description": "Currently showing",
                "example": true
            },
            "description": { "type": "string", "nullable": true },
            "location": {
                "type": "string",
                "maxLength": 100,
                "nullable": true,
                "example": "POPCINEMA"
            }
        }
    })
}

fn listing_body() -> Value {
    json!({
        "required": true,
        "content": {
            "application/json": { "schema": { "$ref": "#/components/schemas/Listing" } }
        }
    })
}

fn envelope_response(description: &str, example: Option<(&str, &str)>) -> Value {
    let mut media = json!({ "schema": { "$ref": "#/components/schemas/Envelope" } });
    if let Some((code, message)) = example {
        media["example"] = json!({ "codError": code, "msgRespuesta": message });
    }
    json!({ "description": description, "content": { "application/json": media } })
}
