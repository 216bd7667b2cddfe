use maud::{DOCTYPE, Markup, PreEscaped, html};

const SWAGGER_UI_CSS: &str = "https://cdn.jsdelivr.net/npm/swagger-ui-dist@5/swagger-ui.css";
const SWAGGER_UI_JS: &str = "https://cdn.jsdelivr.net/npm/swagger-ui-dist@5/swagger-ui-bundle.js";

/// Swagger UI page that renders the document served at `document_url`.
pub fn docs_page(document_url: &str) -> String {
    let init = format!(
        "window.onload = () => {{ \
         window.ui = SwaggerUIBundle({{ url: {}, dom_id: '#swagger-ui' }}); }};",
        serde_json::Value::from(document_url)
    );

    page(
        "API Cartelera",
        html! {
            div id="swagger-ui" {}
            script src=(SWAGGER_UI_JS) {}
            script { (PreEscaped(init)) }
        },
    )
}

fn page(title: &str, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                link rel="stylesheet" href=(SWAGGER_UI_CSS);
            }
            body { (body) }
        }
    }
    .into_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn docs_page_points_at_the_document() {
        let page = docs_page("/api-docs/openapi.json");
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains(r#"url: "/api-docs/openapi.json""#));
        assert!(page.contains(SWAGGER_UI_JS));
    }
}
