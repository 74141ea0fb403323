use axum::response::Html;
use rust_embed::Embed;

#[derive(Embed)]
#[folder = "web/"]
struct WebAssets;

/// Serve the embedded landing page
pub async fn index() -> Html<String> {
    match <WebAssets as Embed>::get("index.html") {
        Some(content) => Html(String::from_utf8_lossy(&content.data).to_string()),
        None => Html(FALLBACK_HTML.to_string()),
    }
}

const FALLBACK_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="UTF-8"><title>SentiServe</title></head>
<body>
    <form action="/predict" method="post">
        <textarea name="text"></textarea>
        <button type="submit">Predict</button>
    </form>
</body>
</html>
"#;
