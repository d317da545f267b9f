use crate::api::ComicApi;
use crate::error::KomikError;
use crate::types::ComicDetail;

pub const FETCH_FAILED: &str = "Something went wrong while fetching the comic detail";
pub const INVALID_LINK: &str = "Invalid comic link";

/// Detail record, or the message to show in its place.
pub type LoadOutcome = std::result::Result<ComicDetail, String>;

/// Strip exactly one leading `/`.
pub fn normalize_link(processed_link: &str) -> &str {
    processed_link.strip_prefix('/').unwrap_or(processed_link)
}

/// Server message first, then the error's own text, then a generic message.
pub fn error_message(err: &KomikError) -> String {
    if let Some(message) = err.server_message() {
        return message.to_string();
    }
    let text = err.to_string();
    if text.trim().is_empty() {
        FETCH_FAILED.to_string()
    } else {
        text
    }
}

pub async fn load_detail(api: &dyn ComicApi, processed_link: &str) -> LoadOutcome {
    let link = normalize_link(processed_link);
    match api.comic_detail(link).await {
        Ok(detail) => {
            tracing::debug!(source = api.name(), link, ?detail, "fetched comic detail");
            Ok(detail)
        }
        Err(e) => {
            tracing::error!(source = api.name(), link, "error fetching comic detail: {}", e);
            Err(error_message(&e))
        }
    }
}
