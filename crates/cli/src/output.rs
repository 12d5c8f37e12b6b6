use ingest_admin_core::events::NotificationLevel;
use ingest_admin_core::{Document, Notification};
use serde_json::json;

/// One line per document: title, added date, id.
pub fn render_table(documents: &[Document], empty_message: &str) -> String {
    if documents.is_empty() {
        return format!("{empty_message}\n");
    }
    let title_width = documents
        .iter()
        .map(|d| d.title.chars().count())
        .max()
        .unwrap_or(0)
        .max("TITLE".len());

    let mut out = format!("{:<title_width$}  {:<10}  ID\n", "TITLE", "ADDED");
    for doc in documents {
        out.push_str(&format!(
            "{:<title_width$}  {:<10}  {}\n",
            doc.title,
            doc.formatted_date(),
            doc.id
        ));
    }
    out
}

pub fn render_json(documents: &[Document]) -> serde_json::Result<String> {
    let rows: Vec<_> = documents
        .iter()
        .map(|d| {
            json!({
                "id": d.id,
                "title": d.title,
                "created_at": d.created_at,
                "formatted_date": d.formatted_date(),
            })
        })
        .collect();
    serde_json::to_string_pretty(&rows)
}

pub fn render_notification(notification: &Notification) -> String {
    match notification.level {
        NotificationLevel::Success => format!("ok: {}", notification.message),
        NotificationLevel::Error => format!("error: {}", notification.message),
    }
}
