//! HTML email rendering.
//!
//! Every user-supplied value is HTML-escaped before interpolation.

use aduan_core::models::notification::Notification;
use serde::Serialize;

/// A rendered email, ready for a [`Mailer`](crate::Mailer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Escape the five HTML-significant characters.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn field(label: &str, value: &str) -> String {
    format!("<p><strong>{label}:</strong> {}</p>\n", escape_html(value))
}

/// Render `notification` to its email.
pub fn render(notification: &Notification) -> EmailMessage {
    let (subject, body) = match notification {
        Notification::ComplaintCreated {
            title,
            description,
            category,
            priority,
            location,
            reporter_email,
            ..
        } => {
            let mut body = String::from("<h2>Laporan Baru Diterima</h2>\n");
            body.push_str(&field("Judul", title));
            body.push_str(&field("Kategori", category.as_str()));
            body.push_str(&field("Prioritas", priority.as_str()));
            body.push_str(&field("Lokasi", location.as_deref().unwrap_or("-")));
            body.push_str("<p><strong>Deskripsi:</strong></p>\n");
            body.push_str(&format!("<p>{}</p>\n", escape_html(description)));
            body.push_str(&field("Dari", reporter_email));
            body.push_str("<p>---</p>\n");
            body.push_str("<p>Silakan login ke sistem untuk memberikan respons.</p>\n");
            (format!("Laporan Baru: {title}"), body)
        }
        Notification::ResponseAdded {
            complaint_title,
            message,
            ..
        } => {
            let mut body = String::from("<h2>Ada Respons untuk Laporan Anda</h2>\n");
            body.push_str(&field("Laporan", complaint_title));
            body.push_str("<p><strong>Respons dari Admin:</strong></p>\n");
            body.push_str(&format!("<p>{}</p>\n", escape_html(message)));
            body.push_str("<p>---</p>\n");
            body.push_str("<p>Silakan login ke sistem untuk melihat detail lengkapnya.</p>\n");
            (format!("Respons untuk Laporan: {complaint_title}"), body)
        }
        Notification::StatusChanged {
            complaint_title,
            old_status,
            new_status,
            ..
        } => {
            let mut body = String::from("<h2>Status Laporan Berubah</h2>\n");
            body.push_str(&field("Laporan", complaint_title));
            body.push_str(&field("Status Sebelumnya", old_status.as_str()));
            body.push_str(&field("Status Baru", new_status.as_str()));
            body.push_str("<p>---</p>\n");
            body.push_str("<p>Silakan login ke sistem untuk melihat detail lengkapnya.</p>\n");
            (format!("Perubahan Status Laporan: {complaint_title}"), body)
        }
    };

    EmailMessage {
        to: notification.recipient().to_string(),
        subject,
        html: body,
    }
}
