use crate::error::NotificationError;
use crate::types::UpstreamCallNotice;

/// E-mail content produced from a notice
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedEmail {
    pub subject: String,
    pub body: String,
    pub attachment_name: String,
    pub attachment_json: String,
}

/// Renders the subject, body and JSON attachment for a notice.
///
/// Subject and attachment name are reduced to ASCII so they survive any
/// mail relay.
pub fn render_email(notice: &UpstreamCallNotice) -> Result<RenderedEmail, NotificationError> {
    let label = notice.label();
    let lower = label.to_lowercase();

    let subject = ascii_only(&format!("Golf Course {label}: {}", notice.course_name));

    let mut body = format!(
        "Attached is the {lower} data for {} (ID: {}).",
        notice.course_name, notice.course_id
    );
    if let Some(left) = &notice.quota_remaining {
        body.push_str(&format!("\n\nYou have {left} API requests remaining."));
    }

    let stem = ascii_only(&format!(
        "{}_{}",
        notice.course_id,
        notice.course_name.replace(' ', "_")
    ));
    let attachment_name = format!("{stem}_{lower}.json");

    let attachment_json = serde_json::to_string_pretty(&notice.payload)
        .map_err(|e| NotificationError::Internal(e.to_string()))?;

    Ok(RenderedEmail {
        subject,
        body,
        attachment_name,
        attachment_json,
    })
}

fn ascii_only(s: &str) -> String {
    s.chars().filter(char::is_ascii).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use greenside_core::DataKind;
    use serde_json::json;

    fn notice(name: &str, quota: Option<&str>) -> UpstreamCallNotice {
        UpstreamCallNotice {
            course_id: "X1".into(),
            course_name: name.into(),
            kind: DataKind::Coordinates,
            payload: json!({"courseID": "X1", "coordinates": []}),
            quota_remaining: quota.map(String::from),
        }
    }

    #[test]
    fn test_render_with_quota() {
        let email = render_email(&notice("Pebble Beach", Some("42"))).unwrap();
        assert_eq!(email.subject, "Golf Course POI: Pebble Beach");
        assert_eq!(
            email.body,
            "Attached is the poi data for Pebble Beach (ID: X1).\n\nYou have 42 API requests remaining."
        );
        assert_eq!(email.attachment_name, "X1_Pebble_Beach_poi.json");
        let parsed: serde_json::Value = serde_json::from_str(&email.attachment_json).unwrap();
        assert_eq!(parsed["courseID"], "X1");
    }

    #[test]
    fn test_render_without_quota() {
        let mut n = notice("Old Course", None);
        n.kind = DataKind::Info;
        let email = render_email(&n).unwrap();
        assert_eq!(email.subject, "Golf Course Info: Old Course");
        assert_eq!(email.body, "Attached is the info data for Old Course (ID: X1).");
        assert_eq!(email.attachment_name, "X1_Old_Course_info.json");
    }

    #[test]
    fn test_non_ascii_is_stripped() {
        let email = render_email(&notice("Golf de Montréal", None)).unwrap();
        assert_eq!(email.subject, "Golf Course POI: Golf de Montral");
        assert_eq!(email.attachment_name, "X1_Golf_de_Montral_poi.json");
        assert!(email.body.contains("Montréal"));
    }
}
