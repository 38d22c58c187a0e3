use crate::error::{Result, TicketsError};
use serde::Serialize;
use std::fmt;

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn all() -> &'static [Priority] {
        &[Priority::Low, Priority::Medium, Priority::High]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = TicketsError;

    /// Case-insensitive. Also accepts the Spanish labels found in older data sets.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" | "baja" => Ok(Priority::Low),
            "medium" | "media" => Ok(Priority::Medium),
            "high" | "alta" => Ok(Priority::High),
            _ => Err(TicketsError::InvalidPriority(s.to_string())),
        }
    }
}

impl rusqlite::types::ToSql for Priority {
    fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
        Ok(rusqlite::types::ToSqlOutput::from(self.as_str()))
    }
}

impl rusqlite::types::FromSql for Priority {
    fn column_result(value: rusqlite::types::ValueRef<'_>) -> rusqlite::types::FromSqlResult<Self> {
        let text = value.as_str()?;
        text.parse()
            .map_err(|e: TicketsError| rusqlite::types::FromSqlError::Other(Box::new(e)))
    }
}

// ---------------------------------------------------------------------------
// Field normalization
// ---------------------------------------------------------------------------

pub const NAME_MAX: usize = 120;
pub const EMAIL_MAX: usize = 180;
pub const TITLE_MAX: usize = 150;

/// Trim `value` and reject it when empty or longer than `max` characters.
pub fn required_text(field: &'static str, value: &str, max: Option<usize>) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TicketsError::EmptyField(field));
    }
    if let Some(max) = max {
        if trimmed.chars().count() > max {
            return Err(TicketsError::FieldTooLong { field, max });
        }
    }
    Ok(trimmed.to_string())
}

/// Emails are stored trimmed and lowercased so uniqueness is case-insensitive.
pub fn normalize_email(value: &str) -> Result<String> {
    required_text("email", value, Some(EMAIL_MAX)).map(|e| e.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_parses_english_and_spanish_labels() {
        assert_eq!("high".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!(" Alta ".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!("MEDIA".parse::<Priority>().unwrap(), Priority::Medium);
        assert_eq!("Baja".parse::<Priority>().unwrap(), Priority::Low);
    }

    #[test]
    fn priority_rejects_unknown_label() {
        let err = "urgent".parse::<Priority>().unwrap_err();
        assert!(matches!(err, TicketsError::InvalidPriority(s) if s == "urgent"));
    }

    #[test]
    fn priority_display_is_canonical() {
        let labels: Vec<String> = Priority::all().iter().map(|p| p.to_string()).collect();
        assert_eq!(labels, ["Low", "Medium", "High"]);
    }

    #[test]
    fn required_text_trims_and_validates() {
        assert_eq!(required_text("name", "  Ana ", None).unwrap(), "Ana");
        assert!(matches!(
            required_text("name", "   ", None),
            Err(TicketsError::EmptyField("name"))
        ));
        assert!(matches!(
            required_text("title", &"x".repeat(151), Some(TITLE_MAX)),
            Err(TicketsError::FieldTooLong { field: "title", max: 150 })
        ));
    }

    #[test]
    fn email_is_lowercased() {
        assert_eq!(normalize_email(" ANA@X.com ").unwrap(), "ana@x.com");
    }
}
