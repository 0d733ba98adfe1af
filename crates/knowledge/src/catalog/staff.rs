//! Staff roster parsing.

use crate::types::StaffMember;
use concierge_core::AppResult;
use serde::Deserialize;

#[derive(Deserialize)]
struct StaffFile {
    #[serde(default)]
    core_staff: Vec<StaffMember>,
}

/// Parse a `{"core_staff": [{"name", "title"}]}` roster.
pub fn parse_staff(json: &str) -> AppResult<Vec<StaffMember>> {
    let file: StaffFile = serde_json::from_str(json)?;
    Ok(file
        .core_staff
        .into_iter()
        .filter(|member| !member.name.trim().is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roster() {
        let json = r#"{"core_staff": [
            {"name": "Dr. Kal Ng", "title": "Director"},
            {"name": "  ", "title": "Vacant"},
            {"name": "Jenny Lee"}
        ]}"#;
        let staff = parse_staff(json).unwrap();
        assert_eq!(staff.len(), 2);
        assert_eq!(staff[1].title, "");
    }

    #[test]
    fn test_missing_key_is_empty() {
        assert!(parse_staff("{}").unwrap().is_empty());
    }
}
