//! Opaque blob key generation.

use uuid::Uuid;

/// Generate a fresh, globally unique blob key.
///
/// The original file extension is preserved so downstream consumers can
/// infer the content type from the key; everything before it is a random
/// UUID. Keys are never reused: every physical write, including the
/// promotion of an accepted edit, gets a new one.
pub fn fresh_key(display_name: &str) -> String {
    match extension(display_name) {
        Some(ext) => format!("{}.{ext}", Uuid::new_v4()),
        None => Uuid::new_v4().to_string(),
    }
}

/// Extract the lowercase extension of a file name, if any.
fn extension(name: &str) -> Option<String> {
    let ext = name.rsplit('.').next()?;
    if ext == name || ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_unique() {
        assert_ne!(fresh_key("report.csv"), fresh_key("report.csv"));
    }

    #[test]
    fn test_extension_preserved_lowercase() {
        let key = fresh_key("Q3 Sales.XLSX");
        assert!(key.ends_with(".xlsx"));
    }

    #[test]
    fn test_no_extension() {
        let key = fresh_key("README");
        assert!(!key.contains('.'));
        assert_eq!(key.len(), 36);
    }

    #[test]
    fn test_trailing_dot() {
        let key = fresh_key("weird.");
        assert!(!key.contains('.'));
    }
}
