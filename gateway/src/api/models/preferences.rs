use serde::{Deserialize, Serialize};

use crate::utils::serde::null_as_default;

/// Dashboard preferences of the (single) user.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferences {
    /// Sort order key of the device list, e.g. `a-z`.
    #[serde(deserialize_with = "null_as_default")]
    pub sort: String,
    /// Highlighted device ids, in the order the user picked them.
    pub highlight: Option<Vec<String>>,
}

impl UserPreferences {
    /// Served until the user saves preferences for the first time.
    pub fn initial() -> Self {
        Self {
            sort: "a-z".to_owned(),
            highlight: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_preferences_serialize_with_null_highlight() {
        let json = serde_json::to_string(&UserPreferences::initial()).unwrap();
        assert_eq!(json, r#"{"sort":"a-z","highlight":null}"#);
    }

    #[test]
    fn highlight_keeps_order() {
        let prefs: UserPreferences =
            serde_json::from_str(r#"{"sort":"z-a","highlight":["d3","d1","d2"]}"#).unwrap();
        assert_eq!(
            prefs.highlight.as_deref(),
            Some(&["d3".to_owned(), "d1".to_owned(), "d2".to_owned()][..])
        );
    }

    #[test]
    fn null_sort_is_empty() {
        let prefs: UserPreferences =
            serde_json::from_str(r#"{"sort":null,"highlight":["a"]}"#).unwrap();
        assert_eq!(prefs.sort, "");
        assert_eq!(prefs.highlight, Some(vec!["a".to_owned()]));
    }

    #[test]
    fn rejects_highlight_of_wrong_type() {
        let err = serde_json::from_str::<UserPreferences>(r#"{"sort":"a-z","highlight":5}"#)
            .unwrap_err();
        assert!(!err.to_string().is_empty());
    }
}
