//! Assessment suites
//!
//! A suite pairs a knowledge base with the test cases assessed against it.
//! Suites are plain data, read from TOML:
//!
//! ```toml
//! [[suite]]
//! name = "baseline"
//! passages = ["Mount Everest is the highest mountain on Earth."]
//!
//! [[suite.cases]]
//! question = "What is the highest mountain?"
//! expected_keyword = "Everest"
//! expected_answer = "Mount Everest"
//! ```
//!
//! The suites shipped with the crate are available from [`builtin_suites`].

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::assess::TestCase;
use crate::{Error, Result};

const BUILTIN: &str = include_str!("../suites/builtin.toml");

/// A named knowledge base and its test cases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suite {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Knowledge base passages, in store order
    pub passages: Vec<String>,
    #[serde(default)]
    pub cases: Vec<TestCase>,
    /// Shown instead of the generic message on a perfect score
    #[serde(default)]
    pub success_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SuiteFile {
    #[serde(default, rename = "suite")]
    suites: Vec<Suite>,
}

impl Suite {
    /// Check the suite can be assessed meaningfully.
    ///
    /// Rejects blank names, an empty or blank passage list, and cases with a
    /// blank question or blank expectations (which would match anything).
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Suite("suite name must not be empty".to_string()));
        }
        if self.passages.is_empty() {
            return Err(Error::Suite(format!("suite '{}' has no passages", self.name)));
        }
        if let Some(i) = self.passages.iter().position(|p| p.trim().is_empty()) {
            return Err(Error::Suite(format!("suite '{}': passage {i} is blank", self.name)));
        }

        for (i, case) in self.cases.iter().enumerate() {
            let blank = [
                ("question", &case.question),
                ("expected_keyword", &case.expected_keyword),
                ("expected_answer", &case.expected_answer),
            ]
            .into_iter()
            .find(|(_, value)| value.trim().is_empty());

            if let Some((field, _)) = blank {
                return Err(Error::Suite(format!(
                    "suite '{}': case {i} has a blank {field}",
                    self.name
                )));
            }
        }

        Ok(())
    }
}

/// Parse and validate suites from TOML text.
pub fn parse_suites(text: &str) -> Result<Vec<Suite>> {
    let file: SuiteFile = toml::from_str(text).map_err(|e| Error::Suite(e.to_string()))?;
    if file.suites.is_empty() {
        return Err(Error::Suite("no [[suite]] tables found".to_string()));
    }

    let mut seen = HashSet::new();
    for suite in &file.suites {
        suite.validate()?;
        if !seen.insert(suite.name.as_str()) {
            return Err(Error::Suite(format!("duplicate suite name '{}'", suite.name)));
        }
    }

    Ok(file.suites)
}

/// Read suites from a TOML file.
pub fn load_suites(path: &Path) -> Result<Vec<Suite>> {
    let text = fs::read_to_string(path)
        .map_err(|e| Error::Suite(format!("{}: {e}", path.display())))?;
    parse_suites(&text)
}

/// Suites bundled with the crate: `baseline`, `extended` and `moon`.
pub fn builtin_suites() -> Result<Vec<Suite>> {
    parse_suites(BUILTIN)
}

/// Select suites by name, keeping the order of `names`.
///
/// An empty `names` selects every suite.
pub fn select_suites(suites: Vec<Suite>, names: &[String]) -> Result<Vec<Suite>> {
    if names.is_empty() {
        return Ok(suites);
    }

    names
        .iter()
        .map(|name| {
            suites
                .iter()
                .find(|s| &s.name == name)
                .cloned()
                .ok_or_else(|| Error::Suite(format!("no suite named '{name}'")))
        })
        .collect()
}

/// Split plain text into passages at blank lines.
///
/// Lines within a paragraph are joined with single spaces.
pub fn passages_from_text(text: &str) -> Vec<String> {
    let mut passages = Vec::new();
    let mut buffer: Vec<&str> = Vec::new();

    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            if !buffer.is_empty() {
                passages.push(buffer.join(" "));
                buffer.clear();
            }
        } else {
            buffer.push(line);
        }
    }

    // flush trailing paragraph
    if !buffer.is_empty() {
        passages.push(buffer.join(" "));
    }

    passages
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_builtin_suites_load() {
        let suites = builtin_suites().unwrap();
        let names: Vec<&str> = suites.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["baseline", "extended", "moon"]);

        assert_eq!(suites[0].passages.len(), 5);
        assert_eq!(suites[0].cases.len(), 3);
        assert_eq!(suites[1].cases.len(), 5);
        assert_eq!(suites[2].passages.len(), 1);
        assert!(suites.iter().all(|s| s.success_message.is_some()));
    }

    #[test]
    fn test_parse_minimal_suite() {
        let suites = parse_suites(
            r#"
            [[suite]]
            name = "tiny"
            passages = ["One fact."]
            "#,
        )
        .unwrap();

        assert_eq!(suites.len(), 1);
        assert!(suites[0].cases.is_empty());
        assert_eq!(suites[0].description, None);
    }

    #[test]
    fn test_parse_rejects_no_suites() {
        let err = parse_suites("title = 'nothing'").unwrap_err();
        assert!(matches!(err, Error::Suite(_)));
    }

    #[test]
    fn test_parse_rejects_bad_toml() {
        let err = parse_suites("[[suite]\nname =").unwrap_err();
        assert!(matches!(err, Error::Suite(_)));
    }

    #[test]
    fn test_parse_rejects_missing_passages() {
        let err = parse_suites("[[suite]]\nname = \"x\"\npassages = []").unwrap_err();
        assert_eq!(err, Error::Suite("suite 'x' has no passages".to_string()));
    }

    #[test]
    fn test_parse_rejects_blank_expectation() {
        let err = parse_suites(
            r#"
            [[suite]]
            name = "x"
            passages = ["p"]

            [[suite.cases]]
            question = "q?"
            expected_keyword = "p"
            expected_answer = "  "
            "#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            Error::Suite("suite 'x': case 0 has a blank expected_answer".to_string())
        );
    }

    #[test]
    fn test_parse_rejects_duplicate_names() {
        let err = parse_suites(
            r#"
            [[suite]]
            name = "dup"
            passages = ["a"]

            [[suite]]
            name = "dup"
            passages = ["b"]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Suite(msg) if msg.contains("duplicate")));
    }

    #[test]
    fn test_load_suites_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[[suite]]\nname = \"from-file\"\npassages = [\"A passage.\"]").unwrap();

        let suites = load_suites(file.path()).unwrap();
        assert_eq!(suites[0].name, "from-file");
    }

    #[test]
    fn test_load_suites_missing_file() {
        let err = load_suites(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, Error::Suite(_)));
    }

    #[test]
    fn test_select_suites_by_name() {
        let suites = builtin_suites().unwrap();
        let picked = select_suites(suites, &["moon".to_string(), "baseline".to_string()]).unwrap();
        let names: Vec<&str> = picked.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["moon", "baseline"]);
    }

    #[test]
    fn test_select_suites_unknown_name() {
        let suites = builtin_suites().unwrap();
        assert!(select_suites(suites, &["mars".to_string()]).is_err());
    }

    #[test]
    fn test_select_suites_empty_selects_all() {
        let suites = builtin_suites().unwrap();
        assert_eq!(select_suites(suites, &[]).unwrap().len(), 3);
    }

    #[test]
    fn test_passages_from_text() {
        let text = "First line\ncontinues here.\n\n\n  Second paragraph.  \n   \nThird";
        assert_eq!(
            passages_from_text(text),
            vec!["First line continues here.", "Second paragraph.", "Third"]
        );
    }

    #[test]
    fn test_passages_from_blank_text() {
        assert!(passages_from_text("").is_empty());
        assert!(passages_from_text("\n  \n\n").is_empty());
    }
}
