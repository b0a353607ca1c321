use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GradeParseError {
    #[error("grade cannot be empty")]
    Empty,
}

/// School tier a grade belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GradeCategory {
    PrimarySchool,
    SecondarySchool,
    JuniorCollege,
    Polytechnic,
    University,
}

impl GradeCategory {
    pub const ALL: [GradeCategory; 5] = [
        GradeCategory::PrimarySchool,
        GradeCategory::SecondarySchool,
        GradeCategory::JuniorCollege,
        GradeCategory::Polytechnic,
        GradeCategory::University,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            GradeCategory::PrimarySchool => "Primary School",
            GradeCategory::SecondarySchool => "Secondary School",
            GradeCategory::JuniorCollege => "Junior College",
            GradeCategory::Polytechnic => "Polytechnic",
            GradeCategory::University => "University",
        }
    }
}

/// One entry of the canonical grade catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GradeOption {
    pub value: &'static str,
    pub label: &'static str,
    pub short_label: &'static str,
    pub category: GradeCategory,
}

const fn option(
    value: &'static str,
    label: &'static str,
    short_label: &'static str,
    category: GradeCategory,
) -> GradeOption {
    GradeOption {
        value,
        label,
        short_label,
        category,
    }
}

/// Every grade the client recognizes, in display order.
pub static GRADE_OPTIONS: [GradeOption; 19] = [
    option("p1", "Primary 1", "P 1", GradeCategory::PrimarySchool),
    option("p2", "Primary 2", "P 2", GradeCategory::PrimarySchool),
    option("p3", "Primary 3", "P 3", GradeCategory::PrimarySchool),
    option("p4", "Primary 4", "P 4", GradeCategory::PrimarySchool),
    option("p5", "Primary 5", "P 5", GradeCategory::PrimarySchool),
    option("p6", "Primary 6", "P 6", GradeCategory::PrimarySchool),
    option("sec1", "Secondary 1", "Sec 1", GradeCategory::SecondarySchool),
    option("sec2", "Secondary 2", "Sec 2", GradeCategory::SecondarySchool),
    option("sec3", "Secondary 3", "Sec 3", GradeCategory::SecondarySchool),
    option("sec4", "Secondary 4", "Sec 4", GradeCategory::SecondarySchool),
    option("jc1", "Junior College 1", "JC 1", GradeCategory::JuniorCollege),
    option("jc2", "Junior College 2", "JC 2", GradeCategory::JuniorCollege),
    option("poly1", "Polytechnic Year 1", "Poly 1", GradeCategory::Polytechnic),
    option("poly2", "Polytechnic Year 2", "Poly 2", GradeCategory::Polytechnic),
    option("poly3", "Polytechnic Year 3", "Poly 3", GradeCategory::Polytechnic),
    option("uni1", "University Year 1", "Uni 1", GradeCategory::University),
    option("uni2", "University Year 2", "Uni 2", GradeCategory::University),
    option("uni3", "University Year 3", "Uni 3", GradeCategory::University),
    option("uni4", "University Year 4", "Uni 4", GradeCategory::University),
];

/// Catalog entries belonging to one category, in display order.
pub fn options_in(category: GradeCategory) -> impl Iterator<Item = &'static GradeOption> {
    GRADE_OPTIONS
        .iter()
        .filter(move |option| option.category == category)
}

/// A user's education level as sent on the wire (`sec1`, `jc2`, ...).
///
/// Values outside the catalog are kept verbatim so a newer backend taxonomy
/// round-trips unchanged.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Grade(String);

impl Grade {
    /// Parse and normalize a grade value.
    ///
    /// # Errors
    ///
    /// Returns `GradeParseError::Empty` for blank input.
    pub fn parse(raw: &str) -> Result<Self, GradeParseError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(GradeParseError::Empty);
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Catalog entry for this grade, if recognized.
    #[must_use]
    pub fn option(&self) -> Option<&'static GradeOption> {
        GRADE_OPTIONS.iter().find(|option| option.value == self.0)
    }

    #[must_use]
    pub fn is_recognized(&self) -> bool {
        self.option().is_some()
    }

    #[must_use]
    pub fn category(&self) -> Option<GradeCategory> {
        self.option().map(|option| option.category)
    }

    /// Long label ("Secondary 1"); unknown grades are upper-cased.
    #[must_use]
    pub fn label(&self) -> String {
        self.option()
            .map_or_else(|| self.0.to_ascii_uppercase(), |option| option.label.to_string())
    }

    /// Compact label used in the sidebar ("Sec 1").
    #[must_use]
    pub fn short_label(&self) -> String {
        self.option().map_or_else(
            || self.0.to_ascii_uppercase(),
            |option| option.short_label.to_string(),
        )
    }
}

impl From<&GradeOption> for Grade {
    fn from(option: &GradeOption) -> Self {
        Self(option.value.to_string())
    }
}

impl TryFrom<String> for Grade {
    type Error = GradeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Grade> for String {
    fn from(grade: Grade) -> Self {
        grade.0
    }
}

impl FromStr for Grade {
    type Err = GradeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Debug for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Grade({})", self.0)
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `deserialize_with` helper for optional grades; blank strings become `None`.
///
/// # Errors
///
/// Returns a deserializer error only if the value is not a string or null.
pub fn deserialize_optional_grade<'de, D>(deserializer: D) -> Result<Option<Grade>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(|value| Grade::parse(value).ok()))
}

/// Display text for an optional grade, as shown in the dashboard header.
#[must_use]
pub fn format_grade(grade: Option<&Grade>) -> String {
    grade.map_or_else(|| "No Grade".to_string(), Grade::short_label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_values_are_unique_and_parse_back() {
        for (idx, option) in GRADE_OPTIONS.iter().enumerate() {
            let grade = Grade::parse(option.value).unwrap();
            assert_eq!(grade.option(), Some(option));
            assert!(
                GRADE_OPTIONS[idx + 1..]
                    .iter()
                    .all(|other| other.value != option.value)
            );
        }
    }

    #[test]
    fn parse_normalizes_case_and_whitespace() {
        let grade = Grade::parse("  SEC3 ").unwrap();
        assert_eq!(grade.as_str(), "sec3");
        assert_eq!(grade.label(), "Secondary 3");
        assert_eq!(grade.short_label(), "Sec 3");
        assert_eq!(grade.category(), Some(GradeCategory::SecondarySchool));
    }

    #[test]
    fn unknown_grade_is_preserved_and_uppercased() {
        let grade = Grade::parse("ite2").unwrap();
        assert!(!grade.is_recognized());
        assert_eq!(grade.label(), "ITE2");
        assert_eq!(format_grade(Some(&grade)), "ITE2");
        assert_eq!(format_grade(None), "No Grade");
    }

    #[test]
    fn wire_values_are_normalized_on_deserialize() {
        let grade: Grade = serde_json::from_str("\"JC1\"").unwrap();
        assert_eq!(grade.as_str(), "jc1");
        assert_eq!(serde_json::to_string(&grade).unwrap(), "\"jc1\"");
    }

    #[test]
    fn blank_grade_is_rejected() {
        assert_eq!(Grade::parse("   "), Err(GradeParseError::Empty));
    }

    #[test]
    fn every_category_has_options() {
        for category in GradeCategory::ALL {
            assert!(options_in(category).count() > 0, "{}", category.label());
        }
        assert_eq!(options_in(GradeCategory::Polytechnic).count(), 3);
    }
}
