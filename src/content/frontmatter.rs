//! Front-matter parsing
//!
//! Content files start with an optional YAML block delimited by `---` lines,
//! followed by the free-form markdown body. Each collection has its own typed
//! front matter; unknown keys are kept in a flattened map and ignored.

use chrono::{DateTime, Local, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

/// Custom deserializer that handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                vec.push(item);
            }
            Ok(vec)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Raw front matter of a post file
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct PostFrontMatter {
    pub title: Option<String>,
    pub date: Option<String>,
    pub summary: Option<String>,
    #[serde(deserialize_with = "string_or_vec", default)]
    pub tags: Vec<String>,
    pub status: Option<String>,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl PostFrontMatter {
    /// Parse the date string into a DateTime
    pub fn parse_date(&self) -> Option<DateTime<Local>> {
        self.date.as_deref().and_then(parse_date_string)
    }
}

/// An external link entry in project front matter
#[derive(Debug, Clone, Deserialize)]
pub struct FrontMatterLink {
    pub label: String,
    pub href: String,
}

/// Raw front matter of a project file
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ProjectFrontMatter {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub role: Option<String>,
    #[serde(deserialize_with = "string_or_vec", default)]
    pub stack: Vec<String>,
    pub links: Vec<FrontMatterLink>,
    pub featured: bool,
    pub status: Option<String>,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

/// Split a file into its YAML front-matter block and the body.
///
/// A file without an opening `---`, or without a closing one, carries no front
/// matter; the whole content is the body.
pub fn split(content: &str) -> (Option<&str>, &str) {
    let trimmed = content.trim_start();
    let Some(rest) = trimmed.strip_prefix("---") else {
        return (None, content);
    };
    let rest = rest.trim_start_matches(['\n', '\r']);

    match rest.find("\n---") {
        Some(end_pos) => {
            let yaml = &rest[..end_pos];
            let body = rest[end_pos + 4..].trim_start_matches(['\n', '\r']);
            (Some(yaml), body)
        }
        None => (None, content),
    }
}

/// Parse typed front matter from file contents.
/// Returns (front_matter, body); invalid YAML inside the delimiters is an error.
pub fn parse<T>(content: &str) -> Result<(T, &str), serde_yaml::Error>
where
    T: DeserializeOwned + Default,
{
    match split(content) {
        (Some(yaml), body) if !yaml.trim().is_empty() => {
            let fm = serde_yaml::from_str::<T>(yaml)?;
            Ok((fm, body))
        }
        (_, body) => Ok((T::default(), body)),
    }
}

/// Parse a date string in the formats content authors actually use
pub fn parse_date_string(s: &str) -> Option<DateTime<Local>> {
    let s = s.trim();

    let datetime_formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(DateTime::from_naive_utc_and_offset(
                dt,
                *Local::now().offset(),
            ));
        }
    }

    let date_formats = ["%Y-%m-%d", "%Y/%m/%d"];
    for fmt in date_formats {
        if let Ok(d) = chrono::NaiveDate::parse_from_str(s, fmt) {
            let dt = d.and_hms_opt(0, 0, 0)?;
            return Some(DateTime::from_naive_utc_and_offset(
                dt,
                *Local::now().offset(),
            ));
        }
    }

    // ISO 8601 with an explicit offset
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local));
    }

    None
}
