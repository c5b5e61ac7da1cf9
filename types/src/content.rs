//! Typed records for the site's content collections.
//!
//! Shapes mirror the hosted tables. Collections are fetched ordered and
//! bounded server-side, so list records carry the `order_index` column the
//! query sorts on. Fields the site renders optionally are `Option` here;
//! absence is content, not an error.

use serde::Deserialize;

/// The single "about" record. The table holds at most one row.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AboutPage {
    pub headline: String,
    pub body: String,
    #[serde(default)]
    pub portrait_url: Option<String>,
}

/// One entry of the skills grid.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Skill {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    /// Self-assessed proficiency, 0-100, when the site renders a meter.
    #[serde(default)]
    pub level: Option<u8>,
    #[serde(default)]
    pub order_index: i64,
}

/// One portfolio project card.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Project {
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub order_index: i64,
}

/// One image of the gallery.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GalleryItem {
    pub image_url: String,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub order_index: i64,
}

/// The single contact record. The table holds at most one row.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContactCard {
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_deserializes_with_optional_fields_absent() {
        let project: Project =
            serde_json::from_str(r#"{"title": "Vitrine", "summary": "Portfolio kernel"}"#)
                .expect("valid project");
        assert_eq!(project.title, "Vitrine");
        assert!(project.tags.is_empty());
        assert_eq!(project.url, None);
        assert_eq!(project.order_index, 0);
    }

    #[test]
    fn skill_level_is_optional() {
        let skill: Skill =
            serde_json::from_str(r#"{"name": "Rust", "level": 80, "order_index": 2}"#)
                .expect("valid skill");
        assert_eq!(skill.level, Some(80));
        assert_eq!(skill.order_index, 2);

        let bare: Skill = serde_json::from_str(r#"{"name": "CSS"}"#).expect("valid skill");
        assert_eq!(bare.level, None);
    }

    #[test]
    fn about_page_requires_headline_and_body() {
        let result: Result<AboutPage, _> = serde_json::from_str(r#"{"headline": "Hi"}"#);
        assert!(result.is_err());
    }
}
