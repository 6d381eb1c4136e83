//! Record types served by the built-in listings.
//!
//! Field names follow the JSON the listings are loaded from (camelCase), so
//! the same names work in profiles, query parameters and structured output.

use kiln_query::QueryText;
use kiln_query_macros::Queryable;
use serde::{Deserialize, Serialize};

/// A tag attached to a forum post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: u32,
    pub name: String,
}

impl QueryText for Tag {
    fn query_text(&self) -> Option<&str> {
        Some(self.name.as_str())
    }
}

/// A forum thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable)]
#[serde(rename_all = "camelCase")]
pub struct ForumPost {
    #[query(Number)]
    pub id: u32,

    #[query(Text, rename = "authorNickname")]
    pub author_nickname: String,

    #[query(Text, rename = "categoryName")]
    pub category_name: String,

    #[query(Text, searchable)]
    pub title: String,

    #[query(Text)]
    pub content: String,

    #[query(Bool, rename = "isPinned")]
    pub is_pinned: bool,

    #[query(Number, rename = "commentCount")]
    pub comment_count: u32,

    #[query(Number, rename = "likeCount")]
    pub like_count: u32,

    #[query(Timestamp, rename = "lastActivityAt")]
    pub last_activity_at: String,

    #[query(Timestamp, rename = "createdAt")]
    pub created_at: String,

    #[query(TextList, searchable)]
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// A work in the public portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioWork {
    #[query(Number)]
    pub id: u32,

    #[query(Text, searchable, rename = "artistName")]
    pub artist_name: String,

    #[query(Text, searchable)]
    pub title: String,

    #[query(Bool, rename = "isEditorsChoice")]
    pub is_editors_choice: bool,

    #[query(Number, rename = "upvotesCount")]
    pub upvotes_count: u32,

    #[query(Timestamp, rename = "createdAt")]
    pub created_at: String,

    #[query(Timestamp, rename = "updatedAt")]
    pub updated_at: String,

    #[query(TextList, searchable)]
    #[serde(default)]
    pub tags: Vec<String>,

    #[query(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// A private note attached to another entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    #[query(Number)]
    pub id: u32,

    #[query(Text, searchable)]
    pub title: String,

    #[query(Text, searchable)]
    pub content: String,

    #[query(Text, rename = "entityType")]
    pub entity_type: String,

    #[query(Number, rename = "entityId")]
    pub entity_id: u32,

    #[query(Text, searchable, rename = "entityTitle")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_title: Option<String>,

    #[query(Timestamp, rename = "createdAt")]
    pub created_at: String,

    #[query(Timestamp, rename = "updatedAt")]
    pub updated_at: String,
}

/// Kind of engage activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityType {
    Festival,
    Fair,
    Museum,
}

impl ActivityType {
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityType::Festival => "Festival",
            ActivityType::Fair => "Fair",
            ActivityType::Museum => "Museum",
        }
    }
}

impl QueryText for ActivityType {
    fn query_text(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

/// A festival, fair or museum on the engage page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[query(Text)]
    pub id: String,

    #[query(Text)]
    pub slug: String,

    #[query(Text, searchable)]
    pub title: String,

    #[query(Text, rename = "type")]
    #[serde(rename = "type")]
    pub kind: ActivityType,

    #[query(Text, searchable)]
    pub introduction: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_query::{FieldType, Queryable, Value};

    #[test]
    fn forum_post_reads_tags_by_name() {
        let post = ForumPost {
            id: 3,
            author_nickname: "D. Miller".into(),
            category_name: "Showcase".into(),
            title: "Showcase: My First Celadon Piece".into(),
            content: String::new(),
            is_pinned: false,
            comment_count: 19,
            like_count: 88,
            last_activity_at: "2025-08-21T15:05:00Z".into(),
            created_at: "2025-08-20T09:00:00Z".into(),
            tags: vec![
                Tag { id: 1, name: "exhibition".into() },
                Tag { id: 2, name: "technique".into() },
            ],
        };

        assert_eq!(
            post.field_value(ForumPost::TAGS),
            Value::TextList(vec!["exhibition", "technique"])
        );
        assert_eq!(
            ForumPost::schema().search_fields().collect::<Vec<_>>(),
            vec!["title", "tags"]
        );
    }

    #[test]
    fn activity_type_is_text() {
        assert_eq!(Activity::schema().type_of(Activity::TYPE), Some(FieldType::Text));

        let activity: Activity = serde_json::from_str(
            r#"{"id":"2","slug":"modern-art-fair","title":"Modern Art Fair","type":"Fair","introduction":""}"#,
        )
        .unwrap();
        assert_eq!(activity.field_value("type"), Value::Text("Fair"));
    }

    #[test]
    fn note_without_entity_title() {
        let note: Note = serde_json::from_str(
            r#"{"id":5,"title":"Questions","content":"Ask about ash","entityType":"activity","entityId":6,"createdAt":"2025-09-05T16:45:00Z","updatedAt":"2025-09-05T16:45:00Z"}"#,
        )
        .unwrap();
        assert_eq!(note.field_value(Note::ENTITY_TITLE), Value::None);
    }
}
