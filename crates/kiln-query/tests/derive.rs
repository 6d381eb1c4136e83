//! Tests for `#[derive(Queryable)]` against the engine.

use kiln_query::{
    FieldType, ListQuery, Number, QueryEnum, QueryError, Queryable, Timestamp, Value,
};
use kiln_query_macros::Queryable;

#[derive(Debug, Clone, Copy, PartialEq)]
enum ActivityType {
    Festival,
    Fair,
    Museum,
}

impl QueryEnum for ActivityType {
    fn query_discriminant(&self) -> u32 {
        match self {
            ActivityType::Festival => 0,
            ActivityType::Fair => 1,
            ActivityType::Museum => 2,
        }
    }
}

#[derive(Debug, Clone, Queryable)]
struct Activity {
    #[query(Number)]
    id: u32,

    #[query(Text, searchable)]
    title: String,

    #[query(Enum, rename = "type")]
    kind: ActivityType,

    #[query(Text, searchable)]
    introduction: Option<String>,

    #[query(TextList, searchable)]
    tags: Vec<String>,

    #[query(Timestamp, rename = "startsAt")]
    starts_at: String,

    #[query(Bool, rename = "isFeatured")]
    is_featured: bool,

    #[query(skip)]
    #[allow(dead_code)]
    slug: String,

    #[allow(dead_code)]
    image_url: String,
}

fn activity(id: u32, title: &str, kind: ActivityType, starts_at: &str) -> Activity {
    Activity {
        id,
        title: title.to_string(),
        kind,
        introduction: None,
        tags: Vec::new(),
        starts_at: starts_at.to_string(),
        is_featured: id % 2 == 0,
        slug: title.to_lowercase().replace(' ', "-"),
        image_url: String::new(),
    }
}

fn activities() -> Vec<Activity> {
    let mut list = vec![
        activity(1, "Pottery Festival", ActivityType::Festival, "2025-09-10T10:00:00Z"),
        activity(2, "Ceramics Fair", ActivityType::Fair, "2025-10-01T09:00:00Z"),
        activity(3, "Museum of Clay", ActivityType::Museum, "2025-08-15T12:00:00Z"),
        activity(4, "Autumn Kiln Opening", ActivityType::Festival, "tbd"),
    ];
    list[2].introduction = Some("A permanent collection of glazed stoneware".to_string());
    list[3].tags = vec!["Stoneware".to_string(), "wood-fired".to_string()];
    list
}

#[test]
fn generates_field_constants() {
    assert_eq!(Activity::ID, "id");
    assert_eq!(Activity::TITLE, "title");
    assert_eq!(Activity::TYPE, "type");
    assert_eq!(Activity::STARTS_AT, "startsAt");
    assert_eq!(Activity::IS_FEATURED, "isFeatured");
}

#[test]
fn generates_schema() {
    let schema = Activity::schema();

    assert_eq!(schema.len(), 7);
    assert_eq!(schema.type_of("type"), Some(FieldType::Enum));
    assert_eq!(schema.type_of("tags"), Some(FieldType::TextList));
    assert_eq!(schema.type_of("startsAt"), Some(FieldType::Timestamp));
    assert!(!schema.contains("slug"));
    assert!(!schema.contains("image_url"));
    assert_eq!(
        schema.search_fields().collect::<Vec<_>>(),
        vec!["title", "introduction", "tags"]
    );
}

#[test]
fn generates_field_values() {
    let list = activities();

    assert_eq!(list[0].field_value("id"), Value::Number(Number::U64(1)));
    assert_eq!(list[0].field_value("title"), Value::Text("Pottery Festival"));
    assert_eq!(list[1].field_value("type"), Value::Enum(1));
    assert_eq!(list[0].field_value("introduction"), Value::None);
    assert_eq!(
        list[2].field_value("startsAt"),
        Value::Timestamp(Timestamp::parse("2025-08-15T12:00:00Z").unwrap())
    );
    assert_eq!(list[3].field_value("startsAt"), Value::None);
    assert_eq!(list[1].field_value("isFeatured"), Value::Bool(true));
    assert_eq!(list[0].field_value("slug"), Value::None);
}

#[test]
fn run_on_uses_derived_schema() {
    let list = activities();

    let page = ListQuery::new()
        .filter_in_enum(Activity::TYPE, [ActivityType::Festival.query_discriminant()])
        .sort_asc(Activity::STARTS_AT)
        .run_on(&list)
        .unwrap();

    let ids: Vec<u32> = page.items.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![1, 4]);
}

#[test]
fn search_covers_optional_and_list_fields() {
    let list = activities();

    let page = ListQuery::new().search("stoneware").run_on(&list).unwrap();
    let ids: Vec<u32> = page.items.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![3, 4]);
}

#[test]
fn skipped_fields_are_unknown() {
    let list = activities();

    let err = ListQuery::new().sort_asc("slug").run_on(&list).unwrap_err();
    assert!(matches!(err, QueryError::UnknownField { .. }));
}
