//! The blog's post model and its sample rows.

use chrono::{Duration, NaiveDate};
use serde_json::{json, Value};
use viewcraft_db::fields::{FieldDef, FieldType};
use viewcraft_db::model::ModelMeta;
use viewcraft_db::query::OrderBy;

const AUTHORS: [&str; 3] = ["alice", "bob", "carol"];
const CATEGORIES: [&str; 3] = ["rust", "web", "databases"];

/// Metadata for `blog.post`, newest first.
pub fn post_meta() -> ModelMeta {
    ModelMeta::new("blog", "post")
        .field(FieldDef::new("id", FieldType::AutoField))
        .field(FieldDef::new("title", FieldType::CharField))
        .field(FieldDef::new("author", FieldType::CharField))
        .field(FieldDef::new("category", FieldType::CharField))
        .field(FieldDef::new("views", FieldType::IntegerField))
        .field(FieldDef::new("published", FieldType::BooleanField))
        .field(FieldDef::new("created", FieldType::DateField))
        .ordering(vec![OrderBy::desc("created")])
}

/// Generates `count` posts, one per day starting 2024-01-01.
pub fn sample_posts(count: usize) -> Vec<Value> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();
    (0..count)
        .map(|i| {
            let created = start + Duration::days(i64::try_from(i).unwrap_or(i64::MAX));
            json!({
                "id": i + 1,
                "title": format!("Post {} about {}", i + 1, CATEGORIES[i % CATEGORIES.len()]),
                "author": AUTHORS[i % AUTHORS.len()],
                "category": CATEGORIES[i % CATEGORIES.len()],
                "views": (i * 37) % 500,
                "published": i % 4 != 0,
                "created": created.format("%Y-%m-%d").to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_posts() {
        let posts = sample_posts(5);
        assert_eq!(posts.len(), 5);
        assert_eq!(posts[0]["created"], "2024-01-01");
        assert_eq!(posts[4]["created"], "2024-01-05");
        assert_eq!(posts[1]["author"], "bob");
        assert_eq!(posts[0]["published"], false);
    }

    #[test]
    fn test_meta() {
        let meta = post_meta();
        assert_eq!(meta.db_table, "blog_post");
        assert!(meta.get_field("views").is_some());
    }
}
