//! Blog post entity, its listing and taxonomy helpers

use crate::core::text::{self, WORDS_PER_MINUTE};
use crate::core::{BlogError, Collation, Entity, FieldValue, Patchable, Result};
use crate::listing::{Direction, Listable, ListingSpec, MatchKind, PredicateDescriptor, SortKey};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;
use validator::Validate;

/// Number of related posts returned when the caller does not say
pub const DEFAULT_RELATED_LIMIT: usize = 3;

/// Byline shown with a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PostAuthor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// A blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<PostAuthor>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_time: Option<u32>,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub comments: u64,
    #[serde(default)]
    pub draft: bool,
}

fn counter(value: u64) -> FieldValue {
    FieldValue::Integer(i64::try_from(value).unwrap_or(i64::MAX))
}

impl Entity for Post {
    fn resource_name() -> &'static str {
        "posts"
    }

    fn resource_name_singular() -> &'static str {
        "post"
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(FieldValue::Text(self.id.clone())),
            "title" => Some(FieldValue::Text(self.title.clone())),
            "slug" => Some(FieldValue::Text(self.slug.clone())),
            "description" => self.description.clone().map(FieldValue::Text),
            "content" => Some(FieldValue::Text(self.content.clone())),
            "cover" => self.cover.clone().map(FieldValue::Text),
            "category" => self.category.clone().map(FieldValue::Text),
            "tags" => Some(FieldValue::List(self.tags.clone())),
            "author" => self.author.as_ref().map(|a| FieldValue::Text(a.name.clone())),
            "publishedAt" => self.published_at.map(FieldValue::Timestamp),
            "createdAt" => Some(FieldValue::Timestamp(self.created_at)),
            "updatedAt" => Some(FieldValue::Timestamp(self.updated_at)),
            "featured" => Some(FieldValue::Boolean(self.featured)),
            "readingTime" => self.reading_time.map(|m| FieldValue::Integer(i64::from(m))),
            "views" => Some(counter(self.views)),
            "likes" => Some(counter(self.likes)),
            "comments" => Some(counter(self.comments)),
            "draft" => Some(FieldValue::Boolean(self.draft)),
            _ => None,
        }
    }
}

/// Listing descriptor for posts
pub static POST_LISTING: ListingSpec = ListingSpec {
    name: "posts",
    search_fields: &["title", "description", "content"],
    predicates: &[
        PredicateDescriptor {
            selector: "category",
            field: "category",
            kind: MatchKind::Equals,
        },
        PredicateDescriptor {
            selector: "tag",
            field: "tags",
            kind: MatchKind::Contains,
        },
    ],
    sort_keys: &[
        SortKey {
            id: "publishedAt",
            field: "publishedAt",
            direction: Direction::Descending,
            collation: Collation::Chronological,
        },
        SortKey {
            id: "title",
            field: "title",
            direction: Direction::Ascending,
            collation: Collation::Locale,
        },
        SortKey {
            id: "readingTime",
            field: "readingTime",
            direction: Direction::Ascending,
            collation: Collation::Numeric,
        },
        SortKey {
            id: "views",
            field: "views",
            direction: Direction::Descending,
            collation: Collation::Numeric,
        },
        SortKey {
            id: "likes",
            field: "likes",
            direction: Direction::Descending,
            collation: Collation::Numeric,
        },
        SortKey {
            id: "createdAt",
            field: "createdAt",
            direction: Direction::Descending,
            collation: Collation::Chronological,
        },
    ],
    default_sort: "publishedAt",
    default_limit: 12,
};

impl Listable for Post {
    fn listing() -> &'static ListingSpec {
        &POST_LISTING
    }
}

fn not_blank(value: &str) -> std::result::Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        let mut err = validator::ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Payload for creating a post
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct NewPost {
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    #[validate(custom(function = "not_blank"))]
    pub content: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    #[validate(url(message = "cover must be a URL"))]
    pub cover: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub author: Option<PostAuthor>,
    pub published_at: Option<DateTime<Utc>>,
    pub featured: bool,
    pub draft: bool,
}

impl NewPost {
    /// Validate and turn the payload into a stored post
    pub fn into_post(self) -> Result<Post> {
        self.validate()?;

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let slug = self
            .slug
            .as_deref()
            .map(text::generate_slug)
            .filter(|s| !s.is_empty())
            .or_else(|| Some(text::generate_slug(&self.title)).filter(|s| !s.is_empty()))
            .unwrap_or_else(|| id.clone());
        let reading_time = text::reading_time(&self.content, WORDS_PER_MINUTE);

        Ok(Post {
            id,
            title: self.title.trim().to_string(),
            slug,
            description: self.description,
            content: self.content,
            cover: self.cover,
            category: self.category.filter(|c| !c.is_empty()),
            tags: self.tags,
            author: self.author,
            published_at: Some(self.published_at.unwrap_or(now)),
            created_at: now,
            updated_at: now,
            featured: self.featured,
            reading_time: Some(reading_time),
            views: 0,
            likes: 0,
            comments: 0,
            draft: self.draft,
        })
    }
}

/// Partial update for a post; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct PostPatch {
    #[validate(custom(function = "not_blank"))]
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    #[validate(custom(function = "not_blank"))]
    pub content: Option<String>,
    #[validate(url(message = "cover must be a URL"))]
    pub cover: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub author: Option<PostAuthor>,
    pub published_at: Option<DateTime<Utc>>,
    pub featured: Option<bool>,
    pub draft: Option<bool>,
}

impl PostPatch {
    /// Validate the patch, mapping failures to [`BlogError::Validation`]
    pub fn checked(self) -> Result<Self> {
        self.validate().map_err(BlogError::from)?;
        Ok(self)
    }
}

impl Patchable for Post {
    type Patch = PostPatch;

    fn apply_patch(&mut self, patch: PostPatch) {
        if let Some(title) = patch.title {
            self.title = title.trim().to_string();
        }
        // A slug that reduces to nothing keeps the current one
        if let Some(slug) = patch.slug.as_deref().map(text::generate_slug).filter(|s| !s.is_empty()) {
            self.slug = slug;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(content) = patch.content {
            self.reading_time = Some(text::reading_time(&content, WORDS_PER_MINUTE));
            self.content = content;
        }
        if let Some(cover) = patch.cover {
            self.cover = Some(cover);
        }
        if let Some(category) = patch.category {
            self.category = Some(category).filter(|c| !c.is_empty());
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(author) = patch.author {
            self.author = Some(author);
        }
        if let Some(published_at) = patch.published_at {
            self.published_at = Some(published_at);
        }
        if let Some(featured) = patch.featured {
            self.featured = featured;
        }
        if let Some(draft) = patch.draft {
            self.draft = draft;
        }
        self.updated_at = Utc::now().max(self.updated_at);
    }
}

// === Taxonomy ===

/// Sorted distinct categories
pub fn categories(posts: &[Post]) -> Vec<String> {
    posts
        .iter()
        .filter_map(|p| p.category.clone())
        .filter(|c| !c.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorted distinct tags
pub fn tags(posts: &[Post]) -> Vec<String> {
    posts
        .iter()
        .flat_map(|p| p.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn posts_by_category<'a>(posts: &'a [Post], category: &str) -> Vec<&'a Post> {
    posts
        .iter()
        .filter(|p| p.category.as_deref() == Some(category))
        .collect()
}

pub fn posts_by_tag<'a>(posts: &'a [Post], tag: &str) -> Vec<&'a Post> {
    posts
        .iter()
        .filter(|p| p.tags.iter().any(|t| t == tag))
        .collect()
}

/// Other posts sharing the category or at least one tag, in collection order
///
/// Posts without a category never match on category.
pub fn related_posts<'a>(posts: &'a [Post], current: &Post, limit: usize) -> Vec<&'a Post> {
    posts
        .iter()
        .filter(|p| p.id != current.id)
        .filter(|p| {
            let same_category = p.category.is_some() && p.category == current.category;
            same_category || p.tags.iter().any(|t| current.tags.contains(t))
        })
        .take(limit)
        .collect()
}

/// Neighbours of a post by position
#[derive(Debug, Clone, Copy, Default)]
pub struct Surrounding<'a> {
    pub previous: Option<&'a Post>,
    pub next: Option<&'a Post>,
}

/// Previous and next posts around `id`; both `None` when `id` is absent
pub fn surrounding<'a>(posts: &'a [Post], id: &str) -> Surrounding<'a> {
    let Some(index) = posts.iter().position(|p| p.id == id) else {
        return Surrounding::default();
    };
    Surrounding {
        previous: index.checked_sub(1).and_then(|i| posts.get(i)),
        next: posts.get(index + 1),
    }
}

/// The first `limit` featured posts
pub fn featured(posts: &[Post], limit: usize) -> Vec<&Post> {
    posts.iter().filter(|p| p.featured).take(limit).collect()
}

// === Seed data ===

struct Seed {
    title: &'static str,
    slug: &'static str,
    description: &'static str,
    content: &'static str,
    category: &'static str,
    tags: &'static [&'static str],
    cover: &'static str,
    featured: bool,
    days_ago: i64,
    stats: (u64, u64, u64),
}

const SEEDS: &[Seed] = &[
    Seed {
        title: "我的第一篇测试文章",
        slug: "my-first-test-post",
        description: "这是一篇用于测试 Markdown 渲染的文章",
        content: "# 我的第一篇测试文章\n\n这是一篇用于测试 **Markdown** 渲染的文章。\n\n## 子标题\n\n- 列表项 1\n- 列表项 2\n- 列表项 3\n\n```javascript\nfunction helloWorld() {\n    console.log(\"Hello, World!\");\n}\n```\n\n> 这是一个引用块\n\n[访问 GitHub](https://github.com)\n",
        category: "技术",
        tags: &["测试", "Markdown"],
        cover: "https://images.unsplash.com/photo-1498050108023-c5249f4df085?w=800&h=400&fit=crop",
        featured: false,
        days_ago: 0,
        stats: (123, 45, 7),
    },
    Seed {
        title: "富文本内容测试",
        slug: "rich-text-test",
        description: "包含各种 Markdown 元素的测试文章",
        content: "# 富文本内容测试\n\n**粗体文本** 和 *斜体文本* 以及 ***粗斜体***\n\n~~删除线文本~~\n\n| 列 1 | 列 2 |\n| --- | --- |\n| a | b |\n\n- [x] 已完成\n- [ ] 未完成\n",
        category: "测试",
        tags: &["富文本", "Markdown", "测试"],
        cover: "https://images.unsplash.com/photo-1486312338219-ce68d2c6f44d?w=800&h=400&fit=crop",
        featured: true,
        days_ago: 1,
        stats: (456, 78, 12),
    },
    Seed {
        title: "Designing calm interfaces",
        slug: "designing-calm-interfaces",
        description: "Notes on restraint in product design",
        content: "# Designing calm interfaces\n\nGood interfaces get out of the way.\n\n## Whitespace\n\nGive content room to breathe.\n",
        category: "设计",
        tags: &["UI设计", "最佳实践"],
        cover: "https://images.unsplash.com/photo-1561070791-2526d30994b5?w=800&h=400&fit=crop",
        featured: true,
        days_ago: 3,
        stats: (890, 120, 31),
    },
];

/// Posts written on first start when the store is empty
pub fn sample_posts() -> Vec<Post> {
    let now = Utc::now();
    SEEDS
        .iter()
        .enumerate()
        .map(|(index, seed)| {
            let at = now - Duration::days(seed.days_ago);
            let (views, likes, comments) = seed.stats;
            Post {
                id: (index + 1).to_string(),
                title: seed.title.to_string(),
                slug: seed.slug.to_string(),
                description: Some(seed.description.to_string()),
                content: seed.content.to_string(),
                cover: Some(seed.cover.to_string()),
                category: Some(seed.category.to_string()),
                tags: seed.tags.iter().map(|t| t.to_string()).collect(),
                author: Some(PostAuthor {
                    name: "BlogFlow".to_string(),
                    avatar: None,
                }),
                published_at: Some(at),
                created_at: at,
                updated_at: at,
                featured: seed.featured,
                reading_time: Some(text::reading_time(seed.content, WORDS_PER_MINUTE)),
                views,
                likes,
                comments,
                draft: false,
            }
        })
        .collect()
}
