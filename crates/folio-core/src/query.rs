//! Query Builder - turns filter/sort/paging requests into a [`QueryPlan`].
//!
//! A plan is entity-agnostic: a conjunction of [`Predicate`]s, one
//! [`Order`] and a [`Window`]. Repositories translate it into SQL, and
//! [`QueryPlan::apply`] evaluates the same plan over rows already in memory.
//!
//! Semantics both backends implement:
//! - predicates are ANDed;
//! - `search` ORs a case-insensitive substring match over several columns;
//! - `tag` is an exact membership test against a tag list;
//! - text columns sort by their lowercased value;
//! - ordering puts missing values last in both directions and breaks ties
//!   on the primary key;
//! - paging is offset based and never fails, an out-of-range page is empty.
//!
//! Lowercasing is Unicode-aware in memory and follows the database's
//! `LOWER` in SQL, so non-ASCII text may still order differently.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::PostStatus;

pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;
/// Largest offset SQL can bind, OFFSET being a signed `BIGINT`.
pub const MAX_OFFSET: u64 = i64::MAX as u64;

/// Every column a plan can reference, across all entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    Title,
    Slug,
    Excerpt,
    Content,
    Category,
    Status,
    Tags,
    Name,
    Description,
    Filename,
    CreatedAt,
    UpdatedAt,
    PublishedAt,
    UploadedAt,
    Views,
    Likes,
    Size,
}

impl Field {
    /// Columns holding free text, ordered case-insensitively.
    pub fn is_text(self) -> bool {
        matches!(
            self,
            Field::Title
                | Field::Slug
                | Field::Excerpt
                | Field::Content
                | Field::Category
                | Field::Name
                | Field::Description
                | Field::Filename
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Exact, case-sensitive equality.
    Equals { field: Field, value: String },
    /// Case-insensitive substring match on any of `fields`.
    Search { fields: Vec<Field>, needle: String },
    /// `tag` is an element of the list stored in `field`.
    HasTag { field: Field, tag: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    pub field: Field,
    pub direction: SortOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub page: u64,
    pub limit: u64,
}

impl Window {
    /// Clamp `page` to at least 1 and `limit` to `1..=MAX_LIMIT`.
    pub fn new(page: Option<u64>, limit: Option<u64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
        }
    }

    /// Rows to skip, capped at [`MAX_OFFSET`].
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit).min(MAX_OFFSET)
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    pub predicates: Vec<Predicate>,
    pub order: Order,
    pub window: Window,
}

/// One page of results plus what a caller needs to render pagination.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, window: Window) -> Self {
        Self {
            items,
            total,
            page: window.page,
            limit: window.limit,
            total_pages: total.div_ceil(window.limit),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
        }
    }
}

/// A comparable column value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey<'a> {
    Text(&'a str),
    Time(DateTime<Utc>),
    Number(i64),
    Id(Uuid),
}

impl SortKey<'_> {
    /// Text compares case-insensitively; other kinds by value.
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Text(a), SortKey::Text(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
            _ => self.cmp(other),
        }
    }
}

/// Rows that a [`QueryPlan`] can be evaluated against in memory.
pub trait Queryable {
    fn id(&self) -> Uuid;

    /// Textual value of a column, `None` when null or not applicable.
    fn text(&self, field: Field) -> Option<&str>;

    /// Elements of a list column.
    fn tags(&self, _field: Field) -> &[String] {
        &[]
    }

    fn sort_key(&self, field: Field) -> Option<SortKey<'_>>;
}

impl Predicate {
    pub fn matches<T: Queryable + ?Sized>(&self, row: &T) -> bool {
        match self {
            Predicate::Equals { field, value } => row.text(*field) == Some(value.as_str()),
            Predicate::Search { fields, needle } => {
                let needle = needle.to_lowercase();
                fields.iter().any(|f| {
                    row.text(*f)
                        .is_some_and(|text| text.to_lowercase().contains(&needle))
                })
            }
            Predicate::HasTag { field, tag } => row.tags(*field).iter().any(|t| t == tag),
        }
    }
}

impl QueryPlan {
    pub fn matches<T: Queryable + ?Sized>(&self, row: &T) -> bool {
        self.predicates.iter().all(|p| p.matches(row))
    }

    pub fn compare<T: Queryable + ?Sized>(&self, a: &T, b: &T) -> Ordering {
        let primary = match (a.sort_key(self.order.field), b.sort_key(self.order.field)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(x), Some(y)) => match self.order.direction {
                SortOrder::Asc => x.compare(&y),
                SortOrder::Desc => y.compare(&x),
            },
        };
        primary.then_with(|| a.id().cmp(&b.id()))
    }

    /// Filter, order and window an in-memory collection.
    pub fn apply<T: Queryable>(&self, rows: impl IntoIterator<Item = T>) -> Page<T> {
        let mut matching: Vec<T> = rows.into_iter().filter(|r| self.matches(r)).collect();
        let total = matching.len() as u64;
        matching.sort_by(|a, b| self.compare(a, b));

        let offset = usize::try_from(self.window.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(self.window.limit).unwrap_or(usize::MAX);
        let items = matching.into_iter().skip(offset).take(limit).collect();

        Page::new(items, total, self.window)
    }
}

/// Sorting and paging parameters common to every list request.
///
/// Sort values stay raw strings: unknown values fall back to the entity
/// default instead of failing.
#[derive(Debug, Clone, Default)]
pub struct ListParams {
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl ListParams {
    fn order(&self, parse_key: fn(&str) -> Option<Field>, default: Order) -> Order {
        let field = self
            .sort_by
            .as_deref()
            .and_then(|key| parse_key(&normalize_key(key)))
            .unwrap_or(default.field);
        let direction = self
            .sort_order
            .as_deref()
            .and_then(SortOrder::parse)
            .unwrap_or(default.direction);
        Order { field, direction }
    }

    fn window(&self) -> Window {
        Window::new(self.page, self.limit)
    }
}

/// `createdAt`, `created_at` and `CREATEDAT` all name the same key.
fn normalize_key(key: &str) -> String {
    key.trim().replace(['_', '-'], "").to_ascii_lowercase()
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn search(fields: &[Field], needle: &Option<String>) -> Option<Predicate> {
    non_blank(needle).map(|needle| Predicate::Search {
        fields: fields.to_vec(),
        needle: needle.to_string(),
    })
}

fn has_tag(tag: &Option<String>) -> Option<Predicate> {
    non_blank(tag).map(|tag| Predicate::HasTag {
        field: Field::Tags,
        tag: tag.to_string(),
    })
}

/// Filters accepted when listing posts.
#[derive(Debug, Clone, Default)]
pub struct PostQuery {
    pub category: Option<String>,
    pub status: Option<PostStatus>,
    pub tag: Option<String>,
    pub search: Option<String>,
    pub params: ListParams,
}

impl PostQuery {
    pub const SEARCH_FIELDS: [Field; 3] = [Field::Title, Field::Excerpt, Field::Content];
    pub const DEFAULT_ORDER: Order = Order {
        field: Field::CreatedAt,
        direction: SortOrder::Desc,
    };

    pub fn sort_field(key: &str) -> Option<Field> {
        match key {
            "createdat" => Some(Field::CreatedAt),
            "updatedat" => Some(Field::UpdatedAt),
            "publishedat" => Some(Field::PublishedAt),
            "title" => Some(Field::Title),
            "views" => Some(Field::Views),
            "likes" => Some(Field::Likes),
            _ => None,
        }
    }

    pub fn plan(&self) -> QueryPlan {
        let mut predicates = Vec::new();
        if let Some(category) = non_blank(&self.category) {
            predicates.push(Predicate::Equals {
                field: Field::Category,
                value: category.to_string(),
            });
        }
        if let Some(status) = self.status {
            predicates.push(Predicate::Equals {
                field: Field::Status,
                value: status.as_str().to_string(),
            });
        }
        predicates.extend(has_tag(&self.tag));
        predicates.extend(search(&Self::SEARCH_FIELDS, &self.search));

        QueryPlan {
            predicates,
            order: self.params.order(Self::sort_field, Self::DEFAULT_ORDER),
            window: self.params.window(),
        }
    }
}

/// Filters accepted when listing categories.
#[derive(Debug, Clone, Default)]
pub struct CategoryQuery {
    pub search: Option<String>,
    pub params: ListParams,
}

impl CategoryQuery {
    pub const SEARCH_FIELDS: [Field; 2] = [Field::Name, Field::Description];
    pub const DEFAULT_ORDER: Order = Order {
        field: Field::Name,
        direction: SortOrder::Asc,
    };

    pub fn sort_field(key: &str) -> Option<Field> {
        match key {
            "name" => Some(Field::Name),
            "createdat" => Some(Field::CreatedAt),
            "updatedat" => Some(Field::UpdatedAt),
            _ => None,
        }
    }

    pub fn plan(&self) -> QueryPlan {
        QueryPlan {
            predicates: search(&Self::SEARCH_FIELDS, &self.search).into_iter().collect(),
            order: self.params.order(Self::sort_field, Self::DEFAULT_ORDER),
            window: self.params.window(),
        }
    }
}

/// Filters accepted when listing gallery images.
#[derive(Debug, Clone, Default)]
pub struct ImageQuery {
    pub tag: Option<String>,
    pub search: Option<String>,
    pub params: ListParams,
}

impl ImageQuery {
    pub const SEARCH_FIELDS: [Field; 3] = [Field::Title, Field::Description, Field::Filename];
    pub const DEFAULT_ORDER: Order = Order {
        field: Field::CreatedAt,
        direction: SortOrder::Desc,
    };

    pub fn sort_field(key: &str) -> Option<Field> {
        match key {
            "createdat" => Some(Field::CreatedAt),
            "uploadedat" => Some(Field::UploadedAt),
            "title" => Some(Field::Title),
            "filename" => Some(Field::Filename),
            "size" => Some(Field::Size),
            _ => None,
        }
    }

    pub fn plan(&self) -> QueryPlan {
        let mut predicates: Vec<Predicate> = has_tag(&self.tag).into_iter().collect();
        predicates.extend(search(&Self::SEARCH_FIELDS, &self.search));

        QueryPlan {
            predicates,
            order: self.params.order(Self::sort_field, Self::DEFAULT_ORDER),
            window: self.params.window(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[derive(Debug, Clone)]
    struct Row {
        id: Uuid,
        title: String,
        excerpt: Option<String>,
        category: String,
        tags: Vec<String>,
        published_at: Option<DateTime<Utc>>,
        views: i64,
    }

    impl Row {
        fn new(n: u128, title: &str) -> Self {
            Self {
                id: Uuid::from_u128(n),
                title: title.to_string(),
                excerpt: None,
                category: "essays".to_string(),
                tags: vec![],
                published_at: None,
                views: 0,
            }
        }
    }

    impl Queryable for Row {
        fn id(&self) -> Uuid {
            self.id
        }

        fn text(&self, field: Field) -> Option<&str> {
            match field {
                Field::Title => Some(&self.title),
                Field::Excerpt => self.excerpt.as_deref(),
                Field::Category => Some(&self.category),
                _ => None,
            }
        }

        fn tags(&self, field: Field) -> &[String] {
            match field {
                Field::Tags => &self.tags,
                _ => &[],
            }
        }

        fn sort_key(&self, field: Field) -> Option<SortKey<'_>> {
            match field {
                Field::Title => Some(SortKey::Text(&self.title)),
                Field::PublishedAt => self.published_at.map(SortKey::Time),
                Field::Views => Some(SortKey::Number(self.views)),
                _ => None,
            }
        }
    }

    fn rows(n: u128) -> Vec<Row> {
        (0..n).map(|i| Row::new(i, &format!("Post {i:02}"))).collect()
    }

    fn params(page: u64, limit: u64) -> ListParams {
        ListParams {
            page: Some(page),
            limit: Some(limit),
            ..Default::default()
        }
    }

    #[test]
    fn test_pagination_over_fifteen_rows() {
        let query = PostQuery {
            params: params(2, 10),
            ..Default::default()
        };
        let page = query.plan().apply(rows(15));
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.total, 15);
        assert_eq!(page.total_pages, 2);

        let query = PostQuery {
            params: params(3, 10),
            ..Default::default()
        };
        let page = query.plan().apply(rows(15));
        assert!(page.items.is_empty());
        assert_eq!(page.total, 15);
    }

    #[test]
    fn test_window_clamps_out_of_range_values() {
        let window = Window::new(Some(0), Some(500));
        assert_eq!(window.page, 1);
        assert_eq!(window.limit, MAX_LIMIT);
        assert_eq!(Window::new(None, Some(0)).limit, 1);
        assert_eq!(Window::new(Some(3), Some(10)).offset(), 20);
    }

    #[test]
    fn test_offset_stays_within_bigint() {
        let window = Window::new(Some(1_000_000_000_000_000_000), Some(10));
        assert_eq!(window.offset(), MAX_OFFSET);
        assert_eq!(Window::new(Some(u64::MAX), Some(MAX_LIMIT)).offset(), MAX_OFFSET);
        assert!(i64::try_from(window.offset()).is_ok());

        let query = PostQuery {
            params: params(u64::MAX, 10),
            ..Default::default()
        };
        let page = query.plan().apply(rows(15));
        assert!(page.items.is_empty());
        assert_eq!(page.total, 15);
    }

    #[test]
    fn test_title_sort_ignores_case() {
        let mut input = vec![
            Row::new(1, "Charlie"),
            Row::new(2, "alpha"),
            Row::new(3, "Zeta"),
            Row::new(4, "Alpha"),
            Row::new(5, "bravo"),
        ];
        input.reverse();
        let query = PostQuery {
            params: ListParams {
                sort_by: Some("title".into()),
                sort_order: Some("asc".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let page = query.plan().apply(input);
        let titles: Vec<&str> = page.items.iter().map(|r| r.title.as_str()).collect();
        // Equal ignoring case, so the id decides.
        assert_eq!(titles, ["alpha", "Alpha", "bravo", "Charlie", "Zeta"]);
    }

    #[test]
    fn test_unknown_sort_falls_back_to_defaults() {
        let query = PostQuery {
            params: ListParams {
                sort_by: Some("popularity".into()),
                sort_order: Some("sideways".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(query.plan().order, PostQuery::DEFAULT_ORDER);
        assert_eq!(CategoryQuery::default().plan().order, CategoryQuery::DEFAULT_ORDER);

        let query = PostQuery {
            params: ListParams {
                sort_by: Some("published_at".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(query.plan().order.field, Field::PublishedAt);
        assert_eq!(query.plan().order.direction, SortOrder::Desc);
    }

    #[test]
    fn test_search_is_case_insensitive_across_columns() {
        let mut with_excerpt = Row::new(1, "Untitled");
        with_excerpt.excerpt = Some("All about RUST".into());
        let input = vec![with_excerpt, Row::new(2, "rusty nails"), Row::new(3, "Gardening")];

        let query = PostQuery {
            search: Some("  Rust ".into()),
            ..Default::default()
        };
        let page = query.plan().apply(input);
        assert_eq!(page.total, 2);
    }

    #[test]
    fn test_tag_filter_is_exact_membership() {
        let mut tagged = Row::new(1, "Tagged");
        tagged.tags = vec!["rust".into(), "writing".into()];
        let mut near_miss = Row::new(2, "Near miss");
        near_miss.tags = vec!["rustacean".into()];

        let query = PostQuery {
            tag: Some("rust".into()),
            ..Default::default()
        };
        let page = query.plan().apply(vec![tagged, near_miss]);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].title, "Tagged");
    }

    #[test]
    fn test_filters_combine_with_and() {
        let mut a = Row::new(1, "Rust essay");
        a.category = "essays".into();
        let mut b = Row::new(2, "Rust note");
        b.category = "notes".into();

        let query = PostQuery {
            category: Some("essays".into()),
            search: Some("rust".into()),
            ..Default::default()
        };
        let plan = query.plan();
        assert_eq!(plan.predicates.len(), 2);
        let page = plan.apply(vec![a, b]);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].title, "Rust essay");
    }

    #[test]
    fn test_blank_filters_are_ignored() {
        let query = PostQuery {
            category: Some("".into()),
            tag: Some("  ".into()),
            search: Some("".into()),
            ..Default::default()
        };
        assert!(query.plan().predicates.is_empty());
    }

    #[test]
    fn test_missing_values_sort_last_in_both_directions() {
        let mut early = Row::new(1, "early");
        early.published_at = Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let mut late = Row::new(2, "late");
        late.published_at = Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
        let never = Row::new(3, "never");

        for (order, expected) in [("asc", ["early", "late", "never"]), ("desc", ["late", "early", "never"])] {
            let query = PostQuery {
                params: ListParams {
                    sort_by: Some("publishedAt".into()),
                    sort_order: Some(order.into()),
                    ..Default::default()
                },
                ..Default::default()
            };
            let page = query
                .plan()
                .apply(vec![never.clone(), early.clone(), late.clone()]);
            let titles: Vec<&str> = page.items.iter().map(|r| r.title.as_str()).collect();
            assert_eq!(titles, expected);
        }
    }

    #[test]
    fn test_ties_break_on_id() {
        let mut input = rows(3);
        for row in &mut input {
            row.views = 7;
        }
        input.reverse();
        let query = PostQuery {
            params: ListParams {
                sort_by: Some("views".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let page = query.plan().apply(input);
        let ids: Vec<u128> = page.items.iter().map(|r| r.id.as_u128()).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }
}
