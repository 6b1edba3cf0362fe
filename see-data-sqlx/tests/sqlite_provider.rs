use see_data::prelude::*;
use see_data_sqlx::SqlxDataProvider;
use sqlx::Sqlite;

#[derive(Clone, Debug, PartialEq, sqlx::FromRow)]
struct Member {
    id: i64,
    name: String,
    email: Option<String>,
}

impl Member {
    fn new(name: &str) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
            email: None,
        }
    }
}

impl Entity for Member {
    fn table_name() -> &'static str {
        "members"
    }

    fn columns() -> &'static [&'static str] {
        &["name", "email"]
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn values(&self) -> Vec<Value> {
        vec![self.name.clone().into(), self.email.clone().into()]
    }
}

type Provider = SqlxDataProvider<Sqlite>;

async fn setup() -> (Provider, EntityRepository<Member, Provider>) {
    let provider = Provider::connect("sqlite::memory:", 5).await.unwrap();
    provider
        .execute_raw(
            "CREATE TABLE members (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                email TEXT
            )",
            &[],
        )
        .await
        .unwrap();
    (provider.clone(), EntityRepository::new(provider))
}

async fn seed(repo: &EntityRepository<Member, Provider>, n: usize) -> Vec<Member> {
    let members = (1..=n).map(|i| Member::new(&format!("member-{i:02}"))).collect();
    repo.insert_many(members).await.unwrap()
}

#[tokio::test]
async fn test_insert_then_get_by_id() {
    let (_, repo) = setup().await;
    let mut member = Member::new("Ada");
    member.email = Some("ada@example.com".into());

    let inserted = repo.insert(member.clone()).await.unwrap();
    assert!(inserted.id > 0);

    let fetched = repo.get_by_id(Some(inserted.id)).await.unwrap().unwrap();
    assert_eq!(fetched, Member { id: inserted.id, ..member });
}

#[tokio::test]
async fn test_get_by_id_missing_is_none() {
    let (_, repo) = setup().await;
    assert!(repo.get_by_id(Some(404)).await.unwrap().is_none());
    assert!(repo.get_by_id(Some(0)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_get_by_ids() {
    let (_, repo) = setup().await;
    let seeded = seed(&repo, 4).await;
    let ids = [seeded[0].id, seeded[2].id];
    let found = repo.get_by_ids(Some(&ids[..])).await.unwrap();
    assert_eq!(found.len(), 2);
    assert!(repo.get_by_ids(Some(&[])).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_paging_second_page_of_fifteen() {
    let (_, repo) = setup().await;
    seed(&repo, 15).await;

    let page = repo
        .get_all_paged(
            Some(Query::new().order_by("id", true)),
            PageRequest::new(1, 10),
        )
        .await
        .unwrap();
    assert_eq!(page.len(), 5);
    assert_eq!(page.total_pages, 2);
    assert!(page.has_previous_page);
    assert!(!page.has_next_page);
    assert_eq!(page[0].name, "member-11");
}

#[tokio::test]
async fn test_page_past_the_end_is_empty() {
    let (_, repo) = setup().await;
    seed(&repo, 2).await;

    let far = repo
        .get_all_paged(None, PageRequest::new(u64::MAX, 10))
        .await
        .unwrap();
    assert!(far.is_empty());
    assert_eq!(far.total_count, 2);
    assert!(!far.has_next_page);

    let unbounded = repo
        .get_all_paged(
            None,
            PageRequest {
                page_index: 2,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(unbounded.is_empty());
    assert_eq!(unbounded.total_count, 2);
}

#[tokio::test]
async fn test_id_lists_beyond_parameter_limit() {
    let (_, repo) = setup().await;
    let seeded = seed(&repo, 2).await;
    let mut ids: Vec<i64> = (1_000_000..1_040_000).collect();
    ids.extend(seeded.iter().map(|m| m.id));

    let found = repo.get_by_ids(Some(ids.as_slice())).await.unwrap();
    assert_eq!(found.len(), 2);

    let doomed: Vec<Member> = ids
        .iter()
        .map(|&id| Member {
            id,
            ..Member::new("gone")
        })
        .collect();
    assert_eq!(repo.delete_many(&doomed).await.unwrap(), 2);
    assert!(repo.get_all(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_count_only_and_clamped_page_size() {
    let (_, repo) = setup().await;
    seed(&repo, 3).await;

    let counted = repo
        .get_all_paged(None, PageRequest::new(0, 10).count_only())
        .await
        .unwrap();
    assert!(counted.is_empty());
    assert_eq!(counted.total_count, 3);

    let clamped = repo
        .get_all_paged(None, PageRequest::new(2, 0))
        .await
        .unwrap();
    assert_eq!(clamped.page_size, 1);
    assert_eq!(clamped.len(), 1);
}

#[tokio::test]
async fn test_filtered_fetch() {
    let (_, repo) = setup().await;
    seed(&repo, 12).await;

    let rows = repo
        .get_all(Some(
            Query::new()
                .where_like("name", "member-1%")
                .order_by("name", false),
        ))
        .await
        .unwrap();
    let names: Vec<_> = rows.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["member-12", "member-11", "member-10"]);
}

#[tokio::test]
async fn test_batch_insert_rolls_back_on_unique_violation() {
    let (_, repo) = setup().await;
    let err = repo
        .insert_many(vec![Member::new("A"), Member::new("A")])
        .await
        .unwrap_err();
    assert!(matches!(err, DataError::Constraint(_)), "got {err}");
    assert!(repo.get_all(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_batch_update_is_not_atomic() {
    let (_, repo) = setup().await;
    let mut members = seed(&repo, 2).await;
    members[0].name = "renamed".into();
    members[1].name = "renamed".into();

    let err = repo.update_many(&members).await.unwrap_err();
    assert!(matches!(err, DataError::Constraint(_)));

    let first = repo.get_by_id(Some(members[0].id)).await.unwrap().unwrap();
    assert_eq!(first.name, "renamed");
}

#[tokio::test]
async fn test_update_and_delete() {
    let (_, repo) = setup().await;
    let mut member = repo.insert(Member::new("Grace")).await.unwrap();
    member.email = Some("grace@example.com".into());
    assert_eq!(repo.update(&member).await.unwrap(), 1);

    let stored = repo.get_by_id(Some(member.id)).await.unwrap().unwrap();
    assert_eq!(stored.email.as_deref(), Some("grace@example.com"));

    member.email = None;
    assert_eq!(repo.update(&member).await.unwrap(), 1);
    let stored = repo.get_by_id(Some(member.id)).await.unwrap().unwrap();
    assert_eq!(stored.email, None);

    assert_eq!(repo.delete(&member).await.unwrap(), 1);
    assert_eq!(repo.delete(&member).await.unwrap(), 0);
}

#[tokio::test]
async fn test_delete_many_and_delete_where() {
    let (_, repo) = setup().await;
    let members = seed(&repo, 5).await;

    assert_eq!(repo.delete_many(&members[..2]).await.unwrap(), 2);
    let deleted = repo
        .delete_where(Query::new().where_eq("id", members[2].id))
        .await
        .unwrap();
    assert_eq!(deleted, 1);
    assert_eq!(repo.delete_where(Query::all()).await.unwrap(), 2);
    assert_eq!(repo.table().count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_raw_sql() {
    let (provider, repo) = setup().await;
    seed(&repo, 3).await;

    let affected = provider
        .execute_raw(
            "UPDATE members SET email = ? WHERE name <> ?",
            &["team@example.com".into(), "member-02".into()],
        )
        .await
        .unwrap();
    assert_eq!(affected, 2);

    let rows: Vec<Member> = provider
        .query_raw(
            "SELECT id, name, email FROM members WHERE email IS NOT NULL ORDER BY id",
            &[],
        )
        .await
        .unwrap();
    let names: Vec<_> = rows.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["member-01", "member-03"]);
}

#[tokio::test]
async fn test_invalid_column_rejected_before_io() {
    let (_, repo) = setup().await;
    let err = repo
        .get_all(Some(Query::new().where_eq("name = '' OR 1", 1)))
        .await
        .unwrap_err();
    assert!(matches!(err, DataError::InvalidArgument(_)));
}
