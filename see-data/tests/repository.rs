use see_data::prelude::*;
use see_data::{MemoryDataProvider, Table, IN_LIST_CHUNK};

#[derive(Clone, Debug, PartialEq)]
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

fn repo() -> (MemoryDataProvider, EntityRepository<Member, MemoryDataProvider>) {
    let provider = MemoryDataProvider::new().with_unique("members", "name");
    (provider.clone(), EntityRepository::new(provider))
}

async fn seed(repo: &EntityRepository<Member, MemoryDataProvider>, n: usize) -> Vec<Member> {
    let members = (1..=n).map(|i| Member::new(&format!("member-{i:02}"))).collect();
    repo.insert_many(members).await.unwrap()
}

#[tokio::test]
async fn test_insert_assigns_id_and_round_trips() {
    let (_, repo) = repo();
    let mut member = Member::new("Ada");
    member.email = Some("ada@example.com".into());

    let inserted = repo.insert(member.clone()).await.unwrap();
    assert_ne!(inserted.id, 0);

    let fetched = repo.get_by_id(Some(inserted.id)).await.unwrap().unwrap();
    assert_eq!(fetched.name, member.name);
    assert_eq!(fetched.email, member.email);
    assert_eq!(fetched.id, inserted.id);
}

#[tokio::test]
async fn test_get_by_id_absent_without_io() {
    let (provider, repo) = repo();
    assert!(repo.get_by_id(None).await.unwrap().is_none());
    assert!(repo.get_by_id(Some(0)).await.unwrap().is_none());
    assert_eq!(provider.round_trips(), 0);

    assert!(repo.get_by_id(Some(42)).await.unwrap().is_none());
    assert_eq!(provider.round_trips(), 1);
}

#[tokio::test]
async fn test_get_by_ids_empty_without_io() {
    let (provider, repo) = repo();
    assert!(repo.get_by_ids(None).await.unwrap().is_empty());
    assert!(repo.get_by_ids(Some(&[])).await.unwrap().is_empty());
    assert_eq!(provider.round_trips(), 0);
}

#[tokio::test]
async fn test_get_by_ids_returns_matching_rows() {
    let (_, repo) = repo();
    let seeded = seed(&repo, 5).await;
    let ids = [seeded[1].id, seeded[3].id, 9_999];

    let found = repo.get_by_ids(Some(&ids[..])).await.unwrap();
    let names: Vec<_> = found.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["member-02", "member-04"]);
}

#[tokio::test]
async fn test_long_id_list_is_fetched_in_chunks() {
    let (provider, repo) = repo();
    let seeded = seed(&repo, 3).await;
    let mut ids: Vec<i64> = (10_000..10_000 + 2 * IN_LIST_CHUNK as i64).collect();
    ids.push(seeded[0].id);
    ids.push(seeded[2].id);

    let before = provider.round_trips();
    let found = repo.get_by_ids(Some(ids.as_slice())).await.unwrap();
    assert_eq!(provider.round_trips() - before, 3);
    let names: Vec<_> = found.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["member-01", "member-03"]);
}

#[tokio::test]
async fn test_get_all_with_filter() {
    let (_, repo) = repo();
    seed(&repo, 12).await;

    let all = repo.get_all(None).await.unwrap();
    assert_eq!(all.len(), 12);

    let ones = repo
        .get_all(Some(Query::new().where_like("name", "MEMBER-1%").order_by("name", false)))
        .await
        .unwrap();
    let names: Vec<_> = ones.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["member-12", "member-11", "member-10"]);
}

#[tokio::test]
async fn test_paging_second_page_of_fifteen() {
    let (_, repo) = repo();
    seed(&repo, 15).await;

    let page = repo
        .get_all_paged(None, PageRequest::new(1, 10))
        .await
        .unwrap();
    assert_eq!(page.len(), 5);
    assert_eq!(page.total_count, 15);
    assert_eq!(page.total_pages, 2);
    assert!(page.has_previous_page);
    assert!(!page.has_next_page);
    assert_eq!(page[0].name, "member-11");
}

#[tokio::test]
async fn test_paging_clamps_non_positive_page_size() {
    let (_, repo) = repo();
    seed(&repo, 3).await;

    for size in [0, -1, i64::MIN] {
        let page = repo
            .get_all_paged(None, PageRequest::new(1, size))
            .await
            .unwrap();
        assert_eq!(page.page_size, 1);
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].name, "member-02");
        assert_eq!(page.total_pages, 3);
    }
}

#[tokio::test]
async fn test_paging_row_count_bounds() {
    let (_, repo) = repo();
    seed(&repo, 7).await;

    for index in 0..5u64 {
        let page = repo
            .get_all_paged(None, PageRequest::new(index, 3))
            .await
            .unwrap();
        let expected = 7u64.saturating_sub(index * 3).min(3) as usize;
        assert_eq!(page.len(), expected, "page {index}");
        assert_eq!(page.total_count, 7);
    }
}

#[tokio::test]
async fn test_paging_huge_index_is_empty() {
    let (_, repo) = repo();
    seed(&repo, 2).await;

    let page = repo
        .get_all_paged(None, PageRequest::new(u64::MAX, 10))
        .await
        .unwrap();
    assert!(page.is_empty());
    assert_eq!(page.total_count, 2);
}

#[tokio::test]
async fn test_count_only_skips_rows() {
    let (provider, repo) = repo();
    seed(&repo, 4).await;
    let before = provider.round_trips();

    let page = repo
        .get_all_paged(
            Some(Query::new().where_gt("id", 1)),
            PageRequest::new(0, 10).count_only(),
        )
        .await
        .unwrap();
    assert!(page.is_empty());
    assert_eq!(page.total_count, 3);
    assert_eq!(provider.round_trips() - before, 1);
}

#[tokio::test]
async fn test_delete_where_returns_count() {
    let (_, repo) = repo();
    let inserted = repo.insert(Member::new("Grace")).await.unwrap();
    assert!(repo.get_by_id(Some(inserted.id)).await.unwrap().is_some());

    let deleted = repo
        .delete_where(Query::new().where_eq("id", inserted.id))
        .await
        .unwrap();
    assert_eq!(deleted, 1);
    assert!(repo.get_by_id(Some(inserted.id)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_where_all() {
    let (_, repo) = repo();
    seed(&repo, 6).await;
    assert_eq!(repo.delete_where(Query::all()).await.unwrap(), 6);
    assert!(repo.get_all(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_batch_insert_rolls_back_on_constraint() {
    let (_, repo) = repo();
    let err = repo
        .insert_many(vec![Member::new("A"), Member::new("A")])
        .await
        .unwrap_err();
    assert!(matches!(err, DataError::Constraint(_)));
    assert!(repo.get_all(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_batch_update_persists_partially() {
    let (_, repo) = repo();
    let mut members = seed(&repo, 2).await;
    members[0].name = "renamed".into();
    members[1].name = "renamed".into();

    let err = repo.update_many(&members).await.unwrap_err();
    assert!(matches!(err, DataError::Constraint(_)));

    let names: Vec<_> = repo
        .get_all(Some(Query::new().order_by("id", true)))
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.name)
        .collect();
    assert_eq!(names, ["renamed", "member-02"]);
}

#[tokio::test]
async fn test_empty_batches_are_noops() {
    let (provider, repo) = repo();
    assert!(repo.insert_many(Vec::new()).await.unwrap().is_empty());
    assert_eq!(repo.update_many(&[]).await.unwrap(), 0);
    assert_eq!(repo.delete_many(&[]).await.unwrap(), 0);
    assert_eq!(provider.round_trips(), 0);
}

#[tokio::test]
async fn test_transient_entity_rejected() {
    let (provider, repo) = repo();
    let transient = Member::new("Nobody");
    assert!(matches!(
        repo.update(&transient).await,
        Err(DataError::InvalidArgument(_))
    ));
    assert!(matches!(
        repo.delete(&transient).await,
        Err(DataError::InvalidArgument(_))
    ));
    assert_eq!(provider.round_trips(), 0);
}

#[tokio::test]
async fn test_update_and_delete_report_affected_rows() {
    let (_, repo) = repo();
    let mut member = repo.insert(Member::new("Linus")).await.unwrap();
    member.email = Some("linus@example.com".into());
    assert_eq!(repo.update(&member).await.unwrap(), 1);

    let stored = repo.get_by_id(Some(member.id)).await.unwrap().unwrap();
    assert_eq!(stored.email.as_deref(), Some("linus@example.com"));

    assert_eq!(repo.delete(&member).await.unwrap(), 1);
    assert_eq!(repo.delete(&member).await.unwrap(), 0);
    assert_eq!(repo.update(&member).await.unwrap(), 0);
}

#[tokio::test]
async fn test_delete_many_in_transaction() {
    let (_, repo) = repo();
    let members = seed(&repo, 4).await;
    assert_eq!(repo.delete_many(&members[..3]).await.unwrap(), 3);
    let left = repo.get_all(None).await.unwrap();
    assert_eq!(left, vec![members[3].clone()]);
}

#[tokio::test]
async fn test_null_predicates() {
    let (_, repo) = repo();
    let mut with_email = Member::new("Margaret");
    with_email.email = Some("mh@example.com".into());
    repo.insert(with_email).await.unwrap();
    repo.insert(Member::new("Barbara")).await.unwrap();

    let missing = repo
        .get_all(Some(Query::new().where_null("email")))
        .await
        .unwrap();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].name, "Barbara");

    let present = repo
        .get_all(Some(Query::new().where_not_null("email")))
        .await
        .unwrap();
    assert_eq!(present[0].name, "Margaret");
}

#[tokio::test]
async fn test_unknown_column_is_invalid_argument() {
    let (_, repo) = repo();
    repo.insert(Member::new("Ken")).await.unwrap();
    let err = repo
        .get_all(Some(Query::new().where_eq("nickname", "k")))
        .await
        .unwrap_err();
    assert!(matches!(err, DataError::InvalidArgument(_)));
}

#[tokio::test]
async fn test_table_view_is_lazy() {
    let (provider, repo) = repo();
    seed(&repo, 5).await;
    let before = provider.round_trips();

    let view: Table<'_, Member, _> = repo
        .table()
        .filter(Query::new().where_gt("id", 2))
        .order_by("id", false)
        .skip(1)
        .take(2);
    assert_eq!(provider.round_trips(), before);

    assert_eq!(view.count().await.unwrap(), 3);
    let rows = view.to_list().await.unwrap();
    let names: Vec<_> = rows.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["member-04", "member-03"]);
}

#[tokio::test]
async fn test_raw_sql_not_supported() {
    let (provider, _) = repo();
    let err = provider.execute_raw("DELETE FROM members", &[]).await.unwrap_err();
    assert!(matches!(err, DataError::NotImplemented(_)));
}
