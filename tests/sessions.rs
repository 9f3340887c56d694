use std::fs;
use std::path::Path;

use stackdump::strategy::any;
use stackdump::{
    open_post_history, open_posts, open_users, Error, ReaderOptions, Record, RecordKind, RowReader,
    Tag,
};

const POSTS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<posts>
  <row Id="1" PostTypeId="1" AcceptedAnswerId="3" CreationDate="2010-07-28T19:04:21.300" Score="54" ViewCount="3300" Body="&lt;p&gt;How do I install packages?&lt;/p&gt;" OwnerUserId="5" LastActivityDate="2012-02-04T23:09:48.637" Title="Installing packages" Tags="&lt;package-management&gt;&lt;apt&gt;" AnswerCount="4" CommentCount="0" ContentLicense="CC BY-SA 2.5" />
  <row Id="3" PostTypeId="2" ParentId="1" CreationDate="2010-07-28T19:15:34.727" Score="40" Body="&lt;p&gt;Use apt-get.&lt;/p&gt;" OwnerUserId="9" LastActivityDate="2010-07-28T19:15:34.727" CommentCount="2" ContentLicense="CC BY-SA 2.5" />
</posts>
"#;

const USERS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<users>
  <row Id="5" Reputation="101" CreationDate="2010-07-28T18:47:03.330" DisplayName="alice" LastAccessDate="2019-01-04T01:02:03.000" Views="12" UpVotes="3" DownVotes="0" AccountId="55" />
</users>
"#;

const POST_HISTORY: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<posthistory>
  <row Id="1" PostHistoryTypeId="2" PostId="1" RevisionGUID="r1" CreationDate="2010-07-28T19:04:21.300" UserId="5" Text="How do I install packages?" ContentLicense="CC BY-SA 2.5" />
  <row Id="2" PostHistoryTypeId="3" PostId="1" RevisionGUID="r1" CreationDate="2010-07-28T19:04:21.300" UserId="5" Text="&lt;package-management&gt;&lt;apt&gt;" ContentLicense="CC BY-SA 2.5" />
  <row Id="3" PostHistoryTypeId="6" PostId="1" RevisionGUID="r2" CreationDate="2011-01-01T00:00:00.000" UserId="9" Text="&lt;apt&gt;" Comment="retag" />
</posthistory>
"#;

fn write(dir: &Path, kind: RecordKind, contents: &str) {
    fs::write(dir.join(kind.file_name()), contents).unwrap();
}

#[test]
fn test_open_posts_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), RecordKind::Posts, POSTS);

    let mut posts = open_posts(dir.path().join("Posts.xml")).unwrap();
    assert!(posts.advance());
    let question = posts.record().clone();
    assert!(posts.advance());
    let answer = posts.take_record();
    assert!(!posts.advance());
    assert!(posts.is_finished());

    assert_eq!(question.title, "Installing packages");
    assert_eq!(question.tags, ["package-management", "apt"]);
    assert_eq!(question.body, "<p>How do I install packages?</p>");
    assert_eq!(answer.parent_id, question.id);
    assert!(answer.tags.is_empty());
}

#[test]
fn test_join_posts_and_users() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), RecordKind::Posts, POSTS);
    write(dir.path(), RecordKind::Users, USERS);

    let users: Vec<_> = open_users(dir.path().join("Users.xml"))
        .unwrap()
        .into_records()
        .collect::<Result<_, _>>()
        .unwrap();
    let owners: Vec<_> = open_posts(dir.path().join("Posts.xml"))
        .unwrap()
        .into_records()
        .map(|post| {
            let post = post.unwrap();
            users.iter().find(|u| u.id == post.owner_user_id).map(|u| u.display_name.clone())
        })
        .collect();
    assert_eq!(owners, [Some("alice".to_string()), None]);
}

#[test]
fn test_post_history_tags() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), RecordKind::PostHistory, POST_HISTORY);

    let history = open_post_history(dir.path().join("PostHistory.xml")).unwrap();
    let tags: Vec<_> = history
        .into_records()
        .map(|row| row.unwrap())
        .filter(|row| row.is_tag_revision())
        .map(|row| row.tags)
        .collect();
    assert_eq!(tags, [vec!["package-management", "apt"], vec!["apt"]]);
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Tags.xml");
    match RowReader::<_, Tag>::open(&path) {
        Err(Error::Open { path: reported, .. }) => assert_eq!(reported, path),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("opened a missing file"),
    }
}

#[test]
fn test_wrong_file_for_kind() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), RecordKind::Users, USERS);

    let err = open_posts(dir.path().join("Users.xml")).err().unwrap();
    assert!(matches!(err, Error::WrongWrapper { expected: "posts", .. }));
    assert_eq!(err.to_string(), "expected <posts> wrapper element, found <users>");
}

#[test]
fn test_dispatch_from_file_name() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), RecordKind::Users, USERS);

    let kind: RecordKind = "Users.xml".parse().unwrap();
    let path = dir.path().join(kind.file_name());
    let mut source = any::open(kind, path, ReaderOptions::default()).unwrap();
    let mut records = Vec::new();
    while source.advance() {
        records.push(source.record().to_record());
    }
    assert_eq!(records.len(), 1);
    match &records[0] {
        Record::User(user) => assert_eq!(user.account_id, 55),
        other => panic!("unexpected record {other:?}"),
    }
}

#[cfg(feature = "parallel")]
#[test]
fn test_decode_dir_in_parallel() {
    use std::sync::Mutex;

    use stackdump::strategy::parallel::decode_dir;
    use stackdump::RecordRef;

    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), RecordKind::Posts, POSTS);
    write(dir.path(), RecordKind::Users, USERS);
    write(dir.path(), RecordKind::PostHistory, POST_HISTORY);
    write(dir.path(), RecordKind::Votes, "<votes><row Id=\"1\" PostId=\"1\" Bogus=\"1\"/></votes>");

    let seen = Mutex::new(Vec::new());
    let summaries = decode_dir(dir.path(), ReaderOptions::default(), |record: RecordRef<'_>| {
        seen.lock().unwrap().push((record.kind(), record.id()));
    });

    let kinds: Vec<_> = summaries.iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        [RecordKind::PostHistory, RecordKind::Posts, RecordKind::Users, RecordKind::Votes]
    );
    let rows: Vec<_> = summaries.iter().map(|s| s.rows).collect();
    assert_eq!(rows, [3, 2, 1, 0]);
    assert!(summaries[..3].iter().all(|s| s.is_ok()));
    assert!(summaries[3].error.as_ref().and_then(Error::field_error).is_some());

    let mut seen = seen.into_inner().unwrap();
    seen.sort_by_key(|(kind, id)| (kind.file_name(), *id));
    assert_eq!(seen.len(), 6);
    assert_eq!(seen[0], (RecordKind::PostHistory, 1));
}
