//! Behaviour both storage backends must share

use chrono::{NaiveDate, Utc};
use hrms_backend_lib::{
    storage::{DocumentStore, Filter, Patch, Removal, SqlStore, Storage},
    AppError,
};
use hrms_common::{
    Candidate, CandidateStatus, Employee, EmployeeStatus, Job, JobStatus, PayrollRecord, Role,
    TrackingLog, User,
};
use tempfile::TempDir;

fn job(title: &str, department: &str) -> Job {
    Job {
        id: 0,
        job_title: title.to_string(),
        department: department.to_string(),
        experience: None,
        salary: Some("50k-70k".to_string()),
        description: None,
        status: JobStatus::Open,
        posted_date: Utc::now(),
    }
}

fn user(email: &str) -> User {
    User {
        id: 0,
        name: "Test User".to_string(),
        email: email.to_string(),
        password_hash: "$scrypt$placeholder".to_string(),
        profile_picture: None,
        role: Role::Employee,
        created_at: Utc::now(),
    }
}

fn employee(name: &str, user_id: Option<i64>) -> Employee {
    Employee {
        id: 0,
        user_id,
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        phone: None,
        department: Some("Finance".to_string()),
        position: None,
        salary: Some(3500.0),
        hire_date: None,
        status: EmployeeStatus::Active,
        created_at: Utc::now(),
    }
}

async fn insert_and_get<S: Storage>(store: &S) {
    let stored = store.insert(job("Engineer", "R&D")).await.unwrap();
    assert!(stored.id > 0);

    let fetched: Job = store.get(stored.id).await.unwrap().unwrap();
    assert_eq!(fetched, stored);
    assert!(store.get::<Job>(stored.id + 1000).await.unwrap().is_none());
}

async fn ids_increase<S: Storage>(store: &S) {
    let first = store.insert(job("A", "R&D")).await.unwrap();
    let second = store.insert(job("B", "R&D")).await.unwrap();
    let third = store.insert(job("C", "R&D")).await.unwrap();
    assert!(first.id < second.id);
    assert!(second.id < third.id);
}

async fn filter_order_and_limit<S: Storage>(store: &S) {
    for title in ["A", "B", "C"] {
        store.insert(job(title, "R&D")).await.unwrap();
    }
    store.insert(job("D", "Sales")).await.unwrap();

    let rnd: Vec<Job> = store.list(Filter::all().eq("department", "R&D")).await.unwrap();
    let titles: Vec<_> = rnd.iter().map(|j| j.job_title.as_str()).collect();
    assert_eq!(titles, ["A", "B", "C"]);

    let newest: Vec<Job> = store
        .list(Filter::all().eq("department", "R&D").newest_first().limit(2))
        .await
        .unwrap();
    let titles: Vec<_> = newest.iter().map(|j| j.job_title.as_str()).collect();
    assert_eq!(titles, ["C", "B"]);

    assert_eq!(store.count::<Job>(Filter::all()).await.unwrap(), 4);
    assert_eq!(
        store
            .count::<Job>(Filter::all().eq("department", "Sales").limit(0))
            .await
            .unwrap(),
        1
    );
}

fn candidate(name: &str, job_id: Option<i64>) -> Candidate {
    Candidate {
        id: 0,
        job_id,
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        phone: None,
        resume_url: None,
        status: CandidateStatus::Pending,
        applied_date: Utc::now(),
    }
}

fn payroll(employee_id: i64, month: &str) -> PayrollRecord {
    PayrollRecord {
        id: 0,
        employee_id,
        month: month.to_string(),
        basic_salary: 1000.0,
        allowances: 0.0,
        deductions: 0.0,
        created_at: Utc::now(),
    }
}

async fn sort_by_field<S: Storage>(store: &S) {
    let worker = store.insert(employee("Ada", None)).await.unwrap();
    let mut ids = Vec::new();
    for day in [2, 1, 3, 2] {
        let log = store
            .insert(TrackingLog {
                id: 0,
                employee_id: worker.id,
                tracking_date: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
                location: format!("site-{day}"),
                activity: None,
                duration: None,
            })
            .await
            .unwrap();
        ids.push(log.id);
    }

    let latest: Vec<TrackingLog> = store
        .list(Filter::all().latest_by("tracking_date").limit(3))
        .await
        .unwrap();
    let order: Vec<_> = latest.iter().map(|l| l.id).collect();
    // Same date: higher id first
    assert_eq!(order, [ids[2], ids[3], ids[0]]);

    let err = store
        .list::<TrackingLog>(Filter::all().latest_by("password_hash"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Internal(_)));
}

async fn payroll_month_is_unique_per_employee<S: Storage>(store: &S) {
    let ada = store.insert(employee("Ada", None)).await.unwrap();
    let alan = store.insert(employee("Alan", None)).await.unwrap();

    store.insert(payroll(ada.id, "2024-04")).await.unwrap();
    let err = store.insert(payroll(ada.id, "2024-04")).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    store.insert(payroll(ada.id, "2024-05")).await.unwrap();
    store.insert(payroll(alan.id, "2024-04")).await.unwrap();
    assert_eq!(store.count::<PayrollRecord>(Filter::all()).await.unwrap(), 3);
}

async fn user_links_to_one_employee<S: Storage>(store: &S) {
    let account = store.insert(user("ada@example.com")).await.unwrap();
    store.insert(employee("Ada", Some(account.id))).await.unwrap();
    let err = store
        .insert(employee("Ada Again", Some(account.id)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let free = store.insert(employee("Alan", None)).await.unwrap();
    let err = store
        .update::<Employee>(free.id, Patch::new().set("user_id", account.id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

async fn linked_insert_and_guarded_delete<S: Storage>(store: &S) {
    let wanted = store.insert(job("Engineer", "R&D")).await.unwrap();
    let vacant = store.insert(job("Analyst", "R&D")).await.unwrap();

    let applied = store
        .insert_linked::<Job, _>(wanted.id, candidate("Bob", Some(wanted.id)))
        .await
        .unwrap();
    assert!(applied.is_some_and(|c| c.id > 0));
    let orphan = store
        .insert_linked::<Job, _>(wanted.id + 1000, candidate("Carol", Some(wanted.id + 1000)))
        .await
        .unwrap();
    assert!(orphan.is_none());
    assert_eq!(store.count::<Candidate>(Filter::all()).await.unwrap(), 1);

    let refused = store
        .delete_unreferenced::<Job, Candidate>(wanted.id, "job_id")
        .await
        .unwrap();
    assert_eq!(refused, Removal::Referenced(1));
    assert!(store.get::<Job>(wanted.id).await.unwrap().is_some());

    let deleted = store
        .delete_unreferenced::<Job, Candidate>(vacant.id, "job_id")
        .await
        .unwrap();
    assert_eq!(deleted, Removal::Deleted);
    let again = store
        .delete_unreferenced::<Job, Candidate>(vacant.id, "job_id")
        .await
        .unwrap();
    assert_eq!(again, Removal::Missing);

    let err = store
        .delete_unreferenced::<Job, Candidate>(wanted.id, "nope")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Internal(_)));
}

async fn null_equality_and_prefix<S: Storage>(store: &S) {
    let linked = store.insert(user("linked@example.com")).await.unwrap();
    store.insert(employee("Ada", Some(linked.id))).await.unwrap();
    store.insert(employee("Alan", None)).await.unwrap();
    store.insert(employee("Grace", None)).await.unwrap();

    let unlinked: Vec<Employee> = store
        .list(Filter::all().eq("user_id", serde_json::Value::Null))
        .await
        .unwrap();
    assert_eq!(unlinked.len(), 2);

    let mine: Vec<Employee> = store.list(Filter::all().eq("user_id", linked.id)).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].name, "Ada");

    let al: Vec<Employee> = store.list(Filter::all().starts_with("name", "Al")).await.unwrap();
    assert_eq!(al.len(), 1);
    assert_eq!(al[0].name, "Alan");
}

async fn partial_update<S: Storage>(store: &S) {
    let stored = store.insert(job("Engineer", "R&D")).await.unwrap();

    let updated: Job = store
        .update(stored.id, Patch::new().set("status", "closed"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, JobStatus::Closed);
    assert_eq!(updated.job_title, "Engineer");
    assert_eq!(updated.salary.as_deref(), Some("50k-70k"));

    let fetched: Job = store.get(stored.id).await.unwrap().unwrap();
    assert_eq!(fetched, updated);

    let missing = store
        .update::<Job>(stored.id + 1000, Patch::new().set("status", "closed"))
        .await
        .unwrap();
    assert!(missing.is_none());
}

async fn bad_patches_are_rejected<S: Storage>(store: &S) {
    let stored = store.insert(job("Engineer", "R&D")).await.unwrap();

    let err = store
        .update::<Job>(stored.id, Patch::new().set("password_hash", "x"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = store
        .update::<Job>(stored.id, Patch::new().set("id", 99))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = store
        .update::<Job>(stored.id, Patch::new().set("status", "archived"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let unchanged: Job = store.get(stored.id).await.unwrap().unwrap();
    assert_eq!(unchanged, stored);
}

async fn unknown_filter_field<S: Storage>(store: &S) {
    let err = store
        .list::<Job>(Filter::all().eq("password_hash", "x"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Internal(_)));
}

async fn delete_is_hard<S: Storage>(store: &S) {
    let stored = store.insert(job("Engineer", "R&D")).await.unwrap();
    assert!(store.delete::<Job>(stored.id).await.unwrap());
    assert!(!store.delete::<Job>(stored.id).await.unwrap());
    assert!(store.get::<Job>(stored.id).await.unwrap().is_none());
    assert_eq!(store.count::<Job>(Filter::all()).await.unwrap(), 0);
}

async fn unique_email<S: Storage>(store: &S) {
    store.insert(user("dup@example.com")).await.unwrap();
    let err = store.insert(user("dup@example.com")).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(store.count::<User>(Filter::all()).await.unwrap(), 1);
}

async fn enum_fields_round_trip<S: Storage>(store: &S) {
    let stored = store
        .insert(Candidate {
            id: 0,
            job_id: None,
            name: "Bob".to_string(),
            email: "bob@example.com".to_string(),
            phone: None,
            resume_url: Some("https://example.com/bob.pdf".to_string()),
            status: CandidateStatus::Shortlisted,
            applied_date: Utc::now(),
        })
        .await
        .unwrap();

    let shortlisted: Vec<Candidate> = store
        .list(Filter::all().eq("status", "shortlisted"))
        .await
        .unwrap();
    assert_eq!(shortlisted, vec![stored]);
}

macro_rules! contract_tests {
    ($($name:ident),* $(,)?) => {
        mod document {
            use super::*;

            fn store() -> (TempDir, DocumentStore) {
                let dir = TempDir::new().unwrap();
                let store = DocumentStore::new(dir.path()).unwrap();
                (dir, store)
            }

            $(
                #[tokio::test]
                async fn $name() {
                    let (_dir, store) = store();
                    super::$name(&store).await;
                }
            )*
        }

        mod sql {
            use super::*;

            $(
                #[tokio::test]
                async fn $name() {
                    let store = SqlStore::open_in_memory().unwrap();
                    super::$name(&store).await;
                }
            )*
        }
    };
}

contract_tests!(
    insert_and_get,
    ids_increase,
    filter_order_and_limit,
    null_equality_and_prefix,
    partial_update,
    bad_patches_are_rejected,
    unknown_filter_field,
    delete_is_hard,
    unique_email,
    enum_fields_round_trip,
    sort_by_field,
    payroll_month_is_unique_per_employee,
    user_links_to_one_employee,
    linked_insert_and_guarded_delete,
);

#[tokio::test]
async fn test_document_store_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let id = {
        let store = DocumentStore::new(dir.path()).unwrap();
        store.insert(job("Engineer", "R&D")).await.unwrap().id
    };

    let reopened = DocumentStore::new(dir.path()).unwrap();
    let fetched: Job = reopened.get(id).await.unwrap().unwrap();
    assert_eq!(fetched.job_title, "Engineer");
}

#[tokio::test]
async fn test_sql_store_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hrms.db");
    let id = {
        let store = SqlStore::open(&path).unwrap();
        store.insert(job("Engineer", "R&D")).await.unwrap().id
    };

    let reopened = SqlStore::open(&path).unwrap();
    let fetched: Job = reopened.get(id).await.unwrap().unwrap();
    assert_eq!(fetched.job_title, "Engineer");
}
