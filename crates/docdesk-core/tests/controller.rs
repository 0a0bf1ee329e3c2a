//! End-to-end controller flows against the in-memory gateway.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use docdesk_core::confirm::PendingAction;
use docdesk_core::{Controller, FormError, Notice, PanelError};
use docdesk_store::{
    CallCounts, Credential, Document, DocumentGateway, FieldSet, GatewayError, MemoryGateway,
    TypedValue,
};

const EMAIL: &str = "admin@school.edu";
const PASSWORD: &str = "correct horse";

async fn gateway() -> Arc<MemoryGateway> {
    let gw = MemoryGateway::new("demo");
    gw.add_account(EMAIL, PASSWORD).await;
    Arc::new(gw)
}

async fn signed_in(gw: &Arc<MemoryGateway>) -> Controller<MemoryGateway> {
    let mut ctl = Controller::new(Arc::clone(gw));
    ctl.login(EMAIL, PASSWORD).await.unwrap();
    ctl
}

fn student(fname: &str) -> FieldSet {
    let mut f = FieldSet::new();
    f.insert("fname".into(), TypedValue::String(fname.into()));
    f.insert("year_level".into(), TypedValue::Integer(1));
    f
}

// ── Auth ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn rejected_login_leaves_credential_unset() {
    let gw = gateway().await;
    let mut ctl = Controller::new(Arc::clone(&gw));

    let err = ctl.login(EMAIL, "wrong").await.unwrap_err();
    assert!(matches!(err, PanelError::Gateway(GatewayError::Auth(_))));
    assert_eq!(err.to_string(), "INVALID_LOGIN_CREDENTIALS");
    assert!(!ctl.session().is_authenticated());
}

#[tokio::test]
async fn rejected_relogin_drops_previous_credential() {
    let gw = gateway().await;
    let mut ctl = signed_in(&gw).await;
    assert!(ctl.login(EMAIL, "wrong").await.is_err());
    assert!(!ctl.session().is_authenticated());
}

#[tokio::test]
async fn data_actions_require_sign_in() {
    let gw = gateway().await;
    let mut ctl = Controller::new(Arc::clone(&gw));

    assert!(matches!(
        ctl.select_collection("students").await,
        Err(PanelError::NotAuthenticated)
    ));
    assert!(matches!(ctl.open_create_form(), Err(PanelError::NotAuthenticated)));
    assert_eq!(gw.calls().await.data_calls(), 0);
}

#[tokio::test]
async fn logout_resets_session_and_staging() {
    let gw = gateway().await;
    let path = gw.insert_document("students", "s1", &student("Ann")).await;
    let mut ctl = signed_in(&gw).await;
    ctl.select_collection("students").await.unwrap();
    ctl.stage_delete(&path).unwrap();

    ctl.logout();
    assert!(!ctl.session().is_authenticated());
    assert!(ctl.session().documents().is_empty());
    assert!(ctl.pending().is_none());
}

// ── Reading ──────────────────────────────────────────────────────────

#[tokio::test]
async fn empty_collection_lists_without_error() {
    let gw = gateway().await;
    let mut ctl = signed_in(&gw).await;
    assert_eq!(ctl.select_collection("students").await.unwrap(), 0);
    assert!(ctl.cards(None).is_empty());
}

#[tokio::test]
async fn refresh_without_collection_is_rejected() {
    let gw = gateway().await;
    let mut ctl = signed_in(&gw).await;
    assert!(matches!(ctl.refresh().await, Err(PanelError::NoCollection)));
    assert!(matches!(ctl.open_create_form(), Err(PanelError::NoCollection)));
}

#[tokio::test]
async fn search_filters_cached_cards_without_fetching() {
    let gw = gateway().await;
    gw.insert_document("students", "ann-1", &student("Ann")).await;
    gw.insert_document("students", "bob-1", &student("Bob")).await;
    let mut ctl = signed_in(&gw).await;
    ctl.select_collection("students").await.unwrap();

    let cards = ctl.cards(Some("ANN"));
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].id, "ann-1");
    assert_eq!(gw.calls().await.list, 1);
}

// ── Create ───────────────────────────────────────────────────────────

#[tokio::test]
async fn create_student_then_list_returns_typed_fields() {
    let gw = gateway().await;
    let mut ctl = signed_in(&gw).await;
    ctl.select_collection("students").await.unwrap();

    let mut form = ctl.open_create_form().unwrap();
    form.apply([
        ("fname", "Ann"),
        ("lname", "Lee"),
        ("program", "CS"),
        ("year_level", "2"),
    ]);
    let staged = ctl.stage_save(&form).unwrap();
    assert_eq!(staged.title(), "Confirm Add Document");

    assert_eq!(ctl.confirm().await.unwrap().notice, Notice::Added);

    let docs = ctl.session().documents();
    assert_eq!(docs.len(), 1);
    let doc = &docs[0];
    assert_eq!(doc.typed_field("fname"), Some(TypedValue::String("Ann".into())));
    assert_eq!(doc.typed_field("lname"), Some(TypedValue::String("Lee".into())));
    assert_eq!(doc.typed_field("program"), Some(TypedValue::String("CS".into())));
    assert_eq!(doc.typed_field("year_level"), Some(TypedValue::Integer(2)));

    let rows: Vec<(String, String)> = ctl.cards(None)[0]
        .rows
        .iter()
        .map(|r| (r.field.clone(), r.value.clone()))
        .collect();
    assert!(rows.contains(&("year_level".to_owned(), "2".to_owned())));
}

#[tokio::test]
async fn create_with_chosen_id_uses_it() {
    let gw = gateway().await;
    let mut ctl = signed_in(&gw).await;
    ctl.select_collection("programs").await.unwrap();

    let mut form = ctl.open_create_form().unwrap();
    form.set_doc_id("bscs");
    form.apply([("name", "BS CS"), ("department", "CCS"), ("program_code", "BSCS")]);
    ctl.stage_save(&form).unwrap();
    ctl.confirm().await.unwrap();

    assert_eq!(ctl.cards(None)[0].id, "bscs");
}

#[tokio::test]
async fn missing_required_field_stages_nothing() {
    let gw = gateway().await;
    let mut ctl = signed_in(&gw).await;
    ctl.select_collection("students").await.unwrap();

    let mut form = ctl.open_create_form().unwrap();
    form.apply([("fname", "Ann")]);
    let err = ctl.stage_save(&form).unwrap_err();
    assert!(matches!(err, PanelError::Form(FormError::MissingRequired { .. })));
    assert!(ctl.pending().is_none());
}

// ── Update ───────────────────────────────────────────────────────────

#[tokio::test]
async fn edit_replaces_only_submitted_fields() {
    let gw = gateway().await;
    let mut seed = student("Ann");
    seed.insert("lname".into(), TypedValue::String("Lee".into()));
    seed.insert("program".into(), TypedValue::String("CS".into()));
    seed.insert("advisor".into(), TypedValue::String("Dr. Cruz".into()));
    let path = gw.insert_document("students", "s1", &seed).await;

    let mut ctl = signed_in(&gw).await;
    ctl.select_collection("students").await.unwrap();

    let mut form = ctl.open_edit_form(&path).unwrap();
    assert_eq!(form.doc_id, "s1");
    form.apply([("year_level", "3")]);
    assert_eq!(ctl.stage_save(&form).unwrap().title(), "Confirm Update Document");
    assert_eq!(ctl.confirm().await.unwrap().notice, Notice::Updated);

    let stored = gw.document(&path).await.unwrap();
    assert_eq!(stored.typed_field("year_level"), Some(TypedValue::Integer(3)));
    assert_eq!(
        stored.typed_field("advisor"),
        Some(TypedValue::String("Dr. Cruz".into()))
    );
    assert_eq!(gw.calls().await.update, 1);
}

#[tokio::test]
async fn edit_of_unlisted_document_is_rejected() {
    let gw = gateway().await;
    let mut ctl = signed_in(&gw).await;
    ctl.select_collection("students").await.unwrap();
    let err = ctl
        .open_edit_form("projects/demo/databases/(default)/documents/students/ghost")
        .unwrap_err();
    assert!(matches!(err, PanelError::UnknownDocument { .. }));
}

// ── Delete & confirmation ────────────────────────────────────────────

#[tokio::test]
async fn confirmed_delete_issues_one_delete_and_one_refetch() {
    let gw = gateway().await;
    let path = gw.insert_document("students", "s1", &student("Ann")).await;
    let mut ctl = signed_in(&gw).await;
    ctl.select_collection("students").await.unwrap();
    let before = gw.calls().await;

    let staged = ctl.stage_delete(&path).unwrap();
    assert_eq!(staged, &PendingAction::Delete { path: path.clone() });
    assert_eq!(ctl.confirm().await.unwrap().notice, Notice::Deleted);

    let after = gw.calls().await;
    assert_eq!(after.delete - before.delete, 1);
    assert_eq!(after.list - before.list, 1);
    assert_eq!(after.data_calls() - before.data_calls(), 2);
    assert!(ctl.session().documents().is_empty());
    assert!(ctl.pending().is_none());
}

#[tokio::test]
async fn cancelled_delete_issues_no_calls() {
    let gw = gateway().await;
    let path = gw.insert_document("students", "s1", &student("Ann")).await;
    let mut ctl = signed_in(&gw).await;
    ctl.select_collection("students").await.unwrap();
    let before = gw.calls().await;

    ctl.stage_delete(&path).unwrap();
    assert!(ctl.cancel());

    assert_eq!(gw.calls().await, before);
    assert!(gw.document(&path).await.is_some());
    assert!(matches!(ctl.confirm().await, Err(PanelError::NothingStaged)));
}

#[tokio::test]
async fn staging_again_overwrites_previous_action() {
    let gw = gateway().await;
    let a = gw.insert_document("students", "a", &student("Ann")).await;
    let b = gw.insert_document("students", "b", &student("Bob")).await;
    let mut ctl = signed_in(&gw).await;
    ctl.select_collection("students").await.unwrap();

    ctl.stage_delete(&a).unwrap();
    ctl.stage_delete(&b).unwrap();
    ctl.confirm().await.unwrap();

    assert!(gw.document(&a).await.is_some());
    assert!(gw.document(&b).await.is_none());
    assert_eq!(gw.calls().await.delete, 1);
}

#[tokio::test]
async fn failed_write_returns_to_idle_without_refetch() {
    let gw = gateway().await;
    gw.insert_document("programs", "cs", &FieldSet::new()).await;
    let mut ctl = signed_in(&gw).await;
    ctl.select_collection("programs").await.unwrap();

    let mut form = ctl.open_create_form().unwrap();
    form.set_doc_id("cs");
    form.apply([("name", "n"), ("department", "d"), ("program_code", "c")]);
    ctl.stage_save(&form).unwrap();

    let err = ctl.confirm().await.unwrap_err();
    assert!(matches!(err, PanelError::Gateway(GatewayError::Write(_))));
    assert!(ctl.pending().is_none());
    assert_eq!(
        gw.calls().await,
        CallCounts {
            authenticate: 1,
            list: 1,
            create: 1,
            update: 0,
            delete: 0,
        }
    );
}

/// Memory gateway whose listing fails after the first successful call.
struct FailingRelist {
    inner: MemoryGateway,
    lists: AtomicUsize,
}

#[async_trait::async_trait]
impl DocumentGateway for FailingRelist {
    async fn authenticate(&self, email: &str, password: &str) -> Result<Credential, GatewayError> {
        self.inner.authenticate(email, password).await
    }

    async fn list_documents(
        &self,
        credential: &Credential,
        collection: &str,
    ) -> Result<Vec<Document>, GatewayError> {
        if self.lists.fetch_add(1, Ordering::SeqCst) > 0 {
            return Err(GatewayError::Read("backend unavailable".into()));
        }
        self.inner.list_documents(credential, collection).await
    }

    async fn create_document(
        &self,
        credential: &Credential,
        collection: &str,
        document_id: Option<&str>,
        fields: &FieldSet,
    ) -> Result<Document, GatewayError> {
        self.inner
            .create_document(credential, collection, document_id, fields)
            .await
    }

    async fn update_document(
        &self,
        credential: &Credential,
        path: &str,
        fields: &FieldSet,
    ) -> Result<Document, GatewayError> {
        self.inner.update_document(credential, path, fields).await
    }

    async fn delete_document(&self, credential: &Credential, path: &str) -> Result<(), GatewayError> {
        self.inner.delete_document(credential, path).await
    }
}

#[tokio::test]
async fn failed_refetch_still_reports_committed_write() {
    let inner = MemoryGateway::new("demo");
    inner.add_account(EMAIL, PASSWORD).await;
    let gw = Arc::new(FailingRelist {
        inner: inner.clone(),
        lists: AtomicUsize::new(0),
    });
    let mut ctl = Controller::new(Arc::clone(&gw));
    ctl.login(EMAIL, PASSWORD).await.unwrap();
    ctl.select_collection("programs").await.unwrap();

    let mut form = ctl.open_create_form().unwrap();
    form.set_doc_id("bscs");
    form.apply([("name", "BS CS"), ("department", "CCS"), ("program_code", "BSCS")]);
    ctl.stage_save(&form).unwrap();

    let confirmed = ctl.confirm().await.unwrap();
    assert_eq!(confirmed.notice, Notice::Added);
    assert!(matches!(
        confirmed.refresh_error,
        Some(PanelError::Gateway(GatewayError::Read(_)))
    ));
    assert!(ctl.pending().is_none());
    assert!(
        inner
            .document("projects/demo/databases/(default)/documents/programs/bscs")
            .await
            .is_some()
    );
}
