//! Workflow tests for the signup crate
//!
//! Use cases run against the in-memory repository, a manual clock and a
//! recording mail dispatcher; router tests go through the HTTP layer.

#[cfg(test)]
mod support {
    use std::sync::Arc;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use kernel::id::AccountId;
    use platform::clock::{Clock, ManualClock};

    use crate::application::config::SignupConfig;
    use crate::application::identity_locks::IdentityLocks;
    use crate::application::notifier::NotificationQueue;
    use crate::application::request_registration::{
        RegistrationInput, RegistrationOutput, RequestRegistrationUseCase,
    };
    use crate::application::verify_registration::{
        VerificationInput, VerificationOutput, VerifyRegistrationUseCase,
    };
    use crate::domain::entity::{
        account::{Account, NewAccount},
        notification::{Notification, NotificationTemplate},
        pending_registration::PendingRegistration,
    };
    use crate::domain::repository::{
        AccountRepository, NotificationDispatcher, PendingRegistrationStore,
    };
    use crate::domain::value_object::{account_role::AccountRole, email::Email};
    use crate::error::{DispatchError, SignupError, SignupResult};
    use crate::infra::memory::InMemorySignupRepository;

    pub const START: i64 = 1_700_000_000;

    /// Records every notification it is asked to send
    #[derive(Default)]
    pub struct RecordingDispatcher {
        sent: Mutex<Vec<Notification>>,
    }

    impl RecordingDispatcher {
        pub fn sent(&self) -> Vec<Notification> {
            self.sent.lock().unwrap().clone()
        }

        pub fn codes_sent_to(&self, recipient: &str) -> Vec<String> {
            self.sent()
                .into_iter()
                .filter(|n| n.template == NotificationTemplate::Otp && n.recipient == recipient)
                .map(|n| n.variables["otp"].clone())
                .collect()
        }
    }

    impl NotificationDispatcher for RecordingDispatcher {
        async fn send(&self, notification: &Notification) -> Result<(), DispatchError> {
            self.sent.lock().unwrap().push(notification.clone());
            Ok(())
        }
    }

    /// Fails every send
    pub struct FailingDispatcher;

    impl NotificationDispatcher for FailingDispatcher {
        async fn send(&self, _notification: &Notification) -> Result<(), DispatchError> {
            Err(DispatchError::Transport("connection refused".to_string()))
        }
    }

    /// In-memory repository that counts account creations and can be told
    /// to fail them
    #[derive(Default)]
    pub struct TestRepo {
        pub inner: InMemorySignupRepository,
        pub create_calls: AtomicUsize,
        pub fail_create: AtomicBool,
    }

    impl PendingRegistrationStore for TestRepo {
        async fn put(&self, registration: &PendingRegistration) -> SignupResult<()> {
            self.inner.put(registration).await
        }

        async fn get(&self, identity: &Email) -> SignupResult<Option<PendingRegistration>> {
            self.inner.get(identity).await
        }

        async fn delete(&self, identity: &Email) -> SignupResult<()> {
            self.inner.delete(identity).await
        }

        async fn purge_expired(&self, before: i64) -> SignupResult<u64> {
            self.inner.purge_expired(before).await
        }
    }

    impl AccountRepository for TestRepo {
        async fn find_by_identity(&self, identity: &Email) -> SignupResult<Option<Account>> {
            self.inner.find_by_identity(identity).await
        }

        async fn create(&self, account: &NewAccount) -> SignupResult<Account> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_create.load(Ordering::SeqCst) {
                return Err(SignupError::Internal("accounts table unavailable".to_string()));
            }
            self.inner.create(account).await
        }

        async fn assign_role(&self, account_id: AccountId, role: AccountRole) -> SignupResult<()> {
            self.inner.assign_role(account_id, role).await
        }
    }

    pub struct Harness {
        pub repo: Arc<TestRepo>,
        pub clock: Arc<ManualClock>,
        pub recorder: Arc<RecordingDispatcher>,
        pub queue: NotificationQueue,
        pub locks: Arc<IdentityLocks>,
        pub config: Arc<SignupConfig>,
    }

    impl Harness {
        pub fn new() -> Self {
            let recorder = Arc::new(RecordingDispatcher::default());
            let queue = NotificationQueue::spawn(recorder.clone(), 64);
            Self::with_queue(recorder, queue)
        }

        pub fn with_failing_mail() -> Self {
            let queue = NotificationQueue::spawn(Arc::new(FailingDispatcher), 64);
            Self::with_queue(Arc::new(RecordingDispatcher::default()), queue)
        }

        pub fn with_config(config: SignupConfig) -> Self {
            let mut h = Self::new();
            h.config = Arc::new(config);
            h
        }

        fn with_queue(recorder: Arc<RecordingDispatcher>, queue: NotificationQueue) -> Self {
            Self {
                repo: Arc::new(TestRepo::default()),
                clock: Arc::new(ManualClock::new(START)),
                recorder,
                queue,
                locks: Arc::new(IdentityLocks::new()),
                config: Arc::new(SignupConfig::default()),
            }
        }

        fn clock(&self) -> Arc<dyn Clock> {
            self.clock.clone()
        }

        pub fn register_use_case(&self) -> RequestRegistrationUseCase<TestRepo, TestRepo> {
            RequestRegistrationUseCase::new(
                self.repo.clone(),
                self.repo.clone(),
                self.queue.clone(),
                self.clock(),
                self.locks.clone(),
                self.config.clone(),
            )
        }

        pub fn verify_use_case(&self) -> VerifyRegistrationUseCase<TestRepo, TestRepo> {
            VerifyRegistrationUseCase::new(
                self.repo.clone(),
                self.repo.clone(),
                self.queue.clone(),
                self.clock(),
                self.locks.clone(),
                self.config.clone(),
            )
        }

        pub async fn register(
            &self,
            email: &str,
            category: &str,
        ) -> SignupResult<RegistrationOutput> {
            self.register_use_case()
                .execute(registration_input(email, category))
                .await
        }

        pub async fn verify(&self, email: &str, code: &str) -> SignupResult<VerificationOutput> {
            self.verify_use_case()
                .execute(VerificationInput {
                    email: email.to_string(),
                    code: code.to_string(),
                })
                .await
        }

        pub async fn pending(&self, email: &str) -> Option<PendingRegistration> {
            self.repo.get(&Email::new(email).unwrap()).await.unwrap()
        }

        pub async fn stored_code(&self, email: &str) -> String {
            self.pending(email)
                .await
                .expect("pending registration")
                .otp_code
                .to_string()
        }

        pub fn create_calls(&self) -> usize {
            self.repo.create_calls.load(Ordering::SeqCst)
        }
    }

    pub fn registration_input(email: &str, category: &str) -> RegistrationInput {
        RegistrationInput {
            full_name: "Ada".to_string(),
            email: email.to_string(),
            password: "x".to_string(),
            category: category.to_string(),
        }
    }

    /// A six-digit code guaranteed to differ from `code`
    pub fn other_code(code: &str) -> String {
        let n: u32 = code.parse().unwrap();
        format!("{:06}", (n + 1) % 1_000_000)
    }
}

#[cfg(test)]
mod workflow_tests {
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    use tokio_test::{assert_err, assert_ok};

    use super::support::*;
    use crate::application::config::SignupConfig;
    use crate::domain::entity::notification::NotificationTemplate;
    use crate::domain::repository::PendingRegistrationStore;
    use crate::domain::value_object::account_role::AccountRole;
    use crate::error::SignupError;

    #[tokio::test]
    async fn test_round_trip_creates_inactive_account_once() {
        let h = Harness::new();

        let output = assert_ok!(h.register("ada@example.com", "Primary").await);
        assert_eq!(output.identity.as_str(), "ada@example.com");

        let record = h.pending("ada@example.com").await.unwrap();
        assert_eq!(record.otp_code.as_str().len(), 6);
        assert!(record.otp_code.as_str().bytes().all(|b| b.is_ascii_digit()));
        assert_eq!(record.expires_at - record.created_at, 600);
        assert_eq!(record.created_at, START);

        h.clock.advance(120);
        let verified = assert_ok!(h.verify("ada@example.com", record.otp_code.as_str()).await);
        assert_eq!(verified.role, AccountRole::Blogger);

        assert_eq!(h.create_calls(), 1);
        let stored = h.repo.inner.stored_account("ada@example.com").unwrap();
        assert!(!stored.account.is_active);
        assert_eq!(stored.account.display_name.as_str(), "Ada");
        assert_eq!(stored.credential_secret.expose(), "x");
        assert_eq!(stored.roles, vec![AccountRole::Blogger]);
        assert!(h.pending("ada@example.com").await.is_none());
    }

    #[tokio::test]
    async fn test_secondary_category_gets_guest_role() {
        let h = Harness::new();
        h.register("grace@example.com", "secondary").await.unwrap();
        let code = h.stored_code("grace@example.com").await;

        let verified = h.verify("grace@example.com", &code).await.unwrap();
        assert_eq!(verified.role, AccountRole::GuestBlogger);
    }

    #[tokio::test]
    async fn test_notifications_for_each_step() {
        let h = Harness::new();
        h.register("ada@example.com", "Primary").await.unwrap();
        let code = h.stored_code("ada@example.com").await;
        h.verify("ada@example.com", &code).await.unwrap();
        h.queue.flush().await;

        let sent = h.recorder.sent();
        let templates: Vec<_> = sent.iter().map(|n| n.template).collect();
        assert_eq!(
            templates,
            vec![
                NotificationTemplate::Otp,
                NotificationTemplate::AdminNotify,
                NotificationTemplate::Thanks
            ]
        );

        assert_eq!(sent[0].recipient, "ada@example.com");
        assert_eq!(sent[0].variables["otp"], code);
        assert_eq!(sent[0].variables["expires_in_minutes"], "10");

        assert_eq!(sent[1].recipient, "admin@localhost");
        assert_eq!(sent[1].variables["email"], "ada@example.com");
        assert_eq!(sent[1].variables["category"], "Blogger");

        assert_eq!(sent[2].recipient, "ada@example.com");
        assert!(sent.iter().all(|n| n.locale_id == "en"));
    }

    #[tokio::test]
    async fn test_existing_account_blocks_registration() {
        let h = Harness::new();
        h.register("ada@example.com", "Primary").await.unwrap();
        let code = h.stored_code("ada@example.com").await;
        h.verify("ada@example.com", &code).await.unwrap();

        let err = assert_err!(h.register("ADA@example.com", "Secondary").await);
        assert!(matches!(err, SignupError::DuplicateAccount));
        assert!(h.pending("ada@example.com").await.is_none());

        h.queue.flush().await;
        assert_eq!(h.recorder.codes_sent_to("ada@example.com").len(), 1);
    }

    #[tokio::test]
    async fn test_code_valid_through_last_second() {
        let h = Harness::new();
        h.register("ada@example.com", "Primary").await.unwrap();
        let code = h.stored_code("ada@example.com").await;

        h.clock.advance(600);
        assert_ok!(h.verify("ada@example.com", &code).await);
    }

    #[tokio::test]
    async fn test_matching_code_after_window_is_expired() {
        let h = Harness::new();
        h.register("ada@example.com", "Primary").await.unwrap();
        let code = h.stored_code("ada@example.com").await;

        h.clock.advance(601);
        let err = assert_err!(h.verify("ada@example.com", &code).await);
        assert!(matches!(err, SignupError::CodeExpired));

        assert!(h.pending("ada@example.com").await.is_some());
        assert_eq!(h.create_calls(), 0);
    }

    #[tokio::test]
    async fn test_window_is_fixed_whatever_the_config() {
        let mut config = SignupConfig::development();
        config.pending_retention = Duration::from_secs(7 * 24 * 60 * 60);
        let h = Harness::with_config(config);

        let out = h.register("ada@example.com", "Primary").await.unwrap();
        let record = h.pending("ada@example.com").await.unwrap();
        assert_eq!(record.expires_at - record.created_at, 600);
        assert_eq!(out.expires_at, START + 600);

        // A stored row claiming a longer window does not extend it
        let mut stretched = record.clone();
        stretched.expires_at = stretched.created_at + 3_600;
        h.repo.put(&stretched).await.unwrap();

        h.clock.advance(601);
        let err = assert_err!(h.verify("ada@example.com", &record.otp_code.to_string()).await);
        assert!(matches!(err, SignupError::CodeExpired));
        assert_eq!(h.create_calls(), 0);
    }

    #[tokio::test]
    async fn test_expiry_reported_over_mismatch() {
        let h = Harness::new();
        h.register("ada@example.com", "Primary").await.unwrap();
        let code = h.stored_code("ada@example.com").await;

        h.clock.advance(3_600);
        let err = assert_err!(h.verify("ada@example.com", &other_code(&code)).await);
        assert!(matches!(err, SignupError::CodeExpired));
    }

    #[tokio::test]
    async fn test_resubmission_invalidates_first_code() {
        let h = Harness::new();
        h.register("ada@example.com", "Primary").await.unwrap();
        let first = h.stored_code("ada@example.com").await;

        h.clock.advance(30);
        h.register("ada@example.com", "Secondary").await.unwrap();
        let second = h.stored_code("ada@example.com").await;

        assert_eq!(h.repo.inner.pending_count(), 1);
        let record = h.pending("ada@example.com").await.unwrap();
        assert_eq!(record.created_at, START + 30);

        h.queue.flush().await;
        assert_eq!(
            h.recorder.codes_sent_to("ada@example.com"),
            vec![first.clone(), second.clone()]
        );

        if first != second {
            let err = assert_err!(h.verify("ada@example.com", &first).await);
            assert!(matches!(err, SignupError::CodeMismatch));
        }
        let verified = assert_ok!(h.verify("ada@example.com", &second).await);
        assert_eq!(verified.role, AccountRole::GuestBlogger);
    }

    #[tokio::test]
    async fn test_repeat_verification_is_not_found() {
        let h = Harness::new();
        h.register("ada@example.com", "Primary").await.unwrap();
        let code = h.stored_code("ada@example.com").await;
        h.verify("ada@example.com", &code).await.unwrap();

        let err = assert_err!(h.verify("ada@example.com", &code).await);
        assert!(matches!(err, SignupError::PendingNotFound));
        let err = assert_err!(h.verify("ada@example.com", &other_code(&code)).await);
        assert!(matches!(err, SignupError::PendingNotFound));

        assert_eq!(h.create_calls(), 1);
        assert_eq!(h.repo.inner.account_count(), 1);
    }

    #[tokio::test]
    async fn test_mismatch_keeps_pending_record() {
        let h = Harness::new();
        h.register("ada@example.com", "Primary").await.unwrap();
        let code = h.stored_code("ada@example.com").await;

        let err = assert_err!(h.verify("ada@example.com", &other_code(&code)).await);
        assert!(matches!(err, SignupError::CodeMismatch));

        // No normalization of the submitted code
        let padded = format!(" {}", code);
        let err = assert_err!(h.verify("ada@example.com", &padded).await);
        assert!(matches!(err, SignupError::CodeMismatch));

        assert!(h.pending("ada@example.com").await.is_some());
        assert_eq!(h.create_calls(), 0);

        // Retry within the window still works
        assert_ok!(h.verify("ada@example.com", &code).await);
    }

    #[tokio::test]
    async fn test_verify_without_registration_is_not_found() {
        let h = Harness::new();
        let err = assert_err!(h.verify("nobody@example.com", "123456").await);
        assert!(matches!(err, SignupError::PendingNotFound));
    }

    #[tokio::test]
    async fn test_verify_requires_code_and_valid_email() {
        let h = Harness::new();

        let err = assert_err!(h.verify("ada@example.com", "").await);
        assert!(matches!(&err, SignupError::Validation(f) if f[0].field == "code"));

        let err = assert_err!(h.verify("not-an-email", "123456").await);
        assert!(matches!(&err, SignupError::Validation(f) if f[0].field == "email"));
    }

    #[tokio::test]
    async fn test_invalid_registration_has_no_side_effects() {
        let h = Harness::new();
        let err = assert_err!(
            h.register_use_case()
                .execute(crate::application::request_registration::RegistrationInput {
                    full_name: String::new(),
                    email: "ada@example".to_string(),
                    password: "x".to_string(),
                    category: "editor".to_string(),
                })
                .await
        );

        let SignupError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        let names: Vec<_> = fields.iter().map(|f| f.field).collect();
        assert_eq!(names, vec!["fullName", "email", "category"]);

        assert_eq!(h.repo.inner.pending_count(), 0);
        h.queue.flush().await;
        assert!(h.recorder.sent().is_empty());
    }

    #[tokio::test]
    async fn test_account_creation_failure_preserves_pending() {
        let h = Harness::new();
        h.register("ada@example.com", "Primary").await.unwrap();
        let code = h.stored_code("ada@example.com").await;

        h.repo.fail_create.store(true, Ordering::SeqCst);
        let err = assert_err!(h.verify("ada@example.com", &code).await);
        assert!(matches!(err, SignupError::AccountCreation(_)));
        assert!(h.pending("ada@example.com").await.is_some());
        assert_eq!(h.repo.inner.account_count(), 0);

        h.queue.flush().await;
        assert!(
            h.recorder
                .sent()
                .iter()
                .all(|n| n.template == NotificationTemplate::Otp)
        );

        h.repo.fail_create.store(false, Ordering::SeqCst);
        assert_ok!(h.verify("ada@example.com", &code).await);
        assert!(h.pending("ada@example.com").await.is_none());
        assert_eq!(h.create_calls(), 2);
    }

    #[tokio::test]
    async fn test_mail_failure_does_not_fail_workflow() {
        let h = Harness::with_failing_mail();
        assert_ok!(h.register("ada@example.com", "Primary").await);
        let code = h.stored_code("ada@example.com").await;

        h.queue.flush().await;
        assert_ok!(h.verify("ada@example.com", &code).await);
        h.queue.flush().await;
        assert_eq!(h.repo.inner.account_count(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_resubmission_last_put_wins() {
        let h = Harness::new();

        let first = {
            let use_case = h.register_use_case();
            tokio::spawn(async move {
                use_case
                    .execute(registration_input("ada@example.com", "Primary"))
                    .await
            })
        };
        let second = {
            let use_case = h.register_use_case();
            tokio::spawn(async move {
                use_case
                    .execute(registration_input("ada@example.com", "Secondary"))
                    .await
            })
        };
        assert_ok!(first.await.unwrap());
        assert_ok!(second.await.unwrap());

        h.queue.flush().await;
        let codes = h.recorder.codes_sent_to("ada@example.com");
        assert_eq!(codes.len(), 2);

        // The stored record is one whole submission, never a mix of both
        assert_eq!(h.repo.inner.pending_count(), 1);
        let record = h.pending("ada@example.com").await.unwrap();
        let stored = record.otp_code.to_string();
        assert!(codes.contains(&stored));
        assert_eq!(record.expires_at - record.created_at, 600);

        let stale: Vec<_> = codes.iter().filter(|c| **c != stored).collect();
        for code in stale {
            let err = assert_err!(h.verify("ada@example.com", code).await);
            assert!(matches!(err, SignupError::CodeMismatch));
        }
        assert_ok!(h.verify("ada@example.com", &stored).await);
        assert_eq!(h.create_calls(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_verification_creates_one_account() {
        let h = Harness::new();
        h.register("ada@example.com", "Primary").await.unwrap();
        let code = h.stored_code("ada@example.com").await;

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let use_case = h.verify_use_case();
            let code = code.clone();
            tasks.push(tokio::spawn(async move {
                use_case
                    .execute(crate::application::verify_registration::VerificationInput {
                        email: "ada@example.com".to_string(),
                        code,
                    })
                    .await
            }));
        }

        let mut succeeded = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => succeeded += 1,
                Err(e) => assert!(matches!(e, SignupError::PendingNotFound)),
            }
        }
        assert_eq!(succeeded, 1);
        assert_eq!(h.create_calls(), 1);
        assert!(h.locks.is_empty());
    }
}

#[cfg(test)]
mod purge_tests {
    use tokio_test::assert_ok;

    use super::support::*;
    use crate::application::purge_expired::PurgeExpiredUseCase;
    use crate::error::SignupError;

    #[tokio::test]
    async fn test_purge_keeps_records_within_retention() {
        let h = Harness::new();
        h.register("ada@example.com", "Primary").await.unwrap();
        let purge = PurgeExpiredUseCase::new(h.repo.clone(), h.clock.clone(), h.config.clone());

        // Expired but inside the grace period: still reported as expired
        h.clock.advance(600 + 86_400);
        assert_eq!(assert_ok!(purge.execute().await), 0);
        let code = h.stored_code("ada@example.com").await;
        assert!(matches!(
            h.verify("ada@example.com", &code).await,
            Err(SignupError::CodeExpired)
        ));

        h.clock.advance(1);
        assert_eq!(assert_ok!(purge.execute().await), 1);
        assert!(matches!(
            h.verify("ada@example.com", &code).await,
            Err(SignupError::PendingNotFound)
        ));
    }
}

#[cfg(test)]
mod router_tests {
    use std::sync::Arc;

    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use platform::clock::{Clock, ManualClock};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::support::*;
    use crate::application::config::SignupConfig;
    use crate::application::notifier::NotificationQueue;
    use crate::domain::repository::PendingRegistrationStore;
    use crate::domain::value_object::email::Email;
    use crate::infra::memory::InMemorySignupRepository;
    use crate::presentation::router::signup_router_generic;

    struct App {
        router: Router,
        repo: InMemorySignupRepository,
        clock: Arc<ManualClock>,
    }

    fn app() -> App {
        let repo = InMemorySignupRepository::new();
        let clock = Arc::new(ManualClock::new(START));
        let queue = NotificationQueue::spawn(Arc::new(RecordingDispatcher::default()), 16);
        let dyn_clock: Arc<dyn Clock> = clock.clone();
        let router = signup_router_generic(repo.clone(), queue, dyn_clock, SignupConfig::default());
        App {
            router,
            repo,
            clock,
        }
    }

    async fn post(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    fn ada() -> Value {
        json!({
            "fullName": "Ada",
            "email": "ada@example.com",
            "password": "x",
            "category": "Primary"
        })
    }

    async fn stored_code(repo: &InMemorySignupRepository) -> String {
        repo.get(&Email::new("ada@example.com").unwrap())
            .await
            .unwrap()
            .unwrap()
            .otp_code
            .to_string()
    }

    #[tokio::test]
    async fn test_register_then_verify() {
        let app = app();

        let (status, body) = post(&app.router, "/register", ada()).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(body["identity"], "ada@example.com");
        assert_eq!(body["verifyUrl"], "/verify?email=ada%40example.com");
        assert_eq!(body["expiresAt"], START + 600);

        let code = stored_code(&app.repo).await;
        let (status, body) = post(
            &app.router,
            "/verify",
            json!({ "email": "ada@example.com", "code": code }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "pending_approval");

        let (status, body) = post(
            &app.router,
            "/verify",
            json!({ "email": "ada@example.com", "code": code }),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], 404);

        let (status, _) = post(&app.router, "/register", ada()).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_verify_error_statuses() {
        let app = app();
        post(&app.router, "/register", ada()).await;
        let code = stored_code(&app.repo).await;

        let (status, body) = post(
            &app.router,
            "/verify",
            json!({ "email": "ada@example.com", "code": other_code(&code) }),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["detail"], "Invalid code");

        app.clock.advance(601);
        let (status, body) = post(
            &app.router,
            "/verify",
            json!({ "email": "ada@example.com", "code": code }),
        )
        .await;
        assert_eq!(status, StatusCode::GONE);
        assert_eq!(body["detail"], "Code expired, please restart");
    }

    #[tokio::test]
    async fn test_register_reports_field_errors() {
        let app = app();

        let (status, body) = post(
            &app.router,
            "/register",
            json!({ "email": "bad", "category": "Primary" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let errors = body["errors"].as_array().unwrap();
        let fields: Vec<_> = errors.iter().map(|e| e["field"].as_str().unwrap()).collect();
        assert_eq!(fields, vec!["fullName", "email", "password"]);
        assert_eq!(app.repo.pending_count(), 0);
    }
}
