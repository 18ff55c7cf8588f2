//! Test utilities for the portal crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is only compiled when running tests
//! or with the `test-support` feature.

pub mod ports {
    //! Scripted port doubles that record what handlers asked for.
    //!
    //! Unlike the `mockall` mocks these are available to integration tests
    //! and answer by path, so one double can serve a whole screen.

    use std::collections::{HashMap, VecDeque};
    use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

    use async_trait::async_trait;
    use pagination::ListQuery;
    use serde_json::{Value, json};

    use crate::domain::ports::{
        BackendCommand, BackendError, FileUpload, ResourceCommand, ResourceQuery, UploadFile,
    };
    use crate::domain::{BackendCredentials, Session};
    use crate::inbound::http::state::HttpStatePorts;

    fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
        mutex.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Session of a user with `role`.
    ///
    /// # Examples
    /// ```
    /// use portal::test_support::ports::session_for;
    ///
    /// assert_eq!(session_for("cashier").role_name(), Some("cashier"));
    /// ```
    pub fn session_for(role: &str) -> Session {
        serde_json::from_value(json!({
            "user": {"id": 1, "email": format!("{role}@store.test"), "role": role}
        }))
        .unwrap_or_default()
    }

    /// One GET the double answered.
    #[derive(Debug, Clone, PartialEq)]
    pub struct SeenRequest {
        /// Path relative to the backend base URL.
        pub path: String,
        /// Query sent with it.
        pub query: ListQuery,
        /// Forwarded cookie header.
        pub cookie: Option<String>,
    }

    /// [`ResourceQuery`] answering from per-path scripts.
    ///
    /// Each path holds a queue of answers; the last answer repeats. Paths
    /// without a script answer with an empty, complete list.
    #[derive(Debug, Default)]
    pub struct ScriptedResources {
        scripts: Mutex<HashMap<String, VecDeque<Result<Value, BackendError>>>>,
        seen: Mutex<Vec<SeenRequest>>,
    }

    impl ScriptedResources {
        /// Empty double.
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue `body` as the next answer for `path`.
        #[must_use]
        pub fn respond(self, path: &str, body: Value) -> Self {
            self.push(path, Ok(body))
        }

        /// Queue `error` as the next answer for `path`.
        #[must_use]
        pub fn fail(self, path: &str, error: BackendError) -> Self {
            self.push(path, Err(error))
        }

        fn push(self, path: &str, answer: Result<Value, BackendError>) -> Self {
            lock(&self.scripts)
                .entry(path.to_owned())
                .or_default()
                .push_back(answer);
            self
        }

        /// Every GET answered so far, in order.
        pub fn seen(&self) -> Vec<SeenRequest> {
            lock(&self.seen).clone()
        }

        /// GETs answered for `path`.
        pub fn requests_to(&self, path: &str) -> usize {
            lock(&self.seen).iter().filter(|seen| seen.path == path).count()
        }
    }

    #[async_trait]
    impl ResourceQuery for ScriptedResources {
        async fn fetch(
            &self,
            credentials: &BackendCredentials,
            path: &str,
            query: &ListQuery,
        ) -> Result<Value, BackendError> {
            lock(&self.seen).push(SeenRequest {
                path: path.to_owned(),
                query: query.clone(),
                cookie: credentials.cookie_header().map(str::to_owned),
            });
            let mut scripts = lock(&self.scripts);
            let Some(queue) = scripts.get_mut(path) else {
                return Ok(json!({ "rows": [], "nextCursor": null }));
            };
            let answer = if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            };
            answer.unwrap_or_else(|| Ok(json!({ "rows": [] })))
        }
    }

    /// [`ResourceCommand`] recording every command it receives.
    #[derive(Debug, Default)]
    pub struct RecordingCommands {
        failure: Mutex<Option<BackendError>>,
        submitted: Mutex<Vec<BackendCommand>>,
    }

    impl RecordingCommands {
        /// Double accepting everything.
        pub fn new() -> Self {
            Self::default()
        }

        /// Double refusing every command with `error`.
        pub fn failing(error: BackendError) -> Self {
            Self {
                failure: Mutex::new(Some(error)),
                submitted: Mutex::default(),
            }
        }

        /// Commands received so far, in order.
        pub fn submitted(&self) -> Vec<BackendCommand> {
            lock(&self.submitted).clone()
        }
    }

    #[async_trait]
    impl ResourceCommand for RecordingCommands {
        async fn submit(
            &self,
            _credentials: &BackendCredentials,
            command: &BackendCommand,
        ) -> Result<Value, BackendError> {
            lock(&self.submitted).push(command.clone());
            match lock(&self.failure).clone() {
                Some(error) => Err(error),
                None => Ok(json!({ "ok": true })),
            }
        }
    }

    /// [`FileUpload`] recording the size of every batch.
    #[derive(Debug, Default)]
    pub struct RecordingUploads {
        batches: Mutex<Vec<usize>>,
    }

    impl RecordingUploads {
        /// Files per batch received so far.
        pub fn batches(&self) -> Vec<usize> {
            lock(&self.batches).clone()
        }
    }

    #[async_trait]
    impl FileUpload for RecordingUploads {
        async fn upload(
            &self,
            _credentials: &BackendCredentials,
            files: &[UploadFile],
        ) -> Result<Vec<String>, BackendError> {
            lock(&self.batches).push(files.len());
            Ok(files
                .iter()
                .map(|file| format!("https://files.test/{}", file.file_name))
                .collect())
        }
    }

    /// Port bundle for a visitor signed in as `role`.
    pub fn ports_for(
        role: &str,
        resources: Arc<ScriptedResources>,
        commands: Arc<RecordingCommands>,
    ) -> HttpStatePorts {
        HttpStatePorts {
            session: Arc::new(crate::domain::ports::FixtureSessionQuery::new(session_for(
                role,
            ))),
            resources,
            commands,
            ..HttpStatePorts::default()
        }
    }
}
