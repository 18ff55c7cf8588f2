//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use pagination::PageLimit;
use url::Url;

use crate::domain::ports::{
    FileUpload, FixtureFileUpload, FixtureResourceCommand, FixtureResourceQuery,
    FixtureSessionCommand, FixtureSessionQuery, ResourceCommand, ResourceQuery, SessionCommand,
    SessionQuery,
};
use crate::domain::{BusyRows, RoleGate};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    /// Session bootstrap.
    pub session: Arc<dyn SessionQuery>,
    /// Sign in and out.
    pub auth: Arc<dyn SessionCommand>,
    /// Collection reads.
    pub resources: Arc<dyn ResourceQuery>,
    /// Writes.
    pub commands: Arc<dyn ResourceCommand>,
    /// Multipart uploads.
    pub uploads: Arc<dyn FileUpload>,
}

impl HttpStatePorts {
    /// Bundle one adapter that implements every port.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    /// use std::time::Duration;
    ///
    /// use portal::inbound::http::state::HttpStatePorts;
    /// use portal::outbound::backend::BackendHttpClient;
    ///
    /// let base = url::Url::parse("http://localhost:3000/api/").expect("url");
    /// let backend = BackendHttpClient::new(base, Duration::from_secs(30)).expect("client");
    /// let _ports = HttpStatePorts::from_backend(Arc::new(backend));
    /// ```
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: SessionQuery + SessionCommand + ResourceQuery + ResourceCommand + FileUpload + 'static,
    {
        Self {
            session: backend.clone(),
            auth: backend.clone(),
            resources: backend.clone(),
            commands: backend.clone(),
            uploads: backend,
        }
    }
}

impl Default for HttpStatePorts {
    fn default() -> Self {
        Self {
            session: Arc::new(FixtureSessionQuery::default()),
            auth: Arc::new(FixtureSessionCommand),
            resources: Arc::new(FixtureResourceQuery),
            commands: Arc::new(FixtureResourceCommand),
            uploads: Arc::new(FixtureFileUpload),
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Session bootstrap.
    pub session: Arc<dyn SessionQuery>,
    /// Sign in and out.
    pub auth: Arc<dyn SessionCommand>,
    /// Collection reads.
    pub resources: Arc<dyn ResourceQuery>,
    /// Writes.
    pub commands: Arc<dyn ResourceCommand>,
    /// Multipart uploads.
    pub uploads: Arc<dyn FileUpload>,
    /// Role gate shared by every guarded scope.
    pub gate: RoleGate,
    /// Rows with an action in flight, across all requests.
    pub busy: BusyRows,
    /// Page size requested from the backend.
    pub page_size: PageLimit,
    /// External owner portal, when configured.
    pub owner_portal: Option<Url>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state with the standard role table and default page size.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            session,
            auth,
            resources,
            commands,
            uploads,
        } = ports;
        Self {
            session,
            auth,
            resources,
            commands,
            uploads,
            gate: RoleGate::default(),
            busy: BusyRows::new(),
            page_size: PageLimit::default(),
            owner_portal: None,
        }
    }

    /// Use `page_size` for backend list requests.
    #[must_use]
    pub fn with_page_size(mut self, page_size: PageLimit) -> Self {
        self.page_size = page_size;
        self
    }

    /// Redirect owners to `url`.
    #[must_use]
    pub fn with_owner_portal(mut self, url: Option<Url>) -> Self {
        self.owner_portal = url;
        self
    }

    /// Replace the role gate.
    #[must_use]
    pub fn with_gate(mut self, gate: RoleGate) -> Self {
        self.gate = gate;
        self
    }
}
