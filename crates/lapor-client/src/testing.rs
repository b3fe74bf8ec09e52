//! In-memory collaborators for unit tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use async_trait::async_trait;
use lapor_api_models::Role;
use serde_json::Value;

use crate::error::ClientError;
use crate::images::ImageHandleFactory;
use crate::session::{MemorySession, Session};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, Method};

type Reply = Result<HttpResponse, String>;
type SendHook = Box<dyn Fn(&HttpRequest)>;

struct Route {
    method: Method,
    path: String,
    replies: VecDeque<Reply>,
}

/// Routes requests by method and URL suffix. The last queued reply of a
/// route is repeated; unmatched requests get a JSON 404.
#[derive(Default)]
pub(crate) struct FakeTransport {
    routes: RefCell<Vec<Route>>,
    requests: RefCell<Vec<HttpRequest>>,
    on_send: RefCell<Option<SendHook>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(&self, method: Method, path: &str, response: HttpResponse) {
        self.push(method, path, Ok(response));
    }

    pub(crate) fn respond_raw(&self, method: Method, path: &str, status: u16, body: &str) {
        self.push(
            method,
            path,
            Ok(HttpResponse {
                status,
                status_text: String::new(),
                content_type: None,
                body: body.as_bytes().to_vec(),
            }),
        );
    }

    pub(crate) fn fail(&self, method: Method, path: &str, message: &str) {
        self.push(method, path, Err(message.to_string()));
    }

    pub(crate) fn on_send(&self, hook: impl Fn(&HttpRequest) + 'static) {
        *self.on_send.borrow_mut() = Some(Box::new(hook));
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub(crate) fn last_request(&self) -> Option<HttpRequest> {
        self.requests.borrow().last().cloned()
    }

    pub(crate) fn count(&self, method: Method, path: &str) -> usize {
        self.requests
            .borrow()
            .iter()
            .filter(|request| request.method == method && request.url.ends_with(path))
            .count()
    }

    fn push(&self, method: Method, path: &str, reply: Reply) {
        let mut routes = self.routes.borrow_mut();
        if let Some(route) = routes
            .iter_mut()
            .find(|route| route.method == method && route.path == path)
        {
            route.replies.push_back(reply);
        } else {
            routes.push(Route {
                method,
                path: path.to_string(),
                replies: VecDeque::from([reply]),
            });
        }
    }

    fn reply_for(&self, request: &HttpRequest) -> Reply {
        let mut routes = self.routes.borrow_mut();
        let route = routes
            .iter_mut()
            .find(|route| route.method == request.method && request.url.ends_with(&route.path));
        match route {
            Some(route) if route.replies.len() > 1 => route
                .replies
                .pop_front()
                .unwrap_or_else(|| Err("empty route".into())),
            Some(route) => route
                .replies
                .front()
                .cloned()
                .unwrap_or_else(|| Err("empty route".into())),
            None => Ok(json_response(404, &serde_json::json!({ "message": "not found" }))),
        }
    }
}

#[async_trait(?Send)]
impl HttpTransport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        self.requests.borrow_mut().push(request.clone());
        let hook = self.on_send.borrow_mut().take();
        if let Some(hook) = hook {
            hook(&request);
            *self.on_send.borrow_mut() = Some(hook);
        }
        self.reply_for(&request).map_err(ClientError::transport)
    }
}

pub(crate) fn json_response(status: u16, body: &Value) -> HttpResponse {
    HttpResponse {
        status,
        status_text: String::new(),
        content_type: Some("application/json".into()),
        body: body.to_string().into_bytes(),
    }
}

pub(crate) fn image_response(status: u16, bytes: &[u8]) -> HttpResponse {
    HttpResponse {
        status,
        status_text: if status == 200 { "OK".into() } else { "Forbidden".into() },
        content_type: Some("image/jpeg".into()),
        body: bytes.to_vec(),
    }
}

pub(crate) fn session_with_token(token: &str) -> MemorySession {
    MemorySession::new(Session {
        token: Some(token.to_string()),
        role: Some(Role::User),
        name: Some("Warga".into()),
    })
}

pub(crate) fn admin_session() -> MemorySession {
    MemorySession::new(Session {
        token: Some("admin-token".into()),
        role: Some(Role::Admin),
        name: Some("Admin Desa".into()),
    })
}

/// Hands out `blob:test/<n>` handles and tracks which are still live.
#[derive(Default)]
pub(crate) struct CountingFactory {
    next: Cell<usize>,
    live: RefCell<Vec<String>>,
    released: RefCell<Vec<String>>,
}

impl CountingFactory {
    pub(crate) fn created(&self) -> usize {
        self.next.get()
    }

    pub(crate) fn live(&self) -> Vec<String> {
        self.live.borrow().clone()
    }

    pub(crate) fn released(&self) -> Vec<String> {
        self.released.borrow().clone()
    }
}

impl ImageHandleFactory for CountingFactory {
    fn create(&self, _bytes: &[u8], _content_type: Option<&str>) -> Result<String, ClientError> {
        let n = self.next.get() + 1;
        self.next.set(n);
        let handle = format!("blob:test/{n}");
        self.live.borrow_mut().push(handle.clone());
        Ok(handle)
    }

    fn release(&self, handle: &str) {
        self.live.borrow_mut().retain(|live| live != handle);
        self.released.borrow_mut().push(handle.to_string());
    }
}
