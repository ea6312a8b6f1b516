use crate::error::{Error, Result};
use crate::record::decode;
use crate::store::Bucket;
use futures::future::{BoxFuture, FutureExt};
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::server::Server;
use hyper::{service, Body, Request, Response, StatusCode};
use log::{info, warn};
use std::convert::Infallible;
use std::fmt;
use std::net::SocketAddr;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Anything that can answer an inbound HTTP request.
///
/// A handler is cloned for every request, so it should be cheap to clone.
pub trait Handler: Clone + Send + Sync + 'static {
    fn handle(&self, request: Request<Body>) -> BoxFuture<'static, Response<Body>>;
}

/// Bind `addr` and serve `handler` on the current tokio runtime.
/// Port 0 picks a free port; the bound address is available from the
/// returned `RunningServer`.
pub fn serve<H: Handler>(addr: SocketAddr, handler: H) -> Result<RunningServer> {
    let service = service::make_service_fn(move |_| {
        let handler = handler.clone();
        async move {
            Ok::<_, Infallible>(service::service_fn(move |req| {
                handler.handle(req).map(Ok::<_, Infallible>)
            }))
        }
    });

    let server = Server::try_bind(&addr).map_err(Error::Bind)?.serve(service);
    let addr = server.local_addr();
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let server = server.with_graceful_shutdown(async {
        let _ = shutdown_rx.await;
    });
    let task = tokio::spawn(async move {
        if let Err(e) = server.await {
            warn!("{}", e);
        }
    });
    Ok(RunningServer {
        addr,
        shutdown_tx: Some(shutdown_tx),
        task: Some(task),
    })
}

/// A listener started by `serve`.
/// Dropping it stops accepting new connections.
pub struct RunningServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl RunningServer {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Base URL of the server, without a trailing slash.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the server and wait for in-flight connections to finish.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("{}", e);
            }
        }
    }
}

impl Drop for RunningServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Stores posted todos in a bucket.
/// The request URI is used as the key and the raw JSON payload as the value.
#[derive(Clone)]
pub struct TodoService {
    todos: Bucket,
    verbose: bool,
}

impl TodoService {
    pub fn new(todos: Bucket, verbose: bool) -> Self {
        Self { todos, verbose }
    }

    async fn put(self, request: Request<Body>) -> Response<Body> {
        let key = match request.uri().path_and_query() {
            Some(path) => path.as_str().to_string(),
            None => request.uri().path().to_string(),
        };

        let body = match hyper::body::to_bytes(request.into_body()).await {
            Ok(body) => body,
            Err(err) => return error_response(err),
        };
        let todo = match decode(&body) {
            Ok(todo) => todo,
            Err(err) => return error_response(err),
        };

        // The payload is stored exactly as the client sent it.
        if let Err(err) = self.todos.put(key.as_bytes(), &body) {
            return error_response(err);
        }

        if self.verbose {
            info!("server: {}: {}", key, todo);
        }
        text_response(
            StatusCode::OK,
            format!("put todo for {}: {}\n", key, todo),
        )
    }
}

impl Handler for TodoService {
    fn handle(&self, request: Request<Body>) -> BoxFuture<'static, Response<Body>> {
        self.clone().put(request).boxed()
    }
}

fn text_response(status: StatusCode, body: String) -> Response<Body> {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
    response
}

fn error_response<E: fmt::Display>(err: E) -> Response<Body> {
    text_response(StatusCode::INTERNAL_SERVER_ERROR, format!("{}\n", err))
}
