use crate::config::Config;
use crate::error::{Error, Result};
use crate::http::{serve, Client, TodoService};
use crate::record::{decode, Todo};
use crate::store::{Bucket, Store};
use log::warn;
use std::net::{IpAddr, SocketAddr};
use tempfile::TempDir;

/// Bucket the posted todos are written to.
pub const TODOS_BUCKET: &str = "todos";

/// Daily todos to post, keyed by the route they are posted to.
pub fn daily_todos() -> Vec<(&'static str, Todo)> {
    vec![
        ("/mon", Todo::new("milk cows", "mon")),
        ("/tue", Todo::new("fold laundry", "tue")),
        ("/wed", Todo::new("flip burgers", "wed")),
        ("/thu", Todo::new("join army", "thu")),
        ("/fri", Todo::new("kill time", "fri")),
        ("/sat", Todo::new("make merry", "sat")),
        ("/sun", Todo::new("pray quietly", "sun")),
    ]
}

/// Runs the whole exercise: store, server, posts, verification and listing.
pub struct Driver {
    config: Config,
}

impl Driver {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run against a fresh scratch store and return the listing of the
    /// todos bucket, one `<route>: <task>` line per entry.
    ///
    /// The store is closed and its files are removed whether or not the
    /// run succeeds.
    pub async fn run(&self) -> Result<Vec<String>> {
        let scratch = self.scratch_directory()?;
        let store = Store::open(scratch.path().join("todos.db"))?;
        let outcome = self.exercise(&store).await;
        let cleanup = store.destroy();
        let lines = outcome?;
        cleanup?;
        Ok(lines)
    }

    fn scratch_directory(&self) -> Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("bolt-");
        let directory = match &self.config.directory {
            Some(parent) => builder.tempdir_in(parent)?,
            None => builder.tempdir()?,
        };
        Ok(directory)
    }

    async fn exercise(&self, store: &Store) -> Result<Vec<String>> {
        let todos = store.bucket(TODOS_BUCKET)?;
        let addr = SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.config.port);
        let server = serve(addr, TodoService::new(todos.clone(), self.config.verbose))?;

        let posts = daily_todos();
        self.post_all(&server.url(), &posts).await;
        server.shutdown().await;

        verify(&todos, &posts)?;
        listing(&todos)
    }

    /// Post every todo in order. Failures are logged and skipped.
    async fn post_all(&self, base_url: &str, posts: &[(&str, Todo)]) {
        let client = Client::new(self.config.verbose);
        for (route, todo) in posts {
            let body = match todo.encode() {
                Ok(body) => body,
                Err(e) => {
                    warn!("{}", e);
                    continue;
                }
            };
            let url = format!("{}{}", base_url, route);
            if let Err(e) = client.post(&url, body).await {
                warn!("{}", e);
            }
        }
    }
}

/// Check that every todo in `posts` is stored under its route.
pub fn verify(todos: &Bucket, posts: &[(&str, Todo)]) -> Result<()> {
    for (route, want) in posts {
        let encoded = todos
            .get(route.as_bytes())?
            .ok_or_else(|| Error::MissingEntry(route.to_string()))?;
        let got = decode_entry(route, &encoded)?;
        if &got != want {
            return Err(Error::Mismatch {
                route: route.to_string(),
                got,
                want: want.clone(),
            });
        }
    }
    Ok(())
}

/// One `<route>: <task>` line per stored todo, in ascending route order.
pub fn listing(todos: &Bucket) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    todos.for_each(|key, value| {
        let route = String::from_utf8_lossy(key);
        let todo = decode_entry(&route, value)?;
        lines.push(format!("{}: {}", route, todo.task));
        Ok(())
    })?;
    Ok(lines)
}

fn decode_entry(route: &str, bytes: &[u8]) -> Result<Todo> {
    decode(bytes).map_err(|err| match err {
        Error::Deserialization(source) => Error::CorruptEntry {
            route: route.to_string(),
            source,
        },
        err => err,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::scratch_store;

    fn expected_listing() -> Vec<String> {
        vec![
            "/fri: kill time",
            "/mon: milk cows",
            "/sat: make merry",
            "/sun: pray quietly",
            "/thu: join army",
            "/tue: fold laundry",
            "/wed: flip burgers",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    #[tokio::test]
    async fn run_end_to_end() {
        let lines = Driver::new(Config::default()).run().await.unwrap();
        assert_eq!(expected_listing(), lines);
    }

    #[tokio::test]
    async fn run_removes_scratch_store() {
        let parent = tempfile::tempdir().unwrap();
        let config = Config {
            verbose: true,
            directory: Some(parent.path().to_path_buf()),
            ..Config::default()
        };
        let lines = Driver::new(config).run().await.unwrap();
        assert_eq!(expected_listing(), lines);
        assert_eq!(0, std::fs::read_dir(parent.path()).unwrap().count());
    }

    #[tokio::test]
    async fn run_fails_on_missing_directory() {
        let parent = tempfile::tempdir().unwrap();
        let config = Config {
            directory: Some(parent.path().join("missing")),
            ..Config::default()
        };
        assert!(matches!(
            Driver::new(config).run().await,
            Err(Error::Io(_))
        ));
    }

    #[tokio::test]
    async fn post_all_survives_refused_connections() {
        let driver = Driver::new(Config::default());
        driver.post_all("http://127.0.0.1:1", &daily_todos()).await;
    }

    #[tokio::test]
    async fn post_all_continues_after_failed_post() {
        let (_dir, store) = scratch_store();
        let todos = store.bucket(TODOS_BUCKET).unwrap();
        let addr = SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 0);
        let server = serve(addr, TodoService::new(todos.clone(), false)).unwrap();

        let posts = vec![
            ("/mon", Todo::new("milk cows", "mon")),
            ("/bad route", Todo::new("nowhere", "tue")),
            ("/wed", Todo::new("flip burgers", "wed")),
        ];
        let driver = Driver::new(Config::default());
        driver.post_all(&server.url(), &posts).await;
        server.shutdown().await;

        assert_eq!(2, todos.len());
        verify(&todos, &[posts[0].clone(), posts[2].clone()]).unwrap();
    }

    #[test]
    fn verify_stored_todos() {
        let (_dir, store) = scratch_store();
        let todos = store.bucket(TODOS_BUCKET).unwrap();
        let posts = daily_todos();
        for (route, todo) in &posts {
            todos.put(route.as_bytes(), &todo.encode().unwrap()).unwrap();
        }
        verify(&todos, &posts).unwrap();
        assert_eq!(expected_listing(), listing(&todos).unwrap());
    }

    #[test]
    fn verify_missing_entry() {
        let (_dir, store) = scratch_store();
        let todos = store.bucket(TODOS_BUCKET).unwrap();
        let posts = daily_todos();
        match verify(&todos, &posts) {
            Err(Error::MissingEntry(route)) => assert_eq!("/mon", route),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn verify_corrupt_entry() {
        let (_dir, store) = scratch_store();
        let todos = store.bucket(TODOS_BUCKET).unwrap();
        todos.put(b"/mon", b"not json").unwrap();
        let posts = vec![("/mon", Todo::new("milk cows", "mon"))];
        match verify(&todos, &posts) {
            Err(Error::CorruptEntry { route, .. }) => assert_eq!("/mon", route),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(matches!(listing(&todos), Err(Error::CorruptEntry { .. })));
    }

    #[test]
    fn verify_mismatch() {
        let (_dir, store) = scratch_store();
        let todos = store.bucket(TODOS_BUCKET).unwrap();
        let stored = Todo::new("milk cows", "tue");
        todos.put(b"/mon", &stored.encode().unwrap()).unwrap();
        let posts = vec![("/mon", Todo::new("milk cows", "mon"))];
        let err = verify(&todos, &posts).unwrap_err();
        assert_eq!(
            "/mon: got {milk cows tue}, want {milk cows mon}",
            err.to_string()
        );
    }
}
