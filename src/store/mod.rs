use crate::error::{Error, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Name of the tree `sled` creates for itself in every database.
const DEFAULT_TREE: &[u8] = b"__sled__default";

/// Handle of an embedded, file-backed key-value database.
///
/// Data is split into named `Bucket`s. A `Store` and the buckets opened
/// from it are cheap to clone and can be shared across threads and tasks.
#[derive(Clone, Debug)]
pub struct Store {
    path: PathBuf,
    db: sled::Db,
}

impl Store {
    /// Open the database at `path`, creating it if it does not exist yet.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let store_path = path.as_ref().to_path_buf();
        let db = sled::open(&store_path).map_err(Error::StoreOpen)?;
        Ok(Self {
            path: store_path,
            db,
        })
    }

    /// Location of the database's backing files.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get a bucket named `name`, creating it if it is missing.
    pub fn bucket(&self, name: &str) -> Result<Bucket> {
        let tree = self
            .db
            .open_tree(name)
            .map_err(|source| Error::BucketCreate {
                name: name.to_string(),
                source,
            })?;
        Ok(Bucket {
            name: name.to_string(),
            tree,
        })
    }

    /// Names of every bucket in the database, in ascending order.
    pub fn bucket_names(&self) -> Vec<Vec<u8>> {
        let mut names: Vec<_> = self
            .db
            .tree_names()
            .into_iter()
            .filter(|name| &name[..] != DEFAULT_TREE)
            .map(|name| name.to_vec())
            .collect();
        names.sort();
        names
    }

    /// Delete a bucket and all of its entries.
    /// Returns `false` if there was no such bucket.
    pub fn delete_bucket(&self, name: &str) -> Result<bool> {
        self.db.drop_tree(name).map_err(Error::StoreWrite)
    }

    /// Flush pending writes to disk and release this handle.
    pub fn close(self) -> Result<()> {
        self.db.flush().map_err(Error::StoreWrite)?;
        Ok(())
    }

    /// Close the database, then remove its backing files.
    /// A database whose files are already gone is not an error.
    pub fn destroy(self) -> Result<()> {
        let path = self.path.clone();
        self.close()?;
        match fs::remove_dir_all(&path) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}

/// Named, independent key-value namespace inside a `Store`.
/// Keys are kept in ascending byte order.
#[derive(Clone, Debug)]
pub struct Bucket {
    name: String,
    tree: sled::Tree,
}

impl Bucket {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Insert a key-value pair, replacing any previous value of the key.
    /// Readers see either the old value or the new one, never a mix.
    pub fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.tree.insert(key, value).map_err(Error::StoreWrite)?;
        Ok(())
    }

    /// Get value corresponding to a given key.
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let value = self.tree.get(key).map_err(Error::StoreRead)?;
        Ok(value.map(|v| v.to_vec()))
    }

    /// Delete value corresponding to a given key.
    pub fn delete(&self, key: &[u8]) -> Result<()> {
        self.tree.remove(key).map_err(Error::StoreWrite)?;
        Ok(())
    }

    /// Call `visit` on every pair in ascending key order.
    /// Stops at the first error `visit` returns and passes it on.
    pub fn for_each<F>(&self, mut visit: F) -> Result<()>
    where
        F: FnMut(&[u8], &[u8]) -> Result<()>,
    {
        for pair in self.tree.iter() {
            let (key, value) = pair.map_err(Error::StoreRead)?;
            visit(&key, &value)?;
        }
        Ok(())
    }

    /// Snapshot of every pair in ascending key order.
    pub fn items(&self) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let mut items = Vec::new();
        self.for_each(|key, value| {
            items.push((key.to_vec(), value.to_vec()));
            Ok(())
        })?;
        Ok(items)
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }
}
