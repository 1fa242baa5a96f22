//! Throwaway shard archives for tests and benchmarks.
//!
//! [`ArchiveBuilder`] writes `shard_<seq>.sqlite[.gz]` files into a temp
//! directory using the same `items`/`edges` schema the archive exporter
//! produces. Helpers panic on failure: they only run inside tests.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use rusqlite::{params, Connection};
use tempfile::TempDir;

use hnshard_core::models::{Item, ItemId, ItemKind};

const ITEMS_DDL: &str = "CREATE TABLE items (
    id INTEGER PRIMARY KEY,
    type TEXT,
    time INTEGER,
    by TEXT,
    title TEXT,
    text TEXT,
    url TEXT,
    score INTEGER,
    parent INTEGER
)";

const EDGES_DDL: &str = "CREATE TABLE edges (
    parent_id INTEGER NOT NULL,
    child_id INTEGER NOT NULL,
    ord INTEGER NOT NULL
)";

/// Story with `title` and `score`; time defaults to `1_160_000_000 + id`.
pub fn story(id: ItemId, title: &str, score: i64) -> Item {
    Item {
        id,
        kind: ItemKind::Story,
        author: Some(format!("user{id}")),
        title: Some(title.to_string()),
        text: None,
        url: Some(format!("https://example.com/{id}")),
        score,
        time: 1_160_000_000 + id,
        parent: None,
    }
}

/// Comment under `parent` with body `text`.
pub fn comment(id: ItemId, parent: ItemId, text: &str) -> Item {
    Item {
        id,
        kind: ItemKind::Comment,
        author: Some(format!("user{id}")),
        title: None,
        text: Some(text.to_string()),
        url: None,
        score: 0,
        time: 1_160_000_000 + id,
        parent: Some(parent),
    }
}

/// Contents of one shard file before it is written.
#[derive(Debug, Clone, Default)]
pub struct ShardSpec {
    pub items: Vec<Item>,
    /// `(parent_id, child_id, ord)`; `None` omits the edges table entirely.
    pub edges: Option<Vec<(ItemId, ItemId, i64)>>,
    pub compressed: bool,
    /// Optional `_<lo>-<hi>` suffix in the file name.
    pub id_range_in_name: Option<(ItemId, ItemId)>,
}

impl ShardSpec {
    pub fn plain(items: Vec<Item>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    pub fn gzipped(items: Vec<Item>) -> Self {
        Self {
            items,
            compressed: true,
            ..Self::default()
        }
    }

    pub fn with_edges(mut self, edges: Vec<(ItemId, ItemId, i64)>) -> Self {
        self.edges = Some(edges);
        self
    }

    pub fn with_id_range_in_name(mut self, lo: ItemId, hi: ItemId) -> Self {
        self.id_range_in_name = Some((lo, hi));
        self
    }
}

/// A temp-dir archive. The directory is removed when this drops.
pub struct TestArchive {
    dir: TempDir,
    files: Vec<PathBuf>,
}

impl TestArchive {
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Shard files in the order they were added (ascending sequence).
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Shard id of the `n`th added shard.
    pub fn shard_id(&self, n: usize) -> String {
        let name = self.files[n]
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_else(|| panic!("shard {n} has no file name"));
        name.trim_end_matches(".gz")
            .trim_end_matches(".sqlite")
            .to_string()
    }

    /// Overwrite the `n`th shard with bytes that are not a database.
    pub fn corrupt(&self, n: usize) {
        std::fs::write(&self.files[n], b"this is not a sqlite database, not even close")
            .unwrap_or_else(|e| panic!("corrupt {}: {e}", self.files[n].display()));
    }
}

/// Builds a [`TestArchive`] shard by shard.
#[derive(Default)]
pub struct ArchiveBuilder {
    shards: Vec<ShardSpec>,
    manifest: bool,
    corrupt: Vec<usize>,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shard(mut self, spec: ShardSpec) -> Self {
        self.shards.push(spec);
        self
    }

    /// Plain shard holding `items`.
    pub fn plain(self, items: Vec<Item>) -> Self {
        self.shard(ShardSpec::plain(items))
    }

    /// Gzipped shard holding `items`.
    pub fn gzipped(self, items: Vec<Item>) -> Self {
        self.shard(ShardSpec::gzipped(items))
    }

    /// Shard file containing garbage instead of SQLite.
    pub fn corrupt_shard(mut self) -> Self {
        self.corrupt.push(self.shards.len());
        self.shards.push(ShardSpec::default());
        self
    }

    /// Write a `manifest.json` with each shard's id/time coverage.
    pub fn with_manifest(mut self) -> Self {
        self.manifest = true;
        self
    }

    pub fn build(self) -> TestArchive {
        let dir = tempfile::Builder::new()
            .prefix("hnshard-archive-")
            .tempdir()
            .unwrap_or_else(|e| panic!("create archive dir: {e}"));

        let mut files = Vec::with_capacity(self.shards.len());
        let mut entries = Vec::with_capacity(self.shards.len());
        for (seq, spec) in self.shards.iter().enumerate() {
            let path = dir.path().join(file_name(seq, spec));
            if self.corrupt.contains(&seq) {
                std::fs::write(&path, b"garbage garbage garbage garbage")
                    .unwrap_or_else(|e| panic!("write {}: {e}", path.display()));
            } else {
                write_shard(&path, spec);
            }
            entries.push(manifest_entry(seq, &path, spec));
            files.push(path);
        }

        if self.manifest {
            let manifest = serde_json::json!({ "shards": entries });
            std::fs::write(dir.path().join("manifest.json"), manifest.to_string())
                .unwrap_or_else(|e| panic!("write manifest: {e}"));
        }

        TestArchive { dir, files }
    }
}

fn file_name(seq: usize, spec: &ShardSpec) -> String {
    let range = spec
        .id_range_in_name
        .map(|(lo, hi)| format!("_{lo}-{hi}"))
        .unwrap_or_default();
    let ext = if spec.compressed { ".sqlite.gz" } else { ".sqlite" };
    format!("shard_{seq}{range}{ext}")
}

fn manifest_entry(seq: usize, path: &Path, spec: &ShardSpec) -> serde_json::Value {
    let file = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();
    let ids = spec.items.iter().map(|i| i.id);
    let times = spec.items.iter().map(|i| i.time);
    serde_json::json!({
        "sid": seq,
        "file": file,
        "id_lo": ids.clone().min(),
        "id_hi": ids.max(),
        "tmin": times.clone().min(),
        "tmax": times.max(),
        "count": spec.items.len(),
    })
}

/// Write one shard database to `path`, gzipping it if `spec.compressed`.
pub fn write_shard(path: &Path, spec: &ShardSpec) {
    let db_path = if spec.compressed {
        path.with_extension("tmp-plain")
    } else {
        path.to_path_buf()
    };
    {
        let conn = Connection::open(&db_path)
            .unwrap_or_else(|e| panic!("open {}: {e}", db_path.display()));
        populate(&conn, spec).unwrap_or_else(|e| panic!("populate {}: {e}", db_path.display()));
    }
    if spec.compressed {
        let raw = std::fs::read(&db_path)
            .unwrap_or_else(|e| panic!("read {}: {e}", db_path.display()));
        let out = File::create(path).unwrap_or_else(|e| panic!("create {}: {e}", path.display()));
        let mut encoder = GzEncoder::new(out, Compression::fast());
        encoder
            .write_all(&raw)
            .unwrap_or_else(|e| panic!("gzip {}: {e}", path.display()));
        encoder
            .finish()
            .unwrap_or_else(|e| panic!("finish gzip {}: {e}", path.display()));
        let _ = std::fs::remove_file(&db_path);
    }
}

fn populate(conn: &Connection, spec: &ShardSpec) -> rusqlite::Result<()> {
    conn.execute_batch(ITEMS_DDL)?;
    let tx = conn.unchecked_transaction()?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO items (id, type, time, by, title, text, url, score, parent)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )?;
        for item in &spec.items {
            stmt.execute(params![
                item.id,
                item.kind.as_str(),
                item.time,
                item.author,
                item.title,
                item.text,
                item.url,
                item.score,
                item.parent,
            ])?;
        }
    }
    if let Some(edges) = &spec.edges {
        tx.execute_batch(EDGES_DDL)?;
        let mut stmt =
            tx.prepare("INSERT INTO edges (parent_id, child_id, ord) VALUES (?1, ?2, ?3)")?;
        for (parent, child, ord) in edges {
            stmt.execute(params![parent, child, ord])?;
        }
    }
    tx.commit()
}
