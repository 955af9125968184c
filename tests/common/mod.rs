//! Shared fixture: a four-project snapshot with 2-dimensional vectors.

#![allow(dead_code)]

use originality_core::embedding::vec_to_blob;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const DIMS: usize = 2;

/// Rows: 0 clinic triage, 1 generic hackathon repo, 2 bus stop chargers,
/// 3 clinic queue board. Recent slice = rows 2 and 3.
pub fn vectors() -> Vec<Vec<f32>> {
    vec![
        vec![1.0, 0.0],
        vec![1.0, 0.0],
        vec![0.0, 1.0],
        vec![0.8, 0.6],
    ]
}

const META: &str = r#"[
  {
    "id": "p0",
    "title": "Offline clinic triage",
    "description": "Nurses record offline triage notes in rural clinics and sync when a signal returns.",
    "tags": ["health", "offline"],
    "url": "https://example.org/p0",
    "source": "devpost"
  },
  {
    "id": "p1",
    "title": "hackathon project",
    "description": "Built during a weekend.",
    "tags": "not-a-list",
    "source": "github"
  },
  {
    "id": "p2",
    "title": "Bus stop charger",
    "description": "Solar powered kiosk that rents phone chargers to commuters waiting for buses.",
    "source": "devpost"
  },
  {
    "id": "p3",
    "title": "Clinic queue board",
    "description": "Offline waiting room board for clinics that shows nurses the next patient.",
    "text": "Clinic queue board. Offline waiting room board for clinics that shows nurses the next patient.",
    "source": "devpost"
  }
]"#;

/// Lay down the snapshot files and a config (embeddings disabled).
///
/// `extra` is appended to the config verbatim.
pub fn setup_snapshot(extra: &str) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();
    let data = root.join("data");
    fs::create_dir_all(&data).unwrap();

    let rows = vectors();
    let all: Vec<f32> = rows.iter().flatten().copied().collect();
    let recent: Vec<f32> = [&rows[2], &rows[3]].into_iter().flatten().copied().collect();

    fs::write(data.join("projects_meta.json"), META).unwrap();
    fs::write(data.join("index_all.f32"), vec_to_blob(&all)).unwrap();
    fs::write(data.join("index_recent.f32"), vec_to_blob(&recent)).unwrap();
    fs::write(data.join("recent_row_ids.json"), "[2, 3]").unwrap();

    let config_path = write_config(&root, extra);
    (tmp, config_path)
}

pub fn write_config(root: &Path, extra: &str) -> PathBuf {
    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let content = format!(
        r#"[snapshot]
meta_path = "{root}/data/projects_meta.json"
index_all_path = "{root}/data/index_all.f32"
index_recent_path = "{root}/data/index_recent.f32"
recent_row_ids_path = "{root}/data/recent_row_ids.json"

[embedding]
provider = "disabled"
dims = {DIMS}

[server]
bind = "127.0.0.1:0"
{extra}"#,
        root = root.display(),
    );

    let config_path = config_dir.join("orig.toml");
    fs::write(&config_path, content).unwrap();
    config_path
}
