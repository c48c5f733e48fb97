use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::model::{Payment, Teacher};
use crate::store::{SnapshotStore, ALL_KEYS, PAYMENTS_KEY, SETTINGS_KEY, TEACHERS_KEY};

const MANIFEST_ENTRY: &str = "manifest.json";
pub const BUNDLE_FORMAT_V1: &str = "teacherhub-workspace-v1";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Manifest {
    format: String,
    version: u32,
    app_version: String,
    exported_at: u64,
    entries: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ManifestEntry {
    key: String,
    path: String,
    sha256: String,
}

#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub bundle_format: String,
    pub entry_count: usize,
}

#[derive(Debug, Clone)]
pub struct ImportSummary {
    pub bundle_format_detected: String,
    pub keys_restored: Vec<String>,
}

fn entry_path(key: &str) -> String {
    format!("data/{key}.json")
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Writes every stored snapshot into a zip bundle at `out_path`.
pub fn export_workspace_bundle(
    store: &dyn SnapshotStore,
    out_path: &Path,
) -> anyhow::Result<ExportSummary> {
    let mut snapshots: Vec<(&str, String)> = Vec::new();
    for key in ALL_KEYS {
        if let Some(text) = store
            .load(key)
            .with_context(|| format!("failed to read snapshot {key}"))?
        {
            snapshots.push((key, text));
        }
    }

    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.to_string_lossy()))?;
    }

    let out_file = File::create(out_path).with_context(|| {
        format!(
            "failed to create output file {}",
            out_path.to_string_lossy()
        )
    })?;
    let mut zip = ZipWriter::new(out_file);
    let opts = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let exported_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let manifest = Manifest {
        format: BUNDLE_FORMAT_V1.to_string(),
        version: 1,
        app_version: env!("CARGO_PKG_VERSION").to_string(),
        exported_at,
        entries: snapshots
            .iter()
            .map(|(key, text)| ManifestEntry {
                key: key.to_string(),
                path: entry_path(key),
                sha256: sha256_hex(text.as_bytes()),
            })
            .collect(),
    };
    zip.start_file(MANIFEST_ENTRY, opts)
        .context("failed to start manifest entry")?;
    zip.write_all(
        serde_json::to_string_pretty(&manifest)
            .context("failed to serialize manifest")?
            .as_bytes(),
    )
    .context("failed to write manifest entry")?;

    for (key, text) in &snapshots {
        zip.start_file(entry_path(key), opts)
            .with_context(|| format!("failed to start entry for {key}"))?;
        zip.write_all(text.as_bytes())
            .with_context(|| format!("failed to write entry for {key}"))?;
    }

    zip.finish().context("failed to finalize zip bundle")?;

    Ok(ExportSummary {
        bundle_format: BUNDLE_FORMAT_V1.to_string(),
        entry_count: snapshots.len() + 1,
    })
}

/// Replaces every stored snapshot with the bundle's contents. Nothing is written
/// until all entries pass their checksum and parse as the expected collection,
/// and the writes go to the store as one batch.
/// Keys missing from the bundle are removed so they reseed on next load.
pub fn import_workspace_bundle(
    in_path: &Path,
    store: &dyn SnapshotStore,
) -> anyhow::Result<ImportSummary> {
    let in_file = File::open(in_path)
        .with_context(|| format!("failed to open bundle {}", in_path.to_string_lossy()))?;
    let mut archive = ZipArchive::new(in_file).context("invalid zip archive")?;

    let mut manifest_text = String::new();
    archive
        .by_name(MANIFEST_ENTRY)
        .context("bundle missing manifest.json")?
        .read_to_string(&mut manifest_text)
        .context("failed to read manifest.json")?;
    let manifest: Manifest =
        serde_json::from_str(&manifest_text).context("manifest.json is invalid")?;
    if manifest.format != BUNDLE_FORMAT_V1 {
        return Err(anyhow!("unsupported bundle format: {}", manifest.format));
    }

    let mut restored: Vec<(String, String)> = Vec::new();
    for entry in &manifest.entries {
        if !ALL_KEYS.contains(&entry.key.as_str()) {
            return Err(anyhow!("bundle has unknown key: {}", entry.key));
        }
        let mut text = String::new();
        archive
            .by_name(&entry.path)
            .with_context(|| format!("bundle missing {}", entry.path))?
            .read_to_string(&mut text)
            .with_context(|| format!("failed to read {}", entry.path))?;
        let actual = sha256_hex(text.as_bytes());
        if !actual.eq_ignore_ascii_case(&entry.sha256) {
            return Err(anyhow!("checksum mismatch for {}", entry.path));
        }
        validate_snapshot(&entry.key, &text)?;
        restored.push((entry.key.clone(), text));
    }

    let batch: Vec<(&str, Option<&str>)> = ALL_KEYS
        .iter()
        .map(|key| {
            let text = restored
                .iter()
                .find(|(k, _)| k.as_str() == *key)
                .map(|(_, t)| t.as_str());
            (*key, text)
        })
        .collect();
    store
        .replace_all(&batch)
        .context("failed to write restored snapshots")?;
    let keys_restored = restored.iter().map(|(k, _)| k.clone()).collect();

    Ok(ImportSummary {
        bundle_format_detected: manifest.format,
        keys_restored,
    })
}

fn validate_snapshot(key: &str, text: &str) -> anyhow::Result<()> {
    match key {
        TEACHERS_KEY => {
            serde_json::from_str::<Vec<Teacher>>(text)
                .with_context(|| format!("{key} snapshot is invalid"))?;
        }
        PAYMENTS_KEY => {
            serde_json::from_str::<Vec<Payment>>(text)
                .with_context(|| format!("{key} snapshot is invalid"))?;
        }
        SETTINGS_KEY => {
            serde_json::from_str::<Map<String, Value>>(text)
                .with_context(|| format!("{key} snapshot is invalid"))?;
        }
        _ => return Err(anyhow!("bundle has unknown key: {key}")),
    }
    Ok(())
}
