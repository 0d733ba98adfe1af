//! Immutable knowledge snapshots and the handle that swaps them.
//!
//! Requests take an `Arc<KnowledgeSnapshot>` once and answer from it; a
//! reload builds a complete new snapshot and replaces the pointer, so a
//! request never sees half of one load and half of another.

use crate::catalog::Catalog;
use crate::chunk::ChunkStore;
use crate::config::KnowledgeConfig;
use crate::events::{dedup_events, mine_event_titles};
use crate::intent::IntentClassifier;
use crate::links::{KeywordLinks, LinkProvider, NoLinks};
use crate::resolve::extract_staff_names;
use crate::terminology::Terminology;
use crate::types::{Intent, StaffMember};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Everything a request reads, loaded together.
#[derive(Debug, Clone)]
pub struct KnowledgeSnapshot {
    pub catalog: Catalog,
    pub chunks: ChunkStore,
    pub classifier: IntentClassifier,
    pub terminology: Terminology,
    pub links: Arc<dyn LinkProvider>,

    /// Catalog event titles followed by titles mined from pages
    pub event_titles: Vec<String>,
    pub loaded_at: DateTime<Utc>,
}

impl KnowledgeSnapshot {
    /// Build a snapshot from already-loaded parts.
    ///
    /// Without a staff roster, staff named in page text stand in for it.
    pub fn new(catalog: Catalog, chunks: ChunkStore) -> Self {
        let catalog = if catalog.all_staff().is_empty() {
            let mined = staff_from_chunks(&chunks);
            if !mined.is_empty() {
                tracing::debug!("Using {} staff members found in pages", mined.len());
            }
            catalog.with_staff(mined)
        } else {
            catalog
        };

        let classifier = IntentClassifier::default()
            .with_keywords(
                Intent::Facility,
                catalog.all_facilities().iter().map(|f| f.name.to_lowercase()),
            )
            .with_keywords(Intent::Staff, staff_keywords(catalog.all_staff()));

        let event_titles = dedup_events(
            catalog
                .events()
                .iter()
                .map(|e| e.title.clone())
                .chain(mine_event_titles(chunks.all_chunks())),
        );

        Self {
            catalog,
            chunks,
            classifier,
            terminology: Terminology::default(),
            links: Arc::new(NoLinks),
            event_titles,
            loaded_at: Utc::now(),
        }
    }

    pub fn with_terminology(mut self, terminology: Terminology) -> Self {
        self.terminology = terminology;
        self
    }

    pub fn with_links(mut self, links: Arc<dyn LinkProvider>) -> Self {
        self.links = links;
        self
    }

    /// Load every source under `workspace`.
    ///
    /// A missing or broken source leaves its part empty; loading itself
    /// never fails.
    pub fn load(workspace: &Path, config: &KnowledgeConfig) -> Self {
        let catalog = Catalog::load(workspace, config);

        let chunks_path = config.data_file(workspace, &config.chunks_file);
        let chunks = ChunkStore::load(&chunks_path).unwrap_or_else(|e| {
            tracing::error!("Failed to load chunks from {:?}: {}", chunks_path, e);
            ChunkStore::default()
        });

        let terminology_path = config.data_file(workspace, &config.terminology_file);
        let terminology = Terminology::load(&terminology_path).unwrap_or_else(|e| {
            tracing::warn!("Ignoring terminology rules: {}", e);
            Terminology::default()
        });

        let links: Arc<dyn LinkProvider> = if config.links_enabled {
            let links_path = config.data_file(workspace, &config.links_file);
            match KeywordLinks::load(&links_path) {
                Ok(links) => Arc::new(links),
                Err(e) => {
                    tracing::warn!("Ignoring link table: {}", e);
                    Arc::new(NoLinks)
                }
            }
        } else {
            Arc::new(NoLinks)
        };

        let snapshot = Self::new(catalog, chunks)
            .with_terminology(terminology)
            .with_links(links);

        tracing::info!(
            "Loaded knowledge: {} facilities, {} staff, {} chunks, {} event titles",
            snapshot.catalog.all_facilities().len(),
            snapshot.catalog.all_staff().len(),
            snapshot.chunks.len(),
            snapshot.event_titles.len()
        );

        snapshot
    }
}

fn staff_from_chunks(chunks: &ChunkStore) -> Vec<StaffMember> {
    let mut seen = HashSet::new();
    chunks
        .all_chunks()
        .iter()
        .flat_map(|chunk| extract_staff_names(&chunk.content))
        .filter(|member| seen.insert(member.name.clone()))
        .collect()
}

/// Name parts long enough to identify someone, without their titles.
fn staff_keywords(staff: &[StaffMember]) -> Vec<String> {
    staff
        .iter()
        .flat_map(|member| member.name.split_whitespace())
        .map(|part| part.trim_end_matches('.').to_lowercase())
        .filter(|part| part.chars().count() > 2)
        .collect()
}

/// Shared, swappable pointer to the current snapshot.
#[derive(Debug)]
pub struct KnowledgeHandle {
    workspace: PathBuf,
    config: KnowledgeConfig,
    current: RwLock<Arc<KnowledgeSnapshot>>,
}

impl KnowledgeHandle {
    /// Load the first snapshot.
    pub fn open(workspace: &Path, config: KnowledgeConfig) -> Self {
        let snapshot = KnowledgeSnapshot::load(workspace, &config);
        Self::with_snapshot(workspace, config, snapshot)
    }

    pub fn with_snapshot(
        workspace: &Path,
        config: KnowledgeConfig,
        snapshot: KnowledgeSnapshot,
    ) -> Self {
        Self {
            workspace: workspace.to_path_buf(),
            config,
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    pub fn config(&self) -> &KnowledgeConfig {
        &self.config
    }

    /// The snapshot in force right now.
    pub fn current(&self) -> Arc<KnowledgeSnapshot> {
        self.current.read().clone()
    }

    /// Reload from disk and swap the result in.
    ///
    /// The load runs without holding the lock; holders of the previous
    /// snapshot keep it until they drop it.
    pub fn reload(&self) -> Arc<KnowledgeSnapshot> {
        let snapshot = KnowledgeSnapshot::load(&self.workspace, &self.config);
        self.replace(snapshot)
    }

    /// Swap in a snapshot built elsewhere.
    pub fn replace(&self, snapshot: KnowledgeSnapshot) -> Arc<KnowledgeSnapshot> {
        let fresh = Arc::new(snapshot);
        *self.current.write() = Arc::clone(&fresh);
        fresh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogKeys;
    use crate::types::Chunk;
    use std::fs;
    use tempfile::TempDir;

    const CATALOG: &str = r#"{"Arts Lab": {
        "Facilities": [{"Name": "Lounge"}, {"Name": "XR Space"}]
    }}"#;

    fn chunk(content: &str) -> Chunk {
        Chunk {
            id: "team_0".to_string(),
            url: "team".to_string(),
            title: "Our Team".to_string(),
            content: content.to_string(),
            chunk_index: 0,
            scraped_at: String::new(),
        }
    }

    #[test]
    fn test_staff_fallback_from_pages() {
        let catalog = Catalog::parse(CATALOG, &CatalogKeys::default());
        let chunks = ChunkStore::new(vec![chunk("Led by Dr. Kal Ng (Director) since 2020.")]);
        let snapshot = KnowledgeSnapshot::new(catalog, chunks);

        let staff = snapshot.catalog.all_staff();
        assert_eq!(staff.len(), 1);
        assert_eq!(staff[0].title, "Director");
        assert_eq!(snapshot.classifier.classify("Who is Kal?"), Intent::Staff);
    }

    #[test]
    fn test_classifier_learns_facility_names() {
        let catalog = Catalog::parse(CATALOG, &CatalogKeys::default());
        let snapshot = KnowledgeSnapshot::new(catalog, ChunkStore::default());
        assert_eq!(snapshot.classifier.classify("is the xr space open"), Intent::Facility);
    }

    #[test]
    fn test_load_from_empty_workspace() {
        let dir = TempDir::new().unwrap();
        let snapshot = KnowledgeSnapshot::load(dir.path(), &KnowledgeConfig::default());
        assert!(snapshot.catalog.all_facilities().is_empty());
        assert!(snapshot.chunks.is_empty());
        assert!(snapshot.links.links_for("anything").is_empty());
    }

    #[test]
    fn test_reload_swaps_snapshot() {
        let dir = TempDir::new().unwrap();
        let config = KnowledgeConfig::default();
        let handle = KnowledgeHandle::open(dir.path(), config.clone());

        let before = handle.current();
        assert!(before.catalog.all_facilities().is_empty());

        let data_dir = config.data_dir(dir.path());
        fs::create_dir_all(&data_dir).unwrap();
        fs::write(data_dir.join(&config.catalog_file), CATALOG).unwrap();

        let after = handle.reload();
        assert_eq!(after.catalog.all_facilities().len(), 2);
        // Earlier holders keep the snapshot they took
        assert!(before.catalog.all_facilities().is_empty());
        assert_eq!(handle.current().catalog.all_facilities().len(), 2);
    }

    #[test]
    fn test_replace_keeps_readers_on_old_snapshot() {
        let dir = TempDir::new().unwrap();
        let handle = KnowledgeHandle::with_snapshot(
            dir.path(),
            KnowledgeConfig::default(),
            KnowledgeSnapshot::new(Catalog::default(), ChunkStore::default()),
        );
        let old = handle.current();

        let catalog = Catalog::parse(CATALOG, &CatalogKeys::default());
        let fresh = handle.replace(KnowledgeSnapshot::new(catalog, ChunkStore::default()));

        assert!(old.catalog.all_facilities().is_empty());
        assert_eq!(fresh.catalog.all_facilities().len(), 2);
        assert!(Arc::ptr_eq(&fresh, &handle.current()));
        assert!(!Arc::ptr_eq(&old, &handle.current()));
    }
}
