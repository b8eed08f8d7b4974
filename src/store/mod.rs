//! Flat-file JSON store
//!
//! Three record maps (profiles, tracks, edits), each mirrored 1:1 to a
//! pretty-printed JSON file at the storage root. Maps are loaded once at
//! startup and act as the write-through cache from then on; external edits
//! to the files are invisible until restart. Every mutation holds the map's
//! lock across read-mutate-persist, so writers to the same map are
//! serialized and "last write wins" applies per map.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::warn;
use uuid::Uuid;

use crate::error::Result;

/// Upload extension allow-list (case-insensitive, last dot-separated segment)
pub const ALLOWED_EXTENSIONS: &[&str] = &["mp3", "wav", "txt", "json", "jpg", "png"];

const PROFILES_FILE: &str = "profiles.json";
const TRACKS_FILE: &str = "tracks.json";
const EDITS_FILE: &str = "edits.json";

type JsonMap = Map<String, Value>;

/// One stored track: where the uploaded bytes live and the name the caller
/// uploaded them under
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackRecord {
    pub path: PathBuf,
    pub name: String,
}

/// Store owning the three record maps and the storage root
pub struct JsonStore {
    root: PathBuf,
    profiles: Mutex<JsonMap>,
    tracks: Mutex<JsonMap>,
    edits: Mutex<JsonMap>,
}

impl JsonStore {
    /// Open the store at `root`, loading whatever record maps already exist
    /// on disk. A missing file starts its map empty; an unparseable file is
    /// logged and also starts empty (corrupt store recovers to empty).
    pub async fn open(root: PathBuf) -> Result<Self> {
        tokio::fs::create_dir_all(&root).await?;
        let profiles = load_json(&root.join(PROFILES_FILE)).await;
        let tracks = load_json(&root.join(TRACKS_FILE)).await;
        let edits = load_json(&root.join(EDITS_FILE)).await;
        Ok(Self {
            root,
            profiles: Mutex::new(profiles),
            tracks: Mutex::new(tracks),
            edits: Mutex::new(edits),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    // ----- profiles -----

    pub async fn get_profile(&self, user_id: &str) -> Option<Value> {
        self.profiles.lock().await.get(user_id).cloned()
    }

    /// Replace the profile at `user_id` wholesale and persist the map
    pub async fn put_profile(&self, user_id: &str, data: Value) -> Result<()> {
        let mut profiles = self.profiles.lock().await;
        profiles.insert(user_id.to_string(), data);
        save_json(&self.root.join(PROFILES_FILE), &profiles).await
    }

    // ----- tracks -----

    /// Store a new track record under a generated ID, returning the ID
    pub async fn insert_track(&self, record: TrackRecord) -> Result<String> {
        let track_id = Uuid::new_v4().to_string();
        let mut tracks = self.tracks.lock().await;
        tracks.insert(track_id.clone(), serde_json::to_value(&record)?);
        save_json(&self.root.join(TRACKS_FILE), &tracks).await?;
        Ok(track_id)
    }

    pub async fn get_track(&self, track_id: &str) -> Option<TrackRecord> {
        let tracks = self.tracks.lock().await;
        let value = tracks.get(track_id)?;
        serde_json::from_value(value.clone()).ok()
    }

    /// Case-insensitive substring match of `query` against track names,
    /// returning the matching subset keyed by ID in insertion order
    pub async fn search_tracks(&self, query: &str) -> JsonMap {
        let needle = query.to_lowercase();
        self.tracks
            .lock()
            .await
            .iter()
            .filter(|(_, record)| {
                record
                    .get("name")
                    .and_then(Value::as_str)
                    .is_some_and(|name| name.to_lowercase().contains(&needle))
            })
            .map(|(id, record)| (id.clone(), record.clone()))
            .collect()
    }

    // ----- edits -----

    /// Store an edit body verbatim under a generated ID, returning the ID
    pub async fn insert_edit(&self, data: Value) -> Result<String> {
        let edit_id = Uuid::new_v4().to_string();
        let mut edits = self.edits.lock().await;
        edits.insert(edit_id.clone(), data);
        save_json(&self.root.join(EDITS_FILE), &edits).await?;
        Ok(edit_id)
    }

    pub async fn get_edit(&self, edit_id: &str) -> Option<Value> {
        self.edits.lock().await.get(edit_id).cloned()
    }

    /// Free-text search: case-insensitive substring match of `query` against
    /// the serialized rendering of each whole record, not any single field
    pub async fn search_edits(&self, query: &str) -> JsonMap {
        let needle = query.to_lowercase();
        self.edits
            .lock()
            .await
            .iter()
            .filter(|(_, record)| {
                serde_json::to_string(record)
                    .map(|rendered| rendered.to_lowercase().contains(&needle))
                    .unwrap_or(false)
            })
            .map(|(id, record)| (id.clone(), record.clone()))
            .collect()
    }

    // ----- files -----

    /// Write uploaded bytes to `root/subfolder/<uuid>_<sanitized_name>`,
    /// creating the subfolder if needed. No collision check; the ID entropy
    /// is assumed collision-free.
    pub async fn save_file(
        &self,
        content: &[u8],
        subfolder: &str,
        original_filename: &str,
    ) -> Result<PathBuf> {
        let file_id = Uuid::new_v4();
        let filename = sanitize_filename(original_filename);

        let folder_path = self.root.join(subfolder);
        tokio::fs::create_dir_all(&folder_path).await?;

        let file_path = folder_path.join(format!("{}_{}", file_id, filename));
        tokio::fs::write(&file_path, content).await?;

        Ok(file_path)
    }

    /// Resolve caller-supplied path segments under the storage root.
    ///
    /// Segments that are empty, `..`, absolute, or contain a separator are
    /// rejected so a request can never resolve outside the root.
    pub fn resolve_within_root(&self, segments: &[&str]) -> Option<PathBuf> {
        let mut path = self.root.clone();
        for segment in segments {
            if segment.is_empty()
                || *segment == "."
                || *segment == ".."
                || segment.contains('/')
                || segment.contains('\\')
            {
                return None;
            }
            path.push(segment);
        }
        Some(path)
    }
}

/// Is `filename` acceptable for upload? Requires a dot and an allow-listed
/// final extension, compared case-insensitively.
pub fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Reduce a caller-supplied filename to a safe base name: the final path
/// component with everything outside `[A-Za-z0-9._-]` replaced by `_`.
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(filename);

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.trim_matches(|c| c == '.' || c == '_').is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

/// Load a JSON object map from `path`. Missing file yields an empty map;
/// an unreadable or unparseable file is logged and yields an empty map.
async fn load_json(path: &Path) -> JsonMap {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return JsonMap::new(),
        Err(e) => {
            warn!("failed to read {}: {} (starting empty)", path.display(), e);
            return JsonMap::new();
        }
    };

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            warn!("{} is not a JSON object (starting empty)", path.display());
            JsonMap::new()
        }
        Err(e) => {
            warn!("corrupt JSON in {}: {} (starting empty)", path.display(), e);
            JsonMap::new()
        }
    }
}

/// Write `data` to `path` as pretty-printed JSON: 4-space indentation,
/// UTF-8, non-ASCII left unescaped. Full overwrite, no atomic rename;
/// callers serialize writers by holding the map lock.
async fn save_json(path: &Path, data: &JsonMap) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    data.serialize(&mut serializer)?;

    tokio::fs::write(path, buf).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    async fn temp_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::open(dir.path().to_path_buf()).await.unwrap();
        (dir, store)
    }

    #[test]
    fn extension_allow_list_is_case_insensitive() {
        assert!(allowed_file("song.mp3"));
        assert!(allowed_file("SONG.MP3"));
        assert!(allowed_file("notes.txt"));
        assert!(allowed_file("cover.JPG"));
        assert!(!allowed_file("malware.exe"));
        assert!(!allowed_file("noextension"));
        assert!(!allowed_file("archive.tar.gz"));
    }

    #[test]
    fn sanitize_strips_paths_and_odd_characters() {
        assert_eq!(sanitize_filename("song.mp3"), "song.mp3");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("my song (1).mp3"), "my_song__1_.mp3");
        assert_eq!(sanitize_filename("C:\\Users\\x\\a.txt"), "a.txt");
        assert_eq!(sanitize_filename("...."), "file");
        assert_eq!(sanitize_filename(""), "file");
    }

    #[tokio::test]
    async fn missing_store_files_load_empty() {
        let (_dir, store) = temp_store().await;
        assert!(store.get_profile("nobody").await.is_none());
        assert!(store.search_tracks("anything").await.is_empty());
    }

    #[tokio::test]
    async fn corrupt_store_file_recovers_to_empty() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("profiles.json"), b"{not json at all").unwrap();

        let store = JsonStore::open(dir.path().to_path_buf()).await.unwrap();
        assert!(store.get_profile("anyone").await.is_none());

        // The corrupt file is replaced wholesale on the next write
        store
            .put_profile("alice", json!({"name": "Alice"}))
            .await
            .unwrap();
        let reopened = JsonStore::open(dir.path().to_path_buf()).await.unwrap();
        assert_eq!(
            reopened.get_profile("alice").await,
            Some(json!({"name": "Alice"}))
        );
    }

    #[tokio::test]
    async fn save_json_uses_four_space_indent_and_raw_utf8() {
        let (dir, store) = temp_store().await;
        store
            .put_profile("u1", json!({"bio": "نمونه", "level": 3}))
            .await
            .unwrap();

        let text = std::fs::read_to_string(dir.path().join("profiles.json")).unwrap();
        assert!(text.contains("    \"u1\""), "expected 4-space indent:\n{text}");
        assert!(text.contains("نمونه"), "non-ASCII must not be escaped:\n{text}");
        assert!(!text.contains("\\u"), "non-ASCII must not be escaped:\n{text}");
    }

    #[tokio::test]
    async fn saved_file_lands_under_subfolder_with_id_prefix() {
        let (dir, store) = temp_store().await;
        let path = store
            .save_file(b"abc123", "tracks", "song.mp3")
            .await
            .unwrap();

        assert!(path.starts_with(dir.path().join("tracks")));
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.ends_with("_song.mp3"), "got {name}");
        assert_eq!(std::fs::read(&path).unwrap(), b"abc123");
    }

    #[tokio::test]
    async fn track_search_matches_name_substring_case_insensitive() {
        let (_dir, store) = temp_store().await;
        let id = store
            .insert_track(TrackRecord {
                path: PathBuf::from("/tmp/x_song.mp3"),
                name: "My Song.mp3".to_string(),
            })
            .await
            .unwrap();

        let hits = store.search_tracks("song").await;
        assert_eq!(hits.len(), 1);
        assert!(hits.contains_key(&id));
        assert!(store.search_tracks("zzz").await.is_empty());
    }

    #[tokio::test]
    async fn edit_search_scans_the_whole_serialized_record() {
        let (_dir, store) = temp_store().await;
        let id = store
            .insert_edit(json!({"content": "hello", "author": "Leila"}))
            .await
            .unwrap();

        // Matches a field other than content, and even a key name
        assert!(store.search_edits("leila").await.contains_key(&id));
        assert!(store.search_edits("author").await.contains_key(&id));
        assert!(store.search_edits("absent").await.is_empty());
    }

    #[tokio::test]
    async fn resolve_within_root_rejects_traversal() {
        let (dir, store) = temp_store().await;
        assert_eq!(
            store.resolve_within_root(&["tracks", "a.mp3"]),
            Some(dir.path().join("tracks").join("a.mp3"))
        );
        assert!(store.resolve_within_root(&[".."]).is_none());
        assert!(store.resolve_within_root(&["tracks", "../secret"]).is_none());
        assert!(store.resolve_within_root(&["a/b"]).is_none());
        assert!(store.resolve_within_root(&[""]).is_none());
    }
}
