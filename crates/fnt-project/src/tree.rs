//! Resource records and the per-kind resource tree.

use fnt_types::{DiffColor, MapType, ResourceId, ResourceKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ProjectError, ProjectResult};
use crate::names;

/// Base record shared by every resource kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    pub id: ResourceId,
    /// Filename, unique across the project when assigned by the manager.
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
}

/// A chart resource.
///
/// `music`, `bg` and `scripts` are weak references: plain ids with no
/// guarantee that the referenced resource still exists. Use
/// [`validate`](crate::validate::validate) to find dangling ones.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapResource {
    pub id: ResourceId,
    pub name: String,
    /// Playback offset in milliseconds.
    #[serde(default)]
    pub offset: i64,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    /// Background image.
    pub bg: ResourceId,
    /// Difficulty label as typed by the user; the filename is derived from it.
    pub difficulty: String,
    pub level: i64,
    pub color: DiffColor,
    pub map_type: MapType,
    /// Audio track.
    pub music: ResourceId,
    #[serde(default)]
    pub scripts: Vec<ResourceId>,
}

/// Borrowed view of any record in the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordView<'a> {
    pub id: ResourceId,
    pub name: &'a str,
    /// Kind of the list the record is stored in.
    pub kind: ResourceKind,
    /// Kind written in the record's own `type` field.
    pub declared: ResourceKind,
}

impl<'a> From<(&'a ResourceRecord, ResourceKind)> for RecordView<'a> {
    fn from((record, kind): (&'a ResourceRecord, ResourceKind)) -> Self {
        Self {
            id: record.id,
            name: &record.name,
            kind,
            declared: record.kind,
        }
    }
}

impl<'a> From<&'a MapResource> for RecordView<'a> {
    fn from(map: &'a MapResource) -> Self {
        Self {
            id: map.id,
            name: &map.name,
            kind: ResourceKind::Map,
            declared: map.kind,
        }
    }
}

/// All resource records of a project, grouped by kind.
///
/// Serialized as a JSON object keyed by the numeric kind: `"1"` holds the
/// single meta record, every other key an ordered array. The tree is
/// append-only; records are never removed or edited in place.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceTree {
    #[serde(rename = "0", default)]
    other: Vec<ResourceRecord>,
    #[serde(rename = "1")]
    meta: ResourceRecord,
    #[serde(rename = "2", default)]
    maps: Vec<MapResource>,
    #[serde(rename = "3", default)]
    audio: Vec<ResourceRecord>,
    #[serde(rename = "4", default)]
    image: Vec<ResourceRecord>,
    #[serde(rename = "5", default)]
    video: Vec<ResourceRecord>,
    #[serde(rename = "6", default)]
    script: Vec<ResourceRecord>,
}

impl ResourceTree {
    /// Tree holding only the meta record.
    pub fn new(meta: ResourceRecord) -> Self {
        Self {
            other: Vec::new(),
            meta,
            maps: Vec::new(),
            audio: Vec::new(),
            image: Vec::new(),
            video: Vec::new(),
            script: Vec::new(),
        }
    }

    pub fn meta(&self) -> &ResourceRecord {
        &self.meta
    }

    pub fn maps(&self) -> &[MapResource] {
        &self.maps
    }

    /// Bare records of `kind`. Returns `None` for [`ResourceKind::Map`],
    /// whose records are [`MapResource`]s (see [`ResourceTree::maps`]).
    pub fn records(&self, kind: ResourceKind) -> Option<&[ResourceRecord]> {
        match kind {
            ResourceKind::Other => Some(&self.other),
            ResourceKind::Meta => Some(std::slice::from_ref(&self.meta)),
            ResourceKind::Map => None,
            ResourceKind::Audio => Some(&self.audio),
            ResourceKind::Image => Some(&self.image),
            ResourceKind::Video => Some(&self.video),
            ResourceKind::Script => Some(&self.script),
        }
    }

    fn list_mut(&mut self, kind: ResourceKind) -> Option<&mut Vec<ResourceRecord>> {
        match kind {
            ResourceKind::Other => Some(&mut self.other),
            ResourceKind::Audio => Some(&mut self.audio),
            ResourceKind::Image => Some(&mut self.image),
            ResourceKind::Video => Some(&mut self.video),
            ResourceKind::Script => Some(&mut self.script),
            ResourceKind::Meta | ResourceKind::Map => None,
        }
    }

    /// Append a bare record to the list of its kind.
    ///
    /// Fails for meta records (there is exactly one, set at construction)
    /// and for maps (use [`ResourceTree::push_map`]).
    pub fn push(&mut self, record: ResourceRecord) -> ProjectResult<()> {
        let id = record.id;
        let kind = record.kind;
        let Some(list) = self.list_mut(kind) else {
            return Err(match kind {
                ResourceKind::Meta => ProjectError::MetaSingleton,
                _ => ProjectError::BareMapRecord(id),
            });
        };
        list.push(record);
        debug!(%id, %kind, "appended resource record");
        Ok(())
    }

    /// Append a map record.
    pub fn push_map(&mut self, map: MapResource) {
        debug!(id = %map.id, name = %map.name, "appended map record");
        self.maps.push(map);
    }

    /// Every record, in kind order and insertion order within a kind.
    pub fn iter(&self) -> impl Iterator<Item = RecordView<'_>> {
        fn bare(
            records: &[ResourceRecord],
            kind: ResourceKind,
        ) -> impl Iterator<Item = RecordView<'_>> {
            records.iter().map(move |r| RecordView::from((r, kind)))
        }

        bare(&self.other, ResourceKind::Other)
            .chain(bare(std::slice::from_ref(&self.meta), ResourceKind::Meta))
            .chain(self.maps.iter().map(RecordView::from))
            .chain(bare(&self.audio, ResourceKind::Audio))
            .chain(bare(&self.image, ResourceKind::Image))
            .chain(bare(&self.video, ResourceKind::Video))
            .chain(bare(&self.script, ResourceKind::Script))
    }

    /// Names of all records across kinds.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|record| record.name)
    }

    /// Returns `true` if any record, of any kind, is named exactly `name`.
    pub fn exists(&self, name: &str) -> bool {
        self.names().any(|existing| existing == name)
    }

    /// Look up a record by id.
    pub fn find(&self, id: &ResourceId) -> Option<RecordView<'_>> {
        self.iter().find(|record| record.id == *id)
    }

    /// Ids of all records across kinds.
    pub fn ids(&self) -> impl Iterator<Item = ResourceId> + '_ {
        self.iter().map(|record| record.id)
    }

    /// Total number of records, meta included.
    pub fn len(&self) -> usize {
        self.other.len()
            + 1
            + self.maps.len()
            + self.audio.len()
            + self.image.len()
            + self.video.len()
            + self.script.len()
    }

    /// Never true: the meta record is always present.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// `candidate` made unique against every name in the tree.
    pub fn unique_filename(&self, candidate: &str) -> String {
        names::unique_filename(candidate, |name| self.exists(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, kind: ResourceKind) -> ResourceRecord {
        ResourceRecord {
            id: ResourceId::random(),
            name: name.into(),
            kind,
        }
    }

    fn map(name: &str) -> MapResource {
        MapResource {
            id: ResourceId::random(),
            name: name.into(),
            offset: 0,
            kind: ResourceKind::Map,
            bg: ResourceId::random(),
            difficulty: "Easy".into(),
            level: 5,
            color: DiffColor::Easy,
            map_type: MapType::Fannithm,
            music: ResourceId::random(),
            scripts: vec![],
        }
    }

    fn tree() -> ResourceTree {
        ResourceTree::new(record("meta.json", ResourceKind::Meta))
    }

    #[test]
    fn new_tree_holds_only_meta() {
        let tree = tree();
        assert_eq!(tree.len(), 1);
        assert!(tree.exists("meta.json"));
        assert_eq!(tree.records(ResourceKind::Meta).unwrap().len(), 1);
        assert!(tree.records(ResourceKind::Audio).unwrap().is_empty());
        assert!(tree.maps().is_empty());
    }

    #[test]
    fn push_routes_by_kind() {
        let mut tree = tree();
        tree.push(record("song.ogg", ResourceKind::Audio)).unwrap();
        tree.push(record("bg.png", ResourceKind::Image)).unwrap();
        tree.push(record("pv.mp4", ResourceKind::Video)).unwrap();
        tree.push(record("fx.js", ResourceKind::Script)).unwrap();
        tree.push(record("notes.txt", ResourceKind::Other)).unwrap();

        for kind in [
            ResourceKind::Audio,
            ResourceKind::Image,
            ResourceKind::Video,
            ResourceKind::Script,
            ResourceKind::Other,
        ] {
            assert_eq!(tree.records(kind).unwrap().len(), 1, "{kind}");
        }
        assert_eq!(tree.len(), 6);
    }

    #[test]
    fn second_meta_is_rejected() {
        let mut tree = tree();
        let err = tree.push(record("meta2.json", ResourceKind::Meta)).unwrap_err();
        assert!(matches!(err, ProjectError::MetaSingleton));
        assert_eq!(tree.records(ResourceKind::Meta).unwrap().len(), 1);
        assert!(!tree.exists("meta2.json"));
    }

    #[test]
    fn bare_map_record_is_rejected() {
        let mut tree = tree();
        let bare = record("easy.json", ResourceKind::Map);
        let id = bare.id;
        let err = tree.push(bare).unwrap_err();
        assert!(matches!(err, ProjectError::BareMapRecord(rejected) if rejected == id));
        assert!(tree.records(ResourceKind::Map).is_none());
    }

    #[test]
    fn exists_spans_all_kinds() {
        let mut tree = tree();
        tree.push_map(map("easy.json"));
        tree.push(record("song.ogg", ResourceKind::Audio)).unwrap();
        assert!(tree.exists("easy.json"));
        assert!(tree.exists("song.ogg"));
        assert!(!tree.exists("Easy.json"));
    }

    #[test]
    fn iteration_order_is_kind_then_insertion() {
        let mut tree = tree();
        tree.push(record("b.png", ResourceKind::Image)).unwrap();
        tree.push(record("a.ogg", ResourceKind::Audio)).unwrap();
        tree.push_map(map("hard.json"));
        tree.push(record("c.png", ResourceKind::Image)).unwrap();

        let names: Vec<_> = tree.names().collect();
        assert_eq!(names, vec!["meta.json", "hard.json", "a.ogg", "b.png", "c.png"]);
    }

    #[test]
    fn find_reports_list_kind() {
        let mut tree = tree();
        let m = map("easy.json");
        let id = m.id;
        tree.push_map(m);

        let found = tree.find(&id).unwrap();
        assert_eq!(found.name, "easy.json");
        assert_eq!(found.kind, ResourceKind::Map);
        assert_eq!(found.declared, ResourceKind::Map);
        assert!(tree.find(&ResourceId::random()).is_none());
    }

    #[test]
    fn unique_filename_checks_every_kind() {
        let mut tree = tree();
        tree.push(record("easy.json", ResourceKind::Other)).unwrap();
        assert_eq!(tree.unique_filename("easy.json"), "easy_.json");
        assert_eq!(tree.unique_filename("meta.json"), "meta_.json");
    }

    #[test]
    fn serialized_keys_are_numeric_kinds() {
        let mut tree = tree();
        tree.push_map(map("easy.json"));
        let value = serde_json::to_value(&tree).unwrap();
        let object = value.as_object().unwrap();
        let keys: Vec<_> = object.keys().map(String::as_str).collect();
        for key in ["0", "1", "2", "3", "4", "5", "6"] {
            assert!(keys.contains(&key), "missing key {key}");
        }
        assert!(object["1"].is_object());
        assert_eq!(object["2"][0]["mapType"], 0);
        assert_eq!(object["2"][0]["type"], 2);
    }

    #[test]
    fn map_defaults_fill_missing_fields() {
        let json = format!(
            r#"{{"id":"{}","name":"x.json","type":2,"bg":"{}","difficulty":"X","level":1,"color":3,"mapType":1,"music":"{}"}}"#,
            ResourceId::random(),
            ResourceId::random(),
            ResourceId::random()
        );
        let map: MapResource = serde_json::from_str(&json).unwrap();
        assert_eq!(map.offset, 0);
        assert!(map.scripts.is_empty());
        assert_eq!(map.color, DiffColor::Expert);
        assert_eq!(map.map_type, MapType::Bestdori);
    }
}
