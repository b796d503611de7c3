use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::Context;
use indexmap::IndexMap;
use serde_json::Value as Json;

use crate::{
    document::node::{NodeId, Number, ResourceId, Value},
    document::resource::Resource,
    document::tree::Document,
    foundation::error::{PsbError, PsbResult},
    foundation::platform::Platform,
};

const RESOURCE_PREFIX: &str = "#resource#";

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
/// Companion `<name>.resx.json` describing a decompiled document.
pub struct ResxManifest {
    /// PSB container version.
    #[serde(default = "default_psb_version")]
    pub psb_version: u16,
    /// Document kind (e.g. `"Motion"`), informational.
    #[serde(default)]
    pub psb_type: Option<String>,
    /// Platform the document is encoded for.
    pub platform: Platform,
    /// Encryption key used when the document is recompiled.
    #[serde(default)]
    pub crypt_key: Option<u32>,
    /// Whether textures are stored outside the document.
    #[serde(default)]
    pub external_textures: bool,
    /// Free-form tool context, carried through untouched.
    #[serde(default)]
    pub context: serde_json::Map<String, Json>,
    /// Resource index -> path of the raw payload, relative to the manifest.
    #[serde(default)]
    pub resources: IndexMap<String, String>,
}

fn default_psb_version() -> u16 {
    3
}

impl ResxManifest {
    /// Manifest for a freshly built document without resources on disk.
    pub fn new(platform: Platform) -> Self {
        Self {
            psb_version: default_psb_version(),
            psb_type: None,
            platform,
            crypt_key: None,
            external_textures: false,
            context: serde_json::Map::new(),
            resources: IndexMap::new(),
        }
    }
}

impl Document {
    /// Build a document from a decompiled `Objects` tree.
    ///
    /// Strings of the form `#resource#N` become references to `payloads[N]`; indices past the end
    /// of `payloads` get an empty resource. An index must stay below both `u32::MAX` and the larger
    /// of the payload count and the number of resource references in the tree.
    pub fn from_json(
        json: &Json,
        platform: Platform,
        payloads: Vec<Option<Vec<u8>>>,
    ) -> PsbResult<Self> {
        let Json::Object(objects) = json else {
            return Err(PsbError::serde("document root must be a JSON object"));
        };

        let limit = payloads.len().max(count_resource_refs(json));
        let mut doc = Document::new(platform);
        for data in payloads {
            doc.add_resource(Resource {
                data,
                parents: Vec::new(),
            });
        }

        let root = doc.root();
        for (key, value) in objects {
            load_value(&mut doc, root, Some(key), value, limit)?;
        }
        Ok(doc)
    }

    /// Serialize the tree back to JSON.
    ///
    /// Reachable resources are renumbered densely in first-reference order; the returned vector
    /// holds their payloads at the new indices.
    pub fn to_json(&self) -> (Json, Vec<Option<Vec<u8>>>) {
        let mut renumber = HashMap::new();
        let mut payloads = Vec::new();
        let json = self.dump_value(self.root(), &mut renumber, &mut payloads);
        (json, payloads)
    }

    fn dump_value(
        &self,
        id: NodeId,
        renumber: &mut HashMap<ResourceId, usize>,
        payloads: &mut Vec<Option<Vec<u8>>>,
    ) -> Json {
        match self.value(id) {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Number(Number::Int(v)) => Json::from(*v),
            Value::Number(Number::Float(v)) => {
                serde_json::Number::from_f64(*v).map_or(Json::Null, Json::Number)
            }
            Value::Text(s) => Json::String(s.clone().unwrap_or_default()),
            Value::List(items) => Json::Array(
                items
                    .iter()
                    .map(|c| self.dump_value(*c, renumber, payloads))
                    .collect(),
            ),
            Value::Map(entries) => Json::Object(
                entries
                    .iter()
                    .map(|(k, c)| (k.clone(), self.dump_value(*c, renumber, payloads)))
                    .collect(),
            ),
            Value::Resource(rid) => {
                let index = *renumber.entry(*rid).or_insert_with(|| {
                    payloads.push(self.resource(*rid).and_then(|r| r.data.clone()));
                    payloads.len() - 1
                });
                Json::String(format!("{RESOURCE_PREFIX}{index}"))
            }
        }
    }
}

fn load_value(
    doc: &mut Document,
    container: NodeId,
    key: Option<&str>,
    json: &Json,
    limit: usize,
) -> PsbResult<()> {
    match json {
        Json::Object(obj) => {
            let id = place(doc, container, key, Value::empty_map())?;
            for (k, v) in obj {
                load_value(doc, id, Some(k), v, limit)?;
            }
        }
        Json::Array(items) => {
            let id = place(doc, container, key, Value::List(Vec::new()))?;
            for v in items {
                load_value(doc, id, None, v, limit)?;
            }
        }
        Json::String(s) => match parse_resource_ref(s) {
            Some(index) => {
                let rid = resource_id(index, limit)?;
                while doc.resource_count() <= index {
                    doc.add_resource(Resource::default());
                }
                place(doc, container, key, Value::Resource(rid))?;
                if let Some(res) = doc.resource_mut(rid) {
                    if !res.parents.contains(&container) {
                        res.parents.push(container);
                    }
                }
            }
            None => {
                place(doc, container, key, Value::text(s.as_str()))?;
            }
        },
        Json::Number(n) => {
            let number = match n.as_i64() {
                Some(v) => Number::Int(v),
                None => Number::Float(n.as_f64().unwrap_or_default()),
            };
            place(doc, container, key, Value::Number(number))?;
        }
        Json::Bool(b) => {
            place(doc, container, key, Value::Bool(*b))?;
        }
        Json::Null => {
            place(doc, container, key, Value::Null)?;
        }
    }
    Ok(())
}

fn place(doc: &mut Document, container: NodeId, key: Option<&str>, value: Value) -> PsbResult<NodeId> {
    match key {
        Some(k) => doc.insert(container, k, value),
        None => doc.push(container, value),
    }
}

fn parse_resource_ref(s: &str) -> Option<usize> {
    s.strip_prefix(RESOURCE_PREFIX)?.parse().ok()
}

fn resource_id(index: usize, limit: usize) -> PsbResult<ResourceId> {
    if index >= limit {
        return Err(PsbError::serde(format!(
            "resource index {index} is out of range (at most {limit} resources)"
        )));
    }
    u32::try_from(index)
        .map(ResourceId)
        .map_err(|_| PsbError::serde(format!("resource index {index} does not fit in u32")))
}

// Number of `#resource#N` strings anywhere in `json`.
fn count_resource_refs(json: &Json) -> usize {
    match json {
        Json::String(s) => usize::from(parse_resource_ref(s).is_some()),
        Json::Array(items) => items.iter().map(count_resource_refs).sum(),
        Json::Object(obj) => obj.values().map(count_resource_refs).sum(),
        _ => 0,
    }
}

/// Path of the `.resx.json` manifest that accompanies `json_path` (`a.psb.json` -> `a.psb.resx.json`).
pub fn resx_path_for(json_path: &Path) -> PathBuf {
    let name = json_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = name.strip_suffix(".json").unwrap_or(&name);
    json_path.with_file_name(format!("{stem}.resx.json"))
}

fn document_stem(json_path: &Path) -> String {
    let name = json_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    name.strip_suffix(".json").unwrap_or(&name).to_string()
}

/// Load a decompiled document and its manifest from disk.
#[tracing::instrument]
pub fn load_document(json_path: &Path) -> PsbResult<(Document, ResxManifest)> {
    let resx_path = resx_path_for(json_path);
    let manifest: ResxManifest = read_json(&resx_path)?;
    let objects: Json = read_json(json_path)?;
    let base = json_path.parent().unwrap_or_else(|| Path::new("."));

    // Saved manifests skip empty payloads, so keys may be sparse up to the reference count.
    let limit = manifest.resources.len().max(count_resource_refs(&objects));
    let mut payloads = Vec::new();
    for (index, rel) in &manifest.resources {
        let index: usize = index
            .parse()
            .map_err(|_| PsbError::serde(format!("resource index '{index}' is not a number")))?;
        resource_id(index, limit)?;
        let path = base.join(rel);
        let bytes = std::fs::read(&path)
            .with_context(|| format!("read resource '{}'", path.display()))?;
        if payloads.len() <= index {
            payloads.resize(index + 1, None);
        }
        payloads[index] = Some(bytes);
    }

    let doc = Document::from_json(&objects, manifest.platform, payloads)?;
    tracing::debug!(
        platform = %doc.platform(),
        resources = doc.resource_count(),
        "loaded document"
    );
    Ok((doc, manifest))
}

/// Write `doc` as `json_path` plus its manifest and raw resource files.
///
/// Resources are written to `<stem>/<index>.bin` next to `json_path`. Returns the manifest that
/// was written, with the platform and resource table updated.
#[tracing::instrument(skip(doc, manifest))]
pub fn save_document(
    doc: &Document,
    manifest: &ResxManifest,
    json_path: &Path,
) -> PsbResult<ResxManifest> {
    let base = json_path.parent().unwrap_or_else(|| Path::new("."));
    let stem = document_stem(json_path);
    let (objects, payloads) = doc.to_json();

    let mut out = manifest.clone();
    out.platform = doc.platform();
    out.resources.clear();

    if !payloads.is_empty() {
        std::fs::create_dir_all(base.join(&stem))
            .with_context(|| format!("create resource dir '{}'", base.join(&stem).display()))?;
    }
    for (index, data) in payloads.iter().enumerate() {
        let Some(data) = data else {
            continue;
        };
        let rel = format!("{stem}/{index}.bin");
        let path = base.join(&rel);
        std::fs::write(&path, data)
            .with_context(|| format!("write resource '{}'", path.display()))?;
        out.resources.insert(index.to_string(), rel);
    }

    write_json(json_path, &objects)?;
    write_json(&resx_path_for(json_path), &out)?;
    Ok(out)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> PsbResult<T> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read '{}'", path.display()))?;
    serde_json::from_str(&text)
        .map_err(|e| PsbError::serde(format!("parse '{}': {e}", path.display())))
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> PsbResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| PsbError::serde(format!("encode '{}': {e}", path.display())))?;
    std::fs::write(path, text).with_context(|| format!("write '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/document/json.rs"]
mod tests;
