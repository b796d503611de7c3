use std::collections::HashSet;

use crate::{
    document::node::{NodeId, ResourceId, Value},
    document::tree::Document,
    foundation::platform::{CompressKind, PixelFormat},
};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Binary payload referenced from the tree.
pub struct Resource {
    /// Raw bytes, `None` when the payload is not loaded.
    pub data: Option<Vec<u8>>,
    /// Mapping nodes that own this resource.
    pub parents: Vec<NodeId>,
}

impl Resource {
    /// Resource owned by a single mapping node.
    pub fn owned_by(owner: NodeId, data: Vec<u8>) -> Self {
        Self {
            data: Some(data),
            parents: vec![owner],
        }
    }

    /// Whether there is anything to transcode.
    pub fn has_payload(&self) -> bool {
        self.data.as_ref().is_some_and(|d| !d.is_empty())
    }
}

#[derive(Clone, Debug, PartialEq)]
/// Side metadata of a resource, read from the mapping that holds it.
pub struct ResourceMetadata {
    /// Resource table entry.
    pub id: ResourceId,
    /// Tree node holding the resource reference.
    pub node: NodeId,
    /// Mapping that holds `node`; its `width`/`height`/`type`/`compress` fields describe it.
    pub owner: NodeId,
    /// Key path of `node`.
    pub path: String,
    /// Width in pixels, 0 when absent.
    pub width: u32,
    /// Height in pixels, 0 when absent.
    pub height: u32,
    /// Compression state.
    pub compress: CompressKind,
    /// Pixel layout, resolved against the document platform.
    pub pixel_format: PixelFormat,
}

impl Document {
    /// Every distinct resource reachable from the root, depth first in insertion order.
    ///
    /// Top-level sections named in `exclude_sections` are skipped. A resource referenced from
    /// several nodes is reported once, at its first reference.
    pub fn collect_resources(&self, exclude_sections: &[&str]) -> Vec<ResourceMetadata> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        for (key, id) in self.entries(self.root()).unwrap_or_default() {
            if exclude_sections.contains(&key.as_str()) {
                continue;
            }
            self.collect_from(id, &mut seen, &mut out);
        }
        out
    }

    fn collect_from(
        &self,
        id: NodeId,
        seen: &mut HashSet<ResourceId>,
        out: &mut Vec<ResourceMetadata>,
    ) {
        if let Value::Resource(rid) = self.value(id) {
            if seen.insert(*rid) {
                if let Some(meta) = self.metadata_for(id, *rid) {
                    out.push(meta);
                }
            }
            return;
        }
        for child in self.children(id) {
            self.collect_from(child, seen, out);
        }
    }

    fn metadata_for(&self, node: NodeId, id: ResourceId) -> Option<ResourceMetadata> {
        let owner = self.parent(node)?;
        let dim = |key: &str| {
            self.get(owner, key)
                .and_then(|n| self.as_number(n))
                .map(|n| n.as_i64().max(0) as u32)
                .unwrap_or(0)
        };
        let pixel_format = match self.text(owner, "type") {
            Some(tag) => PixelFormat::from_psb(tag, self.platform()),
            None => self.platform().default_pixel_format(),
        };
        let compress = self
            .text(owner, "compress")
            .map(CompressKind::from_psb)
            .unwrap_or_default();

        Some(ResourceMetadata {
            id,
            node,
            owner,
            path: self.path_of(node),
            width: dim("width"),
            height: dim("height"),
            compress,
            pixel_format,
        })
    }
}
