use crate::error::{ChapterSplitterError, Result};
use crate::types::OutlineEntry;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const MAX_REFERENCE_HOPS: usize = 32;
const MAX_NAME_TREE_NODES: usize = 100_000;

pub struct OutlineReader;

impl OutlineReader {
    pub fn open(path: &Path) -> Result<PdfDocument> {
        info!("Reading PDF: {}", path.display());

        if !path.exists() {
            return Err(ChapterSplitterError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let document = Document::load(path).map_err(|e| ChapterSplitterError::PdfLoad {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        PdfDocument::new(path.to_path_buf(), document)
    }
}

/// A loaded source PDF with its page tree indexed.
pub struct PdfDocument {
    path: PathBuf,
    document: Document,
    page_indices: HashMap<ObjectId, usize>,
    total_pages: usize,
}

impl PdfDocument {
    pub fn new(path: PathBuf, document: Document) -> Result<Self> {
        if document.is_encrypted() {
            return Err(ChapterSplitterError::Encrypted {
                path: path.display().to_string(),
            });
        }

        let pages = document.get_pages();
        if pages.is_empty() {
            return Err(ChapterSplitterError::EmptyDocument {
                path: path.display().to_string(),
            });
        }

        let page_indices = pages
            .iter()
            .map(|(number, id)| (*id, *number as usize - 1))
            .collect();

        debug!("Loaded {} with {} pages", path.display(), pages.len());

        Ok(Self {
            path,
            total_pages: pages.len(),
            document,
            page_indices,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Flattens the bookmark tree in document order: an entry, then its
    /// children, then its next sibling.
    pub fn outline_entries(&self) -> Result<Vec<OutlineEntry>> {
        let no_outline = || ChapterSplitterError::NoOutline {
            path: self.path.display().to_string(),
        };

        let outlines = self
            .catalog()
            .and_then(|catalog| catalog.get(b"Outlines").ok())
            .and_then(|outlines| self.resolve_object(outlines))
            .ok_or_else(no_outline)?;

        let first = match outlines {
            Object::Dictionary(outlines) => match outlines.get(b"First") {
                Ok(Object::Reference(id)) => *id,
                _ => return Err(no_outline()),
            },
            _ => return Err(no_outline()),
        };

        let mut entries = Vec::new();
        let mut visited = HashSet::new();
        let mut stack = vec![(first, 0usize)];

        while let Some((id, depth)) = stack.pop() {
            if !visited.insert(id) {
                warn!("Bookmark {:?} is referenced more than once; skipping the cycle", id);
                continue;
            }

            let item = match self.document.get_dictionary(id) {
                Ok(item) => item,
                Err(e) => {
                    warn!("Unreadable bookmark {:?}: {}", id, e);
                    continue;
                }
            };

            let title = match item.get(b"Title").ok().and_then(|t| self.resolve_object(t)) {
                Some(Object::String(bytes, _)) => decode_text(bytes),
                _ => String::new(),
            };
            let title = if title.is_empty() { "Untitled".to_string() } else { title };
            let page_index = self.resolve_item_page(item);

            debug!("Bookmark '{}' at depth {} -> page {:?}", title, depth, page_index);
            entries.push(OutlineEntry {
                title,
                page_index,
                depth,
            });

            // Pushed in reverse: children are visited before the next sibling.
            if let Ok(Object::Reference(next)) = item.get(b"Next") {
                stack.push((*next, depth));
            }
            if let Ok(Object::Reference(child)) = item.get(b"First") {
                stack.push((*child, depth + 1));
            }
        }

        info!("Found {} bookmarks", entries.len());
        Ok(entries)
    }

    fn catalog(&self) -> Option<&Dictionary> {
        match self.resolve_object(self.document.trailer.get(b"Root").ok()?)? {
            Object::Dictionary(catalog) => Some(catalog),
            _ => None,
        }
    }

    fn resolve_object<'a>(&'a self, object: &'a Object) -> Option<&'a Object> {
        let mut current = object;
        for _ in 0..MAX_REFERENCE_HOPS {
            match current {
                Object::Reference(id) => current = self.document.get_object(*id).ok()?,
                _ => return Some(current),
            }
        }
        None
    }

    fn resolve_item_page(&self, item: &Dictionary) -> Option<usize> {
        if let Ok(dest) = item.get(b"Dest") {
            return self.resolve_destination(dest, 0);
        }

        let action = match item.get(b"A").ok().and_then(|a| self.resolve_object(a))? {
            Object::Dictionary(action) => action,
            _ => return None,
        };

        match action.get(b"S") {
            Ok(Object::Name(kind)) if kind.as_slice() != b"GoTo" => None,
            _ => self.resolve_destination(action.get(b"D").ok()?, 0),
        }
    }

    fn resolve_destination(&self, dest: &Object, hops: usize) -> Option<usize> {
        if hops > MAX_REFERENCE_HOPS {
            return None;
        }

        match self.resolve_object(dest)? {
            Object::Array(items) => match items.first()? {
                Object::Reference(page_id) => self.page_indices.get(page_id).copied(),
                Object::Integer(index) => usize::try_from(*index).ok(),
                _ => None,
            },
            Object::Dictionary(dict) => self.resolve_destination(dict.get(b"D").ok()?, hops + 1),
            Object::Name(name) | Object::String(name, _) => {
                let target = self.named_destination(name)?;
                self.resolve_destination(target, hops + 1)
            }
            _ => None,
        }
    }

    fn named_destination(&self, name: &[u8]) -> Option<&Object> {
        let catalog = self.catalog()?;

        if let Some(Object::Dictionary(dests)) = catalog.get(b"Dests").ok().and_then(|d| self.resolve_object(d)) {
            if let Ok(target) = dests.get(name) {
                return Some(target);
            }
        }

        let tree = match catalog.get(b"Names").ok().and_then(|n| self.resolve_object(n))? {
            Object::Dictionary(names) => names.get(b"Dests").ok()?,
            _ => return None,
        };

        let found = self.search_name_tree(tree, name);
        if found.is_none() {
            debug!("Named destination '{}' not found", String::from_utf8_lossy(name));
        }
        found
    }

    fn search_name_tree<'a>(&'a self, root: &'a Object, name: &[u8]) -> Option<&'a Object> {
        let mut stack = vec![root];
        let mut visited = 0;

        while let Some(node) = stack.pop() {
            visited += 1;
            if visited > MAX_NAME_TREE_NODES {
                warn!("Destination name tree is too large; giving up the lookup");
                return None;
            }

            let node = match self.resolve_object(node) {
                Some(Object::Dictionary(node)) => node,
                _ => continue,
            };

            if let Some(Object::Array(pairs)) = node.get(b"Names").ok().and_then(|n| self.resolve_object(n)) {
                for pair in pairs.chunks(2) {
                    if let [key, value] = pair {
                        if let Some(Object::String(key, _)) = self.resolve_object(key) {
                            if key.as_slice() == name {
                                return Some(value);
                            }
                        }
                    }
                }
            }

            if let Some(Object::Array(kids)) = node.get(b"Kids").ok().and_then(|k| self.resolve_object(k)) {
                stack.extend(kids.iter());
            }
        }

        None
    }
}

/// Decodes a PDF text string: UTF-16BE or UTF-8 with byte order mark,
/// plain UTF-8, and Latin-1 for anything else.
pub fn decode_text(bytes: &[u8]) -> String {
    let text = if let Some(rest) = bytes.strip_prefix(b"\xFE\xFF") {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|unit| u16::from_be_bytes([unit[0], unit[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else if let Some(rest) = bytes.strip_prefix(b"\xEF\xBB\xBF") {
        String::from_utf8_lossy(rest).into_owned()
    } else {
        match std::str::from_utf8(bytes) {
            Ok(text) => text.to_string(),
            Err(_) => bytes.iter().map(|&b| b as char).collect(),
        }
    };

    text.chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}
