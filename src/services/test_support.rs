//! In-memory PDF fixtures with bookmark trees.

use lopdf::{Dictionary, Document, Object, ObjectId, StringFormat};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub enum Target {
    /// Explicit destination array pointing at a page.
    Page(usize),
    /// Explicit destination holding a bare page index, which may lie past
    /// the last page.
    Index(usize),
    /// GoTo action wrapping an explicit destination.
    GoTo(usize),
    /// Named destination registered in the catalog name tree.
    Named(&'static str, usize),
    /// Named destination that does not exist.
    Missing,
}

#[derive(Debug, Clone)]
pub struct Bookmark {
    pub title: String,
    pub target: Target,
    pub children: Vec<Bookmark>,
}

impl Bookmark {
    pub fn with_children(mut self, children: Vec<Bookmark>) -> Self {
        self.children = children;
        self
    }
}

pub fn bookmark(title: &str, target: Target) -> Bookmark {
    Bookmark {
        title: title.to_string(),
        target,
        children: Vec::new(),
    }
}

/// Builds a document with `page_count` blank pages and the given outline.
pub fn build_pdf(page_count: usize, outline: &[Bookmark]) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let page_ids: Vec<ObjectId> = (0..page_count)
        .map(|_| {
            let mut page = Dictionary::new();
            page.set("Type", Object::Name(b"Page".to_vec()));
            page.set("Parent", Object::Reference(pages_id));
            page.set(
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(72),
                    Object::Integer(72),
                ]),
            );
            doc.add_object(page)
        })
        .collect();

    let mut pages = Dictionary::new();
    pages.set("Type", Object::Name(b"Pages".to_vec()));
    pages.set("Count", Object::Integer(page_count as i64));
    pages.set(
        "Kids",
        Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
    );
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));

    if !outline.is_empty() {
        let outlines_id = doc.new_object_id();
        let mut named = Vec::new();
        let (first, last) = add_bookmarks(&mut doc, outline, outlines_id, &page_ids, &mut named);

        let mut outlines = Dictionary::new();
        outlines.set("Type", Object::Name(b"Outlines".to_vec()));
        outlines.set("First", Object::Reference(first));
        outlines.set("Last", Object::Reference(last));
        outlines.set("Count", Object::Integer(outline.len() as i64));
        doc.objects.insert(outlines_id, Object::Dictionary(outlines));
        catalog.set("Outlines", Object::Reference(outlines_id));

        if !named.is_empty() {
            let mut tree = Dictionary::new();
            tree.set("Names", Object::Array(named));
            let mut names = Dictionary::new();
            names.set("Dests", Object::Dictionary(tree));
            catalog.set("Names", Object::Dictionary(names));
        }
    }

    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));
    doc
}

fn add_bookmarks(
    doc: &mut Document,
    items: &[Bookmark],
    parent: ObjectId,
    page_ids: &[ObjectId],
    named: &mut Vec<Object>,
) -> (ObjectId, ObjectId) {
    let ids: Vec<ObjectId> = items.iter().map(|_| doc.new_object_id()).collect();

    for (idx, item) in items.iter().enumerate() {
        let mut dict = Dictionary::new();
        dict.set(
            "Title",
            Object::String(item.title.as_bytes().to_vec(), StringFormat::Literal),
        );
        dict.set("Parent", Object::Reference(parent));
        if idx > 0 {
            dict.set("Prev", Object::Reference(ids[idx - 1]));
        }
        if idx + 1 < ids.len() {
            dict.set("Next", Object::Reference(ids[idx + 1]));
        }

        let explicit = |page: usize| {
            Object::Array(vec![
                Object::Reference(page_ids[page]),
                Object::Name(b"Fit".to_vec()),
            ])
        };
        match &item.target {
            Target::Page(page) => dict.set("Dest", explicit(*page)),
            Target::Index(index) => dict.set(
                "Dest",
                Object::Array(vec![
                    Object::Integer(*index as i64),
                    Object::Name(b"Fit".to_vec()),
                ]),
            ),
            Target::GoTo(page) => {
                let mut action = Dictionary::new();
                action.set("S", Object::Name(b"GoTo".to_vec()));
                action.set("D", explicit(*page));
                dict.set("A", Object::Dictionary(action));
            }
            Target::Named(name, page) => {
                named.push(Object::String(name.as_bytes().to_vec(), StringFormat::Literal));
                named.push(explicit(*page));
                dict.set(
                    "Dest",
                    Object::String(name.as_bytes().to_vec(), StringFormat::Literal),
                );
            }
            Target::Missing => dict.set(
                "Dest",
                Object::String(b"nowhere".to_vec(), StringFormat::Literal),
            ),
        }

        if !item.children.is_empty() {
            let (first, last) = add_bookmarks(doc, &item.children, ids[idx], page_ids, named);
            dict.set("First", Object::Reference(first));
            dict.set("Last", Object::Reference(last));
            dict.set("Count", Object::Integer(item.children.len() as i64));
        }

        doc.objects.insert(ids[idx], Object::Dictionary(dict));
    }

    (ids[0], ids[ids.len() - 1])
}

/// Saves a fixture to `dir/name` and returns the path.
pub fn save_pdf(doc: &mut Document, dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    doc.save(&path).unwrap();
    path
}
