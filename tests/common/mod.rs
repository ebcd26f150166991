//! In-memory mock hosts and tree builders shared by the integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashSet;

use serde_json::Value;

use quicksave_lib::error::HostError;
use quicksave_lib::host::{BookmarkHost, StorageHost};
use quicksave_lib::models::BookmarkNode;

pub fn folder(id: &str, title: &str, children: Vec<BookmarkNode>) -> BookmarkNode {
    BookmarkNode {
        id: id.to_string(),
        title: title.to_string(),
        parent_id: None,
        date_added: 1_700_000_000_000,
        url: None,
        children: Some(children),
    }
}

pub fn bookmark(id: &str, title: &str, url: &str) -> BookmarkNode {
    BookmarkNode {
        id: id.to_string(),
        title: title.to_string(),
        parent_id: None,
        date_added: 1_700_000_000_000,
        url: Some(url.to_string()),
        children: None,
    }
}

fn find<'a>(nodes: &'a [BookmarkNode], id: &str) -> Option<&'a BookmarkNode> {
    for node in nodes {
        if node.id == id {
            return Some(node);
        }
        if let Some(children) = &node.children {
            if let Some(found) = find(children, id) {
                return Some(found);
            }
        }
    }
    None
}

fn find_mut<'a>(nodes: &'a mut [BookmarkNode], id: &str) -> Option<&'a mut BookmarkNode> {
    for node in nodes {
        if node.id == id {
            return Some(node);
        }
        if let Some(children) = node.children.as_mut() {
            if let Some(found) = find_mut(children, id) {
                return Some(found);
            }
        }
    }
    None
}

fn detach(nodes: &mut Vec<BookmarkNode>, id: &str) -> Option<BookmarkNode> {
    if let Some(pos) = nodes.iter().position(|n| n.id == id) {
        return Some(nodes.remove(pos));
    }
    for node in nodes {
        if let Some(children) = node.children.as_mut() {
            if let Some(found) = detach(children, id) {
                return Some(found);
            }
        }
    }
    None
}

/// Bookmark store over an in-memory forest, with call counters and
/// injectable failures.
pub struct MockBookmarkHost {
    pub forest: RefCell<Vec<BookmarkNode>>,
    pub tree_calls: Cell<usize>,
    pub create_calls: Cell<usize>,
    pub fail_children: RefCell<HashSet<String>>,
    pub fail_ids: RefCell<HashSet<String>>,
    pub fail_search: Cell<bool>,
}

impl MockBookmarkHost {
    pub fn new(forest: Vec<BookmarkNode>) -> Self {
        Self {
            forest: RefCell::new(forest),
            tree_calls: Cell::new(0),
            create_calls: Cell::new(0),
            fail_children: RefCell::new(HashSet::new()),
            fail_ids: RefCell::new(HashSet::new()),
            fail_search: Cell::new(false),
        }
    }

    pub fn fail_children_for(&self, id: &str) {
        self.fail_children.borrow_mut().insert(id.to_string());
    }

    pub fn fail_id(&self, id: &str) {
        self.fail_ids.borrow_mut().insert(id.to_string());
    }

    pub fn node(&self, id: &str) -> Option<BookmarkNode> {
        find(&self.forest.borrow(), id).cloned()
    }
}

impl BookmarkHost for MockBookmarkHost {
    fn get_tree(&self) -> Result<Vec<BookmarkNode>, HostError> {
        self.tree_calls.set(self.tree_calls.get() + 1);
        Ok(self.forest.borrow().clone())
    }

    fn get_children(&self, id: &str) -> Result<Vec<BookmarkNode>, HostError> {
        if self.fail_children.borrow().contains(id) {
            return Err(HostError(format!("children fetch failed for {}", id)));
        }
        let forest = self.forest.borrow();
        let node = find(&forest, id).ok_or_else(|| HostError(format!("no node {}", id)))?;
        node.children
            .clone()
            .ok_or_else(|| HostError(format!("{} is not a folder", id)))
    }

    fn get(&self, id: &str) -> Result<Option<BookmarkNode>, HostError> {
        Ok(find(&self.forest.borrow(), id).cloned())
    }

    fn create(
        &self,
        parent_id: &str,
        title: &str,
        url: Option<&str>,
    ) -> Result<BookmarkNode, HostError> {
        self.create_calls.set(self.create_calls.get() + 1);
        let node = BookmarkNode {
            id: format!("created-{}", self.create_calls.get()),
            title: title.to_string(),
            parent_id: Some(parent_id.to_string()),
            date_added: 1_700_000_000_000,
            url: url.map(String::from),
            children: if url.is_none() { Some(vec![]) } else { None },
        };
        let mut forest = self.forest.borrow_mut();
        let parent = find_mut(&mut forest, parent_id)
            .ok_or_else(|| HostError(format!("no folder {}", parent_id)))?;
        parent
            .children
            .as_mut()
            .ok_or_else(|| HostError(format!("{} is not a folder", parent_id)))?
            .push(node.clone());
        Ok(node)
    }

    fn update(&self, id: &str, title: Option<&str>, url: Option<&str>) -> Result<(), HostError> {
        if self.fail_ids.borrow().contains(id) {
            return Err(HostError(format!("update failed for {}", id)));
        }
        let mut forest = self.forest.borrow_mut();
        let node = find_mut(&mut forest, id).ok_or_else(|| HostError(format!("no node {}", id)))?;
        if let Some(t) = title {
            node.title = t.to_string();
        }
        if let Some(u) = url {
            node.url = Some(u.to_string());
        }
        Ok(())
    }

    fn remove(&self, id: &str) -> Result<(), HostError> {
        if self.fail_ids.borrow().contains(id) {
            return Err(HostError(format!("remove failed for {}", id)));
        }
        detach(&mut self.forest.borrow_mut(), id)
            .map(|_| ())
            .ok_or_else(|| HostError(format!("no node {}", id)))
    }

    fn move_to(&self, id: &str, parent_id: &str) -> Result<(), HostError> {
        if self.fail_ids.borrow().contains(id) {
            return Err(HostError(format!("move failed for {}", id)));
        }
        let mut forest = self.forest.borrow_mut();
        let mut node =
            detach(&mut forest, id).ok_or_else(|| HostError(format!("no node {}", id)))?;
        node.parent_id = Some(parent_id.to_string());
        let parent = find_mut(&mut forest, parent_id)
            .ok_or_else(|| HostError(format!("no folder {}", parent_id)))?;
        parent
            .children
            .as_mut()
            .ok_or_else(|| HostError(format!("{} is not a folder", parent_id)))?
            .push(node);
        Ok(())
    }

    fn search_by_url(&self, url: &str) -> Result<Vec<BookmarkNode>, HostError> {
        if self.fail_search.get() {
            return Err(HostError("search failed".into()));
        }
        let forest = self.forest.borrow();
        let mut matches = vec![];
        let mut stack: Vec<&BookmarkNode> = forest.iter().collect();
        while let Some(node) = stack.pop() {
            if node.url.as_deref() == Some(url) {
                matches.push(node.clone());
            }
            if let Some(children) = &node.children {
                stack.extend(children.iter());
            }
        }
        Ok(matches)
    }
}

/// Whole-record storage over an in-memory JSON value, with write/clear
/// counters and an injectable write failure.
pub struct MockStorageHost {
    pub record: RefCell<Option<Value>>,
    pub writes: Cell<usize>,
    pub clears: Cell<usize>,
    pub fail_writes: Cell<bool>,
}

impl MockStorageHost {
    pub fn new() -> Self {
        Self {
            record: RefCell::new(None),
            writes: Cell::new(0),
            clears: Cell::new(0),
            fail_writes: Cell::new(false),
        }
    }

    pub fn with_record(value: Value) -> Self {
        let host = Self::new();
        *host.record.borrow_mut() = Some(value);
        host
    }

    pub fn stored(&self) -> Value {
        self.record.borrow().clone().unwrap_or(Value::Null)
    }
}

impl StorageHost for MockStorageHost {
    fn read(&self) -> Result<Option<Value>, HostError> {
        Ok(self.record.borrow().clone())
    }

    fn write(&self, record: &Value) -> Result<(), HostError> {
        if self.fail_writes.get() {
            return Err(HostError("write failed".into()));
        }
        self.writes.set(self.writes.get() + 1);
        *self.record.borrow_mut() = Some(record.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), HostError> {
        self.clears.set(self.clears.get() + 1);
        *self.record.borrow_mut() = None;
        Ok(())
    }
}
