//! In-memory recording fakes for both collaborator traits.
//!
//! Both fakes append every mutating call to one shared [`Log`] so tests can
//! assert on the exact ordered list of side effects across the two stores.
//! The fakes also apply mutations to their state, so a second run observes
//! the first run's writes.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reconcile::{
    Actor, CatalogPage, Category, CategoryId, CommitAuthor, CommitResult, ContentStore,
    DirectoryEntry, DiscussionId, DiscussionPage, DiscussionStore, EntryKind, GitRef, Label,
    LabelId, LabelsPage, Page, PageInfo, PathListing, RecentCommit, RepositoryNodeId,
    RepositorySlug, RevisionHandle, StoreError, StoredFile, SyncSettings,
};

/// A mutating call observed by a fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateDiscussion { title: String, body: String, category: String },
    UpdateBody { id: String, body: String },
    AddComment { id: String, body: String },
    AddLabel { id: String, label: String },
    RemoveLabel { id: String, label: String },
    Close { id: String },
    Reopen { id: String },
    CreateLabel { name: String, color: String },
    WriteFile { path: String, branch: String, content: String, message: String, revision: Option<String> },
}

pub type Log = Arc<Mutex<Vec<Call>>>;

pub fn new_log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn calls(log: &Log) -> Vec<Call> {
    log.lock().unwrap().clone()
}

pub fn clear(log: &Log) {
    log.lock().unwrap().clear();
}

pub fn label(id: &str, name: &str) -> Label {
    Label {
        id: LabelId::new(id).unwrap(),
        name: name.to_string(),
    }
}

pub fn git_ref(value: &str) -> GitRef {
    GitRef::new(value).unwrap()
}

pub fn settings() -> SyncSettings {
    SyncSettings::defaults(RepositorySlug::parse("octo/decisions").unwrap()).unwrap()
}

pub fn adr(title: &str, status: &str) -> String {
    format!("# {title}\n\n## Status\n\n{status}\n\n## Context\n\nSee [the index](./README.md).\n")
}

pub fn adr_without_status(title: &str) -> String {
    format!("# {title}\n\n## Context\n\nNo status yet.\n")
}

// ---------------------------------------------------------------------------
// Content store
// ---------------------------------------------------------------------------

pub struct FakeContent {
    log: Log,
    files: Mutex<HashMap<(String, String), StoredFile>>,
    listings: Mutex<HashMap<(String, String), PathListing>>,
    commits: HashMap<String, Vec<RecentCommit>>,
    write_result: CommitResult,
    writes: Mutex<u32>,
}

impl FakeContent {
    pub fn new(log: &Log) -> Self {
        Self {
            log: log.clone(),
            files: Mutex::new(HashMap::new()),
            listings: Mutex::new(HashMap::new()),
            commits: HashMap::new(),
            write_result: CommitResult {
                commit_url: None,
                commit_author: None,
            },
            writes: Mutex::new(0),
        }
    }

    pub fn with_file(mut self, git_ref: &str, path: &str, content: &str) -> Self {
        self.files.get_mut().unwrap().insert(
            (git_ref.to_string(), path.to_string()),
            StoredFile {
                content: content.to_string(),
                revision: RevisionHandle::new(format!("rev-{path}")).unwrap(),
            },
        );
        self
    }

    pub fn with_dir(mut self, git_ref: &str, path: &str, entries: &[(&str, EntryKind)]) -> Self {
        let entries = entries
            .iter()
            .map(|(name, kind)| DirectoryEntry {
                name: name.to_string(),
                kind: *kind,
            })
            .collect();
        self.listings.get_mut().unwrap().insert(
            (git_ref.to_string(), path.to_string()),
            PathListing::Directory(entries),
        );
        self
    }

    pub fn with_file_listing(mut self, git_ref: &str, path: &str) -> Self {
        self.listings
            .get_mut()
            .unwrap()
            .insert((git_ref.to_string(), path.to_string()), PathListing::File);
        self
    }

    pub fn with_commit(mut self, path: &str, login: Option<&str>, url: &str) -> Self {
        self.commits.entry(path.to_string()).or_default().push(RecentCommit {
            commit_url: Some(url.to_string()),
            actor: login.map(|l| Actor { login: l.to_string() }),
            commit_author: Some(CommitAuthor {
                name: Some("Octo Cat".to_string()),
                email: Some("octo@example.com".to_string()),
            }),
        });
        self
    }

    pub fn with_write_result(mut self, url: Option<&str>, name: Option<&str>) -> Self {
        self.write_result = CommitResult {
            commit_url: url.map(str::to_string),
            commit_author: name.map(|n| CommitAuthor {
                name: Some(n.to_string()),
                email: None,
            }),
        };
        self
    }

    pub fn file(&self, git_ref: &str, path: &str) -> Option<StoredFile> {
        self.files
            .lock()
            .unwrap()
            .get(&(git_ref.to_string(), path.to_string()))
            .cloned()
    }
}

#[async_trait]
impl ContentStore for FakeContent {
    async fn get_file(&self, path: &str, git_ref: &GitRef) -> Result<StoredFile, StoreError> {
        self.file(git_ref.as_str(), path)
            .ok_or_else(|| StoreError::not_found(format!("{path}@{git_ref}")))
    }

    async fn create_or_update_file(
        &self,
        path: &str,
        branch: &str,
        content: &str,
        message: &str,
        revision: Option<&RevisionHandle>,
    ) -> Result<CommitResult, StoreError> {
        self.log.lock().unwrap().push(Call::WriteFile {
            path: path.to_string(),
            branch: branch.to_string(),
            content: content.to_string(),
            message: message.to_string(),
            revision: revision.map(|r| r.as_str().to_string()),
        });

        let mut writes = self.writes.lock().unwrap();
        *writes += 1;
        self.files.lock().unwrap().insert(
            (branch.to_string(), path.to_string()),
            StoredFile {
                content: content.to_string(),
                revision: RevisionHandle::new(format!("rev-{path}-{writes}")).unwrap(),
            },
        );
        Ok(self.write_result.clone())
    }

    async fn list_directory(
        &self,
        path: &str,
        git_ref: &GitRef,
    ) -> Result<PathListing, StoreError> {
        self.listings
            .lock()
            .unwrap()
            .get(&(git_ref.as_str().to_string(), path.to_string()))
            .cloned()
            .ok_or_else(|| StoreError::not_found(format!("{path}@{git_ref}")))
    }

    async fn list_recent_commits(
        &self,
        path: &str,
        limit: u32,
    ) -> Result<Vec<RecentCommit>, StoreError> {
        Ok(self
            .commits
            .get(path)
            .map(|c| c.iter().take(limit as usize).cloned().collect())
            .unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// Discussion store
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct FakeDiscussion {
    pub id: DiscussionId,
    pub title: String,
    pub body: String,
    pub closed: bool,
    pub labels: Vec<Label>,
}

struct DiscussionState {
    categories: Vec<Category>,
    labels: Vec<Label>,
    discussions: Vec<FakeDiscussion>,
}

pub struct FakeDiscussions {
    log: Log,
    reads: Mutex<Vec<String>>,
    page_size: usize,
    repository_id: RepositoryNodeId,
    state: Mutex<DiscussionState>,
}

fn page<T: Clone>(items: &[T], after: Option<&str>, size: usize) -> Page<T> {
    let start = after.map(|c| c.parse::<usize>().unwrap()).unwrap_or(0);
    let end = (start + size).min(items.len());
    let page_info = if end < items.len() {
        PageInfo::more(end.to_string())
    } else {
        PageInfo::last()
    };
    Page::new(items[start..end].to_vec(), page_info)
}

impl FakeDiscussions {
    pub fn new(log: &Log) -> Self {
        Self {
            log: log.clone(),
            reads: Mutex::new(Vec::new()),
            page_size: 100,
            repository_id: RepositoryNodeId::new("R_repo").unwrap(),
            state: Mutex::new(DiscussionState {
                categories: vec![
                    Category {
                        id: CategoryId::new("C_general").unwrap(),
                        name: "General".to_string(),
                    },
                    Category {
                        id: CategoryId::new("C_adr").unwrap(),
                        name: "ADR".to_string(),
                    },
                ],
                labels: Vec::new(),
                discussions: Vec::new(),
            }),
        }
    }

    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }

    pub fn with_categories(mut self, categories: &[(&str, &str)]) -> Self {
        self.state.get_mut().unwrap().categories = categories
            .iter()
            .map(|(id, name)| Category {
                id: CategoryId::new(*id).unwrap(),
                name: name.to_string(),
            })
            .collect();
        self
    }

    pub fn with_label(mut self, id: &str, name: &str) -> Self {
        self.state.get_mut().unwrap().labels.push(label(id, name));
        self
    }

    pub fn with_discussion(mut self, discussion: FakeDiscussion) -> Self {
        self.state.get_mut().unwrap().discussions.push(discussion);
        self
    }

    pub fn discussion(&self, title: &str) -> Option<FakeDiscussion> {
        self.state
            .lock()
            .unwrap()
            .discussions
            .iter()
            .find(|d| d.title == title)
            .cloned()
    }

    pub fn repository_labels(&self) -> Vec<Label> {
        self.state.lock().unwrap().labels.clone()
    }

    pub fn reads(&self) -> Vec<String> {
        self.reads.lock().unwrap().clone()
    }

    fn read(&self, entry: String) {
        self.reads.lock().unwrap().push(entry);
    }

    fn log(&self, call: Call) {
        self.log.lock().unwrap().push(call);
    }

    fn with_discussion_mut(&self, id: &DiscussionId, f: impl FnOnce(&mut FakeDiscussion, &[Label])) {
        let mut state = self.state.lock().unwrap();
        let DiscussionState {
            labels,
            discussions,
            ..
        } = &mut *state;
        if let Some(d) = discussions.iter_mut().find(|d| &d.id == id) {
            f(d, labels);
        }
    }
}

fn cursor(after: Option<&str>) -> &str {
    after.unwrap_or("-")
}

#[async_trait]
impl DiscussionStore for FakeDiscussions {
    async fn catalog_page(
        &self,
        categories_after: Option<&str>,
        labels_after: Option<&str>,
    ) -> Result<CatalogPage, StoreError> {
        self.read(format!(
            "catalog:{}:{}",
            cursor(categories_after),
            cursor(labels_after)
        ));
        let state = self.state.lock().unwrap();
        Ok(CatalogPage {
            repository_id: self.repository_id.clone(),
            categories: page(&state.categories, categories_after, self.page_size),
            labels: page(&state.labels, labels_after, self.page_size),
        })
    }

    async fn list_categories(&self, after: Option<&str>) -> Result<Page<Category>, StoreError> {
        self.read(format!("categories:{}", cursor(after)));
        let state = self.state.lock().unwrap();
        Ok(page(&state.categories, after, self.page_size))
    }

    async fn list_labels(&self, after: Option<&str>) -> Result<LabelsPage, StoreError> {
        self.read(format!("labels:{}", cursor(after)));
        let state = self.state.lock().unwrap();
        Ok(LabelsPage {
            repository_id: self.repository_id.clone(),
            labels: page(&state.labels, after, self.page_size),
        })
    }

    async fn search_by_title(
        &self,
        title: &str,
        labels_after: Option<&str>,
    ) -> Result<Option<DiscussionPage>, StoreError> {
        self.read(format!("search:{title}:{}", cursor(labels_after)));
        let state = self.state.lock().unwrap();
        Ok(state
            .discussions
            .iter()
            .find(|d| d.title.contains(title))
            .map(|d| DiscussionPage {
                id: d.id.clone(),
                body: d.body.clone(),
                closed: d.closed,
                labels: page(&d.labels, labels_after, self.page_size),
            }))
    }

    async fn create_discussion(
        &self,
        _repository_id: &RepositoryNodeId,
        title: &str,
        body: &str,
        category_id: &CategoryId,
    ) -> Result<DiscussionId, StoreError> {
        self.log(Call::CreateDiscussion {
            title: title.to_string(),
            body: body.to_string(),
            category: category_id.to_string(),
        });
        let mut state = self.state.lock().unwrap();
        let id = DiscussionId::new(format!("D_{}", state.discussions.len() + 1)).unwrap();
        state.discussions.push(FakeDiscussion {
            id: id.clone(),
            title: title.to_string(),
            body: body.to_string(),
            closed: false,
            labels: Vec::new(),
        });
        Ok(id)
    }

    async fn update_body(&self, id: &DiscussionId, body: &str) -> Result<(), StoreError> {
        self.log(Call::UpdateBody {
            id: id.to_string(),
            body: body.to_string(),
        });
        self.with_discussion_mut(id, |d, _| d.body = body.to_string());
        Ok(())
    }

    async fn add_comment(&self, id: &DiscussionId, body: &str) -> Result<(), StoreError> {
        self.log(Call::AddComment {
            id: id.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }

    async fn add_label(&self, id: &DiscussionId, label_id: &LabelId) -> Result<(), StoreError> {
        self.log(Call::AddLabel {
            id: id.to_string(),
            label: label_id.to_string(),
        });
        self.with_discussion_mut(id, |d, known| {
            if let Some(l) = known.iter().find(|l| &l.id == label_id) {
                d.labels.push(l.clone());
            }
        });
        Ok(())
    }

    async fn remove_label(&self, id: &DiscussionId, label_id: &LabelId) -> Result<(), StoreError> {
        self.log(Call::RemoveLabel {
            id: id.to_string(),
            label: label_id.to_string(),
        });
        self.with_discussion_mut(id, |d, _| d.labels.retain(|l| &l.id != label_id));
        Ok(())
    }

    async fn close(&self, id: &DiscussionId) -> Result<(), StoreError> {
        self.log(Call::Close { id: id.to_string() });
        self.with_discussion_mut(id, |d, _| d.closed = true);
        Ok(())
    }

    async fn reopen(&self, id: &DiscussionId) -> Result<(), StoreError> {
        self.log(Call::Reopen { id: id.to_string() });
        self.with_discussion_mut(id, |d, _| d.closed = false);
        Ok(())
    }

    async fn create_label(
        &self,
        _repository_id: &RepositoryNodeId,
        name: &str,
        color: &str,
        _description: &str,
    ) -> Result<Label, StoreError> {
        self.log(Call::CreateLabel {
            name: name.to_string(),
            color: color.to_string(),
        });
        let mut state = self.state.lock().unwrap();
        let created = label(&format!("L_{name}"), name);
        state.labels.push(created.clone());
        Ok(created)
    }
}

/// Drops `CreateLabel` calls, whose colours are random.
pub fn without_label_creation(calls: Vec<Call>) -> Vec<Call> {
    calls
        .into_iter()
        .filter(|c| !matches!(c, Call::CreateLabel { .. }))
        .collect()
}
