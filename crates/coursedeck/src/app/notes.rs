//! Per-lesson learner notes backed by a key-value store.

use std::sync::Arc;

use anyhow::{Context, Result};
use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::domain::errors::DomainError;
use crate::domain::model::{CourseId, Note};
use crate::infra::kv::KeyValueStore;

/// Notes for a single lesson. Every mutation is written through to the store.
pub struct NoteBook {
    key: String,
    notes: Vec<Note>,
    store: Arc<dyn KeyValueStore>,
}

impl NoteBook {
    /// Storage key for a lesson's notes.
    pub fn key_for(course: &CourseId, lesson_id: &str) -> String {
        format!("lesson_notes/{course}/{lesson_id}")
    }

    /// Load the notes for a lesson. Unreadable stored data yields an empty book.
    pub fn load(store: Arc<dyn KeyValueStore>, course: &CourseId, lesson_id: &str) -> Result<Self> {
        let key = Self::key_for(course, lesson_id);
        let notes = match store
            .get(&key)
            .with_context(|| format!("failed to load notes for {key}"))?
        {
            Some(data) => serde_json::from_str(&data).unwrap_or_else(|err| {
                warn!(key = %key, error = %err, "discarding unreadable notes");
                Vec::new()
            }),
            None => Vec::new(),
        };
        debug!(key = %key, count = notes.len(), "notes loaded");
        Ok(Self { key, notes, store })
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    /// Append a new note. The title must not be blank.
    pub fn add(&mut self, title: &str, content: &str) -> Result<Note> {
        let title = clean_title(title)?;
        let note = Note {
            id: self.next_id(),
            title,
            content: content.trim_end().to_string(),
        };
        let mut next = self.notes.clone();
        next.push(note.clone());
        self.commit(next)?;
        Ok(note)
    }

    /// Replace the title and content of an existing note.
    pub fn update(&mut self, id: &str, title: &str, content: &str) -> Result<Note> {
        let title = clean_title(title)?;
        let mut next = self.notes.clone();
        let note = next
            .iter_mut()
            .find(|note| note.id == id)
            .ok_or_else(|| DomainError::NoteNotFound(id.to_string()))?;
        note.title = title;
        note.content = content.trim_end().to_string();
        let updated = note.clone();
        self.commit(next)?;
        Ok(updated)
    }

    /// Remove a note. Returns `false` when no note had that id.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        if self.get(id).is_none() {
            return Ok(false);
        }
        let next: Vec<Note> = self
            .notes
            .iter()
            .filter(|note| note.id != id)
            .cloned()
            .collect();
        self.commit(next)?;
        Ok(true)
    }

    /// Persist `next` and adopt it. A failed save leaves the book as it was.
    fn commit(&mut self, next: Vec<Note>) -> Result<()> {
        let data = serde_json::to_string(&next).context("failed to serialize notes")?;
        self.store
            .set(&self.key, data)
            .with_context(|| format!("failed to save notes for {}", self.key))?;
        debug!(key = %self.key, count = next.len(), "notes saved");
        self.notes = next;
        Ok(())
    }

    fn next_id(&self) -> String {
        let mut candidate = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
        while self
            .notes
            .iter()
            .any(|note| note.id == candidate.to_string())
        {
            candidate += 1;
        }
        candidate.to_string()
    }
}

fn clean_title(title: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(DomainError::MissingNoteTitle.into());
    }
    Ok(trimmed.to_string())
}
