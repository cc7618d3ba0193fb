use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub name: String,
}

/// subject_id → display_name, keeping first-seen order.
///
/// The first display name seen for an id wins; later renames are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectDirectory {
    subjects: Vec<Subject>,
}

impl SubjectDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unless the id is already known. Returns true when inserted.
    pub fn insert_first_seen(&mut self, id: &str, name: &str) -> bool {
        if self.get(id).is_some() {
            return false;
        }
        self.subjects.push(Subject {
            id: id.to_string(),
            name: name.to_string(),
        });
        true
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.subjects
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Subject> {
        self.subjects.iter()
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }
}
