//! Byte-range text edits recorded against a tree's original source

/// Replace `source[start..end]` with `replacement`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub start: usize,
    pub end: usize,
    pub replacement: String,
}

impl TextEdit {
    pub fn replace(start: usize, end: usize, replacement: impl Into<String>) -> Self {
        Self {
            start,
            end,
            replacement: replacement.into(),
        }
    }

    pub fn delete(start: usize, end: usize) -> Self {
        Self::replace(start, end, String::new())
    }

    fn contains(&self, other: &TextEdit) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    fn overlaps(&self, other: &TextEdit) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Non-overlapping edits, at most one per range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditLog {
    edits: Vec<TextEdit>,
}

impl EditLog {
    /// Records `edit`, returning whether it was kept.
    ///
    /// An edit on a range already edited replaces the earlier one. An edit
    /// inside an edited range is dropped; one that encloses earlier edits
    /// absorbs them. Edits that only partially overlap are dropped.
    pub fn push(&mut self, edit: TextEdit) -> bool {
        if let Some(same) = self
            .edits
            .iter_mut()
            .find(|e| e.start == edit.start && e.end == edit.end)
        {
            *same = edit;
            return true;
        }

        if self.edits.iter().any(|e| e.contains(&edit)) {
            return false;
        }

        if self
            .edits
            .iter()
            .any(|e| e.overlaps(&edit) && !edit.contains(e))
        {
            tracing::debug!(
                start = edit.start,
                end = edit.end,
                "dropping partially overlapping edit"
            );
            return false;
        }

        self.edits.retain(|e| !edit.contains(e));
        self.edits.push(edit);
        true
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Edits ordered by position.
    pub fn sorted(&self) -> Vec<&TextEdit> {
        let mut edits: Vec<&TextEdit> = self.edits.iter().collect();
        edits.sort_by_key(|e| (e.start, e.end));
        edits
    }
}
