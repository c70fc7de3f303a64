/// 常用標籤
pub const COMMON_LABELS: [&str; 15] = [
    "networking",
    "conference",
    "meeting",
    "startup",
    "pitch",
    "interview",
    "workshop",
    "trade show",
    "errands",
    "tech event",
    "social gathering",
    "ceremony",
    "fundraiser",
    "business visit",
    "product launch",
];

/// Selection state of the labels step: catalog entries toggled on or off plus
/// free-form custom labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelPicker {
    catalog: Vec<(String, bool)>,
    custom: Vec<String>,
}

impl Default for LabelPicker {
    fn default() -> Self {
        Self {
            catalog: COMMON_LABELS.iter().map(|l| (l.to_string(), false)).collect(),
            custom: Vec::new(),
        }
    }
}

impl LabelPicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 由已儲存的標籤還原選取狀態
    pub fn from_selected(labels: &[String]) -> Self {
        let mut picker = Self::default();
        for label in labels {
            picker.add(label);
        }
        picker
    }

    /// Catalog picks in catalog order, then custom labels in insertion order.
    pub fn selected(&self) -> Vec<String> {
        self.catalog
            .iter()
            .filter(|(_, on)| *on)
            .map(|(name, _)| name.clone())
            .chain(self.custom.iter().cloned())
            .collect()
    }

    pub fn unselected(&self) -> Vec<&str> {
        self.catalog
            .iter()
            .filter(|(_, on)| !*on)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn is_valid(&self) -> bool {
        self.catalog.iter().any(|(_, on)| *on) || !self.custom.is_empty()
    }

    /// Adds typed input. Catalog matches select the catalog entry; duplicates
    /// of anything already selected are ignored.
    pub fn add(&mut self, input: &str) {
        let label = input.trim();
        if label.is_empty() {
            return;
        }

        if self
            .selected()
            .iter()
            .any(|selected| selected.eq_ignore_ascii_case(label))
        {
            return;
        }

        if let Some(entry) = self
            .catalog
            .iter_mut()
            .find(|(name, _)| name.eq_ignore_ascii_case(label))
        {
            entry.1 = true;
            return;
        }

        self.custom.push(label.to_string());
    }

    /// Matches the same way `add` does, ignoring ASCII case.
    pub fn remove(&mut self, label: &str) {
        let label = label.trim();
        if let Some(entry) = self
            .catalog
            .iter_mut()
            .find(|(name, _)| name.eq_ignore_ascii_case(label))
        {
            entry.1 = false;
            return;
        }
        self.custom.retain(|custom| !custom.eq_ignore_ascii_case(label));
    }
}
