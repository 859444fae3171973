pub type UnitNumber = u32;

/// Shown in place of detailed content when the Content Index has no entry.
pub const NO_DETAIL_AVAILABLE: &str = "No detailed content available.";

/// Unit as discovered in the rendered document, before any state is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitSeed {
    pub number: UnitNumber,
    pub section_id: String,
    pub summary: String,
}

impl UnitSeed {
    pub fn new(number: UnitNumber, section_id: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            number,
            section_id: section_id.into(),
            summary: summary.into(),
        }
    }
}

/// Lazy detailed-content slot. Once `Resolved` or `Missing` it never changes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Detail {
    #[default]
    Unresolved,
    /// Lookup requested, answer not yet applied.
    Pending,
    Resolved(String),
    Missing,
}

impl Detail {
    pub fn is_settled(&self) -> bool {
        matches!(self, Detail::Resolved(_) | Detail::Missing)
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Detail::Resolved(text) => Some(text),
            Detail::Missing => Some(NO_DETAIL_AVAILABLE),
            Detail::Unresolved | Detail::Pending => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    number: UnitNumber,
    section_id: String,
    ordinal: usize,
    document_index: usize,
    summary: String,
    pub(crate) detail: Detail,
    pub(crate) expanded: bool,
    pub(crate) completed: bool,
}

impl Unit {
    pub(crate) fn from_seed(seed: UnitSeed, ordinal: usize, document_index: usize) -> Self {
        Self {
            number: seed.number,
            section_id: seed.section_id,
            ordinal,
            document_index,
            summary: seed.summary,
            detail: Detail::Unresolved,
            expanded: false,
            completed: false,
        }
    }

    pub fn number(&self) -> UnitNumber {
        self.number
    }

    pub fn section_id(&self) -> &str {
        &self.section_id
    }

    /// 1-based position among the units of the owning section.
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// 0-based position in the whole document.
    pub fn document_index(&self) -> usize {
        self.document_index
    }

    /// Progress key: `sectionId-ordinal`.
    pub fn unit_id(&self) -> String {
        format!("{}-{}", self.section_id, self.ordinal)
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn detail(&self) -> &Detail {
        &self.detail
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    id: String,
    units: Vec<UnitNumber>,
    pub(crate) all_completed: bool,
}

impl Section {
    pub(crate) fn new(id: String) -> Self {
        Self {
            id,
            units: Vec::new(),
            all_completed: true,
        }
    }

    pub(crate) fn push(&mut self, number: UnitNumber) -> usize {
        self.units.push(number);
        self.units.len()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn units(&self) -> &[UnitNumber] {
        &self.units
    }

    pub fn all_completed(&self) -> bool {
        self.all_completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_id_joins_section_and_ordinal() {
        let unit = Unit::from_seed(UnitSeed::new(3, "A", "summary"), 2, 2);
        assert_eq!(unit.unit_id(), "A-2");
        assert_eq!(unit.number(), 3);
        assert_eq!(unit.document_index(), 2);
    }

    #[test]
    fn only_settled_detail_has_text() {
        assert_eq!(Detail::Unresolved.text(), None);
        assert_eq!(Detail::Pending.text(), None);
        assert_eq!(Detail::Missing.text(), Some(NO_DETAIL_AVAILABLE));
        assert_eq!(Detail::Resolved("x".into()).text(), Some("x"));
        assert!(!Detail::Pending.is_settled());
        assert!(Detail::Missing.is_settled());
    }
}
