// src/stage/template.rs

use crate::stage::StageId;

/// Duration used for stages whose estimate is missing or zero.
pub const DEFAULT_DURATION_DAYS: u32 = 3;

/// Upper bound accepted by validation (ten years).
pub const MAX_DURATION_DAYS: u32 = 3650;

/// One entry of the stage catalog.
///
/// Templates are read-only input to the scheduler. The catalog order matters:
/// it breaks ties between stages with no dependencies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageTemplate {
    pub id: StageId,
    /// Position in the catalog as shown to users (1-based in practice).
    pub number_index: u32,
    pub name: String,
    pub category: String,
    /// `None` and `Some(0)` both mean "use the default duration".
    pub estimated_duration_days: Option<u32>,
    /// Stages that must end before this one can start.
    pub dependencies: Vec<StageId>,
    pub is_deliverable: bool,
}

impl StageTemplate {
    /// Minimal template: name mirrors the id, no category, no dependencies.
    pub fn new(id: impl Into<StageId>, estimated_duration_days: Option<u32>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            number_index: 0,
            category: String::new(),
            estimated_duration_days,
            dependencies: Vec::new(),
            is_deliverable: false,
        }
    }

    pub fn after(mut self, dependency: impl Into<StageId>) -> Self {
        self.dependencies.push(dependency.into());
        self
    }

    pub fn deliverable(mut self, is_deliverable: bool) -> Self {
        self.is_deliverable = is_deliverable;
        self
    }

    /// Duration actually used for date arithmetic.
    pub fn effective_duration_days(&self, default_days: u32) -> u32 {
        match self.estimated_duration_days {
            None | Some(0) => default_days,
            Some(days) => days,
        }
    }

    pub fn has_dependencies(&self) -> bool {
        !self.dependencies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_and_missing_durations_fall_back_to_default() {
        assert_eq!(StageTemplate::new("a", None).effective_duration_days(3), 3);
        assert_eq!(StageTemplate::new("a", Some(0)).effective_duration_days(3), 3);
        assert_eq!(StageTemplate::new("a", Some(7)).effective_duration_days(3), 7);
    }
}
