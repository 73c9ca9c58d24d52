pub mod category;
pub mod pipeline;
pub mod predicate;
pub mod region;
pub mod scheduler;
pub mod splitter;

use crate::VerdictKind;

/// Decides which verdict kinds reach the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportFilter {
    pub report_doublons: bool,
}

impl ReportFilter {
    pub fn admits(&self, kind: VerdictKind) -> bool {
        match kind {
            VerdictKind::Typo => true,
            VerdictKind::Doublon => self.report_doublons,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_filter() {
        let filter = ReportFilter::default();
        assert!(filter.admits(VerdictKind::Typo));
        assert!(!filter.admits(VerdictKind::Doublon));

        let filter = ReportFilter {
            report_doublons: true,
        };
        assert!(filter.admits(VerdictKind::Doublon));
    }
}
