//! Two-in-a-row stability check.

/// Result of offering one reading to [`StabilityState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Nothing was held; the reading is now the candidate.
    Held,
    /// The reading matched the candidate; it is the final value.
    Confirmed(String),
    /// The reading differed from the candidate; both are dropped.
    Discrepancy { held: String, got: String },
}

/// The single remembered candidate of a session.
///
/// A mismatch clears the candidate instead of replacing it, so after a
/// discrepancy two further equal readings are needed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StabilityState {
    held: Option<String>,
}

impl StabilityState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn held(&self) -> Option<&str> {
        self.held.as_deref()
    }

    pub fn observe(&mut self, reading: String) -> Verdict {
        match self.held.take() {
            None => {
                self.held = Some(reading);
                Verdict::Held
            }
            Some(held) if held == reading => Verdict::Confirmed(held),
            Some(held) => Verdict::Discrepancy { held, got: reading },
        }
    }

    pub fn clear(&mut self) {
        self.held = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_equal_readings_confirm() {
        let mut st = StabilityState::new();
        assert_eq!(st.observe("12.5".into()), Verdict::Held);
        assert_eq!(st.held(), Some("12.5"));
        assert_eq!(st.observe("12.5".into()), Verdict::Confirmed("12.5".into()));
        assert_eq!(st.held(), None);
    }

    #[test]
    fn mismatch_clears_rather_than_replaces() {
        let mut st = StabilityState::new();
        st.observe("10".into());
        assert_eq!(
            st.observe("11".into()),
            Verdict::Discrepancy {
                held: "10".into(),
                got: "11".into()
            }
        );
        assert_eq!(st.held(), None);
        // "11" was not retained: the next "11" only becomes the candidate.
        assert_eq!(st.observe("11".into()), Verdict::Held);
        assert_eq!(st.observe("11".into()), Verdict::Confirmed("11".into()));
    }

    #[test]
    fn comparison_is_textual() {
        let mut st = StabilityState::new();
        st.observe("5.0".into());
        assert!(matches!(
            st.observe("5.00".into()),
            Verdict::Discrepancy { .. }
        ));
    }
}
