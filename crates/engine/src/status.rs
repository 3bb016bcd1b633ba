/// What a controller is doing right now, as one tagged value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Saving,
    Error(String),
}

impl Status {
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Loading | Self::Saving)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Bookkeeping behind [`Status`]. Saves are counted because reorders may
/// overlap; the last error sticks until the next success.
#[derive(Debug, Default)]
pub(crate) struct Activity {
    loading: usize,
    in_flight: usize,
    error: Option<String>,
}

impl Activity {
    pub(crate) fn begin_load(&mut self) {
        self.loading += 1;
    }

    pub(crate) fn end_load(&mut self, error: Option<String>) {
        self.loading = self.loading.saturating_sub(1);
        self.error = error;
    }

    pub(crate) fn begin_save(&mut self) {
        self.in_flight += 1;
    }

    pub(crate) fn end_save(&mut self, error: Option<String>) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.error = error;
    }

    /// Records a failure reported after the request itself settled.
    pub(crate) fn fail(&mut self, reason: String) {
        self.error = Some(reason);
    }

    pub(crate) fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub(crate) fn status(&self) -> Status {
        if self.loading > 0 {
            Status::Loading
        } else if self.in_flight > 0 {
            Status::Saving
        } else if let Some(reason) = &self.error {
            Status::Error(reason.clone())
        } else {
            Status::Idle
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saving_persists_until_last_request_settles() {
        let mut activity = Activity::default();
        activity.begin_save();
        activity.begin_save();
        activity.end_save(None);
        assert_eq!(activity.status(), Status::Saving);
        activity.end_save(None);
        assert_eq!(activity.status(), Status::Idle);
    }

    #[test]
    fn loading_wins_over_saving() {
        let mut activity = Activity::default();
        activity.begin_save();
        activity.begin_load();
        assert_eq!(activity.status(), Status::Loading);
        assert!(activity.status().is_busy());
    }

    #[test]
    fn error_clears_on_next_success() {
        let mut activity = Activity::default();
        activity.begin_save();
        activity.end_save(Some("offline".into()));
        assert_eq!(activity.status().error(), Some("offline"));

        activity.begin_load();
        activity.end_load(None);
        assert_eq!(activity.status(), Status::Idle);
    }

    #[test]
    fn failure_outlives_a_clean_reload() {
        let mut activity = Activity::default();
        activity.begin_save();
        activity.end_save(Some("offline".into()));
        activity.begin_load();
        activity.end_load(None);
        activity.fail("offline".into());
        assert_eq!(activity.status(), Status::Error("offline".into()));
    }

    #[test]
    fn unbalanced_end_does_not_underflow() {
        let mut activity = Activity::default();
        activity.end_save(None);
        assert_eq!(activity.in_flight(), 0);
    }
}
