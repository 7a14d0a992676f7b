/// Progress of one asynchronous action.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestState<T> {
    #[default]
    Idle,
    Pending,
    Success(T),
    Error(String),
}

impl<T> RequestState<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, RequestState::Pending)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            RequestState::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RequestState::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Mark the action as started. Fails if one is already in flight.
    pub fn start(&mut self) -> anyhow::Result<()> {
        if self.is_pending() {
            anyhow::bail!("A request is already in progress");
        }
        *self = RequestState::Pending;
        Ok(())
    }

    /// Record the outcome; errors are kept as their full context chain.
    pub fn finish(&mut self, result: anyhow::Result<T>) {
        *self = Self::from(result);
    }
}

impl<T> From<anyhow::Result<T>> for RequestState<T> {
    fn from(result: anyhow::Result<T>) -> Self {
        match result {
            Ok(value) => RequestState::Success(value),
            Err(e) => RequestState::Error(format!("{e:#}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_start_rejects_double_submit() {
        let mut state: RequestState<u32> = RequestState::default();
        state.start().unwrap();
        assert!(state.start().is_err());
        state.finish(Ok(3));
        assert_eq!(state.value(), Some(&3));
        state.start().unwrap();
    }

    #[test]
    fn test_error_keeps_context() {
        let failure: anyhow::Result<u32> = Err(anyhow::anyhow!("status 500")).context("Design generation failed");
        let state = RequestState::from(failure);
        assert_eq!(state.error(), Some("Design generation failed: status 500"));
    }
}
