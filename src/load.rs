use crate::error::ClientError;

/// State of a view's remote data. Loading and failure replace the content;
/// the two never show at once.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState<T> {
    #[default]
    Loading,
    /// Inline message to show.
    Failed(String),
    Ready(T),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            LoadState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> LoadState<U> {
        match self {
            LoadState::Loading => LoadState::Loading,
            LoadState::Failed(message) => LoadState::Failed(message),
            LoadState::Ready(value) => LoadState::Ready(f(value)),
        }
    }
}

impl<T> From<Result<T, ClientError>> for LoadState<T> {
    fn from(result: Result<T, ClientError>) -> Self {
        match result {
            Ok(value) => LoadState::Ready(value),
            Err(e) => {
                log::warn!("{e}");
                LoadState::Failed(e.user_message())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn errors_become_inline_messages() {
        let state: LoadState<u8> =
            Err(ClientError::new(ErrorKind::FacilityFetchFailed, "status 500")).into();
        assert_eq!(state.error(), Some("Could not load parking facilities."));
        assert!(!state.is_loading());
        assert_eq!(state.ready(), None);
    }

    #[test]
    fn ready_values_map() {
        let state: LoadState<Vec<u8>> = Ok(vec![1, 2, 3]).into();
        assert_eq!(state.map(|v| v.len()), LoadState::Ready(3));
    }
}
