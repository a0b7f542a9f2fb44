//! Presenter state for a sequence of location queries.
//!
//! Each submission gets a strictly increasing [`RequestToken`]. Only the
//! completion carrying the latest token may change the state; results for
//! superseded queries are dropped.

use std::fmt::Display;

use crate::presenter::view::WeatherView;

/// Identifies one submitted query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ViewState {
    /// Nothing submitted yet.
    #[default]
    Idle,
    Loading {
        token: RequestToken,
        location: String,
    },
    Ready(Box<WeatherView>),
    Failed {
        location: String,
    },
}

#[derive(Debug, Default)]
pub struct QuerySession {
    last_token: u64,
    state: ViewState,
}

impl QuerySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Start loading `location`, superseding any query still in flight.
    pub fn submit(&mut self, location: &str) -> RequestToken {
        self.last_token += 1;
        let token = RequestToken(self.last_token);
        if let ViewState::Loading { location: previous, .. } = &self.state {
            tracing::debug!("Query for '{}' superseded by '{}'", previous, location);
        }
        self.state = ViewState::Loading {
            token,
            location: location.to_string(),
        };
        token
    }

    /// Apply the outcome of the request identified by `token`.
    ///
    /// Returns `false` when the request was superseded and the outcome was
    /// dropped.
    pub fn complete<E: Display>(
        &mut self,
        token: RequestToken,
        outcome: Result<WeatherView, E>,
    ) -> bool {
        let location = match &self.state {
            ViewState::Loading {
                token: current,
                location,
            } if *current == token => location.clone(),
            _ => {
                tracing::debug!("Dropping stale result for request {:?}", token);
                return false;
            }
        };

        self.state = match outcome {
            Ok(view) => ViewState::Ready(Box::new(view)),
            Err(e) => {
                tracing::warn!("Weather lookup for '{}' failed: {}", location, e);
                ViewState::Failed { location }
            }
        };
        true
    }
}
