//! Session state: factor table, history and the current result
//!
//! One `Session` per running instance. It starts with an empty history and
//! no current result, and [`Session::reset`] brings it back to that state.

use chrono::{Local, NaiveDate};
use tracing::info;

use crate::advisor::{self, Advice, TipProvider, TipRequest};
use crate::calculator;
use crate::error::{AdvisoryError, TrackerResult};
use crate::factors::EmissionFactors;
use crate::history::HistoryStore;
use crate::models::{ActivityInput, FootprintRecord};

pub struct Session {
    factors: EmissionFactors,
    history: HistoryStore,
    current: Option<FootprintRecord>,
}

impl Session {
    pub fn new() -> TrackerResult<Self> {
        Ok(Self::with_history(HistoryStore::new()?))
    }

    pub fn with_history(history: HistoryStore) -> Self {
        Self {
            factors: EmissionFactors::default(),
            history,
            current: None,
        }
    }

    pub fn factors(&self) -> &EmissionFactors {
        &self.factors
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn current(&self) -> Option<&FootprintRecord> {
        self.current.as_ref()
    }

    /// Calculate, record as the current result and append to history.
    ///
    /// On error nothing is recorded.
    pub fn calculate(
        &mut self,
        input: &ActivityInput,
        date: NaiveDate,
    ) -> TrackerResult<FootprintRecord> {
        let footprint = calculator::calculate_footprint(input, &self.factors)?;
        let record = FootprintRecord::new(date, footprint.breakdown);

        self.history.append(record.clone())?;
        self.current = Some(record.clone());

        info!(
            target: "carbon_tracker::session",
            date = %record.date(),
            total = record.total(),
            "footprint recorded"
        );
        Ok(record)
    }

    pub fn calculate_today(&mut self, input: &ActivityInput) -> TrackerResult<FootprintRecord> {
        self.calculate(input, Local::now().date_naive())
    }

    /// Clear history and the current result
    pub fn reset(&mut self) -> TrackerResult<()> {
        self.history.reset()?;
        self.current = None;
        Ok(())
    }

    /// Whether [`Session::request_tips`] would contact the provider.
    ///
    /// False with no current result or a zero footprint.
    pub fn awaits_tips(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|record| TipRequest::from_record(record).needs_tips())
    }

    /// Tips for the current result; `None` if nothing has been calculated.
    ///
    /// A failed request leaves the session untouched.
    pub async fn request_tips(
        &self,
        provider: &dyn TipProvider,
    ) -> Option<Result<Advice, AdvisoryError>> {
        let record = self.current.as_ref()?;
        Some(advisor::request_tips(provider, record).await)
    }
}
