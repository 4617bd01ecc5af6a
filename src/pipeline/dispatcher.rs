// src/pipeline/dispatcher.rs

//! Streaming callback target: converts each row and appends the result to
//! the run's accumulator.

use std::sync::Arc;

use tracing::trace;

use crate::adapter::{ResourceHelper, RowConverter};
use crate::errors::Result;
use crate::exec::RowSink;
use crate::row::Row;

use super::accumulator::Accumulator;

pub struct ResultDispatcher<C: RowConverter + ?Sized> {
    converter: Arc<C>,
    resources: Arc<ResourceHelper>,
    accumulator: Accumulator<C::Entity>,
    rows: usize,
}

impl<C: RowConverter + ?Sized> ResultDispatcher<C> {
    /// Start a run with an empty accumulator.
    pub fn new(converter: Arc<C>, resources: Arc<ResourceHelper>) -> Self {
        Self {
            converter,
            resources,
            accumulator: Accumulator::new(),
            rows: 0,
        }
    }

    /// Rows converted so far in this run.
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn pending(&self) -> usize {
        self.accumulator.len()
    }

    /// End the run and take ownership of its batch.
    pub fn into_accumulator(self) -> Accumulator<C::Entity> {
        self.accumulator
    }
}

impl<C: RowConverter + ?Sized> RowSink for ResultDispatcher<C> {
    fn on_row(&mut self, row: Row) -> Result<()> {
        let entities = self.converter.convert(&self.resources, &row)?;
        trace!(
            integration = %self.converter.id(),
            row = self.rows,
            entities = entities.len(),
            "row converted"
        );
        self.accumulator.append(entities);
        self.rows += 1;
        Ok(())
    }
}
