use super::SelectionCriterion;
use crate::core::error::Result;
use crate::core::redundancy::RedundancyEngine;
use crate::core::summary::SummaryContext;
use log::info;

pub struct Redundancy<'a> {
    engine: RedundancyEngine<'a>,
}

impl<'a> Redundancy<'a> {
    pub fn new(engine: RedundancyEngine<'a>) -> Self {
        Self { engine }
    }
}

impl SelectionCriterion for Redundancy<'_> {
    /// Appends one representative per cluster in timeline order and drops
    /// the members that lost.
    fn include(&self, mut ctx: SummaryContext) -> Result<SummaryContext> {
        let outcome = self.engine.analyze(&ctx.videos)?;
        ctx.append(&outcome.ordered)?;
        ctx.delete(&outcome.discarded)?;
        Ok(ctx)
    }

    /// Drops every segment that repeats across videos.
    fn exclude(&self, mut ctx: SummaryContext) -> Result<SummaryContext> {
        let outcome = self.engine.analyze(&ctx.videos)?;
        let removed = ctx.delete(&outcome.clustered())?;
        info!("✂️ Removed {} redundant segments", removed.len());
        Ok(ctx)
    }
}
