mod aggregator;
mod report;
#[cfg(test)]
mod tests;

pub use aggregator::StatusAggregator;
pub use report::StatusReport;
