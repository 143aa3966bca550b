use crate::domain::{GaussianResult, SatinResult};

/// Destination for the results of one laser configuration, fed one input power
/// at a time in input order.
pub trait ReportSink {
    fn write_results(&mut self, results: &[GaussianResult]) -> SatinResult<()>;
}

impl<S> ReportSink for &mut S
where
    S: ReportSink + ?Sized,
{
    fn write_results(&mut self, results: &[GaussianResult]) -> SatinResult<()> {
        (**self).write_results(results)
    }
}
