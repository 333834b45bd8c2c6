use sizefit_core::InputError;
use sizefit_fusion::FusionError;
use sizefit_measure::InvalidParam;
use sizefit_recommend::{InvalidProfileWeight, SizeChartError, SizeChartIoError};

/// Anything that can stop a sizing run.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Fusion(#[from] FusionError),
    #[error(transparent)]
    SizeChart(#[from] SizeChartError),
    #[error(transparent)]
    Param(#[from] InvalidParam),
    #[error(transparent)]
    Profile(#[from] InvalidProfileWeight),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<SizeChartIoError> for PipelineError {
    fn from(err: SizeChartIoError) -> Self {
        match err {
            SizeChartIoError::Io(e) => PipelineError::Io(e),
            SizeChartIoError::Json(e) => PipelineError::Json(e),
            SizeChartIoError::Chart(e) => PipelineError::SizeChart(e),
        }
    }
}
