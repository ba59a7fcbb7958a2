use crate::workers::{IndexReport, COMPLETION_MESSAGE, REPORTED_WAIT_SECS};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct PingResponse {
    pub message: String,
}

impl PingResponse {
    pub fn pong() -> Self {
        Self {
            message: "pong".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct UploadResponse {
    pub batch_output: String,
    /// Always `REPORTED_WAIT_SECS`.
    pub wait_time: u64,
    pub ngrams_output: String,
    pub message: String,
}

impl From<IndexReport> for UploadResponse {
    fn from(report: IndexReport) -> Self {
        Self {
            batch_output: report.batch_output,
            wait_time: REPORTED_WAIT_SECS,
            ngrams_output: report.ngrams_output,
            message: COMPLETION_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn upload_response_wire_shape() {
        let response = UploadResponse::from(IndexReport {
            batch_output: "b\n".to_string(),
            ngrams_output: "n\n".to_string(),
        });

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "batch_output": "b\n",
                "wait_time": 10,
                "ngrams_output": "n\n",
                "message": "Batch and ngrams processing completed successfully."
            })
        );
    }
}
