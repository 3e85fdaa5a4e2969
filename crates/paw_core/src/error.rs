use thiserror::Error;

/// Generic banner text used when the server gives no usable `detail`.
pub const GENERIC_PREDICT_FAILURE: &str = "예측 중 오류가 발생했습니다.";

/// Reasons a picked or dropped file is refused before anything is sent.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("파일 크기는 10MB 이하여야 합니다. ({size} bytes)")]
    TooLarge { size: u64 },
    #[error("이미지 파일만 업로드 가능합니다.")]
    NotAnImage { media_type: Option<String> },
    #[error("파일을 읽을 수 없습니다: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures of a single classification request.
#[derive(Debug, Error)]
pub enum PredictError {
    /// Non-2xx reply; `detail` is already resolved to a displayable message.
    #[error("{detail}")]
    Server { status: u16, detail: String },
    #[error("서버에 연결할 수 없습니다: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("서버 응답을 해석할 수 없습니다: {0}")]
    InvalidResponse(#[from] serde_json::Error),
    #[error("예측 작업이 중단되었습니다.")]
    Worker,
}

/// Anything shown in the error banner.
#[derive(Debug, Error)]
pub enum Failure {
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error(transparent)]
    Predict(#[from] PredictError),
}

impl Failure {
    pub fn banner(&self) -> String {
        format!("❌ {self}")
    }

    /// English wording of [`Failure::banner`]. A server `detail` is shown as
    /// sent, whatever its language.
    pub fn banner_en(&self) -> String {
        let text = match self {
            Failure::Upload(UploadError::TooLarge { size }) => {
                format!("The file must be 10MB or smaller. ({size} bytes)")
            }
            Failure::Upload(UploadError::NotAnImage { .. }) => {
                "Only image files can be uploaded.".to_string()
            }
            Failure::Upload(UploadError::Io(e)) => format!("Cannot read file: {e}"),
            Failure::Predict(PredictError::Server { detail, .. })
                if detail == GENERIC_PREDICT_FAILURE =>
            {
                "An error occurred during prediction.".to_string()
            }
            Failure::Predict(PredictError::Server { detail, .. }) => detail.clone(),
            Failure::Predict(PredictError::Transport(e)) => format!("Cannot reach the server: {e}"),
            Failure::Predict(PredictError::InvalidResponse(e)) => {
                format!("Unreadable server response: {e}")
            }
            Failure::Predict(PredictError::Worker) => "The prediction was interrupted.".to_string(),
        };
        format!("❌ {text}")
    }
}

impl PredictError {
    /// Builds a `Server` error from a status code and a raw error body.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        PredictError::Server {
            status,
            detail: error_detail(body),
        }
    }
}

/// Pulls `detail` out of a JSON error body, falling back to the generic text.
pub fn error_detail(body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("detail")
                .and_then(|d| d.as_str())
                .filter(|d| !d.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| GENERIC_PREDICT_FAILURE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(r#"{"detail":"이미지 파일만 업로드 가능합니다."}"#.as_bytes(), "이미지 파일만 업로드 가능합니다.")]
    #[case(br#"{"error":"boom"}"#.as_slice(), GENERIC_PREDICT_FAILURE)]
    #[case(br#"{"detail":""}"#.as_slice(), GENERIC_PREDICT_FAILURE)]
    #[case(br#"{"detail":[{"loc":["body","file"]}]}"#.as_slice(), GENERIC_PREDICT_FAILURE)]
    #[case(b"<html>502 Bad Gateway</html>".as_slice(), GENERIC_PREDICT_FAILURE)]
    fn error_detail_extracts_or_falls_back(#[case] body: &[u8], #[case] expected: &str) {
        assert_eq!(error_detail(body), expected);
    }

    #[test]
    fn server_error_displays_detail_only() {
        let err = PredictError::from_response(500, r#"{"detail":"GPU 메모리 부족입니다."}"#.as_bytes());
        assert_eq!(err.to_string(), "GPU 메모리 부족입니다.");
        assert!(matches!(err, PredictError::Server { status: 500, .. }));
    }

    #[test]
    fn banners_agree_across_languages() {
        let too_large = Failure::from(UploadError::TooLarge { size: 10_485_761 });
        assert_eq!(too_large.banner(), "❌ 파일 크기는 10MB 이하여야 합니다. (10485761 bytes)");
        assert_eq!(
            too_large.banner_en(),
            "❌ The file must be 10MB or smaller. (10485761 bytes)"
        );

        let not_image = Failure::from(UploadError::NotAnImage { media_type: None });
        assert_eq!(not_image.banner(), "❌ 이미지 파일만 업로드 가능합니다.");
        assert_eq!(not_image.banner_en(), "❌ Only image files can be uploaded.");

        let worker = Failure::from(PredictError::Worker);
        assert_eq!(worker.banner_en(), "❌ The prediction was interrupted.");
    }

    #[test]
    fn server_detail_is_not_translated() {
        let detail = Failure::from(PredictError::from_response(
            400,
            r#"{"detail":"이미지를 처리할 수 없습니다."}"#.as_bytes(),
        ));
        assert_eq!(detail.banner(), detail.banner_en());

        let generic = Failure::from(PredictError::from_response(500, b"oops"));
        assert_eq!(generic.banner(), "❌ 예측 중 오류가 발생했습니다.");
        assert_eq!(generic.banner_en(), "❌ An error occurred during prediction.");
    }
}
