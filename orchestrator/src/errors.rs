//! Fatal, request-terminating error taxonomy (spec §7).

use thiserror::Error;

use sondeck_core::{ErrorCategory, FatalError, Severity};

/// Rejected before any analyzer runs: the file itself cannot be ingested.
/// Code/recommendation are fixed per variant, never loaded at runtime.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionError {
    #[error("file extension or MIME type is not in the accepted allowlist")]
    UnsupportedFormat,
    #[error("file exceeds the configured maximum size")]
    FileTooLarge,
    #[error("file does not start with a recognized format signature")]
    InvalidMagicBytes,
    #[error("container header could not be parsed")]
    CorruptHeader,
    #[error("file is shorter than its header declares")]
    TruncatedFile,
    #[error("container has no audio stream")]
    MissingAudioStream,
    #[error("declared sample rate is zero or absurd")]
    InvalidSampleRate,
    #[error("declared channel count is zero or absurd")]
    InvalidChannelCount,
    #[error("audio stream has zero duration")]
    ZeroDuration,
    #[error("file does not exist at the given path")]
    FileNotFound,
    #[error("file exists but could not be read")]
    FileNotReadable,
    #[error("file is zero bytes")]
    FileEmpty,
}

impl IngestionError {
    /// Fixed code drawn from the frozen ingestion-error table (spec §7).
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedFormat => "UNSUPPORTED_FORMAT",
            Self::FileTooLarge => "FILE_TOO_LARGE",
            Self::InvalidMagicBytes => "INVALID_MAGIC_BYTES",
            Self::CorruptHeader => "CORRUPT_HEADER",
            Self::TruncatedFile => "TRUNCATED_FILE",
            Self::MissingAudioStream => "MISSING_AUDIO_STREAM",
            Self::InvalidSampleRate => "INVALID_SAMPLE_RATE",
            Self::InvalidChannelCount => "INVALID_CHANNEL_COUNT",
            Self::ZeroDuration => "ZERO_DURATION",
            Self::FileNotFound => "FILE_NOT_FOUND",
            Self::FileNotReadable => "FILE_NOT_READABLE",
            Self::FileEmpty => "FILE_EMPTY",
        }
    }

    #[must_use]
    pub const fn recommendation(&self) -> &'static str {
        match self {
            Self::UnsupportedFormat => "convert the file to one of the accepted formats (wav, mp3, flac, aac, m4a, ogg, aiff)",
            Self::FileTooLarge => "reduce file size or raise the configured maximum",
            Self::InvalidMagicBytes => "re-export the file; its header does not match any supported format",
            Self::CorruptHeader => "re-export the file from the original source",
            Self::TruncatedFile => "re-upload the complete file; the transfer may have been interrupted",
            Self::MissingAudioStream => "confirm the file actually contains an audio track",
            Self::InvalidSampleRate => "re-export with a standard sample rate",
            Self::InvalidChannelCount => "re-export with a standard channel layout",
            Self::ZeroDuration => "confirm the source file is not empty of audio",
            Self::FileNotFound => "verify the file path or re-upload the file",
            Self::FileNotReadable => "check file permissions",
            Self::FileEmpty => "re-upload a non-empty file",
        }
    }

    /// The fatal, user-visible error shape (spec §7).
    #[must_use]
    pub fn to_fatal(self) -> FatalError {
        FatalError {
            code: self.code(),
            category: ErrorCategory::Ingestion,
            severity: Severity::Critical,
            description: self.to_string(),
            recommendation: self.recommendation(),
        }
    }
}

pub type IngestionResult<T> = Result<T, IngestionError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_variant_has_a_distinct_code() {
        let all = [
            IngestionError::UnsupportedFormat,
            IngestionError::FileTooLarge,
            IngestionError::InvalidMagicBytes,
            IngestionError::CorruptHeader,
            IngestionError::TruncatedFile,
            IngestionError::MissingAudioStream,
            IngestionError::InvalidSampleRate,
            IngestionError::InvalidChannelCount,
            IngestionError::ZeroDuration,
            IngestionError::FileNotFound,
            IngestionError::FileNotReadable,
            IngestionError::FileEmpty,
        ];
        let mut codes: Vec<&str> = all.iter().map(IngestionError::code).collect();
        let unique_count = codes.len();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), unique_count);
    }

    #[test]
    fn to_fatal_uses_ingestion_category() {
        let fatal = IngestionError::FileTooLarge.to_fatal();
        assert_eq!(fatal.category, ErrorCategory::Ingestion);
        assert_eq!(fatal.code, "FILE_TOO_LARGE");
    }
}
