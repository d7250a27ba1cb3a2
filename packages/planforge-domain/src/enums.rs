use serde::{Deserialize, Serialize};

/// Source format of a floor plan. Unrecognized values are rejected during
/// request deserialization instead of being stored silently.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
	Pdf,
	Image,
	Canvas,
}
impl FileType {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Pdf => "pdf",
			Self::Image => "image",
			Self::Canvas => "canvas",
		}
	}
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
	Uploaded,
	Processing,
	Ready,
	Error,
}
impl PlanStatus {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Uploaded => "uploaded",
			Self::Processing => "processing",
			Self::Ready => "ready",
			Self::Error => "error",
		}
	}
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	User,
	Assistant,
}
impl Role {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::User => "user",
			Self::Assistant => "assistant",
		}
	}
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackType {
	Suggestion,
	Correction,
	Rating,
}
impl FeedbackType {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Suggestion => "suggestion",
			Self::Correction => "correction",
			Self::Rating => "rating",
		}
	}
}
